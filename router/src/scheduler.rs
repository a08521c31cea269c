use crate::constraints::AdjacencyMatrix;
use channel_common::db::core::ChannelDB;
use channel_common::db::indices::SegmentId;
use channel_common::db::route::TrackAssignment;
use channel_common::error::RouteError;
use std::collections::BTreeMap;

/// Greedy track assignment driven by the constraint graphs.
///
/// Precondition: the vertical constraint graph is acyclic. The graph is
/// cloned and consumed edge by edge; the database is never mutated. Signed
/// track indices grow upward from 0 on the top side and downward from -1 on
/// the bottom side, then get renumbered into one non-negative top-to-bottom
/// sequence.
pub fn assign_tracks(
    db: &ChannelDB,
    vcg: &AdjacencyMatrix,
    hcg: &AdjacencyMatrix,
) -> Result<TrackAssignment, RouteError> {
    let n = db.num_segments();
    let mut vcg = vcg.clone();
    let mut routes: BTreeMap<i32, Vec<SegmentId>> = BTreeMap::new();
    let mut placed = vec![false; n];
    let mut placed_count = 0usize;

    while placed_count < n {
        let (group_a, mut group_b, group_c) = classify(&vcg);

        if group_a.is_empty() && group_b.is_empty() && group_c.is_empty() {
            // Only dependency-free leftovers remain; force them onto the
            // bottom side so the loop always terminates with a total
            // assignment.
            group_b = (0..n)
                .filter(|&i| !placed[i])
                .map(SegmentId::new)
                .collect();
        }

        let before = placed_count;

        // Top side: a segment with only outgoing constraints must lie above
        // everything it points at.
        for &sid in &group_a {
            let mut track = 0i32;
            loop {
                if fits(hcg, sid, routes.get(&track)) {
                    routes.entry(track).or_default().push(sid);
                    placed[sid.index()] = true;
                    placed_count += 1;
                    vcg.clear_row(sid);
                    break;
                }
                track += 1;
            }
        }

        // Bottom side, mirrored: only incoming constraints.
        for &sid in &group_b {
            let mut track = -1i32;
            loop {
                if fits(hcg, sid, routes.get(&track)) {
                    routes.entry(track).or_default().push(sid);
                    placed[sid.index()] = true;
                    placed_count += 1;
                    vcg.clear_col(sid);
                    break;
                }
                track -= 1;
            }
        }

        if placed_count == before {
            return Err(RouteError::SchedulingStall {
                remaining: n - placed_count,
            });
        }
    }

    Ok(renumber(db, &routes))
}

// Partition by vertical-constraint degree: A = outgoing only (top side),
// B = incoming only (bottom side), C = both (must wait). Segments with no
// edges at all belong to no group.
fn classify(
    vcg: &AdjacencyMatrix,
) -> (Vec<SegmentId>, Vec<SegmentId>, Vec<SegmentId>) {
    let mut group_a = Vec::new();
    let mut group_b = Vec::new();
    let mut group_c = Vec::new();

    for i in 0..vcg.len() {
        let v = SegmentId::new(i);
        match (vcg.has_out_edge(v), vcg.has_in_edge(v)) {
            (true, false) => group_a.push(v),
            (false, true) => group_b.push(v),
            (true, true) => group_c.push(v),
            (false, false) => {}
        }
    }
    (group_a, group_b, group_c)
}

fn fits(hcg: &AdjacencyMatrix, sid: SegmentId, occupants: Option<&Vec<SegmentId>>) -> bool {
    occupants.is_none_or(|list| list.iter().all(|&other| !hcg.get(sid, other)))
}

// Fold the signed indices into 0..T keeping the drawn top-to-bottom order:
// non-negative keys stay, negative key k becomes k + T. Per-track lists are
// rebuilt in net iteration order for the exported mapping.
fn renumber(db: &ChannelDB, routes: &BTreeMap<i32, Vec<SegmentId>>) -> TrackAssignment {
    let total = routes.len() as i32;
    let mut by_segment = vec![0u32; db.num_segments()];
    for (&key, segs) in routes {
        let track = if key >= 0 { key } else { key + total } as u32;
        for &sid in segs {
            by_segment[sid.index()] = track;
        }
    }

    let mut tracks = vec![Vec::new(); routes.len()];
    for net in &db.nets {
        for &sid in &net.segments {
            tracks[by_segment[sid.index()] as usize].push(sid);
        }
    }

    TrackAssignment { by_segment, tracks }
}
