use crate::constraints::AdjacencyMatrix;
use channel_common::db::core::ChannelDB;
use channel_common::db::indices::SegmentId;

#[derive(Clone, Copy, PartialEq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Finds a directed cycle in the vertical constraint graph, if any.
///
/// Returns the cycle as an ordered id sequence: the back edge's target
/// first, then the parent chain walked back from the back edge's source.
pub fn find_cycle(vcg: &AdjacencyMatrix) -> Option<Vec<SegmentId>> {
    let n = vcg.len();
    let mut color = vec![Color::White; n];
    let mut parent = vec![usize::MAX; n];
    let mut back_edge = None;

    for v in 0..n {
        if color[v] == Color::White && dfs(v, vcg, &mut color, &mut parent, &mut back_edge) {
            break;
        }
    }

    let (start, end) = back_edge?;
    let mut cycle = vec![SegmentId::new(start)];
    let mut v = end;
    while v != start {
        cycle.push(SegmentId::new(v));
        v = parent[v];
    }
    Some(cycle)
}

fn dfs(
    v: usize,
    vcg: &AdjacencyMatrix,
    color: &mut [Color],
    parent: &mut [usize],
    back_edge: &mut Option<(usize, usize)>,
) -> bool {
    color[v] = Color::Gray;
    for to in vcg.successors(SegmentId::new(v)) {
        let to = to.index();
        match color[to] {
            Color::White => {
                parent[to] = v;
                if dfs(to, vcg, color, parent, back_edge) {
                    return true;
                }
            }
            Color::Gray => {
                *back_edge = Some((to, v));
                return true;
            }
            Color::Black => {}
        }
    }
    color[v] = Color::Black;
    false
}

/// Breaks a vertical constraint cycle with a dogleg: the first cycle
/// segment with a free contact strictly inside its span is split there.
/// Returns false when no cycle segment has one, in which case the channel
/// is unroutable as given.
pub fn break_cycle(db: &mut ChannelDB, cycle: &[SegmentId]) -> bool {
    for &sid in cycle {
        let span = db.segment(sid).span();
        if let Some(slot_index) = db
            .free_slots
            .iter()
            .position(|slot| span.strictly_contains(slot.column))
        {
            let column = db.free_slots[slot_index].column;
            let tail = db.split_segment(sid, slot_index);
            log::info!(
                "Dogleg: net {} split at column {} ({:?} -> {:?})",
                db.net_label(sid),
                column,
                sid,
                tail
            );
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use channel_common::db::core::PairTable;

    fn sid(i: usize) -> SegmentId {
        SegmentId::new(i)
    }

    fn matrix(n: usize, edges: &[(usize, usize)]) -> AdjacencyMatrix {
        let mut m = AdjacencyMatrix::new(n);
        for &(a, b) in edges {
            m.set(sid(a), sid(b));
        }
        m
    }

    #[test]
    fn empty_and_acyclic_graphs_have_no_cycle() {
        assert_eq!(find_cycle(&matrix(0, &[])), None);
        assert_eq!(find_cycle(&matrix(3, &[(0, 1), (1, 2), (0, 2)])), None);
    }

    #[test]
    fn two_cycle_is_reported() {
        let cycle = find_cycle(&matrix(2, &[(0, 1), (1, 0)])).unwrap();
        assert_eq!(cycle, vec![sid(0), sid(1)]);
    }

    #[test]
    fn three_cycle_walks_parents_back() {
        let cycle = find_cycle(&matrix(3, &[(0, 1), (1, 2), (2, 0)])).unwrap();
        assert_eq!(cycle, vec![sid(0), sid(2), sid(1)]);
    }

    #[test]
    fn cycle_behind_a_tail_is_found() {
        // 0 -> 1 -> 2 -> 1
        let cycle = find_cycle(&matrix(3, &[(0, 1), (1, 2), (2, 1)])).unwrap();
        assert_eq!(cycle, vec![sid(1), sid(2)]);
    }

    #[test]
    fn break_cycle_splits_first_segment_with_interior_slot() {
        let mut db = ChannelDB::from_table(&PairTable {
            top: vec![1, 0, 2],
            bottom: vec![2, 0, 1],
        })
        .unwrap();
        // both segments span 0-2; the middle column is free on both rows
        let slots_before = db.free_slots.len();
        assert!(break_cycle(&mut db, &[sid(0), sid(1)]));
        assert_eq!(db.free_slots.len(), slots_before - 1);
        assert_eq!(db.num_segments(), 3);
        assert!(db.segments[0].right.is_breakpoint);
        assert!(db.segments[2].left.is_breakpoint);
    }

    #[test]
    fn break_cycle_fails_without_interior_slots() {
        let mut db = ChannelDB::from_table(&PairTable {
            top: vec![1, 2],
            bottom: vec![2, 1],
        })
        .unwrap();
        assert!(!break_cycle(&mut db, &[sid(0), sid(1)]));
        assert_eq!(db.num_segments(), 2);
    }
}
