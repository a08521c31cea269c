use channel_common::db::core::{ChannelDB, Side, Terminal};
use channel_common::db::indices::SegmentId;
use channel_common::db::route::{CROSSING, Grid, TrackAssignment};

/// Draws the scheduled channel into a symbolic grid of `2 * tracks + 1`
/// rows. Odd rows carry the horizontal runs; vertical stubs connect each
/// endpoint to its contact row, or to its split partner's track for
/// breakpoint endpoints. A cell touched by two different nets becomes the
/// crossing marker and stays that way.
pub fn render(db: &ChannelDB, assignment: &TrackAssignment) -> Grid {
    let rows = 2 * assignment.track_count() + 1;
    let mut grid: Grid = vec![vec![String::new(); db.columns]; rows];

    for net in &db.nets {
        let label = net.label.to_string();
        for &sid in &net.segments {
            let seg = db.segment(sid);
            let row = track_row(assignment, sid);
            for col in seg.left.column..=seg.right.column {
                grid[row][col as usize] = label.clone();
            }
        }
    }

    for net in &db.nets {
        for &sid in &net.segments {
            let (left, right) = {
                let seg = db.segment(sid);
                (seg.left, seg.right)
            };
            draw_end(&mut grid, db, assignment, sid, left, true);
            draw_end(&mut grid, db, assignment, sid, right, false);
        }
    }

    grid
}

fn track_row(assignment: &TrackAssignment, sid: SegmentId) -> usize {
    2 * assignment.track_of(sid) as usize + 1
}

fn draw_end(
    grid: &mut Grid,
    db: &ChannelDB,
    assignment: &TrackAssignment,
    sid: SegmentId,
    term: Terminal,
    is_left: bool,
) {
    let row = track_row(assignment, sid);

    let (first, last) = if term.is_breakpoint {
        // jog between the two halves of the split, not a contact drop
        let Some(partner) = split_partner(db, sid, term.column, is_left) else {
            return;
        };
        let partner_row = track_row(assignment, partner);
        (row.min(partner_row), row.max(partner_row))
    } else {
        match term.side {
            Side::Top => (0, row),
            Side::Bottom => (row, grid.len() - 1),
        }
    };

    let label = db.net_label(sid).to_string();
    for r in first..=last {
        mark(&mut grid[r][term.column as usize], &label);
    }
}

// The other half of a dogleg split: joined at the same column, breakpoint
// on the opposite end.
fn split_partner(
    db: &ChannelDB,
    sid: SegmentId,
    column: u32,
    term_is_left: bool,
) -> Option<SegmentId> {
    let net = db.segment(sid).net;
    db.nets[net.index()]
        .segments
        .iter()
        .copied()
        .find(|&other| {
            if other == sid {
                return false;
            }
            let seg = db.segment(other);
            if term_is_left {
                seg.right.is_breakpoint && seg.right.column == column
            } else {
                seg.left.is_breakpoint && seg.left.column == column
            }
        })
}

fn mark(cell: &mut String, label: &str) {
    if !cell.is_empty() && cell.as_str() != label {
        *cell = CROSSING.to_string();
    } else {
        *cell = label.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::{horizontal_constraints, vertical_constraints};
    use crate::scheduler::assign_tracks;
    use channel_common::db::core::PairTable;

    fn rendered(top: &[u32], bottom: &[u32]) -> (ChannelDB, Grid) {
        let db = ChannelDB::from_table(&PairTable {
            top: top.to_vec(),
            bottom: bottom.to_vec(),
        })
        .unwrap();
        let vcg = vertical_constraints(&db);
        let hcg = horizontal_constraints(&db);
        let assignment = assign_tracks(&db, &vcg, &hcg).unwrap();
        let grid = render(&db, &assignment);
        (db, grid)
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn straight_drops_fill_their_columns() {
        let (_, grid) = rendered(&[1, 2, 3], &[1, 2, 3]);
        assert_eq!(grid.len(), 3);
        for r in &grid {
            assert_eq!(*r, row(&["1", "2", "3"]));
        }
    }

    #[test]
    fn crossing_cell_is_marked_and_sticky() {
        let (_, grid) = rendered(&[2, 3, 0], &[0, 3, 2]);
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[0], row(&["2", "3", ""]));
        assert_eq!(grid[1], row(&["2", CROSSING, "2"]));
        assert_eq!(grid[2], row(&["", "3", "2"]));
        assert_eq!(grid[3], row(&["", "3", "2"]));
        assert_eq!(grid[4], row(&["", "3", "2"]));
    }

    #[test]
    fn track_rows_are_odd_rows() {
        let (db, grid) = rendered(&[1, 1, 0], &[2, 0, 2]);
        // net 1 above net 2: tracks 0 and 1, five rows, no crossings
        assert_eq!(db.columns, 3);
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[0], row(&["1", "1", ""]));
        assert_eq!(grid[1], row(&["1", "1", ""]));
        assert_eq!(grid[2], row(&["", "", ""]));
        assert_eq!(grid[3], row(&["2", "2", "2"]));
        assert_eq!(grid[4], row(&["2", "", "2"]));
    }
}
