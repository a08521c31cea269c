use channel_common::db::core::{ChannelDB, Side};
use channel_common::db::indices::SegmentId;

/// Dense adjacency matrix over segment ids. The vertical constraint graph
/// reads it as directed (row = above, column = below); the horizontal
/// constraint graph stores every edge symmetrically.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    n: usize,
    bits: Vec<bool>,
}

impl AdjacencyMatrix {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            bits: vec![false; n * n],
        }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn set(&mut self, from: SegmentId, to: SegmentId) {
        self.bits[from.index() * self.n + to.index()] = true;
    }

    #[inline]
    pub fn get(&self, from: SegmentId, to: SegmentId) -> bool {
        self.bits[from.index() * self.n + to.index()]
    }

    pub fn clear_row(&mut self, from: SegmentId) {
        let base = from.index() * self.n;
        self.bits[base..base + self.n].fill(false);
    }

    pub fn clear_col(&mut self, to: SegmentId) {
        for i in 0..self.n {
            self.bits[i * self.n + to.index()] = false;
        }
    }

    pub fn has_out_edge(&self, v: SegmentId) -> bool {
        let base = v.index() * self.n;
        self.bits[base..base + self.n].iter().any(|&b| b)
    }

    pub fn has_in_edge(&self, v: SegmentId) -> bool {
        (0..self.n).any(|i| self.bits[i * self.n + v.index()])
    }

    pub fn successors(&self, v: SegmentId) -> impl Iterator<Item = SegmentId> + '_ {
        let base = v.index() * self.n;
        self.bits[base..base + self.n]
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b)
            .map(|(i, _)| SegmentId::new(i))
    }

    pub fn edge_count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }
}

/// Builds the vertical constraint graph: edge u -> v means u must lie on a
/// track strictly above v.
///
/// Only Top-side endpoints originate edges: a net dropping from the top at
/// column c must clear every net rising from the bottom at the same column.
/// Bottom-side endpoints of the same segment originate nothing; the
/// asymmetry is deliberate and load-bearing.
pub fn vertical_constraints(db: &ChannelDB) -> AdjacencyMatrix {
    let n = db.num_segments();
    let mut vcg = AdjacencyMatrix::new(n);

    for from in 0..n {
        let seg = &db.segments[from];
        for term in [seg.left, seg.right] {
            if term.side != Side::Top {
                continue;
            }
            for to in 0..n {
                if to == from {
                    continue;
                }
                let other = &db.segments[to];
                let lands_below = (other.left.column == term.column
                    && other.left.side == Side::Bottom)
                    || (other.right.column == term.column && other.right.side == Side::Bottom);
                if lands_below {
                    vcg.set(SegmentId::new(from), SegmentId::new(to));
                }
            }
        }
    }

    log::debug!("VCG: {} segments, {} edges", n, vcg.edge_count());
    vcg
}

/// Builds the horizontal constraint graph: segments of different nets whose
/// column ranges overlap cannot share a track.
pub fn horizontal_constraints(db: &ChannelDB) -> AdjacencyMatrix {
    let n = db.num_segments();
    let mut hcg = AdjacencyMatrix::new(n);

    for i in 0..n {
        for j in (i + 1)..n {
            let a = &db.segments[i];
            let b = &db.segments[j];
            if a.net != b.net && a.span().overlaps(&b.span()) {
                hcg.set(SegmentId::new(i), SegmentId::new(j));
                hcg.set(SegmentId::new(j), SegmentId::new(i));
            }
        }
    }

    log::debug!("HCG: {} segments, {} edges", n, hcg.edge_count() / 2);
    hcg
}

#[cfg(test)]
mod tests {
    use super::*;
    use channel_common::db::core::PairTable;

    fn db(top: &[u32], bottom: &[u32]) -> ChannelDB {
        ChannelDB::from_table(&PairTable {
            top: top.to_vec(),
            bottom: bottom.to_vec(),
        })
        .unwrap()
    }

    fn sid(i: usize) -> SegmentId {
        SegmentId::new(i)
    }

    #[test]
    fn top_terminal_over_bottom_terminal_makes_an_edge() {
        // column 1: net 1 on top, net 2 on bottom
        let db = db(&[1, 1, 0], &[2, 0, 2]);
        let vcg = vertical_constraints(&db);
        assert!(vcg.get(sid(0), sid(1)));
        assert!(!vcg.get(sid(1), sid(0)));
    }

    #[test]
    fn bottom_terminals_originate_no_edges() {
        // net 1 spans columns 0-1 entirely on top; net 2 columns 1-2 on
        // bottom. Column 1 pairs net 1 (top) against net 2 (bottom): one
        // directed edge, nothing back.
        let db = db(&[1, 1, 0], &[0, 2, 2]);
        let vcg = vertical_constraints(&db);
        assert!(vcg.get(sid(0), sid(1)));
        assert_eq!(vcg.edge_count(), 1);
    }

    #[test]
    fn opposed_pairs_make_a_cycle() {
        // col 0: 1 over 2, col 1: 2 over 1
        let db = db(&[1, 2], &[2, 1]);
        let vcg = vertical_constraints(&db);
        assert!(vcg.get(sid(0), sid(1)));
        assert!(vcg.get(sid(1), sid(0)));
    }

    #[test]
    fn disjoint_nets_have_empty_graphs() {
        let db = db(&[1, 2, 3], &[1, 2, 3]);
        let vcg = vertical_constraints(&db);
        let hcg = horizontal_constraints(&db);
        assert_eq!(vcg.edge_count(), 0);
        assert_eq!(hcg.edge_count(), 0);
    }

    #[test]
    fn overlapping_spans_conflict_horizontally() {
        // net 2 spans 0-2, net 3 sits inside at column 1
        let db = db(&[2, 3, 0], &[0, 3, 2]);
        let hcg = horizontal_constraints(&db);
        assert!(hcg.get(sid(0), sid(1)));
        assert!(hcg.get(sid(1), sid(0)));
    }

    #[test]
    fn same_net_segments_never_conflict_horizontally() {
        // net 1 chains across columns 0-1-2; the two segments share column 1
        let db = db(&[1, 1, 1], &[0, 0, 0]);
        let hcg = horizontal_constraints(&db);
        assert_eq!(hcg.edge_count(), 0);
    }

    #[test]
    fn touching_endpoints_count_as_overlap() {
        // net 1 spans 0-1, net 2 spans 1-2: they meet at column 1
        let db = db(&[1, 1, 0], &[0, 2, 2]);
        let hcg = horizontal_constraints(&db);
        assert!(hcg.get(sid(0), sid(1)));
    }

    #[test]
    fn row_and_column_clearing() {
        let db = db(&[1, 2], &[2, 1]);
        let mut vcg = vertical_constraints(&db);
        vcg.clear_row(sid(0));
        assert!(!vcg.has_out_edge(sid(0)));
        assert!(vcg.has_in_edge(sid(0)));
        vcg.clear_col(sid(0));
        assert!(!vcg.has_in_edge(sid(0)));
    }
}
