use crate::db::indices::*;
use crate::error::RouteError;
use crate::geom::span::Span;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Bottom,
}

/// One endpoint of a segment, pinned to a row and column. `is_breakpoint`
/// marks endpoints manufactured by dogleg insertion rather than real
/// contacts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Terminal {
    pub side: Side,
    pub column: u32,
    pub is_breakpoint: bool,
}

impl Terminal {
    pub fn contact(side: Side, column: u32) -> Self {
        Self {
            side,
            column,
            is_breakpoint: false,
        }
    }

    pub fn breakpoint(side: Side, column: u32) -> Self {
        Self {
            side,
            column,
            is_breakpoint: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SegmentData {
    pub net: NetId,
    pub left: Terminal,
    pub right: Terminal,
}

impl SegmentData {
    pub fn span(&self) -> Span {
        Span::new(self.left.column, self.right.column)
    }
}

#[derive(Clone, Debug)]
pub struct NetData {
    pub label: u32,
    pub segments: Vec<SegmentId>,
}

/// Unoccupied contact position, available for dogleg insertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FreeSlot {
    pub side: Side,
    pub column: u32,
}

/// Two-row contact table: `top[j]` / `bottom[j]` hold the net label at
/// column j, zero meaning the position is unoccupied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PairTable {
    pub top: Vec<u32>,
    pub bottom: Vec<u32>,
}

impl PairTable {
    pub fn columns(&self) -> usize {
        self.top.len()
    }
}

// Per-net scan progress while columns are consumed left to right. A net
// whose newest segment still waits for its right endpoint is Open; Closed
// remembers the endpoint the next occurrence will chain from.
#[derive(Clone, Copy)]
enum ScanState {
    Open(Terminal),
    Closed(Terminal),
}

#[derive(Debug)]
pub struct ChannelDB {
    pub nets: Vec<NetData>,
    pub segments: Vec<SegmentData>,
    pub free_slots: Vec<FreeSlot>,
    pub columns: usize,

    pub net_label_map: HashMap<u32, NetId>,
}

impl ChannelDB {
    /// Builds the net/segment/free-slot model from a contact table.
    ///
    /// Columns are scanned left to right, the top row before the bottom row
    /// within a column. Consecutive occurrences of one net chain into
    /// successive segments; the chained segment's left endpoint is a copy of
    /// the previous segment's right endpoint.
    pub fn from_table(table: &PairTable) -> Result<Self, RouteError> {
        if table.top.len() != table.bottom.len() {
            return Err(RouteError::MalformedTopology(format!(
                "row lengths differ: top {} vs bottom {}",
                table.top.len(),
                table.bottom.len()
            )));
        }

        let mut db = Self {
            nets: Vec::new(),
            segments: Vec::new(),
            free_slots: Vec::new(),
            columns: table.columns(),
            net_label_map: HashMap::new(),
        };
        let mut states: Vec<ScanState> = Vec::new();

        for j in 0..table.columns() {
            for (side, label) in [(Side::Top, table.top[j]), (Side::Bottom, table.bottom[j])] {
                if label == 0 {
                    db.free_slots.push(FreeSlot {
                        side,
                        column: j as u32,
                    });
                    continue;
                }

                let term = Terminal::contact(side, j as u32);
                match db.net_label_map.get(&label).copied() {
                    None => {
                        let id = NetId::new(db.nets.len());
                        db.nets.push(NetData {
                            label,
                            segments: Vec::new(),
                        });
                        db.net_label_map.insert(label, id);
                        states.push(ScanState::Open(term));
                    }
                    Some(net) => match states[net.index()] {
                        ScanState::Open(left) => {
                            db.push_segment(net, left, term);
                            states[net.index()] = ScanState::Closed(term);
                        }
                        ScanState::Closed(prev_right) => {
                            db.push_segment(net, prev_right, term);
                            states[net.index()] = ScanState::Closed(term);
                        }
                    },
                }
            }
        }

        for (net, state) in db.nets.iter().zip(&states) {
            if let ScanState::Open(_) = state {
                return Err(RouteError::MalformedTopology(format!(
                    "net {} has a single contact and cannot be routed",
                    net.label
                )));
            }
        }

        log::info!(
            "Channel model: {} columns, {} nets, {} segments, {} free contacts",
            db.columns,
            db.nets.len(),
            db.segments.len(),
            db.free_slots.len()
        );
        Ok(db)
    }

    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    pub fn segment(&self, id: SegmentId) -> &SegmentData {
        &self.segments[id.index()]
    }

    pub fn net_label(&self, id: SegmentId) -> u32 {
        self.nets[self.segments[id.index()].net.index()].label
    }

    fn push_segment(&mut self, net: NetId, left: Terminal, right: Terminal) -> SegmentId {
        debug_assert!(left.column <= right.column);
        let id = SegmentId::new(self.segments.len());
        self.segments.push(SegmentData { net, left, right });
        self.nets[net.index()].segments.push(id);
        id
    }

    /// Dogleg split: consumes the free slot at `slot_index`, truncates
    /// `seg` at the slot column, and appends the tail as a new segment of
    /// the same net. Both new endpoints carry the breakpoint mark.
    pub fn split_segment(&mut self, seg: SegmentId, slot_index: usize) -> SegmentId {
        let slot = self.free_slots.remove(slot_index);
        let jog = Terminal::breakpoint(slot.side, slot.column);

        let old_right = self.segments[seg.index()].right;
        let net = self.segments[seg.index()].net;
        self.segments[seg.index()].right = jog;

        self.push_segment(net, jog, old_right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(top: &[u32], bottom: &[u32]) -> PairTable {
        PairTable {
            top: top.to_vec(),
            bottom: bottom.to_vec(),
        }
    }

    #[test]
    fn pair_of_contacts_forms_one_segment() {
        let db = ChannelDB::from_table(&table(&[2, 0, 0], &[0, 0, 2])).unwrap();
        assert_eq!(db.nets.len(), 1);
        assert_eq!(db.segments.len(), 1);
        let seg = &db.segments[0];
        assert_eq!(seg.left, Terminal::contact(Side::Top, 0));
        assert_eq!(seg.right, Terminal::contact(Side::Bottom, 2));
        // four zero cells left over
        assert_eq!(db.free_slots.len(), 4);
    }

    #[test]
    fn repeated_occurrences_chain_into_segments() {
        // net 1: top 0, bottom 1, top 3 -> two chained segments
        let db = ChannelDB::from_table(&table(&[1, 0, 0, 1], &[0, 1, 0, 0])).unwrap();
        assert_eq!(db.segments.len(), 2);
        let first = db.segments[0].clone();
        let second = db.segments[1].clone();
        assert_eq!(first.span(), Span::new(0, 1));
        assert_eq!(second.span(), Span::new(1, 3));
        // chained left endpoint is a copy of the previous right endpoint
        assert_eq!(second.left, first.right);
        assert_eq!(
            db.nets[0].segments,
            vec![SegmentId::new(0), SegmentId::new(1)]
        );
    }

    #[test]
    fn top_processed_before_bottom_within_a_column() {
        // net 1 closes on top of column 1 and chains on its bottom
        let db = ChannelDB::from_table(&table(&[1, 1, 0], &[0, 1, 0])).unwrap();
        assert_eq!(db.segments.len(), 2);
        assert_eq!(db.segments[0].right, Terminal::contact(Side::Top, 1));
        assert_eq!(db.segments[1].left, Terminal::contact(Side::Top, 1));
        assert_eq!(db.segments[1].right, Terminal::contact(Side::Bottom, 1));
    }

    #[test]
    fn free_slots_recorded_in_scan_order() {
        let db = ChannelDB::from_table(&table(&[1, 0], &[0, 1])).unwrap();
        assert_eq!(
            db.free_slots,
            vec![
                FreeSlot {
                    side: Side::Bottom,
                    column: 0
                },
                FreeSlot {
                    side: Side::Top,
                    column: 1
                },
            ]
        );
    }

    #[test]
    fn single_occurrence_net_is_rejected() {
        let err = ChannelDB::from_table(&table(&[1, 0], &[0, 0])).unwrap_err();
        assert!(matches!(err, RouteError::MalformedTopology(_)));
    }

    #[test]
    fn mismatched_rows_are_rejected() {
        let err = ChannelDB::from_table(&table(&[1, 1], &[0])).unwrap_err();
        assert!(matches!(err, RouteError::MalformedTopology(_)));
    }

    #[test]
    fn split_consumes_slot_and_appends_tail() {
        let mut db = ChannelDB::from_table(&table(&[1, 0, 1], &[0, 0, 0])).unwrap();
        assert_eq!(db.segments.len(), 1);
        let slots_before = db.free_slots.len();

        let slot_index = db
            .free_slots
            .iter()
            .position(|s| s.side == Side::Top && s.column == 1)
            .unwrap();
        let tail = db.split_segment(SegmentId::new(0), slot_index);

        assert_eq!(db.free_slots.len(), slots_before - 1);
        assert_eq!(db.segments[0].right, Terminal::breakpoint(Side::Top, 1));
        assert_eq!(db.segment(tail).left, Terminal::breakpoint(Side::Top, 1));
        assert_eq!(db.segment(tail).right, Terminal::contact(Side::Top, 2));
        assert_eq!(db.nets[0].segments.len(), 2);
    }
}
