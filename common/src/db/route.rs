use crate::db::core::ChannelDB;
use crate::db::indices::SegmentId;

/// Symbolic channel drawing: `2 * tracks + 1` rows by channel-column cells.
/// A cell is empty, a net label, or the crossing marker.
pub type Grid = Vec<Vec<String>>;

/// Marker for a cell where a vertical run crosses a different net.
pub const CROSSING: &str = "+";

/// Total track assignment produced by the scheduler, after renumbering into
/// a single non-negative sequence ordered top to bottom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackAssignment {
    /// Final track per segment, indexed by `SegmentId`.
    pub by_segment: Vec<u32>,
    /// Segments of each final track, in net iteration order.
    pub tracks: Vec<Vec<SegmentId>>,
}

impl TrackAssignment {
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn track_of(&self, seg: SegmentId) -> u32 {
        self.by_segment[seg.index()]
    }
}

/// One horizontal run as exposed to callers: which net, which columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackSpan {
    pub net: u32,
    pub left: u32,
    pub right: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Routing {
    pub assignment: TrackAssignment,
    pub grid: Grid,
}

impl Routing {
    pub fn track_count(&self) -> usize {
        self.assignment.track_count()
    }
}

/// Per final track, the ordered spans riding it.
pub fn track_spans(db: &ChannelDB, assignment: &TrackAssignment) -> Vec<Vec<TrackSpan>> {
    assignment
        .tracks
        .iter()
        .map(|segs| {
            segs.iter()
                .map(|&sid| {
                    let seg = db.segment(sid);
                    TrackSpan {
                        net: db.net_label(sid),
                        left: seg.left.column,
                        right: seg.right.column,
                    }
                })
                .collect()
        })
        .collect()
}
