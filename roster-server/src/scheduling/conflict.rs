//! Conflict Detector
//!
//! Pure interval arithmetic over one staff member's bookings: either two
//! windows intersect with nonzero duration, or they sit closer together
//! than the minimum rest gap. No I/O; callers guarantee start < end.

/// Half-open time window [start, end) in Unix millis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

impl TimeRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Nonzero intersection. Touching boundaries do not overlap:
    /// `[9, 13)` and `[13, 17)` are disjoint.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// How a candidate window collides with an existing booking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// Windows intersect with nonzero duration
    Overlap,
    /// The other booking ends too soon before the candidate starts
    GapBefore,
    /// The other booking starts too soon after the candidate ends
    GapAfter,
}

/// A detected collision, carrying the offending window for messaging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub other: TimeRange,
}

/// Check one candidate window against one existing booking.
///
/// The gap is measured between the closer endpoints, whichever window
/// comes first.
pub fn check_pair(candidate: TimeRange, other: TimeRange, min_gap_millis: i64) -> Option<Conflict> {
    if candidate.overlaps(&other) {
        return Some(Conflict {
            kind: ConflictKind::Overlap,
            other,
        });
    }

    let gap = (candidate.start - other.end)
        .abs()
        .min((other.start - candidate.end).abs());
    if gap < min_gap_millis {
        let kind = if candidate.start >= other.end {
            ConflictKind::GapBefore
        } else {
            ConflictKind::GapAfter
        };
        return Some(Conflict { kind, other });
    }

    None
}

/// First collision of a candidate window against a set of existing
/// bookings, in iteration order.
pub fn find_conflict<I>(candidate: TimeRange, others: I, min_gap_millis: i64) -> Option<Conflict>
where
    I: IntoIterator<Item = TimeRange>,
{
    others
        .into_iter()
        .find_map(|other| check_pair(candidate, other, min_gap_millis))
}
