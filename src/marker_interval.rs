//! Oriented reads and intervals between two markers on an oriented read.

use std::fmt::Display;

//-----------------------------------------------------------------------------

/// A read paired with a strand.
///
/// Stored as `read_id * 2 + strand`, so the natural order sorts by read first and strand second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrientedReadId(u64);

impl OrientedReadId {
    /// Creates an oriented read from a read id and a strand (0 forward, 1 reverse).
    ///
    /// # Panics
    ///
    /// Panics if `strand > 1`.
    pub fn new(read_id: u32, strand: u8) -> Self {
        assert!(strand <= 1, "Invalid strand {}", strand);
        OrientedReadId(u64::from(read_id) * 2 + u64::from(strand))
    }

    pub fn read_id(&self) -> u32 {
        (self.0 >> 1) as u32
    }

    pub fn strand(&self) -> u8 {
        (self.0 & 1) as u8
    }

    /// Returns the combined value used for ordering.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Display for OrientedReadId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}-{}", self.read_id(), self.strand())
    }
}

//-----------------------------------------------------------------------------

/// The interval between two markers on an oriented read.
///
/// The markers are not necessarily consecutive, but the second one never has a lower ordinal than the first.
/// Intervals are ordered by oriented read, then by the first ordinal, then by the second ordinal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerInterval {
    oriented_read_id: OrientedReadId,
    ordinals: [u32; 2],
}

impl MarkerInterval {
    /// Creates a new interval.
    ///
    /// # Panics
    ///
    /// Panics if `ordinal1 < ordinal0`.
    pub fn new(oriented_read_id: OrientedReadId, ordinal0: u32, ordinal1: u32) -> Self {
        assert!(ordinal1 >= ordinal0, "Marker interval {}..{} is reversed", ordinal0, ordinal1);
        MarkerInterval {
            oriented_read_id,
            ordinals: [ordinal0, ordinal1],
        }
    }

    pub fn oriented_read_id(&self) -> OrientedReadId {
        self.oriented_read_id
    }

    pub fn ordinals(&self) -> [u32; 2] {
        self.ordinals
    }
}

//-----------------------------------------------------------------------------

/// A marker interval with a repeat count for each sequence position it spans.
///
/// The repeat counts are fixed at construction.
/// An empty vector means that repeat counts were not recorded for this interval.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerIntervalWithRepeatCounts {
    interval: MarkerInterval,
    repeat_counts: Vec<u8>,
}

impl MarkerIntervalWithRepeatCounts {
    pub fn new(interval: MarkerInterval, repeat_counts: Vec<u8>) -> Self {
        MarkerIntervalWithRepeatCounts { interval, repeat_counts }
    }

    /// Creates an interval without recorded repeat counts.
    pub fn without_repeat_counts(interval: MarkerInterval) -> Self {
        Self::new(interval, Vec::new())
    }

    pub fn interval(&self) -> &MarkerInterval {
        &self.interval
    }

    pub fn oriented_read_id(&self) -> OrientedReadId {
        self.interval.oriented_read_id()
    }

    pub fn ordinals(&self) -> [u32; 2] {
        self.interval.ordinals()
    }

    pub fn repeat_counts(&self) -> &[u8] {
        &self.repeat_counts
    }

    pub fn has_repeat_counts(&self) -> bool {
        !self.repeat_counts.is_empty()
    }
}

impl From<MarkerInterval> for MarkerIntervalWithRepeatCounts {
    fn from(interval: MarkerInterval) -> Self {
        Self::without_repeat_counts(interval)
    }
}

//-----------------------------------------------------------------------------
