//! Consensus calling from coverage records.
//!
//! The renderer only depends on the [`ConsensusCaller`] trait.
//! Two simple callers are provided: [`SimpleConsensusCaller`] uses the most frequent repeat count and [`MedianConsensusCaller`] uses the median.

use crate::coverage::{AlignedBase, Coverage};

use std::collections::BTreeSet;
use std::fmt::Display;

//-----------------------------------------------------------------------------

/// The best estimate for the sequence at one position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Consensus {
    pub base: AlignedBase,
    pub repeat_count: usize,
}

impl Consensus {
    pub fn new(base: AlignedBase, repeat_count: usize) -> Self {
        Consensus { base, repeat_count }
    }
}

/// A statistical model that calls consensus from observed evidence.
pub trait ConsensusCaller: Sync {
    /// Returns the best (base, repeat count) for the coverage record.
    fn call(&self, coverage: &Coverage) -> Consensus;

    /// Returns the repeat counts that have nonzero support for the consensus base at any of the positions.
    fn find_repeat_counts(&self, coverages: &[Coverage]) -> BTreeSet<usize> {
        let mut result = BTreeSet::new();
        for coverage in coverages {
            let consensus = self.call(coverage);
            let support = coverage.repeat_count_support(consensus.base);
            result.extend(support.map(|(repeat_count, _)| repeat_count));
        }
        result
    }
}

// Base with the highest coverage. Ties go to the lower base index, and an empty record gives a gap.
fn best_base(coverage: &Coverage) -> AlignedBase {
    let mut best = AlignedBase::Gap;
    let mut best_coverage = 0;
    for base in AlignedBase::all() {
        let count = coverage.coverage(base);
        if count > best_coverage {
            best = base;
            best_coverage = count;
        }
    }
    best
}

//-----------------------------------------------------------------------------

/// Calls the most frequent base and then its most frequent repeat count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimpleConsensusCaller;

impl ConsensusCaller for SimpleConsensusCaller {
    fn call(&self, coverage: &Coverage) -> Consensus {
        let base = best_base(coverage);
        let mut repeat_count = 0;
        let mut best_count = 0;
        for (count, observations) in coverage.repeat_count_support(base) {
            if observations > best_count {
                repeat_count = count;
                best_count = observations;
            }
        }
        Consensus::new(base, repeat_count)
    }
}

/// Calls the most frequent base and then the lower median of its repeat counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MedianConsensusCaller;

impl ConsensusCaller for MedianConsensusCaller {
    fn call(&self, coverage: &Coverage) -> Consensus {
        let base = best_base(coverage);
        let total = coverage.coverage(base);
        if total == 0 {
            return Consensus::new(base, 0);
        }
        let target = (total - 1) / 2;
        let mut seen = 0;
        for (repeat_count, observations) in coverage.repeat_count_support(base) {
            seen += observations;
            if seen > target {
                return Consensus::new(base, repeat_count);
            }
        }
        Consensus::new(base, 0)
    }
}

//-----------------------------------------------------------------------------

/// Consensus callers selectable by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CallerKind {
    Simple,
    Median,
}

impl CallerKind {
    /// Returns a caller of this kind.
    pub fn caller(&self) -> Box<dyn ConsensusCaller> {
        match self {
            CallerKind::Simple => Box::new(SimpleConsensusCaller),
            CallerKind::Median => Box::new(MedianConsensusCaller),
        }
    }
}

impl Display for CallerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CallerKind::Simple => write!(f, "simple"),
            CallerKind::Median => write!(f, "median"),
        }
    }
}

//-----------------------------------------------------------------------------
