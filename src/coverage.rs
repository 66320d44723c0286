//! Bases and per-position coverage records.
//!
//! A [`Coverage`] record collects the (base, repeat count) observations at one position of a vertex k-mer or one column of an edge alignment.
//! It can summarize the support for a base or a (base, repeat count) combination as a single printable glyph.

use std::fmt::Display;

//-----------------------------------------------------------------------------

/// A nucleotide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Base {
    A,
    C,
    G,
    T,
}

impl Base {
    /// All bases in index order.
    pub const ALL: [Base; 4] = [Base::A, Base::C, Base::G, Base::T];

    /// Parses an upper or lower case nucleotide.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'A' | 'a' => Some(Base::A),
            'C' | 'c' => Some(Base::C),
            'G' | 'g' => Some(Base::G),
            'T' | 't' => Some(Base::T),
            _ => None,
        }
    }

    pub fn character(&self) -> char {
        match self {
            Base::A => 'A',
            Base::C => 'C',
            Base::G => 'G',
            Base::T => 'T',
        }
    }
}

impl Display for Base {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.character())
    }
}

/// Renders a sequence of bases without separators.
pub fn sequence_string(bases: &[Base]) -> String {
    bases.iter().map(Base::character).collect()
}

//-----------------------------------------------------------------------------

/// A base or a gap in an alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AlignedBase {
    Base(Base),
    Gap,
}

impl AlignedBase {
    /// Number of distinct values, gap included.
    pub const COUNT: usize = 5;

    /// Converts an integer in `0..5` to an aligned base; 4 is the gap.
    pub fn from_integer(value: u8) -> Option<Self> {
        match value {
            0..=3 => Some(AlignedBase::Base(Base::ALL[value as usize])),
            4 => Some(AlignedBase::Gap),
            _ => None,
        }
    }

    pub fn to_integer(&self) -> u8 {
        match self {
            AlignedBase::Base(base) => *base as u8,
            AlignedBase::Gap => 4,
        }
    }

    /// Parses a nucleotide or `-`.
    pub fn from_char(c: char) -> Option<Self> {
        if c == '-' {
            Some(AlignedBase::Gap)
        } else {
            Base::from_char(c).map(AlignedBase::Base)
        }
    }

    pub fn character(&self) -> char {
        match self {
            AlignedBase::Base(base) => base.character(),
            AlignedBase::Gap => '-',
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, AlignedBase::Gap)
    }

    /// All values in index order, gap last.
    pub fn all() -> impl Iterator<Item = AlignedBase> {
        (0..Self::COUNT as u8).filter_map(AlignedBase::from_integer)
    }
}

impl From<Base> for AlignedBase {
    fn from(base: Base) -> Self {
        AlignedBase::Base(base)
    }
}

impl Display for AlignedBase {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.character())
    }
}

//-----------------------------------------------------------------------------

/// Maps an observation count to a single printable character.
///
/// Counts 0 to 9 are digits, 10 to 35 are upper case letters, and anything larger is `*`.
pub fn coverage_glyph(count: usize) -> char {
    match count {
        0..=9 => char::from(b'0' + count as u8),
        10..=35 => char::from(b'A' + (count - 10) as u8),
        _ => '*',
    }
}

/// Observed (base, repeat count) evidence at one sequence position.
///
/// Gaps are always recorded with repeat count 0.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Coverage {
    // Indexed by aligned base, then by repeat count.
    counts: [Vec<usize>; AlignedBase::COUNT],
}

impl Coverage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one observation.
    pub fn add_read(&mut self, base: AlignedBase, repeat_count: usize) {
        let repeat_count = if base.is_gap() { 0 } else { repeat_count };
        let counts = &mut self.counts[base.to_integer() as usize];
        if counts.len() <= repeat_count {
            counts.resize(repeat_count + 1, 0);
        }
        counts[repeat_count] += 1;
    }

    /// Returns the total number of observations.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|c| c.iter().sum::<usize>()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Returns the number of observations of the given base with any repeat count.
    pub fn coverage(&self, base: AlignedBase) -> usize {
        self.counts[base.to_integer() as usize].iter().sum()
    }

    /// Returns the number of observations of the given base with the given repeat count.
    pub fn coverage_for(&self, base: AlignedBase, repeat_count: usize) -> usize {
        self.counts[base.to_integer() as usize].get(repeat_count).copied().unwrap_or(0)
    }

    /// Returns (repeat count, observations) pairs with nonzero support for the base, in increasing repeat count order.
    pub fn repeat_count_support(
        &self,
        base: AlignedBase,
    ) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.counts[base.to_integer() as usize].iter().copied()
            .enumerate()
            .filter(|(_, count)| *count > 0)
    }

    pub fn coverage_character(&self, base: AlignedBase) -> char {
        coverage_glyph(self.coverage(base))
    }

    pub fn coverage_character_for(&self, base: AlignedBase, repeat_count: usize) -> char {
        coverage_glyph(self.coverage_for(base, repeat_count))
    }
}

//-----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_conversions() {
        for base in Base::ALL {
            assert_eq!(Base::from_char(base.character()), Some(base));
            let aligned = AlignedBase::from(base);
            assert_eq!(AlignedBase::from_integer(aligned.to_integer()), Some(aligned));
        }
        assert_eq!(Base::from_char('g'), Some(Base::G));
        assert_eq!(Base::from_char('N'), None);
        assert_eq!(AlignedBase::from_char('-'), Some(AlignedBase::Gap));
        assert_eq!(AlignedBase::from_integer(5), None);
        let all: String = AlignedBase::all().map(|b| b.character()).collect();
        assert_eq!(all, "ACGT-");
        assert_eq!(sequence_string(&[Base::G, Base::A, Base::T]), "GAT");
    }

    #[test]
    fn glyphs() {
        assert_eq!(coverage_glyph(0), '0');
        assert_eq!(coverage_glyph(9), '9');
        assert_eq!(coverage_glyph(10), 'A');
        assert_eq!(coverage_glyph(35), 'Z');
        assert_eq!(coverage_glyph(36), '*');
    }

    #[test]
    fn coverage_counts() {
        let mut coverage = Coverage::new();
        assert!(coverage.is_empty());
        let c = AlignedBase::Base(Base::C);
        coverage.add_read(c, 2);
        coverage.add_read(c, 2);
        coverage.add_read(c, 3);
        coverage.add_read(AlignedBase::Gap, 7);
        assert_eq!(coverage.total(), 4);
        assert_eq!(coverage.coverage(c), 3);
        assert_eq!(coverage.coverage_for(c, 2), 2);
        assert_eq!(coverage.coverage_for(c, 9), 0);
        assert_eq!(coverage.coverage_for(AlignedBase::Gap, 0), 1);
        assert_eq!(coverage.coverage(AlignedBase::Base(Base::A)), 0);
        let support: Vec<(usize, usize)> = coverage.repeat_count_support(c).collect();
        assert_eq!(support, vec![(2, 2), (3, 1)]);
        assert_eq!(coverage.coverage_character(c), '3');
        assert_eq!(coverage.coverage_character_for(c, 3), '1');
    }
}
