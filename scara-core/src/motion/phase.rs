//! 4-phase coil sequencing
//!
//! The stepper is driven two coils at a time. The four energization
//! patterns form a ring; the phase index only ever moves to a neighbour,
//! so no step can skip a pattern.

use crate::traits::Direction;

/// Number of coil patterns in one electrical cycle
pub const PHASE_COUNT: u8 = 4;

/// Coil output levels for wires A, B, C, D
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CoilPattern {
    pub a: bool,
    pub b: bool,
    pub c: bool,
    pub d: bool,
}

impl CoilPattern {
    const fn new(a: bool, b: bool, c: bool, d: bool) -> Self {
        Self { a, b, c, d }
    }

    /// Levels in wire order A, B, C, D
    pub const fn levels(&self) -> [bool; 4] {
        [self.a, self.b, self.c, self.d]
    }

    /// Number of energized wires
    pub fn energized_count(&self) -> usize {
        self.levels().iter().filter(|&&on| on).count()
    }
}

/// All coils off
pub const RELEASED: CoilPattern = CoilPattern::new(false, false, false, false);

/// Energization ring: A+C, B+C, B+D, A+D
pub const COIL_SEQUENCE: [CoilPattern; PHASE_COUNT as usize] = [
    CoilPattern::new(true, false, true, false),
    CoilPattern::new(false, true, true, false),
    CoilPattern::new(false, true, false, true),
    CoilPattern::new(true, false, false, true),
];

/// Position in the coil sequence, always in `0..4`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhaseIndex(u8);

impl PhaseIndex {
    /// Create a phase index, wrapping into range
    pub const fn new(index: u8) -> Self {
        Self(index % PHASE_COUNT)
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// Next pattern in the ring (3 wraps to 0)
    pub const fn advance(self) -> Self {
        Self((self.0 + 1) % PHASE_COUNT)
    }

    /// Previous pattern in the ring (0 wraps to 3)
    pub const fn retreat(self) -> Self {
        Self((self.0 + PHASE_COUNT - 1) % PHASE_COUNT)
    }

    /// Move one position in the given direction
    pub const fn step(self, dir: Direction) -> Self {
        match dir {
            Direction::Forward => self.advance(),
            Direction::Reverse => self.retreat(),
        }
    }

    /// Coil levels for this phase
    pub const fn pattern(self) -> CoilPattern {
        COIL_SEQUENCE[self.0 as usize]
    }

    /// Check that `other` is one ring position away
    pub fn is_adjacent(self, other: PhaseIndex) -> bool {
        self.advance() == other || self.retreat() == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_patterns_energize_two_wires() {
        for pattern in COIL_SEQUENCE.iter() {
            assert_eq!(pattern.energized_count(), 2);
        }
        assert_eq!(RELEASED.energized_count(), 0);
    }

    #[test]
    fn test_adjacent_patterns_share_one_coil() {
        for i in 0..PHASE_COUNT {
            let here = PhaseIndex::new(i).pattern().levels();
            let next = PhaseIndex::new(i).advance().pattern().levels();
            let shared = here.iter().zip(next.iter()).filter(|(a, b)| **a && **b).count();
            assert_eq!(shared, 1, "phase {} -> {}", i, i + 1);
        }
    }

    #[test]
    fn test_wraparound() {
        assert_eq!(PhaseIndex::new(3).advance(), PhaseIndex::new(0));
        assert_eq!(PhaseIndex::new(0).retreat(), PhaseIndex::new(3));
        assert_eq!(PhaseIndex::new(7).value(), 3);
    }

    #[test]
    fn test_sequence_order() {
        assert_eq!(PhaseIndex::new(0).pattern().levels(), [true, false, true, false]);
        assert_eq!(PhaseIndex::new(1).pattern().levels(), [false, true, true, false]);
        assert_eq!(PhaseIndex::new(2).pattern().levels(), [false, true, false, true]);
        assert_eq!(PhaseIndex::new(3).pattern().levels(), [true, false, false, true]);
    }

    proptest! {
        #[test]
        fn prop_steps_stay_in_range_and_adjacent(dirs in proptest::collection::vec(any::<bool>(), 0..200)) {
            let mut phase = PhaseIndex::default();
            for forward in dirs {
                let dir = if forward { Direction::Forward } else { Direction::Reverse };
                let next = phase.step(dir);
                prop_assert!(next.value() < PHASE_COUNT);
                prop_assert!(phase.is_adjacent(next));
                phase = next;
            }
        }
    }
}
