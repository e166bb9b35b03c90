use crate::chess::{Bitboard, Square};

/// A piece immobilized on a [`Square`] until the ply it is released.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct Stun {
    pub square: Square,
    pub release: u64,
}

impl Stun {
    /// Whether this stun is still in effect at a given ply.
    pub fn is_active(&self, ply: u64) -> bool {
        self.release > ply
    }
}

/// Keeps track of stunned squares.
#[derive(Debug, Default, Clone, Eq, PartialEq, Hash)]
pub struct StunClock {
    stuns: Vec<Stun>,
}

impl StunClock {
    /// Whether the piece on `square` may not move at `ply`.
    pub fn is_stunned(&self, square: Square, ply: u64) -> bool {
        self.stuns
            .iter()
            .any(|s| s.square == square && s.is_active(ply))
    }

    /// Stuns `square` until the ply `release`.
    pub fn stun(&mut self, square: Square, release: u64) {
        self.stuns.push(Stun { square, release });
    }

    /// Forgets stuns that are no longer in effect at `ply`.
    pub fn prune(&mut self, ply: u64) {
        self.stuns.retain(|s| s.is_active(ply));
    }

    /// The squares stunned at `ply`.
    pub fn squares(&self, ply: u64) -> Bitboard {
        self.stuns
            .iter()
            .filter(|s| s.is_active(ply))
            .map(|s| s.square)
            .collect()
    }

    /// An iterator over the recorded stuns.
    pub fn iter(&self) -> impl Iterator<Item = &Stun> {
        self.stuns.iter()
    }

    pub fn clear(&mut self) {
        self.stuns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[proptest]
    fn stun_is_active_strictly_before_its_release(sq: Square, #[strategy(1u64..)] release: u64) {
        let mut clock = StunClock::default();
        clock.stun(sq, release);
        assert!(clock.is_stunned(sq, release - 1));
        assert!(!clock.is_stunned(sq, release));
    }

    #[proptest]
    fn stun_only_affects_its_square(
        sq: Square,
        #[filter(#other != #sq)] other: Square,
        release: u64,
        ply: u64,
    ) {
        let mut clock = StunClock::default();
        clock.stun(sq, release);
        assert!(!clock.is_stunned(other, ply));
    }

    #[proptest]
    fn pruning_keeps_active_stuns(stuns: Vec<Stun>, ply: u64) {
        let mut clock = StunClock::default();
        for s in &stuns {
            clock.stun(s.square, s.release);
        }

        let before = clock.squares(ply);
        clock.prune(ply);
        assert_eq!(clock.squares(ply), before);
        assert!(clock.iter().all(|s| s.is_active(ply)));
    }

    #[proptest]
    fn squares_lists_exactly_the_stunned_squares(stuns: Vec<Stun>, ply: u64, sq: Square) {
        let mut clock = StunClock::default();
        for s in &stuns {
            clock.stun(s.square, s.release);
        }

        assert_eq!(clock.squares(ply).contains(sq), clock.is_stunned(sq, ply));
    }

    #[proptest]
    fn clear_releases_everything(sq: Square, release: u64, ply: u64) {
        let mut clock = StunClock::default();
        clock.stun(sq, release);
        clock.clear();
        assert!(!clock.is_stunned(sq, ply));
        assert_eq!(clock.iter().count(), 0);
    }
}
