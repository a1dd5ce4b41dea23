//! Battle state: both troups plus the finished / winner flags.

use super::troup::{Side, Troup};

/// Snapshot of a battle at a point in time.
///
/// `attacker_won` is only meaningful once `finished` is set; constructors
/// keep it false otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BattleState {
    pub attacker: Troup,
    pub defender: Troup,
    pub finished: bool,
    pub attacker_won: bool,
}

impl BattleState {
    /// Creates an unfinished battle between two troups.
    pub const fn new(attacker: Troup, defender: Troup) -> Self {
        BattleState {
            attacker,
            defender,
            finished: false,
            attacker_won: false,
        }
    }

    /// Creates a finished battle with the given winner.
    pub const fn finished(attacker: Troup, defender: Troup, attacker_won: bool) -> Self {
        BattleState {
            attacker,
            defender,
            finished: true,
            attacker_won,
        }
    }

    /// Returns the troup fighting for `side`.
    pub fn troup(&self, side: Side) -> &Troup {
        match side {
            Side::Attacker => &self.attacker,
            Side::Defender => &self.defender,
        }
    }

    /// Returns a mutable reference to the troup fighting for `side`.
    pub fn troup_mut(&mut self, side: Side) -> &mut Troup {
        match side {
            Side::Attacker => &mut self.attacker,
            Side::Defender => &mut self.defender,
        }
    }

    /// True when either side has no units left.
    pub fn has_annihilated_side(&self) -> bool {
        self.attacker.is_annihilated() || self.defender.is_annihilated()
    }

    /// Attacker wins only if the defender is gone and the attacker is not.
    /// Mutual annihilation and survival of both sides go to the defender.
    pub fn attacker_prevails(&self) -> bool {
        self.defender.is_annihilated() && !self.attacker.is_annihilated()
    }

    /// Marks the battle finished, deciding the winner from the current counts.
    pub fn finish(&mut self) {
        self.finished = true;
        self.attacker_won = self.attacker_prevails();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn troup(n: u32) -> Troup {
        Troup::new([n, 0, 0, 0, 0, 0, 0, 0])
    }

    #[test]
    fn new_state_is_unfinished() {
        let s = BattleState::new(troup(1), troup(1));
        assert!(!s.finished);
        assert!(!s.attacker_won);
        assert!(!s.has_annihilated_side());
    }

    #[test]
    fn finish_awards_attacker_only_on_clean_win() {
        let mut s = BattleState::new(troup(3), troup(0));
        s.finish();
        assert!(s.finished && s.attacker_won);

        let mut s = BattleState::new(troup(0), troup(0));
        s.finish();
        assert!(s.finished && !s.attacker_won);

        let mut s = BattleState::new(troup(2), troup(2));
        s.finish();
        assert!(s.finished && !s.attacker_won);
    }

    #[test]
    fn troup_accessors_follow_side() {
        let mut s = BattleState::new(troup(4), troup(9));
        assert_eq!(s.troup(Side::Attacker).total(), 4);
        s.troup_mut(Side::Defender).counts[0] = 1;
        assert_eq!(s.defender.total(), 1);
    }
}
