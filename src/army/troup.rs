//! Troups: per-archetype unit counts for one side of a battle.

use serde::Serialize;

use super::archetype::{PieceType, ALL_PIECE_TYPES, PIECE_TYPE_COUNT};

/// The side a troup fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Attacker,
    Defender,
}

impl Side {
    /// Returns the single-character abbreviation used in salvo notation.
    pub const fn notation_char(self) -> char {
        match self {
            Side::Attacker => 'A',
            Side::Defender => 'D',
        }
    }

    /// Parses a side from its salvo-notation abbreviation.
    pub fn from_notation_char(c: char) -> Option<Side> {
        match c {
            'A' => Some(Side::Attacker),
            'D' => Some(Side::Defender),
            _ => None,
        }
    }

    /// Returns the opposing side.
    pub const fn opponent(self) -> Side {
        match self {
            Side::Attacker => Side::Defender,
            Side::Defender => Side::Attacker,
        }
    }
}

/// Live unit counts, indexed by `PieceType as usize`.
///
/// Fixed-size and `Copy`, so snapshots before a phase are free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Troup {
    pub counts: [u32; PIECE_TYPE_COUNT],
}

impl Troup {
    /// Creates a troup from raw counts.
    pub const fn new(counts: [u32; PIECE_TYPE_COUNT]) -> Self {
        Troup { counts }
    }

    /// Creates a troup with no units.
    pub const fn empty() -> Self {
        Troup {
            counts: [0; PIECE_TYPE_COUNT],
        }
    }

    /// Number of live units of the given archetype.
    pub fn count(&self, piece_type: PieceType) -> u32 {
        self.counts[piece_type.index()]
    }

    /// Sets the number of live units of the given archetype.
    pub fn set_count(&mut self, piece_type: PieceType, count: u32) {
        self.counts[piece_type.index()] = count;
    }

    /// Removes up to `losses` units of the given archetype, never going below zero.
    pub fn remove(&mut self, piece_type: PieceType, losses: u64) {
        let slot = &mut self.counts[piece_type.index()];
        let losses = u32::try_from(losses).unwrap_or(u32::MAX);
        *slot = slot.saturating_sub(losses);
    }

    /// Total number of live units across all archetypes.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// True when every count is zero.
    pub fn is_annihilated(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Iterates archetypes with at least one live unit, in index order.
    pub fn alive(&self) -> impl Iterator<Item = (PieceType, u32)> + '_ {
        ALL_PIECE_TYPES
            .iter()
            .map(move |&pt| (pt, self.count(pt)))
            .filter(|&(_, c)| c > 0)
    }
}
