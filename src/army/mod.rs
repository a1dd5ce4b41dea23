//! Army representation.
//!
//! Contains the fixed archetype table, per-side troups, and the battle
//! state that pairs them.

pub mod archetype;
pub mod state;
pub mod troup;

pub use archetype::{
    archetype_of, InvalidArchetype, PieceArchetype, PieceType, ALL_PIECE_TYPES, ARCHETYPES,
    PIECE_TYPE_COUNT,
};
pub use state::BattleState;
pub use troup::{Side, Troup};
