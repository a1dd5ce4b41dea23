//! lnm3 battle library.
//!
//! Exposes the archetype table, troup and battle-state notation, and the
//! phase-by-phase battle resolver, plus batch resolution and JSON reports
//! for callers that run many battles.

pub mod army;
pub mod batch;
pub mod config;
pub mod protocol;
pub mod report;
pub mod resolve;

pub use army::{archetype_of, BattleState, PieceArchetype, PieceType, Side, Troup};
pub use config::{ResolutionMode, ResolverConfig, NUMBER_OF_PHASES_IN_BATTLE};
pub use protocol::{
    decode_battle_state, decode_troup, encode_battle_state, encode_troup, BattleLog,
    NotationError, Salvo,
};
pub use resolve::{
    resolve_battle, resolve_battle_default, resolve_battle_with, BattleOutcome, BattleResolver,
    ResolveError,
};
