//! Battle resolution.
//!
//! Runs phases of simultaneous (or, opt-in, staggered) combat between two
//! troups until one side is annihilated or the phase limit is reached.

pub mod battle;
pub mod phase;

pub use battle::{
    resolve_battle, resolve_battle_default, resolve_battle_with, solve, with_process_rng,
    BattleOutcome, BattleResolver, ResolveError,
};
pub use phase::{compute_salvo, phase_factor, run_phase, strike_order, StrikeGroup};
