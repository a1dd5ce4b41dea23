//! Battle notation.
//!
//! Fixed-width text encodings for troups and battle states, and the
//! line-oriented battle log built from them.

pub mod log;
pub mod notation;

pub use log::{BattleLog, LogError, PhaseEntry, Salvo};
pub use notation::{
    decode_battle_state, decode_troup, encode_battle_state, encode_troup, NotationError,
    BATTLE_STATE_NOTATION_LEN, FIELD_WIDTH, MAX_COUNT, TROUP_NOTATION_LEN,
};
