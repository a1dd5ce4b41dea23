//! Troup and battle-state notation.
//!
//! Both formats are fixed-width ASCII:
//!
//! Troup: `0000995/0000020/0000600/0000400/0000030/0000000/0000060/0000020`
//! (eight 7-digit zero-padded counts, P1 first).
//!
//! Battle state: `<attacker troup> <defender troup> <finished> <attacker_won>`
//! where both flags are a single `0` or `1`.

use std::fmt::Write;

use crate::army::{BattleState, Troup, PIECE_TYPE_COUNT};

/// Width of one count field.
pub const FIELD_WIDTH: usize = 7;

/// Largest count that fits in a field.
pub const MAX_COUNT: u32 = 9_999_999;

/// Length of an encoded troup: 8 fields plus 7 separators.
pub const TROUP_NOTATION_LEN: usize = PIECE_TYPE_COUNT * FIELD_WIDTH + PIECE_TYPE_COUNT - 1;

/// Length of an encoded battle state: two troups, two flags, three spaces.
pub const BATTLE_STATE_NOTATION_LEN: usize = 2 * TROUP_NOTATION_LEN + 2 + 3;

/// Errors that can occur while encoding or decoding notation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("malformed troup notation '{notation}': {reason}")]
    MalformedTroupNotation { notation: String, reason: String },

    #[error("malformed battle state notation '{notation}': {reason}")]
    MalformedBattleStateNotation { notation: String, reason: String },

    #[error("count {value} at field {index} does not fit in 7 digits")]
    ValueOutOfRange { index: usize, value: u32 },
}

fn malformed_troup(notation: &str, reason: impl Into<String>) -> NotationError {
    NotationError::MalformedTroupNotation {
        notation: notation.to_string(),
        reason: reason.into(),
    }
}

fn malformed_state(notation: &str, reason: impl Into<String>) -> NotationError {
    NotationError::MalformedBattleStateNotation {
        notation: notation.to_string(),
        reason: reason.into(),
    }
}

/// Parses one fixed-width count field.
fn parse_field(notation: &str, field: &str, idx: usize) -> Result<u32, NotationError> {
    if field.len() != FIELD_WIDTH {
        return Err(malformed_troup(
            notation,
            format!(
                "field {} has {} characters, expected {}",
                idx + 1,
                field.len(),
                FIELD_WIDTH
            ),
        ));
    }
    if !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed_troup(
            notation,
            format!("field {} is not decimal: '{}'", idx + 1, field),
        ));
    }
    field
        .parse()
        .map_err(|_| malformed_troup(notation, format!("field {} is not decimal: '{}'", idx + 1, field)))
}

/// Decodes a troup notation string.
///
/// Leading or trailing whitespace is a format error, not something to trim.
pub fn decode_troup(notation: &str) -> Result<Troup, NotationError> {
    let fields: Vec<&str> = notation.split('/').collect();
    if fields.len() != PIECE_TYPE_COUNT {
        return Err(malformed_troup(
            notation,
            format!("expected {} fields separated by '/', got {}", PIECE_TYPE_COUNT, fields.len()),
        ));
    }

    let mut troup = Troup::empty();
    for (idx, field) in fields.iter().enumerate() {
        troup.counts[idx] = parse_field(notation, field, idx)?;
    }
    Ok(troup)
}

/// Encodes a troup as eight 7-digit fields joined by '/'.
pub fn encode_troup(troup: &Troup) -> Result<String, NotationError> {
    let mut out = String::with_capacity(TROUP_NOTATION_LEN);
    for (idx, &count) in troup.counts.iter().enumerate() {
        if count > MAX_COUNT {
            return Err(NotationError::ValueOutOfRange { index: idx, value: count });
        }
        if idx > 0 {
            out.push('/');
        }
        // Writing into a String cannot fail.
        let _ = write!(out, "{:0width$}", count, width = FIELD_WIDTH);
    }
    Ok(out)
}

fn parse_flag(notation: &str, flag: &str, name: &str) -> Result<bool, NotationError> {
    match flag {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(malformed_state(
            notation,
            format!("{} flag must be '0' or '1', got '{}'", name, other),
        )),
    }
}

/// Decodes a battle state notation string.
pub fn decode_battle_state(notation: &str) -> Result<BattleState, NotationError> {
    let groups: Vec<&str> = notation.split(' ').collect();
    if groups.len() != 4 {
        return Err(malformed_state(
            notation,
            format!("expected 4 space-separated groups, got {}", groups.len()),
        ));
    }

    let attacker = decode_troup(groups[0])?;
    let defender = decode_troup(groups[1])?;
    let finished = parse_flag(notation, groups[2], "finished")?;
    let attacker_won = parse_flag(notation, groups[3], "attacker_won")?;

    if attacker_won && !finished {
        return Err(malformed_state(
            notation,
            "attacker_won is set on an unfinished battle",
        ));
    }

    Ok(BattleState {
        attacker,
        defender,
        finished,
        attacker_won,
    })
}

/// Encodes a battle state as `<attacker> <defender> <finished> <attacker_won>`.
pub fn encode_battle_state(state: &BattleState) -> Result<String, NotationError> {
    let mut out = String::with_capacity(BATTLE_STATE_NOTATION_LEN);
    out.push_str(&encode_troup(&state.attacker)?);
    out.push(' ');
    out.push_str(&encode_troup(&state.defender)?);
    out.push(' ');
    out.push(if state.finished { '1' } else { '0' });
    out.push(' ');
    out.push(if state.finished && state.attacker_won { '1' } else { '0' });
    Ok(out)
}
