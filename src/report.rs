//! JSON battle reports.
//!
//! One self-contained record per resolved battle, written as JSONL for
//! replay and audit tooling.

use std::io::Write;

use serde::Serialize;

use crate::army::Side;
use crate::protocol::{encode_battle_state, NotationError};
use crate::resolve::BattleOutcome;

/// Errors from building or writing reports.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Notation(#[from] NotationError),

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// A serialisable summary of one resolved battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BattleReport {
    pub battle_id: usize,
    pub initial: String,
    pub initiative: Side,
    pub attacker_won: bool,
    pub phases: usize,
    pub final_state: String,
    /// Log notation split into lines.
    pub log: Vec<String>,
}

impl BattleReport {
    pub fn from_outcome(battle_id: usize, outcome: &BattleOutcome) -> Result<Self, ReportError> {
        let log = outcome.log_notation()?;
        Ok(BattleReport {
            battle_id,
            initial: encode_battle_state(&outcome.initial)?,
            initiative: outcome.initiative,
            attacker_won: outcome.attacker_won,
            phases: outcome.phases(),
            final_state: encode_battle_state(&outcome.final_state())?,
            log: log.split('\n').map(str::to_string).collect(),
        })
    }
}

/// Writes reports as JSONL (one JSON object per line).
pub fn write_jsonl<W: Write>(reports: &[BattleReport], out: &mut W) -> Result<(), ReportError> {
    for report in reports {
        serde_json::to_writer(&mut *out, report)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
