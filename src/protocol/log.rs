//! Battle log notation.
//!
//! A log is a newline-separated list of battle-state lines, one per phase,
//! with no trailing newline. When salvo detail is recorded, each state line
//! is followed by one line holding the salvos of the phase that produced it,
//! and the finished state is re-appended after the last salvo line:
//!
//! ```text
//! 0000010/0000000/0000000/0000000/0000000/0000000/0000000/0000000 0000000/0000000/0000000/0000000/0000000/0000000/0000000/0000000 0 0
//! A5/D1/2/1 D1/A5/0/1
//! 0000010/0000000/0000000/0000000/0000000/0000000/0000000/0000000 0000000/0000000/0000000/0000000/0000000/0000000/0000000/0000000 1 1
//! ```
//!
//! Without salvo detail the last state line is finished in place.
//!
//! Salvo format: `<side><archetype>/<side><archetype>/<kills>/<wounds>`
//! where side is `A` or `D` and archetype is the digit `1`..`8`.

use crate::army::{BattleState, PieceType, Side};

use super::notation::{decode_battle_state, encode_battle_state, NotationError};

/// Errors from parsing a full battle log.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogError {
    #[error("malformed salvo '{0}'")]
    MalformedSalvo(String),

    #[error("line {line}: {source}")]
    BadState {
        line: usize,
        #[source]
        source: NotationError,
    },

    #[error("line {line}: salvo line does not follow an unfinished battle state")]
    MisplacedSalvos { line: usize },

    #[error("line {line}: only the last battle state may be finished")]
    FinishedTooEarly { line: usize },

    #[error("last battle state is not finished")]
    Unfinished,

    #[error("log is empty")]
    Empty,
}

/// One archetype-versus-archetype exchange within a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Salvo {
    pub striker_side: Side,
    pub striker: PieceType,
    pub target_side: Side,
    pub target: PieceType,
    pub kills: u64,
    pub wounds: u64,
}

impl Salvo {
    /// Renders the salvo as `A5/D1/2/1`.
    pub fn to_notation(&self) -> String {
        format!(
            "{}{}/{}{}/{}/{}",
            self.striker_side.notation_char(),
            self.striker.digit(),
            self.target_side.notation_char(),
            self.target.digit(),
            self.kills,
            self.wounds
        )
    }

    /// Parses a single salvo token.
    pub fn parse(s: &str) -> Result<Salvo, LogError> {
        let bad = || LogError::MalformedSalvo(s.to_string());
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 4 {
            return Err(bad());
        }

        let (striker_side, striker) = parse_side_piece(parts[0]).ok_or_else(bad)?;
        let (target_side, target) = parse_side_piece(parts[1]).ok_or_else(bad)?;
        if !is_plain_decimal(parts[2]) || !is_plain_decimal(parts[3]) {
            return Err(bad());
        }
        let kills = parts[2].parse().map_err(|_| bad())?;
        let wounds = parts[3].parse().map_err(|_| bad())?;

        Ok(Salvo {
            striker_side,
            striker,
            target_side,
            target,
            kills,
            wounds,
        })
    }
}

fn is_plain_decimal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parses "A5" into (Attacker, P5).
fn parse_side_piece(s: &str) -> Option<(Side, PieceType)> {
    let mut chars = s.chars();
    let side = Side::from_notation_char(chars.next()?)?;
    let piece = PieceType::from_digit(chars.next()?)?;
    if chars.next().is_some() {
        return None;
    }
    Some((side, piece))
}

/// The state reached after one phase, with the salvos that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseEntry {
    pub salvos: Vec<Salvo>,
    pub state: BattleState,
}

/// Ordered record of every phase of a battle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BattleLog {
    pub entries: Vec<PhaseEntry>,
}

impl BattleLog {
    pub fn new() -> Self {
        BattleLog::default()
    }

    /// Appends the state reached after a phase.
    pub fn push(&mut self, state: BattleState, salvos: Vec<Salvo>) {
        self.entries.push(PhaseEntry { salvos, state });
    }

    /// Number of phases recorded.
    pub fn phases(&self) -> usize {
        self.entries.len()
    }

    /// The most recent battle state, if any phase has run.
    pub fn last_state(&self) -> Option<&BattleState> {
        self.entries.last().map(|e| &e.state)
    }

    /// Marks the last recorded state finished, deciding the winner from its counts.
    pub fn finish(&mut self) {
        if let Some(entry) = self.entries.last_mut() {
            entry.state.finish();
        }
    }

    /// Renders the log: each state line followed by its salvo line, if any.
    ///
    /// A finished last phase that carries salvos is rendered unfinished and
    /// re-appended finished after its salvos, so the last line is always the
    /// final result.
    pub fn to_notation(&self) -> Result<String, NotationError> {
        let mut lines: Vec<String> = Vec::with_capacity(self.entries.len() * 2 + 1);
        let last = self.entries.len().saturating_sub(1);
        for (i, entry) in self.entries.iter().enumerate() {
            let reappend = i == last && entry.state.finished && !entry.salvos.is_empty();
            if reappend {
                let open = BattleState::new(entry.state.attacker, entry.state.defender);
                lines.push(encode_battle_state(&open)?);
            } else {
                lines.push(encode_battle_state(&entry.state)?);
            }
            if !entry.salvos.is_empty() {
                let salvos: Vec<String> = entry.salvos.iter().map(Salvo::to_notation).collect();
                lines.push(salvos.join(" "));
            }
            if reappend {
                lines.push(encode_battle_state(&entry.state)?);
            }
        }
        Ok(lines.join("\n"))
    }

    /// Parses a log back into phase entries and checks the flag invariant:
    /// every state but the last is unfinished, the last is finished.
    ///
    /// A salvo line belongs to the state line before it. A finished state
    /// line that directly follows a salvo line and repeats the previous
    /// counts is the re-appended final result, not a new phase.
    pub fn parse(s: &str) -> Result<BattleLog, LogError> {
        if s.is_empty() {
            return Err(LogError::Empty);
        }

        let mut log = BattleLog::new();
        let mut after_salvos = false;
        let mut last_state_line = 0;

        for (i, line) in s.split('\n').enumerate() {
            let line_no = i + 1;
            if is_salvo_line(line) {
                let entry = match log.entries.last_mut() {
                    Some(entry) if !after_salvos && !entry.state.finished => entry,
                    _ => return Err(LogError::MisplacedSalvos { line: line_no }),
                };
                entry.salvos = line
                    .split(' ')
                    .map(Salvo::parse)
                    .collect::<Result<Vec<_>, _>>()?;
                after_salvos = true;
                continue;
            }

            let state = decode_battle_state(line).map_err(|source| LogError::BadState {
                line: line_no,
                source,
            })?;
            if let Some(prev) = log.entries.last_mut() {
                if prev.state.finished {
                    return Err(LogError::FinishedTooEarly { line: last_state_line });
                }
                let repeats = prev.state.attacker == state.attacker
                    && prev.state.defender == state.defender;
                if after_salvos && state.finished && repeats {
                    prev.state = state;
                    after_salvos = false;
                    last_state_line = line_no;
                    continue;
                }
            }
            log.push(state, Vec::new());
            after_salvos = false;
            last_state_line = line_no;
        }

        match log.last_state() {
            Some(state) if state.finished => Ok(log),
            Some(_) => Err(LogError::Unfinished),
            None => Err(LogError::Empty),
        }
    }
}

/// Salvo lines start with a side letter; state lines start with a digit.
fn is_salvo_line(line: &str) -> bool {
    matches!(line.as_bytes().first(), Some(b'A') | Some(b'D'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::army::Troup;

    fn one(pt: PieceType, n: u32) -> Troup {
        let mut t = Troup::empty();
        t.set_count(pt, n);
        t
    }

    fn salvo(kills: u64) -> Salvo {
        Salvo {
            striker_side: Side::Attacker,
            striker: PieceType::P5,
            target_side: Side::Defender,
            target: PieceType::P1,
            kills,
            wounds: 1,
        }
    }

    #[test]
    fn salvo_notation_roundtrip() {
        let s = salvo(2);
        assert_eq!(s.to_notation(), "A5/D1/2/1");
        assert_eq!(Salvo::parse("A5/D1/2/1").unwrap(), s);
    }

    #[test]
    fn salvo_parse_rejects_garbage() {
        for bad in ["", "A5/D1/2", "X5/D1/2/1", "A9/D1/2/1", "A5/D1/-2/1", "A55/D1/2/1", "A5/D1//1"] {
            assert!(Salvo::parse(bad).is_err(), "accepted '{}'", bad);
        }
    }

    #[test]
    fn finished_log_renders_without_trailing_newline() {
        let mut log = BattleLog::new();
        log.push(
            BattleState::new(one(PieceType::P5, 3), one(PieceType::P1, 2)),
            vec![salvo(1)],
        );
        log.push(
            BattleState::new(one(PieceType::P5, 3), Troup::empty()),
            vec![salvo(2)],
        );
        log.finish();

        let text = log.to_notation().unwrap();
        assert!(!text.ends_with('\n'));
        let lines: Vec<&str> = text.split('\n').collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].ends_with(" 0 0"));
        assert_eq!(lines[1], "A5/D1/1/1");
        assert!(lines[2].ends_with(" 0 0"));
        assert_eq!(lines[3], "A5/D1/2/1");
        assert!(lines[4].ends_with(" 1 1"));
        assert_eq!(&lines[2][..lines[2].len() - 4], &lines[4][..lines[4].len() - 4]);

        let parsed = BattleLog::parse(&text).unwrap();
        assert_eq!(parsed, log);
    }

    #[test]
    fn log_without_salvos_finishes_last_line_in_place() {
        let mut log = BattleLog::new();
        log.push(BattleState::new(one(PieceType::P1, 1), one(PieceType::P1, 1)), vec![]);
        log.push(BattleState::new(one(PieceType::P1, 1), one(PieceType::P1, 1)), vec![]);
        log.finish();

        let text = log.to_notation().unwrap();
        let lines: Vec<&str> = text.split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" 0 0"));
        assert!(lines[1].ends_with(" 1 0"));
        assert_eq!(BattleLog::parse(&text).unwrap(), log);
    }

    #[test]
    fn unchanged_counts_after_salvos_still_parse_as_final_line() {
        // A phase with no kills: the re-appended line repeats the counts.
        let mut log = BattleLog::new();
        log.push(BattleState::new(one(PieceType::P1, 1), one(PieceType::P1, 1)), vec![salvo(0)]);
        log.push(BattleState::new(one(PieceType::P1, 1), one(PieceType::P1, 1)), vec![salvo(0)]);
        log.finish();

        let text = log.to_notation().unwrap();
        assert_eq!(text.split('\n').count(), 5);
        let parsed = BattleLog::parse(&text).unwrap();
        assert_eq!(parsed.phases(), 2);
        assert_eq!(parsed, log);
    }

    #[test]
    fn parse_rejects_unfinished_tail() {
        let mut log = BattleLog::new();
        log.push(BattleState::new(one(PieceType::P1, 1), one(PieceType::P1, 1)), vec![]);
        let text = log.to_notation().unwrap();
        assert_eq!(BattleLog::parse(&text), Err(LogError::Unfinished));
    }

    #[test]
    fn parse_rejects_finished_state_before_the_end() {
        let finished = BattleState::finished(one(PieceType::P1, 1), Troup::empty(), true);
        let line = encode_battle_state(&finished).unwrap();
        let text = format!("{}\n{}", line, line);
        assert_eq!(BattleLog::parse(&text), Err(LogError::FinishedTooEarly { line: 1 }));
    }

    #[test]
    fn parse_rejects_salvos_after_final_state() {
        let finished = BattleState::finished(one(PieceType::P1, 1), Troup::empty(), true);
        let text = format!("{}\nA1/D1/1/0", encode_battle_state(&finished).unwrap());
        assert_eq!(BattleLog::parse(&text), Err(LogError::MisplacedSalvos { line: 2 }));
    }

    #[test]
    fn parse_rejects_leading_or_doubled_salvo_lines() {
        let open = encode_battle_state(&BattleState::new(one(PieceType::P1, 1), one(PieceType::P1, 1)))
            .unwrap();
        let done = encode_battle_state(&BattleState::finished(
            one(PieceType::P1, 1),
            one(PieceType::P1, 1),
            false,
        ))
        .unwrap();

        let leading = format!("A1/D1/0/1\n{}", done);
        assert_eq!(BattleLog::parse(&leading), Err(LogError::MisplacedSalvos { line: 1 }));

        let doubled = format!("{}\nA1/D1/0/1\nD1/A1/0/1\n{}", open, done);
        assert_eq!(BattleLog::parse(&doubled), Err(LogError::MisplacedSalvos { line: 3 }));
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert_eq!(BattleLog::parse(""), Err(LogError::Empty));
    }
}
