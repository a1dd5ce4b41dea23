//! Battle resolution state machine.
//!
//! `NotStarted -> InProgress -> Finished`. Initiative is drawn once by an
//! unbiased coin flip; each phase then runs through [`run_phase`] until one
//! side is annihilated or the phase limit is reached. Validation happens
//! before the first phase, so a failed call never leaves a half-resolved log.

use std::sync::{LazyLock, Mutex};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::army::{BattleState, Side};
use crate::config::{ConfigError, ResolverConfig};
use crate::protocol::{decode_battle_state, encode_battle_state, BattleLog, NotationError};

use super::phase::run_phase;

/// Errors that prevent a battle from being resolved.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Notation(#[from] NotationError),

    #[error("invalid initial state: {0}")]
    InvalidInitialState(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// The result of a fully resolved battle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleOutcome {
    pub initial: BattleState,
    pub initiative: Side,
    pub attacker_won: bool,
    pub log: BattleLog,
}

impl BattleOutcome {
    /// Number of phases fought.
    pub fn phases(&self) -> usize {
        self.log.phases()
    }

    /// The finished state on the last log line.
    pub fn final_state(&self) -> BattleState {
        self.log
            .last_state()
            .copied()
            .unwrap_or(self.initial)
    }

    /// Renders the full log notation.
    pub fn log_notation(&self) -> Result<String, NotationError> {
        self.log.to_notation()
    }
}

/// Rejects states a battle cannot start from.
fn validate_initial(state: &BattleState) -> Result<(), ResolveError> {
    if state.finished {
        return Err(ResolveError::InvalidInitialState(
            "battle is already finished".to_string(),
        ));
    }
    if state.attacker.is_annihilated() {
        return Err(ResolveError::InvalidInitialState(
            "attacker troup has no units".to_string(),
        ));
    }
    if state.defender.is_annihilated() {
        return Err(ResolveError::InvalidInitialState(
            "defender troup has no units".to_string(),
        ));
    }
    // Counts only shrink from here, so a state that encodes now encodes
    // at every later phase.
    encode_battle_state(state)?;
    Ok(())
}

/// Resolves a decoded battle state to completion.
pub fn solve<R: Rng>(
    initial: BattleState,
    config: &ResolverConfig,
    rng: &mut R,
) -> Result<BattleOutcome, ResolveError> {
    config.validate()?;
    validate_initial(&initial)?;

    let initiative = if rng.gen_bool(0.5) {
        Side::Attacker
    } else {
        Side::Defender
    };
    tracing::debug!(?initiative, limit = config.phase_limit, mode = ?config.mode, "battle started");

    let mut state = initial;
    let mut log = BattleLog::new();

    for phase in 1..=config.phase_limit {
        let salvos = run_phase(&mut state, initiative, config.mode, rng);
        tracing::debug!(
            phase,
            salvos = salvos.len(),
            attacker = state.attacker.total(),
            defender = state.defender.total(),
            "phase resolved"
        );
        let salvos = if config.record_salvos { salvos } else { Vec::new() };
        log.push(state, salvos);

        if state.has_annihilated_side() {
            break;
        }
    }

    log.finish();
    let attacker_won = state.attacker_prevails();
    tracing::info!(attacker_won, phases = log.phases(), "battle finished");

    Ok(BattleOutcome {
        initial,
        initiative,
        attacker_won,
        log,
    })
}

/// Resolves a battle from its state notation with the given configuration.
pub fn resolve_battle_with<R: Rng>(
    initial_state: &str,
    config: &ResolverConfig,
    rng: &mut R,
) -> Result<BattleOutcome, ResolveError> {
    let state = decode_battle_state(initial_state)?;
    solve(state, config, rng)
}

/// Resolves a battle from its state notation under the default rules.
///
/// Returns whether the attacker won and the full log notation.
pub fn resolve_battle<R: Rng>(initial_state: &str, rng: &mut R) -> Result<(bool, String), ResolveError> {
    let outcome = resolve_battle_with(initial_state, &ResolverConfig::default(), rng)?;
    let log = outcome.log_notation()?;
    Ok((outcome.attacker_won, log))
}

/// Random source shared by every call that does not bring its own.
/// Seeded from entropy on first use.
static PROCESS_RNG: LazyLock<Mutex<SmallRng>> =
    LazyLock::new(|| Mutex::new(SmallRng::from_entropy()));

/// Runs `f` with the process-wide random source.
///
/// A poisoned lock only means another thread panicked mid-battle; the
/// generator itself is still usable.
pub fn with_process_rng<T>(f: impl FnOnce(&mut SmallRng) -> T) -> T {
    let mut rng = PROCESS_RNG
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut rng)
}

/// Resolves a battle under the default rules using the process-wide
/// random source.
pub fn resolve_battle_default(initial_state: &str) -> Result<(bool, String), ResolveError> {
    with_process_rng(|rng| resolve_battle(initial_state, rng))
}

/// Owns a configuration and a random source across many battles.
///
/// Create once and call `resolve()` per battle; seeding makes every
/// resolution reproducible.
pub struct BattleResolver {
    config: ResolverConfig,
    rng: SmallRng,
}

impl BattleResolver {
    /// Creates a resolver with default rules, seeded from entropy.
    pub fn new() -> Self {
        BattleResolver {
            config: ResolverConfig::default(),
            rng: SmallRng::from_entropy(),
        }
    }

    /// Creates a resolver with default rules and a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        BattleResolver {
            config: ResolverConfig::default(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Replaces the configuration after validating it.
    pub fn with_config(mut self, config: ResolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves one battle from its state notation.
    pub fn resolve(&mut self, initial_state: &str) -> Result<BattleOutcome, ResolveError> {
        resolve_battle_with(initial_state, &self.config, &mut self.rng)
    }

    /// Resolves one already-decoded battle.
    pub fn solve(&mut self, initial: BattleState) -> Result<BattleOutcome, ResolveError> {
        solve(initial, &self.config, &mut self.rng)
    }
}

impl Default for BattleResolver {
    fn default() -> Self {
        Self::new()
    }
}
