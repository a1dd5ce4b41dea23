//! Parallel resolution of independent battles.
//!
//! Each battle gets its own `SmallRng`, seeded from `seed + index` when a
//! seed is given, so a batch is reproducible regardless of thread count.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::config::ResolverConfig;
use crate::resolve::{resolve_battle_with, BattleOutcome, ResolveError};

/// Configuration for a batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub resolver: ResolverConfig,
    /// Worker threads; 0 lets rayon pick.
    pub threads: usize,
    /// Base random seed (0 = use entropy).
    pub seed: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            resolver: ResolverConfig::default(),
            threads: 0,
            seed: 0,
        }
    }
}

/// Errors that stop a batch before any battle is resolved.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("failed to build thread pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

fn battle_rng(seed: u64, index: usize) -> SmallRng {
    if seed != 0 {
        SmallRng::seed_from_u64(seed.wrapping_add(index as u64))
    } else {
        SmallRng::from_entropy()
    }
}

/// Resolves every battle notation in parallel.
///
/// Results come back in input order; one malformed battle does not stop
/// the others.
pub fn resolve_batch<S: AsRef<str> + Sync>(
    states: &[S],
    config: &BatchConfig,
) -> Result<Vec<Result<BattleOutcome, ResolveError>>, BatchError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;

    let results: Vec<Result<BattleOutcome, ResolveError>> = pool.install(|| {
        states
            .par_iter()
            .enumerate()
            .map(|(i, state)| {
                let mut rng = battle_rng(config.seed, i);
                let result = resolve_battle_with(state.as_ref(), &config.resolver, &mut rng);
                if let Err(e) = &result {
                    tracing::warn!(battle = i, error = %e, "battle rejected");
                }
                result
            })
            .collect()
    });

    Ok(results)
}

/// Win/loss tallies over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub attacker_wins: usize,
    pub defender_wins: usize,
    pub errors: usize,
    pub total_phases: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[Result<BattleOutcome, ResolveError>]) -> Self {
        let mut summary = BatchSummary::default();
        for result in results {
            match result {
                Ok(outcome) => {
                    if outcome.attacker_won {
                        summary.attacker_wins += 1;
                    } else {
                        summary.defender_wins += 1;
                    }
                    summary.total_phases += outcome.phases();
                }
                Err(_) => summary.errors += 1,
            }
        }
        summary
    }

    /// Number of battles that resolved.
    pub fn resolved(&self) -> usize {
        self.attacker_wins + self.defender_wins
    }
}
