use crate::analyzer::frequency::FrequencyTable;
use crate::model::{PredictError, PredictedSet, MAX_NUMBER, PICK_COUNT};
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::seq::index;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictParams {
    pub num_sets: usize,
    /// How many of the most frequent numbers are eligible under `TopKDeterministic`.
    pub pool_size: usize,
    /// Cap on sampling attempts, rejected duplicates included.
    pub max_attempts: usize,
}

impl Default for PredictParams {
    fn default() -> Self {
        Self {
            num_sets: 5,
            pool_size: 30,
            max_attempts: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// Uniform 6-of-pool sampling from the fixed top-`pool_size` pool.
    TopKDeterministic,
    /// `w(n) = overall(n) * alpha + recent(n) * beta + 1` over all of 1..=45;
    /// `pool_size` does not apply, so never-drawn numbers stay selectable.
    Weighted {
        recent: FrequencyTable,
        alpha: f64,
        beta: f64,
    },
}

/// Produces `params.num_sets` distinct sets of six numbers.
///
/// Fails with [`PredictError::InsufficientPool`] rather than returning fewer
/// sets than requested.
pub fn predict<R: Rng + ?Sized>(
    table: &FrequencyTable,
    params: &PredictParams,
    strategy: &Strategy,
    rng: &mut R,
) -> Result<Vec<PredictedSet>, PredictError> {
    validate(params, strategy)?;

    let pool = match strategy {
        Strategy::TopKDeterministic => table.top(params.pool_size),
        Strategy::Weighted { .. } => table.top(MAX_NUMBER as usize),
    };
    if pool.len() < PICK_COUNT {
        return Err(PredictError::InsufficientPool {
            requested: params.num_sets,
            produced: 0,
            pool_size: pool.len(),
        });
    }

    let weights: Vec<f64> = match strategy {
        Strategy::TopKDeterministic => Vec::new(),
        Strategy::Weighted {
            recent,
            alpha,
            beta,
        } => pool
            .iter()
            .map(|&n| table.get(n) as f64 * alpha + recent.get(n) as f64 * beta + 1.0)
            .collect(),
    };

    let mut seen = HashSet::new();
    let mut sets = Vec::with_capacity(params.num_sets);
    let mut attempts = 0;

    while sets.len() < params.num_sets {
        if attempts >= params.max_attempts {
            return Err(PredictError::InsufficientPool {
                requested: params.num_sets,
                produced: sets.len(),
                pool_size: pool.len(),
            });
        }
        attempts += 1;

        let candidate = match strategy {
            Strategy::TopKDeterministic => sample_uniform(&pool, rng),
            Strategy::Weighted { .. } => sample_weighted(&pool, &weights, rng)?,
        };

        if seen.insert(candidate.clone()) {
            sets.push(candidate);
        } else {
            debug!("Rejected duplicate set {} (attempt {})", candidate, attempts);
        }
    }

    debug!("Generated {} sets in {} attempts", sets.len(), attempts);
    Ok(sets)
}

fn validate(params: &PredictParams, strategy: &Strategy) -> Result<(), PredictError> {
    if params.num_sets == 0 {
        return Err(PredictError::InvalidParameter("num_sets must be at least 1".into()));
    }
    if params.pool_size > MAX_NUMBER as usize {
        return Err(PredictError::InvalidParameter(format!(
            "pool_size {} exceeds {}",
            params.pool_size, MAX_NUMBER
        )));
    }
    if let Strategy::Weighted { alpha, beta, .. } = strategy {
        for (name, value) in [("alpha", alpha), ("beta", beta)] {
            if !value.is_finite() || *value < 0.0 {
                return Err(PredictError::InvalidParameter(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
    }
    Ok(())
}

fn sample_uniform<R: Rng + ?Sized>(pool: &[u8], rng: &mut R) -> PredictedSet {
    let picked: BTreeSet<u8> = index::sample(rng, pool.len(), PICK_COUNT)
        .into_iter()
        .map(|i| pool[i])
        .collect();
    into_set(picked)
}

/// Draws six with replacement, then tops up from the un-picked remainder.
fn sample_weighted<R: Rng + ?Sized>(
    pool: &[u8],
    weights: &[f64],
    rng: &mut R,
) -> Result<PredictedSet, PredictError> {
    let dist = WeightedIndex::new(weights).map_err(weight_error)?;
    let mut picked: BTreeSet<u8> = (0..PICK_COUNT).map(|_| pool[dist.sample(rng)]).collect();

    while picked.len() < PICK_COUNT {
        let remaining: Vec<(u8, f64)> = pool
            .iter()
            .copied()
            .zip(weights.iter().copied())
            .filter(|(n, _)| !picked.contains(n))
            .collect();
        let dist = WeightedIndex::new(remaining.iter().map(|(_, w)| *w)).map_err(weight_error)?;
        picked.insert(remaining[dist.sample(rng)].0);
    }

    Ok(into_set(picked))
}

fn into_set(picked: BTreeSet<u8>) -> PredictedSet {
    let mut numbers = [0u8; PICK_COUNT];
    for (slot, n) in numbers.iter_mut().zip(picked) {
        *slot = n;
    }
    PredictedSet::from_sorted(numbers)
}

fn weight_error(e: rand::distr::weighted::Error) -> PredictError {
    PredictError::InvalidParameter(format!("weights: {}", e))
}
