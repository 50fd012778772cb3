use crate::analyzer::frequency::{compute_frequency, recent_frequency, FrequencyTable, RangeFilter, RecencyWindow};
use crate::analyzer::predictor::{predict, PredictParams, Strategy};
use crate::config::{AnalysisConfig, StrategyConfig};
use crate::model::{Draw, NumberSource, PredictError, PredictedSet};
use rand::Rng;
use tracing::info;

/// Trait defining the interface for a draw-history analyzer.
pub trait Analyzer {
    fn compute_frequency(&self, draws: &[Draw], range_filter: Option<&RangeFilter>) -> FrequencyTable;
    fn predict<R: Rng + ?Sized>(
        &self,
        analysis: &AnalysisResult,
        rng: &mut R,
    ) -> Result<Vec<PredictedSet>, PredictError>;
}

/// Frequency counting plus prediction, parameterised from the config file.
pub struct FrequencyPredictor {
    source: NumberSource,
    params: PredictParams,
    strategy: StrategyConfig,
}

/// Everything a prediction needs, computed once per run.
pub struct AnalysisResult {
    /// Draws accepted by the range filter, in round order.
    pub selected: Vec<Draw>,
    pub overall: FrequencyTable,
    /// Tail of `selected`; only present for the weighted strategy.
    pub recent: Option<FrequencyTable>,
}

impl FrequencyPredictor {
    pub fn new(cfg: &AnalysisConfig) -> Self {
        Self {
            source: cfg.source,
            params: PredictParams {
                num_sets: cfg.num_sets,
                pool_size: cfg.pool_size,
                max_attempts: cfg.max_attempts,
            },
            strategy: cfg.strategy.clone(),
        }
    }

    /// Filters the history once and builds the overall (and, when needed, recent) tables.
    pub fn analyze(&self, draws: &[Draw], range_filter: Option<&RangeFilter>) -> AnalysisResult {
        let selected: Vec<Draw> = draws
            .iter()
            .filter(|d| range_filter.is_none_or(|f| f.matches(d)))
            .cloned()
            .collect();
        let overall = self.compute_frequency(&selected, None);

        let recent = match &self.strategy {
            StrategyConfig::Weighted {
                recent_min_draws,
                recent_ratio,
                ..
            } => {
                let window = RecencyWindow {
                    min_draws: *recent_min_draws,
                    ratio: *recent_ratio,
                };
                info!("Recent window: last {} draws", window.size(selected.len()));
                Some(recent_frequency(&selected, &window, self.source))
            }
            StrategyConfig::TopKDeterministic => None,
        };

        info!(
            "Analyzed {} draws ({} numbers counted)",
            overall.draw_count(),
            overall.total()
        );
        AnalysisResult {
            selected,
            overall,
            recent,
        }
    }

    fn strategy_for(&self, analysis: &AnalysisResult) -> Strategy {
        match &self.strategy {
            StrategyConfig::TopKDeterministic => Strategy::TopKDeterministic,
            StrategyConfig::Weighted { alpha, beta, .. } => Strategy::Weighted {
                recent: analysis
                    .recent
                    .clone()
                    .unwrap_or_else(|| FrequencyTable::from_draws(&analysis.selected, self.source)),
                alpha: *alpha,
                beta: *beta,
            },
        }
    }
}

impl Analyzer for FrequencyPredictor {
    fn compute_frequency(&self, draws: &[Draw], range_filter: Option<&RangeFilter>) -> FrequencyTable {
        compute_frequency(draws, range_filter, self.source)
    }

    fn predict<R: Rng + ?Sized>(
        &self,
        analysis: &AnalysisResult,
        rng: &mut R,
    ) -> Result<Vec<PredictedSet>, PredictError> {
        let strategy = self.strategy_for(analysis);
        predict(&analysis.overall, &self.params, &strategy, rng)
    }
}
