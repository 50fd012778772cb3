use crate::analyzer::frequency::RangeFilter;
use crate::model::{NumberSource, MAX_NUMBER, PICK_COUNT};
use serde::Deserialize;
use std::fs;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub enabled: bool,
    pub base_url: String,
    pub user_agent: String,
    pub request_timeout_seconds: u64,
    pub max_concurrent_requests: usize,
    pub cache_ttl_seconds: u64,
    /// Stop at this round instead of asking the site for the latest one.
    pub last_round: Option<u32>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://dhlottery.co.kr/gameResult.do".into(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) LottoSniperBot/0.1".into(),
            request_timeout_seconds: 10,
            max_concurrent_requests: 4,
            cache_ttl_seconds: 3600,
            last_round: None,
        }
    }
}

/// Weighting scheme for prediction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyConfig {
    TopKDeterministic,
    Weighted {
        alpha: f64,
        beta: f64,
        #[serde(default = "default_recent_min_draws")]
        recent_min_draws: usize,
        #[serde(default = "default_recent_ratio")]
        recent_ratio: f64,
    },
}

fn default_recent_min_draws() -> usize {
    100
}

fn default_recent_ratio() -> f64 {
    0.2
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub source: NumberSource,
    pub range: Option<RangeFilter>,
    pub num_sets: usize,
    pub pool_size: usize,
    pub max_attempts: usize,
    pub strategy: StrategyConfig,
    /// Fixed seed for reproducible predictions.
    pub seed: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            source: NumberSource::Main,
            range: None,
            num_sets: 5,
            pool_size: 30,
            max_attempts: 1000,
            strategy: StrategyConfig::TopKDeterministic,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub csv_path: String,
    /// SVG bar chart output; skipped when absent.
    #[serde(default)]
    pub chart_path: Option<String>,
    /// Re-run every N seconds; a single pass when absent.
    #[serde(default)]
    pub watch_interval_seconds: Option<u64>,
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.analysis;
        if a.num_sets == 0 {
            return Err(ConfigError::Invalid("analysis.num_sets must be at least 1".into()));
        }
        if a.pool_size < PICK_COUNT || a.pool_size > MAX_NUMBER as usize {
            return Err(ConfigError::Invalid(format!(
                "analysis.pool_size must be within {}..={}",
                PICK_COUNT, MAX_NUMBER
            )));
        }
        if a.max_attempts == 0 {
            return Err(ConfigError::Invalid("analysis.max_attempts must be positive".into()));
        }
        if let StrategyConfig::Weighted {
            alpha,
            beta,
            recent_ratio,
            ..
        } = a.strategy
        {
            if alpha < 0.0 || beta < 0.0 {
                return Err(ConfigError::Invalid("weights must be non-negative".into()));
            }
            if !(0.0..=1.0).contains(&recent_ratio) {
                return Err(ConfigError::Invalid("recent_ratio must be within 0..=1".into()));
            }
        }
        if self.scraper.max_concurrent_requests == 0 {
            return Err(ConfigError::Invalid(
                "scraper.max_concurrent_requests must be positive".into(),
            ));
        }
        Ok(())
    }
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg: AppConfig = serde_json::from_str(r#"{ "csv_path": "lotto_data.csv" }"#).unwrap();
        assert!(cfg.validate().is_ok());
        assert!(cfg.scraper.enabled);
        assert_eq!(cfg.analysis.num_sets, 5);
        assert_eq!(cfg.analysis.pool_size, 30);
        assert_eq!(cfg.analysis.strategy, StrategyConfig::TopKDeterministic);
        assert!(cfg.chart_path.is_none());
        assert!(cfg.watch_interval_seconds.is_none());
    }

    #[test]
    fn full_config_parses() {
        let json = r#"{
            "csv_path": "data/lotto.csv",
            "chart_path": "frequency.svg",
            "scraper": { "enabled": false, "max_concurrent_requests": 8, "last_round": 1100 },
            "analysis": {
                "source": "combined",
                "range": { "kind": "sequence", "start": 900, "end": null },
                "num_sets": 3,
                "pool_size": 45,
                "strategy": { "kind": "weighted", "alpha": 0.7, "beta": 0.3 },
                "seed": 42
            }
        }"#;
        let cfg: AppConfig = serde_json::from_str(json).unwrap();
        assert!(cfg.validate().is_ok());
        assert!(!cfg.scraper.enabled);
        assert_eq!(cfg.scraper.last_round, Some(1100));
        assert_eq!(cfg.analysis.source, NumberSource::Combined);
        assert_eq!(
            cfg.analysis.range,
            Some(RangeFilter::Sequence {
                start: Some(900),
                end: None
            })
        );
        assert_eq!(
            cfg.analysis.strategy,
            StrategyConfig::Weighted {
                alpha: 0.7,
                beta: 0.3,
                recent_min_draws: 100,
                recent_ratio: 0.2
            }
        );
    }

    #[test]
    fn date_range_parses() {
        let json = r#"{ "kind": "date", "start": "2020-01-04", "end": "2020-12-26" }"#;
        let range: RangeFilter = serde_json::from_str(json).unwrap();
        assert!(matches!(range, RangeFilter::Date { start: Some(_), end: Some(_) }));
    }

    #[test]
    fn validate_rejects_small_pool() {
        let mut cfg: AppConfig = serde_json::from_str(r#"{ "csv_path": "x.csv" }"#).unwrap();
        cfg.analysis.pool_size = 4;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }
}
