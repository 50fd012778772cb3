mod analyzer;
mod config;
mod model;
mod normalizer;
mod parser;
mod presenter;
mod scraper;
mod storage;
mod utils;

use analyzer::{Analyzer, FrequencyPredictor};
use config::{load_config, AppConfig, ScraperConfig};
use model::Draw;
use normalizer::{missing_rounds, normalize_all};
use parser::LottoResultParser;
use presenter::{render_frequency, render_predictions, write_bar_chart};
use rand::SeedableRng;
use rand::rngs::StdRng;
use crate::scraper::{collect_draws, fetch_latest_round, CachingScraper, ScraperImpl};
use std::path::Path;
use storage::CsvStorage;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};

/// Network side of a run; built once so the response cache outlives a single pass.
struct DrawSource {
    scraper: CachingScraper<ScraperImpl>,
    parser: LottoResultParser,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("😱 Panic occurred: {:?}", panic_info);
    }));

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.json".to_string());
    let config: AppConfig = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    let storage = CsvStorage::new(&config.csv_path);
    let source = if config.scraper.enabled {
        match build_source(&config.scraper) {
            Ok(source) => Some(source),
            Err(e) => {
                error!("Failed to initialize scraper: {}", e);
                return;
            }
        }
    } else {
        info!("Scraping disabled, using {} only", storage.path().display());
        None
    };

    loop {
        let mut draws = match storage.load() {
            Ok(draws) => draws,
            Err(e) => {
                error!("Failed to load draw history: {}", e);
                return;
            }
        };

        if let Some(source) = &source {
            update_history(source, &config.scraper, &storage, &mut draws).await;
        }
        normalize_all(&mut draws);

        analyze_and_present(&config, &draws);

        let Some(interval) = config.watch_interval_seconds else {
            break;
        };
        info!("Waiting {}s before the next check...", interval);
        sleep(Duration::from_secs(interval)).await;
    }
}

fn build_source(cfg: &ScraperConfig) -> Result<DrawSource, Box<dyn std::error::Error>> {
    let base = ScraperImpl::new(cfg)?;
    Ok(DrawSource {
        scraper: CachingScraper::new(base, Duration::from_secs(cfg.cache_ttl_seconds)),
        parser: LottoResultParser::new()?,
    })
}

/// Fetches the rounds missing from `draws` and writes the merged history back.
/// Failures are logged; the analysis continues with whatever is available.
async fn update_history(
    source: &DrawSource,
    cfg: &ScraperConfig,
    storage: &CsvStorage,
    draws: &mut Vec<Draw>,
) {
    let latest = match cfg.last_round {
        Some(round) => round,
        None => match fetch_latest_round(&source.scraper, &source.parser).await {
            Ok(round) => round,
            Err(e) => {
                warn!("Could not determine the latest round: {}", e);
                return;
            }
        },
    };
    info!("Latest round: {}", latest);

    let missing = missing_rounds(draws, latest);
    if missing.is_empty() {
        info!("History is up to date.");
        return;
    }

    let report = collect_draws(
        &source.scraper,
        &source.parser,
        &missing,
        cfg.max_concurrent_requests,
    )
    .await;
    if !report.failed_rounds.is_empty() {
        warn!("Rounds not fetched: {:?}", report.failed_rounds);
    }
    if report.draws.is_empty() {
        return;
    }

    draws.extend(report.draws);
    normalize_all(draws);
    if let Err(e) = storage.save(draws) {
        warn!("Failed to save draw history: {}", e);
    }
}

fn analyze_and_present(config: &AppConfig, draws: &[Draw]) {
    let predictor = FrequencyPredictor::new(&config.analysis);
    let analysis = predictor.analyze(draws, config.analysis.range.as_ref());

    println!("{}", render_frequency(&analysis.overall));

    if let Some(chart_path) = &config.chart_path {
        match write_bar_chart(&analysis.overall, Path::new(chart_path)) {
            Ok(()) => info!("Saved chart: {}", chart_path),
            Err(e) => warn!("Chart error: {}", e),
        }
    }

    let mut rng = match config.analysis.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    match predictor.predict(&analysis, &mut rng) {
        Ok(sets) => println!("{}", render_predictions(&sets)),
        Err(e) => error!("Prediction failed: {}", e),
    }
}
