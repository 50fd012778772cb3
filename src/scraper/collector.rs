use crate::model::{Draw, DrawRequest, ParserError, ScraperError};
use crate::parser::Parser;
use crate::scraper::traits::Scraper;
use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum CollectError {
    #[error(transparent)]
    Scraper(#[from] ScraperError),
    #[error(transparent)]
    Parser(#[from] ParserError),
}

/// Outcome of a collection run: parsed draws in round order and the rounds that were skipped.
#[derive(Debug, Default)]
pub struct CollectReport {
    pub draws: Vec<Draw>,
    pub failed_rounds: Vec<u32>,
}

/// Asks the site which round is the most recent one.
pub async fn fetch_latest_round<S, P>(scraper: &S, parser: &P) -> Result<u32, CollectError>
where
    S: Scraper + ?Sized,
    P: Parser,
{
    let html = scraper.fetch(&DrawRequest { round: None }).await?;
    Ok(parser.parse_latest_round(&html)?)
}

async fn fetch_round<S, P>(scraper: &S, parser: &P, round: u32) -> Result<Draw, CollectError>
where
    S: Scraper + ?Sized,
    P: Parser,
{
    let html = scraper.fetch(&DrawRequest { round: Some(round) }).await?;
    let draw = parser.parse(&html)?;
    if draw.sequence_number() != round {
        warn!("Asked for round {}, page shows round {}", round, draw.sequence_number());
    }
    Ok(draw)
}

/// Fetches and parses `rounds` with at most `concurrency` requests in flight.
/// A round that fails is logged and skipped; the rest still complete.
pub async fn collect_draws<S, P>(
    scraper: &S,
    parser: &P,
    rounds: &[u32],
    concurrency: usize,
) -> CollectReport
where
    S: Scraper + ?Sized,
    P: Parser + Sync,
{
    info!("Fetching {} rounds ({} at a time)...", rounds.len(), concurrency);

    let results: Vec<(u32, Result<Draw, CollectError>)> = stream::iter(rounds.iter().copied())
        .map(|round| async move { (round, fetch_round(scraper, parser, round).await) })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut report = CollectReport::default();
    for (round, result) in results {
        match result {
            Ok(draw) => report.draws.push(draw),
            Err(e) => {
                warn!("Skipping round {}: {}", round, e);
                report.failed_rounds.push(round);
            }
        }
    }
    report.draws.sort_by_key(Draw::sequence_number);
    report.failed_rounds.sort_unstable();

    info!(
        "Collected {} draws, {} rounds failed",
        report.draws.len(),
        report.failed_rounds.len()
    );
    report
}
