use crate::model::{Draw, NumberSource, MAX_NUMBER, MIN_NUMBER};
use chrono::NaiveDate;
use serde::Deserialize;

/// Inclusive bounds over either the round number or the draw date.
/// A missing bound leaves that side open.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RangeFilter {
    Sequence {
        start: Option<u32>,
        end: Option<u32>,
    },
    Date {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl RangeFilter {
    pub fn matches(&self, draw: &Draw) -> bool {
        match self {
            RangeFilter::Sequence { start, end } => {
                within(draw.sequence_number(), start.as_ref(), end.as_ref())
            }
            RangeFilter::Date { start, end } => {
                within(draw.draw_date(), start.as_ref(), end.as_ref())
            }
        }
    }
}

fn within<T: PartialOrd>(value: T, start: Option<&T>, end: Option<&T>) -> bool {
    start.is_none_or(|s| &value >= s) && end.is_none_or(|e| &value <= e)
}

/// Occurrence count for every number 1..=45 over a selection of draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u32; MAX_NUMBER as usize],
    draws: usize,
    source: NumberSource,
}

impl FrequencyTable {
    pub fn from_draws<'a, I>(draws: I, source: NumberSource) -> Self
    where
        I: IntoIterator<Item = &'a Draw>,
    {
        let mut counts = [0u32; MAX_NUMBER as usize];
        let mut total_draws = 0;
        for draw in draws {
            total_draws += 1;
            for n in source.numbers_from(draw) {
                counts[(n - MIN_NUMBER) as usize] += 1;
            }
        }
        Self {
            counts,
            draws: total_draws,
            source,
        }
    }

    /// Count for `number`; 0 for anything outside 1..=45.
    pub fn get(&self, number: u8) -> u32 {
        if (MIN_NUMBER..=MAX_NUMBER).contains(&number) {
            self.counts[(number - MIN_NUMBER) as usize]
        } else {
            0
        }
    }

    /// `(number, count)` pairs in ascending number order, zero counts included.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &c)| (i as u8 + MIN_NUMBER, c))
    }

    /// Most frequent first; equal counts keep the lower number first.
    pub fn ranked(&self) -> Vec<(u8, u32)> {
        let mut ranked: Vec<(u8, u32)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }

    pub fn top(&self, k: usize) -> Vec<u8> {
        self.ranked().into_iter().take(k).map(|(n, _)| n).collect()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    pub fn max_count(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn draw_count(&self) -> usize {
        self.draws
    }

    pub fn source(&self) -> NumberSource {
        self.source
    }
}

/// Tallies the selected numbers of every draw accepted by `range_filter`.
pub fn compute_frequency(
    draws: &[Draw],
    range_filter: Option<&RangeFilter>,
    source: NumberSource,
) -> FrequencyTable {
    FrequencyTable::from_draws(
        draws
            .iter()
            .filter(|d| range_filter.is_none_or(|f| f.matches(d))),
        source,
    )
}

/// How many of the latest draws count as "recent".
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RecencyWindow {
    pub min_draws: usize,
    pub ratio: f64,
}

impl Default for RecencyWindow {
    fn default() -> Self {
        Self {
            min_draws: 100,
            ratio: 0.2,
        }
    }
}

impl RecencyWindow {
    pub fn size(&self, total: usize) -> usize {
        let by_ratio = (total as f64 * self.ratio).floor() as usize;
        self.min_draws.max(by_ratio).min(total)
    }
}

/// Frequency over the tail of `draws` (assumed ordered by round).
pub fn recent_frequency(
    draws: &[Draw],
    window: &RecencyWindow,
    source: NumberSource,
) -> FrequencyTable {
    let size = window.size(draws.len());
    FrequencyTable::from_draws(&draws[draws.len() - size..], source)
}
