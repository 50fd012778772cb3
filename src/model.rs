// Core structs: Draw, DrawRequest, PredictedSet and the error types
use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

/// Lowest and highest number on a 6/45 ticket.
pub const MIN_NUMBER: u8 = 1;
pub const MAX_NUMBER: u8 = 45;
/// Main numbers per draw.
pub const PICK_COUNT: usize = 6;

/// One historical drawing. Only constructible through [`Draw::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    sequence_number: u32,
    draw_date: NaiveDate,
    main_numbers: [u8; PICK_COUNT],
    bonus_number: u8,
}

impl Draw {
    /// Validates and builds a draw. Main numbers are stored ascending.
    pub fn new(
        sequence_number: u32,
        draw_date: NaiveDate,
        main_numbers: &[u8],
        bonus_number: u8,
    ) -> Result<Self, DrawError> {
        if sequence_number == 0 {
            return Err(DrawError::ZeroSequence);
        }
        if main_numbers.len() != PICK_COUNT {
            return Err(DrawError::WrongCount {
                sequence: sequence_number,
                count: main_numbers.len(),
            });
        }

        let mut numbers = [0u8; PICK_COUNT];
        numbers.copy_from_slice(main_numbers);
        numbers.sort_unstable();

        for &n in numbers.iter().chain(std::iter::once(&bonus_number)) {
            if !(MIN_NUMBER..=MAX_NUMBER).contains(&n) {
                return Err(DrawError::OutOfRange {
                    sequence: sequence_number,
                    number: n,
                });
            }
        }
        if let Some(pair) = numbers.windows(2).find(|w| w[0] == w[1]) {
            return Err(DrawError::Duplicate {
                sequence: sequence_number,
                number: pair[0],
            });
        }

        Ok(Self {
            sequence_number,
            draw_date,
            main_numbers: numbers,
            bonus_number,
        })
    }

    pub fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    pub fn draw_date(&self) -> NaiveDate {
        self.draw_date
    }

    pub fn main_numbers(&self) -> &[u8; PICK_COUNT] {
        &self.main_numbers
    }

    pub fn bonus_number(&self) -> u8 {
        self.bonus_number
    }
}

/// Which numbers of a draw are tallied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberSource {
    #[default]
    Main,
    Bonus,
    Combined,
}

impl NumberSource {
    /// Numbers contributed by one draw.
    pub fn numbers_from(self, draw: &Draw) -> impl Iterator<Item = u8> + '_ {
        let main: &[u8] = match self {
            NumberSource::Bonus => &[],
            _ => draw.main_numbers(),
        };
        let bonus = match self {
            NumberSource::Main => None,
            _ => Some(draw.bonus_number()),
        };
        main.iter().copied().chain(bonus)
    }
}

/// A generated candidate ticket, sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PredictedSet {
    numbers: [u8; PICK_COUNT],
}

impl PredictedSet {
    pub(crate) fn from_sorted(numbers: [u8; PICK_COUNT]) -> Self {
        Self { numbers }
    }

    pub fn numbers(&self) -> &[u8; PICK_COUNT] {
        &self.numbers
    }
}

impl fmt::Display for PredictedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .numbers()
            .iter()
            .map(|n| format!("{:02}", n))
            .collect::<Vec<_>>()
            .join(" - ");
        f.write_str(&text)
    }
}

#[derive(Debug, Clone)]
pub struct DrawRequest {
    /// `None` asks for the latest published round.
    pub round: Option<u32>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DrawError {
    #[error("sequence number must be positive")]
    ZeroSequence,
    #[error("round {sequence}: expected 6 main numbers, got {count}")]
    WrongCount { sequence: u32, count: usize },
    #[error("round {sequence}: number {number} outside 1..=45")]
    OutOfRange { sequence: u32, number: u8 },
    #[error("round {sequence}: number {number} drawn twice")]
    Duplicate { sequence: u32, number: u8 },
}

#[derive(Debug, Error, PartialEq)]
pub enum PredictError {
    #[error("only {produced} of {requested} distinct sets could be drawn from a pool of {pool_size}")]
    InsufficientPool {
        requested: usize,
        produced: usize,
        pool_size: usize,
    },
    #[error("invalid prediction parameter: {0}")]
    InvalidParameter(String),
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("http error: {0}")]
    HttpError(String),
    #[error("request timed out")]
    Timeout,
    #[error("unexpected response status {0}")]
    InvalidResponse(u16),
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("html parse error: {0}")]
    HtmlParseError(String),
    #[error("missing field: {0}")]
    MissingField(String),
    #[error("invalid {field}: {value:?}")]
    InvalidField { field: String, value: String },
    #[error(transparent)]
    InvalidDraw(#[from] DrawError),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: {source}")]
    InvalidRecord { line: u64, source: DrawError },
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("chart rendering failed: {0}")]
    Render(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 6).unwrap()
    }

    #[test]
    fn new_sorts_main_numbers() {
        let draw = Draw::new(1101, date(), &[44, 3, 17, 1, 29, 9], 12).unwrap();
        assert_eq!(draw.main_numbers(), &[1, 3, 9, 17, 29, 44]);
        assert_eq!(draw.bonus_number(), 12);
    }

    #[test]
    fn new_rejects_malformed_draws() {
        assert_eq!(
            Draw::new(5, date(), &[1, 2, 3, 4, 5], 6),
            Err(DrawError::WrongCount { sequence: 5, count: 5 })
        );
        assert_eq!(
            Draw::new(5, date(), &[1, 2, 3, 4, 5, 46], 6),
            Err(DrawError::OutOfRange { sequence: 5, number: 46 })
        );
        assert_eq!(
            Draw::new(5, date(), &[1, 2, 3, 4, 5, 6], 0),
            Err(DrawError::OutOfRange { sequence: 5, number: 0 })
        );
        assert_eq!(
            Draw::new(5, date(), &[1, 2, 3, 3, 5, 6], 7),
            Err(DrawError::Duplicate { sequence: 5, number: 3 })
        );
        assert_eq!(Draw::new(0, date(), &[1, 2, 3, 4, 5, 6], 7), Err(DrawError::ZeroSequence));
    }

    #[test]
    fn bonus_may_repeat_a_main_number() {
        assert!(Draw::new(7, date(), &[1, 2, 3, 4, 5, 6], 6).is_ok());
    }

    #[test]
    fn number_source_selects_columns() {
        let draw = Draw::new(1, date(), &[1, 2, 3, 4, 5, 6], 40).unwrap();
        assert_eq!(NumberSource::Main.numbers_from(&draw).count(), 6);
        assert_eq!(NumberSource::Bonus.numbers_from(&draw).collect::<Vec<_>>(), vec![40]);
        assert_eq!(NumberSource::Combined.numbers_from(&draw).last(), Some(40));
    }

    #[test]
    fn predicted_set_display_is_zero_padded() {
        let set = PredictedSet::from_sorted([3, 8, 15, 22, 37, 45]);
        assert_eq!(set.to_string(), "03 - 08 - 15 - 22 - 37 - 45");
    }
}
