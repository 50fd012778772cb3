// Utility functions
use chrono::NaiveDate;

/// Runs of ASCII digits in `text`, in order.
pub fn digit_groups(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parses a date such as `(2023년 12월 30일 추첨)` or `2023-12-30`.
pub fn parse_korean_date(text: &str) -> Option<NaiveDate> {
    let groups = digit_groups(text);
    if groups.len() < 3 {
        return None;
    }
    let year = groups[0].parse().ok()?;
    let month = groups[1].parse().ok()?;
    let day = groups[2].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parses a round label such as `1100회`.
pub fn parse_round(text: &str) -> Option<u32> {
    digit_groups(text).first()?.parse().ok()
}
