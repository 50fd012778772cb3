use crate::model::Draw;
use std::collections::HashSet;
use tracing::warn;

/// Orders draws by round and drops repeated rounds (first one wins).
pub fn normalize_all(draws: &mut Vec<Draw>) {
    draws.sort_by_key(Draw::sequence_number);

    let before = draws.len();
    draws.dedup_by_key(|d| d.sequence_number());
    if draws.len() != before {
        warn!("Dropped {} duplicate rounds", before - draws.len());
    }

    for pair in draws.windows(2) {
        if pair[1].draw_date() < pair[0].draw_date() {
            warn!(
                "Round {} ({}) is dated before round {} ({})",
                pair[1].sequence_number(),
                pair[1].draw_date(),
                pair[0].sequence_number(),
                pair[0].draw_date()
            );
        }
    }
}

/// Rounds in `1..=latest` that are not in `draws`.
pub fn missing_rounds(draws: &[Draw], latest: u32) -> Vec<u32> {
    let known: HashSet<u32> = draws.iter().map(Draw::sequence_number).collect();
    (1..=latest).filter(|r| !known.contains(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draw(seq: u32, bonus: u8) -> Draw {
        let date = NaiveDate::from_ymd_opt(2002, 12, 7).unwrap() + chrono::Days::new(7 * seq as u64);
        Draw::new(seq, date, &[1, 2, 3, 4, 5, 6], bonus).unwrap()
    }

    #[test]
    fn sorts_and_keeps_first_duplicate() {
        let mut draws = vec![draw(3, 7), draw(1, 7), draw(3, 8), draw(2, 7)];
        normalize_all(&mut draws);

        let rounds: Vec<u32> = draws.iter().map(|d| d.sequence_number()).collect();
        assert_eq!(rounds, vec![1, 2, 3]);
        assert_eq!(draws[2].bonus_number(), 7);
    }

    #[test]
    fn finds_gaps_up_to_latest() {
        let draws = vec![draw(1, 7), draw(2, 7), draw(5, 7)];
        assert_eq!(missing_rounds(&draws, 7), vec![3, 4, 6, 7]);
        assert!(missing_rounds(&draws, 2).is_empty());
        assert!(missing_rounds(&[], 0).is_empty());
    }
}
