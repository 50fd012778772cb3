use crate::model::{Draw, StorageError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One CSV row, headers as used by the draw history file.
#[derive(Debug, Serialize, Deserialize)]
struct DrawRecord {
    #[serde(rename = "회차")]
    round: u32,
    #[serde(rename = "추첨일")]
    date: NaiveDate,
    #[serde(rename = "첫번째")]
    n1: u8,
    #[serde(rename = "두번째")]
    n2: u8,
    #[serde(rename = "세번째")]
    n3: u8,
    #[serde(rename = "네번째")]
    n4: u8,
    #[serde(rename = "다섯번째")]
    n5: u8,
    #[serde(rename = "여섯번째")]
    n6: u8,
    #[serde(rename = "보너스")]
    bonus: u8,
}

impl From<&Draw> for DrawRecord {
    fn from(draw: &Draw) -> Self {
        let [n1, n2, n3, n4, n5, n6] = *draw.main_numbers();
        Self {
            round: draw.sequence_number(),
            date: draw.draw_date(),
            n1,
            n2,
            n3,
            n4,
            n5,
            n6,
            bonus: draw.bonus_number(),
        }
    }
}

/// Flat-file draw history.
pub struct CsvStorage {
    path: PathBuf,
}

impl CsvStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every row; a missing file is an empty history.
    pub fn load(&self) -> Result<Vec<Draw>, StorageError> {
        if !self.path.exists() {
            warn!("No history file at {}, starting empty", self.path.display());
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)?;

        let mut draws = Vec::new();
        for (i, row) in reader.deserialize::<DrawRecord>().enumerate() {
            let r = row?;
            let draw = Draw::new(r.round, r.date, &[r.n1, r.n2, r.n3, r.n4, r.n5, r.n6], r.bonus)
                .map_err(|source| StorageError::InvalidRecord {
                    // header is line 1
                    line: i as u64 + 2,
                    source,
                })?;
            draws.push(draw);
        }

        info!("Loaded {} draws from {}", draws.len(), self.path.display());
        Ok(draws)
    }

    /// Rewrites the file with `draws`.
    pub fn save(&self, draws: &[Draw]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = csv::Writer::from_path(&self.path)?;
        for draw in draws {
            writer.serialize(DrawRecord::from(draw))?;
        }
        writer.flush()?;

        info!("Saved {} draws to {}", draws.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("lotto-sniper-{}-{}", std::process::id(), name))
            .join("lotto_data.csv")
    }

    fn draw(seq: u32, numbers: [u8; 6], bonus: u8) -> Draw {
        let date = NaiveDate::from_ymd_opt(2002, 12, 7).unwrap() + chrono::Days::new(7 * (seq as u64 - 1));
        Draw::new(seq, date, &numbers, bonus).unwrap()
    }

    #[test]
    fn missing_file_is_empty_history() {
        let storage = CsvStorage::new(temp_path("missing"));
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_keeps_draws() {
        let path = temp_path("save");
        let storage = CsvStorage::new(&path);
        let draws = vec![
            draw(1, [10, 23, 29, 33, 37, 40], 16),
            draw(2, [9, 13, 21, 25, 32, 42], 2),
        ];

        storage.save(&draws).unwrap();
        assert_eq!(storage.load().unwrap(), draws);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("회차,추첨일,첫번째,두번째,세번째,네번째,다섯번째,여섯번째,보너스"));
        assert!(text.contains("1,2002-12-07,10,23,29,33,37,40,16"));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn invalid_row_reports_its_line() {
        let path = temp_path("invalid");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            "회차,추첨일,첫번째,두번째,세번째,네번째,다섯번째,여섯번째,보너스\n\
             1,2002-12-07,10,23,29,33,37,40,16\n\
             2,2002-12-14,9,13,21,25,32,52,2\n",
        )
        .unwrap();

        let err = CsvStorage::new(&path).load().unwrap_err();
        assert!(matches!(err, StorageError::InvalidRecord { line: 3, .. }));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
