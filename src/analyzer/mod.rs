// Analyzer module: frequency counting and set prediction.

pub mod frequency;
pub mod predictor;
pub mod lotto_analysis;

// Re-export the main Analyzer implementation for ease of use.
pub use lotto_analysis::{Analyzer, FrequencyPredictor};
