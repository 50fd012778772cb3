// Parser module: turns result pages into draws.

pub mod lotto_parser;

pub use lotto_parser::{LottoResultParser, Parser};
