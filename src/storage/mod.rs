// Storage module: CSV draw history.

pub mod csv_store;

pub use csv_store::CsvStorage;
