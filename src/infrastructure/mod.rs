pub mod csv_source;
pub mod export;
pub mod in_memory;

pub use csv_source::{CsvDataSource, read_ohlcv_csv};
pub use export::{write_csv, write_json};
pub use in_memory::InMemoryDataSource;
