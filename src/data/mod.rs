//! Data ingestion and output
//!
//! Results table parsing, the page fetcher, and JSON output.

pub mod months;
pub mod output;
pub mod scrapers;
pub mod table;

pub use months::YearMonth;
pub use scrapers::ResultsScraper;
pub use table::TableScanner;
