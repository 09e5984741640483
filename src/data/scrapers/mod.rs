//! Web scraper for the monthly results pages

pub mod shogi;

pub use shogi::ResultsScraper;
