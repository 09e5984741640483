//! Monthly shogi results scraper
//!
//! Turns the irregular results table published for each month into an
//! ordered stream of typed match records.

pub mod data;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Host that publishes the monthly results pages
pub const DEFAULT_HOST: &str = "www.shogi.or.jp";

/// Outcome of one match for one player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "win")]
    Win,
    #[serde(rename = "lose")]
    Lose,
    #[serde(rename = "win without playing")]
    WinWithoutPlaying,
    #[serde(rename = "lose without playing")]
    LoseWithoutPlaying,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Outcome {
    /// Map a result glyph from the table to an outcome.
    ///
    /// Unrecognized glyphs degrade to `Unknown`.
    pub fn from_glyph(glyph: &str) -> Self {
        match glyph {
            "○" => Outcome::Win,
            "●" => Outcome::Lose,
            "□" => Outcome::WinWithoutPlaying,
            "■" => Outcome::LoseWithoutPlaying,
            _ => Outcome::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Win => "win",
            Outcome::Lose => "lose",
            Outcome::WinWithoutPlaying => "win without playing",
            Outcome::LoseWithoutPlaying => "lose without playing",
            Outcome::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side of a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Player page id, or `"n/a"` when the cell has no player link
    pub id: String,
    /// Cell text as published, whitespace included
    pub name: String,
    pub result: Outcome,
}

/// A single game from the monthly results table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub match_name: String,
    #[serde(with = "slash_date")]
    pub begin_date: NaiveDate,
    #[serde(with = "slash_date")]
    pub end_date: NaiveDate,
    pub first_player: Player,
    pub second_player: Player,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub note: String,
}

impl Match {
    /// True when the game was played on a single day
    pub fn is_single_day(&self) -> bool {
        self.begin_date == self.end_date
    }
}

/// `YYYY/MM/DD` date format used in the output records
pub mod slash_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y/%m/%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(d)?;
        NaiveDate::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Unexpected html structure: expected 4 result cells in match row, found {0}")]
    UnexpectedCellCount(usize),

    #[error("Unrecognized date row: {0:?}")]
    MalformedDate(String),

    #[error("Unrecognized year heading: {0:?}")]
    MalformedYear(String),

    #[error("Results table not found")]
    MissingTable,

    #[error("Match row appears before any date row")]
    MissingDateRange,

    #[error("Invalid link {href:?}: {source}")]
    InvalidUrl {
        href: String,
        #[source]
        source: url::ParseError,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("No cached data for {0} (offline mode)")]
    Offline(String),

    #[error("Invalid month {0:?}, expected YYYYMM")]
    InvalidMonth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScrapeError {
    /// Whether the error means the page layout no longer matches the parser
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ScrapeError::UnexpectedCellCount(_)
                | ScrapeError::MalformedDate(_)
                | ScrapeError::MalformedYear(_)
                | ScrapeError::MissingTable
                | ScrapeError::MissingDateRange
                | ScrapeError::InvalidUrl { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    pub fetch: FetchConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub host: String,
    /// First month with published results
    pub since_year: i32,
    pub since_month: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    pub cache_dir: Option<String>,
    pub offline: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source: SourceConfig {
                host: DEFAULT_HOST.to_string(),
                since_year: 2006,
                since_month: 4,
            },
            fetch: FetchConfig {
                user_agent: "shogi-results/0.1".to_string(),
                timeout_secs: 30,
                cache_dir: None,
                offline: false,
            },
            output: OutputConfig {
                dir: "results".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScrapeError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| ScrapeError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ScrapeError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
