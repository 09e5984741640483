//! Scraper for the monthly results pages on shogi.or.jp
//!
//! Supports caching HTML files for offline runs and reduced load.

use crate::data::months::YearMonth;
use crate::data::table::TableScanner;
use crate::{FetchConfig, Match, Result, ScrapeError, DEFAULT_HOST};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fetches monthly result pages and scans them into matches
pub struct ResultsScraper {
    client: reqwest::blocking::Client,
    host: String,
    scanner: TableScanner,
    /// Optional cache directory for offline HTML files
    cache_dir: Option<PathBuf>,
    /// If true, only use cache (no network requests)
    offline_only: bool,
}

impl ResultsScraper {
    pub fn new() -> Result<Self> {
        Self::from_config(DEFAULT_HOST, &crate::Config::default().fetch)
    }

    /// Build a scraper for `host` using the fetch settings from config
    pub fn from_config(host: &str, fetch: &FetchConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(fetch.user_agent.as_str())
            .timeout(Duration::from_secs(fetch.timeout_secs))
            .build()?;

        let mut scraper = ResultsScraper {
            client,
            host: host.to_string(),
            scanner: TableScanner::new().with_host(host),
            cache_dir: None,
            offline_only: fetch.offline,
        };
        if let Some(dir) = &fetch.cache_dir {
            scraper = scraper.with_cache(dir);
        }
        Ok(scraper)
    }

    /// Create scraper with a cache directory
    pub fn with_cache<P: AsRef<Path>>(mut self, cache_dir: P) -> Self {
        self.cache_dir = Some(cache_dir.as_ref().to_path_buf());
        self
    }

    /// Set offline-only mode (no network requests, cache must exist)
    pub fn offline_only(mut self, offline: bool) -> Self {
        self.offline_only = offline;
        self
    }

    /// Results page for a month
    pub fn month_url(&self, month: YearMonth) -> String {
        format!("https://{}/game/result/{}.html", self.host, month)
    }

    /// Get the cache file path for a URL
    fn cache_path(&self, url: &str) -> Option<PathBuf> {
        self.cache_dir.as_ref().map(|dir| {
            let filename = url
                .replace("https://", "")
                .replace("http://", "")
                .replace('/', "_")
                .replace('?', "_");
            dir.join(filename)
        })
    }

    /// Load HTML from cache if available
    fn load_from_cache(&self, url: &str) -> Option<String> {
        let path = self.cache_path(url)?;
        if path.exists() {
            log::debug!("Loading from cache: {}", path.display());
            std::fs::read_to_string(&path).ok()
        } else {
            None
        }
    }

    /// Save HTML to cache
    fn save_to_cache(&self, url: &str, html: &str) -> Result<()> {
        if let Some(path) = self.cache_path(url) {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, html)?;
            log::debug!("Saved to cache: {}", path.display());
        }
        Ok(())
    }

    /// Fetch a page from cache or network
    fn fetch_html(&self, url: &str) -> Result<String> {
        if let Some(html) = self.load_from_cache(url) {
            return Ok(html);
        }

        if self.offline_only {
            return Err(ScrapeError::Offline(url.to_string()));
        }

        log::debug!("Fetching {}", url);
        let response = self.client.get(url).send()?;

        if !response.status().is_success() {
            return Err(ScrapeError::HttpStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let html = response.text()?;

        if let Err(e) = self.save_to_cache(url, &html) {
            log::warn!("Failed to cache {}: {}", url, e);
        }

        Ok(html)
    }

    /// Fetch and scan a single month
    pub fn fetch_month(&self, month: YearMonth) -> Result<Vec<Match>> {
        let url = self.month_url(month);
        log::info!("Fetching {} results from {}", month, url);

        let html = self.fetch_html(&url)?;
        let matches = self.scanner.scan_html(&html)?;

        log::info!("  Found {} matches", matches.len());
        Ok(matches)
    }

    /// Scan a saved results page
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Match>> {
        let html = std::fs::read_to_string(path.as_ref())?;
        self.scanner.scan_html(&html)
    }
}
