//! JSON output for scanned months

use super::months::YearMonth;
use crate::{Match, Result};
use std::path::{Path, PathBuf};

/// Output file for a month, e.g. `results/201804.json`
pub fn month_path<P: AsRef<Path>>(dir: P, month: YearMonth) -> PathBuf {
    dir.as_ref().join(format!("{}.json", month))
}

/// Write one month's matches as pretty-printed JSON, creating `dir` if needed
pub fn write_month<P: AsRef<Path>>(dir: P, month: YearMonth, matches: &[Match]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir.as_ref())?;
    let path = month_path(dir, month);
    let json = serde_json::to_string_pretty(matches)?;
    std::fs::write(&path, json)?;
    log::debug!("Wrote {} matches to {}", matches.len(), path.display());
    Ok(path)
}
