//! Player and note cell extraction

use super::row::child_elements;
use crate::{Outcome, Player, Result, ScrapeError};
use scraper::{ElementRef, Selector};
use std::sync::OnceLock;
use url::Url;

/// Id used when a player cell has no player link
pub const UNKNOWN_PLAYER_ID: &str = "n/a";

const PLAYER_PATH_PREFIX: &str = "/player/";
const PLAYER_PATH_SUFFIX: &str = ".html";

fn anchor_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("a").expect("valid selector"))
}

/// `href` of the first anchor inside `cell`, if that anchor has one
fn first_link<'a>(cell: &ElementRef<'a>) -> Option<&'a str> {
    cell.select(anchor_selector())
        .next()
        .and_then(|a| a.value().attr("href"))
}

/// Full text content of an element, untouched
pub fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect()
}

/// Build a player from a name cell and an already resolved outcome
pub fn extract_player(cell: &ElementRef, result: Outcome) -> Player {
    let id = match first_link(cell) {
        Some(href) => player_id(href),
        None => UNKNOWN_PLAYER_ID.to_string(),
    };

    Player {
        id,
        name: cell_text(cell),
        result,
    }
}

/// Strip `/player/` and `.html` from a player page link
fn player_id(href: &str) -> String {
    let id = href.strip_prefix(PLAYER_PATH_PREFIX).unwrap_or(href);
    id.strip_suffix(PLAYER_PATH_SUFFIX).unwrap_or(id).to_string()
}

/// Note text from the row's last cell, followed by its link when present
pub fn extract_note(row: &ElementRef, host: &str) -> Result<String> {
    let Some(cell) = child_elements(row).last() else {
        return Ok(String::new());
    };

    let mut note = cell_text(&cell);
    if let Some(href) = first_link(&cell) {
        note.push(' ');
        note.push_str(&normalize_url(href, host)?);
    }
    Ok(note)
}

/// Make a link absolute.
///
/// Links that already carry a scheme are returned verbatim. Relative links
/// are resolved against `https://<host>/`, keeping path, query and fragment.
pub fn normalize_url(href: &str, host: &str) -> Result<String> {
    let invalid = |source| ScrapeError::InvalidUrl {
        href: href.to_string(),
        source,
    };

    match Url::parse(href) {
        Ok(_) => Ok(href.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse(&format!("https://{}/", host)).map_err(invalid)?;
            let mut resolved = base.join(href).map_err(invalid)?;
            // protocol-relative links keep their path but move to the canonical host
            resolved.set_host(Some(host)).map_err(invalid)?;
            Ok(resolved.to_string())
        }
        Err(e) => Err(invalid(e)),
    }
}
