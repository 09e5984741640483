//! Results table scanner
//!
//! Walks the rows of the monthly results table in document order. Date rows
//! and match-name rows update the scan context; every data row becomes one
//! [`Match`] stamped with the nearest preceding headers.

use super::cells::{cell_text, extract_note, extract_player};
use super::date::{parse_date_range, parse_year, DateRange};
use super::row::{child_elements, RowKind};
use crate::{Match, Outcome, Result, ScrapeError, DEFAULT_HOST};
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

const YEAR_HEADING: &str = ".headingElementsA01";
const RESULTS_BODY: &str = ".tableElements01 tbody";
const RESULT_CELL: &str = "td.tac";

/// Number of result-bearing cells in a match row
const RESULT_CELLS: usize = 4;

fn selector(cell: &'static OnceLock<Selector>, css: &str) -> &'static Selector {
    cell.get_or_init(|| Selector::parse(css).expect("valid selector"))
}

fn year_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    selector(&SEL, YEAR_HEADING)
}

fn body_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    selector(&SEL, RESULTS_BODY)
}

fn result_cell_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    selector(&SEL, RESULT_CELL)
}

/// Fold state carried across rows
#[derive(Debug, Clone)]
struct ScanContext {
    year: i32,
    match_name: String,
    dates: Option<DateRange>,
}

impl ScanContext {
    fn new(year: i32) -> Self {
        ScanContext {
            year,
            match_name: String::new(),
            dates: None,
        }
    }

    /// Apply one row, returning the match it records if it is a data row
    fn advance(&mut self, row: &ElementRef, host: &str) -> Result<Option<Match>> {
        let kind = RowKind::of(row);
        log::trace!("row classified as {:?}", kind);

        match kind {
            RowKind::DateRange => {
                self.dates = Some(parse_date_range(&cell_text(row), self.year)?);
                return Ok(None);
            }
            RowKind::MatchName => {
                if let Some(first) = child_elements(row).next() {
                    self.match_name = cell_text(&first).trim().to_string();
                }
            }
            RowKind::Continuation => {}
        }

        let dates = self.dates.ok_or(ScrapeError::MissingDateRange)?;
        parse_match_row(row, &self.match_name, dates, host).map(Some)
    }
}

/// Build a match from a data row.
///
/// The four `td.tac` cells are, in order: first player's glyph, first
/// player's name, second player's name, second player's glyph.
pub fn parse_match_row(
    row: &ElementRef,
    match_name: &str,
    dates: DateRange,
    host: &str,
) -> Result<Match> {
    let cells: Vec<_> = row.select(result_cell_selector()).collect();
    if cells.len() != RESULT_CELLS {
        return Err(ScrapeError::UnexpectedCellCount(cells.len()));
    }

    let first_result = resolve_outcome(&cells[0]);
    let first_player = extract_player(&cells[1], first_result);

    let second_result = resolve_outcome(&cells[3]);
    let second_player = extract_player(&cells[2], second_result);

    let note = extract_note(row, host)?;

    Ok(Match {
        match_name: match_name.to_string(),
        begin_date: dates.begin,
        end_date: dates.end,
        first_player,
        second_player,
        note,
    })
}

fn resolve_outcome(cell: &ElementRef) -> Outcome {
    let glyph = cell_text(cell);
    let outcome = Outcome::from_glyph(&glyph);
    if outcome == Outcome::Unknown {
        log::debug!("Unrecognized result glyph {:?}", glyph);
    }
    outcome
}

/// Scanner for the monthly results page
#[derive(Debug, Clone)]
pub struct TableScanner {
    host: String,
}

impl Default for TableScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl TableScanner {
    pub fn new() -> Self {
        TableScanner {
            host: DEFAULT_HOST.to_string(),
        }
    }

    /// Resolve relative note links against a different host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Parse an HTML page and scan its results table
    pub fn scan_html(&self, html: &str) -> Result<Vec<Match>> {
        let document = Html::parse_document(html);
        self.scan_document(&document)
    }

    /// Scan a parsed page.
    ///
    /// Any structural mismatch aborts the whole page; no partial output is
    /// returned.
    pub fn scan_document(&self, document: &Html) -> Result<Vec<Match>> {
        let heading = document
            .select(year_selector())
            .next()
            .ok_or_else(|| ScrapeError::MalformedYear(String::new()))?;
        let year = parse_year(&cell_text(&heading))?;

        let body = document
            .select(body_selector())
            .next()
            .ok_or(ScrapeError::MissingTable)?;

        let (_, matches) = child_elements(&body).try_fold(
            (ScanContext::new(year), Vec::new()),
            |(mut ctx, mut matches), row| {
                if let Some(m) = ctx.advance(&row, &self.host)? {
                    matches.push(m);
                }
                Ok::<_, ScrapeError>((ctx, matches))
            },
        )?;

        log::debug!("Scanned {} matches for {}", matches.len(), year);
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn page(year_heading: &str, rows: &str) -> String {
        format!(
            r#"<html><body>
<h2 class="headingElementsA01">{}</h2>
<table class="tableElements01">
<thead><tr><th>棋戦</th><th></th><th>対局者</th><th>対局者</th><th></th><th>備考</th></tr></thead>
<tbody>
{}
</tbody>
</table>
</body></html>"#,
            year_heading, rows
        )
    }

    const DATE_ROW: &str = r#"<tr><th colspan="6">4月10日</th></tr>"#;

    const NAME_ROW: &str = r#"<tr>
  <td>
    A League
  </td>
  <td class="tac">○</td>
  <td class="tac"><a href="/player/abc123.html">Taro Yamada</a></td>
  <td class="tac"><a href="/player/def456.html">Jiro Sato</a></td>
  <td class="tac">●</td>
  <td></td>
</tr>"#;

    const CONTINUATION_ROW: &str = r#"<tr>
  <td class="tac">□</td>
  <td class="tac">Saburo Ito</td>
  <td class="tac"><a href="/player/ghi789.html">Shiro Kato</a></td>
  <td class="tac">■</td>
  <td>不戦 <a href="/news/2010/04/notice.html">お知らせ</a></td>
</tr>"#;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_end_to_end() {
        let html = page(
            "2010年4月",
            &[DATE_ROW, NAME_ROW, CONTINUATION_ROW].join("\n"),
        );
        let matches = TableScanner::new().scan_html(&html).unwrap();
        assert_eq!(matches.len(), 2);

        let first = &matches[0];
        assert_eq!(first.match_name, "A League");
        assert_eq!(first.begin_date, ymd(2010, 4, 10));
        assert_eq!(first.end_date, ymd(2010, 4, 10));
        assert_eq!(first.first_player.id, "abc123");
        assert_eq!(first.first_player.name, "Taro Yamada");
        assert_eq!(first.first_player.result, Outcome::Win);
        assert_eq!(first.second_player.id, "def456");
        assert_eq!(first.second_player.result, Outcome::Lose);
        assert_eq!(first.note, "");

        let second = &matches[1];
        assert_eq!(second.match_name, "A League");
        assert_eq!(second.begin_date, ymd(2010, 4, 10));
        assert_eq!(second.end_date, ymd(2010, 4, 10));
        assert_eq!(second.first_player.id, "n/a");
        assert_eq!(second.first_player.name, "Saburo Ito");
        assert_eq!(second.first_player.result, Outcome::WinWithoutPlaying);
        assert_eq!(second.second_player.id, "ghi789");
        assert_eq!(second.second_player.result, Outcome::LoseWithoutPlaying);
        assert_eq!(
            second.note,
            "不戦 お知らせ https://www.shogi.or.jp/news/2010/04/notice.html"
        );

        let json = serde_json::to_value(&matches).unwrap();
        assert_eq!(json[0]["beginDate"], "2010/04/10");
        assert!(json[0].get("note").is_none());
        assert_eq!(json[1]["firstPlayer"]["result"], "win without playing");
    }

    #[test]
    fn test_headers_apply_to_following_rows() {
        let cup_row = NAME_ROW.replace("A League", "B Cup");
        let rows = [
            DATE_ROW,
            NAME_ROW,
            r#"<tr><th colspan="6">4月11・12日</th></tr>"#,
            CONTINUATION_ROW,
            cup_row.as_str(),
            CONTINUATION_ROW,
        ]
        .join("\n");
        let matches = TableScanner::new().scan_html(&page("2010年4月", &rows)).unwrap();

        let summary: Vec<_> = matches
            .iter()
            .map(|m| (m.match_name.as_str(), m.begin_date, m.end_date))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("A League", ymd(2010, 4, 10), ymd(2010, 4, 10)),
                ("A League", ymd(2010, 4, 11), ymd(2010, 4, 12)),
                ("B Cup", ymd(2010, 4, 11), ymd(2010, 4, 12)),
                ("B Cup", ymd(2010, 4, 11), ymd(2010, 4, 12)),
            ]
        );
    }

    #[test]
    fn test_continuation_before_any_name() {
        let rows = [DATE_ROW, CONTINUATION_ROW].join("\n");
        let matches = TableScanner::new().scan_html(&page("2010年4月", &rows)).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_name, "");
    }

    #[test]
    fn test_date_rows_emit_nothing() {
        let rows = [DATE_ROW, r#"<tr><th colspan="6">4月11日</th></tr>"#].join("\n");
        let matches = TableScanner::new().scan_html(&page("2010年4月", &rows)).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_malformed_date_aborts() {
        let rows = [
            DATE_ROW,
            NAME_ROW,
            r#"<tr><th colspan="6">April 10</th></tr>"#,
            CONTINUATION_ROW,
        ]
        .join("\n");
        let err = TableScanner::new()
            .scan_html(&page("2010年4月", &rows))
            .unwrap_err();
        assert!(matches!(err, ScrapeError::MalformedDate(ref t) if t == "April 10"));
    }

    #[test]
    fn test_wrong_result_cell_count_aborts() {
        let row = r#"<tr><td class="tac">○</td><td class="tac">a</td><td class="tac">●</td><td></td></tr>"#;
        let rows = [DATE_ROW, row].join("\n");
        let err = TableScanner::new()
            .scan_html(&page("2010年4月", &rows))
            .unwrap_err();
        assert!(matches!(err, ScrapeError::UnexpectedCellCount(3)));
    }

    #[test]
    fn test_data_row_before_date_row() {
        let err = TableScanner::new()
            .scan_html(&page("2010年4月", NAME_ROW))
            .unwrap_err();
        assert!(matches!(err, ScrapeError::MissingDateRange));
    }

    #[test]
    fn test_missing_year_and_table() {
        let err = TableScanner::new()
            .scan_html("<html><body><table class=\"tableElements01\"><tbody></tbody></table></body></html>")
            .unwrap_err();
        assert!(matches!(err, ScrapeError::MalformedYear(_)));

        let err = TableScanner::new()
            .scan_html("<html><body><h2 class=\"headingElementsA01\">2010年4月</h2></body></html>")
            .unwrap_err();
        assert!(matches!(err, ScrapeError::MissingTable));

        let err = TableScanner::new()
            .scan_html(&page("対局結果", DATE_ROW))
            .unwrap_err();
        assert!(matches!(err, ScrapeError::MalformedYear(_)));
    }

    #[test]
    fn test_unknown_glyph_is_not_fatal() {
        let row = CONTINUATION_ROW.replace('□', "－");
        let rows = [DATE_ROW, row.as_str()].join("\n");
        let matches = TableScanner::new().scan_html(&page("2010年4月", &rows)).unwrap();
        assert_eq!(matches[0].first_player.result, Outcome::Unknown);
        assert_eq!(matches[0].second_player.result, Outcome::LoseWithoutPlaying);
    }

    #[test]
    fn test_custom_host() {
        let rows = [DATE_ROW, CONTINUATION_ROW].join("\n");
        let scanner = TableScanner::new().with_host("mirror.example.org");
        let matches = scanner.scan_html(&page("2010年4月", &rows)).unwrap();
        assert!(matches[0]
            .note
            .ends_with("https://mirror.example.org/news/2010/04/notice.html"));
    }
}
