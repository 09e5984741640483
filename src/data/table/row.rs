//! Row shape classification

use scraper::ElementRef;

/// Child count of a row that introduces a new match name
const MATCH_NAME_CELLS: usize = 6;

/// Structural shape of a results table row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Announces the day(s) the following rows were played on
    DateRange,
    /// Names a new match and is itself a played game
    MatchName,
    /// A played game under the current match name
    Continuation,
}

impl RowKind {
    /// Classify a row by its number of direct child cells
    pub fn classify(child_count: usize) -> Self {
        match child_count {
            1 => RowKind::DateRange,
            MATCH_NAME_CELLS => RowKind::MatchName,
            _ => RowKind::Continuation,
        }
    }

    /// Classify a `<tr>` element
    pub fn of(row: &ElementRef) -> Self {
        Self::classify(child_elements(row).count())
    }

    pub fn is_data(&self) -> bool {
        !matches!(self, RowKind::DateRange)
    }
}

/// Direct element children, skipping text and comment nodes
pub fn child_elements<'a>(el: &ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    el.children().filter_map(ElementRef::wrap)
}
