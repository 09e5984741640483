//! Results table parsing
//!
//! The monthly table mixes three undeclared row shapes. Rows are classified
//! by their number of child cells and folded in document order, carrying the
//! current year, date range and match name forward.

pub mod cells;
pub mod date;
pub mod row;
pub mod scanner;

pub use date::{parse_date_range, parse_year, DateRange};
pub use row::RowKind;
pub use scanner::TableScanner;
