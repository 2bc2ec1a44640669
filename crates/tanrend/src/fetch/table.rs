//! Extraction of the `#resulttable` rows from a timetable search page.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use crate::error::FetchError;
use crate::normalize::clean;
use crate::record::RawRow;

// Static selectors for parsing - compiled once
static TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table#resulttable").unwrap());
static ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CELL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th, td").unwrap());

/// Extracts every row of the result table, header row first.
///
/// Cell text is whitespace-collapsed; no other interpretation happens here.
pub fn extract_rows(html: &str) -> Result<Vec<RawRow>, FetchError> {
    let document = Html::parse_document(html);
    let table = document
        .select(&TABLE_SELECTOR)
        .next()
        .ok_or(FetchError::MissingTable)?;

    Ok(table.select(&ROW_SELECTOR).map(|row| row_cells(&row)).collect())
}

fn row_cells(row: &ElementRef) -> RawRow {
    row.select(&CELL_SELECTOR)
        .map(|cell| clean(&cell.text().collect::<String>()))
        .collect()
}
