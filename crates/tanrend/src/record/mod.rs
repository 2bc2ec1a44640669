/// Maps scraped timetable rows onto named course records
mod types;

pub use types::*;

use crate::error::ShapeError;
use std::collections::BTreeMap;
use tracing::debug;

/// Course type codes the timetable spells out, and their short form.
///
/// `elõadás` is how the page's legacy encoding renders `előadás`.
const COURSE_TYPE_CODES: &[(&str, &str)] = &[
    ("gyakorlat", "GY"),
    ("előadás", "EA"),
    ("elõadás", "EA"),
];

/// Returns the short code for a spelled-out course type, if it has one.
pub fn canonical_course_type(value: &str) -> Option<&'static str> {
    COURSE_TYPE_CODES
        .iter()
        .find(|(long, _)| *long == value)
        .map(|(_, short)| *short)
}

/// Turns raw rows into [`CourseRecord`]s, handing out sequential ids.
///
/// The counter belongs to the mapper; call [`RowMapper::reset`] before the
/// rows of a new search so ids restart at 0.
#[derive(Debug, Default)]
pub struct RowMapper {
    next_id: u64,
}

impl RowMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restarts id assignment at 0.
    pub fn reset(&mut self) {
        self.next_id = 0;
    }

    /// The id the next successfully mapped row will get.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Maps one row onto the fixed field order.
    ///
    /// # Arguments
    /// * `row` - Cell strings in table column order
    ///
    /// # Returns
    /// * `Ok(CourseRecord)` - Trimmed fields with the course type canonicalized
    /// * `Err(ShapeError)` - If the row does not have exactly 13 cells
    pub fn map_row<S: AsRef<str>>(&mut self, row: &[S]) -> Result<CourseRecord, ShapeError> {
        if row.len() != FieldKey::COUNT {
            return Err(ShapeError {
                expected: FieldKey::COUNT,
                actual: row.len(),
            });
        }

        let mut fields = BTreeMap::new();
        for (key, cell) in FieldKey::ALL.into_iter().zip(row) {
            let value = cell.as_ref().trim();
            let value = match key {
                FieldKey::Type => canonical_course_type(value).unwrap_or(value),
                _ => value,
            };
            fields.insert(key, value.to_string());
        }

        let id = self.next_id;
        self.next_id += 1;

        Ok(CourseRecord { id, fields })
    }

    /// Maps a whole scraped table, skipping the header row at index 0.
    ///
    /// Stops at the first malformed row; a broken row means the page layout
    /// changed and the whole result is unusable.
    pub fn map_table(&mut self, rows: &[RawRow]) -> Result<Vec<CourseRecord>, ShapeError> {
        let records = rows
            .iter()
            .skip(1)
            .map(|row| self.map_row(row))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(records = records.len(), "Mapped timetable rows");
        Ok(records)
    }
}
