//! Row filter pipeline: column projection, empty-field rejection and
//! accent-insensitive pattern matching.

mod spec;

pub use spec::*;

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::normalize::fold;
use crate::record::{CourseRecord, FieldKey};

/// Outcome of one filter run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilteredResult {
    /// Records that survived every stage, in input order
    pub accepted: Vec<CourseRecord>,
    pub rejected_count: usize,
}

impl FilteredResult {
    /// Result-count badge text ("No result", "1 result", "3 results").
    pub fn summary(&self) -> String {
        match self.accepted.len() {
            0 => "No result".to_string(),
            1 => "1 result".to_string(),
            n => format!("{n} results"),
        }
    }
}

/// Compiled-program cap for a single filter pattern.
const PATTERN_SIZE_LIMIT: usize = 10 * (1 << 20);

/// A compiled unique filter.
///
/// `regex` is `None` when not even the literal form of the pattern could be
/// compiled; such a filter matches no visible value.
struct Matcher {
    field: FieldKey,
    regex: Option<Regex>,
}

impl Matcher {
    /// Compiles `pattern` as a case-insensitive regex over folded text.
    ///
    /// An invalid regex is matched literally instead so filtering cannot fail.
    fn compile(field: FieldKey, pattern: &str) -> Self {
        Self::compile_with_limit(field, pattern, PATTERN_SIZE_LIMIT)
    }

    fn compile_with_limit(field: FieldKey, pattern: &str, size_limit: usize) -> Self {
        let folded = fold(pattern);
        let build = |source: &str| {
            RegexBuilder::new(source)
                .case_insensitive(true)
                .size_limit(size_limit)
                .build()
        };

        let regex = build(&folded)
            .or_else(|e| {
                warn!(
                    field = %field,
                    pattern = %pattern,
                    error = %e,
                    "Invalid filter pattern, matching literally"
                );
                build(&regex::escape(&folded))
            })
            .map_err(|e| {
                error!(
                    field = %field,
                    error = %e,
                    "Filter pattern cannot be compiled, rejecting every row"
                );
            })
            .ok();

        Self { field, regex }
    }

    /// Excluded fields pass vacuously.
    fn matches(&self, record: &CourseRecord) -> bool {
        match (record.get(self.field), &self.regex) {
            (Some(value), Some(regex)) => regex.is_match(&fold(value)),
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}

/// Runs the three-stage filter over `records`.
///
/// # Arguments
/// * `records` - Mapped records, in table order
/// * `spec` - Filter configuration for this search
///
/// # Returns
/// The surviving records (projected, in input order) and how many were dropped.
pub fn filter_rows(records: &[CourseRecord], spec: &FilterSpec) -> FilteredResult {
    let matchers: Vec<Matcher> = spec
        .unique_filters
        .iter()
        .filter_map(UniqueFilter::active)
        .map(|(field, pattern)| Matcher::compile(field, pattern))
        .collect();

    let accepted: Vec<CourseRecord> = records
        .iter()
        .filter_map(|record| {
            // Stage 1: column projection
            let projected = record.without(&spec.exclude_columns);

            // Stage 2: required fields
            let has_empty_required = projected
                .fields
                .iter()
                .any(|(key, value)| spec.exclude_empty.requires(*key) && value.trim().is_empty());
            if has_empty_required {
                return None;
            }

            // Stage 3: every pattern must match
            if !matchers.iter().all(|m| m.matches(&projected)) {
                return None;
            }

            Some(projected)
        })
        .collect();

    let rejected_count = records.len() - accepted.len();
    debug!(
        input = records.len(),
        accepted = accepted.len(),
        rejected = rejected_count,
        patterns = matchers.len(),
        "Filtered timetable rows"
    );

    FilteredResult {
        accepted,
        rejected_count,
    }
}
