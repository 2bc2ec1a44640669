/// Filter configuration submitted with a search
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

use crate::record::FieldKey;

/// Which rows to drop because of empty cells.
///
/// Deserializes from `"allEmpty"` or from a list of fields. A list that also
/// contains `"allEmpty"` (the page posted it as one checkbox of the group)
/// means [`ExcludeEmpty::All`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExcludeEmpty {
    /// Every field except `comment` must be non-empty
    All(AllEmpty),
    /// Only the listed fields must be non-empty
    Fields(BTreeSet<FieldKey>),
}

/// Marker for the `"allEmpty"` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllEmpty {
    #[serde(rename = "allEmpty")]
    AllEmpty,
}

impl ExcludeEmpty {
    pub fn all() -> Self {
        ExcludeEmpty::All(AllEmpty::AllEmpty)
    }

    /// Returns true if an empty `key` disqualifies a row.
    pub fn requires(&self, key: FieldKey) -> bool {
        match self {
            ExcludeEmpty::All(_) => key != FieldKey::Comment,
            ExcludeEmpty::Fields(fields) => fields.contains(&key),
        }
    }
}

impl<'de> Deserialize<'de> for ExcludeEmpty {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Entry {
            All(AllEmpty),
            Field(FieldKey),
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            All(AllEmpty),
            List(Vec<Entry>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::All(_) => Ok(ExcludeEmpty::all()),
            Repr::List(entries) => {
                let mut fields = BTreeSet::new();
                for entry in entries {
                    match entry {
                        Entry::All(_) => return Ok(ExcludeEmpty::all()),
                        Entry::Field(key) => {
                            fields.insert(key);
                        }
                    }
                }
                Ok(ExcludeEmpty::Fields(fields))
            }
        }
    }
}

impl Default for ExcludeEmpty {
    fn default() -> Self {
        ExcludeEmpty::Fields(BTreeSet::new())
    }
}

/// A single "field must contain pattern" filter.
///
/// A filter whose field or pattern is blank does nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub field: Option<FieldKey>,
    #[serde(default)]
    pub pattern: String,
}

impl UniqueFilter {
    pub fn new(field: FieldKey, pattern: impl Into<String>) -> Self {
        Self {
            field: Some(field),
            pattern: pattern.into(),
        }
    }

    /// The field and pattern, or `None` if this filter is a no-op.
    pub fn active(&self) -> Option<(FieldKey, &str)> {
        match self.field {
            Some(field) if !self.pattern.is_empty() => Some((field, self.pattern.as_str())),
            _ => None,
        }
    }
}

/// Select elements post an empty string when nothing is chosen.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<FieldKey>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(name) => name.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Everything the row filter pipeline is configured with.
///
/// Missing sections deserialize to "no filtering of that kind".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    pub exclude_columns: BTreeSet<FieldKey>,
    pub exclude_empty: ExcludeEmpty,
    pub unique_filters: Vec<UniqueFilter>,
}

impl FilterSpec {
    /// The column set the timetable page hid by default.
    pub fn compact() -> Self {
        Self {
            exclude_columns: [
                FieldKey::Unused,
                FieldKey::Weeks,
                FieldKey::Comment,
                FieldKey::Part,
                FieldKey::LectureHours,
                FieldKey::PracticeHours,
            ]
            .into_iter()
            .collect(),
            ..Self::default()
        }
    }

    /// Returns true if this spec filters nothing.
    pub fn is_empty(&self) -> bool {
        self.exclude_columns.is_empty()
            && self.exclude_empty == ExcludeEmpty::default()
            && self.unique_filters.iter().all(|f| f.active().is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sections_mean_no_filtering() {
        let spec: FilterSpec = serde_json::from_str("{}").unwrap();
        assert!(spec.is_empty());
        assert_eq!(spec, FilterSpec::default());
    }

    #[test]
    fn test_parse_all_empty_sentinel() {
        let spec: FilterSpec = serde_json::from_str(r#"{"excludeEmpty": "allEmpty"}"#).unwrap();
        assert_eq!(spec.exclude_empty, ExcludeEmpty::all());
        assert!(spec.exclude_empty.requires(FieldKey::Teacher));
        assert!(!spec.exclude_empty.requires(FieldKey::Comment));
    }

    #[test]
    fn test_all_empty_inside_field_list() {
        let spec: FilterSpec =
            serde_json::from_str(r#"{"excludeEmpty": ["allEmpty", "teacher"]}"#).unwrap();
        assert_eq!(spec.exclude_empty, ExcludeEmpty::all());

        let spec: FilterSpec =
            serde_json::from_str(r#"{"excludeEmpty": ["course-time", "allEmpty"]}"#).unwrap();
        assert_eq!(spec.exclude_empty, ExcludeEmpty::all());
    }

    #[test]
    fn test_unknown_exclude_empty_entry_is_rejected() {
        let parsed = serde_json::from_str::<FilterSpec>(r#"{"excludeEmpty": ["nope"]}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_exclude_empty_serializes_back() {
        let json = serde_json::to_value(ExcludeEmpty::all()).unwrap();
        assert_eq!(json, "allEmpty");
        let back: ExcludeEmpty = serde_json::from_value(json).unwrap();
        assert_eq!(back, ExcludeEmpty::all());
    }

    #[test]
    fn test_parse_explicit_fields() {
        let spec: FilterSpec = serde_json::from_str(
            r#"{
                "excludeColumns": ["unused", "course-weeks"],
                "excludeEmpty": ["teacher", "schedule"],
                "uniqueFilters": [
                    {"field": "name", "pattern": "alg"},
                    {"field": "", "pattern": "ignored"},
                    {"field": "teacher"}
                ]
            }"#,
        )
        .unwrap();

        assert!(spec.exclude_columns.contains(&FieldKey::Weeks));
        assert!(spec.exclude_empty.requires(FieldKey::Schedule));
        assert!(!spec.exclude_empty.requires(FieldKey::Name));
        assert_eq!(spec.unique_filters.len(), 3);
        assert_eq!(spec.unique_filters[0].active(), Some((FieldKey::Name, "alg")));
        assert_eq!(spec.unique_filters[1].active(), None);
        assert_eq!(spec.unique_filters[2].active(), None);
    }

    #[test]
    fn test_compact_preset() {
        let spec = FilterSpec::compact();
        assert_eq!(spec.exclude_columns.len(), 6);
        assert!(!spec.exclude_columns.contains(&FieldKey::Schedule));
    }
}
