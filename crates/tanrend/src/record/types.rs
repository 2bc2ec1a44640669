/// Types for timetable rows and course records
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A row exactly as scraped from the result table, one string per cell.
pub type RawRow = Vec<String>;

/// Canonical column of the timetable result table.
///
/// Variant order is the positional order of the scraped table and must not
/// change: [`FieldKey::ALL`] is what maps a [`RawRow`] onto named fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    Unused,
    #[serde(alias = "course-name")]
    Name,
    #[serde(alias = "course-code")]
    Code,
    #[serde(alias = "course-time")]
    Schedule,
    #[serde(alias = "course-place")]
    Place,
    #[serde(alias = "course-weeks")]
    Weeks,
    #[serde(alias = "course-comment")]
    Comment,
    #[serde(alias = "course-type")]
    Type,
    #[serde(alias = "course-group")]
    Group,
    #[serde(alias = "course-part")]
    Part,
    #[serde(alias = "course-ea")]
    LectureHours,
    #[serde(alias = "course-gy")]
    PracticeHours,
    #[serde(alias = "course-teacher")]
    Teacher,
}

impl FieldKey {
    /// Every field, in table column order.
    pub const ALL: [FieldKey; 13] = [
        FieldKey::Unused,
        FieldKey::Name,
        FieldKey::Code,
        FieldKey::Schedule,
        FieldKey::Place,
        FieldKey::Weeks,
        FieldKey::Comment,
        FieldKey::Type,
        FieldKey::Group,
        FieldKey::Part,
        FieldKey::LectureHours,
        FieldKey::PracticeHours,
        FieldKey::Teacher,
    ];

    /// Number of cells a well-formed row has.
    pub const COUNT: usize = Self::ALL.len();

    /// Canonical identifier, as used in filter configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKey::Unused => "unused",
            FieldKey::Name => "name",
            FieldKey::Code => "code",
            FieldKey::Schedule => "schedule",
            FieldKey::Place => "place",
            FieldKey::Weeks => "weeks",
            FieldKey::Comment => "comment",
            FieldKey::Type => "type",
            FieldKey::Group => "group",
            FieldKey::Part => "part",
            FieldKey::LectureHours => "lectureHours",
            FieldKey::PracticeHours => "practiceHours",
            FieldKey::Teacher => "teacher",
        }
    }

    /// Class name the timetable page front end used for this column.
    pub fn css_class(self) -> &'static str {
        match self {
            FieldKey::Unused => "unused",
            FieldKey::Name => "course-name",
            FieldKey::Code => "course-code",
            FieldKey::Schedule => "course-time",
            FieldKey::Place => "course-place",
            FieldKey::Weeks => "course-weeks",
            FieldKey::Comment => "course-comment",
            FieldKey::Type => "course-type",
            FieldKey::Group => "course-group",
            FieldKey::Part => "course-part",
            FieldKey::LectureHours => "course-ea",
            FieldKey::PracticeHours => "course-gy",
            FieldKey::Teacher => "course-teacher",
        }
    }

    /// Column header label.
    pub fn label(self) -> &'static str {
        match self {
            FieldKey::Unused => "Unused",
            FieldKey::Name => "Course name",
            FieldKey::Code => "Code",
            FieldKey::Schedule => "Date",
            FieldKey::Place => "Place",
            FieldKey::Weeks => "Weeks",
            FieldKey::Comment => "Comment",
            FieldKey::Type => "Type",
            FieldKey::Group => "Group",
            FieldKey::Part => "Part",
            FieldKey::LectureHours => "EA",
            FieldKey::PracticeHours => "GY",
            FieldKey::Teacher => "Teacher",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown field key: {0}")]
pub struct UnknownFieldKey(pub String);

impl FromStr for FieldKey {
    type Err = UnknownFieldKey;

    /// Accepts both the canonical identifier and the legacy class name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s || k.css_class() == s)
            .ok_or_else(|| UnknownFieldKey(s.to_string()))
    }
}

/// A mapped, id-tagged course row.
///
/// Fields removed by column projection are simply absent from `fields`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseRecord {
    pub id: u64,
    #[serde(flatten)]
    pub fields: BTreeMap<FieldKey, String>,
}

impl CourseRecord {
    /// Value of `key`, or `None` if the field was excluded.
    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.fields.get(&key).map(String::as_str)
    }

    /// Returns true if `key` is still visible on this record.
    pub fn has(&self, key: FieldKey) -> bool {
        self.fields.contains_key(&key)
    }

    /// Returns a copy of this record without the given fields.
    pub fn without<'a, I>(&self, keys: I) -> CourseRecord
    where
        I: IntoIterator<Item = &'a FieldKey>,
    {
        let mut projected = self.clone();
        for key in keys {
            projected.fields.remove(key);
        }
        projected
    }
}
