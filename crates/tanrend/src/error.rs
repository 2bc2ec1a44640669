//! Error types for row mapping, scheduling, fetching and the session layer.

use thiserror::Error;

use crate::record::FieldKey;

/// A raw row did not have the fixed column count of the timetable table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Malformed row: expected {expected} cells, got {actual}")]
pub struct ShapeError {
    pub expected: usize,
    pub actual: usize,
}

/// Errors raised while parsing schedule text or mutating the schedule.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The day name is not one of the five weekdays
    #[error("Unknown day: {day}")]
    UnknownDay { day: String },

    /// The text is not shaped like `<day> HH:MM-HH:MM`
    #[error("Malformed schedule text {text:?}: {reason}")]
    MalformedSchedule { text: String, reason: String },

    /// An event with this id is already placed
    #[error("Event {id} is already placed")]
    DuplicateId { id: u64 },

    /// No event with this id is placed
    #[error("Event {id} is not placed")]
    NotFound { id: u64 },
}

impl ScheduleError {
    /// Returns true if the error stems from bad course data rather than
    /// misuse of the schedule API.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            ScheduleError::UnknownDay { .. } | ScheduleError::MalformedSchedule { .. }
        )
    }
}

/// Errors from the timetable fetch collaborator.
#[derive(Debug, Error, Clone)]
pub enum FetchError {
    /// Network/HTTP request failed
    #[error("Network error: {message}")]
    Network { message: String },

    /// Server answered with a non-success status
    #[error("Timetable request failed with status {status}")]
    Status { status: u16 },

    /// Server answered with an empty body
    #[error("No response from server")]
    EmptyResponse,

    /// The page did not contain the result table
    #[error("Result table not found in response")]
    MissingTable,

    /// URL parsing/construction failed
    #[error("URL error: {message}")]
    Url { message: String },
}

impl FetchError {
    /// Returns true if this error is potentially transient.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Network { .. } | FetchError::EmptyResponse => true,
            FetchError::Status { status } => *status >= 500,
            FetchError::MissingTable | FetchError::Url { .. } => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        FetchError::Url {
            message: err.to_string(),
        }
    }
}

/// Errors surfaced by a [`crate::session::Session`].
#[derive(Debug, Error, Clone)]
pub enum SessionError {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The id does not belong to the current result set
    #[error("Record {id} is not in the current result set")]
    UnknownRecord { id: u64 },

    /// The record lacks a field needed for placement (e.g. it was excluded)
    #[error("Record {id} has no {field} field")]
    MissingField { id: u64, field: FieldKey },
}
