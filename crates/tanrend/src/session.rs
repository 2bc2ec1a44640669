//! One user's search results and weekly schedule.
//!
//! The session is the caller the core components expect: it resets the row
//! mapper and clears placements before each new search, and turns row
//! selections into placements.

use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::SessionError;
use crate::filter::{filter_rows, FilterSpec, FilteredResult};
use crate::record::{CourseRecord, FieldKey, RawRow, RowMapper};
use crate::schedule::{Schedule, ScheduleEvent};

/// A placed event together with its current conflict flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventView {
    #[serde(flatten)]
    pub event: ScheduleEvent,
    pub conflict: bool,
}

/// Whether a toggle placed or removed the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "event", rename_all = "camelCase")]
pub enum Selection {
    Placed(ScheduleEvent),
    Removed(ScheduleEvent),
}

/// Search results plus the schedule built from them.
#[derive(Debug, Default)]
pub struct Session {
    mapper: RowMapper,
    result: FilteredResult,
    schedule: Schedule,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current result set with a freshly scraped table.
    ///
    /// Previous placements are dropped and ids restart at 0. On a
    /// [`SessionError::Shape`] the previous results and schedule are kept.
    ///
    /// # Arguments
    /// * `rows` - Scraped rows, header row first
    /// * `spec` - Filter configuration for this search
    pub fn load(
        &mut self,
        rows: &[RawRow],
        spec: &FilterSpec,
    ) -> Result<&FilteredResult, SessionError> {
        self.mapper.reset();
        let records = self.mapper.map_table(rows)?;

        self.schedule.clear();
        self.result = filter_rows(&records, spec);

        info!(
            rows = records.len(),
            accepted = self.result.accepted.len(),
            rejected = self.result.rejected_count,
            "Loaded search results"
        );
        Ok(&self.result)
    }

    /// The current search result.
    pub fn result(&self) -> &FilteredResult {
        &self.result
    }

    /// Accepted record with the given id.
    pub fn record(&self, id: u64) -> Option<&CourseRecord> {
        self.result.accepted.iter().find(|r| r.id == id)
    }

    /// Places record `id` onto the schedule.
    pub fn select(&mut self, id: u64) -> Result<ScheduleEvent, SessionError> {
        let record = self.record(id).ok_or(SessionError::UnknownRecord { id })?;
        let schedule_text = record
            .get(FieldKey::Schedule)
            .ok_or(SessionError::MissingField {
                id,
                field: FieldKey::Schedule,
            })?
            .to_string();
        let title = event_title(record);

        self.schedule.place(id, title, &schedule_text).map_err(|e| {
            if e.is_user_facing() {
                warn!(id, error = %e, "Could not place course");
            } else {
                error!(id, error = %e, "Schedule rejected placement");
            }
            SessionError::from(e)
        })
    }

    /// Removes event `id` from the schedule.
    pub fn deselect(&mut self, id: u64) -> Result<ScheduleEvent, SessionError> {
        Ok(self.schedule.remove(id)?)
    }

    /// Places the record if it isn't placed yet, removes it otherwise.
    pub fn toggle(&mut self, id: u64) -> Result<Selection, SessionError> {
        if self.schedule.contains(id) {
            self.deselect(id).map(Selection::Removed)
        } else {
            self.select(id).map(Selection::Placed)
        }
    }

    /// Every placed event with its conflict flag, for rendering.
    pub fn events(&self) -> Vec<EventView> {
        self.schedule
            .all()
            .into_iter()
            .map(|event| EventView {
                // Every id from all() is placed, so NotFound cannot occur
                conflict: self.schedule.conflicts_for(event.id).unwrap_or(false),
                event,
            })
            .collect()
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }
}

/// Event title: `#group - name - teacher`, skipping fields that are absent
/// or blank.
pub fn event_title(record: &CourseRecord) -> String {
    let group = record
        .get(FieldKey::Group)
        .filter(|g| !g.is_empty())
        .map(|g| format!("#{g}"));
    let name = record.get(FieldKey::Name).map(str::to_string);
    let teacher = record.get(FieldKey::Teacher).map(str::to_string);

    [group, name, teacher]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" - ")
}
