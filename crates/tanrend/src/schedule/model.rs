//! The weekly schedule: placed events and their time conflicts.

use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use super::parse::{parse_schedule, ClockTime};
use crate::error::ScheduleError;

/// A course placed onto the week.
///
/// `id` is the id of the course record it was created from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEvent {
    pub id: u64,
    /// 1 = Monday ... 5 = Friday
    pub day_index: u8,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub title: String,
}

impl ScheduleEvent {
    /// Half-open interval overlap on the same day.
    pub fn overlaps(&self, other: &ScheduleEvent) -> bool {
        self.day_index == other.day_index
            && self.start_time.minutes() < other.end_time.minutes()
            && other.start_time.minutes() < self.end_time.minutes()
    }
}

/// Placed events keyed by id.
#[derive(Debug, Default)]
pub struct Schedule {
    events: HashMap<u64, ScheduleEvent>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `schedule_text` and places a new event.
    ///
    /// # Arguments
    /// * `id` - Id of the originating course record
    /// * `title` - Text shown on the event
    /// * `schedule_text` - Schedule cell, e.g. `"Kedd 10:00-11:30"`
    ///
    /// # Returns
    /// * `Ok(ScheduleEvent)` - The placed event
    /// * `Err(ScheduleError)` - If the text does not parse or `id` is already placed
    pub fn place(
        &mut self,
        id: u64,
        title: impl Into<String>,
        schedule_text: &str,
    ) -> Result<ScheduleEvent, ScheduleError> {
        let parsed = parse_schedule(schedule_text)?;
        if self.events.contains_key(&id) {
            return Err(ScheduleError::DuplicateId { id });
        }

        let event = ScheduleEvent {
            id,
            day_index: parsed.day_index,
            start_time: parsed.start,
            end_time: parsed.end,
            title: title.into(),
        };

        debug!(
            id,
            day = event.day_index,
            start = %event.start_time,
            end = %event.end_time,
            "Placed event"
        );
        self.events.insert(id, event.clone());
        Ok(event)
    }

    /// Removes a placed event.
    pub fn remove(&mut self, id: u64) -> Result<ScheduleEvent, ScheduleError> {
        let event = self
            .events
            .remove(&id)
            .ok_or(ScheduleError::NotFound { id })?;
        debug!(id, "Removed event");
        Ok(event)
    }

    /// Returns true if another placed event overlaps event `id`.
    ///
    /// Always computed against the live set.
    pub fn conflicts_for(&self, id: u64) -> Result<bool, ScheduleError> {
        let event = self.events.get(&id).ok_or(ScheduleError::NotFound { id })?;
        Ok(self
            .events
            .values()
            .any(|other| other.id != id && event.overlaps(other)))
    }

    /// Snapshot of all events, ordered by day, start time and id.
    pub fn all(&self) -> Vec<ScheduleEvent> {
        let mut events: Vec<ScheduleEvent> = self.events.values().cloned().collect();
        events.sort_by_key(|e| (e.day_index, e.start_time.minutes(), e.id));
        events
    }

    pub fn get(&self, id: u64) -> Option<&ScheduleEvent> {
        self.events.get(&id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.events.contains_key(&id)
    }

    /// Drops every placement.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_events_conflict() {
        let mut schedule = Schedule::new();
        schedule.place(1, "A", "Szerda 10:00-11:30").unwrap();
        schedule.place(2, "B", "Szerda 11:00-12:00").unwrap();

        assert_eq!(schedule.conflicts_for(1), Ok(true));
        assert_eq!(schedule.conflicts_for(2), Ok(true));
    }

    #[test]
    fn test_touching_events_do_not_conflict() {
        let mut schedule = Schedule::new();
        schedule.place(1, "A", "Szerda 10:00-11:00").unwrap();
        schedule.place(2, "B", "Szerda 11:00-12:00").unwrap();

        assert_eq!(schedule.conflicts_for(1), Ok(false));
        assert_eq!(schedule.conflicts_for(2), Ok(false));
    }

    #[test]
    fn test_different_days_do_not_conflict() {
        let mut schedule = Schedule::new();
        schedule.place(1, "A", "Hétfo 10:00-12:00").unwrap();
        schedule.place(2, "B", "Kedd 10:00-12:00").unwrap();
        assert_eq!(schedule.conflicts_for(1), Ok(false));
    }

    #[test]
    fn test_same_start_conflicts() {
        let mut schedule = Schedule::new();
        schedule.place(1, "A", "Péntek 08:00-09:00").unwrap();
        schedule.place(2, "B", "Péntek 08:00-10:00").unwrap();
        assert_eq!(schedule.conflicts_for(1), Ok(true));
        assert_eq!(schedule.conflicts_for(2), Ok(true));
    }

    #[test]
    fn test_contained_event_conflicts() {
        let mut schedule = Schedule::new();
        schedule.place(1, "A", "Kedd 8:00-12:00").unwrap();
        schedule.place(2, "B", "Kedd 9:00-10:00").unwrap();
        assert_eq!(schedule.conflicts_for(2), Ok(true));
    }

    #[test]
    fn test_conflicts_follow_removals() {
        let mut schedule = Schedule::new();
        schedule.place(1, "A", "Kedd 10:00-11:30").unwrap();
        schedule.place(2, "B", "Kedd 11:00-12:00").unwrap();
        schedule.place(3, "C", "Kedd 08:00-09:00").unwrap();
        assert_eq!(schedule.conflicts_for(1), Ok(true));

        schedule.remove(2).unwrap();
        assert_eq!(schedule.conflicts_for(1), Ok(false));
        assert_eq!(schedule.conflicts_for(3), Ok(false));
    }

    #[test]
    fn test_remove_twice_fails() {
        let mut schedule = Schedule::new();
        schedule.place(7, "A", "Kedd 10:00-11:30").unwrap();
        assert!(schedule.remove(7).is_ok());
        assert_eq!(schedule.remove(7), Err(ScheduleError::NotFound { id: 7 }));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut schedule = Schedule::new();
        schedule.place(1, "A", "Kedd 10:00-11:30").unwrap();
        assert_eq!(
            schedule.place(1, "A again", "Szerda 10:00-11:30"),
            Err(ScheduleError::DuplicateId { id: 1 })
        );
        // Original placement untouched
        assert_eq!(schedule.get(1).map(|e| e.day_index), Some(2));
    }

    #[test]
    fn test_duplicate_id_with_bad_text_reports_parse_error() {
        let mut schedule = Schedule::new();
        schedule.place(1, "A", "Kedd 10:00-11:30").unwrap();
        assert!(matches!(
            schedule.place(1, "A again", "garbage"),
            Err(ScheduleError::MalformedSchedule { .. })
        ));
        assert!(matches!(
            schedule.place(1, "A again", "Vasárnap 10:00-11:30"),
            Err(ScheduleError::UnknownDay { .. })
        ));
        assert_eq!(schedule.len(), 1);
    }

    #[test]
    fn test_failed_parse_places_nothing() {
        let mut schedule = Schedule::new();
        schedule.place(1, "A", "Kedd 10:00-11:30").unwrap();
        assert!(schedule.place(2, "B", "Vasárnap 10:00-11:30").is_err());
        assert!(schedule.place(3, "C", "garbage").is_err());
        assert_eq!(schedule.len(), 1);
    }

    #[test]
    fn test_conflicts_for_unknown_id() {
        let schedule = Schedule::new();
        assert_eq!(schedule.conflicts_for(4), Err(ScheduleError::NotFound { id: 4 }));
    }

    #[test]
    fn test_all_is_sorted_snapshot() {
        let mut schedule = Schedule::new();
        schedule.place(3, "C", "Szerda 08:00-09:00").unwrap();
        schedule.place(1, "A", "Hétfo 12:00-13:00").unwrap();
        schedule.place(2, "B", "Hétfo 9:00-10:00").unwrap();

        let ids: Vec<u64> = schedule.all().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);

        schedule.clear();
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_event_serialization() {
        let mut schedule = Schedule::new();
        let event = schedule.place(5, "Algebra", "Kedd 10:00-11:30").unwrap();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["dayIndex"], 2);
        assert_eq!(json["startTime"], "10:00");
        assert_eq!(json["endTime"], "11:30");
    }
}
