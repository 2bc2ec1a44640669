//! Parsing of the timetable's `"<day> HH:MM-HH:MM"` schedule cells.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::error::ScheduleError;
use crate::normalize::fold;

/// Weekday names as the timetable prints them, Monday first.
///
/// The page drops the double acute on Monday (`Hétfo`); lookup folds
/// accents so `Hétfő` resolves too.
pub const DAYS_OF_WEEK: [&str; 5] = ["Hétfo", "Kedd", "Szerda", "Csütörtök", "Péntek"];

/// Returns the 1-based weekday index for `name`, Monday = 1.
pub fn day_index(name: &str) -> Option<u8> {
    let key = fold(name).to_lowercase();
    DAYS_OF_WEEK
        .iter()
        .position(|day| fold(day).to_lowercase() == key)
        .map(|i| i as u8 + 1)
}

/// Returns the timetable name of a 1-based weekday index.
pub fn day_name(index: u8) -> Option<&'static str> {
    DAYS_OF_WEEK.get(usize::from(index).checked_sub(1)?).copied()
}

/// A wall-clock time as written in the timetable.
///
/// Only the shape is checked; `25:99` is a valid `ClockTime`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u32 {
        self.hour * 60 + self.minute
    }

    /// Parses `H:MM` or `HH:MM`.
    fn parse(token: &str, text: &str) -> Result<Self, ScheduleError> {
        let malformed = |reason: String| ScheduleError::MalformedSchedule {
            text: text.to_string(),
            reason,
        };

        let (hour, minute) = token
            .split_once(':')
            .ok_or_else(|| malformed(format!("time {token:?} has no ':'")))?;

        let digits = |s: &str, max_len: usize| {
            !s.is_empty() && s.len() <= max_len && s.bytes().all(|b| b.is_ascii_digit())
        };
        if !digits(hour, 2) || !digits(minute, 2) || minute.len() != 2 {
            return Err(malformed(format!("time {token:?} is not HH:MM")));
        }

        // Both parts are one or two ASCII digits
        let hour = hour.parse().map_err(|_| malformed(format!("bad hour in {token:?}")))?;
        let minute = minute
            .parse()
            .map_err(|_| malformed(format!("bad minute in {token:?}")))?;

        Ok(Self { hour, minute })
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A schedule cell broken into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedSchedule {
    /// 1 = Monday ... 5 = Friday
    pub day_index: u8,
    pub start: ClockTime,
    pub end: ClockTime,
}

/// Parses a schedule cell such as `"Kedd 10:00-11:30"`.
///
/// # Returns
/// * `Ok(ParsedSchedule)` - Weekday index and start/end times
/// * `Err(ScheduleError::UnknownDay)` - If the day is not Monday..Friday
/// * `Err(ScheduleError::MalformedSchedule)` - If the text has the wrong shape
pub fn parse_schedule(text: &str) -> Result<ParsedSchedule, ScheduleError> {
    let malformed = |reason: &str| ScheduleError::MalformedSchedule {
        text: text.to_string(),
        reason: reason.to_string(),
    };

    let tokens: Vec<&str> = text.split_whitespace().collect();
    let [day, range] = tokens.as_slice() else {
        return Err(malformed("expected a day and a time range"));
    };

    let (start, end) = range
        .split_once('-')
        .ok_or_else(|| malformed("time range has no '-'"))?;
    if end.contains('-') {
        return Err(malformed("time range has more than two times"));
    }

    let day_index = day_index(day).ok_or_else(|| ScheduleError::UnknownDay {
        day: day.to_string(),
    })?;

    Ok(ParsedSchedule {
        day_index,
        start: ClockTime::parse(start, text)?,
        end: ClockTime::parse(end, text)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tuesday() {
        let parsed = parse_schedule("Kedd 10:00-11:30").unwrap();
        assert_eq!(parsed.day_index, 2);
        assert_eq!(parsed.start.to_string(), "10:00");
        assert_eq!(parsed.end.to_string(), "11:30");
    }

    #[test]
    fn test_parse_every_weekday() {
        for (i, day) in DAYS_OF_WEEK.iter().enumerate() {
            let parsed = parse_schedule(&format!("{day} 08:00-09:30")).unwrap();
            assert_eq!(usize::from(parsed.day_index), i + 1);
        }
    }

    #[test]
    fn test_day_lookup_folds_accents() {
        assert_eq!(day_index("Hétfő"), Some(1));
        assert_eq!(day_index("hetfo"), Some(1));
        assert_eq!(day_index("CSÜTÖRTÖK"), Some(4));
        assert_eq!(day_name(5), Some("Péntek"));
        assert_eq!(day_name(0), None);
        assert_eq!(day_name(6), None);
    }

    #[test]
    fn test_weekend_is_unknown() {
        assert_eq!(
            parse_schedule("Vasárnap 10:00-11:30"),
            Err(ScheduleError::UnknownDay {
                day: "Vasárnap".to_string()
            })
        );
        assert!(matches!(
            parse_schedule("Szombat 10:00-11:30"),
            Err(ScheduleError::UnknownDay { .. })
        ));
    }

    #[test]
    fn test_malformed_shapes() {
        for text in [
            "",
            "Kedd",
            "Kedd 10:00",
            "Kedd 10:00-11:30 extra",
            "Kedd 10:00-11:30-12:00",
            "Kedd 10-11",
            "Kedd 10:0-11:30",
            "Kedd ab:cd-11:30",
        ] {
            assert!(
                matches!(parse_schedule(text), Err(ScheduleError::MalformedSchedule { .. })),
                "{text:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_no_range_validation() {
        let parsed = parse_schedule("Péntek 25:99-8:00").unwrap();
        assert_eq!(parsed.start, ClockTime::new(25, 99));
        assert_eq!(parsed.end.to_string(), "08:00");
    }

    #[test]
    fn test_clock_time_ordering() {
        assert!(ClockTime::new(9, 0) < ClockTime::new(10, 0));
        assert!(ClockTime::new(10, 0) < ClockTime::new(10, 1));
        assert_eq!(ClockTime::new(1, 30).minutes(), 90);
    }

    #[test]
    fn test_clock_time_serializes_as_text() {
        let json = serde_json::to_string(&ClockTime::new(8, 5)).unwrap();
        assert_eq!(json, "\"08:05\"");
    }
}
