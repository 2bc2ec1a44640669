/// Day/time parsing and the conflict-aware weekly schedule
mod model;
mod parse;

pub use model::{Schedule, ScheduleEvent};
pub use parse::{day_index, day_name, parse_schedule, ClockTime, ParsedSchedule, DAYS_OF_WEEK};
