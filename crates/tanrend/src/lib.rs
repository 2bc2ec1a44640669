//! Turns the ELTE timetable listing into a personal weekly schedule.
//!
//! Scraped rows are mapped onto named course records, filtered down to the
//! interesting ones, and selected records are placed on a Monday..Friday
//! schedule that flags overlapping courses.

pub mod config;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod normalize;
pub mod record;
pub mod schedule;
pub mod server;
pub mod session;
pub mod types;
