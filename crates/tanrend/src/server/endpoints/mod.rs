pub mod schedule;
pub mod search;
pub mod status;
