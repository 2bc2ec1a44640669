use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::error::FetchError;
use crate::fetch::TimetableClient;
use crate::filter::FilterSpec;
use crate::session::Session;

/// State shared by every request handler.
pub struct AppState {
    /// Client for the timetable search page
    pub client: TimetableClient,
    /// The single user session; requests take turns owning it
    pub session: Mutex<Session>,
    /// Filter applied when a search request carries none
    pub default_filter: FilterSpec,
}

impl AppState {
    /// Builds the state from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: TimetableClient::new(config.fetch.clone())?,
            session: Mutex::new(Session::new()),
            default_filter: config.default_filter.clone(),
        })
    }
}
