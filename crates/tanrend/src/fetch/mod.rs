//! HTTP client for the timetable search page.
//!
//! A search is a single form POST; the answer is an HTML page whose
//! `#resulttable` holds one row per course meeting. No retries happen here,
//! a failed fetch fails the search.

pub mod cache;
mod table;

pub use table::extract_rows;

use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use url::Url;

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::record::RawRow;
use cache::{SearchCache, SearchKey};

/// What the search term is matched against on the timetable site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchMode {
    #[default]
    CourseName,
    CourseCode,
    Teacher,
}

impl SearchMode {
    /// Value of the form's `submit` field.
    pub fn form_value(self) -> &'static str {
        match self {
            SearchMode::CourseName => "keresnevre",
            SearchMode::CourseCode => "keres_kod_azon",
            SearchMode::Teacher => "keres_okt",
        }
    }
}

/// Rows of one search, header row at index 0.
#[derive(Debug, Clone)]
pub struct FetchedTable {
    pub rows: Vec<RawRow>,
    /// RFC 3339 time the page was downloaded
    pub fetched_at: String,
    pub from_cache: bool,
}

/// Client for the timetable search form.
pub struct TimetableClient {
    client: Client,
    config: FetchConfig,
    cache: Arc<SearchCache>,
}

impl TimetableClient {
    /// Creates a client with its own cache.
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let cache = Arc::new(SearchCache::new(Duration::from_secs(config.cache_ttl_secs)));
        Self::with_cache(config, cache)
    }

    /// Creates a client that shares `cache`.
    pub fn with_cache(config: FetchConfig, cache: Arc<SearchCache>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| FetchError::Network {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            config,
            cache,
        })
    }

    /// The URL requests go to: the search page, behind the proxy if one is set.
    pub fn target_url(&self) -> Result<Url, FetchError> {
        let url = match &self.config.proxy_url {
            Some(proxy) => format!("{}{}", proxy, self.config.base_url),
            None => self.config.base_url.clone(),
        };
        Ok(Url::parse(&url)?)
    }

    /// Form fields for a search. A blank term is sent as a single space,
    /// which the site treats as "everything".
    pub fn form_fields(&self, term: &str, mode: SearchMode) -> Vec<(&'static str, String)> {
        let term = if term.trim().is_empty() { " " } else { term };
        vec![
            ("felev", self.config.semester.clone()),
            ("darab", self.config.page_size.to_string()),
            ("submit", mode.form_value().to_string()),
            ("mit", term.to_string()),
        ]
    }

    /// Runs a search and returns the raw result table rows.
    ///
    /// # Arguments
    /// * `term` - Free-text search term
    /// * `mode` - What the term is matched against
    ///
    /// # Returns
    /// * `Ok(FetchedTable)` - Rows of `#resulttable`, header first
    /// * `Err(FetchError)` - Network failure, non-2xx status, empty body or no table
    pub async fn search(&self, term: &str, mode: SearchMode) -> Result<FetchedTable, FetchError> {
        let correlation_id = generate_correlation_id();
        let key = SearchKey::new(&self.config.semester, mode, term);

        if let Some((rows, fetched_at)) = self.cache.get(&key) {
            info!(
                correlation_id = %correlation_id,
                search = %key,
                rows = rows.len(),
                "Returning cached search"
            );
            return Ok(FetchedTable {
                rows,
                fetched_at,
                from_cache: true,
            });
        }

        let start = Instant::now();
        let result = self.fetch_rows(term, mode, &correlation_id).await;

        match &result {
            Ok(rows) => {
                info!(
                    correlation_id = %correlation_id,
                    search = %key,
                    rows = rows.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Search completed"
                );
            }
            Err(e) => {
                error!(
                    correlation_id = %correlation_id,
                    search = %key,
                    error = %e,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Search failed"
                );
            }
        }

        let rows = result?;
        let fetched_at = chrono::Utc::now().to_rfc3339();
        self.cache.insert(key, rows.clone(), fetched_at.clone());

        Ok(FetchedTable {
            rows,
            fetched_at,
            from_cache: false,
        })
    }

    async fn fetch_rows(
        &self,
        term: &str,
        mode: SearchMode,
        correlation_id: &str,
    ) -> Result<Vec<RawRow>, FetchError> {
        let url = self.target_url()?;
        info!(
            correlation_id = %correlation_id,
            url = %url,
            mode = mode.form_value(),
            "Posting timetable search"
        );

        let response = self
            .client
            .post(url)
            .form(&self.form_fields(term, mode))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
            });
        }

        let html = response.text().await?;
        if html.trim().is_empty() {
            return Err(FetchError::EmptyResponse);
        }

        let rows = extract_rows(&html)?;
        if rows.is_empty() {
            warn!(correlation_id = %correlation_id, "Result table has no rows");
        }

        Ok(rows)
    }

    pub fn cache(&self) -> &SearchCache {
        &self.cache
    }
}

/// Generates a unique correlation ID for request tracing.
fn generate_correlation_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros();
    let random: u32 = rand::thread_rng().gen();
    format!("{:x}-{:08x}", timestamp & 0xFFFFFFFF, random)
}
