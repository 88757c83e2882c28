//! Typed HTTP client for the `/auth` and `/entries` endpoints.
//!
//! Calls take an explicit [`Session`]; persistence of the session and of the
//! offline entry cache goes through the injected [`Storage`]. How each call
//! reacts to a failure is fixed by [`policy::Operation::on_failure`].

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use reqwest::RequestBuilder;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::dto::{
    AuthRequest, AuthResponse, DeleteEntryRequest, ErrorResponse, MessageResponse,
    SaveEntryRequest, ACTION_LOGIN, ACTION_REGISTER,
};
use crate::models::entry::WellnessEntry;

pub mod policy;
pub mod session;
pub mod stats;

pub use policy::{OnFailure, Operation};
pub use session::{FileStorage, MemoryStorage, Session, Storage};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// Fields of an entry as entered by the user; the session supplies the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub mood: Option<i32>,
    pub sleep: Option<f64>,
    pub stress: Option<i32>,
    pub journal: Option<String>,
    pub activities: Vec<String>,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    storage: Arc<dyn Storage>,
}

impl ApiClient {
    /// `base_url` is the prefix both endpoints live under,
    /// e.g. `https://example.org/.netlify/functions`.
    pub fn new(base_url: impl Into<String>, storage: Arc<dyn Storage>) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url, storage)
    }

    pub fn with_http_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            storage,
        }
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = match serde_json::from_slice::<ErrorResponse>(&bytes) {
                Ok(ErrorResponse {
                    error,
                    message: Some(detail),
                }) => format!("{error}: {detail}"),
                Ok(ErrorResponse { error, .. }) => error,
                Err(_) => String::from_utf8_lossy(&bytes).into_owned(),
            };
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn authenticate(
        &self,
        action: &str,
        username: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        let body = AuthRequest {
            action: action.to_string(),
            username: Some(username.to_string()),
            password: Some(password.to_string()),
        };
        self.send(self.http.post(self.url("auth")).json(&body)).await
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        self.authenticate(ACTION_REGISTER, username, password)
            .await
            .map_err(|e| logged(Operation::Register, e))
    }

    /// On success the session (and storage) now refer to the returned user.
    pub async fn login(
        &self,
        session: &mut Session,
        username: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        let response = self
            .authenticate(ACTION_LOGIN, username, password)
            .await
            .map_err(|e| logged(Operation::Login, e))?;
        session.remember(&response.user, self.storage())?;
        Ok(response)
    }

    pub async fn save_entry(
        &self,
        session: &Session,
        date: NaiveDate,
        draft: &EntryDraft,
    ) -> Result<WellnessEntry, ClientError> {
        let body = SaveEntryRequest {
            user_id: session.user_id,
            date,
            mood: draft.mood,
            sleep: draft.sleep,
            stress: draft.stress,
            journal: draft.journal.clone(),
            activities: Some(draft.activities.clone()),
        };
        self.send(self.http.post(self.url("entries")).json(&body))
            .await
            .map_err(|e| logged(Operation::SaveEntry, e))
    }

    pub async fn delete_entry(
        &self,
        session: &Session,
        date: NaiveDate,
    ) -> Result<MessageResponse, ClientError> {
        let body = DeleteEntryRequest {
            user_id: session.user_id,
            date,
        };
        self.send(self.http.delete(self.url("entries")).json(&body))
            .await
            .map_err(|e| logged(Operation::DeleteEntry, e))
    }

    async fn fetch_entries(&self, session: &Session) -> Result<Vec<WellnessEntry>, ClientError> {
        let mut request = self.http.get(self.url("entries"));
        if let Some(user_id) = session.user_id {
            request = request.query(&[("user_id", user_id)]);
        }
        self.send(request).await
    }

    pub async fn get_all_entries(&self, session: &Session) -> Vec<WellnessEntry> {
        recover(Operation::GetAllEntries, self.fetch_entries(session).await)
    }

    /// Linear scan of the full list; there is no point lookup endpoint.
    pub async fn get_entry(&self, session: &Session, date: NaiveDate) -> Option<WellnessEntry> {
        let entries = recover(Operation::GetEntry, self.fetch_entries(session).await);
        stats::find_by_date(entries, date)
    }

    pub async fn get_last_n_days(&self, session: &Session, days: u32) -> Vec<WellnessEntry> {
        let entries = recover(Operation::GetLastNDays, self.fetch_entries(session).await);
        stats::within_last_n_days(entries, days, today())
    }

    pub async fn calculate_streak(&self, session: &Session) -> u32 {
        let entries = recover(Operation::CalculateStreak, self.fetch_entries(session).await);
        stats::streak_ending_at(&entries, today())
    }

    /// The cached copy is whatever the UI last stored; it is never refreshed
    /// from here.
    pub async fn get_entries_with_fallback(&self, session: &Session) -> Vec<WellnessEntry> {
        match self.fetch_entries(session).await {
            Ok(entries) => entries,
            Err(e) => {
                debug_assert_eq!(
                    Operation::GetEntriesWithFallback.on_failure(),
                    OnFailure::ReadLocalCache
                );
                tracing::warn!(error = %e, "API unavailable, falling back to local storage");
                self.cached_entries()
            }
        }
    }

    fn cached_entries(&self) -> Vec<WellnessEntry> {
        let raw = match self.storage.get(session::ENTRIES_CACHE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cached entries");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Cached entries are not in the expected format");
            Vec::new()
        })
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn logged(op: Operation, e: ClientError) -> ClientError {
    tracing::error!(operation = op.name(), error = %e, "Request failed");
    e
}

/// Apply the best-effort read policy: log and fall back to the default.
fn recover<T: Default>(op: Operation, result: Result<T, ClientError>) -> T {
    debug_assert_eq!(op.on_failure(), OnFailure::ReturnDefault);
    result.unwrap_or_else(|e| {
        tracing::warn!(operation = op.name(), error = %e, "Read failed, returning default");
        T::default()
    })
}
