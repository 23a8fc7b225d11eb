//! HTTP client for the Songbook API.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::model::{StatsSnapshot, Track, TrackDraft, TrackPatch};

/// Error envelope the server returns on failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(rename = "emptyFields", default)]
    empty_fields: Vec<String>,
}

/// What went wrong talking to the server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered with an error envelope
    #[error("{message}")]
    Rejected {
        status: u16,
        message: String,
        /// Field names from create validation, empty otherwise
        empty_fields: Vec<String>,
    },
    /// The request never completed
    #[error("request failed: {0}")]
    Transport(String),
    /// The response body was not the documented shape
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// Result type alias for API calls.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Client for the Songbook HTTP API.
///
/// No timeouts and no retries: a hung request simply never resolves, and the
/// caller's loading flag stays up.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given base URL, e.g. `http://127.0.0.1:5000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Fetch every track, newest first.
    pub async fn list_tracks(&self) -> Result<Vec<Track>> {
        let response = self
            .http
            .get(format!("{}/songs", self.base_url))
            .send()
            .await?;
        parse(response).await
    }

    /// Create a track from a fully filled-in draft.
    pub async fn create_track(&self, draft: &TrackDraft) -> Result<Track> {
        let response = self
            .http
            .post(format!("{}/songs", self.base_url))
            .json(draft)
            .send()
            .await?;
        parse(response).await
    }

    /// Apply a partial edit; returns the post-update record.
    pub async fn update_track(&self, id: &str, patch: &TrackPatch) -> Result<Track> {
        let response = self
            .http
            .patch(format!("{}/songs/{}", self.base_url, id))
            .json(patch)
            .send()
            .await?;
        parse(response).await
    }

    /// Delete a track; returns the deleted record's last snapshot.
    pub async fn delete_track(&self, id: &str) -> Result<Track> {
        let response = self
            .http
            .delete(format!("{}/songs/{}", self.base_url, id))
            .send()
            .await?;
        parse(response).await
    }

    /// Fetch the aggregated statistics snapshot.
    pub async fn fetch_stats(&self) -> Result<StatsSnapshot> {
        let response = self
            .http
            .get(format!("{}/stats", self.base_url))
            .send()
            .await?;
        parse(response).await
    }
}

/// Decode a success body, or map a failure status to [`ApiError::Rejected`].
async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()));
    }

    match response.json::<ErrorBody>().await {
        Ok(body) => Err(ApiError::Rejected {
            status: status.as_u16(),
            message: body.error,
            empty_fields: body.empty_fields,
        }),
        // The envelope itself was unreadable; keep the status at least.
        Err(_) => Err(ApiError::Rejected {
            status: status.as_u16(),
            message: format!("server returned {status}"),
            empty_fields: Vec::new(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://127.0.0.1:5000/api/");
        assert_eq!(client.base_url, "http://127.0.0.1:5000/api");
    }

    #[test]
    fn rejected_error_displays_the_server_message() {
        let err = ApiError::Rejected {
            status: 400,
            message: "No such song".to_string(),
            empty_fields: Vec::new(),
        };
        assert_eq!(err.to_string(), "No such song");
    }
}
