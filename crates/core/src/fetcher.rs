//! Remote menu API client.
//!
//! One outbound request per canonical date key, no retry. The remote service
//! reports application errors in-band as `{"error": {"message": ...}}`.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::menu::Menu;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("menu request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("menu API returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("menu API reported an error: {0}")]
    Api(String),
}

/// The one outbound collaborator of the dialog core. The orchestrator never
/// distinguishes the failure variants at the user-facing layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuFetcher: Send + Sync {
    async fn fetch_menu(&self, calendar_date: &str) -> Result<Menu, FetchError>;
}

/// Fetches menus from the deployed menu service via
/// `GET <base-url>/<calendar-key>.json`.
pub struct HttpMenuFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMenuFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MenuApiResponse {
    Error { error: ApiErrorBody },
    Menu(Menu),
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[async_trait]
impl MenuFetcher for HttpMenuFetcher {
    async fn fetch_menu(&self, calendar_date: &str) -> Result<Menu, FetchError> {
        let url = format!("{}/{}.json", self.base_url, calendar_date);
        debug!(%url, "fetching menu");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "menu API returned a non-success status");
            return Err(FetchError::Status(status));
        }

        match response.json::<MenuApiResponse>().await? {
            MenuApiResponse::Menu(menu) => Ok(menu),
            MenuApiResponse::Error { error } => {
                warn!(%url, message = %error.message, "menu API reported an error");
                Err(FetchError::Api(error.message))
            }
        }
    }
}
