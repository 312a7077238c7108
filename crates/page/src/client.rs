//! Progress API client.
//!
//! Asks the server for a sub job's resolved percentage instead of loading
//! and scraping another page.

use std::time::Duration;

use evtrack_core::{ProgressSource, Resolution, SubJobId};
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::error::{FetchError, FetchResult};

/// Body of `GET <base>/api/sub_job/<id>/progress`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressPayload {
    /// Sub job the value belongs to
    pub sub_job_id: String,

    /// Completion percentage
    pub percent: f64,
}

/// Client for the progress API.
#[derive(Clone)]
pub struct ProgressClient {
    client: Client,
    base: Url,
    timeout: Duration,
}

impl ProgressClient {
    /// Create a client for the API rooted at `base`.
    pub fn new(base: &str, timeout: Duration) -> FetchResult<Self> {
        let base = Url::parse(base)?;
        if base.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }
        Ok(Self {
            client: ClientBuilder::new()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base,
            timeout,
        })
    }

    /// URL of a sub job's progress resource.
    ///
    /// The id is percent-encoded as a single path segment, so characters
    /// such as `/`, `?` or `#` cannot change the resource requested.
    pub fn progress_url(&self, id: &SubJobId) -> FetchResult<Url> {
        if matches!(id.as_str(), "." | "..") {
            return Err(FetchError::InvalidId(id.to_string()));
        }
        let mut target = self.base.clone();
        target.set_query(None);
        target.set_fragment(None);
        target
            .path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(["api", "sub_job", id.as_str(), "progress"]);
        Ok(target)
    }

    /// Fetch a sub job's percentage, bounded by the client timeout.
    pub async fn fetch(&self, id: &SubJobId) -> FetchResult<f64> {
        let url = self.progress_url(id)?;
        debug!(%url, "fetching sub job progress");

        let request = async {
            let payload: ProgressPayload = self
                .client
                .get(url.clone())
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            Ok::<_, FetchError>(payload)
        };

        let payload = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))??;

        if !payload.percent.is_finite() {
            return Err(FetchError::NonFinite(id.to_string()));
        }
        Ok(payload.percent)
    }

    /// Fetch a sub job's percentage, or fall back to `fallback` on any failure.
    pub async fn fetch_or(&self, id: &SubJobId, fallback: f64) -> Resolution {
        match self.fetch(id).await {
            Ok(percent) => Resolution::new(percent, ProgressSource::Cached),
            Err(e) => {
                warn!(sub_job = %id, error = %e, "progress request failed, using fallback");
                Resolution::defaulted(fallback)
            }
        }
    }
}
