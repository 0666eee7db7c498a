// Worker directory - asks the backend which workers offer a specialization

use super::catalog::subcategory_enum;
use super::retry::{RetryPolicy, Retryable, with_retry};
use super::types::{CategoryId, RouterConfig};
use std::time::Duration;

/// Client for the backend's specialization endpoints
pub struct WorkerDirectory {
    client: reqwest::Client,
    base_url: String,
    policy: RetryPolicy,
}

impl WorkerDirectory {
    pub fn new(config: &RouterConfig) -> Result<Self, WorkerError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| WorkerError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            policy: RetryPolicy::new(config.request_timeout(), config.max_retries),
        })
    }

    /// Endpoint for a category, narrowed to a subcategory when one is given
    pub fn workers_url(&self, category: CategoryId, subcategory: Option<&str>) -> String {
        let mut url = format!("{}/api/v1/specializations/workers/{}", self.base_url, category);
        if let Some(name) = subcategory {
            url.push('/');
            url.push_str(&urlencoding::encode(&subcategory_enum(name)));
        }
        url
    }

    /// Fetch workers; only HTTP 200 counts as success
    pub async fn lookup(
        &self,
        category: CategoryId,
        subcategory: Option<&str>,
    ) -> Result<serde_json::Value, WorkerError> {
        let url = self.workers_url(category, subcategory);
        tracing::debug!(%url, "looking up workers");

        let (client, url) = (&self.client, &url);
        with_retry("worker lookup", self.policy, move || async move {
            let response = client
                .get(url)
                .send()
                .await
                .map_err(|e| WorkerError::Connection(e.to_string()))?;

            if response.status() != reqwest::StatusCode::OK {
                return Err(WorkerError::Status(response.status().as_u16()));
            }

            response
                .json::<serde_json::Value>()
                .await
                .map_err(|e| WorkerError::Parse(e.to_string()))
        })
        .await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("Failed to fetch workers: {0}")]
    Status(u16),

    #[error("Error connecting to backend: {0}")]
    Connection(String),

    #[error("Error connecting to backend: request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Error connecting to backend: invalid response body: {0}")]
    Parse(String),
}

impl Retryable for WorkerError {
    fn is_retryable(&self) -> bool {
        match self {
            WorkerError::Connection(_) | WorkerError::Timeout(_) => true,
            WorkerError::Status(status) => *status >= 500,
            WorkerError::Parse(_) => false,
        }
    }

    fn timed_out(after: Duration) -> Self {
        WorkerError::Timeout(after)
    }
}
