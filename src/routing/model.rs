// Language model - text and file-grounded generation through the Gemini REST API

use super::retry::{RetryPolicy, Retryable, with_retry};
use super::types::RouterConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";
const FILE_POLL_INTERVAL: Duration = Duration::from_secs(2);
const FILE_POLL_ATTEMPTS: u32 = 15;

/// Generative model used to classify requests and describe attachments
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate text for a prompt
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;

    /// Upload a file and generate text about it
    async fn describe_file(&self, path: &Path, mime_type: &str, prompt: &str) -> Result<String, ModelError>;
}

/// Gemini `generateContent` client
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    policy: RetryPolicy,
    poll_interval: Duration,
    poll_attempts: u32,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, config: &RouterConfig) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ModelError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.gemini_endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: api_key.into(),
            policy: RetryPolicy::new(config.request_timeout(), config.max_retries),
            poll_interval: FILE_POLL_INTERVAL,
            poll_attempts: FILE_POLL_ATTEMPTS,
        })
    }

    /// Override how often and how many times a processing upload is polled
    pub fn with_file_polling(mut self, interval: Duration, attempts: u32) -> Self {
        self.poll_interval = interval;
        self.poll_attempts = attempts;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate_parts(&self, parts: Vec<Part>) -> Result<String, ModelError> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
        };
        let url = format!("{}/v1beta/models/{}:generateContent", self.endpoint, self.model);

        let (client, api_key, url, request) = (&self.client, &self.api_key, &url, &request);
        with_retry("generateContent", self.policy, move || async move {
            let response = client
                .post(url)
                .header(API_KEY_HEADER, api_key)
                .json(request)
                .send()
                .await
                .map_err(|e| ModelError::NetworkError(e.to_string()))?;

            let response = check_status(response).await?;
            let body: GenerateResponse = response
                .json()
                .await
                .map_err(|e| ModelError::ParseError(e.to_string()))?;

            body.text().ok_or(ModelError::EmptyResponse)
        })
        .await
    }

    /// Upload raw bytes through the media upload endpoint
    async fn upload(&self, path: &Path, mime_type: &str) -> Result<UploadedFile, ModelError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ModelError::IoError(e.to_string()))?;
        let url = format!("{}/upload/v1beta/files", self.endpoint);

        let (client, api_key, url, bytes) = (&self.client, &self.api_key, &url, &bytes);
        let uploaded = with_retry("file upload", self.policy, move || async move {
            let response = client
                .post(url)
                .query(&[("uploadType", "media")])
                .header(API_KEY_HEADER, api_key)
                .header("X-Goog-Upload-Protocol", "raw")
                .header(reqwest::header::CONTENT_TYPE, mime_type)
                .body(bytes.clone())
                .send()
                .await
                .map_err(|e| ModelError::NetworkError(e.to_string()))?;

            let response = check_status(response).await?;
            let body: UploadResponse = response
                .json()
                .await
                .map_err(|e| ModelError::ParseError(e.to_string()))?;
            Ok(body.file)
        })
        .await?;

        tracing::debug!(uri = %uploaded.uri, state = ?uploaded.state, "uploaded file");
        self.wait_until_active(uploaded).await
    }

    /// Videos are processed asynchronously; they cannot be referenced until active
    async fn wait_until_active(&self, mut file: UploadedFile) -> Result<UploadedFile, ModelError> {
        let mut polls = 0;
        while file.state.as_deref() == Some("PROCESSING") {
            if polls >= self.poll_attempts {
                return Err(ModelError::FileNotReady(file.uri));
            }
            let Some(name) = file.name.clone() else {
                return Err(ModelError::FileNotReady(file.uri));
            };
            polls += 1;
            tokio::time::sleep(self.poll_interval).await;

            let url = format!("{}/v1beta/{}", self.endpoint, name);
            let response = self
                .client
                .get(&url)
                .header(API_KEY_HEADER, &self.api_key)
                .send()
                .await
                .map_err(|e| ModelError::NetworkError(e.to_string()))?;
            file = check_status(response)
                .await?
                .json()
                .await
                .map_err(|e| ModelError::ParseError(e.to_string()))?;
        }

        if file.state.as_deref() == Some("FAILED") {
            return Err(ModelError::FileNotReady(file.uri));
        }
        Ok(file)
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        self.generate_parts(vec![Part::text(prompt)]).await
    }

    async fn describe_file(&self, path: &Path, mime_type: &str, prompt: &str) -> Result<String, ModelError> {
        let file = self.upload(path, mime_type).await?;
        let mime_type = file.mime_type.clone().unwrap_or_else(|| mime_type.to_string());

        self.generate_parts(vec![Part::text(prompt), Part::file(mime_type, file.uri)])
            .await
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ModelError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ModelError::ApiError {
        status: status.as_u16(),
        message: body,
    })
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Default)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_data: Option<FileData>,
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    fn file(mime_type: String, file_uri: String) -> Self {
        Self {
            file_data: Some(FileData { mime_type, file_uri }),
            ..Default::default()
        }
    }
}

#[derive(Serialize, Deserialize)]
struct FileData {
    mime_type: String,
    file_uri: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct UploadResponse {
    file: UploadedFile,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadedFile {
    #[serde(default)]
    name: Option<String>,
    uri: String,
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Model API returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Model returned no text")]
    EmptyResponse,

    #[error("Uploaded file never became active: {0}")]
    FileNotReady(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl Retryable for ModelError {
    fn is_retryable(&self) -> bool {
        match self {
            ModelError::NetworkError(_) | ModelError::Timeout(_) => true,
            ModelError::ApiError { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    fn timed_out(after: Duration) -> Self {
        ModelError::Timeout(after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_request_serialization() {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::text("describe"),
                    Part::file("image/png".to_string(), "https://files/abc".to_string()),
                ],
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0], serde_json::json!({"text": "describe"}));
        assert_eq!(
            value["contents"][0]["parts"][1],
            serde_json::json!({"file_data": {"mime_type": "image/png", "file_uri": "https://files/abc"}})
        );
    }

    #[test]
    fn test_response_text_joins_parts() {
        let body = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"plum"},{"text":"ber"}]}}]}"#;
        let response: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.text().as_deref(), Some("plumber"));
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let response: GenerateResponse = serde_json::from_str(r#"{"promptFeedback":{}}"#).unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_retryable_errors() {
        assert!(ModelError::NetworkError("reset".into()).is_retryable());
        assert!(ModelError::ApiError { status: 503, message: String::new() }.is_retryable());
        assert!(ModelError::ApiError { status: 429, message: String::new() }.is_retryable());
        assert!(!ModelError::ApiError { status: 400, message: String::new() }.is_retryable());
        assert!(!ModelError::EmptyResponse.is_retryable());
    }

    #[test]
    fn test_client_trims_endpoint() {
        let config = RouterConfig {
            gemini_endpoint: "http://localhost:9000/".to_string(),
            ..Default::default()
        };
        let client = GeminiClient::new("key", &config).unwrap();
        assert_eq!(client.endpoint, "http://localhost:9000");
        assert_eq!(client.model(), "gemini-1.5-flash");
        assert_eq!(client.poll_interval, Duration::from_secs(2));
        assert_eq!(client.poll_attempts, 15);
    }

    fn client_for(server: &MockServer, attempts: u32) -> GeminiClient {
        let config = RouterConfig {
            gemini_endpoint: server.uri(),
            ..Default::default()
        };
        GeminiClient::new("key", &config)
            .unwrap()
            .with_file_polling(Duration::from_millis(10), attempts)
    }

    fn uploaded(name: Option<&str>, state: &str) -> UploadedFile {
        UploadedFile {
            name: name.map(str::to_string),
            uri: "https://files/vid1".to_string(),
            mime_type: Some("video/mp4".to_string()),
            state: Some(state.to_string()),
        }
    }

    fn file_state(state: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "files/vid1",
            "uri": "https://files/vid1",
            "mimeType": "video/mp4",
            "state": state
        }))
    }

    #[tokio::test]
    async fn test_processing_file_is_polled_until_active() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1beta/files/vid1"))
            .and(header(API_KEY_HEADER, "key"))
            .respond_with(file_state("PROCESSING"))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1beta/files/vid1"))
            .respond_with(file_state("ACTIVE"))
            .expect(1)
            .mount(&server)
            .await;

        let file = client_for(&server, 5)
            .wait_until_active(uploaded(Some("files/vid1"), "PROCESSING"))
            .await
            .unwrap();
        assert_eq!(file.state.as_deref(), Some("ACTIVE"));
    }

    #[tokio::test]
    async fn test_failed_processing_is_not_ready() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1beta/files/vid1"))
            .respond_with(file_state("FAILED"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server, 5)
            .wait_until_active(uploaded(Some("files/vid1"), "PROCESSING"))
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::FileNotReady(ref uri) if uri == "https://files/vid1"));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_failed_upload_state_is_not_ready() {
        let server = MockServer::start().await;
        let err = client_for(&server, 5)
            .wait_until_active(uploaded(Some("files/vid1"), "FAILED"))
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::FileNotReady(_)));
    }

    #[tokio::test]
    async fn test_processing_file_without_name_is_not_polled() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(file_state("ACTIVE"))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server, 5)
            .wait_until_active(uploaded(None, "PROCESSING"))
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::FileNotReady(_)));
    }

    #[tokio::test]
    async fn test_polling_gives_up_after_attempt_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1beta/files/vid1"))
            .respond_with(file_state("PROCESSING"))
            .expect(3)
            .mount(&server)
            .await;

        let err = client_for(&server, 3)
            .wait_until_active(uploaded(Some("files/vid1"), "PROCESSING"))
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::FileNotReady(_)));
    }

    #[tokio::test]
    async fn test_active_upload_needs_no_poll() {
        let server = MockServer::start().await;
        let file = client_for(&server, 0)
            .wait_until_active(uploaded(Some("files/img1"), "ACTIVE"))
            .await
            .unwrap();
        assert_eq!(file.uri, "https://files/vid1");
    }
}
