// Core types for the routing system

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level service category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CategoryId {
    Plumber,
    Electrician,
    Carpenter,
    Mechanic,
    MensGrooming,
    WomenGrooming,
}

impl CategoryId {
    /// Every category, in display order
    pub const ALL: [CategoryId; 6] = [
        CategoryId::Plumber,
        CategoryId::Electrician,
        CategoryId::Carpenter,
        CategoryId::Mechanic,
        CategoryId::MensGrooming,
        CategoryId::WomenGrooming,
    ];

    /// Identifier used by the model prompt, the backend and the frontend
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryId::Plumber => "plumber",
            CategoryId::Electrician => "electrician",
            CategoryId::Carpenter => "carpenter",
            CategoryId::Mechanic => "mechanic",
            CategoryId::MensGrooming => "mens_grooming",
            CategoryId::WomenGrooming => "women_grooming",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CategoryId::Plumber => "Plumber",
            CategoryId::Electrician => "Electrician",
            CategoryId::Carpenter => "Carpenter",
            CategoryId::Mechanic => "Mechanic",
            CategoryId::MensGrooming => "Men's Grooming",
            CategoryId::WomenGrooming => "Women's Grooming",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            CategoryId::Plumber => "💧",
            CategoryId::Electrician => "⚡",
            CategoryId::Carpenter => "🔨",
            CategoryId::Mechanic => "🔧",
            CategoryId::MensGrooming => "💈",
            CategoryId::WomenGrooming => "💅",
        }
    }

    /// Exact, case-sensitive lookup by identifier
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == id)
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of file attached to a request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Image,
    Video,
    Unknown,
}

impl ContentType {
    /// Detect content type from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "webp" => ContentType::Image,
            "mp4" | "avi" | "mov" | "wmv" | "flv" => ContentType::Video,
            _ => ContentType::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(ContentType::from_extension)
            .unwrap_or(ContentType::Unknown)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ContentType::Image => "image",
            ContentType::Video => "video",
            ContentType::Unknown => "unknown",
        }
    }
}

/// MIME type sent along with an uploaded file
pub fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",
        _ => "application/octet-stream",
    }
}

/// Worker lookup outcome, serialized as the backend body or `{"error": ...}`
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum WorkersPayload {
    Unavailable { error: String },
    Found(serde_json::Value),
}

impl WorkersPayload {
    pub fn unavailable(error: impl Into<String>) -> Self {
        WorkersPayload::Unavailable { error: error.into() }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, WorkersPayload::Unavailable { .. })
    }
}

/// Only an object holding nothing but a string `error` is an unavailable lookup;
/// any other backend body stays `Found`
impl<'de> Deserialize<'de> for WorkersPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let error = value
            .as_object()
            .filter(|object| object.len() == 1)
            .and_then(|object| object.get("error"))
            .and_then(|error| error.as_str())
            .map(str::to_string);

        Ok(match error {
            Some(error) => WorkersPayload::Unavailable { error },
            None => WorkersPayload::Found(value),
        })
    }
}

/// Final answer for one routed request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub category: CategoryId,
    pub category_name: String,
    pub subcategory: Option<String>,
    /// Same as `category`; older clients still read this field
    pub keyword: CategoryId,
    pub workers: WorkersPayload,
    pub redirect_url: String,
    pub user_prompt: String,
    pub enhanced_prompt: Option<String>,
}

/// Configuration for the router and its upstream clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouterConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_gemini_endpoint")]
    pub gemini_endpoint: String,

    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_backend_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout() -> u64 {
    30000
}

fn default_max_retries() -> u32 {
    1
}

impl RouterConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            gemini_endpoint: default_gemini_endpoint(),
            backend_url: default_backend_url(),
            request_timeout_ms: default_request_timeout(),
            max_retries: default_max_retries(),
        }
    }
}
