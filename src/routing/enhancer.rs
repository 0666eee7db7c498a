// Enhancer - turns an attached image or video into text the classifier can use

use super::model::{LanguageModel, ModelError};
use super::types::{ContentType, mime_type};
use std::path::Path;
use std::sync::Arc;

/// Describes attachments through the language model
pub struct Enhancer {
    model: Arc<dyn LanguageModel>,
}

impl Enhancer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Prompt enriched with a description of the attached file.
    ///
    /// Returns `Ok(None)` without contacting the model when the file is not an
    /// image or video.
    pub async fn enhance(&self, path: &Path, user_prompt: &str) -> Result<Option<String>, EnhancerError> {
        let content_type = ContentType::from_path(path);
        if content_type == ContentType::Unknown {
            tracing::debug!(path = %path.display(), "attachment type not supported, skipping analysis");
            return Ok(None);
        }

        let prompt = build_description_prompt(content_type, user_prompt);
        let description = self
            .model
            .describe_file(path, mime_type(path), &prompt)
            .await?;

        Ok(Some(format!("{}. File analysis: {}", user_prompt, description.trim())))
    }
}

/// Instruction asking the model to describe what service the file suggests
fn build_description_prompt(content_type: ContentType, user_prompt: &str) -> String {
    format!(
        r#"Analyze this {kind} and describe what service might be needed.
User's description: "{user_prompt}"

Look for:
- Plumbing issues (leaks, broken pipes, clogged drains, etc.)
- Electrical problems (broken switches, wiring issues, etc.)
- Carpentry needs (broken furniture, door/window issues, etc.)
- Mechanical problems (car/bike issues, etc.)
- Grooming needs (hair, beauty services, etc.)

Provide a brief description of what you see that relates to service needs."#,
        kind = content_type.as_str(),
    )
}

#[derive(Debug, thiserror::Error)]
pub enum EnhancerError {
    #[error("File analysis failed: {0}")]
    Model(#[from] ModelError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every file handed to the model
    #[derive(Default)]
    struct RecordingModel {
        uploads: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl LanguageModel for RecordingModel {
        async fn generate(&self, _prompt: &str) -> Result<String, ModelError> {
            Ok(String::new())
        }

        async fn describe_file(&self, path: &Path, mime_type: &str, _prompt: &str) -> Result<String, ModelError> {
            self.uploads
                .lock()
                .unwrap()
                .push((path.display().to_string(), mime_type.to_string()));
            Ok("  A dripping pipe under a sink.\n".to_string())
        }
    }

    #[tokio::test]
    async fn test_image_description_is_appended() {
        let model = Arc::new(RecordingModel::default());
        let enhancer = Enhancer::new(model.clone());

        let enhanced = enhancer
            .enhance(Path::new("photo.JPG"), "help me")
            .await
            .unwrap();

        assert_eq!(
            enhanced.as_deref(),
            Some("help me. File analysis: A dripping pipe under a sink.")
        );
        let uploads = model.uploads.lock().unwrap();
        assert_eq!(uploads.as_slice(), &[("photo.JPG".to_string(), "image/jpeg".to_string())]);
    }

    #[tokio::test]
    async fn test_unknown_extension_skips_model() {
        let model = Arc::new(RecordingModel::default());
        let enhancer = Enhancer::new(model.clone());

        let enhanced = enhancer.enhance(Path::new("notes.pdf"), "help me").await.unwrap();

        assert!(enhanced.is_none());
        assert!(model.uploads.lock().unwrap().is_empty());
    }

    #[test]
    fn test_description_prompt_names_media_kind() {
        let prompt = build_description_prompt(ContentType::Video, "car noise");
        assert!(prompt.starts_with("Analyze this video"));
        assert!(prompt.contains(r#"User's description: "car noise""#));
        assert!(prompt.contains("Grooming needs"));
    }
}
