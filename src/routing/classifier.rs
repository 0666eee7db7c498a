// Classifier - picks a service category, trusting the model first and keywords second

use super::catalog::{KEYWORDS, category_listing};
use super::model::LanguageModel;
use super::types::CategoryId;
use std::sync::Arc;

/// Which resolution step produced the category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The model answered with a category id
    Exact,
    /// A keyword appeared in the model's answer
    ModelKeyword,
    /// A keyword appeared in the request itself
    PromptKeyword,
}

/// Asks the language model for a category and falls back to the keyword table
pub struct Classifier {
    model: Arc<dyn LanguageModel>,
}

impl Classifier {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Classify a (possibly enhanced) request
    pub async fn classify(&self, prompt: &str) -> Result<CategoryId, ClassifierError> {
        let raw = match self.model.generate(&build_classification_prompt(prompt)).await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(error = %e, "classification call failed, using keyword fallback");
                None
            }
        };

        let (category, resolution) =
            resolve_category(raw.as_deref(), prompt).ok_or_else(|| ClassifierError::Unresolved {
                prompt: prompt.to_string(),
            })?;

        tracing::debug!(%category, ?resolution, "category resolved");
        Ok(category)
    }
}

/// Build the single classification instruction sent to the model
pub fn build_classification_prompt(prompt: &str) -> String {
    format!(
        "You are a multilingual service-request interpreter.\n\
         Step 1: Detect the language of the user's message. If it's not in English, translate it.\n\
         Step 2: Based on the English request, choose the most relevant category from the list below.\n\
         Step 3: Output only the category ID in lowercase. No extra text or explanation.\n\n\
         Available Categories:\n{}\n\n\
         User Request: \"{}\"",
        category_listing(),
        prompt
    )
}

/// Trim, lowercase and strip periods and newlines from a model answer
pub fn normalize_output(raw: &str) -> String {
    raw.trim().to_lowercase().replace(['.', '\n'], "")
}

/// Resolve a category from the model's raw answer and the request text.
///
/// Tries, in order: an exact category id, a keyword inside the answer, and a
/// keyword word inside the request. `raw` is `None` when the model call failed.
pub fn resolve_category(raw: Option<&str>, prompt: &str) -> Option<(CategoryId, Resolution)> {
    if let Some(raw) = raw {
        let output = normalize_output(raw);

        if let Some(category) = CategoryId::from_id(&output) {
            return Some((category, Resolution::Exact));
        }

        if let Some((_, category)) = KEYWORDS.iter().find(|(keyword, _)| output.contains(keyword)) {
            return Some((*category, Resolution::ModelKeyword));
        }
    }

    let prompt_lower = prompt.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(keyword, _)| keyword.split_whitespace().any(|word| prompt_lower.contains(word)))
        .map(|(_, category)| (*category, Resolution::PromptKeyword))
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Could not determine service category for: '{prompt}'")]
    Unresolved { prompt: String },
}
