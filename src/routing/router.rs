// Router - runs a request through enhancement, classification, matching and worker lookup

use super::classifier::{Classifier, ClassifierError};
use super::enhancer::Enhancer;
use super::matcher::best_subcategory;
use super::model::{GeminiClient, LanguageModel, ModelError};
use super::redirect::booking_url;
use super::types::{ClassificationResult, CategoryId, RouterConfig, WorkersPayload};
use super::workers::{WorkerDirectory, WorkerError};
use crate::config::Settings;
use std::path::Path;
use std::sync::Arc;

/// Main entry point that turns a service request into a booking target
pub struct Router {
    enhancer: Enhancer,
    classifier: Classifier,
    workers: WorkerDirectory,
}

impl Router {
    /// Create a router backed by Gemini
    pub fn new(api_key: impl Into<String>, config: RouterConfig) -> Result<Self, RouterError> {
        let model = Arc::new(GeminiClient::new(api_key, &config)?);
        Self::with_model(model, config)
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, RouterError> {
        Self::new(settings.api_key.clone(), settings.router.clone())
    }

    /// Create a router around any language model
    pub fn with_model(model: Arc<dyn LanguageModel>, config: RouterConfig) -> Result<Self, RouterError> {
        let workers = WorkerDirectory::new(&config)?;
        Ok(Self {
            enhancer: Enhancer::new(model.clone()),
            classifier: Classifier::new(model),
            workers,
        })
    }

    /// Classify a request and find workers for it.
    ///
    /// Only an unresolvable category is an error. A failed file analysis falls
    /// back to the original prompt and a failed worker lookup is reported inside
    /// the result.
    pub async fn route(&self, prompt: &str, file: Option<&Path>) -> Result<ClassificationResult, RouterError> {
        let enhanced = match file {
            Some(path) => self.enhance_prompt(path, prompt).await,
            None => prompt.to_string(),
        };

        let category = self.classifier.classify(&enhanced).await?;
        let subcategory = best_subcategory(category, &enhanced);
        tracing::info!(%category, subcategory = subcategory.unwrap_or("-"), "request classified");

        let workers = self.find_workers(category, subcategory).await;

        Ok(ClassificationResult {
            category,
            category_name: category.name().to_string(),
            subcategory: subcategory.map(str::to_string),
            keyword: category,
            workers,
            redirect_url: booking_url(category, subcategory),
            user_prompt: prompt.to_string(),
            enhanced_prompt: (enhanced != prompt).then_some(enhanced),
        })
    }

    async fn enhance_prompt(&self, path: &Path, prompt: &str) -> String {
        match self.enhancer.enhance(path, prompt).await {
            Ok(Some(enhanced)) => enhanced,
            Ok(None) => prompt.to_string(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "file analysis failed, using original prompt");
                prompt.to_string()
            }
        }
    }

    async fn find_workers(&self, category: CategoryId, subcategory: Option<&str>) -> WorkersPayload {
        match self.workers.lookup(category, subcategory).await {
            Ok(body) => WorkersPayload::Found(body),
            Err(e) => {
                tracing::warn!(%category, error = %e, "worker lookup failed");
                WorkersPayload::unavailable(e.to_string())
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error(transparent)]
    Classification(#[from] ClassifierError),

    #[error("Model client error: {0}")]
    Model(#[from] ModelError),

    #[error("Worker client error: {0}")]
    Workers(#[from] WorkerError),
}
