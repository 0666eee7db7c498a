// Routing system - classifies service requests and finds matching workers

pub mod catalog;
pub mod classifier;
pub mod enhancer;
pub mod matcher;
pub mod model;
pub mod redirect;
pub mod retry;
pub mod router;
pub mod types;
pub mod workers;

pub use classifier::Classifier;
pub use enhancer::Enhancer;
pub use model::{GeminiClient, LanguageModel, ModelError};
pub use router::{Router, RouterError};
pub use types::*;
pub use workers::WorkerDirectory;
