//! handyroute - routes free-text service requests to home-service categories
//!
//! A request (optionally with an image or video) is classified into one of six
//! service categories with the help of a generative-language model, narrowed to
//! a subcategory, matched against a worker backend and turned into a booking
//! redirect URL.

pub mod config;
pub mod routing;

pub use config::{ConfigError, Settings};
pub use routing::{ClassificationResult, Router, RouterError};
