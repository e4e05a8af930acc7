//! Moodline Classifiers
//!
//! Tiered model resolution and sentiment inference, built on Candle.
//!
//! At startup the [`ModelResolver`] runs a three-tier acquisition cascade:
//! the production model from a central registry, then a persisted local
//! snapshot, then a generic pretrained pipeline from the Hugging Face Hub.
//! The first tier to succeed fixes the process-wide [`Resolution`], and the
//! [`InferenceDispatcher`] routes every request through it, returning the
//! same normalized result regardless of which tier is live.

pub mod backend;
pub mod config;
pub mod dispatcher;
pub mod loader;
pub mod provider;
pub mod registry;
pub mod resolver;
pub mod sequence;

pub use backend::{round_confidence, Backend, Classifier, SentimentPipeline};
pub use config::{RegistryConfig, ResolverConfig};
pub use dispatcher::InferenceDispatcher;
pub use provider::{HubProvider, LocalProvider, ModelProvider, RegistryProvider};
pub use registry::RegistryClient;
pub use resolver::{ModelResolver, Resolution};
pub use sequence::SequenceClassifier;
