//! Resolver configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the model-resolution cascade.
///
/// Every field has a default so an empty config section resolves against the
/// conventional deployment layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Model registry settings (tier 1)
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Filesystem path of the persisted training artifact (tier 2)
    #[serde(default = "default_local_model_path")]
    pub local_model_path: PathBuf,

    /// Hugging Face Hub model identifier for the pretrained fallback (tier 3)
    #[serde(default = "default_fallback_model_id")]
    pub fallback_model_id: String,

    /// Inference device (`cpu`, `cuda`, `metal`)
    #[serde(default = "default_device")]
    pub device: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            registry: RegistryConfig::default(),
            local_model_path: default_local_model_path(),
            fallback_model_id: default_fallback_model_id(),
            device: default_device(),
        }
    }
}

/// Model registry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Base URL of the MLflow-style tracking server
    #[serde(default = "default_tracking_url")]
    pub tracking_url: String,

    /// Symbolic name of the registered model
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Deployment stage tag to resolve
    #[serde(default = "default_stage")]
    pub stage: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            tracking_url: default_tracking_url(),
            model_name: default_model_name(),
            stage: default_stage(),
        }
    }
}

fn default_tracking_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_model_name() -> String {
    "title-sentiment".to_string()
}

fn default_stage() -> String {
    "Production".to_string()
}

fn default_local_model_path() -> PathBuf {
    PathBuf::from("./models/distilbert_sentiment/final_model")
}

fn default_fallback_model_id() -> String {
    "distilbert-base-uncased-finetuned-sst-2-english".to_string()
}

fn default_device() -> String {
    "cpu".to_string()
}
