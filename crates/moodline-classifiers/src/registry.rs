//! Model registry client
//!
//! Talks to an MLflow-style tracking server to resolve a symbolic model name
//! and stage tag to a concrete artifact directory. Every failure here is a
//! routine `Resolution` error: the cascade treats an unreachable or empty
//! registry the same way and falls through to the next tier.

use moodline_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// HTTP client for the model registry.
pub struct RegistryClient {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct LatestVersionsRequest<'a> {
    name: &'a str,
    stages: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct LatestVersionsResponse {
    #[serde(default)]
    model_versions: Vec<ModelVersion>,
}

#[derive(Debug, Deserialize)]
struct ModelVersion {
    version: String,
    #[serde(default)]
    current_stage: String,
    source: String,
}

impl RegistryClient {
    /// Create a client for the tracking server at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Resolve the artifact directory of the latest version of `name` in
    /// `stage`.
    pub async fn production_artifact(&self, name: &str, stage: &str) -> Result<PathBuf> {
        let url = format!(
            "{}/api/2.0/mlflow/registered-models/get-latest-versions",
            self.base_url.trim_end_matches('/')
        );

        let response = self
            .http
            .post(&url)
            .json(&LatestVersionsRequest {
                name,
                stages: vec![stage],
            })
            .send()
            .await
            .map_err(|e| Error::resolution(format!("registry unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::resolution(format!(
                "registry returned {} for model '{}'",
                response.status(),
                name
            )));
        }

        let body: LatestVersionsResponse = response
            .json()
            .await
            .map_err(|e| Error::resolution(format!("malformed registry response: {}", e)))?;

        let version = body.model_versions.into_iter().next().ok_or_else(|| {
            Error::resolution(format!("no '{}' version registered for model '{}'", stage, name))
        })?;

        tracing::info!(
            "Resolved model '{}' version {} (stage {})",
            name,
            version.version,
            version.current_stage
        );

        artifact_path(&version.source)
    }
}

/// Translate a registry artifact URI into a local filesystem path.
///
/// Only local artifact stores are supported; remote schemes fail the tier.
fn artifact_path(source: &str) -> Result<PathBuf> {
    if let Some(path) = source.strip_prefix("file://") {
        return Ok(PathBuf::from(path));
    }
    if source.contains("://") {
        return Err(Error::resolution(format!(
            "unsupported artifact scheme in '{}'",
            source
        )));
    }
    Ok(PathBuf::from(source))
}
