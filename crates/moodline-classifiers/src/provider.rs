//! Model acquisition providers, one per resolution tier

use crate::backend::{Backend, SentimentPipeline};
use crate::config::ResolverConfig;
use crate::loader;
use crate::registry::RegistryClient;
use async_trait::async_trait;
use candle_core::Device;
use moodline_core::{Mode, Result};
use std::path::PathBuf;

/// One acquisition strategy in the resolution cascade.
///
/// `acquire` either produces a fully constructed backend or a typed error;
/// a failed attempt drops everything it built, so no partial state can leak
/// into the next tier.
#[async_trait]
pub trait ModelProvider<B>: Send + Sync {
    /// The mode tag recorded if this provider succeeds.
    fn mode(&self) -> Mode;

    /// Attempt to acquire a ready-to-use backend.
    async fn acquire(&self) -> Result<B>;
}

/// Tier 1: the production model from the central registry.
pub struct RegistryProvider {
    client: RegistryClient,
    model_name: String,
    stage: String,
    device: Device,
}

impl RegistryProvider {
    pub fn new(config: &ResolverConfig, device: Device) -> Self {
        Self {
            client: RegistryClient::new(config.registry.tracking_url.clone()),
            model_name: config.registry.model_name.clone(),
            stage: config.registry.stage.clone(),
            device,
        }
    }
}

#[async_trait]
impl ModelProvider<Backend> for RegistryProvider {
    fn mode(&self) -> Mode {
        Mode::Registry
    }

    async fn acquire(&self) -> Result<Backend> {
        let artifact_dir = self
            .client
            .production_artifact(&self.model_name, &self.stage)
            .await?;
        Backend::sequence_from_dir(&artifact_dir, &self.device)
    }
}

/// Tier 2: the last-known-good snapshot on local disk.
pub struct LocalProvider {
    model_path: PathBuf,
    device: Device,
}

impl LocalProvider {
    pub fn new(config: &ResolverConfig, device: Device) -> Self {
        Self {
            model_path: config.local_model_path.clone(),
            device,
        }
    }
}

#[async_trait]
impl ModelProvider<Backend> for LocalProvider {
    fn mode(&self) -> Mode {
        Mode::Local
    }

    async fn acquire(&self) -> Result<Backend> {
        Backend::sequence_from_dir(&self.model_path, &self.device)
    }
}

/// Tier 3: a generic pretrained pipeline from the Hugging Face Hub.
pub struct HubProvider {
    model_id: String,
    device: Device,
}

impl HubProvider {
    pub fn new(config: &ResolverConfig, device: Device) -> Self {
        Self {
            model_id: config.fallback_model_id.clone(),
            device,
        }
    }
}

#[async_trait]
impl ModelProvider<Backend> for HubProvider {
    fn mode(&self) -> Mode {
        Mode::HuggingFace
    }

    async fn acquire(&self) -> Result<Backend> {
        let model_id = self.model_id.clone();
        let device = self.device.clone();

        // Hub download and weight loading block on file IO; keep them off
        // the async executor.
        let pipeline = tokio::task::spawn_blocking(move || {
            SentimentPipeline::from_hub(&model_id, &device)
        })
        .await
        .map_err(|e| {
            moodline_core::Error::resolution(format!("hub download task failed: {}", e))
        })??;

        Ok(Backend::Pipeline(pipeline))
    }
}

/// Build the three production providers in strict priority order.
pub fn providers_from_config(
    config: &ResolverConfig,
) -> Result<Vec<Box<dyn ModelProvider<Backend>>>> {
    let device = loader::get_device(&config.device)?;
    Ok(vec![
        Box::new(RegistryProvider::new(config, device.clone())),
        Box::new(LocalProvider::new(config, device.clone())),
        Box::new(HubProvider::new(config, device)),
    ])
}
