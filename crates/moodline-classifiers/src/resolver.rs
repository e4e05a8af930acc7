//! Tiered model resolution
//!
//! Runs the acquisition cascade exactly once at startup: each tier is tried
//! in strict priority order, any single tier's failure is absorbed and
//! logged, and the first success fixes the process-wide mode. Only total
//! exhaustion escalates, as a fatal initialization error.

use crate::backend::Backend;
use crate::config::ResolverConfig;
use crate::provider::{providers_from_config, ModelProvider};
use moodline_core::{Error, Mode, Result};

/// Ordered model-acquisition cascade.
pub struct ModelResolver<B> {
    providers: Vec<Box<dyn ModelProvider<B>>>,
}

impl<B> ModelResolver<B> {
    /// Build a resolver over providers in priority order.
    pub fn new(providers: Vec<Box<dyn ModelProvider<B>>>) -> Self {
        Self { providers }
    }

    /// Run the cascade, stopping at the first tier that succeeds.
    ///
    /// Consumes the resolver: resolution happens once per process lifetime
    /// and is never retried.
    pub async fn resolve(self) -> Result<(Mode, B)> {
        let mut failures = Vec::new();

        for provider in self.providers {
            let mode = provider.mode();
            tracing::info!("Trying to acquire model ({} tier)", mode);

            match provider.acquire().await {
                Ok(backend) => {
                    tracing::info!("Model acquired ({} tier)", mode);
                    return Ok((mode, backend));
                }
                Err(e) => {
                    tracing::warn!("{} tier unavailable: {}", mode, e);
                    failures.push(format!("{}: {}", mode, e));
                }
            }
        }

        Err(Error::initialization(format!(
            "all model acquisition tiers failed [{}]",
            failures.join(" | ")
        )))
    }
}

impl ModelResolver<Backend> {
    /// Build the production cascade (registry, local, hub) from config.
    pub fn from_config(config: &ResolverConfig) -> Result<Self> {
        Ok(Self::new(providers_from_config(config)?))
    }
}

/// The immutable outcome of resolution: the active mode and its backend.
///
/// Constructed once at startup and shared read-only for the process
/// lifetime; inference never re-attempts resolution.
pub struct Resolution {
    mode: Mode,
    backend: Option<Backend>,
}

impl Resolution {
    /// Run the production cascade and fix the process-wide resolution.
    pub async fn establish(config: &ResolverConfig) -> Result<Self> {
        let (mode, backend) = ModelResolver::from_config(config)?.resolve().await?;
        Ok(Self {
            mode,
            backend: Some(backend),
        })
    }

    /// Wrap an already-acquired backend (used when the cascade is driven
    /// externally).
    pub fn from_parts(mode: Mode, backend: Backend) -> Self {
        Self {
            mode,
            backend: Some(backend),
        }
    }

    /// A resolution that holds no model. Requests against it are answered
    /// with a server-side "not initialized" error; the normal startup path
    /// never constructs this because total failure aborts the process.
    pub fn unavailable() -> Self {
        Self {
            mode: Mode::Unavailable,
            backend: None,
        }
    }

    /// The tier that is serving inference.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The live backend, if any.
    pub fn backend(&self) -> Option<&Backend> {
        self.backend.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_resolution_holds_no_backend() {
        let resolution = Resolution::unavailable();
        assert_eq!(resolution.mode(), Mode::Unavailable);
        assert!(resolution.backend().is_none());
    }
}
