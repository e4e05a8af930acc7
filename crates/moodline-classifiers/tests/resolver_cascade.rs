//! Resolution cascade tests
//!
//! Uses instrumented mock providers to verify the strict tier ordering:
//! the first success wins, later tiers are never touched, and total
//! exhaustion escalates to a fatal initialization error.

use async_trait::async_trait;
use moodline_classifiers::{ModelProvider, ModelResolver};
use moodline_core::{Error, Mode, Result};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// A configurable mock acquisition tier that counts its calls.
struct MockProvider {
    mode: Mode,
    succeeds: bool,
    calls: Arc<AtomicU32>,
}

impl MockProvider {
    fn new(mode: Mode, succeeds: bool) -> (Self, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        (
            Self {
                mode,
                succeeds,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

#[async_trait]
impl ModelProvider<&'static str> for MockProvider {
    fn mode(&self) -> Mode {
        self.mode
    }

    async fn acquire(&self) -> Result<&'static str> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.succeeds {
            Ok("model")
        } else {
            Err(Error::resolution("tier unavailable"))
        }
    }
}

#[tokio::test]
async fn first_tier_success_skips_later_tiers() {
    let (registry, registry_calls) = MockProvider::new(Mode::Registry, true);
    let (local, local_calls) = MockProvider::new(Mode::Local, true);
    let (hub, hub_calls) = MockProvider::new(Mode::HuggingFace, true);

    let resolver = ModelResolver::new(vec![
        Box::new(registry) as Box<dyn ModelProvider<&'static str>>,
        Box::new(local),
        Box::new(hub),
    ]);

    let (mode, backend) = resolver.resolve().await.unwrap();
    assert_eq!(mode, Mode::Registry);
    assert_eq!(backend, "model");

    assert_eq!(registry_calls.load(Ordering::Relaxed), 1);
    assert_eq!(local_calls.load(Ordering::Relaxed), 0);
    assert_eq!(hub_calls.load(Ordering::Relaxed), 0);
}

#[tokio::test]
async fn failed_registry_falls_through_to_local() {
    let (registry, registry_calls) = MockProvider::new(Mode::Registry, false);
    let (local, local_calls) = MockProvider::new(Mode::Local, true);
    let (hub, hub_calls) = MockProvider::new(Mode::HuggingFace, true);

    let resolver = ModelResolver::new(vec![
        Box::new(registry) as Box<dyn ModelProvider<&'static str>>,
        Box::new(local),
        Box::new(hub),
    ]);

    let (mode, _) = resolver.resolve().await.unwrap();
    assert_eq!(mode, Mode::Local);

    assert_eq!(registry_calls.load(Ordering::Relaxed), 1);
    assert_eq!(local_calls.load(Ordering::Relaxed), 1);
    assert_eq!(hub_calls.load(Ordering::Relaxed), 0);
}

#[tokio::test]
async fn last_tier_can_serve_alone() {
    let (registry, _) = MockProvider::new(Mode::Registry, false);
    let (local, _) = MockProvider::new(Mode::Local, false);
    let (hub, hub_calls) = MockProvider::new(Mode::HuggingFace, true);

    let resolver = ModelResolver::new(vec![
        Box::new(registry) as Box<dyn ModelProvider<&'static str>>,
        Box::new(local),
        Box::new(hub),
    ]);

    let (mode, _) = resolver.resolve().await.unwrap();
    assert_eq!(mode, Mode::HuggingFace);
    assert_eq!(hub_calls.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn exhausted_cascade_is_a_fatal_initialization_error() {
    let (registry, _) = MockProvider::new(Mode::Registry, false);
    let (local, _) = MockProvider::new(Mode::Local, false);
    let (hub, _) = MockProvider::new(Mode::HuggingFace, false);

    let resolver = ModelResolver::new(vec![
        Box::new(registry) as Box<dyn ModelProvider<&'static str>>,
        Box::new(local),
        Box::new(hub),
    ]);

    let err = resolver.resolve().await.unwrap_err();
    assert!(matches!(err, Error::Initialization(_)));
    assert!(err.is_fatal());
    // The aggregate message names every tier that was tried.
    let message = err.to_string();
    assert!(message.contains("registry"));
    assert!(message.contains("local"));
    assert!(message.contains("huggingface"));
}
