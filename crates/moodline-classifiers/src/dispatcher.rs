//! Inference dispatch over the resolved backend

use crate::backend::round_confidence;
use crate::resolver::Resolution;
use moodline_core::{Error, InferenceResult, Mode, Result};
use std::sync::Arc;

/// Routes classification requests to the backend fixed at resolution time.
///
/// Stateless across calls: it only reads the immutable `Resolution`, so it
/// is safe to call concurrently. Compute scheduling (thread pools, blocking
/// offload) is the host's concern.
#[derive(Clone)]
pub struct InferenceDispatcher {
    resolution: Arc<Resolution>,
}

impl InferenceDispatcher {
    pub fn new(resolution: Arc<Resolution>) -> Self {
        Self { resolution }
    }

    /// The tier serving inference.
    pub fn mode(&self) -> Mode {
        self.resolution.mode()
    }

    /// Classify `text`, normalizing whatever the active backend natively
    /// returns into the single response contract.
    pub fn classify(&self, text: &str) -> Result<InferenceResult> {
        let backend = self
            .resolution
            .backend()
            .ok_or_else(|| Error::inference("model is not initialized"))?;

        let (sentiment, confidence) = backend.infer(text)?;

        Ok(InferenceResult {
            sentiment,
            confidence: round_confidence(confidence),
            source: self.resolution.mode(),
        })
    }
}
