//! Inference backends and output normalization
//!
//! The three acquisition tiers produce two structurally different inference
//! shapes: the registry and local tiers hold a raw classifier emitting class
//! indices over logits, while the fallback tier holds an end-to-end pipeline
//! emitting its own label strings. `Backend` is the tagged union over those
//! shapes; each variant's adapter translates its native output into a plain
//! `(label, confidence)` pair so everything above it stays backend-agnostic.

use crate::loader;
use crate::sequence::SequenceClassifier;
use candle_core::{Device, Tensor, D};
use moodline_core::{Error, LabelMap, Result};
use std::path::Path;

/// A model emitting raw class-index predictions with probabilities.
///
/// The seam between the backend adapters and the concrete candle models;
/// label translation happens above it, tensor work below it.
pub trait Classifier: Send + Sync {
    /// Predict the class of `text`, returning the argmax class index and
    /// its softmax probability.
    fn predict(&self, text: &str) -> Result<(usize, f32)>;
}

/// A loaded, ready-to-use inference backend.
pub enum Backend {
    /// Raw classifier + three-way label map (registry and local tiers)
    Sequence {
        classifier: Box<dyn Classifier>,
        labels: LabelMap,
    },
    /// Pretrained end-to-end pipeline (fallback tier)
    Pipeline(SentimentPipeline),
}

impl Backend {
    /// Load a trained sentiment classifier from a model directory, paired
    /// with the fixed three-way label map.
    pub fn sequence_from_dir(model_path: &Path, device: &Device) -> Result<Self> {
        let labels = LabelMap::sentiment();
        let classifier = SequenceClassifier::from_dir(model_path, labels.len(), device)?;
        Ok(Self::Sequence {
            classifier: Box::new(classifier),
            labels,
        })
    }

    /// Run inference, returning the canonical label and an unrounded
    /// confidence in [0, 1].
    pub fn infer(&self, text: &str) -> Result<(String, f64)> {
        match self {
            Self::Sequence { classifier, labels } => {
                let (index, confidence) = classifier.predict(text)?;
                let label = labels.get(index).ok_or_else(|| {
                    Error::inference(format!("class index {} outside label map", index))
                })?;
                Ok((label.to_string(), confidence as f64))
            }
            Self::Pipeline(pipeline) => pipeline.predict(text),
        }
    }
}

/// Pretrained sentiment pipeline built from a public Hub model.
///
/// Carries the model's own label vocabulary (binary for the SST-2 fallback)
/// rather than the three-way sentiment map; the label space asymmetry is
/// deliberate and must not be papered over with a synthetic neutral class.
pub struct SentimentPipeline {
    pub(crate) classifier: Box<dyn Classifier>,
    pub(crate) labels: Vec<String>,
}

impl SentimentPipeline {
    /// Download and build the pipeline from a Hub model identifier.
    pub fn from_hub(model_id: &str, device: &Device) -> Result<Self> {
        let model_dir = loader::fetch_from_hub(model_id)?;

        let config_json = loader::read_model_config(&model_dir)?;
        let labels = loader::id2label_from_config(&config_json).ok_or_else(|| {
            Error::resolution(format!("Model '{}' declares no id2label map", model_id))
        })?;

        let classifier = SequenceClassifier::from_dir(&model_dir, labels.len(), device)?;
        Ok(Self {
            classifier: Box::new(classifier),
            labels,
        })
    }

    /// Classify `text` with the pipeline's native vocabulary, lowercased to
    /// the canonical form.
    pub fn predict(&self, text: &str) -> Result<(String, f64)> {
        let (index, confidence) = self.classifier.predict(text)?;
        let label = self.labels.get(index).ok_or_else(|| {
            Error::inference(format!("class index {} outside pipeline labels", index))
        })?;
        Ok((normalize_pipeline_label(label), confidence as f64))
    }
}

/// Lowercase a pipeline's native label (`POSITIVE` -> `positive`).
pub(crate) fn normalize_pipeline_label(label: &str) -> String {
    label.to_lowercase()
}

/// Softmax a logits tensor into a probability vector.
pub(crate) fn to_probabilities(logits: &Tensor) -> Result<Vec<f32>> {
    candle_nn::ops::softmax(logits, D::Minus1)
        .map_err(|e| Error::inference(format!("Softmax failed: {}", e)))?
        .squeeze(0)
        .map_err(|e| Error::inference(format!("Squeeze failed: {}", e)))?
        .to_vec1()
        .map_err(|e| Error::inference(format!("Failed to convert to vec: {}", e)))
}

/// Pick the highest-probability class and its probability.
pub(crate) fn argmax_with_confidence(probs: &[f32]) -> Result<(usize, f32)> {
    probs
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(index, prob)| (index, *prob))
        .ok_or_else(|| Error::inference("Model produced no class probabilities"))
}

/// Round a confidence value to 4 decimal digits, the response contract's
/// precision.
pub fn round_confidence(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probabilities_of(logits: &[f32]) -> Vec<f32> {
        let tensor = Tensor::new(logits, &Device::Cpu)
            .unwrap()
            .unsqueeze(0)
            .unwrap();
        to_probabilities(&tensor).unwrap()
    }

    #[test]
    fn softmax_argmax_selects_class_two_for_skewed_logits() {
        let probs = probabilities_of(&[0.1, 0.2, 0.7]);
        let (index, confidence) = argmax_with_confidence(&probs).unwrap();

        assert_eq!(index, 2);
        // softmax([0.1, 0.2, 0.7])[2] = e^0.7 / (e^0.1 + e^0.2 + e^0.7)
        let rounded = round_confidence(confidence as f64);
        assert!((rounded - 0.464).abs() < 1e-9, "got {rounded}");
    }

    #[test]
    fn probabilities_form_a_distribution() {
        let probs = probabilities_of(&[1.5, -0.3, 0.2]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn softmax_is_deterministic_for_fixed_logits() {
        let first = probabilities_of(&[0.1, 0.2, 0.7]);
        let second = probabilities_of(&[0.1, 0.2, 0.7]);
        assert_eq!(first, second);
    }

    #[test]
    fn pipeline_labels_normalize_to_lowercase() {
        assert_eq!(normalize_pipeline_label("POSITIVE"), "positive");
        assert_eq!(normalize_pipeline_label("NEGATIVE"), "negative");
        assert_eq!(normalize_pipeline_label("negative"), "negative");
    }

    #[test]
    fn confidence_rounds_to_four_decimals() {
        assert_eq!(round_confidence(0.90004), 0.9);
        assert_eq!(round_confidence(0.46396339), 0.464);
        assert_eq!(round_confidence(1.0), 1.0);
        assert_eq!(round_confidence(0.0), 0.0);
    }
}
