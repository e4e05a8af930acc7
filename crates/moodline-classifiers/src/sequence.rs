//! Fine-tuned DistilBERT classifier for the registry/local tiers
//!
//! Wraps a classifier + tokenizer pair loaded from a model directory. The
//! output is a raw class index with its probability; translating that into
//! a sentiment label is the backend adapter's job.

use crate::backend::Classifier;
use crate::loader;
use candle_core::{Device, IndexOp, Tensor};
use candle_nn::{Linear, Module};
use candle_transformers::models::distilbert::{Config as DistilBertConfig, DistilBertModel};
use moodline_core::{Error, Result};
use std::path::Path;
use tokenizers::{Tokenizer, TruncationDirection};

/// Titles longer than this are truncated before the forward pass.
const MAX_SEQ_LEN: usize = 128;

/// A fine-tuned DistilBERT sequence-classification model.
pub struct SequenceClassifier {
    tokenizer: Tokenizer,
    model: DistilBertModel,
    pre_classifier: Option<Linear>,
    classifier: Linear,
    device: Device,
}

impl SequenceClassifier {
    /// Load a classifier + tokenizer pair from a model directory containing
    /// `config.json`, `model.safetensors`, and tokenizer files.
    pub fn from_dir(model_path: &Path, num_labels: usize, device: &Device) -> Result<Self> {
        let tokenizer = loader::load_tokenizer(model_path)?;

        let config_json = loader::read_model_config(model_path)?;
        let hidden_size = loader::hidden_size_from_config(&config_json);

        let distilbert_config: DistilBertConfig = serde_json::from_value(config_json)
            .map_err(|e| Error::resolution(format!("unusable model config: {}", e)))?;

        let vb = loader::load_var_builder(model_path, device)?;

        let model = DistilBertModel::load(vb.pp("distilbert"), &distilbert_config)
            .map_err(|e| Error::resolution(format!("DistilBERT backbone rejected: {}", e)))?;

        // Older exports skip the intermediate projection; tolerate both.
        let pre_classifier =
            candle_nn::linear(hidden_size, hidden_size, vb.pp("pre_classifier")).ok();

        // No trained head means the artifact cannot classify; fail the tier
        // rather than serving an untrained projection.
        let classifier = candle_nn::linear(hidden_size, num_labels, vb.pp("classifier"))
            .map_err(|e| Error::resolution(format!("no usable classification head: {}", e)))?;

        tracing::info!(
            "sequence classifier ready: {} ({} labels, hidden {})",
            model_path.display(),
            num_labels,
            hidden_size
        );

        Ok(Self {
            tokenizer,
            model,
            pre_classifier,
            classifier,
            device: device.clone(),
        })
    }

    fn encode(&self, text: &str) -> Result<(Tensor, Tensor)> {
        let mut encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| Error::inference(format!("tokenization failed: {}", e)))?;
        encoding.truncate(MAX_SEQ_LEN, 0, TruncationDirection::Right);

        let ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();

        // Candle's DistilBERT wants the mask inverted: 1 marks padding.
        let mask: Vec<u8> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| u8::from(m == 0))
            .collect();

        let input_ids = Tensor::new(ids.as_slice(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::inference(format!("building input tensor: {}", e)))?;
        let attention_mask = Tensor::new(mask.as_slice(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::inference(format!("building attention mask: {}", e)))?;

        Ok((input_ids, attention_mask))
    }
}

impl Classifier for SequenceClassifier {
    fn predict(&self, text: &str) -> Result<(usize, f32)> {
        let (input_ids, attention_mask) = self.encode(text)?;

        let hidden_states = self
            .model
            .forward(&input_ids, &attention_mask)
            .map_err(|e| Error::inference(format!("forward pass failed: {}", e)))?;

        // First-token pooling, then the export's classification head.
        let pooled = hidden_states
            .i((0, 0, ..))
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::inference(format!("pooling failed: {}", e)))?;

        let pooled = match &self.pre_classifier {
            Some(projection) => projection
                .forward(&pooled)
                .and_then(|t| t.relu())
                .map_err(|e| Error::inference(format!("pre-classifier failed: {}", e)))?,
            None => pooled,
        };

        let logits = self
            .classifier
            .forward(&pooled)
            .map_err(|e| Error::inference(format!("classification head failed: {}", e)))?;

        let probs = crate::backend::to_probabilities(&logits)?;
        crate::backend::argmax_with_confidence(&probs)
    }
}
