//! Shared types for model resolution and inference results

use serde::{Deserialize, Serialize};

/// Which model-acquisition tier is serving inference.
///
/// Set exactly once when resolution completes and never reassigned; the
/// resolved value rides along with every response as its `source` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Production model pulled from the central model registry
    Registry,
    /// Last-known-good snapshot loaded from local disk
    Local,
    /// Generic pretrained pipeline from the Hugging Face Hub
    HuggingFace,
    /// No tier succeeded; the service must not reach this at request time
    Unavailable,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Mode::Registry => "registry",
            Mode::Local => "local",
            Mode::HuggingFace => "huggingface",
            Mode::Unavailable => "unavailable",
        };
        write!(f, "{tag}")
    }
}

/// Normalized inference output, identical for every backend tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    /// Canonical sentiment label (`negative`, `neutral`, `positive`; the
    /// fallback tier's label space is the binary subset)
    pub sentiment: String,
    /// Probability of the predicted label, rounded to 4 decimal digits
    pub confidence: f64,
    /// Which tier answered
    pub source: Mode,
}

/// Fixed class-index to sentiment-label translation.
///
/// Used only by the registry/local tiers, which emit integer class indices.
/// The fallback pipeline carries its own label vocabulary and bypasses this.
#[derive(Debug, Clone)]
pub struct LabelMap {
    labels: Vec<String>,
}

impl LabelMap {
    /// The three-way sentiment map used by the trained model tiers.
    pub fn sentiment() -> Self {
        Self {
            labels: vec![
                "negative".to_string(),
                "neutral".to_string(),
                "positive".to_string(),
            ],
        }
    }

    /// Build a map from an ordered label list.
    pub fn from_labels(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Translate a class index to its label.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Number of classes in the map.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the map holds no labels.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_serializes_to_lowercase_tags() {
        assert_eq!(serde_json::to_string(&Mode::Registry).unwrap(), "\"registry\"");
        assert_eq!(serde_json::to_string(&Mode::Local).unwrap(), "\"local\"");
        assert_eq!(
            serde_json::to_string(&Mode::HuggingFace).unwrap(),
            "\"huggingface\""
        );
    }

    #[test]
    fn sentiment_label_map_is_three_way() {
        let map = LabelMap::sentiment();
        assert_eq!(map.len(), 3);
        assert_eq!(map.get(0), Some("negative"));
        assert_eq!(map.get(1), Some("neutral"));
        assert_eq!(map.get(2), Some("positive"));
        assert_eq!(map.get(3), None);
    }

    #[test]
    fn inference_result_wire_shape() {
        let result = InferenceResult {
            sentiment: "positive".to_string(),
            confidence: 0.464,
            source: Mode::Local,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["sentiment"], "positive");
        assert_eq!(json["confidence"], 0.464);
        assert_eq!(json["source"], "local");
    }
}
