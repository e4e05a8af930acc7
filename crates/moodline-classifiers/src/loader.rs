//! Shared loading helpers for Candle models and tokenizers

use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use moodline_core::{Error, Result};
use std::path::{Path, PathBuf};
use tokenizers::Tokenizer;

/// Resolve a Candle device from a configuration string.
///
/// Anything unrecognized maps to CPU, which always exists.
pub fn get_device(device_str: &str) -> Result<Device> {
    match device_str.to_lowercase().as_str() {
        "cuda" | "cuda:0" => {
            Device::new_cuda(0).map_err(|e| Error::config(format!("CUDA unavailable: {}", e)))
        }
        "mps" | "metal" => {
            Device::new_metal(0).map_err(|e| Error::config(format!("Metal unavailable: {}", e)))
        }
        _ => Ok(Device::Cpu),
    }
}

/// Load a tokenizer from a model directory: `tokenizer.json` when the
/// export carries one, otherwise a WordPiece tokenizer assembled from
/// `vocab.txt`.
pub fn load_tokenizer(model_path: &Path) -> Result<Tokenizer> {
    let fast_path = model_path.join("tokenizer.json");
    if fast_path.exists() {
        return Tokenizer::from_file(&fast_path)
            .map_err(|e| Error::resolution(format!("broken tokenizer.json: {}", e)));
    }

    let vocab_path = model_path.join("vocab.txt");
    if vocab_path.exists() {
        tracing::debug!("no tokenizer.json, assembling WordPiece from vocab.txt");
        return wordpiece_from_vocab(&vocab_path);
    }

    Err(Error::resolution(format!(
        "no tokenizer in {} (need tokenizer.json or vocab.txt)",
        model_path.display()
    )))
}

fn wordpiece_from_vocab(vocab_path: &Path) -> Result<Tokenizer> {
    use tokenizers::models::wordpiece::WordPiece;
    use tokenizers::normalizers::BertNormalizer;
    use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
    use tokenizers::processors::bert::BertProcessing;

    let wordpiece = WordPiece::from_file(vocab_path.to_string_lossy().as_ref())
        .unk_token("[UNK]".to_string())
        .build()
        .map_err(|e| Error::resolution(format!("vocab.txt rejected: {}", e)))?;

    let mut tokenizer = Tokenizer::new(wordpiece);
    tokenizer.with_normalizer(Some(BertNormalizer::default()));
    tokenizer.with_pre_tokenizer(Some(BertPreTokenizer));
    tokenizer.with_post_processor(Some(BertProcessing::new(
        ("[SEP]".to_string(), 102),
        ("[CLS]".to_string(), 101),
    )));

    Ok(tokenizer)
}

/// Memory-map a model directory's SafeTensors weights.
pub fn load_var_builder(model_path: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let weights = model_path.join("model.safetensors");
    if !weights.exists() {
        return Err(Error::resolution(format!(
            "{} has no model.safetensors",
            model_path.display()
        )));
    }

    unsafe {
        VarBuilder::from_mmaped_safetensors(&[weights], DType::F32, device)
            .map_err(|e| Error::resolution(format!("weights unreadable: {}", e)))
    }
}

/// Read and parse a model's `config.json`.
pub fn read_model_config(model_path: &Path) -> Result<serde_json::Value> {
    let config_path = model_path.join("config.json");
    let config_str = std::fs::read_to_string(&config_path).map_err(|e| {
        Error::resolution(format!(
            "Failed to read config {}: {}",
            config_path.display(),
            e
        ))
    })?;

    serde_json::from_str(&config_str).map_err(|e| {
        Error::resolution(format!(
            "Failed to parse config {}: {}",
            config_path.display(),
            e
        ))
    })
}

/// Extract the transformer hidden size from a parsed `config.json`.
///
/// DistilBERT exports name the field `dim`; other BERT-family exports use
/// `hidden_dim` or `hidden_size`.
pub fn hidden_size_from_config(config_json: &serde_json::Value) -> usize {
    config_json
        .get("dim")
        .or_else(|| config_json.get("hidden_dim"))
        .or_else(|| config_json.get("hidden_size"))
        .and_then(|v| v.as_u64())
        .unwrap_or(768) as usize
}

/// Extract the ordered label list from a parsed `config.json` `id2label` map.
pub fn id2label_from_config(config_json: &serde_json::Value) -> Option<Vec<String>> {
    let map = config_json.get("id2label")?.as_object()?;

    let mut entries: Vec<(usize, String)> = map
        .iter()
        .filter_map(|(idx, label)| {
            Some((idx.parse::<usize>().ok()?, label.as_str()?.to_string()))
        })
        .collect();

    if entries.is_empty() {
        return None;
    }

    entries.sort_by_key(|(idx, _)| *idx);
    Some(entries.into_iter().map(|(_, label)| label).collect())
}

/// Download a model from the Hugging Face Hub, returning the directory that
/// holds its files.
///
/// `config.json` and `model.safetensors` are required; tokenizer files are
/// fetched opportunistically and their absence is left for
/// [`load_tokenizer`] to report.
pub fn fetch_from_hub(model_id: &str) -> Result<PathBuf> {
    tracing::info!("Downloading model from Hugging Face Hub: {}", model_id);

    let api = hf_hub::api::sync::Api::new()
        .map_err(|e| Error::resolution(format!("Failed to initialize HF API: {}", e)))?;
    let repo = api.repo(hf_hub::Repo::model(model_id.to_string()));

    let config_path = repo
        .get("config.json")
        .map_err(|e| Error::resolution(format!("Failed to download config.json: {}", e)))?;
    repo.get("model.safetensors")
        .map_err(|e| Error::resolution(format!("Failed to download model.safetensors: {}", e)))?;

    for filename in ["tokenizer.json", "vocab.txt"] {
        if let Err(e) = repo.get(filename) {
            tracing::debug!("Optional file {} not fetched: {}", filename, e);
        }
    }

    let model_dir = config_path
        .parent()
        .ok_or_else(|| Error::resolution("Invalid hub cache path"))?
        .to_path_buf();

    tracing::info!("Model available at: {}", model_dir.display());
    Ok(model_dir)
}
