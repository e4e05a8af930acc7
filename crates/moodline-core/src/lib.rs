//! Moodline Core
//!
//! Core types and error handling shared across Moodline components.
//!
//! This crate provides:
//! - The `Mode` tag recording which model-acquisition tier is live
//! - The normalized `InferenceResult` contract every backend must produce
//! - The fixed `LabelMap` class-index translation for trained model tiers
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{InferenceResult, LabelMap, Mode};
