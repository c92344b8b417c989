//! Features Module - Feature Extraction Engine
//!
//! Turns a URL (and optionally its page markup) into the fixed-layout
//! numeric vectors the scorers were trained on.

pub mod content;
pub mod extractor;
pub mod layout;
pub mod markup;
pub mod url;
pub mod vector;


// Re-export common types
pub use extractor::{brand_similarity, FeatureExtractor};
pub use layout::{FeatureLayout, FEATURE_VERSION, FULL_FEATURE_COUNT, URL_FEATURE_COUNT};
pub use vector::FeatureVector;
