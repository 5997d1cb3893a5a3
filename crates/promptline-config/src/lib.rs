//! # Promptline Config
//!
//! Serde model for the prompt theme document: ordered blocks of segments
//! with styling fields and a free-form (but scalar-only) `properties` bag.
//! The document is external input and is never mutated by the renderer.

pub mod document;

pub use document::{Alignment, Block, PromptConfig, Properties, PropertyValue, Segment};
