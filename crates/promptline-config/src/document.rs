//! Serde model of the prompt theme document: an ordered list of blocks,
//! each holding an ordered list of segments. Consumed read-only.

use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Block {
    #[serde(rename = "type")]
    pub block_type: String,
    pub alignment: Alignment,
    pub newline: bool,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Segment {
    #[serde(rename = "type")]
    pub segment_type: String,
    pub style: String,
    pub foreground: Option<String>,
    pub background: Option<String>,
    pub leading_diamond: Option<String>,
    pub trailing_diamond: Option<String>,
    pub template: Option<String>,
    pub properties: Properties,
}

/// Free-form per-segment property bag. Values are restricted to a closed
/// scalar variant; anything richer belongs in the typed context snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(pub HashMap<String, PropertyValue>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Number(f64),
    String(String),
}

impl Properties {
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(PropertyValue::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_num(&self, key: &str) -> Option<f64> {
        match self.0.get(key) {
            Some(PropertyValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.0.get(key) {
            Some(PropertyValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PromptConfig {
    pub fn from_json_str(json: &str) -> Result<PromptConfig> {
        serde_json::from_str(json).context("Failed to parse prompt configuration JSON")
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<PromptConfig> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;
        Self::from_json_str(&json)
    }

    /// All template strings in the document (segment templates, prefixes,
    /// postfixes), paired with the owning segment type. Used by `check`.
    pub fn templates(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::new();
        for block in &self.blocks {
            for segment in &block.segments {
                if let Some(template) = &segment.template {
                    out.push((segment.segment_type.as_str(), template.as_str()));
                }
                for key in ["prefix", "postfix", "text"] {
                    if let Some(value) = segment.properties.get_str(key) {
                        out.push((segment.segment_type.as_str(), value));
                    }
                }
            }
        }
        out
    }
}
