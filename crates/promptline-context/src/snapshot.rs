//! The context snapshot: a strongly-typed, read-only picture of everything a
//! template may reference. All values arrive pre-collected; nothing in this
//! crate touches the live environment, git, or the clock.

use anyhow::{Context as AnyhowContext, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Root context object. One instance is built per resolution pass and treated
/// as immutable for its duration; segment processing augments it by producing
/// a new snapshot via [`Context::with_segment`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Context {
    pub env: HashMap<String, String>,
    pub git: GitState,
    pub system: SystemState,
    pub shell: ShellState,
    pub path: PathState,
    pub time: TimeState,
    /// Derived per-segment-type facts, keyed by segment type name
    /// (capitalized, e.g. "Git"). Populated by the segment processor in
    /// document order so later segments can reference earlier ones.
    #[serde(skip)]
    pub segments: HashMap<String, SegmentFacts>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GitState {
    pub branch: String,
    pub is_repo: bool,
    pub ahead: i64,
    pub behind: i64,
    pub working: AreaState,
    pub staging: AreaState,
    pub stash_count: i64,
}

/// State of one git area (working tree or index).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AreaState {
    pub changed: bool,
    /// Short display form, e.g. a change count.
    #[serde(rename = "string")]
    pub display: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SystemState {
    pub physical_percent_used: f64,
    pub precision: i64,
    pub physical_total_memory: i64,
    pub physical_free_memory: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShellState {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PathState {
    pub current_dir: String,
    pub home_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimeState {
    pub now: DateTime<Utc>,
}

impl Default for TimeState {
    fn default() -> Self {
        Self {
            now: DateTime::UNIX_EPOCH,
        }
    }
}

/// Flat bag of derived facts for one processed segment type.
pub type SegmentFacts = HashMap<String, Fact>;

/// Closed scalar variant for derived segment facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fact {
    Str(String),
    Num(f64),
    Bool(bool),
}

impl From<&str> for Fact {
    fn from(s: &str) -> Self {
        Fact::Str(s.to_string())
    }
}

impl From<String> for Fact {
    fn from(s: String) -> Self {
        Fact::Str(s)
    }
}

impl From<f64> for Fact {
    fn from(n: f64) -> Self {
        Fact::Num(n)
    }
}

impl From<bool> for Fact {
    fn from(b: bool) -> Self {
        Fact::Bool(b)
    }
}

impl Context {
    /// Returns a new snapshot with `facts` recorded under the given segment
    /// type name. The receiver is left untouched.
    pub fn with_segment(&self, segment_type: impl Into<String>, facts: SegmentFacts) -> Context {
        let mut next = self.clone();
        next.segments.insert(segment_type.into(), facts);
        next
    }

    /// Loads a snapshot from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Context> {
        serde_json::from_str(json).context("Failed to parse context snapshot JSON")
    }

    /// Loads a snapshot from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Context> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read context snapshot from {}", path.display()))?;
        Self::from_json_str(&json)
    }

    /// The current directory with the home prefix collapsed to `~`.
    pub fn display_path(&self) -> String {
        let dir = &self.path.current_dir;
        let home = &self.path.home_dir;

        if !home.is_empty() {
            if dir == home {
                return "~".to_string();
            }
            if let Some(rest) = dir.strip_prefix(home) {
                if rest.starts_with('/') || rest.starts_with('\\') {
                    return format!("~{}", rest);
                }
            }
        }

        dir.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_git_state_is_zero_valued() {
        let git = GitState::default();
        assert!(!git.is_repo);
        assert!(git.branch.is_empty());
        assert_eq!(git.ahead, 0);
        assert!(!git.working.changed);
    }

    #[test]
    fn with_segment_leaves_original_untouched() {
        let ctx = Context::default();
        let mut facts = SegmentFacts::new();
        facts.insert("HEAD".to_string(), Fact::from("main"));

        let next = ctx.with_segment("Git", facts);

        assert!(ctx.segments.is_empty());
        assert_eq!(
            next.segments.get("Git").and_then(|f| f.get("HEAD")),
            Some(&Fact::from("main"))
        );
    }

    #[test]
    fn from_json_fills_missing_sections_with_defaults() {
        let ctx = Context::from_json_str(r#"{"shell": {"name": "zsh"}}"#).unwrap();
        assert_eq!(ctx.shell.name, "zsh");
        assert!(!ctx.git.is_repo);
        assert_eq!(ctx.system.physical_total_memory, 0);
    }

    #[test]
    fn from_json_reads_git_area_string_field() {
        let json = r#"{"git": {"branch": "main", "isRepo": true, "working": {"changed": true, "string": "3"}}}"#;
        let ctx = Context::from_json_str(json).unwrap();
        assert!(ctx.git.working.changed);
        assert_eq!(ctx.git.working.display, "3");
    }

    #[test]
    fn display_path_collapses_home() {
        let ctx = Context {
            path: PathState {
                current_dir: "/home/user/projects/demo".to_string(),
                home_dir: "/home/user".to_string(),
            },
            ..Context::default()
        };
        assert_eq!(ctx.display_path(), "~/projects/demo");
    }

    #[test]
    fn display_path_exact_home() {
        let ctx = Context {
            path: PathState {
                current_dir: "/home/user".to_string(),
                home_dir: "/home/user".to_string(),
            },
            ..Context::default()
        };
        assert_eq!(ctx.display_path(), "~");
    }

    #[test]
    fn display_path_does_not_collapse_sibling_prefix() {
        let ctx = Context {
            path: PathState {
                current_dir: "/home/username2/x".to_string(),
                home_dir: "/home/user".to_string(),
            },
            ..Context::default()
        };
        assert_eq!(ctx.display_path(), "/home/username2/x");
    }
}
