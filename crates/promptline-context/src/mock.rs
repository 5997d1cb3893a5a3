//! Deterministic fixture snapshot.
//!
//! Mirrors the default mock data the renderer ships for previewing themes
//! without touching the live system. Every field is fixed, including the
//! clock, so renders are reproducible in tests and demos.

use crate::snapshot::{
    AreaState, Context, GitState, PathState, ShellState, SystemState, TimeState,
};
use chrono::{TimeZone, Utc};
use std::collections::HashMap;

/// Builds the built-in mock snapshot.
pub fn mock() -> Context {
    let mut env = HashMap::new();
    env.insert("HOME".to_string(), "/home/user".to_string());
    env.insert("USER".to_string(), "user".to_string());
    env.insert(
        "PATH".to_string(),
        "/usr/local/bin:/usr/bin:/bin".to_string(),
    );
    env.insert("TERM".to_string(), "xterm-256color".to_string());
    env.insert("SHELL".to_string(), "/bin/bash".to_string());
    env.insert("PWD".to_string(), "/home/user/projects".to_string());

    Context {
        env,
        git: GitState {
            branch: "main".to_string(),
            is_repo: true,
            ahead: 0,
            behind: 0,
            working: AreaState {
                changed: true,
                display: "1".to_string(),
            },
            staging: AreaState {
                changed: false,
                display: String::new(),
            },
            stash_count: 0,
        },
        system: SystemState {
            physical_percent_used: 25.0,
            precision: 0,
            physical_total_memory: 16_000_000_000,
            physical_free_memory: 8_000_000_000,
        },
        shell: ShellState {
            name: "bash".to_string(),
        },
        path: PathState {
            current_dir: "/home/user/projects/my-project".to_string(),
            home_dir: "/home/user".to_string(),
        },
        time: TimeState {
            now: Utc
                .with_ymd_and_hms(2024, 1, 15, 9, 30, 0)
                .single()
                .expect("fixed mock timestamp is valid"),
        },
        segments: HashMap::new(),
    }
}
