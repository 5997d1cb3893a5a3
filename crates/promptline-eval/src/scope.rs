//! Field-path resolution against the context snapshot.
//!
//! The context is a closed set of typed records, so paths resolve through
//! explicit per-section lookup tables rather than reflection. Any absent
//! segment anywhere in a path yields [`Value::Null`] (a PathMiss), never an
//! error; templates over sparse context degrade to empty output.

use crate::value::Value;
use promptline_context::{AreaState, Context, Fact, GitState, PathState, SystemState};

/// Segment-type-specific local fields layered over the root context, so a
/// git segment template can say `.HEAD` instead of `.Git.Branch`.
#[derive(Debug, Clone, Copy)]
pub enum SegmentScope<'a> {
    None,
    Git(&'a GitState),
    System(&'a SystemState),
    Path(&'a Context),
    Time(&'a Context),
}

pub struct Scope<'a> {
    snapshot: &'a Context,
    local: SegmentScope<'a>,
}

impl<'a> Scope<'a> {
    /// A scope with no segment-local fields; only root sections resolve.
    pub fn root(snapshot: &'a Context) -> Self {
        Self {
            snapshot,
            local: SegmentScope::None,
        }
    }

    pub fn with_local(snapshot: &'a Context, local: SegmentScope<'a>) -> Self {
        Self { snapshot, local }
    }

    /// Walks a dotted field path. Root section names win over segment-local
    /// fields, except for bare single-segment paths: a section name carries
    /// no field to read, so `.Path` inside a path segment hits the local
    /// scope. Everything unknown is a PathMiss.
    pub fn lookup(&self, path: &[String]) -> Value {
        let Some(head) = path.first() else {
            return Value::Null;
        };
        let rest = &path[1..];

        if rest.is_empty() {
            let local = self.local_field(path);
            if !local.is_null() {
                return local;
            }
        }

        match head.as_str() {
            "Env" => match rest {
                [name] => self
                    .snapshot
                    .env
                    .get(name)
                    .map(|v| Value::String(v.clone()))
                    .unwrap_or(Value::Null),
                _ => Value::Null,
            },
            "Git" => git_field(&self.snapshot.git, rest),
            "System" => system_field(&self.snapshot.system, rest),
            "Shell" => match rest {
                [name] if name == "Name" => Value::String(self.snapshot.shell.name.clone()),
                _ => Value::Null,
            },
            "Path" => path_field(&self.snapshot.path, rest),
            "Time" => match rest {
                [name] if name == "Now" => Value::String(self.snapshot.time.now.to_rfc3339()),
                _ => Value::Null,
            },
            "Segments" => match rest {
                [segment, fact] => self
                    .snapshot
                    .segments
                    .get(segment)
                    .and_then(|facts| facts.get(fact))
                    .map(fact_value)
                    .unwrap_or(Value::Null),
                _ => Value::Null,
            },
            _ => self.local_field(path),
        }
    }

    fn local_field(&self, path: &[String]) -> Value {
        match self.local {
            SegmentScope::None => Value::Null,
            SegmentScope::Git(git) => match path[0].as_str() {
                "HEAD" => Value::String(git.branch.clone()),
                _ => git_field(git, path),
            },
            SegmentScope::System(system) => system_field(system, path),
            SegmentScope::Path(ctx) => match path {
                [name] if name == "Path" => Value::String(ctx.display_path()),
                [name] if name == "Folder" => {
                    let dir = &ctx.path.current_dir;
                    let folder = dir.rsplit('/').next().unwrap_or(dir);
                    Value::String(folder.to_string())
                }
                _ => path_field(&ctx.path, path),
            },
            SegmentScope::Time(ctx) => match path {
                [name] if name == "Now" => Value::String(ctx.time.now.to_rfc3339()),
                _ => Value::Null,
            },
        }
    }
}

fn git_field(git: &GitState, path: &[String]) -> Value {
    match path {
        [name] => match name.as_str() {
            "Branch" => Value::String(git.branch.clone()),
            "IsRepo" => Value::Bool(git.is_repo),
            "Ahead" => Value::from(git.ahead),
            "Behind" => Value::from(git.behind),
            "StashCount" => Value::from(git.stash_count),
            _ => Value::Null,
        },
        [area, rest @ ..] if area == "Working" => area_field(&git.working, rest),
        [area, rest @ ..] if area == "Staging" => area_field(&git.staging, rest),
        _ => Value::Null,
    }
}

fn area_field(area: &AreaState, path: &[String]) -> Value {
    match path {
        [name] => match name.as_str() {
            "Changed" => Value::Bool(area.changed),
            "String" => Value::String(area.display.clone()),
            _ => Value::Null,
        },
        _ => Value::Null,
    }
}

fn system_field(system: &SystemState, path: &[String]) -> Value {
    match path {
        [name] => match name.as_str() {
            "PhysicalPercentUsed" => Value::Number(system.physical_percent_used),
            "Precision" => Value::from(system.precision),
            "PhysicalTotalMemory" => Value::from(system.physical_total_memory),
            "PhysicalFreeMemory" => Value::from(system.physical_free_memory),
            _ => Value::Null,
        },
        _ => Value::Null,
    }
}

fn path_field(path_state: &PathState, path: &[String]) -> Value {
    match path {
        [name] => match name.as_str() {
            "CurrentDir" => Value::String(path_state.current_dir.clone()),
            "HomeDir" => Value::String(path_state.home_dir.clone()),
            _ => Value::Null,
        },
        _ => Value::Null,
    }
}

fn fact_value(fact: &Fact) -> Value {
    match fact {
        Fact::Str(s) => Value::String(s.clone()),
        Fact::Num(n) => Value::Number(*n),
        Fact::Bool(b) => Value::Bool(*b),
    }
}
