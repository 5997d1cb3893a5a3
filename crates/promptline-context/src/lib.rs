//! # Promptline Context
//!
//! The typed runtime snapshot consumed by promptline templates: environment
//! variables, git state, system metrics, shell, path, and clock, plus the
//! derived `Segments.*` facts written by the segment processor.
//!
//! Snapshots are plain data. They are supplied by an external collection
//! layer (or the built-in [`mock`]) and never gathered here, so resolution
//! stays a pure function of its inputs.

pub mod mock;
pub mod snapshot;

pub use mock::mock;
pub use snapshot::{
    AreaState, Context, Fact, GitState, PathState, SegmentFacts, ShellState, SystemState,
    TimeState,
};
