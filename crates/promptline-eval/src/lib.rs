//! # Promptline Eval
//!
//! Evaluation and rendering layer: values, builtin functions, field-path
//! scopes, the template resolver, segment processing, and the whole-prompt
//! renderer. Everything here is a pure function of a parsed template and a
//! context snapshot.

pub mod builtins;
pub mod error;
pub mod eval;
pub mod render;
pub mod resolver;
pub mod scope;
pub mod segment;
pub mod value;

pub use builtins::BuiltinRegistry;
pub use error::{RenderError, RenderErrorKind};
pub use eval::evaluate;
pub use render::{PromptRenderer, RenderedBlock, RenderedPrompt};
pub use resolver::{Resolved, Resolver};
pub use scope::{Scope, SegmentScope};
pub use segment::{ResolvedSegment, SegmentProcessor};
pub use value::Value;
