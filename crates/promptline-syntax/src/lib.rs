//! # Promptline Syntax
//!
//! Lexer, expression parser, and template scanner for the promptline
//! template language.
//!
//! ## Overview
//!
//! Prompt segment templates mix literal text with `{{ ... }}` placeholders
//! and `{{ if ... }}...{{ else }}...{{ end }}` conditional regions. This
//! crate turns such a template into an evaluable tree:
//!
//! ```text
//! Template String
//!     ↓
//! Template Scanner (parse_template)
//!     ↓
//! Vec<Node>  — literal text, placeholders, conditionals
//!     ↓           (each placeholder body goes through:)
//! Lexer (tokenize) → Vec<SpannedToken> → Parser (parse) → Expr
//! ```
//!
//! ## Expression grammar
//!
//! ```text
//! expression := pipeline
//! pipeline   := term ( '|' stage )*
//! term       := funcName operand* | operand
//! operand    := '.' path | literal | '(' expression ')'
//! ```
//!
//! ## Fail-soft scanning
//!
//! [`parse_template`] never fails outright: malformed regions degrade to
//! literal text and the corresponding [`ParseError`]s are collected on the
//! returned [`TemplateAst`]. A prompt with one broken segment template still
//! renders everything else.
//!
//! ## Example
//!
//! ```rust
//! use promptline_syntax::parse_template;
//!
//! let ast = parse_template("on {{ .Segments.Git.BranchStatus }}");
//! assert!(ast.errors.is_empty());
//! assert_eq!(ast.nodes.len(), 2);
//! ```

pub mod ast;
pub mod cache;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod template;

pub use ast::{Expr, Node, PathSegments, Stage};
pub use cache::{CacheStats, TemplateCache};
pub use error::{LexError, ParseError, Span, span_at};
pub use lexer::{SpannedToken, Token, tokenize};
pub use parser::{parse, parse_str};
pub use template::{TemplateAst, parse_template};
