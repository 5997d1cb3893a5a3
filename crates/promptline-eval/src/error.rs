//! Render diagnostics.
//!
//! Resolution never throws across component boundaries: parse and
//! evaluation failures are caught at the smallest enclosing scope (one
//! placeholder or one segment template) and reported as [`RenderError`]
//! values alongside the rendered text. A path that simply does not exist is
//! not an error at all; it degrades to a null value.

use promptline_syntax::ParseError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderErrorKind {
    /// Malformed delimiters, unbalanced `if`/`end`, or an unparseable
    /// expression body.
    Parse,
    /// Unknown function, wrong arity, or a type mismatch during evaluation.
    Evaluation,
}

impl fmt::Display for RenderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderErrorKind::Parse => write!(f, "parse error"),
            RenderErrorKind::Evaluation => write!(f, "evaluation error"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderError {
    pub kind: RenderErrorKind,
    /// Human-readable description.
    pub message: String,
    /// The offending expression or tag source text, when known.
    pub expression: Option<String>,
    /// The segment type this error surfaced in, filled by the segment
    /// processor.
    pub segment: Option<String>,
}

impl RenderError {
    pub fn parse(error: &ParseError) -> Self {
        Self {
            kind: RenderErrorKind::Parse,
            message: error.to_string(),
            expression: error.expression().map(|s| s.to_string()),
            segment: None,
        }
    }

    pub fn evaluation(message: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            kind: RenderErrorKind::Evaluation,
            message: message.into(),
            expression: Some(expression.into()),
            segment: None,
        }
    }

    pub fn for_segment(mut self, segment_type: &str) -> Self {
        self.segment = Some(segment_type.to_string());
        self
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(segment) = &self.segment {
            write!(f, " (in segment '{}')", segment)?;
        }
        Ok(())
    }
}

impl std::error::Error for RenderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluation_error_display() {
        let err = RenderError::evaluation("unknown function 'frob'", "frob .X");
        assert_eq!(err.to_string(), "evaluation error: unknown function 'frob'");
        assert_eq!(err.expression.as_deref(), Some("frob .X"));
    }

    #[test]
    fn for_segment_tags_display() {
        let err = RenderError::evaluation("wrong arity", "round .X").for_segment("sysinfo");
        assert!(err.to_string().contains("in segment 'sysinfo'"));
        assert_eq!(err.segment.as_deref(), Some("sysinfo"));
    }

    #[test]
    fn parse_error_carries_expression_source() {
        let ast = promptline_syntax::parse_template("{{ round ) }}");
        let err = RenderError::parse(&ast.errors[0]);
        assert_eq!(err.kind, RenderErrorKind::Parse);
        assert_eq!(err.expression.as_deref(), Some("round )"));
    }
}
