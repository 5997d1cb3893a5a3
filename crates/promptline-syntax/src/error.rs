use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub col: usize,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(line: usize, col: usize, start: usize, end: usize) -> Self {
        Self { line, col, start, end }
    }

    pub fn merge(&self, other: &Span) -> Self {
        Self {
            line: self.line.min(other.line),
            col: if self.line == other.line { self.col.min(other.col) } else { self.col },
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Computes the span of `[start, end)` within `source`, counting lines and
/// columns from 1.
pub fn span_at(source: &str, start: usize, end: usize) -> Span {
    let mut line = 1;
    let mut col = 1;
    for ch in source[..start.min(source.len())].chars() {
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    Span::new(line, col, start, end)
}

#[derive(Debug, Clone)]
pub enum LexError {
    UnexpectedChar { ch: char, span: Span, suggestion: Option<String> },
    UnterminatedString { span: Span },
    InvalidNumber { text: String, span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedChar { span, .. } => *span,
            LexError::UnterminatedString { span } => *span,
            LexError::InvalidNumber { span, .. } => *span,
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnexpectedChar { ch, suggestion, .. } => {
                write!(f, "unexpected character '{}'", ch)?;
                if let Some(s) = suggestion {
                    write!(f, " ({})", s)?;
                }
                Ok(())
            }
            LexError::UnterminatedString { .. } => {
                write!(f, "unterminated string literal")
            }
            LexError::InvalidNumber { text, .. } => {
                write!(f, "invalid number: '{}'", text)
            }
        }
    }
}

impl std::error::Error for LexError {}

#[derive(Debug, Clone)]
pub enum ParseError {
    UnterminatedPlaceholder { span: Span },
    UnbalancedConditional { construct: &'static str, span: Span },
    InvalidExpression { message: String, source: String, span: Span },
    LexError { error: LexError, source: String, span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnterminatedPlaceholder { span } => *span,
            ParseError::UnbalancedConditional { span, .. } => *span,
            ParseError::InvalidExpression { span, .. } => *span,
            ParseError::LexError { span, .. } => *span,
        }
    }

    /// The expression source text the error refers to, if any.
    pub fn expression(&self) -> Option<&str> {
        match self {
            ParseError::InvalidExpression { source, .. } => Some(source),
            ParseError::LexError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnterminatedPlaceholder { .. } => {
                write!(f, "unterminated '{{{{' delimiter")
            }
            ParseError::UnbalancedConditional { construct, .. } => {
                write!(f, "unbalanced '{{{{ {} }}}}' tag", construct)
            }
            ParseError::InvalidExpression { message, source, .. } => {
                write!(f, "invalid expression '{}': {}", source, message)
            }
            ParseError::LexError { error, source, .. } => {
                write!(f, "invalid expression '{}': {}", source, error)
            }
        }
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_at_first_line() {
        let span = span_at("hello world", 6, 11);
        assert_eq!(span.line, 1);
        assert_eq!(span.col, 7);
        assert_eq!(span.start, 6);
        assert_eq!(span.end, 11);
    }

    #[test]
    fn span_at_later_line() {
        let span = span_at("one\ntwo\nthree", 8, 13);
        assert_eq!(span.line, 3);
        assert_eq!(span.col, 1);
    }

    #[test]
    fn merge_extends_offsets() {
        let a = Span::new(1, 1, 0, 4);
        let b = Span::new(1, 6, 5, 9);
        let merged = a.merge(&b);
        assert_eq!(merged.start, 0);
        assert_eq!(merged.end, 9);
    }

    #[test]
    fn parse_error_display_includes_expression() {
        let err = ParseError::InvalidExpression {
            message: "unexpected token ')'".to_string(),
            source: "round )".to_string(),
            span: Span::new(1, 1, 0, 7),
        };
        let text = err.to_string();
        assert!(text.contains("round )"));
        assert!(text.contains("unexpected token"));
    }
}
