use colored::*;
use promptline_syntax::error::Span;
use std::fmt;

/// Enhanced error with context and suggestions
pub struct EnhancedError {
    pub message: String,
    pub span: Option<Span>,
    pub file: Option<String>,
    pub source: Option<String>,
    pub segment: Option<String>,
    pub suggestion: Option<String>,
    pub help: Option<String>,
}

impl EnhancedError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span: None,
            file: None,
            source: None,
            segment: None,
            suggestion: None,
            help: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Display the error with colored output and context
    pub fn display(&self) {
        eprintln!("{} {}", "error:".red().bold(), self.message.bold());

        if let Some(segment) = &self.segment {
            eprintln!("  {} segment '{}'", "in:".blue().bold(), segment);
        }

        if let (Some(file), Some(span)) = (&self.file, &self.span) {
            eprintln!("  {} {}:{}:{}", "-->".blue().bold(), file, span.line, span.col);
        }

        if let (Some(source), Some(span)) = (&self.source, &self.span) {
            eprintln!();
            self.display_source_with_span(source, span);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!();
            eprintln!("{} {}", "suggestion:".green().bold(), suggestion);
        }

        if let Some(help) = &self.help {
            eprintln!();
            eprintln!("{} {}", "help:".cyan().bold(), help);
        }
    }

    fn display_source_with_span(&self, source: &str, span: &Span) {
        for line in format_source_snippet(source, span) {
            eprintln!("{}", line);
        }
    }
}

/// Renders the offending source line with a caret run under the span.
/// Template sources are one line in practice, so there is no context window;
/// multiline sources just show the line the span starts on.
fn format_source_snippet(source: &str, span: &Span) -> Vec<String> {
    let line_idx = span.line.saturating_sub(1);
    let Some(line) = source.lines().nth(line_idx) else {
        return Vec::new();
    };

    let line_num = span.line.to_string();
    let gutter = " ".repeat(line_num.len());
    let indent_width = span.col.saturating_sub(1);
    let indent = " ".repeat(indent_width);

    // Clamp the caret run to what is left of the line.
    let width = span.end.saturating_sub(span.start).max(1);
    let remaining = line.chars().count().saturating_sub(indent_width).max(1);
    let carets = "^".repeat(width.min(remaining));

    vec![
        format!("{} {} {}", line_num.blue().bold(), "|".blue().bold(), line),
        format!(
            "{} {} {}{}",
            gutter,
            "|".blue().bold(),
            indent,
            carets.red().bold()
        ),
    ]
}

impl fmt::Display for EnhancedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for EnhancedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnhancedError: {}", self.message)
    }
}

impl std::error::Error for EnhancedError {}

/// Convert a render diagnostic into an EnhancedError with suggestions
pub fn enhance_render_error(err: &promptline_eval::RenderError) -> EnhancedError {
    let mut enhanced = EnhancedError::new(err.message.clone());

    if let Some(segment) = &err.segment {
        enhanced = enhanced.with_segment(segment.clone());
    }
    if let Some(expression) = &err.expression {
        enhanced = enhanced.with_source(expression.clone());
    }

    let message = &err.message;
    if message.contains("unknown function") {
        enhanced = enhanced.with_suggestion("Check the function name spelling");
        enhanced = enhanced.with_help(
            "Available functions: round, div, sub, add, mul, float64, upper, lower, trim, date",
        );
    } else if message.contains("takes exactly") {
        enhanced = enhanced.with_suggestion("Check the number of arguments; a piped value counts as the last one");
    } else if message.contains("cannot parse") && message.contains("as number") {
        enhanced = enhanced.with_suggestion("Wrap the value in float64 only when it holds digits");
    } else if message.contains("unterminated") {
        enhanced = enhanced.with_suggestion("Close the placeholder with }}");
    } else if message.contains("unbalanced") {
        enhanced = enhanced.with_suggestion("Balance every {{ if }} with {{ end }}");
        enhanced = enhanced.with_help("Conditionals nest: the innermost {{ end }} closes the innermost {{ if }}");
    }

    enhanced
}
