use crate::error::Span;
use smallvec::SmallVec;

/// Dotted field path segments, e.g. `.Env.HOME` => `["Env", "HOME"]`.
pub type PathSegments = SmallVec<[String; 4]>;

#[derive(Debug, Clone)]
pub enum Expr {
    String(String, Span),
    Number(f64, Span),
    Bool(bool, Span),
    Null(Span),
    /// Leading-dot field path walked against the context.
    Path(PathSegments, Span),
    /// Builtin function application: `round .X .Precision`.
    Call {
        name: String,
        args: Vec<Expr>,
        span: Span,
    },
    /// `input | stage | stage ...`; each stage appends the piped value as
    /// its final argument.
    Pipeline {
        input: Box<Expr>,
        stages: Vec<Stage>,
        span: Span,
    },
}

#[derive(Debug, Clone)]
pub struct Stage {
    pub name: String,
    pub args: Vec<Expr>,
    pub span: Span,
}

impl Expr {
    pub fn span(&self) -> &Span {
        match self {
            Expr::String(_, span) => span,
            Expr::Number(_, span) => span,
            Expr::Bool(_, span) => span,
            Expr::Null(span) => span,
            Expr::Path(_, span) => span,
            Expr::Call { span, .. } => span,
            Expr::Pipeline { span, .. } => span,
        }
    }
}

/// One region of a scanned template.
#[derive(Debug, Clone)]
pub enum Node {
    /// Literal text emitted verbatim.
    Text(String),
    /// A `{{ expr }}` placeholder. `raw` keeps the original tag text
    /// (braces included) for fail-soft rendering and diagnostics.
    Placeholder {
        expr: Expr,
        raw: String,
        span: Span,
    },
    /// `{{ if expr }} ... {{ else }} ... {{ end }}`. The else branch is
    /// empty when absent.
    If {
        cond: Expr,
        cond_source: String,
        then_branch: Vec<Node>,
        else_branch: Vec<Node>,
        span: Span,
    },
}
