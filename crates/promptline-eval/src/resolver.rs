//! Template resolution: substitutes every `{{ ... }}` region of a template
//! with its evaluated text, leaving all other characters untouched.
//!
//! Failures stay local. A placeholder that cannot be parsed or evaluated
//! renders as its literal source text (a visible marker) and is reported in
//! [`Resolved::errors`]; an erroring `if` guard renders neither branch.

use crate::builtins::BuiltinRegistry;
use crate::error::RenderError;
use crate::eval::evaluate;
use crate::scope::Scope;
use promptline_syntax::ast::Node;
use promptline_syntax::cache::TemplateCache;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Resolved {
    pub text: String,
    pub errors: Vec<RenderError>,
}

pub struct Resolver {
    cache: Arc<TemplateCache>,
    builtins: BuiltinRegistry,
}

impl Resolver {
    pub fn new() -> Self {
        Self::with_cache(Arc::new(TemplateCache::with_default_size()))
    }

    /// Builds a resolver around an injected, session-scoped parse cache.
    pub fn with_cache(cache: Arc<TemplateCache>) -> Self {
        Self {
            cache,
            builtins: BuiltinRegistry::new(),
        }
    }

    pub fn cache(&self) -> &Arc<TemplateCache> {
        &self.cache
    }

    pub fn resolve(&self, template: &str, scope: &Scope) -> Resolved {
        let ast = self.cache.parse(template);

        let mut errors: Vec<RenderError> = ast.errors.iter().map(RenderError::parse).collect();
        let mut text = String::with_capacity(template.len());

        self.render_nodes(&ast.nodes, scope, &mut text, &mut errors);

        Resolved { text, errors }
    }

    fn render_nodes(
        &self,
        nodes: &[Node],
        scope: &Scope,
        out: &mut String,
        errors: &mut Vec<RenderError>,
    ) {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),

                Node::Placeholder { expr, raw, .. } => {
                    match evaluate(expr, scope, &self.builtins) {
                        Ok(value) => out.push_str(&value.render()),
                        Err(e) => {
                            errors.push(RenderError::evaluation(e.to_string(), tag_body(raw)));
                            out.push_str(raw);
                        }
                    }
                }

                Node::If {
                    cond,
                    cond_source,
                    then_branch,
                    else_branch,
                    ..
                } => match evaluate(cond, scope, &self.builtins) {
                    Ok(value) => {
                        let branch = if value.is_truthy() {
                            then_branch
                        } else {
                            else_branch
                        };
                        self.render_nodes(branch, scope, out, errors);
                    }
                    Err(e) => {
                        errors.push(RenderError::evaluation(e.to_string(), cond_source.clone()));
                    }
                },
            }
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Strips the `{{ }}` delimiters off a raw tag for diagnostics.
fn tag_body(raw: &str) -> &str {
    raw.strip_prefix("{{")
        .and_then(|s| s.strip_suffix("}}"))
        .unwrap_or(raw)
        .trim()
}
