//! Template scanner: splits a template string into literal text and
//! `{{ ... }}` regions, and folds `{{ if }}`/`{{ else }}`/`{{ end }}` tags
//! into a nested [`Node`] tree.
//!
//! Scanning is fail-soft. Malformed regions (unterminated `{{`, unbalanced
//! conditionals, unparseable expression bodies) degrade to literal text and
//! are reported through [`TemplateAst::errors`]; one bad region never
//! poisons the rest of the template.

use crate::ast::{Expr, Node};
use crate::error::{ParseError, Span, span_at};
use crate::lexer::tokenize;
use crate::parser;

#[derive(Debug, Clone)]
pub struct TemplateAst {
    pub nodes: Vec<Node>,
    pub errors: Vec<ParseError>,
}

impl TemplateAst {
    /// True when the template contains no placeholders or tags at all.
    pub fn is_literal(&self) -> bool {
        self.errors.is_empty() && self.nodes.iter().all(|n| matches!(n, Node::Text(_)))
    }
}

#[derive(Debug, Clone)]
enum RawPart {
    Text(String),
    Tag {
        kind: TagKind,
        raw: String,
        span: Span,
    },
}

#[derive(Debug, Clone)]
enum TagKind {
    Expr(String),
    If(String),
    Else,
    End,
}

/// Parses a template into a node tree plus scoped parse diagnostics.
pub fn parse_template(source: &str) -> TemplateAst {
    let mut errors = Vec::new();
    let parts = scan_raw(source, &mut errors);

    let mut pos = 0;
    let (nodes, terminator) = build_nodes(&parts, &mut pos, false, &mut errors);

    // A stray else/end at top level is consumed inside build_nodes; reaching
    // here with a terminator is impossible when `inside_if` is false.
    debug_assert!(terminator.is_none());

    TemplateAst { nodes, errors }
}

/// First pass: cut the source into literal text and raw tags.
fn scan_raw(source: &str, errors: &mut Vec<ParseError>) -> Vec<RawPart> {
    let mut parts = Vec::new();
    let mut rest = source;
    let mut consumed = 0;

    while !rest.is_empty() {
        let Some(open) = rest.find("{{") else {
            parts.push(RawPart::Text(rest.to_string()));
            break;
        };

        if open > 0 {
            parts.push(RawPart::Text(rest[..open].to_string()));
        }

        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            // Unterminated delimiter: everything from `{{` on stays literal.
            errors.push(ParseError::UnterminatedPlaceholder {
                span: span_at(source, consumed + open, source.len()),
            });
            parts.push(RawPart::Text(rest[open..].to_string()));
            break;
        };

        let raw = &rest[open..open + 2 + close + 2];
        let body = after_open[..close].trim();
        let span = span_at(source, consumed + open, consumed + open + raw.len());

        let kind = if body == "else" {
            TagKind::Else
        } else if body == "end" {
            TagKind::End
        } else if let Some(guard) = body.strip_prefix("if").filter(|rest| {
            rest.chars().next().is_some_and(|c| c.is_whitespace())
        }) {
            TagKind::If(guard.trim().to_string())
        } else {
            TagKind::Expr(body.to_string())
        };

        parts.push(RawPart::Tag {
            kind,
            raw: raw.to_string(),
            span,
        });

        consumed += open + raw.len();
        rest = &after_open[close + 2..];
    }

    parts
}

enum Terminator {
    Else,
    End,
}

/// Second pass: fold the flat tag list into a node tree. Returns the
/// terminator tag that closed this branch, if any.
fn build_nodes(
    parts: &[RawPart],
    pos: &mut usize,
    inside_if: bool,
    errors: &mut Vec<ParseError>,
) -> (Vec<Node>, Option<Terminator>) {
    let mut nodes = Vec::new();

    while *pos < parts.len() {
        let part = &parts[*pos];
        *pos += 1;

        match part {
            RawPart::Text(text) => nodes.push(Node::Text(text.clone())),

            RawPart::Tag { kind, raw, span } => match kind {
                TagKind::Expr(body) => match parse_expr_body(body, *span, errors) {
                    Some(expr) => nodes.push(Node::Placeholder {
                        expr,
                        raw: raw.clone(),
                        span: *span,
                    }),
                    None => nodes.push(Node::Text(raw.clone())),
                },

                TagKind::If(guard) => {
                    let cond = parse_expr_body(guard, *span, errors);

                    let (then_branch, term) = build_nodes(parts, pos, true, errors);
                    let (else_branch, term) = match term {
                        Some(Terminator::Else) => build_nodes(parts, pos, true, errors),
                        other => (Vec::new(), other),
                    };

                    if term.is_none() {
                        // Missing `{{ end }}`: keep the guard tag literal and
                        // splice the parsed body back in.
                        errors.push(ParseError::UnbalancedConditional {
                            construct: "if",
                            span: *span,
                        });
                        nodes.push(Node::Text(raw.clone()));
                        nodes.extend(then_branch);
                        nodes.extend(else_branch);
                        continue;
                    }

                    match cond {
                        Some(cond) => nodes.push(Node::If {
                            cond,
                            cond_source: guard.clone(),
                            then_branch,
                            else_branch,
                            span: *span,
                        }),
                        None => {
                            // Guard failed to parse: drop to literal, keep body.
                            nodes.push(Node::Text(raw.clone()));
                            nodes.extend(then_branch);
                            nodes.extend(else_branch);
                        }
                    }
                }

                TagKind::Else => {
                    if inside_if {
                        return (nodes, Some(Terminator::Else));
                    }
                    errors.push(ParseError::UnbalancedConditional {
                        construct: "else",
                        span: *span,
                    });
                    nodes.push(Node::Text(raw.clone()));
                }

                TagKind::End => {
                    if inside_if {
                        return (nodes, Some(Terminator::End));
                    }
                    errors.push(ParseError::UnbalancedConditional {
                        construct: "end",
                        span: *span,
                    });
                    nodes.push(Node::Text(raw.clone()));
                }
            },
        }
    }

    (nodes, None)
}

fn parse_expr_body(body: &str, span: Span, errors: &mut Vec<ParseError>) -> Option<Expr> {
    let tokens = match tokenize(body) {
        Ok(tokens) => tokens,
        Err(error) => {
            errors.push(ParseError::LexError {
                error,
                source: body.to_string(),
                span,
            });
            return None;
        }
    };

    match parser::parse(tokens) {
        Ok(expr) => Some(expr),
        Err(e) => {
            errors.push(ParseError::InvalidExpression {
                message: e.to_string(),
                source: body.to_string(),
                span,
            });
            None
        }
    }
}
