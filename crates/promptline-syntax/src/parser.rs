//! Recursive-descent parser for single `{{ ... }}` expression bodies.
//!
//! Grammar:
//!
//! ```text
//! expression := pipeline
//! pipeline   := term ( '|' stage )*
//! stage      := identifier operand*
//! term       := identifier operand*        (function call, zero or more args)
//!             | operand
//! operand    := '.' path | literal | '(' expression ')'
//! path       := identifier ( '.' identifier )*
//! literal    := string | number | true | false | null
//! ```
//!
//! Operands deliberately exclude bare calls and pipes so that
//! `round .X .Precision | upper` groups as `(round .X .Precision) | upper`.

use crate::ast::{Expr, PathSegments, Stage};
use crate::error::Span;
use crate::lexer::{SpannedToken, Token};
use anyhow::{Result, bail};

pub struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        Self { tokens, pos: 0 }
    }

    #[inline]
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|st| &st.token)
    }

    #[inline]
    fn advance(&mut self) -> Option<SpannedToken> {
        if self.pos < self.tokens.len() {
            let token = self.tokens[self.pos].clone();
            self.pos += 1;
            Some(token)
        } else {
            None
        }
    }

    fn expect(&mut self, expected: Token) -> Result<Span> {
        match self.advance() {
            Some(st) if st.token == expected => Ok(st.span),
            Some(st) => bail!(
                "expected {}, got {} at column {}",
                expected.display_name(),
                st.token.display_name(),
                st.span.col
            ),
            None => bail!("expected {}, got end of expression", expected.display_name()),
        }
    }

    pub fn parse_expression(&mut self) -> Result<Expr> {
        let mut expr = self.parse_term()?;

        if matches!(self.peek(), Some(Token::Pipe)) {
            let mut stages = Vec::with_capacity(2);

            while matches!(self.peek(), Some(Token::Pipe)) {
                self.advance();
                stages.push(self.parse_stage()?);
            }

            let span = stages
                .last()
                .map(|s| expr.span().merge(&s.span))
                .unwrap_or(*expr.span());

            expr = Expr::Pipeline {
                input: Box::new(expr),
                stages,
                span,
            };
        }

        Ok(expr)
    }

    fn parse_stage(&mut self) -> Result<Stage> {
        match self.advance() {
            Some(SpannedToken {
                token: Token::Identifier(name),
                span,
            }) => {
                let (args, span) = self.parse_operands(span)?;
                Ok(Stage { name, args, span })
            }
            Some(st) => bail!(
                "expected function name after '|', got {}",
                st.token.display_name()
            ),
            None => bail!("expected function name after '|', got end of expression"),
        }
    }

    fn parse_term(&mut self) -> Result<Expr> {
        if let Some(Token::Identifier(_)) = self.peek() {
            let st = self.advance().expect("peek confirmed Identifier token");
            let Token::Identifier(name) = st.token else {
                unreachable!()
            };
            let (args, span) = self.parse_operands(st.span)?;
            return Ok(Expr::Call { name, args, span });
        }

        self.parse_operand()
    }

    /// Collects zero or more operands following a function name.
    fn parse_operands(&mut self, mut span: Span) -> Result<(Vec<Expr>, Span)> {
        let mut args = Vec::new();

        while matches!(
            self.peek(),
            Some(Token::Dot)
                | Some(Token::String(_))
                | Some(Token::Number(_))
                | Some(Token::True)
                | Some(Token::False)
                | Some(Token::Null)
                | Some(Token::LeftParen)
        ) {
            let arg = self.parse_operand()?;
            span = span.merge(arg.span());
            args.push(arg);
        }

        Ok((args, span))
    }

    fn parse_operand(&mut self) -> Result<Expr> {
        match self.peek() {
            Some(Token::Dot) => self.parse_path(),

            Some(Token::True) => {
                let span = self.advance().expect("peek confirmed True token").span;
                Ok(Expr::Bool(true, span))
            }

            Some(Token::False) => {
                let span = self.advance().expect("peek confirmed False token").span;
                Ok(Expr::Bool(false, span))
            }

            Some(Token::Null) => {
                let span = self.advance().expect("peek confirmed Null token").span;
                Ok(Expr::Null(span))
            }

            Some(Token::Number(_)) => {
                let st = self.advance().expect("peek confirmed Number token");
                if let Token::Number(n) = st.token {
                    Ok(Expr::Number(n, st.span))
                } else {
                    unreachable!()
                }
            }

            Some(Token::String(_)) => {
                let st = self.advance().expect("peek confirmed String token");
                if let Token::String(s) = st.token {
                    Ok(Expr::String(s, st.span))
                } else {
                    unreachable!()
                }
            }

            Some(Token::LeftParen) => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(Token::RightParen)?;
                Ok(expr)
            }

            other => {
                let token_str = other
                    .map(|t| t.display_name())
                    .unwrap_or_else(|| "end of expression".to_string());
                bail!("unexpected token in expression: {}", token_str)
            }
        }
    }

    fn parse_path(&mut self) -> Result<Expr> {
        let start_span = self.expect(Token::Dot)?;
        let mut segments = PathSegments::new();
        let mut span = start_span;
        let mut last_end = start_span.end;

        loop {
            match self.advance() {
                Some(SpannedToken {
                    token: Token::Identifier(id),
                    span: id_span,
                }) => {
                    segments.push(id);
                    span = span.merge(&id_span);
                    last_end = id_span.end;
                }
                Some(st) => bail!(
                    "expected identifier after '.', got {}",
                    st.token.display_name()
                ),
                None => bail!("expected identifier after '.', got end of expression"),
            }

            // A path only continues across a dot that touches the previous
            // identifier; `.A .B` is two operands, not one path.
            let continues = matches!(
                self.tokens.get(self.pos),
                Some(st) if st.token == Token::Dot && st.span.start == last_end
            );
            if continues {
                let dot = self.advance().expect("peek confirmed adjacent '.'");
                last_end = dot.span.end;
            } else {
                break;
            }
        }

        Ok(Expr::Path(segments, span))
    }
}

/// Parses a token stream into a single [`Expr`].
///
/// Trailing tokens after a complete expression are an error; a `{{ ... }}`
/// body holds exactly one expression.
pub fn parse(tokens: Vec<SpannedToken>) -> Result<Expr> {
    let mut parser = Parser::new(tokens);
    let expr = parser.parse_expression()?;

    if let Some(token) = parser.peek() {
        bail!(
            "unexpected trailing token after expression: {}",
            token.display_name()
        );
    }

    Ok(expr)
}

/// Convenience entry point: tokenize and parse an expression body.
pub fn parse_str(source: &str) -> Result<Expr> {
    let tokens = crate::lexer::tokenize(source)?;
    parse(tokens)
}
