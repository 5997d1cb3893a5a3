use crate::error::{LexError, Span};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

static KEYWORDS: Lazy<HashMap<&'static str, Token>> = Lazy::new(|| {
    let mut m = HashMap::with_capacity(8);
    m.insert("if", Token::If);
    m.insert("else", Token::Else);
    m.insert("end", Token::End);
    m.insert("true", Token::True);
    m.insert("false", Token::False);
    m.insert("null", Token::Null);
    m
});

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    If,
    Else,
    End,
    True,
    False,
    Null,
    Dot,
    Pipe,
    LeftParen,
    RightParen,
    Identifier(String),
    String(String),
    Number(f64),
}

impl Token {
    pub fn display_name(&self) -> String {
        match self {
            Token::If => "keyword 'if'".to_string(),
            Token::Else => "keyword 'else'".to_string(),
            Token::End => "keyword 'end'".to_string(),
            Token::True => "keyword 'true'".to_string(),
            Token::False => "keyword 'false'".to_string(),
            Token::Null => "keyword 'null'".to_string(),
            Token::Dot => "'.'".to_string(),
            Token::Pipe => "'|'".to_string(),
            Token::LeftParen => "'('".to_string(),
            Token::RightParen => "')'".to_string(),
            Token::Identifier(s) => format!("'{}'", s),
            Token::String(s) => format!("string \"{}\"", s),
            Token::Number(n) => format!("number {}", n),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::If => write!(f, "if"),
            Token::Else => write!(f, "else"),
            Token::End => write!(f, "end"),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Null => write!(f, "null"),
            Token::Dot => write!(f, "."),
            Token::Pipe => write!(f, "|"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::Identifier(s) => write!(f, "{}", s),
            Token::String(s) => write!(f, "\"{}\"", s),
            Token::Number(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// Tokenizes one `{{ ... }}` expression body.
pub fn tokenize(input: &str) -> Result<Vec<SpannedToken>, LexError> {
    let mut tokens = Vec::with_capacity(input.len() / 4);
    let mut chars = input.chars().peekable();

    let mut line = 1;
    let mut col = 1;
    let mut offset = 0;

    let bump = |ch: char, line: &mut usize, col: &mut usize, offset: &mut usize| {
        if ch == '\n' {
            *line += 1;
            *col = 1;
        } else {
            *col += 1;
        }
        *offset += ch.len_utf8();
    };

    while let Some(&ch) = chars.peek() {
        let start_line = line;
        let start_col = col;
        let start_offset = offset;

        match ch {
            ' ' | '\t' | '\r' | '\n' => {
                chars.next();
                bump(ch, &mut line, &mut col, &mut offset);
            }

            '.' => {
                chars.next();
                bump(ch, &mut line, &mut col, &mut offset);
                tokens.push(SpannedToken {
                    token: Token::Dot,
                    span: Span::new(start_line, start_col, start_offset, offset),
                });
            }

            '|' => {
                chars.next();
                bump(ch, &mut line, &mut col, &mut offset);
                tokens.push(SpannedToken {
                    token: Token::Pipe,
                    span: Span::new(start_line, start_col, start_offset, offset),
                });
            }

            '(' => {
                chars.next();
                bump(ch, &mut line, &mut col, &mut offset);
                tokens.push(SpannedToken {
                    token: Token::LeftParen,
                    span: Span::new(start_line, start_col, start_offset, offset),
                });
            }

            ')' => {
                chars.next();
                bump(ch, &mut line, &mut col, &mut offset);
                tokens.push(SpannedToken {
                    token: Token::RightParen,
                    span: Span::new(start_line, start_col, start_offset, offset),
                });
            }

            '"' => {
                chars.next();
                bump(ch, &mut line, &mut col, &mut offset);

                let mut string = String::new();
                let mut escaped = false;
                let mut terminated = false;

                while let Some(&ch) = chars.peek() {
                    if escaped {
                        string.push(match ch {
                            'n' => '\n',
                            't' => '\t',
                            'r' => '\r',
                            '\\' => '\\',
                            '"' => '"',
                            _ => ch,
                        });
                        escaped = false;
                    } else if ch == '\\' {
                        escaped = true;
                    } else if ch == '"' {
                        chars.next();
                        bump(ch, &mut line, &mut col, &mut offset);
                        terminated = true;
                        break;
                    } else {
                        string.push(ch);
                    }
                    chars.next();
                    bump(ch, &mut line, &mut col, &mut offset);
                }

                if !terminated {
                    return Err(LexError::UnterminatedString {
                        span: Span::new(start_line, start_col, start_offset, offset),
                    });
                }

                tokens.push(SpannedToken {
                    token: Token::String(string),
                    span: Span::new(start_line, start_col, start_offset, offset),
                });
            }

            '0'..='9' | '-' => {
                let mut num_str = String::new();

                if ch == '-' {
                    num_str.push(ch);
                    chars.next();
                    bump(ch, &mut line, &mut col, &mut offset);

                    if !chars.peek().is_some_and(|c| c.is_ascii_digit()) {
                        return Err(LexError::UnexpectedChar {
                            ch: '-',
                            span: Span::new(start_line, start_col, start_offset, offset),
                            suggestion: Some("negative sign must precede a number".to_string()),
                        });
                    }
                }

                while let Some(&ch) = chars.peek() {
                    if ch.is_ascii_digit() || ch == '.' {
                        num_str.push(ch);
                        chars.next();
                        bump(ch, &mut line, &mut col, &mut offset);
                    } else {
                        break;
                    }
                }

                // Scientific notation, e.g. 1e9 or 2.5e-3.
                if matches!(chars.peek(), Some('e') | Some('E')) {
                    num_str.push('e');
                    let e = chars.next().expect("peek confirmed exponent marker");
                    bump(e, &mut line, &mut col, &mut offset);

                    if matches!(chars.peek(), Some('+') | Some('-')) {
                        let sign = chars.next().expect("peek confirmed exponent sign");
                        num_str.push(sign);
                        bump(sign, &mut line, &mut col, &mut offset);
                    }

                    while let Some(&ch) = chars.peek() {
                        if ch.is_ascii_digit() {
                            num_str.push(ch);
                            chars.next();
                            bump(ch, &mut line, &mut col, &mut offset);
                        } else {
                            break;
                        }
                    }
                }

                let num = num_str
                    .parse::<f64>()
                    .map_err(|_| LexError::InvalidNumber {
                        text: num_str,
                        span: Span::new(start_line, start_col, start_offset, offset),
                    })?;

                tokens.push(SpannedToken {
                    token: Token::Number(num),
                    span: Span::new(start_line, start_col, start_offset, offset),
                });
            }

            _ if ch.is_alphabetic() || ch == '_' => {
                let mut ident = String::with_capacity(16);
                while let Some(&ch) = chars.peek() {
                    if ch.is_alphanumeric() || ch == '_' {
                        ident.push(ch);
                        chars.next();
                        bump(ch, &mut line, &mut col, &mut offset);
                    } else {
                        break;
                    }
                }

                let token = KEYWORDS
                    .get(ident.as_str())
                    .cloned()
                    .unwrap_or(Token::Identifier(ident));

                tokens.push(SpannedToken {
                    token,
                    span: Span::new(start_line, start_col, start_offset, offset),
                });
            }

            _ => {
                return Err(LexError::UnexpectedChar {
                    ch,
                    span: Span::new(start_line, start_col, start_offset, offset),
                    suggestion: None,
                });
            }
        }
    }

    Ok(tokens)
}
