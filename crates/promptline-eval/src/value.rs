use anyhow::{Result, bail};

/// Result of evaluating one expression. The closed variant set keeps the
/// template language small: anything structured lives in the typed context
/// and is reached through field paths, not first-class values.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Truthiness used by `{{ if ... }}` guards: empty string, zero, false,
    /// and null are false; everything else is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            Value::Number(n) => !n.is_nan() && *n != 0.0,
        }
    }

    pub fn as_number(&self) -> Result<f64> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("cannot parse '{}' as number", s)),
            Value::Bool(_) => bail!("cannot use a boolean as a number"),
            Value::Null => Ok(0.0),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            Value::String(s) => Ok(s),
            _ => bail!("expected a string, got {}", self.type_name()),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Null => "null",
        }
    }

    /// Stringifies for template output. Numbers use the minimal decimal
    /// form (no trailing zeros); non-finite numbers and null render empty
    /// so a division by zero never leaks "inf" into a prompt line.
    pub fn render(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Number(n) => {
                if !n.is_finite() {
                    String::new()
                } else if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Value::Bool(b) => b.to_string(),
            Value::Null => String::new(),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}
