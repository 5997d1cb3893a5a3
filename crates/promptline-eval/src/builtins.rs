use crate::value::Value;
use anyhow::{Result, bail};
use chrono::DateTime;
use chrono::format::strftime::StrftimeItems;
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub type BuiltinFn = fn(&[Value]) -> Result<Value>;

static BUILTIN_FUNCTIONS: Lazy<HashMap<&'static str, BuiltinFn>> = Lazy::new(|| {
    let mut map = HashMap::with_capacity(16);
    map.insert("round", builtin_round as BuiltinFn);
    map.insert("div", builtin_div as BuiltinFn);
    map.insert("sub", builtin_sub as BuiltinFn);
    map.insert("add", builtin_add as BuiltinFn);
    map.insert("mul", builtin_mul as BuiltinFn);
    map.insert("float64", builtin_float64 as BuiltinFn);
    map.insert("upper", builtin_upper as BuiltinFn);
    map.insert("lower", builtin_lower as BuiltinFn);
    map.insert("trim", builtin_trim as BuiltinFn);
    map.insert("date", builtin_date as BuiltinFn);
    map
});

#[derive(Clone)]
pub struct BuiltinRegistry;

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self
    }

    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        match BUILTIN_FUNCTIONS.get(name) {
            Some(func) => func(args),
            None => bail!("unknown function '{}'", name),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        BUILTIN_FUNCTIONS.contains_key(name)
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn expect_arity(name: &str, args: &[Value], expected: usize) -> Result<()> {
    if args.len() != expected {
        bail!(
            "{}() takes exactly {} argument{}, got {}",
            name,
            expected,
            if expected == 1 { "" } else { "s" },
            args.len()
        );
    }
    Ok(())
}

/// Rounds to a number of decimal digits using round-half-to-even, so
/// repeated rounding at the same precision is stable.
pub fn builtin_round(args: &[Value]) -> Result<Value> {
    expect_arity("round", args, 2)?;

    let x = args[0].as_number()?;
    let precision = args[1].as_number()?;

    if precision < 0.0 {
        bail!("round() precision must be non-negative, got {}", precision);
    }

    let factor = 10f64.powi(precision as i32);
    Ok(Value::Number((x * factor).round_ties_even() / factor))
}

/// IEEE-754 division: a zero divisor yields an infinity or NaN, which the
/// resolver renders as empty rather than leaking into prompt text.
pub fn builtin_div(args: &[Value]) -> Result<Value> {
    expect_arity("div", args, 2)?;
    Ok(Value::Number(args[0].as_number()? / args[1].as_number()?))
}

pub fn builtin_sub(args: &[Value]) -> Result<Value> {
    expect_arity("sub", args, 2)?;
    Ok(Value::Number(args[0].as_number()? - args[1].as_number()?))
}

pub fn builtin_add(args: &[Value]) -> Result<Value> {
    expect_arity("add", args, 2)?;
    Ok(Value::Number(args[0].as_number()? + args[1].as_number()?))
}

pub fn builtin_mul(args: &[Value]) -> Result<Value> {
    expect_arity("mul", args, 2)?;
    Ok(Value::Number(args[0].as_number()? * args[1].as_number()?))
}

pub fn builtin_float64(args: &[Value]) -> Result<Value> {
    expect_arity("float64", args, 1)?;
    Ok(Value::Number(args[0].as_number()?))
}

pub fn builtin_upper(args: &[Value]) -> Result<Value> {
    expect_arity("upper", args, 1)?;
    Ok(Value::String(args[0].render().to_uppercase()))
}

pub fn builtin_lower(args: &[Value]) -> Result<Value> {
    expect_arity("lower", args, 1)?;
    Ok(Value::String(args[0].render().to_lowercase()))
}

pub fn builtin_trim(args: &[Value]) -> Result<Value> {
    expect_arity("trim", args, 1)?;
    Ok(Value::String(args[0].render().trim().to_string()))
}

/// `date fmt ts`: strftime-formats an RFC 3339 timestamp. Pipelined as
/// `.Now | date "%H:%M"`, the timestamp arrives as the final argument.
pub fn builtin_date(args: &[Value]) -> Result<Value> {
    expect_arity("date", args, 2)?;

    let fmt = args[0].as_str()?;
    let ts = args[1].as_str()?;

    let parsed = DateTime::parse_from_rfc3339(ts)
        .map_err(|e| anyhow::anyhow!("date() cannot parse timestamp '{}': {}", ts, e))?;

    // Validate the format string up front; a bad specifier would otherwise
    // only surface as a panic inside Display.
    if StrftimeItems::new(fmt).any(|item| matches!(item, chrono::format::Item::Error)) {
        bail!("date() format string '{}' is invalid", fmt);
    }

    Ok(Value::String(parsed.format(fmt).to_string()))
}
