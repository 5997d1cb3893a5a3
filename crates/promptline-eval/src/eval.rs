//! Expression evaluation: computes a [`Value`] for one parsed expression
//! against a [`Scope`].
//!
//! Evaluation is pure: no I/O, no clock, no mutation of the context. A
//! missing field path is a degrade-to-null outcome; only unknown functions,
//! wrong arity, and type mismatches are errors, and those are caught by the
//! resolver one placeholder up.

use crate::builtins::BuiltinRegistry;
use crate::scope::Scope;
use crate::value::Value;
use anyhow::Result;
use promptline_syntax::ast::Expr;

pub fn evaluate(expr: &Expr, scope: &Scope, builtins: &BuiltinRegistry) -> Result<Value> {
    match expr {
        Expr::String(s, _) => Ok(Value::String(s.clone())),
        Expr::Number(n, _) => Ok(Value::Number(*n)),
        Expr::Bool(b, _) => Ok(Value::Bool(*b)),
        Expr::Null(_) => Ok(Value::Null),

        Expr::Path(segments, _) => Ok(scope.lookup(segments)),

        Expr::Call { name, args, .. } => {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(evaluate(arg, scope, builtins)?);
            }
            builtins.call(name, &values)
        }

        Expr::Pipeline { input, stages, .. } => {
            let mut value = evaluate(input, scope, builtins)?;

            for stage in stages {
                let mut values = Vec::with_capacity(stage.args.len() + 1);
                for arg in &stage.args {
                    values.push(evaluate(arg, scope, builtins)?);
                }
                values.push(value);
                value = builtins.call(&stage.name, &values)?;
            }

            Ok(value)
        }
    }
}
