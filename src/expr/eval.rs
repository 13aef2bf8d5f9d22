
//! Numeric evaluation of expression trees.
//!
//! Evaluation substitutes a sample value for the independent variable
//! and computes in `f64`. `NaN` and the infinities are valid results,
//! not failures: division by zero, the logarithm of a non-positive
//! number, and a negative base under a fractional exponent all
//! propagate as ordinary floating-point outcomes.

use super::Expr;
use super::var::Var;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalError {
  /// The tree mentions a symbol other than the independent variable.
  /// That is a precondition violation by the caller, so evaluation
  /// fails fast instead of inventing a value.
  #[error("variable '{0}' is not the independent variable")]
  UndefinedSymbol(Var),
}

/// Evaluates `expr` at `var = x`.
pub fn evaluate(expr: &Expr, var: Var, x: f64) -> Result<f64, EvalError> {
  match expr {
    Expr::Value(n) => Ok(*n as f64),
    Expr::Variable(v) => {
      if *v == var {
        Ok(x)
      } else {
        Err(EvalError::UndefinedSymbol(*v))
      }
    }
    Expr::UnaryMinus(e) => Ok(-evaluate(e, var, x)?),
    Expr::Add(a, b) => Ok(evaluate(a, var, x)? + evaluate(b, var, x)?),
    Expr::Subtract(a, b) => Ok(evaluate(a, var, x)? - evaluate(b, var, x)?),
    Expr::Multiply(a, b) => Ok(evaluate(a, var, x)? * evaluate(b, var, x)?),
    Expr::Divide(a, b) => Ok(evaluate(a, var, x)? / evaluate(b, var, x)?),
    Expr::Power(base, exp) => Ok(evaluate(base, var, x)?.powf(evaluate(exp, var, x)?)),
    Expr::Ln(e) => Ok(evaluate(e, var, x)?.ln()),
  }
}
