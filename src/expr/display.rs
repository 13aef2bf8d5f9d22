
//! Infix rendering of expression trees.
//!
//! The output is deliberately conservative with parentheses so that
//! it can be fed back to the parser: a unary minus or negative
//! literal is parenthesized anywhere but the top level, since the
//! grammar only admits a bare minus sign at the start of a group or
//! after a multiplicative operator.

use super::Expr;
use crate::parsing::operator::{OperatorTable, Precedence};
use crate::parsing::parser::UNARY_MINUS_PRECEDENCE;

use once_cell::sync::Lazy;

use std::fmt::{self, Display, Formatter};

static OPERATORS: Lazy<OperatorTable> = Lazy::new(OperatorTable::common_operators);

impl Display for Expr {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write_expr(f, self, Precedence::MIN)
  }
}

fn write_expr(f: &mut Formatter<'_>, expr: &Expr, prec: Precedence) -> fmt::Result {
  match expr {
    Expr::Value(n) => {
      if *n < 0 && prec > Precedence::MIN {
        write!(f, "({n})")
      } else {
        write!(f, "{n}")
      }
    }
    Expr::Variable(v) => write!(f, "{v}"),
    Expr::UnaryMinus(e) => {
      if prec > Precedence::MIN {
        write!(f, "(-")?;
        write_expr(f, e, UNARY_MINUS_PRECEDENCE)?;
        write!(f, ")")
      } else {
        write!(f, "-")?;
        write_expr(f, e, UNARY_MINUS_PRECEDENCE)
      }
    }
    Expr::Ln(e) => {
      write!(f, "ln(")?;
      write_expr(f, e, Precedence::MIN)?;
      write!(f, ")")
    }
    Expr::Add(a, b) => write_infix(f, "+", a, b, prec),
    Expr::Subtract(a, b) => write_infix(f, "-", a, b, prec),
    Expr::Multiply(a, b) => write_infix(f, "*", a, b, prec),
    Expr::Divide(a, b) => write_infix(f, "/", a, b, prec),
    Expr::Power(a, b) => write_infix(f, "^", a, b, prec),
  }
}

fn write_infix(
  f: &mut Formatter<'_>,
  name: &str,
  left: &Expr,
  right: &Expr,
  prec: Precedence,
) -> fmt::Result {
  let op = OPERATORS.get(name).expect("operator missing from the standard table");
  let parenthesized = prec > op.precedence();
  if parenthesized {
    write!(f, "(")?;
  }
  write_expr(f, left, op.left_precedence())?;
  write!(f, "{name}")?;
  write_expr(f, right, op.right_precedence())?;
  if parenthesized {
    write!(f, ")")?;
  }
  Ok(())
}
