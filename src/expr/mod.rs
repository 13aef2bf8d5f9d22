
pub mod calculus;
pub mod equivalence;
pub mod eval;
pub mod var;
pub mod walker;

mod display;

use var::Var;

use serde::{Serialize, Deserialize};

/// An algebraic expression of one variable, as a strictly owned tree.
/// Every transform builds a new tree; no node is mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expr {
  /// An integer literal. Evaluation may produce non-integral results,
  /// but literals always originate as integers.
  Value(i64),
  /// A single-letter symbol.
  Variable(Var),
  UnaryMinus(Box<Expr>),
  Add(Box<Expr>, Box<Expr>),
  Subtract(Box<Expr>, Box<Expr>),
  Multiply(Box<Expr>, Box<Expr>),
  Divide(Box<Expr>, Box<Expr>),
  Power(Box<Expr>, Box<Expr>),
  Ln(Box<Expr>),
}

impl Expr {

  pub fn zero() -> Expr {
    Expr::Value(0)
  }

  pub fn one() -> Expr {
    Expr::Value(1)
  }

  pub fn unary_minus(e: Expr) -> Expr {
    Expr::UnaryMinus(Box::new(e))
  }

  pub fn add(a: Expr, b: Expr) -> Expr {
    Expr::Add(Box::new(a), Box::new(b))
  }

  pub fn subtract(a: Expr, b: Expr) -> Expr {
    Expr::Subtract(Box::new(a), Box::new(b))
  }

  pub fn multiply(a: Expr, b: Expr) -> Expr {
    Expr::Multiply(Box::new(a), Box::new(b))
  }

  pub fn divide(a: Expr, b: Expr) -> Expr {
    Expr::Divide(Box::new(a), Box::new(b))
  }

  pub fn power(base: Expr, exp: Expr) -> Expr {
    Expr::Power(Box::new(base), Box::new(exp))
  }

  pub fn ln(e: Expr) -> Expr {
    Expr::Ln(Box::new(e))
  }

  /// Returns true if any sub-expression of `self` is the given
  /// variable.
  pub fn depends_on(&self, var: Var) -> bool {
    walker::any(self, |e| matches!(e, Expr::Variable(v) if *v == var))
  }
}

impl From<i64> for Expr {
  fn from(n: i64) -> Expr {
    Expr::Value(n)
  }
}

impl From<Var> for Expr {
  fn from(v: Var) -> Expr {
    Expr::Variable(v)
  }
}
