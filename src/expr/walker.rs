
//! Utility functions for walking an expression tree.

use super::Expr;

pub fn postorder_walk_borrowed<F>(expr: &Expr, mut f: F)
where F: FnMut(&Expr) {
  postorder_walk_borrowed_impl(expr, &mut f);
}

fn postorder_walk_borrowed_impl<F>(expr: &Expr, f: &mut F)
where F: FnMut(&Expr) {
  match expr {
    Expr::Value(_) | Expr::Variable(_) => {}
    Expr::UnaryMinus(e) | Expr::Ln(e) => {
      postorder_walk_borrowed_impl(e, f);
    }
    Expr::Add(a, b) | Expr::Subtract(a, b) | Expr::Multiply(a, b) |
    Expr::Divide(a, b) | Expr::Power(a, b) => {
      postorder_walk_borrowed_impl(a, f);
      postorder_walk_borrowed_impl(b, f);
    }
  }
  f(expr);
}

/// Returns true if any of the sub-expressions of `expr` (including
/// `expr` itself) satisfies the predicate.
pub fn any<F>(expr: &Expr, f: F) -> bool
where F: Fn(&Expr) -> bool {
  let mut result = false;
  postorder_walk_borrowed(expr, |e| {
    if f(e) {
      result = true;
    }
  });
  result
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::expr::var::Var;

  #[test]
  fn test_postorder_visits_every_node() {
    let expr = Expr::add(
      Expr::Value(1),
      Expr::multiply(Expr::from(Var::X), Expr::Value(2)),
    );
    let mut count = 0;
    postorder_walk_borrowed(&expr, |_| count += 1);
    assert_eq!(count, 5);
  }

  #[test]
  fn test_any() {
    let expr = Expr::ln(Expr::power(Expr::from(Var::X), Expr::Value(2)));
    assert!(any(&expr, |e| matches!(e, Expr::Power(_, _))));
    assert!(!any(&expr, |e| matches!(e, Expr::Divide(_, _))));
  }
}
