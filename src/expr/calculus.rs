
//! Symbolic differentiation of expression trees.
//!
//! The engine is structural: it applies the textbook rule for each
//! node kind and never simplifies, so results are full of
//! `expr * 1`-style subtrees. Correctness of a candidate answer is
//! judged numerically (see [`equivalence`](super::equivalence)), not
//! by tree shape, so simplification would buy nothing.

use super::Expr;
use super::var::Var;

#[derive(Debug, Clone)]
pub struct DerivativeEngine {
  target_variable: Var,
}

impl DerivativeEngine {
  pub fn new(target_variable: Var) -> Self {
    Self { target_variable }
  }

  /// Differentiates with respect to the target variable. Total over
  /// the node kinds: any symbol other than the target variable is
  /// treated as a constant.
  pub fn differentiate(&self, expr: &Expr) -> Expr {
    match expr {
      Expr::Value(_) => Expr::zero(),
      Expr::Variable(var) => {
        if *var == self.target_variable {
          Expr::one()
        } else {
          Expr::zero()
        }
      }
      Expr::UnaryMinus(e) => Expr::unary_minus(self.differentiate(e)),
      Expr::Add(a, b) => Expr::add(self.differentiate(a), self.differentiate(b)),
      Expr::Subtract(a, b) => Expr::subtract(self.differentiate(a), self.differentiate(b)),
      Expr::Multiply(a, b) => {
        // Product rule.
        Expr::add(
          Expr::multiply(self.differentiate(a), (**b).clone()),
          Expr::multiply((**a).clone(), self.differentiate(b)),
        )
      }
      Expr::Divide(a, b) => {
        // Quotient rule.
        Expr::divide(
          Expr::subtract(
            Expr::multiply(self.differentiate(a), (**b).clone()),
            Expr::multiply((**a).clone(), self.differentiate(b)),
          ),
          Expr::multiply((**b).clone(), (**b).clone()),
        )
      }
      Expr::Power(base, exp) => self.differentiate_power(base, exp),
      Expr::Ln(e) => {
        // Chain rule through the logarithm.
        Expr::divide(self.differentiate(e), (**e).clone())
      }
    }
  }

  fn differentiate_power(&self, base: &Expr, exp: &Expr) -> Expr {
    let base_varies = base.depends_on(self.target_variable);
    let exp_varies = exp.depends_on(self.target_variable);
    match (base_varies, exp_varies) {
      (false, false) => {
        // A constant power of a constant. Returning zero directly
        // keeps `Ln(base)` out of the tree, which matters when the
        // base is negative.
        Expr::zero()
      }
      (true, false) => {
        // Generalized power rule: (f^c)' = c * f^(c-1) * f'.
        Expr::multiply(
          Expr::multiply(
            exp.clone(),
            Expr::power(base.clone(), Expr::subtract(exp.clone(), Expr::one())),
          ),
          self.differentiate(base),
        )
      }
      (false, true) => {
        // Exponential rule: (c^g)' = c^g * ln(c) * g'.
        Expr::multiply(
          Expr::multiply(
            Expr::power(base.clone(), exp.clone()),
            Expr::ln(base.clone()),
          ),
          self.differentiate(exp),
        )
      }
      (true, true) => {
        // Logarithmic differentiation:
        // (f^g)' = f^g * (g' * ln(f) + g * f' / f).
        Expr::multiply(
          Expr::power(base.clone(), exp.clone()),
          Expr::add(
            Expr::multiply(self.differentiate(exp), Expr::ln(base.clone())),
            Expr::divide(
              Expr::multiply(exp.clone(), self.differentiate(base)),
              base.clone(),
            ),
          ),
        )
      }
    }
  }
}

/// Differentiates `expr` with respect to `var`.
pub fn differentiate(expr: &Expr, var: Var) -> Expr {
  DerivativeEngine::new(var).differentiate(expr)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::expr::eval::evaluate;
  use crate::parsing::parser::parse;

  use approx::assert_abs_diff_eq;

  fn derivative_at(input: &str, x: f64) -> f64 {
    let tree = parse(input).unwrap();
    let derivative = differentiate(&tree, Var::X);
    evaluate(&derivative, Var::X, x).unwrap()
  }

  #[test]
  fn test_constant_and_variable_rules() {
    assert_eq!(differentiate(&Expr::Value(7), Var::X), Expr::zero());
    assert_eq!(differentiate(&Expr::from(Var::X), Var::X), Expr::one());
    let y = Var::new('y').unwrap();
    assert_eq!(differentiate(&Expr::from(y), Var::X), Expr::zero());
  }

  #[test]
  fn test_polynomial_derivative() {
    assert_abs_diff_eq!(derivative_at("3*x^2", 5.0), 30.0);
    assert_abs_diff_eq!(derivative_at("x^3+2*x", 2.0), 14.0);
  }

  #[test]
  fn test_logarithm_derivative() {
    assert_abs_diff_eq!(derivative_at("ln(x)", 4.0), 0.25);
  }

  #[test]
  fn test_quotient_derivative() {
    assert_abs_diff_eq!(derivative_at("2/x", 1.0), -2.0);
  }

  #[test]
  fn test_unary_minus_derivative() {
    assert_abs_diff_eq!(derivative_at("-x^2", 3.0), -6.0);
  }

  #[test]
  fn test_product_rule() {
    // (x * ln(x))' = ln(x) + 1
    assert_abs_diff_eq!(derivative_at("x*ln(x)", 1.0), 1.0);
    assert_abs_diff_eq!(derivative_at("x*ln(x)", std::f64::consts::E), 2.0, epsilon = 1e-12);
  }

  #[test]
  fn test_constant_base_exponential() {
    // (2^x)' = 2^x * ln(2)
    assert_abs_diff_eq!(derivative_at("2^x", 3.0), 8.0 * 2.0f64.ln());
  }

  #[test]
  fn test_variable_base_and_exponent() {
    // (x^x)' = x^x * (ln(x) + 1)
    assert_abs_diff_eq!(
      derivative_at("x^x", 2.0),
      4.0 * (2.0f64.ln() + 1.0),
      epsilon = 1e-10,
    );
  }

  #[test]
  fn test_constant_power_of_constant_is_zero() {
    // A negative constant base must not leak an ln(negative) into
    // the derivative tree.
    let tree = parse("(-2)^3+x").unwrap();
    let derivative = differentiate(&tree, Var::X);
    assert_abs_diff_eq!(evaluate(&derivative, Var::X, 5.0).unwrap(), 1.0);
  }

  #[test]
  fn test_fractional_exponent_derivative() {
    // (x^(1/2))' = (1/2) * x^(-1/2)
    assert_abs_diff_eq!(derivative_at("x^(1/2)", 4.0), 0.25, epsilon = 1e-12);
  }

  #[test]
  fn test_differentiation_does_not_simplify() {
    let tree = parse("3*x").unwrap();
    // Product rule output keeps the `0*x` and `3*1` subtrees.
    let derivative = differentiate(&tree, Var::X);
    assert_eq!(
      derivative,
      Expr::add(
        Expr::multiply(Expr::zero(), Expr::from(Var::X)),
        Expr::multiply(Expr::Value(3), Expr::one()),
      ),
    );
  }
}
