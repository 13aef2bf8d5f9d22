
//! The sampling oracle that decides whether two expression trees
//! represent the same function.
//!
//! This is a heuristic, not a proof: both trees are evaluated at each
//! integer sample point in a bounded domain, and the first point where
//! the results are not nearly equal (or where either result is NaN)
//! decides the answer. Sampling starts at 1, never 0, since many
//! generated equations are undefined at the origin.

use super::Expr;
use super::eval::{evaluate, EvalError};
use super::var::Var;

use serde::{Serialize, Deserialize};

use std::ops::RangeInclusive;

/// Default relative tolerance for sample comparison.
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Default sample domain.
pub const DEFAULT_DOMAIN: RangeInclusive<i64> = 1..=999;

/// The first failing sample, kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mismatch {
  /// The sample value of the independent variable.
  pub point: i64,
  /// What the reference tree evaluated to.
  pub expected: f64,
  /// What the candidate tree evaluated to.
  pub actual: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Verdict {
  Equivalent,
  NotEquivalent(Mismatch),
}

#[derive(Debug, Clone)]
pub struct EquivalenceOracle {
  variable: Var,
  domain: RangeInclusive<i64>,
  tolerance: f64,
}

impl Verdict {
  pub fn is_equivalent(&self) -> bool {
    matches!(self, Verdict::Equivalent)
  }
}

impl EquivalenceOracle {
  pub fn new(variable: Var) -> Self {
    Self {
      variable,
      domain: DEFAULT_DOMAIN,
      tolerance: DEFAULT_TOLERANCE,
    }
  }

  /// Replaces the sample domain. The start is clamped to 1.
  pub fn with_domain(mut self, domain: RangeInclusive<i64>) -> Self {
    self.domain = domain;
    self
  }

  pub fn with_tolerance(mut self, tolerance: f64) -> Self {
    self.tolerance = tolerance;
    self
  }

  /// Samples both trees over the domain, stopping at the first
  /// failing point. An `UndefinedSymbol` failure from either tree
  /// aborts the check entirely, since the comparison is meaningless.
  pub fn check(&self, reference: &Expr, candidate: &Expr) -> Result<Verdict, EvalError> {
    let start = (*self.domain.start()).max(1);
    for point in start..=*self.domain.end() {
      let x = point as f64;
      let expected = evaluate(reference, self.variable, x)?;
      let actual = evaluate(candidate, self.variable, x)?;
      let failed = expected.is_nan()
        || actual.is_nan()
        || !nearly_equal(actual, expected, self.tolerance);
      if failed {
        return Ok(Verdict::NotEquivalent(Mismatch { point, expected, actual }));
      }
    }
    Ok(Verdict::Equivalent)
  }
}

/// Checks `reference` and `candidate` for equivalence in `var` under
/// the default domain and tolerance.
pub fn equivalent(reference: &Expr, candidate: &Expr, var: Var) -> Result<bool, EvalError> {
  let verdict = EquivalenceOracle::new(var).check(reference, candidate)?;
  Ok(verdict.is_equivalent())
}

/// Tolerance-aware floating-point comparison.
///
/// Exact equality (which covers matching infinities) always passes.
/// Near zero, and in the sub-normal range, the relative error loses
/// its meaning, so the absolute difference is compared against the
/// tolerance scaled into the smallest normal magnitude. Everywhere
/// else the relative difference decides.
pub fn nearly_equal(a: f64, b: f64, epsilon: f64) -> bool {
  let abs_a = a.abs();
  let abs_b = b.abs();
  let diff = (a - b).abs();

  if a == b {
    true
  } else if a == 0.0 || b == 0.0 || abs_a + abs_b < f64::MIN_POSITIVE {
    diff < epsilon * f64::MIN_POSITIVE
  } else {
    diff / (abs_a + abs_b) < epsilon
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::expr::calculus::differentiate;
  use crate::parsing::parser::parse;

  #[test]
  fn test_nearly_equal_exact_and_infinite() {
    assert!(nearly_equal(1.5, 1.5, 1e-4));
    assert!(nearly_equal(f64::INFINITY, f64::INFINITY, 1e-4));
    assert!(!nearly_equal(f64::INFINITY, 1e300, 1e-4));
    assert!(!nearly_equal(f64::NAN, f64::NAN, 1e-4));
  }

  #[test]
  fn test_nearly_equal_relative_regime() {
    assert!(nearly_equal(1e10, 1.00001e10, 1e-4));
    assert!(!nearly_equal(1e10, 1.1e10, 1e-4));
  }

  #[test]
  fn test_nearly_equal_near_zero() {
    // With one side exactly zero, the comparison is absolute against
    // epsilon scaled into the smallest normal magnitude.
    assert!(nearly_equal(0.0, 1e-313, 1e-4));
    assert!(!nearly_equal(0.0, 1e-9, 1e-4));
  }

  #[test]
  fn test_nearly_equal_subnormal_regime() {
    // Both operands sub-normal: absolute comparison, threshold
    // epsilon * MIN_POSITIVE (about 2.2e-312 here).
    assert!(nearly_equal(1.0e-312, 1.5e-312, 1e-4));
    assert!(!nearly_equal(1.0e-310, 2.0e-310, 1e-4));
  }

  #[test]
  fn test_oracle_reflexivity() {
    for input in ["3*x^2", "ln(x)", "2/x", "x^x", "-x^2+1"] {
      let tree = parse(input).unwrap();
      assert!(equivalent(&tree, &tree, Var::X).unwrap(), "{input} should equal itself");
    }
  }

  #[test]
  fn test_oracle_accepts_structurally_different_trees() {
    let a = parse("x+x").unwrap();
    let b = parse("2*x").unwrap();
    assert!(equivalent(&a, &b, Var::X).unwrap());
  }

  #[test]
  fn test_oracle_rejects_constant_offset() {
    let a = parse("2*x").unwrap();
    let b = parse("2*x+1").unwrap();
    let verdict = EquivalenceOracle::new(Var::X).check(&a, &b).unwrap();
    let Verdict::NotEquivalent(mismatch) = verdict else {
      panic!("expected a mismatch");
    };
    assert_eq!(mismatch.point, 1);
    assert_eq!(mismatch.expected, 2.0);
    assert_eq!(mismatch.actual, 3.0);
  }

  #[test]
  fn test_oracle_rejects_nan_candidate() {
    let reference = parse("x").unwrap();
    // ln(-x) is NaN at every positive sample.
    let candidate = parse("x+0*ln(-x)").unwrap();
    let verdict = EquivalenceOracle::new(Var::X).check(&reference, &candidate).unwrap();
    assert!(!verdict.is_equivalent());
  }

  #[test]
  fn test_oracle_accepts_unsimplified_derivative() {
    let reference = differentiate(&parse("3*x^2").unwrap(), Var::X);
    let candidate = parse("6*x").unwrap();
    assert!(equivalent(&reference, &candidate, Var::X).unwrap());
  }

  #[test]
  fn test_oracle_domain_is_clamped_to_positive() {
    let a = parse("ln(x)+0*x").unwrap();
    let oracle = EquivalenceOracle::new(Var::X).with_domain(-5..=10);
    // Sampling from -5 would hit NaN immediately; clamping to 1 keeps
    // the comparison meaningful.
    assert!(oracle.check(&a, &a).unwrap().is_equivalent());
  }

  #[test]
  fn test_oracle_undefined_symbol_fails_fast() {
    let reference = parse("x").unwrap();
    let candidate = parse("y").unwrap();
    let err = EquivalenceOracle::new(Var::X).check(&reference, &candidate).unwrap_err();
    assert!(matches!(err, EvalError::UndefinedSymbol(_)));
  }

  #[test]
  fn test_mismatch_serializes_for_diagnostics() {
    let mismatch = Mismatch { point: 3, expected: 12.0, actual: 11.0 };
    let json = serde_json::to_string(&mismatch).unwrap();
    assert_eq!(json, r#"{"point":3,"expected":12.0,"actual":11.0}"#);
  }
}
