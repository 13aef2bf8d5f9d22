
//! The grading session: the driver that sits between a host UI and
//! the algebra engine.
//!
//! A session owns a list of equations and their reference
//! derivatives, computed once up front. Candidate answers come in as
//! text; each submission is parsed fresh and compared against the
//! current reference by numeric sampling. Malformed input is rejected
//! without penalty, a wrong answer costs a strike and moves on, and a
//! right answer just moves on.

use crate::error::Error;
use crate::expr::calculus::differentiate;
use crate::expr::equivalence::{EquivalenceOracle, Mismatch, Verdict};
use crate::expr::var::Var;
use crate::expr::Expr;
use crate::generator::EquationGenerator;
use crate::parsing::parser::{parse, ParseError};

use itertools::Itertools;
use rand::Rng;
use serde::{Serialize, Deserialize};
use tracing::{info, warn};

/// Hard cap on the number of equations in one session.
pub const MAX_EQUATIONS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
  /// How many equations to drill, clamped to [`MAX_EQUATIONS`].
  pub equation_count: usize,
  /// Percentage chance for a generated term to carry a wildcard.
  pub wildcard_chance: u32,
  /// Tolerance for the sample comparison.
  pub tolerance: f64,
  /// Samples run from 1 up to, but not including, this limit.
  pub sample_limit: i64,
}

impl Default for SessionConfig {
  fn default() -> Self {
    Self {
      equation_count: 3,
      wildcard_chance: crate::generator::DEFAULT_WILDCARD_CHANCE,
      tolerance: crate::expr::equivalence::DEFAULT_TOLERANCE,
      sample_limit: 1000,
    }
  }
}

#[derive(Debug)]
pub struct DrillSession {
  equations: Vec<String>,
  solutions: Vec<Expr>,
  oracle: EquivalenceOracle,
  current: usize,
  strikes: u32,
  complete: bool,
}

/// The outcome of one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Grade {
  /// The input never made it to grading: it was malformed, or it
  /// mentioned a symbol the engine cannot evaluate. No penalty, and
  /// the session does not advance.
  Rejected { reason: String },
  Correct { complete: bool },
  Incorrect { mismatch: Mismatch, complete: bool },
}

impl DrillSession {
  /// Builds a session with freshly generated equations.
  pub fn generate<R: Rng>(rng: R, config: &SessionConfig) -> Self {
    let count = config.equation_count.clamp(1, MAX_EQUATIONS);
    info!("generating {count} equations");
    let mut generator = EquationGenerator::new(rng).with_wildcard_chance(config.wildcard_chance);
    let equations = (0..count).map(|_| generator.generate()).collect();
    Self::from_equations(equations, config).expect("generated equations always parse")
  }

  /// Builds a session over the given equation texts, differentiating
  /// each one for later grading.
  pub fn from_equations(equations: Vec<String>, config: &SessionConfig) -> Result<Self, Error> {
    let variable = Var::X;
    let solutions = equations.iter()
      .map(|text| -> Result<Expr, ParseError> {
        Ok(differentiate(&parse(text)?, variable))
      })
      .collect::<Result<Vec<_>, _>>()?;
    info!("the equations are:\n{}", equations.iter().join("\n"));
    info!("the solutions are:\n{}", solutions.iter().join("\n"));

    let oracle = EquivalenceOracle::new(variable)
      .with_domain(1..=config.sample_limit - 1)
      .with_tolerance(config.tolerance);
    Ok(Self {
      equations,
      solutions,
      oracle,
      current: 0,
      strikes: 0,
      complete: false,
    })
  }

  /// The equation currently being drilled, or `None` once the
  /// session is complete.
  pub fn current_equation(&self) -> Option<&str> {
    (!self.complete).then(|| self.equations[self.current].as_str())
  }

  pub fn equations(&self) -> &[String] {
    &self.equations
  }

  pub fn current_index(&self) -> usize {
    self.current
  }

  pub fn strikes(&self) -> u32 {
    self.strikes
  }

  pub fn is_complete(&self) -> bool {
    self.complete
  }

  /// Grades one candidate answer for the current equation.
  pub fn submit(&mut self, answer: &str) -> Grade {
    if self.complete {
      return Grade::Rejected { reason: "session is already complete".to_owned() };
    }

    let candidate = match parse(answer) {
      Ok(tree) => tree,
      Err(err) => {
        warn!("rejected input '{answer}': {err}");
        return Grade::Rejected { reason: err.to_string() };
      }
    };

    match self.oracle.check(&self.solutions[self.current], &candidate) {
      Err(err) => {
        warn!("rejected input '{answer}': {err}");
        Grade::Rejected { reason: err.to_string() }
      }
      Ok(Verdict::Equivalent) => {
        info!("equation {} solved correctly", self.current);
        let complete = self.advance();
        Grade::Correct { complete }
      }
      Ok(Verdict::NotEquivalent(mismatch)) => {
        self.strikes += 1;
        warn!(
          "equation {} answer incorrect\nexpected: {}\nbut got: {}\nfor x = {}\nfrom input: {}\nfor equation: {}",
          self.current,
          mismatch.expected,
          mismatch.actual,
          mismatch.point,
          answer,
          self.equations[self.current],
        );
        let complete = self.advance();
        Grade::Incorrect { mismatch, complete }
      }
    }
  }

  /// Moves to the next equation, finishing the session after the
  /// last one. A strike on the final equation still finishes the
  /// session.
  fn advance(&mut self) -> bool {
    self.current += 1;
    if self.current == self.equations.len() {
      self.complete = true;
    }
    self.complete
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use rand::SeedableRng;

  fn session_over(equations: &[&str]) -> DrillSession {
    let equations = equations.iter().map(|s| (*s).to_owned()).collect();
    DrillSession::from_equations(equations, &SessionConfig::default()).unwrap()
  }

  #[test]
  fn test_correct_answer_completes_single_equation_session() {
    let mut session = session_over(&["3*x^2"]);
    assert_eq!(session.current_equation(), Some("3*x^2"));
    let grade = session.submit("6*x");
    assert_eq!(grade, Grade::Correct { complete: true });
    assert!(session.is_complete());
    assert_eq!(session.strikes(), 0);
    assert_eq!(session.current_equation(), None);
  }

  #[test]
  fn test_correct_answer_advances_multi_equation_session() {
    let mut session = session_over(&["3*x^2", "ln(x)"]);
    assert_eq!(session.submit("6*x"), Grade::Correct { complete: false });
    assert!(!session.is_complete());
    assert_eq!(session.current_equation(), Some("ln(x)"));
    assert_eq!(session.submit("1/x"), Grade::Correct { complete: true });
    assert!(session.is_complete());
  }

  #[test]
  fn test_wrong_answer_strikes_and_advances() {
    let mut session = session_over(&["3*x^2", "2/x"]);
    let grade = session.submit("5*x");
    let Grade::Incorrect { mismatch, complete } = grade else {
      panic!("expected an incorrect grade");
    };
    assert!(!complete);
    assert_eq!(mismatch.point, 1);
    assert_eq!(mismatch.expected, 6.0);
    assert_eq!(mismatch.actual, 5.0);
    assert_eq!(session.strikes(), 1);
    assert_eq!(session.current_equation(), Some("2/x"));
  }

  #[test]
  fn test_strike_on_final_equation_still_completes() {
    let mut session = session_over(&["3*x^2"]);
    let grade = session.submit("7*x");
    assert!(matches!(grade, Grade::Incorrect { complete: true, .. }));
    assert!(session.is_complete());
  }

  #[test]
  fn test_malformed_answer_is_rejected_without_penalty() {
    let mut session = session_over(&["3*x^2"]);
    let grade = session.submit("(6*x");
    assert!(matches!(grade, Grade::Rejected { .. }));
    assert_eq!(session.strikes(), 0);
    assert_eq!(session.current_equation(), Some("3*x^2"));
    // The equation can still be answered afterwards.
    assert_eq!(session.submit("6*x"), Grade::Correct { complete: true });
  }

  #[test]
  fn test_foreign_symbol_is_rejected_without_penalty() {
    let mut session = session_over(&["3*x^2"]);
    let grade = session.submit("6*y");
    assert!(matches!(grade, Grade::Rejected { .. }));
    assert_eq!(session.strikes(), 0);
  }

  #[test]
  fn test_submission_after_completion_is_rejected() {
    let mut session = session_over(&["3*x^2"]);
    session.submit("6*x");
    assert!(matches!(session.submit("6*x"), Grade::Rejected { .. }));
  }

  #[test]
  fn test_unsimplified_answers_are_accepted() {
    let mut session = session_over(&["x^3+2*x"]);
    // Derivative left deliberately un-simplified by the submitter.
    assert_eq!(
      session.submit("3*x^2+2*1+0*x"),
      Grade::Correct { complete: true },
    );
  }

  #[test]
  fn test_generated_session_is_playable() {
    let rng = rand_chacha::ChaCha8Rng::seed_from_u64(42);
    let config = SessionConfig { equation_count: 2, ..SessionConfig::default() };
    let mut session = DrillSession::generate(rng, &config);
    assert_eq!(session.equations().len(), 2);
    // Garbage input never panics and never advances.
    assert!(matches!(session.submit("++"), Grade::Rejected { .. }));
    assert_eq!(session.current_index(), 0);
  }

  #[test]
  fn test_equation_count_is_clamped() {
    let rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
    let config = SessionConfig { equation_count: 50, ..SessionConfig::default() };
    let session = DrillSession::generate(rng, &config);
    assert_eq!(session.equations().len(), MAX_EQUATIONS);
  }
}
