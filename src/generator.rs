
//! Random generation of reference equations.
//!
//! Equations are produced as plain text in the engine's input
//! grammar, so the parser is the only way into the tree
//! representation, for generated equations and user answers alike.

use rand::Rng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Percentage chance for a term to carry a wildcard suffix.
pub const DEFAULT_WILDCARD_CHANCE: u32 = 10;

/// Exponent numerators. Powers of two keep the reduced exponents
/// integral often enough that most equations stay friendly.
const EXPONENT_NUMERATORS: [i64; 6] = [1, 2, 4, 8, 16, 32];

/// Exponent denominators.
const EXPONENT_DENOMINATORS: [i64; 3] = [1, 2, 4];

#[derive(Debug, Clone)]
pub struct EquationGenerator<R> {
  rng: R,
  wildcard_chance: u32,
}

impl EquationGenerator<ChaCha8Rng> {
  /// A generator whose output is fully determined by `seed`.
  pub fn from_seed(seed: u64) -> Self {
    Self::new(ChaCha8Rng::seed_from_u64(seed))
  }
}

impl<R: Rng> EquationGenerator<R> {
  pub fn new(rng: R) -> Self {
    Self {
      rng,
      wildcard_chance: DEFAULT_WILDCARD_CHANCE,
    }
  }

  pub fn with_wildcard_chance(mut self, percent: u32) -> Self {
    self.wildcard_chance = percent;
    self
  }

  /// Generates one equation of one to three terms.
  pub fn generate(&mut self) -> String {
    let term_count = self.rng.gen_range(1..4);
    let mut equation = String::new();
    for i in 0..term_count {
      equation.push_str(&self.next_term(i == 0));
    }
    let equation = equation.trim_end().to_owned();
    debug!("generated equation: {equation}");
    equation
  }

  /// One term of the shape `c*x^(e)`, where `e` is an integer or a
  /// reduced fraction, optionally followed by a wildcard suffix. A
  /// leading `+ ` separator is emitted for non-negative coefficients
  /// on every term but the first; negative coefficients separate
  /// themselves.
  fn next_term(&mut self, first: bool) -> String {
    let coefficient = self.rng.gen_range(-19..20);
    let mut numerator = *EXPONENT_NUMERATORS.choose(&mut self.rng).expect("array is non-empty");
    let mut denominator = *EXPONENT_DENOMINATORS.choose(&mut self.rng).expect("array is non-empty");
    if numerator >= denominator {
      numerator /= denominator;
      denominator = 0;
    }

    let wildcard = if self.rng.gen_range(0..100) < self.wildcard_chance {
      if self.rng.gen_range(0..2) == 0 {
        format!(" + ln(x^{})", self.rng.gen_range(0..10))
      } else {
        format!(" * x^{}", self.rng.gen_range(-10..10))
      }
    } else {
      String::new()
    };

    format!(
      "{}{}*x^({}{}{}{}){} ",
      if coefficient >= 0 && !first { "+ " } else { "" },
      coefficient,
      if self.rng.gen_range(0..2) == 0 { "" } else { "-" },
      numerator,
      if denominator == 0 { "" } else { "/" },
      if denominator == 0 { String::new() } else { denominator.to_string() },
      wildcard,
    )
  }
}
