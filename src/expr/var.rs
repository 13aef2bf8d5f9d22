
use serde::{Serialize, Deserialize};

use std::error::{Error as StdError};
use std::fmt::{self, Display, Formatter};

/// A variable in an expression, left intentionally un-evaluated.
///
/// Variables are identified by a single letter. This structure
/// enforces that constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Var(char);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TryFromCharError {
  original_char: char,
}

impl Var {
  /// The conventional independent variable.
  pub const X: Var = Var('x');

  pub fn new(name: char) -> Option<Self> {
    Self::try_from(name).ok()
  }

  pub fn as_char(self) -> char {
    self.0
  }
}

impl TryFrom<char> for Var {
  type Error = TryFromCharError;

  fn try_from(name: char) -> Result<Self, Self::Error> {
    if name.is_ascii_alphabetic() {
      Ok(Self(name))
    } else {
      Err(TryFromCharError { original_char: name })
    }
  }
}

impl From<Var> for char {
  fn from(v: Var) -> Self {
    v.0
  }
}

impl Display for Var {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl Display for TryFromCharError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "'{}' is not a valid variable name", self.original_char)
  }
}

impl StdError for TryFromCharError {}
