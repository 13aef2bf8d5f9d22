
use crate::expr::eval::EvalError;
use crate::parsing::parser::ParseError;

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
  #[error("{0}")]
  ParseError(#[from] ParseError),
  #[error("{0}")]
  EvalError(#[from] EvalError),
}
