
//! Derivative practice engine.
//!
//! The pipeline: equation text goes through the [`parsing`] layer to
//! become an [`expr::Expr`] tree, [`expr::calculus`] differentiates
//! it, [`expr::eval`] runs trees numerically, and
//! [`expr::equivalence`] decides whether a candidate answer is the
//! same function as the reference derivative. [`generator`] produces
//! the equation text and [`session`] drives a grading run.

pub mod error;
pub mod expr;
pub mod generator;
pub mod parsing;
pub mod session;
