
//! Parser from expression text to [`Expr`] trees.
//!
//! Precedence-climbing over the token stream, with the grammar's
//! quirks preserved: adjacency of two factors multiplies them, and a
//! unary minus is only recognized at the start of an expression (or
//! group) and immediately after `*`, `/`, or `^`. A minus anywhere
//! else is binary subtraction, so `2+-3` is malformed rather than an
//! addition of `-3`.

use crate::expr::Expr;
use crate::expr::var::Var;
use super::operator::{Operator, OperatorTable, Precedence};
use super::source::SourceOffset;
use super::tokenizer::{ExprTokenizer, Token, TokenData, TokenizerError, TokenizerState};

use thiserror::Error;

/// Cap on parser recursion, so pathological nesting fails cleanly
/// instead of overflowing the stack.
pub const MAX_RECURSION_DEPTH: usize = 128;

/// Unary minus binds tighter than multiplication but looser than
/// exponentiation, so `-x^2` reads as `-(x^2)` while `-x*2` reads as
/// `(-x)*2`.
pub const UNARY_MINUS_PRECEDENCE: Precedence = Precedence::new(198);

#[derive(Clone, Debug)]
pub struct ExprParser<'a> {
  operator_table: &'a OperatorTable,
}

#[derive(Debug, Clone, Error, PartialEq)]
#[non_exhaustive]
pub enum ParseError {
  #[error("{0}")]
  TokenizerError(#[from] TokenizerError),
  #[error("unexpected token '{0}' at {1}")]
  UnexpectedToken(String, SourceOffset),
  #[error("unexpected end of input")]
  UnexpectedEof,
  #[error("missing ')' for the group opened at {0}")]
  UnmatchedOpenParen(SourceOffset),
  #[error("')' at {0} has no matching '('")]
  UnmatchedCloseParen(SourceOffset),
  #[error("unknown function '{0}' at {1}")]
  UnknownFunction(String, SourceOffset),
  #[error("operator '{0}' at {1} has no expression form")]
  UnsupportedOperator(String, SourceOffset),
  #[error("expression nesting exceeds the depth limit")]
  TooDeeplyNested,
}

#[derive(Debug)]
struct ParseState {
  tokens: Vec<Token>,
  index: usize,
  depth: usize,
}

/// Parses `text` against the standard operator table. Empty or blank
/// input yields the zero literal rather than failing.
pub fn parse(text: &str) -> Result<Expr, ParseError> {
  let table = OperatorTable::common_operators();
  ExprParser::new(&table).parse(text)
}

impl ParseState {
  fn peek(&self) -> Option<&Token> {
    self.tokens.get(self.index)
  }

  fn next(&mut self) -> Option<Token> {
    let token = self.tokens.get(self.index).cloned();
    if token.is_some() {
      self.index += 1;
    }
    token
  }
}

impl<'a> ExprParser<'a> {
  pub fn new(operator_table: &'a OperatorTable) -> Self {
    Self { operator_table }
  }

  /// Parses one complete expression. Whitespace is stripped before
  /// tokenizing, so `l n (x)` and `ln(x)` are the same input; all
  /// reported offsets refer to the stripped text.
  pub fn parse(&self, text: &str) -> Result<Expr, ParseError> {
    let text: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if text.is_empty() {
      return Ok(Expr::zero());
    }

    let tokenizer = ExprTokenizer::new(self.operator_table);
    let mut tokenizer_state = TokenizerState::new(&text);
    let tokens = tokenizer.read_tokens(&mut tokenizer_state)?;

    let mut state = ParseState { tokens, index: 0, depth: 0 };
    let expr = self.parse_expr(&mut state, Precedence::MIN, true)?;
    match state.next() {
      None => Ok(expr),
      Some(token) => {
        if matches!(token.data, TokenData::RightParen) {
          Err(ParseError::UnmatchedCloseParen(token.span.start))
        } else {
          Err(ParseError::UnexpectedToken(token.to_string(), token.span.start))
        }
      }
    }
  }

  fn parse_expr(
    &self,
    state: &mut ParseState,
    min_prec: Precedence,
    unary_allowed: bool,
  ) -> Result<Expr, ParseError> {
    state.depth += 1;
    if state.depth > MAX_RECURSION_DEPTH {
      return Err(ParseError::TooDeeplyNested);
    }

    let mut lhs = self.parse_operand(state, unary_allowed)?;
    loop {
      let Some(data) = state.peek().map(|t| t.data.clone()) else { break };
      match data {
        TokenData::Operator(op) => {
          if op.left_precedence() < min_prec {
            break;
          }
          let token = state.next().expect("peeked token vanished");
          // A unary minus may directly follow `*`, `/`, or `^`, but
          // not `+` or `-`.
          let unary_ok = matches!(op.display_name(), "*" | "/" | "^");
          let rhs = self.parse_expr(state, op.right_precedence(), unary_ok)?;
          lhs = self.combine_infix(&op, lhs, rhs, token.span.start)?;
        }
        TokenData::Number(_) | TokenData::Symbol(_) | TokenData::LeftParen | TokenData::FunctionStart(_) => {
          // Adjacency of two factors is multiplication.
          let Some(times) = self.operator_table.get("*") else { break };
          if times.left_precedence() < min_prec {
            break;
          }
          let right_prec = times.right_precedence();
          let rhs = self.parse_expr(state, right_prec, false)?;
          lhs = Expr::multiply(lhs, rhs);
        }
        TokenData::RightParen => break,
      }
    }

    state.depth -= 1;
    Ok(lhs)
  }

  fn parse_operand(&self, state: &mut ParseState, unary_allowed: bool) -> Result<Expr, ParseError> {
    let Some(token) = state.next() else {
      return Err(ParseError::UnexpectedEof);
    };
    let Token { data, span } = token;
    match data {
      TokenData::Number(n) => Ok(Expr::Value(n)),
      TokenData::Symbol(ch) => {
        let var = Var::new(ch).expect("symbol tokens are always letters");
        Ok(Expr::Variable(var))
      }
      TokenData::LeftParen => {
        let inner = self.parse_expr(state, Precedence::MIN, true)?;
        self.expect_close_paren(state, span.start)?;
        Ok(inner)
      }
      TokenData::FunctionStart(name) => {
        if name != "ln" {
          return Err(ParseError::UnknownFunction(name, span.start));
        }
        let body = self.parse_expr(state, Precedence::MIN, true)?;
        self.expect_close_paren(state, span.start)?;
        Ok(Expr::ln(body))
      }
      TokenData::Operator(op) if op.display_name() == "-" && unary_allowed => {
        let operand = self.parse_expr(state, UNARY_MINUS_PRECEDENCE, false)?;
        Ok(Expr::unary_minus(operand))
      }
      TokenData::Operator(op) => {
        Err(ParseError::UnexpectedToken(op.display_name().to_owned(), span.start))
      }
      TokenData::RightParen => {
        Err(ParseError::UnexpectedToken(")".to_owned(), span.start))
      }
    }
  }

  fn expect_close_paren(&self, state: &mut ParseState, open_pos: SourceOffset) -> Result<(), ParseError> {
    match state.next() {
      Some(Token { data: TokenData::RightParen, .. }) => Ok(()),
      _ => Err(ParseError::UnmatchedOpenParen(open_pos)),
    }
  }

  fn combine_infix(
    &self,
    op: &Operator,
    lhs: Expr,
    rhs: Expr,
    pos: SourceOffset,
  ) -> Result<Expr, ParseError> {
    match op.display_name() {
      "+" => Ok(Expr::add(lhs, rhs)),
      "-" => Ok(Expr::subtract(lhs, rhs)),
      "*" => Ok(Expr::multiply(lhs, rhs)),
      "/" => Ok(Expr::divide(lhs, rhs)),
      "^" => Ok(Expr::power(lhs, rhs)),
      name => Err(ParseError::UnsupportedOperator(name.to_owned(), pos)),
    }
  }
}
