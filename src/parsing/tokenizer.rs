
//! Tokenization of expression text into a flat token stream.
//!
//! The tokenizer assumes whitespace has already been stripped from
//! the input (the parser normalizes its input before tokenizing, so
//! `l n (x)` and `ln(x)` read the same). All offsets refer to the
//! normalized text.

use super::operator::{Operator, OperatorTable};
use super::source::{SourceOffset, Span};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use std::fmt::{self, Display, Formatter};

/// Cursor over the input string, tracking the absolute position of
/// the unread remainder.
#[derive(Debug, Clone)]
pub struct TokenizerState<'a> {
  input: &'a str,
  position: SourceOffset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
  pub data: TokenData,
  pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenData {
  /// An unsigned integer literal. Signs are the parser's business.
  Number(i64),
  /// A single-letter symbol.
  Symbol(char),
  /// An infix operator.
  Operator(Operator),
  /// A function name together with its opening parenthesis, such as
  /// `ln(`.
  FunctionStart(String),
  LeftParen,
  RightParen,
}

#[derive(Debug, Clone, Error, PartialEq)]
#[non_exhaustive]
pub enum TokenizerError {
  #[error("unexpected character '{0}' at {1}")]
  UnexpectedChar(char, SourceOffset),
  #[error("integer literal '{0}' out of range at {1}")]
  IntegerOutOfRange(String, SourceOffset),
}

/// Reads expression tokens, using an operator table to recognize the
/// infix operator characters.
#[derive(Debug, Clone)]
pub struct ExprTokenizer<'a> {
  operator_table: &'a OperatorTable,
}

impl<'a> TokenizerState<'a> {
  pub fn new(input: &'a str) -> Self {
    Self {
      input,
      position: SourceOffset(0),
    }
  }

  pub fn is_eof(&self) -> bool {
    self.input.is_empty()
  }

  pub fn peek(&self) -> Option<char> {
    self.input.chars().next()
  }

  pub fn current_pos(&self) -> SourceOffset {
    self.position
  }

  /// Advances the position of `self` by `amount` bytes, up to the end
  /// of the input, and returns the span of the skipped portion.
  pub fn advance(&mut self, amount: usize) -> Span {
    let amount = amount.min(self.input.len());
    let start = self.position;
    self.input = &self.input[amount..];
    self.position = self.position + amount;
    Span::new(start, self.position)
  }

  pub fn read_literal(&mut self, literal: &str) -> Option<Span> {
    self.input.starts_with(literal).then(|| {
      self.advance(literal.len())
    })
  }

  /// If the current position of the string matches the given regex,
  /// returns the matched string and its span and advances the state.
  /// The regex MUST be anchored at the start of the input.
  pub fn read_regex(&mut self, regex: &Regex) -> Option<(&'a str, Span)> {
    let input: &'a str = self.input;
    let m = regex.find(input)?;
    assert_eq!(m.start(), 0, "Regex must be anchored at the start of the input");
    let span = self.advance(m.end());
    Some((&input[..m.end()], span))
  }
}

impl<'a> ExprTokenizer<'a> {
  pub fn new(operator_table: &'a OperatorTable) -> Self {
    Self { operator_table }
  }

  pub fn read_tokens(&self, state: &mut TokenizerState<'_>) -> Result<Vec<Token>, TokenizerError> {
    let mut tokens = Vec::new();
    while !state.is_eof() {
      tokens.push(self.read_one_token(state)?);
    }
    Ok(tokens)
  }

  pub fn read_one_token(&self, state: &mut TokenizerState<'_>) -> Result<Token, TokenizerError> {
    if let Some(tok) = self.read_paren(state) {
      Ok(tok)
    } else if let Some(tok) = self.read_function_start(state) {
      Ok(tok)
    } else if let Some(res) = self.read_number_literal(state) {
      res
    } else if let Some(tok) = self.read_symbol(state) {
      Ok(tok)
    } else if let Some(tok) = self.read_operator(state) {
      Ok(tok)
    } else {
      // Non-empty input that matched nothing above.
      let ch = state.peek().expect("tokenizer invoked at end of input");
      Err(TokenizerError::UnexpectedChar(ch, state.current_pos()))
    }
  }

  fn read_paren(&self, state: &mut TokenizerState<'_>) -> Option<Token> {
    #[allow(clippy::manual_map)] // Cleaner in an if-else chain
    if let Some(span) = state.read_literal("(") {
      Some(Token::new(TokenData::LeftParen, span))
    } else if let Some(span) = state.read_literal(")") {
      Some(Token::new(TokenData::RightParen, span))
    } else {
      None
    }
  }

  /// A run of two or more letters followed by `(` is a function call.
  /// A single letter followed by `(` is NOT: that reads as a symbol
  /// multiplied by a parenthesized group.
  fn read_function_start(&self, state: &mut TokenizerState<'_>) -> Option<Token> {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([a-zA-Z]{2,})\(").unwrap());
    state.read_regex(&RE).map(|(matched, span)| {
      let name = matched.strip_suffix('(').expect("match always ends in paren");
      Token::new(TokenData::FunctionStart(name.to_owned()), span)
    })
  }

  fn read_number_literal(&self, state: &mut TokenizerState<'_>) -> Option<Result<Token, TokenizerError>> {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+").unwrap());
    let start = state.current_pos();
    let (matched, span) = state.read_regex(&RE)?;
    match matched.parse::<i64>() {
      Err(_) => Some(Err(TokenizerError::IntegerOutOfRange(matched.to_owned(), start))),
      Ok(n) => Some(Ok(Token::new(TokenData::Number(n), span))),
    }
  }

  fn read_symbol(&self, state: &mut TokenizerState<'_>) -> Option<Token> {
    let ch = state.peek().filter(char::is_ascii_alphabetic)?;
    let span = state.advance(ch.len_utf8());
    Some(Token::new(TokenData::Symbol(ch), span))
  }

  fn read_operator(&self, state: &mut TokenizerState<'_>) -> Option<Token> {
    let ch = state.peek()?;
    let operator = self.operator_table.get(ch.encode_utf8(&mut [0u8; 4]))?.clone();
    let span = state.advance(ch.len_utf8());
    Some(Token::new(TokenData::Operator(operator), span))
  }
}

impl Token {
  pub fn new(data: TokenData, span: Span) -> Self {
    Self { data, span }
  }
}

impl Display for TokenData {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      TokenData::Number(n) => write!(f, "{n}"),
      TokenData::Symbol(s) => write!(f, "{s}"),
      TokenData::Operator(op) => write!(f, "{}", op.display_name()),
      TokenData::FunctionStart(name) => write!(f, "{name}("),
      TokenData::LeftParen => write!(f, "("),
      TokenData::RightParen => write!(f, ")"),
    }
  }
}

impl Display for Token {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.data)
  }
}
