//! Expression evaluator for display-layer arithmetic
//!
//! Evaluation runs in three stages:
//! - **Normalization**: display symbols to canonical arithmetic text
//!   (`×` → `*`, `÷` → `/`, `−` → `-`, `^` → `**`, `π`/`e` → numeric literals,
//!   `12.5%` → `(12.5/100)`)
//! - **Tokenizing**: numbers (fraction and exponent allowed), `+ - * / ** ( )`
//! - **Parsing**: recursive descent that folds values as it goes, so a long
//!   chain like `1+1+…+1` runs in a loop rather than one frame per operand
//!
//! Grammar of the canonical form:
//!
//! ```text
//! expr  := term (('+' | '-') term)*
//! term  := unary (('*' | '/') unary)*
//! unary := ('-' | '+') unary | power
//! power := atom ('**' unary)?
//! atom  := number | '(' expr ')'
//! ```
//!
//! `**` is right associative and binds tighter than unary minus, so `-2^2`
//! is `-4` and `2^-1` is `0.5`. Nothing outside this grammar is accepted:
//! there are no identifiers, variables or calls.

use crate::error::{CalcError, Result};
use crate::format::format_result;
use std::f64::consts::{E, PI};
use tracing::debug;

/// Maximum nesting of parentheses, unary operators and powers
pub const MAX_DEPTH: usize = 256;

/// Percentage suffix on a numeric literal: `12%`, `2.5%`, `1e+3%`
const PERCENT_PATTERN: &str = r"(\d+(?:\.\d+)?(?:e\+\d+)?)%";

/// Canonical arithmetic token
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Power,
    LParen,
    RParen,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{}", value),
            Self::Plus => f.write_str("+"),
            Self::Minus => f.write_str("-"),
            Self::Star => f.write_str("*"),
            Self::Slash => f.write_str("/"),
            Self::Power => f.write_str("**"),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
        }
    }
}

/// Rewrite display symbols into canonical arithmetic text.
pub fn normalize(expression: &str) -> Result<String> {
    let replaced = expression
        .replace('×', "*")
        .replace('÷', "/")
        .replace('−', "-")
        .replace('^', "**");

    let re = regex::Regex::new(PERCENT_PATTERN)
        .map_err(|e| CalcError::parse(format!("Regex error: {}", e)))?;
    let replaced = re.replace_all(&replaced, "($1/100)");

    Ok(substitute_constants(&replaced))
}

/// Replace `π` and the constant `e` with parenthesized literals.
///
/// Only the formatter's own shape, a mantissa followed by `e+` and a digit,
/// is exponent notation. Anything else is the constant, so keypad input
/// `2e−3` is a parse error like `2e`, not `0.002`.
fn substitute_constants(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 16);

    for (i, &c) in chars.iter().enumerate() {
        match c {
            'π' => out.push_str(&format!("({})", PI)),
            'e' if !is_exponent_marker(&chars, i) => out.push_str(&format!("({})", E)),
            _ => out.push(c),
        }
    }
    out
}

fn is_exponent_marker(chars: &[char], i: usize) -> bool {
    let after_mantissa = i > 0 && (chars[i - 1].is_ascii_digit() || chars[i - 1] == '.');
    if !after_mantissa {
        return false;
    }
    chars.get(i + 1) == Some(&'+') && chars.get(i + 2).is_some_and(|c| c.is_ascii_digit())
}

/// Length in bytes of the numeric literal starting at `start`, if any.
///
/// Accepts `12`, `12.`, `12.5`, `.5` and an optional exponent (`1e5`,
/// `1.5e-3`). An `e` not followed by digits is not consumed.
fn scan_number(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start;
    let mut digits = 0;

    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
        digits += 1;
    }
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exponent_start = j;
        while bytes.get(j).is_some_and(u8::is_ascii_digit) {
            j += 1;
        }
        if j > exponent_start {
            i = j;
        }
    }

    Some(i - start)
}

/// Tokenize canonical arithmetic text
pub fn tokenize(canonical: &str) -> Result<Vec<Token>> {
    let bytes = canonical.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let token = match bytes[i] {
            b' ' | b'\t' | b'\n' | b'\r' => {
                i += 1;
                continue;
            },
            b'0'..=b'9' | b'.' => {
                let len = scan_number(bytes, i)
                    .ok_or_else(|| CalcError::parse(format!("Invalid number at position {}", i)))?;
                let literal = &canonical[i..i + len];
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| CalcError::parse(format!("Invalid number '{}'", literal)))?;
                i += len;
                tokens.push(Token::Number(value));
                continue;
            },
            b'*' if bytes.get(i + 1) == Some(&b'*') => {
                i += 1;
                Token::Power
            },
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' => Token::Star,
            b'/' => Token::Slash,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            _ => {
                let unexpected = canonical[i..].chars().next().unwrap_or('?');
                return Err(CalcError::parse(format!(
                    "Unexpected character '{}'",
                    unexpected
                )));
            },
        };
        tokens.push(token);
        i += 1;
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Evaluate the whole token stream. IEEE-754 semantics throughout;
    /// a division by zero surfaces as a non-finite value for the caller.
    fn evaluate(mut self) -> Result<f64> {
        if self.tokens.is_empty() {
            return Err(CalcError::parse("Empty expression"));
        }
        let value = self.parse_expression(0)?;
        match self.peek() {
            None => Ok(value),
            Some(Token::RParen) => Err(CalcError::parse("Unmatched closing parenthesis")),
            Some(token) => Err(CalcError::parse(format!(
                "Unexpected token '{}' at position {}",
                token, self.position
            ))),
        }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.position).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        self.position += 1;
        token
    }

    fn parse_expression(&mut self, depth: usize) -> Result<f64> {
        let mut value = self.parse_term(depth)?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.position += 1;
                    value += self.parse_term(depth)?;
                },
                Some(Token::Minus) => {
                    self.position += 1;
                    value -= self.parse_term(depth)?;
                },
                _ => return Ok(value),
            }
        }
    }

    fn parse_term(&mut self, depth: usize) -> Result<f64> {
        let mut value = self.parse_unary(depth)?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.position += 1;
                    value *= self.parse_unary(depth)?;
                },
                Some(Token::Slash) => {
                    self.position += 1;
                    value /= self.parse_unary(depth)?;
                },
                _ => return Ok(value),
            }
        }
    }

    fn parse_unary(&mut self, depth: usize) -> Result<f64> {
        if depth > MAX_DEPTH {
            return Err(CalcError::parse(format!(
                "Expression nesting is too deep (maximum {})",
                MAX_DEPTH
            )));
        }
        match self.peek() {
            Some(Token::Minus) => {
                self.position += 1;
                Ok(-self.parse_unary(depth + 1)?)
            },
            Some(Token::Plus) => {
                self.position += 1;
                self.parse_unary(depth + 1)
            },
            _ => self.parse_power(depth),
        }
    }

    fn parse_power(&mut self, depth: usize) -> Result<f64> {
        let base = self.parse_atom(depth)?;
        if self.peek() == Some(Token::Power) {
            self.position += 1;
            let exponent = self.parse_unary(depth + 1)?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn parse_atom(&mut self, depth: usize) -> Result<f64> {
        match self.advance() {
            Some(Token::Number(value)) => Ok(value),
            Some(Token::LParen) => {
                let inner = self.parse_expression(depth + 1)?;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(CalcError::parse("Missing closing parenthesis")),
                }
            },
            Some(token) => Err(CalcError::parse(format!(
                "Unexpected token '{}' at position {}",
                token,
                self.position - 1
            ))),
            None => Err(CalcError::parse("Unexpected end of expression")),
        }
    }
}

/// Evaluate a display-layer expression to a raw finite value
pub fn evaluate_raw(expression: &str) -> Result<f64> {
    let canonical = normalize(expression)?;
    let tokens = tokenize(&canonical)?;
    let value = Parser::new(&tokens).evaluate()?;
    if !value.is_finite() {
        return Err(CalcError::evaluation("Invalid operation"));
    }
    Ok(value)
}

/// Evaluate a display-layer expression and format the result for display
pub fn evaluate(expression: &str) -> Result<String> {
    let value = evaluate_raw(expression)?;
    let formatted = format_result(value);
    debug!(expression, value, result = %formatted, "evaluated");
    Ok(formatted)
}

/// Leading numeric value of a display string, ignoring trailing text
/// (`"12.5+3"` → `12.5`, `"-4"` → `-4`, `"Error"` → `None`).
pub fn leading_number(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let sign_len = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let len = scan_number(bytes, sign_len)?;
    trimmed[..sign_len + len].parse().ok()
}
