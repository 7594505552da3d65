//! Sandboxed formula evaluation.
//!
//! Formula components are configured as small arithmetic expressions over
//! named values, e.g. `"40% of BASIC + 500"` or
//! `"(GROSS - HRA) / WORKING_DAYS"`. This module evaluates them with a
//! dedicated tokenizer and recursive-descent parser over `+ - * / ( ) %`
//! and numeric literals. The evaluator can never execute anything but
//! arithmetic: there is no host expression engine behind it, identifiers
//! resolve only against the table the caller supplies, and nesting depth
//! is bounded.

use std::collections::HashMap;

use rust_decimal::Decimal;
use thiserror::Error;

/// Maximum parenthesis nesting before evaluation is refused.
const MAX_DEPTH: u32 = 64;

/// Errors produced by formula tokenization, parsing or evaluation.
///
/// These never escape component evaluation: a faulty formula resolves the
/// component to zero and is logged as a warning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    /// A character outside the permitted alphabet was found.
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    /// A numeric literal could not be parsed.
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    /// An identifier is not present in the variable table.
    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),
    /// The expression ended where a value or operator was expected.
    #[error("unexpected end of formula")]
    UnexpectedEnd,
    /// A token appeared somewhere the grammar does not allow it.
    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),
    /// The divisor of a division evaluated to zero.
    #[error("division by zero")]
    DivisionByZero,
    /// An intermediate value exceeded the numeric range.
    #[error("arithmetic overflow")]
    Overflow,
    /// Parentheses nested beyond the supported depth.
    #[error("expression nested too deeply")]
    TooDeep,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(Decimal),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => n.to_string(),
            Token::Ident(name) => name.clone(),
            Token::Plus => "+".to_string(),
            Token::Minus => "-".to_string(),
            Token::Star => "*".to_string(),
            Token::Slash => "/".to_string(),
            Token::Percent => "%".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, FormulaError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                chars.next();
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '%' => {
                chars.next();
                tokens.push(Token::Percent);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        literal.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = literal
                    .parse::<Decimal>()
                    .map_err(|_| FormulaError::InvalidNumber(literal.clone()))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_alphanumeric() || d == '_' {
                        name.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(name));
            }
            other => return Err(FormulaError::UnexpectedChar(other)),
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    vars: &'a HashMap<String, Decimal>,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// expr := term { ('+' | '-') term }
    fn expr(&mut self, depth: u32) -> Result<Decimal, FormulaError> {
        let mut value = self.term(depth)?;
        while let Some(token) = self.peek() {
            match token {
                Token::Plus => {
                    self.next();
                    let rhs = self.term(depth)?;
                    value = value.checked_add(rhs).ok_or(FormulaError::Overflow)?;
                }
                Token::Minus => {
                    self.next();
                    let rhs = self.term(depth)?;
                    value = value.checked_sub(rhs).ok_or(FormulaError::Overflow)?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    /// term := postfix { ('*' | '/') postfix }
    fn term(&mut self, depth: u32) -> Result<Decimal, FormulaError> {
        let mut value = self.postfix(depth)?;
        while let Some(token) = self.peek() {
            match token {
                Token::Star => {
                    self.next();
                    let rhs = self.postfix(depth)?;
                    value = value.checked_mul(rhs).ok_or(FormulaError::Overflow)?;
                }
                Token::Slash => {
                    self.next();
                    let rhs = self.postfix(depth)?;
                    if rhs.is_zero() {
                        return Err(FormulaError::DivisionByZero);
                    }
                    value = value.checked_div(rhs).ok_or(FormulaError::Overflow)?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    /// postfix := primary [ '%' [ 'of' postfix ] ]
    ///
    /// `50%` evaluates to 0.5; `50% of X` evaluates to `(50/100) * X`.
    fn postfix(&mut self, depth: u32) -> Result<Decimal, FormulaError> {
        let value = self.primary(depth)?;
        if self.peek() == Some(&Token::Percent) {
            self.next();
            let fraction = value
                .checked_div(Decimal::ONE_HUNDRED)
                .ok_or(FormulaError::Overflow)?;
            if let Some(Token::Ident(name)) = self.peek() {
                if name.eq_ignore_ascii_case("of") {
                    self.next();
                    let operand = self.postfix(depth)?;
                    return fraction.checked_mul(operand).ok_or(FormulaError::Overflow);
                }
            }
            return Ok(fraction);
        }
        Ok(value)
    }

    /// primary := Number | Ident | '(' expr ')' | '-' postfix
    fn primary(&mut self, depth: u32) -> Result<Decimal, FormulaError> {
        if depth > MAX_DEPTH {
            return Err(FormulaError::TooDeep);
        }
        match self.next() {
            Some(Token::Number(value)) => Ok(value),
            Some(Token::Ident(name)) => self
                .vars
                .get(&name.to_ascii_uppercase())
                .copied()
                .ok_or(FormulaError::UnknownIdentifier(name)),
            Some(Token::LParen) => {
                let value = self.expr(depth + 1)?;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    Some(other) => Err(FormulaError::UnexpectedToken(other.describe())),
                    None => Err(FormulaError::UnexpectedEnd),
                }
            }
            Some(Token::Minus) => {
                let value = self.postfix(depth + 1)?;
                Ok(-value)
            }
            Some(other) => Err(FormulaError::UnexpectedToken(other.describe())),
            None => Err(FormulaError::UnexpectedEnd),
        }
    }
}

/// Evaluates a formula against a table of named values.
///
/// Identifiers are matched case-insensitively against upper-cased keys in
/// `vars`; the component engine populates the table with `BASIC`,
/// `BASIC_SALARY`, `GROSS`, `GROSS_SALARY`, `PRESENT_DAYS`,
/// `WORKING_DAYS` and every previously computed component code.
///
/// # Arguments
///
/// * `formula` - The formula text to evaluate
/// * `vars` - Named values available to the formula, keyed upper-case
///
/// # Returns
///
/// The computed value, or a [`FormulaError`] describing the first fault.
/// Evaluation never panics on any input.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::evaluate_formula;
/// use rust_decimal::Decimal;
/// use std::collections::HashMap;
///
/// let mut vars = HashMap::new();
/// vars.insert("BASIC".to_string(), Decimal::from(30000));
///
/// let value = evaluate_formula("40% of BASIC + 500", &vars).unwrap();
/// assert_eq!(value, Decimal::from(12500));
/// ```
pub fn evaluate_formula(
    formula: &str,
    vars: &HashMap<String, Decimal>,
) -> Result<Decimal, FormulaError> {
    let tokens = tokenize(formula)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        vars,
    };
    let value = parser.expr(0)?;
    match parser.next() {
        None => Ok(value),
        Some(other) => Err(FormulaError::UnexpectedToken(other.describe())),
    }
}
