//! Allow-list arithmetic evaluator.
//!
//! Expressions arrive from an untrusted classifier, so this module owns the
//! whole pipeline: a tokenizer, a recursive-descent parser producing a
//! closed AST, and an evaluator that dispatches each operator through an
//! explicit table. The AST has exactly three node kinds; anything else the
//! tokenizer can recognize (names, strings, comparisons, attribute or index
//! access) is rejected during parsing and never reaches evaluation.
//!
//! Precedence, tightest first: parentheses, unary `+`/`-`, `**`
//! (right-associative), `*` `/` `//` `%`, then `+` `-`.

use crate::core::config::EvaluatorConfig;
use crate::math::number::Number;
use std::fmt;
use thiserror::Error;

/// Binary operators supported in expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Neg,
}

/// Expression AST node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal (e.g., 42 or 3.5)
    Number(Number),
    /// A binary operation (e.g., left + right)
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// A unary operation (e.g., -x)
    Unary { op: UnaryOp, operand: Box<Expr> },
}

/// Error type for expression parsing and evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    #[error("Unsupported construct: {0}")]
    UnsupportedConstruct(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Result out of range")]
    Overflow,

    #[error("Exponent must be a whole number")]
    NonIntegerExponent,
}

type EvalResult = Result<Number, EvalError>;
type BinaryFn = fn(Number, Number) -> EvalResult;
type UnaryFn = fn(Number) -> EvalResult;

impl BinaryOp {
    /// Dispatch table from operator tag to implementation
    pub fn function(self) -> BinaryFn {
        match self {
            BinaryOp::Add => add,
            BinaryOp::Sub => sub,
            BinaryOp::Mul => mul,
            BinaryOp::Div => true_div,
            BinaryOp::FloorDiv => floor_div,
            BinaryOp::Mod => modulo,
            BinaryOp::Pow => power,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
        }
    }
}

impl UnaryOp {
    pub fn function(self) -> UnaryFn {
        match self {
            UnaryOp::Plus => positive,
            UnaryOp::Neg => negate,
        }
    }
}

impl Expr {
    /// Parse with the default evaluator limits
    pub fn parse(input: &str) -> Result<Expr, EvalError> {
        Self::parse_with(input, &EvaluatorConfig::default())
    }

    /// Parse with explicit length and nesting limits
    pub fn parse_with(input: &str, limits: &EvaluatorConfig) -> Result<Expr, EvalError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(EvalError::InvalidExpression("empty expression".into()));
        }
        if trimmed.len() > limits.max_expression_len {
            return Err(EvalError::InvalidExpression(format!(
                "expression longer than {} bytes",
                limits.max_expression_len
            )));
        }

        let tokens = tokenize(trimmed)?;
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
            max_depth: limits.max_nesting_depth,
        };
        let expr = parser.parse_sum()?;
        parser.expect_end()?;
        Ok(expr)
    }

    /// Evaluate the expression tree
    ///
    /// Every node kind is matched explicitly; there is no fallback arm.
    pub fn evaluate(&self) -> EvalResult {
        match self {
            Expr::Number(n) => Ok(*n),
            Expr::Unary { op, operand } => {
                let value = operand.evaluate()?;
                (op.function())(value)
            }
            Expr::Binary { op, left, right } => {
                let l = left.evaluate()?;
                let r = right.evaluate()?;
                (op.function())(l, r)
            }
        }
    }

    fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn unary(op: UnaryOp, operand: Expr) -> Expr {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }
}

/// Fully parenthesized rendering, used in logs
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Unary { op, operand } => {
                let sign = match op {
                    UnaryOp::Plus => "+",
                    UnaryOp::Neg => "-",
                };
                write!(f, "{}{}", sign, operand)
            }
            Expr::Binary { op, left, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
        }
    }
}

/// Safe arithmetic evaluator with fixed resource limits
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    limits: EvaluatorConfig,
}

impl Evaluator {
    pub fn new(limits: EvaluatorConfig) -> Self {
        Self { limits }
    }

    pub fn parse(&self, input: &str) -> Result<Expr, EvalError> {
        Expr::parse_with(input, &self.limits)
    }

    pub fn evaluate(&self, input: &str) -> EvalResult {
        self.parse(input)?.evaluate()
    }
}

/// Parse and evaluate an expression string with default limits
pub fn evaluate(input: &str) -> EvalResult {
    Evaluator::default().evaluate(input)
}

// ============================================================================
// Tokenizer
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(Number),
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,
    LParen,
    RParen,
    /// Recognizable syntax outside the allow-list
    Foreign(Foreign),
}

#[derive(Debug, Clone, PartialEq)]
enum Foreign {
    Name(String),
    Str,
    Symbol(String),
}

fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || (c == '.' && next.is_some_and(|n| n.is_ascii_digit())) {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            let mut is_real = false;
            if i < chars.len() && chars[i] == '.' {
                is_real = true;
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }
            let text: String = chars[start..i].iter().collect();
            tokens.push(Token::Number(parse_literal(&text, is_real)?));
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let name: String = chars[start..i].iter().collect();
            tokens.push(Token::Foreign(Foreign::Name(name)));
            continue;
        }

        if c == '\'' || c == '"' {
            let close = chars[i + 1..]
                .iter()
                .position(|&ch| ch == c)
                .ok_or_else(|| EvalError::InvalidExpression("unterminated string".into()))?;
            i += close + 2;
            tokens.push(Token::Foreign(Foreign::Str));
            continue;
        }

        let (token, width) = match (c, next) {
            ('*', Some('*')) => (Token::DoubleStar, 2),
            ('/', Some('/')) => (Token::DoubleSlash, 2),
            ('+', _) => (Token::Plus, 1),
            ('-', _) => (Token::Minus, 1),
            ('*', _) => (Token::Star, 1),
            ('/', _) => (Token::Slash, 1),
            ('%', _) => (Token::Percent, 1),
            ('(', _) => (Token::LParen, 1),
            (')', _) => (Token::RParen, 1),
            ('<' | '>' | '=' | '!', Some('=')) => (symbol(&[c, '=']), 2),
            ('<', Some('<')) | ('>', Some('>')) => (symbol(&[c, c]), 2),
            ('<' | '>' | '=' | '.' | ',' | '[' | ']' | '{' | '}' | ':' | '&' | '|' | '^'
            | '~' | '@', _) => (symbol(&[c]), 1),
            _ => {
                return Err(EvalError::InvalidExpression(format!(
                    "unexpected character '{}'",
                    c
                )))
            }
        };
        tokens.push(token);
        i += width;
    }

    Ok(tokens)
}

fn symbol(chars: &[char]) -> Token {
    Token::Foreign(Foreign::Symbol(chars.iter().collect()))
}

fn parse_literal(text: &str, is_real: bool) -> EvalResult {
    if is_real {
        text.parse::<f64>()
            .map(Number::Real)
            .map_err(|_| EvalError::InvalidExpression(format!("bad number '{}'", text)))
    } else {
        // Digits only, so the sole failure mode is exceeding i64
        text.parse::<i64>()
            .map(Number::Int)
            .map_err(|_| EvalError::Overflow)
    }
}

fn describe(foreign: &Foreign, followed_by_paren: bool) -> String {
    match foreign {
        Foreign::Name(name) if followed_by_paren => format!("function call `{}(...)`", name),
        Foreign::Name(name) if name == "True" || name == "False" => {
            format!("boolean literal `{}`", name)
        }
        Foreign::Name(name) => format!("name `{}`", name),
        Foreign::Str => "string literal".into(),
        Foreign::Symbol(s) => match s.as_str() {
            "<" | ">" | "<=" | ">=" | "==" | "!=" => format!("comparison `{}`", s),
            "=" => "assignment".into(),
            "." => "attribute access".into(),
            "[" | "]" => "index access".into(),
            "," => "tuple".into(),
            other => format!("operator `{}`", other),
        },
    }
}

// ============================================================================
// Parser
// ============================================================================

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn enter(&mut self) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(EvalError::InvalidExpression(format!(
                "nesting deeper than {}",
                self.max_depth
            )));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn unsupported_here(&self, foreign: &Foreign) -> EvalError {
        let followed_by_paren = matches!(self.tokens.get(self.pos + 1), Some(Token::LParen));
        EvalError::UnsupportedConstruct(describe(foreign, followed_by_paren))
    }

    /// sum := term (('+' | '-') term)*
    fn parse_sum(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_term()?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    /// term := power (('*' | '/' | '//' | '%') power)*
    fn parse_term(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.parse_power()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::DoubleSlash) => BinaryOp::FloorDiv,
                Some(Token::Percent) => BinaryOp::Mod,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_power()?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    /// power := unary ('**' power)?
    fn parse_power(&mut self) -> Result<Expr, EvalError> {
        let base = self.parse_unary()?;
        if matches!(self.peek(), Some(Token::DoubleStar)) {
            self.pos += 1;
            self.enter()?;
            let exponent = self.parse_power()?;
            self.leave();
            return Ok(Expr::binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    /// unary := ('+' | '-') unary | atom
    fn parse_unary(&mut self) -> Result<Expr, EvalError> {
        let op = match self.peek() {
            Some(Token::Plus) => UnaryOp::Plus,
            Some(Token::Minus) => UnaryOp::Neg,
            _ => return self.parse_atom(),
        };
        self.pos += 1;
        self.enter()?;
        let operand = self.parse_unary()?;
        self.leave();
        Ok(Expr::unary(op, operand))
    }

    /// atom := number | '(' sum ')'
    fn parse_atom(&mut self) -> Result<Expr, EvalError> {
        if let Some(Token::Foreign(foreign)) = self.peek() {
            return Err(self.unsupported_here(foreign));
        }

        match self.advance() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::LParen) => {
                self.enter()?;
                let inner = self.parse_sum()?;
                self.leave();
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    Some(Token::Foreign(foreign)) => {
                        self.pos -= 1;
                        Err(self.unsupported_here(&foreign))
                    }
                    _ => Err(EvalError::InvalidExpression("missing ')'".into())),
                }
            }
            Some(token) => Err(EvalError::InvalidExpression(format!(
                "unexpected {:?}",
                token
            ))),
            None => Err(EvalError::InvalidExpression(
                "unexpected end of expression".into(),
            )),
        }
    }

    fn expect_end(&self) -> Result<(), EvalError> {
        match self.peek() {
            None => Ok(()),
            Some(Token::Foreign(foreign)) => Err(self.unsupported_here(foreign)),
            Some(Token::RParen) => Err(EvalError::InvalidExpression("unbalanced ')'".into())),
            Some(token) => Err(EvalError::InvalidExpression(format!(
                "unexpected {:?} after expression",
                token
            ))),
        }
    }
}

// ============================================================================
// Operator implementations
// ============================================================================

fn real(value: f64) -> EvalResult {
    if value.is_finite() {
        Ok(Number::Real(value))
    } else {
        Err(EvalError::Overflow)
    }
}

fn add(a: Number, b: Number) -> EvalResult {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x.checked_add(y).map(Number::Int).ok_or(EvalError::Overflow),
        _ => real(a.as_f64() + b.as_f64()),
    }
}

fn sub(a: Number, b: Number) -> EvalResult {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x.checked_sub(y).map(Number::Int).ok_or(EvalError::Overflow),
        _ => real(a.as_f64() - b.as_f64()),
    }
}

fn mul(a: Number, b: Number) -> EvalResult {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x.checked_mul(y).map(Number::Int).ok_or(EvalError::Overflow),
        _ => real(a.as_f64() * b.as_f64()),
    }
}

/// `/` always yields a real
fn true_div(a: Number, b: Number) -> EvalResult {
    if b.is_zero() {
        return Err(EvalError::DivisionByZero);
    }
    real(a.as_f64() / b.as_f64())
}

/// `//` rounds toward negative infinity
fn floor_div(a: Number, b: Number) -> EvalResult {
    if b.is_zero() {
        return Err(EvalError::DivisionByZero);
    }
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => {
            let q = x.checked_div(y).ok_or(EvalError::Overflow)?;
            if x % y != 0 && ((x < 0) != (y < 0)) {
                Ok(Number::Int(q - 1))
            } else {
                Ok(Number::Int(q))
            }
        }
        _ => real(float_divmod(a.as_f64(), b.as_f64()).0),
    }
}

/// `%` takes the sign of the divisor
fn modulo(a: Number, b: Number) -> EvalResult {
    if b.is_zero() {
        return Err(EvalError::DivisionByZero);
    }
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => {
            let r = x.wrapping_rem(y);
            if r != 0 && ((r < 0) != (y < 0)) {
                Ok(Number::Int(r + y))
            } else {
                Ok(Number::Int(r))
            }
        }
        _ => real(float_divmod(a.as_f64(), b.as_f64()).1),
    }
}

/// Floored quotient and remainder of two reals, `y` nonzero
///
/// The quotient is derived from the remainder rather than from `x / y`,
/// so `q * y + r` stays close to `x` even when `x / y` rounds up to a
/// whole number (`1 // 0.1` is 9, not 10).
fn float_divmod(x: f64, y: f64) -> (f64, f64) {
    let mut r = x % y;
    let mut q = (x - r) / y;
    if r != 0.0 {
        if (y < 0.0) != (r < 0.0) {
            r += y;
            q -= 1.0;
        }
    } else {
        r = 0.0_f64.copysign(y);
    }

    let floored = if q != 0.0 {
        let f = q.floor();
        if q - f > 0.5 {
            f + 1.0
        } else {
            f
        }
    } else {
        0.0_f64.copysign(x / y)
    };
    (floored, r)
}

fn power(a: Number, b: Number) -> EvalResult {
    let exponent = b.as_exact_i64().ok_or(EvalError::NonIntegerExponent)?;

    match (a, b) {
        (Number::Int(base), Number::Int(_)) if exponent >= 0 => int_pow(base, exponent),
        _ => {
            if a.is_zero() && exponent < 0 {
                return Err(EvalError::DivisionByZero);
            }
            real(a.as_f64().powf(exponent as f64))
        }
    }
}

fn int_pow(base: i64, exponent: i64) -> EvalResult {
    let value = match base {
        0 if exponent == 0 => 1,
        0 => 0,
        1 => 1,
        -1 if exponent % 2 == 0 => 1,
        -1 => -1,
        _ => u32::try_from(exponent)
            .ok()
            .and_then(|e| base.checked_pow(e))
            .ok_or(EvalError::Overflow)?,
    };
    Ok(Number::Int(value))
}

fn positive(a: Number) -> EvalResult {
    Ok(a)
}

fn negate(a: Number) -> EvalResult {
    match a {
        Number::Int(x) => x.checked_neg().map(Number::Int).ok_or(EvalError::Overflow),
        Number::Real(x) => Ok(Number::Real(-x)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(v: i64) -> Expr {
        Expr::Number(Number::Int(v))
    }

    #[test]
    fn test_literal_parsing() {
        assert_eq!(Expr::parse("42").unwrap(), lit(42));
        assert_eq!(Expr::parse("42.5").unwrap(), Expr::Number(Number::Real(42.5)));
        assert_eq!(Expr::parse(".5").unwrap(), Expr::Number(Number::Real(0.5)));
        assert_eq!(Expr::parse("5.").unwrap(), Expr::Number(Number::Real(5.0)));
    }

    #[test]
    fn test_operator_precedence_mul_over_add() {
        // 2 + 3 * 4 should parse as 2 + (3 * 4)
        match Expr::parse("2 + 3 * 4").unwrap() {
            Expr::Binary {
                op: BinaryOp::Add,
                left,
                right,
            } => {
                assert_eq!(*left, lit(2));
                assert_eq!(*right, Expr::binary(BinaryOp::Mul, lit(3), lit(4)));
            }
            other => panic!("Expected Binary Add, got {:?}", other),
        }
    }

    #[test]
    fn test_parentheses_override_precedence() {
        match Expr::parse("(2 + 3) * 4").unwrap() {
            Expr::Binary {
                op: BinaryOp::Mul,
                left,
                right,
            } => {
                assert_eq!(*left, Expr::binary(BinaryOp::Add, lit(2), lit(3)));
                assert_eq!(*right, lit(4));
            }
            other => panic!("Expected Binary Mul, got {:?}", other),
        }
    }

    #[test]
    fn test_power_is_right_associative() {
        let expected = Expr::binary(
            BinaryOp::Pow,
            lit(2),
            Expr::binary(BinaryOp::Pow, lit(3), lit(2)),
        );
        assert_eq!(Expr::parse("2 ** 3 ** 2").unwrap(), expected);
        assert_eq!(evaluate("2 ** 3 ** 2"), Ok(Number::Int(512)));
    }

    #[test]
    fn test_unary_binds_tighter_than_power() {
        let expected = Expr::binary(BinaryOp::Pow, Expr::unary(UnaryOp::Neg, lit(2)), lit(2));
        assert_eq!(Expr::parse("-2 ** 2").unwrap(), expected);
        assert_eq!(evaluate("-2 ** 2"), Ok(Number::Int(4)));
        assert_eq!(evaluate("2 ** -1"), Ok(Number::Real(0.5)));
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        assert_eq!(evaluate("10 - 4 - 3"), Ok(Number::Int(3)));
        assert_eq!(evaluate("100 / 10 / 5"), Ok(Number::Real(2.0)));
    }

    #[test]
    fn test_basic_arithmetic() {
        assert_eq!(evaluate("2 + 2"), Ok(Number::Int(4)));
        assert_eq!(evaluate("900 + 500 / 2"), Ok(Number::Real(1150.0)));
        assert_eq!(evaluate("12 * 3 - 4"), Ok(Number::Int(32)));
        assert_eq!(evaluate("--3"), Ok(Number::Int(3)));
        assert_eq!(evaluate("+7"), Ok(Number::Int(7)));
    }

    #[test]
    fn test_floor_division_and_modulo_follow_floor_convention() {
        assert_eq!(evaluate("7 // 2"), Ok(Number::Int(3)));
        assert_eq!(evaluate("-7 // 2"), Ok(Number::Int(-4)));
        assert_eq!(evaluate("7 // -2"), Ok(Number::Int(-4)));
        assert_eq!(evaluate("7 % 3"), Ok(Number::Int(1)));
        assert_eq!(evaluate("-7 % 3"), Ok(Number::Int(2)));
        assert_eq!(evaluate("7 % -3"), Ok(Number::Int(-2)));
        assert_eq!(evaluate("7.5 // 2"), Ok(Number::Real(3.0)));
        assert_eq!(evaluate("-1.5 % 1"), Ok(Number::Real(0.5)));
    }

    #[test]
    fn test_real_floor_division_agrees_with_modulo() {
        assert_eq!(evaluate("1 // 0.1"), Ok(Number::Real(9.0)));
        assert_eq!(evaluate("-1 // 0.1"), Ok(Number::Real(-10.0)));
        assert_eq!(evaluate("-7.5 // 2"), Ok(Number::Real(-4.0)));
        assert_eq!(evaluate("7.5 // -2"), Ok(Number::Real(-4.0)));

        for (a, b) in [(1.0, 0.1), (-1.0, 0.1), (7.5, -2.0), (0.3, 0.1), (10.0, 0.7), (-5.25, 1.5)] {
            let q = evaluate(&format!("{} // ({})", a, b)).unwrap().as_f64();
            let r = evaluate(&format!("{} % ({})", a, b)).unwrap().as_f64();
            assert_eq!(q.fract(), 0.0, "{} // {} is not whole", a, b);
            assert!((q * b + r - a).abs() < 1e-9, "{} // {} = {}, remainder {}", a, b, q, r);
        }
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(evaluate("5 / 0"), Err(EvalError::DivisionByZero));
        assert_eq!(evaluate("5 // 0"), Err(EvalError::DivisionByZero));
        assert_eq!(evaluate("5 % 0.0"), Err(EvalError::DivisionByZero));
        assert_eq!(evaluate("0 ** -1"), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_power_rules() {
        assert_eq!(evaluate("2 ** 10"), Ok(Number::Int(1024)));
        assert_eq!(evaluate("2 ** 2.0"), Ok(Number::Real(4.0)));
        assert_eq!(evaluate("1 ** 99999999999"), Ok(Number::Int(1)));
        assert_eq!(evaluate("2 ** 0.5"), Err(EvalError::NonIntegerExponent));
        assert_eq!(evaluate("10 ** 100"), Err(EvalError::Overflow));
    }

    #[test]
    fn test_integer_overflow_is_reported() {
        assert_eq!(evaluate("9223372036854775807 + 1"), Err(EvalError::Overflow));
        assert_eq!(evaluate("99999999999999999999"), Err(EvalError::Overflow));
    }

    #[test]
    fn test_names_and_calls_are_unsupported() {
        assert!(matches!(
            evaluate("__import__('os')"),
            Err(EvalError::UnsupportedConstruct(msg)) if msg.contains("function call")
        ));
        assert!(matches!(
            evaluate("x + 1"),
            Err(EvalError::UnsupportedConstruct(msg)) if msg.contains("name `x`")
        ));
        assert!(matches!(
            evaluate("True"),
            Err(EvalError::UnsupportedConstruct(msg)) if msg.contains("boolean")
        ));
    }

    #[test]
    fn test_comparisons_and_assignment_are_unsupported() {
        assert!(matches!(
            evaluate("1 < 2"),
            Err(EvalError::UnsupportedConstruct(msg)) if msg.contains("comparison")
        ));
        assert!(matches!(
            evaluate("1 == 1"),
            Err(EvalError::UnsupportedConstruct(_))
        ));
        assert!(matches!(
            evaluate("(1 = 2)"),
            Err(EvalError::UnsupportedConstruct(msg)) if msg == "assignment"
        ));
        assert!(matches!(
            evaluate("1 & 2"),
            Err(EvalError::UnsupportedConstruct(_))
        ));
    }

    #[test]
    fn test_malformed_input_is_invalid() {
        for input in ["", "   ", "1 +", "(1 + 2", "1 + 2)", "1 2", "* 3", "5 $ 3", "()"] {
            assert!(
                matches!(evaluate(input), Err(EvalError::InvalidExpression(_))),
                "expected InvalidExpression for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_length_limit() {
        let evaluator = Evaluator::new(EvaluatorConfig {
            max_expression_len: 8,
            max_nesting_depth: 64,
        });
        assert_eq!(evaluator.evaluate("1 + 2"), Ok(Number::Int(3)));
        assert_eq!(
            evaluator.evaluate("1 + 2 + 3 + 4"),
            Err(EvalError::InvalidExpression(
                "expression longer than 8 bytes".into()
            ))
        );
        // Limit counts bytes, so multi-byte characters use it up faster
        assert_eq!(
            evaluator.evaluate("1 + ２２２"),
            Err(EvalError::InvalidExpression(
                "expression longer than 8 bytes".into()
            ))
        );
    }

    #[test]
    fn test_nesting_limit() {
        let evaluator = Evaluator::new(EvaluatorConfig {
            max_expression_len: 1024,
            max_nesting_depth: 4,
        });
        assert_eq!(evaluator.evaluate("((((1))))"), Ok(Number::Int(1)));
        assert!(matches!(
            evaluator.evaluate("(((((1)))))"),
            Err(EvalError::InvalidExpression(_))
        ));
        assert!(matches!(
            evaluator.evaluate("------1"),
            Err(EvalError::InvalidExpression(_))
        ));
    }

    #[test]
    fn test_whitespace_handling() {
        assert_eq!(evaluate("  12   *(3 -  1) "), Ok(Number::Int(24)));
    }

    #[test]
    fn test_display_is_fully_parenthesized() {
        let expr = Expr::parse("900 + 500 / -2").unwrap();
        assert_eq!(expr.to_string(), "(900 + (500 / -2))");
    }

    #[test]
    fn test_eval_error_display() {
        assert_eq!(EvalError::DivisionByZero.to_string(), "Division by zero");
        assert_eq!(
            EvalError::UnsupportedConstruct("name `x`".into()).to_string(),
            "Unsupported construct: name `x`"
        );
    }
}
