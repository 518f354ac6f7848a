//! Formula tokenizing and parsing.
//!
//! A formula is infix arithmetic over floating-point literals and cell names:
//! `A1 * (B2 + 3.5) / 2`. Parsing validates the token sequence, normalizes
//! cell names, and reorders the tokens into postfix form with the
//! shunting-yard algorithm so [`Formula::evaluate`] can run over a flat
//! operand stack. No step recurses, so formula length and nesting depth are
//! bounded only by memory.
//!
//! The leading `=` that marks formula input is not part of the formula text.

use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Reasons a formula fails to parse.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("formula is empty")]
    Empty,

    #[error("unknown token '{0}'")]
    UnknownToken(String),

    #[error("')' at token {0} has no matching '('")]
    UnmatchedClose(usize),

    #[error("formula has an unclosed '('")]
    UnclosedParen,

    #[error("formula cannot start with '{0}'")]
    InvalidStart(String),

    #[error("'{found}' cannot follow '{after}'")]
    InvalidSequence { after: String, found: String },

    #[error("formula cannot end with '{0}'")]
    InvalidEnd(String),

    #[error("invalid cell reference '{0}'")]
    InvalidReference(String),
}

/// Binary arithmetic operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl Op {
    /// Binding strength; `*` and `/` bind tighter than `+` and `-`.
    fn precedence(self) -> u8 {
        match self {
            Op::Add | Op::Sub => 1,
            Op::Mul | Op::Div => 2,
        }
    }

    fn from_char(c: char) -> Option<Op> {
        match c {
            '+' => Some(Op::Add),
            '-' => Some(Op::Sub),
            '*' => Some(Op::Mul),
            '/' => Some(Op::Div),
            _ => None,
        }
    }

    fn symbol(self) -> char {
        match self {
            Op::Add => '+',
            Op::Sub => '-',
            Op::Mul => '*',
            Op::Div => '/',
        }
    }
}

/// A single formula token. Cell names are stored normalized.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    LParen,
    RParen,
    Op(Op),
    Number(f64),
    Cell(String),
}

impl Token {
    /// Numbers, cell names and `)` end an operand.
    fn closes_operand(&self) -> bool {
        matches!(self, Token::Number(_) | Token::Cell(_) | Token::RParen)
    }

    /// Numbers, cell names and `(` start an operand.
    fn opens_operand(&self) -> bool {
        matches!(self, Token::Number(_) | Token::Cell(_) | Token::LParen)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Op(op) => write!(f, "{}", op.symbol()),
            Token::Number(n) => write!(f, "{}", n),
            Token::Cell(name) => write!(f, "{}", name),
        }
    }
}

/// A parsed formula.
#[derive(Clone, Debug, PartialEq)]
pub struct Formula {
    tokens: Vec<Token>,
    /// Operands and operators in postfix order, parentheses removed.
    pub(crate) postfix: Vec<Token>,
}

fn token_re() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| {
        Regex::new(
            r"^(?:(?<lparen>\()|(?<rparen>\))|(?<op>[+\-*/])|(?<cell>[A-Za-z]+[0-9]+)|(?<num>(?:[0-9]+\.[0-9]*|[0-9]*\.[0-9]+|[0-9]+)(?:[eE][+-]?[0-9]+)?))",
        )
        .expect("formula token regex must compile")
    })
}

/// Split formula text into raw tokens. Cell names keep their original case.
fn tokenize(text: &str) -> Result<Vec<Token>, FormatError> {
    let mut tokens = Vec::new();
    let mut rest = text.trim_start();

    while !rest.is_empty() {
        let Some(caps) = token_re().captures(rest) else {
            let end = rest
                .find(|c: char| c.is_whitespace() || "()+-*/".contains(c))
                .filter(|&i| i > 0)
                .unwrap_or(rest.len());
            return Err(FormatError::UnknownToken(rest[..end].to_string()));
        };

        let token = if caps.name("lparen").is_some() {
            Token::LParen
        } else if caps.name("rparen").is_some() {
            Token::RParen
        } else if let Some(m) = caps.name("op") {
            match m.as_str().chars().next().and_then(Op::from_char) {
                Some(op) => Token::Op(op),
                None => return Err(FormatError::UnknownToken(m.as_str().to_string())),
            }
        } else if let Some(m) = caps.name("cell") {
            Token::Cell(m.as_str().to_string())
        } else if let Some(m) = caps.name("num") {
            let n = m
                .as_str()
                .parse::<f64>()
                .map_err(|_| FormatError::UnknownToken(m.as_str().to_string()))?;
            Token::Number(n)
        } else {
            return Err(FormatError::UnknownToken(caps[0].to_string()));
        };

        let consumed = caps[0].len();
        tokens.push(token);
        rest = rest[consumed..].trim_start();
    }

    Ok(tokens)
}

/// Check operand/operator alternation and parenthesis balance.
fn validate(tokens: &[Token]) -> Result<(), FormatError> {
    let Some(first) = tokens.first() else {
        return Err(FormatError::Empty);
    };
    if !first.opens_operand() {
        return Err(FormatError::InvalidStart(first.to_string()));
    }

    let mut depth = 0usize;
    let mut prev: Option<&Token> = None;
    for (idx, token) in tokens.iter().enumerate() {
        if let Some(prev) = prev {
            let allowed = if prev.closes_operand() {
                matches!(token, Token::Op(_) | Token::RParen)
            } else {
                token.opens_operand()
            };
            if !allowed {
                return Err(FormatError::InvalidSequence {
                    after: prev.to_string(),
                    found: token.to_string(),
                });
            }
        }

        match token {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(FormatError::UnmatchedClose(idx + 1))?;
            }
            _ => {}
        }
        prev = Some(token);
    }

    if let Some(last) = tokens.last()
        && !last.closes_operand()
    {
        return Err(FormatError::InvalidEnd(last.to_string()));
    }
    if depth != 0 {
        return Err(FormatError::UnclosedParen);
    }
    Ok(())
}

/// Reorder a validated token sequence into postfix form.
///
/// Operators of equal precedence pop each other, which makes them left
/// associative. Operand order is preserved, so evaluating the postfix
/// sequence reads cells left to right.
fn to_postfix(tokens: &[Token]) -> Result<Vec<Token>, FormatError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut pending: Vec<&Token> = Vec::new();

    for (idx, token) in tokens.iter().enumerate() {
        match token {
            Token::Number(_) | Token::Cell(_) => output.push(token.clone()),
            Token::Op(op) => {
                while let Some(Token::Op(top)) = pending.last() {
                    if top.precedence() < op.precedence() {
                        break;
                    }
                    output.push(Token::Op(*top));
                    pending.pop();
                }
                pending.push(token);
            }
            Token::LParen => pending.push(token),
            Token::RParen => loop {
                match pending.pop() {
                    Some(Token::LParen) => break,
                    Some(op) => output.push(op.clone()),
                    None => return Err(FormatError::UnmatchedClose(idx + 1)),
                }
            },
        }
    }

    while let Some(token) = pending.pop() {
        if matches!(token, Token::LParen) {
            return Err(FormatError::UnclosedParen);
        }
        output.push(token.clone());
    }
    Ok(output)
}

impl Formula {
    /// Parse formula text, uppercasing cell names and accepting any of them.
    pub fn parse(text: &str) -> Result<Formula, FormatError> {
        Self::parse_with(text, |name| name.to_ascii_uppercase(), |_| true)
    }

    /// Parse formula text, passing every cell name through `normalize` and
    /// then rejecting names for which `is_valid` returns false.
    pub fn parse_with<N, V>(text: &str, normalize: N, is_valid: V) -> Result<Formula, FormatError>
    where
        N: Fn(&str) -> String,
        V: Fn(&str) -> bool,
    {
        let mut tokens = tokenize(text)?;
        validate(&tokens)?;

        for token in tokens.iter_mut() {
            if let Token::Cell(name) = token {
                let normalized = normalize(name);
                if !is_valid(&normalized) {
                    return Err(FormatError::InvalidReference(name.clone()));
                }
                *name = normalized;
            }
        }

        let postfix = to_postfix(&tokens)?;
        Ok(Formula { tokens, postfix })
    }

    /// Normalized token sequence.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Distinct cell names this formula reads, normalized.
    pub fn referenced_cells(&self) -> BTreeSet<String> {
        self.tokens
            .iter()
            .filter_map(|token| match token {
                Token::Cell(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Formula {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::parse(s)
    }
}
