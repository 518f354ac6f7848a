//! Formula evaluation.
//!
//! Runs a parsed [`Formula`]'s postfix sequence over an operand stack with a
//! caller-supplied lookup for cell values. Evaluation never panics: faults
//! come back as [`EvalError`], which the spreadsheet stores as the cell's
//! value so it propagates to dependents.

use thiserror::Error;

use super::cell::Value;
use super::formula::{Formula, Op, Token};

/// Runtime formula faults.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("unknown cell {0}")]
    UnknownCell(String),

    #[error("cell {0} does not hold a number")]
    NotANumber(String),
}

impl Formula {
    /// Evaluate with `lookup` resolving cell names to their current values.
    ///
    /// Operands are evaluated left to right and the first error wins. An
    /// error-valued cell propagates its own error unchanged.
    pub fn evaluate<F>(&self, lookup: F) -> Result<f64, EvalError>
    where
        F: Fn(&str) -> Value,
    {
        let mut stack: Vec<f64> = Vec::new();
        for token in &self.postfix {
            match token {
                Token::Number(n) => stack.push(*n),
                Token::Cell(name) => stack.push(cell_number(name, &lookup)?),
                Token::Op(op) => {
                    // Parsing only produces balanced postfix, so both pops succeed.
                    let rhs = stack.pop().unwrap_or(f64::NAN);
                    let lhs = stack.pop().unwrap_or(f64::NAN);
                    stack.push(apply(*op, lhs, rhs)?);
                }
                Token::LParen | Token::RParen => {}
            }
        }
        Ok(stack.pop().unwrap_or(f64::NAN))
    }
}

fn cell_number<F>(name: &str, lookup: &F) -> Result<f64, EvalError>
where
    F: Fn(&str) -> Value,
{
    match lookup(name) {
        Value::Number(n) => Ok(n),
        Value::Text(_) => Err(EvalError::NotANumber(name.to_string())),
        Value::Error(e) => Err(e),
    }
}

fn apply(op: Op, lhs: f64, rhs: f64) -> Result<f64, EvalError> {
    match op {
        Op::Add => Ok(lhs + rhs),
        Op::Sub => Ok(lhs - rhs),
        Op::Mul => Ok(lhs * rhs),
        Op::Div if rhs == 0.0 => Err(EvalError::DivisionByZero),
        Op::Div => Ok(lhs / rhs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(text: &str) -> Result<f64, EvalError> {
        Formula::parse(text).unwrap().evaluate(|name| match name {
            "A1" => Value::Number(4.0),
            "B1" => Value::Number(0.0),
            "C1" => Value::Text("label".to_string()),
            "D1" => Value::Error(EvalError::DivisionByZero),
            other => Value::Error(EvalError::UnknownCell(other.to_string())),
        })
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("2 + 3 * 4"), Ok(14.0));
        assert_eq!(eval("(2 + 3) * 4"), Ok(20.0));
        assert_eq!(eval("10 - 4 / 2"), Ok(8.0));
    }

    #[test]
    fn test_left_associative() {
        assert_eq!(eval("10 - 3 - 2"), Ok(5.0));
        assert_eq!(eval("64 / 4 / 2"), Ok(8.0));
    }

    #[test]
    fn test_cell_lookup() {
        assert_eq!(eval("a1 * 2 + 1"), Ok(9.0));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval("1 / 0"), Err(EvalError::DivisionByZero));
        assert_eq!(eval("A1 / B1"), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_text_operand() {
        assert_eq!(
            eval("C1 + 1"),
            Err(EvalError::NotANumber("C1".to_string()))
        );
    }

    #[test]
    fn test_error_operand_propagates() {
        assert_eq!(eval("D1 + 1"), Err(EvalError::DivisionByZero));
        assert_eq!(
            eval("Z9 * 2"),
            Err(EvalError::UnknownCell("Z9".to_string()))
        );
    }

    #[test]
    fn test_mixed_precedence_and_grouping() {
        assert_eq!(eval("2 * 3 + 4 * 5 - 6 / 2"), Ok(23.0));
        assert_eq!(eval("2 * (3 + 4) * (5 - (6 - 1))"), Ok(0.0));
        assert_eq!(eval("100 / (2 * 5) / 5"), Ok(2.0));
    }

    #[test]
    fn test_long_flat_sum() {
        let text = vec!["1"; 50_000].join("+");
        assert_eq!(eval(&text), Ok(50_000.0));
    }

    #[test]
    fn test_deeply_nested_parentheses() {
        let depth = 50_000;
        let text = format!("{}A1{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(eval(&text), Ok(4.0));
    }

    #[test]
    fn test_division_by_zero_before_later_error() {
        assert_eq!(eval("1 / 0 + C1"), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_first_error_wins() {
        assert_eq!(
            eval("C1 + Z9"),
            Err(EvalError::NotANumber("C1".to_string()))
        );
    }
}
