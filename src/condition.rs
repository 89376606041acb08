//! The expression of an `if` marker.
//!
//! ```text
//! {{ if .Values.a }}                       single operand
//! {{ if not .Values.a }}                   prefix, exactly one operand
//! {{ if and .Values.a .Values.b ... }}     prefix, one or more operands
//! {{ if .Values.a or .Values.b }}          infix, exactly two operands
//! ```

use std::str::FromStr;

use crate::{
    context::{is_truthy, Resolve},
    error::{ConditionError, RenderError},
};

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Operator {
    And,
    Or,
    Not,
}

impl Operator {
    fn keyword(self) -> &'static str {
        match self {
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Condition {
    Single(String),
    Prefix {
        operator: Operator,
        operands: Vec<String>,
    },
    /// `operator` is only ever [`Operator::And`] or [`Operator::Or`]
    Infix {
        left: String,
        operator: Operator,
        right: String,
    },
}

enum Word<'a> {
    Operator(Operator),
    Operand(&'a str),
}

impl<'a> Word<'a> {
    fn new(word: &'a str) -> Self {
        match word {
            "and" => Word::Operator(Operator::And),
            "or" => Word::Operator(Operator::Or),
            "not" => Word::Operator(Operator::Not),
            operand => Word::Operand(operand),
        }
    }
}

impl FromStr for Condition {
    type Err = ConditionError;

    /// Parses the text after the `if` keyword. Operands are not validated here.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words: Vec<Word> = s.split_whitespace().map(Word::new).collect();

        match words.as_slice() {
            [Word::Operand(operand)] => Ok(Condition::Single(operand.to_string())),

            [Word::Operator(Operator::Not), rest @ ..] => match rest {
                [Word::Operand(operand)] => Ok(Condition::Prefix {
                    operator: Operator::Not,
                    operands: vec![operand.to_string()],
                }),
                _ => Err(ConditionError::NotArity),
            },

            [Word::Operator(operator), rest @ ..] => {
                let expected = ConditionError::ExpectedExpression(operator.keyword());
                if rest.is_empty() {
                    return Err(expected);
                }
                let operands = rest
                    .iter()
                    .map(|word| match word {
                        Word::Operand(operand) => Ok(operand.to_string()),
                        Word::Operator(_) => Err(expected.clone()),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Condition::Prefix {
                    operator: *operator,
                    operands,
                })
            }

            [
                Word::Operand(left),
                Word::Operator(operator @ (Operator::And | Operator::Or)),
                Word::Operand(right),
            ] => Ok(Condition::Infix {
                left: left.to_string(),
                operator: *operator,
                right: right.to_string(),
            }),

            _ => Err(ConditionError::InvalidStructure),
        }
    }
}

impl Condition {
    /// Parses `text`, reporting failures against the marker on `line`.
    pub fn parse(text: &str, line: usize) -> Result<Self, RenderError> {
        text.parse()
            .map_err(|reason| RenderError::MalformedCondition {
                line,
                condition: text.to_string(),
                reason,
            })
    }

    /// Every operand is resolved, even once the outcome is known, so a bad operand is always
    /// reported.
    pub fn eval<R: Resolve + ?Sized>(&self, ctx: &R, line: usize) -> Result<bool, RenderError> {
        match self {
            Condition::Single(operand) => truthy(ctx, operand, line),
            Condition::Prefix { operator, operands } => {
                let results = operands
                    .iter()
                    .map(|operand| truthy(ctx, operand, line))
                    .collect::<Result<Vec<bool>, _>>()?;
                Ok(combine(*operator, &results))
            }
            Condition::Infix {
                left,
                operator,
                right,
            } => {
                let results = [truthy(ctx, left, line)?, truthy(ctx, right, line)?];
                Ok(combine(*operator, &results))
            }
        }
    }
}

fn combine(operator: Operator, results: &[bool]) -> bool {
    match operator {
        Operator::And => results.iter().all(|r| *r),
        Operator::Or => results.iter().any(|r| *r),
        Operator::Not => !results.iter().all(|r| *r),
    }
}

fn truthy<R: Resolve + ?Sized>(ctx: &R, operand: &str, line: usize) -> Result<bool, RenderError> {
    let value = ctx
        .resolve(operand)
        .map_err(|source| RenderError::UnresolvedExpression {
            line,
            expression: operand.to_string(),
            source,
        })?;
    let truthy = is_truthy(&value);
    log::trace!("line {line}: `{operand}` resolved to {value:?} ({truthy})");
    Ok(truthy)
}
