use std::fmt::{Display, Formatter};
use log::debug;
use nom::bytes::complete::{tag, take_until};
use nom::character::complete::anychar;
use nom::error::Error;
use nom::sequence::terminated;
use nom::IResult;
use crate::{CompileError, CompileResult};

type NResult<'a, T> = IResult<&'a str, T>;

/// Characters `regex`-style syntax treats as operators; escaped when an
/// expression is rendered.
const META_CHARACTERS: &str = r"\.+*?()|[]{}^$#&-~";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operator {
    Union,
    Concat,
    Star,
    Plus,
    Optional,
}

impl Operator {
    /// Loosest binding first. The scanner splits on the first of these
    /// that occurs anywhere in the substring.
    pub const PRECEDENCE: [Operator; 5] = [
        Operator::Union,
        Operator::Concat,
        Operator::Star,
        Operator::Plus,
        Operator::Optional,
    ];

    pub const fn token(self) -> &'static str {
        match self {
            Operator::Union => "|",
            Operator::Concat => ".",
            Operator::Star => "*",
            Operator::Plus => "+",
            Operator::Optional => "?",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Empty,
    Literal(char),
    Concat(Box<Expression>, Box<Expression>),
    Union(Box<Expression>, Box<Expression>),
    Star(Box<Expression>),
    Plus(Box<Expression>),
    Optional(Box<Expression>),
}

/// Renders the tree in conventional syntax with every operand grouped, so
/// the precedence chosen by the scanner is explicit.
impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Empty => Ok(()),
            Expression::Literal(c) => {
                if META_CHARACTERS.contains(*c) {
                    write!(f, "\\")?;
                }
                write!(f, "{c}")
            }
            Expression::Concat(left, right) => write!(f, "(?:{left})(?:{right})"),
            Expression::Union(left, right) => write!(f, "(?:{left}|{right})"),
            Expression::Star(inner) => write!(f, "(?:{inner})*"),
            Expression::Plus(inner) => write!(f, "(?:{inner})+"),
            Expression::Optional(inner) => write!(f, "(?:{inner})?"),
        }
    }
}

/// Splits at the leftmost occurrence of `operator`, returning
/// `(trailing, leading)`.
fn split_at(regex: &str, operator: Operator) -> NResult<&str> {
    terminated(take_until(operator.token()), tag(operator.token()))(regex)
}

pub fn parse_regex(regex: &str) -> CompileResult<Expression> {
    parse_expression(regex, 0)
}

fn parse_expression(regex: &str, depth: usize) -> CompileResult<Expression> {
    debug!("{:indent$}building ({regex})", "", indent = depth * 4);

    for operator in Operator::PRECEDENCE {
        let Ok((trailing, leading)) = split_at(regex, operator) else {
            continue;
        };

        let leading = Box::new(parse_expression(leading, depth + 1)?);
        let expression = match operator {
            Operator::Union => {
                Expression::Union(leading, Box::new(parse_expression(trailing, depth + 1)?))
            }
            Operator::Concat => {
                Expression::Concat(leading, Box::new(parse_expression(trailing, depth + 1)?))
            }
            Operator::Star => postfix(Expression::Star(leading), trailing, depth)?,
            Operator::Plus => postfix(Expression::Plus(leading), trailing, depth)?,
            Operator::Optional => postfix(Expression::Optional(leading), trailing, depth)?,
        };
        return Ok(expression);
    }

    if regex.is_empty() {
        return Ok(Expression::Empty);
    }

    // No operators left: peel one character off and concatenate implicitly
    let (rest, first) = anychar::<_, Error<_>>(regex).map_err(|e| CompileError::Malformed {
        regex: regex.to_string(),
        reason: e.to_string(),
    })?;

    if rest.is_empty() {
        Ok(Expression::Literal(first))
    } else {
        Ok(Expression::Concat(
            Box::new(Expression::Literal(first)),
            Box::new(parse_expression(rest, depth + 1)?),
        ))
    }
}

/// A postfix operator applies to everything before it; whatever follows is
/// concatenated on.
fn postfix(wrapped: Expression, trailing: &str, depth: usize) -> CompileResult<Expression> {
    if trailing.is_empty() {
        Ok(wrapped)
    } else {
        Ok(Expression::Concat(
            Box::new(wrapped),
            Box::new(parse_expression(trailing, depth + 1)?),
        ))
    }
}
