//! Dimension values and unreduced arithmetic expressions

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::token::TokenPath;

#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionUnit {
    #[default]
    Px,
    Rem,
}

impl DimensionUnit {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "px" => Some(Self::Px),
            "rem" => Some(Self::Rem),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Rem => "rem",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DimensionConstant {
    pub value: f64,
    pub unit: DimensionUnit,
}

impl DimensionConstant {
    pub fn new(value: f64, unit: DimensionUnit) -> Self {
        Self { value, unit }
    }

    pub fn px(value: f64) -> Self {
        Self::new(value, DimensionUnit::Px)
    }

    pub fn rem(value: f64) -> Self {
        Self::new(value, DimensionUnit::Rem)
    }
}

impl fmt::Display for DimensionConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DimensionValue {
    Constant(DimensionConstant),
    /// Not yet reduced by the arithmetic evaluator
    Expression(DimensionExpression),
}

impl DimensionValue {
    /// Parse `16px`, `1.5rem`, or an arithmetic expression such as `{spacing.base} * 2`.
    pub fn parse(input: &str) -> Result<Self, ExpressionParseError> {
        let expression = DimensionExpression::parse(input)?;
        match expression.elements.as_slice() {
            [ExpressionElement::Dimension(constant)] => Ok(Self::Constant(*constant)),
            [ExpressionElement::Number(value)] => Ok(Self::Constant(DimensionConstant::px(*value))),
            _ => Ok(Self::Expression(expression)),
        }
    }

    pub fn as_constant(&self) -> Option<&DimensionConstant> {
        match self {
            Self::Constant(constant) => Some(constant),
            Self::Expression(_) => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Subtract => 1,
            Self::Multiply | Self::Divide => 2,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExpressionElement {
    Number(f64),
    Dimension(DimensionConstant),
    Alias(TokenPath),
    Operator(Operator),
    OpenParen,
    CloseParen,
}

/// Infix sequence of operands and operators, kept in source order
#[derive(Clone, Debug, PartialEq)]
pub struct DimensionExpression {
    pub elements: Vec<ExpressionElement>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionParseError {
    #[error("empty dimension expression")]
    Empty,

    #[error("unexpected character `{character}` at offset {offset}")]
    UnexpectedCharacter { character: char, offset: usize },

    #[error("invalid number `{0}`")]
    InvalidNumber(String),

    #[error("unknown unit `{0}`")]
    UnknownUnit(String),

    #[error("unterminated reference starting at offset {0}")]
    UnterminatedReference(usize),
}

impl DimensionExpression {
    pub fn new(elements: Vec<ExpressionElement>) -> Self {
        Self { elements }
    }

    pub fn parse(input: &str) -> Result<Self, ExpressionParseError> {
        let chars: Vec<(usize, char)> = input.char_indices().collect();
        let mut elements = Vec::new();
        let mut index = 0;

        while index < chars.len() {
            let (offset, character) = chars[index];
            // Minus is unary at the start, after an operator, or after `(`.
            let unary_position = matches!(
                elements.last(),
                None | Some(ExpressionElement::Operator(_)) | Some(ExpressionElement::OpenParen)
            );

            match character {
                c if c.is_whitespace() => index += 1,
                '(' => {
                    elements.push(ExpressionElement::OpenParen);
                    index += 1;
                }
                ')' => {
                    elements.push(ExpressionElement::CloseParen);
                    index += 1;
                }
                '{' => {
                    let end = chars[index..]
                        .iter()
                        .position(|(_, c)| *c == '}')
                        .map(|relative| index + relative)
                        .ok_or(ExpressionParseError::UnterminatedReference(offset))?;
                    let reference: String = chars[index..=end].iter().map(|(_, c)| c).collect();
                    let path = TokenPath::parse_reference(&reference)
                        .ok_or(ExpressionParseError::UnterminatedReference(offset))?;
                    elements.push(ExpressionElement::Alias(path));
                    index = end + 1;
                }
                '-' if unary_position => {
                    let (element, next) = parse_operand(&chars, index)?;
                    elements.push(element);
                    index = next;
                }
                '+' | '-' | '*' | '/' => {
                    let operator = match character {
                        '+' => Operator::Add,
                        '-' => Operator::Subtract,
                        '*' => Operator::Multiply,
                        _ => Operator::Divide,
                    };
                    elements.push(ExpressionElement::Operator(operator));
                    index += 1;
                }
                c if c.is_ascii_digit() || c == '.' => {
                    let (element, next) = parse_operand(&chars, index)?;
                    elements.push(element);
                    index = next;
                }
                c => {
                    return Err(ExpressionParseError::UnexpectedCharacter {
                        character: c,
                        offset,
                    })
                }
            }
        }

        if elements.is_empty() {
            return Err(ExpressionParseError::Empty);
        }
        Ok(Self { elements })
    }
}

/// Read a signed number with an optional unit suffix starting at `start`.
fn parse_operand(
    chars: &[(usize, char)],
    start: usize,
) -> Result<(ExpressionElement, usize), ExpressionParseError> {
    let mut index = start;
    if chars[index].1 == '-' {
        index += 1;
    }
    while index < chars.len() && (chars[index].1.is_ascii_digit() || chars[index].1 == '.') {
        index += 1;
    }
    let number: String = chars[start..index].iter().map(|(_, c)| c).collect();
    let value: f64 = number
        .parse()
        .map_err(|_| ExpressionParseError::InvalidNumber(number.clone()))?;

    let unit_start = index;
    while index < chars.len() && chars[index].1.is_ascii_alphabetic() {
        index += 1;
    }
    if unit_start == index {
        return Ok((ExpressionElement::Number(value), index));
    }

    let unit: String = chars[unit_start..index].iter().map(|(_, c)| c).collect();
    let unit = DimensionUnit::from_name(&unit).ok_or(ExpressionParseError::UnknownUnit(unit))?;
    Ok((
        ExpressionElement::Dimension(DimensionConstant::new(value, unit)),
        index,
    ))
}

impl fmt::Display for DimensionExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut previous_was_open = true;
        for element in &self.elements {
            let closing = matches!(element, ExpressionElement::CloseParen);
            if !previous_was_open && !closing {
                f.write_str(" ")?;
            }
            match element {
                ExpressionElement::Number(value) => write!(f, "{value}")?,
                ExpressionElement::Dimension(constant) => write!(f, "{constant}")?,
                ExpressionElement::Alias(path) => write!(f, "{path}")?,
                ExpressionElement::Operator(operator) => write!(f, "{}", operator.symbol())?,
                ExpressionElement::OpenParen => f.write_str("(")?,
                ExpressionElement::CloseParen => f.write_str(")")?,
            }
            previous_was_open = matches!(element, ExpressionElement::OpenParen);
        }
        Ok(())
    }
}
