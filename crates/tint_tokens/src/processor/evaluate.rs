//! Arithmetic evaluation of dimension expressions
//!
//! Precedence is fixed: `*` and `/` bind tighter than `+` and `-`, operators of
//! equal precedence associate to the left, and parentheses group.

use async_trait::async_trait;
use thiserror::Error;

use super::{map_values, ProcessError, TokenProcessor};
use crate::token::{CompositeValue, Token, TokenPath};
use crate::value::{
    DimensionConstant, DimensionExpression, DimensionUnit, DimensionValue, ExpressionElement,
    Operator, TypedValue,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("expression still references {0}")]
    UnresolvedReference(TokenPath),

    #[error("malformed expression")]
    Malformed,

    #[error("division by zero")]
    DivisionByZero,

    #[error("cannot combine {left} and {right}")]
    UnitMismatch {
        left: &'static str,
        right: &'static str,
    },

    #[error("operator `{0}` does not apply to these operands")]
    InvalidOperands(char),
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ArithmeticEvaluator;

#[async_trait]
impl TokenProcessor for ArithmeticEvaluator {
    async fn process(&self, token: Token) -> Result<Token, ProcessError> {
        map_values(token, &mut |value| {
            Ok(match value {
                TypedValue::Dimension(dimension) => TypedValue::Dimension(reduce(dimension)?),
                TypedValue::Typography(mut typography) => {
                    if let CompositeValue::Value(size) = typography.font_size {
                        typography.font_size = CompositeValue::Value(reduce(size)?);
                    }
                    TypedValue::Typography(typography)
                }
                other => other,
            })
        })
    }
}

fn reduce(dimension: DimensionValue) -> Result<DimensionValue, ProcessError> {
    match dimension {
        DimensionValue::Expression(expression) => evaluate_expression(&expression)
            .map(DimensionValue::Constant)
            .map_err(|source| ProcessError::Evaluation {
                expression: expression.to_string(),
                source,
            }),
        constant => Ok(constant),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Operand {
    Number(f64),
    Dimension(DimensionConstant),
}

impl Operand {
    fn describe(self) -> &'static str {
        match self {
            Operand::Number(_) => "number",
            Operand::Dimension(constant) => constant.unit.as_str(),
        }
    }
}

enum Postfix {
    Operand(Operand),
    Operator(Operator),
}

enum Pending {
    Operator(Operator),
    OpenParen,
}

/// Reduce an expression to a single constant. A unit-less result is taken as pixels.
pub fn evaluate_expression(
    expression: &DimensionExpression,
) -> Result<DimensionConstant, EvaluationError> {
    let mut stack = Vec::new();
    for item in to_postfix(&expression.elements)? {
        match item {
            Postfix::Operand(operand) => stack.push(operand),
            Postfix::Operator(operator) => {
                let right = stack.pop().ok_or(EvaluationError::Malformed)?;
                let left = stack.pop().ok_or(EvaluationError::Malformed)?;
                stack.push(apply(operator, left, right)?);
            }
        }
    }

    match stack.as_slice() {
        [Operand::Number(value)] => Ok(DimensionConstant::px(*value)),
        [Operand::Dimension(constant)] => Ok(*constant),
        _ => Err(EvaluationError::Malformed),
    }
}

/// Shunting-yard conversion from infix elements to postfix order.
fn to_postfix(elements: &[ExpressionElement]) -> Result<Vec<Postfix>, EvaluationError> {
    let mut output = Vec::with_capacity(elements.len());
    let mut pending: Vec<Pending> = Vec::new();

    for element in elements {
        match element {
            ExpressionElement::Number(value) => output.push(Postfix::Operand(Operand::Number(*value))),
            ExpressionElement::Dimension(constant) => {
                output.push(Postfix::Operand(Operand::Dimension(*constant)))
            }
            ExpressionElement::Alias(path) => {
                return Err(EvaluationError::UnresolvedReference(path.clone()))
            }
            ExpressionElement::Operator(operator) => {
                while let Some(Pending::Operator(top)) = pending.last() {
                    if top.precedence() < operator.precedence() {
                        break;
                    }
                    output.push(Postfix::Operator(*top));
                    pending.pop();
                }
                pending.push(Pending::Operator(*operator));
            }
            ExpressionElement::OpenParen => pending.push(Pending::OpenParen),
            ExpressionElement::CloseParen => loop {
                match pending.pop() {
                    Some(Pending::Operator(operator)) => output.push(Postfix::Operator(operator)),
                    Some(Pending::OpenParen) => break,
                    None => return Err(EvaluationError::Malformed),
                }
            },
        }
    }

    while let Some(item) = pending.pop() {
        match item {
            Pending::Operator(operator) => output.push(Postfix::Operator(operator)),
            Pending::OpenParen => return Err(EvaluationError::Malformed),
        }
    }
    Ok(output)
}

fn apply(operator: Operator, left: Operand, right: Operand) -> Result<Operand, EvaluationError> {
    use Operand::{Dimension, Number};

    let mismatch = || EvaluationError::UnitMismatch {
        left: left.describe(),
        right: right.describe(),
    };
    let same_unit = |a: DimensionConstant, b: DimensionConstant| -> Result<DimensionUnit, EvaluationError> {
        if a.unit == b.unit {
            Ok(a.unit)
        } else {
            Err(mismatch())
        }
    };

    Ok(match (operator, left, right) {
        (Operator::Add, Number(a), Number(b)) => Number(a + b),
        (Operator::Subtract, Number(a), Number(b)) => Number(a - b),
        (Operator::Add, Dimension(a), Dimension(b)) => {
            Dimension(DimensionConstant::new(a.value + b.value, same_unit(a, b)?))
        }
        (Operator::Subtract, Dimension(a), Dimension(b)) => {
            Dimension(DimensionConstant::new(a.value - b.value, same_unit(a, b)?))
        }
        (Operator::Add | Operator::Subtract, _, _) => return Err(mismatch()),

        (Operator::Multiply, Number(a), Number(b)) => Number(a * b),
        (Operator::Multiply, Dimension(a), Number(b)) | (Operator::Multiply, Number(b), Dimension(a)) => {
            Dimension(DimensionConstant::new(a.value * b, a.unit))
        }
        (Operator::Multiply, Dimension(_), Dimension(_)) => {
            return Err(EvaluationError::InvalidOperands(operator.symbol()))
        }

        (Operator::Divide, _, Number(b)) | (Operator::Divide, _, Dimension(DimensionConstant { value: b, .. }))
            if b == 0.0 =>
        {
            return Err(EvaluationError::DivisionByZero)
        }
        (Operator::Divide, Number(a), Number(b)) => Number(a / b),
        (Operator::Divide, Dimension(a), Number(b)) => Dimension(DimensionConstant::new(a.value / b, a.unit)),
        (Operator::Divide, Dimension(a), Dimension(b)) => {
            same_unit(a, b)?;
            Number(a.value / b.value)
        }
        (Operator::Divide, Number(_), Dimension(_)) => {
            return Err(EvaluationError::InvalidOperands(operator.symbol()))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(input: &str) -> Result<DimensionConstant, EvaluationError> {
        evaluate_expression(&DimensionExpression::parse(input).unwrap())
    }

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(eval("2px + 3px * 4").unwrap(), DimensionConstant::px(14.0));
        assert_eq!(eval("20px - 5px - 5px").unwrap(), DimensionConstant::px(10.0));
        assert_eq!(eval("32px / 4 / 2").unwrap(), DimensionConstant::px(4.0));
        assert_eq!(eval("(2px + 3px) * 4").unwrap(), DimensionConstant::px(20.0));
        assert_eq!(eval("-2rem * 2").unwrap(), DimensionConstant::rem(-4.0));
    }

    #[test]
    fn test_unitless_result_is_pixels() {
        assert_eq!(eval("3 * 4").unwrap(), DimensionConstant::px(12.0));
        assert_eq!(eval("8px / 2px").unwrap(), DimensionConstant::px(4.0));
    }

    #[test]
    fn test_errors() {
        assert_eq!(eval("4px / 0"), Err(EvaluationError::DivisionByZero));
        assert_eq!(
            eval("1rem + 4px"),
            Err(EvaluationError::UnitMismatch {
                left: "rem",
                right: "px"
            })
        );
        assert_eq!(eval("2px * 2px"), Err(EvaluationError::InvalidOperands('*')));
        assert_eq!(eval("(2px + 1px"), Err(EvaluationError::Malformed));
        assert_eq!(eval("2px 4px"), Err(EvaluationError::Malformed));
        assert_eq!(eval("2px +"), Err(EvaluationError::Malformed));
        assert!(matches!(
            eval("{space.unit} * 2"),
            Err(EvaluationError::UnresolvedReference(_))
        ));
    }

    #[tokio::test]
    async fn test_processor_reduces_nested_expressions() {
        let token = crate::decode::decode_tokens(
            r#"{
                "gap": {"$type": "dimension", "$value": "(4px + 4px) * 2"},
                "heading": {"$type": "typography", "$value": {
                    "fontFamily": "Inter", "fontWeight": 700, "fontSize": "1rem * 2"
                }}
            }"#,
            &Default::default(),
        )
        .unwrap();

        let evaluated = ArithmeticEvaluator.process(token).await.unwrap();
        let group = evaluated.as_group().unwrap();
        assert_eq!(
            group["gap"],
            Token::Value(TypedValue::Dimension(DimensionValue::Constant(
                DimensionConstant::px(16.0)
            )))
        );
        let Token::Value(TypedValue::Typography(heading)) = &group["heading"] else {
            panic!("expected typography");
        };
        assert_eq!(
            heading.font_size,
            CompositeValue::Value(DimensionValue::Constant(DimensionConstant::rem(2.0)))
        );
    }

    #[tokio::test]
    async fn test_processor_reports_expression() {
        let token = crate::decode::decode_tokens(
            r#"{"gap": {"$type": "dimension", "$value": "4px / 0"}}"#,
            &Default::default(),
        )
        .unwrap();
        let error = ArithmeticEvaluator.process(token).await.unwrap_err();
        assert_eq!(
            error,
            ProcessError::Evaluation {
                expression: "4px / 0".into(),
                source: EvaluationError::DivisionByZero,
            }
        );
    }
}
