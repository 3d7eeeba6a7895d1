//! Alias resolution
//!
//! Every `Alias` node, and every reference inside composite values and
//! dimension expressions, is replaced by what it points to in the input tree.
//! References are followed transitively; a reference that leads back to a path
//! already being followed is reported as a cycle instead of recursing forever.

use async_trait::async_trait;
use rustc_hash::FxHashSet;

use super::{ProcessError, TokenProcessor};
use crate::token::{CompositeValue, Token, TokenPath};
use crate::value::{
    DimensionExpression, DimensionValue, ExpressionElement, FontWeightValue, GradientStop,
    TypedValue, TypographyValue,
};

#[derive(Clone, Copy, Debug, Default)]
pub struct AliasResolver;

#[async_trait]
impl TokenProcessor for AliasResolver {
    async fn process(&self, token: Token) -> Result<Token, ProcessError> {
        let resolution = Resolution { root: &token };
        resolution.token(&token, &mut FxHashSet::default())
    }
}

struct Resolution<'a> {
    root: &'a Token,
}

/// Paths currently being followed
type Trail = FxHashSet<TokenPath>;

impl Resolution<'_> {
    fn token(&self, token: &Token, trail: &mut Trail) -> Result<Token, ProcessError> {
        Ok(match token {
            Token::Alias(path) => self.follow(path, trail)?,
            Token::Value(value) => Token::Value(self.value(value, trail)?),
            Token::Group(group) => Token::Group(
                group
                    .iter()
                    .map(|(key, child)| -> Result<(String, Token), ProcessError> {
                        Ok((key.clone(), self.token(child, trail)?))
                    })
                    .collect::<Result<_, _>>()?,
            ),
            Token::Array(items) => Token::Array(
                items
                    .iter()
                    .map(|item| self.token(item, trail))
                    .collect::<Result<_, _>>()?,
            ),
            Token::Unknown => Token::Unknown,
        })
    }

    /// Resolve `path` to a fully resolved value or group.
    fn follow(&self, path: &TokenPath, trail: &mut Trail) -> Result<Token, ProcessError> {
        if trail.contains(path) {
            return Err(ProcessError::CyclicAlias { path: path.clone() });
        }

        let target = match self.root.lookup(path) {
            Some(target)
                if matches!(target, Token::Value(_) | Token::Group(_) | Token::Alias(_)) =>
            {
                target
            }
            _ => return Err(ProcessError::UnresolvedAlias { path: path.clone() }),
        };

        trail.insert(path.clone());
        let resolved = self.token(target, trail);
        trail.remove(path);
        resolved
    }

    fn value(&self, value: &TypedValue, trail: &mut Trail) -> Result<TypedValue, ProcessError> {
        Ok(match value {
            TypedValue::Dimension(DimensionValue::Expression(expression)) => {
                TypedValue::Dimension(DimensionValue::Expression(self.expression(expression, trail)?))
            }
            TypedValue::Typography(typography) => TypedValue::Typography(TypographyValue {
                font_family: self.composite(&typography.font_family, trail, "fontFamily", |value| {
                    match value {
                        TypedValue::FontFamily(family) => Some(family.clone()),
                        _ => None,
                    }
                })?,
                font_weight: self.composite(&typography.font_weight, trail, "fontWeight", |value| {
                    match value {
                        TypedValue::FontWeight(weight) => Some(*weight),
                        TypedValue::Number(number) => FontWeightValue::from_number(*number),
                        _ => None,
                    }
                })?,
                font_size: self.composite(&typography.font_size, trail, "dimension", |value| {
                    match value {
                        TypedValue::Dimension(dimension) => Some(dimension.clone()),
                        _ => None,
                    }
                })?,
            }),
            TypedValue::Gradient(stops) => TypedValue::Gradient(
                stops
                    .iter()
                    .map(|stop| -> Result<GradientStop, ProcessError> {
                        Ok(GradientStop {
                            color: self.composite(&stop.color, trail, "color", |value| match value {
                                TypedValue::Color(color) => Some(color.clone()),
                                _ => None,
                            })?,
                            position: self.composite(&stop.position, trail, "number", |value| {
                                match value {
                                    TypedValue::Number(number) => Some(*number),
                                    _ => None,
                                }
                            })?,
                        })
                    })
                    .collect::<Result<_, _>>()?,
            ),
            other => other.clone(),
        })
    }

    fn composite<T: Clone>(
        &self,
        composite: &CompositeValue<T>,
        trail: &mut Trail,
        expected: &'static str,
        pick: impl Fn(&TypedValue) -> Option<T>,
    ) -> Result<CompositeValue<T>, ProcessError> {
        let path = match composite {
            CompositeValue::Value(value) => return Ok(CompositeValue::Value(value.clone())),
            CompositeValue::Alias(path) => path,
        };

        let mismatch = |found: &'static str| ProcessError::AliasTypeMismatch {
            path: path.clone(),
            expected,
            found,
        };
        match self.follow(path, trail)? {
            Token::Value(value) => pick(&value)
                .map(CompositeValue::Value)
                .ok_or_else(|| mismatch(value.token_type().as_str())),
            other => Err(mismatch(other.kind())),
        }
    }

    /// Replace references inside an expression with their operands. A reference
    /// to another expression is inlined in parentheses to keep its grouping.
    fn expression(
        &self,
        expression: &DimensionExpression,
        trail: &mut Trail,
    ) -> Result<DimensionExpression, ProcessError> {
        let mut elements = Vec::with_capacity(expression.elements.len());
        for element in &expression.elements {
            let ExpressionElement::Alias(path) = element else {
                elements.push(element.clone());
                continue;
            };

            let mismatch = |found: &'static str| ProcessError::AliasTypeMismatch {
                path: path.clone(),
                expected: "dimension",
                found,
            };
            match self.follow(path, trail)? {
                Token::Value(TypedValue::Number(number)) => {
                    elements.push(ExpressionElement::Number(number))
                }
                Token::Value(TypedValue::Dimension(DimensionValue::Constant(constant))) => {
                    elements.push(ExpressionElement::Dimension(constant))
                }
                Token::Value(TypedValue::Dimension(DimensionValue::Expression(inner))) => {
                    elements.push(ExpressionElement::OpenParen);
                    elements.extend(inner.elements);
                    elements.push(ExpressionElement::CloseParen);
                }
                Token::Value(other) => return Err(mismatch(other.token_type().as_str())),
                other => return Err(mismatch(other.kind())),
            }
        }
        Ok(DimensionExpression::new(elements))
    }
}
