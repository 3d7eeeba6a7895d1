use std::cmp::Ordering;

use tint_tokens::{ColorHexFormat, CompositeValue, GradientValue};

use super::{color, ExtractError};
use crate::declaration::{GradientRepresentation, LinearGradient, UnitPoint};

/// Stops are sorted by position (stable, so ties keep document order) and laid
/// out as a leading-to-trailing linear gradient.
pub(crate) fn extract(
    stops: GradientValue,
    format: ColorHexFormat,
) -> Result<GradientRepresentation, ExtractError> {
    let mut resolved = stops
        .into_iter()
        .map(|stop| match (stop.color, stop.position) {
            (CompositeValue::Value(color), CompositeValue::Value(position)) => Ok((color, position)),
            _ => Err(ExtractError::UnresolvedReferences),
        })
        .collect::<Result<Vec<_>, _>>()?;

    resolved.sort_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let colors = resolved
        .iter()
        .map(|(value, _)| color::extract(value, format))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GradientRepresentation::Linear(LinearGradient {
        colors,
        start_point: UnitPoint::Leading,
        end_point: UnitPoint::Trailing,
    }))
}
