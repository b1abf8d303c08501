use crate::error::{GeometryError, Result};

/// Tunable distances for knot generation.
///
/// All three values are fixed for the duration of one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnotParams {
    /// Distance seam points are pushed into the face, perpendicular to the edge.
    pub break_inset: f64,
    /// Half the vertical separation between the over and under strands at
    /// interior edges.
    pub layer_gap: f64,
    /// Signed shift of the whole knot along the surface normal.
    pub offset_from_surface: f64,
}

impl Default for KnotParams {
    fn default() -> Self {
        Self {
            break_inset: 0.031,
            layer_gap: 0.031,
            offset_from_surface: 0.0,
        }
    }
}

impl KnotParams {
    /// Inclusive `(min, max)` accepted for `break_inset`.
    pub const BREAK_INSET_RANGE: (f64, f64) = (0.01, 1.0);
    /// Inclusive `(min, max)` accepted for `layer_gap`.
    pub const LAYER_GAP_RANGE: (f64, f64) = (0.01, 1.0);
    /// Inclusive `(min, max)` accepted for `offset_from_surface`.
    pub const OFFSET_RANGE: (f64, f64) = (-1.0, 1.0);

    /// Creates parameters from explicit values.
    #[must_use]
    pub fn new(break_inset: f64, layer_gap: f64, offset_from_surface: f64) -> Self {
        Self {
            break_inset,
            layer_gap,
            offset_from_surface,
        }
    }

    /// Checks every value against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ParameterOutOfRange`] for the first value
    /// outside its range (NaN included).
    pub fn validate(&self) -> Result<()> {
        check("break_inset", self.break_inset, Self::BREAK_INSET_RANGE)?;
        check("layer_gap", self.layer_gap, Self::LAYER_GAP_RANGE)?;
        check("offset_from_surface", self.offset_from_surface, Self::OFFSET_RANGE)
    }
}

fn check(parameter: &'static str, value: f64, (min, max): (f64, f64)) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(GeometryError::ParameterOutOfRange {
            parameter,
            value,
            min,
            max,
        }
        .into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::KnotworkError;

    #[test]
    fn defaults_are_valid() {
        assert!(KnotParams::default().validate().is_ok());
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(KnotParams::new(0.01, 1.0, -1.0).validate().is_ok());
        assert!(KnotParams::new(1.0, 0.01, 1.0).validate().is_ok());
    }

    #[test]
    fn out_of_range_names_the_parameter() {
        let err = KnotParams::new(0.031, 0.0, 0.0).validate().unwrap_err();
        assert!(matches!(
            err,
            KnotworkError::Geometry(GeometryError::ParameterOutOfRange {
                parameter: "layer_gap",
                ..
            })
        ));
        assert!(KnotParams::new(0.031, 0.031, -1.5).validate().is_err());
        assert!(KnotParams::new(f64::NAN, 0.031, 0.0).validate().is_err());
    }
}
