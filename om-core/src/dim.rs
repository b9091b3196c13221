//! Dimensions with tolerance: `{ minimum?, nominal?, maximum? }`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A dimension with an optional minimum, nominal and maximum value. At
/// least one of the three must be present, and if more than one is
/// present, `minimum <= nominal <= maximum` must hold.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DimWithTol {
    /// The minimum value, if bounded below.
    pub minimum: Option<f64>,
    /// The nominal (typical) value, if known.
    pub nominal: Option<f64>,
    /// The maximum value, if bounded above.
    pub maximum: Option<f64>,
}

impl DimWithTol {
    /// Constructs a [`DimWithTol`], validating that at least one field is
    /// present and that `minimum <= nominal <= maximum`.
    pub fn new(minimum: Option<f64>, nominal: Option<f64>, maximum: Option<f64>) -> Result<Self> {
        if minimum.is_none() && nominal.is_none() && maximum.is_none() {
            return Err(Error::InvalidInput(
                "a DimWithTol needs at least one of minimum/nominal/maximum".into(),
            ));
        }
        if let (Some(min), Some(nom)) = (minimum, nominal) {
            if min > nom {
                return Err(Error::InvalidInput("DimWithTol minimum exceeds nominal".into()));
            }
        }
        if let (Some(nom), Some(max)) = (nominal, maximum) {
            if nom > max {
                return Err(Error::InvalidInput("DimWithTol nominal exceeds maximum".into()));
            }
        }
        if let (Some(min), Some(max)) = (minimum, maximum) {
            if min > max {
                return Err(Error::InvalidInput("DimWithTol minimum exceeds maximum".into()));
            }
        }
        Ok(Self { minimum, nominal, maximum })
    }

    /// Creates a [`DimWithTol`] from only a nominal value.
    pub fn from_nominal(nominal: f64) -> Self {
        Self { minimum: None, nominal: Some(nominal), maximum: None }
    }

    /// Creates a [`DimWithTol`] from only a minimum/maximum range.
    pub fn from_range(minimum: f64, maximum: f64) -> Result<Self> {
        Self::new(Some(minimum), None, Some(maximum))
    }

    /// Returns the nominal value, falling back to the midpoint of
    /// minimum/maximum, or to whichever bound is present.
    pub fn get_nominal(&self) -> f64 {
        match (self.minimum, self.nominal, self.maximum) {
            (_, Some(nominal), _) => nominal,
            (Some(min), None, Some(max)) => (min + max) / 2.0,
            (Some(min), None, None) => min,
            (None, None, Some(max)) => max,
            (None, None, None) => unreachable!("constructors enforce at least one field"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_dimension() {
        assert!(DimWithTol::new(None, None, None).is_err());
    }

    #[test]
    fn rejects_out_of_order_bounds() {
        assert!(DimWithTol::new(Some(5.0), Some(1.0), None).is_err());
    }

    #[test]
    fn nominal_falls_back_to_midpoint() {
        let dim = DimWithTol::from_range(2.0, 4.0).unwrap();
        assert_eq!(dim.get_nominal(), 3.0);
    }
}
