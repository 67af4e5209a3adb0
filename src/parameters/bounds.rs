//! Parameter bounds implementation
//!
//! Bounds restrict the values a parameter may take. Width parameters of the
//! peak components are bounded from below by zero; everything else is
//! unbounded unless the user says otherwise.

use serde::{Deserialize, Serialize};
use std::f64::{INFINITY, NEG_INFINITY};
use thiserror::Error;

/// Errors that can occur when working with parameter bounds
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundsError {
    #[error("Invalid bounds: min ({min}) must not exceed max ({max})")]
    InvalidBounds { min: f64, max: f64 },

    #[error("Parameter value {value} is outside bounds: [{min}, {max}]")]
    ValueOutsideBounds { value: f64, min: f64, max: f64 },
}

/// Closed interval `[min, max]` a parameter must stay in
///
/// Either side may be infinite. Saved models write an infinite side as `null`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

// Infinite limits are written as `null` so that saved models stay valid JSON.
impl Serialize for Bounds {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Bounds", 2)?;
        state.serialize_field("min", &self.min_option())?;
        state.serialize_field("max", &self.max_option())?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for Bounds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Limits {
            #[serde(default)]
            min: Option<f64>,

            #[serde(default)]
            max: Option<f64>,
        }

        let limits = Limits::deserialize(deserializer)?;
        Bounds::from_options(limits.min, limits.max).map_err(serde::de::Error::custom)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: NEG_INFINITY,
            max: INFINITY,
        }
    }
}

impl Bounds {
    /// Bounds from both limits
    ///
    /// Fails when either limit is NaN or `min > max`.
    ///
    /// # Examples
    ///
    /// ```
    /// use voigt_rs::parameters::bounds::Bounds;
    ///
    /// let bounds = Bounds::new(0.0, 10.0).unwrap();
    /// assert!(bounds.is_within_bounds(10.0));
    /// assert!(Bounds::new(f64::NAN, 1.0).is_err());
    /// ```
    pub fn new(min: f64, max: f64) -> Result<Self, BoundsError> {
        if min.is_nan() || max.is_nan() || min > max {
            return Err(BoundsError::InvalidBounds { min, max });
        }

        Ok(Self { min, max })
    }

    /// Build bounds from optional limits, where `None` means unbounded on that side.
    ///
    /// This is the representation used by saved models (`bmin`/`bmax`).
    pub fn from_options(min: Option<f64>, max: Option<f64>) -> Result<Self, BoundsError> {
        Self::new(min.unwrap_or(NEG_INFINITY), max.unwrap_or(INFINITY))
    }

    /// `[min, inf)`, as used for widths
    pub fn min_only(min: f64) -> Self {
        Self { min, max: INFINITY }
    }

    /// Whether `value` lies in `[min, max]`; NaN never does
    pub fn is_within_bounds(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn has_lower_bound(&self) -> bool {
        self.min.is_finite()
    }

    pub fn has_upper_bound(&self) -> bool {
        self.max.is_finite()
    }

    /// Lower limit as an option, `None` when unbounded below.
    pub fn min_option(&self) -> Option<f64> {
        self.has_lower_bound().then_some(self.min)
    }

    /// Upper limit as an option, `None` when unbounded above.
    pub fn max_option(&self) -> Option<f64> {
        self.has_upper_bound().then_some(self.max)
    }

    /// Nearest value inside the bounds
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}
