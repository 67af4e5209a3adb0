//! Parameter definition and implementation
//!
//! This module provides the Parameter struct, the building block of every
//! component. A parameter holds a scalar value, optional bounds, and after a
//! stacked estimation a map with one value per trace.

use crate::parameters::bounds::{Bounds, BoundsError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when working with parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("Bounds error: {0}")]
    BoundsError(#[from] BoundsError),

    #[error("Parameter '{name}' not found")]
    ParameterNotFound { name: String },

    #[error("Parameter '{name}' already exists")]
    DuplicateParameter { name: String },

    #[error("Parameter '{name}' has no map entry {index} (map length {len})")]
    MapIndexOutOfRange { name: String, index: usize, len: usize },

    #[error("Map of '{name}' has {found} entries, expected {expected}")]
    MapLengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
}

/// A named component parameter
///
/// Besides its scalar value a parameter may carry a map: one value per trace
/// of a stacked signal. The map is filled by stacked estimations and consumed
/// by `function_nd`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    /// Name of the parameter
    pub name: String,

    /// Current value of the parameter
    value: f64,

    /// Value at construction (for reset operations)
    default_value: f64,

    /// Whether this parameter is free to vary
    pub vary: bool,

    /// Minimum and maximum bounds for the parameter value
    bounds: Bounds,

    /// Per-trace values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    map: Option<Vec<f64>>,
}

impl Parameter {
    /// Create a new parameter with the given name and value
    ///
    /// # Examples
    ///
    /// ```
    /// use voigt_rs::parameters::parameter::Parameter;
    ///
    /// let param = Parameter::new("area", 10.0);
    /// assert_eq!(param.name(), "area");
    /// assert_eq!(param.value(), 10.0);
    /// assert!(param.vary());
    /// ```
    pub fn new(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            value,
            default_value: value,
            vary: true,
            bounds: Bounds::default(),
            map: None,
        }
    }

    /// Create a new parameter with the given name, value, and bounds
    ///
    /// The value is clamped into the bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use voigt_rs::parameters::parameter::Parameter;
    ///
    /// let param = Parameter::with_bounds("gwidth", 0.5, 0.0, f64::INFINITY).unwrap();
    /// assert_eq!(param.min(), 0.0);
    /// assert_eq!(param.value(), 0.5);
    /// ```
    pub fn with_bounds(name: &str, value: f64, min: f64, max: f64) -> Result<Self, ParameterError> {
        let bounds = Bounds::new(min, max)?;
        let value = bounds.clamp(value);

        Ok(Self {
            name: name.to_string(),
            value,
            default_value: value,
            vary: true,
            bounds,
            map: None,
        })
    }

    /// Create a parameter that is not free to vary.
    pub fn fixed(name: &str, value: f64) -> Self {
        let mut param = Self::new(name, value);
        param.vary = false;
        param
    }

    /// Create a parameter bounded to `[0, inf)`, clamping the value.
    pub fn non_negative(name: &str, value: f64) -> Self {
        let bounds = Bounds::min_only(0.0);
        let value = bounds.clamp(value);

        Self {
            name: name.to_string(),
            value,
            default_value: value,
            vary: true,
            bounds,
            map: None,
        }
    }

    /// Get the current value of the parameter
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Set the value of the parameter
    ///
    /// # Returns
    ///
    /// `Ok(())` if the value was set successfully, or an error if the value is outside bounds
    pub fn set_value(&mut self, value: f64) -> Result<(), ParameterError> {
        if !self.bounds.is_within_bounds(value) {
            return Err(ParameterError::BoundsError(BoundsError::ValueOutsideBounds {
                value,
                min: self.bounds.min,
                max: self.bounds.max,
            }));
        }

        self.value = value;
        Ok(())
    }

    /// Get the value the parameter was created with
    pub fn default_value(&self) -> f64 {
        self.default_value
    }

    /// Reset the parameter to its default value and drop its map
    pub fn reset(&mut self) {
        self.value = self.bounds.clamp(self.default_value);
        self.map = None;
    }

    /// Get the name of the parameter
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the name of the parameter
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Check if the parameter is free to vary
    pub fn vary(&self) -> bool {
        self.vary
    }

    /// Set whether the parameter is free to vary
    pub fn set_vary(&mut self, vary: bool) {
        self.vary = vary;
    }

    /// Get the minimum allowed value for the parameter
    pub fn min(&self) -> f64 {
        self.bounds.min
    }

    /// Get the maximum allowed value for the parameter
    pub fn max(&self) -> f64 {
        self.bounds.max
    }

    /// Set the bounds for the parameter, clamping the current value into them
    pub fn set_bounds(&mut self, min: f64, max: f64) -> Result<(), ParameterError> {
        let bounds = Bounds::new(min, max)?;
        self.bounds = bounds;
        self.value = bounds.clamp(self.value);

        Ok(())
    }

    /// Get the bounds of the parameter
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Per-trace values, if a stacked estimation stored any
    pub fn map(&self) -> Option<&[f64]> {
        self.map.as_deref()
    }

    /// Store one value per trace
    ///
    /// Every entry must respect the bounds; on error the previous map is kept.
    pub fn set_map(&mut self, values: Vec<f64>) -> Result<(), ParameterError> {
        if let Some(&bad) = values.iter().find(|&&v| !self.bounds.is_within_bounds(v)) {
            return Err(ParameterError::BoundsError(BoundsError::ValueOutsideBounds {
                value: bad,
                min: self.bounds.min,
                max: self.bounds.max,
            }));
        }

        self.map = Some(values);
        Ok(())
    }

    /// Drop the per-trace values
    pub fn clear_map(&mut self) {
        self.map = None;
    }

    /// Value for trace `index`: the map entry when a map exists, else the scalar value
    pub fn value_at(&self, index: usize) -> f64 {
        match &self.map {
            Some(map) => map.get(index).copied().unwrap_or(self.value),
            None => self.value,
        }
    }

    /// Copy map entry `index` into the scalar value
    ///
    /// A parameter without a map is left unchanged.
    pub fn fetch_stored_value(&mut self, index: usize) -> Result<(), ParameterError> {
        let stored = match &self.map {
            Some(map) => match map.get(index) {
                Some(&v) => v,
                None => {
                    return Err(ParameterError::MapIndexOutOfRange {
                        name: self.name.clone(),
                        index,
                        len: map.len(),
                    })
                }
            },
            None => return Ok(()),
        };

        self.set_value(stored)
    }
}
