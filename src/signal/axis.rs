//! Uniform data axis.
//!
//! A `DataAxis` maps sample indices to coordinates through
//! `value = offset + scale * index`. The scale doubles as the bin width of
//! binned signals.

use crate::error::{Result, VoigtError};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::ops::Range;

// Slack, in index units, when snapping coordinates onto samples.
const INDEX_EPS: f64 = 1e-9;

/// A uniform signal axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataAxis {
    /// Number of samples
    pub size: usize,

    /// Spacing between consecutive samples
    pub scale: f64,

    /// Coordinate of the first sample
    pub offset: f64,

    /// Axis name, e.g. "Energy"
    #[serde(default)]
    pub name: String,

    /// Axis units, e.g. "eV"
    #[serde(default)]
    pub units: Option<String>,
}

impl DataAxis {
    /// Create a new axis
    ///
    /// # Arguments
    ///
    /// * `size` - Number of samples
    /// * `scale` - Sample spacing, finite and non-zero
    /// * `offset` - Coordinate of the first sample, finite
    ///
    /// # Examples
    ///
    /// ```
    /// use voigt_rs::signal::DataAxis;
    ///
    /// let axis = DataAxis::new(200, 0.05, -5.0).unwrap();
    /// assert_eq!(axis.low_value(), -5.0);
    /// assert!((axis.high_value() - 4.95).abs() < 1e-12);
    /// ```
    pub fn new(size: usize, scale: f64, offset: f64) -> Result<Self> {
        if !scale.is_finite() || scale == 0.0 {
            return Err(VoigtError::InvalidInput(format!(
                "Axis scale must be finite and non-zero, got {}",
                scale
            )));
        }
        if !offset.is_finite() {
            return Err(VoigtError::InvalidInput(format!(
                "Axis offset must be finite, got {}",
                offset
            )));
        }

        Ok(Self {
            size,
            scale,
            offset,
            name: String::new(),
            units: None,
        })
    }

    /// Set the axis name and units
    pub fn with_name(mut self, name: &str, units: Option<&str>) -> Self {
        self.name = name.to_string();
        self.units = units.map(|u| u.to_string());
        self
    }

    /// Coordinate of sample `index`
    pub fn value(&self, index: usize) -> f64 {
        self.offset + self.scale * index as f64
    }

    /// All sample coordinates
    pub fn axis(&self) -> Array1<f64> {
        Array1::from_iter((0..self.size).map(|i| self.value(i)))
    }

    /// Smallest coordinate on the axis
    pub fn low_value(&self) -> f64 {
        if self.size == 0 {
            return self.offset;
        }
        self.value(0).min(self.value(self.size - 1))
    }

    /// Largest coordinate on the axis
    pub fn high_value(&self) -> f64 {
        if self.size == 0 {
            return self.offset;
        }
        self.value(0).max(self.value(self.size - 1))
    }

    /// Index of the sample nearest to `value`, `None` when outside the axis
    pub fn value2index(&self, value: f64) -> Option<usize> {
        if !value.is_finite() || self.size == 0 {
            return None;
        }

        let index = ((value - self.offset) / self.scale).round();
        if index < 0.0 || index > (self.size - 1) as f64 {
            None
        } else {
            Some(index as usize)
        }
    }

    /// Indices of the samples whose coordinate lies in `[start, end]`
    ///
    /// `None` leaves that side open. The returned range is empty when the
    /// interval holds no sample, when `start > end`, or when a bound is NaN.
    ///
    /// # Examples
    ///
    /// ```
    /// use voigt_rs::signal::DataAxis;
    ///
    /// let axis = DataAxis::new(11, 0.1, 0.0).unwrap();
    /// assert_eq!(axis.value_range_to_indices(Some(0.2), Some(0.5)), 2..6);
    /// assert_eq!(axis.value_range_to_indices(None, None), 0..11);
    /// assert!(axis.value_range_to_indices(Some(2.0), None).is_empty());
    /// ```
    pub fn value_range_to_indices(&self, start: Option<f64>, end: Option<f64>) -> Range<usize> {
        let lo = start.unwrap_or(f64::NEG_INFINITY);
        let hi = end.unwrap_or(f64::INFINITY);
        if lo.is_nan() || hi.is_nan() || lo > hi {
            return 0..0;
        }

        let a = (lo - self.offset) / self.scale;
        let b = (hi - self.offset) / self.scale;
        let (first, last) = if a <= b { (a, b) } else { (b, a) };

        let size = self.size as f64;
        let i1 = (first - INDEX_EPS).ceil().clamp(0.0, size) as usize;
        let i2 = ((last + INDEX_EPS).floor() + 1.0).clamp(0.0, size) as usize;

        i1..i2.max(i1)
    }
}
