//! Component trait.
//!
//! This module defines the Component trait, the common interface of the
//! spectral components: parameter access, evaluation over an axis (for one
//! trace or for every trace of a stack), and estimation of initial parameter
//! values from an observed signal.

use crate::error::{Result, VoigtError};
use crate::parameters::Parameters;
use crate::signal::Signal1D;
use ndarray::{Array1, Array2};

/// A trait representing a spectral component.
///
/// Components evaluate a function of the signal axis controlled by named
/// parameters. After a stacked estimation parameters may carry per-trace
/// maps, which `function_nd` evaluates trace by trace.
pub trait Component {
    /// Component name, e.g. "Voigt"
    fn name(&self) -> &str;

    /// Returns a reference to the component's parameters.
    fn parameters(&self) -> &Parameters;

    /// Returns a mutable reference to the component's parameters.
    fn parameters_mut(&mut self) -> &mut Parameters;

    /// Evaluates the component at the given x values using the scalar parameter values.
    ///
    /// # Arguments
    ///
    /// * `x` - The axis coordinates at which to evaluate the component
    ///
    /// # Returns
    ///
    /// * The component values at the given coordinates
    fn function_array(&self, x: &Array1<f64>) -> Result<Array1<f64>>;

    /// Evaluates the component at a single coordinate.
    fn function(&self, x: f64) -> Result<f64> {
        let y = self.function_array(&Array1::from_elem(1, x))?;
        y.get(0).copied().ok_or_else(|| {
            VoigtError::DimensionMismatch("Component returned no value".to_string())
        })
    }

    /// Evaluates the component once per trace.
    ///
    /// Each row uses the per-trace values of the parameter maps; parameters
    /// without a map contribute their scalar value to every row. Without any
    /// map the result has a single row.
    ///
    /// # Returns
    ///
    /// * An array of shape `(n_traces, x.len())`
    fn function_nd(&self, x: &Array1<f64>) -> Result<Array2<f64>>;

    /// Sets parameter values from the peak found in `signal`.
    ///
    /// # Arguments
    ///
    /// * `signal` - The observed signal
    /// * `start` - Lower bound of the window in axis units; `None` for the axis start
    /// * `end` - Upper bound of the window in axis units; `None` for the axis end
    /// * `only_current` - Estimate the current trace only, or every trace of the stack
    ///
    /// # Returns
    ///
    /// * `true` when the parameters were updated, `false` when no estimate
    ///   could be made; the component is unchanged in that case
    fn estimate_parameters(
        &mut self,
        signal: &Signal1D,
        start: Option<f64>,
        end: Option<f64>,
        only_current: bool,
    ) -> bool;

    /// Whether the last estimation saw a binned signal, `None` before any estimation.
    fn binned(&self) -> Option<bool>;

    /// Copies map entry `index` into the scalar value of every mapped parameter.
    fn fetch_stored_values(&mut self, index: usize) -> Result<()> {
        self.parameters_mut().fetch_stored_values(index)?;
        Ok(())
    }

    /// Returns the names of all parameters in the component.
    fn parameter_names(&self) -> Vec<String> {
        self.parameters().names()
    }

    /// Returns the number of parameters free to vary.
    fn varying_parameter_count(&self) -> usize {
        self.parameters().varying().len()
    }

    /// Number of traces `function_nd` evaluates.
    fn n_traces(&self) -> Result<usize> {
        let len = self.parameters().map_len().map_err(|e| {
            VoigtError::DimensionMismatch(format!("Inconsistent parameter maps: {}", e))
        })?;
        Ok(len.unwrap_or(1))
    }
}
