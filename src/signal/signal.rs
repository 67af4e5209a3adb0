//! Observed one-dimensional signals.
//!
//! A `Signal1D` holds one or more traces sharing a single [`DataAxis`]. Data
//! is either held in memory or as [`LazyData`] chunks computed on demand.

use crate::error::{Result, VoigtError};
use crate::signal::axis::DataAxis;
use crate::signal::lazy::LazyData;
use ndarray::{s, Array1, Array2, Axis};
use std::ops::Range;

/// Storage behind a signal
#[derive(Debug, Clone)]
pub enum SignalData {
    /// In-memory `(traces, channels)` array
    Eager(Array2<f64>),

    /// Deferred chunked data
    Lazy(LazyData),
}

impl SignalData {
    fn shape(&self) -> (usize, usize) {
        match self {
            SignalData::Eager(data) => data.dim(),
            SignalData::Lazy(lazy) => lazy.shape(),
        }
    }
}

/// One spectrum, or a stack of spectra sharing an axis
#[derive(Debug, Clone)]
pub struct Signal1D {
    data: SignalData,
    axis: DataAxis,
    binned: bool,
    current: usize,
}

impl Signal1D {
    /// Create a single spectrum
    ///
    /// # Examples
    ///
    /// ```
    /// use ndarray::Array1;
    /// use voigt_rs::signal::{DataAxis, Signal1D};
    ///
    /// let axis = DataAxis::new(5, 1.0, 0.0).unwrap();
    /// let signal = Signal1D::new(Array1::from_vec(vec![0.0, 1.0, 3.0, 1.0, 0.0]), axis).unwrap();
    /// assert_eq!(signal.n_traces(), 1);
    /// assert!(!signal.is_lazy());
    /// ```
    pub fn new(data: Array1<f64>, axis: DataAxis) -> Result<Self> {
        let n = data.len();
        let data = data.into_shape((1, n)).map_err(|e| {
            VoigtError::InvalidInput(format!("Cannot shape spectrum as one trace: {}", e))
        })?;
        Self::from_stack(data, axis)
    }

    /// Create a stack of traces, one per row
    pub fn from_stack(data: Array2<f64>, axis: DataAxis) -> Result<Self> {
        Self::with_data(SignalData::Eager(data), axis)
    }

    /// Create a signal backed by lazy data
    pub fn from_lazy(data: LazyData, axis: DataAxis) -> Result<Self> {
        Self::with_data(SignalData::Lazy(data), axis)
    }

    fn with_data(data: SignalData, axis: DataAxis) -> Result<Self> {
        let (_, channels) = data.shape();
        if channels != axis.size {
            return Err(VoigtError::DimensionMismatch(format!(
                "Data has {} channels but the axis has {} samples",
                channels, axis.size
            )));
        }

        Ok(Self {
            data,
            axis,
            binned: false,
            current: 0,
        })
    }

    /// Mark the signal as binned (builder style)
    pub fn with_binned(mut self, binned: bool) -> Self {
        self.binned = binned;
        self
    }

    /// Mark the signal as binned
    pub fn set_binned(&mut self, binned: bool) {
        self.binned = binned;
    }

    /// Whether amplitudes are counts per bin
    pub fn binned(&self) -> bool {
        self.binned
    }

    /// The signal axis
    pub fn axis(&self) -> &DataAxis {
        &self.axis
    }

    /// Number of traces
    pub fn n_traces(&self) -> usize {
        self.data.shape().0
    }

    /// Number of channels per trace
    pub fn n_channels(&self) -> usize {
        self.data.shape().1
    }

    /// Whether the data is held as deferred chunks
    pub fn is_lazy(&self) -> bool {
        matches!(self.data, SignalData::Lazy(_))
    }

    /// Index of the current trace
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Select the current trace
    pub fn set_current_index(&mut self, index: usize) -> Result<()> {
        if index >= self.n_traces() {
            return Err(VoigtError::InvalidInput(format!(
                "Trace index {} out of range for {} traces",
                index,
                self.n_traces()
            )));
        }
        self.current = index;
        Ok(())
    }

    /// The underlying storage
    pub fn data(&self) -> &SignalData {
        &self.data
    }

    /// Convert to lazy storage with one chunk per trace
    pub fn as_lazy(&self) -> Result<Self> {
        self.as_lazy_with_chunks((1, self.n_channels().max(1)))
    }

    /// Convert to lazy storage with the given chunk shape
    ///
    /// A signal that is already lazy is returned unchanged.
    pub fn as_lazy_with_chunks(&self, chunk_shape: (usize, usize)) -> Result<Self> {
        let data = match &self.data {
            SignalData::Eager(data) => {
                SignalData::Lazy(LazyData::from_array(data.clone(), chunk_shape)?)
            }
            SignalData::Lazy(lazy) => SignalData::Lazy(lazy.clone()),
        };

        Ok(Self {
            data,
            axis: self.axis.clone(),
            binned: self.binned,
            current: self.current,
        })
    }

    /// The whole data as an in-memory array
    pub fn compute(&self) -> Result<Array2<f64>> {
        match &self.data {
            SignalData::Eager(data) => Ok(data.clone()),
            SignalData::Lazy(lazy) => lazy.compute(),
        }
    }

    /// The current trace as an in-memory array
    pub fn current_trace(&self) -> Result<Array1<f64>> {
        let slice = self.materialize_slice(self.current..self.current + 1, 0..self.n_channels())?;
        Ok(slice.index_axis_move(Axis(0), 0))
    }

    /// Bring a slice of traces and channels into memory
    ///
    /// Lazy signals compute only the chunks covering the slice.
    pub fn materialize_slice(&self, traces: Range<usize>, channels: Range<usize>) -> Result<Array2<f64>> {
        match &self.data {
            SignalData::Eager(data) => {
                let (n_traces, n_channels) = data.dim();
                if traces.start > traces.end
                    || traces.end > n_traces
                    || channels.start > channels.end
                    || channels.end > n_channels
                {
                    return Err(VoigtError::InvalidInput(format!(
                        "Slice [{:?}, {:?}] is outside data of shape {:?}",
                        traces,
                        channels,
                        data.dim()
                    )));
                }
                Ok(data.slice(s![traces, channels]).to_owned())
            }
            SignalData::Lazy(lazy) => lazy.materialize(traces, channels),
        }
    }
}

/// Stack signals along a new trace axis
///
/// All inputs must share the same axis and `binned` flag. If any input is
/// lazy the result is lazy and nothing is computed.
///
/// # Examples
///
/// ```
/// use ndarray::Array1;
/// use voigt_rs::signal::{stack, DataAxis, Signal1D};
///
/// let axis = DataAxis::new(3, 1.0, 0.0).unwrap();
/// let s = Signal1D::new(Array1::from_vec(vec![0.0, 1.0, 0.0]), axis).unwrap();
/// let stacked = stack(&[s.clone(), s.clone(), s]).unwrap();
/// assert_eq!(stacked.n_traces(), 3);
/// ```
pub fn stack(signals: &[Signal1D]) -> Result<Signal1D> {
    let first = signals
        .first()
        .ok_or_else(|| VoigtError::InvalidInput("Cannot stack an empty list of signals".to_string()))?;

    for signal in &signals[1..] {
        if signal.axis != first.axis {
            return Err(VoigtError::DimensionMismatch(
                "Stacked signals must share the same axis".to_string(),
            ));
        }
        if signal.binned != first.binned {
            return Err(VoigtError::InvalidInput(
                "Stacked signals must agree on being binned".to_string(),
            ));
        }
    }

    let data = if signals.iter().any(|s| s.is_lazy()) {
        let parts = signals
            .iter()
            .map(|s| match &s.data {
                SignalData::Lazy(lazy) => Ok(lazy.clone()),
                SignalData::Eager(data) => {
                    LazyData::from_array(data.clone(), (1, data.ncols().max(1)))
                }
            })
            .collect::<Result<Vec<_>>>()?;
        SignalData::Lazy(LazyData::stack(&parts)?)
    } else {
        let views: Vec<_> = signals
            .iter()
            .filter_map(|s| match &s.data {
                SignalData::Eager(data) => Some(data.view()),
                SignalData::Lazy(_) => None,
            })
            .collect();
        let data = ndarray::concatenate(Axis(0), &views)
            .map_err(|e| VoigtError::DimensionMismatch(format!("Cannot stack signals: {}", e)))?;
        SignalData::Eager(data)
    };

    Signal1D::with_data(data, first.axis.clone()).map(|s| s.with_binned(first.binned))
}
