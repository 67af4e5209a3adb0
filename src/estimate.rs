//! Initial parameter estimation from observed peaks.
//!
//! The estimators here look at a window of a signal and return a
//! [`PeakEstimate`] per trace: the peak centre, its full width at half
//! maximum, its area and its height. Components turn these into parameter
//! values; see [`crate::model::Component::estimate_parameters`].
//!
//! Two strategies are available:
//!
//! - [`EstimationStrategy::HalfMaximum`] (default): centre at the maximum,
//!   refined by a three point parabola; width from the interpolated
//!   half-maximum crossings; area by the trapezoidal rule.
//! - [`EstimationStrategy::Moments`]: centre and width from the first and
//!   second intensity-weighted moments of the window.

use crate::signal::Signal1D;
use ndarray::{Array1, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ratio between the FWHM and the standard deviation of a Gaussian, `2 sqrt(2 ln 2)`
pub const SIGMA2FWHM: f64 = 2.3548200450309493;

/// How widths and centres are estimated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimationStrategy {
    /// Maximum, half-maximum crossings and trapezoidal area
    HalfMaximum,

    /// Intensity-weighted centroid and second moment
    Moments,
}

impl Default for EstimationStrategy {
    fn default() -> Self {
        EstimationStrategy::HalfMaximum
    }
}

/// Configuration options for parameter estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Strategy for the centre and width. Default: HalfMaximum
    pub strategy: EstimationStrategy,

    /// Refine the sampled maximum with a parabola through its neighbours. Default: true
    pub refine_centre: bool,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            strategy: EstimationStrategy::default(),
            refine_centre: true,
        }
    }
}

/// Reasons an estimation gives up
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimationFailure {
    #[error("the window [{start:?}, {end:?}] holds no samples")]
    EmptyWindow {
        start: Option<f64>,
        end: Option<f64>,
    },

    #[error("the signal has no traces")]
    NoTraces,

    #[error("no finite sample in the window")]
    NoFiniteMaximum,

    #[error("peak height {height} is not positive")]
    NonPositivePeak { height: f64 },

    #[error("width estimate {width} is not usable")]
    DegenerateWidth { width: f64 },

    #[error("trace {index}: {reason}")]
    Trace { index: usize, reason: Box<EstimationFailure> },

    #[error("could not materialize the window: {0}")]
    Materialization(String),
}

/// Peak properties estimated from one trace
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakEstimate {
    /// Peak position
    pub centre: f64,

    /// Full width at half maximum
    pub fwhm: f64,

    /// Integrated intensity, per unit of the axis
    pub area: f64,

    /// Largest sample
    pub height: f64,
}

/// Index and value of the largest finite sample
pub fn find_peak(y: ArrayView1<f64>) -> Option<(usize, f64)> {
    y.iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .fold(None, |best, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
}

/// Vertex offset, in samples, of the parabola through three equally spaced points
///
/// `None` unless the parabola opens downwards and the vertex lies within
/// one sample of the middle point.
pub fn parabolic_offset(fm: f64, f0: f64, fp: f64) -> Option<f64> {
    let denom = fm - 2.0 * f0 + fp;
    if !(denom < 0.0) {
        return None;
    }

    let dx = 0.5 * (fm - fp) / denom;
    (dx.is_finite() && dx.abs() <= 1.0).then_some(dx)
}

fn refined_centre(x: ArrayView1<f64>, y: ArrayView1<f64>, im: usize) -> f64 {
    if im == 0 || im + 1 >= y.len() {
        return x[im];
    }

    let (fm, f0, fp) = (y[im - 1], y[im], y[im + 1]);
    if !(fm.is_finite() && fp.is_finite()) {
        return x[im];
    }

    match parabolic_offset(fm, f0, fp) {
        Some(dx) => x[im] + dx * (x[im + 1] - x[im - 1]) / 2.0,
        None => x[im],
    }
}

/// Full width at half maximum around the sample `im`
///
/// Walks outwards from `im` to the first sample at or below `half` on each
/// side and interpolates linearly between it and its inner neighbour. A side
/// without a crossing mirrors the other; without any crossing the width is a
/// fifth of the window span.
pub fn half_maximum_width(x: ArrayView1<f64>, y: ArrayView1<f64>, im: usize, half: f64) -> f64 {
    let n = y.len();
    if !(y[im] > half) {
        return 0.0;
    }

    let mut j = im;
    while j > 0 && y[j] > half {
        j -= 1;
    }
    let left = (!(y[j] > half)).then(|| {
        if y[j].is_finite() && y[j + 1] != y[j] {
            x[j] + (half - y[j]) * (x[j + 1] - x[j]) / (y[j + 1] - y[j])
        } else {
            x[j]
        }
    });

    let mut j = im;
    while j + 1 < n && y[j] > half {
        j += 1;
    }
    let right = (!(y[j] > half)).then(|| {
        if y[j].is_finite() && y[j - 1] != y[j] {
            x[j] - (half - y[j]) * (x[j] - x[j - 1]) / (y[j - 1] - y[j])
        } else {
            x[j]
        }
    });

    match (left, right) {
        (Some(l), Some(r)) => (r - l).abs(),
        (Some(l), None) => 2.0 * (x[im] - l).abs(),
        (None, Some(r)) => 2.0 * (r - x[im]).abs(),
        (None, None) => (x[n - 1] - x[0]).abs() / 5.0,
    }
}

/// Trapezoidal integral, skipping intervals with a non-finite end point
pub fn trapezoid(x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
    x.windows(2)
        .into_iter()
        .zip(y.windows(2))
        .filter(|(_, yy)| yy[0].is_finite() && yy[1].is_finite())
        .map(|(xx, yy)| (xx[1] - xx[0]).abs() * (yy[0] + yy[1]) / 2.0)
        .sum()
}

/// Intensity-weighted centroid and standard deviation
///
/// Non-finite samples are ignored. `None` when the finite samples do not
/// sum to a positive value.
pub fn moments(x: ArrayView1<f64>, y: ArrayView1<f64>) -> Option<(f64, f64)> {
    let finite = || x.iter().zip(y.iter()).filter(|(_, v)| v.is_finite());

    let total: f64 = finite().map(|(_, &v)| v).sum();
    if !(total > 0.0) {
        return None;
    }

    let centroid = finite().map(|(&xi, &v)| xi * v).sum::<f64>() / total;
    let m2 = finite()
        .map(|(&xi, &v)| (xi - centroid).powi(2) * v)
        .sum::<f64>()
        / total;

    Some((centroid, m2.abs().sqrt()))
}

/// Estimate the peak in one trace
///
/// # Arguments
///
/// * `x` - Axis coordinates of the window
/// * `y` - Samples of the window
/// * `bin_width` - Divides the area when `Some`, for binned signals. Its
///   magnitude is used, so descending axes give the same positive area and
///   `function * |scale|` reproduces binned data.
/// * `config` - Estimation options
pub fn estimate_peak(
    x: ArrayView1<f64>,
    y: ArrayView1<f64>,
    bin_width: Option<f64>,
    config: &EstimatorConfig,
) -> Result<PeakEstimate, EstimationFailure> {
    let (im, height) = find_peak(y).ok_or(EstimationFailure::NoFiniteMaximum)?;
    if !(height > 0.0) {
        return Err(EstimationFailure::NonPositivePeak { height });
    }

    let (centre, fwhm) = match config.strategy {
        EstimationStrategy::HalfMaximum => {
            let centre = if config.refine_centre {
                refined_centre(x, y, im)
            } else {
                x[im]
            };
            (centre, half_maximum_width(x, y, im, height / 2.0))
        }
        EstimationStrategy::Moments => {
            let (centroid, sigma) =
                moments(x, y).ok_or(EstimationFailure::NonPositivePeak { height })?;
            (centroid, sigma * SIGMA2FWHM)
        }
    };

    if !(fwhm.is_finite() && fwhm > 0.0) {
        return Err(EstimationFailure::DegenerateWidth { width: fwhm });
    }

    let mut area = trapezoid(x, y);
    if let Some(width) = bin_width {
        area /= width.abs();
    }

    Ok(PeakEstimate {
        centre,
        fwhm,
        area,
        height,
    })
}

/// Estimate the peak of each selected trace within `[start, end]`
///
/// With `only_current` only the current trace is estimated, otherwise every
/// trace in order. Lazy signals materialize just the window of the selected
/// traces. Any failing trace fails the whole estimation.
pub fn estimate_signal(
    signal: &Signal1D,
    start: Option<f64>,
    end: Option<f64>,
    only_current: bool,
    config: &EstimatorConfig,
) -> Result<Vec<PeakEstimate>, EstimationFailure> {
    let axis = signal.axis();
    let window = axis.value_range_to_indices(start, end);
    if window.is_empty() {
        return Err(EstimationFailure::EmptyWindow { start, end });
    }

    let traces = if only_current {
        let current = signal.current_index();
        current..current + 1
    } else {
        0..signal.n_traces()
    };
    if traces.is_empty() {
        return Err(EstimationFailure::NoTraces);
    }

    let x: Array1<f64> = window.clone().map(|i| axis.value(i)).collect();
    let data = signal
        .materialize_slice(traces.clone(), window.clone())
        .map_err(|e| EstimationFailure::Materialization(e.to_string()))?;

    let bin_width = signal.binned().then_some(axis.scale);

    let estimates = data
        .axis_iter(Axis(0))
        .zip(traces)
        .map(|(row, index)| {
            estimate_peak(x.view(), row, bin_width, config).map_err(|reason| {
                EstimationFailure::Trace {
                    index,
                    reason: Box::new(reason),
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!(
        "estimated {} trace(s) over channels {:?}{}",
        estimates.len(),
        window,
        if signal.binned() { " (binned)" } else { "" }
    );

    Ok(estimates)
}

/// Standard deviation of a Gaussian from its FWHM
pub fn fwhm_to_sigma(fwhm: f64) -> f64 {
    fwhm / SIGMA2FWHM
}

/// FWHM of a Gaussian from its standard deviation
pub fn sigma_to_fwhm(sigma: f64) -> f64 {
    sigma * SIGMA2FWHM
}
