//! # voigt-rs
//!
//! `voigt-rs` provides a Voigt peak-shape component for spectral signals,
//! the building block of peak fitting in photoemission, Raman and electron
//! energy-loss spectroscopy.
//!
//! The library provides:
//! - Exact evaluation of the Voigt profile through the Faddeeva function
//! - Two parameterizations: `gwidth`/`lwidth` and the photoemission
//!   `FWHM`/`gamma` naming with instrument terms
//! - Estimation of initial parameter values from single spectra, stacks of
//!   spectra and lazily computed data, for binned and unbinned signals
//! - A parameter system with bounds and per-trace value maps
//! - Reading and writing of saved models in the older layout (feature `legacy`)
//!
//! ## Basic Usage
//!
//! ```
//! use ndarray::Array1;
//! use voigt_rs::model::Component;
//! use voigt_rs::models::Voigt;
//! use voigt_rs::signal::{DataAxis, Signal1D};
//!
//! // Synthetic spectrum of a known peak
//! let axis = DataAxis::new(200, 0.05, -5.0).unwrap();
//! let truth = Voigt::builder()
//!     .centre(1.0)
//!     .area(5.0)
//!     .gwidth(0.5)
//!     .lwidth(0.001)
//!     .build()
//!     .unwrap();
//! let data: Array1<f64> = truth.function_array(&axis.axis()).unwrap();
//! let signal = Signal1D::new(data, axis).unwrap();
//!
//! // Recover the parameters
//! let mut voigt = Voigt::new(false);
//! assert!(voigt.estimate_parameters(&signal, None, None, true));
//! assert!((voigt.centre().unwrap() - 1.0).abs() < 1e-3);
//! assert!((voigt.area().unwrap() - 5.0).abs() < 0.2);
//! ```

// Public modules
pub mod error;

// Parameter system
pub mod parameters;

pub mod signal;

pub mod estimate;

pub mod model;

pub mod models;

#[cfg(feature = "legacy")]
pub mod legacy;

// Re-exports for convenience
pub use error::{Result, VoigtError};
pub use estimate::{EstimationStrategy, EstimatorConfig};
pub use model::Component;
pub use models::{Parameterization, Voigt};

#[cfg(feature = "legacy")]
pub use legacy::LegacyAdapter;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
