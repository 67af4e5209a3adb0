//! # Signals
//!
//! The minimal signal containers a peak component consumes: a uniform
//! [`DataAxis`], the [`Signal1D`] holding one or many traces, and
//! [`LazyData`] for chunked data computed on demand.
//!
//! ```rust
//! use ndarray::Array1;
//! use voigt_rs::signal::{DataAxis, Signal1D};
//!
//! let axis = DataAxis::new(4, 0.5, 10.0).unwrap();
//! let signal = Signal1D::new(Array1::from_vec(vec![1.0, 2.0, 3.0, 4.0]), axis)
//!     .unwrap()
//!     .with_binned(true);
//!
//! let lazy = signal.as_lazy().unwrap();
//! assert!(lazy.is_lazy());
//! assert_eq!(lazy.current_trace().unwrap()[2], 3.0);
//! ```

pub mod axis;
pub mod lazy;
pub mod signal;

pub use axis::DataAxis;
pub use lazy::{ChunkFn, LazyData};
pub use signal::{stack, Signal1D, SignalData};
