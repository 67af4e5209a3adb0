//! # Parameter System
//!
//! Named parameters for peak components: values with bounds, a `vary` flag
//! and optional per-trace maps.
//!
//! ## Core Components
//!
//! - [`Parameter`]: a named value with bounds, a `vary` flag, a default value
//!   and an optional per-trace map
//! - [`Parameters`]: an ordered collection of parameters with JSON support
//! - [`Bounds`]: min/max limits of a parameter
//!
//! ## Example Usage
//!
//! ```rust
//! use voigt_rs::parameters::Parameters;
//!
//! let mut params = Parameters::new();
//! params.add_param("area", 1.0).unwrap();
//! params.add_param_with_bounds("gwidth", 0.5, 0.0, f64::INFINITY).unwrap();
//!
//! // Widths cannot go negative
//! assert!(params.get_mut("gwidth").unwrap().set_value(-1.0).is_err());
//!
//! // One value per trace after a stacked estimation
//! params.get_mut("area").unwrap().set_map(vec![1.0, 2.0, 3.0]).unwrap();
//! assert_eq!(params.map_len().unwrap(), Some(3));
//! ```

pub mod bounds;
pub mod parameter;
pub mod parameters;

// Re-export key types
pub use bounds::{Bounds, BoundsError};
pub use parameter::{Parameter, ParameterError};
pub use parameters::{Parameters, SerializationError};
