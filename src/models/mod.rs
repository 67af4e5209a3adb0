//! Built-in spectral components.
//!
//! This module provides the Voigt peak component in its two
//! parameterizations, and the Faddeeva function it is evaluated with.

pub mod faddeeva;
mod voigt;

// Re-export the components
pub use voigt::{Parameterization, PesOptions, Voigt, VoigtBuilder};

/// Create a Voigt component
///
/// # Arguments
///
/// * `legacy` - Use the deprecated `FWHM`/`gamma` naming
///
/// # Returns
///
/// * A Voigt component with default parameter values
pub fn voigt_model(legacy: bool) -> Voigt {
    Voigt::new(legacy)
}

/// Create a photoemission Voigt component
///
/// # Returns
///
/// * A Voigt component with `FWHM`, `gamma` and the photoemission parameters
pub fn pes_voigt_model() -> Voigt {
    Voigt::pes()
}
