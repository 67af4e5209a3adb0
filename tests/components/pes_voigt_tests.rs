//! Tests for the photoemission (FWHM/gamma) parameterization

use approx::assert_relative_eq;
use ndarray::Array1;
use voigt_rs::model::Component;
use voigt_rs::models::{pes_voigt_model, Parameterization, Voigt};

fn reference() -> Voigt {
    let mut g = pes_voigt_model();
    g.set_area(5.0).unwrap();
    g.set_value("FWHM", 0.5).unwrap();
    g.set_value("gamma", 0.2).unwrap();
    g.set_centre(1.0).unwrap();
    g
}

#[test]
fn test_function() {
    let g = reference();
    assert_relative_eq!(g.function(0.0).unwrap(), 0.35380168, max_relative = 1e-7);
    assert_relative_eq!(g.function(1.0).unwrap(), 5.06863535, max_relative = 1e-7);
}

#[test]
fn test_defaults() {
    let g = Voigt::pes();
    assert_eq!(g.parameterization(), Parameterization::FwhmGamma);
    assert_eq!(g.value("FWHM").unwrap(), 1.0);
    assert_eq!(g.value("gamma").unwrap(), 0.0);
    assert_eq!(g.value("transmission_function").unwrap(), 1.0);
    assert!(!g.parameter("resolution").unwrap().vary());

    let pes = g.pes_options().unwrap();
    assert!(!pes.spin_orbit_splitting);
    assert_eq!(pes.spin_orbit_branching_ratio, 0.5);
    assert_eq!(pes.spin_orbit_splitting_energy, 0.61);
}

#[test]
fn test_sigma_and_gamma_follow_fwhm_naming() {
    let mut g = Voigt::pes();
    g.set_sigma(1.0).unwrap();
    assert_relative_eq!(g.value("FWHM").unwrap(), 2.3548200450309493, max_relative = 1e-12);

    g.set_gamma(0.4).unwrap();
    assert_eq!(g.value("gamma").unwrap(), 0.4);
    assert_eq!(g.lorentzian_width().unwrap(), 0.4);
}

#[test]
fn test_doublet_area() {
    let mut g = reference();
    g.set_value("gamma", 0.0).unwrap();
    g.pes_options_mut().unwrap().spin_orbit_splitting = true;

    // Both lines lie well inside the axis, so the integral is area * (1 + ratio)
    let x = Array1::linspace(-4.0, 6.0, 4001);
    let y = g.function_array(&x).unwrap();
    let h = x[1] - x[0];
    let integral: f64 = y.iter().sum::<f64>() * h;
    assert_relative_eq!(integral, 5.0 * 1.5, max_relative = 1e-6);
}

#[test]
fn test_shirley_background_is_a_step() {
    let mut g = reference();
    g.pes_options_mut().unwrap().shirley_background = true;
    g.set_value("shirley_background", 0.01).unwrap();

    let x = Array1::linspace(-4.0, 6.0, 201);
    let y = g.function_array(&x).unwrap();

    // Far below the peak the background carries the full integral, at the end nothing
    assert!(y[0] > 0.01 * 5.0 / (x[1] - x[0]) * 0.9);
    assert_relative_eq!(y[200], reference().function(6.0).unwrap(), max_relative = 1e-12);
}
