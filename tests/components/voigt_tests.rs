//! Tests for the width-pair Voigt component

use crate::test_helpers::{array_approx_eq, voigt};
use approx::assert_relative_eq;
use ndarray::Array1;
use voigt_rs::model::Component;
use voigt_rs::models::{Parameterization, Voigt};
use voigt_rs::VoigtError;

#[test]
fn test_function() {
    let mut g = Voigt::new(false);
    g.set_area(5.0).unwrap();
    g.set_value("gwidth", 0.5).unwrap();
    g.set_value("lwidth", 0.2).unwrap();
    g.set_centre(1.0).unwrap();

    assert_relative_eq!(g.function(0.0).unwrap(), 0.35380168, max_relative = 1e-7);
    assert_relative_eq!(g.function(1.0).unwrap(), 5.06863535, max_relative = 1e-7);
}

#[test]
fn test_function_array_matches_scalar_calls() {
    let g = voigt(1.0, 5.0, 0.5, 0.2);
    let x = Array1::linspace(-2.0, 4.0, 25);
    let y = g.function_array(&x).unwrap();
    let scalar: Array1<f64> = x.iter().map(|&v| g.function(v).unwrap()).collect();
    assert!(array_approx_eq(&y, &scalar, 1e-15));
}

#[test]
fn test_defaults_evaluate() {
    // A fresh component evaluates with its default values
    let g = Voigt::new(false);
    assert_eq!(g.area().unwrap(), 1.0);
    assert_eq!(g.centre().unwrap(), 0.0);
    assert_eq!(g.gaussian_width().unwrap(), 1.0);
    assert_eq!(g.lorentzian_width().unwrap(), 0.2);
    assert!(g.function(0.0).unwrap() > g.function(1.0).unwrap());
}

#[test]
fn test_util_gamma_set() {
    let mut g = Voigt::new(false);
    g.set_gamma(3.0).unwrap();
    assert_relative_eq!(g.value("lwidth").unwrap(), g.gamma().unwrap());
}

#[test]
fn test_util_gamma_get() {
    let mut g = Voigt::new(false);
    g.set_value("lwidth", 3.0).unwrap();
    assert_relative_eq!(g.value("lwidth").unwrap(), g.gamma().unwrap());
}

#[test]
fn test_util_gamma_getset() {
    let mut g = Voigt::new(false);
    g.set_gamma(3.0).unwrap();
    assert_relative_eq!(g.gamma().unwrap(), 3.0);
}

#[test]
fn test_util_sigma_set() {
    let mut g = Voigt::new(false);
    g.set_sigma(1.0).unwrap();
    assert_relative_eq!(
        g.value("gwidth").unwrap(),
        2.0 * (2.0 * 2f64.ln()).sqrt(),
        max_relative = 1e-12
    );
}

#[test]
fn test_util_sigma_get() {
    let mut g = Voigt::new(false);
    g.set_value("gwidth", 1.0).unwrap();
    assert_relative_eq!(
        g.sigma().unwrap(),
        1.0 / (2.0 * (2.0 * 2f64.ln()).sqrt()),
        max_relative = 1e-12
    );
}

#[test]
fn test_util_sigma_getset() {
    let mut g = Voigt::new(false);
    g.set_sigma(1.0).unwrap();
    assert_relative_eq!(g.sigma().unwrap(), 1.0, max_relative = 1e-12);
}

#[test]
fn test_unimodal_for_many_shapes() {
    for &(gwidth, lwidth) in &[(0.5, 0.2), (2.0, 0.0), (0.0, 0.7), (0.1, 3.0)] {
        let g = voigt(-1.5, 2.0, gwidth, lwidth);
        let peak = g.function(-1.5).unwrap();
        for &x in &[-40.0, -10.0, -3.0, -1.6, -1.4, 0.0, 4.0, 25.0] {
            assert!(
                g.function(x).unwrap() <= peak,
                "f({}) above the peak for gwidth={}, lwidth={}",
                x,
                gwidth,
                lwidth
            );
        }
    }
}

#[test]
fn test_unknown_parameterization() {
    match Voigt::with_parameterization("pseudo_voigt") {
        Err(VoigtError::Configuration(msg)) => assert!(msg.contains("pseudo_voigt")),
        other => panic!("expected a configuration error, got {:?}", other),
    }

    let g = Voigt::with_parameterization("Width_Pair").unwrap();
    assert_eq!(g.parameterization(), Parameterization::WidthPair);
}

#[test]
fn test_builder_rejects_negative_widths() {
    assert!(Voigt::builder().gwidth(-0.5).build().is_err());

    let g = Voigt::builder().legacy(true).gwidth(0.8).build().unwrap();
    assert_eq!(g.parameterization(), Parameterization::FwhmGamma);
    assert_eq!(g.value("FWHM").unwrap(), 0.8);
}

#[test]
fn test_json_file_round_trip() {
    let mut g = voigt(1.0, 5.0, 0.5, 0.2);
    g.parameters_mut()
        .get_mut("centre")
        .unwrap()
        .set_map(vec![0.9, 1.1])
        .unwrap();

    let path = std::env::temp_dir().join(format!("voigt_rs_component_{}.json", std::process::id()));
    g.save_json(&path).unwrap();
    let loaded = Voigt::load_json(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.parameter_names(), g.parameter_names());
    assert_eq!(loaded.n_traces().unwrap(), 2);
    let x = Array1::linspace(-1.0, 3.0, 9);
    assert_eq!(loaded.function_nd(&x).unwrap(), g.function_nd(&x).unwrap());
}
