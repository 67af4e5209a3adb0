//! Tests for the Signal1D container

use crate::test_helpers::{reference_axis, spectrum, voigt};
use ndarray::{Array1, Array2};
use voigt_rs::signal::{stack, DataAxis, Signal1D, SignalData};

#[test]
fn test_window_selection_on_reference_axis() {
    let axis = reference_axis();

    assert_eq!(axis.value_range_to_indices(None, None), 0..200);
    assert_eq!(
        axis.value_range_to_indices(Some(axis.low_value()), Some(axis.high_value())),
        0..200
    );
    // Coordinates 0.0..=2.0 are samples 100..=140
    assert_eq!(axis.value_range_to_indices(Some(0.0), Some(2.0)), 100..141);
    assert_eq!(axis.value_range_to_indices(Some(0.0), None), 100..200);
    assert_eq!(axis.value_range_to_indices(None, Some(-4.0)), 0..21);
}

#[test]
fn test_stack_of_spectra() {
    let axis = reference_axis();
    let s = spectrum(&voigt(1.0, 5.0, 0.5, 0.0), &axis, true);

    let stacked = stack(&[s.clone(), s.clone(), s]).unwrap();
    assert_eq!(stacked.n_traces(), 3);
    assert_eq!(stacked.n_channels(), 200);
    assert!(stacked.binned());
    assert!(matches!(stacked.data(), SignalData::Eager(_)));

    let data = stacked.compute().unwrap();
    assert_eq!(data.row(0), data.row(2));
}

#[test]
fn test_set_binned() {
    let axis = reference_axis();
    let mut s = spectrum(&voigt(1.0, 5.0, 0.5, 0.0), &axis, false);
    assert!(!s.binned());

    s.set_binned(true);
    assert!(s.binned());
    assert!(s.as_lazy().unwrap().binned());

    // Stacks need matching flags
    let plain = spectrum(&voigt(1.0, 5.0, 0.5, 0.0), &axis, false);
    assert!(stack(&[s.clone(), plain]).is_err());

    s.set_binned(false);
    assert!(!s.binned());
}

#[test]
fn test_as_lazy_keeps_metadata() {
    let axis = reference_axis();
    let mut s = stack(&[
        spectrum(&voigt(0.0, 1.0, 0.5, 0.1), &axis, true),
        spectrum(&voigt(1.0, 1.0, 0.5, 0.1), &axis, true),
    ])
    .unwrap();
    s.set_current_index(1).unwrap();

    let lazy = s.as_lazy().unwrap();
    assert!(lazy.is_lazy());
    assert!(lazy.binned());
    assert_eq!(lazy.current_index(), 1);
    assert_eq!(lazy.axis(), s.axis());
    assert_eq!(lazy.current_trace().unwrap(), s.current_trace().unwrap());

    // The eager source is untouched
    assert!(!s.is_lazy());
}

#[test]
fn test_out_of_range_slices() {
    let axis = DataAxis::new(4, 1.0, 0.0).unwrap();
    let s = Signal1D::from_stack(Array2::zeros((2, 4)), axis).unwrap();

    assert!(s.materialize_slice(0..3, 0..4).is_err());
    assert!(s.materialize_slice(0..1, 2..5).is_err());
    assert!(s.as_lazy().unwrap().materialize_slice(0..3, 0..4).is_err());

    let empty = s.materialize_slice(1..1, 0..4).unwrap();
    assert_eq!(empty.dim(), (0, 4));
}

#[test]
fn test_axis_serde() {
    let axis = DataAxis::new(10, -0.1, 2.0)
        .unwrap()
        .with_name("Binding energy", Some("eV"));
    let json = serde_json::to_string(&axis).unwrap();
    let back: DataAxis = serde_json::from_str(&json).unwrap();
    assert_eq!(back, axis);

    let x: Array1<f64> = back.axis();
    assert_eq!(x[0], 2.0);
}
