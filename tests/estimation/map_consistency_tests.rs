//! Parameter maps stay consistent with the estimated signal

use approx::assert_relative_eq;
use ndarray::Array2;
use voigt_rs::model::Component;
use voigt_rs::models::Voigt;
use voigt_rs::signal::{DataAxis, Signal1D};

use crate::test_helpers::{init_logging, reference_axis, voigt};

fn stack_of(axis: &DataAxis, centres: &[f64]) -> Signal1D {
    let x = axis.axis();
    let mut data = Array2::zeros((centres.len(), axis.size));
    for (mut row, &c) in data.rows_mut().into_iter().zip(centres.iter()) {
        row.assign(&voigt(c, 5.0, 0.5, 0.0).function_array(&x).unwrap());
    }
    Signal1D::from_stack(data, axis.clone()).unwrap()
}

#[test]
fn test_stacked_estimate_drops_foreign_maps() {
    init_logging();
    let axis = reference_axis();
    let s = stack_of(&axis, &[1.0, 1.0]);

    let mut g = Voigt::new(false);
    g.parameters_mut()
        .get_mut("lwidth")
        .unwrap()
        .set_map(vec![0.1, 0.2, 0.3])
        .unwrap();

    assert!(g.estimate_parameters(&s, None, None, false));
    assert_eq!(g.n_traces().unwrap(), 2);
    assert!(g.parameter("lwidth").unwrap().map().is_none());

    let rows = g.function_nd(&axis.axis()).unwrap();
    assert_eq!(rows.dim(), (2, axis.size));
}

#[test]
fn test_stacked_estimate_keeps_matching_maps() {
    init_logging();
    let axis = reference_axis();
    let s = stack_of(&axis, &[0.0, 1.0]);

    let mut g = Voigt::new(false);
    g.parameters_mut()
        .get_mut("lwidth")
        .unwrap()
        .set_map(vec![0.1, 0.3])
        .unwrap();

    assert!(g.estimate_parameters(&s, None, None, false));
    assert_eq!(g.parameter("lwidth").unwrap().map(), Some(&[0.1, 0.3][..]));
    assert_eq!(g.n_traces().unwrap(), 2);
}

#[test]
fn test_current_estimate_on_resized_stack() {
    init_logging();
    let axis = reference_axis();

    let mut g = Voigt::new(false);
    assert!(g.estimate_parameters(&stack_of(&axis, &[1.0, 1.0]), None, None, false));
    assert_eq!(g.n_traces().unwrap(), 2);

    let mut s = stack_of(&axis, &[-1.0, -1.0, -1.0]);
    s.set_current_index(2).unwrap();
    assert!(g.estimate_parameters(&s, None, None, true));

    // The two-trace maps no longer apply; the scalars describe every trace
    assert_relative_eq!(g.centre().unwrap(), -1.0, epsilon = 1e-9);
    assert!(g.parameter("centre").unwrap().map().is_none());
    assert_eq!(g.n_traces().unwrap(), 1);

    let x = axis.axis();
    let rows = g.function_nd(&x).unwrap();
    assert_eq!(rows.row(0).to_owned(), g.function_array(&x).unwrap());
}
