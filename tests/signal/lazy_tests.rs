//! Tests for chunked lazy data

use crate::test_helpers::{reference_axis, voigt};
use ndarray::{Array1, Array2};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use voigt_rs::model::Component;
use voigt_rs::signal::{stack, LazyData, Signal1D};
use voigt_rs::VoigtError;

#[test]
fn test_lazy_spectra_are_generated_on_demand() {
    let axis = reference_axis();
    let truth = voigt(1.0, 5.0, 0.5, 0.001);
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    let gen_axis = axis.clone();
    let lazy = LazyData::from_fn((3, 200), (1, 50), move |rows, cols| {
        counter.fetch_add(1, Ordering::SeqCst);
        let x: Array1<f64> = cols.clone().map(|i| gen_axis.value(i)).collect();
        let y = truth.function_array(&x)?;
        Ok(Array2::from_shape_fn((rows.len(), cols.len()), |(_, c)| y[c]))
    })
    .unwrap();

    let signal = Signal1D::from_lazy(lazy, axis).unwrap();
    assert_eq!(signal.n_traces(), 3);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    // Channels 100..141 of one trace live in a single chunk
    let window = signal.materialize_slice(1..2, 100..141).unwrap();
    assert_eq!(window.dim(), (1, 41));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_failing_chunk_surfaces_on_materialize() {
    let axis = reference_axis();
    let lazy = LazyData::from_fn((1, 200), (1, 100), |_, cols| {
        if cols.start >= 100 {
            Err(VoigtError::Materialization("detector offline".to_string()))
        } else {
            Ok(Array2::zeros((1, cols.len())))
        }
    })
    .unwrap();
    let signal = Signal1D::from_lazy(lazy, axis).unwrap();

    assert!(signal.materialize_slice(0..1, 0..100).is_ok());
    assert!(matches!(
        signal.materialize_slice(0..1, 50..150),
        Err(VoigtError::Materialization(_))
    ));
}

#[test]
fn test_stacking_lazy_signals_defers_work() {
    let axis = reference_axis();
    let calls = Arc::new(AtomicUsize::new(0));

    let make = |value: f64| {
        let counter = Arc::clone(&calls);
        let lazy = LazyData::from_fn((1, 200), (1, 200), move |rows, cols| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Array2::from_elem((rows.len(), cols.len()), value))
        })
        .unwrap();
        Signal1D::from_lazy(lazy, axis.clone()).unwrap()
    };

    let stacked = stack(&[make(1.0), make(2.0), make(3.0)]).unwrap();
    assert!(stacked.is_lazy());
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let row = stacked.materialize_slice(2..3, 0..200).unwrap();
    assert_eq!(row[[0, 0]], 3.0);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
