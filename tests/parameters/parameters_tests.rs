//! Integration tests for the Parameters collection

use voigt_rs::parameters::{Parameter, Parameters};

#[test]
fn test_collection_keeps_declaration_order() {
    let mut params = Parameters::new();
    params.add_param("area", 1.0).unwrap();
    params.add_param("centre", 0.0).unwrap();
    params.add(Parameter::non_negative("FWHM", 1.0)).unwrap();
    params.add(Parameter::non_negative("gamma", 0.0)).unwrap();
    params.add(Parameter::fixed("resolution", 0.0)).unwrap();

    assert_eq!(params.names(), vec!["area", "centre", "FWHM", "gamma", "resolution"]);
    assert_eq!(params.varying().len(), 4);
    assert!(params.add_param("area", 2.0).is_err());
}

#[test]
fn test_maps_must_agree() {
    let mut params: Parameters = vec![Parameter::new("area", 1.0), Parameter::new("centre", 0.0)]
        .into_iter()
        .collect();

    params.get_mut("area").unwrap().set_map(vec![1.0, 2.0]).unwrap();
    assert_eq!(params.map_len().unwrap(), Some(2));

    params.get_mut("centre").unwrap().set_map(vec![0.0]).unwrap();
    assert!(params.map_len().is_err());
}

#[test]
fn test_json_file_round_trip() {
    let mut params = Parameters::new();
    params.add_param("area", 5.0).unwrap();
    params
        .add_param_with_bounds("gwidth", 0.5, 0.0, f64::INFINITY)
        .unwrap();
    params.get_mut("area").unwrap().set_map(vec![4.5, 5.5]).unwrap();

    let path = std::env::temp_dir().join(format!("voigt_rs_params_{}.json", std::process::id()));
    params.save_json(&path).unwrap();
    let loaded = Parameters::load_json(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.names(), params.names());
    assert_eq!(loaded.get("gwidth").unwrap().min(), 0.0);
    assert_eq!(loaded.get("area").unwrap().map(), Some(&[4.5, 5.5][..]));

    assert!(Parameters::load_json("/nonexistent/voigt_rs/params.json").is_err());
}
