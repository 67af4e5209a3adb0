//! Parameters collection implementation
//!
//! This module provides the Parameters struct, an ordered collection of
//! Parameter objects addressed by name, with JSON save/load support.

use crate::parameters::parameter::{Parameter, ParameterError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// An ordered collection of named parameters
///
/// Insertion order is kept, so saved models list parameters in the order the
/// component declared them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Parameters {
    params: Vec<Parameter>,
}

impl Parameters {
    /// Create a new empty parameters collection
    ///
    /// # Examples
    ///
    /// ```
    /// use voigt_rs::parameters::Parameters;
    ///
    /// let params = Parameters::new();
    /// assert_eq!(params.len(), 0);
    /// ```
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a parameter to the collection
    ///
    /// # Returns
    ///
    /// `Ok(())` if the parameter was added successfully, or an error if a parameter
    /// with the same name already exists
    ///
    /// # Examples
    ///
    /// ```
    /// use voigt_rs::parameters::{Parameter, Parameters};
    ///
    /// let mut params = Parameters::new();
    /// params.add(Parameter::new("area", 10.0)).unwrap();
    /// assert!(params.add(Parameter::new("area", 1.0)).is_err());
    /// ```
    pub fn add(&mut self, param: Parameter) -> Result<(), ParameterError> {
        if self.contains(param.name()) {
            return Err(ParameterError::DuplicateParameter {
                name: param.name().to_string(),
            });
        }

        self.params.push(param);
        Ok(())
    }

    /// Add a new parameter with the given name and value
    pub fn add_param(&mut self, name: &str, value: f64) -> Result<(), ParameterError> {
        self.add(Parameter::new(name, value))
    }

    /// Add a new parameter with the given name, value, and bounds
    pub fn add_param_with_bounds(
        &mut self,
        name: &str,
        value: f64,
        min: f64,
        max: f64,
    ) -> Result<(), ParameterError> {
        self.add(Parameter::with_bounds(name, value, min, max)?)
    }

    /// Get a parameter by name
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name() == name)
    }

    /// Get a mutable reference to a parameter by name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.params.iter_mut().find(|p| p.name() == name)
    }

    /// Check whether a parameter exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Remove a parameter by name
    pub fn remove(&mut self, name: &str) -> Option<Parameter> {
        let idx = self.params.iter().position(|p| p.name() == name)?;
        Some(self.params.remove(idx))
    }

    /// Rename a parameter in place, keeping its position, value and map
    pub fn rename(&mut self, from: &str, to: &str) -> Result<(), ParameterError> {
        if from != to && self.contains(to) {
            return Err(ParameterError::DuplicateParameter {
                name: to.to_string(),
            });
        }

        let param = self
            .get_mut(from)
            .ok_or_else(|| ParameterError::ParameterNotFound {
                name: from.to_string(),
            })?;
        param.set_name(to);
        Ok(())
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Parameter names in declaration order
    pub fn names(&self) -> Vec<String> {
        self.params.iter().map(|p| p.name().to_string()).collect()
    }

    /// Iterate over the parameters in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    /// Iterate mutably over the parameters in declaration order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Parameter> {
        self.params.iter_mut()
    }

    /// Reset every parameter to its default value
    pub fn reset(&mut self) {
        for param in &mut self.params {
            param.reset();
        }
    }

    /// Parameters that are free to vary
    pub fn varying(&self) -> Vec<&Parameter> {
        self.params.iter().filter(|p| p.vary()).collect()
    }

    /// Number of traces covered by the parameter maps
    ///
    /// `Ok(None)` when no parameter has a map; an error when maps disagree in length.
    pub fn map_len(&self) -> Result<Option<usize>, ParameterError> {
        let mut len: Option<usize> = None;
        for param in &self.params {
            if let Some(map) = param.map() {
                match len {
                    None => len = Some(map.len()),
                    Some(n) if n == map.len() => {}
                    Some(n) => {
                        return Err(ParameterError::MapLengthMismatch {
                            name: param.name().to_string(),
                            expected: n,
                            found: map.len(),
                        })
                    }
                }
            }
        }
        Ok(len)
    }

    /// Copy map entry `index` of every mapped parameter into its scalar value
    pub fn fetch_stored_values(&mut self, index: usize) -> Result<(), ParameterError> {
        for param in &mut self.params {
            param.fetch_stored_value(index)?;
        }
        Ok(())
    }
}

impl FromIterator<Parameter> for Parameters {
    /// Collect parameters in order; a later parameter replaces an earlier one of the same name.
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        let mut params = Parameters::new();
        for param in iter {
            match params.get_mut(param.name()) {
                Some(existing) => *existing = param,
                None => params.params.push(param),
            }
        }
        params
    }
}

/// Error that can occur during serialization/deserialization
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl Parameters {
    /// Save parameters to a JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), SerializationError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Save parameters to a JSON string
    ///
    /// # Examples
    ///
    /// ```
    /// use voigt_rs::parameters::Parameters;
    ///
    /// let mut params = Parameters::new();
    /// params.add_param("area", 10.0).unwrap();
    /// params.add_param("centre", 5.0).unwrap();
    ///
    /// let json = params.to_json().unwrap();
    /// assert!(json.contains("centre"));
    /// ```
    pub fn to_json(&self) -> Result<String, SerializationError> {
        let json = serde_json::to_string_pretty(self)?;
        Ok(json)
    }

    /// Load parameters from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, SerializationError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load parameters from a JSON string
    ///
    /// # Examples
    ///
    /// ```
    /// use voigt_rs::parameters::Parameters;
    ///
    /// let json = r#"{
    ///   "params": [
    ///     {
    ///       "name": "area",
    ///       "value": 10.0,
    ///       "default_value": 1.0,
    ///       "vary": true,
    ///       "bounds": { "min": null, "max": null }
    ///     }
    ///   ]
    /// }"#;
    ///
    /// let params = Parameters::from_json(json).unwrap();
    /// assert_eq!(params.len(), 1);
    /// assert_eq!(params.get("area").unwrap().value(), 10.0);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, SerializationError> {
        let params: Parameters = serde_json::from_str(json)?;
        Ok(params)
    }
}
