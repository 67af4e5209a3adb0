//! Compatibility with saved models in the older layout.
//!
//! Older saved models describe a component as
//!
//! ```json
//! {"_id_name": "Voigt", "name": "Voigt", "active": true,
//!  "spin_orbit_splitting": false, "spin_orbit_branching_ratio": 0.5,
//!  "spin_orbit_splitting_energy": 0.61, "shirley_background_active": false,
//!  "parameters": [{"_id_name": "area", "value": 1.0, "free": true,
//!                  "bmin": null, "bmax": null}]}
//! ```
//!
//! Parameters named `FWHM`/`gamma` select the photoemission parameterization,
//! `gwidth`/`lwidth` the width pair. [`LegacyAdapter`] reads and writes this
//! layout and converts components between the two naming schemes.

use crate::error::{Result, VoigtError};
use crate::model::Component;
use crate::models::{Parameterization, PesOptions, Voigt};
use crate::parameters::{Bounds, Parameter, Parameters};
use serde::{Deserialize, Serialize};

/// A parameter as stored by older saved models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyParameter {
    #[serde(rename = "_id_name")]
    pub id_name: String,

    pub value: f64,

    #[serde(default = "default_true")]
    pub free: bool,

    #[serde(default)]
    pub bmin: Option<f64>,

    #[serde(default)]
    pub bmax: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<Vec<f64>>,
}

/// A component as stored by older saved models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyComponent {
    #[serde(rename = "_id_name")]
    pub id_name: String,

    #[serde(default)]
    pub name: String,

    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(default)]
    pub spin_orbit_splitting: bool,

    #[serde(default = "default_branching_ratio")]
    pub spin_orbit_branching_ratio: f64,

    #[serde(default = "default_splitting_energy")]
    pub spin_orbit_splitting_energy: f64,

    #[serde(default)]
    pub shirley_background_active: bool,

    pub parameters: Vec<LegacyParameter>,
}

fn default_true() -> bool {
    true
}

fn default_branching_ratio() -> f64 {
    PesOptions::default().spin_orbit_branching_ratio
}

fn default_splitting_energy() -> f64 {
    PesOptions::default().spin_orbit_splitting_energy
}

impl LegacyParameter {
    fn from_parameter(param: &Parameter) -> Self {
        Self {
            id_name: param.name().to_string(),
            value: param.value(),
            free: param.vary(),
            bmin: param.bounds().min_option(),
            bmax: param.bounds().max_option(),
            map: param.map().map(|m| m.to_vec()),
        }
    }

    fn to_parameter(&self) -> Result<Parameter> {
        let bounds = Bounds::from_options(self.bmin, self.bmax)?;
        let mut param = Parameter::with_bounds(&self.id_name, self.value, bounds.min, bounds.max)?;
        param.set_vary(self.free);
        if let Some(map) = &self.map {
            param.set_map(map.clone())?;
        }
        Ok(param)
    }
}

/// Reads, writes and converts components in the older saved-model layout
pub struct LegacyAdapter;

impl LegacyAdapter {
    /// Load a component from a legacy JSON document
    ///
    /// # Examples
    ///
    /// ```
    /// use voigt_rs::legacy::LegacyAdapter;
    /// use voigt_rs::models::Parameterization;
    ///
    /// let json = r#"{"_id_name": "Voigt", "parameters": [
    ///     {"_id_name": "area", "value": 5.0},
    ///     {"_id_name": "centre", "value": 1.0},
    ///     {"_id_name": "FWHM", "value": 0.5, "bmin": 0.0},
    ///     {"_id_name": "gamma", "value": 0.2, "bmin": 0.0}
    /// ]}"#;
    ///
    /// let voigt = LegacyAdapter::from_legacy_json(json).unwrap();
    /// assert_eq!(voigt.parameterization(), Parameterization::FwhmGamma);
    /// assert_eq!(voigt.gaussian_width().unwrap(), 0.5);
    /// ```
    pub fn from_legacy_json(json: &str) -> Result<Voigt> {
        let component: LegacyComponent = serde_json::from_str(json)?;
        Self::from_legacy(&component)
    }

    /// Build a component from a parsed legacy document
    pub fn from_legacy(component: &LegacyComponent) -> Result<Voigt> {
        let names: Vec<&str> = component.parameters.iter().map(|p| p.id_name.as_str()).collect();
        let parameterization = if names.contains(&"FWHM") {
            Parameterization::FwhmGamma
        } else if names.contains(&"gwidth") {
            Parameterization::WidthPair
        } else {
            return Err(VoigtError::LegacyFormat(format!(
                "Component '{}' has neither 'FWHM' nor 'gwidth'",
                component.id_name
            )));
        };

        let mut params = Parameters::new();
        for legacy in &component.parameters {
            params.add(legacy.to_parameter()?)?;
        }

        let pes = match parameterization {
            Parameterization::FwhmGamma => Some(PesOptions {
                spin_orbit_splitting: component.spin_orbit_splitting,
                spin_orbit_branching_ratio: component.spin_orbit_branching_ratio,
                spin_orbit_splitting_energy: component.spin_orbit_splitting_energy,
                shirley_background: component.shirley_background_active,
            }),
            Parameterization::WidthPair => None,
        };

        if !component.active {
            log::debug!("loading inactive component '{}'", component.name);
        }

        Voigt::from_parts(parameterization, params, pes)
    }

    /// Describe a component in the legacy layout
    pub fn to_legacy(voigt: &Voigt) -> LegacyComponent {
        let pes = voigt.pes_options().copied().unwrap_or_default();
        let name = voigt.name().to_string();

        LegacyComponent {
            id_name: name.clone(),
            name,
            active: true,
            spin_orbit_splitting: pes.spin_orbit_splitting,
            spin_orbit_branching_ratio: pes.spin_orbit_branching_ratio,
            spin_orbit_splitting_energy: pes.spin_orbit_splitting_energy,
            shirley_background_active: pes.shirley_background,
            parameters: voigt
                .parameters()
                .iter()
                .map(LegacyParameter::from_parameter)
                .collect(),
        }
    }

    /// Save a component as a legacy JSON document
    pub fn to_legacy_json(voigt: &Voigt) -> Result<String> {
        Ok(serde_json::to_string_pretty(&Self::to_legacy(voigt))?)
    }

    /// Convert a `FWHM`/`gamma` component to `gwidth`/`lwidth` naming
    ///
    /// Values, bounds, `vary` flags and maps carry over. The photoemission
    /// extras have no width-pair counterpart, so they must be neutral:
    /// zero resolution and non-isochromaticity, unit transmission, no
    /// doublet and no Shirley background.
    pub fn upgrade(voigt: &Voigt) -> Result<Voigt> {
        if voigt.parameterization() == Parameterization::WidthPair {
            return Ok(voigt.clone());
        }

        let neutral = [
            ("resolution", 0.0),
            ("non_isochromaticity", 0.0),
            ("transmission_function", 1.0),
        ];
        for (name, expected) in neutral {
            if let Some(param) = voigt.parameters().get(name) {
                if param.value() != expected || param.map().is_some() {
                    return Err(VoigtError::Configuration(format!(
                        "Cannot drop '{}' = {} when converting to the width pair",
                        name,
                        param.value()
                    )));
                }
            }
        }
        if !voigt.pes_options().map_or(true, PesOptions::is_plain) {
            return Err(VoigtError::Configuration(
                "Cannot convert a doublet or Shirley background to the width pair".to_string(),
            ));
        }

        let params = Self::convert(voigt, Parameterization::WidthPair)?;
        Voigt::from_parts(Parameterization::WidthPair, params, None)
    }

    /// Convert a `gwidth`/`lwidth` component to `FWHM`/`gamma` naming
    ///
    /// The photoemission parameters are added with their neutral defaults.
    pub fn downgrade(voigt: &Voigt) -> Result<Voigt> {
        if voigt.parameterization() == Parameterization::FwhmGamma {
            return Ok(voigt.clone());
        }

        let mut params = Self::convert(voigt, Parameterization::FwhmGamma)?;
        for extra in Voigt::pes().parameters().iter().skip(4) {
            params.add(extra.clone())?;
        }

        Voigt::from_parts(
            Parameterization::FwhmGamma,
            params,
            Some(PesOptions::default()),
        )
    }

    // Area, centre and the two widths, renamed to `target` naming.
    fn convert(voigt: &Voigt, target: Parameterization) -> Result<Parameters> {
        let source = voigt.parameterization();
        let pairs = [
            ("area", "area"),
            ("centre", "centre"),
            (source.gaussian_width_name(), target.gaussian_width_name()),
            (source.lorentzian_width_name(), target.lorentzian_width_name()),
        ];

        let mut params = Parameters::new();
        for (from, to) in pairs {
            let mut param = voigt.parameter(from)?.clone();
            param.set_name(to);
            params.add(param)?;
        }
        Ok(params)
    }
}
