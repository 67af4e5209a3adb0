//! Voigt peak component.
//!
//! The Voigt profile is the convolution of a Gaussian and a Lorentzian:
//!
//! f(x) = area * Re[w(z)] / (sigma * sqrt(2π)),  z = (x - centre + i·gamma) / (sigma·sqrt(2))
//!
//! where `w` is the [Faddeeva function](crate::models::faddeeva::faddeeva),
//! `sigma = gwidth / (2·sqrt(2·ln 2))` is the Gaussian standard deviation and
//! `gamma = lwidth` the Lorentzian half width at half maximum.
//!
//! Two parameterizations exist and one is fixed per instance:
//!
//! - [`Parameterization::WidthPair`]: `area`, `centre`, `gwidth`, `lwidth`
//! - [`Parameterization::FwhmGamma`] (photoemission, "PESVoigt"): `area`,
//!   `centre`, `FWHM`, `gamma` plus the instrument parameters `resolution`,
//!   `shirley_background`, `non_isochromaticity` and `transmission_function`,
//!   and optional spin-orbit splitting.

use crate::error::{Result, VoigtError};
use crate::estimate::{estimate_signal, EstimatorConfig, PeakEstimate, SIGMA2FWHM};
use crate::model::Component;
use crate::models::faddeeva::voigt_profile;
use crate::parameters::{Parameter, Parameters};
use crate::signal::Signal1D;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Naming scheme of the width parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameterization {
    /// `gwidth` (Gaussian FWHM) and `lwidth` (Lorentzian HWHM)
    WidthPair,

    /// `FWHM` and `gamma` with the photoemission extras
    FwhmGamma,
}

impl Parameterization {
    /// Name of the Gaussian width parameter
    pub fn gaussian_width_name(&self) -> &'static str {
        match self {
            Parameterization::WidthPair => "gwidth",
            Parameterization::FwhmGamma => "FWHM",
        }
    }

    /// Name of the Lorentzian width parameter
    pub fn lorentzian_width_name(&self) -> &'static str {
        match self {
            Parameterization::WidthPair => "lwidth",
            Parameterization::FwhmGamma => "gamma",
        }
    }

    /// Component name used in saved models
    pub fn component_name(&self) -> &'static str {
        match self {
            Parameterization::WidthPair => "Voigt",
            Parameterization::FwhmGamma => "PESVoigt",
        }
    }

    /// Parameters a component in this parameterization cannot do without
    pub fn required_names(&self) -> [&'static str; 4] {
        [
            "area",
            "centre",
            self.gaussian_width_name(),
            self.lorentzian_width_name(),
        ]
    }
}

impl FromStr for Parameterization {
    type Err = VoigtError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "width_pair" | "voigt" | "gwidth_lwidth" => Ok(Parameterization::WidthPair),
            "fwhm_gamma" | "pes" | "pesvoigt" | "legacy" => Ok(Parameterization::FwhmGamma),
            _ => Err(VoigtError::Configuration(format!(
                "Unknown parameterization '{}', expected 'width_pair' or 'fwhm_gamma'",
                s
            ))),
        }
    }
}

impl fmt::Display for Parameterization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameterization::WidthPair => write!(f, "width_pair"),
            Parameterization::FwhmGamma => write!(f, "fwhm_gamma"),
        }
    }
}

/// Switches of the photoemission line shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PesOptions {
    /// Add the second peak of a spin-orbit doublet. Default: false
    pub spin_orbit_splitting: bool,

    /// Area of the second peak relative to the first. Default: 0.5
    pub spin_orbit_branching_ratio: f64,

    /// Distance of the second peak below the first. Default: 0.61
    pub spin_orbit_splitting_energy: f64,

    /// Add a Shirley step background. Default: false
    pub shirley_background: bool,
}

impl Default for PesOptions {
    fn default() -> Self {
        Self {
            spin_orbit_splitting: false,
            spin_orbit_branching_ratio: 0.5,
            spin_orbit_splitting_energy: 0.61,
            shirley_background: false,
        }
    }
}

impl PesOptions {
    /// Whether these options leave the plain Voigt profile unchanged
    pub fn is_plain(&self) -> bool {
        !self.spin_orbit_splitting && !self.shirley_background
    }
}

// Parameter values for one trace.
#[derive(Debug, Clone, Copy)]
struct Shape {
    area: f64,
    centre: f64,
    gaussian_width: f64,
    lorentzian_width: f64,
    resolution: f64,
    shirley: f64,
    non_isochromaticity: f64,
    transmission: f64,
}

/// A Voigt peak component.
///
/// # Examples
///
/// ```
/// use voigt_rs::model::Component;
/// use voigt_rs::models::Voigt;
///
/// let mut voigt = Voigt::new(false);
/// voigt.set_area(5.0).unwrap();
/// voigt.set_gaussian_width(0.5).unwrap();
/// voigt.set_lorentzian_width(0.2).unwrap();
/// voigt.set_centre(1.0).unwrap();
///
/// assert!((voigt.function(0.0).unwrap() - 0.35380168).abs() < 1e-7);
/// assert!((voigt.function(1.0).unwrap() - 5.06863535).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voigt {
    parameterization: Parameterization,
    params: Parameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pes: Option<PesOptions>,
    #[serde(default)]
    binned: Option<bool>,
    #[serde(default)]
    estimator: EstimatorConfig,
}

impl Default for Voigt {
    fn default() -> Self {
        Self::from_parameterization(Parameterization::WidthPair)
    }
}

impl Voigt {
    /// Create a Voigt component
    ///
    /// # Arguments
    ///
    /// * `legacy` - Use the `FWHM`/`gamma` naming of older saved models
    ///   instead of `gwidth`/`lwidth`
    pub fn new(legacy: bool) -> Self {
        if legacy {
            log::warn!(
                "the legacy Voigt parameterization is deprecated, use Voigt::pes() for FWHM/gamma naming"
            );
            Self::from_parameterization(Parameterization::FwhmGamma)
        } else {
            Self::from_parameterization(Parameterization::WidthPair)
        }
    }

    /// Create a photoemission Voigt ("PESVoigt") with `FWHM`/`gamma` naming
    pub fn pes() -> Self {
        Self::from_parameterization(Parameterization::FwhmGamma)
    }

    /// Create a component from a parameterization name
    ///
    /// # Examples
    ///
    /// ```
    /// use voigt_rs::models::Voigt;
    ///
    /// assert!(Voigt::with_parameterization("fwhm_gamma").is_ok());
    /// assert!(Voigt::with_parameterization("lorentz_only").is_err());
    /// ```
    pub fn with_parameterization(name: &str) -> Result<Self> {
        Ok(Self::from_parameterization(name.parse()?))
    }

    /// Create a component with default parameter values
    pub fn from_parameterization(parameterization: Parameterization) -> Self {
        let params = match parameterization {
            Parameterization::WidthPair => vec![
                Parameter::new("area", 1.0),
                Parameter::new("centre", 0.0),
                Parameter::non_negative("gwidth", 1.0),
                Parameter::non_negative("lwidth", 0.2),
            ],
            Parameterization::FwhmGamma => vec![
                Parameter::new("area", 1.0),
                Parameter::new("centre", 0.0),
                Parameter::non_negative("FWHM", 1.0),
                Parameter::non_negative("gamma", 0.0),
                Parameter::fixed("resolution", 0.0),
                Parameter::fixed("shirley_background", 0.0),
                Parameter::fixed("non_isochromaticity", 0.0),
                Parameter::fixed("transmission_function", 1.0),
            ],
        };

        let pes = match parameterization {
            Parameterization::WidthPair => None,
            Parameterization::FwhmGamma => Some(PesOptions::default()),
        };

        Self {
            parameterization,
            params: params.into_iter().collect(),
            pes,
            binned: None,
            estimator: EstimatorConfig::default(),
        }
    }

    /// Start building a component with keyword-style initial values
    pub fn builder() -> VoigtBuilder {
        VoigtBuilder::default()
    }

    /// The parameterization fixed at construction
    pub fn parameterization(&self) -> Parameterization {
        self.parameterization
    }

    /// Current value of a parameter
    pub fn value(&self, name: &str) -> Result<f64> {
        self.params
            .get(name)
            .map(|p| p.value())
            .ok_or_else(|| VoigtError::ParameterNotFound(name.to_string()))
    }

    /// Set the value of a parameter, respecting its bounds
    pub fn set_value(&mut self, name: &str, value: f64) -> Result<()> {
        self.params
            .get_mut(name)
            .ok_or_else(|| VoigtError::ParameterNotFound(name.to_string()))?
            .set_value(value)?;
        Ok(())
    }

    /// A parameter by name
    pub fn parameter(&self, name: &str) -> Result<&Parameter> {
        self.params
            .get(name)
            .ok_or_else(|| VoigtError::ParameterNotFound(name.to_string()))
    }

    pub fn area(&self) -> Result<f64> {
        self.value("area")
    }

    pub fn set_area(&mut self, value: f64) -> Result<()> {
        self.set_value("area", value)
    }

    pub fn centre(&self) -> Result<f64> {
        self.value("centre")
    }

    pub fn set_centre(&mut self, value: f64) -> Result<()> {
        self.set_value("centre", value)
    }

    /// Gaussian FWHM: `gwidth` or `FWHM` depending on the parameterization
    pub fn gaussian_width(&self) -> Result<f64> {
        self.value(self.parameterization.gaussian_width_name())
    }

    pub fn set_gaussian_width(&mut self, value: f64) -> Result<()> {
        self.set_value(self.parameterization.gaussian_width_name(), value)
    }

    /// Lorentzian HWHM: `lwidth` or `gamma` depending on the parameterization
    pub fn lorentzian_width(&self) -> Result<f64> {
        self.value(self.parameterization.lorentzian_width_name())
    }

    pub fn set_lorentzian_width(&mut self, value: f64) -> Result<()> {
        self.set_value(self.parameterization.lorentzian_width_name(), value)
    }

    /// Gaussian standard deviation, computed from the Gaussian width
    ///
    /// # Examples
    ///
    /// ```
    /// use voigt_rs::models::Voigt;
    ///
    /// let mut voigt = Voigt::new(false);
    /// voigt.set_sigma(1.0).unwrap();
    /// assert!((voigt.gaussian_width().unwrap() - 2.3548200450309493).abs() < 1e-12);
    /// assert!((voigt.sigma().unwrap() - 1.0).abs() < 1e-12);
    /// ```
    pub fn sigma(&self) -> Result<f64> {
        Ok(self.gaussian_width()? / SIGMA2FWHM)
    }

    /// Set the Gaussian width from a standard deviation
    pub fn set_sigma(&mut self, sigma: f64) -> Result<()> {
        self.set_gaussian_width(sigma * SIGMA2FWHM)
    }

    /// Lorentzian half width; the same value as `lorentzian_width`
    pub fn gamma(&self) -> Result<f64> {
        self.lorentzian_width()
    }

    pub fn set_gamma(&mut self, gamma: f64) -> Result<()> {
        self.set_lorentzian_width(gamma)
    }

    /// Photoemission options, `None` for the width-pair parameterization
    pub fn pes_options(&self) -> Option<&PesOptions> {
        self.pes.as_ref()
    }

    pub fn pes_options_mut(&mut self) -> Option<&mut PesOptions> {
        self.pes.as_mut()
    }

    /// Replace the estimation options
    pub fn with_estimator_config(mut self, config: EstimatorConfig) -> Self {
        self.estimator = config;
        self
    }

    pub fn estimator_config(&self) -> &EstimatorConfig {
        &self.estimator
    }

    pub fn set_estimator_config(&mut self, config: EstimatorConfig) {
        self.estimator = config;
    }

    pub(crate) fn from_parts(
        parameterization: Parameterization,
        params: Parameters,
        pes: Option<PesOptions>,
    ) -> Result<Self> {
        let voigt = Self {
            parameterization,
            params,
            pes,
            binned: None,
            estimator: EstimatorConfig::default(),
        };
        voigt.validate()?;
        Ok(voigt)
    }

    fn validate(&self) -> Result<()> {
        for name in self.parameterization.required_names() {
            if !self.params.contains(name) {
                return Err(VoigtError::ParameterNotFound(name.to_string()));
            }
        }

        match (self.parameterization, &self.pes) {
            (Parameterization::WidthPair, Some(_)) => Err(VoigtError::Configuration(
                "Photoemission options require the fwhm_gamma parameterization".to_string(),
            )),
            _ => {
                self.n_traces()?;
                Ok(())
            }
        }
    }

    /// Save the component to a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a component from a JSON string
    ///
    /// The parameters its parameterization requires must be present.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut voigt: Voigt = serde_json::from_str(json)?;
        if voigt.parameterization == Parameterization::FwhmGamma && voigt.pes.is_none() {
            voigt.pes = Some(PesOptions::default());
        }
        voigt.validate()?;
        Ok(voigt)
    }

    /// Save the component to a JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load a component from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_json(&contents)
    }

    fn required(&self, name: &str, index: Option<usize>) -> Result<f64> {
        let param = self.parameter(name)?;
        Ok(match index {
            Some(i) => param.value_at(i),
            None => param.value(),
        })
    }

    fn optional(&self, name: &str, index: Option<usize>, default: f64) -> f64 {
        match (self.params.get(name), index) {
            (Some(p), Some(i)) => p.value_at(i),
            (Some(p), None) => p.value(),
            (None, _) => default,
        }
    }

    fn shape(&self, index: Option<usize>) -> Result<Shape> {
        let p = self.parameterization;
        Ok(Shape {
            area: self.required("area", index)?,
            centre: self.required("centre", index)?,
            gaussian_width: self.required(p.gaussian_width_name(), index)?,
            lorentzian_width: self.required(p.lorentzian_width_name(), index)?,
            resolution: self.optional("resolution", index, 0.0),
            shirley: self.optional("shirley_background", index, 0.0),
            non_isochromaticity: self.optional("non_isochromaticity", index, 0.0),
            transmission: self.optional("transmission_function", index, 1.0),
        })
    }

    fn evaluate(&self, shape: &Shape, x: &Array1<f64>) -> Array1<f64> {
        let gamma = shape.lorentzian_width;

        let pes = match self.parameterization {
            Parameterization::FwhmGamma => self.pes.unwrap_or_default(),
            Parameterization::WidthPair => {
                let sigma = shape.gaussian_width / SIGMA2FWHM;
                return x.mapv(|v| shape.area * voigt_profile(v - shape.centre, sigma, gamma));
            }
        };

        let fwhm = if shape.resolution != 0.0 {
            shape.gaussian_width.hypot(shape.resolution)
        } else {
            shape.gaussian_width
        };
        let sigma = fwhm / SIGMA2FWHM;
        let area = shape.area * shape.transmission;
        let centre = shape.centre - shape.non_isochromaticity;

        let mut y = x.mapv(|v| area * voigt_profile(v - centre, sigma, gamma));

        if pes.spin_orbit_splitting {
            let centre2 = centre - pes.spin_orbit_splitting_energy;
            let area2 = area * pes.spin_orbit_branching_ratio;
            y.zip_mut_with(x, |yi, &v| *yi += area2 * voigt_profile(v - centre2, sigma, gamma));
        }

        if pes.shirley_background {
            // Each point gains the intensity of every point after it
            let mut tail = 0.0;
            for yi in y.iter_mut().rev() {
                let f = *yi;
                *yi = f + shape.shirley * tail;
                tail += f;
            }
        }

        y
    }

    // `[area, centre, gaussian width]` reproducing an estimated peak through `evaluate`.
    fn from_estimate(&self, est: &PeakEstimate) -> Result<[f64; 3]> {
        if self.parameterization != Parameterization::FwhmGamma {
            return Ok([est.area, est.centre, est.fwhm]);
        }

        let resolution = self.optional("resolution", None, 0.0);
        let transmission = self.optional("transmission_function", None, 1.0);
        let non_iso = self.optional("non_isochromaticity", None, 0.0);

        let mut gain = transmission;
        if let Some(pes) = self.pes.filter(|p| p.spin_orbit_splitting) {
            gain *= 1.0 + pes.spin_orbit_branching_ratio;
        }
        if !(gain.is_finite() && gain > 0.0) {
            return Err(VoigtError::InvalidInput(format!(
                "Peak intensity scale {} cannot be inverted",
                gain
            )));
        }

        let width = if resolution != 0.0 {
            (est.fwhm * est.fwhm - resolution * resolution).max(0.0).sqrt()
        } else {
            est.fwhm
        };

        Ok([est.area / gain, est.centre + non_iso, width])
    }

    fn apply_estimates(
        &self,
        params: &mut Parameters,
        estimates: &[PeakEstimate],
        n_traces: usize,
        current: usize,
        only_current: bool,
    ) -> Result<()> {
        let converted = estimates
            .iter()
            .map(|e| self.from_estimate(e))
            .collect::<Result<Vec<[f64; 3]>>>()?;
        let index = if only_current { 0 } else { current };
        let chosen = *converted.get(index).ok_or_else(|| {
            VoigtError::InvalidInput(format!("No estimate for trace {}", current))
        })?;

        // Maps from a stack of another size no longer describe this signal
        if params.iter().any(|p| p.map().is_some_and(|m| m.len() != n_traces)) {
            log::debug!(
                "{}: dropping parameter maps not sized for {} trace(s)",
                self.name(),
                n_traces
            );
            for param in params.iter_mut() {
                param.clear_map();
            }
        }

        let names = ["area", "centre", self.parameterization.gaussian_width_name()];
        for (k, name) in names.iter().enumerate() {
            let param = params
                .get_mut(name)
                .ok_or_else(|| VoigtError::ParameterNotFound(name.to_string()))?;

            if only_current {
                if let Some(map) = param.map() {
                    let mut map = map.to_vec();
                    if let Some(slot) = map.get_mut(current) {
                        *slot = chosen[k];
                    }
                    param.set_map(map)?;
                }
            } else {
                param.set_map(converted.iter().map(|v| v[k]).collect())?;
            }
            param.set_value(chosen[k])?;
        }

        match params.map_len() {
            Ok(None) => Ok(()),
            Ok(Some(n)) if n == n_traces => Ok(()),
            Ok(Some(n)) => Err(VoigtError::DimensionMismatch(format!(
                "Parameter maps cover {} trace(s), the signal has {}",
                n, n_traces
            ))),
            Err(e) => Err(VoigtError::DimensionMismatch(format!(
                "Inconsistent parameter maps: {}",
                e
            ))),
        }
    }
}

impl Component for Voigt {
    fn name(&self) -> &str {
        self.parameterization.component_name()
    }

    fn parameters(&self) -> &Parameters {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.params
    }

    fn function_array(&self, x: &Array1<f64>) -> Result<Array1<f64>> {
        let shape = self.shape(None)?;
        Ok(self.evaluate(&shape, x))
    }

    fn function_nd(&self, x: &Array1<f64>) -> Result<Array2<f64>> {
        let n = self.n_traces()?;
        let mut out = Array2::zeros((n, x.len()));

        for (i, mut row) in out.rows_mut().into_iter().enumerate() {
            let shape = self.shape(Some(i))?;
            row.assign(&self.evaluate(&shape, x));
        }

        Ok(out)
    }

    fn estimate_parameters(
        &mut self,
        signal: &Signal1D,
        start: Option<f64>,
        end: Option<f64>,
        only_current: bool,
    ) -> bool {
        let estimates = match estimate_signal(signal, start, end, only_current, &self.estimator) {
            Ok(estimates) => estimates,
            Err(reason) => {
                log::warn!("{}: cannot estimate parameters, {}", self.name(), reason);
                return false;
            }
        };

        let mut params = self.params.clone();
        if let Err(e) = self.apply_estimates(
            &mut params,
            &estimates,
            signal.n_traces(),
            signal.current_index(),
            only_current,
        ) {
            log::warn!("{}: estimated values rejected, {}", self.name(), e);
            return false;
        }

        self.params = params;
        self.binned = Some(signal.binned());

        log::debug!(
            "{}: estimated area={:?} centre={:?} {}={:?}",
            self.name(),
            self.area().ok(),
            self.centre().ok(),
            self.parameterization.gaussian_width_name(),
            self.gaussian_width().ok()
        );

        true
    }

    fn binned(&self) -> Option<bool> {
        self.binned
    }
}

/// Builder for [`Voigt`] with keyword-style initial values
///
/// # Examples
///
/// ```
/// use voigt_rs::models::Voigt;
///
/// let voigt = Voigt::builder()
///     .centre(1.0)
///     .area(5.0)
///     .gwidth(0.5)
///     .lwidth(0.001)
///     .build()
///     .unwrap();
/// assert_eq!(voigt.centre().unwrap(), 1.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VoigtBuilder {
    parameterization: Option<Parameterization>,
    legacy: bool,
    area: Option<f64>,
    centre: Option<f64>,
    gwidth: Option<f64>,
    lwidth: Option<f64>,
}

impl VoigtBuilder {
    pub fn area(mut self, area: f64) -> Self {
        self.area = Some(area);
        self
    }

    pub fn centre(mut self, centre: f64) -> Self {
        self.centre = Some(centre);
        self
    }

    /// Gaussian width, `gwidth` or `FWHM`
    pub fn gwidth(mut self, gwidth: f64) -> Self {
        self.gwidth = Some(gwidth);
        self
    }

    /// Lorentzian width, `lwidth` or `gamma`
    pub fn lwidth(mut self, lwidth: f64) -> Self {
        self.lwidth = Some(lwidth);
        self
    }

    /// Use the deprecated `FWHM`/`gamma` naming
    pub fn legacy(mut self, legacy: bool) -> Self {
        self.legacy = legacy;
        self
    }

    /// Choose the parameterization explicitly, overriding `legacy`
    pub fn parameterization(mut self, parameterization: Parameterization) -> Self {
        self.parameterization = Some(parameterization);
        self
    }

    /// Build the component
    ///
    /// Fails when a value lies outside its parameter's bounds.
    pub fn build(self) -> Result<Voigt> {
        let mut voigt = match self.parameterization {
            Some(p) => Voigt::from_parameterization(p),
            None => Voigt::new(self.legacy),
        };

        if let Some(area) = self.area {
            voigt.set_area(area)?;
        }
        if let Some(centre) = self.centre {
            voigt.set_centre(centre)?;
        }
        if let Some(gwidth) = self.gwidth {
            voigt.set_gaussian_width(gwidth)?;
        }
        if let Some(lwidth) = self.lwidth {
            voigt.set_lorentzian_width(lwidth)?;
        }

        Ok(voigt)
    }
}
