//! Engine parameter management via TOML files.
//!
//! The defaults reproduce the original tuning exactly; a TOML file can
//! override individual values. Parsing goes through raw serde structs and
//! a validating conversion, so an engine can never be constructed from
//! out-of-range parameters.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::affect::Squash;
use crate::error::{AffectError, AffectResult};

/// Thresholds routing low-saturation colors into the achromatic bins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AchromaticThresholds {
    /// Saturation below this value is treated as achromatic.
    pub saturation: f64,
    /// L* below this value routes to the dark-achromatic bin.
    pub dark_lightness_max: f64,
    /// L* above this value routes to the light-achromatic bin.
    pub light_lightness_min: f64,
}

impl Default for AchromaticThresholds {
    fn default() -> Self {
        Self {
            saturation: 0.10,
            dark_lightness_max: 50.0,
            light_lightness_min: 85.0,
        }
    }
}

/// Gates and strength of the vivid-red anger floor rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngerFloor {
    /// Anger is raised to at least this ratio of mean(love, amusement).
    pub ratio: f64,
    /// Rule applies only at or above this saturation.
    pub min_saturation: f64,
    /// Rule applies only inside this L* range, inclusive.
    pub min_lightness: f64,
    pub max_lightness: f64,
}

impl Default for AngerFloor {
    fn default() -> Self {
        Self {
            ratio: 0.90,
            min_saturation: 0.6,
            min_lightness: 45.0,
            max_lightness: 70.0,
        }
    }
}

/// Tunable constants for the affect engine.
///
/// # Examples
///
/// ```
/// use chroma_affect::EngineParams;
///
/// let params = EngineParams::from_toml_str(
///     "[engine]\ndiversity_cap = 0.5\ntop_k = 3\n",
/// ).unwrap();
/// assert_eq!(params.top_k, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EngineParams {
    /// Logistic squash applied to each PAD regression output.
    pub squash: Squash,
    /// Achromatic routing thresholds.
    pub achromatic: AchromaticThresholds,
    /// Vivid-red anger floor rule.
    pub anger_floor: AngerFloor,
    /// Ceiling on any single emotion's share of a bin prior.
    pub diversity_cap: f64,
    /// Global probability floor added to every emotion post-normalization.
    pub entropy_floor: f64,
    /// Number of ranked entries returned in the result.
    pub top_k: usize,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            squash: Squash::default(),
            achromatic: AchromaticThresholds::default(),
            anger_floor: AngerFloor::default(),
            diversity_cap: 0.45,
            entropy_floor: 0.004,
            top_k: 5,
        }
    }
}

impl EngineParams {
    /// Load parameters from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> AffectResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse parameters from a TOML string; unspecified values keep their
    /// defaults.
    pub fn from_toml_str(toml_str: &str) -> AffectResult<Self> {
        let raw: RawParams = toml::from_str(toml_str)
            .map_err(|err| AffectError::invalid_parameter("toml", "<input>", err.to_string()))?;
        Self::try_from_raw(raw.engine)
    }

    fn try_from_raw(raw: RawEngine) -> AffectResult<Self> {
        let defaults = Self::default();
        let params = Self {
            squash: Squash {
                center: raw.squash.center.unwrap_or(defaults.squash.center),
                slope: raw.squash.slope.unwrap_or(defaults.squash.slope),
            },
            achromatic: AchromaticThresholds {
                saturation: raw
                    .achromatic
                    .saturation
                    .unwrap_or(defaults.achromatic.saturation),
                dark_lightness_max: raw
                    .achromatic
                    .dark_lightness_max
                    .unwrap_or(defaults.achromatic.dark_lightness_max),
                light_lightness_min: raw
                    .achromatic
                    .light_lightness_min
                    .unwrap_or(defaults.achromatic.light_lightness_min),
            },
            anger_floor: AngerFloor {
                ratio: raw.anger_floor.ratio.unwrap_or(defaults.anger_floor.ratio),
                min_saturation: raw
                    .anger_floor
                    .min_saturation
                    .unwrap_or(defaults.anger_floor.min_saturation),
                min_lightness: raw
                    .anger_floor
                    .min_lightness
                    .unwrap_or(defaults.anger_floor.min_lightness),
                max_lightness: raw
                    .anger_floor
                    .max_lightness
                    .unwrap_or(defaults.anger_floor.max_lightness),
            },
            diversity_cap: raw.diversity_cap.unwrap_or(defaults.diversity_cap),
            entropy_floor: raw.entropy_floor.unwrap_or(defaults.entropy_floor),
            top_k: raw.top_k.unwrap_or(defaults.top_k),
        };
        params.validate()?;
        Ok(params)
    }

    /// Check every parameter against its constraint.
    pub fn validate(&self) -> AffectResult<()> {
        if !self.squash.slope.is_finite() || self.squash.slope <= 0.0 {
            return Err(AffectError::invalid_parameter(
                "squash.slope",
                self.squash.slope.to_string(),
                "slope > 0",
            ));
        }
        if !self.squash.center.is_finite() {
            return Err(AffectError::invalid_parameter(
                "squash.center",
                self.squash.center.to_string(),
                "finite",
            ));
        }
        if !(0.0..1.0).contains(&self.achromatic.saturation) {
            return Err(AffectError::invalid_parameter(
                "achromatic.saturation",
                self.achromatic.saturation.to_string(),
                "0 <= saturation < 1",
            ));
        }
        if self.achromatic.dark_lightness_max >= self.achromatic.light_lightness_min {
            return Err(AffectError::invalid_parameter(
                "achromatic.dark_lightness_max",
                self.achromatic.dark_lightness_max.to_string(),
                "dark ceiling < light floor",
            ));
        }
        if !(0.0..=1.0).contains(&self.anger_floor.min_saturation) {
            return Err(AffectError::invalid_parameter(
                "anger_floor.min_saturation",
                self.anger_floor.min_saturation.to_string(),
                "0 <= saturation <= 1",
            ));
        }
        if self.anger_floor.ratio < 0.0 || !self.anger_floor.ratio.is_finite() {
            return Err(AffectError::invalid_parameter(
                "anger_floor.ratio",
                self.anger_floor.ratio.to_string(),
                "ratio >= 0",
            ));
        }
        if self.anger_floor.min_lightness > self.anger_floor.max_lightness {
            return Err(AffectError::invalid_parameter(
                "anger_floor.min_lightness",
                self.anger_floor.min_lightness.to_string(),
                "min lightness <= max lightness",
            ));
        }
        if !(0.0..=1.0).contains(&self.diversity_cap) || self.diversity_cap == 0.0 {
            return Err(AffectError::invalid_parameter(
                "diversity_cap",
                self.diversity_cap.to_string(),
                "0 < cap <= 1",
            ));
        }
        if !(0.0..1.0).contains(&self.entropy_floor) {
            return Err(AffectError::invalid_parameter(
                "entropy_floor",
                self.entropy_floor.to_string(),
                "0 <= floor < 1",
            ));
        }
        if self.top_k == 0 {
            return Err(AffectError::invalid_parameter(
                "top_k",
                self.top_k.to_string(),
                "top_k >= 1",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawParams {
    #[serde(default)]
    engine: RawEngine,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEngine {
    #[serde(default)]
    squash: RawSquash,
    #[serde(default)]
    achromatic: RawAchromatic,
    #[serde(default)]
    anger_floor: RawAngerFloor,
    diversity_cap: Option<f64>,
    entropy_floor: Option<f64>,
    top_k: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSquash {
    center: Option<f64>,
    slope: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAchromatic {
    saturation: Option<f64>,
    dark_lightness_max: Option<f64>,
    light_lightness_min: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAngerFloor {
    ratio: Option<f64>,
    min_saturation: Option<f64>,
    min_lightness: Option<f64>,
    max_lightness: Option<f64>,
}
