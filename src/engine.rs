//! The color-affect evaluation pipeline.
//!
//! A single synchronous [`AffectEngine::evaluate`] call converts an sRGB
//! color to HSV and CIELAB, maps it into PAD space, scores every emotion
//! prototype with an anisotropic Gaussian kernel, weights the scores by the
//! hue-bin priors, applies the achromatic and vivid-red corrective rules,
//! and normalizes with an entropy floor into a probability distribution.
//! The engine is immutable after construction and safe to share across
//! threads; evaluation performs no I/O and no shared-state access.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::affect::{family_label, map_to_pad, Pad};
use crate::color::{Hsv, Lab, Rgb};
use crate::config::EngineParams;
use crate::error::{AffectError, AffectResult};
use crate::registry::{EmotionPrototype, EmotionRegistry, HueBin, ENTROPY_FLOOR_PER_EMOTION};

/// Emotions boosted for dark achromatic colors (L* below the dark band).
const ACHROMATIC_DARK_BOOST: &[&str] = &["sad", "tired", "anxious", "anger"];
/// Emotions nudged up for mid grays.
const ACHROMATIC_MID_BOOST: &[&str] = &["sad", "tired", "shame", "disgust"];
/// Emotions boosted for light achromatic colors.
const ACHROMATIC_LIGHT_BOOST: &[&str] = &["hope", "gratitude", "calm", "content"];

/// L* band edges for the achromatic correction rule.
const ACHROMATIC_DARK_BAND_MAX: f64 = 35.0;
const ACHROMATIC_MID_BAND_MAX: f64 = 70.0;

const ACHROMATIC_DARK_FACTOR: f64 = 1.15;
const ACHROMATIC_MID_FACTOR: f64 = 1.05;
const ACHROMATIC_MID_BOREDOM_FACTOR: f64 = 0.80;
const ACHROMATIC_LIGHT_FACTOR: f64 = 1.08;

/// Reference emotions for the vivid-red anger floor. Amusement stands in
/// as the high-arousal positive surrogate.
const ANGER: &str = "anger";
const ANGER_FLOOR_REFERENCES: &[&str] = &["love", "amusement"];

/// Immutable result of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineResult {
    /// The PAD point the color mapped to.
    pub pad: Pad,
    /// Final probability per emotion; sums to 1 within floating tolerance.
    pub probs: BTreeMap<&'static str, f64>,
    /// Top-K (name, probability) pairs, probability descending with
    /// lexicographic tie-break.
    pub top: Vec<(&'static str, f64)>,
    /// Coarse valence × arousal-band label, e.g. `"positive-high"`.
    pub family: &'static str,
    /// The hue bin the color resolved to.
    pub bin: HueBin,
}

/// Stateless color → emotion-distribution engine.
///
/// # Examples
///
/// ```
/// use chroma_affect::{AffectEngine, Rgb};
///
/// let engine = AffectEngine::new().unwrap();
/// let result = engine.evaluate(Rgb::new(0.86, 0.08, 0.08).unwrap());
///
/// let total: f64 = result.probs.values().sum();
/// assert!((total - 1.0).abs() < 1e-9);
/// assert_eq!(result.top.len(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct AffectEngine {
    params: EngineParams,
    registry: EmotionRegistry,
}

impl AffectEngine {
    /// Build an engine with the default parameters.
    pub fn new() -> AffectResult<Self> {
        Self::with_params(EngineParams::default())
    }

    /// Build an engine with explicit parameters.
    ///
    /// Validates the parameters, builds the prior tables once, and checks
    /// that every emotion named by the corrective rules has a prototype.
    pub fn with_params(params: EngineParams) -> AffectResult<Self> {
        params.validate()?;
        let registry = EmotionRegistry::build(params.diversity_cap)?;

        let rule_names = ACHROMATIC_DARK_BOOST
            .iter()
            .chain(ACHROMATIC_MID_BOOST)
            .chain(ACHROMATIC_LIGHT_BOOST)
            .chain(ANGER_FLOOR_REFERENCES)
            .chain([&ANGER, &"boredom"]);
        for name in rule_names {
            if !registry.contains(name) {
                return Err(AffectError::unknown_emotion("heuristics", *name));
            }
        }

        Ok(Self { params, registry })
    }

    /// The parameters this engine was built with.
    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    /// The validated prototype and prior registry.
    pub fn registry(&self) -> &EmotionRegistry {
        &self.registry
    }

    /// Evaluate a color into a PAD point, an emotion distribution, a
    /// ranked top-K list, and a family label.
    ///
    /// Pure: the same input always yields the same result, independent of
    /// prior calls.
    pub fn evaluate(&self, rgb: Rgb) -> EngineResult {
        let hsv = Hsv::from_srgb(rgb);
        let lab = Lab::from_srgb(rgb);
        let pad = map_to_pad(lab.l / 100.0, hsv.s, self.params.squash);

        // Unnormalized Gaussian likelihood per prototype.
        let mut scores: BTreeMap<&'static str, f64> = BTreeMap::new();
        for proto in self.registry.prototypes() {
            scores.insert(proto.name, kernel_likelihood(pad, proto));
        }

        // Categorical prior for the color's bin. Every prototype has a
        // positive weight in every row, so nothing is zeroed here.
        let bin = HueBin::classify(hsv, lab.l, &self.params.achromatic);
        let row = self.registry.prior_row(bin);
        for (name, score) in scores.iter_mut() {
            *score *= row[name];
        }

        self.apply_achromatic_correction(&mut scores, hsv.s, lab.l);
        self.apply_anger_floor(&mut scores, bin, hsv.s, lab.l);

        let probs = self.normalize_with_floor(scores);

        let mut ranked: Vec<(&'static str, f64)> =
            probs.iter().map(|(name, p)| (*name, *p)).collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        ranked.truncate(self.params.top_k);

        EngineResult {
            pad,
            family: family_label(pad),
            probs,
            top: ranked,
            bin,
        }
    }

    /// Parse a `#RRGGBB` string and evaluate it.
    pub fn evaluate_hex(&self, hex: &str) -> AffectResult<EngineResult> {
        Ok(self.evaluate(Rgb::from_hex(hex)?))
    }

    /// Band-dependent multiplicative correction for achromatic colors.
    fn apply_achromatic_correction(
        &self,
        scores: &mut BTreeMap<&'static str, f64>,
        saturation: f64,
        lightness: f64,
    ) {
        if saturation >= self.params.achromatic.saturation {
            return;
        }
        if lightness < ACHROMATIC_DARK_BAND_MAX {
            scale(scores, ACHROMATIC_DARK_BOOST, ACHROMATIC_DARK_FACTOR);
        } else if lightness < ACHROMATIC_MID_BAND_MAX {
            scale(scores, &["boredom"], ACHROMATIC_MID_BOREDOM_FACTOR);
            scale(scores, ACHROMATIC_MID_BOOST, ACHROMATIC_MID_FACTOR);
        } else {
            scale(scores, ACHROMATIC_LIGHT_BOOST, ACHROMATIC_LIGHT_FACTOR);
        }
    }

    /// Vivid-red rule: anger never falls below the configured ratio of the
    /// mean of the reference emotion weights. Only ever raises anger.
    fn apply_anger_floor(
        &self,
        scores: &mut BTreeMap<&'static str, f64>,
        bin: HueBin,
        saturation: f64,
        lightness: f64,
    ) {
        let gate = &self.params.anger_floor;
        if bin != HueBin::Red
            || saturation < gate.min_saturation
            || lightness < gate.min_lightness
            || lightness > gate.max_lightness
        {
            return;
        }
        let mean_reference = ANGER_FLOOR_REFERENCES
            .iter()
            .map(|name| scores[name])
            .sum::<f64>()
            / ANGER_FLOOR_REFERENCES.len() as f64;
        let floor = gate.ratio * mean_reference;
        if let Some(anger) = scores.get_mut(ANGER) {
            if *anger < floor {
                *anger = floor;
            }
        }
    }

    /// Convert weighted scores into probabilities with the entropy floor.
    fn normalize_with_floor(
        &self,
        scores: BTreeMap<&'static str, f64>,
    ) -> BTreeMap<&'static str, f64> {
        let mut total: f64 = scores.values().sum();
        if total <= 0.0 {
            // Cannot happen with epsilon-smoothed priors, but guard the
            // division; the result is then not meaningfully differentiated.
            warn!(total, "weighted scores collapsed; substituting unit sum");
            total = 1.0;
        }

        let mut probs = scores;
        for value in probs.values_mut() {
            *value /= total;
        }

        for (name, value) in probs.iter_mut() {
            *value += self.params.entropy_floor + per_emotion_floor(name);
        }

        let floored_total: f64 = probs.values().sum();
        for value in probs.values_mut() {
            *value /= floored_total;
        }
        probs
    }
}

/// `exp(−0.5·Σ((pad_i − center_i)/spread_i)²)`: strictly positive and
/// monotonically decreasing with PAD-space distance from the center.
fn kernel_likelihood(pad: Pad, proto: &EmotionPrototype) -> f64 {
    let point = [pad.pleasure, pad.arousal, pad.dominance];
    let mut mahalanobis_sq = 0.0;
    for axis in 0..3 {
        let delta = (point[axis] - proto.center[axis]) / proto.spread[axis];
        mahalanobis_sq += delta * delta;
    }
    (-0.5 * mahalanobis_sq).exp()
}

fn per_emotion_floor(name: &str) -> f64 {
    ENTROPY_FLOOR_PER_EMOTION
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, gamma)| *gamma)
        .unwrap_or(0.0)
}

fn scale(scores: &mut BTreeMap<&'static str, f64>, names: &[&'static str], factor: f64) {
    for name in names {
        if let Some(value) = scores.get_mut(name) {
            *value *= factor;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> AffectEngine {
        AffectEngine::new().unwrap()
    }

    fn rgb(r: f64, g: f64, b: f64) -> Rgb {
        Rgb::new(r, g, b).unwrap()
    }

    #[test]
    fn kernel_is_positive_and_peaks_at_center() {
        let proto = EmotionPrototype {
            name: "test",
            center: [0.5, 0.5, 0.5],
            spread: [0.1, 0.1, 0.1],
        };
        let at_center = Pad {
            pleasure: 0.5,
            arousal: 0.5,
            dominance: 0.5,
        };
        let near = Pad {
            pleasure: 0.55,
            arousal: 0.5,
            dominance: 0.5,
        };
        let far = Pad {
            pleasure: 0.9,
            arousal: 0.5,
            dominance: 0.5,
        };
        let k0 = kernel_likelihood(at_center, &proto);
        let k1 = kernel_likelihood(near, &proto);
        let k2 = kernel_likelihood(far, &proto);
        assert!((k0 - 1.0).abs() < 1e-12);
        assert!(k0 > k1 && k1 > k2);
        assert!(k2 > 0.0);
    }

    #[test]
    fn scale_multiplies_only_the_named_entries() {
        let mut scores: BTreeMap<&'static str, f64> =
            [("anger", 0.5), ("calm", 0.5), ("joy", 0.5)].into();
        scale(&mut scores, &["anger", "joy"], 2.0);
        assert!((scores["anger"] - 1.0).abs() < 1e-12);
        assert!((scores["joy"] - 1.0).abs() < 1e-12);
        assert!((scores["calm"] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn probabilities_sum_to_one() {
        let engine = engine();
        for color in [
            rgb(1.0, 0.0, 0.0),
            rgb(0.0, 0.0, 0.0),
            rgb(1.0, 1.0, 1.0),
            rgb(0.2, 0.7, 0.3),
            rgb(0.5, 0.5, 0.5),
        ] {
            let result = engine.evaluate(color);
            let total: f64 = result.probs.values().sum();
            assert!((total - 1.0).abs() < 1e-9, "sum = {}", total);
        }
    }

    #[test]
    fn every_emotion_keeps_positive_probability() {
        let result = engine().evaluate(rgb(0.1, 0.9, 0.1));
        for (name, p) in &result.probs {
            assert!(*p > 0.0, "{} collapsed to zero", name);
        }
    }

    #[test]
    fn vivid_red_enforces_anger_floor() {
        // Saturated mid-lightness red: bin red, S >= 0.6, L* in [45, 70].
        let engine = engine();
        let result = engine.evaluate(rgb(0.86, 0.08, 0.08));
        assert_eq!(result.bin, HueBin::Red);
        let anger = result.probs["anger"];
        let mean_ref = 0.5 * (result.probs["love"] + result.probs["amusement"]);
        assert!(
            anger >= 0.90 * mean_ref - 1e-9,
            "anger {} < floor {}",
            anger,
            0.90 * mean_ref
        );
    }

    #[test]
    fn anger_floor_never_lowers_anger() {
        // Same gates, but anger already dominates through the red prior;
        // the floor must leave it untouched.
        let engine = engine();
        let result = engine.evaluate(rgb(0.86, 0.08, 0.08));
        let mut no_floor_params = EngineParams::default();
        no_floor_params.anger_floor.ratio = 0.0;
        let reference = AffectEngine::with_params(no_floor_params)
            .unwrap()
            .evaluate(rgb(0.86, 0.08, 0.08));
        assert!(result.probs["anger"] >= reference.probs["anger"] - 1e-12);
    }

    #[test]
    fn dark_gray_carries_more_negative_mass_than_mid_gray() {
        let engine = engine();
        let negative = ["sad", "tired", "anxious", "anger"];
        let mass = |result: &EngineResult| -> f64 {
            negative.iter().map(|name| result.probs[name]).sum()
        };
        // L* ≈ 21 vs L* ≈ 60, both achromatic.
        let dark = engine.evaluate(rgb(0.2, 0.2, 0.2));
        let mid = engine.evaluate(rgb(0.55, 0.55, 0.55));
        assert!(mass(&dark) > mass(&mid));
    }

    #[test]
    fn light_achromatic_favors_positive_low_arousal() {
        let engine = engine();
        let white = engine.evaluate(rgb(0.98, 0.98, 0.98));
        assert_eq!(white.bin, HueBin::White);
        let positive: f64 = ["hope", "gratitude", "calm", "content"]
            .iter()
            .map(|name| white.probs[name])
            .sum();
        let negative: f64 = ["sad", "anger", "disgust", "shame"]
            .iter()
            .map(|name| white.probs[name])
            .sum();
        assert!(positive > negative);
    }

    #[test]
    fn repeated_evaluation_is_deterministic() {
        let engine = engine();
        let color = rgb(0.31, 0.62, 0.47);
        let a = engine.evaluate(color);
        let b = engine.evaluate(color);
        assert_eq!(a, b);
        assert_eq!(a.top, b.top);
    }

    #[test]
    fn separately_constructed_engines_agree() {
        let color = rgb(0.9, 0.4, 0.1);
        let a = AffectEngine::new().unwrap().evaluate(color);
        let b = AffectEngine::new().unwrap().evaluate(color);
        assert_eq!(a, b);
    }

    #[test]
    fn top_k_is_sorted_descending_with_name_tie_break() {
        let result = engine().evaluate(rgb(0.3, 0.4, 0.9));
        assert_eq!(result.top.len(), 5);
        for pair in result.top.windows(2) {
            assert!(
                pair[0].1 > pair[1].1 || (pair[0].1 == pair[1].1 && pair[0].0 < pair[1].0),
                "ordering violated: {:?}",
                pair
            );
        }
    }

    #[test]
    fn top_k_respects_configured_size() {
        let params = EngineParams {
            top_k: 3,
            ..EngineParams::default()
        };
        let engine = AffectEngine::with_params(params).unwrap();
        assert_eq!(engine.evaluate(rgb(0.5, 0.1, 0.8)).top.len(), 3);
    }

    #[test]
    fn evaluate_hex_matches_evaluate() {
        let engine = engine();
        let via_hex = engine.evaluate_hex("#FF0000").unwrap();
        let via_rgb = engine.evaluate(rgb(1.0, 0.0, 0.0));
        assert_eq!(via_hex, via_rgb);
        assert!(engine.evaluate_hex("#nope").is_err());
    }

    #[test]
    fn family_label_tracks_pad() {
        let engine = engine();
        let result = engine.evaluate(rgb(0.95, 0.95, 0.4));
        assert!(result.family.starts_with(if result.pad.pleasure >= 0.5 {
            "positive"
        } else {
            "negative"
        }));
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AffectEngine>();
        assert_send_sync::<EngineResult>();
    }
}
