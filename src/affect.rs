//! Dimensional affect mapping from color features to PAD space.
//!
//! Implements a fixed linear regression in the style of Valdez & Mehrabian
//! from normalized lightness and saturation to pleasure/arousal/dominance,
//! with an independent logistic squash per axis. For the bounded inputs
//! the regression produces, every output lands strictly inside (0, 1);
//! far outside that range the squash saturates to 0 or 1 in f64.

use serde::{Deserialize, Serialize};

/// A pleasure/arousal/dominance point, each axis in (0, 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pad {
    pub pleasure: f64,
    pub arousal: f64,
    pub dominance: f64,
}

/// Fixed regression coefficients on (L*/100, saturation) per PAD axis.
const PLEASURE_COEFFS: (f64, f64) = (0.69, 0.22);
const AROUSAL_COEFFS: (f64, f64) = (-0.31, 0.60);
const DOMINANCE_COEFFS: (f64, f64) = (-0.76, 0.32);

/// Logistic squash applied to each raw regression output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Squash {
    /// Input value mapped to 0.5.
    pub center: f64,
    /// Steepness parameter `k` of the logistic; the derivative at the
    /// center is `k / 4`.
    pub slope: f64,
}

impl Default for Squash {
    fn default() -> Self {
        Self {
            center: 0.35,
            slope: 4.2,
        }
    }
}

impl Squash {
    pub fn apply(&self, x: f64) -> f64 {
        1.0 / (1.0 + (-self.slope * (x - self.center)).exp())
    }
}

/// Map normalized lightness (L*/100) and HSV saturation to PAD.
///
/// Total for all finite input; for lightness and saturation in [0, 1] every
/// axis lands strictly inside (0, 1).
pub fn map_to_pad(lightness_norm: f64, saturation: f64, squash: Squash) -> Pad {
    let raw_p = PLEASURE_COEFFS.0 * lightness_norm + PLEASURE_COEFFS.1 * saturation;
    let raw_a = AROUSAL_COEFFS.0 * lightness_norm + AROUSAL_COEFFS.1 * saturation;
    let raw_d = DOMINANCE_COEFFS.0 * lightness_norm + DOMINANCE_COEFFS.1 * saturation;

    Pad {
        pleasure: squash.apply(raw_p),
        arousal: squash.apply(raw_a),
        dominance: squash.apply(raw_d),
    }
}

/// Bucket a PAD point into a coarse valence × arousal-band label.
///
/// Valence ≥ 0.5 reads "positive", otherwise "negative"; arousal splits at
/// 0.33 and 0.66 into "low" / "mid" / "high".
pub fn family_label(pad: Pad) -> &'static str {
    match (pad.pleasure >= 0.5, pad.arousal) {
        (true, a) if a < 0.33 => "positive-low",
        (true, a) if a < 0.66 => "positive-mid",
        (true, _) => "positive-high",
        (false, a) if a < 0.33 => "negative-low",
        (false, a) if a < 0.66 => "negative-mid",
        (false, _) => "negative-high",
    }
}
