//! Emotion prototype and hue-prior registry.
//!
//! Holds the fixed configuration behind the engine: the PAD-space emotion
//! prototypes, the hue-bin taxonomy, and the authored categorical priors
//! per bin. The registry is built once, validates referential integrity
//! between prior rows and prototype names (construction fails on an
//! unknown name instead of silently defaulting), smooths every row with a
//! small epsilon so no emotion is hard-zeroed, and applies the diversity
//! cap with weighted redistribution. After construction it is immutable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Hsv;
use crate::config::AchromaticThresholds;
use crate::error::{AffectError, AffectResult};

/// Smoothing weight granted to every prototype absent from an authored row.
const PRIOR_EPSILON: f64 = 1.0e-4;

/// A named emotion with its PAD-space center and per-axis spread.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmotionPrototype {
    pub name: &'static str,
    /// Center in (pleasure, arousal, dominance) order.
    pub center: [f64; 3],
    /// Per-axis Gaussian spread; every component is > 0.
    pub spread: [f64; 3],
}

/// Tuned prototype table, sorted by name for deterministic iteration.
const PROTOTYPES: &[EmotionPrototype] = &[
    EmotionPrototype {
        name: "amusement",
        center: [0.82, 0.64, 0.50],
        spread: [0.16, 0.16, 0.16],
    },
    EmotionPrototype {
        name: "anger",
        center: [0.18, 0.86, 0.72],
        spread: [0.22, 0.14, 0.20],
    },
    EmotionPrototype {
        name: "anxious",
        center: [0.20, 0.78, 0.50],
        spread: [0.18, 0.16, 0.18],
    },
    EmotionPrototype {
        name: "awe",
        center: [0.72, 0.68, 0.42],
        spread: [0.10, 0.10, 0.12],
    },
    EmotionPrototype {
        name: "boredom",
        center: [0.45, 0.15, 0.35],
        spread: [0.08, 0.14, 0.14],
    },
    EmotionPrototype {
        name: "calm",
        center: [0.74, 0.30, 0.45],
        spread: [0.14, 0.14, 0.14],
    },
    EmotionPrototype {
        name: "content",
        center: [0.72, 0.34, 0.48],
        spread: [0.10, 0.12, 0.10],
    },
    EmotionPrototype {
        name: "disgust",
        center: [0.25, 0.40, 0.40],
        spread: [0.20, 0.18, 0.18],
    },
    EmotionPrototype {
        name: "envy",
        center: [0.28, 0.62, 0.52],
        spread: [0.20, 0.18, 0.18],
    },
    EmotionPrototype {
        name: "fear",
        center: [0.15, 0.82, 0.40],
        spread: [0.18, 0.16, 0.18],
    },
    EmotionPrototype {
        name: "gratitude",
        center: [0.78, 0.36, 0.50],
        spread: [0.16, 0.16, 0.16],
    },
    EmotionPrototype {
        name: "hope",
        center: [0.76, 0.44, 0.52],
        spread: [0.16, 0.16, 0.16],
    },
    EmotionPrototype {
        name: "jealousy",
        center: [0.22, 0.66, 0.55],
        spread: [0.20, 0.18, 0.18],
    },
    EmotionPrototype {
        name: "joy",
        center: [0.90, 0.70, 0.60],
        spread: [0.10, 0.12, 0.12],
    },
    EmotionPrototype {
        name: "love",
        center: [0.80, 0.60, 0.48],
        spread: [0.16, 0.16, 0.16],
    },
    EmotionPrototype {
        name: "nostalgia",
        center: [0.60, 0.32, 0.45],
        spread: [0.09, 0.09, 0.10],
    },
    EmotionPrototype {
        name: "pride",
        center: [0.74, 0.62, 0.60],
        spread: [0.18, 0.18, 0.18],
    },
    EmotionPrototype {
        name: "relaxed",
        center: [0.70, 0.28, 0.46],
        spread: [0.14, 0.14, 0.14],
    },
    EmotionPrototype {
        name: "sad",
        center: [0.14, 0.22, 0.30],
        spread: [0.14, 0.16, 0.16],
    },
    EmotionPrototype {
        name: "shame",
        center: [0.20, 0.35, 0.28],
        spread: [0.20, 0.18, 0.18],
    },
    EmotionPrototype {
        name: "tired",
        center: [0.28, 0.18, 0.28],
        spread: [0.18, 0.18, 0.18],
    },
];

/// Redistribution weight overrides for the diversity cap; emotions not
/// listed redistribute at weight 1.0.
const DIVERSITY_WEIGHTS: &[(&str, f64)] = &[
    ("jealousy", 2.0),
    ("envy", 2.0),
    ("shame", 2.0),
    ("disgust", 2.0),
    ("pride", 1.6),
    ("boredom", 1.6),
    ("hope", 1.2),
    ("fear", 1.2),
];

/// Per-emotion entropy floor added on top of the global floor for
/// low-frequency emotions. The anger-floor reference emotions (love,
/// amusement) receive only the global floor so the vivid-red guarantee
/// survives renormalization.
pub const ENTROPY_FLOOR_PER_EMOTION: &[(&str, f64)] = &[
    ("jealousy", 0.028),
    ("envy", 0.028),
    ("shame", 0.028),
    ("disgust", 0.028),
    ("pride", 0.020),
    ("fear", 0.028),
    ("hope", 0.028),
    ("gratitude", 0.020),
    ("awe", 0.028),
    ("boredom", 0.028),
    ("tired", 0.028),
];

/// One of the 13 color categories used to look up emotion priors.
///
/// Eleven chromatic names cover twelve half-open hue arcs (red owns the two
/// arcs on either side of the 0° wrap); the two achromatic bins are keyed
/// by lightness when saturation falls below the achromatic threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HueBin {
    Red,
    Orange,
    Brown,
    Yellow,
    Olive,
    YellowGreen,
    Green,
    Cyan,
    Blue,
    Purple,
    Magenta,
    GrayBlack,
    White,
}

/// Chromatic hue arcs in ascending order; half-open `[start, end)`.
const HUE_ARCS: &[(f64, f64, HueBin)] = &[
    (0.0, 15.0, HueBin::Red),
    (15.0, 35.0, HueBin::Orange),
    (35.0, 50.0, HueBin::Brown),
    (50.0, 65.0, HueBin::Yellow),
    (65.0, 80.0, HueBin::Olive),
    (80.0, 90.0, HueBin::YellowGreen),
    (90.0, 150.0, HueBin::Green),
    (150.0, 190.0, HueBin::Cyan),
    (190.0, 255.0, HueBin::Blue),
    (255.0, 285.0, HueBin::Purple),
    (285.0, 325.0, HueBin::Magenta),
    (325.0, 360.0, HueBin::Red),
];

impl HueBin {
    /// Stable lowercase name used in priors, logs, and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            HueBin::Red => "red",
            HueBin::Orange => "orange",
            HueBin::Brown => "brown",
            HueBin::Yellow => "yellow",
            HueBin::Olive => "olive",
            HueBin::YellowGreen => "yellow_green",
            HueBin::Green => "green",
            HueBin::Cyan => "cyan",
            HueBin::Blue => "blue",
            HueBin::Purple => "purple",
            HueBin::Magenta => "magenta",
            HueBin::GrayBlack => "gray_black",
            HueBin::White => "white",
        }
    }

    /// Classify a color into exactly one bin.
    ///
    /// Saturation below the achromatic threshold routes on L*: below the
    /// dark ceiling to [`HueBin::GrayBlack`], above the light floor to
    /// [`HueBin::White`]. Chromatic hues resolve through the arc table;
    /// every value in [0, 360) lands in exactly one arc.
    pub fn classify(hsv: Hsv, lab_lightness: f64, thresholds: &AchromaticThresholds) -> HueBin {
        if hsv.s < thresholds.saturation {
            if lab_lightness < thresholds.dark_lightness_max {
                return HueBin::GrayBlack;
            }
            if lab_lightness > thresholds.light_lightness_min {
                return HueBin::White;
            }
            // TODO: mid grays (L* between the dark ceiling and light floor)
            // fall back to the dark-achromatic priors; a dedicated mid-gray
            // row needs a product decision.
            return HueBin::GrayBlack;
        }

        let hue = hsv.h.rem_euclid(360.0);
        for &(start, end, bin) in HUE_ARCS {
            if (start..end).contains(&hue) {
                return bin;
            }
        }
        // Unreachable for finite hue; the arcs cover [0, 360).
        HueBin::Red
    }
}

/// Authored categorical priors per bin. Rows need not mention every
/// emotion; smoothing fills the gaps at construction.
const AUTHORED_PRIORS: &[(HueBin, &[(&str, f64)])] = &[
    (
        HueBin::Red,
        &[
            ("anger", 0.62),
            ("love", 0.16),
            ("amusement", 0.16),
            ("pride", 0.04),
            ("fear", 0.01),
            ("anxious", 0.01),
        ],
    ),
    (
        HueBin::Orange,
        &[
            ("joy", 0.32),
            ("amusement", 0.22),
            ("gratitude", 0.20),
            ("hope", 0.12),
            ("content", 0.14),
        ],
    ),
    (
        HueBin::Yellow,
        &[
            ("joy", 0.42),
            ("amusement", 0.22),
            ("gratitude", 0.18),
            ("hope", 0.10),
            ("content", 0.08),
        ],
    ),
    (
        HueBin::YellowGreen,
        &[
            ("calm", 0.30),
            ("content", 0.24),
            ("envy", 0.18),
            ("jealousy", 0.16),
            ("hope", 0.12),
        ],
    ),
    (
        HueBin::Green,
        &[
            ("calm", 0.36),
            ("content", 0.20),
            ("relaxed", 0.22),
            ("envy", 0.12),
            ("jealousy", 0.10),
        ],
    ),
    (
        HueBin::Cyan,
        &[
            ("calm", 0.34),
            ("content", 0.22),
            ("hope", 0.22),
            ("awe", 0.10),
            ("pride", 0.12),
        ],
    ),
    (
        HueBin::Blue,
        &[
            ("calm", 0.34),
            ("content", 0.22),
            ("hope", 0.20),
            ("awe", 0.10),
            ("pride", 0.14),
        ],
    ),
    (
        HueBin::Purple,
        &[
            ("love", 0.26),
            ("pride", 0.26),
            ("awe", 0.18),
            ("joy", 0.16),
            ("amusement", 0.14),
        ],
    ),
    (
        HueBin::Magenta,
        &[
            ("love", 0.34),
            ("joy", 0.30),
            ("amusement", 0.20),
            ("gratitude", 0.10),
            ("pride", 0.06),
        ],
    ),
    (
        HueBin::Brown,
        &[
            ("disgust", 0.28),
            ("boredom", 0.18),
            ("tired", 0.18),
            ("nostalgia", 0.20),
            ("shame", 0.16),
        ],
    ),
    (
        HueBin::Olive,
        &[
            ("envy", 0.30),
            ("jealousy", 0.28),
            ("disgust", 0.20),
            ("boredom", 0.12),
            ("nostalgia", 0.10),
        ],
    ),
    (
        HueBin::GrayBlack,
        &[
            ("sad", 0.30),
            ("tired", 0.24),
            ("anxious", 0.16),
            ("anger", 0.16),
            ("boredom", 0.14),
        ],
    ),
    (
        HueBin::White,
        &[
            ("hope", 0.30),
            ("gratitude", 0.30),
            ("calm", 0.24),
            ("content", 0.10),
            ("joy", 0.06),
        ],
    ),
];

/// Finalized (smoothed, capped, normalized) prior weights for one bin.
pub type PriorRow = BTreeMap<&'static str, f64>;

/// Validated, immutable prototype and prior registry.
#[derive(Debug, Clone)]
pub struct EmotionRegistry {
    priors: BTreeMap<HueBin, PriorRow>,
    diversity_cap: f64,
}

impl EmotionRegistry {
    /// Build the registry from the authored tables.
    ///
    /// Fails with [`AffectError::UnknownEmotion`] if any prior row or
    /// redistribution/floor override references a name with no prototype.
    /// Construction is deterministic: repeated builds with the same cap
    /// yield identical tables.
    pub fn build(diversity_cap: f64) -> AffectResult<Self> {
        for (name, _) in DIVERSITY_WEIGHTS {
            if prototype(name).is_none() {
                return Err(AffectError::unknown_emotion("diversity_weights", *name));
            }
        }
        for (name, _) in ENTROPY_FLOOR_PER_EMOTION {
            if prototype(name).is_none() {
                return Err(AffectError::unknown_emotion("entropy_floor", *name));
            }
        }

        let mut priors = BTreeMap::new();
        for &(bin, row) in AUTHORED_PRIORS {
            priors.insert(bin, finalize_row(bin, row, diversity_cap)?);
        }

        debug!(
            bins = priors.len(),
            prototypes = PROTOTYPES.len(),
            diversity_cap,
            "emotion registry built"
        );
        Ok(Self {
            priors,
            diversity_cap,
        })
    }

    /// All prototypes, sorted by name.
    pub fn prototypes(&self) -> &'static [EmotionPrototype] {
        PROTOTYPES
    }

    /// Whether a prototype with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        prototype(name).is_some()
    }

    /// Finalized prior row for a bin. Every bin in the taxonomy has a row.
    pub fn prior_row(&self, bin: HueBin) -> &PriorRow {
        &self.priors[&bin]
    }

    /// The configured diversity cap.
    pub fn diversity_cap(&self) -> f64 {
        self.diversity_cap
    }

    /// Iterate all finalized rows.
    pub fn prior_rows(&self) -> impl Iterator<Item = (HueBin, &PriorRow)> {
        self.priors.iter().map(|(bin, row)| (*bin, row))
    }
}

fn prototype(name: &str) -> Option<&'static EmotionPrototype> {
    PROTOTYPES.iter().find(|p| p.name == name)
}

fn diversity_weight(name: &str) -> f64 {
    DIVERSITY_WEIGHTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, w)| *w)
        .unwrap_or(1.0)
}

/// Smooth, normalize, cap, and renormalize one authored row.
fn finalize_row(
    bin: HueBin,
    authored: &[(&'static str, f64)],
    diversity_cap: f64,
) -> AffectResult<PriorRow> {
    let mut row: PriorRow = BTreeMap::new();
    for (name, weight) in authored {
        if prototype(name).is_none() {
            return Err(AffectError::unknown_emotion(bin.name(), *name));
        }
        row.insert(name, *weight);
    }
    for proto in PROTOTYPES {
        row.entry(proto.name).or_insert(PRIOR_EPSILON);
    }

    normalize(&mut row);

    // Diversity cap: clamp the loudest emotion and hand the excess to the
    // rest, proportionally to their redistribution weights. Ties resolve
    // to the lexicographically first name via the sorted map.
    let mut max_name: &'static str = "";
    let mut max_value = f64::MIN;
    for (name, value) in row.iter() {
        if *value > max_value {
            max_name = *name;
            max_value = *value;
        }
    }
    if max_value > diversity_cap {
        let excess = max_value - diversity_cap;
        row.insert(max_name, diversity_cap);

        let total_weight: f64 = row
            .keys()
            .filter(|name| **name != max_name)
            .map(|name| diversity_weight(name))
            .sum();
        let total_weight = total_weight.max(1e-9);
        for (name, value) in row.iter_mut() {
            if *name != max_name {
                *value += excess * diversity_weight(name) / total_weight;
            }
        }
        normalize(&mut row);
    }

    Ok(row)
}

fn normalize(row: &mut PriorRow) {
    let sum: f64 = row.values().sum();
    if sum > 0.0 {
        for value in row.values_mut() {
            *value /= sum;
        }
    }
}
