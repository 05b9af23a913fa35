//! # Chroma Affect
//!
//! A deterministic Rust engine that maps an sRGB color to a probability
//! distribution over a fixed vocabulary of named emotions, along with a
//! pleasure/arousal/dominance (PAD) summary and a coarse affective-family
//! label. The pipeline runs perceptual color-space conversion, a fixed
//! psychological regression into PAD space, Gaussian kernel likelihood
//! scoring against tuned emotion prototypes, diversity-capped hue-bin
//! priors, two corrective heuristics, and an entropy-floor normalization.
//!
//! ## Quick Start
//!
//! ```rust
//! use chroma_affect::{AffectEngine, Rgb};
//!
//! let engine = AffectEngine::new().unwrap();
//! let result = engine.evaluate(Rgb::from_hex("#D41414").unwrap());
//!
//! println!("family: {}", result.family);
//! for (emotion, probability) in &result.top {
//!     println!("{}: {:.1}%", emotion, probability * 100.0);
//! }
//! ```
//!
//! ## Core Modules
//!
//! - [`color`] - sRGB, HSV, and CIELAB types and conversions
//! - [`affect`] - PAD regression and the family labeler
//! - [`registry`] - emotion prototypes and diversity-capped hue priors
//! - [`engine`] - the evaluation pipeline
//! - [`config`] - engine parameters via TOML
//! - [`logging`] - JSON line-delimited evaluation logging

pub mod affect;
pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod registry;

pub use affect::{family_label, map_to_pad, Pad, Squash};
pub use color::{Hsv, Lab, Rgb};
pub use config::{AchromaticThresholds, AngerFloor, EngineParams};
pub use engine::{AffectEngine, EngineResult};
pub use error::{AffectError, AffectResult};
pub use registry::{EmotionPrototype, EmotionRegistry, HueBin};
