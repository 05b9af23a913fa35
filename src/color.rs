//! Deterministic color space conversions for the affect pipeline.
//!
//! Provides fixed-parameter conversions from sRGB to HSV and to CIELAB
//! using the CIE 1931 2° standard observer and D65 illuminant, plus the
//! `#RRGGBB` hex representation used at the engine boundary. All
//! transforms are analytic and avoid platform color management, so the
//! same input always produces the same output on every target.

use serde::{Deserialize, Serialize};

use crate::error::{AffectError, AffectResult};

const D65_WHITE_POINT: [f64; 3] = [0.95047, 1.0, 1.08883];
// (6/29)^3 threshold of the CIE f(t) piecewise function
const LAB_EPSILON: f64 = 0.008856451679035631;
const LAB_KAPPA: f64 = 903.2962962962963; // 24389/27

/// An sRGB color with channels validated into [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    r: f64,
    g: f64,
    b: f64,
}

impl Rgb {
    /// Construct a validated sRGB color.
    ///
    /// Out-of-range or non-finite channels are rejected with
    /// [`AffectError::ChannelOutOfRange`]; the engine never clamps input.
    pub fn new(r: f64, g: f64, b: f64) -> AffectResult<Self> {
        for (channel, value) in [("r", r), ("g", g), ("b", b)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(AffectError::channel_out_of_range(channel, value));
            }
        }
        Ok(Self { r, g, b })
    }

    /// Parse a `#RRGGBB` hex string (leading `#` optional, case-insensitive).
    pub fn from_hex(hex: &str) -> AffectResult<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 {
            return Err(AffectError::malformed_hex(
                hex,
                format!("expected 6 hex digits, got {}", digits.len()),
            ));
        }
        let mut channels = [0.0f64; 3];
        for (i, channel) in channels.iter_mut().enumerate() {
            let pair = &digits[i * 2..i * 2 + 2];
            let byte = u8::from_str_radix(pair, 16).map_err(|_| {
                AffectError::malformed_hex(hex, format!("'{}' is not a hex byte", pair))
            })?;
            *channel = f64::from(byte) / 255.0;
        }
        Ok(Self {
            r: channels[0],
            g: channels[1],
            b: channels[2],
        })
    }

    /// Format as uppercase `#RRGGBB` with nearest-integer channel rounding.
    pub fn to_hex(&self) -> String {
        let r = (self.r * 255.0).round() as u8;
        let g = (self.g * 255.0).round() as u8;
        let b = (self.b * 255.0).round() as u8;
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }

    /// Red channel in [0, 1].
    pub fn r(&self) -> f64 {
        self.r
    }

    /// Green channel in [0, 1].
    pub fn g(&self) -> f64 {
        self.g
    }

    /// Blue channel in [0, 1].
    pub fn b(&self) -> f64 {
        self.b
    }
}

/// Hue/saturation/value derived from an [`Rgb`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    /// Hue in degrees, wrapped into [0, 360).
    pub h: f64,
    /// Saturation in [0, 1]; 0 when the value channel is 0.
    pub s: f64,
    /// Value (max channel) in [0, 1].
    pub v: f64,
}

impl Hsv {
    /// Standard max/min-channel HSV computation.
    pub fn from_srgb(rgb: Rgb) -> Self {
        let (r, g, b) = (rgb.r, rgb.g, rgb.b);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let chroma = max - min;

        let mut h = if chroma == 0.0 {
            0.0
        } else if max == r {
            60.0 * (((g - b) / chroma) % 6.0)
        } else if max == g {
            60.0 * (((b - r) / chroma) + 2.0)
        } else {
            60.0 * (((r - g) / chroma) + 4.0)
        };
        if h < 0.0 {
            h += 360.0;
        }

        let s = if max == 0.0 { 0.0 } else { chroma / max };
        Self { h, s, v: max }
    }
}

/// CIELAB coordinates derived from an [`Rgb`] under D65.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lab {
    /// Lightness L* in [0, 100] for in-gamut sRGB input.
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Lab {
    /// Convert sRGB to CIELAB via linear light, XYZ (D65), and CIE f(t).
    pub fn from_srgb(rgb: Rgb) -> Self {
        let r = srgb_to_linear(rgb.r);
        let g = srgb_to_linear(rgb.g);
        let b = srgb_to_linear(rgb.b);

        let x = 0.4124564 * r + 0.3575761 * g + 0.1804375 * b;
        let y = 0.2126729 * r + 0.7151522 * g + 0.0721750 * b;
        let z = 0.0193339 * r + 0.1191920 * g + 0.9503041 * b;

        let fx = lab_f(x / D65_WHITE_POINT[0]);
        let fy = lab_f(y / D65_WHITE_POINT[1]);
        let fz = lab_f(z / D65_WHITE_POINT[2]);

        Self {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }
}

/// Convert an sRGB channel in [0, 1] to linear light.
fn srgb_to_linear(channel: f64) -> f64 {
    if channel <= 0.04045 {
        channel / 12.92
    } else {
        ((channel + 0.055) / 1.055).powf(2.4)
    }
}

fn lab_f(t: f64) -> f64 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        (LAB_KAPPA * t + 16.0) / 116.0
    }
}
