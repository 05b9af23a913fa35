//! Error types for the color-affect engine.
//!
//! Input validation and configuration problems are surfaced as `AffectError`
//! values; once validation passes, evaluation itself is total and cannot
//! fail.

use std::fmt;
use std::io;

/// Result type alias for engine operations.
pub type AffectResult<T> = Result<T, AffectError>;

/// Error type for engine construction and input validation.
#[derive(Debug)]
pub enum AffectError {
    /// An RGB channel was outside [0, 1] or not finite.
    ChannelOutOfRange { channel: &'static str, value: f64 },

    /// A hex color string could not be parsed as `#RRGGBB`.
    MalformedHex { input: String, reason: String },

    /// A prior table row references an emotion with no prototype.
    UnknownEmotion { bin: String, name: String },

    /// A configuration parameter violated its constraint.
    InvalidParameter {
        parameter: String,
        value: String,
        constraint: String,
    },

    /// Underlying I/O failure while reading configuration or writing logs.
    Io(io::Error),
}

impl fmt::Display for AffectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AffectError::ChannelOutOfRange { channel, value } => {
                write!(
                    f,
                    "RGB channel '{}' = {} is outside the valid range [0, 1]",
                    channel, value
                )
            }
            AffectError::MalformedHex { input, reason } => {
                write!(f, "Malformed hex color '{}': {}", input, reason)
            }
            AffectError::UnknownEmotion { bin, name } => {
                write!(
                    f,
                    "Prior table for bin '{}' references unknown emotion '{}'",
                    bin, name
                )
            }
            AffectError::InvalidParameter {
                parameter,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid parameter '{}' = '{}': must satisfy {}",
                    parameter, value, constraint
                )
            }
            AffectError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for AffectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AffectError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for AffectError {
    fn from(err: io::Error) -> Self {
        AffectError::Io(err)
    }
}

// Convenience constructors for common error patterns
impl AffectError {
    /// Create a channel range error.
    pub fn channel_out_of_range(channel: &'static str, value: f64) -> Self {
        AffectError::ChannelOutOfRange { channel, value }
    }

    /// Create a malformed hex error.
    pub fn malformed_hex(input: impl Into<String>, reason: impl Into<String>) -> Self {
        AffectError::MalformedHex {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown emotion error.
    pub fn unknown_emotion(bin: impl Into<String>, name: impl Into<String>) -> Self {
        AffectError::UnknownEmotion {
            bin: bin.into(),
            name: name.into(),
        }
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(
        parameter: impl Into<String>,
        value: impl Into<String>,
        constraint: impl Into<String>,
    ) -> Self {
        AffectError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            constraint: constraint.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_out_of_range_display() {
        let err = AffectError::channel_out_of_range("r", 1.5);
        let msg = err.to_string();
        assert!(msg.contains("'r'"));
        assert!(msg.contains("1.5"));
    }

    #[test]
    fn test_malformed_hex_display() {
        let err = AffectError::malformed_hex("#12", "expected 6 hex digits");
        let msg = err.to_string();
        assert!(msg.contains("#12"));
        assert!(msg.contains("6 hex digits"));
    }

    #[test]
    fn test_unknown_emotion_display() {
        let err = AffectError::unknown_emotion("red", "excitement");
        let msg = err.to_string();
        assert!(msg.contains("red"));
        assert!(msg.contains("excitement"));
    }

    #[test]
    fn test_invalid_parameter_display() {
        let err = AffectError::invalid_parameter("diversity_cap", "1.2", "0 < cap <= 1");
        let msg = err.to_string();
        assert!(msg.contains("diversity_cap"));
        assert!(msg.contains("1.2"));
        assert!(msg.contains("0 < cap <= 1"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AffectError>();
    }
}
