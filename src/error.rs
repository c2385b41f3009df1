//! Error types for the UBJSON codec.

/// Errors that can occur while encoding or decoding UBJSON.
#[derive(Debug, thiserror::Error)]
pub enum UbjsonError {
    #[error("invalid marker: 0x{0:02X}")]
    InvalidMarker(u8),

    #[error("unexpected end of stream: need {needed} bytes but only {remaining} remaining")]
    UnexpectedEndOfStream { needed: usize, remaining: usize },

    #[error("unexpected end-of-container marker")]
    UnexpectedEndMarker,

    #[error("malformed huge number: {0:?}")]
    MalformedHugeNumber(String),

    #[error("unsupported value type: {0}")]
    UnsupportedValueType(String),

    #[error("maximum nesting depth of {0} exceeded")]
    DepthExceeded(usize),

    #[error("invalid length: {0}")]
    InvalidLength(i64),

    #[error("length {length} exceeds limit of {limit}")]
    LengthExceeded { length: usize, limit: usize },

    #[error("invalid UTF-8 string: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("invalid object key: {0}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl UbjsonError {
    /// Wraps a host value kind that has no UBJSON representation.
    pub fn unsupported(kind: impl std::fmt::Display) -> Self {
        Self::UnsupportedValueType(kind.to_string())
    }

    /// Returns `true` if the input was well-formed so far but ended early,
    /// i.e. more bytes could complete it.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::UnexpectedEndOfStream { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_marker_message_carries_byte() {
        let err = UbjsonError::InvalidMarker(0x00);
        assert_eq!(err.to_string(), "invalid marker: 0x00");
    }

    #[test]
    fn only_short_reads_are_incomplete() {
        let short = UbjsonError::UnexpectedEndOfStream {
            needed: 8,
            remaining: 3,
        };
        assert!(short.is_incomplete());
        assert!(!UbjsonError::UnexpectedEndMarker.is_incomplete());
        assert!(!UbjsonError::InvalidMarker(0x01).is_incomplete());
    }

    #[test]
    fn unsupported_wraps_display() {
        let err = UbjsonError::unsupported("callback");
        assert!(matches!(err, UbjsonError::UnsupportedValueType(ref s) if s == "callback"));
    }
}
