//! UBJSON marker bytes and the marker table.

use crate::error::UbjsonError;

pub const NULL: u8 = 0x5A; // 'Z'
pub const TRUE: u8 = 0x54; // 'T'
pub const FALSE: u8 = 0x46; // 'F'

// Fixed-width numbers, big-endian payload.
pub const BYTE: u8 = 0x42; // 'B'
pub const INT_16: u8 = 0x69; // 'i'
pub const INT_32: u8 = 0x49; // 'I'
pub const INT_64: u8 = 0x4C; // 'L'
pub const FLOAT_32: u8 = 0x64; // 'd'
pub const FLOAT_64: u8 = 0x44; // 'D'

// Length-prefixed. Lowercase markers carry a 1-byte length, uppercase a 4-byte one.
pub const SHORT_HUGE: u8 = 0x68; // 'h'
pub const HUGE: u8 = 0x48; // 'H'
pub const SHORT_STRING: u8 = 0x73; // 's'
pub const STRING: u8 = 0x53; // 'S'
pub const SHORT_ARRAY: u8 = 0x61; // 'a'
pub const ARRAY: u8 = 0x41; // 'A'
pub const SHORT_OBJECT: u8 = 0x6F; // 'o'
pub const OBJECT: u8 = 0x4F; // 'O'

pub const NOOP: u8 = 0x4E; // 'N'
pub const END: u8 = 0x45; // 'E'

/// Largest count representable in a one-byte length.
pub const SHORT_LENGTH_MAX: u8 = 0xFE;

/// One-byte length announcing an unknown-length container.
pub const UNKNOWN_LENGTH: u8 = 0xFF;

/// The closed set of type markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Marker {
    Null = NULL,
    True = TRUE,
    False = FALSE,
    Byte = BYTE,
    Int16 = INT_16,
    Int32 = INT_32,
    Int64 = INT_64,
    Float32 = FLOAT_32,
    Float64 = FLOAT_64,
    ShortHuge = SHORT_HUGE,
    Huge = HUGE,
    ShortString = SHORT_STRING,
    String = STRING,
    ShortArray = SHORT_ARRAY,
    Array = ARRAY,
    ShortObject = SHORT_OBJECT,
    Object = OBJECT,
    NoOp = NOOP,
    End = END,
    Unknown = 0x00,
}

impl Marker {
    /// Maps a raw byte to its marker. Never fails: undefined bytes are `Unknown`.
    pub fn classify(raw: u8) -> Self {
        match raw {
            NULL => Self::Null,
            TRUE => Self::True,
            FALSE => Self::False,
            BYTE => Self::Byte,
            INT_16 => Self::Int16,
            INT_32 => Self::Int32,
            INT_64 => Self::Int64,
            FLOAT_32 => Self::Float32,
            FLOAT_64 => Self::Float64,
            SHORT_HUGE => Self::ShortHuge,
            HUGE => Self::Huge,
            SHORT_STRING => Self::ShortString,
            STRING => Self::String,
            SHORT_ARRAY => Self::ShortArray,
            ARRAY => Self::Array,
            SHORT_OBJECT => Self::ShortObject,
            OBJECT => Self::Object,
            NOOP => Self::NoOp,
            END => Self::End,
            _ => Self::Unknown,
        }
    }

    /// Classifies `raw` and accepts it only if it is one of `allowed`.
    pub fn require(raw: u8, allowed: &[Marker]) -> Result<Self, UbjsonError> {
        let marker = Self::classify(raw);
        if marker != Self::Unknown && allowed.contains(&marker) {
            Ok(marker)
        } else {
            Err(UbjsonError::InvalidMarker(raw))
        }
    }

    pub fn byte(self) -> u8 {
        self as u8
    }

    /// Returns `true` for the one-byte-length variants.
    pub fn is_short(self) -> bool {
        matches!(
            self,
            Self::ShortHuge | Self::ShortString | Self::ShortArray | Self::ShortObject
        )
    }

    /// Payload size of fixed-width markers; `None` for everything else.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            Self::Null | Self::True | Self::False => Some(0),
            Self::Byte => Some(1),
            Self::Int16 => Some(2),
            Self::Int32 | Self::Float32 => Some(4),
            Self::Int64 | Self::Float64 => Some(8),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Marker; 19] = [
        Marker::Null,
        Marker::True,
        Marker::False,
        Marker::Byte,
        Marker::Int16,
        Marker::Int32,
        Marker::Int64,
        Marker::Float32,
        Marker::Float64,
        Marker::ShortHuge,
        Marker::Huge,
        Marker::ShortString,
        Marker::String,
        Marker::ShortArray,
        Marker::Array,
        Marker::ShortObject,
        Marker::Object,
        Marker::NoOp,
        Marker::End,
    ];

    #[test]
    fn classify_known_markers() {
        for marker in ALL {
            assert_eq!(Marker::classify(marker.byte()), marker);
        }
    }

    #[test]
    fn classify_is_total() {
        let known = (0..=u8::MAX)
            .filter(|&b| Marker::classify(b) != Marker::Unknown)
            .count();
        assert_eq!(known, ALL.len());
        assert_eq!(Marker::classify(0x00), Marker::Unknown);
        assert_eq!(Marker::classify(0xFF), Marker::Unknown);
    }

    #[test]
    fn require_accepts_allowed() {
        let m = Marker::require(SHORT_STRING, &[Marker::String, Marker::ShortString]).unwrap();
        assert_eq!(m, Marker::ShortString);
    }

    #[test]
    fn require_rejects_other_markers() {
        let err = Marker::require(INT_32, &[Marker::String, Marker::ShortString]).unwrap_err();
        assert!(matches!(err, UbjsonError::InvalidMarker(INT_32)));
    }

    #[test]
    fn require_rejects_unknown_even_if_listed() {
        let err = Marker::require(0x00, &[Marker::Unknown]).unwrap_err();
        assert!(matches!(err, UbjsonError::InvalidMarker(0x00)));
    }

    #[test]
    fn short_variants() {
        assert!(Marker::ShortArray.is_short());
        assert!(!Marker::Array.is_short());
        assert!(!Marker::Int16.is_short());
    }

    #[test]
    fn fixed_widths() {
        assert_eq!(Marker::Int64.fixed_width(), Some(8));
        assert_eq!(Marker::Float32.fixed_width(), Some(4));
        assert_eq!(Marker::String.fixed_width(), None);
    }
}
