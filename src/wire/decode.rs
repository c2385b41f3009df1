//! UBJSON decoding: bytes → `UbjValue`.

use bytes::Buf;

use super::byte_order::{ByteOrder, WirePrimitive};
use super::marker::{self, Marker};
use crate::config::DecoderConfig;
use crate::error::UbjsonError;
use crate::types::{HugeNumber, UbjObject, UbjValue};

/// Declared length of a container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    Count(usize),
    /// Elements follow until an `End` marker.
    Unknown,
}

/// Outcome of reading one element inside a container.
enum Element {
    Value(UbjValue),
    End,
}

/// Decodes a single `UbjValue` from the buffer with default limits.
pub fn decode_value(buf: &mut impl Buf) -> Result<UbjValue, UbjsonError> {
    Decoder::new(buf).parse()
}

/// Pull-based UBJSON reader over a byte buffer.
///
/// Each [`parse`](Self::parse) call consumes exactly one value, including all
/// nested elements. `NoOp` markers in front of any value are skipped. Errors
/// are terminal for the value being read; the cursor is not rewound.
pub struct Decoder<B> {
    buf: B,
    order: ByteOrder,
    config: DecoderConfig,
    depth: usize,
}

impl<B: Buf> Decoder<B> {
    pub fn new(buf: B) -> Self {
        Self::with_config(buf, DecoderConfig::default())
    }

    pub fn with_config(buf: B, config: DecoderConfig) -> Self {
        Self {
            buf,
            order: ByteOrder::new(),
            config,
            depth: 0,
        }
    }

    pub fn get_ref(&self) -> &B {
        &self.buf
    }

    pub fn into_inner(self) -> B {
        self.buf
    }

    /// Returns `true` once every byte of the source has been consumed.
    pub fn is_at_end(&self) -> bool {
        !self.buf.has_remaining()
    }

    /// Reads the next complete value.
    pub fn parse(&mut self) -> Result<UbjValue, UbjsonError> {
        match self.parse_element()? {
            Element::Value(v) => Ok(v),
            Element::End => Err(UbjsonError::UnexpectedEndMarker),
        }
    }

    /// Like [`parse`](Self::parse), but discards the error.
    pub fn try_parse(&mut self) -> Option<UbjValue> {
        self.parse().ok()
    }

    /// Runs any read operation, converting failure into `None`.
    ///
    /// ```
    /// use ubjsonr::wire::Decoder;
    ///
    /// let mut decoder = Decoder::new(&[0x5A_u8][..]);
    /// assert_eq!(decoder.try_read(|d| d.read_int32()), None);
    /// ```
    pub fn try_read<T>(
        &mut self,
        read: impl FnOnce(&mut Self) -> Result<T, UbjsonError>,
    ) -> Option<T> {
        read(self).ok()
    }

    /// Reads the next element of a container being consumed incrementally.
    /// Returns `None` at the `End` marker of an unknown-length container.
    pub fn next_element(&mut self) -> Result<Option<UbjValue>, UbjsonError> {
        match self.parse_element()? {
            Element::Value(v) => Ok(Some(v)),
            Element::End => Ok(None),
        }
    }

    // -- Typed reads --

    pub fn read_null(&mut self) -> Result<(), UbjsonError> {
        self.expect_marker(&[Marker::Null])?;
        Ok(())
    }

    pub fn read_bool(&mut self) -> Result<bool, UbjsonError> {
        let m = self.expect_marker(&[Marker::True, Marker::False])?;
        Ok(m == Marker::True)
    }

    pub fn read_byte(&mut self) -> Result<u8, UbjsonError> {
        self.expect_marker(&[Marker::Byte])?;
        self.read_u8()
    }

    pub fn read_int16(&mut self) -> Result<i16, UbjsonError> {
        self.expect_marker(&[Marker::Int16])?;
        self.read_primitive()
    }

    pub fn read_int32(&mut self) -> Result<i32, UbjsonError> {
        self.expect_marker(&[Marker::Int32])?;
        self.read_primitive()
    }

    pub fn read_int64(&mut self) -> Result<i64, UbjsonError> {
        self.expect_marker(&[Marker::Int64])?;
        self.read_primitive()
    }

    pub fn read_float32(&mut self) -> Result<f32, UbjsonError> {
        self.expect_marker(&[Marker::Float32])?;
        self.read_primitive()
    }

    pub fn read_float64(&mut self) -> Result<f64, UbjsonError> {
        self.expect_marker(&[Marker::Float64])?;
        self.read_primitive()
    }

    pub fn read_huge(&mut self) -> Result<HugeNumber, UbjsonError> {
        let m = self.expect_marker(&[Marker::Huge, Marker::ShortHuge])?;
        self.read_huge_body(m.is_short())
    }

    pub fn read_string(&mut self) -> Result<String, UbjsonError> {
        let m = self.expect_marker(&[Marker::String, Marker::ShortString])?;
        self.read_string_body(m.is_short())
    }

    pub fn read_array(&mut self) -> Result<Vec<UbjValue>, UbjsonError> {
        let m = self.expect_marker(&[Marker::Array, Marker::ShortArray])?;
        self.read_array_body(m.is_short())
    }

    pub fn read_object(&mut self) -> Result<UbjObject, UbjsonError> {
        let m = self.expect_marker(&[Marker::Object, Marker::ShortObject])?;
        self.read_object_body(m.is_short())
    }

    /// Reads only an array header; elements are left for the caller.
    pub fn read_array_header(&mut self) -> Result<Length, UbjsonError> {
        let m = self.expect_marker(&[Marker::Array, Marker::ShortArray])?;
        self.read_length(m.is_short())
    }

    /// Reads only an object header; key/value pairs are left for the caller.
    pub fn read_object_header(&mut self) -> Result<Length, UbjsonError> {
        let m = self.expect_marker(&[Marker::Object, Marker::ShortObject])?;
        self.read_length(m.is_short())
    }

    // -- Dispatch --

    fn parse_element(&mut self) -> Result<Element, UbjsonError> {
        let m = self.next_marker()?;
        if m == Marker::End {
            return Ok(Element::End);
        }
        self.read_body(m).map(Element::Value)
    }

    /// Reads the next marker byte, skipping `NoOp`s.
    fn next_marker(&mut self) -> Result<Marker, UbjsonError> {
        loop {
            let raw = self.read_u8()?;
            match Marker::classify(raw) {
                Marker::NoOp => continue,
                Marker::Unknown => return Err(UbjsonError::InvalidMarker(raw)),
                m => return Ok(m),
            }
        }
    }

    fn expect_marker(&mut self, allowed: &[Marker]) -> Result<Marker, UbjsonError> {
        loop {
            let raw = self.read_u8()?;
            if raw != marker::NOOP {
                return Marker::require(raw, allowed);
            }
        }
    }

    fn read_body(&mut self, m: Marker) -> Result<UbjValue, UbjsonError> {
        match m {
            Marker::Null => Ok(UbjValue::Null),
            Marker::True => Ok(UbjValue::Bool(true)),
            Marker::False => Ok(UbjValue::Bool(false)),
            Marker::Byte => Ok(UbjValue::Byte(self.read_u8()?)),
            Marker::Int16 => Ok(UbjValue::Int16(self.read_primitive()?)),
            Marker::Int32 => Ok(UbjValue::Int32(self.read_primitive()?)),
            Marker::Int64 => Ok(UbjValue::Int64(self.read_primitive()?)),
            Marker::Float32 => Ok(UbjValue::Float32(self.read_primitive()?)),
            Marker::Float64 => Ok(UbjValue::Float64(self.read_primitive()?)),
            Marker::ShortHuge | Marker::Huge => {
                self.read_huge_body(m.is_short()).map(UbjValue::Huge)
            }
            Marker::ShortString | Marker::String => {
                self.read_string_body(m.is_short()).map(UbjValue::String)
            }
            Marker::ShortArray | Marker::Array => {
                self.read_array_body(m.is_short()).map(UbjValue::Array)
            }
            Marker::ShortObject | Marker::Object => {
                self.read_object_body(m.is_short()).map(UbjValue::Object)
            }
            Marker::NoOp | Marker::End | Marker::Unknown => {
                Err(UbjsonError::InvalidMarker(m.byte()))
            }
        }
    }

    // -- Raw reads --

    fn ensure_remaining(&self, needed: usize) -> Result<(), UbjsonError> {
        let remaining = self.buf.remaining();
        if remaining < needed {
            Err(UbjsonError::UnexpectedEndOfStream { needed, remaining })
        } else {
            Ok(())
        }
    }

    fn read_u8(&mut self) -> Result<u8, UbjsonError> {
        self.ensure_remaining(1)?;
        Ok(self.buf.get_u8())
    }

    fn read_primitive<T: WirePrimitive>(&mut self) -> Result<T, UbjsonError> {
        self.ensure_remaining(T::SIZE)?;
        let mut bytes = T::Bytes::default();
        self.buf.copy_to_slice(bytes.as_mut());
        Ok(self.order.decode(bytes))
    }

    fn read_length(&mut self, short: bool) -> Result<Length, UbjsonError> {
        let length = if short {
            match self.read_u8()? {
                marker::UNKNOWN_LENGTH => Length::Unknown,
                n => Length::Count(usize::from(n)),
            }
        } else {
            match self.read_primitive::<i32>()? {
                -1 => Length::Unknown,
                n if n < 0 => return Err(UbjsonError::InvalidLength(i64::from(n))),
                n => Length::Count(n as usize),
            }
        };
        if let Length::Count(n) = length {
            let limit = self.config.length_limit();
            if n > limit {
                tracing::debug!(length = n, limit, "declared length over limit");
                return Err(UbjsonError::LengthExceeded { length: n, limit });
            }
        }
        Ok(length)
    }

    /// Reads an explicit byte count; the unknown-length sentinel is illegal here.
    fn read_count(&mut self, short: bool) -> Result<usize, UbjsonError> {
        match self.read_length(short)? {
            Length::Count(n) => Ok(n),
            Length::Unknown if short => Err(UbjsonError::InvalidLength(i64::from(
                marker::UNKNOWN_LENGTH,
            ))),
            Length::Unknown => Err(UbjsonError::InvalidLength(-1)),
        }
    }

    fn read_string_body(&mut self, short: bool) -> Result<String, UbjsonError> {
        let len = self.read_count(short)?;
        self.ensure_remaining(len)?;
        let mut data = vec![0u8; len];
        self.buf.copy_to_slice(&mut data);
        Ok(String::from_utf8(data)?)
    }

    fn read_huge_body(&mut self, short: bool) -> Result<HugeNumber, UbjsonError> {
        self.read_string_body(short)?.parse()
    }

    // -- Containers --

    fn enter(&mut self) -> Result<(), UbjsonError> {
        let limit = self.config.depth_limit();
        if self.depth >= limit {
            tracing::debug!(limit, "container nesting too deep");
            return Err(UbjsonError::DepthExceeded(limit));
        }
        self.depth += 1;
        Ok(())
    }

    fn read_array_body(&mut self, short: bool) -> Result<Vec<UbjValue>, UbjsonError> {
        let length = self.read_length(short)?;
        self.enter()?;
        let items = self.read_items(length);
        self.depth -= 1;
        items
    }

    fn read_items(&mut self, length: Length) -> Result<Vec<UbjValue>, UbjsonError> {
        match length {
            Length::Count(n) => {
                // Every element takes at least one byte.
                let mut items = Vec::with_capacity(n.min(self.buf.remaining()));
                for _ in 0..n {
                    items.push(self.parse()?);
                }
                Ok(items)
            }
            Length::Unknown => {
                let mut items = Vec::new();
                loop {
                    match self.parse_element()? {
                        Element::Value(v) => items.push(v),
                        Element::End => return Ok(items),
                    }
                }
            }
        }
    }

    fn read_object_body(&mut self, short: bool) -> Result<UbjObject, UbjsonError> {
        let length = self.read_length(short)?;
        self.enter()?;
        let entries = self.read_entries(length);
        self.depth -= 1;
        entries
    }

    fn read_entries(&mut self, length: Length) -> Result<UbjObject, UbjsonError> {
        match length {
            Length::Count(n) => {
                // Every entry takes at least two bytes.
                let mut entries = Vec::with_capacity(n.min(self.buf.remaining() / 2));
                for _ in 0..n {
                    let key = object_key(self.parse()?)?;
                    let value = self.parse()?;
                    entries.push((key, value));
                }
                Ok(entries)
            }
            Length::Unknown => {
                let mut entries = Vec::new();
                loop {
                    let key = match self.parse_element()? {
                        Element::Value(k) => object_key(k)?,
                        Element::End => return Ok(entries),
                    };
                    let value = self.parse()?;
                    entries.push((key, value));
                }
            }
        }
    }
}

/// Object keys are canonically strings; other scalars are stringified.
fn object_key(value: UbjValue) -> Result<String, UbjsonError> {
    match value {
        UbjValue::String(s) => Ok(s),
        UbjValue::Array(_) | UbjValue::Object(_) => Err(UbjsonError::InvalidKey(format!(
            "container used as object key: {value}"
        ))),
        other => Ok(other.to_string()),
    }
}
