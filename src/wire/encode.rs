//! UBJSON encoding: `UbjValue` → bytes.

use bytes::{BufMut, Bytes, BytesMut};

use super::byte_order::{ByteOrder, WirePrimitive};
use super::marker::{self, Marker};
use crate::config::LengthPolicy;
use crate::error::UbjsonError;
use crate::types::{Field, HugeNumber, SerializableView, UbjValue};

/// Encodes a `UbjValue` into the buffer using the compact length policy.
pub fn encode_value(buf: &mut BytesMut, value: &UbjValue) -> Result<(), UbjsonError> {
    Encoder::new(buf).write(value)
}

/// Encodes a `UbjValue` into a fresh buffer.
pub fn to_bytes(value: &UbjValue) -> Result<Bytes, UbjsonError> {
    let mut buf = BytesMut::new();
    encode_value(&mut buf, value)?;
    Ok(buf.freeze())
}

/// UBJSON writer over a byte sink.
///
/// Scalar writes cannot fail. Writes involving a length fail only when the
/// length does not fit the 4-byte normal form, or when a serializable view
/// contains an unsupported member; output written before the failure stays in
/// the sink.
pub struct Encoder<B> {
    buf: B,
    order: ByteOrder,
    policy: LengthPolicy,
}

impl<B: BufMut> Encoder<B> {
    pub fn new(buf: B) -> Self {
        Self::with_policy(buf, LengthPolicy::default())
    }

    pub fn with_policy(buf: B, policy: LengthPolicy) -> Self {
        Self {
            buf,
            order: ByteOrder::new(),
            policy,
        }
    }

    pub fn get_ref(&self) -> &B {
        &self.buf
    }

    pub fn get_mut(&mut self) -> &mut B {
        &mut self.buf
    }

    pub fn into_inner(self) -> B {
        self.buf
    }

    /// Writes one complete value.
    pub fn write(&mut self, value: &UbjValue) -> Result<(), UbjsonError> {
        match value {
            UbjValue::Null => self.write_null(),
            UbjValue::Bool(b) => self.write_bool(*b),
            UbjValue::Byte(b) => self.write_byte(*b),
            UbjValue::Int16(i) => self.write_int16(*i),
            UbjValue::Int32(i) => self.write_int32(*i),
            UbjValue::Int64(i) => self.write_int64(*i),
            UbjValue::Float32(f) => self.write_float32(*f),
            UbjValue::Float64(f) => self.write_float64(*f),
            UbjValue::Huge(n) => return self.write_huge(n),
            UbjValue::String(s) => return self.write_string(s),
            UbjValue::Array(items) => return self.write_array(items),
            UbjValue::Object(entries) => return self.write_object(entries),
        }
        Ok(())
    }

    /// Like [`write`](Self::write), reporting only success.
    pub fn try_write(&mut self, value: &UbjValue) -> bool {
        self.write(value).is_ok()
    }

    pub fn write_null(&mut self) {
        self.buf.put_u8(marker::NULL);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.put_u8(if value { marker::TRUE } else { marker::FALSE });
    }

    pub fn write_byte(&mut self, value: u8) {
        self.buf.put_u8(marker::BYTE);
        self.buf.put_u8(value);
    }

    pub fn write_int16(&mut self, value: i16) {
        self.buf.put_u8(marker::INT_16);
        self.put_primitive(value);
    }

    pub fn write_int32(&mut self, value: i32) {
        self.buf.put_u8(marker::INT_32);
        self.put_primitive(value);
    }

    pub fn write_int64(&mut self, value: i64) {
        self.buf.put_u8(marker::INT_64);
        self.put_primitive(value);
    }

    pub fn write_float32(&mut self, value: f32) {
        self.buf.put_u8(marker::FLOAT_32);
        self.put_primitive(value);
    }

    pub fn write_float64(&mut self, value: f64) {
        self.buf.put_u8(marker::FLOAT_64);
        self.put_primitive(value);
    }

    /// Writes the canonical text of `value` under the huge-number markers.
    pub fn write_huge(&mut self, value: &HugeNumber) -> Result<(), UbjsonError> {
        self.write_text(&value.to_string(), Marker::ShortHuge, Marker::Huge)
    }

    /// Writes a string (length = UTF-8 byte count, not char count).
    pub fn write_string(&mut self, value: &str) -> Result<(), UbjsonError> {
        self.write_text(value, Marker::ShortString, Marker::String)
    }

    pub fn write_array(&mut self, items: &[UbjValue]) -> Result<(), UbjsonError> {
        self.write_array_header(items.len())?;
        for item in items {
            self.write(item)?;
        }
        Ok(())
    }

    pub fn write_object(&mut self, entries: &[(String, UbjValue)]) -> Result<(), UbjsonError> {
        self.write_object_header(entries.len())?;
        for (key, value) in entries {
            self.write_string(key)?;
            self.write(value)?;
        }
        Ok(())
    }

    /// Writes a composite through its serializable view, as a known-length
    /// object.
    pub fn write_view(&mut self, view: &dyn SerializableView) -> Result<(), UbjsonError> {
        let entries = view.entries();
        self.write_object_header(entries.len())?;
        for (key, field) in &entries {
            self.write_string(key)?;
            self.write_field(field)?;
        }
        Ok(())
    }

    pub fn write_field(&mut self, field: &Field<'_>) -> Result<(), UbjsonError> {
        match field {
            Field::Value(v) => self.write(v),
            Field::Ref(v) => self.write(v),
            Field::View(view) => self.write_view(*view),
            Field::Array(items) => {
                self.write_array_header(items.len())?;
                for item in items {
                    self.write_field(item)?;
                }
                Ok(())
            }
            Field::Unsupported(kind) => Err(UbjsonError::unsupported(kind)),
        }
    }

    /// Writes only an array header; `count` elements must follow.
    pub fn write_array_header(&mut self, count: usize) -> Result<(), UbjsonError> {
        self.write_length(count, Marker::ShortArray, Marker::Array)
    }

    /// Writes only an object header; `count` key/value pairs must follow.
    pub fn write_object_header(&mut self, count: usize) -> Result<(), UbjsonError> {
        self.write_length(count, Marker::ShortObject, Marker::Object)
    }

    /// Starts an unknown-length array. Must be closed with [`end_write`](Self::end_write).
    pub fn begin_array(&mut self) {
        self.buf.put_u8(marker::SHORT_ARRAY);
        self.buf.put_u8(marker::UNKNOWN_LENGTH);
    }

    /// Starts an unknown-length object. Keys are written with
    /// [`write_string`](Self::write_string), each followed by its value.
    pub fn begin_object(&mut self) {
        self.buf.put_u8(marker::SHORT_OBJECT);
        self.buf.put_u8(marker::UNKNOWN_LENGTH);
    }

    /// Closes the innermost unknown-length container.
    pub fn end_write(&mut self) {
        self.buf.put_u8(marker::END);
    }

    /// Writes a lone `NoOp`, which readers skip.
    pub fn keep_alive(&mut self) {
        self.buf.put_u8(marker::NOOP);
    }

    fn put_primitive<T: WirePrimitive>(&mut self, value: T) {
        let bytes = self.order.encode(value);
        self.buf.put_slice(bytes.as_ref());
    }

    fn write_text(&mut self, value: &str, short: Marker, normal: Marker) -> Result<(), UbjsonError> {
        self.write_length(value.len(), short, normal)?;
        self.buf.put_slice(value.as_bytes());
        Ok(())
    }

    fn write_length(&mut self, len: usize, short: Marker, normal: Marker) -> Result<(), UbjsonError> {
        if self.policy == LengthPolicy::Compact && len <= usize::from(marker::SHORT_LENGTH_MAX) {
            self.buf.put_u8(short.byte());
            self.buf.put_u8(len as u8);
            return Ok(());
        }
        let wire_len = i32::try_from(len).map_err(|_| UbjsonError::LengthExceeded {
            length: len,
            limit: i32::MAX as usize,
        })?;
        self.buf.put_u8(normal.byte());
        self.put_primitive(wire_len);
        Ok(())
    }
}
