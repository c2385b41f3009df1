//! UBJSON binary wire format.
//!
//! Every value starts with a one-byte marker. Fixed-width payloads follow in
//! big-endian order; strings, huge numbers and containers carry a 1-byte
//! (short form) or 4-byte (normal form) length. Containers whose short length
//! byte is `0xFF` run until an `End` marker. `NoOp` may precede any value.

pub mod byte_order;
pub mod decode;
pub mod encode;
pub mod marker;

pub use byte_order::{ByteOrder, Endianness};
pub use decode::{decode_value, Decoder, Length};
pub use encode::{encode_value, to_bytes, Encoder};
pub use marker::Marker;
