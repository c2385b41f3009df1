//! ubjsonr: a pure-Rust Universal Binary JSON (UBJSON) codec.
//!
//! This crate reads and writes the draft UBJSON wire format: typed scalars,
//! arbitrary-precision "huge" numbers, length-prefixed strings, and arrays or
//! objects whose element count is either known up front or streamed with a
//! terminating `E` marker.
//!
//! # Architecture
//!
//! - **`wire`**: markers, byte order, and the synchronous `Decoder` / `Encoder`
//! - **`types`**: the `UbjValue` model, `HugeNumber`, and `SerializableView`
//! - **`stream`**: async `ValueReader` / `ValueWriter` over tokio I/O
//! - **`config`**: decoder limits and the encoder length policy
//! - **`error`**: the single `UbjsonError` type
//!
//! ```
//! use ubjsonr::{UbjValue, wire};
//!
//! let value = UbjValue::Array(vec![UbjValue::Int32(7), "seven".into()]);
//! let bytes = wire::to_bytes(&value).unwrap();
//! let decoded = wire::decode_value(&mut &bytes[..]).unwrap();
//! assert_eq!(decoded, value);
//! ```

pub mod config;
pub mod error;
pub mod stream;
pub mod types;
pub mod wire;

pub use config::{DecoderConfig, LengthPolicy};
pub use error::UbjsonError;
pub use types::{Field, HugeNumber, SerializableView, UbjValue};
