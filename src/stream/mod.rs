//! Async adapters moving UBJSON values over byte streams.

mod frame;
pub mod reader;
pub mod writer;

pub use reader::ValueReader;
pub use writer::ValueWriter;
