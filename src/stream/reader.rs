//! Reads UBJSON values from an async byte stream.

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use super::frame::{FrameScanner, Scan};
use crate::config::DecoderConfig;
use crate::error::UbjsonError;
use crate::types::UbjValue;
use crate::wire::decode::Decoder;
use crate::wire::marker;

/// Default cap on bytes buffered while waiting for one complete value.
pub const DEFAULT_MAX_BUFFER: usize = 16 * 1024 * 1024;

const READ_CHUNK: usize = 8 * 1024;

/// Reads complete UBJSON values from an `AsyncRead` stream.
///
/// Bytes are buffered until a whole value (including every nested element)
/// is available, then decoded once. Keep-alive `NoOp` bytes between values are
/// dropped.
pub struct ValueReader<R> {
    reader: R,
    buf: BytesMut,
    config: DecoderConfig,
    scanner: FrameScanner,
    max_buffer: usize,
}

impl<R: AsyncRead + Unpin> ValueReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, DecoderConfig::default())
    }

    pub fn with_config(reader: R, config: DecoderConfig) -> Self {
        Self {
            reader,
            buf: BytesMut::with_capacity(READ_CHUNK),
            config,
            scanner: FrameScanner::new(config),
            max_buffer: DEFAULT_MAX_BUFFER,
        }
    }

    /// Sets the maximum number of bytes buffered for a single value.
    pub fn max_buffer(mut self, limit: usize) -> Self {
        self.max_buffer = limit;
        self
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Reads the next value.
    ///
    /// Returns `Ok(None)` when the stream ends cleanly between values, and
    /// `UnexpectedEndOfStream` when it ends in the middle of one.
    pub async fn read_value(&mut self) -> Result<Option<UbjValue>, UbjsonError> {
        loop {
            if self.scanner.is_idle() {
                self.skip_keep_alives();
            }

            if !self.buf.is_empty() {
                match self.scanner.scan(&self.buf) {
                    Scan::Incomplete => {}
                    Scan::Complete | Scan::Invalid => return self.decode_buffered().map(Some),
                }
            }

            if self.buf.len() >= self.max_buffer {
                tracing::debug!(
                    buffered = self.buf.len(),
                    limit = self.max_buffer,
                    "value too large"
                );
                return Err(UbjsonError::LengthExceeded {
                    length: self.buf.len(),
                    limit: self.max_buffer,
                });
            }

            self.buf.reserve(READ_CHUNK);
            let n = self.reader.read_buf(&mut self.buf).await?;
            if n == 0 {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                // Truncated value; the decoder names the missing bytes.
                return self.decode_buffered().map(Some);
            }
        }
    }

    /// Decodes the value at the front of the buffer and consumes its bytes.
    fn decode_buffered(&mut self) -> Result<UbjValue, UbjsonError> {
        self.scanner.reset();
        let mut cursor = &self.buf[..];
        let result = Decoder::with_config(&mut cursor, self.config).parse();
        let consumed = self.buf.len() - cursor.len();
        match result {
            Ok(value) => {
                self.buf.advance(consumed);
                Ok(value)
            }
            Err(e) => {
                tracing::debug!(error = %e, "rejected UBJSON input");
                Err(e)
            }
        }
    }

    fn skip_keep_alives(&mut self) {
        let count = self.buf.iter().take_while(|&&b| b == marker::NOOP).count();
        if count > 0 {
            tracing::trace!(count, "skipped keep-alive");
            self.buf.advance(count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::encode::Encoder;
    use std::io::Cursor;
    use tokio::io::AsyncWriteExt;

    fn encode_all(values: &[UbjValue]) -> Vec<u8> {
        let mut enc = Encoder::new(Vec::<u8>::new());
        for v in values {
            enc.write(v).unwrap();
            enc.keep_alive();
        }
        enc.into_inner()
    }

    #[tokio::test]
    async fn read_sequence_then_eof() {
        let values = [
            UbjValue::Int32(1),
            UbjValue::String("two".into()),
            UbjValue::Array(vec![UbjValue::Bool(true)]),
        ];
        let mut reader = ValueReader::new(Cursor::new(encode_all(&values)));
        for expected in &values {
            assert_eq!(reader.read_value().await.unwrap().as_ref(), Some(expected));
        }
        assert!(reader.read_value().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_stream() {
        let mut reader = ValueReader::new(Cursor::new(Vec::new()));
        assert!(reader.read_value().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn keep_alives_only() {
        let data = vec![marker::NOOP; 5];
        let mut reader = ValueReader::new(Cursor::new(data));
        assert!(reader.read_value().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn eof_mid_value() {
        let data = vec![marker::INT_64, 0x00, 0x01];
        let mut reader = ValueReader::new(Cursor::new(data));
        let err = reader.read_value().await.unwrap_err();
        assert!(err.is_incomplete());
    }

    #[tokio::test]
    async fn invalid_marker_surfaces() {
        let mut reader = ValueReader::new(Cursor::new(vec![0x01]));
        let err = reader.read_value().await.unwrap_err();
        assert!(matches!(err, UbjsonError::InvalidMarker(0x01)));
    }

    #[tokio::test]
    async fn value_split_across_reads() {
        let value = UbjValue::Object(vec![
            ("text".into(), UbjValue::String("z".repeat(1000))),
            ("n".into(), UbjValue::Int64(-9)),
        ]);
        let bytes = encode_all(std::slice::from_ref(&value));

        let (client, server) = tokio::io::duplex(16);
        let writer = tokio::spawn(async move {
            let mut client = client;
            for piece in bytes.chunks(7) {
                client.write_all(piece).await.unwrap();
            }
        });

        let mut reader = ValueReader::new(server);
        assert_eq!(reader.read_value().await.unwrap(), Some(value));
        writer.await.unwrap();
        assert!(reader.read_value().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn long_streamed_array_in_small_chunks() {
        const COUNT: usize = 200_000;
        let mut bytes = vec![marker::SHORT_ARRAY, marker::UNKNOWN_LENGTH];
        bytes.extend(std::iter::repeat_n(marker::NULL, COUNT));
        bytes.push(marker::END);
        bytes.extend([marker::INT_16, 0x01, 0x02]);

        let (client, server) = tokio::io::duplex(64);
        let writer = tokio::spawn(async move {
            let mut client = client;
            for piece in bytes.chunks(100) {
                client.write_all(piece).await.unwrap();
            }
        });

        let mut reader = ValueReader::new(server);
        let value = reader.read_value().await.unwrap().unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), COUNT);
        assert!(items.iter().all(UbjValue::is_null));

        assert_eq!(reader.read_value().await.unwrap(), Some(UbjValue::Int16(0x0102)));
        writer.await.unwrap();
        assert!(reader.read_value().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deep_nesting_rejected_before_eof() {
        let config = DecoderConfig::new().max_depth(4);
        let data = [marker::SHORT_ARRAY, marker::UNKNOWN_LENGTH].repeat(10);
        let mut reader = ValueReader::with_config(Cursor::new(data), config);
        let err = reader.read_value().await.unwrap_err();
        assert!(matches!(err, UbjsonError::DepthExceeded(4)));
    }

    #[tokio::test]
    async fn buffer_cap() {
        let mut data = vec![marker::STRING, 0x00, 0x00, 0x10, 0x00];
        data.extend(std::iter::repeat_n(b'a', 64));
        let mut reader = ValueReader::new(Cursor::new(data)).max_buffer(32);
        let err = reader.read_value().await.unwrap_err();
        assert!(matches!(err, UbjsonError::LengthExceeded { limit: 32, .. }));
    }
}
