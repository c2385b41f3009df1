//! Writes UBJSON values to an async byte stream.

use bytes::BytesMut;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::config::LengthPolicy;
use crate::error::UbjsonError;
use crate::types::{SerializableView, UbjValue};
use crate::wire::encode::Encoder;

/// Writes UBJSON values to an `AsyncWrite` stream.
///
/// Each call encodes into an internal buffer and writes it out whole, so a
/// failed encode never leaves a partial value on the stream.
pub struct ValueWriter<W> {
    writer: W,
    buf: BytesMut,
    policy: LengthPolicy,
}

impl<W: AsyncWrite + Unpin> ValueWriter<W> {
    pub fn new(writer: W) -> Self {
        Self::with_policy(writer, LengthPolicy::default())
    }

    pub fn with_policy(writer: W, policy: LengthPolicy) -> Self {
        Self {
            writer,
            buf: BytesMut::new(),
            policy,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Writes one complete value.
    pub async fn write_value(&mut self, value: &UbjValue) -> Result<(), UbjsonError> {
        self.buf.clear();
        Encoder::with_policy(&mut self.buf, self.policy).write(value)?;
        self.send().await
    }

    /// Writes a composite through its serializable view.
    pub async fn write_view(&mut self, view: &dyn SerializableView) -> Result<(), UbjsonError> {
        self.buf.clear();
        Encoder::with_policy(&mut self.buf, self.policy).write_view(view)?;
        self.send().await
    }

    /// Opens an unknown-length array on the stream.
    pub async fn begin_array(&mut self) -> Result<(), UbjsonError> {
        tracing::trace!("begin streamed array");
        self.buf.clear();
        Encoder::new(&mut self.buf).begin_array();
        self.send().await
    }

    /// Opens an unknown-length object on the stream.
    pub async fn begin_object(&mut self) -> Result<(), UbjsonError> {
        tracing::trace!("begin streamed object");
        self.buf.clear();
        Encoder::new(&mut self.buf).begin_object();
        self.send().await
    }

    /// Closes the innermost unknown-length container.
    pub async fn end_write(&mut self) -> Result<(), UbjsonError> {
        tracing::trace!("end streamed container");
        self.buf.clear();
        Encoder::new(&mut self.buf).end_write();
        self.send().await
    }

    /// Sends a `NoOp` to keep an idle connection open.
    pub async fn keep_alive(&mut self) -> Result<(), UbjsonError> {
        self.buf.clear();
        Encoder::new(&mut self.buf).keep_alive();
        self.send().await
    }

    /// Flushes the underlying writer.
    pub async fn flush(&mut self) -> Result<(), UbjsonError> {
        self.writer.flush().await?;
        Ok(())
    }

    async fn send(&mut self) -> Result<(), UbjsonError> {
        self.writer.write_all(&self.buf).await?;
        Ok(())
    }
}
