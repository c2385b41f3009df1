//! Finds where one encoded value ends in a growing buffer, without decoding it.
//!
//! The scan is resumable: tokens already walked are never visited again when
//! more bytes arrive, so locating a value costs time linear in its size.

use crate::config::DecoderConfig;
use crate::wire::ByteOrder;
use crate::wire::marker::{self, Marker};

/// Outcome of scanning the buffered bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scan {
    /// A complete value starts at the front of the buffer.
    Complete,
    /// More bytes are needed.
    Incomplete,
    /// The bytes can never form a value. The decoder reports the precise error.
    Invalid,
}

/// An open container.
#[derive(Debug)]
struct Frame {
    /// Items still to come, or `None` until an `End` marker. Object keys and
    /// values count as separate items.
    remaining: Option<usize>,
    object: bool,
    seen: usize,
}

impl Frame {
    fn accepts_end(&self) -> bool {
        self.remaining.is_none() && (!self.object || self.seen % 2 == 0)
    }
}

/// Length field of a string, huge number or container header.
enum Header {
    Pending,
    Invalid,
    /// Explicit count, then the offset just past the length field.
    Count(usize, usize),
    Unknown(usize),
}

#[derive(Debug)]
pub(crate) struct FrameScanner {
    config: DecoderConfig,
    order: ByteOrder,
    offset: usize,
    stack: Vec<Frame>,
}

impl FrameScanner {
    pub(crate) fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            order: ByteOrder::new(),
            offset: 0,
            stack: Vec::new(),
        }
    }

    /// Returns `true` when no part of a value has been scanned yet.
    pub(crate) fn is_idle(&self) -> bool {
        self.offset == 0 && self.stack.is_empty()
    }

    pub(crate) fn reset(&mut self) {
        self.offset = 0;
        self.stack.clear();
    }

    /// Continues scanning `buf` from where the previous call stopped. `buf`
    /// must hold the same leading bytes as before, possibly extended.
    pub(crate) fn scan(&mut self, buf: &[u8]) -> Scan {
        loop {
            let Some(&raw) = buf.get(self.offset) else {
                return Scan::Incomplete;
            };
            let m = Marker::classify(raw);
            let body = self.offset + 1;

            let end = match m {
                Marker::Unknown => return Scan::Invalid,
                Marker::NoOp => {
                    self.offset = body;
                    continue;
                }
                Marker::End => {
                    if !self.stack.last().is_some_and(Frame::accepts_end) {
                        return Scan::Invalid;
                    }
                    self.stack.pop();
                    body
                }
                Marker::ShortHuge | Marker::Huge | Marker::ShortString | Marker::String => {
                    let (len, start) = match self.read_length(buf, body, m.is_short()) {
                        Header::Pending => return Scan::Incomplete,
                        Header::Count(len, start) => (len, start),
                        Header::Invalid | Header::Unknown(_) => return Scan::Invalid,
                    };
                    if buf.len() - start < len {
                        return Scan::Incomplete;
                    }
                    start + len
                }
                Marker::ShortArray | Marker::Array | Marker::ShortObject | Marker::Object => {
                    let object = matches!(m, Marker::ShortObject | Marker::Object);
                    let (remaining, start) = match self.read_length(buf, body, m.is_short()) {
                        Header::Pending => return Scan::Incomplete,
                        Header::Invalid => return Scan::Invalid,
                        Header::Count(n, start) => {
                            (Some(if object { n.saturating_mul(2) } else { n }), start)
                        }
                        Header::Unknown(start) => (None, start),
                    };
                    if self.stack.len() >= self.config.depth_limit() {
                        return Scan::Invalid;
                    }
                    if remaining != Some(0) {
                        self.stack.push(Frame {
                            remaining,
                            object,
                            seen: 0,
                        });
                        self.offset = start;
                        continue;
                    }
                    start
                }
                _ => match m.fixed_width() {
                    Some(width) if buf.len() - body >= width => body + width,
                    Some(_) => return Scan::Incomplete,
                    None => return Scan::Invalid,
                },
            };

            self.offset = end;
            if self.finish_item() {
                return Scan::Complete;
            }
        }
    }

    /// Counts one finished item, closing every counted container it fills.
    /// Returns `true` once the outermost value is complete.
    fn finish_item(&mut self) -> bool {
        while let Some(top) = self.stack.last_mut() {
            top.seen += 1;
            if top.remaining != Some(top.seen) {
                return false;
            }
            self.stack.pop();
        }
        true
    }

    fn read_length(&self, buf: &[u8], at: usize, short: bool) -> Header {
        if short {
            return match buf.get(at) {
                None => Header::Pending,
                Some(&marker::UNKNOWN_LENGTH) => Header::Unknown(at + 1),
                Some(&n) => self.bounded(usize::from(n), at + 1),
            };
        }
        let Some(bytes) = buf.get(at..at + 4).and_then(|b| <[u8; 4]>::try_from(b).ok()) else {
            return Header::Pending;
        };
        match self.order.decode::<i32>(bytes) {
            -1 => Header::Unknown(at + 4),
            n if n < 0 => Header::Invalid,
            n => self.bounded(n as usize, at + 4),
        }
    }

    fn bounded(&self, len: usize, next: usize) -> Header {
        if len > self.config.length_limit() {
            Header::Invalid
        } else {
            Header::Count(len, next)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UbjValue;
    use crate::wire::encode::Encoder;

    fn scanner() -> FrameScanner {
        FrameScanner::new(DecoderConfig::default())
    }

    #[test]
    fn scalars_complete() {
        let mut s = scanner();
        assert_eq!(s.scan(&[marker::NULL]), Scan::Complete);

        let mut s = scanner();
        assert_eq!(s.scan(&[marker::INT_32, 0, 0, 0, 1]), Scan::Complete);
    }

    #[test]
    fn truncated_scalar_is_incomplete() {
        let mut s = scanner();
        assert_eq!(s.scan(&[marker::INT_64, 0, 0]), Scan::Incomplete);
        assert_eq!(s.scan(&[marker::INT_64, 0, 0, 0, 0, 0, 0, 0, 9]), Scan::Complete);
    }

    #[test]
    fn unknown_marker_is_invalid() {
        assert_eq!(scanner().scan(&[0x00]), Scan::Invalid);
        assert_eq!(scanner().scan(&[marker::END]), Scan::Invalid);
    }

    #[test]
    fn resumes_without_rescanning() {
        let mut data = vec![marker::SHORT_ARRAY, marker::UNKNOWN_LENGTH];
        data.extend([marker::NULL; 10]);

        let mut s = scanner();
        assert_eq!(s.scan(&data), Scan::Incomplete);
        assert_eq!(s.offset, data.len());
        assert_eq!(s.stack.len(), 1);
        assert_eq!(s.stack[0].seen, 10);

        data.push(marker::TRUE);
        assert_eq!(s.scan(&data), Scan::Incomplete);
        assert_eq!(s.stack[0].seen, 11);

        data.push(marker::END);
        assert_eq!(s.scan(&data), Scan::Complete);
        assert!(s.stack.is_empty());
    }

    #[test]
    fn string_waits_for_payload() {
        let mut s = scanner();
        assert_eq!(s.scan(&[marker::SHORT_STRING, 3, b'a']), Scan::Incomplete);
        assert_eq!(s.scan(&[marker::SHORT_STRING, 3, b'a', b'b', b'c']), Scan::Complete);
    }

    #[test]
    fn nested_counted_containers() {
        let value = UbjValue::Object(vec![
            ("a".into(), UbjValue::Array(vec![UbjValue::Int16(1), UbjValue::Null])),
            ("b".into(), UbjValue::Array(vec![])),
            ("c".into(), UbjValue::Object(vec![])),
        ]);
        let mut enc = Encoder::new(Vec::<u8>::new());
        enc.write(&value).unwrap();
        let bytes = enc.into_inner();

        for cut in 0..bytes.len() {
            assert_eq!(scanner().scan(&bytes[..cut]), Scan::Incomplete, "cut at {cut}");
        }
        assert_eq!(scanner().scan(&bytes), Scan::Complete);
    }

    #[test]
    fn end_in_value_position_is_invalid() {
        let data = [
            marker::SHORT_OBJECT,
            marker::UNKNOWN_LENGTH,
            marker::SHORT_STRING,
            1,
            b'k',
            marker::END,
        ];
        assert_eq!(scanner().scan(&data), Scan::Invalid);
    }

    #[test]
    fn sentinel_on_string_is_invalid() {
        assert_eq!(
            scanner().scan(&[marker::SHORT_STRING, marker::UNKNOWN_LENGTH]),
            Scan::Invalid
        );
        assert_eq!(
            scanner().scan(&[marker::STRING, 0xFF, 0xFF, 0xFF, 0xFE]),
            Scan::Invalid
        );
    }

    #[test]
    fn limits_are_applied() {
        let config = DecoderConfig::new().max_depth(2).max_length(8);

        let deep = [marker::SHORT_ARRAY, marker::UNKNOWN_LENGTH].repeat(3);
        assert_eq!(FrameScanner::new(config).scan(&deep), Scan::Invalid);

        let long = [marker::SHORT_STRING, 9];
        assert_eq!(FrameScanner::new(config).scan(&long), Scan::Invalid);
    }

    #[test]
    fn noops_inside_containers_are_skipped() {
        let data = [
            marker::SHORT_ARRAY,
            1,
            marker::NOOP,
            marker::NOOP,
            marker::BYTE,
            7,
        ];
        let mut s = scanner();
        assert_eq!(s.scan(&data), Scan::Complete);
        assert_eq!(s.offset, data.len());
    }
}
