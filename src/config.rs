//! Codec configuration.

/// Default maximum container nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default maximum declared length (bytes for strings, elements for containers).
pub const DEFAULT_MAX_LENGTH: usize = 64 * 1024 * 1024;

/// Limits applied by the [`Decoder`](crate::wire::Decoder) before it allocates
/// or recurses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    max_depth: usize,
    max_length: usize,
}

impl DecoderConfig {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }

    /// Sets the maximum number of nested containers.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets the maximum declared length of a string, huge number or container.
    pub fn max_length(mut self, length: usize) -> Self {
        self.max_length = length;
        self
    }

    pub fn depth_limit(&self) -> usize {
        self.max_depth
    }

    pub fn length_limit(&self) -> usize {
        self.max_length
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// How the [`Encoder`](crate::wire::Encoder) chooses between short and normal
/// length forms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LengthPolicy {
    /// One-byte length whenever the count is at most `0xFE`.
    #[default]
    Compact,
    /// Always the 4-byte big-endian length.
    Normal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DecoderConfig::default();
        assert_eq!(config.depth_limit(), DEFAULT_MAX_DEPTH);
        assert_eq!(config.length_limit(), DEFAULT_MAX_LENGTH);
        assert_eq!(LengthPolicy::default(), LengthPolicy::Compact);
    }

    #[test]
    fn builder_setters() {
        let config = DecoderConfig::new().max_depth(4).max_length(1024);
        assert_eq!(config.depth_limit(), 4);
        assert_eq!(config.length_limit(), 1024);
    }
}
