//! Conversion of fixed-width numbers to and from wire byte order.
//!
//! UBJSON is big-endian on the wire. The host's native order is captured once
//! when a [`ByteOrder`] is created; bytes are reversed only when it differs.

/// A byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    /// Byte order of the target machine.
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::Big
        } else {
            Self::Little
        }
    }
}

/// A number with a fixed-width wire representation.
pub trait WirePrimitive: Copy {
    /// Native-order byte array of this type.
    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Default;

    const SIZE: usize;

    fn to_native_bytes(self) -> Self::Bytes;

    fn from_native_bytes(bytes: Self::Bytes) -> Self;
}

impl WirePrimitive for i16 {
    type Bytes = [u8; 2];
    const SIZE: usize = 2;

    fn to_native_bytes(self) -> Self::Bytes {
        self.to_ne_bytes()
    }

    fn from_native_bytes(bytes: Self::Bytes) -> Self {
        Self::from_ne_bytes(bytes)
    }
}

impl WirePrimitive for i32 {
    type Bytes = [u8; 4];
    const SIZE: usize = 4;

    fn to_native_bytes(self) -> Self::Bytes {
        self.to_ne_bytes()
    }

    fn from_native_bytes(bytes: Self::Bytes) -> Self {
        Self::from_ne_bytes(bytes)
    }
}

impl WirePrimitive for i64 {
    type Bytes = [u8; 8];
    const SIZE: usize = 8;

    fn to_native_bytes(self) -> Self::Bytes {
        self.to_ne_bytes()
    }

    fn from_native_bytes(bytes: Self::Bytes) -> Self {
        Self::from_ne_bytes(bytes)
    }
}

impl WirePrimitive for f32 {
    type Bytes = [u8; 4];
    const SIZE: usize = 4;

    fn to_native_bytes(self) -> Self::Bytes {
        self.to_ne_bytes()
    }

    fn from_native_bytes(bytes: Self::Bytes) -> Self {
        Self::from_ne_bytes(bytes)
    }
}

impl WirePrimitive for f64 {
    type Bytes = [u8; 8];
    const SIZE: usize = 8;

    fn to_native_bytes(self) -> Self::Bytes {
        self.to_ne_bytes()
    }

    fn from_native_bytes(bytes: Self::Bytes) -> Self {
        Self::from_ne_bytes(bytes)
    }
}

/// Converts between native values and big-endian wire bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteOrder {
    native: Endianness,
}

impl ByteOrder {
    /// Byte order used on the wire.
    pub const WIRE: Endianness = Endianness::Big;

    pub const fn new() -> Self {
        Self {
            native: Endianness::native(),
        }
    }

    pub fn native(&self) -> Endianness {
        self.native
    }

    /// Returns `true` if native bytes must be reversed to reach wire order.
    pub fn needs_swap(&self) -> bool {
        self.native != Self::WIRE
    }

    /// Returns the wire bytes of `value`.
    pub fn encode<T: WirePrimitive>(&self, value: T) -> T::Bytes {
        let mut bytes = value.to_native_bytes();
        if self.needs_swap() {
            bytes.as_mut().reverse();
        }
        bytes
    }

    /// Reads a value back from its wire bytes.
    pub fn decode<T: WirePrimitive>(&self, mut bytes: T::Bytes) -> T {
        if self.needs_swap() {
            bytes.as_mut().reverse();
        }
        T::from_native_bytes(bytes)
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        Self::new()
    }
}
