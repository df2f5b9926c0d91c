//! A builder for big-endian binary test data.

/// A big-endian buffer of bytes, with a builder-style API.
///
/// Intended for assembling binary table fragments in tests; offsets are the
/// caller's responsibility, which keeps failures easy to diagnose against
/// the table layout being exercised.
#[derive(Clone, Debug, Default)]
pub struct BeBuffer {
    data: Vec<u8>,
}

impl BeBuffer {
    /// Create a new, empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current length of the buffer, in bytes.
    ///
    /// Useful when computing the offset of the next thing to be pushed.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append a value to the buffer in big-endian order.
    pub fn push(mut self, value: impl ToBeBytes) -> Self {
        self.data.extend_from_slice(value.to_be_bytes().as_ref());
        self
    }

    /// Append multiple values to the buffer in big-endian order.
    pub fn extend<T: ToBeBytes>(mut self, values: impl IntoIterator<Item = T>) -> Self {
        for value in values {
            self.data.extend_from_slice(value.to_be_bytes().as_ref());
        }
        self
    }

    /// The assembled bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the builder, returning the assembled bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

/// Types that can be written into a [`BeBuffer`].
pub trait ToBeBytes {
    type Bytes: AsRef<[u8]>;

    fn to_be_bytes(&self) -> Self::Bytes;
}

macro_rules! impl_to_be_bytes {
    ($ty:ty, $len:literal) => {
        impl ToBeBytes for $ty {
            type Bytes = [u8; $len];

            fn to_be_bytes(&self) -> [u8; $len] {
                <$ty>::to_be_bytes(*self)
            }
        }
    };
}

impl_to_be_bytes!(u8, 1);
impl_to_be_bytes!(i8, 1);
impl_to_be_bytes!(u16, 2);
impl_to_be_bytes!(i16, 2);
impl_to_be_bytes!(u32, 4);
impl_to_be_bytes!(i32, 4);

// four-byte tags
impl ToBeBytes for [u8; 4] {
    type Bytes = [u8; 4];

    fn to_be_bytes(&self) -> [u8; 4] {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_extend() {
        let buf = BeBuffer::new()
            .push(1u16)
            .push(-2i16)
            .extend([3u16, 4u16])
            .push(*b"liga");
        assert_eq!(
            buf.data(),
            &[0, 1, 0xFF, 0xFE, 0, 3, 0, 4, b'l', b'i', b'g', b'a']
        );
        assert_eq!(buf.len(), 12);
    }
}
