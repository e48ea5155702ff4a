//! Little-endian integer layouts

use {
    super::{read_bytes, write_bytes, Layout, Span},
    crate::error::LayoutError,
    std::mem::size_of,
};

/// Simple macro for implementing fixed-size little-endian integer layouts.
///
/// Signed integers go through `from_le_bytes`/`to_le_bytes`, which read and
/// write the two's-complement representation over the full width.
macro_rules! impl_int_layout {
    ($(#[$meta:meta])* $name:ident, $int:ty) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
        pub struct $name;

        impl $name {
            /// Encoded length in bytes
            pub const LEN: usize = size_of::<$int>();
        }

        impl Layout for $name {
            type Value = $int;

            fn span(&self) -> Span {
                Span::Fixed(Self::LEN)
            }

            fn decode(&self, data: &[u8], offset: usize) -> Result<$int, LayoutError> {
                let mut bytes = [0u8; size_of::<$int>()];
                bytes.copy_from_slice(read_bytes(data, offset, Self::LEN)?);
                Ok(<$int>::from_le_bytes(bytes))
            }

            fn encode(
                &self,
                value: &$int,
                data: &mut [u8],
                offset: usize,
            ) -> Result<usize, LayoutError> {
                write_bytes(data, offset, &value.to_le_bytes())
            }

            fn encoded_len(&self, _value: &$int) -> usize {
                Self::LEN
            }
        }
    };
}

impl_int_layout!(
    /// `u8` layout, used for tags, bump seeds and percentages
    U8,
    u8
);
impl_int_layout!(
    /// `u32` layout, used for vector lengths and seed suffixes
    U32,
    u32
);
impl_int_layout!(
    /// `u64` layout, used for lamport and pool token amounts
    U64,
    u64
);
impl_int_layout!(
    /// `i64` layout, stored as 64-bit two's complement
    I64,
    i64
);
