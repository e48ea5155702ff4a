//! Binary layouts for account data
//!
//! A [`Layout`] reads a value out of a byte buffer at a given offset and
//! writes it back. Composite layouts own their inner layouts and resolve
//! their members left to right, since the offset of every member depends on
//! the size of the ones before it.

mod int;
mod mapped;
mod option;
mod record;
mod tuple;
mod vec;

pub use {
    int::{I64, U32, U64, U8},
    mapped::{pubkey, Blob, BoolLayout, EnumLayout, Mapped, PubkeyLayout},
    option::OptionLayout,
    record::{Record, RecordLayout, RecordReader, RecordWriter},
    vec::VecLayout,
};

use crate::error::LayoutError;

/// Number of bytes a layout occupies
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Span {
    /// Every value takes exactly this many bytes
    Fixed(usize),
    /// The size depends on the data, see [`Layout::span_of`]
    Variable,
}

impl Span {
    /// The fixed size, if there is one
    pub fn fixed(self) -> Option<usize> {
        match self {
            Self::Fixed(len) => Some(len),
            Self::Variable => None,
        }
    }
}

/// Encoder and decoder for a single kind of value
pub trait Layout {
    /// Type produced by decoding
    type Value;

    /// Size of every encoding, when it does not depend on the data
    fn span(&self) -> Span;

    /// Reads a value starting at `offset`
    fn decode(&self, data: &[u8], offset: usize) -> Result<Self::Value, LayoutError>;

    /// Writes `value` starting at `offset`, returning the number of bytes
    /// written
    fn encode(
        &self,
        value: &Self::Value,
        data: &mut [u8],
        offset: usize,
    ) -> Result<usize, LayoutError>;

    /// Number of bytes `encode` writes for `value`
    fn encoded_len(&self, value: &Self::Value) -> usize;

    /// Number of bytes taken by the encoded value starting at `offset`
    fn span_of(&self, data: &[u8], offset: usize) -> Result<usize, LayoutError> {
        match self.span() {
            Span::Fixed(len) => {
                read_bytes(data, offset, len)?;
                Ok(len)
            }
            Span::Variable => {
                let value = self.decode(data, offset)?;
                Ok(self.encoded_len(&value))
            }
        }
    }

    /// Decodes a value from the start of `data`, ignoring trailing bytes
    fn unpack(&self, data: &[u8]) -> Result<Self::Value, LayoutError> {
        self.decode(data, 0)
    }

    /// Encodes `value` into a freshly allocated buffer of exactly the
    /// required size
    fn pack(&self, value: &Self::Value) -> Result<Vec<u8>, LayoutError> {
        let mut data = vec![0; self.encoded_len(value)];
        self.encode(value, &mut data, 0)?;
        Ok(data)
    }
}

/// Borrows `len` bytes at `offset`, failing if the buffer ends first
pub(crate) fn read_bytes(data: &[u8], offset: usize, len: usize) -> Result<&[u8], LayoutError> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or(LayoutError::TruncatedInput {
            offset,
            needed: len,
            available: data.len().saturating_sub(offset),
        })
}

/// Copies `bytes` to `offset`, failing if the buffer ends first
pub(crate) fn write_bytes(
    data: &mut [u8],
    offset: usize,
    bytes: &[u8],
) -> Result<usize, LayoutError> {
    let available = data.len().saturating_sub(offset);
    let destination = offset
        .checked_add(bytes.len())
        .and_then(|end| data.get_mut(offset..end))
        .ok_or(LayoutError::BufferTooSmall {
            offset,
            needed: bytes.len(),
            available,
        })?;
    destination.copy_from_slice(bytes);
    Ok(bytes.len())
}

#[cfg(test)]
mod tests {
    use {super::*, assert_matches::assert_matches};

    #[test]
    fn read_bytes_past_end() {
        let data = [1u8, 2, 3];
        assert_eq!(read_bytes(&data, 1, 2).unwrap(), &[2, 3]);
        assert_eq!(
            read_bytes(&data, 2, 2).unwrap_err(),
            LayoutError::TruncatedInput {
                offset: 2,
                needed: 2,
                available: 1
            }
        );
        assert_matches!(
            read_bytes(&data, 5, 1),
            Err(LayoutError::TruncatedInput { available: 0, .. })
        );
        assert_matches!(
            read_bytes(&data, usize::MAX, 2),
            Err(LayoutError::TruncatedInput { .. })
        );
    }

    #[test]
    fn write_bytes_past_end() {
        let mut data = [0u8; 4];
        assert_eq!(write_bytes(&mut data, 1, &[7, 8]).unwrap(), 2);
        assert_eq!(data, [0, 7, 8, 0]);
        assert_eq!(
            write_bytes(&mut data, 3, &[1, 2]).unwrap_err(),
            LayoutError::BufferTooSmall {
                offset: 3,
                needed: 2,
                available: 1
            }
        );
    }

    #[test]
    fn fixed_span_of_checks_remaining() {
        let data = [0u8; 10];
        assert_eq!(U64.span_of(&data, 2).unwrap(), 8);
        assert_matches!(
            U64.span_of(&data, 3),
            Err(LayoutError::TruncatedInput { needed: 8, .. })
        );
    }

    #[test]
    fn pack_unpack() {
        let data = U32.pack(&0xdead_beef).unwrap();
        assert_eq!(data, vec![0xef, 0xbe, 0xad, 0xde]);
        // trailing bytes are ignored
        let mut padded = data.clone();
        padded.extend_from_slice(&[9, 9, 9]);
        assert_eq!(U32.unpack(&padded).unwrap(), 0xdead_beef);
    }
}
