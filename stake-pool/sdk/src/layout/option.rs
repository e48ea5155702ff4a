//! Optional values, prefixed with a presence byte

use {
    super::{Layout, Span, U8},
    crate::error::LayoutError,
};

const NONE_TAG: u8 = 0;
const SOME_TAG: u8 = 1;

/// `Option<T>` stored as a `0`/`1` byte followed by the value when present
pub struct OptionLayout<L> {
    inner: L,
    property: &'static str,
}

impl<L: Layout> OptionLayout<L> {
    /// Create an optional layout for the named field
    pub fn new(inner: L, property: &'static str) -> Self {
        Self { inner, property }
    }

    fn decode_tag(&self, data: &[u8], offset: usize) -> Result<bool, LayoutError> {
        match U8.decode(data, offset)? {
            NONE_TAG => Ok(false),
            SOME_TAG => Ok(true),
            value => Err(LayoutError::InvalidDiscriminator {
                field: self.property,
                value,
            }),
        }
    }
}

impl<L: Layout> Layout for OptionLayout<L> {
    type Value = Option<L::Value>;

    fn span(&self) -> Span {
        Span::Variable
    }

    fn decode(&self, data: &[u8], offset: usize) -> Result<Self::Value, LayoutError> {
        if self.decode_tag(data, offset)? {
            self.inner.decode(data, offset + U8::LEN).map(Some)
        } else {
            Ok(None)
        }
    }

    fn encode(
        &self,
        value: &Self::Value,
        data: &mut [u8],
        offset: usize,
    ) -> Result<usize, LayoutError> {
        match value {
            None => U8.encode(&NONE_TAG, data, offset),
            Some(inner) => {
                U8.encode(&SOME_TAG, data, offset)?;
                let written = self.inner.encode(inner, data, offset + U8::LEN)?;
                Ok(U8::LEN + written)
            }
        }
    }

    fn encoded_len(&self, value: &Self::Value) -> usize {
        U8::LEN + value.as_ref().map_or(0, |inner| self.inner.encoded_len(inner))
    }

    fn span_of(&self, data: &[u8], offset: usize) -> Result<usize, LayoutError> {
        if self.decode_tag(data, offset)? {
            Ok(U8::LEN + self.inner.span_of(data, offset + U8::LEN)?)
        } else {
            Ok(U8::LEN)
        }
    }
}
