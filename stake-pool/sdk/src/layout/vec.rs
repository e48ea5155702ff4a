//! Length-prefixed vectors

use {
    super::{read_bytes, Layout, Span, U32},
    crate::error::LayoutError,
};

/// `Vec<T>` stored as a `u32` element count followed by the elements back to
/// back
pub struct VecLayout<L> {
    element: L,
    property: &'static str,
}

impl<L: Layout> VecLayout<L> {
    /// Create a vector layout for the named field
    pub fn new(element: L, property: &'static str) -> Self {
        Self { element, property }
    }

    fn decode_len(&self, data: &[u8], offset: usize) -> Result<usize, LayoutError> {
        let len = U32.decode(data, offset)?;
        usize::try_from(len).map_err(|_| LayoutError::UnencodableValue {
            field: self.property,
        })
    }
}

impl<L: Layout> Layout for VecLayout<L> {
    type Value = Vec<L::Value>;

    fn span(&self) -> Span {
        Span::Variable
    }

    fn decode(&self, data: &[u8], offset: usize) -> Result<Self::Value, LayoutError> {
        let len = self.decode_len(data, offset)?;
        let mut cursor = offset + U32::LEN;

        // reject impossible lengths before allocating for them
        let capacity = match self.element.span() {
            Span::Fixed(element_len) => {
                let total = len.saturating_mul(element_len);
                read_bytes(data, cursor, total)?;
                len
            }
            Span::Variable => len.min(data.len().saturating_sub(cursor)),
        };

        let mut values = Vec::with_capacity(capacity);
        for _ in 0..len {
            let value = self.element.decode(data, cursor)?;
            cursor += self.element.encoded_len(&value);
            values.push(value);
        }
        Ok(values)
    }

    fn encode(
        &self,
        value: &Self::Value,
        data: &mut [u8],
        offset: usize,
    ) -> Result<usize, LayoutError> {
        let len = u32::try_from(value.len()).map_err(|_| LayoutError::UnencodableValue {
            field: self.property,
        })?;
        let mut cursor = offset + U32.encode(&len, data, offset)?;
        for element in value {
            cursor += self.element.encode(element, data, cursor)?;
        }
        Ok(cursor - offset)
    }

    fn encoded_len(&self, value: &Self::Value) -> usize {
        value
            .iter()
            .fold(U32::LEN, |total, element| {
                total + self.element.encoded_len(element)
            })
    }

    fn span_of(&self, data: &[u8], offset: usize) -> Result<usize, LayoutError> {
        let len = self.decode_len(data, offset)?;
        match self.element.span() {
            Span::Fixed(element_len) => {
                let total = U32::LEN + len.saturating_mul(element_len);
                read_bytes(data, offset, total)?;
                Ok(total)
            }
            Span::Variable => {
                let mut cursor = offset + U32::LEN;
                for _ in 0..len {
                    cursor += self.element.span_of(data, cursor)?;
                }
                Ok(cursor - offset)
            }
        }
    }
}
