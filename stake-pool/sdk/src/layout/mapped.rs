//! Byte blobs and layouts that convert another layout's value

use {
    super::{read_bytes, write_bytes, Layout, Span, U8},
    crate::error::LayoutError,
    num_traits::{FromPrimitive, ToPrimitive},
    solana_program::pubkey::{Pubkey, PUBKEY_BYTES},
    std::marker::PhantomData,
};

/// Opaque fixed-size byte array
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Blob<const N: usize>;

impl<const N: usize> Layout for Blob<N> {
    type Value = [u8; N];

    fn span(&self) -> Span {
        Span::Fixed(N)
    }

    fn decode(&self, data: &[u8], offset: usize) -> Result<[u8; N], LayoutError> {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(read_bytes(data, offset, N)?);
        Ok(bytes)
    }

    fn encode(&self, value: &[u8; N], data: &mut [u8], offset: usize) -> Result<usize, LayoutError> {
        write_bytes(data, offset, value)
    }

    fn encoded_len(&self, _value: &[u8; N]) -> usize {
        N
    }
}

/// Wraps a layout, converting its value on the way in and out.
///
/// The conversions are infallible; layouts that can reject a decoded value
/// (bools, enums) have their own types.
pub struct Mapped<L: Layout, T> {
    inner: L,
    decoder: fn(L::Value) -> T,
    encoder: fn(&T) -> L::Value,
}

impl<L: Layout, T> Mapped<L, T> {
    /// Create a layout converting through `decoder` and `encoder`
    pub fn new(inner: L, decoder: fn(L::Value) -> T, encoder: fn(&T) -> L::Value) -> Self {
        Self {
            inner,
            decoder,
            encoder,
        }
    }
}

impl<L: Layout, T> Layout for Mapped<L, T> {
    type Value = T;

    fn span(&self) -> Span {
        self.inner.span()
    }

    fn decode(&self, data: &[u8], offset: usize) -> Result<T, LayoutError> {
        self.inner.decode(data, offset).map(self.decoder)
    }

    fn encode(&self, value: &T, data: &mut [u8], offset: usize) -> Result<usize, LayoutError> {
        self.inner.encode(&(self.encoder)(value), data, offset)
    }

    fn encoded_len(&self, value: &T) -> usize {
        self.inner.encoded_len(&(self.encoder)(value))
    }

    fn span_of(&self, data: &[u8], offset: usize) -> Result<usize, LayoutError> {
        self.inner.span_of(data, offset)
    }
}

/// Public key stored as its raw 32 bytes
pub type PubkeyLayout = Mapped<Blob<PUBKEY_BYTES>, Pubkey>;

fn pubkey_to_bytes(key: &Pubkey) -> [u8; PUBKEY_BYTES] {
    key.to_bytes()
}

/// Layout for a public key
pub fn pubkey() -> PubkeyLayout {
    Mapped::new(Blob, Pubkey::new_from_array, pubkey_to_bytes)
}

/// Single byte holding `0` or `1`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoolLayout {
    property: &'static str,
}

impl BoolLayout {
    /// Create a bool layout for the named field
    pub const fn new(property: &'static str) -> Self {
        Self { property }
    }
}

impl Layout for BoolLayout {
    type Value = bool;

    fn span(&self) -> Span {
        Span::Fixed(U8::LEN)
    }

    fn decode(&self, data: &[u8], offset: usize) -> Result<bool, LayoutError> {
        match U8.decode(data, offset)? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(LayoutError::InvalidDiscriminator {
                field: self.property,
                value,
            }),
        }
    }

    fn encode(&self, value: &bool, data: &mut [u8], offset: usize) -> Result<usize, LayoutError> {
        U8.encode(&u8::from(*value), data, offset)
    }

    fn encoded_len(&self, _value: &bool) -> usize {
        U8::LEN
    }
}

/// Field-less enum stored as a single byte holding the variant index
pub struct EnumLayout<E> {
    property: &'static str,
    _enum: PhantomData<E>,
}

impl<E> EnumLayout<E> {
    /// Create an enum layout for the named field
    pub const fn new(property: &'static str) -> Self {
        Self {
            property,
            _enum: PhantomData,
        }
    }
}

impl<E: FromPrimitive + ToPrimitive> Layout for EnumLayout<E> {
    type Value = E;

    fn span(&self) -> Span {
        Span::Fixed(U8::LEN)
    }

    fn decode(&self, data: &[u8], offset: usize) -> Result<E, LayoutError> {
        let value = U8.decode(data, offset)?;
        E::from_u8(value).ok_or(LayoutError::InvalidDiscriminator {
            field: self.property,
            value,
        })
    }

    fn encode(&self, value: &E, data: &mut [u8], offset: usize) -> Result<usize, LayoutError> {
        let index = value.to_u8().ok_or(LayoutError::UnencodableValue {
            field: self.property,
        })?;
        U8.encode(&index, data, offset)
    }

    fn encoded_len(&self, _value: &E) -> usize {
        U8::LEN
    }
}
