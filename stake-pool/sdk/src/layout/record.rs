//! Records composed of consecutive fields

use {
    super::{Layout, Span},
    crate::error::LayoutError,
    std::marker::PhantomData,
};

/// Reads consecutive fields, each starting where the previous one ended
pub struct RecordReader<'data> {
    data: &'data [u8],
    offset: usize,
}

impl<'data> RecordReader<'data> {
    /// Start reading `data` at `offset`
    pub fn new(data: &'data [u8], offset: usize) -> Self {
        Self { data, offset }
    }

    /// Decode the next field
    pub fn read<L: Layout>(&mut self, layout: &L) -> Result<L::Value, LayoutError> {
        let value = layout.decode(self.data, self.offset)?;
        self.offset += layout.encoded_len(&value);
        Ok(value)
    }

    /// Offset of the next field
    pub fn offset(&self) -> usize {
        self.offset
    }
}

enum Sink<'data> {
    Buffer(&'data mut [u8]),
    Measure,
}

/// Writes consecutive fields, or only measures them
pub struct RecordWriter<'data> {
    sink: Sink<'data>,
    start: usize,
    offset: usize,
}

impl<'data> RecordWriter<'data> {
    /// Start writing into `data` at `offset`
    pub fn new(data: &'data mut [u8], offset: usize) -> Self {
        Self {
            sink: Sink::Buffer(data),
            start: offset,
            offset,
        }
    }

    /// A writer that only adds up the size of the fields it is given
    pub fn measure() -> Self {
        Self {
            sink: Sink::Measure,
            start: 0,
            offset: 0,
        }
    }

    /// Encode the next field
    pub fn write<L: Layout>(&mut self, layout: &L, value: &L::Value) -> Result<(), LayoutError> {
        let written = match &mut self.sink {
            Sink::Buffer(data) => layout.encode(value, data, self.offset)?,
            Sink::Measure => layout.encoded_len(value),
        };
        self.offset += written;
        Ok(())
    }

    /// Bytes written so far
    pub fn written(&self) -> usize {
        self.offset - self.start
    }
}

/// A type made of fields read and written in a fixed order
pub trait Record: Sized {
    /// Size of every encoding, when it does not depend on the data
    const SPAN: Span = Span::Variable;

    /// Read every field in order
    fn read(reader: &mut RecordReader<'_>) -> Result<Self, LayoutError>;

    /// Write every field in order
    fn write(&self, writer: &mut RecordWriter<'_>) -> Result<(), LayoutError>;
}

/// Layout for any [`Record`]
pub struct RecordLayout<T>(PhantomData<T>);

impl<T> RecordLayout<T> {
    /// Create the layout
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for RecordLayout<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Layout for RecordLayout<T> {
    type Value = T;

    fn span(&self) -> Span {
        T::SPAN
    }

    fn decode(&self, data: &[u8], offset: usize) -> Result<T, LayoutError> {
        T::read(&mut RecordReader::new(data, offset))
    }

    fn encode(&self, value: &T, data: &mut [u8], offset: usize) -> Result<usize, LayoutError> {
        let mut writer = RecordWriter::new(data, offset);
        value.write(&mut writer)?;
        Ok(writer.written())
    }

    fn encoded_len(&self, value: &T) -> usize {
        let mut writer = RecordWriter::measure();
        // measuring never touches a buffer, so it cannot fail
        match value.write(&mut writer) {
            Ok(()) => writer.written(),
            Err(_) => 0,
        }
    }
}
