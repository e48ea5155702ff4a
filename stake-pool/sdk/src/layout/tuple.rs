//! Tuples of layouts, decoded member by member

use {
    super::{Layout, RecordReader, RecordWriter, Span},
    crate::error::LayoutError,
};

macro_rules! impl_tuple_layout {
    ($($member:ident : $index:tt),+) => {
        impl<$($member: Layout),+> Layout for ($($member,)+) {
            type Value = ($(<$member as Layout>::Value,)+);

            fn span(&self) -> Span {
                let mut total = 0;
                $(
                    match self.$index.span() {
                        Span::Fixed(len) => total += len,
                        Span::Variable => return Span::Variable,
                    }
                )+
                Span::Fixed(total)
            }

            fn decode(&self, data: &[u8], offset: usize) -> Result<Self::Value, LayoutError> {
                let mut reader = RecordReader::new(data, offset);
                Ok(($(reader.read(&self.$index)?,)+))
            }

            fn encode(
                &self,
                value: &Self::Value,
                data: &mut [u8],
                offset: usize,
            ) -> Result<usize, LayoutError> {
                let mut writer = RecordWriter::new(data, offset);
                $(writer.write(&self.$index, &value.$index)?;)+
                Ok(writer.written())
            }

            fn encoded_len(&self, value: &Self::Value) -> usize {
                0 $(+ self.$index.encoded_len(&value.$index))+
            }
        }
    };
}

impl_tuple_layout!(A: 0, B: 1);
impl_tuple_layout!(A: 0, B: 1, C: 2);
impl_tuple_layout!(A: 0, B: 1, C: 2, D: 3);
impl_tuple_layout!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_tuple_layout!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::layout::{BoolLayout, OptionLayout, VecLayout, I64, U64, U8},
    };

    #[test]
    fn fixed_members_add_up() {
        let layout = (U8, U64, I64);
        assert_eq!(layout.span(), Span::Fixed(17));
        let value = (3, 1_000, -1_000);
        let data = layout.pack(&value).unwrap();
        assert_eq!(data.len(), 17);
        assert_eq!(data[0], 3);
        assert_eq!(layout.unpack(&data).unwrap(), value);
    }

    #[test]
    fn variable_member_shifts_the_rest() {
        let layout = (
            OptionLayout::new(U64, "maybe"),
            VecLayout::new(U8, "bytes"),
            BoolLayout::new("flag"),
        );
        assert_eq!(layout.span(), Span::Variable);

        let value = (None, vec![1, 2, 3], true);
        let data = layout.pack(&value).unwrap();
        assert_eq!(data, vec![0, 3, 0, 0, 0, 1, 2, 3, 1]);
        assert_eq!(layout.unpack(&data).unwrap(), value);

        let value = (Some(9), vec![], false);
        let data = layout.pack(&value).unwrap();
        assert_eq!(data.len(), 9 + 4 + 1);
        assert_eq!(layout.span_of(&data, 0).unwrap(), 14);
        assert_eq!(layout.unpack(&data).unwrap(), value);
    }
}
