use std::borrow::Cow;

use roaring::RoaringBitmap;

/// A codec that stores a `RoaringBitmap` with its portable serialization,
/// used for the live document ids value.
pub struct RoaringBitmapCodec;

impl heed::BytesDecode<'_> for RoaringBitmapCodec {
    type DItem = RoaringBitmap;

    fn bytes_decode(bytes: &[u8]) -> Option<Self::DItem> {
        RoaringBitmap::deserialize_from(bytes).ok()
    }
}

impl heed::BytesEncode<'_> for RoaringBitmapCodec {
    type EItem = RoaringBitmap;

    fn bytes_encode(item: &Self::EItem) -> Option<Cow<[u8]>> {
        let mut bytes = Vec::with_capacity(item.serialized_size());
        item.serialize_into(&mut bytes).ok()?;
        Some(Cow::Owned(bytes))
    }
}

#[cfg(test)]
mod tests {
    use std::iter::FromIterator;

    use heed::{BytesDecode, BytesEncode};

    use super::*;

    #[test]
    fn round_trip() {
        let input = RoaringBitmap::from_iter([0, 2, 5, 7, 9999]);
        let bytes = RoaringBitmapCodec::bytes_encode(&input).unwrap();
        let output = RoaringBitmapCodec::bytes_decode(&bytes).unwrap();
        assert_eq!(input, output);
    }
}
