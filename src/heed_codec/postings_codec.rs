use std::borrow::Cow;
use std::mem::size_of;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::DocumentId;

/// A codec that stores a posting list as the bare concatenation of the
/// 4-byte big-endian encodings of its document ids.
///
/// There is no length prefix, the number of ids is implied by the value
/// length. A zero-length value is a valid empty list. This encoding is the
/// on-disk contract of every posting-list database and must stay byte-exact.
pub struct PostingListCodec;

impl PostingListCodec {
    pub fn serialize_into(ids: &[DocumentId], vec: &mut Vec<u8>) {
        vec.reserve(ids.len() * size_of::<u32>());
        for id in ids {
            vec.write_u32::<BigEndian>(*id).unwrap();
        }
    }

    pub fn deserialize_from(mut bytes: &[u8]) -> Option<Vec<DocumentId>> {
        if bytes.len() % size_of::<u32>() != 0 {
            return None;
        }

        let mut ids = Vec::with_capacity(bytes.len() / size_of::<u32>());
        while let Ok(id) = bytes.read_u32::<BigEndian>() {
            ids.push(id);
        }
        Some(ids)
    }
}

impl heed::BytesDecode<'_> for PostingListCodec {
    type DItem = Vec<DocumentId>;

    fn bytes_decode(bytes: &[u8]) -> Option<Self::DItem> {
        Self::deserialize_from(bytes)
    }
}

impl heed::BytesEncode<'_> for PostingListCodec {
    type EItem = [DocumentId];

    fn bytes_encode(item: &Self::EItem) -> Option<Cow<[u8]>> {
        let mut vec = Vec::with_capacity(item.len() * size_of::<u32>());
        Self::serialize_into(item, &mut vec);
        Some(Cow::Owned(vec))
    }
}

#[cfg(test)]
mod tests {
    use heed::{BytesDecode, BytesEncode};

    use super::*;

    #[test]
    fn byte_exact_encoding() {
        let bytes = PostingListCodec::bytes_encode(&[1, 2]).unwrap();
        assert_eq!(&bytes[..], &[0, 0, 0, 1, 0, 0, 0, 2]);

        let bytes = PostingListCodec::bytes_encode(&[0x0102_0304]).unwrap();
        assert_eq!(&bytes[..], &[1, 2, 3, 4]);
    }

    #[test]
    fn empty_list_round_trips() {
        let bytes = PostingListCodec::bytes_encode(&[]).unwrap();
        assert!(bytes.is_empty());
        let ids = PostingListCodec::bytes_decode(&bytes).unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn round_trip() {
        let input = vec![0, 1, 7, 42, u32::MAX];
        let bytes = PostingListCodec::bytes_encode(&input).unwrap();
        let output = PostingListCodec::bytes_decode(&bytes).unwrap();
        assert_eq!(input, output);
    }

    #[test]
    fn truncated_value_is_rejected() {
        assert!(PostingListCodec::bytes_decode(&[0, 0, 1]).is_none());
        assert!(PostingListCodec::bytes_decode(&[0, 0, 0, 1, 9]).is_none());
    }
}
