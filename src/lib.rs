mod document;
mod error;
pub mod heed_codec;
pub mod index;
mod inverted_index;
mod live_documents_ids;
mod postings;
mod search;
mod segment;
pub mod update;

use std::collections::HashMap;
use std::hash::BuildHasherDefault;

use fxhash::FxHasher64;

pub use self::document::Document;
pub use self::error::{Error, UserError};
pub use self::heed_codec::{PostingListCodec, RoaringBitmapCodec};
pub use self::index::Index;
pub use self::inverted_index::InvertedIndex;
pub use self::live_documents_ids::{AvailableDocumentsIds, LiveDocumentsIds};
pub use self::search::{Param, SortField, Sorter};
pub use self::segment::segment;

pub use heed;

pub type Result<T> = std::result::Result<T, error::Error>;

pub type FastMap8<K, V> = HashMap<K, V, BuildHasherDefault<FxHasher64>>;
pub type BEU32 = zerocopy::byteorder::U32<zerocopy::byteorder::BE>;
pub type BEU64 = zerocopy::byteorder::U64<zerocopy::byteorder::BE>;
pub type BEI16 = zerocopy::byteorder::I16<zerocopy::byteorder::BE>;
pub type DocumentId = u32;

#[cfg(test)]
mod tests {
    use zerocopy::IntoBytes;

    use super::*;

    #[test]
    fn big_endian_scalar_encodings() {
        assert_eq!(BEU32::new(1).as_bytes(), &[0, 0, 0, 1]);
        assert_eq!(BEU32::new(0x0102_0304).as_bytes(), &[1, 2, 3, 4]);
        assert_eq!(
            BEU64::new(0x0102_0304_0506_0708).as_bytes(),
            &[1, 2, 3, 4, 5, 6, 7, 8],
        );
        assert_eq!(BEI16::new(258).as_bytes(), &[1, 2]);
        // two's-complement, big-endian
        assert_eq!(BEI16::new(-2).as_bytes(), &[0xFF, 0xFE]);
    }
}
