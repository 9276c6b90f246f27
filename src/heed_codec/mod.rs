mod postings_codec;
mod roaring_bitmap_codec;

pub use self::postings_codec::PostingListCodec;
pub use self::roaring_bitmap_codec::RoaringBitmapCodec;
