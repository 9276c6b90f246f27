use std::iter::FromIterator;
use std::ops::RangeInclusive;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use heed::types::Str;
use heed::{Database, RoTxn, RwTxn};
use log::warn;
use roaring::bitmap::IntoIter;
use roaring::RoaringBitmap;

use crate::heed_codec::RoaringBitmapCodec;
use crate::DocumentId;

/// The database, and the single key inside it, under which the live ids
/// are persisted. Both are equal by on-disk contract.
pub const LIVE_DOCUMENTS_IDS_KEY: &str = "DocId";

/// The set of document ids currently assigned to a document.
///
/// The in-memory bitmap mirrors the value persisted under the fixed
/// `"DocId"` key; [`LiveDocumentsIds::backup`] writes the mirror back.
/// Readers take the lock shared, every mutation and the backup take it
/// exclusive.
pub struct LiveDocumentsIds {
    db: Database<Str, RoaringBitmapCodec>,
    bitmap: RwLock<RoaringBitmap>,
}

impl LiveDocumentsIds {
    /// Opens the live ids database, materializing the persisted set if
    /// there is one. A value that fails to decode is reported and treated
    /// as a blank set.
    pub fn new(env: &heed::Env) -> heed::Result<LiveDocumentsIds> {
        let db = env.create_database(Some(LIVE_DOCUMENTS_IDS_KEY))?;
        let rtxn = env.read_txn()?;
        let bitmap = match db.get(&rtxn, LIVE_DOCUMENTS_IDS_KEY) {
            Ok(bitmap) => bitmap.unwrap_or_default(),
            Err(heed::Error::Decoding) => {
                warn!("invalid live documents ids value, starting from a blank set");
                RoaringBitmap::new()
            }
            Err(e) => return Err(e),
        };
        drop(rtxn);

        Ok(LiveDocumentsIds { db, bitmap: RwLock::new(bitmap) })
    }

    fn read(&self) -> RwLockReadGuard<RoaringBitmap> {
        self.bitmap.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<RoaringBitmap> {
        self.bitmap.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks a document id as live, returns `true` if it wasn't already.
    pub fn insert(&self, id: DocumentId) -> bool {
        self.write().insert(id)
    }

    /// Marks a document id as free again, returns `true` if it was live.
    pub fn remove(&self, id: DocumentId) -> bool {
        self.write().remove(id)
    }

    pub fn contains(&self, id: DocumentId) -> bool {
        self.read().contains(id)
    }

    /// The number of live documents.
    pub fn count(&self) -> u32 {
        self.read().len() as u32
    }

    /// The smallest live id greater than or equal to `from`.
    pub fn next_set(&self, from: DocumentId) -> Option<DocumentId> {
        let bitmap = self.read();
        let rank = if from == 0 { 0 } else { bitmap.rank(from - 1) };
        bitmap.select(rank as u32)
    }

    /// The smallest free id greater than or equal to `from`.
    pub fn next_clear(&self, from: DocumentId) -> Option<DocumentId> {
        let bitmap = self.read();
        (from..=u32::MAX).find(|id| !bitmap.contains(*id))
    }

    /// The id handed to the next freshly arriving document: a reclaimed
    /// hole when there is one, the dense tail otherwise.
    pub fn first_available(&self) -> Option<DocumentId> {
        AvailableDocumentsIds::from_documents_ids(&self.read()).next()
    }

    /// All live ids, ascending.
    pub fn iter_set(&self) -> Vec<DocumentId> {
        self.read().iter().collect()
    }

    /// Serializes the current set under the fixed key.
    pub fn backup(&self, wtxn: &mut RwTxn) -> heed::Result<()> {
        let bitmap = self.write();
        self.db.put(wtxn, LIVE_DOCUMENTS_IDS_KEY, &bitmap)
    }

    /// Empties both the in-memory set and the on-disk database.
    pub fn clear_all(&self, wtxn: &mut RwTxn) -> heed::Result<()> {
        self.write().clear();
        self.db.clear(wtxn)
    }

    pub fn stored(&self, rtxn: &RoTxn) -> heed::Result<Option<RoaringBitmap>> {
        self.db.get(rtxn, LIVE_DOCUMENTS_IDS_KEY)
    }
}

/// An iterator over the document ids not yet assigned: the holes left by
/// removed documents first, then the ids past the highest assigned one.
pub struct AvailableDocumentsIds {
    iter: std::iter::Chain<IntoIter, RangeInclusive<u32>>,
}

impl AvailableDocumentsIds {
    pub fn from_documents_ids(docids: &RoaringBitmap) -> AvailableDocumentsIds {
        match docids.max() {
            Some(last_id) => {
                let mut available = RoaringBitmap::from_iter(0..last_id);
                available -= docids;

                let iter = match last_id.checked_add(1) {
                    Some(id) => id..=u32::MAX,
                    #[allow(clippy::reversed_empty_ranges)]
                    None => 1..=0, // empty range iterator
                };

                AvailableDocumentsIds { iter: available.into_iter().chain(iter) }
            }
            None => {
                let empty = RoaringBitmap::new().into_iter();
                AvailableDocumentsIds { iter: empty.chain(0..=u32::MAX) }
            }
        }
    }
}

impl Iterator for AvailableDocumentsIds {
    type Item = u32;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }
}
