use bstr::BStr;
use heed::types::ByteSlice;
use heed::{Database, RoTxn, RwTxn};
use log::warn;

use crate::heed_codec::PostingListCodec;
use crate::{postings, DocumentId};

/// A map from a term key to a sorted-unique posting list of document ids,
/// backed by one named database.
///
/// Keys are arbitrary bytes; the u32 and u64 families encode their keys as
/// fixed-width big-endian so the backend key order matches numeric order.
#[derive(Clone, Copy)]
pub struct InvertedIndex {
    db: Database<ByteSlice, PostingListCodec>,
    name: &'static str,
}

impl InvertedIndex {
    pub fn new(env: &heed::Env, name: &'static str) -> heed::Result<InvertedIndex> {
        let db = env.create_database(Some(name))?;
        Ok(InvertedIndex { db, name })
    }

    /// Merges the given ids into the posting list of `key`.
    ///
    /// The ids may be unsorted and may contain duplicates; the stored list
    /// stays sorted-unique and keeps every id it already had. Nothing is
    /// written when no new id was added.
    pub fn append(&self, wtxn: &mut RwTxn, key: &[u8], ids: &[DocumentId]) -> heed::Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let mut list = self.postings(wtxn, key)?;
        let mut has_new_doc = false;
        for id in ids {
            has_new_doc |= postings::insert(&mut list, *id);
        }

        if has_new_doc {
            self.db.put(wtxn, key, &list)?;
        }
        Ok(())
    }

    /// Removes the given ids from the posting list of `key`, preserving
    /// order. Absent ids are silently skipped.
    pub fn delete(&self, wtxn: &mut RwTxn, key: &[u8], ids: &[DocumentId]) -> heed::Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let mut list = self.postings(wtxn, key)?;
        let mut changed = false;
        for id in ids {
            changed |= postings::remove(&mut list, *id);
        }

        if changed {
            self.db.put(wtxn, key, &list)?;
        }
        Ok(())
    }

    /// Removes the key and its whole posting list.
    pub fn delete_key(&self, wtxn: &mut RwTxn, key: &[u8]) -> heed::Result<bool> {
        self.db.delete(wtxn, key)
    }

    /// The posting list of `key`, empty when the key is absent.
    ///
    /// A value that fails to decode is reported and treated as empty.
    pub fn postings(&self, rtxn: &RoTxn, key: &[u8]) -> heed::Result<Vec<DocumentId>> {
        match self.db.get(rtxn, key) {
            Ok(list) => Ok(list.unwrap_or_default()),
            Err(heed::Error::Decoding) => {
                warn!("invalid posting list under {:?} in {}", BStr::new(key), self.name);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// The keys starting with `prefix`, in lexicographic order.
    pub fn prefix_keys(&self, rtxn: &RoTxn, prefix: &[u8]) -> heed::Result<Vec<Vec<u8>>> {
        let mut keys = Vec::new();
        for result in self.db.prefix_iter(rtxn, prefix)? {
            let (key, _) = result?;
            keys.push(key.to_vec());
        }
        Ok(keys)
    }

    /// Every key of this index, in lexicographic order.
    pub fn keys(&self, rtxn: &RoTxn) -> heed::Result<Vec<Vec<u8>>> {
        let mut keys = Vec::new();
        for result in self.db.iter(rtxn)? {
            let (key, _) = result?;
            keys.push(key.to_vec());
        }
        Ok(keys)
    }

    /// The number of keys in this index.
    pub fn len(&self, rtxn: &RoTxn) -> heed::Result<u64> {
        Ok(self.db.len(rtxn)? as u64)
    }

    pub fn is_empty(&self, rtxn: &RoTxn) -> heed::Result<bool> {
        self.db.is_empty(rtxn)
    }

    /// Drops every key of this index.
    pub fn clear(&self, wtxn: &mut RwTxn) -> heed::Result<()> {
        self.db.clear(wtxn)
    }

    /* u32-keyed family */

    pub fn append_u32(&self, wtxn: &mut RwTxn, key: u32, ids: &[DocumentId]) -> heed::Result<()> {
        self.append(wtxn, &key.to_be_bytes(), ids)
    }

    pub fn delete_u32(&self, wtxn: &mut RwTxn, key: u32, ids: &[DocumentId]) -> heed::Result<()> {
        self.delete(wtxn, &key.to_be_bytes(), ids)
    }

    pub fn postings_u32(&self, rtxn: &RoTxn, key: u32) -> heed::Result<Vec<DocumentId>> {
        self.postings(rtxn, &key.to_be_bytes())
    }

    /* u64-keyed family */

    pub fn append_u64(&self, wtxn: &mut RwTxn, key: u64, ids: &[DocumentId]) -> heed::Result<()> {
        self.append(wtxn, &key.to_be_bytes(), ids)
    }

    pub fn delete_u64(&self, wtxn: &mut RwTxn, key: u64, ids: &[DocumentId]) -> heed::Result<()> {
        self.delete(wtxn, &key.to_be_bytes(), ids)
    }

    pub fn postings_u64(&self, rtxn: &RoTxn, key: u64) -> heed::Result<Vec<DocumentId>> {
        self.postings(rtxn, &key.to_be_bytes())
    }
}
