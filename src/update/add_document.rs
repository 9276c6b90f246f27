use std::sync::PoisonError;

use heed::RwTxn;
use log::{debug, error};

use crate::segment::segment;
use crate::{Document, DocumentId, Index, Result, UserError};

impl Index {
    /// Adds a document to the engine, returning the document id it was
    /// assigned.
    ///
    /// A pk that is already indexed keeps its document id: the record is
    /// overwritten and the new terms are merged into the existing posting
    /// lists. Stale postings of a previous version are not retracted, so an
    /// updated document may still match through its old terms.
    #[logging_timer::time("Index::{}")]
    pub fn add_document(&self, document: &Document) -> Result<DocumentId> {
        if document.pk.is_empty() {
            return Err(UserError::EmptyPrimaryKey.into());
        }

        let docid = self.add_document_record(document)?;

        // The record and its pk mapping are committed at this point, a
        // failure while filling the term indices must not fail the call:
        // the document stays findable by pk either way.
        if let Err(e) = self.add_document_terms(document, docid) {
            error!("indexing terms of {}: {}", document.pk, e);
        }

        Ok(docid)
    }

    /// The critical section of an ingest: assigns the docid and commits the
    /// pk mapping and the document record, under the exclusive ingest lock.
    fn add_document_record(&self, document: &Document) -> Result<DocumentId> {
        let _lock = self.ingest_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut wtxn = self.write_txn()?;

        let pk = document.pk.as_bytes();
        let docid = match self.pk.postings(&wtxn, pk)?[..] {
            // this pk is being overwritten, its id is reused
            [docid] => docid,
            _ => self
                .live_docids
                .first_available()
                .unwrap_or_else(|| self.live_docids.count()),
        };
        debug!("adding document {} under docid {}", document.pk, docid);

        self.live_docids.insert(docid);
        self.pk.append(&mut wtxn, pk, &[docid])?;
        self.put_document(&mut wtxn, docid, document)?;
        wtxn.commit()?;

        Ok(docid)
    }

    /// The best-effort tail of an ingest: term indexing and the live-ids
    /// commit, outside of the ingest lock.
    fn add_document_terms(&self, document: &Document, docid: DocumentId) -> Result<()> {
        let mut wtxn = self.write_txn()?;
        let ids = [docid];

        for term in segment(&document.title) {
            self.title.append(&mut wtxn, term.as_bytes(), &ids)?;
        }
        for term in segment(&document.brief) {
            self.brief.append(&mut wtxn, term.as_bytes(), &ids)?;
        }
        for term in segment(&document.full_text) {
            self.full_text.append(&mut wtxn, term.as_bytes(), &ids)?;
        }
        for tag in &document.tags {
            let tag = tag.to_lowercase();
            if !tag.is_empty() {
                self.tags.append(&mut wtxn, tag.as_bytes(), &ids)?;
            }
        }
        let category = document.category.to_lowercase();
        if !category.is_empty() {
            self.category.append(&mut wtxn, category.as_bytes(), &ids)?;
        }

        self.commit(&mut wtxn)?;
        wtxn.commit()?;
        Ok(())
    }

    /// Serializes the live document ids into their database.
    pub fn commit(&self, wtxn: &mut RwTxn) -> heed::Result<()> {
        self.live_docids.backup(wtxn)
    }
}
