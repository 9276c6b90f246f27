use std::sync::PoisonError;

use crate::{Index, Result};

pub struct ClearDocuments<'t, 'u, 'i> {
    wtxn: &'t mut heed::RwTxn<'i, 'u>,
    index: &'i Index,
}

impl<'t, 'u, 'i> ClearDocuments<'t, 'u, 'i> {
    pub fn new(wtxn: &'t mut heed::RwTxn<'i, 'u>, index: &'i Index) -> ClearDocuments<'t, 'u, 'i> {
        ClearDocuments { wtxn, index }
    }

    pub fn execute(self) -> Result<u64> {
        let Index {
            env: _env,
            live_docids,
            pk,
            title,
            brief,
            full_text,
            tags,
            category,
            documents,
            ingest_lock: _ingest_lock,
        } = self.index;

        // We retrieve the number of documents ids that we are deleting.
        let number_of_documents = self.index.number_of_documents();

        live_docids.clear_all(self.wtxn)?;

        // Clear the other databases.
        pk.clear(self.wtxn)?;
        title.clear(self.wtxn)?;
        brief.clear(self.wtxn)?;
        full_text.clear(self.wtxn)?;
        tags.clear(self.wtxn)?;
        category.clear(self.wtxn)?;
        documents.clear(self.wtxn)?;

        Ok(number_of_documents)
    }
}

impl Index {
    /// Drops every index and every document, leaving an empty engine
    /// behind. Returns the number of documents dropped.
    pub fn clear_all(&self) -> Result<u64> {
        let _lock = self.ingest_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut wtxn = self.write_txn()?;
        let count = ClearDocuments::new(&mut wtxn, self).execute()?;
        wtxn.commit()?;
        Ok(count)
    }
}
