use std::path::Path;
use std::sync::Mutex;

use heed::types::{OwnedType, SerdeJson};
use heed::{Database, RoTxn, RwTxn};
use log::warn;

use crate::inverted_index::InvertedIndex;
use crate::live_documents_ids::LiveDocumentsIds;
use crate::{Document, DocumentId, Result, UserError, BEU32};

pub const PK_INDEX_NAME: &str = "PK";
pub const TITLE_INDEX_NAME: &str = "Title";
pub const BRIEF_INDEX_NAME: &str = "Brief";
pub const FULL_TEXT_INDEX_NAME: &str = "FullText";
pub const TAGS_INDEX_NAME: &str = "Tags";
pub const CATEGORY_INDEX_NAME: &str = "Category";
pub const DOCUMENTS_INDEX_NAME: &str = "DocIndex";

const DEFAULT_MAP_SIZE: usize = 100 * 1024 * 1024; // 100 MiB

pub struct Index {
    /// The LMDB environment which this index is associated with.
    pub env: heed::Env,

    /// The set of currently assigned document ids, mirrored in memory.
    pub live_docids: LiveDocumentsIds,

    /// A primary key and the canonical document id carrying it.
    pub pk: InvertedIndex,
    /// A title term and all the documents ids containing it.
    pub title: InvertedIndex,
    /// A brief term and all the documents ids containing it.
    pub brief: InvertedIndex,
    /// A full-text term and all the documents ids containing it.
    pub full_text: InvertedIndex,
    /// A lowercased tag and all the documents ids carrying it.
    pub tags: InvertedIndex,
    /// A lowercased category and all the documents ids filed under it.
    pub category: InvertedIndex,

    /// Maps the document id to the serialized document record.
    pub documents: Database<OwnedType<BEU32>, SerdeJson<Document>>,

    /// Serializes the docid-assigning critical section of every ingest.
    pub(crate) ingest_lock: Mutex<()>,
}

impl Index {
    pub fn new<P: AsRef<Path>>(mut options: heed::EnvOpenOptions, path: P) -> Result<Index> {
        options.max_dbs(8);

        let env = options.open(path)?;
        let live_docids = LiveDocumentsIds::new(&env)?;
        let pk = InvertedIndex::new(&env, PK_INDEX_NAME)?;
        let title = InvertedIndex::new(&env, TITLE_INDEX_NAME)?;
        let brief = InvertedIndex::new(&env, BRIEF_INDEX_NAME)?;
        let full_text = InvertedIndex::new(&env, FULL_TEXT_INDEX_NAME)?;
        let tags = InvertedIndex::new(&env, TAGS_INDEX_NAME)?;
        let category = InvertedIndex::new(&env, CATEGORY_INDEX_NAME)?;
        let documents = env.create_database(Some(DOCUMENTS_INDEX_NAME))?;

        Ok(Index {
            env,
            live_docids,
            pk,
            title,
            brief,
            full_text,
            tags,
            category,
            documents,
            ingest_lock: Mutex::new(()),
        })
    }

    /// Opens the index at the given path with default options, creating the
    /// directory if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Index> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(UserError::EmptyStorePath.into());
        }
        std::fs::create_dir_all(path)?;

        let mut options = heed::EnvOpenOptions::new();
        options.map_size(DEFAULT_MAP_SIZE);
        Index::new(options, path)
    }

    /// Create a write transaction to be able to write into the index.
    pub fn write_txn(&self) -> heed::Result<RwTxn> {
        self.env.write_txn()
    }

    /// Create a read transaction to be able to read the index.
    pub fn read_txn(&self) -> heed::Result<RoTxn> {
        self.env.read_txn()
    }

    /// Returns the canonicalized path where the heed `Env` of this `Index` lives.
    pub fn path(&self) -> &Path {
        self.env.path()
    }

    /// Returns the number of documents indexed in the database.
    pub fn number_of_documents(&self) -> u64 {
        self.live_docids.count() as u64
    }

    /* documents */

    /// Writes the record of a document, overwriting any previous one.
    pub fn put_document(
        &self,
        wtxn: &mut RwTxn,
        docid: DocumentId,
        document: &Document,
    ) -> heed::Result<()> {
        self.documents.put(wtxn, &BEU32::new(docid), document)
    }

    /// Returns the record of a document, `None` if it is absent.
    ///
    /// A record that fails to decode is reported and treated as absent.
    pub fn document(&self, rtxn: &RoTxn, docid: DocumentId) -> heed::Result<Option<Document>> {
        match self.documents.get(rtxn, &BEU32::new(docid)) {
            Ok(Some(mut document)) => {
                document.doc_id = docid;
                Ok(Some(document))
            }
            Ok(None) => Ok(None),
            Err(heed::Error::Decoding) => {
                warn!("invalid document record under docid {}", docid);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub fn delete_document(&self, wtxn: &mut RwTxn, docid: DocumentId) -> heed::Result<bool> {
        self.documents.delete(wtxn, &BEU32::new(docid))
    }

    /// Returns the records of the requested documents, in the requested
    /// order. A missing record is reported and skipped.
    pub fn documents_from_ids(
        &self,
        rtxn: &RoTxn,
        docids: &[DocumentId],
    ) -> heed::Result<Vec<Document>> {
        let mut documents = Vec::with_capacity(docids.len());
        for docid in docids {
            match self.document(rtxn, *docid)? {
                Some(document) => documents.push(document),
                None => warn!("no document record under docid {}", docid),
            }
        }
        Ok(documents)
    }

    /// Returns the ids of every stored document record, ascending.
    pub fn all_document_ids(&self, rtxn: &RoTxn) -> heed::Result<Vec<DocumentId>> {
        let mut docids = Vec::new();
        for result in self.documents.iter(rtxn)? {
            let (docid, _) = result?;
            docids.push(docid.get());
        }
        Ok(docids)
    }

    /* lifecycle */

    /// Returns an `EnvClosingEvent` that can be used to wait for the closing
    /// event, multiple threads can wait on this event.
    ///
    /// Make sure that you drop all the copies of `Index`es you have, env
    /// closing are triggered when all references are dropped, the last one
    /// will eventually close the environment.
    pub fn prepare_for_closing(self) -> heed::EnvClosingEvent {
        self.env.prepare_for_closing()
    }

    /// Backs the live ids up and releases the environment, waiting for it
    /// to be effectively closed.
    pub fn close(self) -> Result<()> {
        let mut wtxn = self.env.write_txn()?;
        self.live_docids.backup(&mut wtxn)?;
        wtxn.commit()?;
        self.env.prepare_for_closing().wait();
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::ops::Deref;

    use big_s::S;
    use heed::EnvOpenOptions;
    use tempfile::TempDir;

    use crate::Document;

    use super::*;

    pub(crate) struct TempIndex {
        inner: Index,
        pub(crate) tempdir: TempDir,
    }

    impl Deref for TempIndex {
        type Target = Index;

        fn deref(&self) -> &Self::Target {
            &self.inner
        }
    }

    impl TempIndex {
        /// Creates a temporary index with a `10 MiB` map size. This should
        /// be enough for most tests.
        pub fn new() -> Self {
            let mut options = EnvOpenOptions::new();
            options.map_size(10 * 1024 * 1024);
            let tempdir = TempDir::new().unwrap();
            let inner = Index::new(options, tempdir.path()).unwrap();
            Self { inner, tempdir }
        }
    }

    #[test]
    fn open_rejects_an_empty_path() {
        assert!(matches!(
            Index::open(""),
            Err(crate::Error::User(UserError::EmptyStorePath)),
        ));
    }

    #[test]
    fn document_store_round_trip() {
        let index = TempIndex::new();

        let document = Document {
            pk: S("http://example.com/a"),
            title: S("an example"),
            pub_date: 42,
            ..Document::default()
        };

        let mut wtxn = index.write_txn().unwrap();
        index.put_document(&mut wtxn, 0, &document).unwrap();
        wtxn.commit().unwrap();

        let rtxn = index.read_txn().unwrap();
        let stored = index.document(&rtxn, 0).unwrap().unwrap();
        assert_eq!(stored.doc_id, 0);
        assert_eq!(stored.pk, document.pk);
        assert_eq!(stored.title, document.title);
        assert_eq!(stored.pub_date, 42);
        assert!(index.document(&rtxn, 1).unwrap().is_none());
        assert_eq!(index.all_document_ids(&rtxn).unwrap(), vec![0]);
        drop(rtxn);

        let mut wtxn = index.write_txn().unwrap();
        assert!(index.delete_document(&mut wtxn, 0).unwrap());
        wtxn.commit().unwrap();

        let rtxn = index.read_txn().unwrap();
        assert!(index.document(&rtxn, 0).unwrap().is_none());
    }

    #[test]
    fn close_backs_the_live_ids_up() {
        let tempdir = TempDir::new().unwrap();

        let mut options = EnvOpenOptions::new();
        options.map_size(10 * 1024 * 1024);
        let index = Index::new(options, tempdir.path()).unwrap();
        assert!(index.path().exists());
        index.live_docids.insert(5);
        index.close().unwrap();

        let mut options = EnvOpenOptions::new();
        options.map_size(10 * 1024 * 1024);
        let index = Index::new(options, tempdir.path()).unwrap();
        assert_eq!(index.live_docids.iter_set(), vec![5]);
    }

    #[test]
    fn live_ids_survive_a_reopen() {
        let index = TempIndex::new();

        let mut wtxn = index.write_txn().unwrap();
        index.live_docids.insert(0);
        index.live_docids.insert(2);
        index.live_docids.backup(&mut wtxn).unwrap();
        wtxn.commit().unwrap();

        let tempdir = index.tempdir;
        index.inner.prepare_for_closing().wait();

        let mut options = EnvOpenOptions::new();
        options.map_size(10 * 1024 * 1024);
        let index = Index::new(options, tempdir.path()).unwrap();
        assert_eq!(index.live_docids.iter_set(), vec![0, 2]);
        assert_eq!(index.number_of_documents(), 2);
    }
}
