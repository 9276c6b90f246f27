use heed::RoTxn;
use log::debug;

use crate::segment::segment;
use crate::{postings, Document, DocumentId, Index, Result};

mod sort;

pub use self::sort::{SortField, Sorter};

/// The parameters of a conjunctive query.
///
/// Every non-empty clause (`pks`, `query`, `tags`, `category`) contributes
/// one posting list and the clauses are intersected; within the free-text
/// clause, terms and fields are unioned.
#[derive(Debug, Clone, Default)]
pub struct Param {
    pub pks: Vec<String>,
    pub query: String,
    pub tags: Vec<String>,
    pub category: String,

    pub offset: i32,
    pub size: i32,
    pub sort: Sorter,
}

const MAX_PAGE_SIZE: i32 = 100;

/// Clamps the pagination window: a negative offset becomes `0`, a size
/// outside of `(0, 100]` becomes `100`.
fn check_param(param: &Param) -> (usize, usize) {
    let offset = if param.offset < 0 { 0 } else { param.offset as usize };
    let size = if param.size <= 0 || param.size > MAX_PAGE_SIZE {
        MAX_PAGE_SIZE as usize
    } else {
        param.size as usize
    };
    (offset, size)
}

fn paginate(docids: Vec<DocumentId>, offset: usize, size: usize) -> Vec<DocumentId> {
    if offset >= docids.len() {
        return Vec::new();
    }
    let end = (offset + size).min(docids.len());
    docids[offset..end].to_vec()
}

impl Index {
    /// Runs a conjunctive query, returning the matching document count and
    /// the hydrated page of results.
    #[logging_timer::time("Index::{}")]
    pub fn search(&self, param: &Param) -> Result<(usize, Vec<Document>)> {
        let (total, docids) = self.search_doc_ids(param)?;
        let rtxn = self.read_txn()?;
        let documents = self.documents_from_ids(&rtxn, &docids)?;
        Ok((total, documents))
    }

    /// Same as [`Index::search`] but stops at the sorted, paginated id list.
    pub fn search_doc_ids(&self, param: &Param) -> Result<(usize, Vec<DocumentId>)> {
        let (offset, size) = check_param(param);
        let rtxn = self.read_txn()?;

        let mut clauses = Vec::with_capacity(4);
        if !param.pks.is_empty() {
            clauses.push(self.search_pks(&rtxn, &param.pks)?);
        }
        if !param.query.is_empty() {
            clauses.push(self.search_keywords(&rtxn, &segment(&param.query))?);
        }
        if !param.tags.is_empty() {
            clauses.push(self.search_tags(&rtxn, &param.tags)?);
        }
        if !param.category.is_empty() {
            clauses.push(self.search_category(&rtxn, &param.category)?);
        }

        // no clause, no candidates: the whole live set is only reachable
        // through search_all
        let mut docids = postings::intersection(&clauses);
        let total = docids.len();

        self.sort_doc_ids(&rtxn, &param.sort, &mut docids)?;
        Ok((total, paginate(docids, offset, size)))
    }

    /// Sorts and paginates the whole live set, ignoring the clause fields
    /// of the `Param`.
    #[logging_timer::time("Index::{}")]
    pub fn search_all(&self, param: &Param) -> Result<(usize, Vec<Document>)> {
        let (offset, size) = check_param(param);
        let rtxn = self.read_txn()?;

        let mut docids = self.live_docids.iter_set();
        let total = docids.len();

        self.sort_doc_ids(&rtxn, &param.sort, &mut docids)?;
        let page = paginate(docids, offset, size);
        let documents = self.documents_from_ids(&rtxn, &page)?;
        Ok((total, documents))
    }

    /// The canonical docid of each requested pk. A pk whose posting list
    /// does not hold exactly one id is reported and skipped.
    fn search_pks(&self, rtxn: &RoTxn, pks: &[String]) -> heed::Result<Vec<DocumentId>> {
        let mut docids = Vec::with_capacity(pks.len());
        for pk in pks {
            match self.pk.postings(rtxn, pk.as_bytes())?[..] {
                [docid] => {
                    postings::insert(&mut docids, docid);
                }
                [] => (),
                ref list => debug!("pk {} holds {} docids instead of one", pk, list.len()),
            }
        }
        Ok(docids)
    }

    /// The union of the title, brief and full-text postings of every query
    /// term. The terms come out of the tokenizer already normalized.
    fn search_keywords(&self, rtxn: &RoTxn, queries: &[String]) -> heed::Result<Vec<DocumentId>> {
        let mut lists = Vec::with_capacity(queries.len() * 3);
        for query in queries {
            for field in [&self.title, &self.brief, &self.full_text] {
                let list = field.postings(rtxn, query.as_bytes())?;
                if !list.is_empty() {
                    lists.push(list);
                }
            }
        }
        Ok(postings::union(&lists))
    }

    /// The union of the postings of every tag, lowercased.
    fn search_tags(&self, rtxn: &RoTxn, tags: &[String]) -> heed::Result<Vec<DocumentId>> {
        let mut lists = Vec::with_capacity(tags.len());
        for tag in tags {
            let list = self.tags.postings(rtxn, tag.to_lowercase().as_bytes())?;
            if !list.is_empty() {
                lists.push(list);
            }
        }
        Ok(postings::union(&lists))
    }

    /// The postings of a category, lowercased.
    fn search_category(&self, rtxn: &RoTxn, category: &str) -> heed::Result<Vec<DocumentId>> {
        self.category.postings(rtxn, category.to_lowercase().as_bytes())
    }
}
