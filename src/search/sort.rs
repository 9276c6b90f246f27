use std::cmp::Ordering;

use heed::RoTxn;

use crate::{Document, DocumentId, FastMap8, Index};

/// The two supported sort keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    PubDate,
    Pv,
}

impl SortField {
    /// Case-insensitive; an unknown name falls back to the publication date.
    pub fn from_name(name: &str) -> SortField {
        if name.eq_ignore_ascii_case("pv") {
            SortField::Pv
        } else {
            SortField::PubDate
        }
    }
}

impl Default for SortField {
    fn default() -> SortField {
        SortField::PubDate
    }
}

/// How a result list is ordered. The default is newest first.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sorter {
    pub field: SortField,
    pub asc: bool,
}

impl Index {
    /// Sorts candidate ids under the requested sort.
    ///
    /// The candidates are hydrated into a scratch map first, one fetch per
    /// document instead of two per comparison.
    pub(crate) fn sort_doc_ids(
        &self,
        rtxn: &RoTxn,
        sorter: &Sorter,
        docids: &mut Vec<DocumentId>,
    ) -> heed::Result<()> {
        if docids.len() <= 1 {
            return Ok(());
        }

        let mut records = FastMap8::default();
        for docid in docids.iter() {
            if let Some(document) = self.document(rtxn, *docid)? {
                records.insert(*docid, document);
            }
        }

        let missing = Document::default();
        let Sorter { field, asc } = *sorter;
        docids.sort_by(|a, b| {
            let a = records.get(a).unwrap_or(&missing);
            let b = records.get(b).unwrap_or(&missing);
            compare(a, b, field, asc)
        });
        Ok(())
    }
}

/// Orders two documents under the requested sort.
///
/// The direction applies to the primary comparison only; documents equal on
/// it always come back larger-pk first.
fn compare(a: &Document, b: &Document, field: SortField, asc: bool) -> Ordering {
    let primary = match field {
        SortField::Pv => a.pv.cmp(&b.pv),
        SortField::PubDate => a.pub_date.cmp(&b.pub_date),
    };
    let primary = if asc { primary } else { primary.reverse() };
    primary.then_with(|| b.pk.cmp(&a.pk))
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use big_s::S;

    use super::*;

    fn doc(pk: &str, pub_date: i64, pv: u32) -> Document {
        Document { pk: S(pk), pub_date, pv, ..Document::default() }
    }

    #[test]
    fn field_names_are_case_insensitive() {
        assert_eq!(SortField::from_name("pv"), SortField::Pv);
        assert_eq!(SortField::from_name("PV"), SortField::Pv);
        assert_eq!(SortField::from_name("pub_date"), SortField::PubDate);
        assert_eq!(SortField::from_name("PubDate"), SortField::PubDate);
        assert_eq!(SortField::from_name("anything else"), SortField::PubDate);
    }

    #[test]
    fn direction_flips_the_primary_comparison() {
        let old = doc("a", 1, 0);
        let new = doc("b", 2, 0);
        assert_eq!(compare(&old, &new, SortField::PubDate, true), Ordering::Less);
        assert_eq!(compare(&old, &new, SortField::PubDate, false), Ordering::Greater);

        let cold = doc("a", 0, 1);
        let hot = doc("b", 0, 9);
        assert_eq!(compare(&cold, &hot, SortField::Pv, true), Ordering::Less);
        assert_eq!(compare(&cold, &hot, SortField::Pv, false), Ordering::Greater);
    }

    #[test]
    fn ties_always_break_to_the_larger_pk() {
        let small = doc("1", 7, 7);
        let large = doc("2", 7, 7);
        for field in [SortField::PubDate, SortField::Pv] {
            for asc in [true, false] {
                assert_eq!(compare(&large, &small, field, asc), Ordering::Less);
                assert_eq!(compare(&small, &large, field, asc), Ordering::Greater);
            }
        }
    }
}
