//! Kernels over sorted-unique posting lists.
//!
//! Every function here assumes, and preserves, the posting-list invariant:
//! strictly ascending document ids with no duplicate.

use crate::DocumentId;

/// Inserts an id at its sorted position, returns `true` if it was absent.
pub fn insert(ids: &mut Vec<DocumentId>, id: DocumentId) -> bool {
    match ids.binary_search(&id) {
        Ok(_) => false,
        Err(pos) => {
            ids.insert(pos, id);
            true
        }
    }
}

/// Removes an id, returns `true` if it was present.
///
/// Removing an absent id is a silent no-op.
pub fn remove(ids: &mut Vec<DocumentId>, id: DocumentId) -> bool {
    match ids.binary_search(&id) {
        Ok(pos) => {
            ids.remove(pos);
            true
        }
        Err(_) => false,
    }
}

pub fn contains(ids: &[DocumentId], id: DocumentId) -> bool {
    ids.binary_search(&id).is_ok()
}

/// Linear two-way union of two sorted-unique lists.
pub fn merge(a: &[DocumentId], b: &[DocumentId]) -> Vec<DocumentId> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            out.push(a[i]);
            i += 1;
        } else if a[i] > b[j] {
            out.push(b[j]);
            j += 1;
        } else {
            out.push(a[i]);
            i += 1;
            j += 1;
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

/// K-way union by divide and conquer, `O(total · log k)`.
pub fn union(lists: &[Vec<DocumentId>]) -> Vec<DocumentId> {
    match lists {
        [] => Vec::new(),
        [list] => list.clone(),
        lists => {
            let (left, right) = lists.split_at(lists.len() / 2);
            merge(&union(left), &union(right))
        }
    }
}

/// K-way intersection: every id of the smallest list is probed against the
/// other lists by binary search, `O(min · k log max)`.
///
/// With no input list there is nothing to intersect and the result is empty;
/// callers wanting a total-recall universe supply it as a list.
pub fn intersection(lists: &[Vec<DocumentId>]) -> Vec<DocumentId> {
    let smallest = match lists.iter().min_by_key(|list| list.len()) {
        Some(smallest) => smallest,
        None => return Vec::new(),
    };

    smallest
        .iter()
        .copied()
        .filter(|&id| {
            lists
                .iter()
                .filter(|list| !std::ptr::eq(*list, smallest))
                .all(|list| contains(list, id))
        })
        .collect()
}
