use serde::{Deserialize, Serialize};

use crate::DocumentId;

/// A document record as it is stored in the `DocIndex` database.
///
/// The `doc_id` is assigned by the engine and restored from the store key on
/// hydration, it is never part of the serialized value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    #[serde(skip)]
    pub doc_id: DocumentId,
    pub pk: String,
    pub title: String,
    pub pub_date: i64,
    pub pv: u32,
    pub brief: String,
    pub full_text: String,
    pub tags: Vec<String>,
    pub category: String,
    pub link: String,
    pub figure: String,
}

#[cfg(test)]
mod tests {
    use big_s::S;

    use super::*;

    #[test]
    fn the_doc_id_is_not_part_of_the_record() {
        let document = Document {
            doc_id: 7,
            pk: S("http://example.com/a"),
            title: S("an example"),
            pub_date: 42,
            ..Document::default()
        };

        let value = serde_json::to_value(&document).unwrap();
        assert!(value.get("doc_id").is_none());
        assert_eq!(value["pk"], "http://example.com/a");
        assert_eq!(value["pub_date"], 42);

        let document: Document = serde_json::from_value(value).unwrap();
        assert_eq!(document.doc_id, 0);
    }

    #[test]
    fn records_tolerate_missing_fields() {
        let document: Document = serde_json::from_str(r#"{ "pk": "a" }"#).unwrap();
        assert_eq!(document.pk, "a");
        assert_eq!(document.pub_date, 0);
        assert!(document.tags.is_empty());
    }
}
