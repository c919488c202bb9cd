use cinetrack_models::{Document, ListEntry};
use std::collections::BTreeMap;
use tracing::warn;

/// In-memory keyed view of one user's list, keyed by catalog id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    entries: BTreeMap<String, ListEntry>,
}

impl Projection {
    /// Rebuild from a complete result set.
    ///
    /// Documents are applied in delivery order, so on a duplicate catalog id
    /// the later document replaces the earlier one entirely.
    pub fn from_documents(documents: &[Document]) -> Self {
        let mut entries = BTreeMap::new();
        for doc in documents {
            match ListEntry::from_document(doc) {
                Some(entry) => {
                    entries.insert(entry.key(), entry);
                }
                None => {
                    warn!(
                        operation = "projection_skip",
                        document_id = %doc.id,
                        "Skipping list document without a catalog id"
                    );
                }
            }
        }
        Self { entries }
    }

    pub fn get(&self, catalog_id: u64) -> Option<&ListEntry> {
        self.entries.get(&catalog_id.to_string())
    }

    pub fn entries(&self) -> impl Iterator<Item = &ListEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, value: serde_json::Value) -> Document {
        Document::new(id, value.as_object().cloned().unwrap())
    }

    #[test]
    fn test_duplicate_catalog_id_last_document_wins() {
        let docs = vec![
            doc("a", json!({"ownerId": "u", "catalogId": 7, "mediaKind": "movie", "status": "planned", "title": "First"})),
            doc("b", json!({"ownerId": "u", "catalogId": 8, "mediaKind": "movie", "status": "planned", "title": "Other"})),
            doc("c", json!({"ownerId": "u", "catalogId": 7, "mediaKind": "series", "status": "watching", "title": "Second"})),
        ];

        let projection = Projection::from_documents(&docs);
        assert_eq!(projection.len(), 2);

        let entry = projection.get(7).unwrap();
        assert_eq!(entry.document_id, "c");
        assert_eq!(entry.title, "Second");
        assert!(entry.is_series());
    }

    #[test]
    fn test_documents_without_catalog_id_are_skipped() {
        let docs = vec![
            doc("a", json!({"ownerId": "u", "title": "Broken"})),
            doc("b", json!({"ownerId": "u", "tmdbId": "42", "type": "tv", "title": "Legacy"})),
        ];

        let projection = Projection::from_documents(&docs);
        assert_eq!(projection.len(), 1);
        assert_eq!(projection.get(42).unwrap().title, "Legacy");
    }
}
