use crate::document::Document;
use dashmap::DashMap;
use dashmap::mapref::one::Ref;
use std::ops::Deref;
use tower_lsp_server::ls_types::Uri;

// The central store for all open documents.
pub struct DocumentStore {
    documents: DashMap<Uri, Document>,
}

pub struct DocumentHandle<'a> {
    inner: Ref<'a, Uri, Document>,
}

impl<'a> DocumentHandle<'a> {
    fn new(inner: Ref<'a, Uri, Document>) -> Self {
        Self { inner }
    }
}

impl<'a> Deref for DocumentHandle<'a> {
    type Target = Document;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, uri: Uri, text: String, version: Option<i32>) {
        let document = match version {
            Some(version) => Document::with_version(text, version),
            None => Document::new(text),
        };
        self.documents.insert(uri, document);
    }

    pub fn get(&self, uri: &Uri) -> Option<DocumentHandle<'_>> {
        self.documents.get(uri).map(DocumentHandle::new)
    }

    /// Replace a document's text, preserving the entry when it exists.
    pub fn update(&self, uri: &Uri, text: String, version: Option<i32>) {
        if let Some(mut doc) = self.documents.get_mut(uri) {
            doc.set_text(text);
            doc.set_version(version);
            return;
        }

        // didChange for a document we never saw opened. Insert rather than
        // drop the update so completion still has text to work with.
        self.insert(uri.clone(), text, version);
    }

    pub fn get_text(&self, uri: &Uri) -> Option<String> {
        self.documents.get(uri).map(|doc| doc.text().to_string())
    }

    pub fn remove(&self, uri: &Uri) -> Option<Document> {
        self.documents.remove(uri).map(|(_, doc)| doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn uri(s: &str) -> Uri {
        Uri::from_str(s).unwrap()
    }

    #[test]
    fn test_add_and_get_document() {
        let store = DocumentStore::new();
        let uri = uri("file:///build.xml");
        let text = "<project/>".to_string();

        store.insert(uri.clone(), text.clone(), Some(1));
        let doc = store.get(&uri).unwrap();
        assert_eq!(doc.text(), &text);
        assert_eq!(doc.version(), Some(1));
    }

    #[test]
    fn test_update_existing_document() {
        let store = DocumentStore::new();
        let uri = uri("file:///build.xml");

        store.insert(uri.clone(), "<project>".to_string(), Some(1));
        store.update(&uri, "<project></project>".to_string(), Some(2));

        let doc = store.get(&uri).unwrap();
        assert_eq!(doc.text(), "<project></project>");
        assert_eq!(doc.version(), Some(2));
    }

    #[test]
    fn test_update_unknown_document_inserts() {
        let store = DocumentStore::new();
        let uri = uri("file:///late.xml");

        store.update(&uri, "<project/>".to_string(), Some(3));
        assert_eq!(store.get_text(&uri).as_deref(), Some("<project/>"));
    }

    #[test]
    fn test_remove_document() {
        let store = DocumentStore::new();
        let uri = uri("file:///build.xml");

        store.insert(uri.clone(), "<project/>".to_string(), None);
        assert!(store.remove(&uri).is_some());
        assert!(store.get(&uri).is_none());
    }
}
