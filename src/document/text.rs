/// A plain text document without any derived model state
#[derive(Clone, Debug)]
pub struct Document {
    text: String,
    version: Option<i32>,
}

impl Document {
    /// Create a new document
    pub fn new(text: String) -> Self {
        Self {
            text,
            version: None,
        }
    }

    /// Create a new document with version
    pub fn with_version(text: String, version: i32) -> Self {
        Self {
            text,
            version: Some(version),
        }
    }

    /// Get the text content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the document version
    pub fn version(&self) -> Option<i32> {
        self.version
    }

    /// Update the text content
    pub fn set_text(&mut self, text: String) {
        self.text = text;
    }

    /// Update the version
    pub fn set_version(&mut self, version: Option<i32>) {
        self.version = version;
    }

    /// Get the length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the document is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_creation() {
        let doc = Document::new("<project/>".to_string());
        assert_eq!(doc.text(), "<project/>");
        assert_eq!(doc.version(), None);
        assert_eq!(doc.len(), 10);
        assert!(!doc.is_empty());
    }

    #[test]
    fn test_document_with_version() {
        let doc = Document::with_version("<project/>".to_string(), 42);
        assert_eq!(doc.version(), Some(42));
    }

    #[test]
    fn test_document_mutation() {
        let mut doc = Document::new("<project>".to_string());
        doc.set_text("<project></project>".to_string());
        doc.set_version(Some(1));

        assert_eq!(doc.text(), "<project></project>");
        assert_eq!(doc.version(), Some(1));
    }
}
