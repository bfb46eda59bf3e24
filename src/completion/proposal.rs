//! Completion proposals and their plain-text rendering.

use tower_lsp_server::ls_types::{CompletionItem, CompletionItemKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProposalKind {
    Task,
    Element,
    Attribute,
    Value,
    Target,
    Property,
}

impl ProposalKind {
    fn completion_item_kind(self) -> CompletionItemKind {
        match self {
            ProposalKind::Task => CompletionItemKind::FUNCTION,
            ProposalKind::Element => CompletionItemKind::CLASS,
            ProposalKind::Attribute => CompletionItemKind::PROPERTY,
            ProposalKind::Value => CompletionItemKind::VALUE,
            ProposalKind::Target => CompletionItemKind::REFERENCE,
            ProposalKind::Property => CompletionItemKind::VARIABLE,
        }
    }
}

/// A candidate suggestion with its display string.
///
/// The display string is what a proposal list shows, e.g.
/// `"javac - Compiles Java source files"`. The text actually inserted is the
/// display string truncated at the first `" - "`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proposal {
    display: String,
    kind: ProposalKind,
}

impl Proposal {
    pub fn new(name: &str, description: Option<&str>, kind: ProposalKind) -> Self {
        let display = match description {
            Some(desc) => format!("{name} - {desc}"),
            None => name.to_string(),
        };
        Self { display, kind }
    }

    /// A proposal whose display string carries no description.
    pub fn bare(name: &str, kind: ProposalKind) -> Self {
        Self::new(name, None, kind)
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn kind(&self) -> ProposalKind {
        self.kind
    }

    /// The text to insert for this proposal.
    pub fn insert_text(&self) -> &str {
        insert_text(&self.display)
    }

    /// The human-readable remainder stripped from the display string, if any.
    pub fn description(&self) -> Option<&str> {
        self.display.find(" - ").map(|i| &self.display[i + 3..])
    }

    pub fn into_completion_item(self) -> CompletionItem {
        let insert = self.insert_text().to_string();
        CompletionItem {
            label: insert.clone(),
            kind: Some(self.kind.completion_item_kind()),
            detail: self.description().map(str::to_string),
            insert_text: Some(insert),
            ..CompletionItem::default()
        }
    }
}

/// Truncate a proposal display string at the first literal `" - "`.
///
/// Text without the delimiter passes through unchanged. Applied uniformly to
/// every proposal kind.
pub fn insert_text(display: &str) -> &str {
    match display.find(" - ") {
        Some(idx) => &display[..idx],
        None => display,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_text_strips_description() {
        assert_eq!(insert_text("javac - Compiles Java source files"), "javac");
        assert_eq!(insert_text("target - Runs the build"), "target");
    }

    #[test]
    fn test_insert_text_without_delimiter_is_unchanged() {
        assert_eq!(insert_text("echo"), "echo");
        assert_eq!(insert_text(""), "");
    }

    #[test]
    fn test_insert_text_truncates_at_first_occurrence() {
        assert_eq!(insert_text("a - b - c"), "a");
    }

    #[test]
    fn test_insert_text_requires_surrounding_spaces() {
        // A plain hyphen is not the delimiter.
        assert_eq!(insert_text("my-target"), "my-target");
        assert_eq!(insert_text("build- half"), "build- half");
    }

    #[test]
    fn test_proposal_display_and_parts() {
        let p = Proposal::new(
            "javac",
            Some("Compiles Java source files"),
            ProposalKind::Task,
        );
        assert_eq!(p.display(), "javac - Compiles Java source files");
        assert_eq!(p.insert_text(), "javac");
        assert_eq!(p.description(), Some("Compiles Java source files"));

        let bare = Proposal::bare("echo", ProposalKind::Task);
        assert_eq!(bare.display(), "echo");
        assert_eq!(bare.insert_text(), "echo");
        assert_eq!(bare.description(), None);
    }

    #[test]
    fn test_into_completion_item() {
        let item = Proposal::new("javac", Some("Compiles Java source files"), ProposalKind::Task)
            .into_completion_item();
        assert_eq!(item.label, "javac");
        assert_eq!(item.insert_text.as_deref(), Some("javac"));
        assert_eq!(item.detail.as_deref(), Some("Compiles Java source files"));
        assert_eq!(item.kind, Some(CompletionItemKind::FUNCTION));
    }
}
