//! Text synchronization for LSP didChange handling.
//!
//! Supports both synchronization modes: incremental changes carry a range
//! and replace only that span, full changes replace the entire document.

use tower_lsp_server::ls_types::TextDocumentContentChangeEvent;

use crate::document::PositionMapper;

/// Apply LSP content changes to the current text.
pub(crate) fn apply_content_changes(
    old_text: &str,
    content_changes: Vec<TextDocumentContentChangeEvent>,
) -> String {
    let mut text = old_text.to_string();

    for change in content_changes {
        if let Some(range) = change.range {
            let mapper = PositionMapper::new(&text);
            let start = mapper.position_to_byte(range.start).unwrap_or(text.len());
            let end = mapper.position_to_byte(range.end).unwrap_or(text.len());
            if start <= end && end <= text.len() {
                text.replace_range(start..end, &change.text);
            } else {
                log::warn!(
                    "Ignoring didChange with inverted range {start}..{end} (document length {})",
                    text.len()
                );
            }
        } else {
            // Full document change
            text = change.text;
        }
    }

    text
}
