use tower_lsp_server::ls_types::{Position, Range};

/// Maps between LSP positions (UTF-16 line/character) and byte offsets.
pub struct PositionMapper<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> PositionMapper<'a> {
    /// Create a new PositionMapper with pre-computed line starts
    pub fn new(text: &'a str) -> Self {
        let line_starts = compute_line_starts(text);
        Self { text, line_starts }
    }

    /// Get the byte offset of a line start
    fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    /// Convert an LSP Position to a byte offset in the document
    pub fn position_to_byte(&self, position: Position) -> Option<usize> {
        let line = position.line as usize;
        let character = position.character as usize;

        let line_start = self.line_start(line)?;
        let line_end = if line + 1 < self.line_starts.len() {
            self.line_starts[line + 1] - 1 // Exclude the newline
        } else {
            self.text.len()
        };
        let line_text = &self.text[line_start..line_end];

        // Convert UTF-16 character offset to byte offset within the line
        let mut byte_offset = 0;
        let mut utf16_offset = 0;
        for ch in line_text.chars() {
            if utf16_offset >= character {
                return Some(line_start + byte_offset);
            }
            utf16_offset += ch.len_utf16();
            byte_offset += ch.len_utf8();
        }

        // Positions past the end of the line clamp to the line end
        Some(line_start + byte_offset.min(line_text.len()))
    }

    /// Convert a byte offset to an LSP Position
    pub fn byte_to_position(&self, offset: usize) -> Option<Position> {
        if offset > self.text.len() {
            return None;
        }

        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next_line) => next_line.saturating_sub(1),
        };
        let line_start = self.line_start(line)?;

        let mut utf16_offset = 0;
        for (byte_pos, ch) in self.text[line_start..].char_indices() {
            if line_start + byte_pos >= offset {
                break;
            }
            utf16_offset += ch.len_utf16();
        }

        Some(Position {
            line: line as u32,
            character: utf16_offset as u32,
        })
    }

    /// Convert a byte range to an LSP Range
    pub fn byte_range_to_range(&self, start: usize, end: usize) -> Option<Range> {
        let start_pos = self.byte_to_position(start)?;
        let end_pos = self.byte_to_position(end)?;
        Some(Range {
            start: start_pos,
            end: end_pos,
        })
    }
}

/// Compute the byte offset of each line start
pub fn compute_line_starts(text: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (idx, byte) in text.bytes().enumerate() {
        if byte == b'\n' {
            starts.push(idx + 1);
        }
    }
    starts
}
