//! Cursor context classification for completion requests.
//!
//! Works on the raw text before the cursor, so it stays usable while the
//! document is mid-edit and no well-formed tree exists.

use crate::model::scan::{self, TagEvent};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CursorContext {
    /// After `<`, typing an element name.
    Element {
        parent: Option<String>,
        prefix: String,
    },
    /// Inside a tag, typing an attribute name.
    AttributeName {
        element: String,
        prefix: String,
        /// Attributes already written in this tag, excluded from proposals.
        present: Vec<String>,
    },
    /// Inside an attribute value.
    AttributeValue {
        element: String,
        attribute: String,
        prefix: String,
    },
    /// Inside a `${...}` property expansion.
    Property { prefix: String },
    /// No completion applies (text content, comments, closing tags).
    None,
}

/// Classify the cursor position `offset` within `text`.
pub fn classify(text: &str, offset: usize) -> CursorContext {
    let offset = offset.min(text.len());
    let before = &text[..offset];

    if in_comment(before) {
        return CursorContext::None;
    }
    if let Some(prefix) = property_prefix(before) {
        return CursorContext::Property {
            prefix: prefix.to_string(),
        };
    }

    let Some(lt) = open_tag_start(before) else {
        return CursorContext::None;
    };
    let fragment = &before[lt..];
    if fragment.starts_with("</") || fragment.starts_with("<!") || fragment.starts_with("<?") {
        return CursorContext::None;
    }

    let name_end = fragment[1..]
        .find(|c: char| c.is_ascii_whitespace() || c == '/')
        .map(|i| i + 1);
    let Some(name_end) = name_end else {
        return CursorContext::Element {
            parent: enclosing_element(&before[..lt]),
            prefix: fragment[1..].to_string(),
        };
    };

    let element = fragment[1..name_end].to_string();
    classify_in_tag(element, &fragment[name_end..])
}

/// Classify a cursor inside a tag, past the element name.
fn classify_in_tag(element: String, rest: &str) -> CursorContext {
    #[derive(PartialEq)]
    enum State {
        Between,
        Name,
        ExpectValue,
        Value(char),
    }

    let mut state = State::Between;
    let mut token_start = 0;
    let mut last_attr = String::new();
    let mut present = Vec::new();

    for (idx, ch) in rest.char_indices() {
        match state {
            State::Between => {
                if ch == '=' {
                    state = State::ExpectValue;
                } else if !ch.is_ascii_whitespace() && ch != '/' {
                    token_start = idx;
                    state = State::Name;
                }
            }
            State::Name => {
                if ch == '=' {
                    last_attr = rest[token_start..idx].trim().to_string();
                    present.push(last_attr.clone());
                    state = State::ExpectValue;
                } else if ch.is_ascii_whitespace() {
                    last_attr = rest[token_start..idx].to_string();
                    present.push(last_attr.clone());
                    state = State::Between;
                }
            }
            State::ExpectValue => {
                if ch == '"' || ch == '\'' {
                    token_start = idx + ch.len_utf8();
                    state = State::Value(ch);
                } else if !ch.is_ascii_whitespace() {
                    token_start = idx;
                    state = State::Value('\0');
                }
            }
            State::Value(quote) => {
                let closed = if quote == '\0' {
                    ch.is_ascii_whitespace()
                } else {
                    ch == quote
                };
                if closed {
                    state = State::Between;
                }
            }
        }
    }

    match state {
        State::Value(_) => CursorContext::AttributeValue {
            element,
            attribute: last_attr,
            prefix: rest[token_start..].to_string(),
        },
        State::ExpectValue => CursorContext::AttributeValue {
            element,
            attribute: last_attr,
            prefix: String::new(),
        },
        State::Name => CursorContext::AttributeName {
            element,
            prefix: rest[token_start..].to_string(),
            present,
        },
        State::Between => CursorContext::AttributeName {
            element,
            prefix: String::new(),
            present,
        },
    }
}

/// Start of the tag still open at the end of `before`, if any.
///
/// A `>` only terminates a tag when it is outside quotes, so attribute
/// values like `message="a>b"` do not end the tag early.
fn open_tag_start(before: &str) -> Option<usize> {
    let bytes = before.as_bytes();
    let mut open: Option<usize> = None;
    let mut quote: u8 = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' if quote == 0 => {
                if before[i..].starts_with("<!--") {
                    match before[i..].find("-->") {
                        Some(j) => {
                            i += j + 3;
                            continue;
                        }
                        None => return None,
                    }
                }
                open = Some(i);
            }
            b'"' | b'\'' if open.is_some() => {
                if quote == 0 {
                    quote = bytes[i];
                } else if quote == bytes[i] {
                    quote = 0;
                }
            }
            b'>' if open.is_some() && quote == 0 => {
                open = None;
            }
            _ => {}
        }
        i += 1;
    }
    open
}

/// Whether the cursor sits inside an unterminated `<!-- -->` comment.
fn in_comment(before: &str) -> bool {
    match before.rfind("<!--") {
        Some(start) => !before[start..].contains("-->"),
        None => false,
    }
}

/// The prefix of an unterminated `${` expansion directly before the cursor.
fn property_prefix(before: &str) -> Option<&str> {
    let bytes = before.as_bytes();
    for i in (0..bytes.len()).rev() {
        match bytes[i] {
            b'}' | b'<' | b'>' | b'"' | b'\'' => return None,
            b'{' if i > 0 && bytes[i - 1] == b'$' => return Some(&before[i + 1..]),
            b'{' => return None,
            _ => {}
        }
    }
    None
}

/// Name of the innermost element still open at the end of `before`.
fn enclosing_element(before: &str) -> Option<String> {
    let mut stack: Vec<String> = Vec::new();
    for event in scan::tags(before) {
        match event {
            TagEvent::Open(tag) => stack.push(tag.name.to_ascii_lowercase()),
            TagEvent::SelfClose(_) | TagEvent::Skip { .. } => {}
            TagEvent::Close { name, .. } => {
                let lower = name.to_ascii_lowercase();
                if let Some(pos) = stack.iter().rposition(|n| *n == lower) {
                    stack.truncate(pos);
                }
            }
        }
    }
    stack.pop()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_at_end(text: &str) -> CursorContext {
        classify(text, text.len())
    }

    #[test]
    fn test_element_at_document_root() {
        assert_eq!(
            classify_at_end("<pro"),
            CursorContext::Element {
                parent: None,
                prefix: "pro".to_string()
            }
        );
    }

    #[test]
    fn test_element_inside_target() {
        let ctx = classify_at_end("<project>\n  <target name=\"build\">\n    <ja");
        assert_eq!(
            ctx,
            CursorContext::Element {
                parent: Some("target".to_string()),
                prefix: "ja".to_string()
            }
        );
    }

    #[test]
    fn test_parent_skips_closed_siblings() {
        let ctx = classify_at_end("<project><target name=\"a\"></target><tar");
        assert_eq!(
            ctx,
            CursorContext::Element {
                parent: Some("project".to_string()),
                prefix: "tar".to_string()
            }
        );
    }

    #[test]
    fn test_attribute_name_with_prefix() {
        let ctx = classify_at_end("<javac srcdir=\"src\" de");
        assert_eq!(
            ctx,
            CursorContext::AttributeName {
                element: "javac".to_string(),
                prefix: "de".to_string(),
                present: vec!["srcdir".to_string()],
            }
        );
    }

    #[test]
    fn test_attribute_name_after_space() {
        let ctx = classify_at_end("<echo ");
        assert_eq!(
            ctx,
            CursorContext::AttributeName {
                element: "echo".to_string(),
                prefix: String::new(),
                present: Vec::new(),
            }
        );
    }

    #[test]
    fn test_attribute_value_double_quoted() {
        let ctx = classify_at_end("<target name=\"build\" depends=\"ini");
        assert_eq!(
            ctx,
            CursorContext::AttributeValue {
                element: "target".to_string(),
                attribute: "depends".to_string(),
                prefix: "ini".to_string(),
            }
        );
    }

    #[test]
    fn test_attribute_value_right_after_equals() {
        let ctx = classify_at_end("<antcall target=");
        assert_eq!(
            ctx,
            CursorContext::AttributeValue {
                element: "antcall".to_string(),
                attribute: "target".to_string(),
                prefix: String::new(),
            }
        );
    }

    #[test]
    fn test_property_inside_attribute_value() {
        let ctx = classify_at_end("<mkdir dir=\"${build");
        assert_eq!(
            ctx,
            CursorContext::Property {
                prefix: "build".to_string()
            }
        );
    }

    #[test]
    fn test_property_closed_brace_is_not_property() {
        let ctx = classify_at_end("<mkdir dir=\"${build.dir}/cla");
        assert_eq!(
            ctx,
            CursorContext::AttributeValue {
                element: "mkdir".to_string(),
                attribute: "dir".to_string(),
                prefix: "${build.dir}/cla".to_string(),
            }
        );
    }

    #[test]
    fn test_attribute_name_after_value_containing_gt() {
        let ctx = classify_at_end("<echo message=\"a>b\" ");
        assert_eq!(
            ctx,
            CursorContext::AttributeName {
                element: "echo".to_string(),
                prefix: String::new(),
                present: vec!["message".to_string()],
            }
        );
    }

    #[test]
    fn test_attribute_value_containing_gt_stays_open() {
        let ctx = classify_at_end("<echo message=\"a>b");
        assert_eq!(
            ctx,
            CursorContext::AttributeValue {
                element: "echo".to_string(),
                attribute: "message".to_string(),
                prefix: "a>b".to_string(),
            }
        );
    }

    #[test]
    fn test_comment_yields_nothing() {
        assert_eq!(classify_at_end("<project><!-- <ja"), CursorContext::None);
    }

    #[test]
    fn test_closing_tag_yields_nothing() {
        assert_eq!(classify_at_end("<project></pro"), CursorContext::None);
    }

    #[test]
    fn test_text_content_yields_nothing() {
        assert_eq!(classify_at_end("<echo>some mes"), CursorContext::None);
        assert_eq!(classify_at_end("no markup at all"), CursorContext::None);
    }

    #[test]
    fn test_offset_clamped_to_text_length() {
        assert_eq!(
            classify("<ta", 100),
            CursorContext::Element {
                parent: None,
                prefix: "ta".to_string()
            }
        );
    }
}
