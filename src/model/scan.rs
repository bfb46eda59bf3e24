//! Tolerant scanner for XML-shaped build file text.
//!
//! Build files under edit are routinely malformed: unclosed tags, attributes
//! without values, truncated comments. The scanner never fails; it yields
//! whatever tags it can recognize and leaves interpretation to the model.

/// A single attribute inside a tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attr<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

/// An opening or self-closing tag with its attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag<'a> {
    pub name: &'a str,
    pub attrs: Vec<Attr<'a>>,
    /// Byte offset of the leading `<`.
    pub start: usize,
    /// Byte offset one past the closing `>` (or the text end when unclosed).
    pub end: usize,
}

impl<'a> Tag<'a> {
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TagEvent<'a> {
    Open(Tag<'a>),
    SelfClose(Tag<'a>),
    Close { name: &'a str, start: usize },
    /// Comments, processing instructions, and doctype declarations.
    Skip { start: usize, end: usize },
}

pub struct TagIter<'a> {
    text: &'a str,
    pos: usize,
}

/// Iterate over the tags of `text` in document order.
pub fn tags(text: &str) -> TagIter<'_> {
    TagIter { text, pos: 0 }
}

impl<'a> Iterator for TagIter<'a> {
    type Item = TagEvent<'a>;

    fn next(&mut self) -> Option<TagEvent<'a>> {
        let text = self.text;
        let start = self.pos + text[self.pos..].find('<')?;
        let rest = &text[start..];

        if rest.starts_with("<!--") {
            let end = match rest.find("-->") {
                Some(i) => start + i + 3,
                None => text.len(),
            };
            self.pos = end;
            return Some(TagEvent::Skip { start, end });
        }
        if rest.starts_with("<?") {
            let end = match rest.find("?>") {
                Some(i) => start + i + 2,
                None => text.len(),
            };
            self.pos = end;
            return Some(TagEvent::Skip { start, end });
        }
        if rest.starts_with("<!") {
            let end = match rest.find('>') {
                Some(i) => start + i + 1,
                None => text.len(),
            };
            self.pos = end;
            return Some(TagEvent::Skip { start, end });
        }
        if let Some(name_text) = rest.strip_prefix("</") {
            let name_len = name_text
                .find(|c: char| c.is_ascii_whitespace() || c == '>')
                .unwrap_or(name_text.len());
            let end = match rest.find('>') {
                Some(i) => start + i + 1,
                None => text.len(),
            };
            self.pos = end;
            return Some(TagEvent::Close {
                name: &name_text[..name_len],
                start,
            });
        }

        let (tag, self_closing) = parse_tag(text, start);
        self.pos = tag.end.max(start + 1);
        Some(if self_closing {
            TagEvent::SelfClose(tag)
        } else {
            TagEvent::Open(tag)
        })
    }
}

/// Parse an opening tag starting at the `<` at `start`.
///
/// Returns the tag and whether it is self-closing. An unclosed tag consumes
/// the remainder of the text.
fn parse_tag(text: &str, start: usize) -> (Tag<'_>, bool) {
    let bytes = text.as_bytes();
    let mut pos = start + 1;

    let name_start = pos;
    while pos < bytes.len() && !is_name_end(bytes[pos]) {
        pos += 1;
    }
    let name = &text[name_start..pos];
    let mut attrs = Vec::new();
    let mut self_closing = false;

    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= bytes.len() {
            break;
        }
        match bytes[pos] {
            b'>' => {
                pos += 1;
                break;
            }
            b'/' => {
                self_closing = true;
                pos += 1;
                continue;
            }
            b'<' => break, // next tag started before this one was closed
            _ => {}
        }

        let attr_start = pos;
        while pos < bytes.len() && !is_attr_name_end(bytes[pos]) {
            pos += 1;
        }
        let attr_name = &text[attr_start..pos];

        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        let mut value = "";
        if pos < bytes.len() && bytes[pos] == b'=' {
            pos += 1;
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            if pos < bytes.len() && (bytes[pos] == b'"' || bytes[pos] == b'\'') {
                let quote = bytes[pos];
                pos += 1;
                let value_start = pos;
                while pos < bytes.len() && bytes[pos] != quote {
                    pos += 1;
                }
                value = &text[value_start..pos];
                if pos < bytes.len() {
                    pos += 1; // closing quote
                }
            } else {
                let value_start = pos;
                while pos < bytes.len() && !is_name_end(bytes[pos]) {
                    pos += 1;
                }
                value = &text[value_start..pos];
            }
        }
        if !attr_name.is_empty() {
            attrs.push(Attr {
                name: attr_name,
                value,
            });
        }
    }

    (
        Tag {
            name,
            attrs,
            start,
            end: pos,
        },
        self_closing,
    )
}

fn is_name_end(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == b'>' || byte == b'/' || byte == b'<' || byte == b'='
}

fn is_attr_name_end(byte: u8) -> bool {
    is_name_end(byte) || byte == b'\'' || byte == b'"'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_names(text: &str) -> Vec<String> {
        tags(text)
            .filter_map(|event| match event {
                TagEvent::Open(tag) | TagEvent::SelfClose(tag) => Some(tag.name.to_string()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_simple_open_close() {
        let mut iter = tags("<project></project>");
        match iter.next().unwrap() {
            TagEvent::Open(tag) => {
                assert_eq!(tag.name, "project");
                assert!(tag.attrs.is_empty());
                assert_eq!((tag.start, tag.end), (0, 9));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(matches!(
            iter.next().unwrap(),
            TagEvent::Close { name: "project", .. }
        ));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_attributes_double_and_single_quoted() {
        let text = r#"<target name="build" description='Build it'>"#;
        let TagEvent::Open(tag) = tags(text).next().unwrap() else {
            panic!("expected open tag");
        };
        assert_eq!(tag.attr("name"), Some("build"));
        assert_eq!(tag.attr("description"), Some("Build it"));
    }

    #[test]
    fn test_self_closing_tag() {
        let TagEvent::SelfClose(tag) = tags("<mkdir dir=\"out\"/>").next().unwrap() else {
            panic!("expected self-closing tag");
        };
        assert_eq!(tag.name, "mkdir");
        assert_eq!(tag.attr("dir"), Some("out"));
    }

    #[test]
    fn test_comment_and_declarations_are_skipped() {
        let text = "<?xml version=\"1.0\"?><!-- <fake/> --><!DOCTYPE project><project/>";
        assert_eq!(open_names(text), vec!["project"]);
    }

    #[test]
    fn test_unterminated_comment_consumes_rest() {
        let mut iter = tags("<project><!-- dangling <echo/>");
        assert!(matches!(iter.next().unwrap(), TagEvent::Open(_)));
        assert!(matches!(iter.next().unwrap(), TagEvent::Skip { .. }));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_unclosed_tag_does_not_panic() {
        let text = "<project><target name=\"bu";
        assert_eq!(open_names(text), vec!["project", "target"]);
        let TagEvent::Open(tag) = tags(text).nth(1).unwrap() else {
            panic!("expected open tag");
        };
        assert_eq!(tag.attr("name"), Some("bu"));
        assert_eq!(tag.end, text.len());
    }

    #[test]
    fn test_attribute_without_value() {
        let TagEvent::Open(tag) = tags("<echo message>").next().unwrap() else {
            panic!("expected open tag");
        };
        assert_eq!(tag.attr("message"), Some(""));
    }

    #[test]
    fn test_next_tag_recovers_from_unclosed_predecessor() {
        let names = open_names("<target name=\"x\" <echo/>");
        assert_eq!(names, vec!["target", "echo"]);
    }
}
