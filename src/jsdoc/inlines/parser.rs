use super::nodes::InlineReference;

const MARKER: &str = "{@";

/// Scan `text` for `{@tag value}` markers.
///
/// Returns the text unchanged plus every well-formed marker, in source order.
pub fn parse_inline(text: &str) -> (String, Vec<InlineReference>) {
    scan(text, false)
}

/// Like [`parse_inline`], but replaces each marker in the returned text with
/// its [`display_text`](InlineReference::display_text).
pub fn parse_inline_stripped(text: &str) -> (String, Vec<InlineReference>) {
    scan(text, true)
}

fn scan(text: &str, strip: bool) -> (String, Vec<InlineReference>) {
    let mut references = Vec::new();
    let mut cleaned = String::with_capacity(text.len());
    let mut copied = 0;
    let mut cursor = 0;

    while let Some(found) = text[cursor..].find(MARKER) {
        let start = cursor + found;
        let name_start = start + MARKER.len();
        let name_end = name_start
            + text[name_start..]
                .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
                .unwrap_or(text.len() - name_start);

        let well_formed_name = name_end > name_start
            && text[name_end..]
                .chars()
                .next()
                .is_some_and(|c| c == '}' || c.is_whitespace());
        if !well_formed_name {
            cursor = name_start;
            continue;
        }

        // Unterminated markers stay in the text verbatim
        let Some(close) = matching_brace(text, name_end) else {
            cursor = name_start;
            continue;
        };

        let reference = InlineReference {
            raw: text[start..=close].to_string(),
            tag: text[name_start..name_end].to_string(),
            value: text[name_end..close].trim().to_string(),
            offset: start,
        };

        if strip {
            cleaned.push_str(&text[copied..start]);
            cleaned.push_str(reference.display_text());
            copied = close + 1;
        }
        references.push(reference);
        cursor = close + 1;
    }

    if strip {
        cleaned.push_str(&text[copied..]);
    } else {
        cleaned.push_str(text);
    }
    (cleaned, references)
}

/// Byte index of the `}` closing a marker whose body starts at `from`.
/// Nested braces in the body are balanced by depth counting.
fn matching_brace(text: &str, from: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (i, ch) in text[from..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(from + i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_link() {
        let (text, refs) = parse_inline("see {@link Foo#bar} for details");
        assert_eq!(text, "see {@link Foo#bar} for details");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].tag, "link");
        assert_eq!(refs[0].value, "Foo#bar");
        assert_eq!(refs[0].raw, "{@link Foo#bar}");
        assert_eq!(refs[0].offset, 4);
    }

    #[test]
    fn test_stripped_text() {
        let (text, refs) = parse_inline_stripped("see {@link Foo#bar} for details");
        assert_eq!(text, "see Foo#bar for details");
        assert_eq!(refs.len(), 1);

        let (text, _) = parse_inline_stripped("use {@linkcode Foo|the foo} or {@code x()}");
        assert_eq!(text, "use the foo or x()");
    }

    #[test]
    fn test_nested_braces_in_value() {
        let (_, refs) = parse_inline("{@code {a: 1}} done");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].tag, "code");
        assert_eq!(refs[0].value, "{a: 1}");
    }

    #[test]
    fn test_unterminated_marker_is_left_alone() {
        let (text, refs) = parse_inline_stripped("broken {@link Foo and {@link Bar} ok");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].value, "Bar");
        assert_eq!(text, "broken {@link Foo and Bar ok");
    }

    #[test]
    fn test_not_a_marker() {
        let (text, refs) = parse_inline("object {@} and {@ link} and {@link");
        assert!(refs.is_empty());
        assert_eq!(text, "object {@} and {@ link} and {@link");
    }

    #[test]
    fn test_empty_value() {
        let (_, refs) = parse_inline("{@inheritDoc}");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].tag, "inheritDoc");
        assert_eq!(refs[0].value, "");
    }

    #[test]
    fn test_multiple_in_order() {
        let (_, refs) = parse_inline("{@link A} then {@link B} then {@tutorial c}");
        let tags: Vec<_> = refs.iter().map(|r| (r.tag.as_str(), r.value.as_str())).collect();
        assert_eq!(tags, vec![("link", "A"), ("link", "B"), ("tutorial", "c")]);
    }
}
