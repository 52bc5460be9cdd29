use serde::{Deserialize, Serialize};

/// A `{@tag value}` marker found in free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineReference {
    /// Exact matched text, braces included
    pub raw: String,
    /// Inline tag name without the `@`: `link`, `linkcode`, `linkplain`, ...
    pub tag: String,
    /// Everything between the tag name and the closing brace, trimmed
    pub value: String,
    /// Byte offset of the opening brace in the scanned text
    pub offset: usize,
}

impl InlineReference {
    /// Human-readable rendering used when markers are stripped from text.
    ///
    /// Link-style tags follow the JSDoc conventions `{@link target|label}`
    /// and `{@link target label}`; other tags render their value.
    pub fn display_text(&self) -> &str {
        if !self.tag.starts_with("link") {
            return &self.value;
        }
        if let Some((_, label)) = self.value.split_once('|') {
            return label.trim();
        }
        match self.value.split_once(char::is_whitespace) {
            Some((_, label)) if !label.trim().is_empty() => label.trim(),
            _ => &self.value,
        }
    }

    /// The referenced target, without any label.
    pub fn target(&self) -> &str {
        let end = self
            .value
            .find(|c: char| c == '|' || c.is_whitespace())
            .unwrap_or(self.value.len());
        &self.value[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(tag: &str, value: &str) -> InlineReference {
        InlineReference {
            raw: format!("{{@{} {}}}", tag, value),
            tag: tag.to_string(),
            value: value.to_string(),
            offset: 0,
        }
    }

    #[test]
    fn test_link_labels() {
        assert_eq!(reference("link", "Foo#bar").display_text(), "Foo#bar");
        assert_eq!(reference("link", "Foo#bar|the bar").display_text(), "the bar");
        assert_eq!(reference("linkplain", "http://x.io Site").display_text(), "Site");
        assert_eq!(reference("link", "Foo#bar|the bar").target(), "Foo#bar");
    }

    #[test]
    fn test_non_link_renders_value() {
        assert_eq!(reference("code", "a b").display_text(), "a b");
    }
}
