//! Tag line splitting
//!
//! A tag line is split, left to right, into up to four fields:
//!
//! ```text
//! @param {Array.<string>=} [names=[]] - The names to use
//!  ^^^^^  ^^^^^^^^^^^^^^^  ^^^^^^^^^^   ^^^^^^^^^^^^^^^^^
//!  title  type literal     name         description
//! ```
//!
//! The type literal is recognized only as the first token after the title and
//! only when it is one balanced `{...}` span (`{@link ...}` is an inline
//! reference, not a type). A name is read only for titles whose definition
//! takes one. Splitting never parses the type; see [`resolve_type`].

use super::definitions;
use super::tag::Tag;
use crate::jsdoc::error::TagSyntaxError;
use crate::jsdoc::types::{parse_type_with_depth, TypeNode};

/// Split one tag line into a [`Tag`] with its raw fields filled in.
///
/// The leading `@` is optional. The title is canonicalized; `ty` is left
/// empty.
pub fn split_tag(line: &str) -> Result<Tag, TagSyntaxError> {
    let text = line.trim_start();
    let text = text.strip_prefix('@').unwrap_or(text);

    let title_end = text
        .find(|c: char| c.is_whitespace() || c == '{')
        .unwrap_or(text.len());
    let title = &text[..title_end];
    if title.is_empty() {
        return Err(TagSyntaxError::MissingTitle);
    }
    if !title
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == ':' || c == '$')
    {
        return Err(TagSyntaxError::InvalidTitle(title.to_string()));
    }

    let definition = definitions::definition_or_unknown(title);
    let mut tag = Tag::new(definitions::canonical_title(title));
    tag.raw = line.to_string();

    let mut rest = text[title_end..].trim_start();

    if rest.starts_with('{') && !rest.starts_with("{@") {
        let Some(close) = closing_brace(rest) else {
            return Err(TagSyntaxError::UnbalancedType {
                title: tag.title,
                offset: line.len() - rest.len(),
            });
        };
        tag.raw_type = Some(rest[1..close].to_string());
        rest = rest[close + 1..].trim_start();
    }

    if definition.takes_name {
        let (name, remainder) = split_name(rest);
        if let Some(name) = name {
            tag.name = Some(name.name);
            tag.optional = name.optional;
            tag.default = name.default;
        }
        rest = remainder;
    }

    tag.description = description(rest);
    Ok(tag)
}

/// Parse the tag's raw type literal into `ty`.
///
/// Titles whose definition forbids a type are left untyped without parsing,
/// so a spurious clause can never fail. A `[name]` marks the type optional.
pub fn resolve_type(mut tag: Tag, max_depth: usize) -> Result<Tag, TagSyntaxError> {
    if definitions::definition_or_unknown(&tag.title).type_policy
        == definitions::TypePolicy::Forbidden
    {
        return Ok(tag);
    }
    let Some(raw) = tag.raw_type.as_deref() else {
        return Ok(tag);
    };

    let ty = parse_type_with_depth(raw, max_depth).map_err(|source| {
        TagSyntaxError::InvalidType {
            title: tag.title.clone(),
            source,
        }
    })?;
    tag.ty = Some(mark_optional(ty, tag.optional));
    Ok(tag)
}

pub(crate) fn mark_optional(ty: TypeNode, optional: bool) -> TypeNode {
    if optional && !ty.is_optional() {
        TypeNode::optional(ty)
    } else {
        ty
    }
}

struct TagName {
    name: String,
    optional: bool,
    default: Option<String>,
}

fn split_name(text: &str) -> (Option<TagName>, &str) {
    if text.starts_with('[') {
        if let Some(close) = closing_bracket(text) {
            let inner = text[1..close].trim();
            let (name, default) = match inner.split_once('=') {
                Some((name, default)) => {
                    let default = default.trim();
                    (name.trim(), (!default.is_empty()).then(|| default.to_string()))
                }
                None => (inner, None),
            };
            if name.is_empty() {
                return (None, text);
            }
            let name = TagName {
                name: name.to_string(),
                optional: true,
                default,
            };
            return (Some(name), text[close + 1..].trim_start());
        }
    }

    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    let token = &text[..end];
    if token.is_empty() || token == "-" {
        return (None, text);
    }
    let name = TagName {
        name: token.to_string(),
        optional: false,
        default: None,
    };
    (Some(name), text[end..].trim_start())
}

fn description(text: &str) -> Option<String> {
    let text = text.trim();
    let text = match text.strip_prefix('-') {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim_start(),
        _ => text,
    };
    (!text.is_empty()).then(|| text.to_string())
}

/// Index of the `}` matching the `{` at index 0. Quoted strings are opaque.
fn closing_brace(text: &str) -> Option<usize> {
    matching(text, '{', '}')
}

fn closing_bracket(text: &str) -> Option<usize> {
    matching(text, '[', ']')
}

fn matching(text: &str, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => quote = Some(ch),
            c if c == open => depth += 1,
            c if c == close => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
