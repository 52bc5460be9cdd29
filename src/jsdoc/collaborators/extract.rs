//! Block comment extraction
//!
//! A single forward scan over the source. String, template and line-comment
//! content is skipped so that `"/**"` inside a string is not mistaken for a
//! comment. Unterminated comments are dropped.

use super::context;
use crate::jsdoc::ast::{CommentKind, RawComment};

/// Every `/* ... */` block in `source`, in order.
pub fn extract_comments(source: &str) -> Vec<RawComment> {
    let bytes = source.as_bytes();
    let mut comments = Vec::new();
    let mut line = 1;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                line += 1;
                i += 1;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = source[i..].find('\n').map_or(bytes.len(), |end| i + end);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let Some(close) = source[i + 2..].find("*/") else {
                    break;
                };
                let end = i + 2 + close + 2;
                let text = &source[i..end];
                let end_line = line + text.matches('\n').count();
                comments.push(RawComment {
                    text: text.to_string(),
                    range: i..end,
                    start_line: line,
                    end_line,
                    kind: kind_of(text),
                    code: following_code(source, end, end_line),
                });
                line = end_line;
                i = end;
            }
            quote @ (b'"' | b'\'' | b'`') => {
                let end = skip_string(bytes, i, quote);
                line += source[i..end].matches('\n').count();
                i = end;
            }
            _ => i += 1,
        }
    }
    comments
}

fn kind_of(text: &str) -> CommentKind {
    if text.starts_with("/**") && text != "/**/" {
        CommentKind::Doc
    } else if text.starts_with("/*!") {
        CommentKind::Protected
    } else {
        CommentKind::Block
    }
}

/// Index just past the closing quote, or the end of input.
fn skip_string(bytes: &[u8], start: usize, quote: u8) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' if quote != b'`' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Code context of the first non-blank line at or after `from`.
fn following_code(source: &str, from: usize, mut line: usize) -> Option<crate::jsdoc::ast::CodeContext> {
    for (n, text) in source[from..].split('\n').enumerate() {
        if n > 0 {
            line += 1;
        }
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        if text.starts_with("/*") || text.starts_with("//") {
            return None;
        }
        return context::detect(text, line);
    }
    None
}
