//! Whitespace tidying for parsed comments, applied when `format` is set.

use crate::jsdoc::ast::Comment;
use once_cell::sync::Lazy;
use regex::Regex;

static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Normalize a piece of prose: `\n` line endings, no trailing whitespace,
/// at most one blank line in a row, trimmed.
pub fn tidy(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let joined = lines.join("\n");
    BLANK_RUNS.replace_all(&joined, "\n\n").trim().to_string()
}

/// Tidy the comment, its footer and every tag description. Tag descriptions
/// that end up empty become `None`. Examples are left alone.
pub fn format_comment(mut comment: Comment) -> Comment {
    comment.description = tidy(&comment.description);
    comment.footer = comment.footer.as_deref().map(tidy).filter(|f| !f.is_empty());
    for tag in &mut comment.tags {
        tag.description = tag.description.as_deref().map(tidy).filter(|d| !d.is_empty());
    }
    comment
}
