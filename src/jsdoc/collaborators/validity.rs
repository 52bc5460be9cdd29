use crate::jsdoc::ast::{CommentKind, RawComment};
use crate::jsdoc::config::ParserConfig;
use once_cell::sync::Lazy;
use regex::Regex;

/// Tool directives that happen to live in block comments: `/* eslint-disable */`,
/// `/** @ts-ignore */`, `/* global foo */` and friends.
static DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:eslint(?:-[\w-]+)?|jshint|jslint|globals?|istanbul|exported|prettier-ignore|tslint:[\w-]+|@ts-[\w-]+)(?:\s|:|$)",
    )
    .unwrap()
});

/// Whether a raw comment should be parsed at all.
///
/// Only `/** */` comments are documentation. `/*! */` comments and anything
/// carrying `@license` or `@preserve` are kept only with
/// `extract.keep_protected`.
pub fn is_valid(comment: &RawComment, config: &ParserConfig) -> bool {
    let keep_protected = config.extract.keep_protected;
    match comment.kind {
        CommentKind::Block => return false,
        CommentKind::Protected => return keep_protected,
        CommentKind::Doc => {}
    }

    if !keep_protected && (comment.text.contains("@license") || comment.text.contains("@preserve")) {
        return false;
    }

    let body = comment
        .text
        .trim_start_matches('/')
        .trim_start_matches(['*', '!'])
        .trim_start_matches(|c: char| c.is_whitespace() || c == '*');
    !DIRECTIVE.is_match(body)
}
