//! Error types for type, tag and pipeline failures
//!
//! Grammar and tag failures are input errors: depending on `strict` they are
//! either raised or the offending tag is dropped (see [`policy`](super::policy)).
//! Handler errors are configuration errors and always abort the parse.

use crate::jsdoc::ast::NodeKind;
use crate::jsdoc::pipeline::{NodeType, Phase};
use thiserror::Error;

/// A malformed type literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeSyntaxError {
    #[error("unexpected `{found}` at offset {offset}, expected {expected}")]
    Unexpected {
        found: String,
        expected: &'static str,
        offset: usize,
    },

    #[error("unexpected end of type literal, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("unbalanced `{bracket}` at offset {offset}")]
    UnbalancedBracket { bracket: char, offset: usize },

    #[error("malformed record key at offset {offset}")]
    MalformedRecordKey { offset: usize },

    #[error("duplicate record key `{key}`")]
    DuplicateRecordKey { key: String },

    #[error("function signature opened at offset {offset} is missing `)`")]
    UnterminatedFunction { offset: usize },

    #[error("invalid character in type literal at offset {offset}")]
    InvalidCharacter { offset: usize },

    #[error("unexpected trailing input at offset {offset}")]
    TrailingInput { offset: usize },

    #[error("type literal nests deeper than {limit} levels")]
    TooDeep { limit: usize },
}

/// A tag line that cannot be split into title, type, name and description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagSyntaxError {
    #[error("tag line has no title")]
    MissingTitle,

    #[error("invalid tag title `{0}`")]
    InvalidTitle(String),

    #[error("unbalanced braces in type of `@{title}` at offset {offset}")]
    UnbalancedType { title: String, offset: usize },

    #[error("invalid type in `@{title}`")]
    InvalidType {
        title: String,
        #[source]
        source: TypeSyntaxError,
    },

    #[error("`@{0}` requires a type")]
    MissingType(String),
}

/// A registered handler could not be applied to the node it was dispatched for.
///
/// `raw` is the source text of the node the handler received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "{phase} handler for `{node_type}` returned a `{found}` node, expected `{expected}` (at `{}`)",
    first_line(.raw)
)]
pub struct HandlerTypeError {
    pub node_type: NodeType,
    pub phase: Phase,
    pub expected: NodeKind,
    pub found: NodeKind,
    pub raw: String,
}

fn first_line(raw: &str) -> &str {
    raw.lines().next().unwrap_or_default().trim()
}

/// Any failure surfaced by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Type(#[from] TypeSyntaxError),

    #[error(transparent)]
    Tag(#[from] TagSyntaxError),

    #[error(transparent)]
    Handler(#[from] HandlerTypeError),
}

impl ParseError {
    /// Fatal errors propagate regardless of `strict`.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ParseError::Handler(_))
    }
}

/// Type alias for results carrying a [`ParseError`]
pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_handler_errors_are_fatal() {
        let type_err: ParseError = TypeSyntaxError::TooDeep { limit: 64 }.into();
        assert!(!type_err.is_fatal());

        let tag_err: ParseError = TagSyntaxError::MissingTitle.into();
        assert!(!tag_err.is_fatal());

        let handler_err: ParseError = HandlerTypeError {
            node_type: NodeType::Title("param".to_string()),
            phase: Phase::Before,
            expected: NodeKind::Tag,
            found: NodeKind::Comment,
            raw: "@param {string} name".to_string(),
        }
        .into();
        assert!(handler_err.is_fatal());
    }

    #[test]
    fn test_error_display() {
        let err = TypeSyntaxError::UnterminatedFunction { offset: 0 };
        assert_eq!(
            err.to_string(),
            "function signature opened at offset 0 is missing `)`"
        );

        let err = HandlerTypeError {
            node_type: NodeType::Title("param".to_string()),
            phase: Phase::After,
            expected: NodeKind::Tag,
            found: NodeKind::InlineTag,
            raw: "@param {string} name".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "after handler for `param` returned a `inlineTag` node, expected `tag` (at `@param {string} name`)"
        );

        let err = HandlerTypeError {
            node_type: NodeType::Comment,
            phase: Phase::Before,
            expected: NodeKind::Comment,
            found: NodeKind::Tag,
            raw: "/**\n * Greets someone.\n */".to_string(),
        };
        assert!(err.to_string().ends_with("(at `/**`)"));
    }

    #[test]
    fn test_invalid_type_keeps_source() {
        use std::error::Error as _;

        let err = TagSyntaxError::InvalidType {
            title: "param".to_string(),
            source: TypeSyntaxError::UnexpectedEnd { expected: "a type" },
        };
        assert!(err.source().is_some());
    }
}
