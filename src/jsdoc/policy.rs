//! Strict versus lenient handling of input errors
//!
//! Every fallible parse step returns a `Result`. [`Policy`] is where those
//! results meet the `strict` setting: nowhere else in the crate reads it.

use crate::jsdoc::config::ParserConfig;
use crate::jsdoc::error::{ParseError, TagSyntaxError};
use crate::jsdoc::tags::{lacks_required_type, Tag};
use crate::jsdoc::types::TypeNode;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    strict: bool,
}

impl Policy {
    pub fn new(strict: bool) -> Self {
        Policy { strict }
    }

    pub fn from_config(config: &ParserConfig) -> Self {
        Policy::new(config.strict)
    }

    /// Decide the fate of a failed step.
    ///
    /// Fatal errors always propagate. Otherwise strict mode propagates and
    /// lenient mode logs the error and yields `None`.
    pub fn settle<T>(&self, result: Result<T, ParseError>) -> Result<Option<T>, ParseError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_fatal() || self.strict => Err(err),
            Err(err) => {
                debug!(error = %err, "dropped after parse error");
                Ok(None)
            }
        }
    }

    /// A tag whose title requires a type gets an unknown-type marker in
    /// lenient mode and fails in strict mode.
    pub fn require_type(&self, mut tag: Tag) -> Result<Tag, ParseError> {
        if !lacks_required_type(&tag) {
            return Ok(tag);
        }
        if self.strict {
            return Err(TagSyntaxError::MissingType(tag.title).into());
        }
        warn!(title = %tag.title, raw = %tag.raw, "tag requires a type; using unknown");
        tag.ty = Some(TypeNode::Unknown);
        Ok(tag)
    }
}

impl Default for Policy {
    fn default() -> Self {
        Policy::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsdoc::ast::NodeKind;
    use crate::jsdoc::error::{HandlerTypeError, TypeSyntaxError};
    use crate::jsdoc::pipeline::{NodeType, Phase};

    fn syntax_error() -> ParseError {
        TypeSyntaxError::UnexpectedEnd { expected: "a type" }.into()
    }

    fn handler_error() -> ParseError {
        HandlerTypeError {
            node_type: NodeType::Tag,
            phase: Phase::Before,
            expected: NodeKind::Tag,
            found: NodeKind::Comment,
            raw: "@param x".to_string(),
        }
        .into()
    }

    #[test]
    fn test_lenient_swallows_syntax_errors() {
        let policy = Policy::new(false);
        assert_eq!(policy.settle::<()>(Err(syntax_error())), Ok(None));
        assert_eq!(policy.settle(Ok(3)), Ok(Some(3)));
    }

    #[test]
    fn test_strict_propagates_syntax_errors() {
        let policy = Policy::new(true);
        assert_eq!(policy.settle::<()>(Err(syntax_error())), Err(syntax_error()));
    }

    #[test]
    fn test_handler_errors_always_propagate() {
        for strict in [false, true] {
            let policy = Policy::new(strict);
            assert_eq!(policy.settle::<()>(Err(handler_error())), Err(handler_error()));
        }
    }

    #[test]
    fn test_require_type() {
        let mut param = Tag::new("param");
        param.name = Some("x".to_string());

        let lenient = Policy::new(false).require_type(param.clone()).unwrap();
        assert_eq!(lenient.ty, Some(TypeNode::Unknown));
        assert!(lenient.has_unknown_type());

        let strict = Policy::new(true).require_type(param).unwrap_err();
        assert_eq!(
            strict,
            ParseError::Tag(TagSyntaxError::MissingType("param".to_string()))
        );

        // Optional types are left alone
        let throws = Policy::new(true).require_type(Tag::new("throws")).unwrap();
        assert_eq!(throws.ty, None);
    }
}
