//! Tag normalization and policy checks
//!
//! [`normalize`] never fails: it canonicalizes the title and drops a type
//! clause on tags that forbid one. [`validate`] decides whether the tag is
//! kept at all. A rejection is a value, not an error; the orchestrator records
//! it on the comment event and moves on, whatever `strict` says.

use super::definitions::{self, TypePolicy};
use super::tag::Tag;
use std::fmt;
use tracing::debug;

/// Why a tag was dropped by validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// Title outside the vocabulary while `tags.closed_vocabulary` is set
    UnknownTitle,
    /// `@param` and friends without the name they document
    MissingName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRejection {
    pub title: String,
    pub reason: RejectionReason,
}

impl fmt::Display for ValidationRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            RejectionReason::UnknownTitle => write!(f, "unknown tag `@{}`", self.title),
            RejectionReason::MissingName => write!(f, "`@{}` is missing a name", self.title),
        }
    }
}

/// Canonicalize the title and discard forbidden type clauses.
pub fn normalize(mut tag: Tag) -> Tag {
    tag.title = definitions::canonical_title(&tag.title);

    let policy = definitions::definition_or_unknown(&tag.title).type_policy;
    if policy == TypePolicy::Forbidden && (tag.ty.is_some() || tag.raw_type.is_some()) {
        debug!(title = %tag.title, raw_type = ?tag.raw_type, "discarding type on tag that forbids one");
        tag.ty = None;
    }
    tag
}

/// Keep or reject a normalized tag.
pub fn validate(tag: Tag, closed_vocabulary: bool) -> Result<Tag, ValidationRejection> {
    let definition = match definitions::definition(&tag.title) {
        Some(definition) => definition,
        None if closed_vocabulary => {
            return Err(ValidationRejection {
                title: tag.title,
                reason: RejectionReason::UnknownTitle,
            })
        }
        None => return Ok(tag),
    };

    if definition.requires_name && tag.name.is_none() {
        return Err(ValidationRejection {
            title: tag.title,
            reason: RejectionReason::MissingName,
        });
    }
    Ok(tag)
}

/// `true` when the title requires a type and none was given.
pub fn lacks_required_type(tag: &Tag) -> bool {
    !tag.has_type()
        && definitions::definition_or_unknown(&tag.title).type_policy == TypePolicy::Required
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsdoc::tags::parser::{resolve_type, split_tag};
    use crate::jsdoc::types::TypeNode;

    fn tag(line: &str) -> Tag {
        resolve_type(split_tag(line).unwrap(), 64).unwrap()
    }

    #[test]
    fn test_private_type_is_discarded() {
        let tag = normalize(tag("@private {string}"));
        assert_eq!(tag.title, "private");
        assert_eq!(tag.ty, None);
        assert!(validate(tag, false).is_ok());
    }

    #[test]
    fn test_normalize_clears_type_set_later() {
        let mut private = tag("@private");
        private.ty = Some(TypeNode::name("string"));
        assert_eq!(normalize(private).ty, None);
    }

    #[test]
    fn test_normalize_resolves_alias() {
        let mut tag = Tag::new("return");
        tag.raw = "@return".to_string();
        assert_eq!(normalize(tag).title, "returns");
    }

    #[test]
    fn test_unknown_titles_pass_unless_closed() {
        let custom = normalize(tag("@customTag some text"));
        assert!(validate(custom.clone(), false).is_ok());

        let rejection = validate(custom, true).unwrap_err();
        assert_eq!(rejection.reason, RejectionReason::UnknownTitle);
        assert_eq!(rejection.to_string(), "unknown tag `@customTag`");
    }

    #[test]
    fn test_param_without_name_is_rejected() {
        let rejection = validate(normalize(tag("@param {string}")), false).unwrap_err();
        assert_eq!(rejection.reason, RejectionReason::MissingName);
    }

    #[test]
    fn test_lacks_required_type() {
        assert!(lacks_required_type(&tag("@param name")));
        assert!(!lacks_required_type(&tag("@param {string} name")));
        assert!(!lacks_required_type(&tag("@throws when broken")));
    }
}
