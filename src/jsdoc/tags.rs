//! Block tags: splitting, vocabulary and validation
//!
//! A tag goes through three steps before it reaches a [`Comment`](crate::jsdoc::ast::Comment):
//!
//! 1. [`split_tag`] cuts the line into title, raw type, name and description.
//! 2. [`resolve_type`] runs the type grammar over the raw type.
//! 3. [`normalize`] and [`validate`] apply the alias and policy tables.
//!
//! The orchestrator wraps these with the dispatcher's hooks and the strict
//! policy; this module has no notion of either.

pub mod definitions;
mod parser;
mod tag;
mod validation;

pub use definitions::{canonical_title, TagDefinition, TypePolicy};
pub use parser::{resolve_type, split_tag};
pub(crate) use parser::mark_optional;
pub use tag::Tag;
pub use validation::{lacks_required_type, normalize, validate, RejectionReason, ValidationRejection};
