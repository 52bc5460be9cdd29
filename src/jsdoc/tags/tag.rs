use crate::jsdoc::inlines::InlineReference;
use crate::jsdoc::types::TypeNode;
use serde::{Deserialize, Serialize};

/// One `@title {type} name description` annotation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Canonical title, aliases resolved
    pub title: String,
    /// Text between the type braces, untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_type: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Set by `[name]` / `[name=default]`
    #[serde(default)]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inline_tags: Vec<InlineReference>,
    /// The tag line as it was handed to the parser
    pub raw: String,
}

impl Tag {
    pub fn new(title: impl Into<String>) -> Self {
        Tag {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn has_type(&self) -> bool {
        self.ty.is_some()
    }

    /// `true` when the type was synthesized because the tag requires one.
    pub fn has_unknown_type(&self) -> bool {
        matches!(self.ty, Some(TypeNode::Unknown)) && self.raw_type.is_none()
    }
}
