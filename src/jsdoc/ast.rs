//! Comment model
//!
//! [`RawComment`] is what extraction hands over; [`Comment`] is what the
//! orchestrator produces from it. [`Node`] wraps the three things the
//! dispatcher can hand to a handler.

use crate::jsdoc::inlines::InlineReference;
use crate::jsdoc::tags::Tag;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// How a block comment was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentKind {
    /// `/** ... */`
    Doc,
    /// `/*! ... */`, conventionally a license header
    Protected,
    /// Any other `/* ... */`
    Block,
}

/// A comment block as found in source text, before any parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComment {
    /// Full text, delimiters included
    pub text: String,
    /// Byte range in the (preprocessed) source
    pub range: Range<usize>,
    /// 1-based
    pub start_line: usize,
    pub end_line: usize,
    pub kind: CommentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeContext>,
}

impl RawComment {
    /// A comment with no position information, e.g. one passed in by hand.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let kind = if text.starts_with("/**") && !text.starts_with("/**/") {
            CommentKind::Doc
        } else if text.starts_with("/*!") {
            CommentKind::Protected
        } else {
            CommentKind::Block
        };
        let end_line = 1 + text.matches('\n').count();
        RawComment {
            range: 0..text.len(),
            text,
            start_line: 1,
            end_line,
            kind,
            code: None,
        }
    }

    pub fn with_code(mut self, code: Option<CodeContext>) -> Self {
        self.code = code;
        self
    }
}

/// The construct a comment documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CodeKind {
    /// `function foo() {}`
    FunctionStatement,
    /// `var foo = function() {}`
    FunctionExpression,
    /// `const foo = () => {}`
    ArrowFunction,
    /// `class Foo {}`
    Class,
    /// `bar() {}` inside a class body
    ClassMethod,
    /// `Foo.prototype.bar = function() {}`
    PrototypeMethod,
    /// `Foo.prototype.bar = 1`
    PrototypeProperty,
    /// `Foo.bar = 1`
    PropertyAssignment,
    /// `var foo = 1`
    Declaration,
    /// `foo: 1` inside an object literal
    Property,
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CodeKind::FunctionStatement => "function statement",
            CodeKind::FunctionExpression => "function expression",
            CodeKind::ArrowFunction => "arrow function",
            CodeKind::Class => "class",
            CodeKind::ClassMethod => "class method",
            CodeKind::PrototypeMethod => "prototype method",
            CodeKind::PrototypeProperty => "prototype property",
            CodeKind::PropertyAssignment => "property",
            CodeKind::Declaration => "declaration",
            CodeKind::Property => "property",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeContext {
    pub kind: CodeKind,
    pub name: String,
    /// Object or class the member hangs off, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    /// Right-hand side of a simple assignment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// 1-based line of the construct
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExampleKind {
    /// A ```` ``` ```` block in the description
    Fenced,
    /// An `@example` tag
    Tag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub kind: ExampleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// `<caption>` of an `@example` tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub code: String,
}

/// A parsed documentation comment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// The comment exactly as extracted
    pub raw: String,
    pub description: String,
    /// Prose after the tag block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inline_tags: Vec<InlineReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Example>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeContext>,
    pub range: Range<usize>,
    /// 1-based line the comment starts on
    pub line: usize,
}

impl Comment {
    /// An empty comment seeded with the raw block's text and position.
    pub fn seed(raw: &RawComment) -> Self {
        Comment {
            raw: raw.text.clone(),
            code: raw.code.clone(),
            range: raw.range.clone(),
            line: raw.start_line,
            ..Default::default()
        }
    }

    /// First tag with the given canonical title
    pub fn tag(&self, title: &str) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.title == title)
    }

    pub fn tags_named<'a>(&'a self, title: &'a str) -> impl Iterator<Item = &'a Tag> + 'a {
        self.tags.iter().filter(move |tag| tag.title == title)
    }

    pub fn has_tag(&self, title: &str) -> bool {
        self.tag(title).is_some()
    }
}

/// The variant of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Comment,
    Tag,
    InlineTag,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Comment => f.write_str("comment"),
            NodeKind::Tag => f.write_str("tag"),
            NodeKind::InlineTag => f.write_str("inlineTag"),
        }
    }
}

/// Anything a pipeline handler can receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "camelCase")]
pub enum Node {
    Comment(Comment),
    Tag(Tag),
    InlineTag(InlineReference),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Comment(_) => NodeKind::Comment,
            Node::Tag(_) => NodeKind::Tag,
            Node::InlineTag(_) => NodeKind::InlineTag,
        }
    }

    /// Source text the node was parsed from.
    pub fn raw(&self) -> &str {
        match self {
            Node::Comment(comment) => &comment.raw,
            Node::Tag(tag) => &tag.raw,
            Node::InlineTag(reference) => &reference.raw,
        }
    }

    pub fn as_comment(&self) -> Option<&Comment> {
        match self {
            Node::Comment(comment) => Some(comment),
            _ => None,
        }
    }

    pub fn as_tag(&self) -> Option<&Tag> {
        match self {
            Node::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn as_inline(&self) -> Option<&InlineReference> {
        match self {
            Node::InlineTag(reference) => Some(reference),
            _ => None,
        }
    }

    pub fn into_tag(self) -> Option<Tag> {
        match self {
            Node::Tag(tag) => Some(tag),
            _ => None,
        }
    }
}

impl From<Comment> for Node {
    fn from(comment: Comment) -> Self {
        Node::Comment(comment)
    }
}

impl From<Tag> for Node {
    fn from(tag: Tag) -> Self {
        Node::Tag(tag)
    }
}

impl From<InlineReference> for Node {
    fn from(reference: InlineReference) -> Self {
        Node::InlineTag(reference)
    }
}
