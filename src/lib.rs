//! # jsdoc
//!
//! A parser for JSDoc and Closure Compiler documentation comments.
//!
//! Layout
//!
//! The library turns already-extracted comment blocks into a structured model:
//! a [`Comment`](jsdoc::ast::Comment) with a description, typed tags, inline
//! references and an optional code context. The pieces, leaves first:
//!
//! src/jsdoc
//!   ├── types        Type literal grammar (`{Array.<string>=}` → TypeNode)
//!   ├── tags         Tag line splitting, alias table, type policy
//!   ├── inlines      `{@link ...}` scanning
//!   ├── pipeline     before / middleware / after dispatch and plugins
//!   ├── policy       Strict versus lenient handling of input errors
//!   ├── collaborators Default comment extraction and tokenization
//!   ├── config       Layered settings (defaults, TOML file, overrides)
//!   ├── format       Whitespace tidying for the `format` option
//!   └── parser       The orchestrator tying it together
//!
//! Most callers only need [`CommentParser`](jsdoc::parser::CommentParser):
//!
//! ```rust,ignore
//! use jsdoc::CommentParser;
//!
//! let parser = CommentParser::default();
//! let batch = parser.parse("/**\n * @param {string} name Who\n */\nfunction hi(name) {}")?;
//! assert_eq!(batch.comments[0].tags[0].title, "param");
//! ```

pub mod jsdoc;

pub use jsdoc::ast::{
    CodeContext, CodeKind, Comment, CommentKind, Example, ExampleKind, Node, NodeKind, RawComment,
};
pub use jsdoc::config::{Loader, ParserConfig};
pub use jsdoc::error::{HandlerTypeError, ParseError, TagSyntaxError, TypeSyntaxError};
pub use jsdoc::inlines::InlineReference;
pub use jsdoc::parser::{
    Batch, CommentEvent, CommentFailure, CommentParser, DroppedTag, ParseOverrides, ParserBuilder,
};
pub use jsdoc::policy::Policy;
pub use jsdoc::pipeline::{NodeType, Phase, Pipeline, PipelineBuilder, Plugin};
pub use jsdoc::tags::Tag;
pub use jsdoc::types::TypeNode;
