//! Inline reference parsing
//!
//! Inline references are `{@link Foo}`-style markers embedded in description
//! text. They are extracted but not resolved; rendering them is left to the
//! caller unless `inline.strip_markers` asks for plain text.

mod nodes;
mod parser;

pub use nodes::InlineReference;
pub use parser::{parse_inline, parse_inline_stripped};
