//! Type literal grammar
//!
//! Parses the text between the braces of `@param {…}` into a [`TypeNode`].
//! The grammar covers both the JSDoc and Closure Compiler dialects: unions,
//! `?`/`!` nullability, `...` variadics, `=` optional markers, `Array.<T>`,
//! `Array<T>` and `T[]` generics, record types and `function(...)` signatures.

mod lexer;
mod nodes;
mod parser;

pub use lexer::{tokenize, Token, TokenStream};
pub use nodes::{FunctionParam, RecordField, TypeNode};
pub use parser::{parse_type, parse_type_with_depth, DEFAULT_MAX_DEPTH};
