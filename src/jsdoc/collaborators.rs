//! Replaceable services around the core parser
//!
//! The orchestrator never scans source text or segments a comment itself; it
//! calls these. Each has a default implementation here and can be swapped
//! through [`ParserBuilder`](crate::jsdoc::parser::ParserBuilder).

pub mod context;
pub mod extract;
pub mod tokenize;
pub mod validity;

pub use extract::extract_comments;
pub use tokenize::{tokenize, Segments};
pub use validity::is_valid;

use crate::jsdoc::ast::RawComment;
use crate::jsdoc::config::ParserConfig;
use std::fmt;
use std::sync::Arc;

pub type PreprocessFn = Arc<dyn Fn(&str) -> String + Send + Sync>;
pub type ExtractFn = Arc<dyn Fn(&str) -> Vec<RawComment> + Send + Sync>;
pub type ValidityFn = Arc<dyn Fn(&RawComment, &ParserConfig) -> bool + Send + Sync>;
pub type TokenizeFn = Arc<dyn Fn(&str) -> Segments + Send + Sync>;

/// The service set a parser calls into.
#[derive(Clone)]
pub struct Collaborators {
    /// Maps the whole source before extraction
    pub preprocess: PreprocessFn,
    pub extract: ExtractFn,
    pub is_valid: ValidityFn,
    pub tokenize: TokenizeFn,
}

impl Default for Collaborators {
    fn default() -> Self {
        Collaborators {
            preprocess: Arc::new(str::to_string),
            extract: Arc::new(extract_comments),
            is_valid: Arc::new(is_valid),
            tokenize: Arc::new(tokenize),
        }
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
