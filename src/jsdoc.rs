//! Main module for jsdoc library functionality

pub mod ast;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod format;
pub mod inlines;
pub mod parser;
pub mod pipeline;
pub mod policy;
pub mod tags;
pub mod types;
