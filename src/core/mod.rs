//! Core library types and functionality for front matter transformation
//!
//! This module contains the domain logic, free of any file system access:
//! - Frontmatter: the parsed, mutable metadata mapping
//! - Operation / OperationSet: the edit vocabulary and ordered edit lists
//! - transform: the engine applying an OperationSet to a Frontmatter
//! - document: locating the metadata block and rewriting a document around it

pub mod document;
pub mod frontmatter;
pub mod operation;
pub mod transform;

pub use document::{rewrite, transform_document, FrontMatterBlock, LineEndings};
pub use frontmatter::Frontmatter;
pub use operation::{Operation, OperationSet};
pub use transform::apply;
