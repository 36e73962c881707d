//! mattershift: batch transformations of YAML front matter in markdown files
//!
//! This library applies a declarative, ordered list of key-level operations to
//! the front matter of every markdown file in a directory tree, and reports
//! which files were rewritten, skipped, or failed.
//!
//! # Features
//!
//! - **Fifteen key-level operations**: add, delete, rename, modify, append,
//!   prepend, nest, unnest, subkey and parent edits, array member edits
//! - **Forgiving application**: an operation whose precondition fails on a
//!   document is silently skipped for that document
//! - **Two operation list syntaxes**: a tagged record list or an action map
//! - **Body preservation**: only the metadata block is rewritten
//! - **Atomic writes** through a temporary file and rename
//! - **Configurable text encodings** with byte-order mark preservation
//! - **Failure isolation**: one bad file never stops the batch
//!
//! # Quick Start
//!
//! ## Transforming a single document
//!
//! ```rust
//! use mattershift::{convenience, OperationSet, Result};
//!
//! fn main() -> Result<()> {
//!     let operations = OperationSet::from_yaml_str(
//!         "- op: rename\n  key: title\n  new_key: slug\n",
//!     )?;
//!     let rewritten = convenience::transform_str("---\ntitle: A\n---\nBody", &operations)?;
//!     assert_eq!(rewritten.as_deref(), Some("---\nslug: A\n---\nBody"));
//!     Ok(())
//! }
//! ```
//!
//! ## Batch processing a tree
//!
//! ```rust,no_run
//! use mattershift::{BatchConfig, BatchDriver, OperationSet, Result, TextEncoding};
//! use std::path::Path;
//!
//! fn main() -> Result<()> {
//!     let operations = OperationSet::from_file("operations.yml")?;
//!     let config = BatchConfig::default().with_encoding(TextEncoding::from_label("utf-8")?);
//!     let report = BatchDriver::new(config).run(Path::new("content/"), &operations);
//!
//!     for failure in &report.errors {
//!         eprintln!("{}: {}", failure.path.display(), failure.message);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`core`]: front matter mapping, operations, the transformation engine,
//!   block extraction and document rewriting (no file system access)
//! - [`io`]: encodings, file discovery, atomic writes
//! - [`batch`]: the directory-level driver and its report
//! - [`error`]: error types and categories

// Public API exports
pub use error::{ErrorCategory, MattershiftError, Result};

// Core types
pub use core::{
    apply, transform_document, FrontMatterBlock, Frontmatter, LineEndings, Operation,
    OperationSet,
};

// IO types
pub use io::{FileResolver, ResolverConfig, TextEncoding};

// Batch types
pub use batch::{BatchConfig, BatchDriver, BatchReport, FileError, Outcome};

pub mod batch;
pub mod core;
pub mod error;
pub mod io;

/// Convenience functions for common operations
pub mod convenience {
    //! Convenience functions that provide simple APIs for common use cases
    //!
    //! These use default settings (UTF-8, `.md` files, in-place writes).

    use crate::{OperationSet, Result, TextEncoding};
    use std::path::{Path, PathBuf};

    /// Transform document text; `None` when it has no front matter block
    pub fn transform_str(text: &str, operations: &OperationSet) -> Result<Option<String>> {
        crate::core::transform_document(text, operations, Path::new("<input>"))
    }

    /// Read an operation list from a YAML or JSON file
    pub fn load_operations<P: AsRef<Path>>(path: P) -> Result<OperationSet> {
        OperationSet::from_file(path)
    }

    /// Apply `operations` to every `.md` file under `root` as UTF-8
    ///
    /// Returns `(errored_paths, skipped_paths)`.
    pub fn run<P: AsRef<Path>>(
        root: P,
        operations: &OperationSet,
    ) -> (Vec<PathBuf>, Vec<PathBuf>) {
        crate::batch::run(root, operations, TextEncoding::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_end_to_end_workflow() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("post.md");
        let content = r#"---
title: Test Document
author: John Doe
tags: [rust, test]
---
# Hello World

This is the body content."#;
        fs::write(&path, content).unwrap();

        let operations = OperationSet::from_yaml_str(
            r#"
- op: add_parent
  key: author
  new_key: meta
- op: append
  key: tags
  value: batch
"#,
        )
        .unwrap();

        let (errored, skipped) = convenience::run(temp_dir.path(), &operations);
        assert!(errored.is_empty());
        assert!(skipped.is_empty());

        let updated = fs::read_to_string(&path).unwrap();
        let block = FrontMatterBlock::extract(&updated).unwrap();
        assert_eq!(block.body(), "# Hello World\n\nThis is the body content.");

        let fm = Frontmatter::parse(block.block_text()).unwrap();
        assert_eq!(
            fm,
            Frontmatter::parse("title: Test Document\ntags: [rust, test, batch]\nmeta: {author: John Doe}\n")
                .unwrap()
        );
    }

    #[test]
    fn test_transform_str() {
        let operations = OperationSet::default().with(Operation::Delete {
            key: "draft".into(),
        });
        assert_eq!(
            convenience::transform_str("no block here", &operations).unwrap(),
            None
        );
        assert_eq!(
            convenience::transform_str("---\ndraft: true\ntitle: T\n---\n", &operations)
                .unwrap()
                .as_deref(),
            Some("---\ntitle: T\n---\n")
        );
    }

    #[test]
    fn test_error_handling() {
        let result = convenience::transform_str("---\n- a\n- b\n---\n", &OperationSet::default());
        assert!(matches!(
            result.unwrap_err(),
            MattershiftError::InvalidFrontMatter { .. }
        ));

        let missing = convenience::load_operations("/nonexistent/ops.yml");
        assert!(matches!(missing.unwrap_err(), MattershiftError::Io(_)));
    }
}
