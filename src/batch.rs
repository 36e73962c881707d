//! Batch processing of a directory tree
//!
//! [`BatchDriver`] visits every eligible file under a root directory and runs
//! the per-document pipeline on it:
//!
//! read → decode → extract → parse → transform → serialize → rewrite → encode → write
//!
//! Each file ends in exactly one [`Outcome`]. A failing file is recorded and
//! the walk moves on; the driver itself never returns an error.

use crate::core::{transform_document, OperationSet};
use crate::error::{ErrorCategory, MattershiftError, Result};
use crate::io::{read_bytes, write_atomic, FileResolver, ResolverConfig, TextEncoding};
use log::{debug, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Configuration for a batch run
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Encoding used to read and write documents
    pub encoding: TextEncoding,
    /// File extensions to process
    pub extensions: Vec<String>,
    /// Follow symbolic links while walking
    pub follow_links: bool,
    /// Maximum directory depth
    pub max_depth: Option<usize>,
    /// Run the whole pipeline but skip the final write
    pub dry_run: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            encoding: TextEncoding::default(),
            extensions: vec!["md".to_string()],
            follow_links: false,
            max_depth: None,
            dry_run: false,
        }
    }
}

impl BatchConfig {
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// What happened to one document
#[derive(Debug)]
pub enum Outcome {
    /// The document was rewritten (or would have been, in a dry run)
    Modified,
    /// No front matter block was found; the file was left alone
    Skipped,
    /// Reading, parsing or writing failed; the file was left alone
    Error(MattershiftError),
}

/// A failed file in a batch report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileError {
    pub path: PathBuf,
    pub category: ErrorCategory,
    pub message: String,
}

/// Aggregated outcomes of a batch run, in visiting order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub modified: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub errors: Vec<FileError>,
}

impl BatchReport {
    /// Fold one outcome into the report
    pub fn record(&mut self, path: PathBuf, outcome: Outcome) {
        match outcome {
            Outcome::Modified => self.modified.push(path),
            Outcome::Skipped => self.skipped.push(path),
            Outcome::Error(err) => self.errors.push(FileError {
                category: err.category(),
                message: err.to_string(),
                path,
            }),
        }
    }

    pub fn errored_paths(&self) -> Vec<PathBuf> {
        self.errors.iter().map(|e| e.path.clone()).collect()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of files visited
    pub fn total(&self) -> usize {
        self.modified.len() + self.skipped.len() + self.errors.len()
    }

    /// Split into `(errored_paths, skipped_paths)`
    pub fn into_lists(self) -> (Vec<PathBuf>, Vec<PathBuf>) {
        let errored = self.errors.into_iter().map(|e| e.path).collect();
        (errored, self.skipped)
    }
}

/// Runs an operation set over every eligible file of a tree
#[derive(Debug, Clone, Default)]
pub struct BatchDriver {
    config: BatchConfig,
    resolver: FileResolver,
}

impl BatchDriver {
    pub fn new(config: BatchConfig) -> Self {
        let resolver = FileResolver::with_config(ResolverConfig {
            follow_links: config.follow_links,
            max_depth: config.max_depth,
            extensions: config.extensions.clone(),
        });
        Self { config, resolver }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Process every eligible file under `root`
    pub fn run(&self, root: &Path, operations: &OperationSet) -> BatchReport {
        info!(
            "Applying {} operation(s) to {} ({})",
            operations.len(),
            root.display(),
            self.config.encoding
        );

        let mut report = BatchReport::default();

        for entry in self.resolver.walk(root) {
            match entry {
                Ok(path) => {
                    let outcome = self.process_file(&path, operations);
                    report.record(path, outcome);
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| root.to_path_buf());
                    warn!("Cannot traverse {}: {}", path.display(), e);
                    report.record(path, Outcome::Error(e.into()));
                }
            }
        }

        info!(
            "Finished: {} modified, {} skipped, {} failed",
            report.modified.len(),
            report.skipped.len(),
            report.errors.len()
        );
        report
    }

    /// Process a single file
    pub fn process_file(&self, path: &Path, operations: &OperationSet) -> Outcome {
        debug!("Processing file: {}", path.display());

        match self.try_process_file(path, operations) {
            Ok(Outcome::Skipped) => {
                warn!(
                    "No valid front matter block found, skipping file {}",
                    path.display()
                );
                Outcome::Skipped
            }
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Error processing file {}: {}", path.display(), e);
                Outcome::Error(e)
            }
        }
    }

    fn try_process_file(&self, path: &Path, operations: &OperationSet) -> Result<Outcome> {
        let bytes = read_bytes(path)?;
        let decoded = self.config.encoding.decode(&bytes, path)?;

        let Some(rewritten) = transform_document(&decoded.text, operations, path)? else {
            return Ok(Outcome::Skipped);
        };

        let encoded = self
            .config
            .encoding
            .encode(&rewritten, decoded.had_bom, path)?;

        if self.config.dry_run {
            info!("Would update: {}", path.display());
            return Ok(Outcome::Modified);
        }

        write_atomic(path, &encoded)?;
        info!("Updated: {}", path.display());
        Ok(Outcome::Modified)
    }
}

/// Apply `operations` to every `.md` file under `root`
///
/// Returns `(errored_paths, skipped_paths)`.
pub fn run<P: AsRef<Path>>(
    root: P,
    operations: &OperationSet,
    encoding: TextEncoding,
) -> (Vec<PathBuf>, Vec<PathBuf>) {
    BatchDriver::new(BatchConfig::default().with_encoding(encoding))
        .run(root.as_ref(), operations)
        .into_lists()
}
