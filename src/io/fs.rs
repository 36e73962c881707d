//! File discovery and file replacement
//!
//! [`FileResolver`] walks a directory tree and yields markdown files in a
//! stable, name-sorted order. [`write_atomic`] replaces a file through a
//! temporary sibling so a failed write never leaves a truncated document.

use crate::error::{MattershiftError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// Configuration for file resolution
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Follow symbolic links
    pub follow_links: bool,
    /// Maximum recursion depth for directory traversal
    pub max_depth: Option<usize>,
    /// File extensions to include, compared case-insensitively
    pub extensions: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            follow_links: false,
            max_depth: None,
            extensions: vec!["md".to_string()],
        }
    }
}

/// Markdown file resolver
#[derive(Debug, Clone, Default)]
pub struct FileResolver {
    config: ResolverConfig,
}

impl FileResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Walk `root` and yield every eligible file
    ///
    /// Traversal errors are yielded rather than ending the walk, so one
    /// unreadable directory does not hide the rest of the tree.
    pub fn walk<'a>(
        &'a self,
        root: &Path,
    ) -> impl Iterator<Item = walkdir::Result<PathBuf>> + 'a {
        WalkDir::new(root)
            .follow_links(self.config.follow_links)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX))
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) if entry.file_type().is_file() && self.is_eligible(entry.path()) => {
                    Some(Ok(entry.into_path()))
                }
                Ok(_) => None,
                Err(e) => Some(Err(e)),
            })
    }

    /// Check whether a path carries one of the configured extensions
    pub fn is_eligible(&self, path: &Path) -> bool {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => self
                .config
                .extensions
                .iter()
                .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext)),
            None => false,
        }
    }
}

/// Read the raw bytes of a file
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(MattershiftError::Io)
}

/// Replace `path` with `content` via a temporary file in the same directory
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut temp_file = NamedTempFile::new_in(parent_dir)
        .map_err(|e| MattershiftError::write(path, e.to_string()))?;

    temp_file
        .write_all(content)
        .and_then(|_| temp_file.flush())
        .map_err(|e| MattershiftError::write(path, e.to_string()))?;

    // The temporary file is created 0600; carry the original mode over.
    if let Ok(metadata) = fs::metadata(path) {
        temp_file
            .as_file()
            .set_permissions(metadata.permissions())
            .map_err(|e| MattershiftError::write(path, e.to_string()))?;
    }

    temp_file
        .persist(path)
        .map_err(|e| MattershiftError::write(path, e.error.to_string()))?;

    Ok(())
}
