//! Locating and rewriting the front matter block of a document
//!
//! A document carries front matter only when its very first line is `---`.
//! The block runs up to the first following line that is exactly `---`
//! (trailing spaces allowed), and the body is everything after that line.
//! Rewriting swaps the block for freshly serialized text and copies the body
//! through byte for byte.

use crate::core::{apply, Frontmatter, OperationSet};
use crate::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;
use std::path::Path;

static FRONT_MATTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A---[ \t]*(\r?\n)(?:(.*?)\r?\n)??---[ \t]*(?:\r?\n|\z)")
        .expect("front matter pattern is valid")
});

/// Line ending styles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEndings {
    /// Unix-style line endings (\n)
    Unix,
    /// Windows-style line endings (\r\n)
    Windows,
}

impl LineEndings {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unix => "\n",
            Self::Windows => "\r\n",
        }
    }

    fn convert(&self, text: &str) -> String {
        match self {
            Self::Unix => text.to_string(),
            Self::Windows => text.replace("\r\n", "\n").replace('\n', "\r\n"),
        }
    }
}

/// The front matter block found at the top of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatterBlock<'a> {
    source: &'a str,
    block: Range<usize>,
    end: usize,
    line_endings: LineEndings,
}

impl<'a> FrontMatterBlock<'a> {
    /// Find the block at offset 0 of `text`, if there is one
    pub fn extract(text: &'a str) -> Option<Self> {
        let caps = FRONT_MATTER_RE.captures(text)?;
        let whole = caps.get(0)?;

        let line_endings = match caps.get(1).map(|m| m.as_str()) {
            Some("\r\n") => LineEndings::Windows,
            _ => LineEndings::Unix,
        };

        // An empty block has no content group; anchor it just past the opening line.
        let block = match caps.get(2) {
            Some(m) => m.range(),
            None => {
                let start = caps.get(1).map(|m| m.end()).unwrap_or(whole.end());
                start..start
            }
        };

        Some(Self {
            source: text,
            block,
            end: whole.end(),
            line_endings,
        })
    }

    /// Raw text between the delimiter lines
    pub fn block_text(&self) -> &'a str {
        &self.source[self.block.clone()]
    }

    /// Everything after the closing delimiter line
    pub fn body(&self) -> &'a str {
        &self.source[self.end..]
    }

    /// Byte offset where the body begins
    pub fn end_offset(&self) -> usize {
        self.end
    }

    /// Newline style of the opening delimiter line
    pub fn line_endings(&self) -> LineEndings {
        self.line_endings
    }

    /// Assemble a new document from `serialized` block text and the untouched body
    pub fn rewrite(&self, serialized: &str) -> String {
        rewrite(self.source, self.end, serialized, self.line_endings)
    }
}

/// Build `---` + block + `---` + `original[block_end..]`
pub fn rewrite(
    original: &str,
    block_end: usize,
    serialized: &str,
    line_endings: LineEndings,
) -> String {
    let newline = line_endings.as_str();
    let mut block = line_endings.convert(serialized);
    if !block.is_empty() && !block.ends_with(newline) {
        block.push_str(newline);
    }

    // A closing delimiter at end of input keeps having no newline after it.
    let closing = if original[..block_end].ends_with('\n') {
        newline
    } else {
        ""
    };

    let body = &original[block_end..];
    let mut output = String::with_capacity(block.len() + body.len() + 8);
    output.push_str("---");
    output.push_str(newline);
    output.push_str(&block);
    output.push_str("---");
    output.push_str(closing);
    output.push_str(body);
    output
}

/// Run the full per-document pipeline on decoded text
///
/// Returns `Ok(None)` when the document has no front matter block, so the
/// caller can leave it untouched.
pub fn transform_document(
    text: &str,
    operations: &OperationSet,
    path: &Path,
) -> Result<Option<String>> {
    let Some(block) = FrontMatterBlock::extract(text) else {
        return Ok(None);
    };

    let frontmatter = Frontmatter::parse_at(block.block_text(), path)?;
    let frontmatter = apply(frontmatter, operations);
    let serialized = frontmatter.to_yaml_string()?;

    Ok(Some(block.rewrite(&serialized)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Operation;
    use crate::error::MattershiftError;
    use serde_yaml::Value;

    #[test]
    fn test_extract_basic_block() {
        let text = "---\ntitle: Hello\n---\n# Body\n\nText.";
        let block = FrontMatterBlock::extract(text).unwrap();
        assert_eq!(block.block_text(), "title: Hello");
        assert_eq!(block.body(), "# Body\n\nText.");
        assert_eq!(block.end_offset(), "---\ntitle: Hello\n---\n".len());
        assert_eq!(block.line_endings(), LineEndings::Unix);
    }

    #[test]
    fn test_extract_requires_delimiter_at_start() {
        assert!(FrontMatterBlock::extract("\n---\ntitle: a\n---\n").is_none());
        assert!(FrontMatterBlock::extract("# Heading\n---\na: 1\n---\n").is_none());
        assert!(FrontMatterBlock::extract("").is_none());
    }

    #[test]
    fn test_extract_requires_closing_delimiter() {
        assert!(FrontMatterBlock::extract("---\ntitle: a\nno closing line\n").is_none());
    }

    #[test]
    fn test_extract_first_closing_line_wins() {
        let text = "---\na: 1\n---\nbody\n---\nmore\n";
        let block = FrontMatterBlock::extract(text).unwrap();
        assert_eq!(block.block_text(), "a: 1");
        assert_eq!(block.body(), "body\n---\nmore\n");
    }

    #[test]
    fn test_extract_ignores_lookalike_lines() {
        let text = "---\na: |\n  ----\n  --- not a delimiter\n---\nbody";
        let block = FrontMatterBlock::extract(text).unwrap();
        assert_eq!(block.block_text(), "a: |\n  ----\n  --- not a delimiter");
        assert_eq!(block.body(), "body");
    }

    #[test]
    fn test_extract_tolerates_trailing_spaces_and_blank_lines() {
        let text = "---  \n\ntitle: x\n\n---\t\nbody";
        let block = FrontMatterBlock::extract(text).unwrap();
        assert_eq!(block.block_text(), "\ntitle: x\n");
        assert_eq!(block.body(), "body");
    }

    #[test]
    fn test_extract_block_at_end_of_file() {
        let block = FrontMatterBlock::extract("---\na: 1\n---").unwrap();
        assert_eq!(block.block_text(), "a: 1");
        assert_eq!(block.body(), "");
        assert_eq!(block.rewrite("b: 2\n"), "---\nb: 2\n---");
    }

    #[test]
    fn test_extract_empty_block() {
        let block = FrontMatterBlock::extract("---\n---\nbody").unwrap();
        assert_eq!(block.block_text(), "");
        assert_eq!(block.body(), "body");
    }

    #[test]
    fn test_empty_block_closes_before_body_rule() {
        let block = FrontMatterBlock::extract("---\n---\nIntro\n\n---\n\nMore\n").unwrap();
        assert_eq!(block.block_text(), "");
        assert_eq!(block.body(), "Intro\n\n---\n\nMore\n");
    }

    #[test]
    fn test_empty_block_keeps_body_out_of_metadata() {
        let operations = OperationSet::default().with(Operation::Add {
            key: "x".into(),
            value: Value::from(1i64),
        });
        let text = "---\n---\ntitle: body line\n---\nrest\n";
        let rewritten = transform_document(text, &operations, Path::new("a.md")).unwrap();
        assert_eq!(
            rewritten.as_deref(),
            Some("---\nx: 1\n---\ntitle: body line\n---\nrest\n")
        );
    }

    #[test]
    fn test_extract_windows_line_endings() {
        let text = "---\r\ntitle: a\r\n---\r\nbody\r\n";
        let block = FrontMatterBlock::extract(text).unwrap();
        assert_eq!(block.block_text(), "title: a");
        assert_eq!(block.body(), "body\r\n");
        assert_eq!(block.line_endings(), LineEndings::Windows);
    }

    #[test]
    fn test_rewrite_keeps_body() {
        let text = "---\ntitle: a\n---\n\n# Body  \n  indented\n";
        let block = FrontMatterBlock::extract(text).unwrap();
        let rewritten = block.rewrite("slug: a\n");
        assert_eq!(rewritten, "---\nslug: a\n---\n\n# Body  \n  indented\n");
    }

    #[test]
    fn test_rewrite_windows_line_endings() {
        let text = "---\r\ntitle: a\r\n---\r\nbody";
        let block = FrontMatterBlock::extract(text).unwrap();
        assert_eq!(
            block.rewrite("title: a\ntags:\n- x\n"),
            "---\r\ntitle: a\r\ntags:\r\n- x\r\n---\r\nbody"
        );
    }

    #[test]
    fn test_transform_without_block_is_none() {
        let ops = OperationSet::new(vec![Operation::Delete { key: "a".into() }]);
        let out = transform_document("plain text", &ops, Path::new("a.md")).unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn test_transform_empty_operation_set_preserves_structure_and_body() {
        let text = "---\ntitle:   Hello\ntags: [a,   b]\n---\nBody stays\n  exactly.\n";
        let out = transform_document(text, &OperationSet::default(), Path::new("a.md"))
            .unwrap()
            .unwrap();

        let original = FrontMatterBlock::extract(text).unwrap();
        let rewritten = FrontMatterBlock::extract(&out).unwrap();
        assert_eq!(rewritten.body(), original.body());
        assert_eq!(
            Frontmatter::parse(rewritten.block_text()).unwrap(),
            Frontmatter::parse(original.block_text()).unwrap()
        );
    }

    #[test]
    fn test_transform_applies_operations() {
        let text = "---\ntitle: A\ntags: [x]\n---\nbody";
        let ops = OperationSet::new(vec![
            Operation::Rename {
                key: "title".into(),
                new_key: "slug".into(),
            },
            Operation::AddArrayMember {
                key: "tags".into(),
                value: Value::from("y"),
            },
        ]);
        let out = transform_document(text, &ops, Path::new("a.md"))
            .unwrap()
            .unwrap();
        assert_eq!(out, "---\ntags:\n- x\n- y\nslug: A\n---\nbody");
    }

    #[test]
    fn test_transform_invalid_block_is_error() {
        let text = "---\ntitle: [unclosed\n---\nbody";
        let err = transform_document(text, &OperationSet::default(), Path::new("bad.md"))
            .unwrap_err();
        assert!(matches!(err, MattershiftError::InvalidFrontMatter { .. }));
    }
}
