//! Text encodings for reading and writing documents
//!
//! Decoding is strict: bytes that are not valid in the configured encoding
//! fail the document instead of being replaced. A byte-order mark matching the
//! encoding is stripped on read and restored on write.

use crate::error::{MattershiftError, Result};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use std::fmt;
use std::path::Path;

/// A text encoding resolved from a WHATWG label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEncoding {
    encoding: &'static Encoding,
}

/// Decoded document text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    /// Whether the bytes started with a byte-order mark
    pub had_bom: bool,
}

impl TextEncoding {
    pub fn utf8() -> Self {
        Self { encoding: UTF_8 }
    }

    /// Resolve a label such as `utf-8`, `gbk`, `shift_jis` or `utf-16le`
    pub fn from_label(label: &str) -> Result<Self> {
        match Encoding::for_label(label.trim().as_bytes()) {
            Some(encoding) if encoding != encoding_rs::REPLACEMENT => Ok(Self { encoding }),
            _ => Err(MattershiftError::unknown_encoding(label)),
        }
    }

    /// Canonical name of the encoding
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    pub fn decode(&self, bytes: &[u8], path: &Path) -> Result<DecodedText> {
        let (bytes, had_bom) = match Encoding::for_bom(bytes) {
            Some((encoding, bom_len)) if encoding == self.encoding => (&bytes[bom_len..], true),
            _ => (bytes, false),
        };

        let text = self
            .encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .ok_or_else(|| MattershiftError::decode(path, self.name()))?;

        Ok(DecodedText {
            text: text.into_owned(),
            had_bom,
        })
    }

    /// Encode `text`, failing if any character is unrepresentable
    pub fn encode(&self, text: &str, with_bom: bool, path: &Path) -> Result<Vec<u8>> {
        // encoding_rs only encodes UTF-16 output as UTF-8, so those two are done by hand.
        if self.encoding == UTF_16LE || self.encoding == UTF_16BE {
            let little_endian = self.encoding == UTF_16LE;
            let mut out = Vec::with_capacity(text.len() * 2 + 2);
            if with_bom {
                let bom: [u8; 2] = if little_endian {
                    [0xFF, 0xFE]
                } else {
                    [0xFE, 0xFF]
                };
                out.extend_from_slice(&bom);
            }
            for unit in text.encode_utf16() {
                let bytes = if little_endian {
                    unit.to_le_bytes()
                } else {
                    unit.to_be_bytes()
                };
                out.extend_from_slice(&bytes);
            }
            return Ok(out);
        }

        let (encoded, _, had_errors) = self.encoding.encode(text);
        if had_errors {
            return Err(MattershiftError::encode(path, self.name()));
        }

        let mut out = Vec::with_capacity(encoded.len() + 3);
        if with_bom && self.encoding == UTF_8 {
            out.extend_from_slice(&[0xEF, 0xBB, 0xBF]);
        }
        out.extend_from_slice(&encoded);
        Ok(out)
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        Self::utf8()
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> &'static Path {
        Path::new("doc.md")
    }

    #[test]
    fn test_labels() {
        assert_eq!(TextEncoding::from_label("utf-8").unwrap().name(), "UTF-8");
        assert_eq!(TextEncoding::from_label(" UTF8 ").unwrap().name(), "UTF-8");
        assert_eq!(TextEncoding::from_label("gbk").unwrap().name(), "GBK");
        assert_eq!(TextEncoding::default(), TextEncoding::utf8());
        assert!(matches!(
            TextEncoding::from_label("klingon"),
            Err(MattershiftError::UnknownEncoding { .. })
        ));
        assert!(TextEncoding::from_label("iso-2022-kr").is_err());
    }

    #[test]
    fn test_utf8_bom_round_trip() {
        let enc = TextEncoding::utf8();
        let bytes = b"\xEF\xBB\xBF---\na: 1\n---\n";
        let decoded = enc.decode(bytes, path()).unwrap();
        assert!(decoded.had_bom);
        assert_eq!(decoded.text, "---\na: 1\n---\n");
        assert_eq!(enc.encode(&decoded.text, true, path()).unwrap(), bytes.to_vec());
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() {
        let err = TextEncoding::utf8()
            .decode(b"---\na: \xFF\n---\n", path())
            .unwrap_err();
        assert!(matches!(err, MattershiftError::Decode { .. }));
    }

    #[test]
    fn test_gbk_round_trip() {
        let enc = TextEncoding::from_label("gbk").unwrap();
        let bytes = enc.encode("标题: 你好\n", false, path()).unwrap();
        assert_ne!(bytes, "标题: 你好\n".as_bytes());
        let decoded = enc.decode(&bytes, path()).unwrap();
        assert_eq!(decoded.text, "标题: 你好\n");
        assert!(!decoded.had_bom);
    }

    #[test]
    fn test_unrepresentable_character_is_encode_error() {
        let enc = TextEncoding::from_label("windows-1252").unwrap();
        let err = enc.encode("emoji: 🦀", false, path()).unwrap_err();
        assert!(matches!(err, MattershiftError::Encode { .. }));
    }

    #[test]
    fn test_utf16le_round_trip() {
        let enc = TextEncoding::from_label("utf-16le").unwrap();
        let bytes = enc.encode("a: é\n", true, path()).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xFE]);
        let decoded = enc.decode(&bytes, path()).unwrap();
        assert!(decoded.had_bom);
        assert_eq!(decoded.text, "a: é\n");
    }
}
