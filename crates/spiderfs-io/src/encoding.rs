//! Encoding resolution, detection, and strict transcoding.
//!
//! Every read and write path resolves to exactly one [`TextEncoding`] before
//! touching file content. Detection is a separate, explicit opt-in that reads
//! the whole file once; normal reads never probe, they fail loudly instead.

use std::fmt;
use std::fs;
use std::path::Path;

use memchr::memchr;
use serde::{Deserialize, Serialize};

use crate::error::FileError;

/// Probe order for [`detect_encoding`]. First encoding that decodes the whole
/// buffer without error wins. Latin-1 accepts any byte sequence, so in
/// practice detection resolves to UTF-8 or Latin-1; the tail of the list is
/// kept for parity with the configured candidate set.
const DETECTION_ORDER: [TextEncoding; 6] = [
    TextEncoding::Utf8,
    TextEncoding::Latin1,
    TextEncoding::Utf16,
    TextEncoding::Ascii,
    TextEncoding::Iso8859_1,
    TextEncoding::Windows1252,
];

/// A text encoding the engine knows how to decode and encode strictly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEncoding {
    /// UTF-8, the default for every operation.
    #[serde(rename = "utf-8")]
    Utf8,
    /// Latin-1: every byte maps to the code point of the same value.
    #[serde(rename = "latin-1")]
    Latin1,
    /// UTF-16, BOM-aware, little-endian when no BOM is present.
    #[serde(rename = "utf-16")]
    Utf16,
    /// 7-bit ASCII.
    #[serde(rename = "ascii")]
    Ascii,
    /// ISO-8859-1, decoded identically to Latin-1.
    #[serde(rename = "iso-8859-1")]
    Iso8859_1,
    /// Windows-1252 via `encoding_rs`.
    #[serde(rename = "windows-1252")]
    Windows1252,
}

impl TextEncoding {
    /// Resolve a caller-supplied encoding label.
    ///
    /// Labels are matched case-insensitively with `_` treated as `-`, so
    /// `"UTF-8"`, `"utf_8"`, and `"utf8"` all resolve to [`Self::Utf8`].
    /// Returns `None` for unrecognized labels; the resolver turns that into
    /// [`FileError::UnsupportedEncoding`].
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "utf-8" | "utf8" => Some(Self::Utf8),
            "latin-1" | "latin1" => Some(Self::Latin1),
            "utf-16" | "utf16" => Some(Self::Utf16),
            "ascii" | "us-ascii" => Some(Self::Ascii),
            "iso-8859-1" | "iso8859-1" => Some(Self::Iso8859_1),
            "windows-1252" | "cp1252" => Some(Self::Windows1252),
            _ => None,
        }
    }

    /// Canonical name, used in error messages and metadata.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
            Self::Utf16 => "utf-16",
            Self::Ascii => "ascii",
            Self::Iso8859_1 => "iso-8859-1",
            Self::Windows1252 => "windows-1252",
        }
    }

    /// Strictly decode `buffer` in this encoding.
    ///
    /// # Errors
    /// Returns [`FileError::Encoding`] naming the attempted encoding when the
    /// buffer does not decode completely. No replacement characters are ever
    /// substituted.
    pub fn decode(self, buffer: &[u8]) -> Result<String, FileError> {
        match self {
            Self::Utf8 => String::from_utf8(buffer.to_vec())
                .map_err(|_| FileError::Encoding { encoding: self.name() }),
            Self::Ascii => {
                if buffer.is_ascii() {
                    // ASCII is a strict subset of UTF-8; no replacement can occur.
                    Ok(String::from_utf8_lossy(buffer).into_owned())
                } else {
                    Err(FileError::Encoding { encoding: self.name() })
                }
            }
            // Byte value == code point; decoding cannot fail.
            Self::Latin1 | Self::Iso8859_1 => {
                Ok(buffer.iter().map(|&b| char::from(b)).collect())
            }
            Self::Windows1252 => encoding_rs::WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(buffer)
                .map(std::borrow::Cow::into_owned)
                .ok_or(FileError::Encoding { encoding: self.name() }),
            Self::Utf16 => decode_utf16(buffer)
                .ok_or(FileError::Encoding { encoding: self.name() }),
        }
    }

    /// Strictly encode `text` back into this encoding.
    ///
    /// Used by the mutation engine so a file edited as Latin-1 is written
    /// back as Latin-1. UTF-16 output carries a little-endian BOM, matching
    /// what was accepted on the read side.
    ///
    /// # Errors
    /// Returns [`FileError::Encoding`] when `text` contains characters the
    /// target encoding cannot represent.
    pub fn encode(self, text: &str) -> Result<Vec<u8>, FileError> {
        match self {
            Self::Utf8 => Ok(text.as_bytes().to_vec()),
            Self::Ascii => {
                if text.is_ascii() {
                    Ok(text.as_bytes().to_vec())
                } else {
                    Err(FileError::Encoding { encoding: self.name() })
                }
            }
            Self::Latin1 | Self::Iso8859_1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)))
                .collect::<Result<Vec<u8>, _>>()
                .map_err(|_| FileError::Encoding { encoding: self.name() }),
            Self::Windows1252 => {
                let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(text);
                if had_errors {
                    Err(FileError::Encoding { encoding: self.name() })
                } else {
                    Ok(bytes.into_owned())
                }
            }
            Self::Utf16 => {
                let mut bytes = vec![0xFF, 0xFE];
                for unit in text.encode_utf16() {
                    bytes.extend_from_slice(&unit.to_le_bytes());
                }
                Ok(bytes)
            }
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// BOM-aware strict UTF-16 decode, little-endian when no BOM is present.
fn decode_utf16(buffer: &[u8]) -> Option<String> {
    let (codec, body) = match buffer {
        [0xFF, 0xFE, rest @ ..] => (encoding_rs::UTF_16LE, rest),
        [0xFE, 0xFF, rest @ ..] => (encoding_rs::UTF_16BE, rest),
        _ => (encoding_rs::UTF_16LE, buffer),
    };
    codec
        .decode_without_bom_handling_and_without_replacement(body)
        .map(std::borrow::Cow::into_owned)
}

/// Resolve an optional explicit encoding label against a configured default.
///
/// An absent label yields `default`; a present label must be recognized.
/// This never probes file content.
///
/// # Errors
/// Returns [`FileError::UnsupportedEncoding`] for an unrecognized label.
pub fn resolve_encoding(
    label: Option<&str>,
    default: TextEncoding,
) -> Result<TextEncoding, FileError> {
    match label {
        None => Ok(default),
        Some(raw) => TextEncoding::from_label(raw)
            .ok_or_else(|| FileError::UnsupportedEncoding(raw.to_string())),
    }
}

/// Probe a file's encoding by trial decode, falling back to `default`.
///
/// Reads the whole file once and tries the fixed candidate order (UTF-8,
/// Latin-1, UTF-16, ASCII, ISO-8859-1, Windows-1252). This is an explicit
/// opt-in; read and write paths never call it implicitly.
///
/// # Errors
/// Returns [`FileError::NotFound`] / [`FileError::NotAFile`] /
/// [`FileError::System`] when the file cannot be read at all.
pub fn detect_encoding<P: AsRef<Path>>(
    path: P,
    default: TextEncoding,
) -> Result<TextEncoding, FileError> {
    let buffer = read_bytes(path.as_ref())?;
    Ok(DETECTION_ORDER
        .into_iter()
        .find(|candidate| candidate.decode(&buffer).is_ok())
        .unwrap_or(default))
}

/// Quick binary detection - checks first 8KB for NULL bytes.
///
/// Files containing NULL bytes in the first 8KB are considered binary.
/// Adapters use this to route binary files to the byte streamer instead of
/// a decoding read.
#[must_use]
pub fn is_binary(buffer: &[u8]) -> bool {
    let check_len = std::cmp::min(buffer.len(), 8192);
    memchr(0, &buffer[..check_len]).is_some()
}

/// Read a whole file and strictly decode it with `encoding`.
///
/// # Errors
/// Path validation errors, I/O errors, or [`FileError::Encoding`] on a
/// strict-decode failure.
pub fn read_text<P: AsRef<Path>>(path: P, encoding: TextEncoding) -> Result<String, FileError> {
    let buffer = read_bytes(path.as_ref())?;
    encoding.decode(&buffer)
}

/// Read a whole file as raw bytes after the exists / regular-file checks.
pub(crate) fn read_bytes(path: &Path) -> Result<Vec<u8>, FileError> {
    let metadata = fs::metadata(path)
        .map_err(|_| FileError::NotFound(path.to_string_lossy().to_string()))?;
    if !metadata.is_file() {
        return Err(FileError::NotAFile(path.to_string_lossy().to_string()));
    }
    Ok(fs::read(path)?)
}
