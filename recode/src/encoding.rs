//! Encoding labels, conversion, and newline normalization.
//!
//! Labels resolve through the WHATWG registry in [`encoding_rs`], so aliases
//! collapse onto one canonical upper-case name (`gb2312` and `GBK` are both
//! `GBK`). `UTF-8-SIG` is the one label handled outside the registry: UTF-8
//! with a byte order mark.

use std::fmt;
use std::str::FromStr;

use encoding_rs::{Encoding, UTF_8};

use crate::error::{RecodeError, Result};

/// Label for UTF-8 with a leading byte order mark.
pub const UTF8_SIG: &str = "UTF-8-SIG";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A text encoding the recoder can read, and usually write.
///
/// # Examples
///
/// ```
/// use optdispatch_recode::TextEncoding;
///
/// let gbk = TextEncoding::for_label("gb2312").unwrap();
/// assert_eq!(gbk.name(), "GBK");
/// assert_eq!(TextEncoding::for_label("utf-8-sig").unwrap().name(), "UTF-8-SIG");
/// assert!(TextEncoding::for_label("klingon").is_none());
/// assert!(!TextEncoding::for_label("utf-16le").unwrap().can_encode());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8 preceded by a byte order mark.
    Utf8Sig,
    /// Any encoding from the WHATWG registry.
    Standard(&'static Encoding),
}

impl TextEncoding {
    pub fn utf8() -> Self {
        Self::Standard(UTF_8)
    }

    /// Resolves a user-supplied label, ignoring case and surrounding space.
    pub fn for_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case(UTF8_SIG) || label.eq_ignore_ascii_case("UTF8-SIG") {
            return Some(Self::Utf8Sig);
        }
        Encoding::for_label(label.as_bytes()).map(Self::Standard)
    }

    /// Canonical upper-case name.
    pub fn name(&self) -> String {
        match self {
            Self::Utf8Sig => UTF8_SIG.to_string(),
            Self::Standard(encoding) => encoding.name().to_ascii_uppercase(),
        }
    }

    /// Whether text can be written in this encoding.
    pub fn can_encode(&self) -> bool {
        match self {
            Self::Utf8Sig => true,
            Self::Standard(encoding) => encoding.output_encoding() == *encoding,
        }
    }

    /// Decodes `bytes`, dropping a byte order mark that matches this encoding.
    ///
    /// # Errors
    ///
    /// Returns [`RecodeError::Malformed`] if any byte sequence is invalid.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        let (text, had_errors) = match self {
            Self::Utf8Sig => {
                let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                UTF_8.decode_without_bom_handling(body)
            }
            Self::Standard(encoding) => encoding.decode_with_bom_removal(bytes),
        };
        if had_errors {
            return Err(RecodeError::Malformed(self.name()));
        }
        Ok(text.into_owned())
    }

    /// Encodes `text`.
    ///
    /// # Errors
    ///
    /// Returns [`RecodeError::Unencodable`] for read-only encodings and
    /// [`RecodeError::Unmappable`] when a character has no representation.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        match self {
            Self::Utf8Sig => {
                let mut out = Vec::with_capacity(UTF8_BOM.len() + text.len());
                out.extend_from_slice(UTF8_BOM);
                out.extend_from_slice(text.as_bytes());
                Ok(out)
            }
            Self::Standard(encoding) => {
                if !self.can_encode() {
                    return Err(RecodeError::Unencodable(self.name()));
                }
                let (bytes, _, unmappable) = encoding.encode(text);
                if unmappable {
                    return Err(RecodeError::Unmappable(self.name()));
                }
                Ok(bytes.into_owned())
            }
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Line terminator style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Newline {
    Cr,
    Lf,
    CrLf,
}

impl Newline {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cr => "CR",
            Self::Lf => "LF",
            Self::CrLf => "CRLF",
        }
    }

    /// The terminator itself.
    pub fn sequence(self) -> &'static str {
        match self {
            Self::Cr => "\r",
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }

    /// Distinct terminators in `text`, in order of first appearance.
    ///
    /// # Examples
    ///
    /// ```
    /// use optdispatch_recode::Newline;
    ///
    /// assert_eq!(Newline::detect("a\r\nb\nc\r\n"), vec![Newline::CrLf, Newline::Lf]);
    /// assert!(Newline::detect("single line").is_empty());
    /// ```
    pub fn detect(text: &str) -> Vec<Newline> {
        let mut found = Vec::new();
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            let newline = match c {
                '\r' if chars.peek() == Some(&'\n') => {
                    chars.next();
                    Self::CrLf
                }
                '\r' => Self::Cr,
                '\n' => Self::Lf,
                _ => continue,
            };
            if !found.contains(&newline) {
                found.push(newline);
            }
        }
        found
    }

    /// Rewrites every terminator in `text` as this one.
    pub fn apply(self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    out.push_str(self.sequence());
                }
                '\n' => out.push_str(self.sequence()),
                other => out.push(other),
            }
        }
        out
    }
}

impl FromStr for Newline {
    type Err = RecodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CR" => Ok(Self::Cr),
            "LF" => Ok(Self::Lf),
            "CRLF" => Ok(Self::CrLf),
            _ => Err(RecodeError::InvalidNewline(s.to_string())),
        }
    }
}

impl fmt::Display for Newline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders detected terminators as `CR,LF`, or `NONE`.
pub fn describe_newlines(found: &[Newline]) -> String {
    if found.is_empty() {
        return "NONE".to_string();
    }
    found
        .iter()
        .map(|n| n.as_str())
        .collect::<Vec<_>>()
        .join(",")
}
