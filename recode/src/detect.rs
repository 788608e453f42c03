//! Source encoding detection.
//!
//! Detection is a black box to the rest of the recoder: a sample of leading
//! bytes goes in, an encoding (or no verdict) comes out.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};

use crate::encoding::TextEncoding;
use crate::error::{RecodeError, Result};

/// Guesses the encoding of a byte sample.
pub trait EncodingDetector {
    fn detect(&self, sample: &[u8]) -> Option<TextEncoding>;
}

/// Byte order marks first, then UTF-8 validity, then a statistical guess.
///
/// # Examples
///
/// ```
/// use optdispatch_recode::{EncodingDetector, SniffingDetector, TextEncoding};
///
/// let detector = SniffingDetector;
/// assert_eq!(detector.detect(b"\xEF\xBB\xBFhi"), Some(TextEncoding::Utf8Sig));
/// assert_eq!(detector.detect("héllo".as_bytes()), Some(TextEncoding::utf8()));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SniffingDetector;

impl EncodingDetector for SniffingDetector {
    fn detect(&self, sample: &[u8]) -> Option<TextEncoding> {
        if let Some((encoding, _)) = Encoding::for_bom(sample) {
            if encoding == UTF_8 {
                return Some(TextEncoding::Utf8Sig);
            }
            return Some(TextEncoding::Standard(encoding));
        }
        if is_utf8_prefix(sample) {
            return Some(TextEncoding::utf8());
        }
        let mut detector = chardetng::EncodingDetector::new();
        detector.feed(sample, true);
        Some(TextEncoding::Standard(detector.guess(None, false)))
    }
}

/// Valid UTF-8, allowing a multi-byte sequence cut off by the sample end.
fn is_utf8_prefix(sample: &[u8]) -> bool {
    match std::str::from_utf8(sample) {
        Ok(_) => true,
        Err(err) => err.error_len().is_none(),
    }
}

/// Reads up to `sample_size` leading bytes of `path` and runs `detector`.
///
/// # Errors
///
/// Returns [`RecodeError::IoError`] if the file cannot be read and
/// [`RecodeError::Undetectable`] if the detector has no verdict.
pub fn detect_file(
    detector: &dyn EncodingDetector,
    path: &Path,
    sample_size: usize,
) -> Result<TextEncoding> {
    let mut sample = Vec::with_capacity(sample_size);
    File::open(path)?
        .take(sample_size as u64)
        .read_to_end(&mut sample)?;
    detector
        .detect(&sample)
        .ok_or_else(|| RecodeError::Undetectable(path.to_path_buf()))
}
