//! Text acquisition with encoding auto-detection.
//!
//! PX files in the wild are often ANSI (windows-1252 or latin-1) rather than
//! UTF-8. The parser only ever sees decoded text; this module produces it.

use std::path::Path;

use encoding_rs::Encoding;

use crate::error::{SourceError, SourceResult};

const BOM: char = '\u{feff}';

/// Decoded PX text and the encoding that was used.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub content: String,
    pub encoding: String,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to string using the specified encoding label.
///
/// UTF-8 falls back to lossy conversion; any other label goes through
/// `encoding_rs`. A leading byte order mark is dropped.
pub fn decode_content(bytes: &[u8], encoding: &str) -> SourceResult<String> {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned()),
        label => {
            let encoding = Encoding::for_label(label.as_bytes())
                .ok_or_else(|| SourceError::UnknownEncoding(label.to_string()))?;
            encoding.decode_without_bom_handling(bytes).0.into_owned()
        }
    };

    Ok(match decoded.strip_prefix(BOM) {
        Some(rest) => rest.to_string(),
        None => decoded,
    })
}

/// Decode bytes, detecting the encoding unless one is forced.
pub fn read_bytes(bytes: &[u8], forced: Option<&str>) -> SourceResult<Decoded> {
    let encoding = match forced {
        Some(label) => label.to_lowercase(),
        None => detect_encoding(bytes),
    };
    let content = decode_content(bytes, &encoding)?;
    Ok(Decoded { content, encoding })
}

/// Read and decode a PX file.
pub fn read_file<P: AsRef<Path>>(path: P, forced: Option<&str>) -> SourceResult<Decoded> {
    let bytes = std::fs::read(path.as_ref())?;
    read_bytes(&bytes, forced)
}
