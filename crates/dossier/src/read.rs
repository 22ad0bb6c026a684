//! Source decoding with encoding fallback.
//!
//! Personal document folders accumulate files saved by many tools over many
//! years, so decoding tries UTF-8 first, then UTF-16 when a BOM is present,
//! then Latin-1 as a last resort. Binary content (embedded NUL bytes outside
//! a UTF-16 file) is rejected rather than silently mangled.

use std::path::Path;

use dossier_core::error::DossierError;

/// Read and decode a source file, returning both the raw bytes (for
/// content hashing) and the decoded text.
pub fn read_file(path: &Path) -> Result<(Vec<u8>, String), DossierError> {
    let bytes = std::fs::read(path).map_err(|source| DossierError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let text = decode(&bytes, &path.display().to_string())?;
    Ok((bytes, text))
}

/// Decode raw bytes with the UTF-8 → UTF-16 (BOM) → Latin-1 fallback chain.
pub fn decode(bytes: &[u8], path: &str) -> Result<String, DossierError> {
    if let Some(text) = decode_utf16_bom(bytes) {
        return Ok(text);
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(text.to_string());
    }

    // Embedded NULs at this point mean binary content, not a legacy text
    // encoding.
    if bytes.contains(&0) {
        return Err(DossierError::Encoding {
            path: path.to_string(),
        });
    }

    // Latin-1: every byte maps directly to the code point of the same value.
    Ok(bytes.iter().map(|&b| b as char).collect())
}

/// Decode UTF-16 content when a byte-order mark is present.
fn decode_utf16_bom(bytes: &[u8]) -> Option<String> {
    let (le, payload) = match bytes {
        [0xFF, 0xFE, rest @ ..] => (true, rest),
        [0xFE, 0xFF, rest @ ..] => (false, rest),
        _ => return None,
    };
    if payload.len() % 2 != 0 {
        return None;
    }
    let units: Vec<u16> = payload
        .chunks_exact(2)
        .map(|pair| {
            if le {
                u16::from_le_bytes([pair[0], pair[1]])
            } else {
                u16::from_be_bytes([pair[0], pair[1]])
            }
        })
        .collect();
    String::from_utf16(&units).ok()
}
