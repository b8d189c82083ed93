//! Decoding of NTR file bytes into text.
//!
//! NTR files come out of Windows tools as often as not, so besides UTF-8
//! the decoder accepts Windows-1252 and any encoding announced by a BOM.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use log::debug;

use ntr::NtrError;

/// Decode raw file bytes.
///
/// - Empty input decodes to an empty string
/// - A BOM selects its encoding, and the rest must decode without errors
/// - Otherwise the bytes must be valid UTF-8 or Windows-1252, tried in that order
///
/// # Errors
///
/// Returns `NtrError::Decode` when no accepted encoding decodes the bytes
/// cleanly.
pub fn decode_bytes(bytes: &[u8]) -> Result<String, NtrError> {
    if bytes.is_empty() {
        return Ok(String::new());
    }

    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        debug!(encoding = encoding.name(); "Decoding with BOM encoding");
        let (decoded, _, had_errors) = encoding.decode(&bytes[bom_len..]);
        if had_errors {
            return Err(NtrError::Decode(format!(
                "File encoding {} contains invalid sequences",
                encoding.name()
            )));
        }
        return Ok(decoded.into_owned());
    }

    for encoding in [UTF_8, WINDOWS_1252] {
        let (decoded, _, had_errors) = encoding.decode(bytes);
        if !had_errors {
            debug!(encoding = encoding.name(); "Decoded input");
            return Ok(decoded.into_owned());
        }
    }

    Err(NtrError::Decode(
        "Unsupported file encoding; expected UTF-8 or Windows-1252".to_string(),
    ))
}
