//! Base64 encoding of the assembled subscription body.
//!
//! The body is encoded over its UTF-8 bytes, so non-ASCII config text
//! survives a decode on the client side unchanged.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::string::FromUtf8Error;

#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

pub fn encode_body(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

pub fn decode_body(encoded: &str) -> Result<String, DecodeError> {
    let bytes = STANDARD.decode(encoded.as_bytes())?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_ascii() {
        assert_eq!(encode_body(""), "");
        assert_eq!(encode_body("vless://a\n"), "dmxlc3M6Ly9hCg==");
    }

    #[test]
    fn test_non_ascii_is_preserved() {
        let text = "vmess://host#سرور-آلمان 🇩🇪\ntrojan://x#日本\n";
        let encoded = encode_body(text);
        assert_eq!(decode_body(&encoded).unwrap(), text);
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(decode_body("not base64!"), Err(DecodeError::Base64(_))));
        // "/w==" decodes to the single byte 0xff
        assert!(matches!(decode_body("/w=="), Err(DecodeError::Utf8(_))));
    }
}
