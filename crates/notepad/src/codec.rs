//! Reversible text <-> URL-safe token transform used by snapshot and embed
//! links.
//!
//! Text is zlib-deflated and written with the URL-safe base64 alphabet without
//! padding. Decoding also accepts the standard alphabet with padding, as
//! produced by browser `btoa`.

use std::io::{Read, Write};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("token payload is not a zlib stream: {0}")]
    Inflate(#[from] std::io::Error),

    #[error("decoded content is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub fn encode(text: &str) -> String {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    // Writing into a Vec cannot fail
    let deflated = encoder
        .write_all(text.as_bytes())
        .and_then(|_| encoder.finish())
        .unwrap_or_default();
    URL_SAFE_NO_PAD.encode(deflated)
}

pub fn decode(token: &str) -> Result<String, DecodeError> {
    let normalized: String = token
        .trim()
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' | ' ' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    let deflated = URL_SAFE_NO_PAD.decode(normalized)?;

    let mut inflated = Vec::new();
    ZlibDecoder::new(deflated.as_slice()).read_to_end(&mut inflated)?;
    Ok(String::from_utf8(inflated)?)
}

/// Decode a token, falling back to empty content when it is malformed.
pub fn decode_or_empty(token: &str) -> String {
    match decode(token) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Discarding malformed content token: {}", e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;

    #[test]
    fn test_round_trip_samples() {
        let samples = [
            "",
            "hello",
            "line one\r\nline two\r\n",
            "日本語のテキスト 🚀 emoji",
            "\u{0}\u{1}control\u{7f}",
        ];
        for sample in samples {
            assert_eq!(decode(&encode(sample)).unwrap(), sample);
        }
    }

    #[test]
    fn test_round_trip_large_repetitive_text() {
        let text = "fn main() {}\n".repeat(5_000);
        let token = encode(&text);
        assert!(token.len() < text.len() / 10);
        assert_eq!(decode(&token).unwrap(), text);
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = encode("<>?/+=&# some text that compresses into varied bytes ~~~");
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_decodes_standard_alphabet_with_padding() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all("legacy snapshot ✓".as_bytes()).unwrap();
        let legacy = STANDARD.encode(encoder.finish().unwrap());
        assert_eq!(decode(&legacy).unwrap(), "legacy snapshot ✓");
    }

    #[test]
    fn test_malformed_tokens_fail() {
        assert!(matches!(decode("!!!"), Err(DecodeError::Base64(_))));
        // Valid base64, but not a zlib stream
        assert!(matches!(
            decode(&URL_SAFE_NO_PAD.encode(b"plain bytes")),
            Err(DecodeError::Inflate(_))
        ));
    }

    #[test]
    fn test_decode_or_empty_substitutes_empty_content() {
        assert_eq!(decode_or_empty("not a token at all!"), "");
        assert_eq!(decode_or_empty(&encode("kept")), "kept");
    }
}
