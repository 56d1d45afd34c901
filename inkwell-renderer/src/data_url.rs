//! Data URL helpers.
//!
//! Handles `data:<mime>;base64,<payload>` strings: building them from bytes,
//! stripping them down to the raw base64 payload, and decoding them back.

use base64::Engine;

use crate::error::{RenderError, RenderResult};

/// MIME type of rendered strokes.
pub const PNG_MIME: &str = "image/png";

/// Build a base64 data URL.
#[must_use]
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{payload}")
}

/// Split a base64 data URL into its MIME type and raw base64 payload.
///
/// # Errors
///
/// Returns [`RenderError::DataUrl`] if the string is not a base64 data URL.
pub fn split_data_url(url: &str) -> RenderResult<(&str, &str)> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| RenderError::DataUrl("missing data: scheme".to_string()))?;

    let (metadata, payload) = rest
        .split_once(',')
        .ok_or_else(|| RenderError::DataUrl("missing comma".to_string()))?;

    let mime = metadata
        .strip_suffix(";base64")
        .ok_or_else(|| RenderError::DataUrl("payload is not base64".to_string()))?;

    if mime.is_empty() {
        return Err(RenderError::DataUrl("missing MIME type".to_string()));
    }

    Ok((mime, payload))
}

/// Decode a base64 data URL into its bytes.
///
/// # Errors
///
/// Returns an error if the URL is malformed or the payload is not base64.
pub fn decode_data_url(url: &str) -> RenderResult<Vec<u8>> {
    let (_, payload) = split_data_url(url)?;
    Ok(base64::engine::general_purpose::STANDARD.decode(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 red pixel
    const PNG_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

    #[test]
    fn test_split_strips_prefix() {
        let url = format!("data:image/png;base64,{PNG_BASE64}");
        let (mime, payload) = split_data_url(&url).expect("split");
        assert_eq!(mime, PNG_MIME);
        assert_eq!(payload, PNG_BASE64);
    }

    #[test]
    fn test_encode_then_decode_bytes() {
        let url = encode_data_url("application/octet-stream", &[0, 1, 2, 254, 255]);
        assert!(url.starts_with("data:application/octet-stream;base64,"));
        assert_eq!(decode_data_url(&url).expect("decode"), vec![0, 1, 2, 254, 255]);
    }

    #[test]
    fn test_decoded_payload_is_png() {
        let url = format!("data:image/png;base64,{PNG_BASE64}");
        let img = image::load_from_memory(&decode_data_url(&url).expect("decode")).expect("png");
        assert_eq!((img.width(), img.height()), (1, 1));
    }

    #[test]
    fn test_malformed_urls() {
        assert!(matches!(
            split_data_url("not a data url"),
            Err(RenderError::DataUrl(_))
        ));
        assert!(matches!(
            split_data_url("data:image/png"),
            Err(RenderError::DataUrl(_))
        ));
        assert!(matches!(
            split_data_url("data:image/png,rawtext"),
            Err(RenderError::DataUrl(_))
        ));
        assert!(matches!(
            split_data_url("data:;base64,AAAA"),
            Err(RenderError::DataUrl(_))
        ));
        assert!(matches!(
            decode_data_url("data:image/png;base64,@@@"),
            Err(RenderError::Base64(_))
        ));
    }
}
