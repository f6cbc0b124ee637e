//! Data URI codec for image payloads.
//!
//! Records carry their image as a `data:<mime>;base64,<payload>` string so the
//! whole collection can live in a text key-value store and be used directly as
//! an `<img src>`.

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::error::GalleryError;

/// MIME prefix that marks a file as an image.
pub const IMAGE_MIME_PREFIX: &str = "image/";

/// Check if a MIME type denotes an image.
pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type.starts_with(IMAGE_MIME_PREFIX)
}

/// Encode raw bytes as a base64 data URI.
pub fn encode_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// A decoded data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    /// MIME type declared in the URI header
    pub mime_type: String,
    /// Decoded payload
    pub bytes: Vec<u8>,
}

/// Decode a base64 data URI back into its MIME type and bytes.
pub fn decode_data_uri(uri: &str) -> Result<DataUri, GalleryError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| GalleryError::Codec("missing 'data:' scheme".to_string()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| GalleryError::Codec("missing ',' separator".to_string()))?;

    let mime_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| GalleryError::Codec("only base64 payloads are supported".to_string()))?;

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| GalleryError::Codec(format!("invalid base64 payload: {}", e)))?;

    Ok(DataUri {
        mime_type: mime_type.to_string(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_mime() {
        assert!(is_image_mime("image/png"));
        assert!(is_image_mime("image/svg+xml"));
        assert!(!is_image_mime("text/plain"));
        assert!(!is_image_mime(""));
    }

    #[test]
    fn test_encode_data_uri() {
        assert_eq!(
            encode_data_uri("image/png", b"abc"),
            "data:image/png;base64,YWJj"
        );
    }

    #[test]
    fn test_decode_data_uri() {
        let decoded = decode_data_uri("data:image/gif;base64,YWJj").unwrap();
        assert_eq!(decoded.mime_type, "image/gif");
        assert_eq!(decoded.bytes, b"abc");
    }

    #[test]
    fn test_decode_rejects_malformed_uris() {
        assert!(decode_data_uri("image/png;base64,YWJj").is_err());
        assert!(decode_data_uri("data:image/png;base64").is_err());
        assert!(decode_data_uri("data:text/plain,hello").is_err());
        assert!(decode_data_uri("data:image/png;base64,!!!").is_err());
    }
}
