//! Rendered signature image validation.
//!
//! The browser renders the counterparty's signature stroke to a PNG and
//! submits the bytes. Validation happens before any upload so a rejected
//! image never touches the store or the proposal record.

use crate::domain::foundation::{DomainError, ErrorCode};

/// PNG file signature.
const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Largest accepted image (1 MiB).
pub const MAX_SIGNATURE_BYTES: usize = 1_048_576;

/// Smallest accepted image. A blank canvas encodes to a few hundred
/// bytes; anything under this floor cannot hold a drawn stroke.
pub const MIN_SIGNATURE_BYTES: usize = 1_024;

/// A validated, non-blank signature PNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureImage {
    bytes: Vec<u8>,
}

impl SignatureImage {
    /// Validates raw submitted bytes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSignature` if the payload is empty, not a PNG,
    /// larger than [`MAX_SIGNATURE_BYTES`], or too small to contain a
    /// visible stroke.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, DomainError> {
        if bytes.is_empty() {
            return Err(Self::rejected("image is empty"));
        }

        if bytes.len() < PNG_MAGIC.len() || bytes[..PNG_MAGIC.len()] != PNG_MAGIC {
            return Err(Self::rejected("image is not a PNG"));
        }

        if bytes.len() > MAX_SIGNATURE_BYTES {
            return Err(Self::rejected("image exceeds the 1 MiB limit"));
        }

        if bytes.len() < MIN_SIGNATURE_BYTES {
            return Err(Self::rejected("image appears blank"));
        }

        Ok(Self { bytes })
    }

    /// Returns the validated PNG bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the image, returning the PNG bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Returns the payload size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false once validation has passed.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// MIME type of the stored object.
    pub fn content_type(&self) -> &'static str {
        "image/png"
    }

    fn rejected(reason: &str) -> DomainError {
        DomainError::new(ErrorCode::InvalidSignature, reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// PNG header followed by enough filler to pass the blank floor.
    fn valid_png_bytes() -> Vec<u8> {
        let mut bytes = PNG_MAGIC.to_vec();
        bytes.extend(std::iter::repeat(0xAB).take(MIN_SIGNATURE_BYTES));
        bytes
    }

    #[test]
    fn accepts_valid_png() {
        let image = SignatureImage::from_bytes(valid_png_bytes()).unwrap();
        assert_eq!(image.content_type(), "image/png");
        assert!(image.len() >= MIN_SIGNATURE_BYTES);
    }

    #[test]
    fn rejects_empty_payload() {
        let result = SignatureImage::from_bytes(Vec::new());
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidSignature);
        assert!(err.message.contains("empty"));
    }

    #[test]
    fn rejects_non_png_payload() {
        let result = SignatureImage::from_bytes(vec![0xFF; 4096]);
        assert!(result.is_err());
        assert!(result.unwrap_err().message.contains("not a PNG"));
    }

    #[test]
    fn rejects_truncated_magic() {
        let result = SignatureImage::from_bytes(PNG_MAGIC[..4].to_vec());
        assert!(result.is_err());
    }

    #[test]
    fn rejects_oversized_payload() {
        let mut bytes = PNG_MAGIC.to_vec();
        bytes.extend(std::iter::repeat(0xAB).take(MAX_SIGNATURE_BYTES));
        let result = SignatureImage::from_bytes(bytes);
        assert!(result.is_err());
        assert!(result.unwrap_err().message.contains("1 MiB"));
    }

    #[test]
    fn rejects_blank_sized_payload() {
        // Header plus a couple hundred bytes, the size of an empty canvas render.
        let mut bytes = PNG_MAGIC.to_vec();
        bytes.extend(std::iter::repeat(0x00).take(200));
        let result = SignatureImage::from_bytes(bytes);
        assert!(result.is_err());
        assert!(result.unwrap_err().message.contains("blank"));
    }

    #[test]
    fn preserves_bytes_exactly() {
        let bytes = valid_png_bytes();
        let image = SignatureImage::from_bytes(bytes.clone()).unwrap();
        assert_eq!(image.as_bytes(), bytes.as_slice());
        assert_eq!(image.into_bytes(), bytes);
    }
}
