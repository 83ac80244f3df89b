//! Error types surfaced by the analysis core.

use thiserror::Error;

/// An image that could not be read or decoded.
///
/// Image sources return this instead of an empty buffer so the caller can
/// record the file and move on to the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot read image {path}: {reason}")]
pub struct UnreadableImage {
    /// Identifier of the image (file path or upload name).
    pub path: String,
    /// Decoder or I/O error message.
    pub reason: String,
}

impl UnreadableImage {
    /// Creates a new unreadable-image error.
    #[must_use]
    pub fn new(path: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Errors raised while measuring a decoded image.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The detector returned a mask that does not cover the image.
    #[error("region mask is {mask_width}x{mask_height} but image is {image_width}x{image_height}")]
    MaskDimensions {
        /// Mask width in pixels.
        mask_width: u32,
        /// Mask height in pixels.
        mask_height: u32,
        /// Image width in pixels.
        image_width: u32,
        /// Image height in pixels.
        image_height: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreadable_message_contains_path() {
        let err = UnreadableImage::new("broken.png", "unexpected end of file");
        let msg = err.to_string();
        assert!(msg.contains("broken.png"));
        assert!(msg.contains("unexpected end of file"));
    }

    #[test]
    fn test_mask_dimensions_message() {
        let err = AnalysisError::MaskDimensions {
            mask_width: 10,
            mask_height: 10,
            image_width: 20,
            image_height: 10,
        };
        assert_eq!(
            err.to_string(),
            "region mask is 10x10 but image is 20x10"
        );
    }
}
