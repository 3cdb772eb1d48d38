use std::fmt;

use crate::constants::FALLBACK_EXTENSION;
use crate::entities::slot::{AdSlot, Dimensions};

/// An image the user picked for submission.
///
/// Lives only for the duration of one submission attempt; it is dropped on
/// success or form reset. Dimensions are decoded from the pixel data itself,
/// never taken from file metadata, and stay `None` when the bytes would not
/// decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateImage {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub dimensions: Option<Dimensions>,
}

impl CandidateImage {
    /// Extension of the original file, lowercased, defaulting when absent.
    pub fn extension(&self) -> String {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
            .unwrap_or(FALLBACK_EXTENSION)
            .to_lowercase()
    }
}

/// Output of the normalizer: upload-ready bytes plus the extension they carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub extension: String,
}

/// The selected image's pixel size does not equal what the slot requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionMismatch {
    pub slot: AdSlot,
    pub expected: Dimensions,
    pub actual: Dimensions,
}

impl fmt::Display for DimensionMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Image dimensions do not match the selected size! Expected {} dimensions are {}, got {}",
            self.slot, self.expected, self.actual
        )
    }
}

/// Accept `actual` for `slot` iff it equals the slot's required size exactly.
pub fn validate_dimensions(actual: Dimensions, slot: AdSlot) -> Result<(), DimensionMismatch> {
    let expected = slot.required_dimensions();
    if actual == expected {
        Ok(())
    } else {
        Err(DimensionMismatch { slot, expected, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_size_passes_exactly_one_slot() {
        let sizes = [
            Dimensions::new(1456, 180),
            Dimensions::new(1456, 1456),
            Dimensions::new(180, 1456),
        ];
        let slots = [AdSlot::Banner, AdSlot::Square, AdSlot::Skyscraper];

        for (i, size) in sizes.iter().enumerate() {
            for (j, slot) in slots.iter().enumerate() {
                let result = validate_dimensions(*size, *slot);
                if i == j {
                    assert!(result.is_ok(), "{size} should pass {slot}");
                } else {
                    assert!(result.is_err(), "{size} should fail {slot}");
                }
            }
        }
    }

    #[test]
    fn mismatch_reports_expected_and_actual() {
        let err = validate_dimensions(Dimensions::new(1456, 180), AdSlot::Square).unwrap_err();
        assert_eq!(err.expected, Dimensions::new(1456, 1456));
        assert_eq!(err.actual, Dimensions::new(1456, 180));
        assert_eq!(err.slot, AdSlot::Square);
    }

    #[test]
    fn rotated_dimensions_do_not_pass() {
        // 180 x 1456 is a skyscraper, not a banner
        assert!(validate_dimensions(Dimensions::new(180, 1456), AdSlot::Banner).is_err());
    }

    #[test]
    fn extension_falls_back_when_missing() {
        let named = CandidateImage {
            bytes: vec![],
            file_name: "promo.JPEG".to_string(),
            dimensions: None,
        };
        assert_eq!(named.extension(), "jpeg");

        let bare = CandidateImage {
            bytes: vec![],
            file_name: "promo".to_string(),
            dimensions: None,
        };
        assert_eq!(bare.extension(), "png");
    }
}
