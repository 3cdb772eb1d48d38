//! Decoding and normalization of candidate ad images.

use std::io::Cursor;

use image::ImageReader;
use tracing::warn;

use crate::constants::WEBP_QUALITY;
use crate::entities::candidate::{CandidateImage, EncodedImage};
use crate::entities::slot::Dimensions;

/// Build a [`CandidateImage`] from an uploaded file.
///
/// Dimensions come from fully decoding the pixel data; a header that lies
/// about its size never gets past here. Bytes that do not decode keep
/// `dimensions: None` so the caller rejects them explicitly.
pub fn decode_candidate(bytes: Vec<u8>, file_name: String) -> CandidateImage {
    let dimensions = decode_dimensions(&bytes);
    if dimensions.is_none() {
        warn!("Could not decode '{}' ({} bytes)", file_name, bytes.len());
    }
    CandidateImage { bytes, file_name, dimensions }
}

fn decode_dimensions(bytes: &[u8]) -> Option<Dimensions> {
    let decoded = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .decode()
        .ok()?;
    Some(Dimensions::new(decoded.width(), decoded.height()))
}

/// Re-encode a candidate to lossy WebP at the fixed quality target.
///
/// Falls back to passing the original bytes through with their original
/// extension when re-encoding fails; a submission is never blocked by a
/// codec failure alone.
pub fn normalize(image: &CandidateImage) -> EncodedImage {
    match encode_webp(&image.bytes) {
        Some(bytes) => EncodedImage { bytes, extension: "webp".to_string() },
        None => {
            warn!("WebP re-encode of '{}' failed, passing original through", image.file_name);
            EncodedImage {
                bytes: image.bytes.clone(),
                extension: image.extension(),
            }
        }
    }
}

fn encode_webp(bytes: &[u8]) -> Option<Vec<u8>> {
    let decoded = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .decode()
        .ok()?;

    let rgba = decoded.to_rgba8();
    let encoder = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height());
    Some(encoder.encode(WEBP_QUALITY).to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([12, 200, 64, 255]));
        let mut out = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn dimensions_come_from_pixel_data() {
        let candidate = decode_candidate(png_bytes(1456, 180), "ad.png".to_string());
        assert_eq!(candidate.dimensions, Some(Dimensions::new(1456, 180)));
    }

    #[test]
    fn undecodable_bytes_leave_dimensions_unknown() {
        let candidate = decode_candidate(vec![0xde, 0xad, 0xbe, 0xef], "ad.png".to_string());
        assert_eq!(candidate.dimensions, None);
    }

    #[test]
    fn normalize_produces_webp() {
        let candidate = decode_candidate(png_bytes(16, 16), "ad.png".to_string());
        let encoded = normalize(&candidate);

        assert_eq!(encoded.extension, "webp");
        // RIFF....WEBP container magic
        assert!(encoded.bytes.starts_with(b"RIFF"));
        assert_eq!(encoded.bytes[8..12], *b"WEBP");
    }

    #[test]
    fn normalize_is_deterministic() {
        let candidate = decode_candidate(png_bytes(16, 16), "ad.png".to_string());
        assert_eq!(normalize(&candidate), normalize(&candidate));
    }

    #[test]
    fn normalize_falls_back_to_the_original_bytes() {
        let bytes = vec![0xde, 0xad, 0xbe, 0xef];
        let candidate = CandidateImage {
            bytes: bytes.clone(),
            file_name: "ad.gif".to_string(),
            dimensions: None,
        };

        let encoded = normalize(&candidate);

        assert_eq!(encoded.bytes, bytes);
        assert_eq!(encoded.extension, "gif");
        // and the fallback is just as repeatable
        assert_eq!(normalize(&candidate), encoded);
    }
}
