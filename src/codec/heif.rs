//! HEIC/HEIF decoding through libheif.

use super::{DecodeError, DecodedImage, ImageDecoder, PixelMode};
use crate::constants::HEIF_MIME_TYPES;
use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};
use std::path::Path;

#[derive(Debug, Default, Clone, Copy)]
pub struct HeifDecoder;

impl HeifDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ImageDecoder for HeifDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, DecodeError> {
        check_container(path)?;

        let lib_heif = LibHeif::new();
        let ctx = HeifContext::read_from_file(path.to_string_lossy().as_ref())
            .map_err(|e| DecodeError::Library(format!("failed to read HEIF container: {}", e)))?;

        let handle = ctx
            .primary_image_handle()
            .map_err(|e| DecodeError::Library(format!("failed to get primary image: {}", e)))?;

        let (chroma, mode) = if handle.has_alpha_channel() {
            (RgbChroma::Rgba, PixelMode::Rgba)
        } else {
            (RgbChroma::Rgb, PixelMode::Rgb)
        };

        let decoded = lib_heif
            .decode(&handle, ColorSpace::Rgb(chroma), None)
            .map_err(|e| DecodeError::Library(format!("failed to decode image: {}", e)))?;

        let planes = decoded.planes();
        let plane = planes.interleaved.ok_or(DecodeError::MissingPlane)?;

        tracing::debug!(
            "Decoded {:?}: {}x{} {:?}, stride {}",
            path,
            plane.width,
            plane.height,
            mode,
            plane.stride
        );

        Ok(DecodedImage {
            mode,
            width: plane.width,
            height: plane.height,
            stride: plane.stride,
            data: plane.data.to_vec(),
        })
    }
}

/// Rejects files whose header identifies them as something other than HEIF.
/// Files `infer` cannot classify are passed through to libheif.
pub fn check_container(path: &Path) -> Result<(), DecodeError> {
    let kind = infer::get_from_path(path).map_err(|e| DecodeError::Unreadable(e.to_string()))?;

    match kind {
        Some(kind) if !HEIF_MIME_TYPES.contains(&kind.mime_type()) => Err(DecodeError::NotHeif {
            mime: kind.mime_type().to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    // Minimal ftyp box with the "heic" major brand
    const HEIC_HEADER: &[u8] = &[
        0x00, 0x00, 0x00, 0x18, b'f', b't', b'y', b'p', b'h', b'e', b'i', b'c', 0x00, 0x00, 0x00,
        0x00, b'm', b'i', b'f', b'1', b'h', b'e', b'i', b'c',
    ];

    #[test]
    fn test_png_disguised_as_heic_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("photo.heic");
        std::fs::write(&path, PNG_MAGIC).unwrap();

        assert_eq!(
            check_container(&path),
            Err(DecodeError::NotHeif {
                mime: "image/png".to_string()
            })
        );
    }

    #[test]
    fn test_heic_header_passes_sniffing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("photo.heic");
        std::fs::write(&path, HEIC_HEADER).unwrap();

        assert!(check_container(&path).is_ok());
    }

    #[test]
    fn test_unknown_content_passes_sniffing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("photo.heic");
        std::fs::write(&path, b"????????").unwrap();

        assert!(check_container(&path).is_ok());
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gone.heic");

        assert!(matches!(
            check_container(&path),
            Err(DecodeError::Unreadable(_))
        ));
    }

    #[test]
    fn test_garbage_fails_to_decode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.heic");
        std::fs::write(&path, b"definitely not an image").unwrap();

        assert!(HeifDecoder::new().decode(&path).is_err());
    }
}
