use std::path::Path;
use thiserror::Error;

pub mod heif;
pub mod jpeg;

pub use heif::HeifDecoder;
pub use jpeg::JpegFileEncoder;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("cannot read file: {0}")]
    Unreadable(String),
    #[error("not a HEIF image (detected {mime})")]
    NotHeif { mime: String },
    #[error("{0}")]
    Library(String),
    #[error("decoder returned no interleaved pixel plane")]
    MissingPlane,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    #[error("pixel buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },
    #[error("row stride {stride} is shorter than a row of {row_bytes} bytes")]
    InvalidStride { stride: usize, row_bytes: usize },
    #[error("image has zero width or height")]
    EmptyImage,
    #[error("cannot write output: {0}")]
    Io(String),
    #[error("jpeg encoder failed: {0}")]
    Jpeg(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelMode {
    Rgb,
    Rgba,
}

impl PixelMode {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelMode::Rgb => 3,
            PixelMode::Rgba => 4,
        }
    }
}

/// Raw 8-bit interleaved pixels as handed over by a decoder. Rows may be padded:
/// `stride` is the distance in bytes between the starts of consecutive rows.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub mode: PixelMode,
    pub width: u32,
    pub height: u32,
    pub stride: usize,
    pub data: Vec<u8>,
}

impl DecodedImage {
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.mode.bytes_per_pixel()
    }

    /// Packed RGB rows with stride padding and any alpha channel removed.
    pub fn to_packed_rgb(&self) -> Result<Vec<u8>, EncodeError> {
        if self.width == 0 || self.height == 0 {
            return Err(EncodeError::EmptyImage);
        }

        let row_bytes = self.row_bytes();
        if self.stride < row_bytes {
            return Err(EncodeError::InvalidStride {
                stride: self.stride,
                row_bytes,
            });
        }

        let height = self.height as usize;
        let needed = self.stride * (height - 1) + row_bytes;
        if self.data.len() < needed {
            return Err(EncodeError::BufferTooSmall {
                needed,
                actual: self.data.len(),
            });
        }

        let mut packed = Vec::with_capacity(self.width as usize * height * 3);
        for row in self.data.chunks(self.stride).take(height) {
            let row = &row[..row_bytes];
            match self.mode {
                PixelMode::Rgb => packed.extend_from_slice(row),
                PixelMode::Rgba => {
                    for px in row.chunks_exact(4) {
                        packed.extend_from_slice(&px[..3]);
                    }
                }
            }
        }
        Ok(packed)
    }
}

pub trait ImageDecoder: Send {
    fn decode(&self, path: &Path) -> Result<DecodedImage, DecodeError>;
}

pub trait ImageEncoder: Send {
    fn encode(&self, image: &DecodedImage, quality: u8, output: &Path) -> Result<(), EncodeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(mode: PixelMode, width: u32, height: u32, stride: usize, data: Vec<u8>) -> DecodedImage {
        DecodedImage {
            mode,
            width,
            height,
            stride,
            data,
        }
    }

    #[test]
    fn test_packed_rgb_without_padding() {
        let img = image(PixelMode::Rgb, 2, 1, 6, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(img.to_packed_rgb().unwrap(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_packed_rgb_strips_row_padding() {
        // 1x2 image, 3 bytes per row plus 5 bytes of padding
        let data = vec![10, 11, 12, 0, 0, 0, 0, 0, 20, 21, 22];
        let img = image(PixelMode::Rgb, 1, 2, 8, data);
        assert_eq!(img.to_packed_rgb().unwrap(), vec![10, 11, 12, 20, 21, 22]);
    }

    #[test]
    fn test_packed_rgb_drops_alpha() {
        let img = image(PixelMode::Rgba, 2, 1, 8, vec![1, 2, 3, 255, 4, 5, 6, 128]);
        assert_eq!(img.to_packed_rgb().unwrap(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_short_buffer_is_rejected() {
        let img = image(PixelMode::Rgb, 2, 2, 6, vec![0; 8]);
        assert_eq!(
            img.to_packed_rgb(),
            Err(EncodeError::BufferTooSmall {
                needed: 12,
                actual: 8
            })
        );
    }

    #[test]
    fn test_stride_shorter_than_row_is_rejected() {
        let img = image(PixelMode::Rgba, 2, 1, 4, vec![0; 8]);
        assert!(matches!(
            img.to_packed_rgb(),
            Err(EncodeError::InvalidStride { stride: 4, row_bytes: 8 })
        ));
    }

    #[test]
    fn test_empty_image_is_rejected() {
        let img = image(PixelMode::Rgb, 0, 4, 0, Vec::new());
        assert_eq!(img.to_packed_rgb(), Err(EncodeError::EmptyImage));
    }
}
