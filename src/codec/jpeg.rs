use super::{DecodedImage, EncodeError, ImageEncoder};
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Default, Clone, Copy)]
pub struct JpegFileEncoder;

impl JpegFileEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl ImageEncoder for JpegFileEncoder {
    fn encode(&self, image: &DecodedImage, quality: u8, output: &Path) -> Result<(), EncodeError> {
        let packed = image.to_packed_rgb()?;
        let rgb = RgbImage::from_raw(image.width, image.height, packed)
            .ok_or_else(|| EncodeError::Jpeg("pixel buffer does not match dimensions".to_string()))?;

        // File::create truncates, so an existing JPEG of the same name is replaced
        let file = File::create(output).map_err(|e| EncodeError::Io(e.to_string()))?;
        let mut writer = BufWriter::new(file);

        {
            let mut encoder = JpegEncoder::new_with_quality(&mut writer, quality);
            encoder
                .encode_image(&rgb)
                .map_err(|e| EncodeError::Jpeg(e.to_string()))?;
        }

        writer.flush().map_err(|e| EncodeError::Io(e.to_string()))?;
        Ok(())
    }
}
