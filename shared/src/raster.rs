use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageDecoder, ImageReader};

use crate::crop::CropArea;

/// Matches the default quality browsers use for `canvas.toBlob("image/jpeg")`.
pub const JPEG_QUALITY: u8 = 92;

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("image decode failed: {0}")]
    Decode(String),
    #[error("image encode failed: {0}")]
    Encode(String),
    #[error("crop area {0:?} lies outside the image")]
    EmptyCrop(CropArea),
}

/// MIME types the decoder is built for. The picker and the drop/paste filter
/// only let these through.
pub const DECODABLE_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/gif",
    "image/bmp",
];

pub fn is_decodable_mime(mime: &str) -> bool {
    let essence = mime.split(';').next().unwrap_or_default().trim();
    DECODABLE_MIME_TYPES
        .iter()
        .any(|supported| supported.eq_ignore_ascii_case(essence))
}

/// A selected file decoded once, with EXIF orientation already applied.
#[derive(Debug)]
pub struct SourceImage {
    image: DynamicImage,
}

impl SourceImage {
    pub fn decode(source: &[u8]) -> Result<Self, RasterError> {
        let image = decode_oriented(source)?;
        log::debug!("decoded {}x{} source image", image.width(), image.height());
        Ok(Self { image })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// Cuts out `area` and scales it into a `size`x`size` JPEG.
    pub fn rasterize(&self, area: CropArea, size: u32) -> Result<Vec<u8>, RasterError> {
        let (width, height) = self.dimensions();

        let x = area.x.min(width);
        let y = area.y.min(height);
        let w = area.width.min(width - x);
        let h = area.height.min(height - y);
        if w == 0 || h == 0 {
            return Err(RasterError::EmptyCrop(area));
        }

        let cropped = self
            .image
            .crop_imm(x, y, w, h)
            .resize_exact(size, size, FilterType::Triangle)
            .to_rgb8();

        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
            .encode_image(&cropped)
            .map_err(|e| RasterError::Encode(e.to_string()))?;

        log::debug!(
            "rasterized {}x{} crop at ({}, {}) into {} bytes",
            w,
            h,
            x,
            y,
            jpeg.len()
        );
        Ok(jpeg)
    }
}

/// Decodes `source`, cuts out `area` and scales it into a `size`x`size` JPEG.
pub fn rasterize_crop(source: &[u8], area: CropArea, size: u32) -> Result<Vec<u8>, RasterError> {
    SourceImage::decode(source)?.rasterize(area, size)
}

fn decode_oriented(source: &[u8]) -> Result<DynamicImage, RasterError> {
    let decode = |e: image::ImageError| RasterError::Decode(e.to_string());

    let mut decoder = ImageReader::new(Cursor::new(source))
        .with_guessed_format()
        .map_err(|e| RasterError::Decode(e.to_string()))?
        .into_decoder()
        .map_err(decode)?;
    let orientation = decoder.orientation().map_err(decode)?;
    let mut image = DynamicImage::from_decoder(decoder).map_err(decode)?;
    image.apply_orientation(orientation);
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};

    fn split_png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Rgb([220, 20, 20])
            } else {
                Rgb([20, 20, 220])
            }
        });
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        png
    }

    fn decode(jpeg: &[u8]) -> RgbImage {
        assert_eq!(image::guess_format(jpeg).unwrap(), ImageFormat::Jpeg);
        image::load_from_memory(jpeg).unwrap().to_rgb8()
    }

    #[test]
    fn output_is_square_jpeg_of_requested_size() {
        let png = split_png(300, 200);
        let area = CropArea {
            x: 50,
            y: 0,
            width: 200,
            height: 200,
        };
        let out = decode(&rasterize_crop(&png, area, 224).unwrap());
        assert_eq!(out.dimensions(), (224, 224));
    }

    #[test]
    fn crop_selects_the_requested_region() {
        let png = split_png(400, 200);
        let right = CropArea {
            x: 220,
            y: 10,
            width: 150,
            height: 150,
        };
        let out = decode(&rasterize_crop(&png, right, 224).unwrap());
        let Rgb([r, _, b]) = *out.get_pixel(112, 112);
        assert!(b > 150 && r < 100, "expected blue, got r={r} b={b}");

        let left = CropArea { x: 10, ..right };
        let out = decode(&rasterize_crop(&png, left, 224).unwrap());
        let Rgb([r, _, b]) = *out.get_pixel(112, 112);
        assert!(r > 150 && b < 100, "expected red, got r={r} b={b}");
    }

    #[test]
    fn area_past_the_edge_is_clamped() {
        let png = split_png(100, 100);
        let area = CropArea {
            x: 60,
            y: 60,
            width: 80,
            height: 80,
        };
        let out = decode(&rasterize_crop(&png, area, 224).unwrap());
        assert_eq!(out.dimensions(), (224, 224));
    }

    #[test]
    fn area_outside_the_image_is_rejected() {
        let png = split_png(100, 100);
        let area = CropArea {
            x: 100,
            y: 0,
            width: 10,
            height: 10,
        };
        assert!(matches!(
            rasterize_crop(&png, area, 224),
            Err(RasterError::EmptyCrop(_))
        ));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let area = CropArea {
            x: 0,
            y: 0,
            width: 1,
            height: 1,
        };
        assert!(matches!(
            rasterize_crop(b"definitely not an image", area, 224),
            Err(RasterError::Decode(_))
        ));
    }

    #[test]
    fn one_decode_serves_every_crop() {
        let source = SourceImage::decode(&split_png(400, 200)).unwrap();
        assert_eq!(source.dimensions(), (400, 200));

        let right = CropArea {
            x: 220,
            y: 10,
            width: 150,
            height: 150,
        };
        let left = CropArea { x: 10, ..right };
        let Rgb([_, _, b]) = *decode(&source.rasterize(right, 224).unwrap()).get_pixel(112, 112);
        assert!(b > 150);
        let Rgb([r, _, _]) = *decode(&source.rasterize(left, 224).unwrap()).get_pixel(112, 112);
        assert!(r > 150);
    }

    #[test]
    fn only_decodable_mime_types_are_accepted() {
        for mime in ["image/jpeg", "image/png", "image/webp", "image/gif", "image/bmp", "IMAGE/PNG"] {
            assert!(is_decodable_mime(mime), "{mime}");
        }
        for mime in ["image/avif", "image/svg+xml", "image/x-icon", "image/heic", "text/plain", ""] {
            assert!(!is_decodable_mime(mime), "{mime}");
        }
    }

    #[test]
    fn formats_outside_the_allow_list_fail_to_decode() {
        let area = CropArea {
            x: 0,
            y: 0,
            width: 1,
            height: 1,
        };
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"/>"#;
        assert!(matches!(
            rasterize_crop(svg, area, 224),
            Err(RasterError::Decode(_))
        ));
    }
}
