//! Image normalizer
//!
//! Decodes uploaded bytes once and re-encodes them into whichever layout a
//! clipboard strategy asks for. Everything happens in memory.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use crate::domain::error::DecodeError;

use super::format::{ClipboardFormat, NormalizedImage};
use super::payload::ImagePayload;

/// Size of the BITMAPFILEHEADER that the clipboard DIB layout omits
pub const BMP_FILE_HEADER_LEN: usize = 14;

/// A successfully decoded upload, ready to be normalized into any format
#[derive(Debug, Clone)]
pub struct DecodedImage {
    image: DynamicImage,
    source_format: ImageFormat,
    original: Vec<u8>,
}

impl DecodedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Whether the source pixels carry an alpha channel
    pub fn has_alpha(&self) -> bool {
        self.image.color().has_alpha()
    }

    /// Container format the upload was decoded from
    pub fn source_format(&self) -> ImageFormat {
        self.source_format
    }

    /// The uploaded bytes, untouched
    pub fn original(&self) -> &[u8] {
        &self.original
    }

    /// Size of the uploaded bytes
    pub fn original_len(&self) -> usize {
        self.original.len()
    }
}

/// Converts uploads into clipboard-native layouts
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageNormalizer;

impl ImageNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Decode a payload into a pixel grid.
    ///
    /// The container is sniffed from magic bytes; the declared MIME type is
    /// only consulted when sniffing fails.
    pub fn decode(&self, payload: ImagePayload) -> Result<DecodedImage, DecodeError> {
        let sniffed = image::guess_format(payload.data()).ok();
        let source_format = sniffed
            .or_else(|| payload.mime_type().and_then(ImageFormat::from_mime_type))
            .ok_or(DecodeError::UnknownFormat)?;

        let image = image::load_from_memory_with_format(payload.data(), source_format)
            .map_err(|e| DecodeError::Corrupt(e.to_string()))?;

        log::debug!(
            "Decoded {:?} upload: {}x{} {:?}",
            source_format,
            image.width(),
            image.height(),
            image.color()
        );

        Ok(DecodedImage {
            image,
            source_format,
            original: payload.into_data(),
        })
    }

    /// Encode a decoded image into the given clipboard format
    pub fn normalize(
        &self,
        decoded: &DecodedImage,
        format: ClipboardFormat,
    ) -> Result<NormalizedImage, DecodeError> {
        let (width, height) = (decoded.width(), decoded.height());

        let bytes = match format {
            ClipboardFormat::Original => decoded.original.clone(),
            ClipboardFormat::Rgba => decoded.image.to_rgba8().into_raw(),
            ClipboardFormat::Dib => {
                let bmp = encode(&opaque_or_rgba(decoded, format), ImageFormat::Bmp, format)?;
                strip_bmp_file_header(bmp)?
            }
            ClipboardFormat::Tiff => {
                encode(&opaque_or_rgba(decoded, format), ImageFormat::Tiff, format)?
            }
            ClipboardFormat::Png => {
                encode(&opaque_or_rgba(decoded, format), ImageFormat::Png, format)?
            }
        };

        Ok(NormalizedImage::new(format, width, height, bytes))
    }
}

/// Reduce the image to 8-bit RGB or RGBA, compositing onto white when the
/// target cannot hold alpha.
fn opaque_or_rgba(decoded: &DecodedImage, format: ClipboardFormat) -> DynamicImage {
    if decoded.has_alpha() {
        if format.supports_alpha() {
            DynamicImage::ImageRgba8(decoded.image.to_rgba8())
        } else {
            DynamicImage::ImageRgb8(flatten_onto_white(&decoded.image))
        }
    } else {
        DynamicImage::ImageRgb8(decoded.image.to_rgb8())
    }
}

/// Composite every pixel over an opaque white background
pub fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut flattened = RgbImage::new(width, height);

    for (src, dst) in rgba.pixels().zip(flattened.pixels_mut()) {
        let [r, g, b, a] = src.0;
        *dst = Rgb([over_white(r, a), over_white(g, a), over_white(b, a)]);
    }

    flattened
}

fn over_white(channel: u8, alpha: u8) -> u8 {
    let (c, a) = (u32::from(channel), u32::from(alpha));
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}

fn encode(
    image: &DynamicImage,
    container: ImageFormat,
    format: ClipboardFormat,
) -> Result<Vec<u8>, DecodeError> {
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, container)
        .map_err(|e| DecodeError::Encode {
            format: format.as_str(),
            message: e.to_string(),
        })?;
    Ok(cursor.into_inner())
}

fn strip_bmp_file_header(mut bmp: Vec<u8>) -> Result<Vec<u8>, DecodeError> {
    if bmp.len() <= BMP_FILE_HEADER_LEN || !bmp.starts_with(b"BM") {
        return Err(DecodeError::Encode {
            format: ClipboardFormat::Dib.as_str(),
            message: "encoder produced an invalid BMP container".to_string(),
        });
    }
    bmp.drain(..BMP_FILE_HEADER_LEN);
    Ok(bmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgba, RgbaImage};

    const SIZE: u32 = 48;

    fn png_bytes(image: DynamicImage) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        image.write_to(&mut cursor, ImageFormat::Png).unwrap();
        cursor.into_inner()
    }

    fn decode(bytes: Vec<u8>) -> DecodedImage {
        ImageNormalizer::new()
            .decode(ImagePayload::new(bytes, None).unwrap())
            .unwrap()
    }

    /// Rebuild a BMP file around a clipboard DIB so the image crate can read it
    fn dib_to_rgb(dib: &[u8]) -> RgbImage {
        let info_len = u32::from_le_bytes([dib[0], dib[1], dib[2], dib[3]]);
        let file_len = (BMP_FILE_HEADER_LEN + dib.len()) as u32;
        let pixel_offset = BMP_FILE_HEADER_LEN as u32 + info_len;

        let mut bmp = Vec::with_capacity(file_len as usize);
        bmp.extend_from_slice(b"BM");
        bmp.extend_from_slice(&file_len.to_le_bytes());
        bmp.extend_from_slice(&[0, 0, 0, 0]);
        bmp.extend_from_slice(&pixel_offset.to_le_bytes());
        bmp.extend_from_slice(dib);

        image::load_from_memory_with_format(&bmp, ImageFormat::Bmp)
            .unwrap()
            .to_rgb8()
    }

    fn checkerboard_with_holes() -> RgbaImage {
        RgbaImage::from_fn(SIZE, SIZE, |x, y| match (x + y) % 3 {
            0 => Rgba([0, 0, 0, 0]),
            1 => Rgba([(x * 5) as u8, (y * 5) as u8, 40, 255]),
            _ => Rgba([255, 0, 0, 128]),
        })
    }

    fn gradient() -> RgbImage {
        RgbImage::from_fn(SIZE, SIZE, |x, y| {
            Rgb([(x * 5) as u8, (y * 5) as u8, ((x + y) * 2) as u8])
        })
    }

    #[test]
    fn transparent_pixels_become_white_in_dib() {
        let source = checkerboard_with_holes();
        let decoded = decode(png_bytes(DynamicImage::ImageRgba8(source.clone())));
        assert!(decoded.has_alpha());

        let dib = ImageNormalizer::new()
            .normalize(&decoded, ClipboardFormat::Dib)
            .unwrap();
        let pixels = dib_to_rgb(dib.bytes());

        for (x, y, src) in source.enumerate_pixels() {
            let out = pixels.get_pixel(x, y);
            match src.0[3] {
                0 => assert_eq!(out, &Rgb([255, 255, 255]), "pixel {},{}", x, y),
                255 => assert_eq!(out.0, [src.0[0], src.0[1], src.0[2]]),
                _ => assert_eq!(out, &Rgb([255, 127, 127])),
            }
        }
    }

    #[test]
    fn dib_has_no_file_header() {
        let decoded = decode(png_bytes(DynamicImage::ImageRgb8(gradient())));
        let dib = ImageNormalizer::new()
            .normalize(&decoded, ClipboardFormat::Dib)
            .unwrap();

        assert!(!dib.bytes().starts_with(b"BM"));
        let info_len = u32::from_le_bytes(dib.bytes()[0..4].try_into().unwrap());
        assert!(info_len >= 40);
        assert_eq!((dib.width(), dib.height()), (SIZE, SIZE));
    }

    #[test]
    fn opaque_image_survives_dib_unchanged() {
        let source = gradient();
        let decoded = decode(png_bytes(DynamicImage::ImageRgb8(source.clone())));
        assert!(!decoded.has_alpha());

        let dib = ImageNormalizer::new()
            .normalize(&decoded, ClipboardFormat::Dib)
            .unwrap();
        assert_eq!(dib_to_rgb(dib.bytes()), source);
    }

    #[test]
    fn opaque_image_survives_png_and_tiff_unchanged() {
        let source = gradient();
        let decoded = decode(png_bytes(DynamicImage::ImageRgb8(source.clone())));
        let normalizer = ImageNormalizer::new();

        for (format, container) in [
            (ClipboardFormat::Png, ImageFormat::Png),
            (ClipboardFormat::Tiff, ImageFormat::Tiff),
        ] {
            let out = normalizer.normalize(&decoded, format).unwrap();
            let back = image::load_from_memory_with_format(out.bytes(), container)
                .unwrap()
                .to_rgb8();
            assert_eq!(back, source, "{} changed pixels", format);
        }
    }

    #[test]
    fn grayscale_expands_without_loss() {
        let gray = GrayImage::from_fn(SIZE, SIZE, |x, y| Luma([((x * 3 + y) % 256) as u8]));
        let decoded = decode(png_bytes(DynamicImage::ImageLuma8(gray.clone())));

        let dib = ImageNormalizer::new()
            .normalize(&decoded, ClipboardFormat::Dib)
            .unwrap();
        let rgb = dib_to_rgb(dib.bytes());

        for (x, y, px) in gray.enumerate_pixels() {
            let v = px.0[0];
            assert_eq!(rgb.get_pixel(x, y), &Rgb([v, v, v]));
        }
    }

    #[test]
    fn tiff_keeps_alpha() {
        let source = checkerboard_with_holes();
        let decoded = decode(png_bytes(DynamicImage::ImageRgba8(source.clone())));

        let tiff = ImageNormalizer::new()
            .normalize(&decoded, ClipboardFormat::Tiff)
            .unwrap();
        let back = image::load_from_memory_with_format(tiff.bytes(), ImageFormat::Tiff)
            .unwrap()
            .to_rgba8();
        assert_eq!(back, source);
    }

    #[test]
    fn rgba_is_raw_pixels() {
        let decoded = decode(png_bytes(DynamicImage::ImageRgb8(gradient())));
        let rgba = ImageNormalizer::new()
            .normalize(&decoded, ClipboardFormat::Rgba)
            .unwrap();

        assert_eq!(rgba.len(), (SIZE * SIZE * 4) as usize);
        assert_eq!(&rgba.bytes()[0..4], &[0, 0, 0, 255]);
    }

    #[test]
    fn original_is_passthrough() {
        let bytes = png_bytes(DynamicImage::ImageRgb8(gradient()));
        let decoded = decode(bytes.clone());
        let out = ImageNormalizer::new()
            .normalize(&decoded, ClipboardFormat::Original)
            .unwrap();

        assert_eq!(out.bytes(), bytes.as_slice());
        assert_eq!(decoded.source_format(), ImageFormat::Png);
    }

    #[test]
    fn garbage_is_unknown_format() {
        let payload = ImagePayload::new(vec![0x42; 256], None).unwrap();
        let err = ImageNormalizer::new().decode(payload).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownFormat));
    }

    #[test]
    fn unknown_mime_hint_does_not_help() {
        let payload =
            ImagePayload::new(vec![0x42; 256], Some("image/x-unheard-of".into())).unwrap();
        let err = ImageNormalizer::new().decode(payload).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownFormat));
    }

    #[test]
    fn truncated_png_is_corrupt() {
        let mut bytes = png_bytes(DynamicImage::ImageRgb8(gradient()));
        bytes.truncate(120);
        let payload = ImagePayload::new(bytes, Some("image/png".into())).unwrap();

        let err = ImageNormalizer::new().decode(payload).unwrap_err();
        assert!(matches!(err, DecodeError::Corrupt(_)));
        assert_eq!(err.kind(), crate::domain::ErrorKind::DecodeError);
    }

    #[test]
    fn over_white_bounds() {
        assert_eq!(over_white(0, 0), 255);
        assert_eq!(over_white(17, 255), 17);
        assert_eq!(over_white(0, 255), 0);
    }
}
