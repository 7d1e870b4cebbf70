use crate::{
    error::{DitherError, Result},
    texture::{PixelBuffer, Texture},
};
use image::{
    ImageBuffer, ImageFormat, ImageReader, Luma, RgbaImage,
    codecs::png::{CompressionType, FilterType, PngEncoder},
};
use std::path::Path;

/// Decode any format `image` understands into an RGBA8 pixel buffer.
pub fn read_image(path: &Path) -> Result<PixelBuffer> {
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(PixelBuffer::from(image.to_rgba8()))
}

/// Encode a pixel buffer to `path` using `format`.
pub fn write_image(buffer: &PixelBuffer, path: &Path, format: ImageFormat) -> Result {
    let image = to_rgba_image(buffer)?;
    image.save_with_format(path, format)?;
    Ok(())
}

pub fn to_rgba_image(buffer: &PixelBuffer) -> Result<RgbaImage> {
    RgbaImage::from_raw(
        buffer.width() as u32,
        buffer.height() as u32,
        buffer.to_rgba8(),
    )
    .ok_or(DitherError::DimensionMismatch {
        width: buffer.width(),
        height: buffer.height(),
        reason: "pixel data does not fit the image dimensions",
    })
}

/// Write a single channel texture as a grayscale PNG without copying it
/// into an intermediate image.
pub fn write_png_luma(
    texture: &Texture<u8>,
    path: &Path,
    compression: CompressionType,
    filtering: FilterType,
) -> Result {
    let image_buf = ImageBuffer::<Luma<u8>, &[u8]>::from_raw(
        texture.width() as u32,
        texture.height() as u32,
        texture.as_ref(),
    )
    .ok_or(DitherError::DimensionMismatch {
        width: texture.width(),
        height: texture.height(),
        reason: "texture does not fit the image dimensions",
    })?;
    let file = &mut std::io::BufWriter::new(std::fs::File::create(path)?);
    let encoder = PngEncoder::new_with_quality(file, compression, filtering);
    image_buf.write_with_encoder(encoder)?;
    Ok(())
}

/// Resolve an output format from a config string such as `"png"`.
pub fn format_from_name(name: &str) -> Result<ImageFormat> {
    ImageFormat::from_extension(name)
        .ok_or_else(|| DitherError::Config(format!("unsupported output format `{name}`")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::pixel::Rgba;

    #[test]
    fn test_format_from_name() {
        assert_eq!(format_from_name("png").unwrap(), ImageFormat::Png);
        assert_eq!(format_from_name("JPG").unwrap(), ImageFormat::Jpeg);
        assert!(format_from_name("nope").is_err());
    }

    #[test]
    fn test_to_rgba_image_keeps_pixels() {
        let pixels = vec![Rgba::new(1, 2, 3, 4), Rgba::new(5, 6, 7, 8)];
        let buffer = PixelBuffer::from_vec(2, 1, pixels).unwrap();
        let image = to_rgba_image(&buffer).unwrap();
        assert_eq!(image.dimensions(), (2, 1));
        assert_eq!(image.get_pixel(1, 0).0, [5, 6, 7, 8]);
        assert_eq!(PixelBuffer::from(image), buffer);
    }
}
