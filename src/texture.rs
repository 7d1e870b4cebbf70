use crate::{
    error::{DitherError, Result},
    utils::pixel::Rgba,
};

pub type TextureShape = (usize, usize);

/// Canonical image representation handed to the engine: RGBA8, row-major,
/// origin top-left.
pub type PixelBuffer = Texture<Rgba>;

/// Texture with owned buffer.
///
/// Used both for RGBA pixel buffers and for the single-channel `f32`
/// working plane the algorithms operate on.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture<T> {
    width: usize,
    height: usize,
    buffer: Vec<T>,
}

impl<T> AsRef<[T]> for Texture<T> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        &self.buffer
    }
}

impl<T> AsMut<[T]> for Texture<T> {
    #[inline]
    fn as_mut(&mut self) -> &mut [T] {
        &mut self.buffer
    }
}

impl<T> Texture<T> {
    /// Wrap an existing buffer. Fails when the buffer length doesn't match
    /// the dimensions.
    pub fn from_vec(width: usize, height: usize, buffer: Vec<T>) -> Result<Self> {
        if buffer.len() != width * height {
            return Err(DitherError::DimensionMismatch {
                width,
                height,
                reason: "buffer length does not match width * height",
            });
        }
        Ok(Self {
            width,
            height,
            buffer,
        })
    }

    /// Build a texture by evaluating `f(x, y)` for every texel in raster order.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut buffer = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                buffer.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            buffer,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn shape(&self) -> TextureShape {
        (self.width, self.height)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Flat index of a texel.
    #[inline(always)]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Flat index of a signed coordinate, `None` when it falls outside.
    #[inline(always)]
    pub fn checked_idx(&self, x: isize, y: isize) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as isize || y >= self.height as isize {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Map every texel into a new texture of the same shape.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Texture<U> {
        Texture {
            width: self.width,
            height: self.height,
            buffer: self.buffer.iter().map(f).collect(),
        }
    }

    /// Fails with [DitherError::DimensionMismatch] on a zero-sized texture.
    pub fn ensure_not_empty(&self) -> Result {
        if self.width == 0 || self.height == 0 {
            return Err(DitherError::DimensionMismatch {
                width: self.width,
                height: self.height,
                reason: "width and height must be positive",
            });
        }
        Ok(())
    }
}

impl<T: Copy> Texture<T> {
    #[inline(always)]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.buffer[y * self.width + x]
    }

    #[inline(always)]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        self.buffer[y * self.width + x] = value;
    }
}

impl<T: Default + Copy> Texture<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            buffer: vec![T::default(); width * height],
        }
    }
}

impl Texture<Rgba> {
    /// Build a pixel buffer from tightly packed RGBA8 bytes.
    pub fn from_rgba8(width: usize, height: usize, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != width * height * 4 {
            return Err(DitherError::DimensionMismatch {
                width,
                height,
                reason: "byte length does not match width * height * 4",
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|px| Rgba::new(px[0], px[1], px[2], px[3]))
            .collect();
        Texture::from_vec(width, height, pixels)
    }

    /// Flatten back into tightly packed RGBA8 bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.buffer.iter().flat_map(|px| px.to_u8_array()).collect()
    }

    /// Single-channel luminance plane the algorithms work on.
    pub fn luma_plane(&self) -> Texture<f32> {
        self.map(Rgba::luma)
    }

    /// Overwrite with gray pixels taken from `plane`, alpha forced to 255.
    ///
    /// # Panics
    /// Panics when shapes don't match.
    pub fn fill_from_plane(&mut self, plane: &Texture<f32>) {
        assert_eq!(self.shape(), plane.shape(), "plane and buffer shapes differ");
        self.buffer
            .iter_mut()
            .zip(plane.as_ref())
            .for_each(|(dst, value)| *dst = Rgba::gray(*value));
    }
}

impl From<image::RgbaImage> for Texture<Rgba> {
    fn from(value: image::RgbaImage) -> Self {
        let (width, height) = value.dimensions();
        Texture {
            width: width as usize,
            height: height as usize,
            buffer: value.pixels().map(|pixel| Rgba::from_u8_array(&pixel.0)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        let err = Texture::from_vec(3, 3, vec![0.0f32; 8]).unwrap_err();
        assert!(matches!(err, DitherError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_checked_idx_bounds() {
        let texture: Texture<f32> = Texture::new(4, 2);
        assert_eq!(texture.checked_idx(0, 0), Some(0));
        assert_eq!(texture.checked_idx(3, 1), Some(7));
        assert_eq!(texture.checked_idx(-1, 0), None);
        assert_eq!(texture.checked_idx(4, 0), None);
        assert_eq!(texture.checked_idx(0, 2), None);
    }

    #[test]
    fn test_rgba8_round_trip_bytes() {
        let bytes: Vec<u8> = (0..24).collect();
        let buffer = PixelBuffer::from_rgba8(3, 2, &bytes).unwrap();
        assert_eq!(buffer.get(1, 0), Rgba::new(4, 5, 6, 7));
        assert_eq!(buffer.to_rgba8(), bytes);
    }

    #[test]
    fn test_fill_from_plane_forces_gray_and_opaque() {
        let mut buffer = PixelBuffer::from_vec(2, 1, vec![Rgba::new(1, 2, 3, 0); 2]).unwrap();
        let plane = Texture::from_vec(2, 1, vec![10.4, 300.0]).unwrap();
        buffer.fill_from_plane(&plane);
        assert_eq!(buffer.as_ref(), &[Rgba::new(10, 10, 10, 255), Rgba::new(255, 255, 255, 255)]);
    }

    #[test]
    fn test_ensure_not_empty() {
        assert!(Texture::<f32>::new(0, 5).ensure_not_empty().is_err());
        assert!(Texture::<f32>::new(5, 5).ensure_not_empty().is_ok());
    }
}
