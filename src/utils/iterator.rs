/// A grid iterator that yields (x, y, pixel_idx) tuples.
///
/// Inlines down to the same code as a pair of nested loops, while letting
/// the per-pixel passes be written as iterator chains.
#[derive(Debug, Clone, Copy)]
pub struct GridIterator {
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    pixel_idx: usize,
}

impl GridIterator {
    #[inline]
    pub const fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            x: 0,
            y: 0,
            pixel_idx: 0,
        }
    }

    /// Grid covering the full extent of a texture.
    #[inline]
    pub fn over<T>(texture: &crate::texture::Texture<T>) -> Self {
        Self::new(texture.width(), texture.height())
    }
}

impl Iterator for GridIterator {
    type Item = (usize, usize, usize);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.height || self.width == 0 {
            return None;
        }

        let result = (self.x, self.y, self.pixel_idx);

        self.pixel_idx += 1;
        self.x += 1;

        if self.x >= self.width {
            self.x = 0;
            self.y += 1;
        }

        Some(result)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridIterator {
    #[inline]
    fn len(&self) -> usize {
        self.width * self.height - self.pixel_idx
    }
}
