//! Nearest-neighbour resampling used to run every algorithm at a reduced
//! working resolution.

use crate::{
    error::{DitherError, Result},
    texture::Texture,
};

/// Shrink `texture` by `factor`.
///
/// The destination is `floor(w * factor) x floor(h * factor)` and pixel
/// (x, y) samples source pixel (floor(x / factor), floor(y / factor)),
/// clamped to the source bounds. `factor == 1` returns an unchanged copy.
pub fn downscale<T: Copy>(texture: &Texture<T>, factor: f64) -> Result<Texture<T>> {
    if !(factor.is_finite() && factor > 0.0 && factor <= 1.0) {
        return Err(DitherError::invalid_parameter(
            "scale",
            format!("{factor} is outside (0, 1]"),
        ));
    }
    texture.ensure_not_empty()?;
    if factor == 1.0 {
        return Ok(texture.clone());
    }

    let (src_w, src_h) = texture.shape();
    let width = (src_w as f64 * factor).floor() as usize;
    let height = (src_h as f64 * factor).floor() as usize;
    if width == 0 || height == 0 {
        return Err(DitherError::DimensionMismatch {
            width,
            height,
            reason: "scale leaves no pixels",
        });
    }

    let src_xs: Vec<usize> = (0..width)
        .map(|x| ((x as f64 / factor).floor() as usize).min(src_w - 1))
        .collect();
    let src_ys: Vec<usize> = (0..height)
        .map(|y| ((y as f64 / factor).floor() as usize).min(src_h - 1))
        .collect();

    Ok(Texture::from_fn(width, height, |x, y| {
        texture.get(src_xs[x], src_ys[y])
    }))
}

/// Grow `texture` back to `width x height`.
///
/// Pixel (x, y) samples `(min(sw - 1, floor(x * sw / width)),
/// min(sh - 1, floor(y * sh / height)))`.
pub fn upscale<T: Copy>(texture: &Texture<T>, width: usize, height: usize) -> Result<Texture<T>> {
    texture.ensure_not_empty()?;
    if width == 0 || height == 0 {
        return Err(DitherError::DimensionMismatch {
            width,
            height,
            reason: "upscale target must be positive",
        });
    }
    let (src_w, src_h) = texture.shape();
    if (src_w, src_h) == (width, height) {
        return Ok(texture.clone());
    }

    let src_xs: Vec<usize> = (0..width).map(|x| (x * src_w / width).min(src_w - 1)).collect();
    let src_ys: Vec<usize> = (0..height).map(|y| (y * src_h / height).min(src_h - 1)).collect();

    Ok(Texture::from_fn(width, height, |x, y| {
        texture.get(src_xs[x], src_ys[y])
    }))
}
