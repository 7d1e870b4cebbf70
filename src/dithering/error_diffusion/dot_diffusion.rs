//! Dot diffusion: pixels are visited by class rank instead of raster order,
//! and error only flows to neighbours with a larger class.

use itertools::Itertools;
use rand::{Rng, seq::SliceRandom};

use super::matrices::FLOYD_STEINBERG;
use crate::{
    dithering::{
        QUANTIZATION_LEVELS, SCALE, THRESHOLD,
        quantize::{quantize, threshold},
    },
    error::Result,
    params::{Attribute, Params},
    texture::Texture,
};

const DIFFUSION_FACTOR: Attribute = Attribute::range("diffusionFactor", 0.0, 1.0, 0.1, 0.8);
const CLASS_MATRIX_SIZE: Attribute = Attribute::range("classMatrixSize", 2.0, 8.0, 1.0, 4.0);

pub(crate) const ATTRIBUTES: &[Attribute] = &[
    SCALE,
    QUANTIZATION_LEVELS,
    THRESHOLD,
    DIFFUSION_FACTOR,
    CLASS_MATRIX_SIZE,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotDiffusionSettings {
    pub levels: u32,
    pub threshold: f32,
    pub diffusion_factor: f32,
    pub class_size: usize,
}

impl DotDiffusionSettings {
    pub fn from_params(params: &Params) -> Result<Self> {
        Ok(Self {
            levels: params.count(QUANTIZATION_LEVELS.name)? as u32,
            threshold: params.float(THRESHOLD.name)?,
            diffusion_factor: params.float(DIFFUSION_FACTOR.name)?,
            class_size: params.count(CLASS_MATRIX_SIZE.name)?.max(1),
        })
    }
}

/// `size x size` class matrix holding a random permutation of `0..size²`.
pub fn class_matrix<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Texture<usize> {
    let mut classes: Vec<usize> = (0..size * size).collect();
    classes.shuffle(rng);
    Texture::from_fn(size, size, |x, y| classes[y * size + x])
}

pub fn dot_diffuse<R: Rng + ?Sized>(
    plane: &mut Texture<f32>,
    settings: &DotDiffusionSettings,
    rng: &mut R,
) {
    let classes = class_matrix(settings.class_size, rng);
    dot_diffuse_with(plane, &classes, settings);
}

/// Dot diffusion over a given square class matrix, tiled across the plane.
pub fn dot_diffuse_with(
    plane: &mut Texture<f32>,
    classes: &Texture<usize>,
    settings: &DotDiffusionSettings,
) {
    let size = classes.width();
    let (width, height) = plane.shape();
    let class_of = |x: usize, y: usize| classes.get(x % size, y % size);

    // stable sort keeps raster order inside a class
    let order = (0..width * height).sorted_by_key(|&idx| class_of(idx % width, idx / width));

    for idx in order {
        let (x, y) = (idx % width, idx / width);
        let old = plane.as_ref()[idx];
        let new = threshold(quantize(old, settings.levels), settings.threshold);
        plane.as_mut()[idx] = new;

        let error = (old - new) * settings.diffusion_factor;
        let class = class_of(x, y);
        for (dx, dy, weight) in FLOYD_STEINBERG.weights(false) {
            let (nx, ny) = (x as isize + dx, y as isize + dy);
            let Some(target) = plane.checked_idx(nx, ny) else {
                continue;
            };
            if class_of(nx as usize, ny as usize) > class {
                let value = &mut plane.as_mut()[target];
                *value = (*value + error * weight).clamp(0.0, 255.0);
            }
        }
    }
}
