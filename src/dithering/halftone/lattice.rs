//! Lattice-Boltzmann style relaxation.
//!
//! A scalar lattice starting at zero repeatedly relaxes toward the quantized
//! image (collision) and leaks into its eight toroidal neighbours
//! (streaming). The settled lattice is binarized.

use crate::{
    dithering::{
        QUANTIZATION_LEVELS, SCALE, THRESHOLD,
        quantize::{quantize, threshold},
    },
    error::Result,
    params::{Attribute, Params},
    texture::Texture,
};

const RELAXATION_TIME: Attribute = Attribute::range("relaxationTime", 0.1, 2.0, 0.1, 1.0);
const ITERATION_COUNT: Attribute = Attribute::range("iterationCount", 1.0, 50.0, 1.0, 10.0);
const DIFFUSION_STRENGTH: Attribute =
    Attribute::range("diffusionStrength", 0.0, 1.0, 0.1, 0.5);

pub(crate) const ATTRIBUTES: &[Attribute] = &[
    SCALE,
    QUANTIZATION_LEVELS,
    THRESHOLD,
    RELAXATION_TIME,
    ITERATION_COUNT,
    DIFFUSION_STRENGTH,
];

const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeSettings {
    pub levels: u32,
    pub threshold: f32,
    pub relaxation_time: f32,
    pub iterations: usize,
    pub diffusion_strength: f32,
}

impl LatticeSettings {
    pub fn from_params(params: &Params) -> Result<Self> {
        Ok(Self {
            levels: params.count(QUANTIZATION_LEVELS.name)? as u32,
            threshold: params.float(THRESHOLD.name)?,
            relaxation_time: params.float(RELAXATION_TIME.name)?,
            iterations: params.count(ITERATION_COUNT.name)?,
            diffusion_strength: params.float(DIFFUSION_STRENGTH.name)?,
        })
    }
}

#[inline]
fn wrap(value: usize, delta: isize, len: usize) -> usize {
    (value as isize + delta).rem_euclid(len as isize) as usize
}

/// Run the collision and streaming passes, returning the settled lattice.
pub fn relax(plane: &Texture<f32>, settings: &LatticeSettings) -> Texture<f32> {
    let (width, height) = plane.shape();
    let equilibrium = plane.map(|v| quantize(*v, settings.levels));
    let mut lattice: Texture<f32> = Texture::new(width, height);
    let mut streamed: Texture<f32> = Texture::new(width, height);
    let share = settings.diffusion_strength / NEIGHBOURS.len() as f32;
    let kept = 1.0 - settings.diffusion_strength;

    for _ in 0..settings.iterations {
        for (cell, target) in lattice.as_mut().iter_mut().zip(equilibrium.as_ref()) {
            *cell += (target - *cell) / settings.relaxation_time;
        }

        streamed.as_mut().fill(0.0);
        for y in 0..height {
            for x in 0..width {
                let value = lattice.get(x, y);
                for (dx, dy) in NEIGHBOURS {
                    let idx = streamed.idx(wrap(x, dx, width), wrap(y, dy, height));
                    streamed.as_mut()[idx] += value * share;
                }
                let idx = streamed.idx(x, y);
                streamed.as_mut()[idx] += value * kept;
            }
        }
        std::mem::swap(&mut lattice, &mut streamed);
    }
    lattice
}

pub fn lattice_boltzmann(plane: &mut Texture<f32>, settings: &LatticeSettings) {
    let lattice = relax(plane, settings);
    for (pixel, value) in plane.as_mut().iter_mut().zip(lattice.as_ref()) {
        *pixel = threshold(*value, settings.threshold);
    }
}
