//! Uniform noise screens.

use rand::Rng;

use crate::{
    dithering::{
        DITHERING_STRENGTH, QUANTIZATION_LEVELS, SCALE, THRESHOLD,
        quantize::{quantize, threshold},
    },
    error::Result,
    params::{Attribute, Params},
    texture::Texture,
};

const NOISE_INTENSITY: Attribute = Attribute::range("noiseIntensity", 0.0, 1.0, 0.1, 0.5);
const FINE_NOISE_INTENSITY: Attribute = Attribute::range("noiseIntensity", 0.0, 1.0, 0.01, 0.5);
const NOISE_STRENGTH: Attribute = Attribute::range("noiseStrength", 0.0, 1.0, 0.01, 0.5);
const PRESERVE_ORIGINAL: Attribute = Attribute::boolean("preserveOriginalColor", false);
const PRESERVE_GRAYS: Attribute = Attribute::boolean("preserveGrays", false);

/// Values outside this range pass through White Noise untouched when
/// `preserveGrays` is set.
const PRESERVED_SHADOW: f32 = 10.0;
const PRESERVED_HIGHLIGHT: f32 = 245.0;

pub(crate) const STOCHASTIC_ATTRIBUTES: &[Attribute] = &[
    SCALE,
    QUANTIZATION_LEVELS,
    THRESHOLD,
    NOISE_INTENSITY,
    DITHERING_STRENGTH,
];

pub(crate) const ADDITIVE_ATTRIBUTES: &[Attribute] = &[
    SCALE,
    QUANTIZATION_LEVELS,
    THRESHOLD,
    NOISE_STRENGTH,
    PRESERVE_ORIGINAL,
];

pub(crate) const WHITE_NOISE_ATTRIBUTES: &[Attribute] = &[
    SCALE,
    QUANTIZATION_LEVELS,
    THRESHOLD,
    FINE_NOISE_INTENSITY,
    PRESERVE_GRAYS,
];

/// Uniform sample in `[-amplitude * 255, amplitude * 255)`.
#[inline]
pub fn symmetric_noise<R: Rng + ?Sized>(rng: &mut R, amplitude: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * 2.0 * amplitude * 255.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StochasticSettings {
    pub levels: u32,
    pub threshold: f32,
    pub intensity: f32,
    pub strength: f32,
}

impl StochasticSettings {
    pub fn from_params(params: &Params) -> Result<Self> {
        Ok(Self {
            levels: params.count(QUANTIZATION_LEVELS.name)? as u32,
            threshold: params.float(THRESHOLD.name)?,
            intensity: params.float(NOISE_INTENSITY.name)?,
            strength: params.float(DITHERING_STRENGTH.name)?,
        })
    }
}

/// Ink where `quantize(v) + noise * strength < threshold`.
pub fn stochastic_screen<R: Rng + ?Sized>(
    plane: &mut Texture<f32>,
    settings: &StochasticSettings,
    rng: &mut R,
) {
    for pixel in plane.as_mut() {
        let noise = symmetric_noise(rng, settings.intensity) * settings.strength;
        *pixel = threshold(quantize(*pixel, settings.levels) + noise, settings.threshold);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdditiveSettings {
    pub levels: u32,
    pub threshold: f32,
    pub strength: f32,
    pub preserve_original: bool,
}

impl AdditiveSettings {
    pub fn from_params(params: &Params) -> Result<Self> {
        Ok(Self {
            levels: params.count(QUANTIZATION_LEVELS.name)? as u32,
            threshold: params.float(THRESHOLD.name)?,
            strength: params.float(NOISE_STRENGTH.name)?,
            preserve_original: params.boolean(PRESERVE_ORIGINAL.name)?,
        })
    }
}

/// Noise added to the pixel, clamped, then quantized and binarized.
/// With `preserve_original`, paper pixels keep their source tone.
pub fn additive_noise<R: Rng + ?Sized>(
    plane: &mut Texture<f32>,
    settings: &AdditiveSettings,
    rng: &mut R,
) {
    for pixel in plane.as_mut() {
        let old = *pixel;
        let noisy = (old + symmetric_noise(rng, settings.strength)).clamp(0.0, 255.0);
        let new = threshold(quantize(noisy, settings.levels), settings.threshold);
        *pixel = if settings.preserve_original && new == 255.0 { old } else { new };
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhiteNoiseSettings {
    pub levels: u32,
    pub threshold: f32,
    pub intensity: f32,
    pub preserve_grays: bool,
}

impl WhiteNoiseSettings {
    pub fn from_params(params: &Params) -> Result<Self> {
        Ok(Self {
            levels: params.count(QUANTIZATION_LEVELS.name)? as u32,
            threshold: params.float(THRESHOLD.name)?,
            intensity: params.float(FINE_NOISE_INTENSITY.name)?,
            preserve_grays: params.boolean(PRESERVE_GRAYS.name)?,
        })
    }
}

/// Noise added to the cutoff instead of the pixel.
pub fn white_noise<R: Rng + ?Sized>(
    plane: &mut Texture<f32>,
    settings: &WhiteNoiseSettings,
    rng: &mut R,
) {
    for pixel in plane.as_mut() {
        // drawn for every pixel so the stream doesn't depend on the content
        let noise = symmetric_noise(rng, settings.intensity);
        let old = *pixel;
        if settings.preserve_grays && !(PRESERVED_SHADOW..=PRESERVED_HIGHLIGHT).contains(&old) {
            continue;
        }
        *pixel = threshold(quantize(old, settings.levels), settings.threshold + noise);
    }
}
