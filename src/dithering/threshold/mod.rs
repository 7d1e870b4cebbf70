pub mod matrices;
pub mod void_and_cluster;

use rand::Rng;

use crate::{
    dithering::{
        DITHERING_STRENGTH, QUANTIZATION_LEVELS, SCALE, THRESHOLD,
        error_diffusion::{matrices::FLOYD_STEINBERG, spread_error},
        quantize::{quantize, threshold},
    },
    error::Result,
    params::{Attribute, Params},
    texture::Texture,
    utils::{iterator::GridIterator, num::snap_matrix_side, transform::precompute_tiled_rows},
};
use matrices::{MAX_MATRIX_SIDE, ThresholdMatrix};

const BAYER_SIZE: Attribute = Attribute::range("matrixSize", 2.0, 8.0, 2.0, 4.0);
/// Recursion order, 1 (2x2) to 6 (64x64).
const CLUSTERED_ORDER: Attribute = Attribute::range("matrixSize", 1.0, 6.0, 1.0, 2.0);
const DISPERSED_SIZE: Attribute = Attribute::range("matrixSize", 2.0, 16.0, 2.0, 4.0);
const DISPERSED_STRENGTH: Attribute = Attribute::range("ditheringStrength", 0.0, 1.0, 0.1, 1.0);
const VOID_PROPAGATION: Attribute =
    Attribute::range("errorPropagationFactor", 0.0, 1.0, 0.1, 0.8);
const CLUSTERING_STRENGTH: Attribute =
    Attribute::range("clusteringStrength", 0.1, 2.0, 0.1, 1.0);
const VOID_SELECTION: Attribute = Attribute::range("voidSelectionMethod", 0.0, 1.0, 0.1, 0.5);
const CHECKERBOARD_SIZE: Attribute = Attribute::range("checkerboardSize", 1.0, 20.0, 1.0, 2.0);
const INVERT_PATTERN: Attribute = Attribute::boolean("invertPattern", false);

const BAYER_ATTRIBUTES: &[Attribute] = &[
    SCALE,
    QUANTIZATION_LEVELS,
    THRESHOLD,
    DITHERING_STRENGTH,
    BAYER_SIZE,
];

const CLUSTERED_ATTRIBUTES: &[Attribute] = &[
    SCALE,
    QUANTIZATION_LEVELS,
    THRESHOLD,
    DITHERING_STRENGTH,
    CLUSTERED_ORDER,
];

const DISPERSED_ATTRIBUTES: &[Attribute] = &[
    SCALE,
    QUANTIZATION_LEVELS,
    THRESHOLD,
    DISPERSED_STRENGTH,
    DISPERSED_SIZE,
];

const VOID_AND_CLUSTER_ATTRIBUTES: &[Attribute] = &[
    SCALE,
    QUANTIZATION_LEVELS,
    THRESHOLD,
    VOID_PROPAGATION,
    DITHERING_STRENGTH,
    CLUSTERING_STRENGTH,
    VOID_SELECTION,
];

const CHECKERBOARD_ATTRIBUTES: &[Attribute] =
    &[SCALE, THRESHOLD, CHECKERBOARD_SIZE, INVERT_PATTERN];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThresholdType {
    Bayer,
    ClusteredDot,
    DispersedDot,
    /// Shared blue-noise-like matrix plus Floyd-Steinberg carry.
    VoidAndCluster,
    Checkerboard,
}

impl ThresholdType {
    pub fn attributes(self) -> &'static [Attribute] {
        match self {
            ThresholdType::Bayer => BAYER_ATTRIBUTES,
            ThresholdType::ClusteredDot => CLUSTERED_ATTRIBUTES,
            ThresholdType::DispersedDot => DISPERSED_ATTRIBUTES,
            ThresholdType::VoidAndCluster => VOID_AND_CLUSTER_ATTRIBUTES,
            ThresholdType::Checkerboard => CHECKERBOARD_ATTRIBUTES,
        }
    }

    /// Dither the working plane in place. `params` must already be validated
    /// against [ThresholdType::attributes].
    pub fn apply<R: Rng + ?Sized>(
        self,
        plane: &mut Texture<f32>,
        params: &Params,
        rng: &mut R,
    ) -> Result {
        match self {
            ThresholdType::Bayer => {
                let side = snap_matrix_side(params.count(BAYER_SIZE.name)?, 2, 8);
                let settings = OrderedSettings::from_params(params)?;
                ordered_dither(plane, &ThresholdMatrix::bayer(side), &settings);
            }
            ThresholdType::ClusteredDot => {
                let order = params.count(CLUSTERED_ORDER.name)?.clamp(1, 6);
                let settings = OrderedSettings::from_params(params)?;
                clustered_dither(plane, &ThresholdMatrix::clustered(order), &settings);
            }
            ThresholdType::DispersedDot => {
                let side = snap_matrix_side(params.count(DISPERSED_SIZE.name)?, 2, 16);
                let settings = OrderedSettings::from_params(params)?;
                dispersed_dither(plane, &ThresholdMatrix::dispersed(side), &settings);
            }
            ThresholdType::VoidAndCluster => {
                let matrix =
                    void_and_cluster::shared_matrix(params.number(VOID_SELECTION.name)?, rng);
                let settings = VoidAndClusterSettings::from_params(params)?;
                void_and_cluster_dither(plane, matrix, &settings);
            }
            ThresholdType::Checkerboard => {
                let settings = CheckerboardSettings::from_params(params)?;
                checkerboard_dither(plane, &settings);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderedSettings {
    pub levels: u32,
    pub threshold: f32,
    pub strength: f32,
}

impl OrderedSettings {
    pub fn from_params(params: &Params) -> Result<Self> {
        Ok(Self {
            levels: params.count(QUANTIZATION_LEVELS.name)? as u32,
            threshold: params.float(THRESHOLD.name)?,
            strength: params.float(DITHERING_STRENGTH.name)?,
        })
    }

    /// `threshold / 255 + (m - 0.5) * strength`, in the normalized domain.
    #[inline(always)]
    fn cutoff(&self, m: f32) -> f32 {
        self.threshold / 255.0 + (m - 0.5) * self.strength
    }
}

/// Compare every quantized pixel against the tiled matrix.
///
/// `decide(quantized, matrix_value)` returns the output tone.
fn tiled_pass<D>(plane: &mut Texture<f32>, matrix: &ThresholdMatrix, levels: u32, decide: D)
where
    D: Fn(f32, f32) -> f32,
{
    let width = plane.width();
    let side = matrix.side();
    // one row of matrix values per matrix row, already tiled to the plane width
    let rows = precompute_tiled_rows(side, width, |x, y, _| matrix.normalized(x, y));
    for (x, y, idx) in GridIterator::over(plane) {
        let m = rows[(y % side) * width + x];
        let pixel = &mut plane.as_mut()[idx];
        *pixel = decide(quantize(*pixel, levels), m);
    }
}

/// Paper at or above the cutoff, ink below it.
pub fn ordered_dither(
    plane: &mut Texture<f32>,
    matrix: &ThresholdMatrix,
    settings: &OrderedSettings,
) {
    tiled_pass(plane, matrix, settings.levels, |q, m| {
        threshold(q / 255.0, settings.cutoff(m))
    });
}

/// Same cutoff as [ordered_dither], but paper only strictly above it.
pub fn clustered_dither(
    plane: &mut Texture<f32>,
    matrix: &ThresholdMatrix,
    settings: &OrderedSettings,
) {
    tiled_pass(plane, matrix, settings.levels, |q, m| {
        if q / 255.0 > settings.cutoff(m) { 255.0 } else { 0.0 }
    });
}

/// `cutoff = m * 255 * strength + threshold * (1 - strength)`, compared
/// against the quantized value directly.
pub fn dispersed_dither(
    plane: &mut Texture<f32>,
    matrix: &ThresholdMatrix,
    settings: &OrderedSettings,
) {
    let strength = settings.strength;
    let floor = settings.threshold * (1.0 - strength);
    tiled_pass(plane, matrix, settings.levels, |q, m| {
        threshold(q, m * 255.0 * strength + floor)
    });
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoidAndClusterSettings {
    pub levels: u32,
    pub threshold: f32,
    pub propagation: f32,
    pub strength: f32,
    pub clustering: f32,
}

impl VoidAndClusterSettings {
    pub fn from_params(params: &Params) -> Result<Self> {
        Ok(Self {
            levels: params.count(QUANTIZATION_LEVELS.name)? as u32,
            threshold: params.float(THRESHOLD.name)?,
            propagation: params.float(VOID_PROPAGATION.name)?,
            strength: params.float(DITHERING_STRENGTH.name)?,
            clustering: params.float(CLUSTERING_STRENGTH.name)?,
        })
    }
}

/// Matrix biased threshold followed by Floyd-Steinberg carry of the error.
pub fn void_and_cluster_dither(
    plane: &mut Texture<f32>,
    matrix: &ThresholdMatrix,
    settings: &VoidAndClusterSettings,
) {
    debug_assert!(matrix.side() <= MAX_MATRIX_SIDE);
    for (x, y, idx) in GridIterator::over(plane) {
        let m = matrix.normalized(x, y).powf(settings.clustering);
        let old = plane.as_ref()[idx];
        let biased = old + (m - 0.5) * settings.strength * 255.0;
        let new = threshold(quantize(biased, settings.levels), settings.threshold);
        plane.as_mut()[idx] = new;
        spread_error(plane, &FLOYD_STEINBERG, x, y, (old - new) * settings.propagation, false);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckerboardSettings {
    pub threshold: f32,
    pub cell: usize,
    pub invert: bool,
}

impl CheckerboardSettings {
    pub fn from_params(params: &Params) -> Result<Self> {
        Ok(Self {
            threshold: params.float(THRESHOLD.name)?,
            cell: params.count(CHECKERBOARD_SIZE.name)?.max(1),
            invert: params.boolean(INVERT_PATTERN.name)?,
        })
    }
}

/// Alternate the cutoff between `threshold` and `255 - threshold` on a
/// checkerboard of `cell` pixel squares.
pub fn checkerboard_dither(plane: &mut Texture<f32>, settings: &CheckerboardSettings) {
    for (x, y, idx) in GridIterator::over(plane) {
        let even = (x / settings.cell + y / settings.cell) % 2 == 0;
        let cutoff = if even != settings.invert {
            settings.threshold
        } else {
            255.0 - settings.threshold
        };
        let pixel = &mut plane.as_mut()[idx];
        *pixel = threshold(*pixel, cutoff);
    }
}
