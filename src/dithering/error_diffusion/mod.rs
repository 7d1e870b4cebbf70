pub mod dot_diffusion;
pub mod matrices;

use rand::Rng;

use crate::{
    dithering::{
        DITHERING_STRENGTH, ERROR_PROPAGATION_FACTOR, QUANTIZATION_LEVELS, SCALE, THRESHOLD,
        quantize::{quantize, threshold},
    },
    error::Result,
    params::{Attribute, Params},
    texture::Texture,
};
use matrices::{
    ATKINSON, FLOYD_STEINBERG, JARVIS_JUDICE_NINKE, Kernel, SIERRA_2, SIERRA_3, SIERRA_LITE,
    STUCKI,
};

const SERPENTINE: Attribute = Attribute::boolean("serpentineProcessing", false);
const GRADIENT_STRENGTH: Attribute = Attribute::range("gradientStrength", 0.0, 1.0, 0.1, 0.5);

const KERNEL_ATTRIBUTES: &[Attribute] = &[
    SCALE,
    QUANTIZATION_LEVELS,
    THRESHOLD,
    ERROR_PROPAGATION_FACTOR,
    DITHERING_STRENGTH,
    SERPENTINE,
];

const GRADIENT_ATTRIBUTES: &[Attribute] = &[
    SCALE,
    QUANTIZATION_LEVELS,
    THRESHOLD,
    ERROR_PROPAGATION_FACTOR,
    DITHERING_STRENGTH,
    GRADIENT_STRENGTH,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorDiffusionType {
    FloydSteinberg,
    JarvisJudiceNinke,
    Atkinson,
    Stucki,
    Sierra3,
    Sierra2,
    SierraLite,
    /// Floyd-Steinberg with diffusion damped along strong edges.
    GradientBased,
    /// Class ordered diffusion, see [dot_diffusion].
    DotDiffusion,
}

impl ErrorDiffusionType {
    pub fn attributes(self) -> &'static [Attribute] {
        match self {
            ErrorDiffusionType::GradientBased => GRADIENT_ATTRIBUTES,
            ErrorDiffusionType::DotDiffusion => dot_diffusion::ATTRIBUTES,
            _ => KERNEL_ATTRIBUTES,
        }
    }

    /// Kernel driving the raster scan. Dot diffusion walks its own order and
    /// always spreads along the Floyd-Steinberg pattern.
    pub fn kernel(self) -> &'static Kernel {
        match self {
            ErrorDiffusionType::FloydSteinberg
            | ErrorDiffusionType::GradientBased
            | ErrorDiffusionType::DotDiffusion => &FLOYD_STEINBERG,
            ErrorDiffusionType::JarvisJudiceNinke => &JARVIS_JUDICE_NINKE,
            ErrorDiffusionType::Atkinson => &ATKINSON,
            ErrorDiffusionType::Stucki => &STUCKI,
            ErrorDiffusionType::Sierra3 => &SIERRA_3,
            ErrorDiffusionType::Sierra2 => &SIERRA_2,
            ErrorDiffusionType::SierraLite => &SIERRA_LITE,
        }
    }

    /// Dither the working plane in place. `params` must already be validated
    /// against [ErrorDiffusionType::attributes].
    pub fn apply<R: Rng + ?Sized>(
        self,
        plane: &mut Texture<f32>,
        params: &Params,
        rng: &mut R,
    ) -> Result {
        match self {
            ErrorDiffusionType::DotDiffusion => {
                let settings = dot_diffusion::DotDiffusionSettings::from_params(params)?;
                dot_diffusion::dot_diffuse(plane, &settings, rng);
            }
            ErrorDiffusionType::GradientBased => {
                let settings = DiffusionSettings::from_params(params, false)?;
                let gradient_strength = params.float(GRADIENT_STRENGTH.name)?;
                error_diffuse(plane, self.kernel(), &settings, |plane, x, y| {
                    1.0 - (central_gradient(plane, x, y) / 255.0) * gradient_strength
                });
            }
            _ => {
                let serpentine = params.boolean(SERPENTINE.name)?;
                let settings = DiffusionSettings::from_params(params, serpentine)?;
                error_diffuse(plane, self.kernel(), &settings, |_, _, _| 1.0);
            }
        }
        Ok(())
    }
}

/// Values shared by every raster scan variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffusionSettings {
    pub levels: u32,
    pub threshold: f32,
    /// errorPropagationFactor * ditheringStrength
    pub error_scale: f32,
    pub serpentine: bool,
}

impl DiffusionSettings {
    pub fn from_params(params: &Params, serpentine: bool) -> Result<Self> {
        Ok(Self {
            levels: params.count(QUANTIZATION_LEVELS.name)? as u32,
            threshold: params.float(THRESHOLD.name)?,
            error_scale: params.float(ERROR_PROPAGATION_FACTOR.name)?
                * params.float(DITHERING_STRENGTH.name)?,
            serpentine,
        })
    }
}

/// Raster scan error diffusion.
///
/// Each pixel is quantized and binarized, then the difference between the
/// old and new value, scaled by `settings.error_scale` and by
/// `attenuation(plane, x, y)`, is spread over the kernel targets that fall
/// inside the plane. With `serpentine` set, odd rows run right to left with
/// the kernel mirrored.
pub fn error_diffuse<A>(
    plane: &mut Texture<f32>,
    kernel: &Kernel,
    settings: &DiffusionSettings,
    attenuation: A,
) where
    A: Fn(&Texture<f32>, usize, usize) -> f32,
{
    let (width, height) = plane.shape();
    for y in 0..height {
        let reverse = settings.serpentine && y % 2 == 1;
        for i in 0..width {
            let x = if reverse { width - 1 - i } else { i };
            let idx = plane.idx(x, y);
            let old = plane.as_ref()[idx];
            let new = threshold(quantize(old, settings.levels), settings.threshold);
            plane.as_mut()[idx] = new;

            let error = (old - new) * settings.error_scale * attenuation(plane, x, y);
            spread_error(plane, kernel, x, y, error, reverse);
        }
    }
}

/// Add `error * weight` to every in-bounds kernel target of (x, y).
#[inline]
pub(crate) fn spread_error(
    plane: &mut Texture<f32>,
    kernel: &Kernel,
    x: usize,
    y: usize,
    error: f32,
    mirror: bool,
) {
    if error == 0.0 {
        return;
    }
    for (dx, dy, weight) in kernel.weights(mirror) {
        if let Some(target) = plane.checked_idx(x as isize + dx, y as isize + dy) {
            plane.as_mut()[target] += error * weight;
        }
    }
}

/// Central difference gradient magnitude, reading 0 outside the plane.
fn central_gradient(plane: &Texture<f32>, x: usize, y: usize) -> f32 {
    let at = |dx: isize, dy: isize| {
        plane
            .checked_idx(x as isize + dx, y as isize + dy)
            .map_or(0.0, |idx| plane.as_ref()[idx])
    };
    let gx = (at(1, 0) - at(-1, 0)) / 2.0;
    let gy = (at(0, 1) - at(0, -1)) / 2.0;
    (gx * gx + gy * gy).sqrt()
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn settings(serpentine: bool) -> DiffusionSettings {
        DiffusionSettings {
            levels: 2,
            threshold: 128.0,
            error_scale: 1.0,
            serpentine,
        }
    }

    #[test]
    fn test_serpentine_fixture() {
        let mut plane = Texture::from_vec(3, 3, vec![200.0; 9]).unwrap();
        error_diffuse(&mut plane, &FLOYD_STEINBERG, &settings(true), |_, _, _| 1.0);
        assert_eq!(plane.len(), 9);
        #[rustfmt::skip]
        let expected = [
            255.0, 255.0, 255.0,
            255.0,   0.0, 255.0,
            255.0, 255.0, 255.0,
        ];
        assert_eq!(plane.as_ref(), &expected);
    }

    #[test]
    fn test_error_scale_zero_is_plain_threshold() {
        let values: Vec<f32> = (0..16).map(|v| v as f32 * 16.0).collect();
        let mut plane = Texture::from_vec(4, 4, values.clone()).unwrap();
        let settings = DiffusionSettings {
            error_scale: 0.0,
            ..settings(false)
        };
        error_diffuse(&mut plane, &STUCKI, &settings, |_, _, _| 1.0);
        for (out, v) in plane.as_ref().iter().zip(values) {
            assert_eq!(*out, threshold(quantize(v, 2), 128.0));
        }
    }

    #[test]
    fn test_error_spreads_forward() {
        // a single dark pixel above the cutoff pushes error right and down
        let mut plane = Texture::from_vec(2, 2, vec![100.0, 0.0, 0.0, 0.0]).unwrap();
        let kernel = &FLOYD_STEINBERG;
        spread_error(&mut plane, kernel, 0, 0, 16.0, false);
        assert_eq!(plane.as_ref(), &[100.0, 7.0, 5.0, 1.0]);
    }

    #[test]
    fn test_mirrored_spread_drops_out_of_bounds() {
        let mut plane = Texture::from_vec(2, 2, vec![0.0; 4]).unwrap();
        spread_error(&mut plane, &FLOYD_STEINBERG, 0, 0, 16.0, true);
        // (-1, 0) and (-1, 1) fall off the left edge
        assert_eq!(plane.as_ref(), &[0.0, 0.0, 5.0, 3.0]);
    }

    fn run(kind: ErrorDiffusionType, params: &Params, plane: &Texture<f32>) -> Texture<f32> {
        let mut out = plane.clone();
        kind.apply(&mut out, params, &mut StdRng::seed_from_u64(0)).unwrap();
        out
    }

    #[test]
    fn test_zero_gradient_strength_is_floyd_steinberg() {
        let plane = Texture::from_fn(12, 9, |x, y| ((x * 53 + y * 29) % 256) as f32);
        let floyd = Params::defaults(KERNEL_ATTRIBUTES);
        let gradient = Params::defaults(GRADIENT_ATTRIBUTES).with(GRADIENT_STRENGTH.name, 0.0);
        assert_eq!(
            run(ErrorDiffusionType::GradientBased, &gradient, &plane),
            run(ErrorDiffusionType::FloydSteinberg, &floyd, &plane),
        );
    }

    #[test]
    fn test_gradient_damps_error_across_an_edge() {
        // gradient at (0, 0) is 37.5, so the carried 127 * 7/16 shrinks by 37.5/255
        let plane = Texture::from_vec(2, 1, vec![127.0, 75.0]).unwrap();
        let floyd = Params::defaults(KERNEL_ATTRIBUTES);
        let floyd = run(ErrorDiffusionType::FloydSteinberg, &floyd, &plane);
        assert_eq!(floyd.as_ref(), &[0.0, 255.0]);

        let params = Params::defaults(GRADIENT_ATTRIBUTES).with(GRADIENT_STRENGTH.name, 1.0);
        let damped = run(ErrorDiffusionType::GradientBased, &params, &plane);
        assert_eq!(damped.as_ref(), &[0.0, 0.0]);
    }

    #[test]
    fn test_central_gradient() {
        let plane = Texture::from_vec(3, 1, vec![0.0, 50.0, 100.0]).unwrap();
        assert_eq!(central_gradient(&plane, 1, 0), 50.0);
        // left neighbour reads 0 outside the plane
        assert_eq!(central_gradient(&plane, 0, 0), 25.0);
    }
}
