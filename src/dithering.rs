use rand::Rng;
use tracing::debug;

use crate::{
    dithering::{
        error_diffusion::ErrorDiffusionType, halftone::HalftoneType, threshold::ThresholdType,
    },
    error::Result,
    params::{Attribute, Params},
    scaling::{downscale, upscale},
    texture::PixelBuffer,
};

pub mod error_diffusion;
pub mod halftone;
pub mod quantize;
pub mod threshold;

/// Working resolution as a fraction of the input.
pub(crate) const SCALE: Attribute = Attribute::range("scale", 0.1, 1.0, 0.1, 1.0);
pub(crate) const QUANTIZATION_LEVELS: Attribute =
    Attribute::range("quantizationLevels", 2.0, 16.0, 1.0, 2.0);
pub(crate) const THRESHOLD: Attribute = Attribute::range("threshold", 0.0, 255.0, 1.0, 128.0);
pub(crate) const DITHERING_STRENGTH: Attribute =
    Attribute::range("ditheringStrength", 0.0, 2.0, 0.1, 1.0);
pub(crate) const ERROR_PROPAGATION_FACTOR: Attribute =
    Attribute::range("errorPropagationFactor", 0.0, 1.0, 0.1, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DitheringType {
    ErrorDiffusion(ErrorDiffusionType),
    Ordered(ThresholdType),
    Halftone(HalftoneType),
}

impl DitheringType {
    /// Every attribute the algorithm reads, `scale` included.
    pub fn attributes(self) -> &'static [Attribute] {
        match self {
            Self::ErrorDiffusion(etype) => etype.attributes(),
            Self::Ordered(ttype) => ttype.attributes(),
            Self::Halftone(htype) => htype.attributes(),
        }
    }

    /// Run the algorithm on `buffer`.
    ///
    /// The parameters are validated, the luminance plane is shrunk by
    /// `scale`, dithered, grown back and written into `buffer` as opaque
    /// gray. `buffer` is left untouched when any step fails.
    pub fn dither<R: Rng + ?Sized>(
        self,
        buffer: &mut PixelBuffer,
        params: &Params,
        rng: &mut R,
    ) -> Result {
        params.validate(self.attributes())?;
        buffer.ensure_not_empty()?;

        let (width, height) = buffer.shape();
        let scale = params.number(SCALE.name)?;
        let mut plane = downscale(&buffer.luma_plane(), scale)?;
        debug!(
            algorithm = ?self,
            width,
            height,
            working_width = plane.width(),
            working_height = plane.height(),
            "dither"
        );

        match self {
            Self::ErrorDiffusion(etype) => etype.apply(&mut plane, params, rng)?,
            Self::Ordered(ttype) => ttype.apply(&mut plane, params, rng)?,
            Self::Halftone(htype) => htype.apply(&mut plane, params, rng)?,
        }

        if plane.shape() != (width, height) {
            plane = upscale(&plane, width, height)?;
        }
        buffer.fill_from_plane(&plane);
        Ok(())
    }
}
