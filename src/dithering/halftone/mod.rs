pub mod electrostatic;
pub mod lattice;
pub mod noise;

use std::f32::consts::SQRT_2;

use rand::Rng;

use crate::{
    dithering::{SCALE, THRESHOLD, quantize::quantize},
    error::Result,
    params::{Attribute, Params},
    texture::Texture,
};

const AM_DOT_SIZE: Attribute = Attribute::range("dotSize", 0.1, 2.0, 0.1, 1.0);
const SCREEN_FREQUENCY: Attribute = Attribute::range("screenFrequency", 1.0, 300.0, 1.0, 60.0);
const AM_LEVELS: Attribute = Attribute::range("quantizationLevels", 2.0, 256.0, 1.0, 256.0);
const FM_DOT_SIZE: Attribute = Attribute::range("dotSize", 1.0, 10.0, 1.0, 2.0);
const RANDOMNESS: Attribute = Attribute::range("randomness", 0.0, 1.0, 0.1, 0.2);

const AM_ATTRIBUTES: &[Attribute] = &[AM_DOT_SIZE, SCREEN_FREQUENCY, SCALE, AM_LEVELS];
const FM_ATTRIBUTES: &[Attribute] = &[SCALE, THRESHOLD, FM_DOT_SIZE, RANDOMNESS];

/// Halftoning, noise screens and simulations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HalftoneType {
    AmplitudeModulated,
    FrequencyModulated,
    Electrostatic,
    StochasticScreening,
    AdditiveNoise,
    WhiteNoise,
    LatticeBoltzmann,
}

impl HalftoneType {
    pub fn attributes(self) -> &'static [Attribute] {
        match self {
            HalftoneType::AmplitudeModulated => AM_ATTRIBUTES,
            HalftoneType::FrequencyModulated => FM_ATTRIBUTES,
            HalftoneType::Electrostatic => electrostatic::ATTRIBUTES,
            HalftoneType::StochasticScreening => noise::STOCHASTIC_ATTRIBUTES,
            HalftoneType::AdditiveNoise => noise::ADDITIVE_ATTRIBUTES,
            HalftoneType::WhiteNoise => noise::WHITE_NOISE_ATTRIBUTES,
            HalftoneType::LatticeBoltzmann => lattice::ATTRIBUTES,
        }
    }

    /// Dither the working plane in place. `params` must already be validated
    /// against [HalftoneType::attributes].
    pub fn apply<R: Rng + ?Sized>(
        self,
        plane: &mut Texture<f32>,
        params: &Params,
        rng: &mut R,
    ) -> Result {
        match self {
            HalftoneType::AmplitudeModulated => {
                let settings = AmSettings::from_params(params)?;
                am_halftone(plane, &settings);
            }
            HalftoneType::FrequencyModulated => {
                let settings = FmSettings::from_params(params)?;
                fm_halftone(plane, &settings, rng);
            }
            HalftoneType::Electrostatic => {
                let settings = electrostatic::ElectrostaticSettings::from_params(params)?;
                electrostatic::electrostatic_halftone(plane, &settings, rng);
            }
            HalftoneType::StochasticScreening => {
                let settings = noise::StochasticSettings::from_params(params)?;
                noise::stochastic_screen(plane, &settings, rng);
            }
            HalftoneType::AdditiveNoise => {
                let settings = noise::AdditiveSettings::from_params(params)?;
                noise::additive_noise(plane, &settings, rng);
            }
            HalftoneType::WhiteNoise => {
                let settings = noise::WhiteNoiseSettings::from_params(params)?;
                noise::white_noise(plane, &settings, rng);
            }
            HalftoneType::LatticeBoltzmann => {
                let settings = lattice::LatticeSettings::from_params(params)?;
                lattice::lattice_boltzmann(plane, &settings);
            }
        }
        Ok(())
    }
}

/// Visit the plane in `cell x cell` blocks (clipped at the edges), handing
/// out the block origin and extent.
fn for_each_block(
    width: usize,
    height: usize,
    cell: usize,
    mut f: impl FnMut(usize, usize, usize, usize),
) {
    for y0 in (0..height).step_by(cell) {
        for x0 in (0..width).step_by(cell) {
            f(x0, y0, cell.min(width - x0), cell.min(height - y0));
        }
    }
}

fn block_average(plane: &Texture<f32>, x0: usize, y0: usize, w: usize, h: usize) -> f32 {
    let sum: f32 = (y0..y0 + h)
        .flat_map(|y| (x0..x0 + w).map(move |x| (x, y)))
        .map(|(x, y)| plane.get(x, y))
        .sum();
    sum / (w * h) as f32
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmSettings {
    pub dot_size: f32,
    pub screen_frequency: f32,
    pub levels: u32,
}

impl AmSettings {
    pub fn from_params(params: &Params) -> Result<Self> {
        Ok(Self {
            dot_size: params.float(AM_DOT_SIZE.name)?,
            screen_frequency: params.float(SCREEN_FREQUENCY.name)?,
            levels: params.count(AM_LEVELS.name)? as u32,
        })
    }

    /// `max(2, floor(25.4 / screenFrequency))` pixels.
    pub fn cell_size(&self) -> usize {
        ((25.4 / self.screen_frequency).floor() as usize).max(2)
    }
}

/// Amplitude modulated screen: one round dot per cell, its radius growing
/// with the darkness of the cell.
pub fn am_halftone(plane: &mut Texture<f32>, settings: &AmSettings) {
    let cell = settings.cell_size();
    let center = cell as f32 / 2.0;
    let max_radius = SQRT_2 * center;
    let (width, height) = plane.shape();

    for_each_block(width, height, cell, |x0, y0, w, h| {
        let average = quantize(block_average(plane, x0, y0, w, h), settings.levels);
        let radius = max_radius * (1.0 - average / 255.0) * settings.dot_size;
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                let dx = (x - x0) as f32 + 0.5 - center;
                let dy = (y - y0) as f32 + 0.5 - center;
                let ink = (dx * dx + dy * dy).sqrt() < radius;
                plane.set(x, y, if ink { 0.0 } else { 255.0 });
            }
        }
    });
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FmSettings {
    pub threshold: f32,
    pub dot_size: usize,
    pub randomness: f32,
}

impl FmSettings {
    pub fn from_params(params: &Params) -> Result<Self> {
        Ok(Self {
            threshold: params.float(THRESHOLD.name)?,
            dot_size: params.count(FM_DOT_SIZE.name)?.max(1),
            randomness: params.float(RANDOMNESS.name)?,
        })
    }
}

/// Frequency modulated screen: whole `dotSize` blocks flip to ink or paper
/// against a jittered threshold.
pub fn fm_halftone<R: Rng + ?Sized>(
    plane: &mut Texture<f32>,
    settings: &FmSettings,
    rng: &mut R,
) {
    let (width, height) = plane.shape();
    for_each_block(width, height, settings.dot_size, |x0, y0, w, h| {
        let average = block_average(plane, x0, y0, w, h);
        let jitter = (rng.random::<f32>() - 0.5) * settings.randomness * 255.0;
        let tone = if average < settings.threshold + jitter { 0.0 } else { 255.0 };
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                plane.set(x, y, tone);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn am(dot_size: f32, screen_frequency: f32) -> AmSettings {
        AmSettings {
            dot_size,
            screen_frequency,
            levels: 256,
        }
    }

    #[test]
    fn test_am_cell_size() {
        assert_eq!(am(1.0, 60.0).cell_size(), 2);
        assert_eq!(am(1.0, 5.0).cell_size(), 5);
        assert_eq!(am(1.0, 1.0).cell_size(), 25);
    }

    #[test]
    fn test_am_extremes() {
        let mut black = Texture::from_vec(6, 6, vec![0.0; 36]).unwrap();
        am_halftone(&mut black, &am(1.0, 5.0));
        assert!(black.as_ref().iter().all(|v| *v == 0.0));

        let mut white = Texture::from_vec(6, 6, vec![255.0; 36]).unwrap();
        am_halftone(&mut white, &am(1.0, 5.0));
        assert!(white.as_ref().iter().all(|v| *v == 255.0));
    }

    #[test]
    fn test_am_mid_gray_grows_dot_from_center() {
        // 5x5 cells, radius = 0.707 * 5 * 0.5 = 1.77
        let mut plane = Texture::from_vec(5, 5, vec![127.5; 25]).unwrap();
        am_halftone(&mut plane, &am(1.0, 5.0));
        assert_eq!(plane.get(2, 2), 0.0);
        assert_eq!(plane.get(1, 2), 0.0);
        assert_eq!(plane.get(0, 0), 255.0);
        assert_eq!(plane.get(4, 4), 255.0);
    }

    #[test]
    fn test_fm_fills_whole_blocks() {
        let settings = FmSettings {
            threshold: 128.0,
            dot_size: 3,
            randomness: 1.0,
        };
        let values: Vec<f32> = (0..49).map(|v| (v * 5) as f32).collect();
        let mut plane = Texture::from_vec(7, 7, values).unwrap();
        fm_halftone(&mut plane, &settings, &mut StdRng::seed_from_u64(4));
        for_each_block(7, 7, 3, |x0, y0, w, h| {
            let tone = plane.get(x0, y0);
            assert!(tone == 0.0 || tone == 255.0);
            for y in y0..y0 + h {
                for x in x0..x0 + w {
                    assert_eq!(plane.get(x, y), tone);
                }
            }
        });
    }

    #[test]
    fn test_fm_without_randomness_is_block_threshold() {
        let settings = FmSettings {
            threshold: 128.0,
            dot_size: 2,
            randomness: 0.0,
        };
        #[rustfmt::skip]
        let values = vec![
            0.0, 100.0, 200.0, 250.0,
            50.0, 100.0, 250.0, 250.0,
        ];
        let mut plane = Texture::from_vec(4, 2, values).unwrap();
        fm_halftone(&mut plane, &settings, &mut StdRng::seed_from_u64(0));
        // block averages 62.5 and 237.5
        assert_eq!(plane.as_ref(), &[0.0, 0.0, 255.0, 255.0, 0.0, 0.0, 255.0, 255.0]);
    }
}
