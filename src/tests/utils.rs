use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    params::Params,
    registry::Strategy,
    texture::PixelBuffer,
    utils::pixel::Rgba,
};

/// Side of the images the crate wide property tests run on. Small enough for
/// the quadratic electrostatic simulation in debug builds.
pub const TEST_IMAGE_SIZE: usize = 24;

pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Colored, semi transparent diagonal ramp.
pub fn gradient_buffer(width: usize, height: usize) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, y| {
        let t = (x + y) * 255 / (width + height - 2).max(1);
        Rgba::new(t as u8, (255 - t) as u8 / 2, (t / 3) as u8, (x * 10 % 256) as u8)
    })
}

pub fn random_buffer(width: usize, height: usize, seed: u64) -> PixelBuffer {
    let mut rng = seeded(seed);
    PixelBuffer::from_fn(width, height, |_, _| {
        Rgba::new(rng.random(), rng.random(), rng.random(), rng.random())
    })
}

pub fn uniform_gray(width: usize, height: usize, value: u8) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |_, _| Rgba::new(value, value, value, 255))
}

pub fn default_params(strategy: &Strategy) -> Params {
    Params::defaults(strategy.attributes())
}
