//! Grayscale dithering engine.
//!
//! Every algorithm is looked up by its display name in the [registry], fed a
//! [Params] map matching its attribute schema and run on a [PixelBuffer].
//! The result is written back as opaque gray pixels of the same size.

use rand::Rng;

pub mod config;
pub mod dithering;
pub mod error;
pub mod params;
pub mod registry;
pub mod scaling;
pub mod texture;
pub mod utils;

#[cfg(test)]
mod tests;

pub use error::{DitherError, Result};
pub use params::{Attribute, AttributeKind, ParamValue, Params};
pub use registry::{algorithms_json, list_algorithms, lookup, strategies};
pub use texture::{PixelBuffer, Texture};

/// Dither `buffer` in place with the algorithm registered as `name`, drawing
/// randomness from the thread local generator.
pub fn dither(buffer: &mut PixelBuffer, name: &str, params: &Params) -> Result {
    dither_with_rng(buffer, name, params, &mut rand::rng())
}

/// [dither] with an explicit random source, for reproducible output.
pub fn dither_with_rng<R: Rng + ?Sized>(
    buffer: &mut PixelBuffer,
    name: &str,
    params: &Params,
    rng: &mut R,
) -> Result {
    lookup(name)?.kind.dither(buffer, params, rng)
}
