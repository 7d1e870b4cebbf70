//! Electrostatic halftoning.
//!
//! Charged particles are dropped at random, pushed apart by inverse square
//! repulsion and then stamped onto the plane as dots whose radius follows the
//! brightness under them.

use rand::Rng;
use tracing::trace;

use crate::{
    dithering::{SCALE, THRESHOLD},
    error::Result,
    params::{Attribute, Params},
    texture::Texture,
};

const CHARGE_STRENGTH: Attribute = Attribute::range("chargeStrength", 0.1, 10.0, 0.1, 1.0);
const PARTICLE_SIZE: Attribute = Attribute::range("particleSize", 1.0, 10.0, 1.0, 3.0);
const ITERATIONS: Attribute = Attribute::range("iterations", 1.0, 100.0, 1.0, 20.0);

pub(crate) const ATTRIBUTES: &[Attribute] =
    &[SCALE, CHARGE_STRENGTH, PARTICLE_SIZE, ITERATIONS, THRESHOLD];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElectrostaticSettings {
    pub charge: f32,
    pub particle_size: usize,
    pub iterations: usize,
    pub threshold: f32,
}

impl ElectrostaticSettings {
    pub fn from_params(params: &Params) -> Result<Self> {
        Ok(Self {
            charge: params.float(CHARGE_STRENGTH.name)?,
            particle_size: params.count(PARTICLE_SIZE.name)?.max(1),
            iterations: params.count(ITERATIONS.name)?,
            threshold: params.float(THRESHOLD.name)?,
        })
    }

    /// `ceil(width * height / particleSize²)`
    pub fn particle_count(&self, width: usize, height: usize) -> usize {
        (width * height).div_ceil(self.particle_size * self.particle_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
}

pub fn scatter<R: Rng + ?Sized>(
    count: usize,
    width: usize,
    height: usize,
    rng: &mut R,
) -> Vec<Particle> {
    (0..count)
        .map(|_| Particle {
            x: rng.random::<f32>() * width as f32,
            y: rng.random::<f32>() * height as f32,
        })
        .collect()
}

/// One repulsion pass. Particles move one after another, so later particles
/// feel the already displaced positions of earlier ones. Coincident pairs
/// exert no force.
pub fn repel(particles: &mut [Particle], charge: f32, width: usize, height: usize) {
    let (max_x, max_y) = ((width - 1) as f32, (height - 1) as f32);
    for i in 0..particles.len() {
        let Particle { x, y } = particles[i];
        let (mut fx, mut fy) = (0.0, 0.0);
        for (j, other) in particles.iter().enumerate() {
            if i == j {
                continue;
            }
            let (dx, dy) = (x - other.x, y - other.y);
            let dist_sq = dx * dx + dy * dy;
            if dist_sq > 0.0 {
                let force = charge / dist_sq;
                fx += force * dx;
                fy += force * dy;
            }
        }
        particles[i] = Particle {
            x: (x + fx).clamp(0.0, max_x),
            y: (y + fy).clamp(0.0, max_y),
        };
    }
}

/// Particles bucketed on a square grid so a dot lookup only visits the
/// buckets its radius can reach.
struct ParticleGrid<'a> {
    particles: &'a [Particle],
    cell: f32,
    columns: usize,
    rows: usize,
    buckets: Vec<Vec<usize>>,
}

impl<'a> ParticleGrid<'a> {
    fn new(particles: &'a [Particle], cell: usize, width: usize, height: usize) -> Self {
        let columns = width.div_ceil(cell).max(1);
        let rows = height.div_ceil(cell).max(1);
        let mut grid = Self {
            particles,
            cell: cell as f32,
            columns,
            rows,
            buckets: vec![Vec::new(); columns * rows],
        };
        for (idx, particle) in particles.iter().enumerate() {
            let (column, row) = grid.bucket_of(particle.x, particle.y);
            grid.buckets[row * columns + column].push(idx);
        }
        grid
    }

    fn bucket_of(&self, x: f32, y: f32) -> (usize, usize) {
        let column = ((x / self.cell).floor().max(0.0) as usize).min(self.columns - 1);
        let row = ((y / self.cell).floor().max(0.0) as usize).min(self.rows - 1);
        (column, row)
    }

    /// Whether any particle has `d² < radius_sq` from (x, y). `reach` bounds
    /// the buckets searched and must be at least `sqrt(radius_sq)`.
    fn any_within(&self, x: f32, y: f32, reach: f32, radius_sq: f32) -> bool {
        let (left, top) = self.bucket_of(x - reach, y - reach);
        let (right, bottom) = self.bucket_of(x + reach, y + reach);
        (top..=bottom).any(|row| {
            (left..=right).any(|column| {
                self.buckets[row * self.columns + column].iter().any(|&idx| {
                    let p = self.particles[idx];
                    let (dx, dy) = (x - p.x, y - p.y);
                    dx * dx + dy * dy < radius_sq
                })
            })
        })
    }
}

/// Paint the settled particles: ink where a particle is close enough and the
/// pixel sits below the threshold, paper everywhere else.
pub fn render(plane: &mut Texture<f32>, particles: &[Particle], settings: &ElectrostaticSettings) {
    let (width, height) = plane.shape();
    let size = settings.particle_size;
    let grid = ParticleGrid::new(particles, size, width, height);
    let (reach, size_sq) = (size as f32, (size * size) as f32);

    for y in 0..height {
        for x in 0..width {
            let value = plane.get(x, y);
            let radius_sq = size_sq * (value / 255.0);
            let ink = value < settings.threshold
                && radius_sq > 0.0
                && grid.any_within(x as f32, y as f32, reach, radius_sq);
            plane.set(x, y, if ink { 0.0 } else { 255.0 });
        }
    }
}

pub fn electrostatic_halftone<R: Rng + ?Sized>(
    plane: &mut Texture<f32>,
    settings: &ElectrostaticSettings,
    rng: &mut R,
) {
    let (width, height) = plane.shape();
    let count = settings.particle_count(width, height);
    trace!(count, iterations = settings.iterations, "electrostatic particles");

    let mut particles = scatter(count, width, height, rng);
    for _ in 0..settings.iterations {
        repel(&mut particles, settings.charge, width, height);
    }
    render(plane, &particles, settings);
}
