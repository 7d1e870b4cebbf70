//! Void-and-cluster rank matrix.
//!
//! The search is quadratic in the number of cells, so the 64x64 matrix used
//! by the dithering pass is built on first use and shared for the rest of
//! the process.

use std::sync::OnceLock;

use rand::Rng;
use tracing::info;

use super::matrices::ThresholdMatrix;

pub const MATRIX_SIDE: usize = 64;

static MATRIX: OnceLock<ThresholdMatrix> = OnceLock::new();

/// Shared 64x64 matrix. Only the first caller's `void_bias` and `rng` are
/// used; every later call returns the same instance.
pub fn shared_matrix<R: Rng + ?Sized>(void_bias: f64, rng: &mut R) -> &'static ThresholdMatrix {
    MATRIX.get_or_init(|| {
        info!(side = MATRIX_SIDE, void_bias, "building void-and-cluster matrix");
        build(MATRIX_SIDE, void_bias, rng)
    })
}

/// Rank every cell of a `side x side` torus.
///
/// A tenth of the cells are seeded at random and ranked first. Each
/// following step picks, among unranked cells, the one with the smallest
/// (void) or largest (cluster) number of ranked cells in its 3x3 toroidal
/// neighbourhood, and gives it the next rank. The void search is chosen with
/// probability `void_bias`. Ties go to the first cell in raster order.
pub fn build<R: Rng + ?Sized>(side: usize, void_bias: f64, rng: &mut R) -> ThresholdMatrix {
    let cells = side * side;
    let mut state = RankState {
        side,
        ranks: vec![0; cells],
        ranked: vec![false; cells],
        density: vec![0; cells],
        next_rank: 0,
    };

    let seeds = cells / 10;
    for idx in rand::seq::index::sample(rng, cells, seeds) {
        state.assign(idx);
    }

    for _ in seeds..cells {
        let seek_void = rng.random::<f64>() < void_bias;
        if let Some(idx) = state.extremal(seek_void) {
            state.assign(idx);
        }
    }

    ThresholdMatrix::from_ranks(state.ranks)
}

struct RankState {
    side: usize,
    ranks: Vec<u32>,
    ranked: Vec<bool>,
    /// ranked cells in each 3x3 neighbourhood
    density: Vec<u32>,
    next_rank: u32,
}

impl RankState {
    fn assign(&mut self, idx: usize) {
        let side = self.side;
        self.ranks[idx] = self.next_rank;
        self.ranked[idx] = true;
        self.next_rank += 1;

        let (x, y) = (idx % side, idx / side);
        for dy in [side - 1, 0, 1] {
            for dx in [side - 1, 0, 1] {
                let nx = (x + dx) % side;
                let ny = (y + dy) % side;
                self.density[ny * side + nx] += 1;
            }
        }
    }

    /// Unranked cell with the lowest (void) or highest (cluster) density.
    fn extremal(&self, seek_void: bool) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (idx, &value) in self.density.iter().enumerate() {
            if self.ranked[idx] {
                continue;
            }
            let better = match best {
                None => true,
                Some((_, current)) if seek_void => value < current,
                Some((_, current)) => value > current,
            };
            if better {
                best = Some((idx, value));
            }
        }
        best.map(|(idx, _)| idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_build_is_permutation() {
        let mut rng = StdRng::seed_from_u64(3);
        for bias in [0.0, 0.5, 1.0] {
            let matrix = build(16, bias, &mut rng);
            assert_eq!(matrix.side(), 16);
            assert!(matrix.is_permutation());
        }
    }

    #[test]
    fn test_build_is_seed_deterministic() {
        let a = build(8, 0.5, &mut StdRng::seed_from_u64(11));
        let b = build(8, 0.5, &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
    }

    #[test]
    fn test_shared_matrix_is_built_once() {
        let first = shared_matrix(0.5, &mut StdRng::seed_from_u64(1));
        let second = shared_matrix(0.0, &mut StdRng::seed_from_u64(2));
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.side(), MATRIX_SIDE);
        assert!(first.is_permutation());
    }
}
