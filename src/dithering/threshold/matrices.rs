use std::fmt::Display;

/// Seed of the Bayer recursion.
pub const BAYER_SEED: [[u32; 2]; 2] = [[0, 2], [3, 1]];
/// Quadrant order used by clustered dot growth: one 2x2 cell fills clockwise.
pub const CLUSTERED_SEED: [[u32; 2]; 2] = [[0, 1], [3, 2]];
/// Quadrant order used by dispersed dot growth.
pub const DISPERSED_SEED: [[u32; 2]; 2] = [[0, 3], [2, 1]];

/// Largest matrix any generator produces.
pub const MAX_MATRIX_SIDE: usize = 64;

/// Square rank matrix with a power of two side.
///
/// Every rank in `0..side²` appears exactly once, so `rank / side²` spreads
/// evenly over `[0, 1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdMatrix {
    ranks: Vec<u32>,
    /// matrix order.
    ///
    /// > side == 2^order
    order: usize,
    /// bits of side set to 1.
    ///
    /// > x % 2^k === x & (2^k - 1)
    side_mask: usize,
}

impl ThresholdMatrix {
    /// Callers inside the crate only ever hand over power of two squares.
    pub(crate) fn from_ranks(ranks: Vec<u32>) -> Self {
        let side = ranks.len().isqrt();
        debug_assert!(
            side * side == ranks.len() && side.is_power_of_two(),
            "threshold matrix must be a power of two square"
        );
        Self {
            ranks,
            order: side.trailing_zeros() as usize,
            side_mask: side - 1,
        }
    }

    /// 1x1 matrix every recursion starts from.
    fn unit() -> Self {
        Self::from_ranks(vec![0])
    }

    /// Bayer matrix with side `side` (rounded down to a power of two).
    ///
    /// > M(2n)[y][x] = 4 * M(n)[y mod n][x mod n] + seed[y / n][x / n]
    pub fn bayer(side: usize) -> Self {
        Self::grow(side, |prev, x, y| {
            let n = prev.side();
            4 * prev.rank(x % n, y % n) + BAYER_SEED[y / n][x / n]
        })
    }

    /// Clustered dot matrix of the given recursion order (side `2^order`).
    ///
    /// > M(2n)[y][x] = 4 * M(n)[y / 2][x / 2] + Q[y mod 2][x mod 2]
    ///
    /// Four consecutive ranks always land in the same 2x2 cell, so dots grow
    /// as compact clumps.
    pub fn clustered(order: usize) -> Self {
        Self::grow(1 << order, |prev, x, y| {
            4 * prev.rank(x / 2, y / 2) + CLUSTERED_SEED[y % 2][x % 2]
        })
    }

    /// Dispersed dot matrix with side `side` (rounded down to a power of two).
    ///
    /// > M(2n)[y][x] = n² * Q[y mod 2][x mod 2] + M(n)[y / 2][x / 2]
    pub fn dispersed(side: usize) -> Self {
        Self::grow(side, |prev, x, y| {
            let n = prev.side() as u32;
            n * n * DISPERSED_SEED[y % 2][x % 2] + prev.rank(x / 2, y / 2)
        })
    }

    /// Double the unit matrix until it reaches `side`, computing each new
    /// rank from the previous matrix.
    fn grow(side: usize, rule: impl Fn(&ThresholdMatrix, usize, usize) -> u32) -> Self {
        let side = side.clamp(1, MAX_MATRIX_SIDE);
        let mut matrix = Self::unit();
        while matrix.side() * 2 <= side {
            let next = matrix.side() * 2;
            let mut ranks = Vec::with_capacity(next * next);
            for y in 0..next {
                for x in 0..next {
                    ranks.push(rule(&matrix, x, y));
                }
            }
            matrix = Self::from_ranks(ranks);
        }
        matrix
    }

    #[inline]
    pub fn side(&self) -> usize {
        1 << self.order
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn ranks(&self) -> &[u32] {
        &self.ranks
    }

    /// Index of a pixel coordinate in the tiled matrix.
    #[inline(always)]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        ((y & self.side_mask) << self.order) + (x & self.side_mask)
    }

    /// Rank at a pixel coordinate, tiling the matrix over the plane.
    #[inline(always)]
    pub fn rank(&self, x: usize, y: usize) -> u32 {
        self.ranks[self.idx(x, y)]
    }

    /// `rank / side²` in `[0, 1)`.
    #[inline(always)]
    pub fn normalized(&self, x: usize, y: usize) -> f32 {
        self.rank(x, y) as f32 / self.ranks.len() as f32
    }

    /// Whether every rank `0..side²` appears exactly once.
    pub fn is_permutation(&self) -> bool {
        let mut seen = vec![false; self.ranks.len()];
        for &rank in &self.ranks {
            match seen.get_mut(rank as usize) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }

    /// Ranks stretched over 0..=255, for previews.
    pub fn to_luma(&self) -> Vec<u8> {
        let max = (self.ranks.len() - 1).max(1) as f32;
        self.ranks
            .iter()
            .map(|&rank| (rank as f32 * 255.0 / max).round() as u8)
            .collect()
    }
}

impl Display for ThresholdMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = (self.ranks.len() - 1).to_string().len();
        for row in self.ranks.chunks_exact(self.side()) {
            let line = row
                .iter()
                .map(|rank| format!("{rank:>width$}"))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
