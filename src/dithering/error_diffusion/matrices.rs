/// Error diffusion kernel: relative `(dx, dy, weight)` targets plus the
/// divisor every weight is taken over.
///
/// Targets only point at pixels the raster scan hasn't visited yet:
/// `dy > 0`, or `dy == 0` with `dx > 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel {
    pub entries: &'static [(isize, isize, f32)],
    pub divisor: f32,
}

impl Kernel {
    /// Targets with their weight already divided, mirrored horizontally
    /// when `mirror` is set (right to left scan).
    #[inline]
    pub fn weights(&self, mirror: bool) -> impl Iterator<Item = (isize, isize, f32)> + '_ {
        let sign = if mirror { -1 } else { 1 };
        self.entries
            .iter()
            .map(move |&(dx, dy, weight)| (dx * sign, dy, weight / self.divisor))
    }

    /// Fraction of the error the kernel hands out.
    pub fn total(&self) -> f32 {
        self.entries.iter().map(|(_, _, w)| w).sum::<f32>() / self.divisor
    }

    pub fn is_causal(&self) -> bool {
        self.entries
            .iter()
            .all(|&(dx, dy, _)| dy > 0 || (dy == 0 && dx > 0))
    }
}

#[rustfmt::skip]
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
                            (1, 0, 7.0),
        (-1, 1, 3.0), (0, 1, 5.0), (1, 1, 1.0),
    ],
    divisor: 16.0,
};

/// Only hands out 6/8 of the error.
#[rustfmt::skip]
pub const ATKINSON: Kernel = Kernel {
    entries: &[
                              (1, 0, 1.0), (2, 0, 1.0),
        (-1, 1, 1.0), (0, 1, 1.0), (1, 1, 1.0),
                      (0, 2, 1.0),
    ],
    divisor: 8.0,
};

#[rustfmt::skip]
pub const JARVIS_JUDICE_NINKE: Kernel = Kernel {
    entries: &[
                                               (1, 0, 7.0), (2, 0, 5.0),
        (-2, 1, 3.0), (-1, 1, 5.0), (0, 1, 7.0), (1, 1, 5.0), (2, 1, 3.0),
        (-2, 2, 1.0), (-1, 2, 3.0), (0, 2, 5.0), (1, 2, 3.0), (2, 2, 1.0),
    ],
    divisor: 48.0,
};

#[rustfmt::skip]
pub const STUCKI: Kernel = Kernel {
    entries: &[
                                               (1, 0, 8.0), (2, 0, 4.0),
        (-2, 1, 2.0), (-1, 1, 4.0), (0, 1, 8.0), (1, 1, 4.0), (2, 1, 2.0),
        (-2, 2, 1.0), (-1, 2, 2.0), (0, 2, 4.0), (1, 2, 2.0), (2, 2, 1.0),
    ],
    divisor: 42.0,
};

#[rustfmt::skip]
pub const SIERRA_3: Kernel = Kernel {
    entries: &[
                                               (1, 0, 5.0), (2, 0, 3.0),
        (-2, 1, 2.0), (-1, 1, 4.0), (0, 1, 5.0), (1, 1, 4.0), (2, 1, 2.0),
                      (-1, 2, 2.0), (0, 2, 3.0), (1, 2, 2.0),
    ],
    divisor: 32.0,
};

#[rustfmt::skip]
pub const SIERRA_2: Kernel = Kernel {
    entries: &[
                                               (1, 0, 4.0), (2, 0, 3.0),
        (-2, 1, 1.0), (-1, 1, 2.0), (0, 1, 3.0), (1, 1, 2.0), (2, 1, 1.0),
    ],
    divisor: 16.0,
};

#[rustfmt::skip]
pub const SIERRA_LITE: Kernel = Kernel {
    entries: &[
                      (1, 0, 2.0),
        (-1, 1, 1.0), (0, 1, 1.0),
    ],
    divisor: 4.0,
};
