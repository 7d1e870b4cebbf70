/// Returns the power of 2 closest to an unsigned integer on a log scale,
/// `2^round(log2 n)`.
///
/// > the upper power wins once n > lower * sqrt(2), so 6 snaps to 8
pub fn closest_pow_2<Integral>(n: Integral) -> Integral
where
    Integral: num_traits::int::PrimInt + num_traits::Unsigned,
{
    let exponent = n.to_f64().map_or(0.0, |v| v.log2().round());
    if exponent <= 0.0 {
        return Integral::one();
    }

    // overflow protection, no upper pow2 past the top bit
    let bits = size_of::<Integral>() * 8;
    Integral::one() << (exponent as usize).min(bits - 1)
}

/// Side length for a threshold matrix: `requested` snapped to the closest
/// power of two, then clamped into `min..=max` (both powers of two).
pub fn snap_matrix_side(requested: usize, min: usize, max: usize) -> usize {
    closest_pow_2(requested).clamp(min, max)
}

/// Convert a slider value into an integer count.
///
/// Non-finite and negative inputs collapse to 0.
#[inline]
pub fn to_count(value: f64) -> usize {
    if value.is_finite() && value > 0.0 {
        value.round() as usize
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closest_pow_2_zero() {
        assert_eq!(closest_pow_2(0u32), 1);
        assert_eq!(closest_pow_2(0usize), 1);
    }

    #[test]
    fn test_closest_pow_2_exact_powers() {
        for shift in 0..16 {
            assert_eq!(closest_pow_2(1u32 << shift), 1 << shift);
        }
    }

    #[test]
    fn test_closest_pow_2_rounds_on_log_scale() {
        // linear midpoints go up, the log midpoint sits at lower * sqrt(2)
        assert_eq!(closest_pow_2(3u32), 4);
        assert_eq!(closest_pow_2(6u32), 8);
        assert_eq!(closest_pow_2(11u32), 8);
        assert_eq!(closest_pow_2(12u32), 16);
        assert_eq!(closest_pow_2(22usize), 16);
        assert_eq!(closest_pow_2(23usize), 32);
    }

    #[test]
    fn test_closest_pow_2_nearest() {
        assert_eq!(closest_pow_2(5u32), 4);
        assert_eq!(closest_pow_2(7u32), 8);
        assert_eq!(closest_pow_2(15u32), 16);
        assert_eq!(closest_pow_2(1000u32), 1024);
    }

    #[test]
    fn test_closest_pow_2_max_value() {
        assert_eq!(closest_pow_2(u32::MAX), 1u32 << 31);
        assert_eq!(closest_pow_2(u64::MAX), 1u64 << 63);
    }

    #[test]
    fn test_snap_matrix_side() {
        assert_eq!(snap_matrix_side(2, 2, 64), 2);
        assert_eq!(snap_matrix_side(6, 2, 64), 8);
        assert_eq!(snap_matrix_side(3, 2, 16), 4);
        assert_eq!(snap_matrix_side(8, 2, 64), 8);
        assert_eq!(snap_matrix_side(16, 2, 8), 8);
        assert_eq!(snap_matrix_side(0, 2, 8), 2);
    }

    #[test]
    fn test_to_count() {
        assert_eq!(to_count(3.4), 3);
        assert_eq!(to_count(3.5), 4);
        assert_eq!(to_count(-2.0), 0);
        assert_eq!(to_count(f64::NAN), 0);
    }
}
