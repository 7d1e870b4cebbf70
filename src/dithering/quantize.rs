/// Snap `value` to the closest of `levels` evenly spaced tones in 0..=255.
///
/// `levels` must be at least 2; the schemas never allow less.
#[inline(always)]
pub fn quantize(value: f32, levels: u32) -> f32 {
    debug_assert!(levels >= 2, "quantize needs at least two levels");
    let step = 255.0 / (levels - 1) as f32;
    ((value / step).round() * step).round()
}

/// Binarize: 0 below `cutoff`, 255 otherwise.
#[inline(always)]
pub fn threshold(value: f32, cutoff: f32) -> f32 {
    if value < cutoff { 0.0 } else { 255.0 }
}
