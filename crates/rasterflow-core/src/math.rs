//! Small numeric helpers shared by the operators.

use crate::buffer::MAX_VALUE;

/// Rounds to the nearest integer and saturates into `0..=255`.
#[inline]
pub fn saturate_u8(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, f32::from(MAX_VALUE)) as u8
}

/// Crossfade between dry and wet values.
///
/// Equivalent to `dry * (1 - mix) + wet * mix`, written as
/// `dry + (wet - dry) * mix` so that `mix == 0.0` returns `dry` and
/// `mix == 1.0` returns `wet` exactly.
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry + (wet - dry) * mix
}

/// Per-channel affine map `value * gain + offset`, saturated to a byte.
#[inline]
pub fn affine_u8(value: u8, gain: f32, offset: f32) -> u8 {
    saturate_u8(f32::from(value) * gain + offset)
}
