//! Convolution kernels and 2-D filtering for the blur operator.
//!
//! Two kernel shapes are supported, both `(2·radius + 1)` cells on a side and
//! normalized to sum to 1:
//!
//! - [`Kernel::uniform`] - isotropic Gaussian, built as the outer product of a
//!   1-D Gaussian with itself. σ is chosen from the kernel size with the usual
//!   automatic rule `σ = 0.3·((k − 1)/2 − 1) + 0.8`.
//! - [`Kernel::directional`] - a one-cell-wide line through the centre at a
//!   given angle (motion blur). Positions along the line are rounded to the
//!   nearest cell; rounding overlaps are not corrected beyond normalization.
//!
//! [`convolve`] applies a kernel to every channel of a [`PixelBuffer`] with
//! reflect-101 borders (`dcb|abcd|cba`), rounding and saturating to bytes.

use crate::buffer::{CHANNELS, PixelBuffer};
use crate::math::saturate_u8;

/// Smallest supported blur radius.
pub const MIN_RADIUS: u32 = 1;

/// Largest supported blur radius.
pub const MAX_RADIUS: u32 = 20;

/// A square, normalized convolution kernel stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: usize,
    weights: Vec<f32>,
    /// 1-D factor when the kernel is an outer product `f ⊗ f`.
    separable: Option<Vec<f32>>,
}

impl Kernel {
    /// Isotropic Gaussian kernel of side `2·radius + 1`.
    pub fn uniform(radius: u32) -> Self {
        let size = side(radius);
        let factor = gaussian_1d(size);
        let mut weights = Vec::with_capacity(size * size);
        for &row in &factor {
            for &col in &factor {
                weights.push(row * col);
            }
        }
        Self {
            size,
            weights,
            separable: Some(factor),
        }
    }

    /// Line kernel of side `2·radius + 1` through the centre at `angle_deg`.
    ///
    /// 0° is a horizontal line; angles increase towards +y (down the image).
    pub fn directional(radius: u32, angle_deg: f32) -> Self {
        let size = side(radius);
        let mut weights = vec![0.0f32; size * size];
        let half = (size as i64 - 1) / 2;
        let centre = half as f32;
        let theta = angle_deg.to_radians();
        let (dy, dx) = theta.sin_cos();

        for t in -half..=half {
            let x = (centre + dx * t as f32).round();
            let y = (centre + dy * t as f32).round();
            if x >= 0.0 && y >= 0.0 && (x as usize) < size && (y as usize) < size {
                weights[y as usize * size + x as usize] = 1.0;
            }
        }

        let sum: f32 = weights.iter().sum();
        if sum > 0.0 {
            weights.iter_mut().for_each(|w| *w /= sum);
        }
        Self {
            size,
            weights,
            separable: None,
        }
    }

    /// Identity kernel (single centre tap) of side `2·radius + 1`.
    pub fn identity(radius: u32) -> Self {
        let size = side(radius);
        let mut weights = vec![0.0f32; size * size];
        weights[(size / 2) * size + size / 2] = 1.0;
        Self {
            size,
            weights,
            separable: None,
        }
    }

    /// Side length in cells.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Distance from the centre cell to the edge.
    #[inline]
    pub fn radius(&self) -> usize {
        self.size / 2
    }

    /// Weight at `(row, col)`, or `0.0` outside the kernel.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        if row >= self.size || col >= self.size {
            return 0.0;
        }
        self.weights[row * self.size + col]
    }

    /// Row-major weights.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Iterates rows of the kernel.
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.weights.chunks(self.size)
    }

    /// Sum of all weights (1.0 up to rounding for every constructor).
    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }

    /// Returns true if the kernel is the outer product of a 1-D factor.
    pub fn is_separable(&self) -> bool {
        self.separable.is_some()
    }
}

#[inline]
fn side(radius: u32) -> usize {
    2 * radius.clamp(MIN_RADIUS, MAX_RADIUS) as usize + 1
}

/// Normalized 1-D Gaussian of length `size` with automatic σ.
fn gaussian_1d(size: usize) -> Vec<f32> {
    let sigma = 0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8;
    let centre = (size as f64 - 1.0) * 0.5;
    let scale = -0.5 / (sigma * sigma);
    let raw: Vec<f64> = (0..size)
        .map(|i| {
            let x = i as f64 - centre;
            (scale * x * x).exp()
        })
        .collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|v| (v / sum) as f32).collect()
}

/// Maps an out-of-range coordinate back into `0..len` by reflect-101.
#[inline]
fn reflect_101(mut i: i64, len: i64) -> usize {
    if len == 1 {
        return 0;
    }
    loop {
        if i < 0 {
            i = -i;
        } else if i >= len {
            i = 2 * len - 2 - i;
        } else {
            return i as usize;
        }
    }
}

/// Correlates `image` with `kernel` on every channel.
///
/// Separable kernels run as a horizontal pass followed by a vertical pass with
/// an `f32` intermediate; others run as a direct 2-D sum over non-zero taps.
pub fn convolve(image: &PixelBuffer, kernel: &Kernel) -> PixelBuffer {
    let (width, height) = image.dimensions();
    if image.is_empty() {
        return image.clone();
    }
    let values = match &kernel.separable {
        Some(factor) => convolve_separable(image, factor),
        None => convolve_direct(image, kernel),
    };
    let data = values.into_iter().map(saturate_u8).collect();
    // Length is width * height * CHANNELS by construction.
    PixelBuffer::from_raw(width, height, data).unwrap_or_else(|_| image.clone())
}

fn convolve_separable(image: &PixelBuffer, factor: &[f32]) -> Vec<f32> {
    let (w, h) = (image.width() as i64, image.height() as i64);
    let src = image.as_bytes();
    let r = (factor.len() / 2) as i64;
    let stride = w as usize * CHANNELS;

    let mut horizontal = vec![0.0f32; src.len()];
    for y in 0..h as usize {
        let row = &src[y * stride..(y + 1) * stride];
        for x in 0..w {
            let mut acc = [0.0f32; CHANNELS];
            for (k, &weight) in factor.iter().enumerate() {
                let sx = reflect_101(x + k as i64 - r, w) * CHANNELS;
                for c in 0..CHANNELS {
                    acc[c] += weight * f32::from(row[sx + c]);
                }
            }
            let o = y * stride + x as usize * CHANNELS;
            horizontal[o..o + CHANNELS].copy_from_slice(&acc);
        }
    }

    let mut out = vec![0.0f32; src.len()];
    for y in 0..h {
        for x in 0..w as usize {
            let mut acc = [0.0f32; CHANNELS];
            for (k, &weight) in factor.iter().enumerate() {
                let sy = reflect_101(y + k as i64 - r, h);
                let o = sy * stride + x * CHANNELS;
                for c in 0..CHANNELS {
                    acc[c] += weight * horizontal[o + c];
                }
            }
            let o = y as usize * stride + x * CHANNELS;
            out[o..o + CHANNELS].copy_from_slice(&acc);
        }
    }
    out
}

fn convolve_direct(image: &PixelBuffer, kernel: &Kernel) -> Vec<f32> {
    let (w, h) = (image.width() as i64, image.height() as i64);
    let src = image.as_bytes();
    let r = kernel.radius() as i64;
    let stride = w as usize * CHANNELS;

    let taps: Vec<(i64, i64, f32)> = kernel
        .rows()
        .enumerate()
        .flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &weight)| weight != 0.0)
                .map(move |(j, &weight)| (i as i64 - r, j as i64 - r, weight))
        })
        .collect();

    let mut out = vec![0.0f32; src.len()];
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0.0f32; CHANNELS];
            for &(dy, dx, weight) in &taps {
                let sy = reflect_101(y + dy, h);
                let sx = reflect_101(x + dx, w);
                let o = sy * stride + sx * CHANNELS;
                for c in 0..CHANNELS {
                    acc[c] += weight * f32::from(src[o + c]);
                }
            }
            let o = y as usize * stride + x as usize * CHANNELS;
            out[o..o + CHANNELS].copy_from_slice(&acc);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn uniform_kernel_is_symmetric_and_normalized() {
        for radius in [1, 2, 5, 20] {
            let k = Kernel::uniform(radius);
            let n = k.size();
            assert_eq!(n, 2 * radius as usize + 1);
            assert!((k.sum() - 1.0).abs() < EPS, "radius {radius}: sum {}", k.sum());
            for i in 0..n {
                for j in 0..n {
                    assert!((k.get(i, j) - k.get(j, i)).abs() < 1e-7);
                    assert!((k.get(i, j) - k.get(n - 1 - i, n - 1 - j)).abs() < 1e-7);
                }
            }
            // Centre carries the largest weight.
            let centre = k.get(n / 2, n / 2);
            assert!(k.weights().iter().all(|&w| w <= centre));
        }
    }

    #[test]
    fn radius_one_matches_sigma_point_eight() {
        // σ = 0.8 for k = 3.
        let k = Kernel::uniform(1);
        let e = (-0.5f64 / 0.64).exp();
        let edge = (e / (1.0 + 2.0 * e)) as f32;
        let mid = (1.0 / (1.0 + 2.0 * e)) as f32;
        assert!((k.get(0, 0) - edge * edge).abs() < EPS);
        assert!((k.get(1, 1) - mid * mid).abs() < EPS);
    }

    #[test]
    fn directional_zero_degrees_is_horizontal_line() {
        let k = Kernel::directional(3, 0.0);
        let n = k.size();
        let row = n / 2;
        for i in 0..n {
            for j in 0..n {
                let expected = if i == row { 1.0 / n as f32 } else { 0.0 };
                assert!((k.get(i, j) - expected).abs() < EPS, "cell ({i},{j})");
            }
        }
        assert!((k.sum() - 1.0).abs() < EPS);
    }

    #[test]
    fn directional_ninety_degrees_is_vertical_line() {
        let k = Kernel::directional(2, 90.0);
        let n = k.size();
        for i in 0..n {
            assert!(k.get(i, n / 2) > 0.0);
            assert_eq!(k.get(i, 0), 0.0);
        }
        assert!((k.sum() - 1.0).abs() < EPS);
    }

    #[test]
    fn directional_diagonal_normalizes() {
        let k = Kernel::directional(4, 45.0);
        assert!((k.sum() - 1.0).abs() < EPS);
        // t = ±4 lands on (1,1) and (7,7); t = ±1, ±2 collapse onto shared cells.
        assert!(k.get(1, 1) > 0.0);
        assert!(k.get(7, 7) > 0.0);
        assert!((k.get(4, 4) - 1.0 / 7.0).abs() < EPS);
        assert_eq!(k.get(0, 0), 0.0);
        assert_eq!(k.get(0, 8), 0.0);
    }

    #[test]
    fn radius_is_clamped() {
        assert_eq!(Kernel::uniform(0).size(), 3);
        assert_eq!(Kernel::directional(50, 0.0).size(), 41);
    }

    #[test]
    fn reflect_101_indices() {
        assert_eq!(reflect_101(-1, 4), 1);
        assert_eq!(reflect_101(-2, 4), 2);
        assert_eq!(reflect_101(4, 4), 2);
        assert_eq!(reflect_101(5, 4), 1);
        assert_eq!(reflect_101(-7, 3), 1);
        assert_eq!(reflect_101(3, 1), 0);
    }

    #[test]
    fn flat_image_stays_flat() {
        let img = PixelBuffer::filled(7, 5, [90, 120, 200]);
        for kernel in [Kernel::uniform(3), Kernel::directional(3, 30.0)] {
            let out = convolve(&img, &kernel);
            assert_eq!(out, img);
        }
    }

    #[test]
    fn identity_kernel_copies() {
        let mut img = PixelBuffer::new(4, 3);
        img.set_pixel(1, 1, [255, 0, 10]);
        img.set_pixel(3, 2, [5, 6, 7]);
        assert_eq!(convolve(&img, &Kernel::identity(2)), img);
    }

    #[test]
    fn separable_matches_direct() {
        let mut img = PixelBuffer::new(9, 6);
        for y in 0..6 {
            for x in 0..9 {
                img.set_pixel(x, y, [(x * 28) as u8, (y * 40) as u8, ((x + y) * 15) as u8]);
            }
        }
        let k = Kernel::uniform(2);
        let separable = convolve(&img, &k);
        let direct = Kernel {
            separable: None,
            ..k.clone()
        };
        let direct = convolve(&img, &direct);
        for (a, b) in separable.as_bytes().iter().zip(direct.as_bytes()) {
            assert!(a.abs_diff(*b) <= 1, "{a} vs {b}");
        }
    }

    #[test]
    fn horizontal_blur_spreads_along_rows_only() {
        let mut img = PixelBuffer::new(5, 5);
        img.set_pixel(2, 2, [250, 250, 250]);
        let out = convolve(&img, &Kernel::directional(1, 0.0));
        assert_eq!(out.pixel(1, 2), Some([83, 83, 83]));
        assert_eq!(out.pixel(2, 2), Some([83, 83, 83]));
        assert_eq!(out.pixel(3, 2), Some([83, 83, 83]));
        assert_eq!(out.pixel(2, 1), Some([0, 0, 0]));
        assert_eq!(out.pixel(2, 3), Some([0, 0, 0]));
    }
}
