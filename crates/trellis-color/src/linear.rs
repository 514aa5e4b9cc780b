use std::ops::{Add, Mul, Sub};

use bytemuck::{Pod, Zeroable};

use crate::srgb::{linear_to_srgb, Rgba8};

/// A color in linear sRGB space, with straight alpha.
///
/// The color channels are unbounded; values above 1.0 are brighter than SDR white. Alpha is
/// expected to be in range 0.0 to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Fully transparent black (all components are 0).
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);
    pub const MAGENTA: Self = Self::rgb(1.0, 0.0, 1.0);
    pub const CYAN: Self = Self::rgb(0.0, 1.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn with_alpha(mut self, a: f32) -> Self {
        self.a = a;
        self
    }

    /// Returns the channels as an array in RGBA order.
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    fn map_rgb(self, f: impl Fn(f32) -> f32) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b), self.a)
    }

    /// Linearly interpolates all channels (including alpha) between `self` and `other`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }

    /// Multiplies the color channels with alpha.
    ///
    /// ```
    /// # use trellis_color::Color;
    /// let c = Color::new(1.0, 0.5, 0.0, 0.5).premultiply();
    /// assert_eq!(c, Color::new(0.5, 0.25, 0.0, 0.5));
    /// ```
    pub fn premultiply(self) -> Self {
        let a = self.a;
        self.map_rgb(|c| c * a)
    }

    /// Returns the relative luminance of the color (Rec. 709 coefficients).
    pub fn luminance(self) -> f32 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }

    /// Clamps the color channels to `range`, and alpha to 0.0 to 1.0.
    pub fn clamp(self, range: ColorRange) -> Self {
        self.map_rgb(|c| c.clamp(range.min, range.max))
            .with_alpha(self.a.clamp(0.0, 1.0))
    }

    /// Converts this color to 8-bit non-linear sRGB.
    ///
    /// Channels outside of 0.0 to 1.0 are clamped first.
    pub fn to_srgb8(self) -> Rgba8 {
        let c = self.clamp(ColorRange::SDR);
        let quantize = |v: f32| (v * 255.0).round() as u8;
        Rgba8::from_rgba8(
            quantize(linear_to_srgb(c.r)),
            quantize(linear_to_srgb(c.g)),
            quantize(linear_to_srgb(c.b)),
            quantize(c.a),
        )
    }

    /// Packs this color into an integer in `0xRRGGBBAA` format.
    ///
    /// Color channels are clamped to `range` and mapped to 0 to 255, alpha is clamped to 0.0 to
    /// 1.0.
    ///
    /// ```
    /// # use trellis_color::{Color, ColorRange};
    /// assert_eq!(Color::new(0.0, 0.5, 2.0, 1.0).pack_rgba8(ColorRange::SDR), 0x0080ffff);
    /// assert_eq!(Color::rgb(12.5, 0.0, 0.0).pack_rgba8(ColorRange::HDR), 0xff0000ff);
    /// ```
    pub fn pack_rgba8(self, range: ColorRange) -> u32 {
        let [r, g, b, a] = self.quantize::<{ u8::MAX as u32 }>(range);
        (r << 24) | (g << 16) | (b << 8) | a
    }

    /// Unpacks a color from an integer in `0xRRGGBBAA` format.
    ///
    /// This is the inverse of [`Color::pack_rgba8`]: `pack_rgba8(unpack_rgba8(p, range), range)`
    /// is always `p`.
    pub fn unpack_rgba8(packed: u32, range: ColorRange) -> Self {
        let channel = |shift: u32| (packed >> shift) & 0xff;
        Self::dequantize::<{ u8::MAX as u32 }>(
            [channel(24), channel(16), channel(8), channel(0)],
            range,
        )
    }

    /// Packs this color into an integer with 16 bits per channel (`0xRRRRGGGGBBBBAAAA`).
    pub fn pack_rgba16(self, range: ColorRange) -> u64 {
        let [r, g, b, a] = self
            .quantize::<{ u16::MAX as u32 }>(range)
            .map(u64::from);
        (r << 48) | (g << 32) | (b << 16) | a
    }

    /// Unpacks a color with 16 bits per channel (`0xRRRRGGGGBBBBAAAA`).
    pub fn unpack_rgba16(packed: u64, range: ColorRange) -> Self {
        // Truncation keeps exactly the 16 bits of each channel.
        let channel = |shift: u64| u32::from((packed >> shift) as u16);
        Self::dequantize::<{ u16::MAX as u32 }>(
            [channel(48), channel(32), channel(16), channel(0)],
            range,
        )
    }

    fn quantize<const MAX: u32>(self, range: ColorRange) -> [u32; 4] {
        let c = self.clamp(range);
        let scale = |v: f32| (v * MAX as f32).round() as u32;
        [
            scale(range.normalize(c.r)),
            scale(range.normalize(c.g)),
            scale(range.normalize(c.b)),
            scale(c.a),
        ]
    }

    fn dequantize<const MAX: u32>([r, g, b, a]: [u32; 4], range: ColorRange) -> Self {
        let unit = |v: u32| v as f32 / MAX as f32;
        Self::new(
            range.denormalize(unit(r)),
            range.denormalize(unit(g)),
            range.denormalize(unit(b)),
            unit(a),
        )
    }
}

impl Add for Color {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b, self.a + rhs.a)
    }
}

impl Sub for Color {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b, self.a - rhs.a)
    }
}

/// Scales all channels, including alpha.
impl Mul<f32> for Color {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.r * rhs, self.g * rhs, self.b * rhs, self.a * rhs)
    }
}

/// Channel-wise multiplication (modulation).
impl Mul for Color {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b, self.a * rhs.a)
    }
}

impl From<[f32; 4]> for Color {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

/// The range of linear color channel values that is mapped to the full range of a packed integer
/// channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRange {
    min: f32,
    max: f32,
}

impl ColorRange {
    /// Standard dynamic range: 0.0 to 1.0.
    pub const SDR: Self = Self { min: 0.0, max: 1.0 };

    /// High dynamic range: 0.0 to 12.5.
    ///
    /// In scRGB, 1.0 corresponds to 80 nits, so this covers displays up to 1000 nits.
    pub const HDR: Self = Self {
        min: 0.0,
        max: 12.5,
    };

    /// Creates a custom range.
    ///
    /// # Panics
    ///
    /// Panics if `min` is not less than `max`, or either is not finite.
    pub fn new(min: f32, max: f32) -> Self {
        assert!(
            min.is_finite() && max.is_finite() && min < max,
            "invalid color range {min}..{max}"
        );
        Self { min, max }
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Maps `value` from this range to 0.0 to 1.0 (without clamping).
    pub fn normalize(&self, value: f32) -> f32 {
        (value - self.min) / (self.max - self.min)
    }

    /// Maps `value` from 0.0 to 1.0 to this range (without clamping).
    pub fn denormalize(&self, value: f32) -> f32 {
        self.min + value * (self.max - self.min)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn assert_color_eq(a: Color, b: Color, epsilon: f32) {
        for (x, y) in a.to_array().into_iter().zip(b.to_array()) {
            assert_abs_diff_eq!(x, y, epsilon = epsilon);
        }
    }

    #[test]
    fn packed_round_trip_8() {
        for range in [ColorRange::SDR, ColorRange::HDR, ColorRange::new(-1.0, 3.0)] {
            for packed in (0..=u32::MAX).step_by(65_537) {
                let color = Color::unpack_rgba8(packed, range);
                assert_eq!(color.pack_rgba8(range), packed, "{packed:#010x} in {range:?}");
            }
        }
    }

    #[test]
    fn packed_round_trip_16() {
        for range in [ColorRange::SDR, ColorRange::HDR] {
            for i in 0..=65_535u64 {
                let packed = (i << 48) | ((65_535 - i) << 32) | ((i * 7 % 65_536) << 16) | i;
                let color = Color::unpack_rgba16(packed, range);
                assert_eq!(color.pack_rgba16(range), packed, "{packed:#018x} in {range:?}");
            }
        }
    }

    #[test]
    fn quantization_error() {
        let step = 12.5 / 255.0;
        for i in 0..=100 {
            let v = i as f32 * 0.137;
            let color = Color::new(v, v / 2.0, 13.0 - v, 0.3);
            let unpacked = Color::unpack_rgba8(color.pack_rgba8(ColorRange::HDR), ColorRange::HDR);
            assert_color_eq(unpacked, color.clamp(ColorRange::HDR), step / 2.0 + 1e-5);
        }
    }

    #[test]
    fn clamping() {
        let c = Color::new(-1.0, 0.5, 20.0, 2.0);
        assert_eq!(c.clamp(ColorRange::SDR), Color::new(0.0, 0.5, 1.0, 1.0));
        assert_eq!(c.clamp(ColorRange::HDR), Color::new(0.0, 0.5, 12.5, 1.0));
        assert_eq!(c.pack_rgba8(ColorRange::SDR), 0x0080ffff);
    }

    #[test]
    #[should_panic(expected = "invalid color range")]
    fn empty_range() {
        ColorRange::new(1.0, 1.0);
    }

    #[test]
    fn arithmetic() {
        let c = Color::new(0.2, 0.4, 0.6, 1.0);
        assert_color_eq(c * 2.0, Color::new(0.4, 0.8, 1.2, 2.0), 1e-6);
        assert_color_eq(c * Color::new(0.5, 0.0, 1.0, 1.0), Color::new(0.1, 0.0, 0.6, 1.0), 1e-6);
        assert_color_eq(c + Color::TRANSPARENT, c, 0.0);
        assert_color_eq(Color::BLACK.lerp(Color::WHITE, 0.25), Color::rgb(0.25, 0.25, 0.25), 1e-6);
        assert_color_eq(Color::RED.lerp(Color::TRANSPARENT, 0.5), Color::new(0.5, 0.0, 0.0, 0.5), 1e-6);
    }

    #[test]
    fn luminance() {
        assert_abs_diff_eq!(Color::WHITE.luminance(), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(Color::BLACK.luminance(), 0.0);
        assert!(Color::GREEN.luminance() > Color::RED.luminance());
        assert!(Color::RED.luminance() > Color::BLUE.luminance());
    }

    #[test]
    fn bytemuck_layout() {
        let colors = [Color::RED, Color::BLUE];
        let floats: &[f32] = bytemuck::cast_slice(&colors);
        assert_eq!(floats, &[1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0]);
    }
}
