use std::{fmt, ops::Index, str::FromStr};

use bytemuck::{Pod, Zeroable};

use crate::Color;

/// Converts a non-linear sRGB channel value to linear, both in range 0.0 to 1.0.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Converts a linear channel value to non-linear sRGB, both in range 0.0 to 1.0.
pub fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// An 8-bit RGBA color.
///
/// Colors are in the non-linear sRGB color space and use straight alpha. Use
/// [`Rgba8::to_linear`] before doing any math on them.
#[derive(PartialEq, Eq, Clone, Copy, Hash, Default, Pod, Zeroable)]
#[repr(transparent)]
pub struct Rgba8([u8; 4]);

impl Rgba8 {
    /// Fully transparent black (all components are 0).
    pub const NONE: Self = Self([0, 0, 0, 0]);
    pub const BLACK: Self = Self([0, 0, 0, 255]);
    pub const WHITE: Self = Self([255, 255, 255, 255]);
    pub const RED: Self = Self([255, 0, 0, 255]);
    pub const GREEN: Self = Self([0, 255, 0, 255]);
    pub const BLUE: Self = Self([0, 0, 255, 255]);
    pub const YELLOW: Self = Self([255, 255, 0, 255]);
    pub const MAGENTA: Self = Self([255, 0, 255, 255]);
    pub const CYAN: Self = Self([0, 255, 255, 255]);

    #[inline]
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    #[inline]
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// Parses a hex color string.
    ///
    /// Accepts `rgb`, `rgba`, `rrggbb` and `rrggbbaa` digits, optionally prefixed with `#`. Colors
    /// without an alpha component are opaque.
    ///
    /// # Examples
    ///
    /// ```
    /// # use trellis_color::Rgba8;
    /// assert_eq!(Rgba8::from_hex("#f80"), Ok(Rgba8::from_rgb8(0xff, 0x88, 0x00)));
    /// assert_eq!(Rgba8::from_hex("11223344"), Ok(Rgba8::from_rgba8(0x11, 0x22, 0x33, 0x44)));
    /// assert!(Rgba8::from_hex("#12345").is_err());
    /// ```
    pub fn from_hex(s: &str) -> Result<Self, HexColorError> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        let nibbles = digits
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8).ok_or(HexColorError::InvalidDigit(c)))
            .collect::<Result<Vec<u8>, _>>()?;

        let short = |n: &[u8]| n.iter().map(|d| d * 0x11).collect::<Vec<_>>();
        let long = |n: &[u8]| n.chunks(2).map(|p| p[0] << 4 | p[1]).collect::<Vec<_>>();
        let mut channels = match nibbles.len() {
            3 | 4 => short(&nibbles),
            6 | 8 => long(&nibbles),
            len => return Err(HexColorError::InvalidLength(len)),
        };
        if channels.len() == 3 {
            channels.push(255);
        }

        Ok(Self([channels[0], channels[1], channels[2], channels[3]]))
    }

    #[inline]
    pub fn r(&self) -> u8 {
        self.0[0]
    }

    #[inline]
    pub fn g(&self) -> u8 {
        self.0[1]
    }

    #[inline]
    pub fn b(&self) -> u8 {
        self.0[2]
    }

    #[inline]
    pub fn a(&self) -> u8 {
        self.0[3]
    }

    pub fn with_alpha(mut self, a: u8) -> Self {
        self.0[3] = a;
        self
    }

    /// Converts this color to linear sRGB with channel values in range 0.0 to 1.0.
    pub fn to_linear(self) -> Color {
        let channel = |c: u8| srgb_to_linear(f32::from(c) / 255.0);
        Color::new(
            channel(self.r()),
            channel(self.g()),
            channel(self.b()),
            f32::from(self.a()) / 255.0,
        )
    }
}

impl fmt::Debug for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r(),
            self.g(),
            self.b(),
            self.a(),
        )
    }
}

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for Rgba8 {
    type Err = HexColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Index<usize> for Rgba8 {
    type Output = u8;

    #[inline]
    fn index(&self, index: usize) -> &u8 {
        &self.0[index]
    }
}

impl From<Rgba8> for Color {
    fn from(c: Rgba8) -> Self {
        c.to_linear()
    }
}

/// Error returned by [`Rgba8::from_hex`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HexColorError {
    #[error("invalid hex digit '{0}' in color")]
    InvalidDigit(char),
    #[error("hex color must have 3, 4, 6 or 8 digits, got {0}")]
    InvalidLength(usize),
}
