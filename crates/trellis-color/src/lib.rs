//! Color types.
//!
//! - [`Color`] is a floating-point RGBA color in *linear* sRGB space with straight (not
//!   premultiplied) alpha. This is the type to do math on: blending, scaling, interpolation.
//! - [`Rgba8`] is an 8-bit color in *non-linear* sRGB space, as used by image files, CSS and most
//!   color pickers. It can be parsed from hex strings like `#ff8800`.
//!
//! [`Color`] can be packed into (and unpacked from) 32-bit and 64-bit integers. Since linear
//! colors may exceed 1.0 (for HDR content), packing takes a [`ColorRange`] that specifies which
//! values the integer range is mapped to.
//!
//! ```
//! use trellis_color::{Color, ColorRange, Rgba8};
//!
//! let orange: Rgba8 = "#ff8800".parse().unwrap();
//! let linear = orange.to_linear();
//! assert_eq!(linear.to_srgb8(), orange);
//!
//! let packed = Color::RED.pack_rgba8(ColorRange::SDR);
//! assert_eq!(packed, 0xff0000ff);
//! assert_eq!(Color::unpack_rgba8(packed, ColorRange::SDR), Color::RED);
//! ```

mod linear;
mod srgb;

pub use linear::{Color, ColorRange};
pub use srgb::{linear_to_srgb, srgb_to_linear, HexColorError, Rgba8};
