//! Fast approximations of the trigonometric functions.
//!
//! These trade accuracy for speed and are meant for things like animation or procedural content,
//! where an error in the third decimal place is invisible. Use the methods of [`Trig`] when
//! accuracy matters.
//!
//! | Function                          | Max. absolute error |
//! |-----------------------------------|---------------------|
//! | `sin_approx`, `cos_approx`        | 1.2e-3              |
//! | `atan_approx`, `atan2_approx`     | 5e-3                |
//! | `asin_approx`, `acos_approx`      | 5e-3                |
//!
//! [`Trig`]: crate::Trig

use crate::Float;

/// Cheap approximations of trigonometric functions, implemented for all [`Float`] types.
///
/// # Examples
///
/// ```
/// # use trellis_linalg::{assert_approx_eq, trig::TrigApprox};
/// use std::f32::consts::FRAC_PI_2;
///
/// assert_approx_eq!(FRAC_PI_2.sin_approx(), 1.0).abs(1e-3);
/// assert_approx_eq!(1.0f32.atan2_approx(1.0), FRAC_PI_2 / 2.0).abs(5e-3);
/// assert_eq!(0.0f32.atan2_approx(0.0), 0.0);
/// ```
pub trait TrigApprox: Sized {
    /// Maps an angle in radians into the range `[-π, π)`.
    fn wrap_angle(self) -> Self;
    /// Approximates the sine of `self` (in radians).
    fn sin_approx(self) -> Self;
    /// Approximates the cosine of `self` (in radians).
    fn cos_approx(self) -> Self;
    /// Approximates the tangent of `self` (in radians).
    fn tan_approx(self) -> Self;
    /// Approximates the arctangent of `self`, in `[-π/2, π/2]`.
    fn atan_approx(self) -> Self;
    /// Approximates the four-quadrant arctangent of `self / x`, in `[-π, π]`.
    ///
    /// Returns 0 when both arguments are 0.
    fn atan2_approx(self, x: Self) -> Self;
    /// Approximates the arcsine of `self`. Inputs outside `[-1, 1]` are clamped.
    fn asin_approx(self) -> Self;
    /// Approximates the arccosine of `self`. Inputs outside `[-1, 1]` are clamped.
    fn acos_approx(self) -> Self;
}

impl<T: Float> TrigApprox for T {
    fn wrap_angle(self) -> Self {
        let tau = T::PI + T::PI;
        self - tau * ((self + T::PI) / tau).floor()
    }

    fn sin_approx(self) -> Self {
        // Parabola through the zeroes and extrema of `sin` on `[-π, π]`, followed by one
        // correction step that blends it with its own square.
        let x = self.wrap_angle();
        let b = T::from_f64(4.0 / std::f64::consts::PI);
        let c = T::from_f64(-4.0 / (std::f64::consts::PI * std::f64::consts::PI));
        let p = T::from_f64(0.225);

        let y = b * x + c * x * x.abs();
        p * (y * y.abs() - y) + y
    }

    fn cos_approx(self) -> Self {
        (self + T::PI / (T::ONE + T::ONE)).sin_approx()
    }

    fn tan_approx(self) -> Self {
        self.sin_approx() / self.cos_approx()
    }

    fn atan_approx(self) -> Self {
        let quarter_pi = T::PI / T::from_f64(4.0);
        let half_pi = T::PI / (T::ONE + T::ONE);

        if self.abs() > T::ONE {
            // atan(x) = ±π/2 - atan(1/x)
            let inner = (T::ONE / self).atan_approx();
            return if self > T::ZERO {
                half_pi - inner
            } else {
                -half_pi - inner
            };
        }

        let a = self.abs();
        quarter_pi * self - self * (a - T::ONE) * (T::from_f64(0.2447) + T::from_f64(0.0663) * a)
    }

    fn atan2_approx(self, x: Self) -> Self {
        let y = self;
        if x == T::ZERO && y == T::ZERO {
            return T::ZERO;
        }

        let half_pi = T::PI / (T::ONE + T::ONE);
        if x.abs() >= y.abs() {
            let angle = (y / x).atan_approx();
            if x >= T::ZERO {
                angle
            } else if y >= T::ZERO {
                angle + T::PI
            } else {
                angle - T::PI
            }
        } else {
            let angle = (x / y).atan_approx();
            if y > T::ZERO {
                half_pi - angle
            } else {
                -half_pi - angle
            }
        }
    }

    fn asin_approx(self) -> Self {
        let x = self.clamp(-T::ONE, T::ONE);
        x.atan2_approx((T::ONE - x * x).sqrt())
    }

    fn acos_approx(self) -> Self {
        let x = self.clamp(-T::ONE, T::ONE);
        (T::ONE - x * x).sqrt().atan2_approx(x)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use crate::assert_approx_eq;

    use super::*;

    fn samples(from: f64, to: f64) -> impl Iterator<Item = f64> {
        const STEPS: usize = 2000;
        (0..=STEPS).map(move |i| from + (to - from) * i as f64 / STEPS as f64)
    }

    #[test]
    fn wrap() {
        assert_approx_eq!(0.5f64.wrap_angle(), 0.5);
        assert_approx_eq!((3.0 * PI + 0.5).wrap_angle(), -PI + 0.5).abs(1e-12);
        assert_approx_eq!((-3.5 * PI).wrap_angle(), 0.5 * PI).abs(1e-12);
        for x in samples(-20.0, 20.0) {
            let w = x.wrap_angle();
            assert!((-PI..PI).contains(&w) || (w - PI).abs() < 1e-12, "{x} -> {w}");
        }
    }

    #[test]
    fn sin_cos() {
        for x in samples(-10.0, 10.0) {
            assert_approx_eq!(x.sin_approx(), x.sin(), "sin({x})").abs(1.2e-3);
            assert_approx_eq!(x.cos_approx(), x.cos(), "cos({x})").abs(1.2e-3);
        }
        for x in samples(-4.0, 4.0).map(|x| x as f32) {
            assert_approx_eq!(x.sin_approx(), x.sin(), "sin({x})").abs(1.2e-3);
        }
    }

    #[test]
    fn tan() {
        for x in samples(-0.8, 0.8) {
            assert_approx_eq!(x.tan_approx(), x.tan(), "tan({x})").abs(5e-3);
        }
    }

    #[test]
    fn atan() {
        for x in samples(-50.0, 50.0) {
            assert_approx_eq!(x.atan_approx(), x.atan(), "atan({x})").abs(5e-3);
        }
    }

    #[test]
    fn atan2() {
        assert_eq!(0.0f64.atan2_approx(0.0), 0.0);
        for angle in samples(-PI + 1e-6, PI - 1e-6) {
            let (y, x) = angle.sin_cos();
            assert_approx_eq!(y.atan2_approx(x), angle, "atan2({y}, {x})").abs(5e-3);
            assert_approx_eq!((3.0 * y).atan2_approx(3.0 * x), angle).abs(5e-3);
        }
    }

    #[test]
    fn asin_acos() {
        for x in samples(-1.0, 1.0) {
            assert_approx_eq!(x.asin_approx(), x.asin(), "asin({x})").abs(5e-3);
            assert_approx_eq!(x.acos_approx(), x.acos(), "acos({x})").abs(5e-3);
        }
        assert_approx_eq!(2.0f64.asin_approx(), PI / 2.0).abs(5e-3);
        assert_approx_eq!((-2.0f64).acos_approx(), PI).abs(5e-3);
    }
}
