//! Element type capabilities.
//!
//! [`Vector`][crate::Vector] and [`Matrix`][crate::Matrix] methods only require what they use:
//! [`Number`] for arithmetic, [`Sqrt`] for lengths, [`Trig`] for angles and so on. The built-in
//! integer and float types implement whichever traits apply to them.

use std::ops;

/// Trigonometric functions, with angles in radians.
pub trait Trig: Sized {
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn tan(self) -> Self;
    fn asin(self) -> Self;
    fn acos(self) -> Self;
    fn atan(self) -> Self;
    /// Four-quadrant arctangent of `self / other`.
    fn atan2(self, other: Self) -> Self;
    /// `(sin, cos)`.
    fn sin_cos(self) -> (Self, Self);
}

pub trait Sqrt {
    fn sqrt(self) -> Self;
}

/// Minimum and maximum.
///
/// Floats forward to the inherent `min`/`max`, which ignore a NaN operand. Integers use [`Ord`].
pub trait MinMax: Sized {
    fn min(self, other: Self) -> Self;
    fn max(self, other: Self) -> Self;

    /// Restricts `self` to `min..=max`.
    fn clamp(self, min: Self, max: Self) -> Self {
        self.max(min).min(max)
    }
}

/// Additive identity.
pub trait Zero {
    const ZERO: Self;
}

/// Multiplicative identity.
pub trait One {
    const ONE: Self;
}

/// Signed arithmetic type closed under `+ - * /`. Implemented automatically.
pub trait Number:
    Zero
    + One
    + Copy
    + PartialEq
    + ops::Neg<Output = Self>
    + ops::Add<Output = Self>
    + ops::Sub<Output = Self>
    + ops::Mul<Output = Self>
    + ops::Div<Output = Self>
{
}

impl<T> Number for T where
    T: Zero
        + One
        + Copy
        + PartialEq
        + ops::Neg<Output = T>
        + ops::Add<Output = T>
        + ops::Sub<Output = T>
        + ops::Mul<Output = T>
        + ops::Div<Output = T>
{
}

/// A signed [`Number`] that knows whether it is an integral or a floating-point type.
///
/// Algorithms that need to decide whether a value is "zero" (eg. whether a matrix is singular)
/// use [`Scalar::is_negligible`], which compares exactly for integers and against
/// [`Float::EPSILON`] for floats.
pub trait Scalar: Number + PartialOrd {
    /// Whether `Self` is a floating-point type.
    const IS_FLOAT: bool;

    /// Returns the absolute value of `self`.
    fn abs(self) -> Self;

    /// Returns whether `self` should be treated as zero.
    ///
    /// # Examples
    ///
    /// ```
    /// # use trellis_linalg::*;
    /// assert!(0i32.is_negligible());
    /// assert!(!1i32.is_negligible());
    /// assert!(1e-9f32.is_negligible());
    /// ```
    fn is_negligible(self) -> bool;
}

/// Floating-point [`Scalar`]s.
pub trait Float: Scalar + Sqrt + Trig + MinMax {
    /// Difference between `1.0` and the next larger representable number.
    const EPSILON: Self;
    /// Positive infinity.
    const INFINITY: Self;
    /// Archimedes' constant (π).
    const PI: Self;

    /// Converts an [`f64`] to `Self`, rounding if necessary.
    fn from_f64(value: f64) -> Self;
    /// Converts `self` to an [`f64`].
    fn to_f64(self) -> f64;
    /// Returns the largest integer less than or equal to `self`.
    fn floor(self) -> Self;
    /// Returns whether `self` is neither infinite nor NaN.
    fn is_finite(self) -> bool;
}

macro_rules! int_impls {
    ($($t:ty),+ $(; signed: $($s:ty),+)?) => {
        $(
            impl Zero for $t {
                const ZERO: Self = 0;
            }

            impl One for $t {
                const ONE: Self = 1;
            }

            impl MinMax for $t {
                fn min(self, other: Self) -> Self {
                    Ord::min(self, other)
                }

                fn max(self, other: Self) -> Self {
                    Ord::max(self, other)
                }
            }
        )+
        $($(
            impl Scalar for $s {
                const IS_FLOAT: bool = false;

                fn abs(self) -> Self {
                    <$s>::abs(self)
                }

                fn is_negligible(self) -> bool {
                    self == 0
                }
            }
        )+)?
    };
}

int_impls!(u8, u16, u32, u64, u128, usize);
int_impls!(i8, i16, i32, i64, i128, isize; signed: i8, i16, i32, i64, i128, isize);

/// Forwards trait methods to the inherent float methods of the same name.
macro_rules! forward {
    ($t:ident: $($f:ident($($arg:ident),*) -> $ret:ty;)+) => {
        $(
            fn $f(self $(, $arg: Self)*) -> $ret {
                <$t>::$f(self $(, $arg)*)
            }
        )+
    };
}

macro_rules! float_impls {
    ($($t:ident),+) => {
        $(
            impl Zero for $t {
                const ZERO: Self = 0.0;
            }

            impl One for $t {
                const ONE: Self = 1.0;
            }

            impl MinMax for $t {
                forward! { $t:
                    min(other) -> Self;
                    max(other) -> Self;
                }
            }

            impl Sqrt for $t {
                forward! { $t: sqrt() -> Self; }
            }

            impl Trig for $t {
                forward! { $t:
                    sin() -> Self;
                    cos() -> Self;
                    tan() -> Self;
                    asin() -> Self;
                    acos() -> Self;
                    atan() -> Self;
                    atan2(other) -> Self;
                    sin_cos() -> (Self, Self);
                }
            }

            impl Scalar for $t {
                const IS_FLOAT: bool = true;

                fn abs(self) -> Self {
                    <$t>::abs(self)
                }

                fn is_negligible(self) -> bool {
                    <$t>::abs(self) <= <$t>::EPSILON
                }
            }

            impl Float for $t {
                const EPSILON: Self = <$t>::EPSILON;
                const INFINITY: Self = <$t>::INFINITY;
                const PI: Self = std::$t::consts::PI;

                fn from_f64(value: f64) -> Self {
                    value as $t
                }

                fn to_f64(self) -> f64 {
                    self.into()
                }

                forward! { $t:
                    floor() -> Self;
                    is_finite() -> bool;
                }
            }
        )+
    };
}

float_impls!(f32, f64);
