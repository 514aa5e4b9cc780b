//! Approximate equality.
//!
//! Floating-point results rarely match an expected value exactly. [`ApproxEq`] offers three ways
//! of comparing values with some slack:
//!
//! - *absolute*: `|a - b| <= tolerance`, suitable for values near zero;
//! - *relative*: `|a - b| <= max(|a|, |b|) * tolerance`, suitable for everything else;
//! - *ULPs*: the number of representable floats between `a` and `b`.
//!
//! The [`assert_approx_eq!`][crate::assert_approx_eq] and
//! [`assert_approx_ne!`][crate::assert_approx_ne] macros build on this trait.
//!
//! Background reading:
//! <https://randomascii.wordpress.com/2012/02/25/comparing-floating-point-numbers-2012-edition/>

mod impls;

use std::{fmt, panic::Location};

/// Types that can be compared for *approximate equality*.
///
/// Compound values (vectors, matrices, shapes, ...) compare equal when every one of their
/// components does.
///
/// All comparisons treat `NaN` as unequal to everything, and infinities as equal only to
/// themselves.
pub trait ApproxEq<Rhs: ?Sized = Self> {
    /// The type of absolute and relative tolerances, usually [`f32`] or [`f64`].
    type Tolerance: DefaultTolerances + Copy;

    /// Returns whether `self` and `other` differ by at most `abs_tolerance`.
    fn abs_diff_eq(&self, other: &Rhs, abs_tolerance: Self::Tolerance) -> bool;

    /// Returns whether `self` and `other` differ by at most `rel_tolerance` times the larger of
    /// their magnitudes.
    fn rel_diff_eq(&self, other: &Rhs, rel_tolerance: Self::Tolerance) -> bool;

    /// Returns whether at most `ulps_tolerance` representable values lie between `self` and
    /// `other`.
    ///
    /// Values of opposite sign are never equal, with the exception of `-0.0` and `+0.0`.
    fn ulps_diff_eq(&self, other: &Rhs, ulps_tolerance: u32) -> bool;
}

/// Tolerances used by the assertion macros when none are specified.
pub trait DefaultTolerances {
    const DEFAULT_ABS_TOLERANCE: Self;
    const DEFAULT_REL_TOLERANCE: Self;
    const DEFAULT_ULPS_TOLERANCE: u32;
}

macro_rules! default_tolerances {
    ($($f:ty),+) => {
        $(
            impl DefaultTolerances for $f {
                const DEFAULT_ABS_TOLERANCE: Self = <$f>::EPSILON;
                const DEFAULT_REL_TOLERANCE: Self = <$f>::EPSILON;
                const DEFAULT_ULPS_TOLERANCE: u32 = 4;
            }
        )+
    };
}
default_tolerances!(f32, f64);

/// Which comparisons an [`Asserter`] performs.
#[derive(Clone, Copy)]
struct Checks<Tol> {
    abs: Option<Tol>,
    rel: Option<Tol>,
    ulps: Option<u32>,
}

impl<Tol: DefaultTolerances + Copy> Checks<Tol> {
    fn or_default(self) -> Self {
        if self.abs.is_none() && self.rel.is_none() && self.ulps.is_none() {
            Self {
                abs: Some(Tol::DEFAULT_ABS_TOLERANCE),
                rel: Some(Tol::DEFAULT_REL_TOLERANCE),
                ulps: None,
            }
        } else {
            self
        }
    }

    fn pass<T: ApproxEq<Tolerance = Tol>>(self, left: &T, right: &T) -> bool {
        let abs = || self.abs.map_or(false, |tol| left.abs_diff_eq(right, tol));
        let rel = || self.rel.map_or(false, |tol| left.rel_diff_eq(right, tol));
        let ulps = || self.ulps.map_or(false, |tol| left.ulps_diff_eq(right, tol));
        abs() || rel() || ulps()
    }
}

/// Guard returned by [`assert_approx_eq!`][crate::assert_approx_eq] and
/// [`assert_approx_ne!`][crate::assert_approx_ne]. Performs the check when dropped.
///
/// Call [`Asserter::abs`], [`Asserter::rel`] or [`Asserter::ulps`] on it to choose the
/// comparisons. The values are considered equal when *any* chosen comparison passes. If none is
/// chosen, an absolute and a relative comparison with the [`DefaultTolerances`] are performed.
pub struct Asserter<'a, T>
where
    T: ApproxEq + fmt::Debug,
{
    left: &'a T,
    right: &'a T,
    expect_equal: bool,
    location: &'static Location<'static>,
    msg: Option<fmt::Arguments<'a>>,
    checks: Checks<T::Tolerance>,
}

impl<'a, T> Asserter<'a, T>
where
    T: ApproxEq + fmt::Debug,
{
    #[doc(hidden)]
    #[track_caller]
    pub fn new(
        left: &'a T,
        right: &'a T,
        expect_equal: bool,
        msg: Option<fmt::Arguments<'a>>,
    ) -> Self {
        Self {
            left,
            right,
            expect_equal,
            // `Drop::drop` can't be `#[track_caller]`, so remember the macro's location here.
            location: Location::caller(),
            msg,
            checks: Checks {
                abs: None,
                rel: None,
                ulps: None,
            },
        }
    }

    /// Adds an *absolute comparison* with the given tolerance.
    pub fn abs(&mut self, tolerance: T::Tolerance) -> &mut Self {
        self.checks.abs = Some(tolerance);
        self
    }

    /// Adds a *relative comparison* with the given tolerance.
    ///
    /// Note that nothing but 0.0 is relatively equal to 0.0, unless the tolerance is 1.0 or more.
    pub fn rel(&mut self, tolerance: T::Tolerance) -> &mut Self {
        self.checks.rel = Some(tolerance);
        self
    }

    /// Adds a comparison by *units in the last place*.
    pub fn ulps(&mut self, tolerance: u32) -> &mut Self {
        self.checks.ulps = Some(tolerance);
        self
    }
}

impl<'a, T> Drop for Asserter<'a, T>
where
    T: ApproxEq + fmt::Debug,
{
    fn drop(&mut self) {
        let equal = self.checks.or_default().pass(self.left, self.right);
        if equal != self.expect_equal {
            fail(
                self.left,
                self.right,
                self.expect_equal,
                self.location,
                self.msg,
            );
        }
    }
}

#[cold]
fn fail(
    left: &dyn fmt::Debug,
    right: &dyn fmt::Debug,
    expect_equal: bool,
    location: &Location<'_>,
    msg: Option<fmt::Arguments<'_>>,
) -> ! {
    let op = if expect_equal { "==" } else { "!=" };
    let sep = if msg.is_some() { ": " } else { "" };
    let msg = msg.map(|m| m.to_string()).unwrap_or_default();
    panic!("assertion `left {op} right` failed at {location}{sep}{msg}\n  left: {left:?}\n right: {right:?}")
}

/// Asserts that two expressions are approximately equal (see [`ApproxEq`]).
///
/// Accepts an optional message like [`assert_eq!`]. Evaluates to an [`Asserter`] that selects
/// the comparison method.
///
/// # Examples
///
/// ```
/// # use trellis_linalg::*;
/// let sum = (0..10).fold(0.0, |acc, _| acc + 0.1);
/// assert_approx_eq!(sum, 1.0);
///
/// assert_approx_eq!(10.0, 10.5).abs(0.5);
/// assert_approx_eq!(50.0, 50.5).rel(0.01);
/// assert_approx_eq!(1.0, 1.0 + f64::EPSILON, "one ulp apart").ulps(1);
/// ```
///
/// [`Asserter`]: crate::approx::Asserter
/// [`ApproxEq`]: crate::approx::ApproxEq
#[macro_export]
macro_rules! assert_approx_eq {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::approx::Asserter::new(&$lhs, &$rhs, true, ::core::option::Option::None)
    };
    ($lhs:expr, $rhs:expr, $($arg:tt)+) => {
        $crate::approx::Asserter::new(
            &$lhs,
            &$rhs,
            true,
            ::core::option::Option::Some(::core::format_args!($($arg)+)),
        )
    };
}

/// Asserts that two expressions are *not* approximately equal.
///
/// ```
/// # use trellis_linalg::*;
/// assert_approx_ne!(10.0, 11.0).abs(0.5);
/// assert_approx_ne!(1.0, 1.0 + 2.0 * f64::EPSILON).ulps(1);
/// ```
#[macro_export]
macro_rules! assert_approx_ne {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::approx::Asserter::new(&$lhs, &$rhs, false, ::core::option::Option::None)
    };
    ($lhs:expr, $rhs:expr, $($arg:tt)+) => {
        $crate::approx::Asserter::new(
            &$lhs,
            &$rhs,
            false,
            ::core::option::Option::Some(::core::format_args!($($arg)+)),
        )
    };
}

#[cfg(test)]
mod tests {
    #[test]
    #[should_panic(expected = "assertion `left != right` failed")]
    fn fail_ne() {
        assert_approx_ne!(1.0, 1.0);
    }

    #[test]
    #[should_panic(expected = "assertion `left == right` failed")]
    fn fail_eq() {
        assert_approx_eq!(1.0, 2.0);
    }

    #[test]
    #[should_panic(expected = "custom context 42")]
    fn assertion_message() {
        assert_approx_eq!(1.0, 2.0, "custom context {}", 42);
    }

    #[test]
    fn any_check_passes() {
        // Fails the absolute check but passes the relative one.
        assert_approx_eq!(1000.0, 1001.0).abs(0.5).rel(0.01);
        assert_approx_ne!(1000.0, 1001.0).abs(0.5).rel(0.0001).ulps(2);
    }

    #[test]
    fn relative() {
        assert_approx_eq!(200.0, 201.0).rel(0.01);
        assert_approx_ne!(200.0, 205.0).rel(0.01);
        assert_approx_eq!(3.0, -3.0).rel(2.0);
        assert_approx_eq!(0.0, 1e-5).rel(1.0);
        assert_approx_ne!(0.0, 1e-5).rel(0.5);
    }

    #[test]
    fn signs_and_zero() {
        assert_approx_ne!(0.5, -0.5).abs(0.5);
        assert_approx_eq!(0.5, -0.5).abs(1.0);
        assert_approx_eq!(-0.0, 0.0).ulps(0);
        assert_approx_ne!(f64::MIN_POSITIVE, -f64::MIN_POSITIVE).ulps(1 << 20);
    }

    #[test]
    fn non_finite() {
        let nan = f32::NAN;
        assert_approx_ne!(nan, nan).abs(f32::MAX);
        assert_approx_ne!(nan, nan).ulps(u32::MAX);
        assert_approx_ne!(f64::NAN, 1.0).rel(1.0);

        assert_approx_eq!(f32::NEG_INFINITY, f32::NEG_INFINITY).abs(0.0);
        assert_approx_ne!(f32::NEG_INFINITY, f32::INFINITY).rel(100.0);
        assert_approx_ne!(f64::MAX, f64::INFINITY).abs(f64::MAX);
        // Infinity is never close to a finite value, even the largest one.
        assert_approx_ne!(f64::INFINITY, f64::MAX).ulps(1);
        assert_approx_ne!(f32::MAX, f32::INFINITY).ulps(u32::MAX);
        assert_approx_eq!(f32::INFINITY, f32::INFINITY).ulps(0);
        assert_approx_eq!(f64::MAX, f64::MAX - f64::MAX * f64::EPSILON).ulps(2);
    }

    #[test]
    fn arrays_and_slices() {
        assert_approx_eq!([1.0, 2.0], [1.0, 2.0 + 1e-9]).abs(1e-6);
        assert_approx_ne!([1.0, 2.0], [1.0, 2.1]).abs(1e-6);
        assert_approx_ne!(&[1.0f32][..], &[1.0f32, 1.0][..]).abs(1.0);
    }
}
