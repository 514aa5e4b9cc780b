use super::ApproxEq;

macro_rules! impl_float {
    ($f:ty, $bits:ty) => {
        impl ApproxEq for $f {
            type Tolerance = $f;

            fn abs_diff_eq(&self, other: &$f, abs_tolerance: $f) -> bool {
                match (self.is_finite(), other.is_finite()) {
                    (true, true) => (self - other).abs() <= abs_tolerance,
                    // Infinities only match themselves; NaN matches nothing.
                    _ => self == other,
                }
            }

            fn rel_diff_eq(&self, other: &$f, rel_tolerance: $f) -> bool {
                match (self.is_finite(), other.is_finite()) {
                    (true, true) => {
                        let magnitude = self.abs().max(other.abs());
                        (self - other).abs() <= magnitude * rel_tolerance
                    }
                    _ => self == other,
                }
            }

            fn ulps_diff_eq(&self, other: &$f, ulps_tolerance: u32) -> bool {
                if self.is_nan() || other.is_nan() {
                    false
                } else if self.is_infinite() || other.is_infinite() {
                    // `MAX` and infinity are adjacent bit patterns, but not close in value.
                    self == other
                } else if self.is_sign_negative() != other.is_sign_negative() {
                    // Only `-0.0` and `+0.0` are equal across signs.
                    self == other
                } else {
                    let distance: $bits = self.to_bits().abs_diff(other.to_bits());
                    distance <= <$bits>::from(ulps_tolerance)
                }
            }
        }
    };
}

impl_float!(f32, u32);
impl_float!(f64, u64);

/// References compare like the values behind them.
impl<'a, 'b, T, U> ApproxEq<&'b U> for &'a T
where
    T: ApproxEq<U> + ?Sized,
    U: ?Sized,
{
    type Tolerance = T::Tolerance;

    fn abs_diff_eq(&self, other: &&'b U, abs_tolerance: T::Tolerance) -> bool {
        (**self).abs_diff_eq(*other, abs_tolerance)
    }

    fn rel_diff_eq(&self, other: &&'b U, rel_tolerance: T::Tolerance) -> bool {
        (**self).rel_diff_eq(*other, rel_tolerance)
    }

    fn ulps_diff_eq(&self, other: &&'b U, ulps_tolerance: u32) -> bool {
        (**self).ulps_diff_eq(*other, ulps_tolerance)
    }
}

fn pairwise<T, U>(a: &[T], b: &[U], mut eq: impl FnMut(&T, &U) -> bool) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(a, b)| eq(a, b))
}

/// Slices are equal if they have the same length and all elements are equal.
impl<T: ApproxEq<U>, U> ApproxEq<[U]> for [T] {
    type Tolerance = T::Tolerance;

    fn abs_diff_eq(&self, other: &[U], abs_tolerance: T::Tolerance) -> bool {
        pairwise(self, other, |a, b| a.abs_diff_eq(b, abs_tolerance))
    }

    fn rel_diff_eq(&self, other: &[U], rel_tolerance: T::Tolerance) -> bool {
        pairwise(self, other, |a, b| a.rel_diff_eq(b, rel_tolerance))
    }

    fn ulps_diff_eq(&self, other: &[U], ulps_tolerance: u32) -> bool {
        pairwise(self, other, |a, b| a.ulps_diff_eq(b, ulps_tolerance))
    }
}

impl<T: ApproxEq<U>, U, const N: usize> ApproxEq<[U; N]> for [T; N] {
    type Tolerance = T::Tolerance;

    fn abs_diff_eq(&self, other: &[U; N], abs_tolerance: T::Tolerance) -> bool {
        self[..].abs_diff_eq(&other[..], abs_tolerance)
    }

    fn rel_diff_eq(&self, other: &[U; N], rel_tolerance: T::Tolerance) -> bool {
        self[..].rel_diff_eq(&other[..], rel_tolerance)
    }

    fn ulps_diff_eq(&self, other: &[U; N], ulps_tolerance: u32) -> bool {
        self[..].ulps_diff_eq(&other[..], ulps_tolerance)
    }
}

/// `None` only equals `None`.
impl<T: ApproxEq<U>, U> ApproxEq<Option<U>> for Option<T> {
    type Tolerance = T::Tolerance;

    fn abs_diff_eq(&self, other: &Option<U>, abs_tolerance: T::Tolerance) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.abs_diff_eq(b, abs_tolerance),
            (None, None) => true,
            _ => false,
        }
    }

    fn rel_diff_eq(&self, other: &Option<U>, rel_tolerance: T::Tolerance) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.rel_diff_eq(b, rel_tolerance),
            (None, None) => true,
            _ => false,
        }
    }

    fn ulps_diff_eq(&self, other: &Option<U>, ulps_tolerance: u32) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.ulps_diff_eq(b, ulps_tolerance),
            (None, None) => true,
            _ => false,
        }
    }
}
