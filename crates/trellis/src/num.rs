//! Utilities for numerics.

use std::{
    cmp::Ordering,
    fmt,
    ops::{Add, AddAssign},
};

macro_rules! total_float {
    ($name:ident, $f:ty) => {
        #[doc = concat!("An `", stringify!($f), "` that implements [`Ord`] according to the IEEE 754 totalOrder predicate.")]
        ///
        /// This makes floating-point values usable as keys in ordered collections and as edge
        /// weights in [`Graph::dijkstra`][crate::graph::Graph::dijkstra].
        #[derive(Clone, Copy, Default)]
        pub struct $name(pub $f);

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.cmp(other) == Ordering::Equal
            }
        }

        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                <$f>::total_cmp(&self.0, &other.0)
            }
        }

        impl Add for $name {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl From<$f> for $name {
            fn from(f: $f) -> Self {
                Self(f)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

total_float!(TotalF32, f32);
total_float!(TotalF64, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_order() {
        let mut v = [3.0, -0.0, f32::NAN, 0.0, -1.5, f32::NEG_INFINITY].map(TotalF32);
        v.sort();
        let sorted = v.map(|f| f.0);
        assert_eq!(sorted[0], f32::NEG_INFINITY);
        assert_eq!(sorted[1], -1.5);
        assert!(sorted[2] == 0.0 && sorted[2].is_sign_negative());
        assert!(sorted[3] == 0.0 && sorted[3].is_sign_positive());
        assert_eq!(sorted[4], 3.0);
        assert!(sorted[5].is_nan());

        assert_eq!(TotalF64(f64::NAN), TotalF64(f64::NAN));
        assert_ne!(TotalF64(0.0), TotalF64(-0.0));
    }

    #[test]
    fn add() {
        let mut x = TotalF64(1.5) + TotalF64::from(2.0);
        x += TotalF64(0.5);
        assert_eq!(x, TotalF64(4.0));
        assert_eq!(TotalF32::default(), TotalF32(0.0));
        assert_eq!(format!("{x:?} {x}"), "4.0 4");
    }
}
