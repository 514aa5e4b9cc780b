use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, Div, DivAssign, Index, IndexMut, Mul,
    MulAssign, Neg, Not, Sub, SubAssign,
};

use crate::approx::ApproxEq;

use super::Vector;

impl<T, const N: usize> Index<usize> for Vector<T, N> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.0[i]
    }
}

impl<T, const N: usize> IndexMut<usize> for Vector<T, N> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.0[i]
    }
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<Vector<U, N>> for Vector<T, N> {
    fn eq(&self, other: &Vector<U, N>) -> bool {
        self.0 == other.0
    }
}

impl<T: Eq, const N: usize> Eq for Vector<T, N> {}

/// Lets tests write `assert_eq!(v, [1, 2])`.
impl<T: PartialEq<U>, U, const N: usize> PartialEq<[U; N]> for Vector<T, N> {
    fn eq(&self, other: &[U; N]) -> bool {
        self.0 == *other
    }
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<Vector<U, N>> for [T; N] {
    fn eq(&self, other: &Vector<U, N>) -> bool {
        *self == other.0
    }
}

impl<T: ApproxEq, const N: usize> ApproxEq for Vector<T, N> {
    type Tolerance = T::Tolerance;

    fn abs_diff_eq(&self, other: &Self, tolerance: T::Tolerance) -> bool {
        self.0.abs_diff_eq(&other.0, tolerance)
    }

    fn rel_diff_eq(&self, other: &Self, tolerance: T::Tolerance) -> bool {
        self.0.rel_diff_eq(&other.0, tolerance)
    }

    fn ulps_diff_eq(&self, other: &Self, tolerance: u32) -> bool {
        self.0.ulps_diff_eq(&other.0, tolerance)
    }
}

macro_rules! unary {
    ($($op:ident::$f:ident),+) => {
        $(
            impl<T: $op, const N: usize> $op for Vector<T, N> {
                type Output = Vector<T::Output, N>;

                fn $f(self) -> Self::Output {
                    self.map(T::$f)
                }
            }
        )+
    };
}

unary!(Neg::neg, Not::not);

/// `Vector op Vector`, applied to each pair of elements.
macro_rules! per_element {
    ($($op:ident::$f:ident => $assign:ident::$assign_f:ident),+ $(,)?) => {
        $(
            impl<T: $op, const N: usize> $op for Vector<T, N> {
                type Output = Vector<T::Output, N>;

                fn $f(self, rhs: Self) -> Self::Output {
                    self.zip(rhs).map(|(a, b)| a.$f(b))
                }
            }

            impl<T: $assign, const N: usize> $assign for Vector<T, N> {
                fn $assign_f(&mut self, rhs: Self) {
                    for (a, b) in self.0.iter_mut().zip(rhs.0) {
                        a.$assign_f(b);
                    }
                }
            }
        )+
    };
}

per_element! {
    Add::add => AddAssign::add_assign,
    Sub::sub => SubAssign::sub_assign,
    Mul::mul => MulAssign::mul_assign,
    Div::div => DivAssign::div_assign,
    BitAnd::bitand => BitAndAssign::bitand_assign,
    BitOr::bitor => BitOrAssign::bitor_assign,
}

// `Mul<Vector<T, N>>` above already covers every `T`, so scaling can only take a `T`, not a
// generic `U`.

/// `Vector op T`, scaling every element.
macro_rules! scaling {
    ($($op:ident::$f:ident => $assign:ident::$assign_f:ident),+ $(,)?) => {
        $(
            impl<T: $op + Copy, const N: usize> $op<T> for Vector<T, N> {
                type Output = Vector<T::Output, N>;

                fn $f(self, rhs: T) -> Self::Output {
                    self.map(|a| a.$f(rhs))
                }
            }

            impl<T: $assign + Copy, const N: usize> $assign<T> for Vector<T, N> {
                fn $assign_f(&mut self, rhs: T) {
                    for a in &mut self.0 {
                        a.$assign_f(rhs);
                    }
                }
            }
        )+
    };
}

scaling! {
    Mul::mul => MulAssign::mul_assign,
    Div::div => DivAssign::div_assign,
}

#[cfg(test)]
mod tests {
    use crate::{vec2, vec3, Vec2f};

    #[test]
    fn binary() {
        let (a, b) = (vec2(6, 8), vec2(3, 2));
        assert_eq!(a + b, [9, 10]);
        assert_eq!(a - b, [3, 6]);
        assert_eq!(a * b, [18, 16]);
        assert_eq!(a / b, [2, 4]);
        assert_eq!(a * 2, [12, 16]);
        assert_eq!(vec2(1.0, 4.0) / 2.0, vec2(0.5, 2.0));
        assert_eq!(vec2(0b110, 0b011) & vec2(0b011, 0b011), [0b010, 0b011]);
        assert_eq!(vec2(0b100, 0b000) | vec2(0b001, 0b000), [0b101, 0]);
    }

    #[test]
    fn unary() {
        assert_eq!(-vec3(1, -2, 0), [-1, 2, 0]);
        assert_eq!(!vec2(false, true), [true, false]);
    }

    #[test]
    fn assigning() {
        let mut v = vec3(2, 4, 6);
        v /= 2;
        v += vec3(1, 1, 1);
        v *= vec3(1, 0, -1);
        v -= vec3(2, 0, 0);
        assert_eq!(v, [0, 0, -4]);

        let mut bits = vec2(0b01u8, 0b11);
        bits &= vec2(0b11, 0b10);
        bits |= vec2(0b10, 0b00);
        assert_eq!(bits, [0b11, 0b10]);

        let mut f = Vec2f::splat(3.0);
        f *= 0.5;
        assert_eq!(f, [1.5, 1.5]);
    }

    #[test]
    fn array_equality() {
        assert_eq!([1, 2], vec2(1, 2));
        assert_ne!(vec2(1, 2), [2, 1]);
    }
}
