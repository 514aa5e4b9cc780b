use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::{approx::ApproxEq, traits::Number, Matrix, Vector};

/// Indexed by `(row, column)`.
impl<T, const R: usize, const C: usize> Index<(usize, usize)> for Matrix<T, R, C> {
    type Output = T;

    #[inline]
    fn index(&self, (r, c): (usize, usize)) -> &T {
        &self.0[c][r]
    }
}

impl<T, const R: usize, const C: usize> IndexMut<(usize, usize)> for Matrix<T, R, C> {
    #[inline]
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut T {
        &mut self.0[c][r]
    }
}

impl<T: PartialEq<U>, U, const R: usize, const C: usize> PartialEq<Matrix<U, R, C>>
    for Matrix<T, R, C>
{
    fn eq(&self, other: &Matrix<U, R, C>) -> bool {
        self.0 == other.0
    }
}

impl<T: Eq, const R: usize, const C: usize> Eq for Matrix<T, R, C> {}

impl<T: ApproxEq, const R: usize, const C: usize> ApproxEq for Matrix<T, R, C> {
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

macro_rules! elementwise {
    ($($op:ident::$f:ident, $assign:ident::$assign_f:ident;)+) => {
        $(
            impl<T: Number, const R: usize, const C: usize> $op for Matrix<T, R, C> {
                type Output = Self;

                fn $f(self, rhs: Self) -> Self {
                    Self::from_fn(|r, c| self[(r, c)].$f(rhs[(r, c)]))
                }
            }

            impl<T: Number, const R: usize, const C: usize> $assign for Matrix<T, R, C> {
                fn $assign_f(&mut self, rhs: Self) {
                    *self = self.$f(rhs);
                }
            }
        )+
    };
}

elementwise! {
    Add::add, AddAssign::add_assign;
    Sub::sub, SubAssign::sub_assign;
}

impl<T: Number, const R: usize, const C: usize> Neg for Matrix<T, R, C> {
    type Output = Self;

    fn neg(self) -> Self {
        self.map(|e| -e)
    }
}

/// Dot product of `len` pairs of elements.
fn dot<T: Number>(len: usize, pair: impl FnMut(usize) -> (T, T)) -> T {
    (0..len).map(pair).fold(T::ZERO, |acc, (a, b)| acc + a * b)
}

/// `Matrix * column vector`.
impl<T: Number, const R: usize, const C: usize> Mul<Vector<T, C>> for Matrix<T, R, C> {
    type Output = Vector<T, R>;

    fn mul(self, v: Vector<T, C>) -> Vector<T, R> {
        Vector::from_fn(|r| dot(C, |k| (self[(r, k)], v[k])))
    }
}

/// `row vector * Matrix`.
impl<T: Number, const R: usize, const C: usize> Mul<Matrix<T, R, C>> for Vector<T, R> {
    type Output = Vector<T, C>;

    fn mul(self, m: Matrix<T, R, C>) -> Vector<T, C> {
        Vector::from_fn(|c| dot(R, |k| (self[k], m[(k, c)])))
    }
}

impl<T: Number, const R: usize, const K: usize, const C: usize> Mul<Matrix<T, K, C>>
    for Matrix<T, R, K>
{
    type Output = Matrix<T, R, C>;

    fn mul(self, rhs: Matrix<T, K, C>) -> Matrix<T, R, C> {
        Matrix::from_fn(|r, c| dot(K, |k| (self[(r, k)], rhs[(k, c)])))
    }
}

impl<T: Number, const N: usize> MulAssign for Matrix<T, N, N> {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<T: Number, const R: usize, const C: usize> Mul<T> for Matrix<T, R, C> {
    type Output = Self;

    fn mul(self, s: T) -> Self {
        self.map(|e| e * s)
    }
}

impl<T: Number, const R: usize, const C: usize> Div<T> for Matrix<T, R, C> {
    type Output = Self;

    fn div(self, s: T) -> Self {
        self.map(|e| e / s)
    }
}

#[cfg(test)]
mod tests {
    use crate::{assert_approx_eq, assert_approx_ne, Mat2, Mat3f, Matrix};

    #[test]
    fn arithmetic() {
        let a = Matrix::from_rows([[1, -1], [0, 2]]);
        let b = Matrix::from_rows([[3, 3], [1, 1]]);
        assert_eq!(a + b, Matrix::from_rows([[4, 2], [1, 3]]));
        assert_eq!(b - a, Matrix::from_rows([[2, 4], [1, -1]]));
        assert_eq!(-a, Matrix::from_rows([[-1, 1], [0, -2]]));
        assert_eq!(b * 3 / 3, b);

        let mut m = a;
        m += b;
        m -= b;
        assert_eq!(m, a);
        m *= Mat2::IDENTITY;
        assert_eq!(m, a);
        m *= b;
        assert_eq!(m, a * b);
    }

    #[test]
    fn approx() {
        let a = Mat3f::IDENTITY * 3.0;
        assert_approx_eq!(a, a * (1.0 + f32::EPSILON));
        assert_approx_ne!(a, a + Mat3f::IDENTITY * 1e-3);
    }
}
