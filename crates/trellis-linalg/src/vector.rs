use std::{array, fmt};

use crate::{
    traits::{Number, Sqrt},
    Mat2, Matrix, MinMax, One, Trig, Zero,
};

mod ops;
mod view;

pub use view::{X, XY, XYZ, XYZW};

pub type Vec1<T> = Vector<T, 1>;
pub type Vec2<T> = Vector<T, 2>;
pub type Vec3<T> = Vector<T, 3>;
pub type Vec4<T> = Vector<T, 4>;

/// [`Vec1`] of [`f32`].
pub type Vec1f = Vec1<f32>;
/// [`Vec2`] of [`f32`].
pub type Vec2f = Vec2<f32>;
/// [`Vec3`] of [`f32`].
pub type Vec3f = Vec3<f32>;
/// [`Vec4`] of [`f32`].
pub type Vec4f = Vec4<f32>;

/// Column vector with `N` elements of type `T`.
///
/// `Vector` is a transparent wrapper around `[T; N]`. It converts to and from arrays with
/// [`From`], compares equal to arrays, and exposes its storage through [`Vector::as_array`] and
/// friends. Vectors with 1 to 4 elements also dereference to a struct with `x`, `y`, `z` and `w`
/// fields.
///
/// Arithmetic operators work element by element. Multiplying or dividing by a `T` scales every
/// element.
///
/// ```
/// # use trellis_linalg::*;
/// let mut v = vec3(1.0, 2.0, 2.0);
/// v.z += 1.0;
/// assert_eq!(v * 2.0, [2.0, 4.0, 6.0]);
/// assert_eq!(v.length2(), 14.0);
/// ```
#[derive(Clone, Copy, Hash)]
#[repr(transparent)]
pub struct Vector<T, const N: usize>([T; N]);

unsafe impl<T: bytemuck::Zeroable, const N: usize> bytemuck::Zeroable for Vector<T, N> {}
unsafe impl<T: bytemuck::Pod, const N: usize> bytemuck::Pod for Vector<T, N> {}

impl<T: Zero, const N: usize> Vector<T, N> {
    pub const ZERO: Self = Self([T::ZERO; N]);
}

/// Generates the unit vectors `X`, `Y`, `Z` and `W` for a dimension.
macro_rules! axes {
    (@elem 0) => { T::ZERO };
    (@elem 1) => { T::ONE };
    ($n:literal: $($axis:ident = [$($bit:tt),+]),+) => {
        impl<T: Zero + One> Vector<T, $n> {
            $(
                pub const $axis: Self = Self([$(axes!(@elem $bit)),+]);
            )+
        }
    };
}

axes!(1: X = [1]);
axes!(2: X = [1, 0], Y = [0, 1]);
axes!(3: X = [1, 0, 0], Y = [0, 1, 0], Z = [0, 0, 1]);
axes!(4: X = [1, 0, 0, 0], Y = [0, 1, 0, 0], Z = [0, 0, 1, 0], W = [0, 0, 0, 1]);

/// Construction and element access.
impl<T, const N: usize> Vector<T, N> {
    /// Fills all `N` elements with `elem`.
    ///
    /// ```
    /// # use trellis_linalg::*;
    /// assert_eq!(Vector::splat(2), vec3(2, 2, 2));
    /// ```
    #[inline]
    pub fn splat(elem: T) -> Self
    where
        T: Copy,
    {
        Self([elem; N])
    }

    /// Computes each element from its index.
    pub fn from_fn<F: FnMut(usize) -> T>(f: F) -> Self {
        Self(array::from_fn(f))
    }

    /// Transforms every element with `f`.
    ///
    /// Also used to convert the element type:
    ///
    /// ```
    /// # use trellis_linalg::*;
    /// assert_eq!(vec3(1, 2, 3).map(f64::from), vec3(1.0, 2.0, 3.0));
    /// ```
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Vector<U, N> {
        Vector(self.0.map(f))
    }

    /// Pairs up the elements of `self` and `other`.
    ///
    /// ```
    /// # use trellis_linalg::*;
    /// assert_eq!(vec2(1, 2).zip(vec2('a', 'b')), vec2((1, 'a'), (2, 'b')));
    /// ```
    pub fn zip<U>(self, other: Vector<U, N>) -> Vector<(T, U), N> {
        let mut pairs = self.0.into_iter().zip(other.0);
        Vector::from_fn(|_| match pairs.next() {
            Some(pair) => pair,
            None => unreachable!(),
        })
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.0.get(index)
    }

    #[inline]
    pub const fn as_array(&self) -> &[T; N] {
        &self.0
    }

    #[inline]
    pub fn as_mut_array(&mut self) -> &mut [T; N] {
        &mut self.0
    }

    #[inline]
    pub const fn as_slice(&self) -> &[T] {
        &self.0
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.0
    }

    #[inline]
    pub fn into_array(self) -> [T; N] {
        self.0
    }
}

/// Metric operations.
impl<T: Number, const N: usize> Vector<T, N> {
    pub fn sum(self) -> T {
        let mut total = T::ZERO;
        for elem in self.0 {
            total = total + elem;
        }
        total
    }

    /// Sum of the element-wise products of `self` and `other`.
    ///
    /// Positive when the vectors point in roughly the same direction, zero when they are
    /// orthogonal.
    ///
    /// ```
    /// # use trellis_linalg::*;
    /// assert_eq!(vec3(1, 3, -5).dot(vec3(4, -2, -1)), 3);
    /// ```
    pub fn dot(self, other: Self) -> T {
        (self * other).sum()
    }

    /// Squared length. Avoids the square root when only comparing lengths.
    pub fn length2(&self) -> T {
        self.dot(*self)
    }

    /// Euclidean length.
    #[doc(alias = "norm")]
    #[doc(alias = "magnitude")]
    pub fn length(&self) -> T
    where
        T: Sqrt,
    {
        self.length2().sqrt()
    }

    /// Scales `self` to unit length.
    ///
    /// A zero-length vector yields NaN elements for floats and a division panic for integers.
    /// [`Vector::try_normalize`] checks for that case.
    pub fn normalize(self) -> Self
    where
        T: Sqrt,
    {
        self / self.length()
    }

    /// Like [`Vector::normalize`], but returns [`None`] for a zero-length vector.
    ///
    /// ```
    /// # use trellis_linalg::*;
    /// assert_eq!(vec2(0.0, -3.0).try_normalize(), Some(-Vec2f::Y));
    /// assert_eq!(Vec2f::ZERO.try_normalize(), None);
    /// ```
    pub fn try_normalize(self) -> Option<Self>
    where
        T: Sqrt,
    {
        match self.length() {
            len if len == T::ZERO => None,
            len => Some(self / len),
        }
    }

    pub fn distance2(self, other: Self) -> T {
        (other - self).length2()
    }

    pub fn distance(self, other: Self) -> T
    where
        T: Sqrt,
    {
        (other - self).length()
    }

    /// Interpolates linearly, returning `self` at `t = 0` and `other` at `t = 1`.
    ///
    /// ```
    /// # use trellis_linalg::*;
    /// assert_eq!(vec2(0.0, 10.0).lerp(vec2(4.0, 20.0), 0.25), vec2(1.0, 12.5));
    /// ```
    pub fn lerp(self, other: Self, t: T) -> Self {
        self + (other - self) * t
    }

    /// Unsigned angle between `self` and `other` in radians, in `[0, π]`.
    ///
    /// Meaningless if either vector has zero length. See [`Vector::signed_angle_to`] for 2D.
    pub fn abs_angle_to(self, other: Self) -> T
    where
        T: Trig + Sqrt + MinMax,
    {
        let cos = self.dot(other) / (self.length() * other.length());
        // Keep `acos` in its domain despite rounding.
        MinMax::clamp(cos, -T::ONE, T::ONE).acos()
    }

    /// Outer product `self * otherᵀ`.
    ///
    /// ```
    /// # use trellis_linalg::*;
    /// let m = vec2(1, 2).outer(vec3(3, 4, 5));
    /// assert_eq!(m, Matrix::from_rows([[3, 4, 5], [6, 8, 10]]));
    /// ```
    pub fn outer<const M: usize>(self, other: Vector<T, M>) -> Matrix<T, N, M> {
        Matrix::from_fn(|r, c| self[r] * other[c])
    }
}

/// Component-wise comparisons.
///
/// Floats follow [`f32::min`] semantics and prefer the non-NaN operand.
///
/// ```
/// # use trellis_linalg::*;
/// let a = vec3(-1.0, 2.0, f32::NAN);
/// let b = vec3(3.0, f32::NEG_INFINITY, 0.0);
/// assert_eq!(a.min(b), vec3(-1.0, f32::NEG_INFINITY, 0.0));
/// assert_eq!(vec3(-1, 5, 2).clamp(Vector::splat(0), Vector::splat(3)), vec3(0, 3, 2));
/// ```
impl<T: MinMax + Copy, const N: usize> Vector<T, N> {
    pub fn min(self, other: Self) -> Self {
        self.zip(other).map(|(a, b)| a.min(b))
    }

    pub fn max(self, other: Self) -> Self {
        self.zip(other).map(|(a, b)| a.max(b))
    }

    pub fn clamp(self, min: Self, max: Self) -> Self {
        Self::from_fn(|i| self[i].clamp(min[i], max[i]))
    }
}

/// Generates `extend` and `truncate` between neighbouring dimensions.
macro_rules! resize {
    ($($small:literal <-> $large:literal: [$($e:ident),+];)+) => {
        $(
            impl<T> Vector<T, $small> {
                /// Appends `value` as a new last element.
                ///
                /// A 3D point extended with `1` is in homogeneous coordinates.
                pub fn extend(self, value: T) -> Vector<T, $large> {
                    let [$($e),+] = self.0;
                    Vector([$($e,)+ value])
                }
            }

            impl<T> Vector<T, $large> {
                /// Drops the last element.
                pub fn truncate(self) -> Vector<T, $small> {
                    let [$($e,)+ _] = self.0;
                    Vector([$($e),+])
                }
            }
        )+
    };
}

resize! {
    1 <-> 2: [x];
    2 <-> 3: [x, y];
    3 <-> 4: [x, y, z];
}

/// 2D rotations use a Y-up coordinate system.
impl<T: Number + Trig> Vec2<T> {
    /// ```
    /// # use trellis_linalg::*;
    /// use std::f32::consts::PI;
    ///
    /// assert_approx_eq!(Vec2f::Y.rotate_clockwise(PI / 2.0), Vec2f::X);
    /// assert_approx_eq!(Vec2f::Y.rotate_clockwise(PI), -Vec2f::Y);
    /// ```
    pub fn rotate_clockwise(self, radians: T) -> Self {
        Mat2::rotation_clockwise(radians) * self
    }

    pub fn rotate_counterclockwise(self, radians: T) -> Self {
        Mat2::rotation_counterclockwise(radians) * self
    }

    /// Clockwise angle in radians that rotates `self` onto `other`, in `[-π, π]`.
    ///
    /// With a Y-down coordinate system, swap the operands.
    ///
    /// ```
    /// # use trellis_linalg::*;
    /// use std::f32::consts::PI;
    ///
    /// assert_approx_eq!(Vec2f::Y.signed_angle_to(Vec2f::X), PI / 2.0);
    /// assert_approx_eq!(Vec2f::X.signed_angle_to(Vec2f::Y), -PI / 2.0);
    /// ```
    pub fn signed_angle_to(self, other: Self) -> T {
        -self.perp_dot(other).atan2(self.dot(other))
    }
}

impl<T: Number> Vec2<T> {
    /// Z component of the 3D cross product of `self` and `other` (with `z = 0`).
    pub fn perp_dot(self, other: Self) -> T {
        let [ax, ay] = self.0;
        let [bx, by] = other.0;
        ax * by - ay * bx
    }
}

impl<T: Number> Vec3<T> {
    /// Vector perpendicular to `self` and `other`, following the right-hand rule.
    ///
    /// ```
    /// # use trellis_linalg::*;
    /// assert_eq!(Vec3f::X.cross(Vec3f::Y), Vec3f::Z);
    /// assert_eq!(Vec3f::Y.cross(Vec3f::X), -Vec3f::Z);
    /// ```
    pub fn cross(self, other: Self) -> Self {
        Self::from_fn(|i| {
            let (j, k) = ((i + 1) % 3, (i + 2) % 3);
            self[j] * other[k] - self[k] * other[j]
        })
    }
}

impl<T: Default, const N: usize> Default for Vector<T, N> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T, N> {
    #[inline]
    fn from(elems: [T; N]) -> Self {
        Self(elems)
    }
}

impl<T, const N: usize> From<Vector<T, N>> for [T; N] {
    #[inline]
    fn from(v: Vector<T, N>) -> Self {
        v.0
    }
}

impl<T, const N: usize> AsRef<[T]> for Vector<T, N> {
    fn as_ref(&self) -> &[T] {
        &self.0
    }
}

impl<T, const N: usize> AsMut<[T]> for Vector<T, N> {
    fn as_mut(&mut self) -> &mut [T] {
        &mut self.0
    }
}

/// Writes `(a, b, ...)`, formatting every element with the same flags.
fn write_tuple<T>(
    f: &mut fmt::Formatter<'_>,
    elems: &[T],
    mut write_elem: impl FnMut(&T, &mut fmt::Formatter<'_>) -> fmt::Result,
) -> fmt::Result {
    f.write_str("(")?;
    for (i, elem) in elems.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_elem(elem, f)?;
    }
    f.write_str(")")
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for Vector<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tuple(f, &self.0, T::fmt)
    }
}

impl<T: fmt::Display, const N: usize> fmt::Display for Vector<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tuple(f, &self.0, T::fmt)
    }
}

#[inline]
pub const fn vec1<T>(x: T) -> Vec1<T> {
    Vector([x])
}

#[inline]
pub const fn vec2<T>(x: T, y: T) -> Vec2<T> {
    Vector([x, y])
}

#[inline]
pub const fn vec3<T>(x: T, y: T, z: T) -> Vec3<T> {
    Vector([x, y, z])
}

#[inline]
pub const fn vec4<T>(x: T, y: T, z: T, w: T) -> Vec4<T> {
    Vector([x, y, z, w])
}
