mod ops;
mod view;

use std::fmt;

use crate::{vec4, Float, Matrix, Number, One, Scalar, Sqrt, Trig, Vector, Zero};

pub use view::IJKW;

/// Quaternion `w + ix + jy + kz`, mainly used for 3D rotations.
///
/// Stored as `[i, j, k, w]`, with the components accessible as fields. Multiplying two
/// quaternions uses the Hamilton product, so `a * b` applies `b` first. Multiplying a vector
/// rotates it.
///
/// ```
/// # use trellis_linalg::*;
/// use std::f64::consts::FRAC_PI_2;
///
/// let q = Quat::from_rotation_z(FRAC_PI_2);
/// assert_approx_eq!(q * vec3(1.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0)).abs(1e-12);
/// assert_approx_eq!(q * q.conjugate(), Quat::IDENTITY).abs(1e-12);
/// ```
#[derive(Clone, Copy, Hash)]
#[repr(transparent)]
pub struct Quat<T> {
    vec: Vector<T, 4>,
}

unsafe impl<T: bytemuck::Zeroable> bytemuck::Zeroable for Quat<T> {}
unsafe impl<T: bytemuck::Pod> bytemuck::Pod for Quat<T> {}

impl<T: Zero + One> Quat<T> {
    /// No rotation.
    pub const IDENTITY: Self = Self {
        vec: vec4(T::ZERO, T::ZERO, T::ZERO, T::ONE),
    };
}

impl<T> Quat<T> {
    /// Takes `i`, `j`, `k` from `x`, `y`, `z`, and the real part from `w`.
    pub fn from_vec(vec: Vector<T, 4>) -> Self {
        Self { vec }
    }

    pub fn from_components(i: T, j: T, k: T, w: T) -> Self {
        Self::from_vec(vec4(i, j, k, w))
    }

    /// Returns `[i, j, k, w]`.
    pub fn into_vec(self) -> Vector<T, 4> {
        self.vec
    }
}

/// Rotations.
impl<T: Number + Trig> Quat<T> {
    /// Rotation by `radians` around the unit vector `axis`.
    pub fn from_axis_angle(axis: Vector<T, 3>, radians: T) -> Self {
        let half = radians / (T::ONE + T::ONE);
        let (sin, cos) = half.sin_cos();
        let [i, j, k] = (axis * sin).into_array();
        Self::from_components(i, j, k, cos)
    }

    pub fn from_rotation_x(radians: T) -> Self {
        Self::from_axis_angle(Vector::<T, 3>::X, radians)
    }

    pub fn from_rotation_y(radians: T) -> Self {
        Self::from_axis_angle(Vector::<T, 3>::Y, radians)
    }

    pub fn from_rotation_z(radians: T) -> Self {
        Self::from_axis_angle(Vector::<T, 3>::Z, radians)
    }

    /// Rotation around X by `x`, followed by Y by `y`, followed by Z by `z`.
    #[doc(alias = "euler")]
    pub fn from_rotation_xyz(x: T, y: T, z: T) -> Self {
        Self::from_rotation_z(z) * Self::from_rotation_y(y) * Self::from_rotation_x(x)
    }
}

impl<T: Number> Quat<T> {
    /// Negates the imaginary parts. For unit quaternions this is the inverse rotation.
    pub fn conjugate(self) -> Self {
        Self::from_components(-self.i, -self.j, -self.k, self.w)
    }

    /// Conjugate divided by the squared length, or [`None`] if the length is negligible.
    ///
    /// ```
    /// # use trellis_linalg::*;
    /// let q = Quat::from_components(0.0, 0.0, 2.0, 0.0);
    /// assert_eq!(q.inverse(), Some(Quat::from_components(0.0, 0.0, -0.5, 0.0)));
    /// assert_eq!(Quat::<f32>::from_vec(Vector::ZERO).inverse(), None);
    /// ```
    pub fn inverse(self) -> Option<Self>
    where
        T: Scalar,
    {
        let len2 = self.length2();
        if len2.is_negligible() {
            None
        } else {
            Some(Self::from_vec(self.conjugate().vec / len2))
        }
    }

    /// Four-dimensional dot product.
    pub fn dot(self, other: Self) -> T {
        self.vec.dot(other.vec)
    }

    /// Squared length. Rotating by a quaternion whose length isn't 1 also scales.
    pub fn length2(&self) -> T {
        self.vec.length2()
    }

    #[doc(alias = "norm")]
    pub fn length(&self) -> T
    where
        T: Sqrt,
    {
        self.vec.length()
    }

    pub fn normalize(self) -> Self
    where
        T: Sqrt,
    {
        Self::from_vec(self.vec.normalize())
    }

    /// Interpolates along the shorter arc between the unit quaternions `self` (`t = 0`) and
    /// `other` (`t = 1`).
    ///
    /// Nearly parallel inputs are interpolated linearly and renormalized.
    ///
    /// ```
    /// # use trellis_linalg::*;
    /// use std::f32::consts::PI;
    ///
    /// let a = Quat::IDENTITY;
    /// let b = Quat::from_rotation_y(PI / 2.0);
    /// assert_approx_eq!(a.slerp(b, 0.5), Quat::from_rotation_y(PI / 4.0)).abs(1e-6);
    /// ```
    pub fn slerp(self, other: Self, t: T) -> Self
    where
        T: Float,
    {
        let mut cos = self.dot(other);
        let mut other = other.vec;
        if cos < T::ZERO {
            cos = -cos;
            other = -other;
        }

        if cos > T::from_f64(0.9995) {
            return Self {
                vec: self.vec.lerp(other, t).normalize(),
            };
        }

        let theta = cos.acos();
        let sin = theta.sin();
        let a = ((T::ONE - t) * theta).sin() / sin;
        let b = (t * theta).sin() / sin;
        Self {
            vec: self.vec * a + other * b,
        }
    }

    /// Rotation matrix equivalent to this unit quaternion.
    pub fn to_matrix(self) -> Matrix<T, 3, 3> {
        let two = T::ONE + T::ONE;
        let [x, y, z, w] = self.vec.into_array();

        #[rustfmt::skip]
        let mat = Matrix::from_rows([
            [T::ONE - two * (y * y + z * z), two * (x * y - z * w), two * (x * z + y * w)],
            [two * (x * y + z * w), T::ONE - two * (x * x + z * z), two * (y * z - x * w)],
            [two * (x * z - y * w), two * (y * z + x * w), T::ONE - two * (x * x + y * y)],
        ]);
        mat
    }
}

impl<T: fmt::Debug> fmt::Debug for Quat<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quat")
            .field("i", &self.i)
            .field("j", &self.j)
            .field("k", &self.k)
            .field("w", &self.w)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, PI};

    use crate::{assert_approx_eq, vec3, Vec3f};

    use super::*;

    #[test]
    fn axis_rotations() {
        let x = Quat::from_rotation_x(FRAC_PI_2);
        let y = Quat::from_rotation_y(FRAC_PI_2);
        let z = Quat::from_rotation_z(FRAC_PI_2);
        assert_approx_eq!(x * Vec3f::Y, Vec3f::Z).abs(1e-6);
        assert_approx_eq!(y * Vec3f::Z, Vec3f::X).abs(1e-6);
        assert_approx_eq!(z * Vec3f::X, Vec3f::Y).abs(1e-6);

        let axis = vec3(1.0, 1.0, 0.0).normalize();
        assert_approx_eq!(Quat::from_axis_angle(axis, PI) * Vec3f::X, Vec3f::Y).abs(1e-6);
    }

    #[test]
    fn hamilton_product() {
        let i = Quat::from_components(1, 0, 0, 0);
        let j = Quat::from_components(0, 1, 0, 0);
        let k = Quat::from_components(0, 0, 1, 0);
        assert_eq!(i * j, k);
        assert_eq!(j * i, -k);
        assert_eq!(i * i, Quat::from_components(0, 0, 0, -1));
        assert_eq!(i * j * k, Quat::from_components(0, 0, 0, -1));
        assert_eq!(Quat::IDENTITY * k, k);
    }

    #[test]
    fn euler_order() {
        let q = Quat::from_rotation_xyz(FRAC_PI_2, FRAC_PI_2, 0.0);
        // X maps Y to Z, then Y maps Z to X.
        assert_approx_eq!(q * Vec3f::Y, Vec3f::X).abs(1e-6);
    }

    #[test]
    fn inverse_and_conjugate() {
        let q = Quat::from_rotation_xyz(0.3, -1.2, 2.0);
        assert_approx_eq!(q.inverse().unwrap(), q.conjugate()).abs(1e-6);
        assert_approx_eq!(q * q.inverse().unwrap(), Quat::IDENTITY).abs(1e-6);
        assert_approx_eq!(q.length(), 1.0).abs(1e-6);
    }

    #[test]
    fn matrix_agrees_with_rotation() {
        let q = Quat::from_rotation_xyz(0.5, 0.25, -0.75);
        let m = q.to_matrix();
        for v in [Vec3f::X, Vec3f::Y, Vec3f::Z, vec3(1.0, -2.0, 0.5)] {
            assert_approx_eq!(m * v, q * v).abs(1e-5);
        }
        assert_approx_eq!(m.determinant(), 1.0).abs(1e-5);
    }

    #[test]
    fn slerp() {
        let a = Quat::from_rotation_z(0.0f32);
        let b = Quat::from_rotation_z(1.0);
        assert_approx_eq!(a.slerp(b, 0.0), a).abs(1e-6);
        assert_approx_eq!(a.slerp(b, 1.0), b).abs(1e-6);
        assert_approx_eq!(a.slerp(b, 0.25), Quat::from_rotation_z(0.25)).abs(1e-6);

        // Takes the shortest path even if `b` is on the other hemisphere.
        let neg_b = Quat::from_vec(-b.into_vec());
        assert_approx_eq!(a.slerp(neg_b, 0.25), Quat::from_rotation_z(0.25)).abs(1e-6);

        // Nearly parallel quaternions use normalized lerp.
        let c = Quat::from_rotation_z(1e-4);
        assert_approx_eq!(a.slerp(c, 0.5).length(), 1.0).abs(1e-6);
    }

    #[test]
    fn fmt() {
        assert_eq!(
            format!("{:?}", Quat::<i32>::IDENTITY),
            "Quat { i: 0, j: 0, k: 0, w: 1 }"
        );
    }
}
