use std::{array, fmt, mem, mem::ManuallyDrop};

use crate::{Number, One, Quat, Scalar, Trig, Vector, Zero};

mod ops;

pub type Mat1<T> = Matrix<T, 1, 1>;
pub type Mat2<T> = Matrix<T, 2, 2>;
pub type Mat3<T> = Matrix<T, 3, 3>;
pub type Mat4<T> = Matrix<T, 4, 4>;

/// [`Mat1`] of [`f32`].
pub type Mat1f = Mat1<f32>;
/// [`Mat2`] of [`f32`].
pub type Mat2f = Mat2<f32>;
/// [`Mat3`] of [`f32`].
pub type Mat3f = Mat3<f32>;
/// [`Mat4`] of [`f32`].
pub type Mat4f = Mat4<f32>;

/// 2 rows, 3 columns.
pub type Mat2x3<T> = Matrix<T, 2, 3>;
/// 3 rows, 2 columns.
pub type Mat3x2<T> = Matrix<T, 3, 2>;
/// 3 rows, 4 columns.
pub type Mat3x4<T> = Matrix<T, 3, 4>;
/// 4 rows, 3 columns.
pub type Mat4x3<T> = Matrix<T, 4, 3>;

/// Matrix with `R` rows and `C` columns, stored column by column without padding.
///
/// Elements are addressed with `(row, column)` tuples, both starting at 0:
///
/// ```
/// # use trellis_linalg::*;
/// let mut m = Matrix::from_rows([[0, 1], [2, 3]]);
/// m[(1, 0)] = 7;
/// assert_eq!(m.row(1), [7, 3]);
/// assert_eq!(m.column(1), [1, 3]);
/// assert_eq!(m.get(2, 0), None);
/// ```
///
/// Square matrices of any size provide [`Matrix::determinant`], [`Matrix::minor`],
/// [`Matrix::cofactor`], [`Matrix::adjugate`] and [`Matrix::try_invert`], all based on cofactor
/// expansion. Homogeneous transforms are available for 3x3 (2D) and 4x4 (3D) matrices.
#[derive(Clone, Copy, Hash)]
#[repr(transparent)]
pub struct Matrix<T, const R: usize, const C: usize>([[T; R]; C]);

unsafe impl<T: bytemuck::Zeroable, const R: usize, const C: usize> bytemuck::Zeroable
    for Matrix<T, R, C>
{
}
unsafe impl<T: bytemuck::Pod, const R: usize, const C: usize> bytemuck::Pod for Matrix<T, R, C> {}

/// Reinterprets a matrix as one with a layout-compatible element type.
///
/// # Safety
///
/// `T` and `U` must have the same size and layout, and the bits of every `T` element must be a
/// valid `U`.
const unsafe fn cast_elems<T, U, const R: usize, const C: usize>(
    m: Matrix<T, R, C>,
) -> Matrix<U, R, C> {
    // `mem::transmute` rejects types whose size depends on generic parameters.
    union Cast<T, U, const R: usize, const C: usize> {
        from: ManuallyDrop<Matrix<T, R, C>>,
        to: ManuallyDrop<Matrix<U, R, C>>,
    }

    ManuallyDrop::into_inner(
        Cast {
            from: ManuallyDrop::new(m),
        }
        .to,
    )
}

impl<T: Zero, const R: usize, const C: usize> Matrix<T, R, C> {
    const ZERO_COLUMN: [T; R] = [T::ZERO; R];

    pub const ZERO: Self = Self([Self::ZERO_COLUMN; C]);
}

impl<T: Zero + One, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Ones on the main diagonal, zeroes everywhere else. Also defined for non-square matrices.
    pub const IDENTITY: Self = {
        // Overwriting a `T` would drop it, which const evaluation can't do for a generic type.
        let mut m = unsafe { cast_elems::<T, ManuallyDrop<T>, R, C>(Self::ZERO) };
        let mut i = 0;
        while i < R && i < C {
            m.0[i][i] = ManuallyDrop::new(T::ONE);
            i += 1;
        }
        unsafe { cast_elems(m) }
    };
}

impl<T, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Builds a matrix from `R` rows of `C` elements each.
    ///
    /// ```
    /// # use trellis_linalg::*;
    /// assert_eq!(
    ///     Matrix::from_rows([[0, 1], [2, 3]]),
    ///     Matrix::from_columns([[0, 2], [1, 3]]),
    /// );
    /// ```
    pub fn from_rows<V: Into<Vector<T, C>>>(rows: [V; R]) -> Self {
        Matrix::from_columns(rows).transpose()
    }

    /// Builds a matrix from `C` columns of `R` elements each.
    pub fn from_columns<V: Into<Vector<T, R>>>(columns: [V; C]) -> Self {
        Self(columns.map(|column| column.into().into_array()))
    }

    /// Computes each element from its `(row, column)` position.
    ///
    /// ```
    /// # use trellis_linalg::*;
    /// let m: Mat2x3<_> = Matrix::from_fn(|r, c| r * 10 + c);
    /// assert_eq!(m.row(1), [10, 11, 12]);
    /// ```
    pub fn from_fn<F: FnMut(usize, usize) -> T>(mut f: F) -> Self {
        Self(array::from_fn(|c| array::from_fn(|r| f(r, c))))
    }

    pub fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> Matrix<U, R, C> {
        Matrix(self.0.map(|column| column.map(&mut f)))
    }

    /// Mirrors the matrix along its main diagonal.
    pub fn transpose(self) -> Matrix<T, C, R> {
        let mut columns = self.0.map(IntoIterator::into_iter);
        // Row `r` of the result takes the `r`th element from each of our columns, in order.
        Matrix(array::from_fn(|_| {
            array::from_fn(|c| match columns[c].next() {
                Some(elem) => elem,
                None => unreachable!(),
            })
        }))
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        self.0.get(col)?.get(row)
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        self.0.get_mut(col)?.get_mut(row)
    }

    /// Copies out row `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= R`.
    #[track_caller]
    pub fn row(&self, index: usize) -> Vector<T, C>
    where
        T: Copy,
    {
        assert!(index < R, "row {index} out of bounds for a {R}x{C} matrix");
        Vector::from_fn(|c| self.0[c][index])
    }

    /// Copies out column `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= C`.
    #[track_caller]
    pub fn column(&self, index: usize) -> Vector<T, R>
    where
        T: Copy,
    {
        Vector::from(self.0[index])
    }

    /// Changes the dimensions, cutting off rows and columns or padding with zeroes.
    ///
    /// ```
    /// # use trellis_linalg::*;
    /// let m = Matrix::from_rows([[1, 2, 3]]);
    /// assert_eq!(m.resize::<2, 2>(), Matrix::from_rows([[1, 2], [0, 0]]));
    /// ```
    pub fn resize<const R2: usize, const C2: usize>(mut self) -> Matrix<T, R2, C2>
    where
        T: Zero,
    {
        Matrix::from_fn(|r, c| match self.get_mut(r, c) {
            Some(elem) => mem::replace(elem, T::ZERO),
            None => T::ZERO,
        })
    }
}

/// Prints the rows as a list, keeping each row on a single line even with `{:#?}`.
impl<T: fmt::Debug, const R: usize, const C: usize> fmt::Debug for Matrix<T, R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Row<'a, T, const R: usize, const C: usize> {
            m: &'a Matrix<T, R, C>,
            r: usize,
        }

        impl<T: fmt::Debug, const R: usize, const C: usize> fmt::Debug for Row<'_, T, R, C> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("[")?;
                for c in 0..C {
                    if c > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}", self.m[(self.r, c)])?;
                }
                f.write_str("]")
            }
        }

        f.debug_list()
            .entries((0..R).map(|r| Row { m: self, r }))
            .finish()
    }
}

impl<T, const N: usize> Matrix<T, N, N> {
    /// Copies out the main diagonal.
    ///
    /// ```
    /// # use trellis_linalg::*;
    /// assert_eq!(Matrix::from_rows([[1, 2], [3, 4]]).into_diagonal(), [1, 4]);
    /// ```
    pub fn into_diagonal(self) -> Vector<T, N>
    where
        T: Copy,
    {
        Vector::from_fn(|i| self.0[i][i])
    }

    /// Diagonal matrix with the given elements on its main diagonal.
    ///
    /// ```
    /// # use trellis_linalg::*;
    /// let m = Matrix::from_diagonal([1, 2]);
    /// assert_eq!(m, Matrix::from_rows([[1, 0], [0, 2]]));
    /// ```
    pub fn from_diagonal<D: Into<Vector<T, N>>>(diagonal: D) -> Self
    where
        T: Zero,
    {
        let mut diagonal = diagonal.into().into_array().map(Some);
        Self::from_fn(|r, c| {
            if r == c {
                diagonal[r].take().unwrap_or(T::ZERO)
            } else {
                T::ZERO
            }
        })
    }

    /// Sum of the diagonal elements.
    pub fn trace(&self) -> T
    where
        T: Number,
    {
        self.into_diagonal().sum()
    }
}

/// Square matrix algebra.
impl<T: Number, const N: usize> Matrix<T, N, N> {
    /// Returns the [determinant] of the matrix.
    ///
    /// Matrices up to 3x3 use closed-form expressions, larger ones are expanded along their first
    /// row (Laplace expansion). The determinant of the empty 0x0 matrix is 1.
    ///
    /// # Examples
    ///
    /// ```
    /// # use trellis_linalg::*;
    /// let mat = Matrix::from_rows([
    ///     [3, 2, 0, 1],
    ///     [4, 0, 1, 2],
    ///     [3, 0, 2, 1],
    ///     [9, 2, 3, 1],
    /// ]);
    /// assert_eq!(mat.determinant(), 24);
    /// assert_eq!(Mat4f::IDENTITY.determinant(), 1.0);
    /// ```
    ///
    /// [determinant]: https://en.wikipedia.org/wiki/Determinant
    pub fn determinant(&self) -> T {
        let all: [usize; N] = array::from_fn(|i| i);
        self.sub_determinant(&all, &all)
    }

    /// Returns the minor of the element at `(row, col)`: the determinant of the matrix with that
    /// row and column removed.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is out of bounds.
    pub fn minor(&self, row: usize, col: usize) -> T {
        assert!(
            row < N && col < N,
            "minor ({row}, {col}) out of bounds for {N}x{N} matrix"
        );
        let rows = indices_without::<N>(row);
        let cols = indices_without::<N>(col);
        self.sub_determinant(&rows[..N - 1], &cols[..N - 1])
    }

    /// Returns the cofactor of the element at `(row, col)`, ie. its [`minor`] with the sign
    /// `(-1)^(row + col)` applied.
    ///
    /// [`minor`]: Matrix::minor
    pub fn cofactor(&self, row: usize, col: usize) -> T {
        let minor = self.minor(row, col);
        if (row + col) % 2 == 0 {
            minor
        } else {
            -minor
        }
    }

    /// Returns the matrix of all [`cofactor`][Matrix::cofactor]s.
    pub fn cofactor_matrix(&self) -> Self {
        Self::from_fn(|row, col| self.cofactor(row, col))
    }

    /// Returns the [adjugate] of this matrix (the transpose of its cofactor matrix).
    ///
    /// For invertible matrices, `adjugate / determinant` is the inverse.
    ///
    /// [adjugate]: https://en.wikipedia.org/wiki/Adjugate_matrix
    pub fn adjugate(&self) -> Self {
        self.cofactor_matrix().transpose()
    }

    /// Computes the inverse of this matrix, or returns [`None`] if it is singular.
    ///
    /// Integer matrices are singular if their determinant is zero. For floating-point matrices,
    /// the determinant is first divided by the product of each column's largest absolute element,
    /// and the matrix is singular if the result [`is_negligible`]. This makes the test independent
    /// of the matrix's scale, so `Mat4f::IDENTITY * 1e-3` is invertible even though its
    /// determinant is below [`Float::EPSILON`].
    ///
    /// For integer matrices, the adjugate is divided by the determinant using integer division, so
    /// the result is only exact if the determinant is 1 or -1.
    ///
    /// # Examples
    ///
    /// ```
    /// # use trellis_linalg::*;
    /// let mat = Matrix::from_rows([
    ///     [4.0, 7.0],
    ///     [2.0, 6.0],
    /// ]);
    /// let inv = mat.try_invert().unwrap();
    /// assert_approx_eq!(mat * inv, Mat2::IDENTITY).abs(1e-12);
    ///
    /// let singular = Matrix::from_rows([
    ///     [1, 2],
    ///     [2, 4],
    /// ]);
    /// assert_eq!(singular.try_invert(), None);
    /// ```
    ///
    /// [`is_negligible`]: Scalar::is_negligible
    /// [`Float::EPSILON`]: crate::Float::EPSILON
    pub fn try_invert(&self) -> Option<Self>
    where
        T: Scalar,
    {
        let det = self.determinant();
        if self.is_singular(det) {
            return None;
        }

        Some(self.adjugate().map(|elem| elem / det))
    }

    fn is_singular(&self, det: T) -> bool
    where
        T: Scalar,
    {
        if !T::IS_FLOAT {
            return det.is_negligible();
        }

        let scale = self.0.iter().fold(T::ONE, |acc, column| {
            let largest = column.iter().fold(T::ZERO, |max, elem| {
                let abs = elem.abs();
                if abs > max {
                    abs
                } else {
                    max
                }
            });
            acc * largest
        });
        scale == T::ZERO || (det / scale).is_negligible()
    }

    /// Inverts this matrix.
    ///
    /// # Panics
    ///
    /// This method will panic if `self` is not invertible. Use [`Matrix::try_invert`] to handle
    /// singular matrices.
    ///
    /// # Examples
    ///
    /// ```
    /// # use trellis_linalg::*;
    /// assert_eq!(Mat3::<i32>::IDENTITY.invert(), Mat3::<i32>::IDENTITY);
    /// assert_eq!(Mat1f::IDENTITY.invert(), Mat1f::IDENTITY);
    /// ```
    #[track_caller]
    pub fn invert(&self) -> Self
    where
        T: Scalar,
    {
        match self.try_invert() {
            Some(inv) => inv,
            None => panic!("attempt to invert a non-invertible matrix"),
        }
    }

    /// Determinant of the submatrix made of the given rows and columns (of equal length).
    fn sub_determinant(&self, rows: &[usize], cols: &[usize]) -> T {
        debug_assert_eq!(rows.len(), cols.len());
        let m = |r: usize, c: usize| self[(rows[r], cols[c])];

        match rows.len() {
            0 => T::ONE,
            1 => m(0, 0),
            2 => m(0, 0) * m(1, 1) - m(0, 1) * m(1, 0),
            3 => {
                m(0, 0) * (m(1, 1) * m(2, 2) - m(1, 2) * m(2, 1))
                    - m(0, 1) * (m(1, 0) * m(2, 2) - m(1, 2) * m(2, 0))
                    + m(0, 2) * (m(1, 0) * m(2, 1) - m(1, 1) * m(2, 0))
            }
            n => {
                let mut det = T::ZERO;
                let mut sub_cols = [0; N];
                for c in 0..n {
                    let elem = m(0, c);
                    if elem == T::ZERO {
                        continue;
                    }

                    let mut len = 0;
                    for (j, &col) in cols.iter().enumerate() {
                        if j != c {
                            sub_cols[len] = col;
                            len += 1;
                        }
                    }
                    let term = elem * self.sub_determinant(&rows[1..], &sub_cols[..len]);
                    det = if c % 2 == 0 { det + term } else { det - term };
                }
                det
            }
        }
    }
}

/// Returns `[0, 1, .., N-1]` with `skip` removed (the last slot is unused).
fn indices_without<const N: usize>(skip: usize) -> [usize; N] {
    array::from_fn(|i| if i < skip { i } else { i + 1 })
}

/// 2D rotations, Y axis up.
impl<T: Number + Trig> Mat2<T> {
    pub fn rotation_counterclockwise(radians: T) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::from_rows([[cos, -sin], [sin, cos]])
    }

    pub fn rotation_clockwise(radians: T) -> Self {
        Self::rotation_counterclockwise(-radians)
    }
}

/// Homogeneous 2D transforms.
impl<T: Number> Mat3<T> {
    /// ```
    /// # use trellis_linalg::*;
    /// let m = Mat3::from_translation_2d(vec2(2, 3));
    /// assert_eq!(m.transform_point_2d(vec2(1, 1)), vec2(3, 4));
    /// ```
    pub fn from_translation_2d(offset: Vector<T, 2>) -> Self {
        let mut m = Self::IDENTITY;
        m.0[2] = offset.extend(T::ONE).into_array();
        m
    }

    /// Scales each axis by the matching element of `scale`.
    pub fn from_scale(scale: Vector<T, 3>) -> Self {
        Self::from_diagonal(scale)
    }

    /// Applies the transform to `point`, including the perspective divide.
    pub fn transform_point_2d(&self, point: Vector<T, 2>) -> Vector<T, 2> {
        let [x, y, w] = (*self * point.extend(T::ONE)).into_array();
        Vector::from([x, y]) / w
    }
}

/// Homogeneous 3D transforms.
///
/// ```
/// # use trellis_linalg::*;
/// let m = Mat4::from_translation(vec3(1.0, 2.0, 3.0)) * Mat4::from_scale(Vector::splat(2.0));
/// assert_eq!(m.transform_point(vec3(1.0, 1.0, 1.0)), vec3(3.0, 4.0, 5.0));
/// assert_eq!(m.transform_vector(vec3(1.0, 1.0, 1.0)), vec3(2.0, 2.0, 2.0));
/// ```
impl<T: Number> Mat4<T> {
    pub fn from_translation(offset: Vector<T, 3>) -> Self {
        let mut m = Self::IDENTITY;
        m.0[3] = offset.extend(T::ONE).into_array();
        m
    }

    pub fn from_scale(scale: Vector<T, 3>) -> Self {
        Self::from_diagonal(scale.extend(T::ONE))
    }

    /// Rotation by a unit quaternion.
    pub fn from_quat(rotation: Quat<T>) -> Self {
        let mut m = rotation.to_matrix().resize::<4, 4>();
        m[(3, 3)] = T::ONE;
        m
    }

    /// Applies the transform to `point`, including the perspective divide.
    pub fn transform_point(&self, point: Vector<T, 3>) -> Vector<T, 3> {
        let [x, y, z, w] = (*self * point.extend(T::ONE)).into_array();
        Vector::from([x, y, z]) / w
    }

    /// Applies the transform to a direction, which is unaffected by translation.
    pub fn transform_vector(&self, direction: Vector<T, 3>) -> Vector<T, 3> {
        (*self * direction.extend(T::ZERO)).truncate()
    }
}

impl<T: Default, const R: usize, const C: usize> Default for Matrix<T, R, C> {
    fn default() -> Self {
        Self::from_fn(|_, _| T::default())
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use crate::{assert_approx_eq, vec2, vec3, Mat2x3, Vec2f, Vec3f};

    use super::*;

    fn random_matrix<const N: usize>(rng: &mut fastrand::Rng) -> Matrix<f64, N, N> {
        Matrix::from_fn(|_, _| rng.f64() * 20.0 - 10.0)
    }

    fn to_nalgebra<const N: usize>(m: &Matrix<f64, N, N>) -> nalgebra::DMatrix<f64> {
        nalgebra::DMatrix::from_fn(N, N, |r, c| m[(r, c)])
    }

    #[test]
    fn construction() {
        let m = Mat2x3::from_rows([[1, 2, 3], [4, 5, 6]]);
        assert_eq!(m, Mat2x3::from_columns([[1, 4], [2, 5], [3, 6]]));
        assert_eq!(m, Matrix::from_fn(|r, c| r as i32 * 3 + c as i32 + 1));
        assert_eq!(m.row(0), [1, 2, 3]);
        assert_eq!(m.column(1), [2, 5]);
        assert_eq!(m.transpose().row(2), [3, 6]);
        assert_eq!(Mat3::<i32>::default(), Mat3::ZERO);
    }

    #[test]
    fn debug_output() {
        let m = Matrix::from_rows([[5, 6], [7, 8]]);
        assert_eq!(format!("{m:?}"), "[[5, 6], [7, 8]]");
        assert_eq!(format!("{m:#?}"), "[\n    [5, 6],\n    [7, 8],\n]");
        assert_eq!(format!("{:?}", Mat1f::IDENTITY), "[[1.0]]");
    }

    #[test]
    fn identity() {
        assert_eq!(
            Mat2x3::<i32>::IDENTITY,
            Matrix::from_rows([[1, 0, 0], [0, 1, 0]])
        );
        assert_eq!(Mat3::<u8>::IDENTITY.into_diagonal(), [1, 1, 1]);
        assert_eq!(Mat4f::IDENTITY.trace(), 4.0);
    }

    #[test]
    fn resize() {
        let m = Matrix::from_rows([[1, 2], [3, 4]]);
        assert_eq!(
            m.resize::<3, 3>(),
            Matrix::from_rows([[1, 2, 0], [3, 4, 0], [0, 0, 0]])
        );
        assert_eq!(m.resize::<2, 1>(), Matrix::from_rows([[1], [3]]));
    }

    #[test]
    fn products() {
        let m = Matrix::from_rows([[1, 2], [3, 4]]);
        assert_eq!(m * vec2(1, -1), [-1, -1]);
        assert_eq!(vec2(1, -1) * m, [-2, -2]);

        let a = Matrix::from_rows([[1, 0, 2], [0, 3, -1]]);
        let b = Matrix::from_rows([[4, 1], [2, 2], [0, 5]]);
        assert_eq!(a * b, Matrix::from_rows([[4, 11], [6, 1]]));
        assert_eq!(vec2(2, 3).outer(vec2(1, 2)), Matrix::from_rows([[2, 4], [3, 6]]));
    }

    #[test]
    fn closed_form_determinants() {
        assert_eq!(Matrix::<i32, 0, 0>::ZERO.determinant(), 1);
        assert_eq!(Mat1::from_diagonal([-3]).determinant(), -3);
        assert_eq!(Matrix::from_rows([[3, 8], [4, 6]]).determinant(), -14);

        let m = Matrix::from_rows([[6, 1, 1], [4, -2, 5], [2, 8, 7]]);
        assert_eq!(m.determinant(), -306);
        assert_eq!(m.transpose().determinant(), -306);
        assert_eq!(Mat3f::ZERO.determinant(), 0.0);
    }

    #[test]
    fn expanded_determinants() {
        let m = Matrix::from_rows([
            [1, 0, 2, -1, 3],
            [0, 1, 0, 0, 0],
            [2, 0, 1, 0, 1],
            [0, 0, 0, 1, 0],
            [1, 0, 0, 0, 1],
        ]);
        // Rows 1 and 3 are unit rows, leaving [[1, 2, 3], [2, 1, 1], [1, 0, 1]].
        assert_eq!(m.determinant(), -4);
        let swapped: Matrix<_, 5, 5> = Matrix::from_fn(|r, c| m[([1, 0, 2, 3, 4][r], c)]);
        assert_eq!(swapped.determinant(), 4);

        assert_eq!((Matrix::<i64, 6, 6>::IDENTITY * 2).determinant(), 64);
    }

    #[test]
    fn determinant_matches_nalgebra() {
        let mut rng = fastrand::Rng::with_seed(0x5eed);
        for _ in 0..50 {
            let m = random_matrix::<5>(&mut rng);
            let expected = to_nalgebra(&m).determinant();
            assert_approx_eq!(m.determinant(), expected).rel(1e-9).abs(1e-9);
        }
    }

    #[test]
    fn inverse_matches_nalgebra() {
        let mut rng = fastrand::Rng::with_seed(42);
        for _ in 0..50 {
            let m = random_matrix::<4>(&mut rng);
            let Some(inv) = m.try_invert() else { continue };
            let expected = to_nalgebra(&m).try_inverse().unwrap();
            let expected = Matrix::<f64, 4, 4>::from_fn(|r, c| expected[(r, c)]);
            assert_approx_eq!(inv, expected).abs(1e-6);
            assert_approx_eq!(m * inv, Mat4::IDENTITY).abs(1e-6);
        }
    }

    #[test]
    fn cofactors() {
        let m = Matrix::from_rows([[1, 2, 3], [0, 4, 5], [1, 0, 6]]);
        assert_eq!(m.minor(0, 0), 24);
        assert_eq!(m.minor(0, 1), -5);
        assert_eq!(m.cofactor(0, 1), 5);
        assert_eq!(m.minor(2, 2), 4);
        assert_eq!(
            m.adjugate(),
            Matrix::from_rows([[24, -12, -2], [5, 3, -5], [-4, 2, 4]])
        );
        assert_eq!(m * m.adjugate(), Mat3::IDENTITY * m.determinant());
    }

    #[test]
    fn invert() {
        assert_eq!(Mat3::<i32>::IDENTITY.invert(), Mat3::IDENTITY);
        assert_eq!(Mat1f::from_diagonal([4.0]).invert(), Mat1f::from_diagonal([0.25]));

        // Determinant 1, so the integer inverse is exact.
        let m = Matrix::from_rows([[2, 1], [1, 1]]);
        assert_eq!(m.invert(), Matrix::from_rows([[1, -1], [-1, 2]]));

        assert_eq!(Matrix::from_rows([[1, 2], [2, 4]]).try_invert(), None);
        assert_eq!(
            Matrix::from_rows([[1.0, 1.0], [1.0, 1.0 + f64::EPSILON]]).try_invert(),
            None
        );
    }

    #[test]
    fn invert_small_scale() {
        let small = Mat4f::IDENTITY * 1e-3;
        assert!(small.determinant() < f32::EPSILON);
        assert_approx_eq!(small.invert(), Mat4f::IDENTITY * 1e3).rel(1e-5);

        let tiny = Matrix::from_rows([[1e-9f32, 0.0], [0.0, 1e-9]]);
        assert_approx_eq!(tiny.invert() * tiny, Mat2f::IDENTITY).abs(1e-5);

        // Scaling a singular matrix doesn't make it invertible.
        assert_eq!((Matrix::from_rows([[1.0, 2.0], [2.0, 4.0]]) * 1e6).try_invert(), None);
    }

    #[test]
    #[should_panic(expected = "attempt to invert a non-invertible matrix")]
    fn invert_singular() {
        Mat4::<f64>::ZERO.invert();
    }

    #[test]
    fn rotation() {
        assert_eq!(Mat2f::rotation_clockwise(0.0), Mat2f::IDENTITY);
        let ccw = Mat2f::rotation_counterclockwise(FRAC_PI_2);
        assert_approx_eq!(ccw * Vec2f::X, Vec2f::Y).abs(1e-6);
        assert_approx_eq!(ccw.invert(), Mat2f::rotation_clockwise(FRAC_PI_2)).abs(1e-6);
    }

    #[test]
    fn transforms() {
        let m = Mat4f::from_translation(vec3(1.0, 0.0, 0.0));
        assert_eq!(m.transform_point(Vec3f::ZERO), Vec3f::X);
        assert_eq!(m.transform_vector(Vec3f::Y), Vec3f::Y);

        let rot = Mat4f::from_quat(Quat::from_rotation_z(FRAC_PI_2));
        assert_approx_eq!(rot.transform_point(Vec3f::X), Vec3f::Y).abs(1e-6);
        assert_approx_eq!(rot.determinant(), 1.0).abs(1e-6);

        let scale = Mat3::from_scale(vec3(2, 3, 1));
        assert_eq!(scale.transform_point_2d(vec2(1, 1)), vec2(2, 3));
    }
}
