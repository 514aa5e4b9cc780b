use crate::{approx::ApproxEq, Float, Vector};

use super::{tolerance, Aabb, ClosestPoint, Plane, Ray, Segment, Sphere};

/// Intersection test between two shapes.
///
/// Implemented for every pair of [`Vector`] (a point), [`Sphere`], [`Aabb`], [`Plane`], [`Ray`]
/// and [`Segment`], in both directions. `a.intersects(&b)` always equals `b.intersects(&a)`.
pub trait Intersects<Rhs: ?Sized = Self> {
    /// Returns whether `self` and `other` share at least one point.
    fn intersects(&self, other: &Rhs) -> bool;
}

/// Shapes that a [`Ray`] can be cast at.
pub trait Raycast<T, const N: usize> {
    /// Returns the smallest `t >= 0` at which `ray` hits `self`, if any.
    fn raycast(&self, ray: &Ray<T, N>) -> Option<T>;
}

impl<T: Float, const N: usize> Raycast<T, N> for Sphere<T, N> {
    fn raycast(&self, ray: &Ray<T, N>) -> Option<T> {
        let m = ray.origin - self.center;
        let b = m.dot(ray.direction);
        let c = m.length2() - self.radius * self.radius;
        if c > T::ZERO && b > T::ZERO {
            // Outside of the sphere and pointing away from it.
            return None;
        }

        let discriminant = b * b - c;
        if discriminant < T::ZERO {
            return None;
        }
        Some((-b - discriminant.sqrt()).max(T::ZERO))
    }
}

impl<T: Float, const N: usize> Raycast<T, N> for Aabb<T, N> {
    fn raycast(&self, ray: &Ray<T, N>) -> Option<T> {
        slab(ray.origin, ray.direction, self, T::INFINITY)
    }
}

impl<T: Float, const N: usize> Raycast<T, N> for Plane<T, N> {
    fn raycast(&self, ray: &Ray<T, N>) -> Option<T> {
        let tol = tolerance::<T>();
        let denom = self.normal.dot(ray.direction);
        let dist = self.signed_distance(ray.origin);
        if denom.abs() <= tol {
            // Parallel: hit everywhere or nowhere.
            return if dist.abs() <= tol { Some(T::ZERO) } else { None };
        }

        let t = -dist / denom;
        if t >= -tol {
            Some(t.max(T::ZERO))
        } else {
            None
        }
    }
}

/// Slab test of the line `origin + t * dir` for `t` in `[0, t_max]` against `aabb`.
///
/// Returns the first `t` inside the box.
fn slab<T: Float, const N: usize>(
    origin: Vector<T, N>,
    dir: Vector<T, N>,
    aabb: &Aabb<T, N>,
    t_max: T,
) -> Option<T> {
    let tol = tolerance::<T>();
    let (mut t_min, mut t_max) = (T::ZERO, t_max);
    for i in 0..N {
        if dir[i].abs() <= tol {
            if origin[i] < aabb.min[i] - tol || origin[i] > aabb.max[i] + tol {
                return None;
            }
            continue;
        }

        let inv = T::ONE / dir[i];
        let mut t1 = (aabb.min[i] - origin[i]) * inv;
        let mut t2 = (aabb.max[i] - origin[i]) * inv;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }
        t_min = t_min.max(t1);
        t_max = t_max.min(t2);
        if t_min > t_max + tol {
            return None;
        }
    }
    Some(t_min)
}

/// Returns whether the linear pieces `p1 + s * d1` (`s` in `[0, max1]`) and `p2 + t * d2`
/// (`t` in `[0, max2]`) touch. The maximum can be infinite.
///
/// Only pieces with an exactly zero direction are treated as points, and parallelism is decided
/// relative to the direction lengths, so the result doesn't depend on the scale of the input.
fn linear_contact<T: Float, const N: usize>(
    (p1, d1, max1): (Vector<T, N>, Vector<T, N>, T),
    (p2, d2, max2): (Vector<T, N>, Vector<T, N>, T),
) -> bool {
    let tol = tolerance::<T>();
    let r = p1 - p2;
    let a = d1.length2();
    let e = d2.length2();
    let f = d2.dot(r);

    let (s, t) = if a == T::ZERO && e == T::ZERO {
        (T::ZERO, T::ZERO)
    } else if a == T::ZERO {
        (T::ZERO, (f / e).clamp(T::ZERO, max2))
    } else {
        let c = d1.dot(r);
        if e == T::ZERO {
            ((-c / a).clamp(T::ZERO, max1), T::ZERO)
        } else {
            let b = d1.dot(d2);
            // `a * e - b²` is `a * e * sin²` of the angle between the directions.
            let denom = a * e - b * b;
            // Parallel pieces have no unique closest pair; start from `s = 0`.
            let s = if denom > tol * a * e {
                ((b * f - c * e) / denom).clamp(T::ZERO, max1)
            } else {
                T::ZERO
            };
            let t = (b * s + f) / e;
            if t < T::ZERO {
                ((-c / a).clamp(T::ZERO, max1), T::ZERO)
            } else if t > max2 {
                (((b * max2 - c) / a).clamp(T::ZERO, max1), max2)
            } else {
                (s, t)
            }
        }
    };

    let (q1, q2) = (p1 + d1 * s, p2 + d2 * t);
    // Rounding errors grow with the magnitude of the coordinates.
    let scale = T::ONE.max(q1.length()).max(q2.length());
    q1.distance(q2) <= tol * scale
}

impl<T: Float, const N: usize> Ray<T, N> {
    fn piece(&self) -> (Vector<T, N>, Vector<T, N>, T) {
        (self.origin, self.direction, T::INFINITY)
    }
}

impl<T: Float, const N: usize> Segment<T, N> {
    fn piece(&self) -> (Vector<T, N>, Vector<T, N>, T) {
        (self.start, self.delta(), T::ONE)
    }
}

// Point vs. anything that knows its closest point.

impl<T: Float, const N: usize> Intersects for Vector<T, N> {
    fn intersects(&self, other: &Self) -> bool {
        self.distance(*other) <= tolerance::<T>()
    }
}

macro_rules! point_vs {
    ($($shape:ident),+) => {
        $(
            impl<T: Float, const N: usize> Intersects<Vector<T, N>> for $shape<T, N> {
                fn intersects(&self, point: &Vector<T, N>) -> bool {
                    self.distance_to(*point) <= tolerance::<T>()
                }
            }
        )+
    };
}
point_vs!(Sphere, Aabb, Plane, Ray, Segment);

// A sphere intersects a convex shape iff the shape's closest point to the center is in the sphere.

impl<T: Float, const N: usize> Intersects for Sphere<T, N> {
    fn intersects(&self, other: &Self) -> bool {
        self.center.distance(other.center) <= self.radius + other.radius + tolerance::<T>()
    }
}

macro_rules! sphere_vs {
    ($($shape:ident),+) => {
        $(
            impl<T: Float, const N: usize> Intersects<Sphere<T, N>> for $shape<T, N> {
                fn intersects(&self, sphere: &Sphere<T, N>) -> bool {
                    self.distance_to(sphere.center) <= sphere.radius + tolerance::<T>()
                }
            }
        )+
    };
}
sphere_vs!(Aabb, Plane, Ray, Segment);

impl<T: Float, const N: usize> Intersects for Aabb<T, N> {
    fn intersects(&self, other: &Self) -> bool {
        let tol = tolerance::<T>();
        (0..N).all(|i| self.min[i] <= other.max[i] + tol && other.min[i] <= self.max[i] + tol)
    }
}

impl<T: Float, const N: usize> Intersects<Plane<T, N>> for Aabb<T, N> {
    fn intersects(&self, plane: &Plane<T, N>) -> bool {
        let half = self.extents() / (T::ONE + T::ONE);
        let radius = (0..N).fold(T::ZERO, |acc, i| acc + half[i] * plane.normal[i].abs());
        plane.signed_distance(self.center()).abs() <= radius + tolerance::<T>()
    }
}

impl<T: Float, const N: usize> Intersects<Ray<T, N>> for Aabb<T, N> {
    fn intersects(&self, ray: &Ray<T, N>) -> bool {
        ray.cast(self).is_some()
    }
}

impl<T: Float, const N: usize> Intersects<Segment<T, N>> for Aabb<T, N> {
    fn intersects(&self, segment: &Segment<T, N>) -> bool {
        slab(segment.start, segment.delta(), self, T::ONE).is_some()
    }
}

impl<T: Float, const N: usize> Intersects for Plane<T, N> {
    fn intersects(&self, other: &Self) -> bool {
        let tol = tolerance::<T>();
        let cos = self.normal.dot(other.normal);
        if cos.abs() < T::ONE - tol {
            // Non-parallel hyperplanes always meet.
            return true;
        }

        if cos > T::ZERO {
            (self.distance - other.distance).abs() <= tol
        } else {
            (self.distance + other.distance).abs() <= tol
        }
    }
}

impl<T: Float, const N: usize> Intersects<Ray<T, N>> for Plane<T, N> {
    fn intersects(&self, ray: &Ray<T, N>) -> bool {
        ray.cast(self).is_some()
    }
}

impl<T: Float, const N: usize> Intersects<Segment<T, N>> for Plane<T, N> {
    fn intersects(&self, segment: &Segment<T, N>) -> bool {
        let tol = tolerance::<T>();
        let d0 = self.signed_distance(segment.start);
        let d1 = self.signed_distance(segment.end);
        d0.min(d1) <= tol && d0.max(d1) >= -tol
    }
}

impl<T: Float, const N: usize> Intersects for Ray<T, N> {
    fn intersects(&self, other: &Self) -> bool {
        linear_contact(self.piece(), other.piece())
    }
}

impl<T: Float, const N: usize> Intersects<Segment<T, N>> for Ray<T, N> {
    fn intersects(&self, segment: &Segment<T, N>) -> bool {
        linear_contact(self.piece(), segment.piece())
    }
}

impl<T: Float, const N: usize> Intersects for Segment<T, N> {
    fn intersects(&self, other: &Self) -> bool {
        linear_contact(self.piece(), other.piece())
    }
}

/// `A => B` implements `Intersects<A> for B` in terms of `Intersects<B> for A`.
macro_rules! symmetric {
    ($($a:ident => $($b:ident),+;)+) => {
        $($(
            impl<T: Float, const N: usize> Intersects<$a<T, N>> for $b<T, N> {
                fn intersects(&self, other: &$a<T, N>) -> bool {
                    other.intersects(self)
                }
            }
        )+)+
    };
}
symmetric! {
    Sphere => Vector;
    Aabb => Vector, Sphere, Plane, Ray, Segment;
    Plane => Vector, Sphere, Ray, Segment;
    Ray => Vector, Sphere, Segment;
    Segment => Vector, Sphere;
}

/// Any of the supported shapes.
///
/// [`Shape`] implements [`Intersects`] by dispatching to the implementation for the concrete pair
/// of shapes.
///
/// # Examples
///
/// ```
/// # use trellis_linalg::{vec2, shape::*};
/// let shapes: Vec<Shape<f64, 2>> = vec![
///     vec2(0.0, 0.0).into(),
///     Circle::new(vec2(3.0, 0.0), 1.0).into(),
///     Segment::new(vec2(-1.0, -1.0), vec2(-1.0, 1.0)).into(),
/// ];
/// let ray: Shape<f64, 2> = Ray::new(vec2(-5.0, 0.0), vec2(1.0, 0.0)).into();
/// assert!(shapes.iter().all(|s| ray.intersects(s)));
/// assert!(!shapes[0].intersects(&shapes[1]));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape<T, const N: usize> {
    Point(Vector<T, N>),
    Sphere(Sphere<T, N>),
    Aabb(Aabb<T, N>),
    Plane(Plane<T, N>),
    Ray(Ray<T, N>),
    Segment(Segment<T, N>),
}

/// Shapes that can be tested against every [`Shape`] variant.
trait IntersectsAny<T, const N: usize>:
    Intersects<Vector<T, N>>
    + Intersects<Sphere<T, N>>
    + Intersects<Aabb<T, N>>
    + Intersects<Plane<T, N>>
    + Intersects<Ray<T, N>>
    + Intersects<Segment<T, N>>
{
}

impl<S, T, const N: usize> IntersectsAny<T, N> for S where
    S: Intersects<Vector<T, N>>
        + Intersects<Sphere<T, N>>
        + Intersects<Aabb<T, N>>
        + Intersects<Plane<T, N>>
        + Intersects<Ray<T, N>>
        + Intersects<Segment<T, N>>
{
}

impl<T: Float, const N: usize> Shape<T, N> {
    fn intersected_by<S: IntersectsAny<T, N>>(&self, shape: &S) -> bool {
        match self {
            Shape::Point(other) => shape.intersects(other),
            Shape::Sphere(other) => shape.intersects(other),
            Shape::Aabb(other) => shape.intersects(other),
            Shape::Plane(other) => shape.intersects(other),
            Shape::Ray(other) => shape.intersects(other),
            Shape::Segment(other) => shape.intersects(other),
        }
    }
}

impl<T: Float, const N: usize> Intersects for Shape<T, N> {
    fn intersects(&self, other: &Self) -> bool {
        match self {
            Shape::Point(shape) => other.intersected_by(shape),
            Shape::Sphere(shape) => other.intersected_by(shape),
            Shape::Aabb(shape) => other.intersected_by(shape),
            Shape::Plane(shape) => other.intersected_by(shape),
            Shape::Ray(shape) => other.intersected_by(shape),
            Shape::Segment(shape) => other.intersected_by(shape),
        }
    }
}

/// Evaluates `$eq` with the shapes bound to `$a` and `$b` if both are the same variant.
macro_rules! same_variant {
    ($lhs:expr, $rhs:expr, |$a:ident, $b:ident| $eq:expr) => {
        match ($lhs, $rhs) {
            (Shape::Point($a), Shape::Point($b)) => $eq,
            (Shape::Sphere($a), Shape::Sphere($b)) => $eq,
            (Shape::Aabb($a), Shape::Aabb($b)) => $eq,
            (Shape::Plane($a), Shape::Plane($b)) => $eq,
            (Shape::Ray($a), Shape::Ray($b)) => $eq,
            (Shape::Segment($a), Shape::Segment($b)) => $eq,
            _ => false,
        }
    };
}

/// Shapes of different kinds are never approximately equal.
impl<T: ApproxEq, const N: usize> ApproxEq for Shape<T, N> {
    type Tolerance = T::Tolerance;

    fn abs_diff_eq(&self, other: &Self, tolerance: T::Tolerance) -> bool {
        same_variant!(self, other, |a, b| a.abs_diff_eq(b, tolerance))
    }

    fn rel_diff_eq(&self, other: &Self, tolerance: T::Tolerance) -> bool {
        same_variant!(self, other, |a, b| a.rel_diff_eq(b, tolerance))
    }

    fn ulps_diff_eq(&self, other: &Self, tolerance: u32) -> bool {
        same_variant!(self, other, |a, b| a.ulps_diff_eq(b, tolerance))
    }
}

macro_rules! shape_from {
    ($($variant:ident($ty:ident)),+) => {
        $(
            impl<T, const N: usize> From<$ty<T, N>> for Shape<T, N> {
                fn from(shape: $ty<T, N>) -> Self {
                    Shape::$variant(shape)
                }
            }
        )+
    };
}
shape_from!(
    Point(Vector),
    Sphere(Sphere),
    Aabb(Aabb),
    Plane(Plane),
    Ray(Ray),
    Segment(Segment)
);
