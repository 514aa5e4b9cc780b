//! N-dimensional geometric shapes and intersection tests.
//!
//! All shapes are generic over a [`Float`] element type and their dimension `N`. Points are plain
//! [`Vector`]s.
//!
//! - [`Sphere`] (a [`Circle`] in 2D), defined by center and radius.
//! - [`Aabb`] (a [`Rect`] in 2D), an axis-aligned box defined by its minimum and maximum corners.
//! - [`Plane`] (a line in 2D), the set of points `p` with `normal · p = distance`.
//! - [`Ray`], a half-line starting at `origin`.
//! - [`Segment`], a line segment between two points.
//!
//! The [`Intersects`] trait is implemented between every pair of these (in both directions), and
//! [`Shape`] erases the concrete shape type. Touching shapes are considered intersecting. Contacts
//! that need exact arithmetic to be detected (a point on a plane, two crossing lines) are checked
//! with a small tolerance, see [`tolerance`].
//!
//! # Examples
//!
//! ```
//! # use trellis_linalg::{vec2, shape::*};
//! let circle = Circle::new(vec2(0.0, 0.0), 1.0);
//! let rect = Rect::new(vec2(1.0, -1.0), vec2(3.0, 1.0));
//! assert!(circle.intersects(&rect));
//!
//! let ray = Ray::new(vec2(-5.0, 0.0), vec2(1.0, 0.0));
//! assert_eq!(ray.cast(&circle), Some(4.0));
//! assert_eq!(ray.cast(&rect), Some(6.0));
//! ```

mod intersect;

use crate::{approx::ApproxEq, Float, Vector};

pub use intersect::{Intersects, Raycast, Shape};

/// A circle in 2D space.
pub type Circle<T> = Sphere<T, 2>;
/// An axis-aligned rectangle in 2D space.
pub type Rect<T> = Aabb<T, 2>;
/// An axis-aligned box in 3D space.
pub type Box3<T> = Aabb<T, 3>;

/// Returns the tolerance used for contacts between shapes.
///
/// This is a small multiple of [`Float::EPSILON`].
pub fn tolerance<T: Float>() -> T {
    T::EPSILON * T::from_f64(64.0)
}

/// Shapes that can compute the point on (or in) them that is closest to a given point.
pub trait ClosestPoint<T, const N: usize> {
    /// Returns the point of `self` closest to `point`.
    ///
    /// If `point` is contained in `self`, it is returned unchanged.
    fn closest_point(&self, point: Vector<T, N>) -> Vector<T, N>;

    /// Returns the distance between `point` and `self` (0 if `self` contains `point`).
    fn distance_to(&self, point: Vector<T, N>) -> T
    where
        T: Float,
    {
        self.closest_point(point).distance(point)
    }
}

/// A solid N-dimensional sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere<T, const N: usize> {
    pub center: Vector<T, N>,
    pub radius: T,
}

impl<T: Float, const N: usize> Sphere<T, N> {
    /// Creates a sphere with the given center and radius.
    ///
    /// # Panics
    ///
    /// Panics if `radius` is negative.
    pub fn new(center: Vector<T, N>, radius: T) -> Self {
        assert!(radius >= T::ZERO, "sphere radius must not be negative");
        Self { center, radius }
    }

    /// Returns whether `point` lies inside or on the surface of this sphere.
    pub fn contains(&self, point: Vector<T, N>) -> bool {
        self.center.distance2(point) <= self.radius * self.radius
    }
}

impl<T: Float, const N: usize> ClosestPoint<T, N> for Sphere<T, N> {
    fn closest_point(&self, point: Vector<T, N>) -> Vector<T, N> {
        let dist = self.center.distance(point);
        if dist <= self.radius {
            point
        } else {
            self.center + (point - self.center) * (self.radius / dist)
        }
    }
}

/// An axis-aligned bounding box.
///
/// `min` is less than or equal to `max` in every component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb<T, const N: usize> {
    pub min: Vector<T, N>,
    pub max: Vector<T, N>,
}

impl<T: Float, const N: usize> Aabb<T, N> {
    /// Creates a box spanning the two corners `a` and `b`, which can be given in any order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use trellis_linalg::{vec2, shape::Rect};
    /// let rect = Rect::new(vec2(2.0, 0.0), vec2(0.0, 1.0));
    /// assert_eq!(rect.min, vec2(0.0, 0.0));
    /// assert_eq!(rect.max, vec2(2.0, 1.0));
    /// ```
    pub fn new(a: Vector<T, N>, b: Vector<T, N>) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Computes the smallest box containing all `points`.
    ///
    /// Returns [`None`] if `points` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use trellis_linalg::{vec2, shape::Rect};
    /// let rect = Rect::from_points([vec2(1.0, 5.0), vec2(-1.0, 2.0), vec2(0.0, 7.0)]).unwrap();
    /// assert_eq!(rect, Rect::new(vec2(-1.0, 2.0), vec2(1.0, 7.0)));
    /// assert_eq!(Rect::<f32>::from_points([]), None);
    /// ```
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vector<T, N>>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |aabb, p| Self {
            min: aabb.min.min(p),
            max: aabb.max.max(p),
        }))
    }

    /// Returns the center point of this box.
    pub fn center(&self) -> Vector<T, N> {
        (self.min + self.max) / (T::ONE + T::ONE)
    }

    /// Returns the size of this box along each axis.
    pub fn extents(&self) -> Vector<T, N> {
        self.max - self.min
    }

    /// Returns whether `point` lies inside or on the boundary of this box.
    pub fn contains(&self, point: Vector<T, N>) -> bool {
        (0..N).all(|i| self.min[i] <= point[i] && point[i] <= self.max[i])
    }

    /// Returns the smallest box containing both `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

impl<T: Float, const N: usize> ClosestPoint<T, N> for Aabb<T, N> {
    fn closest_point(&self, point: Vector<T, N>) -> Vector<T, N> {
        point.clamp(self.min, self.max)
    }
}

/// An infinite hyperplane: all points `p` with `normal · p = distance`.
///
/// `normal` has unit length, so `distance` is the signed distance of the plane from the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane<T, const N: usize> {
    pub normal: Vector<T, N>,
    pub distance: T,
}

impl<T: Float, const N: usize> Plane<T, N> {
    /// Creates a plane from a normal vector and its distance from the origin.
    ///
    /// `normal` will be normalized.
    ///
    /// # Panics
    ///
    /// Panics if `normal` has zero length.
    pub fn new(normal: Vector<T, N>, distance: T) -> Self {
        Self {
            normal: unit(normal, "plane normal"),
            distance,
        }
    }

    /// Creates a plane that contains `point` and is perpendicular to `normal`.
    ///
    /// # Panics
    ///
    /// Panics if `normal` has zero length.
    pub fn from_point_normal(point: Vector<T, N>, normal: Vector<T, N>) -> Self {
        let normal = unit(normal, "plane normal");
        Self {
            normal,
            distance: normal.dot(point),
        }
    }

    /// Returns the signed distance of `point` from the plane.
    ///
    /// The result is positive on the side the normal points to.
    ///
    /// # Examples
    ///
    /// ```
    /// # use trellis_linalg::{vec3, shape::Plane};
    /// let floor = Plane::new(vec3(0.0, 1.0, 0.0), 2.0);
    /// assert_eq!(floor.signed_distance(vec3(5.0, 3.0, 1.0)), 1.0);
    /// assert_eq!(floor.signed_distance(vec3(0.0, 0.0, 0.0)), -2.0);
    /// assert_eq!(floor.project(vec3(5.0, 3.0, 1.0)), vec3(5.0, 2.0, 1.0));
    /// ```
    pub fn signed_distance(&self, point: Vector<T, N>) -> T {
        self.normal.dot(point) - self.distance
    }

    /// Orthogonally projects `point` onto the plane.
    pub fn project(&self, point: Vector<T, N>) -> Vector<T, N> {
        point - self.normal * self.signed_distance(point)
    }
}

impl<T: Float, const N: usize> ClosestPoint<T, N> for Plane<T, N> {
    fn closest_point(&self, point: Vector<T, N>) -> Vector<T, N> {
        self.project(point)
    }
}

/// A half-line starting at `origin` and extending in `direction`.
///
/// `direction` has unit length, so the ray parameter `t` is the distance from `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray<T, const N: usize> {
    pub origin: Vector<T, N>,
    pub direction: Vector<T, N>,
}

impl<T: Float, const N: usize> Ray<T, N> {
    /// Creates a ray. `direction` will be normalized.
    ///
    /// # Panics
    ///
    /// Panics if `direction` has zero length.
    pub fn new(origin: Vector<T, N>, direction: Vector<T, N>) -> Self {
        Self {
            origin,
            direction: unit(direction, "ray direction"),
        }
    }

    /// Returns the point at distance `t` along the ray.
    pub fn at(&self, t: T) -> Vector<T, N> {
        self.origin + self.direction * t
    }

    /// Casts this ray at `shape`, returning the distance to the first hit.
    ///
    /// Returns `Some(0.0)` if the origin is inside `shape`.
    pub fn cast<S: Raycast<T, N>>(&self, shape: &S) -> Option<T> {
        shape.raycast(self)
    }
}

impl<T: Float, const N: usize> ClosestPoint<T, N> for Ray<T, N> {
    fn closest_point(&self, point: Vector<T, N>) -> Vector<T, N> {
        let t = (point - self.origin).dot(self.direction).max(T::ZERO);
        self.at(t)
    }
}

/// A line segment between `start` and `end`.
///
/// A segment whose endpoints coincide behaves like a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment<T, const N: usize> {
    pub start: Vector<T, N>,
    pub end: Vector<T, N>,
}

impl<T: Float, const N: usize> Segment<T, N> {
    pub fn new(start: Vector<T, N>, end: Vector<T, N>) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> T {
        self.start.distance(self.end)
    }

    /// Returns the (non-normalized) vector from `start` to `end`.
    pub fn delta(&self) -> Vector<T, N> {
        self.end - self.start
    }
}

impl<T: Float, const N: usize> ClosestPoint<T, N> for Segment<T, N> {
    fn closest_point(&self, point: Vector<T, N>) -> Vector<T, N> {
        let delta = self.delta();
        let len2 = delta.length2();
        if len2 == T::ZERO {
            return self.start;
        }
        let t = ((point - self.start).dot(delta) / len2).clamp(T::ZERO, T::ONE);
        self.start + delta * t
    }
}

#[track_caller]
fn unit<T: Float, const N: usize>(v: Vector<T, N>, what: &str) -> Vector<T, N> {
    match v.try_normalize() {
        Some(v) => v,
        None => panic!("{what} must have non-zero length"),
    }
}

/// Shapes are approximately equal when all of their fields are.
macro_rules! approx_fields {
    ($($shape:ident { $($field:ident),+ })+) => {
        $(
            impl<T: ApproxEq, const N: usize> ApproxEq for $shape<T, N> {
                type Tolerance = T::Tolerance;

                fn abs_diff_eq(&self, other: &Self, tolerance: T::Tolerance) -> bool {
                    $(self.$field.abs_diff_eq(&other.$field, tolerance))&&+
                }

                fn rel_diff_eq(&self, other: &Self, tolerance: T::Tolerance) -> bool {
                    $(self.$field.rel_diff_eq(&other.$field, tolerance))&&+
                }

                fn ulps_diff_eq(&self, other: &Self, tolerance: u32) -> bool {
                    $(self.$field.ulps_diff_eq(&other.$field, tolerance))&&+
                }
            }
        )+
    };
}

approx_fields! {
    Sphere { center, radius }
    Aabb { min, max }
    Plane { normal, distance }
    Ray { origin, direction }
    Segment { start, end }
}

#[cfg(test)]
mod tests {
    use crate::{assert_approx_eq, assert_approx_ne, vec2, vec3};

    use super::*;

    #[test]
    fn aabb_helpers() {
        let a = Rect::new(vec2(0.0, 0.0), vec2(2.0, 2.0));
        let b = Rect::new(vec2(1.0, -1.0), vec2(4.0, 1.0));
        assert_eq!(a.center(), vec2(1.0, 1.0));
        assert_eq!(b.extents(), vec2(3.0, 2.0));
        assert_eq!(a.union(&b), Rect::new(vec2(0.0, -1.0), vec2(4.0, 2.0)));
        assert!(a.contains(vec2(2.0, 0.0)));
        assert!(!a.contains(vec2(2.1, 0.0)));
        assert_eq!(a.closest_point(vec2(5.0, 1.0)), vec2(2.0, 1.0));
        assert_eq!(a.closest_point(vec2(0.5, 0.5)), vec2(0.5, 0.5));
    }

    #[test]
    fn sphere_helpers() {
        let s = Sphere::new(vec3(0.0, 0.0, 0.0), 2.0);
        assert!(s.contains(vec3(0.0, 2.0, 0.0)));
        assert!(!s.contains(vec3(0.0, 2.0, 0.1)));
        assert_eq!(s.closest_point(vec3(0.0, 0.0, 10.0)), vec3(0.0, 0.0, 2.0));
        assert_eq!(s.distance_to(vec3(0.0, 0.0, 10.0)), 8.0);
        assert_eq!(s.distance_to(vec3(1.0, 0.0, 0.0)), 0.0);
    }

    #[test]
    #[should_panic(expected = "sphere radius must not be negative")]
    fn negative_radius() {
        Sphere::new(vec2(0.0, 0.0), -1.0);
    }

    #[test]
    fn plane_helpers() {
        let p = Plane::from_point_normal(vec2(0.0, 3.0), vec2(0.0, -2.0));
        assert_eq!(p.normal, vec2(0.0, -1.0));
        assert_eq!(p.distance, -3.0);
        assert_eq!(p.signed_distance(vec2(7.0, 0.0)), 3.0);
        assert_eq!(p.closest_point(vec2(7.0, 0.0)), vec2(7.0, 3.0));
    }

    #[test]
    #[should_panic(expected = "plane normal must have non-zero length")]
    fn zero_normal() {
        Plane::new(vec2(0.0, 0.0), 1.0);
    }

    #[test]
    fn ray_helpers() {
        let r = Ray::new(vec2(1.0, 1.0), vec2(3.0, 0.0));
        assert_eq!(r.direction, vec2(1.0, 0.0));
        assert_eq!(r.at(2.5), vec2(3.5, 1.0));
        // Points behind the origin are closest to the origin.
        assert_eq!(r.closest_point(vec2(-4.0, 0.0)), vec2(1.0, 1.0));
        assert_eq!(r.closest_point(vec2(4.0, 0.0)), vec2(4.0, 1.0));
    }

    #[test]
    fn approx_equality() {
        let third = 1.0 / 3.0;
        assert_approx_eq!(
            Sphere::new(vec2(0.1 + 0.2, 0.0), 3.0 * third),
            Sphere::new(vec2(0.3, 0.0), 1.0)
        );
        assert_approx_ne!(
            Sphere::new(vec2(0.0, 0.0), 1.0),
            Sphere::new(vec2(0.0, 0.0), 1.001)
        );
        assert_approx_eq!(
            Sphere::new(vec2(0.0, 0.0), 1.0),
            Sphere::new(vec2(0.0, 0.0), 1.001)
        )
        .abs(0.01);

        assert_approx_eq!(
            Rect::new(vec2(0.0, 0.0), vec2(1.0, 1.0)),
            Rect::new(vec2(0.0, 1e-9), vec2(1.0, 1.0))
        )
        .abs(1e-6);
        assert_approx_eq!(
            Plane::from_point_normal(vec3(0.0, 0.0, 2.0), vec3(0.0, 0.0, 5.0)),
            Plane::new(vec3(0.0, 0.0, 1.0), 2.0)
        );
        assert_approx_eq!(
            Ray::new(vec2(1.0, 1.0), vec2(3.0, 4.0)),
            Ray {
                origin: vec2(1.0, 1.0),
                direction: vec2(0.6, 0.8),
            }
        );
        assert_approx_ne!(
            Segment::new(vec2(0.0, 0.0), vec2(1.0, 0.0)),
            Segment::new(vec2(1.0, 0.0), vec2(0.0, 0.0))
        )
        .abs(0.5);
        assert_approx_eq!(
            Segment::new(vec2(0.0f32, 0.0), vec2(1.0, 0.0)),
            Segment::new(vec2(0.0f32, 0.0), vec2(1.0 + f32::EPSILON, 0.0))
        )
        .ulps(1);
    }

    #[test]
    fn segment_helpers() {
        let s = Segment::new(vec2(0.0, 0.0), vec2(3.0, 4.0));
        assert_eq!(s.length(), 5.0);
        assert_eq!(s.closest_point(vec2(-1.0, -1.0)), s.start);
        assert_eq!(s.closest_point(vec2(10.0, 10.0)), s.end);
        assert_approx_eq!(s.closest_point(vec2(4.0, -3.0)), vec2(0.0, 0.0)).abs(1e-12);

        let degenerate = Segment::new(vec2(1.0, 1.0), vec2(1.0, 1.0));
        assert_eq!(degenerate.length(), 0.0);
        assert_eq!(degenerate.closest_point(vec2(5.0, 5.0)), vec2(1.0, 1.0));
    }
}
