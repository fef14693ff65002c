//! Rays in 3D space.

use nalgebra::{Point3, RealField, Scalar, Vector3};

use crate::scalar::is_equal;
use crate::Axis;

/// A half-line starting at `pos` and pointing along `dir`.
///
/// The direction does not have to be normalized. Distances reported by the
/// intersection routines are measured in multiples of `dir`, so they are
/// Euclidean distances only for unit directions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray<T: Scalar> {
    pos: Point3<T>,
    dir: Vector3<T>,
}

impl<T: RealField + Copy> Ray<T> {
    /// Creates a new ray from an origin and a direction.
    pub fn new(pos: Point3<T>, dir: Vector3<T>) -> Self {
        Self { pos, dir }
    }

    /// Returns the origin of the ray.
    #[inline]
    pub fn pos(&self) -> Point3<T> {
        self.pos
    }

    /// Returns the direction of the ray.
    #[inline]
    pub fn dir(&self) -> Vector3<T> {
        self.dir
    }

    /// Returns the point reached after travelling `t` directions along the ray.
    #[inline]
    pub fn at(&self, t: T) -> Point3<T> {
        self.pos + self.dir * t
    }

    /// Returns the same ray with a unit-length direction.
    ///
    /// Returns `None` if the direction has zero length.
    pub fn normalized(&self) -> Option<Self> {
        self.dir
            .try_normalize(T::zero())
            .map(|dir| Self::new(self.pos, dir))
    }

    /// Mirrors the ray off a face perpendicular to `axis`, anchored at `at`.
    ///
    /// The direction component along `axis` is negated; the other two are kept.
    pub fn reflected(&self, axis: Axis, at: Point3<T>) -> Self {
        let mut dir = self.dir;
        dir[axis.index()] = -dir[axis.index()];
        Self::new(at, dir)
    }

    /// Checks if both rays have equal origins and directions within tolerance.
    pub fn approx_eq(&self, other: &Self) -> bool {
        points_equal(&self.pos, &other.pos) && vectors_equal(&self.dir, &other.dir)
    }
}

/// Checks if two vectors are equal component-wise within tolerance.
#[inline]
pub fn vectors_equal<T: RealField + Copy>(a: &Vector3<T>, b: &Vector3<T>) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| is_equal(*x, *y))
}

/// Checks if two points are equal component-wise within tolerance.
#[inline]
pub fn points_equal<T: RealField + Copy>(a: &Point3<T>, b: &Point3<T>) -> bool {
    vectors_equal(&a.coords, &b.coords)
}
