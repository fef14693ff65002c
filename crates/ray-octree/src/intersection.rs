//! Ray intersection with axis-aligned boxes.
//!
//! The test works one axis at a time (the slab method): for each axis the
//! ray is intersected with the pair of faces perpendicular to it, and the
//! entry point is accepted only if it lies on the box along the two other
//! axes. The nearest accepted entry wins.

use nalgebra::{Point3, RealField};

use crate::scalar::{in_range, is_less, is_negative, is_positive, lowest};
use crate::{Aabb, Axis, Ray};

/// A ray striking a box face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit<T: RealField + Copy> {
    /// Distance from the ray origin to the entry point, in units of the ray direction.
    pub distance: T,
    /// Axis perpendicular to the face that was struck.
    pub axis: Axis,
    /// The incoming ray mirrored off the struck face, anchored at the entry point.
    pub reflect: Ray<T>,
}

impl<T: RealField + Copy> Hit<T> {
    /// Returns the entry point on the box surface.
    #[inline]
    pub fn point(&self) -> Point3<T> {
        self.reflect.pos()
    }
}

/// Distance along a ray to a single face at signed offset `offset`.
///
/// `alpha` is the ray direction component perpendicular to the face. Returns
/// `None` if the ray runs parallel to the face.
#[inline]
pub fn ray_face_intersection<T: RealField + Copy>(alpha: T, offset: T) -> Option<T> {
    if is_positive(alpha) || is_negative(alpha) {
        Some(offset / alpha)
    } else {
        None
    }
}

/// Distances along a ray to a pair of opposite faces, in ascending order.
///
/// `a` and `b` are the signed offsets from the ray origin to the lower and
/// upper face. Returns `None` if the ray runs parallel to both faces.
pub fn ray_faces_intersection<T: RealField + Copy>(alpha: T, a: T, b: T) -> Option<(T, T)> {
    let near = ray_face_intersection(alpha, a)?;
    let far = ray_face_intersection(alpha, b)?;

    if is_negative(alpha) {
        Some((far, near))
    } else {
        Some((near, far))
    }
}

/// Intersects a ray with a box.
///
/// Returns the nearest face entry at a positive distance, or `None` if the
/// ray misses the box, points away from it, or starts inside or on it.
///
/// When entries along different axes are equally near, the lowest axis wins.
pub fn ray_shape_intersection<T: RealField + Copy>(ray: &Ray<T>, aabb: &Aabb<T>) -> Option<Hit<T>> {
    let pos = ray.pos();
    let dir = ray.dir();
    let (min, max) = (aabb.min(), aabb.max());

    let mut best: Option<(T, Axis, Point3<T>)> = None;

    for axis in Axis::ALL {
        let i = axis.index();
        let Some((entry, _)) = ray_faces_intersection(dir[i], min[i] - pos[i], max[i] - pos[i])
        else {
            continue;
        };
        if !is_positive(entry) {
            continue;
        }

        let point = ray.at(entry);
        let on_face = axis
            .others()
            .iter()
            .all(|other| {
                let j = other.index();
                in_range(point[j], min[j], max[j])
            });
        if !on_face {
            continue;
        }

        match best {
            Some((distance, _, _)) if !is_less(entry, distance) => {}
            _ => best = Some((entry, axis, point)),
        }
    }

    best.map(|(distance, axis, point)| Hit {
        distance,
        axis,
        reflect: ray.reflected(axis, point),
    })
}

/// Distance to the nearest face entry, or [`lowest`] if there is none.
///
/// Sentinel form of [`ray_shape_intersection`] for callers that keep a
/// running "best distance" seeded with the lowest value.
pub fn ray_shape_distance<T: RealField + Copy>(ray: &Ray<T>, aabb: &Aabb<T>) -> T {
    ray_shape_intersection(ray, aabb).map_or_else(lowest, |hit| hit.distance)
}
