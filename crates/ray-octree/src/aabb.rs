//! Axis-aligned bounding boxes and octant subdivision.

use std::fmt;

use nalgebra::{Point3, RealField, Scalar, Vector3};

use crate::scalar::{in_range, is_less};
use crate::ShapeError;

/// One of the three coordinate axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The x axis (index 0).
    X,
    /// The y axis (index 1).
    Y,
    /// The z axis (index 2).
    Z,
}

impl Axis {
    /// All axes in index order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Returns the component index of this axis.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Returns the two axes perpendicular to this one.
    #[inline]
    pub fn others(self) -> [Axis; 2] {
        match self {
            Axis::X => [Axis::Y, Axis::Z],
            Axis::Y => [Axis::X, Axis::Z],
            Axis::Z => [Axis::X, Axis::Y],
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        })
    }
}

/// An axis-aligned box spanning `min` to `max`.
///
/// Valid boxes satisfy `min <= max` on every axis. Flat boxes, where
/// `min == max` on some axis, are valid and can still be hit by rays
/// crossing them.
///
/// # Octants
///
/// A box splits into eight octants addressed by a 3-bit index:
/// bit 0 selects the upper half along x, bit 1 along y and bit 2 along z.
///
/// ```text
/// index  x  y  z
///   0    -  -  -
///   1    +  -  -
///   2    -  +  -
///   3    +  +  -
///   4    -  -  +
///   5    +  -  +
///   6    -  +  +
///   7    +  +  +
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb<T: Scalar> {
    min: Point3<T>,
    max: Point3<T>,
}

impl<T: RealField + Copy> Aabb<T> {
    /// Creates a box from its minimum and maximum corners.
    ///
    /// # Panics (debug builds only)
    /// Panics if `min` exceeds `max` on any axis.
    pub fn new(min: Point3<T>, max: Point3<T>) -> Self {
        debug_assert!(
            Axis::ALL.iter().all(|a| min[a.index()] <= max[a.index()]),
            "Box minimum must not exceed maximum"
        );
        Self { min, max }
    }

    /// Creates a box from its corners, validating them.
    pub fn try_new(min: Point3<T>, max: Point3<T>) -> Result<Self, ShapeError> {
        if min.iter().chain(max.iter()).any(|c| !c.is_finite()) {
            return Err(ShapeError::NonFinite);
        }
        if let Some(axis) = Axis::ALL
            .into_iter()
            .find(|a| min[a.index()] > max[a.index()])
        {
            return Err(ShapeError::InvertedAxis { axis });
        }
        Ok(Self { min, max })
    }

    /// Creates a box centred on `center` reaching `half_extent` along each axis.
    pub fn from_center(center: Point3<T>, half_extent: Vector3<T>) -> Self {
        Self::new(center - half_extent, center + half_extent)
    }

    /// Returns the minimum corner.
    #[inline]
    pub fn min(&self) -> Point3<T> {
        self.min
    }

    /// Returns the maximum corner.
    #[inline]
    pub fn max(&self) -> Point3<T> {
        self.max
    }

    /// Returns the size of the box along each axis.
    #[inline]
    pub fn extent(&self) -> Vector3<T> {
        self.max - self.min
    }

    /// Returns half the size of the box along each axis.
    #[inline]
    pub fn half_extent(&self) -> Vector3<T> {
        self.extent() / (T::one() + T::one())
    }

    /// Returns the centre point of the box.
    #[inline]
    pub fn center(&self) -> Point3<T> {
        self.min + self.half_extent()
    }

    /// Returns the length of the box diagonal.
    ///
    /// Serves as the resolution of a tree node: the tracer keeps subdividing
    /// while this is larger than its power budget.
    #[inline]
    pub fn diagonal(&self) -> T {
        self.extent().norm()
    }

    /// Checks if `point` lies inside the box, boundaries included with tolerance.
    pub fn contains(&self, point: &Point3<T>) -> bool {
        Axis::ALL.iter().all(|a| {
            let i = a.index();
            in_range(point[i], self.min[i], self.max[i])
        })
    }

    /// Returns the octant at `index`.
    ///
    /// Only the low three bits of `index` are used. Inner faces of the
    /// octant coincide exactly with the centre of this box.
    pub fn octant(&self, index: usize) -> Self {
        let center = self.center();
        let mut min = self.min;
        let mut max = self.max;

        for axis in Axis::ALL {
            let i = axis.index();
            if (index >> i) & 1 == 1 {
                min[i] = center[i];
            } else {
                max[i] = center[i];
            }
        }

        Self { min, max }
    }

    /// Returns all eight octants in index order.
    pub fn octants(&self) -> [Self; 8] {
        std::array::from_fn(|index| self.octant(index))
    }

    /// Returns the index of the octant containing `point`.
    ///
    /// Points on the centre plane of an axis are assigned to the upper half.
    /// Points outside the box are assigned to the nearest octant.
    pub fn octant_of(&self, point: &Point3<T>) -> usize {
        let center = self.center();

        Axis::ALL.iter().fold(0, |index, axis| {
            let i = axis.index();
            if is_less(point[i], center[i]) {
                index
            } else {
                index | (1 << i)
            }
        })
    }
}
