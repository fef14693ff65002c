//! Error types for shape construction.

use thiserror::Error;

use crate::Axis;

/// Errors reported when validating an axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// The minimum corner lies above the maximum corner on `axis`.
    #[error("box minimum exceeds maximum on the {axis} axis")]
    InvertedAxis {
        /// Offending axis.
        axis: Axis,
    },

    /// A corner contains a NaN or infinite coordinate.
    #[error("box corner is not finite")]
    NonFinite,
}
