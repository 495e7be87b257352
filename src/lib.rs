//! Resampling of N-dimensional arrays at arbitrary, possibly fractional and possibly
//! out-of-bounds coordinates, with nearest neighbour or multilinear interpolation.
//!
//! ```
//! use coordmap::map_coordinates;
//! use ndarray::array;
//!
//! let input = array![1.0, 2.0, 3.0, 4.0].into_dyn();
//! let coordinates = array![0.5, -1.0].into_dyn();
//! let result = map_coordinates(&input.view(), &[coordinates.view()], 1, "nearest", 0.0).unwrap();
//! assert_eq!(result, array![1.5, 1.0].into_dyn());
//! ```
//!
//! Out-of-range indices are resolved by a [`BoundaryMode`]. `mirror` reflects about the
//! edge sample and `reflect` about the array edge; both follow the documented semantics
//! exactly, including for negative indices, rather than the off-by-one behaviour of some
//! other `reflect` implementations.

pub mod algorithms;
pub mod boundary;
pub mod errors;
pub mod iterators;
pub mod one_dimensional_nodes;
pub mod utilities;

pub use algorithms::interpolation::{map_coordinates, MapCoordinates};
pub use algorithms::transforms::{affine_transform, coordinate_grid, rotate, shift, zoom};
pub use boundary::BoundaryMode;
pub use errors::{MapError, Result};
pub use one_dimensional_nodes::InterpolationOrder;
pub use utilities::element::{Coordinate, Element};
