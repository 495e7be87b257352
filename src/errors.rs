use thiserror::Error;

/// Errors reported while validating a coordinate mapping.
///
/// Every variant is raised before any sampling work starts, so a failed call
/// never produces partial output.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum MapError
{
    #[error("coordinates must be a sequence of length input.ndim, but {actual} != {expected}")]
    CoordinateCountMismatch { expected: usize, actual: usize },

    #[error("unsupported mode '{0}', supported modes are constant, nearest, wrap, mirror, reflect")]
    UnsupportedMode(String),

    #[error("unsupported interpolation order {0}, only 0 (nearest) and 1 (linear) are supported")]
    UnsupportedOrder(u32),

    #[error("coordinate array {axis} with shape {shape:?} cannot be broadcast to {broadcast:?}")]
    IncompatibleShapes { axis: usize, shape: Vec<usize>, broadcast: Vec<usize> },

    #[error("input axis {axis} has zero length")]
    EmptyAxis { axis: usize },

    #[error("fill value {0} is not representable in the input element type")]
    InvalidFillValue(f64),

    #[error("invalid parameter '{parameter}': {message}")]
    InvalidParameter { parameter: String, message: String },

    #[error("shape error: {0}")]
    Shape(String),
}

impl From<ndarray::ShapeError> for MapError
{
    fn from(value: ndarray::ShapeError) -> Self {
        MapError::Shape(value.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MapError>;

#[test]
fn mode_error_lists_supported_modes()
{
    let message = MapError::UnsupportedMode("linear".to_string()).to_string();
    for mode in ["constant", "nearest", "wrap", "mirror", "reflect"]
    {
        assert!(message.contains(mode));
    }
}
