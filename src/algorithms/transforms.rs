//! Geometric transforms expressed as coordinate mappings.
//!
//! Each transform builds, for every output element, the input coordinate it samples
//! and hands the coordinate arrays to [`MapCoordinates::apply`], so every
//! interpolation order and boundary mode is available to all of them.
use ndarray::{Array2, ArrayD, ArrayView2, ArrayViewD, IxDyn};

use crate::algorithms::interpolation::MapCoordinates;
use crate::errors::{MapError, Result};
use crate::utilities::element::Element;

fn invalid(parameter: &str, message: String) -> MapError
{
    MapError::InvalidParameter { parameter: parameter.to_string(), message }
}

/// Identity coordinates of an array of `shape` (`ij` indexing), one array per axis.
pub fn coordinate_grid(shape: &[usize]) -> Vec<ArrayD<f64>>
{
    (0..shape.len()).map(|axis| ArrayD::from_shape_fn(IxDyn(shape), |index| index[axis] as f64)).collect()
}

///
/// Sample the input at `matrix · o + offset` for every output index `o`. The output shape
/// defaults to the input shape.
///
pub fn affine_transform<T: Element>(input: &ArrayViewD<'_, T>, matrix: &ArrayView2<'_, f64>, offset: &[f64], output_shape: Option<&[usize]>, config: &MapCoordinates) -> Result<ArrayD<T>>
{
    let ndim = input.ndim();
    if matrix.dim() != (ndim, ndim)
    {
        return Err(invalid("matrix", format!("matrix shape {:?} must be ({ndim}, {ndim})", matrix.shape())));
    }
    if offset.len() != ndim
    {
        return Err(invalid("offset", format!("offset length ({}) must match input ndim ({ndim})", offset.len())));
    }
    let output_shape = output_shape.unwrap_or(input.shape());
    if output_shape.len() != ndim
    {
        return Err(invalid("output_shape", format!("output shape {output_shape:?} must have {ndim} dimensions")));
    }

    let coordinates: Vec<ArrayD<f64>> = (0..ndim).map(|axis|
    {
        let row = matrix.row(axis);
        ArrayD::from_shape_fn(IxDyn(output_shape), |index|
        {
            offset[axis] + row.iter().enumerate().map(|(j, m)| m * index[j] as f64).sum::<f64>()
        })
    }).collect();
    let views: Vec<ArrayViewD<'_, f64>> = coordinates.iter().map(|c| c.view()).collect();
    config.apply(input, &views)
}

///
/// Shift the input by `shift` along each axis: output index `o` samples `o - shift`.
///
pub fn shift<T: Element>(input: &ArrayViewD<'_, T>, shift: &[f64], config: &MapCoordinates) -> Result<ArrayD<T>>
{
    let ndim = input.ndim();
    if shift.len() != ndim
    {
        return Err(invalid("shift", format!("shift length ({}) must match input ndim ({ndim})", shift.len())));
    }
    let offset: Vec<f64> = shift.iter().map(|&s| -s).collect();
    affine_transform(input, &Array2::eye(ndim).view(), &offset, None, config)
}

///
/// Rescale the input by `factors`. Each output axis has `round(size * factor)` samples
/// spread evenly from the first to the last input sample.
///
pub fn zoom<T: Element>(input: &ArrayViewD<'_, T>, factors: &[f64], config: &MapCoordinates) -> Result<ArrayD<T>>
{
    let ndim = input.ndim();
    if factors.len() != ndim
    {
        return Err(invalid("zoom", format!("zoom length ({}) must match input ndim ({ndim})", factors.len())));
    }
    if let Some(factor) = factors.iter().find(|z| !z.is_finite() || **z <= 0.0)
    {
        return Err(invalid("zoom", format!("zoom factors must be positive and finite, got {factor}")));
    }
    let output_shape: Vec<usize> = input.shape().iter().zip(factors).map(|(&size, &z)| (size as f64 * z).round() as usize).collect();

    // one coordinate vector per axis, laid out along that axis and broadcast over the rest
    let coordinates: Vec<ArrayD<f64>> = (0..ndim).map(|axis|
    {
        let (size_in, size_out) = (input.shape()[axis], output_shape[axis]);
        let step = if size_out > 1 { (size_in as f64 - 1.0) / (size_out as f64 - 1.0) } else { 0.0 };
        let mut shape = vec![1; ndim];
        shape[axis] = size_out;
        ArrayD::from_shape_fn(IxDyn(&shape), |index| index[axis] as f64 * step)
    }).collect();
    let views: Vec<ArrayViewD<'_, f64>> = coordinates.iter().map(|c| c.view()).collect();
    config.apply(input, &views)
}

///
/// Rotate the input by `angle` degrees in the plane of `axes`, about the array center.
/// With `reshape` the output plane is enlarged to hold the whole rotated input.
///
pub fn rotate<T: Element>(input: &ArrayViewD<'_, T>, angle: f64, axes: (usize, usize), reshape: bool, config: &MapCoordinates) -> Result<ArrayD<T>>
{
    let ndim = input.ndim();
    if ndim < 2
    {
        return Err(invalid("input", "rotate requires at least 2D input".to_string()));
    }
    let (a0, a1) = if axes.0 <= axes.1 { axes } else { (axes.1, axes.0) };
    if a1 >= ndim || a0 == a1
    {
        return Err(invalid("axes", format!("invalid axes ({}, {}) for {ndim}D input", axes.0, axes.1)));
    }
    if !angle.is_finite()
    {
        return Err(invalid("angle", format!("angle must be finite, got {angle}")));
    }

    let (sin, cos) = angle.to_radians().sin_cos();
    let rotation = [[cos, sin], [-sin, cos]];
    let apply = |v: [f64; 2]| [rotation[0][0] * v[0] + rotation[0][1] * v[1], rotation[1][0] * v[0] + rotation[1][1] * v[1]];

    let in_plane = [input.shape()[a0] as f64, input.shape()[a1] as f64];
    let out_plane = if reshape
    {
        let corners = [[0.0, 0.0], [0.0, in_plane[1]], [in_plane[0], 0.0], [in_plane[0], in_plane[1]]].map(apply);
        let extent = |k: usize|
        {
            let (lo, hi) = corners.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| (lo.min(c[k]), hi.max(c[k])));
            (hi - lo + 0.5) as usize
        };
        [extent(0), extent(1)]
    }
    else
    {
        [input.shape()[a0], input.shape()[a1]]
    };

    let out_center = apply([(out_plane[0] as f64 - 1.0) / 2.0, (out_plane[1] as f64 - 1.0) / 2.0]);
    let in_center = [(in_plane[0] - 1.0) / 2.0, (in_plane[1] - 1.0) / 2.0];

    let mut matrix = Array2::<f64>::eye(ndim);
    matrix[[a0, a0]] = rotation[0][0];
    matrix[[a0, a1]] = rotation[0][1];
    matrix[[a1, a0]] = rotation[1][0];
    matrix[[a1, a1]] = rotation[1][1];
    let mut offset = vec![0.0; ndim];
    offset[a0] = in_center[0] - out_center[0];
    offset[a1] = in_center[1] - out_center[1];
    let mut output_shape = input.shape().to_vec();
    output_shape[a0] = out_plane[0];
    output_shape[a1] = out_plane[1];

    affine_transform(input, &matrix.view(), &offset, Some(output_shape.as_slice()), config)
}

#[cfg(test)]
fn ramp() -> ArrayD<f64>
{
    ndarray::Array::from_shape_fn((3, 4), |(i, j)| (10 * i + j) as f64).into_dyn()
}

#[cfg(test)]
fn row(array: &ArrayD<f64>, row: usize) -> Vec<f64>
{
    (0..array.shape()[1]).map(|j| array[[row, j]]).collect()
}

#[test]
fn coordinate_grid_is_the_identity_mapping()
{
    let input = ramp();
    let grid = coordinate_grid(input.shape());
    assert_eq!(grid.len(), 2);
    assert_eq!(grid[0][[2, 1]], 2.0);
    assert_eq!(grid[1][[2, 1]], 1.0);
    let views: Vec<_> = grid.iter().map(|c| c.view()).collect();
    let result = MapCoordinates::default().apply(&input.view(), &views).unwrap();
    assert_eq!(result, input);
}

#[test]
fn affine_transpose_and_offset()
{
    let input = ramp();
    let swap = ndarray::array![[0.0, 1.0], [1.0, 0.0]];
    let result = affine_transform(&input.view(), &swap.view(), &[0.0, 0.0], Some(&[4, 3][..]), &MapCoordinates::default()).unwrap();
    assert_eq!(result, input.t().to_owned());

    let result = affine_transform(&input.view(), &Array2::eye(2).view(), &[1.0, 0.5], None, &MapCoordinates::default().with_mode(crate::BoundaryMode::Nearest)).unwrap();
    assert_eq!(result[[0, 0]], 10.5);
    assert_eq!(result[[2, 3]], 23.0);

    assert!(matches!(
        affine_transform(&input.view(), &Array2::eye(3).view(), &[0.0, 0.0], None, &MapCoordinates::default()),
        Err(MapError::InvalidParameter { .. })
    ));
}

#[test]
fn shift_moves_samples_and_fills()
{
    let input = ndarray::array![1.0, 2.0, 3.0, 4.0].into_dyn();
    let config = MapCoordinates::default().with_cval(-1.0);
    let result = shift(&input.view(), &[1.0], &config).unwrap();
    assert_eq!(result, ndarray::array![-1.0, 1.0, 2.0, 3.0].into_dyn());
    let result = shift(&input.view(), &[-1.0], &config.with_mode(crate::BoundaryMode::Wrap)).unwrap();
    assert_eq!(result, ndarray::array![2.0, 3.0, 4.0, 1.0].into_dyn());
    assert!(shift(&input.view(), &[1.0, 2.0], &config).is_err());
}

#[test]
fn zoom_spreads_samples_between_the_edges()
{
    let input = ndarray::array![0.0, 3.0].into_dyn();
    let result = zoom(&input.view(), &[2.5], &MapCoordinates::default()).unwrap();
    assert_eq!(result, ndarray::array![0.0, 0.75, 1.5, 2.25, 3.0].into_dyn());

    let input = ramp();
    let result = zoom(&input.view(), &[1.0, 0.5], &MapCoordinates::default()).unwrap();
    assert_eq!(result.shape(), &[3, 2]);
    assert_eq!(result, ndarray::array![[0.0, 3.0], [10.0, 13.0], [20.0, 23.0]].into_dyn());

    assert!(zoom(&input.view(), &[1.0, 0.0], &MapCoordinates::default()).is_err());
}

#[test]
fn rotate_quarter_turns()
{
    let input = ramp();
    let nearest = MapCoordinates::default().with_order(crate::InterpolationOrder::Nearest);
    let result = rotate(&input.view(), 90.0, (0, 1), true, &nearest).unwrap();
    assert_eq!(result.shape(), &[4, 3]);
    // counter-clockwise: the last column becomes the first row
    assert_eq!(row(&result, 0), vec![3.0, 13.0, 23.0]);
    assert_eq!(row(&result, 3), vec![0.0, 10.0, 20.0]);

    let result = rotate(&input.view(), 180.0, (1, 0), false, &nearest).unwrap();
    assert_eq!(result.shape(), &[3, 4]);
    assert_eq!(result[[0, 0]], 23.0);
    assert_eq!(result[[2, 3]], 0.0);

    assert!(rotate(&ndarray::array![1.0, 2.0].into_dyn().view(), 45.0, (0, 1), false, &nearest).is_err());
    assert!(rotate(&input.view(), 45.0, (1, 1), false, &nearest).is_err());
}
