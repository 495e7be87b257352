use log::debug;
use ndarray::{ArrayD, ArrayViewD, IxDyn};
use serde::{Deserialize, Serialize};

use crate::algorithms::combination::combine;
use crate::boundary::BoundaryMode;
use crate::errors::{MapError, Result};
use crate::one_dimensional_nodes::{axis_nodes, InterpolationOrder};
use crate::utilities::broadcast::{broadcast_shape, flatten_broadcast};
use crate::utilities::element::{Coordinate, Element};

///
/// A validated mapping configuration. Build it once and apply it to any number of
/// input/coordinate pairs.
///
/// Deserializes from e.g. `{"order": "nearest", "mode": "wrap", "cval": 0.0}`; missing
/// fields take their defaults (linear, constant, 0).
///
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapCoordinates
{
    pub order: InterpolationOrder,
    pub mode: BoundaryMode,
    /// Fill value for samples outside the input in [`BoundaryMode::Constant`].
    pub cval: f64,
}

impl Default for MapCoordinates
{
    fn default() -> Self {
        Self { order: InterpolationOrder::Linear, mode: BoundaryMode::Constant, cval: 0.0 }
    }
}

impl MapCoordinates
{
    pub fn new(order: InterpolationOrder, mode: BoundaryMode, cval: f64) -> Self
    {
        Self { order, mode, cval }
    }

    /// Build from caller-facing values, e.g. `(1, "reflect", 0.0)`.
    pub fn from_names(order: u32, mode: &str, cval: f64) -> Result<Self>
    {
        let mode = mode.parse::<BoundaryMode>()?;
        let order = InterpolationOrder::try_from(order)?;
        Ok(Self { order, mode, cval })
    }

    pub fn with_order(mut self, order: InterpolationOrder) -> Self
    {
        self.order = order;
        self
    }

    pub fn with_mode(mut self, mode: BoundaryMode) -> Self
    {
        self.mode = mode;
        self
    }

    pub fn with_cval(mut self, cval: f64) -> Self
    {
        self.cval = cval;
        self
    }

    ///
    /// Sample `input` at `coordinates`, one coordinate array per input axis. The coordinate
    /// arrays are broadcast against each other and their common shape is the output shape.
    ///
    pub fn apply<T: Element, C: Coordinate>(&self, input: &ArrayViewD<'_, T>, coordinates: &[ArrayViewD<'_, C>]) -> Result<ArrayD<T>>
    {
        let ndim = input.ndim();
        if coordinates.len() != ndim
        {
            return Err(MapError::CoordinateCountMismatch { expected: ndim, actual: coordinates.len() });
        }
        if let Some(axis) = input.shape().iter().position(|&size| size == 0)
        {
            return Err(MapError::EmptyAxis { axis });
        }
        let cval = if self.mode == BoundaryMode::Constant
        {
            Some(T::from_fill(self.cval).ok_or(MapError::InvalidFillValue(self.cval))?)
        }
        else
        {
            None
        };

        let shapes: Vec<&[usize]> = coordinates.iter().map(|c| c.shape()).collect();
        let output_shape = broadcast_shape(&shapes)?;
        let num_elements: usize = output_shape.iter().product();

        debug!(
            "map_coordinates: input {:?}, output {:?}, order {}, mode {}, {} combinations, fast path {}",
            input.shape(), output_shape, self.order, self.mode,
            self.order.num_nodes().pow(ndim as u32), self.mode.always_valid()
        );

        let mut axes = Vec::with_capacity(ndim);
        for (axis, coordinate) in coordinates.iter().enumerate()
        {
            let flat = flatten_broadcast(coordinate, &output_shape, axis)?;
            axes.push(axis_nodes(&flat, self.order));
        }

        let contiguous = input.as_standard_layout();
        let data = contiguous.as_slice().ok_or_else(|| MapError::Shape("input is not contiguous".to_string()))?;
        let values = if T::SINGLE_PRECISION && C::SINGLE_PRECISION
        {
            combine::<T, C::Weight, f32>(data, input.shape(), &axes, self.mode, cval, num_elements)
        }
        else
        {
            combine::<T, C::Weight, f64>(data, input.shape(), &axes, self.mode, cval, num_elements)
        };
        Ok(ArrayD::from_shape_vec(IxDyn(&output_shape), values)?)
    }
}

///
/// Interpolate `input` at `coordinates` with nearest neighbour (`order = 0`) or linear
/// (`order = 1`) interpolation. `mode` is one of `constant`, `nearest`, `wrap`, `mirror`
/// or `reflect`; `cval` fills samples outside the input in `constant` mode.
///
/// The output has the broadcast shape of `coordinates` and the element type of `input`.
/// Integer inputs are rounded half away from zero.
///
pub fn map_coordinates<T: Element, C: Coordinate>(input: &ArrayViewD<'_, T>, coordinates: &[ArrayViewD<'_, C>], order: u32, mode: &str, cval: f64) -> Result<ArrayD<T>>
{
    if coordinates.len() != input.ndim()
    {
        return Err(MapError::CoordinateCountMismatch { expected: input.ndim(), actual: coordinates.len() });
    }
    MapCoordinates::from_names(order, mode, cval)?.apply(input, coordinates)
}

#[cfg(test)]
fn sample_1d(coordinate: f64, order: u32, mode: &str, cval: f64) -> f64
{
    let input = ndarray::array![1.0, 2.0, 3.0, 4.0].into_dyn();
    let coordinates = ndarray::array![coordinate].into_dyn();
    map_coordinates(&input.view(), &[coordinates.view()], order, mode, cval).unwrap()[[0]]
}

#[test]
fn one_dimensional_examples()
{
    assert_eq!(sample_1d(0.5, 1, "nearest", 0.0), 1.5);
    assert_eq!(sample_1d(-1.0, 0, "constant", 0.0), 0.0);
    assert_eq!(sample_1d(-1.0, 0, "nearest", 0.0), 1.0);
    assert_eq!(sample_1d(-1.0, 0, "wrap", 0.0), 4.0);
    assert_eq!(sample_1d(-1.0, 0, "mirror", 0.0), 2.0);
    assert_eq!(sample_1d(-1.0, 0, "reflect", 0.0), 1.0);
    assert_eq!(sample_1d(4.0, 0, "reflect", 0.0), 4.0);
    assert_eq!(sample_1d(4.0, 0, "mirror", 0.0), 3.0);
    assert_eq!(sample_1d(3.5, 1, "wrap", 0.0), 2.5);
}

#[test]
fn exact_coordinates_return_input_values()
{
    let input = ndarray::Array::from_shape_fn((3, 4), |(i, j)| (10 * i + j) as f64).into_dyn();
    let rows = ndarray::array![0.0, 1.0, 2.0, 2.0].into_dyn();
    let cols = ndarray::array![0.0, 3.0, 1.0, 3.0].into_dyn();
    for order in [0, 1]
    {
        for mode in BoundaryMode::ALL
        {
            let result = map_coordinates(&input.view(), &[rows.view(), cols.view()], order, mode.name(), -1.0).unwrap();
            assert_eq!(result, ndarray::array![0.0, 13.0, 21.0, 23.0].into_dyn(), "order {order}, mode {mode}");
        }
    }
}

#[test]
fn constant_mode_outside_the_input()
{
    assert_eq!(sample_1d(4.0, 0, "constant", 7.0), 7.0);
    assert_eq!(sample_1d(-1.0, 1, "constant", 7.0), 7.0);
    // one unit inside the blend reaches past the edge
    assert_eq!(sample_1d(-0.25, 1, "constant", 8.0), 0.25 * 8.0 + 0.75 * 1.0);
    assert_eq!(sample_1d(3.75, 1, "constant", 8.0), 0.25 * 4.0 + 0.75 * 8.0);
}

#[test]
fn bilinear_wrap_on_broadcast_coordinates()
{
    let input = ndarray::Array::from_shape_fn((3, 4), |(i, j)| (10 * i + j) as f64).into_dyn();
    let rows = ndarray::array![[2.5], [-0.5]].into_dyn();
    let cols = ndarray::array![3.5, 0.25, 1.0].into_dyn();
    let result = MapCoordinates::new(InterpolationOrder::Linear, BoundaryMode::Wrap, 0.0).apply(&input.view(), &[rows.view(), cols.view()]).unwrap();
    assert_eq!(result.shape(), &[2, 3]);
    let wrapped = |i: i64, j: i64| input[[i.rem_euclid(3) as usize, j.rem_euclid(4) as usize]];
    let blend = |r: f64, c: f64|
    {
        let (r0, c0) = (r.floor(), c.floor());
        let (fr, fc) = (r - r0, c - c0);
        let (r0, c0) = (r0 as i64, c0 as i64);
        (1.0 - fr) * (1.0 - fc) * wrapped(r0, c0) + (1.0 - fr) * fc * wrapped(r0, c0 + 1)
            + fr * (1.0 - fc) * wrapped(r0 + 1, c0) + fr * fc * wrapped(r0 + 1, c0 + 1)
    };
    for (i, r) in [2.5, -0.5].into_iter().enumerate()
    {
        for (j, c) in [3.5, 0.25, 1.0].into_iter().enumerate()
        {
            assert!((result[[i, j]] - blend(r, c)).abs() < 1e-12);
        }
    }
    // row 2.5 blends the last row with the first
    assert!((result[[0, 2]] - 11.0).abs() < 1e-12);
}

#[test]
fn integer_inputs_round_the_blend()
{
    let input = ndarray::array![1_i32, 2, 4, 7].into_dyn();
    let coordinates = ndarray::array![0.5, 1.5, 2.5, 2.25, -0.5].into_dyn();
    let result = map_coordinates(&input.view(), &[coordinates.view()], 1, "nearest", 0.0).unwrap();
    assert_eq!(result, ndarray::array![2, 3, 6, 5, 1].into_dyn());

    let negative = ndarray::array![-1_i64, -2].into_dyn();
    let result = map_coordinates(&negative.view(), &[ndarray::array![0.5].into_dyn().view()], 1, "nearest", 0.0).unwrap();
    assert_eq!(result[[0]], -2);
}

#[test]
fn float32_and_integer_coordinates()
{
    let input = ndarray::array![[1.0_f32, 2.0], [3.0, 4.0]].into_dyn();
    let rows = ndarray::array![0.5_f32].into_dyn();
    let cols = ndarray::array![0.5_f32].into_dyn();
    let result = map_coordinates(&input.view(), &[rows.view(), cols.view()], 1, "constant", 0.0).unwrap();
    assert_eq!(result[[0]], 2.5_f32);

    let rows = ndarray::array![1_i32, 0, 5].into_dyn();
    let cols = ndarray::array![0_i32, 1, 0].into_dyn();
    let result = map_coordinates(&input.view(), &[rows.view(), cols.view()], 1, "constant", -1.0).unwrap();
    assert_eq!(result, ndarray::array![3.0_f32, 2.0, -1.0].into_dyn());
}

#[test]
fn single_precision_coordinates_keep_double_precision_values()
{
    let input = ndarray::array![16_777_217.0_f64, 0.1].into_dyn();
    let coordinates = ndarray::array![0.0_f32, 1.0].into_dyn();
    for order in [0, 1]
    {
        let result = map_coordinates(&input.view(), &[coordinates.view()], order, "nearest", 0.0).unwrap();
        assert_eq!(result, input, "order {order}");
    }
}

#[test]
fn scalar_input_without_coordinates()
{
    let input = ndarray::arr0(5.0).into_dyn();
    let coordinates: [ArrayViewD<'_, f64>; 0] = [];
    let result = map_coordinates(&input.view(), &coordinates, 1, "constant", 0.0).unwrap();
    assert_eq!(result.shape(), &[] as &[usize]);
    assert_eq!(result[IxDyn(&[])], 5.0);
}

#[test]
fn non_contiguous_input()
{
    let input = ndarray::Array::from_shape_fn((3, 4), |(i, j)| (10 * i + j) as f64);
    let transposed = input.t().into_dyn();
    let rows = ndarray::array![3.0, 0.5].into_dyn();
    let cols = ndarray::array![2.0, 1.0].into_dyn();
    let result = map_coordinates(&transposed, &[rows.view(), cols.view()], 1, "nearest", 0.0).unwrap();
    assert_eq!(result, ndarray::array![23.0, 10.5].into_dyn());
}

#[test]
fn configuration_errors()
{
    let input = ndarray::array![[1.0, 2.0], [3.0, 4.0]].into_dyn();
    let c = ndarray::array![0.0].into_dyn();
    assert_eq!(
        map_coordinates(&input.view(), &[c.view()], 1, "constant", 0.0),
        Err(MapError::CoordinateCountMismatch { expected: 2, actual: 1 })
    );
    assert_eq!(
        map_coordinates(&input.view(), &[c.view(), c.view()], 1, "grid-constant", 0.0),
        Err(MapError::UnsupportedMode("grid-constant".to_string()))
    );
    assert_eq!(
        map_coordinates(&input.view(), &[c.view(), c.view()], 3, "constant", 0.0),
        Err(MapError::UnsupportedOrder(3))
    );
    let pair = ndarray::array![0.0, 1.0].into_dyn();
    let triple = ndarray::array![0.0, 1.0, 0.5].into_dyn();
    assert!(matches!(
        map_coordinates(&input.view(), &[pair.view(), triple.view()], 1, "constant", 0.0),
        Err(MapError::IncompatibleShapes { axis: 1, .. })
    ));
    let bytes = ndarray::array![1_u8, 2].into_dyn();
    assert_eq!(
        map_coordinates(&bytes.view(), &[c.view()], 0, "constant", -1.0),
        Err(MapError::InvalidFillValue(-1.0))
    );
    // the fill value is never read outside constant mode
    assert_eq!(map_coordinates(&bytes.view(), &[c.view()], 0, "nearest", -1.0), Ok(ndarray::array![1_u8].into_dyn()));
    assert_eq!(map_coordinates(&bytes.view(), &[c.view()], 1, "wrap", f64::NAN), Ok(ndarray::array![1_u8].into_dyn()));
    let empty = ndarray::Array2::<f64>::zeros((2, 0)).into_dyn();
    assert_eq!(
        map_coordinates(&empty.view(), &[c.view(), c.view()], 0, "nearest", 0.0),
        Err(MapError::EmptyAxis { axis: 1 })
    );
}

#[test]
fn configuration_from_json()
{
    let config: MapCoordinates = serde_json::from_str(r#"{"order": "nearest", "mode": "reflect"}"#).unwrap();
    assert_eq!(config, MapCoordinates::default().with_order(InterpolationOrder::Nearest).with_mode(BoundaryMode::Reflect));
    assert!(serde_json::from_str::<MapCoordinates>(r#"{"mode": "grid-wrap"}"#).is_err());
    let json = serde_json::to_string(&MapCoordinates::new(InterpolationOrder::Linear, BoundaryMode::Wrap, 1.5)).unwrap();
    assert_eq!(json, r#"{"order":"linear","mode":"wrap","cval":1.5}"#);
}
