use log::trace;
use num_traits::{Float, NumCast};
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, IntoParallelRefMutIterator, ParallelIterator};

use crate::boundary::BoundaryMode;
use crate::iterators::node_combination_iterator::NodeCombinationIterator;
use crate::one_dimensional_nodes::{AxisNodes, NodeWeight};
use crate::utilities::element::Element;

/// An interpolation node after boundary handling.
struct FixedNode<'a, W>
{
    /// Fixed index of every element, pre-multiplied by the axis stride.
    offsets: Vec<usize>,
    /// Per-element validity of the unfixed index. `None` when every index is valid.
    valid: Option<Vec<bool>>,
    weight: &'a NodeWeight<W>,
}

impl<W> FixedNode<'_, W>
{
    #[inline]
    fn is_valid(&self, element: usize) -> bool
    {
        self.valid.as_ref().map_or(true, |valid| valid[element])
    }
}

fn fix_axis<W>(axis: &AxisNodes<W>, size: usize, stride: usize, mode: BoundaryMode) -> Vec<FixedNode<'_, W>>
{
    let last = size as i64 - 1;
    axis.nodes.iter().map(|node|
    {
        // Constant mode leaves indices unfixed; clamping keeps the gather in bounds and the
        // mask discards those samples afterwards.
        let offsets = mode.fix_indices(&node.indices, size).into_iter().map(|index| index.clamp(0, last) as usize * stride).collect();
        let valid = if mode.always_valid()
        {
            None
        }
        else
        {
            Some(node.indices.iter().map(|&index| mode.is_valid(index, size)).collect())
        };
        FixedNode { offsets, valid, weight: &node.weight }
    }).collect()
}

/// Row-major strides of `shape`, in elements.
pub(crate) fn row_major_strides(shape: &[usize]) -> Vec<usize>
{
    let mut strides = vec![1; shape.len()];
    for d in (0..shape.len().saturating_sub(1)).rev()
    {
        strides[d] = strides[d + 1] * shape[d + 1];
    }
    strides
}

///
/// Round integer results half away from zero, then cast to the element type.
///
#[inline]
pub(crate) fn cast_result<T: Element, A: Float>(value: A) -> T
{
    if T::IS_INTEGER
    {
        T::from_accumulated(value.round())
    }
    else
    {
        T::from_accumulated(value)
    }
}

///
/// Sum the weighted contributions of every cross-axis node combination.
///
/// `input` is the row-major data of an array of shape `shape` with no zero-length axis,
/// `axes` holds one node set per input axis, each covering `num_elements` output elements.
/// Weights of type `W` are multiplied per combination and accumulated in `A`. Combinations
/// in which every axis is valid by construction gather directly; otherwise the gathered
/// sample is replaced by `cval` wherever any axis index is out of range. `cval` is only
/// read in [`BoundaryMode::Constant`].
///
pub(crate) fn combine<T, W, A>(input: &[T], shape: &[usize], axes: &[AxisNodes<W>], mode: BoundaryMode, cval: Option<T>, num_elements: usize) -> Vec<T>
where
    T: Element,
    W: Float + Send + Sync,
    A: Float + Send + Sync,
{
    debug_assert_eq!(shape.len(), axes.len());
    debug_assert_eq!(input.len(), shape.iter().product::<usize>());
    debug_assert!(shape.iter().all(|&size| size > 0));
    let strides = row_major_strides(shape);
    let fixed: Vec<Vec<FixedNode<W>>> = axes.iter().zip(shape.iter().zip(strides.iter()))
        .map(|(axis, (&size, &stride))| fix_axis(axis, size, stride, mode))
        .collect();
    let nodes_per_axis: Vec<usize> = fixed.iter().map(|nodes| nodes.len()).collect();

    let mut accumulated = vec![A::zero(); num_elements];
    for combination in NodeCombinationIterator::new(&nodes_per_axis)
    {
        let nodes: Vec<&FixedNode<W>> = combination.iter().enumerate().map(|(d, &k)| &fixed[d][k]).collect();
        let fast_path = nodes.iter().all(|node| node.valid.is_none());
        trace!("combination {combination:?}, fast path {fast_path}");
        accumulated.par_iter_mut().enumerate().for_each(|(i, sum)|
        {
            let offset: usize = nodes.iter().map(|node| node.offsets[i]).sum();
            let weight = nodes.iter().fold(W::one(), |w, node| w * node.weight.at(i));
            let gathered = input[offset];
            let contribution = match cval
            {
                Some(fill) if !fast_path && !nodes.iter().all(|node| node.is_valid(i)) => fill,
                _ => gathered,
            };
            let weight = <A as NumCast>::from(weight).unwrap_or_else(A::nan);
            *sum = *sum + weight * contribution.to_accumulator::<A>();
        });
    }
    accumulated.into_par_iter().map(cast_result::<T, A>).collect()
}

#[cfg(test)]
fn nodes_1d(coordinates: &[f64], order: crate::one_dimensional_nodes::InterpolationOrder) -> Vec<AxisNodes<f64>>
{
    vec![crate::one_dimensional_nodes::axis_nodes(coordinates, order)]
}

#[test]
fn strides_are_row_major()
{
    assert_eq!(row_major_strides(&[2, 3, 4]), vec![12, 4, 1]);
    assert_eq!(row_major_strides(&[5]), vec![1]);
    assert!(row_major_strides(&[]).is_empty());
}

#[test]
fn integer_results_round_half_away_from_zero()
{
    assert_eq!(cast_result::<i32, f64>(2.5), 3);
    assert_eq!(cast_result::<i32, f64>(-2.5), -3);
    assert_eq!(cast_result::<i32, f64>(2.4999), 2);
    assert_eq!(cast_result::<u8, f32>(0.5), 1);
    assert_eq!(cast_result::<i64, f64>(-0.5), libm::round(-0.5) as i64);
    assert_eq!(cast_result::<f64, f64>(2.5), 2.5);
}

#[test]
fn linear_blend_in_one_dimension()
{
    use crate::one_dimensional_nodes::InterpolationOrder;
    let input = [1.0, 2.0, 3.0, 4.0];
    let axes = nodes_1d(&[0.5, 2.25, 3.0], InterpolationOrder::Linear);
    let result = combine::<f64, f64, f64>(&input, &[4], &axes, BoundaryMode::Nearest, None, 3);
    assert_eq!(result, vec![1.5, 3.25, 4.0]);
}

#[test]
fn constant_mode_masks_invalid_samples()
{
    use crate::one_dimensional_nodes::InterpolationOrder;
    let input = [1.0, 2.0, 3.0, 4.0];
    let nearest = nodes_1d(&[-1.0, 4.0, 0.0], InterpolationOrder::Nearest);
    assert_eq!(combine::<f64, f64, f64>(&input, &[4], &nearest, BoundaryMode::Constant, Some(-9.0), 3), vec![-9.0, -9.0, 1.0]);

    let linear = nodes_1d(&[-0.5, 3.5], InterpolationOrder::Linear);
    assert_eq!(combine::<f64, f64, f64>(&input, &[4], &linear, BoundaryMode::Constant, Some(10.0), 2), vec![5.5, 7.0]);
}

#[test]
fn bilinear_blend_of_four_samples()
{
    use crate::one_dimensional_nodes::{axis_nodes, InterpolationOrder};
    // 3x3 input, row-major
    let input = [0.0, 1.0, 2.0, 10.0, 11.0, 12.0, 20.0, 21.0, 22.0];
    let axes = vec![axis_nodes(&[0.5_f64], InterpolationOrder::Linear), axis_nodes(&[1.5_f64], InterpolationOrder::Linear)];
    let result = combine::<f64, f64, f64>(&input, &[3, 3], &axes, BoundaryMode::Reflect, None, 1);
    assert_eq!(result, vec![6.5]);
}

#[test]
fn single_precision_weights_accumulate_in_double()
{
    use crate::one_dimensional_nodes::{axis_nodes, InterpolationOrder};
    // 2^24 + 1 has no f32 representation
    let input = [16_777_217.0_f64, 0.1];
    let axes = vec![axis_nodes(&[0.0_f32, 1.0], InterpolationOrder::Linear)];
    assert_eq!(combine::<f64, f32, f64>(&input, &[2], &axes, BoundaryMode::Nearest, None, 2), input.to_vec());
    assert_eq!(combine::<f64, f32, f32>(&input, &[2], &axes, BoundaryMode::Nearest, None, 2)[0], 16_777_216.0);
}
