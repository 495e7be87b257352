use ndarray::{ArrayViewD, IxDyn};

use crate::errors::{MapError, Result};

///
/// Broadcast shape of a set of arrays, numpy rules: shapes are right aligned and each
/// dimension must either agree or be 1.
///
pub fn broadcast_shape(shapes: &[&[usize]]) -> Result<Vec<usize>>
{
    let ndim = shapes.iter().map(|s| s.len()).max().unwrap_or(0);
    let mut result = vec![1; ndim];
    for (axis, shape) in shapes.iter().enumerate()
    {
        let offset = ndim - shape.len();
        for (d, &size) in shape.iter().enumerate()
        {
            let target = result[offset + d];
            if size == 1 || size == target
            {
                continue;
            }
            if target != 1
            {
                return Err(MapError::IncompatibleShapes { axis, shape: shape.to_vec(), broadcast: result });
            }
            result[offset + d] = size;
        }
    }
    Ok(result)
}

///
/// Broadcast `view` to `shape` and copy it out in row-major order.
///
pub fn flatten_broadcast<T: Copy>(view: &ArrayViewD<'_, T>, shape: &[usize], axis: usize) -> Result<Vec<T>>
{
    let broadcast = view.broadcast(IxDyn(shape)).ok_or_else(|| MapError::IncompatibleShapes
    {
        axis,
        shape: view.shape().to_vec(),
        broadcast: shape.to_vec(),
    })?;
    Ok(broadcast.iter().copied().collect())
}

#[test]
fn broadcast_shapes_follow_numpy_rules()
{
    assert_eq!(broadcast_shape(&[&[3], &[3]]).unwrap(), vec![3]);
    assert_eq!(broadcast_shape(&[&[4, 1], &[3]]).unwrap(), vec![4, 3]);
    assert_eq!(broadcast_shape(&[&[1, 5], &[2, 1], &[]]).unwrap(), vec![2, 5]);
    assert_eq!(broadcast_shape(&[&[0], &[1]]).unwrap(), vec![0]);
    assert_eq!(broadcast_shape(&[]).unwrap(), Vec::<usize>::new());
    assert_eq!(
        broadcast_shape(&[&[2, 3], &[4]]),
        Err(MapError::IncompatibleShapes { axis: 1, shape: vec![4], broadcast: vec![2, 3] })
    );
}

#[test]
fn flatten_repeats_broadcast_axes()
{
    let column = ndarray::array![[1.0], [2.0]].into_dyn();
    let flat = flatten_broadcast(&column.view(), &[2, 3], 0).unwrap();
    assert_eq!(flat, vec![1.0, 1.0, 1.0, 2.0, 2.0, 2.0]);
    assert!(flatten_broadcast(&column.view(), &[3, 3], 0).is_err());
}
