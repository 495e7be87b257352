use coordmap::{map_coordinates, rotate, zoom, BoundaryMode, InterpolationOrder, MapCoordinates, MapError};
use ndarray::{array, Array};

fn one_d() -> Result<(), MapError>
{
    println!("\nRunning \"one_d\" example\n");
    let input = array![1.0, 2.0, 3.0, 4.0].into_dyn();
    // fractional and out-of-range positions
    let x = array![-1.5, -0.5, 0.5, 2.25, 3.5, 5.0].into_dyn();
    for mode in BoundaryMode::ALL
    {
        let values = map_coordinates(&input.view(), &[x.view()], 1, mode.name(), -1.0)?;
        println!("{mode:>8}: {values}");
    }
    Ok(())
}

///
/// Bilinear sampling of a 2D field along a diagonal line, compared to the exact values.
///
fn two_d() -> Result<(), MapError>
{
    println!("\nRunning \"two_d\" example\n");
    let f = |x: f64, y: f64| x*x + y*y;
    let input = Array::from_shape_fn((33, 33), |(i, j)| f(i as f64 / 32.0, j as f64 / 32.0)).into_dyn();

    let t = Array::linspace(0.0, 32.0, 7).into_dyn();
    let config = MapCoordinates::default().with_mode(BoundaryMode::Nearest);
    let values = config.apply(&input.view(), &[t.view(), t.view()])?;
    for (ti, vi) in t.iter().zip(values.iter())
    {
        let x = ti / 32.0;
        println!("x=y={x:.4}, calculated {vi:.6}, expected {:.6}. Error={:.2e}", f(x, x), (vi - f(x, x)).abs());
    }
    Ok(())
}

fn transforms() -> Result<(), MapError>
{
    println!("\nRunning \"transforms\" example\n");
    let image = Array::from_shape_fn((4, 5), |(i, j)| (10 * i + j) as u8).into_dyn();
    let nearest = MapCoordinates::default().with_order(InterpolationOrder::Nearest);
    println!("input\n{image}");
    println!("rotated by 90 degrees\n{}", rotate(&image.view(), 90.0, (0, 1), true, &nearest)?);
    println!("zoomed by 1.5\n{}", zoom(&image.view(), &[1.5, 1.5], &MapCoordinates::default())?);
    Ok(())
}

fn main()
{
    one_d().unwrap();
    two_d().unwrap();
    transforms().unwrap();
}
