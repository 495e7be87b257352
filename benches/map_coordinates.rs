use coordmap::{BoundaryMode, InterpolationOrder, MapCoordinates, MapError};
use criterion::{criterion_group, criterion_main, Criterion};
use ndarray::{Array, ArrayD, Ix1};

fn build_three_d_volume() -> ArrayD<f64>
{
    Array::from_shape_fn((64, 64, 64), |(i, j, k)|
    {
        let (x, y, z) = (i as f64 / 63.0, j as f64 / 63.0, k as f64 / 63.0);
        x*x*x + y*y*y + z*z*z
    }).into_dyn()
}

fn sample_points(n: usize, offset: f64) -> Vec<ArrayD<f64>>
{
    (0..3).map(|axis| Array::<f64, Ix1>::from_shape_fn(n, |i| ((i * (axis + 7)) % 6700) as f64 * 0.01 + offset).into_dyn()).collect()
}

fn three_d(volume: &ArrayD<f64>, points: &[ArrayD<f64>], config: &MapCoordinates) -> Result<(), MapError>
{
    let views: Vec<_> = points.iter().map(|p| p.view()).collect();
    let _values = config.apply(&volume.view(), &views)?;
    Ok(())
}

fn run_three_d(c: &mut Criterion)
{
    let volume = build_three_d_volume();
    // inside the volume, no axis ever needs masking
    let inside = sample_points(100_000, 0.0);
    // straddles the edges so constant mode masks
    let straddling = sample_points(100_000, -1.5);

    let linear_nearest = MapCoordinates::new(InterpolationOrder::Linear, BoundaryMode::Nearest, 0.0);
    let linear_constant = MapCoordinates::new(InterpolationOrder::Linear, BoundaryMode::Constant, 0.0);
    let nearest_reflect = MapCoordinates::new(InterpolationOrder::Nearest, BoundaryMode::Reflect, 0.0);

    c.bench_function("3d linear nearest", |b| b.iter(|| three_d(&volume, &inside, &linear_nearest).unwrap()));
    c.bench_function("3d linear constant", |b| b.iter(|| three_d(&volume, &straddling, &linear_constant).unwrap()));
    c.bench_function("3d order 0 reflect", |b| b.iter(|| three_d(&volume, &straddling, &nearest_reflect).unwrap()));
}

criterion_group!(benches, run_three_d);
criterion_main!(benches);
