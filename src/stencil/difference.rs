use crate::error::*;
use crate::grid::*;
use rayon::prelude::*;

/// Check that `coeff` can be applied along `axis` of `data`
/// and return the extent of the result along that axis.
pub fn difference_extent<const GRID_DIMENSION: usize>(
    data: &Grid<GRID_DIMENSION>,
    coeff: &[f64],
    dist: f64,
    axis: usize,
) -> FdResult<usize> {
    let stride = data.axis(axis)?;
    let order = coeff.len();
    if order == 0 {
        return Err(FdError::InvalidArgument(
            "difference needs at least one coefficient".to_string(),
        ));
    }
    if !(dist.is_finite() && dist > 0.0) {
        return Err(FdError::InvalidArgument(format!(
            "grid spacing must be positive, got {dist}"
        )));
    }
    let width = 2 * order - 1;
    if width >= stride.extent {
        return Err(FdError::InvalidArgument(format!(
            "order {order} needs more than {width} points along axis {axis}, \
             extent is {}",
            stride.extent
        )));
    }
    Ok(stride.extent - width)
}

/// Centred difference of `data` along `axis`.
///
/// `result[p] = Σ_k coeff[k] * (data[p + N + k] - data[p + N - 1 - k]) / dist`
/// with `N = coeff.len()`, so the result has `2N - 1` fewer points along
/// `axis` and sample `p` sits halfway between input samples
/// `p + N - 1` and `p + N`. Other axes are unchanged.
pub fn difference<const GRID_DIMENSION: usize>(
    data: &Grid<GRID_DIMENSION>,
    coeff: &[f64],
    dist: f64,
    axis: usize,
) -> FdResult<Grid<GRID_DIMENSION>> {
    profiling::scope!("stencil::difference");
    let out_extent = difference_extent(data, coeff, dist, axis)?;
    let input = data.axis(axis)?;
    let order = coeff.len();

    let mut out_dims = *data.dims();
    out_dims[axis] = out_extent;
    let mut result = Grid::zeros(out_dims);
    if result.is_empty() {
        return Ok(result);
    }

    // Each output row is the `inner` run at one (outer, position) pair.
    let src = data.buffer();
    let min_rows = (1024 / input.inner).max(1);
    result
        .buffer_mut()
        .par_chunks_mut(input.inner)
        .enumerate()
        .with_min_len(min_rows)
        .for_each(|(row, out_row): (usize, &mut [f64])| {
            let outer = row / out_extent;
            let p = row % out_extent;
            for (k, c) in coeff.iter().enumerate() {
                let hi = input.index(outer, p + order + k, 0);
                let lo = input.index(outer, p + order - 1 - k, 0);
                let hi_row = &src[hi..hi + input.inner];
                let lo_row = &src[lo..lo + input.inner];
                for ((o, h), l) in
                    out_row.iter_mut().zip(hi_row.iter()).zip(lo_row.iter())
                {
                    *o += c * (h - l) / dist;
                }
            }
        });
    Ok(result)
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::stencil::*;
    use crate::util::*;
    use float_cmp::assert_approx_eq;

    // p(s) = Σ a_i s^i and its derivative
    fn poly(a: &[f64], s: f64) -> f64 {
        a.iter().rev().fold(0.0, |acc, c| acc * s + c)
    }

    fn dpoly(a: &[f64], s: f64) -> f64 {
        a.iter()
            .enumerate()
            .skip(1)
            .rev()
            .fold(0.0, |acc, (i, c)| acc * s + i as f64 * c)
    }

    #[test]
    fn polynomial_exact_axis0() {
        let h = 0.1;
        for order in 1..=4 {
            let coeff = StencilCoefficients::solve(order, GridType::Staggered)
                .unwrap();
            // degree 2N - 1
            let a: Vec<f64> = (0..2 * order).map(|i| 0.5 + i as f64).collect();
            let nz = 20;
            let nx = 3;
            let data = Grid::from_fn(
                vector![nz, nx],
                |c: Coord<2>| (c[1] + 1) as f64 * poly(&a, c[0] as f64 * h),
                16,
            );
            let d = difference(&data, coeff.weights(), h, 0).unwrap();
            assert_eq!(*d.dims(), vector![nz - (2 * order - 1), nx]);
            for j in 0..nx {
                for p in 0..d.extent(0) {
                    let s = (p as f64 + order as f64 - 0.5) * h;
                    let expected = (j + 1) as f64 * dpoly(&a, s);
                    assert_approx_eq!(
                        f64,
                        d.get(&vector![p, j]),
                        expected,
                        epsilon = 1e-8 * expected.abs().max(1.0)
                    );
                }
            }
        }
    }

    #[test]
    fn polynomial_exact_axis1() {
        let h = 0.25;
        let order = 3;
        let coeff =
            StencilCoefficients::solve(order, GridType::Staggered).unwrap();
        let a = [1.0, -2.0, 0.5, 0.25, -0.125, 0.0625];
        let data = Grid::from_fn(
            vector![4, 15],
            |c: Coord<2>| c[0] as f64 + poly(&a, c[1] as f64 * h),
            3,
        );
        let d = difference(&data, coeff.weights(), h, 1).unwrap();
        assert_eq!(*d.dims(), vector![4, 10]);
        for i in 0..4 {
            for p in 0..10 {
                let s = (p as f64 + 2.5) * h;
                assert_approx_eq!(
                    f64,
                    d.get(&vector![i, p]),
                    dpoly(&a, s),
                    epsilon = 1e-9
                );
            }
        }
    }

    #[test]
    fn third_axis_of_volume() {
        let h = 0.5;
        let coeff = StencilCoefficients::solve(2, GridType::Staggered).unwrap();
        let data = Grid::from_fn(
            vector![3, 2, 9],
            |c: Coord<3>| {
                let t = c[2] as f64 * h;
                c[0] as f64 * 10.0 + c[1] as f64 + t * t * t
            },
            5,
        );
        let d = difference(&data, coeff.weights(), h, 2).unwrap();
        assert_eq!(*d.dims(), vector![3, 2, 6]);
        for p in 0..6 {
            let s = (p as f64 + 1.5) * h;
            assert_approx_eq!(
                f64,
                d.get(&vector![2, 1, p]),
                3.0 * s * s,
                epsilon = 1e-10
            );
        }
    }

    #[test]
    fn insufficient_extent() {
        let coeff = [1.0, 0.0, 0.0];
        let data = Grid::zeros(vector![5, 8]);
        assert!(difference(&data, &coeff, 1.0, 1).is_ok());
        let e = difference(&data, &coeff, 1.0, 0).unwrap_err();
        assert!(matches!(e, FdError::InvalidArgument(_)));
        assert!(difference(&Grid::zeros(vector![6, 6]), &coeff, 1.0, 0).is_ok());
    }

    #[test]
    fn bad_arguments() {
        let data = Grid::zeros(vector![10, 10]);
        assert!(difference(&data, &[], 1.0, 0).is_err());
        assert!(difference(&data, &[1.0], 0.0, 0).is_err());
        assert!(difference(&data, &[1.0], -1.0, 1).is_err());
        assert!(difference(&data, &[1.0], f64::NAN, 1).is_err());
        assert!(difference(&data, &[1.0], 1.0, 2).is_err());
    }
}
