use crate::error::*;
use crate::grid::*;
use crate::util::*;
use rand::prelude::*;
use rayon::prelude::*;

pub fn homogeneous_velocity(
    nz: usize,
    nx: usize,
    velocity: f64,
    chunk_size: usize,
) -> Grid2 {
    Grid::from_fn(vector![nz, nx], |_| velocity, chunk_size)
}

/// Horizontal layer reaching down from row `top` to the next layer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Layer {
    pub top: usize,
    pub velocity: f64,
}

/// Flat layers, the first has to start at the surface.
pub fn layered_velocity(
    nz: usize,
    nx: usize,
    layers: &[Layer],
    chunk_size: usize,
) -> FdResult<Grid2> {
    match layers.first() {
        Some(first) if first.top == 0 => {}
        _ => {
            return Err(FdError::InvalidArgument(
                "the first layer must start at row 0".to_string(),
            ))
        }
    }
    if layers.windows(2).any(|w| w[1].top <= w[0].top) {
        return Err(FdError::InvalidArgument(
            "layer tops must increase with depth".to_string(),
        ));
    }
    let velocity_at = |row: usize| {
        layers
            .iter()
            .rev()
            .find(|l| l.top <= row)
            .map(|l| l.velocity)
            .unwrap_or(layers[0].velocity)
    };
    Ok(Grid::from_fn(
        vector![nz, nx],
        |c: Coord<2>| velocity_at(c[0]),
        chunk_size,
    ))
}

/// Scale every value by a uniform factor in `[1 - amplitude, 1 + amplitude]`.
/// The same seed and chunk size give the same model.
pub fn perturb(
    model: &mut Grid2,
    amplitude: f64,
    seed: u64,
    chunk_size: usize,
) {
    model
        .buffer_mut()
        .par_chunks_mut(chunk_size.max(1))
        .enumerate()
        .for_each(|(i, chunk)| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
            for v in chunk {
                let factor = 1.0 + amplitude * rng.gen_range(-1.0..=1.0);
                *v *= factor;
            }
        });
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn layers() {
        let layers = [
            Layer {
                top: 0,
                velocity: 1500.0,
            },
            Layer {
                top: 3,
                velocity: 2000.0,
            },
            Layer {
                top: 5,
                velocity: 3000.0,
            },
        ];
        let v = layered_velocity(7, 2, &layers, 3).unwrap();
        let column: Vec<f64> = v.column(1).to_vec();
        assert_eq!(
            column,
            vec![1500.0, 1500.0, 1500.0, 2000.0, 2000.0, 3000.0, 3000.0]
        );
    }

    #[test]
    fn bad_layers() {
        let l = |top, velocity| Layer { top, velocity };
        assert!(layered_velocity(5, 5, &[], 4).is_err());
        assert!(layered_velocity(5, 5, &[l(1, 1.0)], 4).is_err());
        assert!(layered_velocity(5, 5, &[l(0, 1.0), l(0, 2.0)], 4).is_err());
    }

    #[test]
    fn perturbation_is_bounded_and_repeatable() {
        let mut a = homogeneous_velocity(20, 30, 2000.0, 64);
        let mut b = a.clone();
        perturb(&mut a, 0.05, 7, 64);
        perturb(&mut b, 0.05, 7, 64);
        assert_eq!(a, b);
        assert!(a.buffer().iter().all(|v| (1900.0..=2100.0).contains(v)));
        assert!(a.buffer().iter().any(|v| *v != 2000.0));
    }
}
