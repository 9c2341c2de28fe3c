use crate::error::*;
use nalgebra::{DMatrix, DVector};
use num::{BigInt, BigRational, One, ToPrimitive, Zero};
use std::fmt;
use std::str::FromStr;

/// Where derivative samples sit relative to the field samples.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GridType {
    /// Derivative at the field samples, neighbours at integer offsets.
    Regular,
    /// Derivative halfway between field samples.
    Staggered,
}

impl FromStr for GridType {
    type Err = FdError;

    fn from_str(s: &str) -> FdResult<Self> {
        match s {
            "r" | "regular" => Ok(GridType::Regular),
            "s" | "staggered" => Ok(GridType::Staggered),
            _ => Err(FdError::InvalidArgument(format!(
                "unknown grid type '{s}', expected 'staggered' or 'regular'"
            ))),
        }
    }
}

impl fmt::Display for GridType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridType::Regular => write!(f, "regular"),
            GridType::Staggered => write!(f, "staggered"),
        }
    }
}

impl GridType {
    /// Distance of the `j`th neighbour pair, in half or whole grid steps.
    fn lever(&self, j: usize) -> usize {
        match self {
            GridType::Regular => j + 1,
            GridType::Staggered => 2 * j + 1,
        }
    }

    fn first_moment(&self) -> BigRational {
        match self {
            GridType::Regular => {
                BigRational::new(BigInt::one(), BigInt::from(2))
            }
            GridType::Staggered => BigRational::one(),
        }
    }

    /// The `order × order` consistency system `A·c = b` in exact arithmetic.
    pub fn exact_system(
        &self,
        order: usize,
    ) -> (Vec<Vec<BigRational>>, Vec<BigRational>) {
        let a = (0..order)
            .map(|i| {
                (0..order)
                    .map(|j| {
                        BigRational::from_integer(
                            BigInt::from(self.lever(j)).pow(2 * i as u32 + 1),
                        )
                    })
                    .collect()
            })
            .collect();
        let mut b = vec![BigRational::zero(); order];
        if order > 0 {
            b[0] = self.first_moment();
        }
        (a, b)
    }

    /// The consistency system rounded to `f64`.
    pub fn system(&self, order: usize) -> (DMatrix<f64>, DVector<f64>) {
        let (exact_a, exact_b) = self.exact_system(order);
        let to_f64 = |v: &BigRational| v.to_f64().unwrap_or(f64::INFINITY);
        let a = DMatrix::from_fn(order, order, |i, j| to_f64(&exact_a[i][j]));
        let b = DVector::from_iterator(order, exact_b.iter().map(to_f64));
        (a, b)
    }
}

/// Gauss-Jordan elimination over the rationals, `None` when singular.
fn solve_exact(
    mut a: Vec<Vec<BigRational>>,
    mut b: Vec<BigRational>,
) -> Option<Vec<BigRational>> {
    let n = b.len();
    for k in 0..n {
        let pivot = (k..n).find(|i| !a[*i][k].is_zero())?;
        a.swap(k, pivot);
        b.swap(k, pivot);
        for i in (k + 1)..n {
            if a[i][k].is_zero() {
                continue;
            }
            let factor = &a[i][k] / &a[k][k];
            for j in k..n {
                let delta = &factor * &a[k][j];
                a[i][j] -= delta;
            }
            let delta = &factor * &b[k];
            b[i] -= delta;
        }
    }
    let mut c = vec![BigRational::zero(); n];
    for i in (0..n).rev() {
        let mut sum = b[i].clone();
        for j in (i + 1)..n {
            sum -= &a[i][j] * &c[j];
        }
        c[i] = sum / &a[i][i];
    }
    Some(c)
}

/// Finite-difference weights, shared read-only by every worker.
#[derive(Debug, Clone, PartialEq)]
pub struct StencilCoefficients {
    grid_type: GridType,
    weights: Vec<f64>,
}

impl StencilCoefficients {
    /// Solve the consistency system for `order` weights.
    pub fn solve(order: usize, grid_type: GridType) -> FdResult<Self> {
        if order == 0 {
            return Err(FdError::InvalidArgument(
                "stencil order must be at least 1".to_string(),
            ));
        }
        let (a_exact, b_exact) = grid_type.exact_system(order);
        // Rounded once from the exact solution, the high order rows
        // reach 11^11 at order 6 and a floating point solve loses digits.
        let exact = solve_exact(a_exact, b_exact).ok_or_else(|| {
            FdError::InvalidArgument(format!(
                "{grid_type} system of order {order} is singular"
            ))
        })?;
        let weights = exact
            .iter()
            .map(|w| {
                w.to_f64().filter(|w| w.is_finite()).ok_or_else(|| {
                    FdError::InvalidArgument(format!(
                        "{grid_type} weight {w} of order {order} overflows f64"
                    ))
                })
            })
            .collect::<FdResult<Vec<f64>>>()?;

        log::debug!("{grid_type} stencil of order {order}: {weights:?}");
        Ok(StencilCoefficients { grid_type, weights })
    }

    /// Parse the grid type from its short or long name, then solve.
    pub fn from_type_name(order: usize, type_name: &str) -> FdResult<Self> {
        Self::solve(order, type_name.parse()?)
    }

    pub fn order(&self) -> usize {
        self.weights.len()
    }

    pub fn grid_type(&self) -> GridType {
        self.grid_type
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Ghost points needed on each side by two successive differences.
    pub fn halo_width(&self) -> usize {
        2 * self.order() - 1
    }

    pub fn abs_sum(&self) -> f64 {
        self.weights.iter().map(|w| w.abs()).sum()
    }

    /// `‖A·c − b‖` for the generating system, evaluated exactly
    /// for the stored weights and rounded once.
    pub fn residual(&self) -> f64 {
        let (a, b) = self.grid_type.exact_system(self.order());
        let weights: Option<Vec<BigRational>> = self
            .weights
            .iter()
            .map(|w| BigRational::from_float(*w))
            .collect();
        let Some(c) = weights else {
            return f64::INFINITY;
        };
        let squares = a
            .iter()
            .zip(&b)
            .map(|(row, b)| {
                let r = row
                    .iter()
                    .zip(&c)
                    .fold(-b.clone(), |acc, (a, c)| acc + a * c);
                &r * &r
            })
            .fold(BigRational::zero(), |acc, r2| acc + r2);
        squares.to_f64().map_or(f64::INFINITY, f64::sqrt)
    }

    /// Largest componentwise relative residual,
    /// `|A·c − b|_i / (|A|·|c| + |b|)_i`.
    pub fn backward_error(&self) -> f64 {
        let (a, b) = self.grid_type.system(self.order());
        let c = DVector::from_column_slice(&self.weights);
        let r = &a * &c - &b;
        let scale = a.abs() * c.abs() + b.abs();
        r.iter()
            .zip(scale.iter())
            .map(|(r, s)| if *s > 0.0 { r.abs() / s } else { r.abs() })
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn parse_grid_type() {
        assert_eq!("s".parse::<GridType>().unwrap(), GridType::Staggered);
        assert_eq!(
            "staggered".parse::<GridType>().unwrap(),
            GridType::Staggered
        );
        assert_eq!("r".parse::<GridType>().unwrap(), GridType::Regular);
        assert_eq!("regular".parse::<GridType>().unwrap(), GridType::Regular);
        let e = "x".parse::<GridType>().unwrap_err();
        assert!(matches!(e, FdError::InvalidArgument(_)));
        assert!(StencilCoefficients::from_type_name(2, "q").is_err());
    }

    #[test]
    fn zero_order_rejected() {
        let e = StencilCoefficients::solve(0, GridType::Staggered).unwrap_err();
        assert!(matches!(e, FdError::InvalidArgument(_)));
    }

    #[test]
    fn residual_within_bound() {
        for grid_type in [GridType::Regular, GridType::Staggered] {
            for order in 1..=6 {
                let c = StencilCoefficients::solve(order, grid_type).unwrap();
                assert_eq!(c.order(), order);
                assert!(
                    c.backward_error() < 1e-10,
                    "{grid_type} {order}: {}",
                    c.backward_error()
                );
                assert!(
                    c.residual() < 1e-10,
                    "{grid_type} {order}: {}",
                    c.residual()
                );
            }
        }
    }

    #[test]
    fn staggered_known_weights() {
        let c = StencilCoefficients::solve(1, GridType::Staggered).unwrap();
        assert_approx_eq!(f64, c.weights()[0], 1.0, ulps = 2);

        let c = StencilCoefficients::from_type_name(2, "s").unwrap();
        assert_approx_eq!(f64, c.weights()[0], 9.0 / 8.0, epsilon = 1e-14);
        assert_approx_eq!(f64, c.weights()[1], -1.0 / 24.0, epsilon = 1e-14);
        assert_eq!(c.halo_width(), 3);

        let c = StencilCoefficients::solve(3, GridType::Staggered).unwrap();
        assert_approx_eq!(f64, c.weights()[0], 75.0 / 64.0, epsilon = 1e-13);
        assert_approx_eq!(f64, c.weights()[1], -25.0 / 384.0, epsilon = 1e-13);
        assert_approx_eq!(f64, c.weights()[2], 3.0 / 640.0, epsilon = 1e-13);
    }

    #[test]
    fn weights_rounded_once() {
        // every weight is the nearest double to the exact rational
        let c = StencilCoefficients::solve(3, GridType::Staggered).unwrap();
        assert_eq!(c.weights(), &[75.0 / 64.0, -25.0 / 384.0, 3.0 / 640.0]);
        let c = StencilCoefficients::solve(3, GridType::Regular).unwrap();
        assert_eq!(c.weights(), &[3.0 / 4.0, -3.0 / 20.0, 1.0 / 60.0]);

        let c = StencilCoefficients::solve(6, GridType::Staggered).unwrap();
        assert!(c.residual() < 1e-10, "{}", c.residual());
        assert_eq!(c.weights()[0], 160083.0 / 131072.0);
    }

    #[test]
    fn residual_is_exact() {
        let c = StencilCoefficients::solve(1, GridType::Staggered).unwrap();
        assert_eq!(c.residual(), 0.0);
        // c = [1, 0] leaves 1 in the second row exactly
        let off = StencilCoefficients {
            grid_type: GridType::Staggered,
            weights: vec![1.0, 0.0],
        };
        assert_eq!(off.residual(), 1.0);
    }

    #[test]
    fn regular_known_weights() {
        let c = StencilCoefficients::from_type_name(2, "regular").unwrap();
        assert_approx_eq!(f64, c.weights()[0], 2.0 / 3.0, epsilon = 1e-14);
        assert_approx_eq!(f64, c.weights()[1], -1.0 / 12.0, epsilon = 1e-14);
        assert_eq!(c.grid_type(), GridType::Regular);
    }
}
