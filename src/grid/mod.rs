//! Dense `f64` grids with shape metadata.
//! Velocity models are `z × x` grids, source and snapshot volumes are
//! `z × x × t` grids. The first axis varies fastest, so every depth
//! column of a `z × x` grid is one contiguous run of the buffer.

mod axis;
mod chunk;
mod subset_ops;

pub use axis::*;
pub use chunk::*;

use crate::error::*;
use crate::util::*;
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Grid<const GRID_DIMENSION: usize> {
    dims: Dims<GRID_DIMENSION>,
    buffer: Vec<f64>,
}

pub type Grid2 = Grid<2>;
pub type Grid3 = Grid<3>;

impl<const GRID_DIMENSION: usize> Grid<GRID_DIMENSION> {
    pub fn zeros(dims: Dims<GRID_DIMENSION>) -> Self {
        Grid {
            dims,
            buffer: vec![0.0; real_buffer_size(&dims)],
        }
    }

    pub fn from_vec(
        dims: Dims<GRID_DIMENSION>,
        buffer: Vec<f64>,
    ) -> FdResult<Self> {
        let expected = real_buffer_size(&dims);
        if buffer.len() != expected {
            return Err(FdError::shape_mismatch(&[expected], &[buffer.len()]));
        }
        Ok(Grid { dims, buffer })
    }

    /// Fill every point from its coordinate.
    pub fn from_fn<F: Fn(Coord<GRID_DIMENSION>) -> f64 + Sync>(
        dims: Dims<GRID_DIMENSION>,
        f: F,
        chunk_size: usize,
    ) -> Self {
        let mut result = Self::zeros(dims);
        result.par_set_values(f, chunk_size);
        result
    }

    pub fn dims(&self) -> &Dims<GRID_DIMENSION> {
        &self.dims
    }

    pub fn extent(&self, axis: usize) -> usize {
        self.dims[axis]
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn buffer(&self) -> &[f64] {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut [f64] {
        &mut self.buffer
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.buffer
    }

    /// Stride metadata for one axis, used by the difference operator.
    pub fn axis(&self, axis: usize) -> FdResult<AxisStride> {
        if axis >= GRID_DIMENSION {
            return Err(FdError::InvalidArgument(format!(
                "axis {axis} out of range for {GRID_DIMENSION}-d grid"
            )));
        }
        Ok(AxisStride::of(&self.dims, axis))
    }

    pub fn check_same_shape(&self, other: &Self) -> FdResult<()> {
        if self.dims != other.dims {
            return Err(FdError::shape_mismatch(
                self.dims.as_slice(),
                other.dims.as_slice(),
            ));
        }
        Ok(())
    }

    #[track_caller]
    pub fn get(&self, coord: &Coord<GRID_DIMENSION>) -> f64 {
        debug_assert!(
            self.contains(coord),
            "{:?} does not contain {:?}",
            self.dims,
            coord
        );
        self.buffer[coord_to_linear(coord, &self.dims)]
    }

    #[track_caller]
    pub fn set(&mut self, coord: &Coord<GRID_DIMENSION>, value: f64) {
        debug_assert!(
            self.contains(coord),
            "{:?} does not contain {:?}",
            self.dims,
            coord
        );
        let index = coord_to_linear(coord, &self.dims);
        self.buffer[index] = value;
    }

    pub fn contains(&self, coord: &Coord<GRID_DIMENSION>) -> bool {
        (0..GRID_DIMENSION).all(|d| coord[d] < self.dims[d])
    }

    pub fn max_abs(&self) -> f64 {
        self.buffer.iter().fold(0.0, |m, v| m.max(v.abs()))
    }

    pub fn par_modify_access(
        &mut self,
        chunk_size: usize,
    ) -> impl IndexedParallelIterator<Item = GridChunk<'_, GRID_DIMENSION>> {
        let dims = &self.dims;
        self.buffer.par_chunks_mut(chunk_size.max(1)).enumerate().map(
            move |(i, buffer_chunk): (usize, &mut [f64])| {
                GridChunk::new(i * chunk_size.max(1), dims, buffer_chunk)
            },
        )
    }

    pub fn par_set_values<F: Fn(Coord<GRID_DIMENSION>) -> f64 + Sync>(
        &mut self,
        f: F,
        chunk_size: usize,
    ) {
        self.par_modify_access(chunk_size).for_each(
            |mut d: GridChunk<'_, GRID_DIMENSION>| {
                d.coord_iter_mut().for_each(|(coord, value_mut)| {
                    *value_mut = f(coord);
                })
            },
        );
    }
}

impl Grid<2> {
    /// Contiguous depth column `j`.
    pub fn column(&self, j: usize) -> &[f64] {
        let nz = self.dims[0];
        &self.buffer[j * nz..(j + 1) * nz]
    }

    pub fn column_mut(&mut self, j: usize) -> &mut [f64] {
        let nz = self.dims[0];
        &mut self.buffer[j * nz..(j + 1) * nz]
    }

    /// Contiguous run holding `count` columns starting at `start`.
    pub fn columns(&self, start: usize, count: usize) -> &[f64] {
        let nz = self.dims[0];
        &self.buffer[start * nz..(start + count) * nz]
    }

    pub fn columns_mut(&mut self, start: usize, count: usize) -> &mut [f64] {
        let nz = self.dims[0];
        &mut self.buffer[start * nz..(start + count) * nz]
    }
}

impl Grid<3> {
    /// Contiguous `z × x` plane `k` of a volume.
    pub fn plane(&self, k: usize) -> &[f64] {
        let plane_size = self.dims[0] * self.dims[1];
        &self.buffer[k * plane_size..(k + 1) * plane_size]
    }

    pub fn plane_mut(&mut self, k: usize) -> &mut [f64] {
        let plane_size = self.dims[0] * self.dims[1];
        &mut self.buffer[k * plane_size..(k + 1) * plane_size]
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn from_vec_checks_length() {
        assert!(Grid::from_vec(vector![2, 3], vec![0.0; 6]).is_ok());
        let e = Grid::from_vec(vector![2, 3], vec![0.0; 5]).unwrap_err();
        assert!(matches!(e, FdError::ShapeMismatch { .. }));
    }

    #[test]
    fn from_fn_layout() {
        let g = Grid::from_fn(
            vector![3, 4],
            |c: Coord<2>| (c[0] + 10 * c[1]) as f64,
            5,
        );
        assert_eq!(g.get(&vector![2, 3]), 32.0);
        assert_eq!(g.column(1), &[10.0, 11.0, 12.0]);
        assert_eq!(g.columns(2, 2), &[20.0, 21.0, 22.0, 30.0, 31.0, 32.0]);
    }

    #[test]
    fn planes() {
        let mut g = Grid::from_fn(
            vector![2, 2, 3],
            |c: Coord<3>| c[2] as f64,
            1,
        );
        assert_eq!(g.plane(2), &[2.0; 4]);
        g.plane_mut(0).copy_from_slice(&[9.0; 4]);
        assert_eq!(g.get(&vector![1, 1, 0]), 9.0);
    }

    #[test]
    fn axis_out_of_range() {
        let g = Grid::zeros(vector![3, 4]);
        assert!(g.axis(1).is_ok());
        assert!(matches!(g.axis(2), Err(FdError::InvalidArgument(_))));
    }

    #[test]
    fn shape_check() {
        let a = Grid::zeros(vector![3, 4]);
        let b = Grid::zeros(vector![4, 3]);
        assert!(a.check_same_shape(&a.clone()).is_ok());
        assert!(a.check_same_shape(&b).is_err());
    }
}
