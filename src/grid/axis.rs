use crate::util::*;

/// How one axis of a grid sits in the linear buffer.
///
/// The buffer is viewed as `outer` blocks of `extent` positions, each
/// position holding `inner` contiguous values. Differencing along the
/// axis walks positions while the `inner` run and the `outer` blocks
/// stay fixed, which covers every axis of 2-d and 3-d grids alike.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AxisStride {
    pub inner: usize,
    pub extent: usize,
    pub outer: usize,
}

impl AxisStride {
    pub fn of<const GRID_DIMENSION: usize>(
        dims: &Dims<GRID_DIMENSION>,
        axis: usize,
    ) -> Self {
        debug_assert!(axis < GRID_DIMENSION);
        let inner = axis_stride(dims, axis);
        let extent = dims[axis];
        let outer = real_buffer_size(dims) / (inner * extent).max(1);
        AxisStride {
            inner,
            extent,
            outer,
        }
    }

    #[inline]
    pub fn index(&self, outer: usize, position: usize, inner: usize) -> usize {
        (outer * self.extent + position) * self.inner + inner
    }

    #[inline]
    pub fn block_len(&self) -> usize {
        self.extent * self.inner
    }
}
