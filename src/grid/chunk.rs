use crate::util::*;

pub struct GridChunk<'a, const GRID_DIMENSION: usize> {
    offset: usize,
    dims: &'a Dims<GRID_DIMENSION>,
    buffer: &'a mut [f64],
}

impl<'a, const GRID_DIMENSION: usize> GridChunk<'a, GRID_DIMENSION> {
    pub fn new(
        offset: usize,
        dims: &'a Dims<GRID_DIMENSION>,
        buffer: &'a mut [f64],
    ) -> Self {
        GridChunk {
            offset,
            dims,
            buffer,
        }
    }

    pub fn coord_iter_mut(
        &mut self,
    ) -> impl Iterator<Item = (Coord<GRID_DIMENSION>, &mut f64)> {
        self.buffer
            .iter_mut()
            .enumerate()
            .map(|(i, v): (usize, &mut f64)| {
                (linear_to_coord(self.offset + i, self.dims), v)
            })
    }
}
