use crate::grid::*;
use crate::util::*;
use rayon::prelude::*;

impl Grid<2> {
    /// Copy of `count` columns starting at `start`.
    pub fn column_block(&self, start: usize, count: usize) -> Grid<2> {
        debug_assert!(start + count <= self.extent(1));
        let nz = self.extent(0);
        let buffer = self.columns(start, count).to_vec();
        Grid {
            dims: vector![nz, count],
            buffer,
        }
    }

    /// Copy with `pad` zero rows added above and below every column.
    pub fn pad_rows(&self, pad: usize) -> Grid<2> {
        profiling::scope!("grid::pad_rows");
        let nz = self.extent(0);
        let nx = self.extent(1);
        let padded_nz = nz + 2 * pad;
        let mut result = Grid::zeros(vector![padded_nz, nx]);
        result
            .buffer_mut()
            .par_chunks_mut(padded_nz)
            .zip(self.buffer().par_chunks(nz))
            .for_each(|(dst, src)| {
                dst[pad..pad + nz].copy_from_slice(src);
            });
        result
    }
}
