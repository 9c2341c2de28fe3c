use std::ops::Range;

/// Strided transfer of one worker's column block out of a volume of
/// `planes` planes, each `rows × nx` with the rows varying fastest.
///
/// On the global side consecutive planes of the block are `rows · nx`
/// apart, on the local side they are packed `rows · count` apart.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PlaneLayout {
    pub rows: usize,
    pub nx: usize,
    pub planes: usize,
    pub offset: usize,
    pub count: usize,
}

impl PlaneLayout {
    pub fn send_stride(&self) -> usize {
        self.rows * self.nx
    }

    pub fn recv_stride(&self) -> usize {
        self.rows * self.count
    }

    pub fn local_len(&self) -> usize {
        self.recv_stride() * self.planes
    }

    pub fn global_len(&self) -> usize {
        self.send_stride() * self.planes
    }

    /// Range of the global buffer holding plane `k` of the block.
    pub fn global_range(&self, k: usize) -> Range<usize> {
        let start = k * self.send_stride() + self.rows * self.offset;
        start..start + self.recv_stride()
    }

    pub fn local_range(&self, k: usize) -> Range<usize> {
        let start = k * self.recv_stride();
        start..start + self.recv_stride()
    }

    /// Copy the block out of a global volume.
    pub fn pack(&self, global: &[f64]) -> Vec<f64> {
        debug_assert_eq!(global.len(), self.global_len());
        let mut local = Vec::with_capacity(self.local_len());
        for k in 0..self.planes {
            local.extend_from_slice(&global[self.global_range(k)]);
        }
        local
    }

    /// Copy a packed block back into its place in a global volume.
    pub fn unpack(&self, local: &[f64], global: &mut [f64]) {
        debug_assert_eq!(local.len(), self.local_len());
        debug_assert_eq!(global.len(), self.global_len());
        for k in 0..self.planes {
            global[self.global_range(k)]
                .copy_from_slice(&local[self.local_range(k)]);
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    fn layout(offset: usize, count: usize) -> PlaneLayout {
        PlaneLayout {
            rows: 2,
            nx: 5,
            planes: 3,
            offset,
            count,
        }
    }

    #[test]
    fn strides() {
        let l = layout(3, 2);
        assert_eq!(l.send_stride(), 10);
        assert_eq!(l.recv_stride(), 4);
        assert_eq!(l.local_len(), 12);
        assert_eq!(l.global_range(1), 16..20);
        assert_eq!(l.local_range(2), 8..12);
    }

    #[test]
    fn pack_picks_columns_of_every_plane() {
        let global: Vec<f64> = (0..30).map(|v| v as f64).collect();
        let local = layout(1, 2).pack(&global);
        assert_eq!(
            local,
            vec![2.0, 3.0, 4.0, 5.0, 12.0, 13.0, 14.0, 15.0, 22.0, 23.0, 24.0, 25.0]
        );
    }

    #[test]
    fn blocks_tile_the_volume() {
        let global: Vec<f64> = (0..30).map(|v| v as f64 * 0.5).collect();
        let mut rebuilt = vec![0.0; 30];
        for (offset, count) in [(0, 2), (2, 2), (4, 1)] {
            let l = layout(offset, count);
            l.unpack(&l.pack(&global), &mut rebuilt);
        }
        assert_eq!(rebuilt, global);
    }
}
