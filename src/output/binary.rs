use crate::error::*;
use crate::grid::*;
use crate::util::*;

/// Raw native endian `f64` dump of a grid buffer.
pub fn write_binary<const GRID_DIMENSION: usize, P: AsRef<std::path::Path>>(
    grid: &Grid<GRID_DIMENSION>,
    path: &P,
) -> FdResult<()> {
    log::info!("Writing: {:?} {:?}", path.as_ref(), grid.dims().as_slice());
    let bytes: &[u8] = bytemuck::cast_slice(grid.buffer());
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Read a dump written by [`write_binary`] back into a grid of `dims`.
pub fn read_binary<const GRID_DIMENSION: usize, P: AsRef<std::path::Path>>(
    dims: Dims<GRID_DIMENSION>,
    path: &P,
) -> FdResult<Grid<GRID_DIMENSION>> {
    let bytes = std::fs::read(path)?;
    let expected = real_buffer_size(&dims) * std::mem::size_of::<f64>();
    if bytes.len() != expected {
        return Err(FdError::shape_mismatch(&[expected], &[bytes.len()]));
    }
    let mut buffer = vec![0.0f64; real_buffer_size(&dims)];
    bytemuck::cast_slice_mut::<f64, u8>(&mut buffer).copy_from_slice(&bytes);
    Grid::from_vec(dims, buffer)
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn dump_and_read() {
        let g = Grid::from_fn(vector![3, 4], |c: Coord<2>| c[0] as f64 - 0.5 * c[1] as f64, 5);
        let path = std::env::temp_dir().join(format!("awfd_dump_{}.bin", std::process::id()));
        write_binary(&g, &path).unwrap();
        let back = read_binary(vector![3, 4], &path).unwrap();
        assert_eq!(back, g);
        assert!(read_binary(vector![5, 4], &path).is_err());
        std::fs::remove_file(&path).unwrap();
    }
}
