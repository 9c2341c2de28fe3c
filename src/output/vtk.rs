use crate::error::*;
use crate::grid::*;
use crate::util::*;
use vtkio::model::*;

/// Export a `nz × nx × nt` snapshot volume as an unstructured grid of
/// hexahedra, points at `(x, z, t)` scaled by the given spacings.
pub fn write_vtk_volume<F: AsRef<std::path::Path>>(
    snapshots: &Grid3,
    spacing: [f64; 3],
    s: &F,
) -> FdResult<()> {
    log::info!("Writing vtk: {:?}", s.as_ref());
    let dims = *snapshots.dims();
    if dims.iter().any(|d| *d < 2) {
        return Err(FdError::InvalidArgument(format!(
            "a volume needs two points per axis, got {:?}",
            dims.as_slice()
        )));
    }

    // Collect the grid points as vertices in mesh
    let buffer_size = snapshots.len();
    let mut points = Vec::with_capacity(3 * buffer_size);
    for l in 0..buffer_size {
        let coord = linear_to_coord(l, &dims);
        points.push((coord[1] as f64 * spacing[1]) as f32);
        points.push((coord[0] as f64 * spacing[0]) as f32);
        points.push((coord[2] as f64 * spacing[2]) as f32);
    }

    // Assemble Hexahedron elements from grid points
    let cell_dims: Dims<3> = dims.map(|d| d - 1);
    let n_cells = real_buffer_size(&cell_dims);
    let mut connectivity = Vec::with_capacity(8 * n_cells);
    let mut offsets = Vec::with_capacity(n_cells);
    let mut cell_types = Vec::with_capacity(n_cells);
    let mut offset = 8;
    for c in 0..n_cells {
        let cell_coord = linear_to_coord(c, &cell_dims);
        let n_1 = cell_coord + vector![0, 0, 1];
        let n_2 = cell_coord + vector![0, 1, 0];
        let n_3 = cell_coord + vector![1, 0, 0];
        let n_4 = cell_coord + vector![0, 1, 1];
        let n_5 = cell_coord + vector![1, 1, 0];
        let n_6 = cell_coord + vector![1, 0, 1];
        let n_7 = cell_coord + vector![1, 1, 1];

        let vertices = [&cell_coord, &n_3, &n_6, &n_1, &n_2, &n_5, &n_7, &n_4];
        for v in vertices {
            connectivity.push(coord_to_linear(v, &dims) as u64);
        }

        offsets.push(offset);
        cell_types.push(CellType::Hexahedron);
        offset += 8;
    }

    let data: Vec<f32> = snapshots.buffer().iter().map(|v| *v as f32).collect();

    Vtk {
        version: Version::Auto,
        title: String::new(),
        byte_order: ByteOrder::LittleEndian,
        file_path: None,
        data: DataSet::inline(UnstructuredGridPiece {
            points: IOBuffer::F32(points),
            cells: Cells {
                cell_verts: VertexNumbers::XML {
                    connectivity,
                    offsets,
                },
                types: cell_types,
            },
            data: Attributes {
                point: vec![Attribute::DataArray(DataArray {
                    name: "pressure".to_string(),
                    elem: ElementType::Scalars {
                        num_comp: 1,
                        lookup_table: None,
                    },
                    data: IOBuffer::F32(data),
                })],
                cell: vec![],
            },
        }),
    }
    .export(s)?;
    Ok(())
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn flat_volume_rejected() {
        let g = Grid::zeros(vector![3, 1, 4]);
        let e = write_vtk_volume(&g, [1.0; 3], &"never_written.vtu").unwrap_err();
        assert!(matches!(e, FdError::InvalidArgument(_)));
    }

    #[test]
    fn export() {
        let g = Grid::from_fn(vector![2, 3, 2], |c: Coord<3>| c[1] as f64, 4);
        let path = std::env::temp_dir()
            .join(format!("awfd_volume_{}.vtu", std::process::id()));
        write_vtk_volume(&g, [10.0, 10.0, 1e-3], &path).unwrap();
        assert!(path.exists());
        std::fs::remove_file(&path).unwrap();
    }
}
