use crate::comm::*;
use crate::decomposition::*;
use crate::error::*;

/// Scatter a `rows × nx × planes` volume held by `root`,
/// every worker gets its column block of every plane packed contiguously.
pub fn scatter_planes<C: Communicator>(
    comm: &C,
    decomposition: &Decomposition,
    rows: usize,
    planes: usize,
    global: Option<&[f64]>,
) -> FdResult<Vec<f64>> {
    profiling::scope!("comm::scatter_planes");
    let rank = comm.rank();
    let local = decomposition.plane_layout(rows, planes, rank);
    if rank != ROOT {
        return comm.recv(ROOT, local.local_len());
    }
    let global = match global {
        Some(g) if g.len() == local.global_len() => g,
        Some(g) => {
            return Err(FdError::shape_mismatch(
                &[rows, decomposition.nx(), planes],
                &[g.len()],
            ))
        }
        None => {
            return Err(FdError::InvalidArgument(
                "root worker must provide the volume to scatter".to_string(),
            ))
        }
    };
    for dest in (0..comm.size()).filter(|d| *d != ROOT) {
        let layout = decomposition.plane_layout(rows, planes, dest);
        comm.send(dest, layout.pack(global))?;
    }
    Ok(local.pack(global))
}

/// Inverse of [`scatter_planes`], `root` gets the whole volume.
pub fn gather_planes<C: Communicator>(
    comm: &C,
    decomposition: &Decomposition,
    rows: usize,
    planes: usize,
    local: &[f64],
) -> FdResult<Option<Vec<f64>>> {
    profiling::scope!("comm::gather_planes");
    let rank = comm.rank();
    let own = decomposition.plane_layout(rows, planes, rank);
    if local.len() != own.local_len() {
        return Err(FdError::shape_mismatch(&[own.local_len()], &[local.len()]));
    }
    if rank != ROOT {
        comm.send(ROOT, local.to_vec())?;
        return Ok(None);
    }
    let mut global = vec![0.0; own.global_len()];
    own.unpack(local, &mut global);
    for source in (0..comm.size()).filter(|s| *s != ROOT) {
        let layout = decomposition.plane_layout(rows, planes, source);
        let part = comm.recv(source, layout.local_len())?;
        layout.unpack(&part, &mut global);
    }
    Ok(Some(global))
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn collectives() {
        let results = launch(3, |comm| {
            let shape = comm.broadcast(
                ROOT,
                comm.is_root().then_some(&[4.0, 2.0][..]),
                2,
            )?;

            let counts = [2, 1, 1];
            let displs = [0, 2, 3];
            let data = [10.0, 11.0, 12.0, 13.0];
            let part = comm.scatterv(
                ROOT,
                comm.is_root().then_some(&data[..]),
                &counts,
                &displs,
            )?;
            let doubled: Vec<f64> = part.iter().map(|v| v * 2.0).collect();
            let gathered = comm.gatherv(ROOT, &doubled, &counts, &displs, 4)?;
            Ok((shape, part, gathered))
        })
        .unwrap();

        for (shape, _, _) in &results {
            assert_eq!(shape, &vec![4.0, 2.0]);
        }
        assert_eq!(results[0].1, vec![10.0, 11.0]);
        assert_eq!(results[2].1, vec![13.0]);
        assert_eq!(results[0].2, Some(vec![20.0, 22.0, 24.0, 26.0]));
        assert_eq!(results[1].2, None);
    }

    #[test]
    fn planes_roundtrip() {
        let (rows, nx, planes) = (3, 7, 4);
        let global: Vec<f64> =
            (0..rows * nx * planes).map(|v| v as f64).collect();
        let results = launch(3, |comm| {
            let d = Decomposition::new(nx, comm.size(), comm.rank())?;
            let local = scatter_planes(
                &comm,
                &d,
                rows,
                planes,
                comm.is_root().then_some(&global[..]),
            )?;
            let first = local[0];
            let back = gather_planes(&comm, &d, rows, planes, &local)?;
            Ok((first, back))
        })
        .unwrap();
        // column offsets 0, 3, 5
        assert_eq!(results[1].0, 9.0);
        assert_eq!(results[2].0, 15.0);
        assert_eq!(results[0].1.as_ref(), Some(&global));
        assert!(results[2].1.is_none());
    }

    #[test]
    fn root_must_provide_volume() {
        let e = launch(2, |comm| {
            let d = Decomposition::new(4, comm.size(), comm.rank())?;
            scatter_planes(&comm, &d, 1, 1, None).map(|_| ())
        })
        .unwrap_err();
        assert!(matches!(e, FdError::InvalidArgument(_)));
    }
}
