use crate::comm::*;
use crate::decomposition::*;
use crate::error::*;
use crate::grid::*;
use crate::util::*;

/// Assemble `nx × nt` traces on the root from every worker's `c × nt`.
pub fn gather_traces<C: Communicator>(
    comm: &C,
    decomposition: &Decomposition,
    local: &Grid2,
) -> FdResult<Option<Grid2>> {
    let nt = local.extent(1);
    let global = gather_planes(comm, decomposition, 1, nt, local.buffer())?;
    global
        .map(|buffer| Grid::from_vec(vector![decomposition.nx(), nt], buffer))
        .transpose()
}

/// Assemble `nz × nx × nt` snapshots on the root.
pub fn gather_snapshots<C: Communicator>(
    comm: &C,
    decomposition: &Decomposition,
    local: &Grid3,
) -> FdResult<Option<Grid3>> {
    let nz = local.extent(0);
    let nt = local.extent(2);
    let global = gather_planes(comm, decomposition, nz, nt, local.buffer())?;
    global
        .map(|buffer| {
            Grid::from_vec(vector![nz, decomposition.nx(), nt], buffer)
        })
        .transpose()
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn traces_in_column_order() {
        let (nx, nt) = (5, 3);
        let results = launch(2, |comm| {
            let d = Decomposition::new(nx, comm.size(), comm.rank())?;
            let p = d.local();
            let local = Grid::from_fn(
                vector![p.count, nt],
                |c: Coord<2>| (p.offset + c[0]) as f64 + 100.0 * c[1] as f64,
                4,
            );
            gather_traces(&comm, &d, &local)
        })
        .unwrap();
        let traces = results[0].as_ref().unwrap();
        assert_eq!(*traces.dims(), vector![nx, nt]);
        assert_eq!(traces.get(&vector![4, 2]), 204.0);
        assert_eq!(traces.get(&vector![2, 1]), 102.0);
        assert!(results[1].is_none());
    }

    #[test]
    fn snapshots_in_place() {
        let (nz, nx, nt) = (2, 4, 2);
        let results = launch(3, |comm| {
            let d = Decomposition::new(nx, comm.size(), comm.rank())?;
            let p = d.local();
            let local = Grid::from_fn(
                vector![nz, p.count, nt],
                |c: Coord<3>| (c[0] + 10 * (p.offset + c[1]) + 100 * c[2]) as f64,
                4,
            );
            gather_snapshots(&comm, &d, &local)
        })
        .unwrap();
        let snapshots = results[0].as_ref().unwrap();
        for t in 0..nt {
            for j in 0..nx {
                for i in 0..nz {
                    assert_eq!(
                        snapshots.get(&vector![i, j, t]),
                        (i + 10 * j + 100 * t) as f64
                    );
                }
            }
        }
    }
}
