//! Ghost columns borrowed from the neighbouring workers.

use crate::comm::*;
use crate::decomposition::*;
use crate::error::*;
use crate::grid::*;
use crate::util::*;

/// What fills a halo at the edge of the global grid.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HaloFill {
    /// The field vanishes outside the grid.
    Zero,
    /// The outermost column continues outward.
    ReplicateEdge,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct HaloExchange {
    pub width: usize,
    pub left: Option<usize>,
    pub right: Option<usize>,
    pub fill: HaloFill,
}

impl HaloExchange {
    pub fn new(decomposition: &Decomposition, width: usize, fill: HaloFill) -> Self {
        HaloExchange {
            width,
            left: decomposition.left_neighbor(),
            right: decomposition.right_neighbor(),
            fill,
        }
    }

    /// `local` widened by `width` columns on each side.
    ///
    /// Both edges are sent before anything is received, so opposite
    /// edges never wait on each other.
    pub fn extend<C: Communicator>(
        &self,
        comm: &C,
        local: &Grid2,
    ) -> FdResult<Grid2> {
        profiling::scope!("halo::extend");
        let h = self.width;
        let nz = local.extent(0);
        let c = local.extent(1);
        if (self.left.is_some() || self.right.is_some()) && h > c {
            return Err(FdError::Configuration(format!(
                "halo of {h} columns is wider than the {c} local columns"
            )));
        }

        if let Some(left) = self.left {
            comm.send(left, local.columns(0, h).to_vec())?;
        }
        if let Some(right) = self.right {
            comm.send(right, local.columns(c - h, h).to_vec())?;
        }

        let mut result = Grid::zeros(vector![nz, c + 2 * h]);
        result.columns_mut(h, c).copy_from_slice(local.buffer());
        match self.left {
            Some(left) => {
                let halo = comm.recv(left, nz * h)?;
                result.columns_mut(0, h).copy_from_slice(&halo);
            }
            None => self.fill_edge(&mut result, local, 0, 0),
        }
        match self.right {
            Some(right) => {
                let halo = comm.recv(right, nz * h)?;
                result.columns_mut(c + h, h).copy_from_slice(&halo);
            }
            None if c > 0 => self.fill_edge(&mut result, local, c + h, c - 1),
            None => {}
        }
        Ok(result)
    }

    fn fill_edge(
        &self,
        result: &mut Grid2,
        local: &Grid2,
        start: usize,
        edge: usize,
    ) {
        if self.fill == HaloFill::ReplicateEdge && local.extent(1) > 0 {
            for j in start..start + self.width {
                result.column_mut(j).copy_from_slice(local.column(edge));
            }
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    fn numbered(nz: usize, nx: usize) -> Grid2 {
        Grid::from_fn(
            vector![nz, nx],
            |c: Coord<2>| (1 + c[0] + 10 * c[1]) as f64,
            4,
        )
    }

    #[test]
    fn single_worker_fill() {
        let local = numbered(2, 4);
        let results = launch(1, |comm| {
            let d = Decomposition::new(4, 1, 0)?;
            let zero = HaloExchange::new(&d, 2, HaloFill::Zero).extend(&comm, &local)?;
            let edge = HaloExchange::new(&d, 2, HaloFill::ReplicateEdge)
                .extend(&comm, &local)?;
            Ok((zero, edge))
        })
        .unwrap();
        let (zero, edge) = &results[0];
        assert_eq!(*zero.dims(), vector![2, 8]);
        assert_eq!(zero.column(0), &[0.0, 0.0]);
        assert_eq!(zero.column(2), local.column(0));
        assert_eq!(zero.column(7), &[0.0, 0.0]);
        assert_eq!(edge.column(1), local.column(0));
        assert_eq!(edge.column(6), local.column(3));
        assert_eq!(edge.column(7), local.column(3));
    }

    #[test]
    fn workers_see_the_whole_field() {
        let (nz, nx, h) = (3, 11, 2);
        let whole = numbered(nz, nx);
        let reference = launch(1, |comm| {
            let d = Decomposition::new(nx, 1, 0)?;
            HaloExchange::new(&d, h, HaloFill::ReplicateEdge).extend(&comm, &whole)
        })
        .unwrap()
        .remove(0);

        let parts = launch(3, |comm| {
            let d = Decomposition::new(nx, comm.size(), comm.rank())?;
            let p = d.local();
            let local = whole.column_block(p.offset, p.count);
            let halo = HaloExchange::new(&d, h, HaloFill::ReplicateEdge);
            Ok((p, halo.extend(&comm, &local)?))
        })
        .unwrap();
        for (p, extended) in parts {
            assert_eq!(extended, reference.column_block(p.offset, p.count + 2 * h));
        }
    }

    #[test]
    fn halo_wider_than_block() {
        let e = launch(2, |comm| {
            let d = Decomposition::new(4, comm.size(), comm.rank())?;
            let local = Grid::zeros(vector![2, 2]);
            HaloExchange::new(&d, 3, HaloFill::Zero)
                .extend(&comm, &local)
                .map(|_| ())
        })
        .unwrap_err();
        assert!(matches!(e, FdError::Configuration(_)));
    }
}
