//! Message passing between cooperating workers.
//!
//! Workers run the same program over disjoint column blocks and share
//! nothing, every value crosses between them as an explicit message.
//! Collectives are built from blocking point to point transfers, so
//! every worker has to reach a collective for it to complete.

mod channel;
mod collective;

pub use channel::*;
pub use collective::*;

use crate::error::*;

/// Rank of the worker that owns global inputs and outputs.
pub const ROOT: usize = 0;

pub trait Communicator {
    fn rank(&self) -> usize;

    fn size(&self) -> usize;

    /// Send `data` to worker `dest`. Never blocks on the receiver.
    fn send(&self, dest: usize, data: Vec<f64>) -> FdResult<()>;

    /// Blocking receive of exactly `len` values from worker `source`.
    fn recv(&self, source: usize, len: usize) -> FdResult<Vec<f64>>;

    fn is_root(&self) -> bool {
        self.rank() == ROOT
    }

    /// Every worker gets `len` values from `root`.
    /// Only `root` needs to provide `data`.
    fn broadcast(
        &self,
        root: usize,
        data: Option<&[f64]>,
        len: usize,
    ) -> FdResult<Vec<f64>> {
        if self.rank() != root {
            return self.recv(root, len);
        }
        let data = root_data(data, len)?;
        for dest in (0..self.size()).filter(|d| *d != root) {
            self.send(dest, data.to_vec())?;
        }
        Ok(data.to_vec())
    }

    /// Worker `i` gets `send[displs[i]..displs[i] + counts[i]]` from `root`.
    fn scatterv(
        &self,
        root: usize,
        send: Option<&[f64]>,
        counts: &[usize],
        displs: &[usize],
    ) -> FdResult<Vec<f64>> {
        check_table(self.size(), counts, displs)?;
        let rank = self.rank();
        if rank != root {
            return self.recv(root, counts[rank]);
        }
        let total = counts
            .iter()
            .zip(displs)
            .map(|(c, d)| c + d)
            .max()
            .unwrap_or(0);
        let send = root_data(send, total)?;
        for dest in (0..self.size()).filter(|d| *d != root) {
            let range = displs[dest]..displs[dest] + counts[dest];
            self.send(dest, send[range].to_vec())?;
        }
        Ok(send[displs[rank]..displs[rank] + counts[rank]].to_vec())
    }

    /// Inverse of [`Communicator::scatterv`], `root` gets the
    /// assembled buffer of `total` values and the others `None`.
    fn gatherv(
        &self,
        root: usize,
        local: &[f64],
        counts: &[usize],
        displs: &[usize],
        total: usize,
    ) -> FdResult<Option<Vec<f64>>> {
        check_table(self.size(), counts, displs)?;
        let rank = self.rank();
        if local.len() != counts[rank] {
            return Err(FdError::shape_mismatch(&[counts[rank]], &[local.len()]));
        }
        if rank != root {
            self.send(root, local.to_vec())?;
            return Ok(None);
        }
        let mut result = vec![0.0; total];
        for source in 0..self.size() {
            let range = displs[source]..displs[source] + counts[source];
            if range.end > total {
                return Err(FdError::shape_mismatch(&[range.end], &[total]));
            }
            if source == root {
                result[range].copy_from_slice(local);
            } else {
                let part = self.recv(source, counts[source])?;
                result[range].copy_from_slice(&part);
            }
        }
        Ok(Some(result))
    }
}

fn root_data(data: Option<&[f64]>, len: usize) -> FdResult<&[f64]> {
    match data {
        Some(data) if data.len() >= len => Ok(data),
        Some(data) => Err(FdError::shape_mismatch(&[len], &[data.len()])),
        None => Err(FdError::InvalidArgument(
            "root worker must provide the data to distribute".to_string(),
        )),
    }
}

fn check_table(
    size: usize,
    counts: &[usize],
    displs: &[usize],
) -> FdResult<()> {
    if counts.len() != size || displs.len() != size {
        return Err(FdError::shape_mismatch(
            &[size, size],
            &[counts.len(), displs.len()],
        ));
    }
    Ok(())
}
