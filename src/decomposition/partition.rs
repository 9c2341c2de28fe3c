use crate::decomposition::*;
use crate::error::*;

/// Contiguous column range `[offset, offset + count)` owned by a worker.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Partition {
    pub offset: usize,
    pub count: usize,
}

impl Partition {
    pub fn end(&self) -> usize {
        self.offset + self.count
    }

    pub fn contains(&self, column: usize) -> bool {
        (self.offset..self.end()).contains(&column)
    }
}

/// Near equal split of `nx` columns,
/// the first `nx % workers` workers get one extra column.
pub fn partition_table(nx: usize, workers: usize) -> FdResult<Vec<Partition>> {
    if workers == 0 {
        return Err(FdError::Configuration(
            "at least one worker is required".to_string(),
        ));
    }
    if workers > nx {
        return Err(FdError::Configuration(format!(
            "{workers} workers for {nx} columns, every worker needs a column"
        )));
    }
    let average = nx / workers;
    let remainder = nx % workers;
    let mut offset = 0;
    let table = (0..workers)
        .map(|i| {
            let count = average + usize::from(i < remainder);
            let partition = Partition { offset, count };
            offset += count;
            partition
        })
        .collect();
    Ok(table)
}

/// One worker's view of the column split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    nx: usize,
    rank: usize,
    partitions: Vec<Partition>,
}

impl Decomposition {
    pub fn new(nx: usize, workers: usize, rank: usize) -> FdResult<Self> {
        let partitions = partition_table(nx, workers)?;
        if rank >= workers {
            return Err(FdError::Configuration(format!(
                "rank {rank} out of range for {workers} workers"
            )));
        }
        log::debug!(
            "worker {rank}: columns {:?} of {nx}",
            partitions[rank].offset..partitions[rank].end()
        );
        Ok(Decomposition {
            nx,
            rank,
            partitions,
        })
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn size(&self) -> usize {
        self.partitions.len()
    }

    pub fn local(&self) -> Partition {
        self.partitions[self.rank]
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    pub fn left_neighbor(&self) -> Option<usize> {
        self.rank.checked_sub(1)
    }

    pub fn right_neighbor(&self) -> Option<usize> {
        (self.rank + 1 < self.size()).then_some(self.rank + 1)
    }

    pub fn min_count(&self) -> usize {
        self.partitions.iter().map(|p| p.count).min().unwrap_or(0)
    }

    /// Values per worker when every column carries `rows` values.
    pub fn band_counts(&self, rows: usize) -> Vec<usize> {
        self.partitions.iter().map(|p| rows * p.count).collect()
    }

    /// Offsets matching [`Self::band_counts`].
    pub fn band_displacements(&self, rows: usize) -> Vec<usize> {
        self.partitions.iter().map(|p| rows * p.offset).collect()
    }

    /// Halos of `width` columns must come from the adjacent worker alone.
    pub fn check_halo(&self, width: usize) -> FdResult<()> {
        if self.size() > 1 && self.min_count() < width {
            let workers = (self.nx / width).max(1);
            return Err(FdError::Configuration(format!(
                "{} workers leave {} columns for the smallest block, a halo \
                 of {width} needs at least {width} columns per block; use at \
                 most {workers} workers for {} columns",
                self.size(),
                self.min_count(),
                self.nx
            )));
        }
        Ok(())
    }

    /// Transfer layout of `planes` planes of `rows × nx` for `rank`.
    pub fn plane_layout(
        &self,
        rows: usize,
        planes: usize,
        rank: usize,
    ) -> PlaneLayout {
        let p = self.partitions[rank];
        PlaneLayout {
            rows,
            nx: self.nx,
            planes,
            offset: p.offset,
            count: p.count,
        }
    }
}
