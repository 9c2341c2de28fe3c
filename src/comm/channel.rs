use crate::comm::*;
use crate::error::*;
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Endpoint of a full mesh of in-process channels, one per worker.
///
/// `senders[d]` delivers to worker `d`, `receivers[s]` holds what
/// worker `s` sent here. A worker that exits drops its senders, so
/// peers waiting on it fail instead of hanging.
pub struct ChannelComm {
    rank: usize,
    senders: Vec<Sender<Vec<f64>>>,
    receivers: Vec<Receiver<Vec<f64>>>,
}

impl ChannelComm {
    /// Connected endpoints for `workers` workers, in rank order.
    pub fn mesh(workers: usize) -> Vec<ChannelComm> {
        let mut senders: Vec<Vec<Sender<Vec<f64>>>> =
            (0..workers).map(|_| Vec::with_capacity(workers)).collect();
        let mut receivers: Vec<Vec<Receiver<Vec<f64>>>> =
            (0..workers).map(|_| Vec::with_capacity(workers)).collect();
        for dest_receivers in receivers.iter_mut() {
            for source_senders in senders.iter_mut() {
                let (tx, rx) = unbounded();
                source_senders.push(tx);
                dest_receivers.push(rx);
            }
        }
        senders
            .into_iter()
            .zip(receivers)
            .enumerate()
            .map(|(rank, (senders, receivers))| ChannelComm {
                rank,
                senders,
                receivers,
            })
            .collect()
    }

    fn peer_check(&self, peer: usize) -> FdResult<()> {
        if peer >= self.senders.len() {
            return Err(FdError::Communication {
                peer,
                reason: format!("no such worker among {}", self.senders.len()),
            });
        }
        Ok(())
    }
}

impl Communicator for ChannelComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.senders.len()
    }

    fn send(&self, dest: usize, data: Vec<f64>) -> FdResult<()> {
        self.peer_check(dest)?;
        log::trace!("{} -> {dest}: {} values", self.rank, data.len());
        self.senders[dest]
            .send(data)
            .map_err(|_| FdError::Communication {
                peer: dest,
                reason: "peer disconnected".to_string(),
            })
    }

    fn recv(&self, source: usize, len: usize) -> FdResult<Vec<f64>> {
        self.peer_check(source)?;
        let data =
            self.receivers[source]
                .recv()
                .map_err(|_| FdError::Communication {
                    peer: source,
                    reason: "peer disconnected".to_string(),
                })?;
        if data.len() != len {
            return Err(FdError::Communication {
                peer: source,
                reason: format!(
                    "expected {len} values, received {}",
                    data.len()
                ),
            });
        }
        Ok(data)
    }
}

/// Run `f` on `workers` named threads joined by a [`ChannelComm`] mesh
/// and collect the results in rank order.
///
/// Any failing worker fails the whole run. The error reported is the
/// first one that is not a communication failure, since those are
/// usually peers noticing the original failure.
pub fn launch<T, F>(workers: usize, f: F) -> FdResult<Vec<T>>
where
    T: Send,
    F: Fn(ChannelComm) -> FdResult<T> + Sync,
{
    if workers == 0 {
        return Err(FdError::Configuration(
            "at least one worker is required".to_string(),
        ));
    }
    log::debug!("launching {workers} workers");
    let comms = ChannelComm::mesh(workers);
    let results: Vec<FdResult<T>> = std::thread::scope(|scope| {
        let f = &f;
        let handles: Vec<_> = comms
            .into_iter()
            .map(|comm| {
                std::thread::Builder::new()
                    .name(format!("worker_{}", comm.rank()))
                    .spawn_scoped(scope, move || f(comm))
            })
            .collect();
        handles
            .into_iter()
            .enumerate()
            .map(|(rank, handle)| match handle {
                Ok(handle) => handle.join().unwrap_or_else(|_| {
                    Err(FdError::Communication {
                        peer: rank,
                        reason: "worker panicked".to_string(),
                    })
                }),
                Err(e) => Err(FdError::Io(e)),
            })
            .collect()
    });

    let mut values = Vec::with_capacity(workers);
    let mut errors = Vec::new();
    for (rank, result) in results.into_iter().enumerate() {
        match result {
            Ok(v) => values.push(v),
            Err(e) => {
                log::error!("worker {rank} failed: {e}");
                errors.push(e);
            }
        }
    }
    if errors.is_empty() {
        return Ok(values);
    }
    let root_cause = errors
        .iter()
        .position(|e| !matches!(e, FdError::Communication { .. }))
        .unwrap_or(0);
    Err(errors.swap_remove(root_cause))
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn point_to_point() {
        let results = launch(3, |comm| {
            let next = (comm.rank() + 1) % comm.size();
            let prev = (comm.rank() + comm.size() - 1) % comm.size();
            comm.send(next, vec![comm.rank() as f64; 2])?;
            comm.recv(prev, 2)
        })
        .unwrap();
        assert_eq!(results, vec![vec![2.0; 2], vec![0.0; 2], vec![1.0; 2]]);
    }

    #[test]
    fn size_mismatch_is_fatal() {
        let e = launch(2, |comm| {
            if comm.rank() == 0 {
                comm.send(1, vec![1.0; 3])?;
                Ok(())
            } else {
                comm.recv(0, 4).map(|_| ())
            }
        })
        .unwrap_err();
        assert!(matches!(e, FdError::Communication { peer: 0, .. }));
        assert!(e.is_fatal());
    }

    #[test]
    fn failed_peer_unblocks_receivers() {
        let e = launch(3, |comm| {
            if comm.rank() == 2 {
                return Err(FdError::InvalidArgument("bad input".into()));
            }
            comm.recv(2, 1).map(|_| ())
        })
        .unwrap_err();
        // the root cause wins over the disconnects it triggered
        assert!(matches!(e, FdError::InvalidArgument(_)));
    }

    #[test]
    fn panic_reported_as_communication() {
        let e = launch(2, |comm| {
            if comm.rank() == 1 {
                panic!("worker exploded");
            }
            Ok(())
        })
        .unwrap_err();
        assert!(matches!(e, FdError::Communication { peer: 1, .. }));
    }

    #[test]
    fn no_workers() {
        let e = launch(0, |_| Ok(())).unwrap_err();
        assert!(matches!(e, FdError::Configuration(_)));
    }

    #[test]
    fn unknown_peer() {
        let mut mesh = ChannelComm::mesh(1);
        let comm = mesh.remove(0);
        assert!(comm.send(1, vec![]).is_err());
        assert!(comm.recv(4, 0).is_err());
    }
}
