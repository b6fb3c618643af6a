//! Collective operations between the workers of a run.
//!
//! Workers are threads of one process and talk only through channels: rank
//! 0 is the root, which publishes the broadcast value and receives the
//! gathered ones. A barrier that can never complete because a peer is gone
//! is reported as [`Error::CommunicationFailure`].

use crate::coordinator::Phase;
use crate::error::Error;
use crossbeam_channel::{unbounded, Receiver, Sender};

pub const ROOT: usize = 0;

/// The endpoint of one worker.
///
/// `B` is the broadcast payload, `G` the gathered one.
pub struct Communicator<B, G> {
    rank: usize,
    size: usize,
    // Root only: one sender per non-root rank, indexed by rank - 1.
    broadcast_to: Vec<Sender<B>>,
    // Non-root only.
    broadcast_from: Option<Receiver<B>>,
    gather_to: Option<Sender<(usize, G)>>,
    // Root only.
    gather_from: Option<Receiver<(usize, G)>>,
}

/// Creates the connected endpoints of `size` workers, indexed by rank.
pub fn world<B, G>(size: usize) -> Vec<Communicator<B, G>> {
    if size == 0 {
        return vec![];
    }
    let (gather_tx, gather_rx) = unbounded();
    let mut broadcast_to = Vec::with_capacity(size - 1);
    let mut others = Vec::with_capacity(size - 1);

    for rank in 1..size {
        let (tx, rx) = unbounded();
        broadcast_to.push(tx);
        others.push(Communicator {
            rank,
            size,
            broadcast_to: vec![],
            broadcast_from: Some(rx),
            gather_to: Some(gather_tx.clone()),
            gather_from: None,
        });
    }

    let mut comms = Vec::with_capacity(size);
    comms.push(Communicator {
        rank: ROOT,
        size,
        broadcast_to,
        broadcast_from: None,
        gather_to: None,
        gather_from: Some(gather_rx),
    });
    comms.extend(others);
    comms
}

impl<B, G> Communicator<B, G> {
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_root(&self) -> bool {
        self.rank == ROOT
    }

    fn failure(&self, phase: Phase) -> Error {
        Error::CommunicationFailure {
            rank: self.rank,
            phase,
        }
    }
}

impl<B: Clone, G> Communicator<B, G> {
    /// Every worker returns the value published by the root.
    ///
    /// The root passes `Some(value)`; the other workers pass `None` and block
    /// until the value arrives.
    pub fn broadcast(&self, value: Option<B>) -> Result<B, Error> {
        match &self.broadcast_from {
            None => {
                let value = value.ok_or_else(|| self.failure(Phase::Broadcasting))?;
                for tx in &self.broadcast_to {
                    tx.send(value.clone())
                        .map_err(|_| self.failure(Phase::Broadcasting))?;
                }
                Ok(value)
            }
            Some(rx) => rx.recv().map_err(|_| self.failure(Phase::Broadcasting)),
        }
    }
}

impl<B, G> Communicator<B, G> {
    /// Sends `value` to the root.
    ///
    /// The root returns one value per worker, in rank order and including its
    /// own; the other workers return `None`.
    pub fn gather(&self, value: G) -> Result<Option<Vec<G>>, Error> {
        match (&self.gather_from, &self.gather_to) {
            (Some(rx), _) => {
                let mut slots: Vec<Option<G>> = (0..self.size).map(|_| None).collect();
                slots[self.rank] = Some(value);
                for _ in 1..self.size {
                    let (rank, value) = rx.recv().map_err(|_| self.failure(Phase::Gathering))?;
                    slots[rank] = Some(value);
                }
                slots
                    .into_iter()
                    .collect::<Option<Vec<G>>>()
                    .map(Some)
                    .ok_or_else(|| self.failure(Phase::Gathering))
            }
            (None, Some(tx)) => {
                tx.send((self.rank, value))
                    .map_err(|_| self.failure(Phase::Gathering))?;
                Ok(None)
            }
            (None, None) => Err(self.failure(Phase::Gathering)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::world;
    use crate::coordinator::Phase;
    use crate::error::Error;
    use std::thread;

    #[test]
    fn test_broadcast_then_gather() {
        let comms = world::<String, usize>(4);
        let gathered = thread::scope(|scope| {
            let mut comms = comms.into_iter();
            let root = comms.next().unwrap();
            for comm in comms {
                scope.spawn(move || {
                    let value = comm.broadcast(None).unwrap();
                    assert_eq!(value, "graph");
                    assert_eq!(comm.gather(comm.rank() * 10).unwrap(), None);
                });
            }
            let value = root.broadcast(Some("graph".to_owned())).unwrap();
            root.gather(value.len()).unwrap()
        });

        assert_eq!(gathered, Some(vec![5, 10, 20, 30]));
    }

    #[test]
    fn test_single_worker() {
        let comm = world::<u8, u8>(1).pop().unwrap();

        assert!(comm.is_root());
        assert_eq!(comm.broadcast(Some(7)).unwrap(), 7);
        assert_eq!(comm.gather(3).unwrap(), Some(vec![3]));
    }

    #[test]
    fn test_broadcast_fails_without_root() {
        let mut comms = world::<u8, u8>(3);
        let other = comms.pop().unwrap();
        drop(comms);

        assert!(matches!(
            other.broadcast(None),
            Err(Error::CommunicationFailure {
                rank: 2,
                phase: Phase::Broadcasting
            })
        ));
    }

    #[test]
    fn test_gather_fails_when_a_worker_is_gone() {
        let mut comms = world::<u8, u8>(3);
        let missing = comms.pop().unwrap();
        let other = comms.pop().unwrap();
        let root = comms.pop().unwrap();
        drop(missing);
        other.gather(1).unwrap();
        drop(other);

        assert!(matches!(
            root.gather(0),
            Err(Error::CommunicationFailure {
                rank: 0,
                phase: Phase::Gathering
            })
        ));
    }
}
