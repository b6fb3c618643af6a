use thiserror::Error;

use crate::coordinator::Phase;

/// Errors that abort a whole run.
///
/// Load-time errors ([`Error::MalformedInput`], [`Error::Io`]) are raised
/// before any worker starts computing; [`Error::CommunicationFailure`] means
/// a broadcast or gather barrier could never complete, and no partial result
/// is produced in that case.
#[derive(Error, Debug)]
pub enum Error {
    /// A line of the edge list could not be split into exactly two node tokens.
    #[error("Malformed edge list - line {line}: {message}")]
    MalformedInput {
        /// 1-based line number in the input
        line: usize,
        /// What was wrong with the line
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A worker never reached the other side of a barrier, e.g. because a
    /// peer failed or panicked.
    #[error("Worker {rank} lost its peers during {phase:?}")]
    CommunicationFailure { rank: usize, phase: Phase },

    #[error("Could not build the worker thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Numeric failure of a single source visit.
///
/// These never abort a run: the contribution of the offending source is
/// discarded and the source is reported as skipped.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceError {
    /// The source reaches no other node, so its closeness is a division by zero.
    #[error("Node {node} reaches no other node, closeness is undefined")]
    ZeroDistanceSum { node: usize },
}

impl SourceError {
    pub fn node(&self) -> usize {
        match *self {
            SourceError::ZeroDistanceSum { node } => node,
        }
    }
}
