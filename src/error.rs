use std::io;

use thiserror::Error;

use crate::config::{Scope, TargetError};
use crate::count::State;
use crate::event::spec::SpecError;

pub type Result<T> = std::result::Result<T, Error>;

/// Exit status reported when the workload could not be spawned.
pub const SPAWN_FAILED: i32 = 127;

#[derive(Debug, Error)]
pub enum Error {
    /// Bad `-e` specification, no counter has been registered.
    #[error("Event syntax error: {spec}: {source}")]
    InvalidSpec { spec: String, source: SpecError },

    /// Allocation of the descriptor array or a registry resource failed.
    #[error("out of memory while allocating counters")]
    ResourceExhaustion,

    /// The target names a CPU or process the system cannot have.
    #[error("invalid target: {0}")]
    InvalidTarget(#[from] TargetError),

    #[error("failed to register counters on {scope}: {source}")]
    Registration { scope: Scope, source: io::Error },

    /// The workload exited with a non-zero status.
    #[error("workload exited with status {0}")]
    Workload(i32),

    #[error("failed to run `{program}`: {source}")]
    Spawn { program: String, source: io::Error },

    /// Start, stop or read of a registered counter failed.
    #[error("counter operation failed: {0}")]
    Counter(#[source] io::Error),

    #[error("cannot {op} a session in state {state:?}")]
    State { op: &'static str, state: State },
}

impl Error {
    /// Process exit code for this error.
    ///
    /// Workload failures keep the workload's own status, everything else
    /// maps to a negative errno.
    pub fn code(&self) -> i32 {
        fn errno(err: &io::Error) -> i32 {
            -err.raw_os_error().unwrap_or(libc::EIO)
        }

        match self {
            Self::InvalidSpec { .. } => -libc::EINVAL,
            Self::ResourceExhaustion => -libc::ENOMEM,
            Self::InvalidTarget(_) => -libc::EINVAL,
            Self::Registration { source, .. } => match source.kind() {
                io::ErrorKind::OutOfMemory => -libc::ENOMEM,
                _ => errno(source),
            },
            Self::Workload(status) => *status,
            Self::Spawn { .. } => SPAWN_FAILED,
            Self::Counter(source) => errno(source),
            Self::State { .. } => -libc::EINVAL,
        }
    }
}
