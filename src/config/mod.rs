use std::time::Duration;

pub mod attr;
mod target;

pub use attr::Attr;
pub use target::*;

/// How long a session counts when no workload is given.
pub const DEFAULT_RUN_TIME: Duration = Duration::from_secs(5);

/// Session options.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Opts {
    /// Length of the idle window in duration mode.
    pub run_time: Duration,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            run_time: DEFAULT_RUN_TIME,
        }
    }
}
