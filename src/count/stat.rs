use std::fmt;
use std::time::Duration;

use crate::event::Hardware;

/// Total of one event over every scope of a session.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Count {
    pub event: Hardware,
    pub count: u64,
}

/// Result of a counting session.
///
/// The `Display` impl renders the `perf stat` report:
///
/// ```text
///
///  Performance counter stats
///
///            1234567      cycles
///             891011      instructions
///
///  5.000123456 seconds time elapsed
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stat {
    /// One entry per descriptor, in descriptor order.
    pub counts: Vec<Count>,
    /// Wall time from starting the counters to reading them back.
    pub elapsed: Duration,
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, " Performance counter stats")?;
        writeln!(f)?;

        for Count { event, count } in &self.counts {
            writeln!(f, " {:>18}      {}", count, event)?;
        }

        writeln!(f)?;
        writeln!(
            f,
            " {}.{:09} seconds time elapsed",
            self.elapsed.as_secs(),
            self.elapsed.subsec_nanos()
        )
    }
}
