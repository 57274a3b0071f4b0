//! Hardware performance counter statistics for a command or a time window,
//! in the manner of `perf stat`.
//!
//! ## Example
//!
//! Count cycles and retired instructions on every CPU while `make` runs.
//!
//! ```rust,no_run
//! use perf_stat::config::{Opts, Target};
//! use perf_stat::count::perf::PerfRegistry;
//! use perf_stat::count::stat;
//! use perf_stat::workload::Process;
//!
//! let workload = vec!["make".to_string()];
//! let stat = stat(
//!     &mut PerfRegistry,
//!     &mut Process,
//!     Some("cycles,instructions"),
//!     &Target::All,
//!     workload,
//!     Opts::default(),
//! )
//! .unwrap();
//!
//! print!("{}", stat);
//! ```
//!
//! The counters themselves are provided by a [`Registry`][count::Registry],
//! [`PerfRegistry`][count::perf::PerfRegistry] uses `perf_event_open` on Linux.

pub mod config;
pub mod count;
pub mod error;
pub mod event;
mod ffi;
pub mod workload;

pub use error::{Error, Result};
