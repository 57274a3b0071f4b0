//! Event table and event specification parsing.

pub mod hw;
pub mod spec;

pub use hw::Hardware;

/// Events counted when no `-e` specification is given.
pub const DEFAULT_EVENTS: [Hardware; 6] = [
    Hardware::CpuCycle,
    Hardware::Instr,
    Hardware::CacheAccess,
    Hardware::CacheMiss,
    Hardware::BranchInstr,
    Hardware::BranchMiss,
];

/// Source of the event, only hardware events are supported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventType {
    Hardware,
}
