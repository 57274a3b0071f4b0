use std::fmt;

/// Generalized hardware events.
///
/// The discriminant of each variant is the event code handed to the counter
/// registry, in the same order as the `PERF_COUNT_HW_*` constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum Hardware {
    CpuCycle = 0,
    Instr = 1,
    CacheAccess = 2,
    CacheMiss = 3,
    BranchInstr = 4,
    BranchMiss = 5,
    BusCycle = 6,
    FrontendStalledCycle = 7,
    BackendStalledCycle = 8,
    RefCpuCycle = 9,
}

impl Hardware {
    /// Every known event, indexed by its code.
    pub const ALL: [Hardware; 10] = [
        Hardware::CpuCycle,
        Hardware::Instr,
        Hardware::CacheAccess,
        Hardware::CacheMiss,
        Hardware::BranchInstr,
        Hardware::BranchMiss,
        Hardware::BusCycle,
        Hardware::FrontendStalledCycle,
        Hardware::BackendStalledCycle,
        Hardware::RefCpuCycle,
    ];

    /// Canonical event name as accepted by `-e`.
    pub const fn name(self) -> &'static str {
        match self {
            Hardware::CpuCycle => "cycles",
            Hardware::Instr => "instructions",
            Hardware::CacheAccess => "cache-references",
            Hardware::CacheMiss => "cache-misses",
            Hardware::BranchInstr => "branches",
            Hardware::BranchMiss => "branch-misses",
            Hardware::BusCycle => "bus-cycles",
            Hardware::FrontendStalledCycle => "stalled-cycles-frontend",
            Hardware::BackendStalledCycle => "stalled-cycles-backend",
            Hardware::RefCpuCycle => "ref-cycles",
        }
    }

    /// Other spelling accepted for the event, if any.
    pub const fn alias(self) -> Option<&'static str> {
        match self {
            Hardware::CpuCycle => Some("cpu-cycles"),
            Hardware::BranchInstr => Some("branch-instructions"),
            _ => None,
        }
    }

    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Looks up an event by exact name or alias.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|ev| ev.name() == name || ev.alias() == Some(name))
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }
}

impl fmt::Display for Hardware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
