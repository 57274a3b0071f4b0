use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cpu(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Proc(pub u32);

/// Where one set of counters is registered.
///
/// `-1` in either field means "any", as for `perf_event_open`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scope {
    pub pid: i32,
    pub cpu: i32,
}

macro_rules! into_scope {
    ($ty: ty, $destruct: pat, $pid: expr, $cpu: expr) => {
        impl From<$ty> for Scope {
            fn from($destruct: $ty) -> Self {
                Scope {
                    pid: $pid as _,
                    cpu: $cpu as _,
                }
            }
        }
    };
}

// Any process on one CPU.
into_scope!(Cpu, Cpu(cpu), -1, cpu);
// One process on any CPU.
into_scope!(Proc, Proc(pid), pid, -1);

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.pid, self.cpu) {
            (-1, -1) => f.write_str("all processes, all CPUs"),
            (-1, cpu) => write!(f, "CPU {}", cpu),
            (pid, -1) => write!(f, "process {}", pid),
            (pid, cpu) => write!(f, "process {} on CPU {}", pid, cpu),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CpuListError {
    #[error("empty CPU list")]
    Empty,
    #[error("invalid CPU `{0}`: {1}")]
    Number(String, ParseIntError),
    #[error("invalid CPU range `{0}`")]
    Range(String),
    #[error("CPU {0} is out of range, at most {max} CPUs are supported", max = MAX_CPUS)]
    TooLarge(u32),
}

/// Upper bound on CPU numbers accepted in a [`CpuList`].
pub const MAX_CPUS: u32 = 8192;

/// CPUs given with `-C`, e.g. `0`, `0,2` or `1-3`.
///
/// Sorted and free of duplicates.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CpuList(Vec<Cpu>);

impl CpuList {
    pub fn cpus(&self) -> &[Cpu] {
        &self.0
    }
}

impl From<Cpu> for CpuList {
    fn from(cpu: Cpu) -> Self {
        Self(vec![cpu])
    }
}

impl FromStr for CpuList {
    type Err = CpuListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let num = |n: &str| -> Result<u32, CpuListError> {
            let cpu = n
                .trim()
                .parse::<u32>()
                .map_err(|e| CpuListError::Number(n.to_string(), e))?;
            if cpu >= MAX_CPUS {
                return Err(CpuListError::TooLarge(cpu));
            }
            Ok(cpu)
        };

        // Indexed by CPU, so repeated ranges cost nothing extra.
        let mut set = vec![false; MAX_CPUS as usize];
        for item in s.split(',').filter(|it| !it.trim().is_empty()) {
            match item.split_once('-') {
                Some((lo, hi)) => {
                    let (lo, hi) = (num(lo)?, num(hi)?);
                    if lo > hi {
                        return Err(CpuListError::Range(item.to_string()));
                    }
                    set[lo as usize..=hi as usize].fill(true);
                }
                None => set[num(item)? as usize] = true,
            }
        }

        let cpus: Vec<_> = (0..MAX_CPUS).filter(|&cpu| set[cpu as usize]).map(Cpu).collect();
        if cpus.is_empty() {
            return Err(CpuListError::Empty);
        }

        Ok(Self(cpus))
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("CPU {cpu} does not exist, the system has {nr_cpus} CPUs")]
    NoSuchCpu { cpu: u32, nr_cpus: usize },
    #[error("invalid process id {0}")]
    InvalidPid(u32),
}

/// What a counting session monitors.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Target {
    /// Every CPU in the system, each counted independently.
    All,
    Cpus(CpuList),
    Proc(Proc),
}

impl Target {
    /// Picks the target from command line selections.
    ///
    /// A CPU list restricts system-wide collection. Without CPUs or a pid,
    /// or with `all` and no CPUs, the session is system-wide.
    pub fn select(all: bool, cpus: Option<CpuList>, pid: Option<Proc>) -> Self {
        match (cpus, pid) {
            (Some(cpus), _) => Self::Cpus(cpus),
            (None, Some(pid)) if !all => Self::Proc(pid),
            (None, _) => Self::All,
        }
    }

    /// Checks that every CPU exists and the pid fits a `pid_t`.
    pub fn check(&self, nr_cpus: usize) -> Result<(), TargetError> {
        match self {
            Self::All => Ok(()),
            Self::Cpus(list) => match list.cpus().iter().find(|cpu| cpu.0 as usize >= nr_cpus) {
                Some(&Cpu(cpu)) => Err(TargetError::NoSuchCpu { cpu, nr_cpus }),
                None => Ok(()),
            },
            Self::Proc(Proc(pid)) if i32::try_from(*pid).is_err() => {
                Err(TargetError::InvalidPid(*pid))
            }
            Self::Proc(_) => Ok(()),
        }
    }

    /// Expands the target into one scope per registration.
    pub fn scopes(&self, nr_cpus: usize) -> Vec<Scope> {
        match self {
            Self::All => (0..nr_cpus as u32).map(|cpu| Cpu(cpu).into()).collect(),
            Self::Cpus(list) => list.cpus().iter().map(|&cpu| cpu.into()).collect(),
            Self::Proc(pid) => vec![(*pid).into()],
        }
    }

    pub fn is_system_wide(&self) -> bool {
        matches!(self, Self::All)
    }
}
