//! Counters backed by the Linux `perf_event_open` system call.

use std::fs::File;
use std::io::{self, Result};

use super::Registry;
use crate::config::{Attr, Scope};
use crate::event::EventType;
use crate::ffi::bindings as b;
use crate::ffi::syscall::{ioctl, perf_event_open, read};
use crate::ffi::{self, NR_CPUS};

fn raw_attr(attr: &Attr) -> ffi::Attr {
    let mut raw = ffi::Attr {
        size: b::PERF_ATTR_SIZE_VER0,
        ..Default::default()
    };

    raw.type_ = match attr.ty {
        EventType::Hardware => b::PERF_TYPE_HARDWARE,
    };
    raw.config = attr.code() as _;
    if attr.disabled {
        raw.flags |= b::ATTR_FLAG_DISABLED;
    }
    if attr.inherit {
        raw.flags |= b::ATTR_FLAG_INHERIT;
    }

    raw
}

/// Counters of one scope, one file per event.
///
/// Closing the files releases the counters.
#[derive(Debug)]
pub struct PerfCounters {
    files: Vec<File>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PerfRegistry;

impl Registry for PerfRegistry {
    type Handle = PerfCounters;

    fn nr_cpus(&self) -> usize {
        *NR_CPUS
    }

    fn register(&mut self, attrs: &[Attr], scope: Scope) -> Result<PerfCounters> {
        let mut files = Vec::new();
        files
            .try_reserve_exact(attrs.len())
            .map_err(|_| io::Error::from(io::ErrorKind::OutOfMemory))?;

        // Counters opened before a failure are closed when `files` drops.
        for attr in attrs {
            let raw = raw_attr(attr);
            let perf = perf_event_open(&raw, scope.pid, scope.cpu, -1, b::PERF_FLAG_FD_CLOEXEC)?;
            files.push(perf);
        }

        Ok(PerfCounters { files })
    }

    fn start(&mut self, handle: &PerfCounters) -> Result<()> {
        for file in &handle.files {
            ioctl(file, b::PERF_IOC_OP_RESET)?;
            ioctl(file, b::PERF_IOC_OP_ENABLE)?;
        }
        Ok(())
    }

    fn stop(&mut self, handle: &PerfCounters) -> Result<()> {
        for file in &handle.files {
            ioctl(file, b::PERF_IOC_OP_DISABLE)?;
        }
        Ok(())
    }

    fn read(&mut self, handle: &PerfCounters) -> Result<Vec<u64>> {
        handle
            .files
            .iter()
            .map(|file| {
                let mut buf = [0; size_of::<u64>()];
                let len = read(file, &mut buf)?;
                if len != buf.len() {
                    return Err(io::Error::from(io::ErrorKind::UnexpectedEof));
                }
                Ok(u64::from_ne_bytes(buf))
            })
            .collect()
    }

    fn release(&mut self, handle: PerfCounters) -> Result<()> {
        drop(handle);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{raw_attr, PerfRegistry};
    use crate::config::{Attr, Proc, Scope};
    use crate::count::Registry;
    use crate::event::Hardware;
    use crate::ffi::bindings as b;

    #[test]
    fn test_raw_attr() {
        let raw = raw_attr(&Attr::new(Hardware::BranchMiss));
        assert_eq!(raw.type_, b::PERF_TYPE_HARDWARE);
        assert_eq!(raw.size, b::PERF_ATTR_SIZE_VER0);
        assert_eq!(raw.config, 5);
        assert_eq!(raw.flags, b::ATTR_FLAG_DISABLED | b::ATTR_FLAG_INHERIT);
    }

    #[test]
    fn test_nr_cpus() {
        assert!(PerfRegistry.nr_cpus() >= 1);
    }

    // Needs a PMU and a permissive `perf_event_paranoid`.
    #[test]
    #[ignore]
    fn test_count_current_process() {
        let mut registry = PerfRegistry;
        let attrs = [Attr::new(Hardware::Instr)];
        let scope = Scope::from(Proc(std::process::id()));

        let handle = registry.register(&attrs, scope).unwrap();
        registry.start(&handle).unwrap();
        std::hint::black_box((0..10_000).sum::<u64>());
        registry.stop(&handle).unwrap();

        let values = registry.read(&handle).unwrap();
        assert_eq!(values.len(), 1);
        assert!(values[0] > 0);
        registry.release(handle).unwrap();
    }
}
