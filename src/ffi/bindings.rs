#![allow(dead_code, non_camel_case_types)]

// The first published layout of `struct perf_event_attr`, which every kernel
// since 2.6.31 accepts:
// https://github.com/torvalds/linux/blob/v6.13/include/uapi/linux/perf_event.h#L380
pub const PERF_ATTR_SIZE_VER0: u32 = 64;

pub const PERF_TYPE_HARDWARE: u32 = 0;

pub const PERF_FLAG_FD_CLOEXEC: u64 = 1 << 3;

// Bits of `perf_event_attr::flags`.
pub const ATTR_FLAG_DISABLED: u64 = 1 << 0;
pub const ATTR_FLAG_INHERIT: u64 = 1 << 1;

// _IO('$', nr)
pub const PERF_IOC_OP_ENABLE: u64 = 0x2400;
pub const PERF_IOC_OP_DISABLE: u64 = 0x2401;
pub const PERF_IOC_OP_RESET: u64 = 0x2403;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct perf_event_attr {
    pub type_: u32,
    pub size: u32,
    pub config: u64,
    pub sample_period: u64,
    pub sample_type: u64,
    pub read_format: u64,
    pub flags: u64,
    pub wakeup_events: u32,
    pub bp_type: u32,
    pub config1: u64,
}

const _: () = assert!(size_of::<perf_event_attr>() == PERF_ATTR_SIZE_VER0 as usize);
