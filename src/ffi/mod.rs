use std::sync::LazyLock;

pub mod bindings;
pub mod syscall;

pub static NR_CPUS: LazyLock<usize> = LazyLock::new(|| {
    let name = libc::_SC_NPROCESSORS_CONF;
    let nr = unsafe { libc::sysconf(name) };
    // sysconf returns -1 if the value is unknown.
    if nr > 0 {
        nr as _
    } else {
        1
    }
});

pub type Attr = bindings::perf_event_attr;
