//! Running the measured command.

use std::io;
use std::process::{Command, ExitStatus};

/// Runs a workload to completion and returns its exit status.
pub trait Runner {
    fn run(&mut self, argv: &[String]) -> io::Result<i32>;
}

/// Runs the workload as a child process, without a shell in between.
#[derive(Clone, Copy, Debug, Default)]
pub struct Process;

impl Runner for Process {
    fn run(&mut self, argv: &[String]) -> io::Result<i32> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty command"))?;

        let status = Command::new(program).args(args).status()?;
        Ok(exit_code(status))
    }
}

// Killed by a signal is reported the way shells do, as 128 + signal.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return 128 + sig;
        }
    }

    -1
}
