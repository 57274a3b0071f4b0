use std::process;

use clap::{CommandFactory, Parser};
use env_logger::Env;
use perf_stat::config::{CpuList, Opts, Proc, Target};
use perf_stat::count::perf::PerfRegistry;
use perf_stat::count::stat;
use perf_stat::event::Hardware;
use perf_stat::workload::Process;
use perf_stat::Error;

fn event_help() -> String {
    let names: Vec<_> = Hardware::ALL.iter().map(|ev| ev.name()).collect();
    format!(
        "event selector, a comma-separated list of: {}",
        names.join(", ")
    )
}

#[derive(Parser, Debug)]
#[command(name = "perf stat", override_usage = "perf stat [<options>] [<command>]")]
struct Args {
    /// system-wide collection from all CPUs
    #[arg(short = 'a', long = "all-cpus", conflicts_with = "pid")]
    all_cpus: bool,

    /// list of cpus to monitor in system-wide
    #[arg(short = 'C', long = "cpu", value_name = "cpu", conflicts_with = "pid")]
    cpu: Option<CpuList>,

    #[arg(short = 'e', long = "event", value_name = "event", help = event_help())]
    event: Option<String>,

    /// stat events on existing process id
    #[arg(
        short = 'p',
        long = "pid",
        value_name = "pid",
        value_parser = clap::value_parser!(u32).range(..=i32::MAX as i64)
    )]
    pid: Option<u32>,

    /// Command to run and measure
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

fn run(args: Args) -> i32 {
    let target = Target::select(args.all_cpus, args.cpu, args.pid.map(Proc));
    log::debug!("counting on {:?}", target);

    let result = stat(
        &mut PerfRegistry,
        &mut Process,
        args.event.as_deref(),
        &target,
        args.command,
        Opts::default(),
    );

    match result {
        Ok(stat) => {
            print!("{}", stat);
            0
        }
        Err(e) => {
            eprintln!("{}", e);
            if let Error::InvalidSpec { .. } = e {
                let _ = Args::command().print_help();
            }
            e.code()
        }
    }
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            process::exit(e.exit_code());
        }
    };

    process::exit(run(args));
}

#[cfg(test)]
mod test {
    use clap::error::ErrorKind;
    use clap::Parser;
    use perf_stat::config::{Proc, Target};

    use super::Args;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("perf-stat").chain(args.iter().copied()))
    }

    #[test]
    fn test_pid_conflicts() {
        for args in [&["-a", "-p", "1"][..], &["-C", "0", "-p", "1"][..]] {
            let err = parse(args).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ArgumentConflict, "{args:?}");
        }
    }

    #[test]
    fn test_pid_range() {
        let err = parse(&["-p", "4294967295"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert!(parse(&["-p", "-1"]).is_err());

        let args = parse(&["-p", "2147483647"]).unwrap();
        assert_eq!(args.pid, Some(i32::MAX as u32));
    }

    #[test]
    fn test_target_and_workload() {
        let args = parse(&["-a", "-C", "1-2", "-e", "cycles", "ls", "-l"]).unwrap();
        assert_eq!(args.event.as_deref(), Some("cycles"));
        assert_eq!(args.command, ["ls", "-l"]);
        assert_eq!(
            Target::select(args.all_cpus, args.cpu, args.pid.map(Proc)),
            Target::Cpus("1-2".parse().unwrap())
        );

        let args = parse(&["-p", "7"]).unwrap();
        assert_eq!(
            Target::select(args.all_cpus, args.cpu, args.pid.map(Proc)),
            Target::Proc(Proc(7))
        );

        let args = parse(&[]).unwrap();
        assert_eq!(Target::select(args.all_cpus, args.cpu, args.pid.map(Proc)), Target::All);
        assert!(args.command.is_empty());
    }

    #[test]
    fn test_bad_cpu_list() {
        let err = parse(&["-C", "0-4294967295"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }
}
