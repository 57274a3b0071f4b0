//! Counting sessions.
//!
//! A [`Session`] registers one set of counters per [`Scope`] of its
//! [`Target`], starts them all, waits for the workload (or sleeps), then stops
//! and reads every counter once.

use std::io;
use std::thread;
use std::time::Instant;

use log::{debug, info, warn};

use crate::config::{attr, Attr, Opts, Scope, Target};
use crate::error::{Error, Result};
use crate::workload::Runner;

pub mod perf;
mod stat;

pub use stat::*;

/// Creates and drives live counters on behalf of a session.
pub trait Registry {
    /// One set of live counters, one per descriptor, for a single scope.
    type Handle;

    /// Number of CPUs a system-wide session counts on.
    fn nr_cpus(&self) -> usize;

    fn register(&mut self, attrs: &[Attr], scope: Scope) -> io::Result<Self::Handle>;

    fn start(&mut self, handle: &Self::Handle) -> io::Result<()>;

    fn stop(&mut self, handle: &Self::Handle) -> io::Result<()>;

    /// Returns the accumulated value of each counter, in descriptor order.
    fn read(&mut self, handle: &Self::Handle) -> io::Result<Vec<u64>>;

    fn release(&mut self, handle: Self::Handle) -> io::Result<()>;
}

/// Lifecycle of a [`Session`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Idle,
    Configured,
    Started,
    Running,
    Stopped,
    Reported,
    Failed,
}

pub struct Session<'r, R: Registry> {
    registry: &'r mut R,
    attrs: Vec<Attr>,
    opts: Opts,
    workload: Option<Vec<String>>,
    // Only scopes whose registration succeeded, these are released on drop.
    counters: Vec<(Scope, R::Handle)>,
    begin: Option<Instant>,
    state: State,
}

impl<'r, R: Registry> Session<'r, R> {
    pub fn new(registry: &'r mut R, attrs: Vec<Attr>, opts: Opts) -> Self {
        Self {
            registry,
            attrs,
            opts,
            workload: None,
            counters: vec![],
            begin: None,
            state: State::Idle,
        }
    }

    /// Sets the command to run while counting, an empty `argv` means
    /// duration mode.
    pub fn with_workload(mut self, argv: Vec<String>) -> Self {
        self.workload = (!argv.is_empty()).then_some(argv);
        self
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    /// Scopes with registered counters.
    pub fn scopes(&self) -> impl Iterator<Item = Scope> + '_ {
        self.counters.iter().map(|(scope, _)| *scope)
    }

    fn fail(&mut self, err: Error) -> Error {
        debug!("session failed in state {:?}: {}", self.state, err);
        self.state = State::Failed;
        err
    }

    fn require(&self, state: State, op: &'static str) -> Result<()> {
        if self.state == state {
            Ok(())
        } else {
            Err(Error::State {
                op,
                state: self.state,
            })
        }
    }

    /// Registers the descriptors once per scope of `target`.
    ///
    /// Nothing is registered if the target names a CPU the registry does not
    /// have. Otherwise stops at the first rejected scope, counters registered
    /// before it stay owned by the session until it is dropped.
    pub fn configure(&mut self, target: &Target) -> Result<()> {
        self.require(State::Idle, "configure")?;

        let nr_cpus = self.registry.nr_cpus();
        if let Err(e) = target.check(nr_cpus) {
            return Err(self.fail(e.into()));
        }

        let scopes = target.scopes(nr_cpus);
        if scopes.is_empty() {
            let source = io::Error::new(io::ErrorKind::InvalidInput, "no CPU to count on");
            let scope = Scope { pid: -1, cpu: -1 };
            return Err(self.fail(Error::Registration { scope, source }));
        }
        if self.counters.try_reserve_exact(scopes.len()).is_err() {
            return Err(self.fail(Error::ResourceExhaustion));
        }

        for scope in scopes {
            match self.registry.register(&self.attrs, scope) {
                Ok(handle) => {
                    debug!("registered {} counters on {}", self.attrs.len(), scope);
                    self.counters.push((scope, handle));
                }
                Err(source) => {
                    return Err(self.fail(Error::Registration { scope, source }));
                }
            }
        }

        self.state = State::Configured;
        Ok(())
    }

    fn start_all(&mut self) -> io::Result<()> {
        let registry = &mut *self.registry;
        self.counters.iter().try_for_each(|(_, h)| registry.start(h))
    }

    fn stop_all(&mut self) -> io::Result<()> {
        let registry = &mut *self.registry;
        self.counters.iter().try_for_each(|(_, h)| registry.stop(h))
    }

    fn read_all(&mut self) -> io::Result<Vec<u64>> {
        let mut totals = vec![0u64; self.attrs.len()];

        for (scope, handle) in &self.counters {
            let values = self.registry.read(handle)?;
            if values.len() != totals.len() {
                let msg = format!(
                    "{} returned {} values for {} events",
                    scope,
                    values.len(),
                    totals.len()
                );
                return Err(io::Error::new(io::ErrorKind::InvalidData, msg));
            }
            for (total, value) in totals.iter_mut().zip(values) {
                *total = total.saturating_add(value);
            }
        }

        Ok(totals)
    }

    /// Starts every registered counter and begins timing.
    pub fn start(&mut self) -> Result<()> {
        self.require(State::Configured, "start")?;

        self.begin = Some(Instant::now());
        if let Err(e) = self.start_all() {
            return Err(self.fail(Error::Counter(e)));
        }

        self.state = State::Started;
        Ok(())
    }

    /// Waits for the workload, or the idle window, then stops and reads
    /// every counter. Totals of each event are summed over all scopes.
    ///
    /// A failing workload leaves the counters unread.
    pub fn measure(&mut self, runner: &mut impl Runner) -> Result<Stat> {
        self.require(State::Started, "measure")?;

        self.state = State::Running;
        match self.workload.clone() {
            Some(argv) => {
                info!("running workload {:?}", argv);
                let status = match runner.run(&argv) {
                    Ok(status) => status,
                    Err(source) => {
                        let program = argv[0].clone();
                        return Err(self.fail(Error::Spawn { program, source }));
                    }
                };
                if status != 0 {
                    return Err(self.fail(Error::Workload(status)));
                }
            }
            None => {
                info!("counting for {:?}", self.opts.run_time);
                thread::sleep(self.opts.run_time);
            }
        }

        if let Err(e) = self.stop_all() {
            return Err(self.fail(Error::Counter(e)));
        }
        self.state = State::Stopped;

        let totals = match self.read_all() {
            Ok(totals) => totals,
            Err(e) => return Err(self.fail(Error::Counter(e))),
        };

        let elapsed = self.begin.map(|begin| begin.elapsed()).unwrap_or_default();
        self.state = State::Reported;

        let counts = self
            .attrs
            .iter()
            .zip(totals)
            .map(|(attr, count)| Count {
                event: attr.event,
                count,
            })
            .collect();

        Ok(Stat { counts, elapsed })
    }

    /// [`start`][Self::start] followed by [`measure`][Self::measure].
    pub fn run(&mut self, runner: &mut impl Runner) -> Result<Stat> {
        self.start()?;
        self.measure(runner)
    }
}

impl<R: Registry> Drop for Session<'_, R> {
    fn drop(&mut self) {
        for (scope, handle) in self.counters.drain(..) {
            if let Err(e) = self.registry.release(handle) {
                warn!("failed to release counters on {}: {}", scope, e);
            }
        }
    }
}

/// Runs a full `perf stat`: builds descriptors from `spec` (or the default
/// set), counts on `target` over `workload`, and returns the totals.
pub fn stat<R: Registry>(
    registry: &mut R,
    runner: &mut impl Runner,
    spec: Option<&str>,
    target: &Target,
    workload: Vec<String>,
    opts: Opts,
) -> Result<Stat> {
    let attrs = attr::build(spec)?;

    let mut session = Session::new(registry, attrs, opts).with_workload(workload);
    session.configure(target)?;
    session.run(runner)
}
