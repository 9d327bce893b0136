//! Sinks receiving the state transitions of the simulation.

use std::{
    fmt,
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use log::{trace, warn};
use parking_lot::{Condvar, Mutex};

use crate::error::Result;
use crate::states::{ChefState, StudentState, Transition, WaiterState};

/// One-way observer of state transitions.
///
/// Regions call `record` while holding their own lock, so implementations
/// must return promptly and must never wait on an agent.
pub trait StateSink: Send + Sync {
    fn record(&self, transition: Transition);
}

/// Current state of every agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub chef: ChefState,
    pub waiter: WaiterState,
    pub students: Vec<StudentState>,
}

impl Snapshot {
    fn new(students: usize) -> Self {
        Snapshot {
            chef: ChefState::WaitingForAnOrder,
            waiter: WaiterState::AppraisingTheSituation,
            students: vec![StudentState::GoingToTheRestaurant; students],
        }
    }

    fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Student { id, state } => {
                if let Some(slot) = self.students.get_mut(id) {
                    *slot = state;
                } else {
                    warn!("repository: transition for unknown student {}", id);
                }
            }
            Transition::Waiter(state) => self.waiter = state,
            Transition::Chef(state) => self.chef = state,
        }
    }

    fn header(students: usize) -> String {
        let mut line = String::from(" Chef  Waiter");
        for id in 0..students {
            line.push_str(&format!("  Stu{}", id));
        }
        line
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.chef.tag(), self.waiter.tag())?;
        for state in &self.students {
            write!(f, " {}", state.tag())?;
        }
        Ok(())
    }
}

struct Log {
    snapshot: Snapshot,
    out: Option<BufWriter<File>>,
}

/// Keeps the state of every agent and appends one line per transition to
/// the audit log.
pub struct GeneralRepository {
    log: Mutex<Log>,
}

impl GeneralRepository {
    pub fn create(path: &Path, students: usize) -> Result<Self> {
        let mut out = BufWriter::new(File::create(path)?);
        let snapshot = Snapshot::new(students);
        writeln!(out, "        Restaurant - Description of the internal state")?;
        writeln!(out, "{}", Snapshot::header(students))?;
        writeln!(out, "{}", snapshot)?;
        Ok(GeneralRepository {
            log: Mutex::new(Log {
                snapshot,
                out: Some(out),
            }),
        })
    }

    /// A repository that only tracks states, without a log file.
    pub fn in_memory(students: usize) -> Self {
        GeneralRepository {
            log: Mutex::new(Log {
                snapshot: Snapshot::new(students),
                out: None,
            }),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.log.lock().snapshot.clone()
    }

    pub fn flush(&self) {
        let mut log = self.log.lock();
        if let Some(out) = log.out.as_mut() {
            if let Err(err) = out.flush() {
                warn!("repository: flushing the log failed: {}", err);
                log.out = None;
            }
        }
    }
}

impl StateSink for GeneralRepository {
    fn record(&self, transition: Transition) {
        trace!("repository: {}", transition);
        let mut log = self.log.lock();
        log.snapshot.apply(transition);
        let line = log.snapshot.to_string();
        if let Some(out) = log.out.as_mut() {
            let written: io::Result<()> = writeln!(out, "{}", line);
            if let Err(err) = written {
                // the run goes on without the audit file
                warn!("repository: writing the log failed, disabling it: {}", err);
                log.out = None;
            }
        }
    }
}

/// Keeps every transition in the order it was recorded.
#[derive(Default)]
pub struct Recorder {
    transitions: Mutex<Vec<Transition>>,
    changed: Condvar,
}

impl Recorder {
    pub fn new() -> Self {
        Recorder::default()
    }

    pub fn transitions(&self) -> Vec<Transition> {
        self.transitions.lock().clone()
    }

    /// Blocks until `done` holds for the transitions recorded so far.
    pub fn wait_until<F>(&self, done: F)
    where
        F: Fn(&[Transition]) -> bool,
    {
        let mut transitions = self.transitions.lock();
        while !done(&transitions) {
            self.changed.wait(&mut transitions);
        }
    }
}

impl StateSink for Recorder {
    fn record(&self, transition: Transition) {
        self.transitions.lock().push(transition);
        self.changed.notify_all();
    }
}
