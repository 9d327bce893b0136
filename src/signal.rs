//! SIGUSR1 prints the current state of every agent, so a stuck run can be
//! inspected from outside (`kill -USR1 <pid>`).

use std::{sync::Arc, thread};

use libc::SIGUSR1;
use log::{info, warn};
use signal_hook::iterator::{Handle, Signals};

use crate::error::Result;
use crate::repository::GeneralRepository;

pub struct StateDump {
    handle: Handle,
    thread: thread::JoinHandle<()>,
}

impl StateDump {
    pub fn install(repo: Arc<GeneralRepository>) -> Result<Self> {
        let mut signals = Signals::new([SIGUSR1])?;
        let handle = signals.handle();
        let thread = thread::spawn(move || {
            for sig in signals.forever() {
                info!("received signal {}: {}", sig, repo.snapshot());
            }
        });
        Ok(StateDump { handle, thread })
    }

    pub fn close(self) {
        self.handle.close();
        if self.thread.join().is_err() {
            warn!("state dump thread panicked");
        }
    }
}
