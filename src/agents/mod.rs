//! Life cycles of the three kinds of agents.

use std::{thread, time::Duration};

use rand::Rng;

pub mod chef;
pub mod student;
pub mod waiter;

pub use chef::Chef;
pub use student::Student;
pub use waiter::Waiter;

// Random delays standing in for walking and eating
#[derive(Debug, Clone, Copy, Default)]
pub struct Pace {
    pub max_walk: Duration,
    pub max_eat: Duration,
}

impl Pace {
    pub fn walk(&self) {
        pause(self.max_walk);
    }

    pub fn eat(&self) {
        pause(self.max_eat);
    }
}

fn pause(max: Duration) {
    let max = max.as_millis() as u64;
    if max == 0 {
        return;
    }
    let ms = rand::thread_rng().gen_range(0..=max);
    thread::sleep(Duration::from_millis(ms));
}
