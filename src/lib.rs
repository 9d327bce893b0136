//! A group of students, a waiter and a chef sharing a meal, coordinated only
//! through semaphores and a FIFO inside three shared regions: the table, the
//! bar and the kitchen.

pub mod agents;
pub mod config;
pub mod error;
pub mod logger;
pub mod mailbox;
pub mod queue;
pub mod regions;
pub mod repository;
pub mod semaphore;
pub mod signal;
pub mod simulation;
pub mod states;

pub use config::Config;
pub use error::{RestaurantError, Result};
pub use simulation::Restaurant;
