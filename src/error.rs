//! Errors that abort a run.
//!
//! Protocol violations are not represented here: they are logic defects and
//! panic at the point of detection.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RestaurantError {
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
    #[error("arrival queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },
    #[error("arrival queue is empty")]
    QueueEmpty,
    #[error("unknown student {id} (population is {students})")]
    UnknownStudent { id: usize, students: usize },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RestaurantError>;
