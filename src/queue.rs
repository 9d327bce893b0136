use crossbeam_queue::ArrayQueue;

use crate::error::{RestaurantError, Result};
use crate::states::StudentId;

/// Bounded FIFO correlating "who arrived next" with "who is saluted next".
///
/// It never blocks: callers only pop when the surrounding semaphore protocol
/// guarantees an element is present.
pub struct OrderedQueue {
    buf: ArrayQueue<StudentId>,
}

impl OrderedQueue {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(RestaurantError::InvalidConfig {
                message: "arrival queue needs a positive capacity".to_string(),
            });
        }
        Ok(OrderedQueue {
            buf: ArrayQueue::new(capacity),
        })
    }

    pub fn push(&self, id: StudentId) -> Result<()> {
        self.buf.push(id).map_err(|_| RestaurantError::QueueFull {
            capacity: self.buf.capacity(),
        })
    }

    pub fn pop(&self) -> Result<StudentId> {
        self.buf.pop().ok_or(RestaurantError::QueueEmpty)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let q = OrderedQueue::new(3).unwrap();
        for id in [2, 0, 1] {
            q.push(id).unwrap();
        }
        assert_eq!(q.len(), 3);
        assert_eq!(q.pop().unwrap(), 2);
        assert_eq!(q.pop().unwrap(), 0);
        assert_eq!(q.pop().unwrap(), 1);
        assert!(q.is_empty());
    }

    #[test]
    fn test_overflow_is_an_error() {
        let q = OrderedQueue::new(1).unwrap();
        q.push(0).unwrap();
        assert!(matches!(
            q.push(1),
            Err(RestaurantError::QueueFull { capacity: 1 })
        ));
    }

    #[test]
    fn test_underflow_is_an_error() {
        let q = OrderedQueue::new(2).unwrap();
        assert!(matches!(q.pop(), Err(RestaurantError::QueueEmpty)));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(OrderedQueue::new(0).is_err());
    }
}
