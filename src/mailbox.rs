use std::sync::Arc;

use parking_lot::Mutex;

use crate::semaphore::Semaphore;

// Shared half of a single-slot mailbox
struct Slot<T> {
    free: Semaphore,     // one permit while the slot is empty
    filled: Semaphore,   // one permit while an item waits to be collected
    item: Mutex<Option<T>>,
}

impl<T> Slot<T> {
    fn store(&self, item: T) {
        let mut slot = self.item.lock();
        assert!(
            slot.is_none(),
            "protocol violation: item posted while a previous one is unconsumed"
        );
        *slot = Some(item);
    }

    fn take(&self) -> T {
        let mut slot = self.item.lock();
        match slot.take() {
            Some(item) => item,
            None => panic!("protocol violation: summoned with an empty slot"),
        }
    }
}

pub struct Sender<T> {
    slot: Arc<Slot<T>>,
}

impl<T> Clone for Sender<T> {
    fn clone(&self) -> Self {
        Sender {
            slot: self.slot.clone(),
        }
    }
}

impl<T: Send> Sender<T> {
    /// Blocks until the slot is empty, then posts `item`.
    pub fn send(&self, item: T) {
        self.reserve().send(item);
    }

    /// Blocks until the slot is empty and holds it for the returned permit.
    ///
    /// The item may then be computed while the caller holds its own lock,
    /// so that the order of posts matches the order of decisions.
    pub fn reserve(&self) -> Permit<'_, T> {
        self.slot.free.acquire();
        Permit {
            slot: &*self.slot,
            sent: false,
        }
    }
}

pub struct Permit<'a, T> {
    slot: &'a Slot<T>,
    sent: bool,
}

impl<T> Permit<'_, T> {
    pub fn send(mut self, item: T) {
        self.slot.store(item);
        self.sent = true;
        self.slot.filled.release();
    }
}

impl<T> Drop for Permit<'_, T> {
    fn drop(&mut self) {
        // an unused reservation gives the slot back
        if !self.sent {
            self.slot.free.release();
        }
    }
}

pub struct Receiver<T> {
    slot: Arc<Slot<T>>,
}

impl<T> Receiver<T> {
    /// Blocks until an item is posted, then empties the slot.
    pub fn recv(&self) -> T {
        self.slot.filled.acquire();
        let item = self.slot.take();
        self.slot.free.release();
        item
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.slot.item.lock().is_some()
    }
}

pub fn mailbox<T>() -> (Sender<T>, Receiver<T>) {
    let slot = Arc::new(Slot {
        free: Semaphore::binary(),
        filled: Semaphore::binary(),
        item: Mutex::new(None),
    });
    slot.free.release();
    let tx = Sender { slot: slot.clone() };
    let rx = Receiver { slot };
    (tx, rx)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::{
        sync::atomic::{AtomicBool, Ordering},
        thread,
        time::Duration,
    };

    #[test]
    fn test_send_then_recv() {
        let (tx, rx) = mailbox();
        tx.send(7);
        assert!(rx.is_pending());
        assert_eq!(rx.recv(), 7);
        assert!(!rx.is_pending());
    }

    #[test]
    fn test_second_send_waits_for_collection() {
        let (tx, rx) = mailbox();
        tx.send(1);

        let posted = Arc::new(AtomicBool::new(false));
        let posted0 = posted.clone();
        let tx0 = tx.clone();
        let t = thread::spawn(move || {
            tx0.send(2);
            posted0.store(true, Ordering::SeqCst);
        });

        thread::sleep(Duration::from_millis(50));
        assert!(!posted.load(Ordering::SeqCst));

        assert_eq!(rx.recv(), 1);
        t.join().unwrap();
        assert!(posted.load(Ordering::SeqCst));
        assert_eq!(rx.recv(), 2);
    }

    #[test]
    fn test_dropped_permit_frees_the_slot() {
        let (tx, rx) = mailbox();
        drop(tx.reserve());
        tx.send("after");
        assert_eq!(rx.recv(), "after");
    }

    #[test]
    #[should_panic(expected = "unconsumed")]
    fn test_overwrite_is_a_violation() {
        let (tx, _rx) = mailbox::<u8>();
        tx.slot.store(1);
        tx.slot.store(2);
    }
}
