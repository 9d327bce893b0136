use parking_lot::{Condvar, Mutex};

// Counting semaphore built from a mutex-protected counter and a condition variable
pub struct Semaphore {
    permits: Mutex<usize>,
    cond: Condvar,
    limit: Option<usize>, // upper bound on permits, None for an unbounded counter
}

impl Semaphore {
    pub fn new(permits: usize) -> Self {
        Semaphore {
            permits: Mutex::new(permits),
            cond: Condvar::new(),
            limit: None,
        }
    }

    /// A gate that is either open (one permit) or closed.
    ///
    /// Releasing an open gate is a protocol violation and panics.
    pub fn binary() -> Self {
        Semaphore {
            permits: Mutex::new(0),
            cond: Condvar::new(),
            limit: Some(1),
        }
    }

    pub fn acquire(&self) {
        let mut permits = self.permits.lock();
        // spurious wakeups are possible, so re-check after every wait
        while *permits == 0 {
            self.cond.wait(&mut permits);
        }
        *permits -= 1;
    }

    pub fn release(&self) {
        let mut permits = self.permits.lock();
        if let Some(limit) = self.limit {
            assert!(
                *permits < limit,
                "protocol violation: gate released while already open"
            );
        }
        *permits += 1;
        self.cond.notify_one();
    }

    pub fn available(&self) -> usize {
        *self.permits.lock()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
        thread,
        time::Duration,
    };

    #[test]
    fn test_release_before_acquire() {
        let sem = Semaphore::new(0);
        sem.release();
        sem.release();
        assert_eq!(sem.available(), 2);
        sem.acquire();
        sem.acquire();
        assert_eq!(sem.available(), 0);
    }

    #[test]
    fn test_acquire_blocks_until_release() {
        let sem = Arc::new(Semaphore::new(0));
        let passed = Arc::new(AtomicUsize::new(0));

        let sem0 = sem.clone();
        let passed0 = passed.clone();
        let t = thread::spawn(move || {
            sem0.acquire();
            passed0.fetch_add(1, Ordering::SeqCst);
        });

        thread::sleep(Duration::from_millis(50));
        assert_eq!(passed.load(Ordering::SeqCst), 0);

        sem.release();
        t.join().unwrap();
        assert_eq!(passed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_one_wakeup_per_release() {
        const NUM_THREADS: usize = 8;
        const NUM_LOOP: usize = 1000;

        let sem = Arc::new(Semaphore::new(0));
        let mut v = Vec::new();

        for _ in 0..NUM_THREADS {
            let sem0 = sem.clone();
            v.push(thread::spawn(move || {
                for _ in 0..NUM_LOOP {
                    sem0.acquire();
                }
            }));
        }

        for _ in 0..NUM_THREADS * NUM_LOOP {
            sem.release();
        }

        for t in v {
            t.join().unwrap();
        }
        assert_eq!(sem.available(), 0);
    }

    #[test]
    fn test_binary_gate_cycles() {
        let gate = Semaphore::binary();
        for _ in 0..3 {
            gate.release();
            gate.acquire();
        }
        assert_eq!(gate.available(), 0);
    }

    #[test]
    #[should_panic(expected = "already open")]
    fn test_binary_gate_double_release() {
        let gate = Semaphore::binary();
        gate.release();
        gate.release();
    }
}
