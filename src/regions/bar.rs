//! The bar: where the waiter idles until someone summons him.

use std::{fmt, sync::Arc};

use log::{debug, trace};
use parking_lot::Mutex;

use crate::mailbox::{mailbox, Receiver, Sender};
use crate::repository::StateSink;
use crate::semaphore::Semaphore;
use crate::states::{StudentId, Transition, WaiterState};

/// Reasons to summon the waiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    NewArrival,
    OrderReady,
    Collect,
    BillRequest,
    Farewell(StudentId),
    Shutdown,
}

impl Event {
    pub fn code(&self) -> char {
        match self {
            Event::NewArrival => 'N',
            Event::OrderReady => 'O',
            Event::Collect => 'C',
            Event::BillRequest => 'P',
            Event::Farewell(_) => 'G',
            Event::Shutdown => 'E',
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Farewell(id) => write!(f, "{}({})", self.code(), id),
            _ => write!(f, "{}", self.code()),
        }
    }
}

struct BarState {
    departures: usize,
    summons: usize,
}

pub struct Bar {
    students: usize,
    state: Mutex<BarState>,
    tx: Sender<Event>,
    rx: Receiver<Event>,
    course_requested: Semaphore, // the last student to finish a course calls for the next
    sink: Arc<dyn StateSink>,
}

impl Bar {
    pub fn new(students: usize, sink: Arc<dyn StateSink>) -> Self {
        let (tx, rx) = mailbox();
        Bar {
            students,
            state: Mutex::new(BarState {
                departures: 0,
                summons: 0,
            }),
            tx,
            rx,
            course_requested: Semaphore::binary(),
            sink,
        }
    }

    fn summon(&self, event: Event) {
        let permit = self.tx.reserve();
        let mut state = self.state.lock();
        state.summons += 1;
        trace!("bar: posting {}", event);
        permit.send(event);
    }

    /// Waiter: block until summoned and return the reason.
    pub fn look_around(&self) -> Event {
        let event = self.rx.recv();
        debug!("bar: waiter summoned for {}", event);
        event
    }

    /// Waiter: back to idling. Bookkeeping only.
    pub fn return_to_the_bar(&self) {
        let _state = self.state.lock();
        self.sink
            .record(Transition::Waiter(WaiterState::AppraisingTheSituation));
    }

    pub fn student_arrived(&self) {
        self.summon(Event::NewArrival);
    }

    /// Leader: the group's order is complete.
    pub fn call_the_waiter(&self) {
        self.summon(Event::OrderReady);
    }

    /// Kitchen: the portions of a course are being dished.
    pub fn course_ready(&self) {
        self.summon(Event::Collect);
    }

    /// Waiter, after serving a course that is not the last one: wait until
    /// the students have eaten it.
    pub fn wait_for_student_to_eat(&self) {
        {
            let _state = self.state.lock();
            self.sink
                .record(Transition::Waiter(WaiterState::AppraisingTheSituation));
        }
        self.course_requested.acquire();
    }

    /// Last student to finish a course: ask for the next one.
    pub fn signal_the_waiter(&self) {
        self.course_requested.release();
    }

    /// Straggler: ask for the bill.
    pub fn student_ready_to_pay(&self) {
        self.summon(Event::BillRequest);
    }

    pub fn prepare_the_bill(&self) {
        let _state = self.state.lock();
        self.sink
            .record(Transition::Waiter(WaiterState::ProcessingTheBill));
    }

    /// A student leaves. The last departure shuts the bar down instead.
    pub fn student_is_leaving(&self, id: StudentId) {
        // hold the slot while counting so the shutdown is the last post
        let permit = self.tx.reserve();
        let mut state = self.state.lock();
        state.departures += 1;
        assert!(
            state.departures <= self.students,
            "protocol violation: more departures than students"
        );
        state.summons += 1;
        let event = if state.departures == self.students {
            Event::Shutdown
        } else {
            Event::Farewell(id)
        };
        trace!("bar: posting {}", event);
        permit.send(event);
    }

    pub fn say_goodbye(&self, id: StudentId) {
        let _state = self.state.lock();
        debug!("bar: waiter says goodbye to student {}", id);
        self.sink
            .record(Transition::Waiter(WaiterState::AppraisingTheSituation));
    }

    pub fn departures(&self) -> usize {
        self.state.lock().departures
    }

    /// Number of events posted so far.
    pub fn summons(&self) -> usize {
        self.state.lock().summons
    }
}
