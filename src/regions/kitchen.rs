//! The kitchen: the chef's preparation pipeline and the portion handoff.

use std::sync::Arc;

use log::{debug, trace};
use parking_lot::Mutex;

use crate::regions::bar::Bar;
use crate::repository::StateSink;
use crate::semaphore::Semaphore;
use crate::states::{ChefState, Transition, WaiterState};

struct KitchenState {
    courses_delivered: usize,
    portions_delivered: usize, // within the current course
}

pub struct Kitchen {
    students: usize,
    courses: usize,
    state: Mutex<KitchenState>,
    note_handed: Semaphore,
    portion_ready: Semaphore,
    portion_collected: Semaphore,
    bar: Arc<Bar>,
    sink: Arc<dyn StateSink>,
}

impl Kitchen {
    pub fn new(students: usize, courses: usize, bar: Arc<Bar>, sink: Arc<dyn StateSink>) -> Self {
        Kitchen {
            students,
            courses,
            state: Mutex::new(KitchenState {
                courses_delivered: 0,
                portions_delivered: 0,
            }),
            note_handed: Semaphore::binary(),
            portion_ready: Semaphore::binary(),
            portion_collected: Semaphore::binary(),
            bar,
            sink,
        }
    }

    fn chef(&self, state: ChefState) {
        self.sink.record(Transition::Chef(state));
    }

    /// Chef: wait for the order to arrive.
    pub fn watch_the_news(&self) {
        {
            let _state = self.state.lock();
            self.chef(ChefState::WaitingForAnOrder);
        }
        self.note_handed.acquire();
        debug!("kitchen: order received");
    }

    pub fn start_preparation(&self) {
        let _state = self.state.lock();
        self.chef(ChefState::PreparingTheCourse);
    }

    /// Chef: the course is ready to be dished; summon the waiter to collect it.
    pub fn proceed_to_presentation(&self) {
        {
            let mut state = self.state.lock();
            state.portions_delivered = 0;
            self.chef(ChefState::DishingThePortions);
        }
        self.bar.course_ready();
    }

    /// Chef: hand one portion over and wait until the waiter takes it.
    pub fn alert_the_waiter(&self) {
        {
            let mut state = self.state.lock();
            state.portions_delivered += 1;
            assert!(
                state.portions_delivered <= self.students,
                "protocol violation: more portions than students"
            );
            if state.portions_delivered == self.students {
                state.courses_delivered += 1;
            }
            self.chef(ChefState::DeliveringThePortions);
            trace!(
                "kitchen: portion {} of course {} ready",
                state.portions_delivered,
                state.courses_delivered + 1
            );
        }
        self.portion_ready.release();
        self.portion_collected.acquire();
    }

    pub fn have_all_portions_been_delivered(&self) -> bool {
        self.state.lock().portions_delivered == self.students
    }

    pub fn have_next_portion_ready(&self) {
        let _state = self.state.lock();
        self.chef(ChefState::DishingThePortions);
    }

    pub fn has_the_order_been_completed(&self) -> bool {
        self.state.lock().courses_delivered == self.courses
    }

    pub fn continue_preparation(&self) {
        let _state = self.state.lock();
        self.chef(ChefState::PreparingTheCourse);
    }

    pub fn clean_up(&self) {
        let _state = self.state.lock();
        self.chef(ChefState::ClosingService);
        debug!("kitchen: closed");
    }

    /// Waiter: pass the written order to the chef.
    pub fn hand_note_to_the_chef(&self) {
        {
            let _state = self.state.lock();
            self.sink
                .record(Transition::Waiter(WaiterState::PlacingTheOrder));
        }
        self.note_handed.release();
    }

    /// Waiter: take the next portion from the chef.
    pub fn collect_portion(&self) {
        {
            let _state = self.state.lock();
            self.sink
                .record(Transition::Waiter(WaiterState::WaitingForPortion));
        }
        self.portion_ready.acquire();
        self.portion_collected.release();
    }

    pub fn courses_delivered(&self) -> usize {
        self.state.lock().courses_delivered
    }
}
