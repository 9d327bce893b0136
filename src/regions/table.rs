//! The table: arrival ordering, the group order, per-course eating barrier
//! and the billing handshake.
//!
//! Every operation takes the calling student's id explicitly. Operations
//! release the table lock before blocking on any gate or calling into the
//! bar.

use std::sync::{Arc, OnceLock};

use log::{debug, trace};
use parking_lot::Mutex;

use crate::error::{RestaurantError, Result};
use crate::queue::OrderedQueue;
use crate::regions::bar::Bar;
use crate::repository::StateSink;
use crate::semaphore::Semaphore;
use crate::states::{StudentId, StudentState, Transition, WaiterState};

/// Outcome of the waiter's check after delivering a portion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// Some students still have no portion of the current course.
    InProgress,
    /// Everyone was served a course that is not the last one.
    CourseServed,
    /// Everyone was served the last course.
    MealServed,
}

struct TableState {
    seated: usize,
    chose: usize,
    finished: usize,
    course: usize,
    portions_served: usize,
    leader_organizing: bool,
}

pub struct Table {
    students: usize,
    courses: usize,
    state: Mutex<TableState>,
    arrivals: OrderedQueue,
    // written once during enter, read-only afterwards
    leader: OnceLock<StudentId>,
    straggler: OnceLock<StudentId>,

    saluted: Vec<Semaphore>,
    served: Vec<Semaphore>,
    menu_read: Semaphore,
    course_chosen: Semaphore,
    choice_acknowledged: Semaphore,
    pad_ready: Semaphore,
    order_described: Semaphore,
    bill_presented: Semaphore,
    bill_paid: Semaphore,
    payment_confirmed: Semaphore,

    bar: Arc<Bar>,
    sink: Arc<dyn StateSink>,
}

impl Table {
    pub fn new(
        students: usize,
        courses: usize,
        bar: Arc<Bar>,
        sink: Arc<dyn StateSink>,
    ) -> Result<Self> {
        if courses == 0 {
            return Err(RestaurantError::InvalidConfig {
                message: "a meal needs at least one course".to_string(),
            });
        }
        Ok(Table {
            students,
            courses,
            state: Mutex::new(TableState {
                seated: 0,
                chose: 0,
                finished: 0,
                course: 1,
                portions_served: 0,
                leader_organizing: false,
            }),
            arrivals: OrderedQueue::new(students)?,
            leader: OnceLock::new(),
            straggler: OnceLock::new(),
            saluted: (0..students).map(|_| Semaphore::binary()).collect(),
            served: (0..students).map(|_| Semaphore::binary()).collect(),
            menu_read: Semaphore::binary(),
            course_chosen: Semaphore::new(0),
            choice_acknowledged: Semaphore::new(0),
            pad_ready: Semaphore::binary(),
            order_described: Semaphore::binary(),
            bill_presented: Semaphore::binary(),
            bill_paid: Semaphore::binary(),
            payment_confirmed: Semaphore::binary(),
            bar,
            sink,
        })
    }

    fn check(&self, id: StudentId) -> Result<()> {
        if id < self.students {
            Ok(())
        } else {
            Err(RestaurantError::UnknownStudent {
                id,
                students: self.students,
            })
        }
    }

    fn student(&self, id: StudentId, state: StudentState) {
        self.sink.record(Transition::student(id, state));
    }

    fn waiter(&self, state: WaiterState) {
        self.sink.record(Transition::Waiter(state));
    }

    /// First student to sit down.
    pub fn leader(&self) -> Option<StudentId> {
        self.leader.get().copied()
    }

    /// Last student to sit down.
    pub fn straggler(&self) -> Option<StudentId> {
        self.straggler.get().copied()
    }

    pub fn current_course(&self) -> usize {
        self.state.lock().course
    }

    pub fn choices(&self) -> usize {
        self.state.lock().chose
    }

    /// Student: sit down and wait for the waiter's salute.
    ///
    /// Returns the arrival position; 0 is the leader.
    pub fn enter(&self, id: StudentId) -> Result<usize> {
        self.check(id)?;
        let position = {
            let mut state = self.state.lock();
            if state.seated == self.students {
                return Err(RestaurantError::InvalidConfig {
                    message: format!("student {} arrived at a full table", id),
                });
            }
            self.student(id, StudentState::TakingASeat);
            let position = state.seated;
            state.seated += 1;
            self.arrivals.push(id)?;
            if position == 0 {
                let _ = self.leader.set(id);
            }
            if position == self.students - 1 {
                let _ = self.straggler.set(id);
            }
            position
        };
        debug!("table: student {} seated at position {}", id, position);

        self.bar.student_arrived();
        self.saluted[id].acquire();
        Ok(position)
    }

    /// Waiter: salute the next student in arrival order and wait until the
    /// student reads the menu.
    pub fn salute_the_client(&self) -> Result<StudentId> {
        let id = {
            let _state = self.state.lock();
            self.waiter(WaiterState::PresentingTheMenu);
            let id = self.arrivals.pop()?;
            self.saluted[id].release();
            id
        };
        trace!("table: waiter saluted student {}", id);
        self.menu_read.acquire();
        Ok(id)
    }

    pub fn read_the_menu(&self, id: StudentId) -> Result<()> {
        self.check(id)?;
        let _state = self.state.lock();
        self.student(id, StudentState::SelectingTheCourses);
        self.menu_read.release();
        Ok(())
    }

    /// Leader: take one companion's choice.
    pub fn prepare_the_order(&self, id: StudentId) -> Result<()> {
        self.check(id)?;
        {
            let mut state = self.state.lock();
            if !state.leader_organizing {
                state.leader_organizing = true;
                self.student(id, StudentState::OrganizingTheOrder);
            }
        }

        self.course_chosen.acquire();

        let mut state = self.state.lock();
        state.chose += 1;
        assert!(
            state.chose < self.students,
            "protocol violation: more choices than companions"
        );
        trace!("table: leader received choice {}", state.chose);
        self.choice_acknowledged.release();
        Ok(())
    }

    /// Follower: tell the leader what to order, then wait for food.
    pub fn inform_companion(&self, id: StudentId) -> Result<()> {
        self.check(id)?;
        {
            let _state = self.state.lock();
            self.course_chosen.release();
            self.student(id, StudentState::ChattingWithCompanions);
        }
        self.choice_acknowledged.acquire();
        self.served[id].acquire();
        Ok(())
    }

    pub fn has_everybody_chosen(&self) -> bool {
        self.state.lock().chose == self.students - 1
    }

    /// Waiter: ready to write; wait until the leader describes the order.
    pub fn get_the_pad(&self) {
        {
            let _state = self.state.lock();
            self.waiter(WaiterState::TakingTheOrder);
            self.pad_ready.release();
        }
        self.order_described.acquire();
    }

    /// Leader: wait for the waiter's pad and describe the order.
    pub fn describe_the_order(&self, id: StudentId) -> Result<()> {
        self.check(id)?;
        self.pad_ready.acquire();
        let _state = self.state.lock();
        debug!("table: student {} described the order", id);
        self.order_described.release();
        Ok(())
    }

    /// Leader: back to the conversation, then wait for food.
    pub fn join_the_talk(&self, id: StudentId) -> Result<()> {
        self.check(id)?;
        {
            let _state = self.state.lock();
            self.student(id, StudentState::ChattingWithCompanions);
        }
        self.served[id].acquire();
        Ok(())
    }

    /// Waiter: one more portion of the current course is on the table.
    pub fn deliver_portion(&self) {
        let mut state = self.state.lock();
        state.portions_served += 1;
        assert!(
            state.portions_served <= self.students,
            "protocol violation: more portions than students"
        );
    }

    /// Waiter: once every student has a portion, release them all at once.
    pub fn have_all_clients_been_served(&self) -> Service {
        let mut state = self.state.lock();
        if state.portions_served < self.students {
            return Service::InProgress;
        }

        state.portions_served = 0;
        for gate in &self.served {
            gate.release();
        }
        debug!("table: course {} served", state.course);
        if state.course == self.courses {
            Service::MealServed
        } else {
            Service::CourseServed
        }
    }

    pub fn start_eating(&self, id: StudentId) -> Result<()> {
        self.check(id)?;
        let _state = self.state.lock();
        self.student(id, StudentState::EnjoyingTheMeal);
        Ok(())
    }

    pub fn end_eating(&self, id: StudentId) -> Result<()> {
        self.check(id)?;
        let _state = self.state.lock();
        self.student(id, StudentState::ChattingWithCompanions);
        Ok(())
    }

    /// Student: count this student as finished with the current course.
    ///
    /// Returns `true` to the one student who must act next: on a middle
    /// course the last to finish (who then calls `signal_the_waiter`), on the
    /// last course the straggler (who then pays). Every other caller blocks
    /// until served again or until the bill is paid, and gets `false`.
    pub fn has_everybody_finished(&self, id: StudentId) -> Result<bool> {
        self.check(id)?;
        let (all, course) = {
            let mut state = self.state.lock();
            state.finished += 1;
            let all = state.finished == self.students;
            if all {
                state.finished = 0;
            }
            (all, state.course)
        };

        if course < self.courses {
            if !all {
                self.served[id].acquire();
            }
            return Ok(all);
        }

        let straggler = self.straggler_of_the_meal();
        if id == straggler {
            if !all {
                // woken by the last companion to finish
                self.served[id].acquire();
            }
            return Ok(true);
        }

        if all {
            self.served[straggler].release();
        }
        self.served[id].acquire();
        Ok(false)
    }

    fn straggler_of_the_meal(&self) -> StudentId {
        match self.straggler() {
            Some(id) => id,
            None => panic!("protocol violation: meal finished before everyone sat down"),
        }
    }

    /// Last student to finish a middle course: move on to the next course
    /// and wait for it.
    pub fn signal_the_waiter(&self, id: StudentId) -> Result<()> {
        self.check(id)?;
        {
            let mut state = self.state.lock();
            assert!(
                state.course < self.courses,
                "protocol violation: no course after the last one"
            );
            state.course += 1;
            debug!("table: student {} asks for course {}", id, state.course);
        }
        self.bar.signal_the_waiter();
        self.served[id].acquire();
        Ok(())
    }

    /// Straggler: call for the bill and wait for it.
    pub fn should_have_arrived_earlier(&self, id: StudentId) -> Result<()> {
        self.check(id)?;
        assert_eq!(
            Some(id),
            self.straggler(),
            "protocol violation: only the last student to arrive pays"
        );
        {
            let _state = self.state.lock();
            self.student(id, StudentState::PayingTheBill);
        }
        self.bar.student_ready_to_pay();
        self.bill_presented.acquire();
        Ok(())
    }

    /// Waiter: hand over the bill, take the payment and confirm it.
    pub fn present_the_bill(&self) {
        {
            let _state = self.state.lock();
            self.bill_presented.release();
            self.waiter(WaiterState::ReceivingPayment);
        }
        self.bill_paid.acquire();
        let _state = self.state.lock();
        self.payment_confirmed.release();
    }

    /// Straggler: pay, wait for the waiter's confirmation, then let the
    /// companions go.
    pub fn honour_the_bill(&self, id: StudentId) -> Result<()> {
        self.check(id)?;
        {
            let _state = self.state.lock();
            self.bill_paid.release();
        }
        self.payment_confirmed.acquire();

        let _state = self.state.lock();
        for (other, gate) in self.served.iter().enumerate() {
            if other != id {
                gate.release();
            }
        }
        debug!("table: bill paid by student {}", id);
        Ok(())
    }

    pub fn exit(&self, id: StudentId) -> Result<()> {
        self.check(id)?;
        {
            let _state = self.state.lock();
            self.student(id, StudentState::GoingHome);
        }
        self.bar.student_is_leaving(id);
        Ok(())
    }
}
