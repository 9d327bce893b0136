use std::sync::Arc;

use log::info;

use crate::regions::Kitchen;

pub struct Chef {
    students: usize,
    courses: usize,
    kitchen: Arc<Kitchen>,
}

impl Chef {
    pub fn new(students: usize, courses: usize, kitchen: Arc<Kitchen>) -> Self {
        Chef {
            students,
            courses,
            kitchen,
        }
    }

    pub fn run(self) {
        let kit = &self.kitchen;
        kit.watch_the_news();
        kit.start_preparation();
        for course in 1..=self.courses {
            kit.proceed_to_presentation();
            for _ in 0..self.students {
                kit.alert_the_waiter();
                if !kit.have_all_portions_been_delivered() {
                    kit.have_next_portion_ready();
                }
            }
            info!("chef: course {} delivered", course);
            if !kit.has_the_order_been_completed() {
                kit.continue_preparation();
            }
        }
        kit.clean_up();
    }
}
