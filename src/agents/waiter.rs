use std::sync::Arc;

use log::{debug, info};

use crate::error::Result;
use crate::regions::{Bar, Event, Kitchen, Service, Table};

pub struct Waiter {
    bar: Arc<Bar>,
    table: Arc<Table>,
    kitchen: Arc<Kitchen>,
}

impl Waiter {
    pub fn new(bar: Arc<Bar>, table: Arc<Table>, kitchen: Arc<Kitchen>) -> Self {
        Waiter {
            bar,
            table,
            kitchen,
        }
    }

    pub fn run(self) -> Result<()> {
        loop {
            let event = self.bar.look_around();
            match event {
                Event::NewArrival => {
                    let id = self.table.salute_the_client()?;
                    debug!("waiter: saluted student {}", id);
                }
                Event::OrderReady => {
                    self.table.get_the_pad();
                    self.kitchen.hand_note_to_the_chef();
                }
                Event::Collect => self.serve_course(),
                Event::BillRequest => {
                    self.bar.prepare_the_bill();
                    self.table.present_the_bill();
                }
                Event::Farewell(id) => {
                    self.bar.say_goodbye(id);
                    // farewells come back to back; no idle step between them
                    continue;
                }
                Event::Shutdown => break,
            }
            self.bar.return_to_the_bar();
        }
        info!("waiter: last student left, closing");
        Ok(())
    }

    fn serve_course(&self) {
        let status = loop {
            self.kitchen.collect_portion();
            self.table.deliver_portion();
            match self.table.have_all_clients_been_served() {
                Service::InProgress => continue,
                status => break status,
            }
        };
        if status == Service::CourseServed {
            self.bar.wait_for_student_to_eat();
        }
    }
}
