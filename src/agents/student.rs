use std::sync::Arc;

use log::info;

use crate::agents::Pace;
use crate::error::Result;
use crate::regions::{Bar, Table};
use crate::repository::StateSink;
use crate::states::{StudentId, StudentState, Transition};

pub struct Student {
    id: StudentId,
    courses: usize,
    table: Arc<Table>,
    bar: Arc<Bar>,
    sink: Arc<dyn StateSink>,
    pace: Pace,
}

impl Student {
    pub fn new(
        id: StudentId,
        courses: usize,
        table: Arc<Table>,
        bar: Arc<Bar>,
        sink: Arc<dyn StateSink>,
        pace: Pace,
    ) -> Self {
        Student {
            id,
            courses,
            table,
            bar,
            sink,
            pace,
        }
    }

    pub fn run(self) -> Result<()> {
        let id = self.id;
        let table = &self.table;

        self.sink
            .record(Transition::student(id, StudentState::GoingToTheRestaurant));
        self.pace.walk();

        let position = table.enter(id)?;
        table.read_the_menu(id)?;

        if position == 0 {
            info!("student {}: first to arrive, organizing the order", id);
            while !table.has_everybody_chosen() {
                table.prepare_the_order(id)?;
            }
            self.bar.call_the_waiter();
            table.describe_the_order(id)?;
            table.join_the_talk(id)?;
        } else {
            table.inform_companion(id)?;
        }

        for course in 1..=self.courses {
            table.start_eating(id)?;
            self.pace.eat();
            table.end_eating(id)?;

            if table.has_everybody_finished(id)? {
                if course == self.courses {
                    info!("student {}: last to arrive, paying the bill", id);
                    table.should_have_arrived_earlier(id)?;
                    table.honour_the_bill(id)?;
                } else {
                    table.signal_the_waiter(id)?;
                }
            }
        }

        table.exit(id)?;
        info!("student {}: going home", id);
        Ok(())
    }
}
