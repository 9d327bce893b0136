//! Wires the three regions together and runs every agent on its own thread.

use std::{
    process,
    sync::Arc,
    thread::{self, JoinHandle},
};

use log::{error, info};

use crate::agents::{Chef, Pace, Student, Waiter};
use crate::config::Config;
use crate::error::Result;
use crate::regions::{Bar, Kitchen, Table};
use crate::repository::StateSink;
use crate::states::StudentId;

pub struct Restaurant {
    students: usize,
    courses: usize,
    pace: Pace,
    bar: Arc<Bar>,
    table: Arc<Table>,
    kitchen: Arc<Kitchen>,
    sink: Arc<dyn StateSink>,
}

impl Restaurant {
    pub fn new(config: &Config, sink: Arc<dyn StateSink>) -> Result<Self> {
        config.validate()?;
        let students = config.students;
        let courses = config.courses;

        let bar = Arc::new(Bar::new(students, sink.clone()));
        let table = Arc::new(Table::new(students, courses, bar.clone(), sink.clone())?);
        let kitchen = Arc::new(Kitchen::new(students, courses, bar.clone(), sink.clone()));

        Ok(Restaurant {
            students,
            courses,
            pace: config.pace(),
            bar,
            table,
            kitchen,
            sink,
        })
    }

    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    pub fn bar(&self) -> &Arc<Bar> {
        &self.bar
    }

    pub fn kitchen(&self) -> &Arc<Kitchen> {
        &self.kitchen
    }

    pub fn student(&self, id: StudentId) -> Student {
        Student::new(
            id,
            self.courses,
            self.table.clone(),
            self.bar.clone(),
            self.sink.clone(),
            self.pace,
        )
    }

    pub fn waiter(&self) -> Waiter {
        Waiter::new(self.bar.clone(), self.table.clone(), self.kitchen.clone())
    }

    pub fn chef(&self) -> Chef {
        Chef::new(self.students, self.courses, self.kitchen.clone())
    }

    /// Runs the whole meal and returns once every agent has finished.
    ///
    /// An agent hitting a configuration error aborts the process: the other
    /// agents would otherwise wait for it forever.
    pub fn run(&self) -> Result<()> {
        let mut students = Vec::with_capacity(self.students);
        for id in 0..self.students {
            let student = self.student(id);
            students.push(spawn(format!("student-{}", id), move || student.run())?);
            info!("student {} is starting", id);
        }
        let waiter = self.waiter();
        let waiter = spawn("waiter".to_string(), move || waiter.run())?;
        info!("waiter is starting");
        let chef = self.chef();
        let chef = spawn("chef".to_string(), move || {
            chef.run();
            Ok(())
        })?;
        info!("chef is starting");

        for (id, student) in students.into_iter().enumerate() {
            join(student);
            info!("student {} has ended", id);
        }
        join(chef);
        info!("chef has ended");
        join(waiter);
        info!("waiter has ended");
        Ok(())
    }
}

fn spawn<F>(name: String, agent: F) -> Result<JoinHandle<()>>
where
    F: FnOnce() -> Result<()> + Send + 'static,
{
    let handle = thread::Builder::new().name(name).spawn(move || {
        if let Err(err) = agent() {
            let name = thread::current().name().unwrap_or("agent").to_string();
            error!("{} failed: {}", name, err);
            process::exit(1);
        }
    })?;
    Ok(handle)
}

fn join(handle: JoinHandle<()>) {
    if handle.join().is_err() {
        error!("agent panicked, aborting the run");
        process::exit(1);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::repository::Recorder;
    use crate::states::{ChefState, StudentState, Transition, WaiterState};
    use std::time::Duration;

    fn quiet(students: usize, courses: usize) -> Config {
        Config {
            students,
            courses,
            max_walk: Duration::ZERO,
            max_eat: Duration::ZERO,
            ..Config::default()
        }
    }

    fn position(transitions: &[Transition], wanted: Transition) -> usize {
        transitions
            .iter()
            .position(|t| *t == wanted)
            .unwrap_or_else(|| panic!("{} never recorded", wanted))
    }

    fn students_in(transitions: &[Transition], wanted: StudentState) -> Vec<StudentId> {
        transitions
            .iter()
            .filter_map(|t| match t {
                Transition::Student { id, state } if *state == wanted => Some(*id),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_full_meal_various_sizes() {
        for (students, courses) in [(1, 1), (1, 3), (2, 1), (3, 2), (5, 3), (7, 3)] {
            let recorder = Arc::new(Recorder::new());
            let restaurant = Restaurant::new(&quiet(students, courses), recorder.clone()).unwrap();
            restaurant.run().unwrap();

            let transitions = recorder.transitions();
            let seated = students_in(&transitions, StudentState::TakingASeat);
            let saluted = students_in(&transitions, StudentState::SelectingTheCourses);
            assert_eq!(seated.len(), students);
            assert_eq!(saluted, seated);

            let table = restaurant.table();
            assert_eq!(table.leader(), seated.first().copied());
            assert_eq!(table.straggler(), seated.last().copied());
            assert_eq!(table.choices(), students - 1);
            assert_eq!(table.current_course(), courses);

            assert_eq!(
                students_in(&transitions, StudentState::EnjoyingTheMeal).len(),
                students * courses
            );
            assert_eq!(
                students_in(&transitions, StudentState::PayingTheBill),
                vec![seated[students - 1]]
            );
            assert_eq!(students_in(&transitions, StudentState::GoingHome).len(), students);
            assert_eq!(restaurant.kitchen().courses_delivered(), courses);
            assert_eq!(restaurant.bar().departures(), students);
        }
    }

    #[test]
    fn test_courses_do_not_overlap() {
        const STUDENTS: usize = 4;
        const COURSES: usize = 3;
        let recorder = Arc::new(Recorder::new());
        let restaurant = Restaurant::new(&quiet(STUDENTS, COURSES), recorder.clone()).unwrap();
        restaurant.run().unwrap();

        // every student eats course k before anyone starts course k + 1
        let eating = students_in(&recorder.transitions(), StudentState::EnjoyingTheMeal);
        for course in eating.chunks(STUDENTS) {
            let mut ids = course.to_vec();
            ids.sort_unstable();
            assert_eq!(ids, (0..STUDENTS).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_scripted_three_students_two_courses() {
        const ORDER: [StudentId; 3] = [2, 0, 1];
        let recorder = Arc::new(Recorder::new());
        let restaurant = Restaurant::new(&quiet(3, 2), recorder.clone()).unwrap();

        let waiter = restaurant.waiter();
        let waiter = thread::spawn(move || waiter.run().unwrap());
        let chef = restaurant.chef();
        let chef = thread::spawn(move || chef.run());

        // each student walks in once the previous one has sat down
        let mut students = Vec::new();
        for (i, &id) in ORDER.iter().enumerate() {
            let previous = if i == 0 { None } else { Some(ORDER[i - 1]) };
            let student = restaurant.student(id);
            let recorder0 = recorder.clone();
            students.push(thread::spawn(move || {
                if let Some(prev) = previous {
                    recorder0.wait_until(|r| {
                        r.contains(&Transition::student(prev, StudentState::TakingASeat))
                    });
                }
                student.run().unwrap();
            }));
        }
        for t in students {
            t.join().unwrap();
        }
        chef.join().unwrap();
        waiter.join().unwrap();

        let table = restaurant.table();
        assert_eq!(table.leader(), Some(2));
        assert_eq!(table.straggler(), Some(1));

        let transitions = recorder.transitions();
        assert_eq!(students_in(&transitions, StudentState::TakingASeat), ORDER);
        assert_eq!(students_in(&transitions, StudentState::SelectingTheCourses), ORDER);
        assert_eq!(students_in(&transitions, StudentState::OrganizingTheOrder), vec![2]);

        // both choices reach the leader before the waiter takes the order
        let pad = position(&transitions, Transition::Waiter(WaiterState::TakingTheOrder));
        for id in [0, 1] {
            let chose = Transition::student(id, StudentState::ChattingWithCompanions);
            assert!(position(&transitions, chose) < pad);
        }
        assert!(pad < position(&transitions, Transition::Chef(ChefState::PreparingTheCourse)));

        // two courses of three portions, the first fully eaten before the second
        let eating = students_in(&transitions, StudentState::EnjoyingTheMeal);
        assert_eq!(eating.len(), 6);
        for course in eating.chunks(3) {
            let mut ids = course.to_vec();
            ids.sort_unstable();
            assert_eq!(ids, vec![0, 1, 2]);
        }

        // only student 1 pays, and 0 and 2 leave after the payment was taken
        assert_eq!(students_in(&transitions, StudentState::PayingTheBill), vec![1]);
        let payment = position(&transitions, Transition::Waiter(WaiterState::ReceivingPayment));
        let paying = Transition::student(1, StudentState::PayingTheBill);
        assert!(position(&transitions, paying) < payment);
        for id in [0, 2] {
            let home = Transition::student(id, StudentState::GoingHome);
            assert!(payment < position(&transitions, home));
        }
    }

    #[test]
    fn test_waiter_stops_on_shutdown() {
        let recorder = Arc::new(Recorder::new());
        let restaurant = Restaurant::new(&quiet(2, 1), recorder).unwrap();
        let bar = restaurant.bar().clone();
        let waiter = restaurant.waiter();
        let t = thread::spawn(move || waiter.run().unwrap());

        bar.student_is_leaving(0);
        bar.student_is_leaving(1);
        t.join().unwrap();
        assert_eq!(bar.departures(), 2);
        assert_eq!(bar.summons(), 2);
    }

    #[test]
    fn test_invalid_config() {
        let recorder = Arc::new(Recorder::new());
        assert!(Restaurant::new(&quiet(0, 1), recorder.clone()).is_err());
        assert!(Restaurant::new(&quiet(1, 0), recorder).is_err());
    }
}
