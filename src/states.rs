//! State tags of every agent, used only for observability.

use std::fmt;

pub type StudentId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StudentState {
    GoingToTheRestaurant,
    TakingASeat,
    SelectingTheCourses,
    OrganizingTheOrder,
    ChattingWithCompanions,
    EnjoyingTheMeal,
    PayingTheBill,
    GoingHome,
}

impl StudentState {
    pub fn tag(&self) -> &'static str {
        match self {
            StudentState::GoingToTheRestaurant => "GGTRT",
            StudentState::TakingASeat => "TKSTT",
            StudentState::SelectingTheCourses => "SELCS",
            StudentState::OrganizingTheOrder => "OGODR",
            StudentState::ChattingWithCompanions => "CHTWC",
            StudentState::EnjoyingTheMeal => "EJYML",
            StudentState::PayingTheBill => "PYTBL",
            StudentState::GoingHome => "GGHOM",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaiterState {
    AppraisingTheSituation,
    PresentingTheMenu,
    TakingTheOrder,
    PlacingTheOrder,
    WaitingForPortion,
    ProcessingTheBill,
    ReceivingPayment,
}

impl WaiterState {
    pub fn tag(&self) -> &'static str {
        match self {
            WaiterState::AppraisingTheSituation => "APPST",
            WaiterState::PresentingTheMenu => "PRSMN",
            WaiterState::TakingTheOrder => "TKODR",
            WaiterState::PlacingTheOrder => "PCODR",
            WaiterState::WaitingForPortion => "WTFPT",
            WaiterState::ProcessingTheBill => "PRCBL",
            WaiterState::ReceivingPayment => "RECPM",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChefState {
    WaitingForAnOrder,
    PreparingTheCourse,
    DishingThePortions,
    DeliveringThePortions,
    ClosingService,
}

impl ChefState {
    pub fn tag(&self) -> &'static str {
        match self {
            ChefState::WaitingForAnOrder => "WAFOR",
            ChefState::PreparingTheCourse => "PRPCS",
            ChefState::DishingThePortions => "DSHPT",
            ChefState::DeliveringThePortions => "DLVPT",
            ChefState::ClosingService => "CLSSV",
        }
    }
}

/// One state change of one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Student { id: StudentId, state: StudentState },
    Waiter(WaiterState),
    Chef(ChefState),
}

impl Transition {
    pub fn student(id: StudentId, state: StudentState) -> Self {
        Transition::Student { id, state }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Student { id, state } => write!(f, "student {} -> {}", id, state.tag()),
            Transition::Waiter(state) => write!(f, "waiter -> {}", state.tag()),
            Transition::Chef(state) => write!(f, "chef -> {}", state.tag()),
        }
    }
}
