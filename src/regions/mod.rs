pub mod bar;
pub mod kitchen;
pub mod table;

pub use bar::{Bar, Event};
pub use kitchen::Kitchen;
pub use table::{Service, Table};
