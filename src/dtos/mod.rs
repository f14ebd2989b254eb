pub mod assignment;
pub mod driver;
pub mod timestamp;
pub mod truck;
pub mod user;

pub use assignment::{Assignment, AssignmentPatch, AssignmentPayload, AssignmentStatus};
pub use driver::{Driver, DriverPayload};
pub use truck::{Truck, TruckPayload, TruckStatus};
