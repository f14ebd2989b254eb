//! Store and form bindings for each backend collection.

mod assignment;
mod driver;
mod truck;
