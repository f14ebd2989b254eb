//! GlobeTrans fleet client
//!
//! Keeps local lists of drivers, trucks and assignments in step with the
//! GlobeTrans backend, drives the create/edit forms for them, and tracks the
//! signed-in role across every open session.

pub mod client;
pub mod config;
pub mod dtos;
pub mod error;
pub mod form;
pub mod nav;
pub mod resources;
pub mod session;
pub mod store;

pub use client::HttpClient;
pub use config::ClientConfig;
pub use error::{ApiError, ErrorKind};
pub use form::{Editable, FormSession, Mode};
pub use session::{LocalStorage, Role, SessionContext};
pub use store::{Resource, ResourceStore, UpdateVerb};
