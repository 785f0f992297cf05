//! Session lifecycle: register, login, refresh, and logout.

pub mod service;

pub use service::{LoginOutcome, NewRegistration, SessionService};
