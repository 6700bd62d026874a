//! Identity and user-directory use-cases

pub mod service;

pub use service::{AuthResult, UserService};
