//! Database entities module

pub mod group;
pub mod user;

pub use group::Entity as Group;
pub use user::Entity as User;
