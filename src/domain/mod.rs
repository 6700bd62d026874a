//! Domain layer
//!
//! Entities, invariants, typed errors and the identity context every command
//! is invoked with.

pub mod error;
pub mod group;
pub mod identity;
pub mod user;

pub use error::{DomainError, DomainResult};
pub use group::{
    CreateGroupDto, Group, GroupStatus, Material, Message, ModerationNotice, UpdateGroupDto,
};
pub use identity::Identity;
pub use user::{CreateUserDto, UpdateProfileDto, User, UserRole};
