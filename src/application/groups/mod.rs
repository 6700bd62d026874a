//! Group use-cases
//!
//! - `service`: group registry (create/query/update/delete with cascade)
//! - `membership`: join/leave coordination
//! - `moderation`: admin approve/reject workflow
//! - `content`: message/material ledger

pub mod content;
pub mod membership;
pub mod moderation;
pub mod service;

pub use content::ContentService;
pub use membership::MembershipService;
pub use moderation::ModerationService;
pub use service::GroupService;
