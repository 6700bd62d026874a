//! Group entity for database

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Moderation status
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum GroupStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl Default for GroupStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Group model. The member list and the embedded message/material ledgers
/// are JSON columns owned exclusively by this row, mirroring the document
/// shape of the aggregate.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "groups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub subject: String,
    pub description: String,
    pub image: String,
    pub creator: String,
    #[sea_orm(column_type = "Json")]
    pub members: Json,
    pub max_members: i32,
    pub status: GroupStatus,
    pub created_at: DateTime<Utc>,
    #[sea_orm(column_type = "Json")]
    pub messages: Json,
    #[sea_orm(column_type = "Json")]
    pub materials: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
