//! Group entity - Represents one rotating savings circle.
//!
//! Each group has a target member count, a fixed monthly contribution amount,
//! and a start date from which the collection schedule is derived. The group
//! owns its members and its timeline entries.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Group database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "groups")]
pub struct Model {
    /// Unique identifier for the group
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name of the circle (e.g., "Market Women Circle")
    pub name: String,
    /// Target number of members; may exceed the number currently joined
    pub member_count: i32,
    /// Fixed monthly contribution per member, in whole currency units
    pub monthly_amount: i64,
    /// Date the first collection is due; later due dates are month offsets from it
    pub start_date: Date,
    /// When the group was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Group and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One group has many members
    #[sea_orm(has_many = "super::member::Entity")]
    Members,
    /// One group has many timeline entries
    #[sea_orm(has_many = "super::timeline_entry::Entity")]
    TimelineEntries,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl Related<super::timeline_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimelineEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
