//! Member entity - Represents one participant in a savings circle.
//!
//! Each member belongs to exactly one group and holds at most one rotation
//! position. Position 0 means "unassigned"; once assignment is complete the
//! non-zero positions within a group are unique.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Member database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "members")]
pub struct Model {
    /// Unique identifier for the member
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the group this member belongs to
    pub group_id: i64,
    /// Display name shown to other members
    pub display_name: String,
    /// Role within the group: `"owner"`, `"admin"`, or `"member"`
    pub role: String,
    /// Rotation position (1-based); 0 means no position assigned yet
    pub position: i32,
    /// Whether the member currently participates in the rotation
    pub is_active: bool,
    /// When the member joined the group
    pub joined_at: DateTimeUtc,
}

/// Defines relationships between Member and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each member belongs to one group
    #[sea_orm(
        belongs_to = "super::group::Entity",
        from = "Column::GroupId",
        to = "super::group::Column::Id"
    )]
    Group,
    /// One member has many timeline entries (at most one per cycle)
    #[sea_orm(has_many = "super::timeline_entry::Entity")]
    TimelineEntries,
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::timeline_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimelineEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
