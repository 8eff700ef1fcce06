//! Timeline entry entity - One scheduled collection in a group's cycle.
//!
//! Exactly one entry exists per assigned position. Entries are created in
//! bulk when an assignment is finalized and regenerated from scratch when it
//! changes. `status` is `"upcoming"`, `"current"`, or `"completed"` and only
//! ever moves forward.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Timeline entry database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "timeline_entries")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the group this entry belongs to
    pub group_id: i64,
    /// Rotation position this entry covers (1-based)
    pub position: i32,
    /// ID of the member collecting at this position
    pub member_id: i64,
    /// Date the collection is due
    pub due_date: Date,
    /// Full pool amount collected: monthly amount times member count
    pub amount: i64,
    /// Entry status: `"upcoming"`, `"current"`, or `"completed"`
    pub status: String,
    /// Date the pool was actually collected, once completed
    pub collected_on: Option<Date>,
}

/// Defines relationships between `TimelineEntry` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to one group
    #[sea_orm(
        belongs_to = "super::group::Entity",
        from = "Column::GroupId",
        to = "super::group::Column::Id"
    )]
    Group,
    /// Each entry names the member collecting at its position
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
        to = "super::member::Column::Id"
    )]
    Member,
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
