//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod group;
pub mod member;
pub mod timeline_entry;

// Re-export specific types to avoid conflicts
pub use group::{Column as GroupColumn, Entity as Group, Model as GroupModel};
pub use member::{Column as MemberColumn, Entity as Member, Model as MemberModel};
pub use timeline_entry::{
    Column as TimelineEntryColumn, Entity as TimelineEntry, Model as TimelineEntryModel,
};
