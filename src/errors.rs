//! Unified error types for the crate.
//!
//! Every fallible operation returns [`Result`]. All scheduling-level
//! conditions (incomplete assignments, duplicate positions, bad status
//! transitions) are recoverable and caller-visible; nothing in this crate
//! treats them as fatal.

use chrono::NaiveDate;
use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading or validation failed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong
        message: String,
    },

    /// A group lookup found nothing
    #[error("Group not found: {id}")]
    GroupNotFound {
        /// The group id or name that was looked up
        id: String,
    },

    /// A member lookup found nothing, or the member belongs to another group
    #[error("Member not found: {id}")]
    MemberNotFound {
        /// The member id that was looked up
        id: i64,
    },

    /// Some members still have no rotation position
    #[error("Incomplete assignment: {unassigned} member(s) without a position")]
    IncompleteAssignment {
        /// How many members are still unassigned
        unassigned: usize,
    },

    /// Two members hold the same rotation position
    #[error("Duplicate position: {position} is held by more than one member")]
    DuplicatePosition {
        /// The repeated position value
        position: u32,
    },

    /// A group was created or validated with a non-positive target size
    #[error("Invalid member count: {count} (must be at least 1)")]
    InvalidMemberCount {
        /// The offending member count
        count: i32,
    },

    /// A raffle or auto-assignment was requested over zero members
    #[error("Cannot assign positions: the member list is empty")]
    EmptyMemberList,

    /// A manual assignment targeted a position outside the group's range
    #[error("Position {position} is out of range 1..={member_count}")]
    PositionOutOfRange {
        /// The requested position
        position: u32,
        /// The group's target member count
        member_count: u32,
    },

    /// No timeline entry exists at the given position for the group
    #[error("No timeline entry at position {position} for group {group_id}")]
    EntryNotFound {
        /// The group id
        group_id: i64,
        /// The requested position
        position: u32,
    },

    /// A status change was requested that would move a timeline entry backwards
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStatusTransition {
        /// The entry's current status
        from: String,
        /// The requested status
        to: String,
    },

    /// A collection was recorded with a date in the future
    #[error("Invalid collection date: {date} is in the future")]
    InvalidCollectionDate {
        /// The rejected date
        date: NaiveDate,
    },

    /// Database error from the `SeaORM` layer
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
