//! Core business logic - framework-agnostic scheduling operations.
//!
//! The scheduling math (position assignment, raffle shuffle, timeline
//! computation) lives in pure synchronous functions; the async functions in
//! these modules only load inputs from and persist results to the database.

/// Manual position assignment with swap semantics and validation
pub mod assignment;
/// Group and member management
pub mod group;
/// Read-only group summaries for consuming collaborators
pub mod overview;
/// Random position assignment with a preview-before-commit flow
pub mod raffle;
/// Collection schedule generation and status transitions
pub mod timeline;
