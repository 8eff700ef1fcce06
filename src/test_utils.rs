//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test groups and members with sensible defaults.

use crate::{
    core::group::{self, MemberRole},
    entities::member,
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, Set, prelude::*};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Default start date used by test groups: 2024-01-15.
#[must_use]
pub fn test_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap_or_default()
}

/// Creates a test group with sensible defaults.
///
/// # Defaults
/// * `monthly_amount`: 50000
/// * `start_date`: 2024-01-15
pub async fn create_test_group(
    db: &DatabaseConnection,
    name: &str,
    member_count: i32,
) -> Result<crate::entities::group::Model> {
    group::create_group(db, name.to_string(), member_count, 50_000, test_start_date()).await
}

/// Sets up a database with one empty test group of the given target size.
pub async fn setup_with_group(
    member_count: i32,
) -> Result<(DatabaseConnection, crate::entities::group::Model)> {
    let db = setup_test_db().await?;
    let group = create_test_group(&db, "Test Circle", member_count).await?;
    Ok((db, group))
}

/// Sets up a group with `count` active members, none holding a position yet.
/// Member names are "Member 1" through "Member N"; the first is the owner.
pub async fn setup_with_unassigned_members(
    count: i32,
) -> Result<(
    DatabaseConnection,
    crate::entities::group::Model,
    Vec<member::Model>,
)> {
    let (db, test_group) = setup_with_group(count).await?;

    let mut members = Vec::new();
    for index in 1..=count {
        let role = if index == 1 {
            MemberRole::Owner
        } else {
            MemberRole::Member
        };
        let m = group::add_member(&db, test_group.id, format!("Member {index}"), role).await?;
        members.push(m);
    }

    Ok((db, test_group, members))
}

/// Sets up a group with `count` members already assigned positions 1..=count
/// in join order.
pub async fn setup_with_members(
    count: i32,
) -> Result<(
    DatabaseConnection,
    crate::entities::group::Model,
    Vec<member::Model>,
)> {
    let (db, test_group, members) = setup_with_unassigned_members(count).await?;

    let mut assigned = Vec::new();
    for (index, m) in members.into_iter().enumerate() {
        let mut active_model: member::ActiveModel = m.into();
        active_model.position = Set(i32::try_from(index).unwrap_or(0) + 1);
        assigned.push(active_model.update(&db).await?);
    }

    Ok((db, test_group, assigned))
}

/// Builds a detached member model for pure in-memory tests (no database row).
#[must_use]
pub fn test_member_model(id: i64, group_id: i64, position: i32) -> member::Model {
    member::Model {
        id,
        group_id,
        display_name: format!("Member {id}"),
        role: MemberRole::Member.as_str().to_string(),
        position,
        is_active: true,
        joined_at: chrono::Utc::now(),
    }
}
