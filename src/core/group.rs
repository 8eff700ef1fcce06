//! Group and member management - Handles circle and membership operations.
//!
//! Provides functions for creating groups, adding and deactivating members,
//! and seeding groups from configuration. Position assignment itself lives in
//! [`crate::core::assignment`] and [`crate::core::raffle`]; this module only
//! manages the aggregates those operate on.

use crate::{
    config::groups::GroupConfig,
    entities::{Group, Member, group, member},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Role a member holds within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRole {
    /// Created the group; exactly one per group
    Owner,
    /// May run raffles and manage positions
    Admin,
    /// Regular participant
    Member,
}

impl MemberRole {
    /// String form stored in the `role` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }

    /// Parses the stored string form back into a role.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            other => Err(Error::Config {
                message: format!("Unknown member role: {other}"),
            }),
        }
    }
}

/// Creates a new savings circle, performing input validation.
///
/// The name must be non-empty, the target member count at least 1, and the
/// monthly contribution positive. The group starts with no members.
pub async fn create_group(
    db: &DatabaseConnection,
    name: String,
    member_count: i32,
    monthly_amount: i64,
    start_date: NaiveDate,
) -> Result<group::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Group name cannot be empty".to_string(),
        });
    }

    if member_count < 1 {
        return Err(Error::InvalidMemberCount {
            count: member_count,
        });
    }

    if monthly_amount < 1 {
        return Err(Error::Config {
            message: format!("Monthly amount must be positive, got {monthly_amount}"),
        });
    }

    let group = group::ActiveModel {
        name: Set(name.trim().to_string()),
        member_count: Set(member_count),
        monthly_amount: Set(monthly_amount),
        start_date: Set(start_date),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let result = group.insert(db).await?;
    Ok(result)
}

/// Finds a group by its unique ID.
pub async fn get_group_by_id(
    db: &DatabaseConnection,
    group_id: i64,
) -> Result<Option<group::Model>> {
    Group::find_by_id(group_id).one(db).await.map_err(Into::into)
}

/// Finds a group by name, returning None if no group with that name exists.
pub async fn get_group_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<group::Model>> {
    Group::find()
        .filter(group::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Adds a member to a group, unassigned and active.
///
/// Fails if the group does not exist or already has `member_count` active
/// members. The new member joins with position 0; a later manual assignment
/// or raffle gives them a rotation slot.
pub async fn add_member(
    db: &DatabaseConnection,
    group_id: i64,
    display_name: String,
    role: MemberRole,
) -> Result<member::Model> {
    if display_name.trim().is_empty() {
        return Err(Error::Config {
            message: "Member name cannot be empty".to_string(),
        });
    }

    let group = get_group_by_id(db, group_id)
        .await?
        .ok_or_else(|| Error::GroupNotFound {
            id: group_id.to_string(),
        })?;

    let joined = Member::find()
        .filter(member::Column::GroupId.eq(group_id))
        .filter(member::Column::IsActive.eq(true))
        .count(db)
        .await?;

    if i64::try_from(joined).unwrap_or(i64::MAX) >= i64::from(group.member_count) {
        return Err(Error::Config {
            message: format!(
                "Group '{}' is full ({} of {} members joined)",
                group.name, joined, group.member_count
            ),
        });
    }

    let new_member = member::ActiveModel {
        group_id: Set(group_id),
        display_name: Set(display_name.trim().to_string()),
        role: Set(role.as_str().to_string()),
        position: Set(0),
        is_active: Set(true),
        joined_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let result = new_member.insert(db).await?;
    Ok(result)
}

/// Retrieves a group's active members in join order.
///
/// This ordering is what makes `auto_assign_remaining` deterministic: members
/// are always iterated oldest-join first, with the id as a tiebreaker.
pub async fn get_active_members(
    db: &DatabaseConnection,
    group_id: i64,
) -> Result<Vec<member::Model>> {
    Member::find()
        .filter(member::Column::GroupId.eq(group_id))
        .filter(member::Column::IsActive.eq(true))
        .order_by_asc(member::Column::JoinedAt)
        .order_by_asc(member::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a member by its unique ID.
pub async fn get_member_by_id(
    db: &DatabaseConnection,
    member_id: i64,
) -> Result<Option<member::Model>> {
    Member::find_by_id(member_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Deactivates a member, removing them from the rotation.
///
/// Their position is cleared at the same time so the remaining assignment can
/// be revalidated and reassigned; any timeline regeneration afterwards is the
/// caller's explicit decision.
pub async fn deactivate_member(db: &DatabaseConnection, member_id: i64) -> Result<member::Model> {
    let existing = get_member_by_id(db, member_id)
        .await?
        .ok_or(Error::MemberNotFound { id: member_id })?;

    let mut active_model: member::ActiveModel = existing.into();
    active_model.is_active = Set(false);
    active_model.position = Set(0);
    active_model.update(db).await.map_err(Into::into)
}

/// Seeds groups and their members from configuration.
///
/// Idempotent: a configured group whose name already exists in the database
/// is skipped entirely. Returns the number of groups created.
pub async fn seed_groups(db: &DatabaseConnection, configs: &[GroupConfig]) -> Result<usize> {
    let mut created = 0;

    for config in configs {
        if get_group_by_name(db, &config.name).await?.is_some() {
            info!(group = %config.name, "Group already exists, skipping seed");
            continue;
        }

        let group = create_group(
            db,
            config.name.clone(),
            config.member_count,
            config.monthly_amount,
            config.start_date,
        )
        .await?;

        for member_config in &config.members {
            let role = MemberRole::parse(&member_config.role)?;
            add_member(db, group.id, member_config.name.clone(), role).await?;
        }

        info!(
            group = %group.name,
            members = config.members.len(),
            "Seeded group from configuration"
        );
        created += 1;
    }

    Ok(created)
}
