//! Read-only group summaries for consuming collaborators.
//!
//! Screens and other collaborators never mutate through this module; it
//! assembles a snapshot of one group - members with their positions, the
//! persisted timeline, and the collection currently due - plus a plain-text
//! rendering for logs.

use crate::{
    core::timeline::EntryStatus,
    entities::{group, member, timeline_entry},
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;

/// Snapshot of one group's rotation state.
#[derive(Debug, Clone)]
pub struct GroupOverview {
    /// The group itself
    pub group: group::Model,
    /// Active members in join order
    pub members: Vec<member::Model>,
    /// Persisted timeline, ordered by position
    pub timeline: Vec<timeline_entry::Model>,
    /// Members holding a rotation position
    pub assigned_members: usize,
    /// Members still waiting for a position
    pub unassigned_members: usize,
    /// Full pool collected each month
    pub pool_amount: i64,
    /// The entry currently due for collection, if the cycle is underway
    pub current_collection: Option<timeline_entry::Model>,
}

/// Assembles the snapshot for a group.
pub async fn generate_group_overview(
    db: &DatabaseConnection,
    group_id: i64,
) -> Result<GroupOverview> {
    let group = crate::core::group::get_group_by_id(db, group_id)
        .await?
        .ok_or_else(|| Error::GroupNotFound {
            id: group_id.to_string(),
        })?;

    let members = crate::core::group::get_active_members(db, group_id).await?;
    let timeline = crate::core::timeline::get_timeline(db, group_id).await?;

    let assigned_members = members.iter().filter(|m| m.position > 0).count();
    let current_collection = timeline
        .iter()
        .find(|e| e.status == EntryStatus::Current.as_str())
        .cloned();

    Ok(GroupOverview {
        pool_amount: group.monthly_amount * i64::from(group.member_count),
        unassigned_members: members.len() - assigned_members,
        assigned_members,
        current_collection,
        members,
        timeline,
        group,
    })
}

/// Formats an amount in whole currency units with thousands separators.
#[must_use]
pub fn format_amount(amount: i64) -> String {
    let digits = amount.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Renders an overview as a human-readable summary, for logging.
#[must_use]
pub fn format_group_overview(overview: &GroupOverview) -> String {
    use std::fmt::Write;

    let mut summary = format!(
        "{} - {} of {} members joined, pool {} per month\n",
        overview.group.name,
        overview.members.len(),
        overview.group.member_count,
        format_amount(overview.pool_amount)
    );

    // write! is infallible when writing to String, so unwrap is safe
    write!(
        summary,
        "  Positions: {} assigned | {} unassigned\n\n",
        overview.assigned_members, overview.unassigned_members
    )
    .unwrap();

    for entry in &overview.timeline {
        let member_name = overview
            .members
            .iter()
            .find(|m| m.id == entry.member_id)
            .map_or("(inactive member)", |m| m.display_name.as_str());

        writeln!(
            summary,
            "  #{} {} | due {} | {} | {}{}",
            entry.position,
            member_name,
            entry.due_date.format("%Y-%m-%d"),
            format_amount(entry.amount),
            entry.status,
            entry
                .collected_on
                .map(|d| format!(" (collected {})", d.format("%Y-%m-%d")))
                .unwrap_or_default()
        )
        .unwrap();
    }

    summary
}
