//! Collection schedule generation and status transitions.
//!
//! The schedule math is pure: [`compute_timeline`] maps a finalized position
//! assignment to one scheduled collection per position. The async functions
//! persist that schedule ([`regenerate_timeline`], destructively) and advance
//! entry statuses as collections are confirmed ([`advance_status`]).
//!
//! Month-add rule: every due date is computed from the group's start date
//! directly, as `start_date` plus `position - 1` calendar months with chrono
//! [`Months`] semantics. Short months clamp to their last day, and later
//! months return to the original day-of-month when it is valid again:
//! 2024-01-31 yields 2024-02-29 at position 2 and 2024-03-31 at position 3.

use crate::{
    entities::{TimelineEntry, group, timeline_entry},
    errors::{Error, Result},
};
use chrono::{Months, NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info};

/// Lifecycle status of a scheduled collection. Transitions move forward only:
/// `Upcoming` -> `Current` -> `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// Waiting for earlier positions to collect
    Upcoming,
    /// The next collection due; at most one entry per group
    Current,
    /// Pool collected and confirmed
    Completed,
}

impl EntryStatus {
    /// String form stored in the `status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Current => "current",
            Self::Completed => "completed",
        }
    }

    /// Parses the stored string form back into a status.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "upcoming" => Ok(Self::Upcoming),
            "current" => Ok(Self::Current),
            "completed" => Ok(Self::Completed),
            other => Err(Error::Config {
                message: format!("Unknown timeline status: {other}"),
            }),
        }
    }
}

/// One computed (not yet persisted) collection in a group's cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledCollection {
    /// Rotation position (1-based)
    pub position: u32,
    /// Member collecting at this position
    pub member_id: i64,
    /// Date the collection is due
    pub due_date: NaiveDate,
    /// Full pool amount: monthly amount times member count
    pub amount: i64,
    /// Status at generation time
    pub status: EntryStatus,
}

/// Due date for a position: start date plus `position - 1` calendar months,
/// clamped to the last day of shorter months.
pub fn due_date_for_position(start_date: NaiveDate, position: u32) -> Result<NaiveDate> {
    start_date
        .checked_add_months(Months::new(position.saturating_sub(1)))
        .ok_or_else(|| Error::Config {
            message: format!("Due date overflow for position {position} from {start_date}"),
        })
}

/// Computes the full collection schedule for a finalized assignment.
///
/// `pairs` holds the assigned `(member_id, position)` mapping; positions must
/// be non-zero, distinct, and within `1..=member_count`. Each entry's amount
/// is the whole pool (`monthly_amount * member_count`). The lowest generated
/// position is `current`, every later one `upcoming`; nothing is ever
/// generated as `completed`. Deterministic for identical inputs.
pub fn compute_timeline(
    pairs: &[(i64, u32)],
    monthly_amount: i64,
    member_count: i32,
    start_date: NaiveDate,
) -> Result<Vec<ScheduledCollection>> {
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

    if pairs.is_empty() {
        return Err(Error::EmptyMemberList);
    }

    let unassigned = pairs.iter().filter(|&&(_, p)| p == 0).count();
    if unassigned > 0 {
        return Err(Error::IncompleteAssignment { unassigned });
    }

    let mut ordered: Vec<(i64, u32)> = pairs.to_vec();
    ordered.sort_by_key(|&(_, position)| position);

    let target = u32::try_from(member_count).unwrap_or(0);
    let pool_amount = monthly_amount * i64::from(member_count);
    let mut schedule = Vec::with_capacity(ordered.len());

    for (index, &(member_id, position)) in ordered.iter().enumerate() {
        if position > target {
            return Err(Error::PositionOutOfRange {
                position,
                member_count: target,
            });
        }
        if index > 0 && ordered[index - 1].1 == position {
            return Err(Error::DuplicatePosition { position });
        }

        schedule.push(ScheduledCollection {
            position,
            member_id,
            due_date: due_date_for_position(start_date, position)?,
            amount: pool_amount,
            status: if index == 0 {
                EntryStatus::Current
            } else {
                EntryStatus::Upcoming
            },
        });
    }

    Ok(schedule)
}

/// Retrieves a group's persisted timeline, ordered by position.
pub async fn get_timeline(
    db: &DatabaseConnection,
    group_id: i64,
) -> Result<Vec<timeline_entry::Model>> {
    TimelineEntry::find()
        .filter(timeline_entry::Column::GroupId.eq(group_id))
        .order_by_asc(timeline_entry::Column::Position)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Rebuilds a group's timeline from its current position assignment.
///
/// Every joined member must already hold a position; a half-assigned group is
/// refused with [`Error::IncompleteAssignment`] rather than producing a short
/// schedule. A group still below its target size is fine - the schedule then
/// covers only the assigned positions.
///
/// Destructive by design: every prior entry for the group is deleted and the
/// schedule is recomputed from scratch. Completed statuses and collection
/// dates from before a reassignment are not preserved, so callers treat a
/// reassignment after the cycle has started as an explicit admin-confirmed
/// action.
pub async fn regenerate_timeline(
    db: &DatabaseConnection,
    group: &group::Model,
) -> Result<Vec<timeline_entry::Model>> {
    let assignment = crate::core::assignment::load_assignment(db, group).await?;

    let unassigned = assignment
        .pairs()
        .iter()
        .filter(|&&(_, position)| position == 0)
        .count();
    if unassigned > 0 {
        return Err(Error::IncompleteAssignment { unassigned });
    }

    let schedule = compute_timeline(
        &assignment.assigned_pairs(),
        group.monthly_amount,
        group.member_count,
        group.start_date,
    )?;

    let txn = db.begin().await?;

    let deleted = TimelineEntry::delete_many()
        .filter(timeline_entry::Column::GroupId.eq(group.id))
        .exec(&txn)
        .await?;

    for entry in &schedule {
        let model = timeline_entry::ActiveModel {
            group_id: Set(group.id),
            position: Set(i32::try_from(entry.position).unwrap_or(0)),
            member_id: Set(entry.member_id),
            due_date: Set(entry.due_date),
            amount: Set(entry.amount),
            status: Set(entry.status.as_str().to_string()),
            collected_on: Set(None),
            ..Default::default()
        };
        model.insert(&txn).await?;
    }

    txn.commit().await?;

    info!(
        group_id = group.id,
        entries = schedule.len(),
        discarded = deleted.rows_affected,
        "Regenerated timeline"
    );

    get_timeline(db, group.id).await
}

/// Confirms the current collection and advances the cycle.
///
/// Called by the payment-tracking collaborator once a collection is
/// confirmed. The entry at `position` must be `current`; it becomes
/// `completed` with `collected_on` stamped, and the lowest-position
/// `upcoming` entry (if any) is promoted to `current`. The collection date
/// must not be in the future. At most one entry is ever `current`.
pub async fn advance_status(
    db: &DatabaseConnection,
    group_id: i64,
    position: u32,
    collected_on: NaiveDate,
) -> Result<timeline_entry::Model> {
    if collected_on > Utc::now().date_naive() {
        return Err(Error::InvalidCollectionDate { date: collected_on });
    }

    let txn = db.begin().await?;

    let entry = TimelineEntry::find()
        .filter(timeline_entry::Column::GroupId.eq(group_id))
        .filter(timeline_entry::Column::Position.eq(i32::try_from(position).unwrap_or(0)))
        .one(&txn)
        .await?
        .ok_or(Error::EntryNotFound { group_id, position })?;

    if EntryStatus::parse(&entry.status)? != EntryStatus::Current {
        return Err(Error::InvalidStatusTransition {
            from: entry.status,
            to: EntryStatus::Completed.as_str().to_string(),
        });
    }

    let entry_id = entry.id;
    let mut completed: timeline_entry::ActiveModel = entry.into();
    completed.status = Set(EntryStatus::Completed.as_str().to_string());
    completed.collected_on = Set(Some(collected_on));
    completed.update(&txn).await?;

    // Promote the next collection in line, if one remains
    let next = TimelineEntry::find()
        .filter(timeline_entry::Column::GroupId.eq(group_id))
        .filter(timeline_entry::Column::Status.eq(EntryStatus::Upcoming.as_str()))
        .order_by_asc(timeline_entry::Column::Position)
        .one(&txn)
        .await?;

    if let Some(next_entry) = next {
        let next_position = next_entry.position;
        let mut promoted: timeline_entry::ActiveModel = next_entry.into();
        promoted.status = Set(EntryStatus::Current.as_str().to_string());
        promoted.update(&txn).await?;
        debug!(group_id, position = next_position, "Promoted next collection to current");
    }

    txn.commit().await?;

    TimelineEntry::find_by_id(entry_id)
        .one(db)
        .await?
        .ok_or(Error::EntryNotFound { group_id, position })
}
