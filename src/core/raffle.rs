//! Random position assignment with a preview-before-commit flow.
//!
//! [`run_raffle`] shuffles the member list with a uniform Fisher-Yates
//! shuffle and returns a [`RafflePreview`] - a pending result that is shown
//! to the group before anything is stored. "Redo" is simply running the
//! raffle again; closing without confirming is dropping the preview. Only
//! [`confirm_raffle`] mutates persisted state: it overwrites every member's
//! position from the preview and rebuilds the timeline.
//!
//! The RNG is supplied by the caller, so tests drive the shuffle with a
//! seeded [`rand::rngs::StdRng`] while production uses [`rand::rng`].

use crate::{
    entities::{group, member, timeline_entry},
    errors::{Error, Result},
};
use rand::Rng;
use rand::seq::SliceRandom;
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::info;

/// A pending raffle result: the shuffled member order, not yet persisted.
///
/// Index `i` of the order receives position `i + 1` on confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RafflePreview {
    order: Vec<i64>,
}

impl RafflePreview {
    /// The shuffled member ids, winner of position 1 first.
    #[must_use]
    pub fn order(&self) -> &[i64] {
        &self.order
    }

    /// The `(member_id, position)` pairs this preview would commit.
    #[must_use]
    pub fn positions(&self) -> Vec<(i64, u32)> {
        self.order
            .iter()
            .enumerate()
            .map(|(index, &member_id)| (member_id, u32::try_from(index).unwrap_or(0) + 1))
            .collect()
    }
}

/// Runs the raffle: a uniform random permutation of the member list.
///
/// Fisher-Yates via [`SliceRandom::shuffle`], so each of the n! orderings is
/// equally likely. The only failure mode is an empty member list. Nothing is
/// persisted; re-run for a fresh draw or drop the preview to cancel.
pub fn run_raffle<R: Rng + ?Sized>(member_ids: &[i64], rng: &mut R) -> Result<RafflePreview> {
    if member_ids.is_empty() {
        return Err(Error::EmptyMemberList);
    }

    let mut order = member_ids.to_vec();
    order.shuffle(rng);
    Ok(RafflePreview { order })
}

/// Commits a raffle preview: overwrites the group's position assignment and
/// regenerates its timeline.
///
/// The preview must be a permutation of the group's current active members:
/// every drawn id must belong to an active member, no member may be drawn
/// twice, and no active member may be missing from the draw. A preview that
/// fails these checks is refused before anything is written, so the committed
/// position set is always exactly `{1..=n}` over the active members. The
/// position write and the timeline rebuild are two sequential atomic updates
/// on the group.
pub async fn confirm_raffle(
    db: &DatabaseConnection,
    group: &group::Model,
    preview: &RafflePreview,
) -> Result<Vec<timeline_entry::Model>> {
    let members = crate::core::group::get_active_members(db, group.id).await?;

    let mut drawn: Vec<i64> = Vec::with_capacity(preview.order().len());
    for &member_id in preview.order() {
        if !members.iter().any(|m| m.id == member_id) {
            return Err(Error::MemberNotFound { id: member_id });
        }
        if drawn.contains(&member_id) {
            return Err(Error::Config {
                message: format!("Member {member_id} appears more than once in the raffle draw"),
            });
        }
        drawn.push(member_id);
    }

    let undrawn = members.iter().filter(|m| !drawn.contains(&m.id)).count();
    if undrawn > 0 {
        return Err(Error::IncompleteAssignment {
            unassigned: undrawn,
        });
    }

    let positions = preview.positions();
    let txn = db.begin().await?;

    for existing in members {
        let member_id = existing.id;
        let position = positions
            .iter()
            .find(|&&(id, _)| id == member_id)
            .map_or(0, |&(_, position)| position);

        let mut active_model: member::ActiveModel = existing.into();
        active_model.position = Set(i32::try_from(position).unwrap_or(0));
        active_model.update(&txn).await?;
    }

    txn.commit().await?;

    info!(
        group_id = group.id,
        members = preview.order().len(),
        "Confirmed raffle assignment"
    );

    crate::core::timeline::regenerate_timeline(db, group).await
}
