//! Manual position assignment - swap-based slot management and validation.
//!
//! An [`Assignment`] is a pure in-memory view of a group's member-to-position
//! mapping. Admin-driven edits (assign, unassign, auto-assign) mutate the
//! view only; nothing touches the database until [`save_assignment`], which
//! validates first and writes all positions in one transaction. A failed
//! validation therefore never leaves stored state half-updated.
//!
//! Position 0 means "unassigned". Assigning a position another member already
//! holds swaps the two members, so a duplicate can never appear even as an
//! intermediate state.

use crate::{
    entities::{Member, group, member},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::debug;

/// One member's slot in the rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    member_id: i64,
    /// 1-based rotation position; 0 = unassigned
    position: u32,
}

/// In-memory member-to-position mapping for one group.
///
/// Member order is preserved from construction (join order when loaded from
/// the database), which is what makes [`Assignment::auto_assign_remaining`]
/// deterministic.
#[derive(Debug, Clone)]
pub struct Assignment {
    member_count: u32,
    slots: Vec<Slot>,
}

impl Assignment {
    /// Builds an assignment view over the given members.
    ///
    /// `member_count` is the group's target size, which may exceed the number
    /// of members passed in. Stored positions carry over; anything non-positive
    /// is treated as unassigned.
    pub fn from_members(members: &[member::Model], member_count: i32) -> Result<Self> {
        if member_count < 1 {
            return Err(Error::InvalidMemberCount {
                count: member_count,
            });
        }

        let slots = members
            .iter()
            .map(|m| Slot {
                member_id: m.id,
                position: u32::try_from(m.position).unwrap_or(0),
            })
            .collect();

        Ok(Self {
            member_count: u32::try_from(member_count).unwrap_or(0),
            slots,
        })
    }

    /// The group's target member count.
    #[must_use]
    pub const fn member_count(&self) -> u32 {
        self.member_count
    }

    /// Number of members in this view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if the view holds no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The position held by a member, if the member is in this view.
    /// Returns `Some(0)` for a member without a position.
    #[must_use]
    pub fn position_of(&self, member_id: i64) -> Option<u32> {
        self.slots
            .iter()
            .find(|s| s.member_id == member_id)
            .map(|s| s.position)
    }

    /// Read-only snapshot of the mapping as `(member_id, position)` pairs,
    /// in member order. Includes unassigned members (position 0).
    #[must_use]
    pub fn pairs(&self) -> Vec<(i64, u32)> {
        self.slots.iter().map(|s| (s.member_id, s.position)).collect()
    }

    /// Snapshot of only the assigned members, sorted by position ascending.
    /// This is the input shape timeline generation consumes.
    #[must_use]
    pub fn assigned_pairs(&self) -> Vec<(i64, u32)> {
        let mut pairs: Vec<(i64, u32)> = self
            .slots
            .iter()
            .filter(|s| s.position > 0)
            .map(|s| (s.member_id, s.position))
            .collect();
        pairs.sort_by_key(|&(_, position)| position);
        pairs
    }

    /// Gives `member_id` the requested position.
    ///
    /// If another member already holds it, the two members swap: the other
    /// member receives whatever position `member_id` held before, including
    /// 0. Positions of all other members are unchanged.
    pub fn assign(&mut self, member_id: i64, position: u32) -> Result<()> {
        if position < 1 || position > self.member_count {
            return Err(Error::PositionOutOfRange {
                position,
                member_count: self.member_count,
            });
        }

        let current = self
            .position_of(member_id)
            .ok_or(Error::MemberNotFound { id: member_id })?;

        if current == position {
            return Ok(());
        }

        if let Some(holder) = self
            .slots
            .iter_mut()
            .find(|s| s.position == position && s.member_id != member_id)
        {
            holder.position = current;
        }

        if let Some(slot) = self.slots.iter_mut().find(|s| s.member_id == member_id) {
            slot.position = position;
        }
        Ok(())
    }

    /// Clears a member's position back to unassigned.
    pub fn unassign(&mut self, member_id: i64) -> Result<()> {
        match self.slots.iter_mut().find(|s| s.member_id == member_id) {
            Some(slot) => {
                slot.position = 0;
                Ok(())
            }
            None => Err(Error::MemberNotFound { id: member_id }),
        }
    }

    /// Assigns every still-unassigned member the lowest unused position, in
    /// member order. Already-assigned members are never moved. Deterministic
    /// given a fixed member order.
    pub fn auto_assign_remaining(&mut self) -> Result<()> {
        if self.slots.is_empty() {
            return Err(Error::EmptyMemberList);
        }

        let mut used: Vec<u32> = self
            .slots
            .iter()
            .filter(|s| s.position > 0)
            .map(|s| s.position)
            .collect();

        for index in 0..self.slots.len() {
            if self.slots[index].position != 0 {
                continue;
            }
            let mut position = 1u32;
            while used.contains(&position) {
                position += 1;
            }
            self.slots[index].position = position;
            used.push(position);
        }

        Ok(())
    }

    /// Checks the mapping against the group invariants.
    ///
    /// Fails with [`Error::IncompleteAssignment`] if any member has no
    /// position, [`Error::DuplicatePosition`] if a non-zero position repeats,
    /// and [`Error::PositionOutOfRange`] if a position exceeds the group's
    /// target size. With fewer joined members than the target count only the
    /// joined members are checked; once membership reaches the target, these
    /// three checks together force the assigned set to be exactly
    /// `{1, ..., member_count}`.
    pub fn validate(&self) -> Result<()> {
        let unassigned = self.slots.iter().filter(|s| s.position == 0).count();
        if unassigned > 0 {
            return Err(Error::IncompleteAssignment { unassigned });
        }

        let mut seen: Vec<u32> = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            if slot.position > self.member_count {
                return Err(Error::PositionOutOfRange {
                    position: slot.position,
                    member_count: self.member_count,
                });
            }
            if seen.contains(&slot.position) {
                return Err(Error::DuplicatePosition {
                    position: slot.position,
                });
            }
            seen.push(slot.position);
        }

        Ok(())
    }
}

/// Rebuilds the assignment view for a group from its stored members.
pub async fn load_assignment(
    db: &DatabaseConnection,
    group: &group::Model,
) -> Result<Assignment> {
    let members = crate::core::group::get_active_members(db, group.id).await?;
    Assignment::from_members(&members, group.member_count)
}

/// Validates and persists an assignment, writing every member's position in
/// one transaction.
///
/// Validation failures are returned before anything is written, so stored
/// positions are untouched when saving is refused.
pub async fn save_assignment(
    db: &DatabaseConnection,
    group_id: i64,
    assignment: &Assignment,
) -> Result<()> {
    assignment.validate()?;

    let txn = db.begin().await?;

    for (member_id, position) in assignment.pairs() {
        let existing = Member::find_by_id(member_id)
            .one(&txn)
            .await?
            .ok_or(Error::MemberNotFound { id: member_id })?;

        if existing.group_id != group_id {
            return Err(Error::MemberNotFound { id: member_id });
        }

        let mut active_model: member::ActiveModel = existing.into();
        active_model.position = Set(i32::try_from(position).unwrap_or(0));
        active_model.update(&txn).await?;
    }

    txn.commit().await?;
    debug!(group_id, members = assignment.len(), "Saved position assignment");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn view(positions: &[u32], member_count: i32) -> Assignment {
        let members: Vec<member::Model> = positions
            .iter()
            .enumerate()
            .map(|(i, &p)| test_member_model(i as i64 + 1, 1, p as i32))
            .collect();
        Assignment::from_members(&members, member_count).unwrap()
    }

    #[test]
    fn test_from_members_rejects_bad_count() {
        let result = Assignment::from_members(&[], 0);
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidMemberCount { count: 0 }
        ));
    }

    #[test]
    fn test_assign_simple() {
        let mut assignment = view(&[0, 0, 0], 3);
        assignment.assign(1, 2).unwrap();

        assert_eq!(assignment.position_of(1), Some(2));
        assert_eq!(assignment.position_of(2), Some(0));
        assert_eq!(assignment.position_of(3), Some(0));
    }

    #[test]
    fn test_assign_swaps_with_holder() {
        let mut assignment = view(&[1, 2, 3], 3);

        // Member 1 takes position 3; member 3 receives 1's old position
        assignment.assign(1, 3).unwrap();
        assert_eq!(assignment.position_of(1), Some(3));
        assert_eq!(assignment.position_of(3), Some(1));
        // Bystander unchanged
        assert_eq!(assignment.position_of(2), Some(2));
    }

    #[test]
    fn test_assign_swaps_in_unassigned() {
        let mut assignment = view(&[0, 2, 3], 3);

        // Member 1 takes position 2; member 2 receives 0 (unassigned)
        assignment.assign(1, 2).unwrap();
        assert_eq!(assignment.position_of(1), Some(2));
        assert_eq!(assignment.position_of(2), Some(0));
        assert_eq!(assignment.position_of(3), Some(3));
    }

    #[test]
    fn test_assign_same_position_is_noop() {
        let mut assignment = view(&[1, 2, 3], 3);
        assignment.assign(2, 2).unwrap();
        assert_eq!(assignment.pairs(), vec![(1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn test_assign_rejects_out_of_range() {
        let mut assignment = view(&[0, 0, 0], 3);

        let result = assignment.assign(1, 0);
        assert!(matches!(
            result.unwrap_err(),
            Error::PositionOutOfRange {
                position: 0,
                member_count: 3
            }
        ));

        let result = assignment.assign(1, 4);
        assert!(matches!(
            result.unwrap_err(),
            Error::PositionOutOfRange {
                position: 4,
                member_count: 3
            }
        ));
    }

    #[test]
    fn test_assign_rejects_unknown_member() {
        let mut assignment = view(&[0, 0], 2);
        let result = assignment.assign(99, 1);
        assert!(matches!(result.unwrap_err(), Error::MemberNotFound { id: 99 }));
    }

    #[test]
    fn test_unassign() {
        let mut assignment = view(&[1, 2], 2);
        assignment.unassign(1).unwrap();
        assert_eq!(assignment.position_of(1), Some(0));
        assert_eq!(assignment.position_of(2), Some(2));

        let result = assignment.unassign(99);
        assert!(matches!(result.unwrap_err(), Error::MemberNotFound { id: 99 }));
    }

    #[test]
    fn test_auto_assign_remaining_fills_gaps() {
        // Members 2 and 4 hold positions 2 and 4; 1 and 3 are unassigned
        let mut assignment = view(&[0, 2, 0, 4], 4);
        assignment.auto_assign_remaining().unwrap();

        // Lowest unused positions handed out in member order
        assert_eq!(assignment.position_of(1), Some(1));
        assert_eq!(assignment.position_of(3), Some(3));
        // Already-assigned members never move
        assert_eq!(assignment.position_of(2), Some(2));
        assert_eq!(assignment.position_of(4), Some(4));

        assignment.validate().unwrap();
    }

    #[test]
    fn test_auto_assign_remaining_from_scratch() {
        let mut assignment = view(&[0, 0, 0], 3);
        assignment.auto_assign_remaining().unwrap();
        assert_eq!(assignment.pairs(), vec![(1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn test_auto_assign_remaining_empty_list() {
        let mut assignment = view(&[], 3);
        let result = assignment.auto_assign_remaining();
        assert!(matches!(result.unwrap_err(), Error::EmptyMemberList));
    }

    #[test]
    fn test_auto_assign_is_deterministic() {
        let mut first = view(&[0, 3, 0], 3);
        let mut second = view(&[0, 3, 0], 3);
        first.auto_assign_remaining().unwrap();
        second.auto_assign_remaining().unwrap();
        assert_eq!(first.pairs(), second.pairs());
    }

    #[test]
    fn test_validate_complete() {
        let assignment = view(&[2, 1, 3], 3);
        assignment.validate().unwrap();
    }

    #[test]
    fn test_validate_incomplete() {
        let assignment = view(&[1, 0, 0], 3);
        let result = assignment.validate();
        assert!(matches!(
            result.unwrap_err(),
            Error::IncompleteAssignment { unassigned: 2 }
        ));
    }

    #[test]
    fn test_validate_duplicate() {
        // A duplicate is unreachable through assign/unassign, but stored rows
        // are still checked defensively
        let assignment = view(&[1, 2, 2], 3);
        let result = assignment.validate();
        assert!(matches!(
            result.unwrap_err(),
            Error::DuplicatePosition { position: 2 }
        ));
    }

    #[test]
    fn test_validate_out_of_range() {
        let assignment = view(&[1, 2, 5], 3);
        let result = assignment.validate();
        assert!(matches!(
            result.unwrap_err(),
            Error::PositionOutOfRange {
                position: 5,
                member_count: 3
            }
        ));
    }

    #[test]
    fn test_validate_partial_membership() {
        // Target size 8, only 5 joined: distinct in-range positions are
        // enough until the remaining members join
        let assignment = view(&[1, 2, 3, 4, 5], 8);
        assignment.validate().unwrap();

        // But a joined member without a position still fails
        let assignment = view(&[1, 2, 3, 4, 0], 8);
        assert!(matches!(
            assignment.validate().unwrap_err(),
            Error::IncompleteAssignment { unassigned: 1 }
        ));
    }

    #[test]
    fn test_assigned_pairs_sorted_by_position() {
        let assignment = view(&[3, 0, 1], 3);
        assert_eq!(assignment.assigned_pairs(), vec![(3, 1), (1, 3)]);
    }

    #[tokio::test]
    async fn test_save_assignment_persists_positions() -> Result<()> {
        let (db, group, members) = setup_with_unassigned_members(3).await?;

        let mut assignment = load_assignment(&db, &group).await?;
        assignment.assign(members[0].id, 2)?;
        assignment.assign(members[1].id, 1)?;
        assignment.assign(members[2].id, 3)?;
        save_assignment(&db, group.id, &assignment).await?;

        let reloaded = load_assignment(&db, &group).await?;
        assert_eq!(reloaded.position_of(members[0].id), Some(2));
        assert_eq!(reloaded.position_of(members[1].id), Some(1));
        assert_eq!(reloaded.position_of(members[2].id), Some(3));

        Ok(())
    }

    #[tokio::test]
    async fn test_save_assignment_rejects_incomplete_without_writes() -> Result<()> {
        let (db, group, members) = setup_with_unassigned_members(3).await?;

        let mut assignment = load_assignment(&db, &group).await?;
        assignment.assign(members[0].id, 1)?;

        let result = save_assignment(&db, group.id, &assignment).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::IncompleteAssignment { unassigned: 2 }
        ));

        // Stored state untouched by the refused save
        let reloaded = load_assignment(&db, &group).await?;
        for member in &members {
            assert_eq!(reloaded.position_of(member.id), Some(0));
        }

        Ok(())
    }
}
