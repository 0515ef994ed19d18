// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Movement detection: compare the persisted stage pointer with the stage
//! the source reports now.
//!
//! Write order for a detected transition:
//!
//! 1. append the movement record (deduplicated by transition id)
//! 2. fold the elapsed time into the ledger (once per transition id)
//! 3. advance the stage pointer (compare-and-set against the value read)
//!
//! The transition id is derived from the pointer alone, so only one
//! transition can ever leave a pointer. A logged transition whose pointer
//! was never advanced is finished from its record before anything new is
//! detected. A cycle that dies anywhere before step 3 is therefore
//! completed by the next poll with identical results, wherever the item
//! has moved since, and a poller that loses the race reports no movement.

use dwell_core::{
    format_elapsed_ms, Clock, Item, Member, MovementId, MovementRecord, Stage, StagePointer,
};
use dwell_storage::{ItemRepo, KvStore, StoreError, Versioned};

pub struct MovementDetector<'a, S, C> {
    store: &'a S,
    clock: &'a C,
    poller: &'a Member,
}

impl<'a, S: KvStore, C: Clock> MovementDetector<'a, S, C> {
    /// `poller` is credited with movements the source cannot attribute.
    pub fn new(store: &'a S, clock: &'a C, poller: &'a Member) -> Self {
        Self { store, clock, poller }
    }

    /// Detect a movement of `item` into `current`.
    ///
    /// Returns the latest transition this call committed, or `None` for a
    /// first observation, an unchanged stage, or a transition another poller
    /// committed first.
    pub fn detect(
        &self,
        board_name: &str,
        item: &Item,
        current: &Stage,
    ) -> Result<Option<MovementRecord>, StoreError> {
        let repo = ItemRepo::new(self.store, &item.id);
        let now = self.clock.epoch_ms();

        let Some(mut previous) = repo.pointer()? else {
            if repo.init_pointer(&StagePointer::first(current, now))? {
                repo.set_members(&item.member_names())?;
                tracing::debug!(item = %item.id, stage = %current.name, "first observation");
            }
            return Ok(None);
        };

        let mut detected = None;
        let departing = MovementId::departing(previous.value.observed_at_ms);
        if let Some(pending) = repo.movement(&departing)? {
            tracing::debug!(item = %item.id, movement = %departing, "finishing logged transition");
            if !self.commit(&repo, item, &previous, &pending)? {
                return Ok(None);
            }
            detected = Some(pending);
            previous = match repo.pointer()? {
                Some(latest) => latest,
                None => return Ok(detected),
            };
        }

        if previous.value.is_in(current) {
            tracing::debug!(item = %item.id, stage = %current.name, "no movement");
            return Ok(detected);
        }

        let id = MovementId::departing(previous.value.observed_at_ms);
        let candidate = self.record(board_name, item, &previous.value, current, id, now);
        if !repo.append_movement(&candidate)? {
            tracing::debug!(item = %item.id, movement = %candidate.id, "transition logged elsewhere");
            return Ok(detected);
        }
        if !self.commit(&repo, item, &previous, &candidate)? {
            return Ok(detected);
        }
        Ok(Some(candidate))
    }

    /// Fold a logged transition into the ledger and advance the pointer past
    /// it. Returns false if another poller advanced the pointer first.
    fn commit(
        &self,
        repo: &ItemRepo<'_, S>,
        item: &Item,
        previous: &Versioned<StagePointer>,
        record: &MovementRecord,
    ) -> Result<bool, StoreError> {
        let pointer = &previous.value;
        let elapsed = record.timestamp_ms.saturating_sub(pointer.observed_at_ms);
        repo.apply_elapsed(&record.id, &pointer.stage_name, elapsed)?;
        repo.set_members(&record.assigned_members)?;

        let next = pointer.advance(&record.destination(), record.timestamp_ms);
        if !repo.advance_pointer(previous, &next)? {
            tracing::debug!(item = %item.id, movement = %record.id, "pointer already advanced elsewhere");
            return Ok(false);
        }

        tracing::info!(
            item = %item.id,
            from = %record.from_stage,
            to = %record.to_stage,
            elapsed_ms = elapsed,
            elapsed = %format_elapsed_ms(elapsed),
            "movement detected"
        );
        Ok(true)
    }

    fn record(
        &self,
        board_name: &str,
        item: &Item,
        pointer: &StagePointer,
        current: &Stage,
        id: MovementId,
        now: u64,
    ) -> MovementRecord {
        let actor = item.last_mover.as_ref().unwrap_or(self.poller);
        MovementRecord {
            id,
            item_id: item.id.clone(),
            item_name: item.name.clone(),
            member_id: actor.id.clone(),
            member_name: actor.full_name.clone(),
            from_stage: pointer.stage_name.clone(),
            to_stage: current.name.clone(),
            to_stage_id: current.id.clone(),
            // Strictly after the pointer so elapsed time is never zero
            timestamp_ms: now.max(pointer.observed_at_ms.saturating_add(1)),
            board_name: board_name.to_string(),
            assigned_members: item.member_names(),
        }
    }
}

#[cfg(test)]
#[path = "detector_tests.rs"]
mod tests;
