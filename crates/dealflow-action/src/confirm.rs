//! Action confirmation.
//!
//! Drives the pending→approved transition and dispatches the per-type side
//! effect exactly once. Confirming an already-approved action is an error,
//! not a no-op: that rejection is the at-most-once boundary.

use std::sync::Arc;

use chrono::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use dealflow_core::clock::Clock;
use dealflow_core::types::{ActionType, Timestamp};

use crate::error::ConfirmError;
use crate::store::{ActionStore, DealStore, MeetingStore};
use crate::types::{Action, ActionStatus, Meeting};

/// Fallback offset for a schedule action persisted without a date.
const DEFAULT_FOLLOW_UP_HOURS: i64 = 24;

/// Result of a successful confirmation.
#[derive(Debug, Clone)]
pub struct ConfirmOutcome {
    pub action: Action,
    /// The follow-up meeting created by a `schedule` action, if any.
    pub new_meeting: Option<Meeting>,
}

/// Engine owning the confirmation workflow across stores.
pub struct ConfirmationEngine {
    actions: Arc<ActionStore>,
    meetings: Arc<MeetingStore>,
    deals: Arc<DealStore>,
    clock: Arc<dyn Clock>,
}

impl ConfirmationEngine {
    pub fn new(
        actions: Arc<ActionStore>,
        meetings: Arc<MeetingStore>,
        deals: Arc<DealStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            actions,
            meetings,
            deals,
            clock,
        }
    }

    /// Confirm one pending action and apply its side effect.
    ///
    /// Exactly one action transitions per call. Rejections: unknown or
    /// foreign id, already approved, or a schedule action whose origin
    /// meeting is missing (the transition aborts, no meeting is created).
    pub fn confirm(&self, action_id: Uuid, user_id: Uuid) -> Result<ConfirmOutcome, ConfirmError> {
        let action = self.actions.get_for_user(action_id, user_id)?;
        if action.status == ActionStatus::Approved {
            return Err(ConfirmError::AlreadyApproved(action_id));
        }

        // Side-effect preconditions come before the transition so a failed
        // confirmation never strands an approved action with no effect.
        let origin_meeting = match action.action_type {
            ActionType::Schedule => {
                let meeting_id = action
                    .meeting_id
                    .ok_or(ConfirmError::MissingOriginMeeting(action_id))?;
                let meeting = self
                    .meetings
                    .get_for_user(meeting_id, user_id)
                    .map_err(|_| ConfirmError::MissingOriginMeeting(action_id))?;
                Some(meeting)
            }
            _ => None,
        };

        // Atomic flip; of concurrent confirmations only one gets past here.
        let action = self.actions.approve_pending(action_id, user_id)?;

        let new_meeting = match (action.action_type, origin_meeting) {
            (ActionType::Schedule, Some(origin)) => {
                Some(self.create_follow_up(&action, &origin)?)
            }
            (ActionType::StageUpdate, _) => {
                self.apply_stage_update(&action);
                None
            }
            // Email and followup content is staged only; the flip is the
            // whole effect.
            _ => None,
        };

        Ok(ConfirmOutcome {
            action,
            new_meeting,
        })
    }

    fn create_follow_up(&self, action: &Action, origin: &Meeting) -> Result<Meeting, ConfirmError> {
        let title = action
            .suggested_data
            .title
            .clone()
            .unwrap_or_else(|| "Follow-up Meeting".to_string());
        let date_time = action.suggested_data.date_time.unwrap_or_else(|| {
            Timestamp::from_datetime(self.clock.now_utc() + Duration::hours(DEFAULT_FOLLOW_UP_HOURS))
        });

        let meeting = self.meetings.create(
            title,
            origin.client_id,
            None,
            action.user_id,
            date_time,
        )?;
        info!(meeting_id = %meeting.id, "follow-up meeting auto-created");
        Ok(meeting)
    }

    /// Overwrite the deal's stage with the pre-normalized suggestion.
    ///
    /// A missing deal link or record skips the side effect silently; the
    /// action itself stays approved.
    fn apply_stage_update(&self, action: &Action) {
        let (deal_id, stage) = match (action.deal_id, action.suggested_data.proposed_stage) {
            (Some(deal_id), Some(stage)) => (deal_id, stage),
            _ => {
                warn!(action_id = %action.id, "stage update has no deal link, side effect skipped");
                return;
            }
        };

        match self.deals.set_stage(deal_id, stage) {
            Ok(deal) => {
                info!(deal_id = %deal.id, stage = %deal.stage, "deal stage updated");
            }
            Err(_) => {
                warn!(deal_id = %deal_id, "deal not found, stage update side effect skipped");
            }
        }
    }
}
