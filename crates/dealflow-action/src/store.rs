//! In-memory record stores.
//!
//! Mutex-guarded stores for meetings, deals, and actions. Lookups that cross
//! a user boundary are scoped by `user_id`, so a foreign record behaves like
//! a missing one. The action store owns the atomic pending→approved flip.

use std::sync::Mutex;

use serde_json::Value;
use uuid::Uuid;

use dealflow_core::error::DealflowError;
use dealflow_core::types::{ActionType, DealStage, Timestamp};

use crate::error::{ConfirmError, RecordError};
use crate::types::{
    Action, ActionSource, ActionStatus, Deal, DealStatus, Meeting, ProposedAction,
};

fn poisoned(detail: impl std::fmt::Display) -> DealflowError {
    DealflowError::Storage(format!("Lock poisoned: {}", detail))
}

// =============================================================================
// Meetings
// =============================================================================

/// In-memory meeting store.
pub struct MeetingStore {
    meetings: Mutex<Vec<Meeting>>,
}

impl MeetingStore {
    pub fn new() -> Self {
        Self {
            meetings: Mutex::new(Vec::new()),
        }
    }

    /// Create a new meeting with no transcript or analysis yet.
    pub fn create(
        &self,
        title: String,
        client_id: Uuid,
        deal_id: Option<Uuid>,
        user_id: Uuid,
        date_time: Timestamp,
    ) -> Result<Meeting, RecordError> {
        let meeting = Meeting {
            id: Uuid::new_v4(),
            title,
            client_id,
            deal_id,
            user_id,
            date_time,
            transcript: String::new(),
            ai_summary: String::new(),
            ai_insights: Value::Object(Default::default()),
            participants: Vec::new(),
            created_at: Timestamp::now(),
        };

        let mut meetings = self.meetings.lock().map_err(|e| poisoned(e))?;
        meetings.push(meeting.clone());
        Ok(meeting)
    }

    /// Get a meeting by ID, scoped to its owner.
    pub fn get_for_user(&self, id: Uuid, user_id: Uuid) -> Result<Meeting, RecordError> {
        let meetings = self.meetings.lock().map_err(|e| poisoned(e))?;
        meetings
            .iter()
            .find(|m| m.id == id && m.user_id == user_id)
            .cloned()
            .ok_or(RecordError::NotFound(id))
    }

    /// Record the outcome of an analysis pass on a meeting.
    ///
    /// Participants are only overwritten when the analysis found any.
    pub fn record_analysis(
        &self,
        id: Uuid,
        transcript: &str,
        summary: &str,
        insights: Value,
        participants: Vec<String>,
    ) -> Result<Meeting, RecordError> {
        let mut meetings = self.meetings.lock().map_err(|e| poisoned(e))?;
        let meeting = meetings
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(RecordError::NotFound(id))?;

        meeting.transcript = transcript.to_string();
        meeting.ai_summary = summary.to_string();
        meeting.ai_insights = insights;
        if !participants.is_empty() {
            meeting.participants = participants;
        }

        Ok(meeting.clone())
    }

    /// List a user's meetings, newest first, optionally filtered by client.
    pub fn list(&self, user_id: Uuid, client_id: Option<Uuid>, limit: Option<usize>) -> Vec<Meeting> {
        let meetings = match self.meetings.lock() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        let mut result: Vec<Meeting> = meetings
            .iter()
            .filter(|m| m.user_id == user_id)
            .filter(|m| client_id.map(|c| m.client_id == c).unwrap_or(true))
            .cloned()
            .collect();

        result.sort_by(|a, b| b.date_time.cmp(&a.date_time));
        if let Some(limit) = limit {
            result.truncate(limit);
        }
        result
    }
}

impl Default for MeetingStore {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Deals
// =============================================================================

/// In-memory deal store.
pub struct DealStore {
    deals: Mutex<Vec<Deal>>,
}

impl DealStore {
    pub fn new() -> Self {
        Self {
            deals: Mutex::new(Vec::new()),
        }
    }

    pub fn create(
        &self,
        client_id: Uuid,
        title: String,
        stage: DealStage,
        value: f64,
        user_id: Uuid,
    ) -> Result<Deal, RecordError> {
        let deal = Deal {
            id: Uuid::new_v4(),
            client_id,
            title,
            stage,
            value,
            status: DealStatus::Active,
            last_activity: None,
            user_id,
            created_at: Timestamp::now(),
        };

        let mut deals = self.deals.lock().map_err(|e| poisoned(e))?;
        deals.push(deal.clone());
        Ok(deal)
    }

    pub fn get(&self, id: Uuid) -> Result<Deal, RecordError> {
        let deals = self.deals.lock().map_err(|e| poisoned(e))?;
        deals
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or(RecordError::NotFound(id))
    }

    /// Overwrite the deal's stage. The previous stage is not versioned.
    pub fn set_stage(&self, id: Uuid, stage: DealStage) -> Result<Deal, RecordError> {
        let mut deals = self.deals.lock().map_err(|e| poisoned(e))?;
        let deal = deals
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(RecordError::NotFound(id))?;

        deal.stage = stage;
        deal.last_activity = Some(Timestamp::now());
        Ok(deal.clone())
    }
}

impl Default for DealStore {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Actions
// =============================================================================

/// In-memory action store.
pub struct ActionStore {
    actions: Mutex<Vec<Action>>,
}

impl ActionStore {
    pub fn new() -> Self {
        Self {
            actions: Mutex::new(Vec::new()),
        }
    }

    /// Persist a proposed action as a pending record.
    pub fn create(
        &self,
        proposed: ProposedAction,
        meeting_id: Option<Uuid>,
        client_id: Uuid,
        deal_id: Option<Uuid>,
        user_id: Uuid,
        source: ActionSource,
    ) -> Result<Action, RecordError> {
        let action = Action {
            id: Uuid::new_v4(),
            meeting_id,
            client_id,
            deal_id,
            user_id,
            action_type: proposed.action_type,
            suggested_data: proposed.suggested_data,
            status: proposed.status,
            source,
            created_at: Timestamp::now(),
        };

        let mut actions = self.actions.lock().map_err(|e| poisoned(e))?;
        actions.push(action.clone());
        Ok(action)
    }

    /// Get an action by ID, scoped to its owner.
    pub fn get_for_user(&self, id: Uuid, user_id: Uuid) -> Result<Action, RecordError> {
        let actions = self.actions.lock().map_err(|e| poisoned(e))?;
        actions
            .iter()
            .find(|a| a.id == id && a.user_id == user_id)
            .cloned()
            .ok_or(RecordError::NotFound(id))
    }

    /// Atomically flip a pending action to approved.
    ///
    /// The pending check and the flip happen under one lock: of two
    /// concurrent confirmations, exactly one wins and the other observes
    /// `AlreadyApproved`.
    pub fn approve_pending(&self, id: Uuid, user_id: Uuid) -> Result<Action, ConfirmError> {
        let mut actions = self
            .actions
            .lock()
            .map_err(|e| ConfirmError::Storage(poisoned(e)))?;
        let action = actions
            .iter_mut()
            .find(|a| a.id == id && a.user_id == user_id)
            .ok_or(ConfirmError::NotFound(id))?;

        if action.status == ActionStatus::Approved {
            return Err(ConfirmError::AlreadyApproved(id));
        }

        action.status = ActionStatus::Approved;
        Ok(action.clone())
    }

    /// List a user's actions, newest first, filterable by client, deal, or
    /// type.
    pub fn list(
        &self,
        user_id: Uuid,
        client_id: Option<Uuid>,
        deal_id: Option<Uuid>,
        action_type: Option<ActionType>,
        limit: Option<usize>,
    ) -> Vec<Action> {
        let actions = match self.actions.lock() {
            Ok(a) => a,
            Err(_) => return vec![],
        };

        let mut result: Vec<Action> = actions
            .iter()
            .filter(|a| a.user_id == user_id)
            .filter(|a| client_id.map(|c| a.client_id == c).unwrap_or(true))
            .filter(|a| deal_id.map(|d| a.deal_id == Some(d)).unwrap_or(true))
            .filter(|a| action_type.map(|t| a.action_type == t).unwrap_or(true))
            .cloned()
            .collect();

        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = limit {
            result.truncate(limit);
        }
        result
    }

    /// Delete an action. Unrelated to the confirmation state machine.
    pub fn delete(&self, id: Uuid, user_id: Uuid) -> Result<Action, RecordError> {
        let mut actions = self.actions.lock().map_err(|e| poisoned(e))?;
        let pos = actions
            .iter()
            .position(|a| a.id == id && a.user_id == user_id)
            .ok_or(RecordError::NotFound(id))?;
        Ok(actions.remove(pos))
    }
}

impl Default for ActionStore {
    fn default() -> Self {
        Self::new()
    }
}
