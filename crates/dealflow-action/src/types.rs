//! Domain records and value objects for the action engine.
//!
//! Defines proposed and persisted actions, their suggested-data payload,
//! and the meeting/deal records actions apply side effects against.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use dealflow_core::types::{ActionType, DealStage, Timestamp};

// =============================================================================
// Enums
// =============================================================================

/// Action lifecycle states. The transition is monotonic: once approved, an
/// action never returns to pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Pending,
    Approved,
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionStatus::Pending => write!(f, "pending"),
            ActionStatus::Approved => write!(f, "approved"),
        }
    }
}

impl std::str::FromStr for ActionStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ActionStatus::Pending),
            "approved" => Ok(ActionStatus::Approved),
            _ => Err(format!("Unknown action status: {}", s)),
        }
    }
}

/// Where an action came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSource {
    Ai,
    Manual,
}

impl fmt::Display for ActionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionSource::Ai => write!(f, "ai"),
            ActionSource::Manual => write!(f, "manual"),
        }
    }
}

/// Deal record lifecycle, independent of pipeline stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStatus {
    #[default]
    Active,
    Inactive,
    Closed,
}

// =============================================================================
// Suggested data
// =============================================================================

/// Payload describing what a confirmed action should do.
///
/// Which fields are populated depends on the action type. `proposed_stage`
/// is the typed closed enum: free text can only reach it through the stage
/// normalizer, so an unvalidated suggestion can never be persisted here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuggestedData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_stage: Option<DealStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposed_stage: Option<DealStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

// =============================================================================
// Domain Structs
// =============================================================================

/// An in-memory candidate action produced by the deriver, before it is
/// persisted with pending status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedAction {
    pub action_type: ActionType,
    pub suggested_data: SuggestedData,
    pub status: ActionStatus,
}

impl ProposedAction {
    pub fn new(action_type: ActionType, suggested_data: SuggestedData) -> Self {
        Self {
            action_type,
            suggested_data,
            status: ActionStatus::Pending,
        }
    }
}

/// A persisted follow-up action awaiting or past confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub id: Uuid,
    pub meeting_id: Option<Uuid>,
    pub client_id: Uuid,
    pub deal_id: Option<Uuid>,
    pub user_id: Uuid,
    pub action_type: ActionType,
    pub suggested_data: SuggestedData,
    pub status: ActionStatus,
    pub source: ActionSource,
    pub created_at: Timestamp,
}

/// A sales meeting record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    pub id: Uuid,
    pub title: String,
    pub client_id: Uuid,
    pub deal_id: Option<Uuid>,
    pub user_id: Uuid,
    pub date_time: Timestamp,
    pub transcript: String,
    pub ai_summary: String,
    /// Opaque analysis blob from the most recent analysis pass.
    pub ai_insights: Value,
    pub participants: Vec<String>,
    pub created_at: Timestamp,
}

/// A deal record. `stage` is overwritten on update, never versioned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deal {
    pub id: Uuid,
    pub client_id: Uuid,
    pub title: String,
    pub stage: DealStage,
    pub value: f64,
    pub status: DealStatus,
    pub last_activity: Option<Timestamp>,
    pub user_id: Uuid,
    pub created_at: Timestamp,
}

// =============================================================================
// Tests
// =============================================================================
