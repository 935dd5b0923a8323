use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Enums
// =============================================================================

/// Pipeline stage of a deal, in progression order.
///
/// This is a closed set: free-text stage suggestions must pass through the
/// stage normalizer before they can ever become a `DealStage` value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DealStage {
    Lead,
    Discovery,
    Qualified,
    #[serde(rename = "Proposal Sent")]
    ProposalSent,
    Negotiation,
    #[serde(rename = "Closed Won")]
    ClosedWon,
    #[serde(rename = "Closed Lost")]
    ClosedLost,
}

impl DealStage {
    /// All stages in progression order.
    pub const ALL: [DealStage; 7] = [
        DealStage::Lead,
        DealStage::Discovery,
        DealStage::Qualified,
        DealStage::ProposalSent,
        DealStage::Negotiation,
        DealStage::ClosedWon,
        DealStage::ClosedLost,
    ];

    /// Human-readable label, matching the persisted form.
    pub fn as_str(&self) -> &'static str {
        match self {
            DealStage::Lead => "Lead",
            DealStage::Discovery => "Discovery",
            DealStage::Qualified => "Qualified",
            DealStage::ProposalSent => "Proposal Sent",
            DealStage::Negotiation => "Negotiation",
            DealStage::ClosedWon => "Closed Won",
            DealStage::ClosedLost => "Closed Lost",
        }
    }

    /// The next stage in the progression ladder.
    ///
    /// Both closed stages are terminal and return `None`. `Negotiation`
    /// progresses to `ClosedWon`; losing a deal is never a "progression".
    pub fn next(&self) -> Option<DealStage> {
        match self {
            DealStage::Lead => Some(DealStage::Discovery),
            DealStage::Discovery => Some(DealStage::Qualified),
            DealStage::Qualified => Some(DealStage::ProposalSent),
            DealStage::ProposalSent => Some(DealStage::Negotiation),
            DealStage::Negotiation => Some(DealStage::ClosedWon),
            DealStage::ClosedWon | DealStage::ClosedLost => None,
        }
    }
}

impl fmt::Display for DealStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DealStage {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Lead" => Ok(DealStage::Lead),
            "Discovery" => Ok(DealStage::Discovery),
            "Qualified" => Ok(DealStage::Qualified),
            "Proposal Sent" => Ok(DealStage::ProposalSent),
            "Negotiation" => Ok(DealStage::Negotiation),
            "Closed Won" => Ok(DealStage::ClosedWon),
            "Closed Lost" => Ok(DealStage::ClosedLost),
            _ => Err(format!("Unknown deal stage: {}", s)),
        }
    }
}

/// Overall sentiment signal attached to an analysis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealSignal {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl fmt::Display for DealSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DealSignal::Positive => write!(f, "Positive"),
            DealSignal::Neutral => write!(f, "Neutral"),
            DealSignal::Negative => write!(f, "Negative"),
        }
    }
}

/// Follow-up action categories derivable from an analysis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Schedule,
    Email,
    Followup,
    StageUpdate,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionType::Schedule => write!(f, "schedule"),
            ActionType::Email => write!(f, "email"),
            ActionType::Followup => write!(f, "followup"),
            ActionType::StageUpdate => write!(f, "stage_update"),
        }
    }
}

impl std::str::FromStr for ActionType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "schedule" => Ok(ActionType::Schedule),
            "email" => Ok(ActionType::Email),
            "followup" => Ok(ActionType::Followup),
            "stage_update" => Ok(ActionType::StageUpdate),
            _ => Err(format!("Unknown action type: {}", s)),
        }
    }
}

/// Application log level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

// =============================================================================
// Newtype Wrappers - Temporal
// =============================================================================

/// Unix timestamp in seconds since epoch.
///
/// Compared by value. Two Timestamps with the same inner value are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp())
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.0, 0).unwrap_or_default()
    }
}

// =============================================================================
// Tests
// =============================================================================
