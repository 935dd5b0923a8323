//! Insight-to-Action engine for Dealflow.
//!
//! Derives follow-up actions from transcript analyses, resolves scheduling
//! phrases into absolute timestamps, normalizes stage suggestions into the
//! closed pipeline enum, and governs the confirmation workflow that applies
//! side effects exactly once.

pub mod confirm;
pub mod derive;
pub mod error;
pub mod pipeline;
pub mod schedule;
pub mod stage;
pub mod store;
pub mod types;

pub use confirm::{ConfirmOutcome, ConfirmationEngine};
pub use derive::ActionDeriver;
pub use error::{ConfirmError, PipelineError, RecordError};
pub use pipeline::{AnalysisOutcome, AnalysisPipeline};
pub use store::{ActionStore, DealStore, MeetingStore};
pub use types::{
    Action, ActionSource, ActionStatus, Deal, DealStatus, Meeting, ProposedAction, SuggestedData,
};
