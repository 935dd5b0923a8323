//! The analysis pipeline.
//!
//! Wires the signal extractor, deriver, and stores: transcript in, pending
//! actions out. Extraction failures never fail the pipeline; they degrade to
//! an empty analysis so the operation completes in bounded time.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use dealflow_core::clock::Clock;
use dealflow_core::config::DealflowConfig;
use dealflow_core::types::{ActionType, DealSignal};
use dealflow_insight::analysis::AnalysisResult;
use dealflow_insight::extractor::SignalExtractor;

use crate::derive::ActionDeriver;
use crate::error::PipelineError;
use crate::store::{ActionStore, DealStore, MeetingStore};
use crate::types::{Action, ActionSource, Meeting, ProposedAction, SuggestedData};

const FALLBACK_SUMMARY: &str = "No summary generated";

/// Everything one analysis pass produced.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub meeting: Meeting,
    pub analysis: AnalysisResult,
    pub actions: Vec<Action>,
}

/// Orchestrates extractor → deriver → persisted pending actions.
pub struct AnalysisPipeline {
    extractor: Arc<dyn SignalExtractor>,
    deriver: ActionDeriver,
    meetings: Arc<MeetingStore>,
    deals: Arc<DealStore>,
    actions: Arc<ActionStore>,
    clock: Arc<dyn Clock>,
    extractor_timeout: Duration,
}

impl AnalysisPipeline {
    pub fn new(
        extractor: Arc<dyn SignalExtractor>,
        meetings: Arc<MeetingStore>,
        deals: Arc<DealStore>,
        actions: Arc<ActionStore>,
        clock: Arc<dyn Clock>,
        config: &DealflowConfig,
    ) -> Self {
        Self {
            extractor,
            deriver: ActionDeriver::new(config.actions.follow_up_fallback_hours),
            meetings,
            deals,
            actions,
            clock,
            extractor_timeout: Duration::from_secs(config.extractor.timeout_seconds),
        }
    }

    /// Analyze a transcript for a meeting and persist the derived actions
    /// as pending records.
    pub async fn analyze(
        &self,
        meeting_id: Uuid,
        user_id: Uuid,
        transcript: &str,
    ) -> Result<AnalysisOutcome, PipelineError> {
        let meeting = self
            .meetings
            .get_for_user(meeting_id, user_id)
            .map_err(|_| PipelineError::MeetingNotFound(meeting_id))?;

        let analysis = self.extract_or_empty(transcript).await;

        let summary = analysis
            .summary_text()
            .unwrap_or(FALLBACK_SUMMARY)
            .to_string();
        let meeting = self.meetings.record_analysis(
            meeting.id,
            transcript,
            &summary,
            analysis.to_value(),
            analysis.participant_names(),
        )?;

        let mut proposals = self.deriver.derive(&analysis, self.clock.now_utc());
        if let Some(deal_id) = meeting.deal_id {
            self.refine_stage_proposals(&mut proposals, deal_id, &analysis, &summary);
        }

        let mut created = Vec::new();
        for proposal in proposals {
            created.push(self.actions.create(
                proposal,
                Some(meeting.id),
                meeting.client_id,
                meeting.deal_id,
                user_id,
                ActionSource::Ai,
            )?);
        }

        info!(
            meeting_id = %meeting.id,
            actions = created.len(),
            structured = analysis.is_structured(),
            "analysis complete, pending actions created"
        );

        Ok(AnalysisOutcome {
            meeting,
            analysis,
            actions: created,
        })
    }

    /// Run the extractor inside the timeout boundary. Any failure degrades
    /// to the neutral empty analysis.
    async fn extract_or_empty(&self, transcript: &str) -> AnalysisResult {
        match tokio::time::timeout(self.extractor_timeout, self.extractor.extract(transcript)).await
        {
            Ok(Ok(analysis)) => analysis,
            Ok(Err(e)) => {
                warn!(error = %e, "signal extraction failed, continuing with empty analysis");
                AnalysisResult::empty()
            }
            Err(_) => {
                warn!(
                    timeout_seconds = self.extractor_timeout.as_secs(),
                    "signal extraction timed out, continuing with empty analysis"
                );
                AnalysisResult::empty()
            }
        }
    }

    /// Deal-aware refinement of stage proposals.
    ///
    /// Drops a stage update that proposes the deal's current stage, and when
    /// none survives, synthesizes a one-step progression on a Positive deal
    /// signal. Closed deals never progress.
    fn refine_stage_proposals(
        &self,
        proposals: &mut Vec<ProposedAction>,
        deal_id: Uuid,
        analysis: &AnalysisResult,
        summary: &str,
    ) {
        let deal = match self.deals.get(deal_id) {
            Ok(deal) => deal,
            Err(_) => return,
        };

        proposals.retain(|p| {
            let noop = p.action_type == ActionType::StageUpdate
                && p.suggested_data.proposed_stage == Some(deal.stage);
            if noop {
                debug!(stage = %deal.stage, "dropping stage update proposing the current stage");
            }
            !noop
        });

        let has_stage_update = proposals
            .iter()
            .any(|p| p.action_type == ActionType::StageUpdate);
        if has_stage_update || analysis.deal_signal() != DealSignal::Positive {
            return;
        }

        if let Some(next) = deal.stage.next() {
            proposals.push(ProposedAction::new(
                ActionType::StageUpdate,
                SuggestedData {
                    title: Some("Update Deal Stage".to_string()),
                    current_stage: Some(deal.stage),
                    proposed_stage: Some(next),
                    reason: Some(if summary == FALLBACK_SUMMARY {
                        "Positive deal signals detected.".to_string()
                    } else {
                        summary.to_string()
                    }),
                    ..SuggestedData::default()
                },
            ));
        }
    }
}
