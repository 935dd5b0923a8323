//! Action derivation from analysis documents.
//!
//! Pure mapping from an [`AnalysisResult`] to an ordered list of proposed
//! actions. A structured analysis is derived exclusively from its `actions`
//! array; legacy single-field signals are only consulted when no structured
//! array exists, so the two schema generations never double-emit.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use dealflow_core::types::{ActionType, Timestamp};
use dealflow_insight::analysis::{
    AnalysisResult, LegacyAnalysis, SchedulingIntent, StructuredAnalysis,
};

use crate::schedule;
use crate::stage;
use crate::types::{ProposedAction, SuggestedData};

const DEFAULT_MEETING_TITLE: &str = "Follow-up Meeting";
const EMAIL_SUBJECT: &str = "Follow-up regarding our meeting";

/// Keywords that classify a legacy next step as an email action.
const EMAIL_KEYWORDS: &[&str] = &["email", "send", "follow up", "follow-up"];

/// Derives proposed actions from an analysis document.
///
/// `derive` is a pure function of the analysis and the supplied `now`: no
/// I/O, no side effects, identical output for identical input.
#[derive(Debug, Clone)]
pub struct ActionDeriver {
    follow_up_fallback_hours: i64,
}

impl Default for ActionDeriver {
    fn default() -> Self {
        Self::new(24)
    }
}

impl ActionDeriver {
    /// Create a deriver whose unresolvable schedule dates fall back to
    /// `now + follow_up_fallback_hours`.
    pub fn new(follow_up_fallback_hours: i64) -> Self {
        Self {
            follow_up_fallback_hours,
        }
    }

    /// Derive proposed actions from an analysis.
    pub fn derive(&self, analysis: &AnalysisResult, now: DateTime<Utc>) -> Vec<ProposedAction> {
        match analysis {
            AnalysisResult::Structured(a) => self.derive_structured(a, now),
            AnalysisResult::Legacy(a) => self.derive_legacy(a, now),
        }
    }

    /// Map the structured v2 `actions` array, preserving array order.
    fn derive_structured(
        &self,
        analysis: &StructuredAnalysis,
        now: DateTime<Utc>,
    ) -> Vec<ProposedAction> {
        let mut proposed = Vec::new();

        for act in &analysis.actions {
            let action_type = match act.action_type.parse::<ActionType>() {
                Ok(t) => t,
                Err(_) => {
                    debug!(action_type = %act.action_type, "skipping unrecognized action type");
                    continue;
                }
            };

            match action_type {
                ActionType::Schedule => {
                    let resolved = act
                        .date_time
                        .as_deref()
                        .and_then(|text| schedule::resolve(text, now))
                        .or_else(|| {
                            act.title
                                .as_deref()
                                .and_then(|text| schedule::resolve(text, now))
                        });
                    proposed.push(ProposedAction::new(
                        ActionType::Schedule,
                        SuggestedData {
                            title: Some(
                                act.title
                                    .clone()
                                    .unwrap_or_else(|| DEFAULT_MEETING_TITLE.to_string()),
                            ),
                            date_time: Some(self.resolved_or_fallback(resolved, now)),
                            notes: act.evidence.clone(),
                            ..SuggestedData::default()
                        },
                    ));
                }
                ActionType::Email => {
                    let title = act.title.clone().unwrap_or_default();
                    proposed.push(ProposedAction::new(
                        ActionType::Email,
                        SuggestedData {
                            title: Some(title.clone()),
                            task: Some(title.clone()),
                            subject: Some(EMAIL_SUBJECT.to_string()),
                            body: Some(email_body_for_topic(&title)),
                            ..SuggestedData::default()
                        },
                    ));
                }
                ActionType::Followup => {
                    let title = act.title.clone().unwrap_or_default();
                    proposed.push(ProposedAction::new(
                        ActionType::Followup,
                        SuggestedData {
                            title: Some(title.clone()),
                            task: Some(title),
                            ..SuggestedData::default()
                        },
                    ));
                }
                ActionType::StageUpdate => {
                    let raw = act.proposed_stage.as_deref().or(act.title.as_deref());
                    match raw.and_then(stage::normalize) {
                        Some(proposed_stage) => proposed.push(ProposedAction::new(
                            ActionType::StageUpdate,
                            SuggestedData {
                                title: Some("Update Deal Stage".to_string()),
                                proposed_stage: Some(proposed_stage),
                                reason: Some(
                                    act.evidence
                                        .clone()
                                        .unwrap_or_else(|| "Positive signals detected.".to_string()),
                                ),
                                ..SuggestedData::default()
                            },
                        )),
                        None => {
                            warn!(
                                suggestion = raw.unwrap_or(""),
                                "stage suggestion did not normalize, dropping stage update"
                            );
                        }
                    }
                }
            }
        }

        proposed
    }

    /// Legacy single-field derivation: schedule, then email/followup, then
    /// stage update.
    fn derive_legacy(&self, analysis: &LegacyAnalysis, now: DateTime<Utc>) -> Vec<ProposedAction> {
        let mut proposed = Vec::new();

        if let Some(intent) = &analysis.scheduling_intent {
            let resolved = intent
                .date_text()
                .and_then(|text| schedule::resolve(text, now));
            proposed.push(ProposedAction::new(
                ActionType::Schedule,
                SuggestedData {
                    title: Some(
                        intent
                            .title()
                            .unwrap_or(DEFAULT_MEETING_TITLE)
                            .to_string(),
                    ),
                    date_time: Some(self.resolved_or_fallback(resolved, now)),
                    notes: scheduling_notes(intent),
                    ..SuggestedData::default()
                },
            ));
        }

        if let Some(step) = &analysis.next_step {
            if is_email_step(step) {
                proposed.push(ProposedAction::new(
                    ActionType::Email,
                    SuggestedData {
                        task: Some(step.clone()),
                        subject: Some(EMAIL_SUBJECT.to_string()),
                        body: Some(email_body_for_next_steps(step)),
                        ..SuggestedData::default()
                    },
                ));
            } else {
                proposed.push(ProposedAction::new(
                    ActionType::Followup,
                    SuggestedData {
                        task: Some(step.clone()),
                        ..SuggestedData::default()
                    },
                ));
            }
        }

        if let Some(suggestion) = &analysis.deal_stage_suggestion {
            let raw = suggestion.stage_text();
            match raw.and_then(stage::normalize) {
                Some(proposed_stage) => proposed.push(ProposedAction::new(
                    ActionType::StageUpdate,
                    SuggestedData {
                        title: Some("Update Deal Stage".to_string()),
                        proposed_stage: Some(proposed_stage),
                        reason: Some(
                            suggestion
                                .reasoning()
                                .map(str::to_string)
                                .or_else(|| analysis.summary.clone())
                                .unwrap_or_else(|| "AI suggested stage update.".to_string()),
                        ),
                        ..SuggestedData::default()
                    },
                )),
                None => {
                    warn!(
                        suggestion = raw.unwrap_or(""),
                        "stage suggestion did not normalize, dropping stage update"
                    );
                }
            }
        }

        proposed
    }

    fn resolved_or_fallback(&self, resolved: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Timestamp {
        let date = resolved.unwrap_or(now + Duration::hours(self.follow_up_fallback_hours));
        Timestamp::from_datetime(date)
    }
}

fn is_email_step(step: &str) -> bool {
    let lowered = step.to_lowercase();
    EMAIL_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}

fn email_body_for_topic(topic: &str) -> String {
    format!(
        "Hi [Name],\n\nGreat speaking with you today. Regarding: {}.\n\nBest,\n[Your Name]",
        topic
    )
}

fn email_body_for_next_steps(step: &str) -> String {
    format!(
        "Hi [Name],\n\nGreat speaking with you today. As discussed, here are the next steps:\n\n{}\n\nBest,\n[Your Name]",
        step
    )
}

/// Notes carried on a legacy schedule action: the raw phrase, or the
/// serialized intent object.
fn scheduling_notes(intent: &SchedulingIntent) -> Option<String> {
    match intent {
        SchedulingIntent::Phrase(text) => Some(text.clone()),
        SchedulingIntent::Structured { .. } => serde_json::to_string(intent).ok(),
    }
}
