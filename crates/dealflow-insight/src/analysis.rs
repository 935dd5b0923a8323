//! The versioned analysis contract.
//!
//! Two schema generations exist in the wild: a flat legacy shape and the
//! structured v2 shape with an explicit `actions` array. The ambiguity is
//! resolved exactly once, in [`AnalysisResult::from_value`]; everything
//! downstream works with the tagged variant.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use dealflow_core::types::DealSignal;

// =============================================================================
// Shared field shapes
// =============================================================================

/// A scheduling signal: either a bare phrase ("Thursday at 4pm") or a
/// structured object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchedulingIntent {
    Structured {
        #[serde(default)]
        title: Option<String>,
        #[serde(default, rename = "dateTime")]
        date_time: Option<String>,
    },
    Phrase(String),
}

impl SchedulingIntent {
    /// The text the scheduling resolver should attempt to parse.
    pub fn date_text(&self) -> Option<&str> {
        match self {
            SchedulingIntent::Structured { date_time, .. } => date_time.as_deref(),
            SchedulingIntent::Phrase(text) => Some(text.as_str()),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            SchedulingIntent::Structured { title, .. } => title.as_deref(),
            SchedulingIntent::Phrase(_) => None,
        }
    }
}

/// A stage suggestion: a bare string in the legacy schema, an object with
/// reasoning in v2. Both carry free text that must pass the stage normalizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StageSuggestion {
    Detailed {
        #[serde(default)]
        stage: Option<String>,
        #[serde(default)]
        reasoning: Option<String>,
        #[serde(default)]
        confidence: Option<f32>,
    },
    Text(String),
}

impl StageSuggestion {
    pub fn stage_text(&self) -> Option<&str> {
        match self {
            StageSuggestion::Detailed { stage, .. } => stage.as_deref(),
            StageSuggestion::Text(text) => Some(text.as_str()),
        }
    }

    pub fn reasoning(&self) -> Option<&str> {
        match self {
            StageSuggestion::Detailed { reasoning, .. } => reasoning.as_deref(),
            StageSuggestion::Text(_) => None,
        }
    }
}

// =============================================================================
// Legacy schema
// =============================================================================

/// Flat first-generation analysis document.
///
/// Every field is defaulted: a partial or sloppy payload still deserializes,
/// it just carries fewer signals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyAnalysis {
    pub summary: Option<String>,
    pub participants: Vec<String>,
    pub key_topics: Vec<String>,
    pub next_step: Option<String>,
    pub objection: Option<String>,
    pub intent: Option<String>,
    pub timeline: Option<String>,
    pub risk_signals: Vec<String>,
    pub scheduling_intent: Option<SchedulingIntent>,
    pub deal_signal: Option<DealSignal>,
    pub deal_stage_suggestion: Option<StageSuggestion>,
}

// =============================================================================
// Structured v2 schema
// =============================================================================

/// A text value with an extraction confidence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoredText {
    pub text: Option<String>,
    pub confidence: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Stakeholder {
    pub name: Option<String>,
    pub role: Option<String>,
    pub evidence: Option<String>,
    pub confidence: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Budget {
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub evidence: Option<String>,
    pub confidence: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSignal {
    pub text: Option<String>,
    pub evidence: Option<String>,
    pub confidence: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Objection {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub detail: Option<String>,
    pub evidence: Option<String>,
    pub severity: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskSignal {
    pub signal: Option<String>,
    pub evidence: Option<String>,
    pub impact_score: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Competitor {
    pub name: Option<String>,
    pub evidence: Option<String>,
}

/// One entry of the v2 `actions` array.
///
/// `action_type` is kept raw: an unrecognized type string skips that entry
/// during derivation instead of rejecting the whole document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StructuredAction {
    #[serde(rename = "type")]
    pub action_type: String,
    pub title: Option<String>,
    pub date_time: Option<String>,
    pub proposed_stage: Option<String>,
    pub evidence: Option<String>,
    pub confidence: Option<f32>,
}

/// Structured second-generation analysis document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StructuredAnalysis {
    pub summary: Option<ScoredText>,
    pub stakeholders: Vec<Stakeholder>,
    pub budget: Option<Budget>,
    pub timeline: Option<TimelineSignal>,
    pub objections: Vec<Objection>,
    pub risk_signals: Vec<RiskSignal>,
    pub competitors_mentioned: Vec<Competitor>,
    pub intent_score: Option<f32>,
    pub actions: Vec<StructuredAction>,
    pub deal_signal: Option<DealSignal>,
    pub deal_stage_suggestion: Option<StageSuggestion>,
}

// =============================================================================
// Resolved union
// =============================================================================

/// An analysis document with its schema generation resolved.
///
/// A document whose `actions` array is present and non-empty is Structured;
/// anything else is Legacy. Resolution happens once, here, so the
/// string-or-object ambiguity never leaks into downstream types.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Structured(StructuredAnalysis),
    Legacy(LegacyAnalysis),
}

impl AnalysisResult {
    /// Resolve a raw JSON document into the appropriate schema variant.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let has_actions = value
            .get("actions")
            .and_then(Value::as_array)
            .map(|a| !a.is_empty())
            .unwrap_or(false);

        if has_actions {
            Ok(AnalysisResult::Structured(serde_json::from_value(value)?))
        } else {
            Ok(AnalysisResult::Legacy(serde_json::from_value(value)?))
        }
    }

    /// Parse a raw JSON string.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    /// The neutral result substituted when extraction fails: a legacy
    /// document with no signals. Deriving from it yields no actions.
    pub fn empty() -> Self {
        AnalysisResult::Legacy(LegacyAnalysis::default())
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, AnalysisResult::Structured(_))
    }

    /// Executive summary text, if the analysis carries one.
    pub fn summary_text(&self) -> Option<&str> {
        match self {
            AnalysisResult::Structured(a) => a.summary.as_ref().and_then(|s| s.text.as_deref()),
            AnalysisResult::Legacy(a) => a.summary.as_deref(),
        }
    }

    /// Names of everyone the analysis identified on the call.
    pub fn participant_names(&self) -> Vec<String> {
        match self {
            AnalysisResult::Structured(a) => a
                .stakeholders
                .iter()
                .filter_map(|s| s.name.clone())
                .collect(),
            AnalysisResult::Legacy(a) => a.participants.clone(),
        }
    }

    /// Overall sentiment, defaulting to Neutral when absent.
    pub fn deal_signal(&self) -> DealSignal {
        match self {
            AnalysisResult::Structured(a) => a.deal_signal.unwrap_or_default(),
            AnalysisResult::Legacy(a) => a.deal_signal.unwrap_or_default(),
        }
    }

    /// The opaque JSON blob persisted on the meeting record.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ---- schema resolution ----

    #[test]
    fn test_non_empty_actions_resolves_structured() {
        let doc = json!({
            "summary": {"text": "Good call.", "confidence": 0.9},
            "actions": [
                {"type": "followup", "title": "Send deck", "confidence": 0.8}
            ]
        });
        let result = AnalysisResult::from_value(doc).unwrap();
        assert!(result.is_structured());
    }

    #[test]
    fn test_empty_actions_resolves_legacy() {
        let doc = json!({
            "summary": "Good call.",
            "actions": [],
            "nextStep": "Send the proposal"
        });
        let result = AnalysisResult::from_value(doc).unwrap();
        assert!(!result.is_structured());
        match result {
            AnalysisResult::Legacy(a) => {
                assert_eq!(a.next_step.as_deref(), Some("Send the proposal"))
            }
            AnalysisResult::Structured(_) => panic!("expected legacy"),
        }
    }

    #[test]
    fn test_missing_actions_resolves_legacy() {
        let doc = json!({"summary": "A call happened."});
        let result = AnalysisResult::from_value(doc).unwrap();
        assert!(!result.is_structured());
    }

    #[test]
    fn test_empty_object_resolves_legacy_with_defaults() {
        let result = AnalysisResult::from_value(json!({})).unwrap();
        match result {
            AnalysisResult::Legacy(a) => {
                assert!(a.summary.is_none());
                assert!(a.participants.is_empty());
                assert!(a.scheduling_intent.is_none());
            }
            AnalysisResult::Structured(_) => panic!("expected legacy"),
        }
    }

    #[test]
    fn test_from_json_str() {
        let result = AnalysisResult::from_json_str(r#"{"summary": "ok"}"#).unwrap();
        assert_eq!(result.summary_text(), Some("ok"));
        assert!(AnalysisResult::from_json_str("not json").is_err());
    }

    // ---- scheduling intent union ----

    #[test]
    fn test_scheduling_intent_phrase() {
        let doc = json!({"schedulingIntent": "Thursday at 4pm"});
        let result = AnalysisResult::from_value(doc).unwrap();
        let AnalysisResult::Legacy(a) = result else {
            panic!("expected legacy");
        };
        let intent = a.scheduling_intent.unwrap();
        assert_eq!(intent.date_text(), Some("Thursday at 4pm"));
        assert_eq!(intent.title(), None);
    }

    #[test]
    fn test_scheduling_intent_object() {
        let doc = json!({
            "schedulingIntent": {"title": "Demo", "dateTime": "2026-03-05T16:00:00"}
        });
        let result = AnalysisResult::from_value(doc).unwrap();
        let AnalysisResult::Legacy(a) = result else {
            panic!("expected legacy");
        };
        let intent = a.scheduling_intent.unwrap();
        assert_eq!(intent.date_text(), Some("2026-03-05T16:00:00"));
        assert_eq!(intent.title(), Some("Demo"));
    }

    // ---- stage suggestion union ----

    #[test]
    fn test_stage_suggestion_bare_string() {
        let doc = json!({"dealStageSuggestion": "Negotiation"});
        let AnalysisResult::Legacy(a) = AnalysisResult::from_value(doc).unwrap() else {
            panic!("expected legacy");
        };
        assert_eq!(a.deal_stage_suggestion.unwrap().stage_text(), Some("Negotiation"));
    }

    #[test]
    fn test_stage_suggestion_detailed() {
        let doc = json!({
            "actions": [{"type": "followup", "title": "t"}],
            "dealStageSuggestion": {
                "stage": "Proposal Sent",
                "reasoning": "Quote was requested.",
                "confidence": 0.7
            }
        });
        let AnalysisResult::Structured(a) = AnalysisResult::from_value(doc).unwrap() else {
            panic!("expected structured");
        };
        let suggestion = a.deal_stage_suggestion.unwrap();
        assert_eq!(suggestion.stage_text(), Some("Proposal Sent"));
        assert_eq!(suggestion.reasoning(), Some("Quote was requested."));
    }

    // ---- structured fields ----

    #[test]
    fn test_structured_fields_deserialize() {
        let doc = json!({
            "summary": {"text": "Strong buying signals.", "confidence": 0.85},
            "stakeholders": [
                {"name": "Dana", "role": "Budget Owner", "evidence": "I own the budget", "confidence": 0.9},
                {"role": "Unknown"}
            ],
            "budget": {"amount": 50000.0, "currency": "USD", "confidence": 0.8},
            "timeline": {"text": "Q2 rollout", "evidence": "live by June", "confidence": 0.75},
            "objections": [{"type": "Pricing", "detail": "Too high", "severity": 0.6}],
            "riskSignals": [{"signal": "Champion leaving", "impactScore": 0.5}],
            "competitorsMentioned": [{"name": "Acme"}],
            "intentScore": 0.8,
            "actions": [
                {"type": "schedule", "title": "Demo", "dateTime": "Thursday at 4pm", "confidence": 0.9}
            ],
            "dealSignal": "Positive"
        });
        let AnalysisResult::Structured(a) = AnalysisResult::from_value(doc).unwrap() else {
            panic!("expected structured");
        };
        assert_eq!(a.stakeholders.len(), 2);
        assert_eq!(a.stakeholders[1].name, None);
        assert_eq!(a.budget.as_ref().unwrap().amount, Some(50000.0));
        assert_eq!(a.timeline.as_ref().unwrap().text.as_deref(), Some("Q2 rollout"));
        assert_eq!(a.objections[0].kind.as_deref(), Some("Pricing"));
        assert_eq!(a.risk_signals[0].impact_score, Some(0.5));
        assert_eq!(a.competitors_mentioned[0].name.as_deref(), Some("Acme"));
        assert_eq!(a.actions[0].action_type, "schedule");
        assert_eq!(a.deal_signal, Some(DealSignal::Positive));
    }

    // ---- helpers ----

    #[test]
    fn test_empty_is_neutral() {
        let result = AnalysisResult::empty();
        assert!(!result.is_structured());
        assert!(result.summary_text().is_none());
        assert!(result.participant_names().is_empty());
        assert_eq!(result.deal_signal(), DealSignal::Neutral);
    }

    #[test]
    fn test_summary_text_both_schemas() {
        let legacy = AnalysisResult::from_value(json!({"summary": "flat"})).unwrap();
        assert_eq!(legacy.summary_text(), Some("flat"));

        let structured = AnalysisResult::from_value(json!({
            "summary": {"text": "scored", "confidence": 0.9},
            "actions": [{"type": "followup", "title": "t"}]
        }))
        .unwrap();
        assert_eq!(structured.summary_text(), Some("scored"));
    }

    #[test]
    fn test_participant_names_both_schemas() {
        let legacy = AnalysisResult::from_value(json!({"participants": ["Ana", "Bo"]})).unwrap();
        assert_eq!(legacy.participant_names(), vec!["Ana", "Bo"]);

        let structured = AnalysisResult::from_value(json!({
            "stakeholders": [{"name": "Ana"}, {"role": "Unknown"}, {"name": "Bo"}],
            "actions": [{"type": "followup", "title": "t"}]
        }))
        .unwrap();
        assert_eq!(structured.participant_names(), vec!["Ana", "Bo"]);
    }

    #[test]
    fn test_to_value_round_trips_through_resolution() {
        let doc = json!({
            "summary": {"text": "Good call.", "confidence": 0.9},
            "actions": [{"type": "email", "title": "Recap", "confidence": 0.8}]
        });
        let result = AnalysisResult::from_value(doc).unwrap();
        let blob = result.to_value();
        // The persisted blob resolves to the same schema generation again.
        let reparsed = AnalysisResult::from_value(blob).unwrap();
        assert!(reparsed.is_structured());
        assert_eq!(reparsed.summary_text(), Some("Good call."));
    }

    #[test]
    fn test_unknown_action_type_is_preserved_raw() {
        let doc = json!({
            "actions": [{"type": "carrier_pigeon", "title": "??"}]
        });
        let AnalysisResult::Structured(a) = AnalysisResult::from_value(doc).unwrap() else {
            panic!("expected structured");
        };
        assert_eq!(a.actions[0].action_type, "carrier_pigeon");
    }
}
