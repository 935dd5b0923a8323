//! HTTP signal extractor.
//!
//! Posts the transcript to an OpenAI-compatible chat-completions endpoint
//! with Bearer auth and a forced JSON response format, then parses the
//! returned document into an [`AnalysisResult`]. The endpoint, model, and
//! timeout come from [`ExtractorConfig`].

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use dealflow_core::config::ExtractorConfig;

use crate::analysis::AnalysisResult;
use crate::error::ExtractError;
use crate::extractor::SignalExtractor;

/// Environment variable consulted when the config carries no API key.
const API_KEY_ENV: &str = "AI_API_KEY";

const SYSTEM_PROMPT: &str = "You are a Senior Sales Operations Analyst. You provide precise, \
     professional, and data-driven insights. Output strictly valid JSON.";

/// Extractor backed by a chat-completions API.
pub struct HttpExtractor {
    client: reqwest::Client,
    config: ExtractorConfig,
}

impl HttpExtractor {
    /// Build an extractor from config. The request timeout is applied at the
    /// client level so a stalled endpoint cannot hold an analysis open.
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ExtractError::Request(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn api_key(&self) -> Result<String, ExtractError> {
        self.config
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|k| !k.is_empty())
            .ok_or(ExtractError::NotConfigured)
    }
}

#[async_trait]
impl SignalExtractor for HttpExtractor {
    async fn extract(&self, transcript: &str) -> Result<AnalysisResult, ExtractError> {
        let api_key = self.api_key()?;
        let payload = build_payload(&self.config.model, transcript);

        let resp = self
            .client
            .post(&self.config.api_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractError::Timeout(self.config.timeout_seconds)
                } else {
                    ExtractError::Request(e.to_string())
                }
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(ExtractError::Request(format!(
                "extractor API error {}: {}",
                status, text
            )));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| ExtractError::MalformedResponse(e.to_string()))?;

        let content = body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ExtractError::MalformedResponse("unexpected API response structure".to_string())
            })?;

        debug!(bytes = content.len(), "extractor response received");

        let cleaned = strip_code_fences(content);
        AnalysisResult::from_json_str(&cleaned)
            .map_err(|e| ExtractError::MalformedResponse(e.to_string()))
    }
}

/// Chat-completions request body: deterministic decoding, JSON-only output.
fn build_payload(model: &str, transcript: &str) -> Value {
    serde_json::json!({
        "model": model,
        "messages": [
            {"role": "system", "content": SYSTEM_PROMPT},
            {"role": "user", "content": build_prompt(transcript)},
        ],
        "temperature": 0,
        "response_format": {"type": "json_object"},
    })
}

/// Extraction instructions describing the structured v2 contract.
fn build_prompt(transcript: &str) -> String {
    format!(
        r#"You are an enterprise Sales Intelligence Extraction Engine.

Extract strictly verifiable, structured signals from the B2B sales meeting
transcript below. Extract ONLY information explicitly supported by the
transcript; return null for anything not clearly stated, and for anything
with confidence below 0.6. Separate evidence from interpretation. Return
strictly valid JSON. No markdown. No commentary.

TRANSCRIPT:
---
{transcript}
---

RETURN JSON USING THIS EXACT SCHEMA:

{{
  "summary": {{"text": "4 sentence executive summary", "confidence": 0.0}},
  "stakeholders": [{{"name": "String", "role": "Decision Maker | Budget Owner | Influencer | Unknown", "evidence": "Short quote", "confidence": 0.0}}],
  "budget": {{"amount": 0, "currency": "USD | EUR | null", "evidence": "Quote or null", "confidence": 0.0}},
  "timeline": {{"text": "Exact timeline mentioned or null", "evidence": "Quote or null", "confidence": 0.0}},
  "objections": [{{"type": "Implementation | Pricing | Adoption | Competition | Other", "detail": "Specific objection", "evidence": "Quote", "severity": 0.0}}],
  "riskSignals": [{{"signal": "Description", "evidence": "Quote", "impactScore": 0.0}}],
  "competitorsMentioned": [{{"name": "String", "evidence": "Quote"}}],
  "intentScore": 0.0,
  "actions": [{{"type": "schedule | email | stage_update | followup", "title": "Short description", "dateTime": "ISO8601 or null", "evidence": "Quote supporting action", "confidence": 0.0}}],
  "dealSignal": "Positive | Neutral | Negative",
  "dealStageSuggestion": {{"stage": "String or null", "reasoning": "One sentence grounded in transcript", "confidence": 0.0}}
}}"#
    )
}

/// Strip Markdown code fences some models wrap around JSON output.
fn strip_code_fences(content: &str) -> String {
    content
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}
