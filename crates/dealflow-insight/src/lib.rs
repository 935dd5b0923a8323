//! Signal extraction boundary for Dealflow.
//!
//! Models the versioned JSON contract produced by the transcript analyzer
//! and provides extractor implementations behind the [`SignalExtractor`]
//! trait. Downstream crates consume [`AnalysisResult`] and never see the
//! raw two-schema ambiguity.

pub mod analysis;
pub mod error;
pub mod extractor;
pub mod http;

pub use analysis::{
    AnalysisResult, LegacyAnalysis, SchedulingIntent, StageSuggestion, StructuredAction,
    StructuredAnalysis,
};
pub use error::ExtractError;
pub use extractor::{SignalExtractor, StaticExtractor};
pub use http::HttpExtractor;
