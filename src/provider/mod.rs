/*!
 * Provider implementations for the generative translation service.
 *
 * The Generative Translation Function is an opaque boundary: given a
 * source text, a language pair, domain context and any translation-memory
 * candidates, it decides internally how much memory-sourced text to emit
 * versus freshly generated text, and returns the full leverage result.
 * The engine orchestrates and validates; it never reimplements the
 * service's matching heuristics.
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::ProviderError;
use crate::leverage::matching::TmCandidate;
use crate::leverage::result::{LeverageResult, MatchType};

/// Request passed across the generative translation boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub source_text: String,
    pub source_language: String,
    pub target_language: String,
    /// Optional domain scope, e.g. therapeutic area
    pub domain_context: Option<String>,
    /// Whether memory candidates should be leveraged at all
    pub use_tm_leverage: bool,
    pub project_id: String,
    pub segment_id: String,
    /// Ranked candidate prior translations, best first
    pub tm_candidates: Vec<TmCandidate>,
}

/// Request for the on-demand deep analysis path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub source_text: String,
    pub translated_text: String,
    pub segment_id: String,
}

/// Word-level rationale produced by the deep analysis path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRationale {
    pub word: String,
    pub match_type: MatchType,
    pub rationale: String,
}

/// On-demand deep-dive analysis for a translated segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDetail {
    pub segment_id: String,
    pub word_rationale: Vec<WordRationale>,
    pub summary: String,
}

/// Common trait for generative translation providers
///
/// This trait defines the interface that all provider implementations must
/// follow, allowing them to be used interchangeably by the leverage engine.
#[async_trait]
pub trait GenerativeTranslator: Send + Sync + Debug {
    /// Translate one segment's source text, returning the full leverage
    /// result including the word-level breakdown
    async fn translate(&self, request: TranslateRequest) -> Result<LeverageResult, ProviderError>;

    /// Produce a word-level rationale for an existing translation.
    ///
    /// Supplementary enrichment: callers treat a failure as "no analysis",
    /// never as a translation failure.
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisDetail, ProviderError>;

    /// Model identifier reported in audit records
    fn model(&self) -> &str;
}

pub mod mock;
pub mod remote;
