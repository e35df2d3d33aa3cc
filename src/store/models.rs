/*!
 * Store entity models and DTOs.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data.
 */

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Translation status for individual segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationStatus {
    /// Segment awaiting translation
    Pending,
    /// Segment currently being translated
    Processing,
    /// Segment has a finished translation
    Complete,
    /// Translation was explicitly marked failed by the caller
    Failed,
}

impl fmt::Display for TranslationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationStatus::Pending => write!(f, "pending"),
            TranslationStatus::Processing => write!(f, "processing"),
            TranslationStatus::Complete => write!(f, "complete"),
            TranslationStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for TranslationStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(TranslationStatus::Pending),
            "processing" => Ok(TranslationStatus::Processing),
            "complete" => Ok(TranslationStatus::Complete),
            "failed" => Ok(TranslationStatus::Failed),
            _ => Err(anyhow::anyhow!("Invalid translation status: {}", s)),
        }
    }
}

/// How a segment's current translated text was produced.
///
/// Determines downstream promotion rules: `tm` segments are promoted into
/// the translation-memory index on save, `ai` segments get an audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationMethod {
    /// Reused from translation memory
    Tm,
    /// Freshly generated by the AI service
    Ai,
    /// Entered or corrected by a human
    Manual,
}

impl fmt::Display for TranslationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationMethod::Tm => write!(f, "tm"),
            TranslationMethod::Ai => write!(f, "ai"),
            TranslationMethod::Manual => write!(f, "manual"),
        }
    }
}

impl std::str::FromStr for TranslationMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tm" => Ok(TranslationMethod::Tm),
            "ai" => Ok(TranslationMethod::Ai),
            "manual" => Ok(TranslationMethod::Manual),
            _ => Err(anyhow::anyhow!("Invalid translation method: {}", s)),
        }
    }
}

/// Risk/complexity grading assigned by upstream analysis; read-only here
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::High => write!(f, "high"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::Low => write!(f, "low"),
        }
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(RiskLevel::High),
            "medium" => Ok(RiskLevel::Medium),
            "low" => Ok(RiskLevel::Low),
            _ => Err(anyhow::anyhow!("Invalid risk level: {}", s)),
        }
    }
}

/// Kind of translatable text a segment holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentType {
    Subject,
    Headline,
    Body,
    Cta,
    Disclaimer,
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentType::Subject => write!(f, "subject"),
            SegmentType::Headline => write!(f, "headline"),
            SegmentType::Body => write!(f, "body"),
            SegmentType::Cta => write!(f, "cta"),
            SegmentType::Disclaimer => write!(f, "disclaimer"),
        }
    }
}

impl std::str::FromStr for SegmentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "subject" => Ok(SegmentType::Subject),
            "headline" => Ok(SegmentType::Headline),
            "body" => Ok(SegmentType::Body),
            "cta" => Ok(SegmentType::Cta),
            "disclaimer" => Ok(SegmentType::Disclaimer),
            _ => Err(anyhow::anyhow!("Invalid segment type: {}", s)),
        }
    }
}

/// One unit of translatable text within an adaptation project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSegment {
    /// Opaque identifier, unique within a project
    pub id: String,
    /// Owning project
    pub project_id: String,
    /// Ordering within the source asset
    pub segment_index: i64,
    /// Kind of text this segment holds
    pub segment_type: SegmentType,
    /// Human-readable segment label
    pub segment_name: String,
    /// Source text; immutable once captured
    pub source_text: String,
    /// Translated text; None until a translation completes
    pub translated_text: Option<String>,
    /// Linguistic complexity grading from upstream analysis
    pub complexity_level: RiskLevel,
    /// Cultural sensitivity grading from upstream analysis
    pub cultural_sensitivity_level: RiskLevel,
    /// Regulatory risk grading from upstream analysis
    pub regulatory_risk_level: RiskLevel,
    /// Current translation status
    pub translation_status: TranslationStatus,
    /// How the current translated text was produced; None until translated
    pub translation_method: Option<TranslationMethod>,
    /// Confidence score 0-100 for the current translation
    pub confidence: u8,
    /// Percentage of words satisfied by translation memory, if computed
    pub tm_match_percentage: Option<u8>,
}

impl ContentSegment {
    /// Create a new pending segment for a captured source text
    pub fn new(
        id: impl Into<String>,
        project_id: impl Into<String>,
        segment_index: i64,
        segment_type: SegmentType,
        segment_name: impl Into<String>,
        source_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            segment_index,
            segment_type,
            segment_name: segment_name.into(),
            source_text: source_text.into(),
            translated_text: None,
            complexity_level: RiskLevel::Medium,
            cultural_sensitivity_level: RiskLevel::Medium,
            regulatory_risk_level: RiskLevel::Medium,
            translation_status: TranslationStatus::Pending,
            translation_method: None,
            confidence: 0,
            tm_match_percentage: None,
        }
    }

    /// The match type a promotion of this segment should carry, derived
    /// from its recorded TM match percentage rather than hardcoded.
    pub fn promotion_match_type(&self) -> TmMatchKind {
        match self.tm_match_percentage {
            Some(100) => TmMatchKind::Exact,
            Some(p) if p > 0 => TmMatchKind::Fuzzy,
            _ => TmMatchKind::New,
        }
    }
}

/// Match type recorded on a translation-memory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TmMatchKind {
    Exact,
    Fuzzy,
    New,
}

impl fmt::Display for TmMatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TmMatchKind::Exact => write!(f, "exact"),
            TmMatchKind::Fuzzy => write!(f, "fuzzy"),
            TmMatchKind::New => write!(f, "new"),
        }
    }
}

impl std::str::FromStr for TmMatchKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(TmMatchKind::Exact),
            "fuzzy" => Ok(TmMatchKind::Fuzzy),
            "new" => Ok(TmMatchKind::New),
            _ => Err(anyhow::anyhow!("Invalid TM match kind: {}", s)),
        }
    }
}

/// Kind of translation-memory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TmEntryKind {
    /// A full previously translated segment
    Segment,
    /// A curated terminology/glossary pairing
    Terminology,
}

impl fmt::Display for TmEntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TmEntryKind::Segment => write!(f, "segment"),
            TmEntryKind::Terminology => write!(f, "terminology"),
        }
    }
}

impl std::str::FromStr for TmEntryKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "segment" => Ok(TmEntryKind::Segment),
            "terminology" => Ok(TmEntryKind::Terminology),
            _ => Err(anyhow::anyhow!("Invalid TM entry kind: {}", s)),
        }
    }
}

/// A long-term translation-memory record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TmEntryRecord {
    pub id: String,
    pub project_id: String,
    pub segment_id: String,
    pub source_text: String,
    pub translated_text: String,
    /// Normalized ISO 639-3 source language code
    pub source_language: String,
    /// Normalized ISO 639-3 target language code
    pub target_language: String,
    /// Optional domain scope, e.g. therapeutic area
    pub domain_context: Option<String>,
    pub entry_kind: TmEntryKind,
    /// Match type recorded at translation time; preserved through promotion
    pub match_type: TmMatchKind,
    pub usage_count: i64,
    pub approved_by: Option<String>,
    pub created_at: i64,
    pub last_used_at: i64,
}

impl TmEntryRecord {
    /// Create a new segment-kind entry for promotion
    #[allow(clippy::too_many_arguments)]
    pub fn for_promotion(
        project_id: impl Into<String>,
        segment_id: impl Into<String>,
        source_text: impl Into<String>,
        translated_text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
        domain_context: Option<String>,
        match_type: TmMatchKind,
    ) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: Uuid::new_v4().to_string(),
            project_id: project_id.into(),
            segment_id: segment_id.into(),
            source_text: source_text.into(),
            translated_text: translated_text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
            domain_context,
            entry_kind: TmEntryKind::Segment,
            match_type,
            usage_count: 0,
            approved_by: None,
            created_at: now,
            last_used_at: now,
        }
    }
}

/// Audit record for raw AI output, written on save for every AI-translated
/// segment so generated text stays reviewable after later manual edits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAuditRecord {
    pub id: String,
    pub project_id: String,
    pub segment_id: String,
    pub source_text: String,
    pub raw_output: String,
    pub model: String,
    pub created_at: i64,
}

impl AiAuditRecord {
    pub fn new(
        project_id: impl Into<String>,
        segment_id: impl Into<String>,
        source_text: impl Into<String>,
        raw_output: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            project_id: project_id.into(),
            segment_id: segment_id.into(),
            source_text: source_text.into(),
            raw_output: raw_output.into(),
            model: model.into(),
            created_at: Utc::now().timestamp(),
        }
    }
}

/// Full workflow snapshot persisted by the autosave controller.
///
/// One row per project; saving replaces the previous snapshot as a single
/// atomic logical write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub project_id: String,
    /// JSON serialization of the full segment collection
    pub segments_json: String,
    /// Current workflow phase marker
    pub current_phase: u8,
    /// JSON array of completed phase numbers
    pub phases_completed_json: String,
    /// Overall progress percentage at save time
    pub progress: u8,
    /// SHA-256 hex digest of the serialized payload
    pub content_hash: String,
    pub saved_at: i64,
}
