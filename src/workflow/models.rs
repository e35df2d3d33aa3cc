/*!
 * Workflow data model.
 *
 * An adaptation project moves through seven ordered phases, each producing
 * a typed result. Phase results are a tagged union rather than opaque JSON
 * so that the phase-7 summary's defaulting behavior is a visible, testable
 * contract instead of implicit optional chaining.
 */

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Total number of workflow phases
pub const TOTAL_PHASES: u8 = 7;

/// One of the seven ordered localization phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    ContentCapture,
    TmTranslation,
    CulturalIntelligence,
    RegulatoryCompliance,
    QualityIntelligence,
    DamIntegration,
    IntegrationLineage,
}

impl Phase {
    /// Phase number, 1-based
    pub fn number(&self) -> u8 {
        match self {
            Phase::ContentCapture => 1,
            Phase::TmTranslation => 2,
            Phase::CulturalIntelligence => 3,
            Phase::RegulatoryCompliance => 4,
            Phase::QualityIntelligence => 5,
            Phase::DamIntegration => 6,
            Phase::IntegrationLineage => 7,
        }
    }

    /// Phase for a 1-based number
    pub fn from_number(n: u8) -> Option<Phase> {
        match n {
            1 => Some(Phase::ContentCapture),
            2 => Some(Phase::TmTranslation),
            3 => Some(Phase::CulturalIntelligence),
            4 => Some(Phase::RegulatoryCompliance),
            5 => Some(Phase::QualityIntelligence),
            6 => Some(Phase::DamIntegration),
            7 => Some(Phase::IntegrationLineage),
            _ => None,
        }
    }

    /// Human-readable phase name
    pub fn name(&self) -> &'static str {
        match self {
            Phase::ContentCapture => "Content Capture",
            Phase::TmTranslation => "TM Translation",
            Phase::CulturalIntelligence => "Cultural Intelligence",
            Phase::RegulatoryCompliance => "Regulatory Compliance",
            Phase::QualityIntelligence => "Quality Intelligence",
            Phase::DamIntegration => "DAM Integration",
            Phase::IntegrationLineage => "Integration & Lineage",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Typed result produced by completing one phase.
///
/// Each phase's variant is its contract with downstream consumers; the
/// phase-7 summary reads the translation, regulatory and quality variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum PhaseOutcome {
    /// Phase 1: source asset captured and segmented
    Capture {
        asset_name: String,
        segment_count: usize,
    },
    /// Phase 2: segments translated with TM leverage
    Translation {
        leverage_score: u8,
        segments_translated: usize,
    },
    /// Phase 3: cultural review applied
    Cultural {
        sensitivity_flags: Vec<String>,
        adaptations_applied: usize,
    },
    /// Phase 4: regulatory compliance review
    Regulatory {
        compliance_score: u8,
        open_findings: usize,
    },
    /// Phase 5: quality scoring
    Quality {
        quality_score: u8,
        review_notes: Vec<String>,
    },
    /// Phase 6: packaged for the DAM handoff
    Dam {
        package_id: String,
        asset_count: usize,
    },
    /// Phase 7: lineage recorded, project closed out
    Lineage { lineage_ref: String },
}

impl PhaseOutcome {
    /// The phase this outcome belongs to
    pub fn phase(&self) -> Phase {
        match self {
            PhaseOutcome::Capture { .. } => Phase::ContentCapture,
            PhaseOutcome::Translation { .. } => Phase::TmTranslation,
            PhaseOutcome::Cultural { .. } => Phase::CulturalIntelligence,
            PhaseOutcome::Regulatory { .. } => Phase::RegulatoryCompliance,
            PhaseOutcome::Quality { .. } => Phase::QualityIntelligence,
            PhaseOutcome::Dam { .. } => Phase::DamIntegration,
            PhaseOutcome::Lineage { .. } => Phase::IntegrationLineage,
        }
    }
}

/// Workflow progression state for one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    /// The phase currently open for completion, 1..=7
    pub current_phase: u8,
    /// Phase numbers already completed
    pub phases_completed: BTreeSet<u8>,
    /// Result stored for each completed phase
    pub phase_data: BTreeMap<u8, PhaseOutcome>,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowState {
    /// Initial state: phase 1 open, nothing completed
    pub fn new() -> Self {
        Self {
            current_phase: 1,
            phases_completed: BTreeSet::new(),
            phase_data: BTreeMap::new(),
        }
    }

    /// Read a completed phase's outcome, if present
    pub fn outcome(&self, phase_number: u8) -> Option<&PhaseOutcome> {
        self.phase_data.get(&phase_number)
    }

    /// TM leverage score from phase 2, defaulting when absent.
    ///
    /// Phases may be completed by heterogeneous external producers, so the
    /// summary tolerates any of these fields being missing.
    pub fn leverage_score_or(&self, default: u8) -> u8 {
        match self.outcome(Phase::TmTranslation.number()) {
            Some(PhaseOutcome::Translation { leverage_score, .. }) => *leverage_score,
            _ => default,
        }
    }

    /// Compliance score from phase 4, defaulting when absent
    pub fn compliance_score_or(&self, default: u8) -> u8 {
        match self.outcome(Phase::RegulatoryCompliance.number()) {
            Some(PhaseOutcome::Regulatory {
                compliance_score, ..
            }) => *compliance_score,
            _ => default,
        }
    }

    /// Quality score from phase 5, defaulting when absent
    pub fn quality_score_or(&self, default: u8) -> u8 {
        match self.outcome(Phase::QualityIntelligence.number()) {
            Some(PhaseOutcome::Quality { quality_score, .. }) => *quality_score,
            _ => default,
        }
    }
}

/// The unit the workflow state machine operates on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptationProject {
    pub id: String,
    pub brand_id: String,
    pub source_markets: BTreeSet<String>,
    pub target_markets: BTreeSet<String>,
    pub target_languages: BTreeSet<String>,
    pub therapeutic_area: String,
    pub indication: String,
    pub workflow: WorkflowState,
}

impl AdaptationProject {
    /// Create a project at workflow inception
    pub fn new(id: impl Into<String>, brand_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            brand_id: brand_id.into(),
            source_markets: BTreeSet::new(),
            target_markets: BTreeSet::new(),
            target_languages: BTreeSet::new(),
            therapeutic_area: String::new(),
            indication: String::new(),
            workflow: WorkflowState::new(),
        }
    }
}

/// Closing report synthesized when phase 7 completes.
///
/// This is the contract handed to downstream packaging/export tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionSummary {
    pub total_phases: u8,
    pub completed_phases: u8,
    pub quality_score: u8,
    pub compliance_score: u8,
    pub tm_leverage: u8,
}
