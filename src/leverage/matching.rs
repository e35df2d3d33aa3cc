/*!
 * Translation-memory candidate matching.
 *
 * Provides Levenshtein distance-based fuzzy matching to score stored TM
 * entries against a segment's source text, and classifies each candidate
 * as exact, fuzzy, context or terminology.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::store::models::{SegmentType, TmEntryKind, TmEntryRecord};

/// Match classification for a whole TM candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateMatchType {
    /// Identical source text after normalization
    Exact,
    /// Similar but not identical source text
    Fuzzy,
    /// Similar text of the same segment type
    Context,
    /// Terminology entry contained in the source text
    Terminology,
}

impl fmt::Display for CandidateMatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateMatchType::Exact => write!(f, "exact"),
            CandidateMatchType::Fuzzy => write!(f, "fuzzy"),
            CandidateMatchType::Context => write!(f, "context"),
            CandidateMatchType::Terminology => write!(f, "terminology"),
        }
    }
}

/// A scored TM candidate handed to the generative translation function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TmCandidate {
    /// Id of the underlying TM entry
    pub entry_id: String,
    /// Source text of the prior translation
    pub source_text: String,
    /// The prior translation itself
    pub translated_text: String,
    /// Classification of the match
    pub match_type: CandidateMatchType,
    /// Similarity score 0-100
    pub match_score: u8,
}

/// Fuzzy matcher using normalized Levenshtein distance
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    /// Similarity threshold for fuzzy classification (0.0-1.0)
    fuzzy_threshold: f32,
    /// Relaxed threshold for same-segment-type context matches
    context_threshold: f32,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.7,
            context_threshold: 0.6,
        }
    }
}

impl FuzzyMatcher {
    /// Create a matcher with a custom fuzzy threshold; the context
    /// threshold trails it by 0.1.
    pub fn new(fuzzy_threshold: f32) -> Self {
        let fuzzy_threshold = fuzzy_threshold.clamp(0.0, 1.0);
        Self {
            fuzzy_threshold,
            context_threshold: (fuzzy_threshold - 0.1).max(0.0),
        }
    }

    /// Calculate similarity between two strings (0.0-1.0)
    pub fn similarity(&self, a: &str, b: &str) -> f32 {
        if a.is_empty() && b.is_empty() {
            return 1.0;
        }
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }

        let a_norm = normalize(a);
        let b_norm = normalize(b);

        if a_norm == b_norm {
            return 1.0;
        }

        let distance = levenshtein_distance(&a_norm, &b_norm);
        let max_len = a_norm.chars().count().max(b_norm.chars().count());

        1.0 - (distance as f32 / max_len as f32)
    }

    /// Classify one stored entry against a source text.
    ///
    /// Returns None when the entry is not close enough to be useful.
    pub fn classify(
        &self,
        source_text: &str,
        segment_type: SegmentType,
        entry: &TmEntryRecord,
    ) -> Option<TmCandidate> {
        // Terminology entries match by containment, not whole-text similarity
        if entry.entry_kind == TmEntryKind::Terminology {
            let haystack = normalize(source_text);
            let needle = normalize(&entry.source_text);
            if !needle.is_empty() && haystack.contains(&needle) {
                return Some(TmCandidate {
                    entry_id: entry.id.clone(),
                    source_text: entry.source_text.clone(),
                    translated_text: entry.translated_text.clone(),
                    match_type: CandidateMatchType::Terminology,
                    match_score: 100,
                });
            }
            return None;
        }

        let similarity = self.similarity(source_text, &entry.source_text);
        let score = (similarity * 100.0).round() as u8;

        let match_type = if (similarity - 1.0).abs() < f32::EPSILON {
            CandidateMatchType::Exact
        } else if similarity >= self.fuzzy_threshold {
            CandidateMatchType::Fuzzy
        } else if similarity >= self.context_threshold
            && entry_segment_type_matches(entry, segment_type)
        {
            CandidateMatchType::Context
        } else {
            return None;
        };

        Some(TmCandidate {
            entry_id: entry.id.clone(),
            source_text: entry.source_text.clone(),
            translated_text: entry.translated_text.clone(),
            match_type,
            match_score: score,
        })
    }

    /// Score and rank all entries against a source text, best first
    pub fn rank_candidates(
        &self,
        source_text: &str,
        segment_type: SegmentType,
        entries: &[TmEntryRecord],
    ) -> Vec<TmCandidate> {
        let mut candidates: Vec<TmCandidate> = entries
            .iter()
            .filter_map(|e| self.classify(source_text, segment_type, e))
            .collect();

        candidates.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        candidates
    }
}

/// Segment-type affinity for context matches. Stored entries do not carry
/// their original segment type, so domain-scoped entries are treated as
/// same-context; the relaxed threshold still gates them.
fn entry_segment_type_matches(entry: &TmEntryRecord, _segment_type: SegmentType) -> bool {
    entry.domain_context.is_some()
}

/// Lowercase and collapse whitespace for comparison
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Calculate Levenshtein distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    // Two-row optimization for space efficiency
    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row: Vec<usize> = vec![0; b_len + 1];

    for i in 1..=a_len {
        curr_row[0] = i;

        for j in 1..=b_len {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };

            curr_row[j] = (prev_row[j] + 1)
                .min(curr_row[j - 1] + 1)
                .min(prev_row[j - 1] + cost);
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_len]
}
