/*!
 * TM leverage engine.
 *
 * Orchestrates one translation attempt per segment: ensures the segment
 * row exists, gathers translation-memory candidates, delegates to the
 * generative translation function, validates the returned word accounting
 * and records the finished translation. Prefers reused prior translations
 * over newly generated text wherever quality permits.
 */

use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::TranslationConfig;
use crate::errors::TranslationError;
use crate::language_utils::normalize_language_code;
use crate::provider::{AnalysisDetail, AnalysisRequest, GenerativeTranslator, TranslateRequest};
use crate::store::Repository;
use crate::store::models::{ContentSegment, TranslationMethod};

use super::matching::{FuzzyMatcher, TmCandidate};
use super::result::LeverageResult;

/// Engine producing translations with auditable leverage breakdowns
pub struct LeverageEngine {
    /// Segment store repository
    repo: Repository,
    /// The generative translation function boundary
    translator: Arc<dyn GenerativeTranslator>,
    /// Candidate scorer
    matcher: FuzzyMatcher,
    /// Leverage settings
    config: TranslationConfig,
}

impl LeverageEngine {
    /// Create a new engine over a repository and translation provider
    pub fn new(
        repo: Repository,
        translator: Arc<dyn GenerativeTranslator>,
        config: TranslationConfig,
    ) -> Self {
        let matcher = FuzzyMatcher::new(config.fuzzy_threshold);
        Self {
            repo,
            translator,
            matcher,
            config,
        }
    }

    /// Translate one segment's source text.
    ///
    /// On success the segment row is updated with the translated text,
    /// `complete` status, the derived translation method and confidence.
    /// On failure the stored row is left untouched so a transient outage
    /// is never recorded as a terminal failure; the caller decides whether
    /// to retry or mark the segment failed.
    pub async fn translate_segment(
        &self,
        segment: &ContentSegment,
        source_language: &str,
        target_language: &str,
        domain_context: Option<&str>,
        use_tm_leverage: bool,
    ) -> Result<LeverageResult, TranslationError> {
        if segment.source_text.trim().is_empty() {
            return Err(TranslationError::EmptySource(segment.id.clone()));
        }

        let source_lang = canonical_language(source_language);
        let target_lang = canonical_language(target_language);

        // The row must exist before anything downstream updates it.
        // Duplicate inserts are ignored, not errors.
        self.repo
            .upsert_segment(segment)
            .await
            .map_err(|e| TranslationError::Unavailable(format!("Segment upsert failed: {}", e)))?;

        let tm_candidates = if use_tm_leverage {
            self.gather_candidates(segment, &source_lang, &target_lang, domain_context)
                .await
        } else {
            Vec::new()
        };

        let request = TranslateRequest {
            source_text: segment.source_text.clone(),
            source_language: source_lang,
            target_language: target_lang,
            domain_context: domain_context.map(|d| d.to_string()),
            use_tm_leverage,
            project_id: segment.project_id.clone(),
            segment_id: segment.id.clone(),
            tm_candidates,
        };

        let mut result = self.translator.translate(request).await?;

        if result.translated_text.trim().is_empty() {
            return Err(TranslationError::Unavailable(format!(
                "Provider returned empty translation for segment {}",
                segment.id
            )));
        }

        if result.enforce_word_conservation(&segment.source_text) {
            warn!(
                "Repaired inconsistent word accounting for segment {}; leverage reset to 0",
                segment.id
            );
        }

        let method = self.derive_method(&result, use_tm_leverage);
        let confidence = result.confidence();

        self.repo
            .update_segment_translation(
                &segment.project_id,
                &segment.id,
                &result.translated_text,
                method,
                confidence,
                Some(result.tm_stats.leverage_percentage),
            )
            .await
            .map_err(|e| {
                TranslationError::Unavailable(format!("Failed to record translation: {}", e))
            })?;

        debug!(
            "Segment {} translated: {}% leverage, method {}",
            segment.id, result.tm_stats.leverage_percentage, method
        );

        Ok(result)
    }

    /// Translate an ordered list of segments strictly sequentially.
    ///
    /// The generative service is rate-limited and per-call cost is high, so
    /// batch runs pace themselves with a fixed inter-call delay instead of
    /// running concurrently. A failure on one segment is logged and skipped;
    /// a single bad segment must never abort the batch. The returned map
    /// contains only the segments that succeeded.
    pub async fn translate_all_segments<F>(
        &self,
        segments: &[ContentSegment],
        source_language: &str,
        target_language: &str,
        domain_context: Option<&str>,
        on_progress: F,
    ) -> HashMap<String, LeverageResult>
    where
        F: Fn(usize, usize),
    {
        let total = segments.len();
        let mut results = HashMap::new();

        for (index, segment) in segments.iter().enumerate() {
            match self
                .translate_segment(
                    segment,
                    source_language,
                    target_language,
                    domain_context,
                    self.config.use_tm_leverage,
                )
                .await
            {
                Ok(result) => {
                    results.insert(segment.id.clone(), result);

                    // Pacing between successful calls only; the last
                    // segment needs no trailing delay
                    if index + 1 < total && self.config.inter_call_delay_ms > 0 {
                        tokio::time::sleep(Duration::from_millis(self.config.inter_call_delay_ms))
                            .await;
                    }
                }
                Err(e) => {
                    error!("Segment {} failed to translate: {}", segment.id, e);
                }
            }

            on_progress(index + 1, total);
        }

        info!(
            "Batch translation finished: {}/{} segments succeeded",
            results.len(),
            total
        );

        results
    }

    /// On-demand word-level deep dive for an already translated segment.
    ///
    /// Decoupled from the main translate path so bulk translation is not
    /// slowed by expensive analysis. Returns None on any failure; this is
    /// supplementary enrichment, never a blocking operation.
    pub async fn load_analysis_for_segment(
        &self,
        segment: &ContentSegment,
    ) -> Option<AnalysisDetail> {
        let translated_text = segment.translated_text.as_ref()?;

        let request = AnalysisRequest {
            source_text: segment.source_text.clone(),
            translated_text: translated_text.clone(),
            segment_id: segment.id.clone(),
        };

        match self.translator.analyze(request).await {
            Ok(detail) => Some(detail),
            Err(e) => {
                debug!("Analysis unavailable for segment {}: {}", segment.id, e);
                None
            }
        }
    }

    /// Record reviewer approval of fuzzy matches on a segment.
    ///
    /// Approval strengthens existing memory confidence in place; it never
    /// fabricates a new TM entry. Entry creation into long-term memory is
    /// the persistence controller's batch-save job. Errors are absorbed and
    /// logged; returns whether an entry was strengthened.
    pub async fn approve_fuzzy_matches(
        &self,
        project_id: &str,
        segment_id: &str,
        reviewer_id: &str,
    ) -> bool {
        match self
            .repo
            .touch_tm_entry(project_id, segment_id, reviewer_id)
            .await
        {
            Ok(true) => {
                info!(
                    "Fuzzy matches approved for segment {} by {}",
                    segment_id, reviewer_id
                );
                true
            }
            Ok(false) => {
                debug!(
                    "No TM entry to approve for segment {}; skipping",
                    segment_id
                );
                false
            }
            Err(e) => {
                warn!("TM approval failed for segment {}: {}", segment_id, e);
                false
            }
        }
    }

    /// Confirm a reviewed translation for future reuse.
    ///
    /// Same update-existing semantics as `approve_fuzzy_matches`: an
    /// existing entry gets its usage count and approval metadata refreshed,
    /// a missing entry is a no-op.
    pub async fn add_to_tm(&self, project_id: &str, segment_id: &str, reviewer_id: &str) -> bool {
        match self
            .repo
            .touch_tm_entry(project_id, segment_id, reviewer_id)
            .await
        {
            Ok(updated) => {
                if updated {
                    info!(
                        "TM entry confirmed for segment {} by {}",
                        segment_id, reviewer_id
                    );
                }
                updated
            }
            Err(e) => {
                warn!("TM confirmation failed for segment {}: {}", segment_id, e);
                false
            }
        }
    }

    /// Look up and rank TM candidates; lookup failures degrade to an empty
    /// candidate list rather than failing the translation
    async fn gather_candidates(
        &self,
        segment: &ContentSegment,
        source_language: &str,
        target_language: &str,
        domain_context: Option<&str>,
    ) -> Vec<TmCandidate> {
        match self
            .repo
            .list_tm_entries(source_language, target_language, domain_context)
            .await
        {
            Ok(entries) => {
                let candidates =
                    self.matcher
                        .rank_candidates(&segment.source_text, segment.segment_type, &entries);
                debug!(
                    "{} TM candidates for segment {} ({} entries scanned)",
                    candidates.len(),
                    segment.id,
                    entries.len()
                );
                candidates
            }
            Err(e) => {
                warn!(
                    "TM lookup failed for segment {}; continuing without leverage: {}",
                    segment.id, e
                );
                Vec::new()
            }
        }
    }

    /// Decide the recorded translation method for a result
    fn derive_method(&self, result: &LeverageResult, use_tm_leverage: bool) -> TranslationMethod {
        if use_tm_leverage
            && result.tm_stats.leverage_percentage >= self.config.tm_method_threshold
        {
            TranslationMethod::Tm
        } else {
            TranslationMethod::Ai
        }
    }
}

/// Normalize a language code for TM lookups, falling back to the trimmed
/// lowercase form when the code is not a recognized ISO 639 code
fn canonical_language(code: &str) -> String {
    normalize_language_code(code).unwrap_or_else(|_| code.trim().to_lowercase())
}
