/*!
 * Mock translator implementations for testing.
 *
 * This module provides mock translators that simulate different behaviors:
 * - `MockTranslator::working()` - Always succeeds with a leverage result
 * - `MockTranslator::failing()` - Always fails with an error
 * - `MockTranslator::intermittent(n)` - Fails every Nth request
 * - `MockTranslator::miscounted()` - Returns inconsistent word stats
 */

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{AnalysisDetail, AnalysisRequest, GenerativeTranslator, TranslateRequest, WordRationale};
use crate::errors::ProviderError;
use crate::leverage::matching::CandidateMatchType;
use crate::leverage::result::{AiScores, LeverageResult, MatchType, TmStats, WordMatch};

/// Behavior mode for the mock translator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a proper leverage result
    Working,
    /// Always fails with a connection error
    Failing,
    /// Fails every Nth request
    Intermittent { fail_every: usize },
    /// Succeeds but returns empty translated text
    Empty,
    /// Succeeds but returns word stats that do not add up
    Miscounted,
    /// Simulates a slow response
    Slow { delay_ms: u64 },
}

/// Mock translator for testing engine behavior
#[derive(Debug)]
pub struct MockTranslator {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter for intermittent failures
    request_count: Arc<AtomicUsize>,
    /// Segment ids that always fail, regardless of behavior mode
    fail_segments: HashSet<String>,
    /// Leverage plan applied to successful results: (exact, fuzzy) word
    /// counts taken from the front of the source text, remainder new
    leverage_plan: Option<(usize, usize)>,
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            fail_segments: HashSet::new(),
            leverage_plan: None,
        }
    }

    /// Create a working mock translator that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock translator that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create an intermittently failing mock translator
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a mock that returns empty translated text
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that returns inconsistent word accounting
    pub fn miscounted() -> Self {
        Self::new(MockBehavior::Miscounted)
    }

    /// Mark specific segment ids as always failing
    pub fn with_failing_segments<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fail_segments = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Apply a fixed leverage plan to successful results
    pub fn with_leverage_plan(mut self, exact_words: usize, fuzzy_words: usize) -> Self {
        self.leverage_plan = Some((exact_words, fuzzy_words));
        self
    }

    /// Number of translate requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    fn breakdown_for(&self, request: &TranslateRequest) -> (Vec<WordMatch>, TmStats) {
        let words: Vec<&str> = request.source_text.split_whitespace().collect();
        let total = words.len();

        let (exact, fuzzy) = match self.leverage_plan {
            Some((e, f)) => {
                let e = e.min(total);
                let f = f.min(total - e);
                (e, f)
            }
            None if request.use_tm_leverage => {
                // Without an explicit plan, an exact candidate leverages
                // every word, any other candidate marks them all fuzzy
                match request.tm_candidates.first().map(|c| c.match_type) {
                    Some(CandidateMatchType::Exact) => (total, 0),
                    Some(_) => (0, total),
                    None => (0, 0),
                }
            }
            None => (0, 0),
        };

        let tm_source = request.tm_candidates.first().map(|c| c.source_text.clone());

        let breakdown = words
            .iter()
            .enumerate()
            .map(|(i, w)| {
                if i < exact {
                    WordMatch {
                        word: (*w).to_string(),
                        match_type: MatchType::Exact,
                        match_score: 100,
                        tm_source_text: tm_source.clone(),
                    }
                } else if i < exact + fuzzy {
                    WordMatch {
                        word: (*w).to_string(),
                        match_type: MatchType::Fuzzy,
                        match_score: 85,
                        tm_source_text: tm_source.clone(),
                    }
                } else {
                    WordMatch::new_word(*w)
                }
            })
            .collect();

        (breakdown, TmStats::from_counts(exact, fuzzy, total - exact - fuzzy))
    }
}

#[async_trait]
impl GenerativeTranslator for MockTranslator {
    async fn translate(&self, request: TranslateRequest) -> Result<LeverageResult, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.fail_segments.contains(&request.segment_id) {
            return Err(ProviderError::RequestFailed(format!(
                "Scripted failure for segment {}",
                request.segment_id
            )));
        }

        match self.behavior {
            MockBehavior::Failing => {
                return Err(ProviderError::ConnectionError(
                    "Mock connection refused".to_string(),
                ));
            }
            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == 0 {
                    return Err(ProviderError::RequestFailed(format!(
                        "Intermittent mock failure on request {}",
                        count
                    )));
                }
            }
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
            }
            _ => {}
        }

        if self.behavior == MockBehavior::Empty {
            return Ok(LeverageResult {
                translated_text: String::new(),
                word_breakdown: Vec::new(),
                tm_stats: TmStats::default(),
                ai_scores: AiScores::default(),
                review_flags: Vec::new(),
            });
        }

        let (word_breakdown, tm_stats) = self.breakdown_for(&request);

        if self.behavior == MockBehavior::Miscounted {
            // Deliberately broken accounting to exercise the repair path
            return Ok(LeverageResult {
                translated_text: format!("[{}] {}", request.target_language, request.source_text),
                word_breakdown: Vec::new(),
                tm_stats: TmStats {
                    exact_words: 7,
                    fuzzy_words: 7,
                    new_words: 7,
                    total_words: 3,
                    leverage_percentage: 99,
                },
                ai_scores: AiScores::default(),
                review_flags: Vec::new(),
            });
        }

        Ok(LeverageResult {
            translated_text: format!("[{}] {}", request.target_language, request.source_text),
            word_breakdown,
            tm_stats,
            ai_scores: AiScores {
                medical: 92,
                brand: 88,
                cultural: 90,
                reasoning: vec!["Mock scoring".to_string()],
            },
            review_flags: Vec::new(),
        })
    }

    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisDetail, ProviderError> {
        if self.behavior == MockBehavior::Failing {
            return Err(ProviderError::ConnectionError(
                "Mock connection refused".to_string(),
            ));
        }

        let word_rationale = request
            .source_text
            .split_whitespace()
            .map(|w| WordRationale {
                word: w.to_string(),
                match_type: MatchType::New,
                rationale: "Mock rationale".to_string(),
            })
            .collect();

        Ok(AnalysisDetail {
            segment_id: request.segment_id,
            word_rationale,
            summary: "Mock analysis".to_string(),
        })
    }

    fn model(&self) -> &str {
        "mock-translator"
    }
}
