/*!
 * Leverage result types.
 *
 * A `LeverageResult` is the output of one translation attempt for a
 * segment: the translated text itself plus an auditable word-level
 * breakdown of how much prior translation memory was reused.
 *
 * Two invariants hold for every result the engine hands out:
 * - exact_words + fuzzy_words + new_words == total_words, and total_words
 *   equals the whitespace-tokenized word count of the source text
 * - leverage_percentage == round(100 * (exact + fuzzy) / total) when
 *   total > 0, else 0
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Word-level match classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Word satisfied by an identical prior translation
    Exact,
    /// Word satisfied by a similar prior translation
    Fuzzy,
    /// Word freshly generated
    New,
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchType::Exact => write!(f, "exact"),
            MatchType::Fuzzy => write!(f, "fuzzy"),
            MatchType::New => write!(f, "new"),
        }
    }
}

/// One word of the source text with its match provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordMatch {
    /// The source word
    pub word: String,
    /// How the word was satisfied
    pub match_type: MatchType,
    /// Similarity score 0-100 for the match
    pub match_score: u8,
    /// Source text of the TM entry the match came from, if any
    pub tm_source_text: Option<String>,
}

impl WordMatch {
    /// A freshly generated word with no memory provenance
    pub fn new_word(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            match_type: MatchType::New,
            match_score: 0,
            tm_source_text: None,
        }
    }
}

/// Aggregate translation-memory statistics for one result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TmStats {
    pub exact_words: usize,
    pub fuzzy_words: usize,
    pub new_words: usize,
    pub total_words: usize,
    /// round(100 * (exact + fuzzy) / total), 0 when total is 0
    pub leverage_percentage: u8,
}

impl TmStats {
    /// Build stats from word counts, computing total and leverage
    pub fn from_counts(exact_words: usize, fuzzy_words: usize, new_words: usize) -> Self {
        let total_words = exact_words + fuzzy_words + new_words;
        Self {
            exact_words,
            fuzzy_words,
            new_words,
            total_words,
            leverage_percentage: leverage_percentage(exact_words + fuzzy_words, total_words),
        }
    }

    /// Stats for a result where every word is freshly generated
    pub fn all_new(total_words: usize) -> Self {
        Self::from_counts(0, 0, total_words)
    }

    /// Whether the counts are internally consistent
    pub fn is_consistent(&self) -> bool {
        self.exact_words + self.fuzzy_words + self.new_words == self.total_words
            && self.leverage_percentage
                == leverage_percentage(self.exact_words + self.fuzzy_words, self.total_words)
    }
}

/// Compute the leverage percentage for leveraged/total word counts
pub fn leverage_percentage(leveraged: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (100.0 * leveraged as f64 / total as f64).round() as u8
}

/// Whitespace-tokenized word count, the canonical count for all stats
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Quality scores attached by the generative service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AiScores {
    /// Medical/clinical accuracy score 0-100
    pub medical: u8,
    /// Brand voice adherence score 0-100
    pub brand: u8,
    /// Cultural appropriateness score 0-100
    pub cultural: u8,
    /// Free-form reasoning lines behind the scores
    pub reasoning: Vec<String>,
}

impl AiScores {
    /// Mean of the three scores, used as the segment confidence value
    pub fn mean(&self) -> u8 {
        ((self.medical as u16 + self.brand as u16 + self.cultural as u16) / 3) as u8
    }
}

/// The output of one translation attempt for a segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeverageResult {
    /// The produced translation
    pub translated_text: String,
    /// Ordered per-word provenance for the source text
    pub word_breakdown: Vec<WordMatch>,
    /// Aggregate reuse statistics
    pub tm_stats: TmStats,
    /// Quality scores from the generative service
    pub ai_scores: AiScores,
    /// Concerns requiring human review
    pub review_flags: Vec<String>,
}

impl LeverageResult {
    /// Validate this result against its source text and repair it if the
    /// word accounting does not add up.
    ///
    /// The engine enforces the word-conservation invariant regardless of
    /// what the translation service returned: on any discrepancy the whole
    /// breakdown is rebuilt as all-new words, leverage drops to 0, and the
    /// discrepancy is flagged for human review. Returns true when a repair
    /// was applied.
    pub fn enforce_word_conservation(&mut self, source_text: &str) -> bool {
        let expected = word_count(source_text);
        let breakdown_ok = self.word_breakdown.len() == expected;
        let stats_ok = self.tm_stats.total_words == expected && self.tm_stats.is_consistent();

        if breakdown_ok && stats_ok {
            return false;
        }

        self.word_breakdown = source_text
            .split_whitespace()
            .map(WordMatch::new_word)
            .collect();
        self.tm_stats = TmStats::all_new(expected);
        self.review_flags.push(format!(
            "Word accounting mismatch from translation service (expected {} words); leverage reset to 0",
            expected
        ));
        true
    }

    /// Confidence value recorded on the segment for this result
    pub fn confidence(&self) -> u8 {
        self.ai_scores.mean()
    }
}
