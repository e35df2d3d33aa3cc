/*!
 * TM leverage engine and its supporting types.
 *
 * - `leverage::engine`: orchestration of the translate path
 * - `leverage::matching`: fuzzy candidate scoring and classification
 * - `leverage::result`: the leverage breakdown and its invariants
 */

pub mod engine;
pub mod matching;
pub mod result;

// Re-export main types
pub use engine::LeverageEngine;
pub use matching::{CandidateMatchType, FuzzyMatcher, TmCandidate};
pub use result::{AiScores, LeverageResult, MatchType, TmStats, WordMatch};
