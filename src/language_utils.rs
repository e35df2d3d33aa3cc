use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// The engine works with market/language pairs supplied by upstream
/// configuration; this module validates and normalizes the codes so that
/// translation-memory lookups use a single canonical form.
/// Validate that a language code is a valid ISO 639-1 or ISO 639-3 code
pub fn validate_language_code(code: &str) -> Result<()> {
    let normalized = code.trim().to_lowercase();

    let valid = match normalized.len() {
        2 => Language::from_639_1(&normalized).is_some(),
        3 => Language::from_639_3(&normalized).is_some(),
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(anyhow!("Invalid language code: {}", code))
    }
}

/// Normalize a language code to its ISO 639-3 form (lowercase)
///
/// Both "fr" and "fra" normalize to "fra", which is the form stored in
/// translation-memory records.
pub fn normalize_language_code(code: &str) -> Result<String> {
    let normalized = code.trim().to_lowercase();

    let language = match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => Language::from_639_3(&normalized),
        _ => None,
    };

    language
        .map(|l| l.to_639_3().to_string())
        .ok_or_else(|| anyhow!("Cannot normalize language code: {}", code))
}

/// Check whether two language codes refer to the same language
pub fn language_codes_match(a: &str, b: &str) -> bool {
    match (normalize_language_code(a), normalize_language_code(b)) {
        (Ok(na), Ok(nb)) => na == nb,
        _ => false,
    }
}

/// Get the English name of a language from its code, if known
pub fn get_language_name(code: &str) -> Option<String> {
    let normalized = code.trim().to_lowercase();

    let language = match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => Language::from_639_3(&normalized),
        _ => None,
    };

    language.map(|l| l.to_name().to_string())
}
