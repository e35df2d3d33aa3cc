/*!
 * Tests for error display and classification
 */

use locadapt::errors::{
    AdaptationError, PersistenceError, ProviderError, TranslationError, WorkflowError,
};

#[test]
fn test_providerError_display_shouldIncludeDetail() {
    let err = ProviderError::ApiError {
        status_code: 500,
        message: "internal error".to_string(),
    };
    assert_eq!(err.to_string(), "API responded with error: 500 - internal error");

    let err = ProviderError::RateLimitExceeded("slow down".to_string());
    assert!(err.to_string().contains("Rate limit exceeded"));
}

#[test]
fn test_workflowError_display_shouldNamePhases() {
    let err = WorkflowError::PhaseOutOfOrder {
        attempted: 5,
        current: 2,
    };
    assert_eq!(
        err.to_string(),
        "Phase 5 cannot be completed while phase 2 is still in progress"
    );

    let err = WorkflowError::OutcomeMismatch {
        attempted: 1,
        outcome_phase: 4,
    };
    assert!(err.to_string().contains("phase 4"));
    assert!(err.to_string().contains("phase 1"));
}

#[test]
fn test_persistenceError_display_shouldReportAttempts() {
    let err = PersistenceError::RetriesExhausted {
        attempts: 3,
        message: "disk full".to_string(),
    };
    assert_eq!(err.to_string(), "Autosave failed after 3 attempts: disk full");
}

#[test]
fn test_translationError_isRetryable_shouldClassifyCauses() {
    assert!(TranslationError::Unavailable("timeout".to_string()).is_retryable());
    assert!(!TranslationError::EmptySource("seg-1".to_string()).is_retryable());

    let retryable = TranslationError::Provider(ProviderError::ConnectionError(
        "connection refused".to_string(),
    ));
    assert!(retryable.is_retryable());

    let auth = TranslationError::Provider(ProviderError::AuthenticationError(
        "bad key".to_string(),
    ));
    assert!(!auth.is_retryable());

    let parse = TranslationError::Provider(ProviderError::ParseError(
        "unexpected body".to_string(),
    ));
    assert!(!parse.is_retryable());
}

#[test]
fn test_adaptationError_fromSubsystemErrors_shouldWrap() {
    let err: AdaptationError = WorkflowError::InvalidPhase(9).into();
    assert!(matches!(err, AdaptationError::Workflow(_)));
    assert!(err.to_string().contains("Invalid phase number: 9"));

    let err: AdaptationError = TranslationError::EmptySource("seg-1".to_string()).into();
    assert!(matches!(err, AdaptationError::Translation(_)));

    let err: AdaptationError = ProviderError::RequestFailed("boom".to_string()).into();
    assert!(matches!(err, AdaptationError::Provider(_)));

    let err: AdaptationError = PersistenceError::Storage("locked".to_string()).into();
    assert!(matches!(err, AdaptationError::Persistence(_)));
}

#[test]
fn test_adaptationError_fromAnyhow_shouldBecomeUnknown() {
    let err: AdaptationError = anyhow::anyhow!("something odd").into();
    assert!(matches!(err, AdaptationError::Unknown(_)));
    assert!(err.to_string().contains("something odd"));
}

#[test]
fn test_translationError_fromProvider_shouldPreserveMessage() {
    let err: TranslationError = ProviderError::ApiError {
        status_code: 429,
        message: "too many requests".to_string(),
    }
    .into();
    assert!(err.to_string().contains("429"));
    assert!(err.is_retryable());
}
