//! Tests for the exponential-backoff retry envelope.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use storyboard_error::{GeminiError, GeminiErrorKind};
use storyboard_rate_limit::{RetryPolicy, invoke};
use tokio::time::Instant;

fn unavailable() -> GeminiError {
    GeminiError::new(GeminiErrorKind::HttpError {
        status_code: 503,
        message: "UNAVAILABLE: The model is overloaded".to_string(),
    })
}

fn invalid_argument() -> GeminiError {
    GeminiError::new(GeminiErrorKind::HttpError {
        status_code: 400,
        message: "INVALID_ARGUMENT: Request contains an invalid argument".to_string(),
    })
}

#[tokio::test(start_paused = true)]
async fn transient_failures_stop_after_max_retries_plus_one_attempts() {
    let attempts = AtomicU32::new(0);
    let policy = RetryPolicy::new(2, 100);

    let result: Result<(), GeminiError> = invoke(policy, || async {
        attempts.fetch_add(1, Ordering::SeqCst);
        Err(unavailable())
    })
    .await;

    assert!(result.is_err());
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn backoff_doubles_between_attempts() {
    let instants = Mutex::new(Vec::new());
    let policy = RetryPolicy::new(2, 100);

    let _: Result<(), GeminiError> = invoke(policy, || async {
        instants.lock().unwrap().push(Instant::now());
        Err(unavailable())
    })
    .await;

    let instants = instants.into_inner().unwrap();
    assert_eq!(instants.len(), 3);
    assert_eq!(instants[1] - instants[0], Duration::from_millis(100));
    assert_eq!(instants[2] - instants[1], Duration::from_millis(200));
}

#[tokio::test(start_paused = true)]
async fn non_transient_failure_makes_exactly_one_attempt() {
    let attempts = AtomicU32::new(0);

    let result: Result<(), GeminiError> = invoke(RetryPolicy::general(), || async {
        attempts.fetch_add(1, Ordering::SeqCst);
        Err(invalid_argument())
    })
    .await;

    assert_eq!(attempts.load(Ordering::SeqCst), 1);
    let err = result.unwrap_err();
    assert_eq!(
        err.kind,
        GeminiErrorKind::HttpError {
            status_code: 400,
            message: "INVALID_ARGUMENT: Request contains an invalid argument".to_string(),
        }
    );
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_surface_the_original_error() {
    let result: Result<(), GeminiError> =
        invoke(RetryPolicy::new(1, 10), || async { Err(unavailable()) }).await;

    let err = result.unwrap_err();
    assert_eq!(err.kind.status_code(), Some(503));
    assert!(err.to_string().contains("UNAVAILABLE: The model is overloaded"));
}

#[tokio::test(start_paused = true)]
async fn recovers_when_a_later_attempt_succeeds() {
    let attempts = AtomicU32::new(0);

    let result = invoke(RetryPolicy::new(3, 50), || async {
        let n = attempts.fetch_add(1, Ordering::SeqCst);
        if n < 2 {
            Err(GeminiError::new(GeminiErrorKind::Transport(
                "error sending request for url".to_string(),
            )))
        } else {
            Ok("panels")
        }
    })
    .await;

    assert_eq!(result.unwrap(), "panels");
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn zero_retries_means_single_attempt() {
    let attempts = AtomicU32::new(0);

    let result: Result<(), GeminiError> = invoke(RetryPolicy::new(0, 2000), || async {
        attempts.fetch_add(1, Ordering::SeqCst);
        Err(unavailable())
    })
    .await;

    assert!(result.is_err());
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[test]
fn presets_match_call_families() {
    assert_eq!(RetryPolicy::general(), RetryPolicy::new(3, 2000));
    assert_eq!(RetryPolicy::image(), RetryPolicy::new(2, 2000));
    assert_eq!(RetryPolicy::speech().max_attempts(), 3);
    assert_eq!(RetryPolicy::image().delays().count(), 2);
}
