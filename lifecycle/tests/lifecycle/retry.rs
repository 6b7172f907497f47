use crate::{Calls, FakeError};
use lifecycle::{Phase, Request, RequestOptions, RetryPolicy};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tokio::time::Instant;

fn policy(retries: u32) -> RequestOptions<u32> {
    RequestOptions::default()
        .retry(RetryPolicy::new(retries, Duration::from_millis(100)))
}

#[tokio::test(start_paused = true)]
async fn succeeds_after_k_retryable_failures() -> anyhow::Result<()> {
    for k in 0..4 {
        let calls = Calls::default();
        let counter = calls.clone();
        let request = Request::new(
            move |()| {
                let n = counter.hit();
                async move {
                    if n <= k {
                        Err(FakeError::status(503, "unavailable"))
                    } else {
                        Ok(n)
                    }
                }
            },
            policy(k),
        );

        request.execute(()).await;

        let state = request.state();
        assert!(state.success, "k = {k}");
        assert_eq!(state.data, Some(k + 1));
        assert_eq!(state.error, None);
        assert_eq!(calls.count(), k + 1);
        assert_eq!(request.retry_count(), 0);
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn always_failing_surfaces_last_error() -> anyhow::Result<()> {
    let calls = Calls::default();
    let counter = calls.clone();
    let errors = Rc::new(RefCell::new(Vec::new()));
    let sink = errors.clone();
    let request = Request::new(
        move |()| {
            let n = counter.hit();
            async move { Err::<u32, _>(FakeError::status(500, format!("failure {n}"))) }
        },
        policy(3).on_error(move |message| sink.borrow_mut().push(message.to_string())),
    );

    request.execute(()).await;

    assert_eq!(calls.count(), 4);
    assert_eq!(request.phase(), Phase::Failed);
    assert_eq!(request.state().error.as_deref(), Some("failure 4"));
    assert_eq!(*errors.borrow(), vec!["failure 4".to_string()]);
    assert_eq!(request.retry_count(), 0);

    // A fresh call gets a fresh budget.
    request.execute(()).await;
    assert_eq!(calls.count(), 8);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn client_errors_are_never_retried() -> anyhow::Result<()> {
    for status in [400, 401, 404, 422, 429] {
        let calls = Calls::default();
        let counter = calls.clone();
        let request = Request::new(
            move |()| {
                counter.hit();
                async move { Err::<u32, _>(FakeError::status(status, "Not Found")) }
            },
            policy(5),
        );

        request.execute(()).await;

        assert_eq!(calls.count(), 1, "status {status}");
        assert_eq!(request.phase(), Phase::Failed);
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn missing_response_is_retried() -> anyhow::Result<()> {
    let calls = Calls::default();
    let counter = calls.clone();
    let request = Request::new(
        move |()| {
            counter.hit();
            async move { Err::<u32, _>(FakeError::no_response()) }
        },
        policy(2),
    );

    request.execute(()).await;

    assert_eq!(calls.count(), 3);
    assert_eq!(request.state().error.as_deref(), Some("Network error"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn backoff_doubles_between_attempts() -> anyhow::Result<()> {
    let started = Instant::now();
    let times = Rc::new(RefCell::new(Vec::new()));
    let sink = times.clone();
    let request = Request::new(
        move |()| {
            sink.borrow_mut().push(started.elapsed());
            async move { Err::<u32, _>(FakeError::status(502, "bad gateway")) }
        },
        policy(3),
    );

    request.execute(()).await;

    let times = times.borrow();
    let gaps: Vec<Duration> = times.windows(2).map(|w| w[1] - w[0]).collect();
    assert_eq!(
        gaps,
        vec![
            Duration::from_millis(100),
            Duration::from_millis(200),
            Duration::from_millis(400),
        ]
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn stale_data_survives_failure() -> anyhow::Result<()> {
    let calls = Calls::default();
    let counter = calls.clone();
    let request = Request::new(
        move |()| {
            let n = counter.hit();
            async move {
                if n == 1 {
                    Ok(10)
                } else {
                    Err(FakeError::status(404, "gone"))
                }
            }
        },
        policy(0),
    );

    request.execute(()).await;
    request.execute(()).await;

    let state = request.state();
    assert_eq!(state.data, Some(10));
    assert_eq!(state.error.as_deref(), Some("gone"));
    assert!(!state.success);
    assert!(!state.loading);
    Ok(())
}
