use crate::{Calls, FakeError};
use futures::channel::oneshot;
use lifecycle::{Phase, Request, RequestOptions, RequestState, RetryPolicy};
use proptest::prelude::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tokio::task::{LocalSet, spawn_local, yield_now};

type Pending = Rc<RefCell<HashMap<u32, oneshot::Receiver<Result<u32, FakeError>>>>>;

/// A request whose call `n` resolves when the test sends on the matching
/// channel.
fn controlled(
    options: RequestOptions<u32>,
) -> (Request<u32, u32, FakeError>, Pending) {
    let pending: Pending = Rc::default();
    let receivers = pending.clone();
    let request = Request::new(
        move |n: u32| {
            let receiver = receivers.borrow_mut().remove(&n);
            async move {
                match receiver {
                    Some(receiver) => receiver
                        .await
                        .unwrap_or_else(|_| Err(FakeError::no_response())),
                    None => Err(FakeError::status(400, "unexpected call")),
                }
            }
        },
        options.retry(RetryPolicy::none()),
    );
    (request, pending)
}

fn channel(pending: &Pending, n: u32) -> oneshot::Sender<Result<u32, FakeError>> {
    let (sender, receiver) = oneshot::channel();
    pending.borrow_mut().insert(n, receiver);
    sender
}

/// How many calls to start, whether each one succeeds, the order their
/// answers arrive in, and whether each call reaches its network wait before
/// the next one supersedes it.
fn call_schedule() -> impl Strategy<Value = (Vec<bool>, Vec<usize>, bool)> {
    (1usize..=6).prop_flat_map(|calls| {
        (
            prop::collection::vec(any::<bool>(), calls),
            Just((0..calls).collect::<Vec<_>>()).prop_shuffle(),
            any::<bool>(),
        )
    })
}

/// Start one call per entry of `succeeds`, answer them in `order`, and
/// return the final state with the success and error callback counts.
fn run_schedule(
    succeeds: &[bool],
    order: &[usize],
    settle_between_calls: bool,
) -> (RequestState<u32>, u32, u32) {
    let successes = Calls::default();
    let errors = Calls::default();
    let (on_success, on_error) = (successes.clone(), errors.clone());
    let (request, pending) = controlled(
        RequestOptions::default()
            .on_success(move |_| {
                on_success.hit();
            })
            .on_error(move |_| {
                on_error.hit();
            }),
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let state = LocalSet::new().block_on(&runtime, async {
        let mut senders = Vec::new();
        let mut handles = Vec::new();
        for n in (1..).take(succeeds.len()) {
            senders.push(Some(channel(&pending, n)));
            handles.push(spawn_local(request.execute(n)));
            if settle_between_calls {
                yield_now().await;
            }
        }

        for &index in order {
            let n = index as u32 + 1;
            let answer = if succeeds[index] {
                Ok(n * 100)
            } else {
                Err(FakeError::status(500, format!("failure {n}")))
            };
            if let Some(sender) = senders[index].take() {
                let _ = sender.send(answer);
            }
            yield_now().await;
        }
        for handle in handles {
            handle.await.unwrap();
        }
        request.state()
    });
    (state, successes.count(), errors.count())
}

proptest! {
    #[test]
    fn last_initiated_call_wins((succeeds, order, settle) in call_schedule()) {
        let (state, successes, errors) = run_schedule(&succeeds, &order, settle);
        let last = succeeds.len() as u32;

        prop_assert!(!state.loading);
        if succeeds[succeeds.len() - 1] {
            prop_assert_eq!(state.data, Some(last * 100));
            prop_assert_eq!(state.error, None);
            prop_assert!(state.success);
            prop_assert_eq!((successes, errors), (1, 0));
        } else {
            // Every earlier call was superseded, so no data ever landed.
            prop_assert_eq!(state.data, None);
            prop_assert_eq!(state.error, Some(format!("failure {last}")));
            prop_assert!(!state.success);
            prop_assert_eq!((successes, errors), (0, 1));
        }
    }
}

#[tokio::test]
async fn superseded_failure_is_ignored() -> anyhow::Result<()> {
    let errors = Calls::default();
    let counter = errors.clone();
    let (request, pending) =
        controlled(RequestOptions::default().on_error(move |_| {
            counter.hit();
        }));

    LocalSet::new()
        .run_until(async move {
            let first_sender = channel(&pending, 1);
            let first = spawn_local(request.execute(1));
            yield_now().await;

            let second_sender = channel(&pending, 2);
            let second = spawn_local(request.execute(2));
            let _ = second_sender.send(Ok(2));
            second.await?;

            let _ = first_sender.send(Err(FakeError::status(500, "late")));
            first.await?;

            assert_eq!(request.state().data, Some(2));
            assert_eq!(request.state().error, None);
            assert_eq!(errors.count(), 0);
            anyhow::Ok(())
        })
        .await
}

#[tokio::test]
async fn reset_returns_to_idle() -> anyhow::Result<()> {
    let (request, pending) = controlled(RequestOptions::default());

    let sender = channel(&pending, 1);
    let _ = sender.send(Ok(7));
    request.execute(1).await;
    assert_eq!(request.phase(), Phase::Succeeded);

    request.reset();
    assert_eq!(request.state(), RequestState::default());

    let sender = channel(&pending, 2);
    let _ = sender.send(Err(FakeError::status(404, "missing")));
    request.execute(2).await;
    assert_eq!(request.phase(), Phase::Failed);

    request.reset();
    assert_eq!(request.state(), RequestState::default());
    assert_eq!(request.phase(), Phase::Idle);
    Ok(())
}

#[tokio::test]
async fn reset_discards_in_flight_call() -> anyhow::Result<()> {
    let (request, pending) = controlled(RequestOptions::default());

    LocalSet::new()
        .run_until(async move {
            let sender = channel(&pending, 1);
            let call = spawn_local(request.execute(1));
            yield_now().await;
            assert!(request.state().loading);

            request.reset();
            let _ = sender.send(Ok(1));
            call.await?;

            assert_eq!(request.state(), RequestState::default());
            anyhow::Ok(())
        })
        .await
}

#[tokio::test]
async fn teardown_stops_everything() -> anyhow::Result<()> {
    let callbacks = Calls::default();
    let counter = callbacks.clone();
    let (request, pending) =
        controlled(RequestOptions::default().on_success(move |_| {
            counter.hit();
        }));
    let notifications = Calls::default();
    let seen = notifications.clone();
    request.subscribe(move |_| {
        seen.hit();
    });

    LocalSet::new()
        .run_until(async move {
            let sender = channel(&pending, 1);
            let call = spawn_local(request.execute(1));
            yield_now().await;
            let before = notifications.count();

            request.teardown();
            let _ = sender.send(Ok(1));
            call.await?;

            assert_eq!(request.state().data, None);
            assert_eq!(callbacks.count(), 0);
            assert_eq!(notifications.count(), before);

            // Further calls are ignored.
            channel(&pending, 2);
            request.execute(2).await;
            assert_eq!(request.state().data, None);
            assert!(pending.borrow().contains_key(&2));
            anyhow::Ok(())
        })
        .await
}

#[tokio::test]
async fn refetch_requires_prior_success() -> anyhow::Result<()> {
    let calls = Calls::default();
    let counter = calls.clone();
    let request: Request<u32, u32, FakeError> = Request::new(
        move |n| {
            counter.hit();
            async move { Ok(n * 2) }
        },
        RequestOptions::default(),
    );

    request.refetch().await;
    assert_eq!(calls.count(), 0);
    assert_eq!(request.phase(), Phase::Idle);

    request.execute(21).await;
    assert_eq!(request.state().data, Some(42));

    request.refetch().await;
    assert_eq!(calls.count(), 2);
    assert_eq!(request.state().data, Some(42));
    Ok(())
}

#[tokio::test]
async fn listener_sees_pending_then_result() -> anyhow::Result<()> {
    let request: Request<(), &'static str, FakeError> = Request::new(
        |()| async { Ok("done") },
        RequestOptions::default(),
    );
    let phases = Rc::new(RefCell::new(Vec::new()));
    let sink = phases.clone();
    request.subscribe(move |state| sink.borrow_mut().push(state.phase()));

    request.execute(()).await;

    assert_eq!(*phases.borrow(), vec![Phase::Pending, Phase::Succeeded]);
    Ok(())
}
