use crate::{Calls, FakeError};
use lifecycle::{Poller, Request, RequestOptions, RetryPolicy};
use std::time::Duration;
use tokio::task::{LocalSet, spawn_local};
use tokio::time::sleep;

const INTERVAL: Duration = Duration::from_millis(100);

fn counting_request(
    calls: &Calls,
    latency: Duration,
) -> Request<(), u32, FakeError> {
    let counter = calls.clone();
    Request::new(
        move |()| {
            let n = counter.hit();
            async move {
                sleep(latency).await;
                Ok(n)
            }
        },
        RequestOptions::default().retry(RetryPolicy::none()),
    )
}

#[tokio::test(start_paused = true)]
async fn polls_immediately_then_on_interval() -> anyhow::Result<()> {
    let calls = Calls::default();
    let poller = Poller::new(counting_request(&calls, Duration::ZERO), INTERVAL);

    LocalSet::new()
        .run_until(async move {
            spawn_local(poller.run());
            sleep(Duration::from_millis(10)).await;
            assert_eq!(calls.count(), 1);

            sleep(Duration::from_millis(240)).await;
            assert_eq!(calls.count(), 3);
            assert_eq!(poller.request().state().data, Some(3));
            anyhow::Ok(())
        })
        .await
}

#[tokio::test(start_paused = true)]
async fn disabling_stops_new_fetches() -> anyhow::Result<()> {
    let calls = Calls::default();
    let poller = Poller::new(counting_request(&calls, Duration::ZERO), INTERVAL);

    LocalSet::new()
        .run_until(async move {
            spawn_local(poller.run());
            sleep(Duration::from_millis(150)).await;
            assert_eq!(calls.count(), 2);

            poller.stop();
            assert!(!poller.is_running());
            sleep(Duration::from_millis(1_000)).await;
            assert_eq!(calls.count(), 2);

            // Re-enabling fetches right away.
            spawn_local(poller.run());
            sleep(Duration::from_millis(10)).await;
            assert_eq!(calls.count(), 3);
            sleep(Duration::from_millis(100)).await;
            assert_eq!(calls.count(), 4);
            anyhow::Ok(())
        })
        .await
}

#[tokio::test(start_paused = true)]
async fn in_flight_fetch_completes_after_stop() -> anyhow::Result<()> {
    let calls = Calls::default();
    let poller = Poller::new(
        counting_request(&calls, Duration::from_millis(50)),
        INTERVAL,
    );

    LocalSet::new()
        .run_until(async move {
            spawn_local(poller.run());
            sleep(Duration::from_millis(20)).await;
            assert!(poller.request().state().loading);

            poller.stop();
            sleep(Duration::from_millis(500)).await;

            let state = poller.request().state();
            assert!(state.success);
            assert_eq!(state.data, Some(1));
            assert_eq!(calls.count(), 1);
            anyhow::Ok(())
        })
        .await
}

#[tokio::test(start_paused = true)]
async fn teardown_ends_polling() -> anyhow::Result<()> {
    let calls = Calls::default();
    let poller = Poller::new(counting_request(&calls, Duration::ZERO), INTERVAL);

    LocalSet::new()
        .run_until(async move {
            spawn_local(poller.run());
            sleep(Duration::from_millis(50)).await;
            poller.teardown();
            sleep(Duration::from_millis(500)).await;

            assert_eq!(calls.count(), 1);
            assert!(poller.request().is_torn_down());
            anyhow::Ok(())
        })
        .await
}

#[tokio::test(start_paused = true)]
async fn slow_fetches_keep_the_cadence() -> anyhow::Result<()> {
    let calls = Calls::default();
    let poller = Poller::new(
        counting_request(&calls, Duration::from_millis(60)),
        INTERVAL,
    );

    LocalSet::new()
        .run_until(async move {
            spawn_local(poller.run());
            // Starts at 0, 100 and 200 regardless of the 60ms latency.
            sleep(Duration::from_millis(250)).await;
            assert_eq!(calls.count(), 3);
            assert_eq!(poller.request().state().data, Some(2));

            sleep(Duration::from_millis(20)).await;
            assert_eq!(poller.request().state().data, Some(3));
            anyhow::Ok(())
        })
        .await
}

#[tokio::test(start_paused = true)]
async fn fetch_longer_than_interval_never_overlaps() -> anyhow::Result<()> {
    let calls = Calls::default();
    let poller = Poller::new(
        counting_request(&calls, Duration::from_millis(150)),
        INTERVAL,
    );

    LocalSet::new()
        .run_until(async move {
            spawn_local(poller.run());
            sleep(Duration::from_millis(120)).await;
            assert_eq!(calls.count(), 1);

            // The overdue fetch starts when the first lands at 150.
            sleep(Duration::from_millis(40)).await;
            assert_eq!(calls.count(), 2);
            assert_eq!(poller.request().state().data, Some(1));

            sleep(Duration::from_millis(150)).await;
            assert_eq!(calls.count(), 3);
            assert_eq!(poller.request().state().data, Some(2));
            anyhow::Ok(())
        })
        .await
}
