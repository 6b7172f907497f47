use crate::FakeError;
use lifecycle::{FanOut, FanOutStates};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tokio::time::sleep;

fn dashboard() -> FanOut<String, FakeError> {
    FanOut::builder()
        .operation("overview", || async {
            sleep(Duration::from_millis(30)).await;
            Ok("overview".to_string())
        })
        .operation("tasks", || async {
            Err(FakeError::status(404, "Task list unavailable"))
        })
        .operation("health", || async {
            sleep(Duration::from_millis(10)).await;
            Ok("healthy".to_string())
        })
        .build()
}

#[tokio::test(start_paused = true)]
async fn one_failure_does_not_block_others() -> anyhow::Result<()> {
    let fan_out = dashboard();

    fan_out.execute_all().await;

    assert!(!fan_out.any_loading());
    assert!(fan_out.any_error());
    assert_eq!(fan_out.result("overview").as_deref(), Some("overview"));
    assert_eq!(fan_out.result("health").as_deref(), Some("healthy"));
    assert_eq!(fan_out.result("tasks"), None);
    let errors = fan_out.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors["tasks"], "Task list unavailable");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn listener_tracks_aggregate() -> anyhow::Result<()> {
    let fan_out = dashboard();
    let snapshots: Rc<RefCell<Vec<FanOutStates<String>>>> = Rc::default();
    let sink = snapshots.clone();
    fan_out.subscribe(move |states| sink.borrow_mut().push(states.clone()));

    fan_out.execute_all().await;

    let snapshots = snapshots.borrow();
    assert!(snapshots.first().is_some_and(FanOutStates::any_loading));
    let last = snapshots.last().cloned().unwrap_or_default();
    assert!(!last.any_loading());
    assert_eq!(last.result("health").map(String::as_str), Some("healthy"));
    assert_eq!(last.error("tasks"), Some("Task list unavailable"));
    assert_eq!(last.errors().len(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn reset_clears_every_operation() -> anyhow::Result<()> {
    let fan_out = dashboard();
    fan_out.execute_all().await;

    fan_out.reset();

    assert!(!fan_out.any_error());
    assert!(fan_out.states().states.values().all(|s| s.is_idle()));
    assert_eq!(fan_out.names().collect::<Vec<_>>(), ["overview", "tasks", "health"]);
    Ok(())
}
