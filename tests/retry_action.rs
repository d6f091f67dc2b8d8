use std::sync::{Arc, Mutex};
use weighted_retry::{predicate, ResourceManager, ResourcePool, ResourcePoolExt, RetryAction};

/// Records every weight update handed to the retry loop.
#[derive(Default)]
struct Feedback {
    updates: Mutex<Vec<bool>>,
}

impl Feedback {
    fn record(&self, success: bool) {
        self.updates.lock().unwrap().push(success);
    }

    fn updates(&self) -> Vec<bool> {
        self.updates.lock().unwrap().clone()
    }
}

#[test]
fn two_failures_then_success() {
    let feedback = Feedback::default();
    let action = RetryAction::new(|| "tgt", |_: &&str, ok| feedback.record(ok));
    let errors = Mutex::new(Vec::new());
    let on_error = |_: &anyhow::Error, attempt: u32| errors.lock().unwrap().push(attempt);

    let result = action.execute_action(
        |_, attempt| {
            if attempt <= 2 {
                Err(anyhow::anyhow!("attempt {} failed", attempt))
            } else {
                Ok("done")
            }
        },
        predicate::max_attempts(3),
        Some(&on_error),
    );

    assert_eq!(result.unwrap(), "done");
    assert_eq!(feedback.updates(), vec![false, false, true]);
    assert_eq!(*errors.lock().unwrap(), vec![1, 2]);
}

#[test]
fn always_failing_stops_after_three_attempts() {
    let feedback = Feedback::default();
    let action = RetryAction::new(|| "tgt", |_: &&str, ok| feedback.record(ok));
    let mut attempts = Vec::new();

    let result: Result<(), anyhow::Error> = action.execute_action(
        |_, attempt| {
            attempts.push(attempt);
            Err(anyhow::anyhow!("attempt {} failed", attempt))
        },
        |attempt, _| attempt < 3,
        None,
    );

    assert_eq!(result.unwrap_err().to_string(), "attempt 3 failed");
    assert_eq!(attempts, vec![1, 2, 3]);
    assert_eq!(feedback.updates(), vec![false, false, false]);
}

#[test]
fn predicate_sees_the_operation_error() {
    #[derive(Debug, PartialEq)]
    enum CallError {
        Transient,
        Fatal,
    }

    let action = RetryAction::new(|| "tgt", |_: &&str, _| {});
    let mut calls = 0;
    let result: Result<(), CallError> = action.execute_action(
        |_, attempt| {
            calls += 1;
            if attempt == 1 {
                Err(CallError::Transient)
            } else {
                Err(CallError::Fatal)
            }
        },
        predicate::max_attempts_when(5, |e: &CallError| *e == CallError::Transient),
        None,
    );

    assert_eq!(result, Err(CallError::Fatal));
    assert_eq!(calls, 2);
}

#[tokio::test]
async fn async_two_failures_then_success() {
    let feedback = Arc::new(Feedback::default());
    let fb = Arc::clone(&feedback);
    let action = RetryAction::new(|| "tgt".to_string(), move |_: &String, ok| fb.record(ok));
    let errors = Mutex::new(Vec::new());
    let on_error = |_: &std::io::Error, attempt: u32| errors.lock().unwrap().push(attempt);

    let result = action
        .execute_async(
            |source, attempt| async move {
                tokio::task::yield_now().await;
                if attempt <= 2 {
                    Err(std::io::Error::other("unavailable"))
                } else {
                    Ok(format!("{}:{}", source, attempt))
                }
            },
            predicate::max_attempts(3),
            Some(&on_error),
        )
        .await;

    assert_eq!(result.unwrap(), "tgt:3");
    assert_eq!(feedback.updates(), vec![false, false, true]);
    assert_eq!(*errors.lock().unwrap(), vec![1, 2]);
}

#[tokio::test]
async fn diag_records_each_attempt_in_order() {
    let pool = ResourceManager::from_sources(["a", "b", "c"]).unwrap();

    let diag = pool
        .execute_async_with_diag(
            |source, attempt| async move {
                if attempt < 3 {
                    Err(format!("{} down", source))
                } else {
                    Ok(attempt * 10)
                }
            },
            predicate::max_attempts(5),
            None,
        )
        .await;

    assert_eq!(diag.len(), 3);
    let flags: Vec<(u32, bool)> = diag.iter().map(|r| (r.attempt, r.is_error())).collect();
    assert_eq!(flags, vec![(1, true), (2, true), (3, false)]);
    assert!(diag.is_success());
    assert_eq!(diag.last().result(), Some(&30));
    for record in diag.iter().filter(|r| r.is_error()) {
        assert_eq!(
            record.error().unwrap(),
            &format!("{} down", record.source)
        );
    }
}

#[tokio::test]
async fn diag_on_exhaustion_ends_with_error() {
    let pool = ResourceManager::from_sources(["only"]).unwrap();
    let on_error = |_: &&str, _: u32| {};

    let diag = pool
        .execute_async_with_diag(
            |_, _| async { Err::<u32, _>("nope") },
            predicate::max_attempts(2),
            Some(&on_error),
        )
        .await;

    assert_eq!(diag.attempt_count(), 2);
    assert!(diag.iter().all(|r| r.is_error()));
    assert_eq!(diag.into_result(), Err("nope"));
    assert_eq!(pool.resources()["only"].weight(), 1);
}

#[tokio::test]
async fn pool_shared_across_tasks() {
    let pool: Arc<dyn ResourcePool<&'static str>> =
        Arc::new(ResourceManager::from_sources(["a", "b"]).unwrap());

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let pool = Arc::clone(&pool);
            tokio::spawn(async move {
                pool.execute_async(
                    move |source, _| async move { Ok::<_, String>((i, source)) },
                    predicate::never(),
                    None,
                )
                .await
            })
        })
        .collect();

    for (i, task) in futures::future::join_all(tasks).await.into_iter().enumerate() {
        let (n, _source) = task.unwrap().unwrap();
        assert_eq!(n, i);
    }
    assert!(pool.resources().values().all(|w| w.weight() == 1000));
}
