//! Integration tests for the core-async facade.

use core_async::sync::CompletionSignal;
use core_async::{sync, task, time};
use std::sync::Arc;

#[core_async::test]
async fn test_task_spawn() {
    let handle = task::spawn(async { 42 });
    assert_eq!(handle.await.unwrap(), 42);
}

#[core_async::test]
async fn test_spawn_blocking_runs_cpu_work() {
    let handle = task::spawn_blocking(|| (1..=100u32).sum::<u32>());
    assert_eq!(handle.await.unwrap(), 5050);
}

#[core_async::test]
async fn test_timeout_elapses() {
    let result = time::timeout(time::Duration::from_millis(10), async {
        time::sleep(time::Duration::from_millis(200)).await;
    })
    .await;

    assert!(result.is_err());
}

#[core_async::test]
async fn test_rwlock_readers_and_writer() {
    let lock = Arc::new(sync::RwLock::new(vec![1, 2, 3]));

    let reader = Arc::clone(&lock);
    let len = task::spawn(async move { reader.read().await.len() })
        .await
        .unwrap();
    assert_eq!(len, 3);

    lock.write().await.push(4);
    assert_eq!(lock.read().await.len(), 4);
}

#[core_async::test]
async fn test_completion_signal_resolves_late_and_early_waiters() {
    let signal = Arc::new(CompletionSignal::new());

    let early = Arc::clone(&signal);
    let early_handle = task::spawn(async move { early.wait().await });

    time::sleep(time::Duration::from_millis(10)).await;
    assert!(signal.complete(Ok::<usize, String>(5)));

    let late = signal.wait().await;

    assert_eq!(early_handle.await.unwrap(), Ok(5));
    assert_eq!(late, Ok(5));
}

#[core_async::test]
async fn test_completion_signal_ignores_second_completion() {
    let signal = CompletionSignal::new();
    assert!(signal.complete("first"));
    assert!(!signal.complete("second"));
    assert_eq!(signal.wait().await, "first");
}

#[core_async::test]
async fn test_watch_channel_sees_latest_value() {
    let (tx, mut rx) = sync::watch::channel(0);

    task::spawn(async move {
        for i in 1..=3 {
            tx.send(i).unwrap();
            task::yield_now().await;
        }
    });

    let value = *rx.wait_for(|value| *value == 3).await.unwrap();
    assert_eq!(value, 3);
}
