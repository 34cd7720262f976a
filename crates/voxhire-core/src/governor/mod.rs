//! Outbound request governor
//!
//! Serializes every provider call through a single-flight FIFO queue with a
//! minimum-interval (cooldown) policy shared across all jobs and persisted
//! outside process memory. Provider throttling is absorbed by exactly one
//! in-queue retry per job; everything else fails fast so the queue can never
//! stall behind a broken job.
//!
//! A single worker task owns the pending sequence: jobs arrive over an
//! unbounded channel and are admitted one at a time, so mutual exclusion and
//! submission-order execution are structural rather than flag-based. Each
//! job carries a oneshot sender, which guarantees its caller's future
//! settles exactly once and never synchronously.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};

use crate::constants::governor::MAX_RETRIES;
use crate::error::ProviderError;

mod store;

pub use store::{CooldownStore, MemoryCooldownStore, StoreError};

/// A retryable attempt: runs one execution of the job's task and, on
/// success, settles the caller's result slot itself.
type Attempt = Box<dyn FnMut() -> BoxFuture<'static, Result<(), ProviderError>> + Send>;

/// Terminal rejection: settles the result slot with the original error.
type Reject = Box<dyn FnOnce(ProviderError) + Send>;

struct Job {
    label: String,
    attempt: Attempt,
    reject: Reject,
    retries: u32,
}

/// Single-flight, rate-limited, retrying queue for outbound provider calls.
///
/// Cloning is cheap; all clones feed the same worker.
#[derive(Clone)]
pub struct RequestQueue {
    tx: mpsc::UnboundedSender<Job>,
}

impl RequestQueue {
    /// Spawn the governor worker.
    ///
    /// `cooldown` is the minimum spacing between the completion of one call
    /// and the start of the next; `store` is the durable slot for the shared
    /// last-call timestamp.
    pub fn new(cooldown: Duration, store: Arc<dyn CooldownStore>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(drain(rx, cooldown, store));
        Self { tx }
    }

    /// Enqueue a task and await its final outcome.
    ///
    /// `task` is a factory producing one execution attempt; it may be called
    /// a second time if the provider throttles the first attempt. Jobs
    /// execute strictly in submission order, one at a time, and a terminal
    /// failure carries the original error.
    pub async fn add<T, F, Fut>(&self, task: F) -> Result<T, ProviderError>
    where
        T: Send + 'static,
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ProviderError>> + Send + 'static,
    {
        self.submit("task", task).await
    }

    /// Enqueue a task with diagnostics and uniform throttling errors.
    ///
    /// Same contract as [`add`](Self::add), plus start/failure logging tagged
    /// with `label`, and any residual throttling marker in a transient error
    /// is re-signaled as [`ProviderError::RateLimited`] so callers only need
    /// to match one kind.
    pub async fn invoke<T, F, Fut>(&self, label: &str, task: F) -> Result<T, ProviderError>
    where
        T: Send + 'static,
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ProviderError>> + Send + 'static,
    {
        tracing::debug!(operation = label, "starting governed call");
        match self.submit(label, task).await {
            Ok(value) => Ok(value),
            Err(err) => {
                let err = err.normalized();
                tracing::error!(operation = label, error = %err, "governed call failed");
                Err(err)
            }
        }
    }

    async fn submit<T, F, Fut>(&self, label: &str, task: F) -> Result<T, ProviderError>
    where
        T: Send + 'static,
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ProviderError>> + Send + 'static,
    {
        let (done_tx, done_rx) = oneshot::channel::<Result<T, ProviderError>>();

        // Single-assignment result slot, shared between the success path
        // (inside the attempt) and the terminal-failure path (the reject
        // closure). The sender is taken on first settle.
        let slot = Arc::new(Mutex::new(Some(done_tx)));

        let success_slot = Arc::clone(&slot);
        let attempt: Attempt = Box::new(move || {
            let fut = task();
            let slot = Arc::clone(&success_slot);
            Box::pin(async move {
                match fut.await {
                    Ok(value) => {
                        if let Some(tx) = slot.lock().take() {
                            let _ = tx.send(Ok(value));
                        }
                        Ok(())
                    }
                    Err(err) => Err(err),
                }
            })
        });

        let reject: Reject = Box::new(move |err| {
            if let Some(tx) = slot.lock().take() {
                let _ = tx.send(Err(err));
            }
        });

        let job = Job {
            label: label.to_string(),
            attempt,
            reject,
            retries: 0,
        };

        self.tx
            .send(job)
            .map_err(|_| ProviderError::ChannelClosed)?;

        done_rx
            .await
            .unwrap_or(Err(ProviderError::ChannelClosed))
    }
}

/// The admission loop. Owns the pending sequence; runs until every sender is
/// dropped.
async fn drain(
    mut rx: mpsc::UnboundedReceiver<Job>,
    cooldown: Duration,
    store: Arc<dyn CooldownStore>,
) {
    let cooldown_ms = cooldown.as_millis() as i64;
    let mut last_call_millis = match store.read() {
        Ok(value) => value.unwrap_or(0),
        Err(err) => {
            tracing::warn!(error = %err, "cooldown store unreadable at startup; assuming no prior call");
            0
        }
    };

    while let Some(mut job) = rx.recv().await {
        // The job stays at the head until it succeeds or is terminally
        // rejected; a throttled first attempt loops back through a fresh
        // cooldown with no other job running ahead of it.
        loop {
            // Adopt the persisted timestamp when it is newer: another
            // process may have completed a call more recently. Best-effort
            // only; a true cross-process race can still slip one window.
            match store.read() {
                Ok(Some(stored)) if stored > last_call_millis => last_call_millis = stored,
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(error = %err, "cooldown store read failed; using in-memory timestamp");
                }
            }

            let elapsed = now_millis().saturating_sub(last_call_millis);
            if elapsed < cooldown_ms {
                let wait = (cooldown_ms - elapsed) as u64;
                tracing::debug!(job = %job.label, wait_ms = wait, "cooling down before admission");
                tokio::time::sleep(Duration::from_millis(wait)).await;
            }

            match (job.attempt)().await {
                Ok(()) => {
                    touch(store.as_ref(), &mut last_call_millis);
                    break;
                }
                Err(err) if err.is_throttled() && job.retries < MAX_RETRIES => {
                    job.retries += 1;
                    tracing::warn!(
                        job = %job.label,
                        retries = job.retries,
                        "provider throttled the call; retrying after a full cooldown"
                    );
                    touch(store.as_ref(), &mut last_call_millis);
                }
                Err(err) => {
                    touch(store.as_ref(), &mut last_call_millis);
                    (job.reject)(err);
                    break;
                }
            }
        }
    }
}

/// Advance the shared timestamp to now and persist it. Runs on every
/// completion path so a burst of failures can never collapse the interval.
fn touch(store: &dyn CooldownStore, last_call_millis: &mut i64) {
    *last_call_millis = now_millis();
    if let Err(err) = store.write(*last_call_millis) {
        tracing::warn!(error = %err, "cooldown store write failed; timestamp kept in memory only");
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Instant;

    use anyhow::anyhow;

    fn queue(cooldown_ms: u64, store: Arc<dyn CooldownStore>) -> RequestQueue {
        RequestQueue::new(Duration::from_millis(cooldown_ms), store)
    }

    fn memory_store() -> Arc<MemoryCooldownStore> {
        Arc::new(MemoryCooldownStore::default())
    }

    /// Store whose reads and writes always fail.
    struct BrokenStore;

    impl CooldownStore for BrokenStore {
        fn read(&self) -> Result<Option<i64>, StoreError> {
            Err(StoreError::Unavailable("disk gone".into()))
        }
        fn write(&self, _millis: i64) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk gone".into()))
        }
    }

    #[tokio::test]
    async fn jobs_execute_in_submission_order_one_at_a_time() {
        let queue = queue(5, memory_store());
        let order = Arc::new(Mutex::new(Vec::new()));
        let in_flight = Arc::new(AtomicBool::new(false));

        let make = |idx: usize| {
            let order = Arc::clone(&order);
            let in_flight = Arc::clone(&in_flight);
            move || {
                let order = Arc::clone(&order);
                let in_flight = Arc::clone(&in_flight);
                async move {
                    assert!(
                        !in_flight.swap(true, Ordering::SeqCst),
                        "two tasks in flight at once"
                    );
                    order.lock().push(idx);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    in_flight.store(false, Ordering::SeqCst);
                    Ok::<usize, ProviderError>(idx)
                }
            }
        };

        let (a, b, c, d) = tokio::join!(
            queue.add(make(0)),
            queue.add(make(1)),
            queue.add(make(2)),
            queue.add(make(3)),
        );

        assert_eq!(a.unwrap(), 0);
        assert_eq!(b.unwrap(), 1);
        assert_eq!(c.unwrap(), 2);
        assert_eq!(d.unwrap(), 3);
        assert_eq!(*order.lock(), vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn second_job_waits_out_the_cooldown() {
        let queue = queue(150, memory_store());

        let a_completed = Arc::new(Mutex::new(None::<Instant>));
        let b_started = Arc::new(Mutex::new(None::<Instant>));

        let a_done = Arc::clone(&a_completed);
        let first = queue.add(move || {
            let a_done = Arc::clone(&a_done);
            async move {
                *a_done.lock() = Some(Instant::now());
                Ok::<(), ProviderError>(())
            }
        });

        let b_start = Arc::clone(&b_started);
        let second = queue.add(move || {
            let b_start = Arc::clone(&b_start);
            async move {
                *b_start.lock() = Some(Instant::now());
                Ok::<(), ProviderError>(())
            }
        });

        let (first, second) = tokio::join!(first, second);
        first.unwrap();
        second.unwrap();

        let completed = a_completed.lock().take().expect("first job ran");
        let started = b_started.lock().take().expect("second job ran");
        let gap = started.duration_since(completed);
        assert!(
            gap >= Duration::from_millis(135),
            "second job started only {gap:?} after the first completed"
        );
    }

    #[tokio::test]
    async fn first_job_with_no_history_runs_immediately() {
        let queue = queue(10_000, memory_store());
        let start = Instant::now();

        queue
            .add(|| async { Ok::<(), ProviderError>(()) })
            .await
            .unwrap();

        assert!(
            start.elapsed() < Duration::from_millis(500),
            "first job should not wait out a cooldown with no prior timestamp"
        );
    }

    #[tokio::test]
    async fn throttled_job_is_retried_exactly_once_then_rejected() {
        let queue = queue(100, memory_store());
        let attempts = Arc::new(AtomicUsize::new(0));
        let stamps = Arc::new(Mutex::new(Vec::new()));

        let a = Arc::clone(&attempts);
        let s = Arc::clone(&stamps);
        let result = queue
            .add(move || {
                let a = Arc::clone(&a);
                let s = Arc::clone(&s);
                async move {
                    a.fetch_add(1, Ordering::SeqCst);
                    s.lock().push(Instant::now());
                    Err::<(), _>(ProviderError::RateLimited)
                }
            })
            .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert!(matches!(result, Err(ProviderError::RateLimited)));

        let stamps = stamps.lock();
        let gap = stamps[1].duration_since(stamps[0]);
        assert!(
            gap >= Duration::from_millis(90),
            "retry fired after only {gap:?}, inside the cooldown window"
        );
    }

    #[tokio::test]
    async fn transient_failure_is_terminal_on_first_attempt() {
        let queue = queue(5, memory_store());
        let attempts = Arc::new(AtomicUsize::new(0));

        let a = Arc::clone(&attempts);
        let result = queue
            .add(move || {
                let a = Arc::clone(&a);
                async move {
                    a.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(ProviderError::Transient(anyhow!("connection reset")))
                }
            })
            .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(ProviderError::Transient(_))));

        // The queue moves on to the next job.
        let value = queue.add(|| async { Ok::<u32, ProviderError>(7) }).await;
        assert_eq!(value.unwrap(), 7);
    }

    #[tokio::test]
    async fn throttling_marker_in_message_gets_the_retry_budget() {
        let queue = queue(5, memory_store());
        let attempts = Arc::new(AtomicUsize::new(0));

        let a = Arc::clone(&attempts);
        let result = queue
            .add(move || {
                let a = Arc::clone(&a);
                async move {
                    a.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(ProviderError::Transient(anyhow!(
                        "HTTP 429: Too Many Requests"
                    )))
                }
            })
            .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        // add() preserves the original error; normalization is invoke()'s job.
        assert!(matches!(result, Err(ProviderError::Transient(_))));
    }

    #[tokio::test]
    async fn invoke_normalizes_marker_failures_to_rate_limited() {
        let queue = queue(5, memory_store());

        let result = queue
            .invoke("MarkerCall", || async {
                Err::<(), _>(ProviderError::Transient(anyhow!("status: 429")))
            })
            .await;

        assert!(matches!(result, Err(ProviderError::RateLimited)));
    }

    #[tokio::test]
    async fn fresh_queue_honors_a_recent_persisted_timestamp() {
        let store = memory_store();
        store.write(now_millis()).unwrap();

        // Reconstructed queue; the only cooldown evidence is the store.
        let queue = queue(150, store);
        let start = Instant::now();

        queue
            .add(|| async { Ok::<(), ProviderError>(()) })
            .await
            .unwrap();

        assert!(
            start.elapsed() >= Duration::from_millis(135),
            "restarted queue ignored the persisted cooldown"
        );
    }

    #[tokio::test]
    async fn success_advances_the_persisted_timestamp() {
        let store = memory_store();
        let queue = queue(5, Arc::clone(&store) as Arc<dyn CooldownStore>);
        let before = now_millis();

        queue
            .add(|| async { Ok::<(), ProviderError>(()) })
            .await
            .unwrap();

        let persisted = store.read().unwrap().expect("timestamp persisted");
        assert!(persisted >= before);
    }

    #[tokio::test]
    async fn broken_store_degrades_to_in_memory_state() {
        let queue = queue(50, Arc::new(BrokenStore));

        let a_completed = Arc::new(Mutex::new(None::<Instant>));
        let b_started = Arc::new(Mutex::new(None::<Instant>));

        let a_done = Arc::clone(&a_completed);
        let b_start = Arc::clone(&b_started);
        let (first, second) = tokio::join!(
            queue.add(move || {
                let a_done = Arc::clone(&a_done);
                async move {
                    *a_done.lock() = Some(Instant::now());
                    Ok::<(), ProviderError>(())
                }
            }),
            queue.add(move || {
                let b_start = Arc::clone(&b_start);
                async move {
                    *b_start.lock() = Some(Instant::now());
                    Ok::<(), ProviderError>(())
                }
            }),
        );
        first.unwrap();
        second.unwrap();

        // Cooldown still enforced from the in-memory timestamp.
        let completed = a_completed.lock().take().expect("first job ran");
        let started = b_started.lock().take().expect("second job ran");
        assert!(started.duration_since(completed) >= Duration::from_millis(40));
    }
}
