//! Bounded-concurrency chunk execution.
//!
//! The scheduling primitive is "suspend until the earliest settlement among
//! the in-flight operations frees a slot", implemented with a
//! [`FuturesUnordered`] pool owned by the executing task. Ordering of the
//! aggregate is therefore settlement order, not submission order, by
//! contract.

use crate::cancel::{CancelToken, Run};
use crate::chunk::split_into_chunks;
use futures::FutureExt;
use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;

/// The two independent concurrency budgets.
///
/// Single-item mode (chunk size 1) and batch mode are separate budgets,
/// selected solely by the chunk size; they are configured once and shared
/// for the lifetime of the owning [`Executor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// In-flight cap when each request carries exactly one item.
    pub single: usize,
    /// In-flight cap when requests carry multi-item chunks.
    pub batch: usize,
}

impl Limits {
    fn cap_for(self, chunk_size: usize) -> usize {
        if chunk_size == 1 { self.single } else { self.batch }
    }
}

/// How one chunk's operation settled.
///
/// Failure isolation is the executor's core contract: one bad chunk cannot
/// fail the batch, so failures are carried as data instead of being raised.
/// The caller decides whether to log them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkOutcome<T, E> {
    /// The operation settled successfully; its result elements.
    Completed(Vec<T>),
    /// The operation failed; nothing from this chunk enters the aggregate.
    Failed {
        /// How many items the chunk carried.
        items: usize,
        /// What went wrong.
        error: E,
    },
}

impl<T, E> ChunkOutcome<T, E> {
    /// Result elements of a completed chunk; empty for a failed one.
    pub fn into_results(self) -> Vec<T> {
        match self {
            Self::Completed(results) => results,
            Self::Failed { .. } => Vec::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// The carried error, for failed chunks.
    pub fn error(&self) -> Option<&E> {
        match self {
            Self::Completed(_) => None,
            Self::Failed { error, .. } => Some(error),
        }
    }
}

/// Turns a list of logical operations into rate-limited, chunked
/// invocations with backpressure, partial-failure isolation and cooperative
/// cancellation.
#[derive(Debug, Clone, Copy)]
pub struct Executor {
    limits: Limits,
}

impl Executor {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    /// Execute `op` over contiguous chunks of `items`, at most `cap`
    /// operations in flight at once.
    ///
    /// Chunks are submitted in order; before each admission the pool must
    /// have a free slot (waiting suspends until *any* in-flight operation
    /// settles) and the token must not be cancelled. On cancellation no
    /// further chunk is issued, but everything already admitted is drained
    /// to settlement before [`Run::Cancelled`] is returned.
    ///
    /// Each chunk settles into a [`ChunkOutcome`]: a failed operation is
    /// recorded and swallowed, never re-raised, and never stops subsequent
    /// admission. Outcomes are collected in settlement order.
    pub async fn execute<K, T, E, F, Fut>(
        &self,
        token: &CancelToken,
        chunk_size: usize,
        items: Vec<K>,
        op: F,
    ) -> Run<Vec<ChunkOutcome<T, E>>>
    where
        F: Fn(Vec<K>) -> Fut,
        Fut: Future<Output = Result<Vec<T>, E>>,
    {
        let cap = self.limits.cap_for(chunk_size);
        debug_assert!(cap > 0, "a zero cap would deadlock the admission wait");
        let chunks = split_into_chunks(items, chunk_size);
        let mut outcomes = Vec::with_capacity(chunks.len());
        let mut in_flight = FuturesUnordered::new();
        let mut cancelled = false;

        for chunk in chunks {
            if token.is_cancelled() {
                tracing::debug!("Cancellation observed before chunk admission; abandoning submission");
                cancelled = true;
                break;
            }
            while in_flight.len() >= cap {
                if let Some(outcome) = in_flight.next().await {
                    outcomes.push(outcome);
                }
            }
            if chunk_size != 1 {
                tracing::debug!(items = chunk.len(), "Processing chunk");
            }
            let carried = chunk.len();
            in_flight.push(op(chunk).map(move |settled| match settled {
                Ok(results) => ChunkOutcome::Completed(results),
                Err(error) => ChunkOutcome::Failed { items: carried, error },
            }));
        }

        // Drain whatever is still in flight; admitted operations always run
        // to settlement, cancelled run or not.
        while let Some(outcome) = in_flight.next().await {
            outcomes.push(outcome);
        }

        if cancelled { Run::Cancelled } else { Run::Complete(outcomes) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Boom(&'static str);

    /// Instrumented operation that tracks the number of concurrently
    /// running invocations and the high-water mark.
    #[derive(Clone, Default)]
    struct Gauge {
        active: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
        invocations: Arc<AtomicUsize>,
    }

    impl Gauge {
        async fn run(&self, chunk: Vec<u32>) -> Result<Vec<u32>, Boom> {
            self.invocations.fetch_add(1, Ordering::SeqCst);
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            // A few suspension points so other in-flight chunks get polled.
            for _ in 0..3 {
                tokio::task::yield_now().await;
            }
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(chunk)
        }

        fn peak(&self) -> usize {
            self.peak.load(Ordering::SeqCst)
        }

        fn invocations(&self) -> usize {
            self.invocations.load(Ordering::SeqCst)
        }
    }

    fn executor(single: usize, batch: usize) -> Executor {
        Executor::new(Limits { single, batch })
    }

    #[rstest]
    #[case::batch_budget(20, 4, 3)]
    #[case::batch_budget_small_cap(10, 2, 1)]
    fn cap_is_never_exceeded(#[case] total: u32, #[case] chunk_size: usize, #[case] cap: usize) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            let gauge = Gauge::default();
            let op_gauge = gauge.clone();
            let run = executor(1, cap)
                .execute(&CancelToken::new(), chunk_size, (0..total).collect(), |chunk| {
                    let gauge = op_gauge.clone();
                    async move { gauge.run(chunk).await }
                })
                .await;
            assert!(gauge.peak() <= cap, "peak {} exceeded cap {}", gauge.peak(), cap);
            let outcomes = run.into_complete().unwrap();
            let total_results: usize = outcomes.iter().map(|o| match o {
                ChunkOutcome::Completed(r) => r.len(),
                ChunkOutcome::Failed { .. } => 0,
            }).sum();
            assert_eq!(total_results, total as usize);
        });
    }

    #[tokio::test]
    async fn single_item_mode_uses_its_own_budget() {
        let gauge = Gauge::default();
        let op_gauge = gauge.clone();
        executor(4, 1)
            .execute(&CancelToken::new(), 1, (0..12).collect(), |chunk| {
                let gauge = op_gauge.clone();
                async move { gauge.run(chunk).await }
            })
            .await;
        assert_eq!(gauge.invocations(), 12);
        assert!(gauge.peak() <= 4);
        assert!(gauge.peak() > 1, "single-item budget should admit more than one at a time");
    }

    #[tokio::test]
    async fn five_items_chunk_two_cap_one_is_three_sequential_operations() {
        let gauge = Gauge::default();
        let op_gauge = gauge.clone();
        let run = executor(1, 1)
            .execute(&CancelToken::new(), 2, (0..5).collect(), |chunk| {
                let gauge = op_gauge.clone();
                async move { gauge.run(chunk).await }
            })
            .await;
        assert_eq!(gauge.invocations(), 3);
        assert_eq!(gauge.peak(), 1, "cap 1 means no overlap at all");
        let outcomes = run.into_complete().unwrap();
        let aggregate: usize = outcomes.into_iter().map(|o| o.into_results().len()).sum();
        assert_eq!(aggregate, 5);
    }

    #[tokio::test]
    async fn one_failing_chunk_does_not_poison_the_batch() {
        let run = executor(2, 2)
            .execute(&CancelToken::new(), 2, (0..6).collect::<Vec<u32>>(), |chunk| async move {
                if chunk.contains(&2) { Err(Boom("chunk rejected")) } else { Ok(chunk) }
            })
            .await;
        let outcomes = run.into_complete().unwrap();
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes.iter().filter(|o| o.is_failed()).count(), 1);
        let mut survivors: Vec<u32> = outcomes.into_iter().flat_map(ChunkOutcome::into_results).collect();
        survivors.sort_unstable();
        assert_eq!(survivors, vec![0, 1, 4, 5]);
    }

    #[tokio::test]
    async fn cancellation_before_any_admission_issues_nothing() {
        let token = CancelToken::new();
        token.cancel();
        let gauge = Gauge::default();
        let op_gauge = gauge.clone();
        let run = executor(2, 2)
            .execute(&token, 2, (0..8).collect(), |chunk| {
                let gauge = op_gauge.clone();
                async move { gauge.run(chunk).await }
            })
            .await;
        assert!(run.is_cancelled());
        assert_eq!(gauge.invocations(), 0);
    }

    #[tokio::test]
    async fn cancellation_mid_run_drains_admitted_chunks() {
        let token = CancelToken::new();
        let cancel = token.clone();
        let completed = Arc::new(AtomicUsize::new(0));
        let finished = Arc::clone(&completed);
        let run = executor(1, 1)
            .execute(&token, 2, (0..6).collect::<Vec<u32>>(), move |chunk| {
                let cancel = cancel.clone();
                let finished = Arc::clone(&finished);
                async move {
                    // The first chunk flips the run-state flag while running.
                    cancel.cancel();
                    tokio::task::yield_now().await;
                    finished.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, Boom>(chunk)
                }
            })
            .await;
        assert!(run.is_cancelled());
        // Chunk one was admitted and polled before the flag was observed;
        // chunk two was admitted while chunk one occupied the only slot.
        // Both must settle; chunk three must never be issued.
        assert_eq!(completed.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_input_completes_with_no_operations() {
        let gauge = Gauge::default();
        let op_gauge = gauge.clone();
        let run = executor(2, 2)
            .execute(&CancelToken::new(), 3, Vec::<u32>::new(), |chunk| {
                let gauge = op_gauge.clone();
                async move { gauge.run(chunk).await }
            })
            .await;
        assert_eq!(run, Run::Complete(vec![]));
        assert_eq!(gauge.invocations(), 0);
    }
}
