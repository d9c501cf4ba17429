//! Cursor-draining pagination.

use crate::cancel::{CancelToken, Run};
use std::future::Future;

/// Drain a cursor-based listing endpoint into a single ordered sequence.
///
/// `fetch_page` is invoked with `None` first, then with each returned
/// cursor, until a page comes back without one. Absence of the cursor is the
/// *sole* termination signal — a page with zero items but a present cursor
/// still continues. Items are concatenated in arrival order with no
/// deduplication, sorting or validation.
///
/// The token is checked before every fetch (including the first); observing
/// cancellation abandons the collection and returns [`Run::Cancelled`],
/// discarding anything already collected. Fetch errors are propagated, not
/// swallowed.
///
/// # Examples
///
/// ```
/// use std::collections::VecDeque;
/// use std::convert::Infallible;
/// use snapops_batch::{CancelToken, Run, collect_all};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Infallible> {
/// let mut pages = VecDeque::from([
///     (vec![1, 2], Some("next".to_string())),
///     (vec![3], None),
/// ]);
/// let run = collect_all(&CancelToken::new(), move |_cursor| {
///     let page = pages.pop_front().expect("listing is exhausted");
///     async move { Ok::<_, Infallible>(page) }
/// })
/// .await?;
/// assert_eq!(run, Run::Complete(vec![1, 2, 3]));
/// # Ok(())
/// # }
/// ```
pub async fn collect_all<T, E, F, Fut>(token: &CancelToken, mut fetch_page: F) -> Result<Run<Vec<T>>, E>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<(Vec<T>, Option<String>), E>>,
{
    let mut collected = Vec::new();
    let mut cursor = None;
    loop {
        if token.is_cancelled() {
            tracing::debug!("Cancellation observed before page fetch; abandoning collection");
            return Ok(Run::Cancelled);
        }
        let (items, next) = fetch_page(cursor.take()).await?;
        if !items.is_empty() {
            tracing::debug!(count = items.len(), "Found items");
            collected.extend(items);
        }
        match next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    Ok(Run::Complete(collected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::convert::Infallible;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type TestPage = (Vec<u32>, Option<String>);

    fn scripted(pages: impl IntoIterator<Item = TestPage>) -> VecDeque<TestPage> {
        pages.into_iter().collect()
    }

    #[tokio::test]
    async fn concatenates_pages_in_fetch_order() {
        let mut pages = scripted([
            (vec![1, 2], Some("a".into())),
            (vec![3], Some("b".into())),
            (vec![4, 5], None),
        ]);
        let seen_cursors = Arc::new(std::sync::Mutex::new(Vec::new()));
        let cursors = Arc::clone(&seen_cursors);
        let run = collect_all(&CancelToken::new(), move |cursor| {
            cursors.lock().unwrap().push(cursor);
            let page = pages.pop_front().expect("listing is exhausted");
            async move { Ok::<_, Infallible>(page) }
        })
        .await
        .unwrap();
        assert_eq!(run, Run::Complete(vec![1, 2, 3, 4, 5]));
        assert_eq!(
            *seen_cursors.lock().unwrap(),
            vec![None, Some("a".to_string()), Some("b".to_string())]
        );
    }

    #[tokio::test]
    async fn empty_page_with_cursor_continues() {
        let mut pages = scripted([(vec![], Some("sparse".into())), (vec![7], None)]);
        let run = collect_all(&CancelToken::new(), move |_| {
            let page = pages.pop_front().expect("listing is exhausted");
            async move { Ok::<_, Infallible>(page) }
        })
        .await
        .unwrap();
        assert_eq!(run, Run::Complete(vec![7]));
    }

    #[tokio::test]
    async fn cancellation_before_first_fetch_issues_nothing() {
        let token = CancelToken::new();
        token.cancel();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let run = collect_all(&token, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<TestPage, Infallible>((vec![1], None)) }
        })
        .await
        .unwrap();
        assert!(run.is_cancelled());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cancellation_mid_collection_discards_partial_results() {
        let token = CancelToken::new();
        let cancel = token.clone();
        let run = collect_all(&token, move |_| {
            // First page succeeds but the surrounding process stops running.
            cancel.cancel();
            async move { Ok::<TestPage, Infallible>((vec![1, 2], Some("more".into()))) }
        })
        .await
        .unwrap();
        assert_eq!(run, Run::Cancelled);
    }

    #[tokio::test]
    async fn fetch_errors_propagate() {
        #[derive(Debug, PartialEq)]
        struct Boom;
        let result =
            collect_all::<u32, _, _, _>(&CancelToken::new(), move |_| async move { Err::<TestPage, Boom>(Boom) })
                .await;
        assert_eq!(result.unwrap_err(), Boom);
    }
}
