//! Helpers for driving provider listings

use std::future::Future;

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use quota_guard_provider::ProviderResult;

/// Count the items of a listing without keeping them.
pub async fn count<T>(listing: BoxStream<'_, ProviderResult<T>>) -> ProviderResult<usize> {
    listing.try_fold(0usize, |total, _| async move { Ok(total + 1) }).await
}

/// Run `task` for every item with at most `concurrency` in flight.
///
/// Outputs come back in input order regardless of completion order.
pub async fn fan_out<I, F, Fut>(items: I, concurrency: usize, task: F) -> Vec<Fut::Output>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future,
{
    stream::iter(items)
        .map(task)
        .buffered(concurrency.max(1))
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use quota_guard_provider::{paginate, Page, ProviderError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn count_walks_every_page() {
        let total = count(paginate(|token: Option<String>| async move {
            Ok(match token.as_deref() {
                None => Page::new(vec!["a", "b"], Some("1".to_string())),
                _ => Page::last(vec!["c"]),
            })
        }))
        .await
        .unwrap();
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn count_propagates_failure() {
        let result = count(paginate(|_token| async {
            Err::<Page<u8>, _>(ProviderError::api("describe_volumes", "denied"))
        }))
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn fan_out_preserves_order_and_bounds_concurrency() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let outputs = fan_out(1..=6u64, 2, |n| {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                // later items finish first
                tokio::time::sleep(Duration::from_millis(20 - n * 3)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                n * 10
            }
        })
        .await;

        assert_eq!(outputs, vec![10, 20, 30, 40, 50, 60]);
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }
}
