//! Token-driven pagination
//!
//! Provider listings return one [`Page`] at a time. [`paginate`] drives the
//! continuation token and exposes the pages as a single lazy stream of items.

use std::future::Future;

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};

use crate::error::ProviderResult;
use crate::types::Page;

/// Flatten a token-driven listing into a stream of items.
///
/// `fetch` is called with `None` for the first page and with each returned
/// continuation token after that. An absent or empty token ends the stream.
/// A failed page is yielded as an error and ends the stream. Nothing is fetched
/// until the stream is polled, and each call starts from the first page again.
pub fn paginate<'a, T, F, Fut>(fetch: F) -> BoxStream<'a, ProviderResult<T>>
where
    T: Send + 'a,
    F: FnMut(Option<String>) -> Fut + Send + 'a,
    Fut: Future<Output = ProviderResult<Page<T>>> + Send + 'a,
{
    // `Some(token)` means another page is due; `None` means the listing is done.
    let start: Option<Option<String>> = Some(None);

    stream::try_unfold((fetch, start), |(mut fetch, cursor)| async move {
        let Some(token) = cursor else {
            return Ok(None);
        };

        let page = fetch(token).await?;
        let next = page
            .next_token
            .filter(|token| !token.is_empty())
            .map(Some);

        Ok(Some((page.items, (fetch, next))))
    })
    .map_ok(|items| stream::iter(items.into_iter().map(Ok)))
    .try_flatten()
    .boxed()
}
