//! Lazy traversal of paged listings.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use futures::stream::{self, Stream, StreamExt, TryStreamExt};

use crate::client::XmsError;
use crate::domain::Page;

/// Future returned by a page fetch.
pub type PageFuture<T> = Pin<Box<dyn Future<Output = Result<Page<T>, XmsError>> + Send>>;

type FetchFn<T> = dyn Fn(u32) -> PageFuture<T> + Send + Sync;

/// Tracks which page to request next.
///
/// The first request is page 0. Traversal continues with the following page
/// number while the page just read was non-empty and fewer elements than the
/// reported total have been seen.
#[derive(Debug, Default, Clone)]
pub(crate) struct PageCursor {
    last: Option<(u32, usize)>,
    total: u64,
    seen: u64,
    finished: bool,
}

impl PageCursor {
    pub(crate) fn next_page(&self) -> Option<u32> {
        if self.finished {
            return None;
        }
        match self.last {
            None => Some(0),
            Some((page, size)) if size > 0 && self.seen < self.total => page.checked_add(1),
            Some(_) => None,
        }
    }

    pub(crate) fn record<T>(&mut self, page: &Page<T>) {
        self.seen = self.seen.saturating_add(page.size() as u64);
        self.total = page.total_size();
        self.last = Some((page.page(), page.size()));
    }

    pub(crate) fn finish(&mut self) {
        self.finished = true;
    }
}

/// A paged listing bound to a filter.
///
/// Nothing is requested until [`fetch`](Self::fetch) is awaited or one of
/// the streams is polled. Each stream restarts from page 0 and ends after
/// yielding the first error.
///
/// Pages are read one at a time without a snapshot, so elements created or
/// deleted on the server during traversal may be skipped or seen twice.
pub struct PagedFetcher<T> {
    fetch: Arc<FetchFn<T>>,
}

impl<T> Clone for PagedFetcher<T> {
    fn clone(&self) -> Self {
        Self {
            fetch: Arc::clone(&self.fetch),
        }
    }
}

impl<T> fmt::Debug for PagedFetcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedFetcher").finish_non_exhaustive()
    }
}

impl<T: Send + 'static> PagedFetcher<T> {
    pub(crate) fn new<F, Fut>(fetch: F) -> Self
    where
        F: Fn(u32) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Page<T>, XmsError>> + Send + 'static,
    {
        Self {
            fetch: Arc::new(move |page| -> PageFuture<T> { Box::pin(fetch(page)) }),
        }
    }

    /// Fetch a single page.
    pub fn fetch(&self, page: u32) -> PageFuture<T> {
        (self.fetch)(page)
    }

    /// Stream every page, starting from page 0.
    pub fn pages(&self) -> impl Stream<Item = Result<Page<T>, XmsError>> + Send + use<T> {
        let fetch = Arc::clone(&self.fetch);
        stream::unfold(
            (fetch, PageCursor::default()),
            |(fetch, mut cursor)| async move {
                let number = cursor.next_page()?;
                let result = fetch(number).await;
                match &result {
                    Ok(page) => cursor.record(page),
                    Err(_) => cursor.finish(),
                }
                Some((result, (fetch, cursor)))
            },
        )
        .fuse()
    }

    /// Stream every element of every page, in page order.
    pub fn elements(&self) -> impl Stream<Item = Result<T, XmsError>> + Send + use<T> {
        self.pages()
            .map_ok(|page| stream::iter(page.into_iter().map(Ok)))
            .try_flatten()
    }
}
