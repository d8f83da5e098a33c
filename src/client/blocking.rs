//! Blocking facade over [`ApiConnection`].
//!
//! Every call spawns the async operation on a runtime owned by the
//! connection and parks the calling thread until it finishes. These methods
//! must not be called from within an async context. Dropping a connection
//! there is fine: its runtime shuts down in the background.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::future::Future;
use std::iter::FusedIterator;
use std::panic;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::{Builder, Runtime};
use tokio::task::{AbortHandle, JoinError};

use crate::client::paging::PageCursor;
use crate::client::{ApiConnection, PagedFetcher, XmsError};
use crate::domain::{
    BatchDeliveryReport, BatchDeliveryReportParams, BatchFilter, BatchId, DeliveryFeedback,
    DeliveryReportFilter, GroupCreate, GroupFilter, GroupId, GroupResult, GroupUpdate,
    InboundsFilter, MoSms, MtBatchCreate, MtBatchDryRunResult, MtBatchResult, MtBatchUpdate, Page,
    RecipientDeliveryReport, Tags, TagsUpdate,
};

const WORKER_THREAD_NAME: &str = "xms-worker";

/// Map the joined outcome of a spawned operation.
///
/// A panic inside the operation resumes on the caller. A task that was
/// cancelled before finishing yields [`XmsError::Interrupted`].
fn unwrap_joined<T>(joined: Result<Result<T, XmsError>, JoinError>) -> Result<T, XmsError> {
    match joined {
        Ok(result) => result,
        Err(err) if err.is_panic() => panic::resume_unwind(err.into_panic()),
        Err(_) => Err(XmsError::Interrupted),
    }
}

/// Runtime shared by a blocking connection and its fetchers.
///
/// Keeps an abort handle for every task a caller is parked on.
struct OwnedRuntime {
    runtime: Option<Runtime>,
    next_call: AtomicU64,
    calls: Mutex<HashMap<u64, AbortHandle>>,
}

impl OwnedRuntime {
    fn new() -> Result<Self, XmsError> {
        let runtime = Builder::new_multi_thread()
            .thread_name(WORKER_THREAD_NAME)
            .enable_all()
            .build()
            .map_err(XmsError::Runtime)?;

        Ok(Self {
            runtime: Some(runtime),
            next_call: AtomicU64::new(0),
            calls: Mutex::new(HashMap::new()),
        })
    }

    /// Run `operation` on the runtime and wait for it.
    fn wait<T, F>(&self, operation: F) -> Result<T, XmsError>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, XmsError>> + Send + 'static,
    {
        let Some(runtime) = &self.runtime else {
            return Err(XmsError::NotRunning);
        };
        let call = self.next_call.fetch_add(1, Ordering::Relaxed);
        let handle = {
            let mut calls = self.calls();
            let handle = runtime.spawn(operation);
            calls.insert(call, handle.abort_handle());
            handle
        };

        let joined = runtime.block_on(handle);
        self.calls().remove(&call);
        unwrap_joined(joined)
    }

    fn interrupt(&self) {
        let calls = std::mem::take(&mut *self.calls());
        tracing::debug!(count = calls.len(), "interrupting blocking calls");
        for handle in calls.into_values() {
            handle.abort();
        }
    }

    fn calls(&self) -> MutexGuard<'_, HashMap<u64, AbortHandle>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for OwnedRuntime {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

#[derive(Clone)]
/// Synchronous XMS connection.
///
/// Owns a multi-threaded tokio runtime used only to drive requests; clones
/// share it.
pub struct BlockingApiConnection {
    connection: ApiConnection,
    runtime: Arc<OwnedRuntime>,
}

impl fmt::Debug for BlockingApiConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingApiConnection")
            .field("endpoint", &self.connection.endpoint().as_str())
            .field(
                "service_plan_id",
                &self.connection.service_plan_id().as_str(),
            )
            .finish_non_exhaustive()
    }
}

impl BlockingApiConnection {
    /// Wrap a connection. The connection is used as is; an owned HTTP client
    /// still has to be started.
    pub fn new(connection: ApiConnection) -> Result<Self, XmsError> {
        Ok(Self {
            connection,
            runtime: Arc::new(OwnedRuntime::new()?),
        })
    }

    /// The underlying async connection.
    pub fn connection(&self) -> &ApiConnection {
        &self.connection
    }

    pub fn start(&self) {
        self.connection.start();
    }

    pub fn close(&self) {
        self.connection.close();
    }

    /// Abort every call and page fetch currently waiting on this
    /// connection's runtime. Each of them returns [`XmsError::Interrupted`].
    pub fn interrupt(&self) {
        self.runtime.interrupt();
    }

    fn wait<T, F>(&self, operation: F) -> Result<T, XmsError>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, XmsError>> + Send + 'static,
    {
        self.runtime.wait(operation)
    }

    fn paged<T: Send + 'static>(&self, fetcher: PagedFetcher<T>) -> BlockingPagedFetcher<T> {
        BlockingPagedFetcher {
            fetcher,
            runtime: Arc::clone(&self.runtime),
        }
    }

    pub fn create_batch(&self, batch: impl Into<MtBatchCreate>) -> Result<MtBatchResult, XmsError> {
        let conn = self.connection.clone();
        let batch = batch.into();
        self.wait(async move { conn.create_batch(batch).await })
    }

    pub fn create_batch_dry_run(
        &self,
        batch: impl Into<MtBatchCreate>,
        per_recipient: Option<bool>,
        number_of_recipients: Option<u32>,
    ) -> Result<MtBatchDryRunResult, XmsError> {
        let conn = self.connection.clone();
        let batch = batch.into();
        self.wait(async move {
            conn.create_batch_dry_run(batch, per_recipient, number_of_recipients)
                .await
        })
    }

    pub fn replace_batch(
        &self,
        id: &BatchId,
        batch: impl Into<MtBatchCreate>,
    ) -> Result<MtBatchResult, XmsError> {
        let conn = self.connection.clone();
        let id = id.clone();
        let batch = batch.into();
        self.wait(async move { conn.replace_batch(&id, batch).await })
    }

    pub fn update_batch(
        &self,
        id: &BatchId,
        update: impl Into<MtBatchUpdate>,
    ) -> Result<MtBatchResult, XmsError> {
        let conn = self.connection.clone();
        let id = id.clone();
        let update = update.into();
        self.wait(async move { conn.update_batch(&id, update).await })
    }

    pub fn fetch_batch(&self, id: &BatchId) -> Result<MtBatchResult, XmsError> {
        let conn = self.connection.clone();
        let id = id.clone();
        self.wait(async move { conn.fetch_batch(&id).await })
    }

    pub fn cancel_batch(&self, id: &BatchId) -> Result<MtBatchResult, XmsError> {
        let conn = self.connection.clone();
        let id = id.clone();
        self.wait(async move { conn.cancel_batch(&id).await })
    }

    pub fn fetch_batches(&self, filter: BatchFilter) -> BlockingPagedFetcher<MtBatchResult> {
        self.paged(self.connection.fetch_batches(filter))
    }

    pub fn fetch_delivery_report(
        &self,
        id: &BatchId,
        params: &BatchDeliveryReportParams,
    ) -> Result<BatchDeliveryReport, XmsError> {
        let conn = self.connection.clone();
        let id = id.clone();
        let params = params.clone();
        self.wait(async move { conn.fetch_delivery_report(&id, &params).await })
    }

    pub fn fetch_recipient_delivery_report(
        &self,
        id: &BatchId,
        recipient: &str,
    ) -> Result<RecipientDeliveryReport, XmsError> {
        let conn = self.connection.clone();
        let id = id.clone();
        let recipient = recipient.to_owned();
        self.wait(async move { conn.fetch_recipient_delivery_report(&id, &recipient).await })
    }

    pub fn fetch_delivery_reports(
        &self,
        filter: DeliveryReportFilter,
    ) -> BlockingPagedFetcher<RecipientDeliveryReport> {
        self.paged(self.connection.fetch_delivery_reports(filter))
    }

    pub fn create_delivery_feedback(
        &self,
        id: &BatchId,
        feedback: &DeliveryFeedback,
    ) -> Result<(), XmsError> {
        let conn = self.connection.clone();
        let id = id.clone();
        let feedback = feedback.clone();
        self.wait(async move { conn.create_delivery_feedback(&id, &feedback).await })
    }

    pub fn fetch_batch_tags(&self, id: &BatchId) -> Result<Tags, XmsError> {
        let conn = self.connection.clone();
        let id = id.clone();
        self.wait(async move { conn.fetch_batch_tags(&id).await })
    }

    pub fn replace_batch_tags(&self, id: &BatchId, tags: &Tags) -> Result<Tags, XmsError> {
        let conn = self.connection.clone();
        let id = id.clone();
        let tags = tags.clone();
        self.wait(async move { conn.replace_batch_tags(&id, &tags).await })
    }

    pub fn update_batch_tags(&self, id: &BatchId, update: &TagsUpdate) -> Result<Tags, XmsError> {
        let conn = self.connection.clone();
        let id = id.clone();
        let update = update.clone();
        self.wait(async move { conn.update_batch_tags(&id, &update).await })
    }

    pub fn create_group(&self, group: &GroupCreate) -> Result<GroupResult, XmsError> {
        let conn = self.connection.clone();
        let group = group.clone();
        self.wait(async move { conn.create_group(&group).await })
    }

    pub fn fetch_group(&self, id: &GroupId) -> Result<GroupResult, XmsError> {
        let conn = self.connection.clone();
        let id = id.clone();
        self.wait(async move { conn.fetch_group(&id).await })
    }

    pub fn fetch_group_members(&self, id: &GroupId) -> Result<BTreeSet<String>, XmsError> {
        let conn = self.connection.clone();
        let id = id.clone();
        self.wait(async move { conn.fetch_group_members(&id).await })
    }

    pub fn fetch_groups(&self, filter: GroupFilter) -> BlockingPagedFetcher<GroupResult> {
        self.paged(self.connection.fetch_groups(filter))
    }

    pub fn update_group(
        &self,
        id: &GroupId,
        update: &GroupUpdate,
    ) -> Result<GroupResult, XmsError> {
        let conn = self.connection.clone();
        let id = id.clone();
        let update = update.clone();
        self.wait(async move { conn.update_group(&id, &update).await })
    }

    pub fn replace_group(
        &self,
        id: &GroupId,
        group: &GroupCreate,
    ) -> Result<GroupResult, XmsError> {
        let conn = self.connection.clone();
        let id = id.clone();
        let group = group.clone();
        self.wait(async move { conn.replace_group(&id, &group).await })
    }

    pub fn delete_group(&self, id: &GroupId) -> Result<(), XmsError> {
        let conn = self.connection.clone();
        let id = id.clone();
        self.wait(async move { conn.delete_group(&id).await })
    }

    pub fn fetch_group_tags(&self, id: &GroupId) -> Result<Tags, XmsError> {
        let conn = self.connection.clone();
        let id = id.clone();
        self.wait(async move { conn.fetch_group_tags(&id).await })
    }

    pub fn replace_group_tags(&self, id: &GroupId, tags: &Tags) -> Result<Tags, XmsError> {
        let conn = self.connection.clone();
        let id = id.clone();
        let tags = tags.clone();
        self.wait(async move { conn.replace_group_tags(&id, &tags).await })
    }

    pub fn update_group_tags(&self, id: &GroupId, update: &TagsUpdate) -> Result<Tags, XmsError> {
        let conn = self.connection.clone();
        let id = id.clone();
        let update = update.clone();
        self.wait(async move { conn.update_group_tags(&id, &update).await })
    }

    pub fn fetch_inbounds(&self, filter: InboundsFilter) -> BlockingPagedFetcher<MoSms> {
        self.paged(self.connection.fetch_inbounds(filter))
    }

    pub fn fetch_inbound(&self, id: &str) -> Result<MoSms, XmsError> {
        let conn = self.connection.clone();
        let id = id.to_owned();
        self.wait(async move { conn.fetch_inbound(&id).await })
    }
}

/// Blocking counterpart of [`PagedFetcher`].
pub struct BlockingPagedFetcher<T> {
    fetcher: PagedFetcher<T>,
    runtime: Arc<OwnedRuntime>,
}

impl<T> Clone for BlockingPagedFetcher<T> {
    fn clone(&self) -> Self {
        Self {
            fetcher: self.fetcher.clone(),
            runtime: Arc::clone(&self.runtime),
        }
    }
}

impl<T> fmt::Debug for BlockingPagedFetcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingPagedFetcher")
            .finish_non_exhaustive()
    }
}

impl<T: Send + 'static> BlockingPagedFetcher<T> {
    /// Fetch a single page.
    pub fn fetch(&self, page: u32) -> Result<Page<T>, XmsError> {
        self.runtime.wait(self.fetcher.fetch(page))
    }

    /// Iterate over every page, starting from page 0.
    pub fn pages(&self) -> BlockingPages<T> {
        BlockingPages {
            fetcher: self.clone(),
            cursor: PageCursor::default(),
        }
    }

    /// Iterate over every element of every page, in page order.
    pub fn elements(&self) -> BlockingElements<T> {
        BlockingElements {
            pages: self.pages(),
            current: Vec::new().into_iter(),
        }
    }
}

/// Iterator over pages. Ends after the first error.
pub struct BlockingPages<T> {
    fetcher: BlockingPagedFetcher<T>,
    cursor: PageCursor,
}

impl<T: Send + 'static> Iterator for BlockingPages<T> {
    type Item = Result<Page<T>, XmsError>;

    fn next(&mut self) -> Option<Self::Item> {
        let number = self.cursor.next_page()?;
        let result = self.fetcher.fetch(number);
        match &result {
            Ok(page) => self.cursor.record(page),
            Err(_) => self.cursor.finish(),
        }
        Some(result)
    }
}

impl<T: Send + 'static> FusedIterator for BlockingPages<T> {}

/// Iterator over elements. Ends after the first error.
pub struct BlockingElements<T> {
    pages: BlockingPages<T>,
    current: std::vec::IntoIter<T>,
}

impl<T: Send + 'static> Iterator for BlockingElements<T> {
    type Item = Result<T, XmsError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(element) = self.current.next() {
                return Some(Ok(element));
            }
            match self.pages.next()? {
                Ok(page) => self.current = page.into_content().into_iter(),
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

impl<T: Send + 'static> FusedIterator for BlockingElements<T> {}
