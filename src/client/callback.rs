//! Completion callbacks for operations run as tokio tasks.

use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::client::{ApiConnection, XmsError};

/// Receives the outcome of an operation started with [`ApiConnection::spawn`].
///
/// Exactly one method is called per operation.
pub trait FutureCallback<T>: Send + Sync {
    fn completed(&self, result: &T);

    fn failed(&self, error: &XmsError);

    /// The task was aborted before it produced a result.
    fn cancelled(&self) {}
}

/// How callbacks are invoked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CallbackWrapper {
    /// Call the callback directly; a panic propagates into the spawned task.
    Identity,
    /// Catch and log panics raised by the callback.
    #[default]
    DropPanics,
}

impl CallbackWrapper {
    pub fn wrap<T: 'static>(
        self,
        callback: Arc<dyn FutureCallback<T>>,
    ) -> Arc<dyn FutureCallback<T>> {
        match self {
            Self::Identity => callback,
            Self::DropPanics => Arc::new(DropPanics { inner: callback }),
        }
    }
}

struct DropPanics<T> {
    inner: Arc<dyn FutureCallback<T>>,
}

impl<T> DropPanics<T> {
    fn guard(&self, call: impl FnOnce()) {
        if let Err(panic) = catch_unwind(AssertUnwindSafe(call)) {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_owned())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_owned());
            tracing::error!(panic = %message, "caught and dropped panic in callback");
        }
    }
}

impl<T> FutureCallback<T> for DropPanics<T> {
    fn completed(&self, result: &T) {
        self.guard(|| self.inner.completed(result));
    }

    fn failed(&self, error: &XmsError) {
        self.guard(|| self.inner.failed(error));
    }

    fn cancelled(&self) {
        self.guard(|| self.inner.cancelled());
    }
}

/// Reports cancellation if the task is dropped before the operation finishes.
struct CancelGuard<T> {
    callback: Option<Arc<dyn FutureCallback<T>>>,
}

impl<T> CancelGuard<T> {
    fn disarm(mut self) -> Option<Arc<dyn FutureCallback<T>>> {
        self.callback.take()
    }
}

impl<T> Drop for CancelGuard<T> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }
        if let Some(callback) = self.callback.take() {
            callback.cancelled();
        }
    }
}

impl ApiConnection {
    /// Run an operation as a tokio task and report its outcome to `callback`.
    ///
    /// The callback runs on the task before the returned handle resolves. It is
    /// wrapped with the connection's [`CallbackWrapper`]. Must be called from
    /// within a tokio runtime.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use xms::{ApiConnection, BatchId, FutureCallback, MtBatchResult, XmsError};
    /// struct Log;
    ///
    /// impl FutureCallback<MtBatchResult> for Log {
    ///     fn completed(&self, batch: &MtBatchResult) {
    ///         println!("batch {} fetched", batch.id());
    ///     }
    ///
    ///     fn failed(&self, error: &XmsError) {
    ///         eprintln!("fetch failed: {error}");
    ///     }
    /// }
    ///
    /// # async fn run(conn: ApiConnection, id: BatchId) {
    /// let task = conn.clone();
    /// let callback: Arc<dyn FutureCallback<MtBatchResult>> = Arc::new(Log);
    /// let handle = conn.spawn(async move { task.fetch_batch(&id).await }, Some(callback));
    /// let _ = handle.await;
    /// # }
    /// ```
    pub fn spawn<T, F>(
        &self,
        operation: F,
        callback: Option<Arc<dyn FutureCallback<T>>>,
    ) -> JoinHandle<Result<T, XmsError>>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, XmsError>> + Send + 'static,
    {
        let guard = CancelGuard {
            callback: callback.map(|callback| self.callback_wrapper.wrap(callback)),
        };
        tokio::spawn(async move {
            let result = operation.await;
            if let Some(callback) = guard.disarm() {
                match &result {
                    Ok(value) => callback.completed(value),
                    Err(err) => callback.failed(err),
                }
            }
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::client::test_support::{FakeTransport, make_connection};

    use super::*;

    #[derive(Default)]
    struct Recorder {
        completed: Mutex<Vec<String>>,
        failed: AtomicUsize,
        cancelled: AtomicUsize,
    }

    impl FutureCallback<String> for Recorder {
        fn completed(&self, result: &String) {
            self.completed.lock().unwrap().push(result.clone());
        }

        fn failed(&self, _error: &XmsError) {
            self.failed.fetch_add(1, Ordering::SeqCst);
        }

        fn cancelled(&self) {
            self.cancelled.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Panicking;

    impl FutureCallback<String> for Panicking {
        fn completed(&self, _result: &String) {
            panic!("callback blew up");
        }

        fn failed(&self, _error: &XmsError) {
            panic!("callback blew up");
        }
    }

    fn recorder() -> (Arc<Recorder>, Option<Arc<dyn FutureCallback<String>>>) {
        let recorder = Arc::new(Recorder::default());
        let callback: Arc<dyn FutureCallback<String>> = recorder.clone();
        (recorder, Some(callback))
    }

    fn panicking() -> Option<Arc<dyn FutureCallback<String>>> {
        Some(Arc::new(Panicking))
    }

    fn connection(wrapper: CallbackWrapper) -> ApiConnection {
        let mut conn = make_connection(FakeTransport::new(200, "{}"));
        conn.callback_wrapper = wrapper;
        conn
    }

    #[tokio::test]
    async fn callback_sees_success_and_failure() {
        let conn = connection(CallbackWrapper::DropPanics);
        let (recorder, callback) = recorder();

        let ok = conn
            .spawn(async { Ok("done".to_owned()) }, callback.clone())
            .await
            .unwrap();
        assert_eq!(ok.unwrap(), "done");

        let failing = async { Err::<String, _>(XmsError::Unauthorized) };
        let err = conn.spawn(failing, callback).await.unwrap();
        assert!(matches!(err, Err(XmsError::Unauthorized)));

        assert_eq!(*recorder.completed.lock().unwrap(), vec!["done".to_owned()]);
        assert_eq!(recorder.failed.load(Ordering::SeqCst), 1);
        assert_eq!(recorder.cancelled.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn drop_panics_keeps_the_result() {
        let conn = connection(CallbackWrapper::DropPanics);
        let result = conn
            .spawn(async { Ok("value".to_owned()) }, panicking())
            .await
            .unwrap();
        assert_eq!(result.unwrap(), "value");
    }

    #[tokio::test]
    async fn identity_lets_callback_panics_reach_the_task() {
        let conn = connection(CallbackWrapper::Identity);
        let joined = conn
            .spawn(async { Ok("value".to_owned()) }, panicking())
            .await;
        assert!(joined.unwrap_err().is_panic());
    }

    #[tokio::test]
    async fn aborted_task_reports_cancellation() {
        let conn = connection(CallbackWrapper::DropPanics);
        let (recorder, callback) = recorder();

        let handle = conn.spawn(
            async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok("late".to_owned())
            },
            callback,
        );
        tokio::task::yield_now().await;
        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());

        assert_eq!(recorder.cancelled.load(Ordering::SeqCst), 1);
        assert!(recorder.completed.lock().unwrap().is_empty());
    }
}
