// ── Reactive snapshot stream ──
//
// Subscription type for consuming snapshot changes from the coordinator.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::model::Snapshot;

type Slot = Option<Arc<Snapshot>>;

/// A subscription to the coordinator's cached snapshot.
///
/// Provides both point-in-time access and change notification via
/// [`changed()`](Self::changed) or by converting to a `Stream`. Only
/// successful refreshes notify; a failed refresh leaves subscribers alone.
pub struct SnapshotStream {
    current: Slot,
    receiver: watch::Receiver<Slot>,
}

impl SnapshotStream {
    pub(crate) fn new(receiver: watch::Receiver<Slot>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation time (or at the last `changed()`).
    pub fn current(&self) -> Option<&Arc<Snapshot>> {
        self.current.as_ref()
    }

    /// The latest snapshot (may have changed since creation).
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next published snapshot.
    /// Returns `None` once the coordinator has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<Snapshot>> {
        loop {
            self.receiver.changed().await.ok()?;
            let snap = self.receiver.borrow_and_update().clone();
            if let Some(snap) = snap {
                self.current = Some(Arc::clone(&snap));
                return Some(snap);
            }
        }
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    ///
    /// The stream first yields the current snapshot, if any.
    pub fn into_stream(self) -> SnapshotWatchStream {
        SnapshotWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct SnapshotWatchStream {
    inner: WatchStream<Slot>,
}

impl Stream for SnapshotWatchStream {
    type Item = Arc<Snapshot>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Some(snap))) => return Poll::Ready(Some(snap)),
                // An empty slot is never republished after the first success.
                Poll::Ready(Some(None)) => {}
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
