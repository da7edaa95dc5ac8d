// ── Reactive inventory streams ──
//
// Subscription types for consuming committed states from the InventoryStore.

mod filter;

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

pub use filter::{DeviceFilter, ServiceFilter};

use crate::store::Inventory;

/// A subscription to the inventory.
///
/// Provides both point-in-time snapshot access and change notification
/// via `changed()` or by converting to a `Stream`.
pub struct InventoryStream {
    current: Arc<Inventory>,
    receiver: watch::Receiver<Arc<Inventory>>,
}

impl InventoryStream {
    pub(crate) fn new(receiver: watch::Receiver<Arc<Inventory>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// Get the snapshot captured at creation (or at the last `changed()`).
    pub fn current(&self) -> &Arc<Inventory> {
        &self.current
    }

    /// Get the latest committed snapshot.
    pub fn latest(&self) -> Arc<Inventory> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next commit, returning the new snapshot.
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<Inventory>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream`. The first item is the current snapshot.
    pub fn into_stream(self) -> InventoryWatchStream {
        InventoryWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct InventoryWatchStream {
    inner: WatchStream<Arc<Inventory>>,
}

impl Stream for InventoryWatchStream {
    type Item = Arc<Inventory>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
