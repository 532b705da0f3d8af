//! One-shot rendezvous between the host event loop and a blocked caller.
//!
//! A pull issued from a blocking thread is settled by the host at some later
//! point on its own event loop. The two sides meet at a single-use handoff:
//! [`SettleOnce`] is consumed by delivering the outcome, [`WaitOnce`] is
//! consumed by receiving it. A pair serves exactly one operation and is never
//! reused, so exactly one of "data", "end", "error" can be observed per pull.

use tokio::sync::oneshot;

use crate::error::{BridgeError, BridgeResult};

/// Create a fresh rendezvous pair for one operation.
pub fn rendezvous<T>() -> (SettleOnce<T>, WaitOnce<T>) {
    let (tx, rx) = oneshot::channel();
    (SettleOnce { tx }, WaitOnce { rx })
}

/// Producer half of the rendezvous, held by the settling side.
#[derive(Debug)]
pub struct SettleOnce<T> {
    tx: oneshot::Sender<T>,
}

impl<T> SettleOnce<T> {
    /// Deliver the single outcome. Consumes the handle, so a second delivery
    /// is unrepresentable. Delivery to a waiter that already gave up is
    /// silently dropped.
    pub fn settle(self, outcome: T) {
        let _ = self.tx.send(outcome);
    }
}

/// Consumer half of the rendezvous, held by the suspended side.
#[derive(Debug)]
pub struct WaitOnce<T> {
    rx: oneshot::Receiver<T>,
}

impl<T> WaitOnce<T> {
    /// Block the calling thread until the outcome is delivered.
    ///
    /// Returns [`BridgeError::Abandoned`] if the settle handle was dropped
    /// without delivering anything. Must not be called from inside the host
    /// runtime — it parks the current thread.
    pub fn wait(self) -> BridgeResult<T> {
        self.rx.blocking_recv().map_err(|_| BridgeError::Abandoned)
    }

    /// Await the outcome without blocking, for callers that live on the host
    /// event loop (e.g. awaiting a sink pull completion).
    pub async fn settled(self) -> BridgeResult<T> {
        self.rx.await.map_err(|_| BridgeError::Abandoned)
    }
}
