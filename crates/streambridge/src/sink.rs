//! Sink adapter: synchronous closeable source → host pull stream.
//!
//! # Pull flow
//!
//! ```text
//! Host calls pull(controller)
//!   → source.read(chunk)
//!     → Ok(n > 0)       → controller.enqueue(n bytes), Ok
//!     → Ok(0)           → controller.close(), release source, Ok
//!     → Err(BrokenPipe) → same as Ok(0) — the host may pull a stream
//!                         another actor already finished
//!     → Err(Interrupted)→ no bytes this time, Ok — host will pull again
//!     → Err(other)      → controller.error(msg), release source, Err
//!
//! Host calls cancel()
//!   → release source
//! ```
//!
//! The underlying source is released exactly once across the union of all
//! termination paths; the release is guarded, not left to each branch.

use std::io;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::error::{BridgeError, BridgeResult};
use crate::host::{ByteSource, StreamController};
use crate::settle::SettleOnce;

/// Default chunk size for sink reads (16,640 bytes). A balance between
/// per-pull overhead and host-side copy cost; not correctness-critical.
pub const DEFAULT_CHUNK_SIZE: usize = 16_640;

enum SinkState {
    Idle,
    Closed,
    Errored(String),
}

/// Exposes a synchronous closeable byte producer through the host's
/// pull/cancel stream protocol, one chunk per pull.
///
/// The host registers [`pull`](ReaderStream::pull) and
/// [`cancel`](ReaderStream::cancel) as its stream callbacks and drives
/// consumption at its own pace. The host serializes the two; the adapter
/// only handles one operation at a time.
pub struct ReaderStream<S> {
    source: S,
    /// Fixed-size scratch buffer for one synchronous read per pull.
    chunk: Vec<u8>,
    state: SinkState,
    released: bool,
}

impl<S: ByteSource> ReaderStream<S> {
    pub fn new(source: S) -> Self {
        Self::with_chunk_size(source, DEFAULT_CHUNK_SIZE)
    }

    pub fn with_chunk_size(source: S, chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk_size must be > 0");
        Self {
            source,
            chunk: vec![0u8; chunk_size],
            state: SinkState::Idle,
            released: false,
        }
    }

    /// One unit of host backpressure: read once, enqueue at most one chunk.
    pub fn pull(&mut self, controller: &mut dyn StreamController) -> BridgeResult<()> {
        match &self.state {
            SinkState::Closed => {
                // Pulling a finished stream is benign; re-observe the close.
                controller.close();
                return Ok(());
            }
            SinkState::Errored(message) => return Err(BridgeError::Source(message.clone())),
            SinkState::Idle => {}
        }
        match self.source.read(&mut self.chunk) {
            Ok(0) => {
                trace!("source exhausted");
                self.finish(controller)
            }
            Ok(n) => {
                trace!(bytes = n, "chunk enqueued");
                controller.enqueue(Bytes::copy_from_slice(&self.chunk[..n]));
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {
                debug!("pipe already closed, treating as end of stream");
                self.finish(controller)
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => Ok(()),
            Err(err) => {
                let message = err.to_string();
                debug!(%message, "source read failed");
                controller.error(&message);
                self.state = SinkState::Errored(message.clone());
                self.release()?;
                Err(BridgeError::Source(message))
            }
        }
    }

    /// Asynchronous-convention wrapper around [`pull`](Self::pull): the host
    /// awaits the settle side while the pull itself runs synchronously.
    pub fn pull_settled(
        &mut self,
        controller: &mut dyn StreamController,
        done: SettleOnce<BridgeResult<()>>,
    ) {
        done.settle(self.pull(controller));
    }

    /// Host-side abandonment before exhaustion. Releases the underlying
    /// source; safe to call with no pull in flight, and again after any
    /// terminal path.
    pub fn cancel(&mut self) -> BridgeResult<()> {
        debug!("stream cancelled by host");
        self.state = SinkState::Closed;
        self.release()
    }

    fn finish(&mut self, controller: &mut dyn StreamController) -> BridgeResult<()> {
        controller.close();
        self.state = SinkState::Closed;
        self.release()
    }

    fn release(&mut self) -> BridgeResult<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        debug!("releasing underlying source");
        self.source
            .close()
            .map_err(|err| BridgeError::Close(err.to_string()))
    }
}
