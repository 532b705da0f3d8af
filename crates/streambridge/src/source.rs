//! Source adapter: asynchronous host pull stream → blocking `std::io::Read`.
//!
//! # Read flow
//!
//! ```text
//! Caller calls read(buf)
//!   → buffered bytes remain → copy out, no host interaction
//!   → buffer empty → issue one pull, park on the rendezvous
//!     → host settles Chunk(bytes) → buffer, copy out up to buf.len()
//!     → host settles Done        → Closed, Ok(0) now and on every later read
//!     → host settles Err(msg)    → Failed, the same error on every later read
//!     → settle handle dropped    → Failed (abandoned pull)
//! ```
//!
//! `Closed` and `Failed` are terminal: subsequent reads re-observe the same
//! outcome without issuing further pulls.

use std::io::{self, Read};

use bytes::{Buf, Bytes};
use tracing::{debug, trace};

use crate::error::BridgeError;
use crate::host::{Pulled, StreamPull};
use crate::settle::rendezvous;

enum SourceState {
    Idle,
    Closed,
    Failed(BridgeError),
}

/// Presents a host pull stream as a conventional sequential byte source.
///
/// Callers use ordinary buffered reads without awareness of the underlying
/// asynchrony; a read that finds the chunk buffer empty blocks the calling
/// thread until the host settles the pull. Must not be used from inside the
/// host runtime.
pub struct PullReader<P> {
    stream: P,
    /// Undrained remainder of the most recent chunk.
    buf: Bytes,
    state: SourceState,
}

impl<P: StreamPull> PullReader<P> {
    pub fn new(stream: P) -> Self {
        Self {
            stream,
            buf: Bytes::new(),
            state: SourceState::Idle,
        }
    }

    /// Issue pulls until the buffer holds bytes or the stream terminates.
    fn fill(&mut self) -> io::Result<()> {
        loop {
            let (reply, outcome) = rendezvous();
            self.stream.pull(reply);
            match outcome.wait() {
                Ok(Ok(Pulled::Chunk(chunk))) => {
                    if chunk.is_empty() {
                        // Zero-length host chunks are legal; pull again rather
                        // than surface a spurious Ok(0), which Read reserves
                        // for end of stream.
                        trace!("skipping empty chunk");
                        continue;
                    }
                    trace!(bytes = chunk.len(), "chunk received");
                    self.buf = chunk;
                    return Ok(());
                }
                Ok(Ok(Pulled::Done)) => {
                    debug!("host stream ended");
                    self.state = SourceState::Closed;
                    return Ok(());
                }
                Ok(Err(message)) => {
                    debug!(%message, "host stream failed");
                    let err = BridgeError::Host(message);
                    self.state = SourceState::Failed(err.clone());
                    return Err(io::Error::other(err));
                }
                Err(err) => {
                    debug!(%err, "pull abandoned by host");
                    self.state = SourceState::Failed(err.clone());
                    return Err(io::Error::other(err));
                }
            }
        }
    }
}

impl<P: StreamPull> Read for PullReader<P> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &self.state {
            SourceState::Closed => return Ok(0),
            SourceState::Failed(err) => return Err(io::Error::other(err.clone())),
            SourceState::Idle => {}
        }
        if buf.is_empty() {
            return Ok(0);
        }
        if self.buf.is_empty() {
            self.fill()?;
            if matches!(self.state, SourceState::Closed) {
                return Ok(0);
            }
        }
        let n = buf.len().min(self.buf.len());
        buf[..n].copy_from_slice(&self.buf[..n]);
        self.buf.advance(n);
        Ok(n)
    }
}
