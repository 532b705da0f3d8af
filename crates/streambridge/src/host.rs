//! Host capability surface consumed and produced by the adapters.
//!
//! The adapters never talk to a concrete host; they hold capability objects
//! behind these traits for their entire lifetime:
//!
//! - [`StreamPull`] — the host's "read next chunk" operation, settled
//!   asynchronously through a [`SettleOnce`] handle ([`PullReader`] side).
//! - [`ChunkStream`] + [`FuturePull`] — the same capability for hosts that
//!   hand out futures instead of taking completion callbacks.
//! - [`StreamController`] — the host's enqueue/close/error surface
//!   ([`ReaderStream`] side).
//! - [`ByteSource`] — the synchronous closeable producer behind a sink.
//!
//! Chunk payloads cross the boundary as owned [`Bytes`] with an explicit
//! length; the adapters never retain a borrow into host memory across a
//! suspension.
//!
//! [`PullReader`]: crate::PullReader
//! [`ReaderStream`]: crate::ReaderStream

use std::future::Future;
use std::io;
use std::pin::Pin;

use bytes::Bytes;

use crate::settle::SettleOnce;

/// Outcome of one pull from the host stream.
#[derive(Debug, Clone)]
pub enum Pulled {
    /// One chunk of bytes; the stream may produce more.
    Chunk(Bytes),
    /// The stream ended. No further pulls will produce data.
    Done,
}

/// What the host settles a pull with. The error side carries the
/// host-reported failure message.
pub type PullOutcome = Result<Pulled, String>;

/// The host's asynchronous "read next chunk" capability.
///
/// `pull` registers one request; the implementation must settle `reply` with
/// exactly one outcome, from whatever context the host resolves it on.
/// Dropping the handle unresolved is observed by the waiter as abandonment.
pub trait StreamPull: Send {
    /// Issue one pull. Never called while a previous pull is outstanding.
    fn pull(&mut self, reply: SettleOnce<PullOutcome>);
}

/// Boxed future alias for future-returning pull capabilities.
pub type ChunkFuture<'a> = Pin<Box<dyn Future<Output = PullOutcome> + Send + 'a>>;

/// A pull capability for hosts whose read operation is a future rather than
/// a completion callback.
pub trait ChunkStream: Send {
    /// Begin one read; the returned future resolves with the chunk outcome.
    fn next_chunk(&mut self) -> ChunkFuture<'_>;
}

/// Adapts a [`ChunkStream`] to the [`StreamPull`] protocol by blocking on
/// the chunk future via a runtime handle.
///
/// The calling thread (the suspended reader) drives the future to
/// completion, so no completion callback wiring is needed. Must not be used
/// from inside the runtime itself.
pub struct FuturePull<S> {
    inner: S,
    runtime: tokio::runtime::Handle,
}

impl<S: ChunkStream> FuturePull<S> {
    pub fn new(inner: S, runtime: tokio::runtime::Handle) -> Self {
        Self { inner, runtime }
    }
}

impl<S: ChunkStream> StreamPull for FuturePull<S> {
    fn pull(&mut self, reply: SettleOnce<PullOutcome>) {
        reply.settle(self.runtime.block_on(self.inner.next_chunk()));
    }
}

/// The host's stream controller, driven synchronously from within a sink
/// pull.
pub trait StreamController {
    /// Hand one chunk to the host. The payload is freshly allocated and
    /// owned by the host from this point on.
    fn enqueue(&mut self, chunk: Bytes);
    /// Signal successful termination of the stream.
    fn close(&mut self);
    /// Signal stream failure with a human-readable message.
    fn error(&mut self, message: &str);
}

/// A synchronous, closeable byte producer consumed by the sink adapter.
///
/// `read` follows `std::io::Read` semantics: `Ok(0)` means end of stream,
/// `ErrorKind::BrokenPipe` means the pipe was already closed by a concurrent
/// actor (treated as benign termination), `ErrorKind::Interrupted` means no
/// bytes this time, try again.
pub trait ByteSource: Send {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
    /// Release the source. Called exactly once by the adapter across all
    /// termination paths.
    fn close(&mut self) -> io::Result<()>;
}

impl<R: io::Read + Send> ByteSource for R {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(self, buf)
    }

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settle::rendezvous;

    struct ScriptedChunks {
        chunks: Vec<PullOutcome>,
    }

    impl ChunkStream for ScriptedChunks {
        fn next_chunk(&mut self) -> ChunkFuture<'_> {
            let outcome = if self.chunks.is_empty() {
                Ok(Pulled::Done)
            } else {
                self.chunks.remove(0)
            };
            Box::pin(async move { outcome })
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn future_pull_settles_chunks_in_order() {
        let stream = ScriptedChunks {
            chunks: vec![
                Ok(Pulled::Chunk(Bytes::from_static(b"one"))),
                Ok(Pulled::Chunk(Bytes::from_static(b"two"))),
            ],
        };
        let mut pull = FuturePull::new(stream, tokio::runtime::Handle::current());

        // Drive pulls from off the runtime, as a blocked reader would.
        let outcomes = tokio::task::spawn_blocking(move || {
            let mut seen = Vec::new();
            for _ in 0..3 {
                let (reply, wait) = rendezvous();
                pull.pull(reply);
                seen.push(wait.wait().unwrap());
            }
            seen
        })
        .await
        .unwrap();

        assert!(matches!(&outcomes[0], Ok(Pulled::Chunk(c)) if c.as_ref() == b"one"));
        assert!(matches!(&outcomes[1], Ok(Pulled::Chunk(c)) if c.as_ref() == b"two"));
        assert!(matches!(&outcomes[2], Ok(Pulled::Done)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn future_pull_propagates_host_failure() {
        let stream = ScriptedChunks {
            chunks: vec![Err("stream reset".to_string())],
        };
        let mut pull = FuturePull::new(stream, tokio::runtime::Handle::current());

        let outcome = tokio::task::spawn_blocking(move || {
            let (reply, wait) = rendezvous();
            pull.pull(reply);
            wait.wait().unwrap()
        })
        .await
        .unwrap();

        assert!(matches!(outcome, Err(message) if message == "stream reset"));
    }

    #[test]
    fn std_readers_are_byte_sources() {
        let mut source: &[u8] = b"abc";
        let mut buf = [0u8; 8];
        let n = ByteSource::read(&mut source, &mut buf).unwrap();
        assert_eq!(&buf[..n], b"abc");
        ByteSource::close(&mut source).unwrap();
    }
}
