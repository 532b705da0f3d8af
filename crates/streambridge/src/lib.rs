//! Bidirectional adapters between host pull streams and blocking byte readers.
//!
//! The host side of the platform speaks a pull-based, asynchronous stream
//! protocol: it requests one chunk at a time and is told about completion or
//! failure through explicit signals. The rest of the program reads bytes the
//! ordinary way, through blocking `std::io::Read`. This crate bridges the two
//! in both directions:
//!
//! - [`PullReader`] wraps a host pull capability ([`StreamPull`]) and exposes
//!   `std::io::Read`. A read that finds no buffered bytes issues exactly one
//!   pull and blocks the calling thread until the host settles it.
//! - [`ReaderStream`] wraps a synchronous closeable source ([`ByteSource`])
//!   and drives the host's pull/cancel stream protocol, enqueueing one chunk
//!   per pull through a [`StreamController`].
//!
//! # Bridging Model
//!
//! The host event loop is a tokio runtime; blocking callers live on ordinary
//! threads (or `spawn_blocking` contexts). Each suspension crosses the
//! boundary through a one-shot rendezvous ([`rendezvous`]): the settling side
//! delivers exactly one outcome, the waiting side consumes exactly one. The
//! pair is never reused.
//!
//! # Sequencing Guarantee
//!
//! All adapter operations take `&mut self`, so per instance there is never
//! more than one pull or read in flight. The adapters move opaque bytes only:
//! no buffering beyond single-chunk lookahead, no retries, no multiplexing,
//! no content transformation.

mod error;
mod host;
mod settle;
mod sink;
mod source;

pub use error::{BridgeError, BridgeResult};
pub use host::{ByteSource, ChunkFuture, ChunkStream, FuturePull, PullOutcome, Pulled, StreamController, StreamPull};
pub use settle::{rendezvous, SettleOnce, WaitOnce};
pub use sink::{ReaderStream, DEFAULT_CHUNK_SIZE};
pub use source::PullReader;
