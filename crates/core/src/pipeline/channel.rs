use crossbeam_channel::{Receiver as CrossbeamReceiver, Sender as CrossbeamSender};
use super::message::Message;
use std::sync::atomic::{AtomicU64, Ordering};
use std::fmt;

/// Writing end of a stage-to-stage channel.
///
/// There is exactly one sender per channel. Dropping it closes the channel;
/// the reader sees end-of-stream once buffered items are drained.
pub struct Sender<T> {
    inner: CrossbeamSender<Message<T>>,
    source_id: Option<String>,
    sent: AtomicU64,
}

/// Reading end of a stage-to-stage channel.
pub struct Receiver<T> {
    inner: CrossbeamReceiver<Message<T>>,
    received: AtomicU64,
}

// Manual Debug implementations that don't require T: Debug
impl<T> fmt::Debug for Sender<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sender")
            .field("source_id", &self.source_id)
            .field("sent", &self.sent.load(Ordering::Relaxed))
            .finish()
    }
}

impl<T> fmt::Debug for Receiver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Receiver")
            .field("received", &self.received.load(Ordering::Relaxed))
            .finish()
    }
}

impl<T> Sender<T> {
    /// Blocks until the reader takes the message (or buffer space frees up
    /// on a bounded channel). Fails only if the receiver has been dropped.
    pub fn send(&self, value: Message<T>) -> Result<(), crossbeam_channel::SendError<Message<T>>> {
        let msg = match &self.source_id {
            Some(source_id) => value.with_source(source_id.clone()),
            None => value,
        };
        self.inner.send(msg)?;
        self.sent.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Closes the channel.
    pub fn close(self) -> u64 {
        self.sent()
    }

    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    pub fn capacity(&self) -> Option<usize> {
        self.inner.capacity()
    }
}

impl<T> Receiver<T> {
    /// Blocks until an item arrives. Returns `Err` once the sender is gone
    /// and nothing is left to read.
    pub fn recv(&self) -> Result<Message<T>, crossbeam_channel::RecvError> {
        let msg = self.inner.recv()?;
        self.received.fetch_add(1, Ordering::Relaxed);
        Ok(msg)
    }

    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    pub fn capacity(&self) -> Option<usize> {
        self.inner.capacity()
    }
}

/// Channel with `capacity` buffered slots. A capacity of 0 gives a handoff
/// channel where every send waits for the matching receive.
pub fn channel<T>(capacity: usize) -> (Sender<T>, Receiver<T>) {
    let (s, r) = crossbeam_channel::bounded(capacity);
    (
        Sender {
            inner: s,
            source_id: None,
            sent: AtomicU64::new(0),
        },
        Receiver {
            inner: r,
            received: AtomicU64::new(0),
        },
    )
}

/// Like [`channel`], but every message sent is stamped with `source_id`.
pub fn with_source<T>(source_id: impl Into<String>, capacity: usize) -> (Sender<T>, Receiver<T>) {
    let (mut s, r) = channel(capacity);
    s.source_id = Some(source_id.into());
    (s, r)
}

pub fn handoff<T>() -> (Sender<T>, Receiver<T>) {
    channel(0)
}
