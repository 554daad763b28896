//! # Unbounded Completion-Signaled Queues
//!
//! [`Queue`] owns one tokio unbounded mpsc channel and adds what the pipeline
//! protocol needs on top of it:
//!
//! - an explicit one-shot [`Queue::complete`] signal, independent of how many
//!   writer handles are still alive;
//! - declared writer/reader multiplicity, enforced when handles are issued;
//! - a synchronous-continuation knob deciding whether a reader keeps running
//!   after a dequeue or yields back to the scheduler first.
//!
//! The queue keeps the only [`mpsc::UnboundedSender`]. Completing the queue
//! drops that sender, so readers drain whatever is buffered and then observe
//! end of sequence.

use crate::error::{PipelineError, Result};
use crate::stages::Item;
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

/// Declared access pattern of a queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueOptions {
    pub single_writer: bool,
    pub single_reader: bool,
    pub allow_synchronous_continuations: bool,
}

impl QueueOptions {
    /// One writer, one reader
    pub fn exclusive(allow_synchronous_continuations: bool) -> Self {
        Self {
            single_writer: true,
            single_reader: true,
            allow_synchronous_continuations,
        }
    }

    /// Many writers feeding `readers` consumers
    pub fn fan_in(readers: usize, allow_synchronous_continuations: bool) -> Self {
        Self {
            single_writer: false,
            single_reader: readers <= 1,
            allow_synchronous_continuations,
        }
    }
}

struct QueueInner {
    name: String,
    options: QueueOptions,
    sender: RwLock<Option<mpsc::UnboundedSender<Item>>>,
    receiver: Mutex<mpsc::UnboundedReceiver<Item>>,
    writers_issued: AtomicUsize,
    readers_issued: AtomicUsize,
    enqueued: AtomicU64,
}

/// Owning handle of a queue; clones share the same channel.
///
/// Only the owner can signal completion. Writers and readers are issued
/// separately so stages never hold more authority than they need.
#[derive(Clone)]
pub struct Queue {
    inner: Arc<QueueInner>,
}

impl fmt::Debug for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queue")
            .field("name", &self.inner.name)
            .field("options", &self.inner.options)
            .field("completed", &self.is_completed())
            .field("enqueued", &self.enqueued())
            .finish()
    }
}

impl Queue {
    pub fn unbounded(name: impl Into<String>, options: QueueOptions) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            inner: Arc::new(QueueInner {
                name: name.into(),
                options,
                sender: RwLock::new(Some(sender)),
                receiver: Mutex::new(receiver),
                writers_issued: AtomicUsize::new(0),
                readers_issued: AtomicUsize::new(0),
                enqueued: AtomicU64::new(0),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn options(&self) -> QueueOptions {
        self.inner.options
    }

    /// Issue a writer handle
    pub fn writer(&self) -> Result<QueueWriter> {
        let issued = self.inner.writers_issued.fetch_add(1, Ordering::AcqRel);
        if self.inner.options.single_writer && issued > 0 {
            return Err(PipelineError::WriterMultiplicity {
                queue: self.inner.name.clone(),
            });
        }
        Ok(QueueWriter {
            inner: Arc::clone(&self.inner),
        })
    }

    /// Issue a reader handle
    pub fn reader(&self) -> Result<QueueReader> {
        let issued = self.inner.readers_issued.fetch_add(1, Ordering::AcqRel);
        if self.inner.options.single_reader && issued > 0 {
            return Err(PipelineError::ReaderMultiplicity {
                queue: self.inner.name.clone(),
            });
        }
        Ok(QueueReader {
            inner: Arc::clone(&self.inner),
        })
    }

    /// Signal that no more items will be written.
    ///
    /// Returns `true` on the call that actually completed the queue.
    pub fn complete(&self) -> bool {
        let completed = self.inner.sender.write().take().is_some();
        if completed {
            debug!(
                queue = %self.inner.name,
                enqueued = self.enqueued(),
                "queue completed"
            );
        }
        completed
    }

    pub fn is_completed(&self) -> bool {
        self.inner.sender.read().is_none()
    }

    /// Total items accepted so far
    pub fn enqueued(&self) -> u64 {
        self.inner.enqueued.load(Ordering::Acquire)
    }
}

/// Write capability for a queue
pub struct QueueWriter {
    inner: Arc<QueueInner>,
}

impl fmt::Debug for QueueWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueWriter")
            .field("queue", &self.inner.name)
            .finish()
    }
}

impl QueueWriter {
    /// Enqueue an item. Never blocks; fails once the queue is completed.
    pub fn write(&self, item: Item) -> Result<()> {
        let guard = self.inner.sender.read();
        let accepted = guard
            .as_ref()
            .is_some_and(|sender| sender.send(item).is_ok());

        if !accepted {
            return Err(PipelineError::QueueCompleted {
                queue: self.inner.name.clone(),
                item,
            });
        }

        self.inner.enqueued.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    pub fn queue_name(&self) -> &str {
        &self.inner.name
    }
}

/// Read capability for a queue
pub struct QueueReader {
    inner: Arc<QueueInner>,
}

impl fmt::Debug for QueueReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueReader")
            .field("queue", &self.inner.name)
            .finish()
    }
}

impl QueueReader {
    /// Next item, or `None` once the queue is completed and drained
    pub async fn read(&self) -> Option<Item> {
        let item = {
            let mut receiver = self.inner.receiver.lock().await;
            receiver.recv().await
        };

        if item.is_some() && !self.inner.options.allow_synchronous_continuations {
            tokio::task::yield_now().await;
        }

        item
    }

    pub fn queue_name(&self) -> &str {
        &self.inner.name
    }
}
