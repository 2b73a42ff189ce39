//! Result stream between the traversal engine and the sink
//!
//! The engine writes through a shared [`ResultStream`]; a single
//! [`ResultReceiver`] drains it. The stream is closed exactly once, by the
//! completion detector, after which the receiver yields whatever is still
//! buffered and then `None`.

use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tokio::sync::mpsc;

/// A node claimed by the traversal
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FoundNode {
    /// The node identifier
    pub url: String,

    /// Hop distance from the root at which the node was claimed
    pub hops: u32,

    /// True if the node sits on the depth boundary and was never fetched
    pub boundary: bool,
}

/// Returned when writing to a stream that has already been closed
#[derive(Debug, Error, PartialEq, Eq)]
#[error("result stream closed before {0} could be emitted")]
pub struct StreamClosed(pub String);

/// Write side of the result stream
#[derive(Debug)]
pub struct ResultStream {
    sender: Mutex<Option<mpsc::UnboundedSender<FoundNode>>>,
}

/// Read side of the result stream
#[derive(Debug)]
pub struct ResultReceiver {
    receiver: mpsc::UnboundedReceiver<FoundNode>,
}

/// Creates an open result stream
pub fn result_stream() -> (ResultStream, ResultReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        ResultStream {
            sender: Mutex::new(Some(tx)),
        },
        ResultReceiver { receiver: rx },
    )
}

impl ResultStream {
    /// Writes `node` to the stream
    pub fn emit(&self, node: FoundNode) -> Result<(), StreamClosed> {
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        match sender.as_ref() {
            // A dropped receiver only means nobody is listening; the write is
            // still accepted as far as the engine is concerned.
            Some(tx) => {
                let _ = tx.send(node);
                Ok(())
            }
            None => Err(StreamClosed(node.url)),
        }
    }

    /// Closes the stream; returns `false` if it was already closed
    pub fn close(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

impl ResultReceiver {
    /// Receives the next found node, or `None` once the stream is closed and drained
    pub async fn recv(&mut self) -> Option<FoundNode> {
        self.receiver.recv().await
    }

    /// Receives every remaining node until the stream closes
    pub async fn collect(mut self) -> Vec<FoundNode> {
        let mut found = Vec::new();
        while let Some(node) = self.recv().await {
            found.push(node);
        }
        found
    }
}
