//! Session Entity
//!
//! A user's live, addressable connection. The presence registry owns these.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::{self, error::TrySendError};
use uuid::Uuid;

/// A serialized push, shared between every recipient of one fan-out.
pub type Frame = Arc<str>;

/// Why a write to a live connection failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransportWriteError {
    /// The outbound queue is at capacity; the consumer is slow.
    #[error("outbound queue is full")]
    Full,

    /// The socket writer is gone.
    #[error("connection is closed")]
    Closed,
}

/// Outcome of pushing one frame to one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PushError {
    #[error("recipient is not connected")]
    NotPresent,

    #[error("transport write failed: {0}")]
    Transport(#[from] TransportWriteError),
}

/// Sending half of a connection's bounded outbound queue.
///
/// Writes never block: a full queue or a dropped socket writer fails
/// immediately. Frames sent through one connection keep their order.
#[derive(Debug, Clone)]
pub struct Connection {
    id: Uuid,
    tx: mpsc::Sender<Frame>,
}

impl Connection {
    /// Create a connection and the receiver its socket writer drains.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Frame>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            Self {
                id: Uuid::new_v4(),
                tx,
            },
            rx,
        )
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn send(&self, frame: Frame) -> Result<(), TransportWriteError> {
        self.tx.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => TransportWriteError::Full,
            TrySendError::Closed(_) => TransportWriteError::Closed,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// One connected user.
#[derive(Debug)]
pub struct Session {
    pub user_id: i64,
    pub login: String,
    pub connection: Connection,
    pub connected_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: i64, login: impl Into<String>, connection: Connection) -> Self {
        Self {
            user_id,
            login: login.into(),
            connection,
            connected_at: Utc::now(),
        }
    }

    pub fn connection_id(&self) -> Uuid {
        self.connection.id()
    }

    pub fn push(&self, frame: Frame) -> Result<(), TransportWriteError> {
        self.connection.send(frame)
    }
}
