use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use bytes::Bytes;
use tokio::sync::mpsc;

use crate::protocol::ServerMessage;

/// Character currently in play for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveCharacter {
    pub char_id: i32,
    pub map_id: i32,
}

#[derive(Default)]
struct SessionState {
    account_id: Option<i64>,
    active: Option<ActiveCharacter>,
}

/// One live client session: the outgoing side of the transport plus the
/// session identity. The account id and active character are owned by this
/// connection's own request stream; no other connection's handler writes
/// them.
pub struct Connection {
    id: u64,
    tx: mpsc::UnboundedSender<Bytes>,
    closed: AtomicBool,
    state: Mutex<SessionState>,
}

impl Connection {
    /// Connection plus the receiving end its writer task drains.
    pub fn channel(id: u64) -> (std::sync::Arc<Self>, mpsc::UnboundedReceiver<Bytes>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = std::sync::Arc::new(Self {
            id,
            tx,
            closed: AtomicBool::new(false),
            state: Mutex::new(SessionState::default()),
        });
        (conn, rx)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn send(&self, message: ServerMessage) {
        self.send_frame(message.finish());
    }

    /// Queues an already-encoded frame. Frames sent after `close` are
    /// silently dropped, never delivered.
    pub fn send_frame(&self, frame: Bytes) {
        if self.closed.load(Ordering::Acquire) {
            tracing::trace!("[net] [send] dropping frame for closed connection {}", self.id);
            return;
        }
        // a failed send means the writer task is already gone
        let _ = self.tx.send(frame);
    }

    /// Marks the connection unable to receive further sends. Idempotent; an
    /// in-flight handler is allowed to finish before the transport reacts.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn account_id(&self) -> Option<i64> {
        self.state.lock().unwrap().account_id
    }

    /// Set exactly once per session, after a successful login. A second set
    /// is ignored with a diagnostic.
    pub fn set_account_id(&self, account_id: i64) {
        let mut state = self.state.lock().unwrap();
        if state.account_id.is_some() {
            tracing::warn!(
                "[net] [session] account id already set for connection {}",
                self.id
            );
            return;
        }
        state.account_id = Some(account_id);
    }

    pub fn active_character(&self) -> Option<ActiveCharacter> {
        self.state.lock().unwrap().active
    }

    pub fn set_active_character(&self, active: ActiveCharacter) {
        self.state.lock().unwrap().active = Some(active);
    }

    pub fn clear_active_character(&self) {
        self.state.lock().unwrap().active = None;
    }
}
