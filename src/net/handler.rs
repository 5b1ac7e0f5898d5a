//! The dispatch table: one handler per client header, registered once at
//! startup, read-only afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::connection::Connection;
use crate::protocol::{ClientHeader, ClientMessage};

/// The single capability a handler implements: process one decoded message
/// for one connection. Which handler runs is decided entirely by the type
/// code, never by message contents.
///
/// A returned error is unrecoverable; the dispatcher logs it and closes the
/// connection. Recoverable conditions (bad credentials, illegal move, full
/// map) are absorbed inside the handler as alerts.
#[async_trait]
pub trait Request: Send + Sync {
    fn name(&self) -> &'static str;

    async fn handle(&self, conn: &Arc<Connection>, msg: ClientMessage) -> anyhow::Result<()>;
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("handler already registered for {0:?}")]
    DuplicateHandler(ClientHeader),
}

#[derive(Default)]
pub struct Dispatcher {
    handlers: HashMap<ClientHeader, Box<dyn Request>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registering the same header twice is rejected, not overwritten.
    pub fn register(
        &mut self,
        header: ClientHeader,
        handler: Box<dyn Request>,
    ) -> Result<(), DispatchError> {
        if self.handlers.contains_key(&header) {
            return Err(DispatchError::DuplicateHandler(header));
        }
        self.handlers.insert(header, handler);
        Ok(())
    }

    pub fn is_registered(&self, header: ClientHeader) -> bool {
        self.handlers.contains_key(&header)
    }

    /// Routes one decoded message. An unsupported header is a protocol
    /// violation: the connection is closed, nothing is invoked.
    pub async fn dispatch(&self, conn: &Arc<Connection>, msg: ClientMessage) {
        let header = msg.header();
        match self.handlers.get(&header) {
            Some(handler) => {
                if let Err(e) = handler.handle(conn, msg).await {
                    tracing::error!(
                        "[net] [dispatch] {} failed for connection {}: {:#}",
                        handler.name(),
                        conn.id(),
                        e
                    );
                    conn.close();
                }
            }
            None => {
                tracing::warn!(
                    "[net] [dispatch] no handler for {:?} (connection {})",
                    header,
                    conn.id()
                );
                conn.close();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        hits: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl Request for Counting {
        fn name(&self) -> &'static str {
            "Counting"
        }

        async fn handle(&self, _conn: &Arc<Connection>, _msg: ClientMessage) -> anyhow::Result<()> {
            self.hits.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("boom");
            }
            Ok(())
        }
    }

    fn ping_msg() -> ClientMessage {
        ClientMessage::from_frame(Bytes::from_static(&[0x00, 0x00])).unwrap()
    }

    fn select_msg() -> ClientMessage {
        ClientMessage::from_frame(Bytes::from_static(&[0x00, 0x09, 0, 0, 0, 1])).unwrap()
    }

    #[tokio::test]
    async fn test_dispatch_invokes_only_the_registered_handler() {
        let ping_hits = Arc::new(AtomicUsize::new(0));
        let select_hits = Arc::new(AtomicUsize::new(0));

        let mut dispatcher = Dispatcher::new();
        dispatcher
            .register(
                ClientHeader::Ping,
                Box::new(Counting { hits: Arc::clone(&ping_hits), fail: false }),
            )
            .unwrap();
        dispatcher
            .register(
                ClientHeader::SelectChar,
                Box::new(Counting { hits: Arc::clone(&select_hits), fail: false }),
            )
            .unwrap();

        let (conn, _rx) = Connection::channel(1);
        dispatcher.dispatch(&conn, ping_msg()).await;

        assert_eq!(ping_hits.load(Ordering::SeqCst), 1);
        assert_eq!(select_hits.load(Ordering::SeqCst), 0);
        assert!(!conn.is_closed());
    }

    #[tokio::test]
    async fn test_unregistered_header_closes_connection() {
        let dispatcher = Dispatcher::new();
        let (conn, _rx) = Connection::channel(1);

        dispatcher.dispatch(&conn, select_msg()).await;

        assert!(conn.is_closed());
    }

    #[tokio::test]
    async fn test_handler_error_closes_connection() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = Dispatcher::new();
        dispatcher
            .register(
                ClientHeader::Ping,
                Box::new(Counting { hits: Arc::clone(&hits), fail: true }),
            )
            .unwrap();

        let (conn, _rx) = Connection::channel(1);
        dispatcher.dispatch(&conn, ping_msg()).await;

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(conn.is_closed());
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut dispatcher = Dispatcher::new();
        dispatcher
            .register(
                ClientHeader::Ping,
                Box::new(Counting { hits: Arc::new(AtomicUsize::new(0)), fail: false }),
            )
            .unwrap();

        let err = dispatcher
            .register(
                ClientHeader::Ping,
                Box::new(Counting { hits: Arc::new(AtomicUsize::new(0)), fail: false }),
            )
            .unwrap_err();
        assert_eq!(err, DispatchError::DuplicateHandler(ClientHeader::Ping));
    }
}
