use std::sync::Arc;

use async_trait::async_trait;

use super::{require_account, store_error_alert};
use crate::account::AccountStore;
use crate::net::connection::Connection;
use crate::net::handler::Request;
use crate::protocol::{outgoing, ClientMessage};

/// CharList carries no fields; the account comes from the session.
pub struct CharListRequest {
    store: Arc<dyn AccountStore>,
}

impl CharListRequest {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Request for CharListRequest {
    fn name(&self) -> &'static str {
        "CharListRequest"
    }

    async fn handle(&self, conn: &Arc<Connection>, _msg: ClientMessage) -> anyhow::Result<()> {
        let Some(account_id) = require_account(conn) else {
            return Ok(());
        };

        match self.store.char_list(account_id).await {
            Ok(records) => conn.send(outgoing::char_list(&records)),
            Err(e) => store_error_alert(conn, e),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::MemoryAccountStore;
    use crate::protocol::ServerHeader;
    use bytes::Bytes;

    fn empty_msg() -> ClientMessage {
        ClientMessage::from_frame(Bytes::from_static(&[0x00, 0x06])).unwrap()
    }

    #[tokio::test]
    async fn test_requires_login() {
        let request = CharListRequest::new(Arc::new(MemoryAccountStore::new()));
        let (conn, mut rx) = Connection::channel(1);

        request.handle(&conn, empty_msg()).await.unwrap();

        let frame = rx.try_recv().unwrap();
        let code = u16::from_be_bytes([frame[0], frame[1]]);
        assert_eq!(ServerHeader::try_from(code).unwrap(), ServerHeader::Alert);
    }

    #[tokio::test]
    async fn test_lists_account_characters() {
        let store = Arc::new(MemoryAccountStore::new());
        let account = store.create("a@b.c", "hash").await.unwrap();
        store
            .create_char(account.id, "Ryn", crate::game::character::Gender::Male, 1, 50, 50)
            .await
            .unwrap();

        let request = CharListRequest::new(store);
        let (conn, mut rx) = Connection::channel(1);
        conn.set_account_id(account.id);

        request.handle(&conn, empty_msg()).await.unwrap();

        let frame = rx.try_recv().unwrap();
        let code = u16::from_be_bytes([frame[0], frame[1]]);
        assert_eq!(ServerHeader::try_from(code).unwrap(), ServerHeader::CharList);
        assert_eq!(&frame[2..6], &1i32.to_be_bytes());
    }
}
