use std::sync::Arc;

use async_trait::async_trait;

use super::{require_account, store_error_alert};
use crate::account::{AccountStore, StoreError};
use crate::config::StartPoint;
use crate::game::character::Gender;
use crate::net::connection::Connection;
use crate::net::handler::Request;
use crate::protocol::outgoing::{self, AlertKind};
use crate::protocol::ClientMessage;

pub fn is_valid_name(s: &str) -> bool {
    s.len() >= 3 && s.len() <= 12 && s.chars().all(|c| c.is_ascii_alphabetic())
}

/// CreateChar = name:string, gender:i8. New characters spawn at the
/// configured start point.
pub struct CreateCharRequest {
    store: Arc<dyn AccountStore>,
    start: StartPoint,
}

impl CreateCharRequest {
    pub fn new(store: Arc<dyn AccountStore>, start: StartPoint) -> Self {
        Self { store, start }
    }
}

#[async_trait]
impl Request for CreateCharRequest {
    fn name(&self) -> &'static str {
        "CreateCharRequest"
    }

    async fn handle(&self, conn: &Arc<Connection>, mut msg: ClientMessage) -> anyhow::Result<()> {
        let name = msg.get_string()?;
        let gender_code = msg.get_i8()?;

        let Some(account_id) = require_account(conn) else {
            return Ok(());
        };

        if !is_valid_name(&name) {
            conn.send(outgoing::alert(
                AlertKind::Warn,
                "Character names are 3-12 letters.",
                false,
            ));
            return Ok(());
        }

        let Some(gender) = Gender::from_i8(gender_code) else {
            conn.send(outgoing::alert(AlertKind::Warn, "Invalid gender.", false));
            return Ok(());
        };

        match self
            .store
            .create_char(account_id, &name, gender, self.start.map, self.start.x, self.start.y)
            .await
        {
            Ok(record) => {
                tracing::info!(
                    "[requests] [create_char] character {} '{}' for account {}",
                    record.id,
                    record.name,
                    account_id
                );
                conn.send(outgoing::character_created());
            }
            Err(StoreError::NameTaken) => {
                conn.send(outgoing::alert(
                    AlertKind::Warn,
                    "That character name is already taken.",
                    false,
                ));
            }
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
    use bytes::{BufMut, BytesMut};

    fn msg(name: &str, gender: i8) -> ClientMessage {
        let mut buf = BytesMut::new();
        buf.put_u16(7); // CreateChar
        buf.put_u16(name.len() as u16);
        buf.put_slice(name.as_bytes());
        buf.put_i8(gender);
        ClientMessage::from_frame(buf.freeze()).unwrap()
    }

    fn first_header(rx: &mut tokio::sync::mpsc::UnboundedReceiver<bytes::Bytes>) -> ServerHeader {
        let frame = rx.try_recv().unwrap();
        ServerHeader::try_from(u16::from_be_bytes([frame[0], frame[1]])).unwrap()
    }

    #[tokio::test]
    async fn test_create_char_success() {
        let store = Arc::new(MemoryAccountStore::new());
        let account = store.create("a@b.c", "hash").await.unwrap();
        let request = CreateCharRequest::new(store, StartPoint { map: 1, x: 50, y: 50 });
        let (conn, mut rx) = Connection::channel(1);
        conn.set_account_id(account.id);

        request.handle(&conn, msg("Ryn", 1)).await.unwrap();
        assert_eq!(first_header(&mut rx), ServerHeader::CharacterCreated);
    }

    #[tokio::test]
    async fn test_bad_name_rejected() {
        let store = Arc::new(MemoryAccountStore::new());
        let account = store.create("a@b.c", "hash").await.unwrap();
        let request = CreateCharRequest::new(store, StartPoint { map: 1, x: 50, y: 50 });
        let (conn, mut rx) = Connection::channel(1);
        conn.set_account_id(account.id);

        request.handle(&conn, msg("x1", 1)).await.unwrap();
        assert_eq!(first_header(&mut rx), ServerHeader::Alert);
    }

    #[test]
    fn test_valid_name_bounds() {
        assert!(is_valid_name("abc"));
        assert!(is_valid_name("abcdefghijkl"));
        assert!(!is_valid_name("ab"));
        assert!(!is_valid_name("abcdefghijklm"));
        assert!(!is_valid_name("abc1"));
    }
}
