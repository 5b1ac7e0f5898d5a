use std::sync::Arc;

use async_trait::async_trait;

use super::{require_account, store_error_alert};
use crate::account::AccountStore;
use crate::net::connection::Connection;
use crate::net::handler::Request;
use crate::protocol::outgoing::{self, AlertKind};
use crate::protocol::ClientMessage;

/// DeleteChar = char_id:i32.
pub struct DeleteCharRequest {
    store: Arc<dyn AccountStore>,
}

impl DeleteCharRequest {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Request for DeleteCharRequest {
    fn name(&self) -> &'static str {
        "DeleteCharRequest"
    }

    async fn handle(&self, conn: &Arc<Connection>, mut msg: ClientMessage) -> anyhow::Result<()> {
        let char_id = msg.get_i32()?;

        let Some(account_id) = require_account(conn) else {
            return Ok(());
        };

        match self.store.delete_char(account_id, char_id).await {
            Ok(true) => conn.send(outgoing::character_deleted()),
            Ok(false) => {
                conn.send(outgoing::alert(AlertKind::Warn, "Character not found.", false));
            }
            Err(e) => store_error_alert(conn, e),
        }
        Ok(())
    }
}
