use std::sync::Arc;

use async_trait::async_trait;

use crate::account::AccountFlow;
use crate::net::connection::Connection;
use crate::net::handler::Request;
use crate::protocol::ClientMessage;

/// DeleteAccount = email:string, password:string.
pub struct DeleteAccountRequest {
    flow: Arc<AccountFlow>,
}

impl DeleteAccountRequest {
    pub fn new(flow: Arc<AccountFlow>) -> Self {
        Self { flow }
    }
}

#[async_trait]
impl Request for DeleteAccountRequest {
    fn name(&self) -> &'static str {
        "DeleteAccountRequest"
    }

    async fn handle(&self, conn: &Arc<Connection>, mut msg: ClientMessage) -> anyhow::Result<()> {
        let email = msg.get_string()?;
        let password = msg.get_string()?;

        self.flow.delete(conn, &email, &password).await;
        Ok(())
    }
}
