use std::sync::Arc;

use async_trait::async_trait;

use crate::account::AccountFlow;
use crate::net::connection::Connection;
use crate::net::handler::Request;
use crate::protocol::ClientMessage;

/// RecoverAccount = email:string.
pub struct RecoverAccountRequest {
    flow: Arc<AccountFlow>,
}

impl RecoverAccountRequest {
    pub fn new(flow: Arc<AccountFlow>) -> Self {
        Self { flow }
    }
}

#[async_trait]
impl Request for RecoverAccountRequest {
    fn name(&self) -> &'static str {
        "RecoverAccountRequest"
    }

    async fn handle(&self, conn: &Arc<Connection>, mut msg: ClientMessage) -> anyhow::Result<()> {
        let email = msg.get_string()?;

        self.flow.recover(conn, &email).await;
        Ok(())
    }
}
