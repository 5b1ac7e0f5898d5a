use std::sync::Arc;

use async_trait::async_trait;

use crate::account::AccountFlow;
use crate::net::connection::Connection;
use crate::net::handler::Request;
use crate::protocol::ClientMessage;

/// ChangePassword = email:string, old_password:string, new_password:string.
pub struct ChangePasswordRequest {
    flow: Arc<AccountFlow>,
}

impl ChangePasswordRequest {
    pub fn new(flow: Arc<AccountFlow>) -> Self {
        Self { flow }
    }
}

#[async_trait]
impl Request for ChangePasswordRequest {
    fn name(&self) -> &'static str {
        "ChangePasswordRequest"
    }

    async fn handle(&self, conn: &Arc<Connection>, mut msg: ClientMessage) -> anyhow::Result<()> {
        let email = msg.get_string()?;
        let old_password = msg.get_string()?;
        let new_password = msg.get_string()?;

        self.flow
            .change_password(conn, &email, &old_password, &new_password)
            .await;
        Ok(())
    }
}
