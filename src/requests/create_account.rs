use std::sync::Arc;

use async_trait::async_trait;

use crate::account::AccountFlow;
use crate::net::connection::Connection;
use crate::net::handler::Request;
use crate::protocol::ClientMessage;

/// CreateAccount = email:string, password:string, major:i32, minor:i32,
/// revision:i32.
pub struct CreateAccountRequest {
    flow: Arc<AccountFlow>,
}

impl CreateAccountRequest {
    pub fn new(flow: Arc<AccountFlow>) -> Self {
        Self { flow }
    }
}

#[async_trait]
impl Request for CreateAccountRequest {
    fn name(&self) -> &'static str {
        "CreateAccountRequest"
    }

    async fn handle(&self, conn: &Arc<Connection>, mut msg: ClientMessage) -> anyhow::Result<()> {
        let email = msg.get_string()?;
        let password = msg.get_string()?;
        let major = msg.get_i32()?;
        let minor = msg.get_i32()?;
        let revision = msg.get_i32()?;

        self.flow
            .create(conn, &email, &password, (major, minor, revision))
            .await;
        Ok(())
    }
}
