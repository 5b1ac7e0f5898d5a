use std::sync::Arc;

use async_trait::async_trait;

use crate::net::connection::Connection;
use crate::net::handler::Request;
use crate::protocol::{outgoing, ClientMessage};

pub struct PingRequest;

#[async_trait]
impl Request for PingRequest {
    fn name(&self) -> &'static str {
        "PingRequest"
    }

    async fn handle(&self, conn: &Arc<Connection>, _msg: ClientMessage) -> anyhow::Result<()> {
        conn.send(outgoing::pong());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ServerHeader;

    #[tokio::test]
    async fn test_ping_answers_pong() {
        let (conn, mut rx) = Connection::channel(1);
        let msg = ClientMessage::from_frame(bytes::Bytes::from_static(&[0, 0])).unwrap();

        PingRequest.handle(&conn, msg).await.unwrap();

        let frame = rx.try_recv().unwrap();
        let code = u16::from_be_bytes([frame[0], frame[1]]);
        assert_eq!(ServerHeader::try_from(code).unwrap(), ServerHeader::Pong);
    }
}
