use std::sync::Arc;

use async_trait::async_trait;

use crate::game::character::Direction;
use crate::game::world::World;
use crate::net::connection::Connection;
use crate::net::handler::Request;
use crate::protocol::outgoing::{self, AlertKind};
use crate::protocol::ClientMessage;

/// MoveChar = action:i8, x:i32, y:i32, direction:i8, velocity_x:i32,
/// velocity_y:i32. The map does the authoritative bounds check.
pub struct MoveCharRequest {
    world: Arc<World>,
}

impl MoveCharRequest {
    pub fn new(world: Arc<World>) -> Self {
        Self { world }
    }
}

#[async_trait]
impl Request for MoveCharRequest {
    fn name(&self) -> &'static str {
        "MoveCharRequest"
    }

    async fn handle(&self, conn: &Arc<Connection>, mut msg: ClientMessage) -> anyhow::Result<()> {
        let action = msg.get_i8()?;
        let x = msg.get_i32()?;
        let y = msg.get_i32()?;
        let direction_code = msg.get_i8()?;
        let velocity_x = msg.get_i32()?;
        let velocity_y = msg.get_i32()?;

        let Some(active) = conn.active_character() else {
            tracing::warn!(
                "[requests] [move_char] connection {} moved without a character",
                conn.id()
            );
            return Ok(());
        };

        let Some(direction) = Direction::from_i8(direction_code) else {
            conn.send(outgoing::alert(AlertKind::Warn, "Invalid direction.", false));
            return Ok(());
        };

        let Some(map) = self.world.get_map(active.map_id) else {
            tracing::error!(
                "[requests] [move_char] session map {} does not exist",
                active.map_id
            );
            return Ok(());
        };

        map.move_character(conn, active.char_id, action, x, y, direction, velocity_x, velocity_y)
            .await;
        Ok(())
    }
}
