use std::sync::Arc;

use async_trait::async_trait;

use super::{require_account, store_error_alert};
use crate::account::AccountStore;
use crate::game::character::Character;
use crate::game::world::World;
use crate::net::connection::{ActiveCharacter, Connection};
use crate::net::handler::Request;
use crate::protocol::outgoing::{self, AlertKind};
use crate::protocol::ClientMessage;

/// SelectChar = char_id:i32. Loads the persisted record, builds the live
/// character and hands it to its map.
pub struct SelectCharRequest {
    world: Arc<World>,
    store: Arc<dyn AccountStore>,
}

impl SelectCharRequest {
    pub fn new(world: Arc<World>, store: Arc<dyn AccountStore>) -> Self {
        Self { world, store }
    }
}

#[async_trait]
impl Request for SelectCharRequest {
    fn name(&self) -> &'static str {
        "SelectCharRequest"
    }

    async fn handle(&self, conn: &Arc<Connection>, mut msg: ClientMessage) -> anyhow::Result<()> {
        let char_id = msg.get_i32()?;

        let Some(account_id) = require_account(conn) else {
            return Ok(());
        };

        if conn.active_character().is_some() {
            conn.send(outgoing::alert(
                AlertKind::Warn,
                "You already have a character in play.",
                false,
            ));
            return Ok(());
        }

        let record = match self.store.find_char(account_id, char_id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                conn.send(outgoing::alert(AlertKind::Warn, "Character not found.", false));
                return Ok(());
            }
            Err(e) => {
                store_error_alert(conn, e);
                return Ok(());
            }
        };

        let Some(map) = self.world.get_map(record.map) else {
            tracing::error!(
                "[requests] [select_char] character {} references unknown map {}",
                record.id,
                record.map
            );
            conn.send(outgoing::alert(AlertKind::Error, "This map is not available.", false));
            return Ok(());
        };

        let character = Character::enter_world(
            record.id,
            record.name,
            record.gender,
            record.map,
            record.x,
            record.y,
        );

        if map.add_character(conn, character).await {
            conn.set_active_character(ActiveCharacter { char_id: record.id, map_id: record.map });
        }
        Ok(())
    }
}
