//! One zone of the world: a bounded 2D region owning the characters that
//! are present in it and the broadcast scope for their events.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::character::{Character, Direction};
use super::slots::Slots;
use super::{MAP_TICK, MAX_MAP_CHARACTERS};
use crate::net::connection::Connection;
use crate::protocol::outgoing::{self, AlertKind};

/// A character present on a map together with the connection that owns it,
/// so broadcasts can fan out without a global registry.
struct MapSlot {
    character: Character,
    conn: Arc<Connection>,
}

pub struct GameMap {
    pub id: i32,
    pub name: String,
    pub size_x: i32,
    pub size_y: i32,
    /// All mutations are serialized by this mutex; nothing under the lock
    /// performs I/O (sends go through non-blocking channels).
    characters: Mutex<Slots<MapSlot>>,
}

impl GameMap {
    pub fn new(id: i32, name: String, size_x: i32, size_y: i32) -> Self {
        Self {
            id,
            name,
            size_x,
            size_y,
            characters: Mutex::new(Slots::new(MAX_MAP_CHARACTERS)),
        }
    }

    /// Background tick for time-based world logic. Runs for the life of the
    /// map and never touches the dispatch path.
    pub fn spawn_tick(self: &Arc<Self>) {
        let map = Arc::clone(self);
        tokio::spawn(async move {
            tracing::info!("[map] [tick] starting loop for map {}", map.id);
            let mut ticker = tokio::time::interval(MAP_TICK);
            loop {
                ticker.tick().await;
                // world logic hook, intentionally empty for now
            }
        });
    }

    /// Places a character on this map.
    ///
    /// The join order is a wire contract: (1) CharacterSelected to the
    /// joiner, (2) OthersOfNewCharacter to everyone already present,
    /// (3) the NotifyExistingCharacters snapshot - taken before the insert,
    /// so the joiner never sees itself in it - and only then (4) the insert.
    ///
    /// Returns whether the character was inserted.
    pub async fn add_character(&self, conn: &Arc<Connection>, character: Character) -> bool {
        if character.current_map != self.id {
            tracing::warn!(
                "[map] [join] character {} belongs to map {}, not {}",
                character.id,
                character.current_map,
                self.id
            );
            send_alert(conn, AlertKind::Error, "Your character does not belong on this map!");
            return false;
        }

        let mut characters = self.characters.lock().await;

        if characters.find(|slot| slot.character.id == character.id).is_some() {
            tracing::warn!(
                "[map] [join] character {} is already on map {}",
                character.id,
                self.id
            );
            send_alert(conn, AlertKind::Error, "This character is already in the world!");
            return false;
        }

        if characters.is_full() {
            tracing::warn!("[map] [join] map {} is full ({} slots)", self.id, characters.capacity());
            send_alert(conn, AlertKind::Warn, "This map is full. Try again later.");
            return false;
        }

        conn.send(outgoing::character_selected(&character));

        let appeared = outgoing::others_of_new_character(&character).finish();
        for (_, slot) in characters.iter() {
            slot.conn.send_frame(appeared.clone());
        }

        let snapshot: Vec<Character> =
            characters.iter().map(|(_, slot)| slot.character.clone()).collect();
        conn.send(outgoing::notify_existing_characters(&snapshot));

        if characters
            .add(MapSlot { character, conn: Arc::clone(conn) })
            .is_err()
        {
            // capacity was checked under this same lock
            tracing::error!("[map] [join] slot table rejected insert on map {}", self.id);
            return false;
        }

        true
    }

    /// Validates and applies one movement report, then broadcasts it to
    /// every other character on the map. The mover gets no echo.
    #[allow(clippy::too_many_arguments)]
    pub async fn move_character(
        &self,
        conn: &Arc<Connection>,
        char_id: i32,
        action: i8,
        x: i32,
        y: i32,
        direction: Direction,
        velocity_x: i32,
        velocity_y: i32,
    ) {
        let mut characters = self.characters.lock().await;

        let index = match characters
            .iter()
            .find(|(_, slot)| slot.character.id == char_id)
            .map(|(index, _)| index)
        {
            Some(index) => index,
            None => {
                tracing::warn!("[map] [move] character {} is not in map {}", char_id, self.id);
                return;
            }
        };

        if let Some(slot) = characters.get(index) {
            if slot.character.current_map != self.id {
                send_alert(conn, AlertKind::Error, "Your character does not belong on this map!");
                return;
            }
        }

        if !self.in_bounds(x, y) {
            send_alert(
                conn,
                AlertKind::Error,
                "Your character is trying to leave the map's boundaries!",
            );
            return;
        }

        let frame = match characters.get_mut(index) {
            Some(slot) => {
                slot.character.map_x = x;
                slot.character.map_y = y;
                slot.character.direction = direction;
                slot.character.velocity_x = velocity_x;
                slot.character.velocity_y = velocity_y;
                outgoing::character_moved(&slot.character, action).finish()
            }
            None => return,
        };

        for (_, slot) in characters.iter() {
            if slot.conn.id() != conn.id() {
                slot.conn.send_frame(frame.clone());
            }
        }
    }

    /// Removes a character and announces the disconnect to the whole map.
    /// Removing an absent character is a logged no-op, never an error.
    pub async fn remove_character(&self, char_id: i32) {
        let mut characters = self.characters.lock().await;

        for index in characters.filled_slots() {
            let matches = characters
                .get(index)
                .map(|slot| slot.character.id == char_id)
                .unwrap_or(false);
            if !matches {
                continue;
            }

            if let Some(removed) = characters.remove(index) {
                let frame =
                    outgoing::character_disconnected(removed.character.id, self.id).finish();
                for (_, slot) in characters.iter() {
                    slot.conn.send_frame(frame.clone());
                }
            }
            return;
        }

        tracing::warn!("[map] [remove] character {} is not in map {}", char_id, self.id);
    }

    /// Linear lookup by id.
    pub async fn get_character(&self, char_id: i32) -> Option<Character> {
        let characters = self.characters.lock().await;
        characters
            .find(|slot| slot.character.id == char_id)
            .map(|slot| slot.character.clone())
    }

    pub async fn character_count(&self) -> usize {
        self.characters.lock().await.len()
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.size_x && y >= 0 && y < self.size_y
    }
}

fn send_alert(conn: &Arc<Connection>, kind: AlertKind, message: &str) {
    conn.send(outgoing::alert(kind, message, false));
}
