//! Constructors for every server → client message.
//!
//! Field layouts are part of the wire contract and must not change; clients
//! decode them positionally.

use super::{ServerHeader, ServerMessage};
use crate::account::CharRecord;
use crate::game::character::Character;

/// Severity carried by an alert, `i8` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i8)]
pub enum AlertKind {
    Info = 0,
    Warn = 1,
    Error = 2,
}

/// Alert = kind:i8, message:string, critical:i8 (0/1).
/// Critical alerts tell the client to drop back to the title screen.
pub fn alert(kind: AlertKind, message: &str, critical: bool) -> ServerMessage {
    let mut msg = ServerMessage::new(ServerHeader::Alert);
    msg.put_i8(kind as i8)
        .put_string(message)
        .put_i8(critical as i8);
    msg
}

pub fn pong() -> ServerMessage {
    ServerMessage::new(ServerHeader::Pong)
}

pub fn access_successful() -> ServerMessage {
    ServerMessage::new(ServerHeader::AccessSuccessful)
}

pub fn account_created() -> ServerMessage {
    ServerMessage::new(ServerHeader::AccountCreated)
}

pub fn character_created() -> ServerMessage {
    ServerMessage::new(ServerHeader::CharacterCreated)
}

pub fn character_deleted() -> ServerMessage {
    ServerMessage::new(ServerHeader::CharacterDeleted)
}

/// CharList = count:i32, then per character: id:i32, name:string,
/// gender-name:string.
pub fn char_list(records: &[CharRecord]) -> ServerMessage {
    let mut msg = ServerMessage::new(ServerHeader::CharList);
    msg.put_i32(records.len() as i32);
    for record in records {
        msg.put_i32(record.id)
            .put_string(&record.name)
            .put_string(record.gender.name());
    }
    msg
}

fn put_character(msg: &mut ServerMessage, character: &Character) {
    msg.put_i32(character.id)
        .put_string(&character.name)
        .put_string(character.gender.name())
        .put_i32(character.current_map)
        .put_i32(character.map_x)
        .put_i32(character.map_y)
        .put_i8(character.direction.as_i8());
}

/// CharacterSelected = id:i32, name:string, gender-name:string, map:i32,
/// x:i32, y:i32, direction:i8. Sent to the joining connection only.
pub fn character_selected(character: &Character) -> ServerMessage {
    let mut msg = ServerMessage::new(ServerHeader::CharacterSelected);
    put_character(&mut msg, character);
    msg
}

/// OthersOfNewCharacter = id:i32, name:string, gender-name:string, map:i32,
/// x:i32, y:i32, direction:i8. Broadcast to everyone already on the map.
pub fn others_of_new_character(character: &Character) -> ServerMessage {
    let mut msg = ServerMessage::new(ServerHeader::OthersOfNewCharacter);
    put_character(&mut msg, character);
    msg
}

/// NotifyExistingCharacters = count:i32, then the 7-field character layout
/// repeated. The joiner receives this as its map snapshot.
pub fn notify_existing_characters(characters: &[Character]) -> ServerMessage {
    let mut msg = ServerMessage::new(ServerHeader::NotifyExistingCharacters);
    msg.put_i32(characters.len() as i32);
    for character in characters {
        put_character(&mut msg, character);
    }
    msg
}

/// CharacterMoved = id:i32, action:i8, x:i32, y:i32, direction:i8,
/// velocity_x:i32, velocity_y:i32.
pub fn character_moved(character: &Character, action: i8) -> ServerMessage {
    let mut msg = ServerMessage::new(ServerHeader::CharacterMoved);
    msg.put_i32(character.id)
        .put_i8(action)
        .put_i32(character.map_x)
        .put_i32(character.map_y)
        .put_i8(character.direction.as_i8())
        .put_i32(character.velocity_x)
        .put_i32(character.velocity_y);
    msg
}

/// CharacterDisconnected = id:i32, map:i32.
pub fn character_disconnected(character_id: i32, map_id: i32) -> ServerMessage {
    let mut msg = ServerMessage::new(ServerHeader::CharacterDisconnected);
    msg.put_i32(character_id).put_i32(map_id);
    msg
}
