//! Binary wire protocol shared by client and server.
//!
//! Every message starts with a 2-byte big-endian type code followed by the
//! fixed field schema for that code. Integers are big-endian; strings are
//! UTF-8 with a 2-byte big-endian length prefix.

pub mod client;
pub mod outgoing;
pub mod server;

pub use client::ClientMessage;
pub use server::ServerMessage;

/// Wire-level decode failures. Every variant is fatal to the connection.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("truncated message: needed {needed} more byte(s) at offset {at}")]
    Truncated { at: usize, needed: usize },

    #[error("unknown message type: {0:#06x}")]
    UnknownType(u16),

    #[error("string field is not valid UTF-8")]
    BadUtf8,
}

/// Client → server type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ClientHeader {
    Ping = 0,
    AccessAccount = 1,
    CreateAccount = 2,
    DeleteAccount = 3,
    RecoverAccount = 4,
    ChangePassword = 5,
    CharList = 6,
    CreateChar = 7,
    DeleteChar = 8,
    SelectChar = 9,
    MoveChar = 10,
}

impl TryFrom<u16> for ClientHeader {
    type Error = DecodeError;

    fn try_from(code: u16) -> Result<Self, DecodeError> {
        match code {
            0 => Ok(Self::Ping),
            1 => Ok(Self::AccessAccount),
            2 => Ok(Self::CreateAccount),
            3 => Ok(Self::DeleteAccount),
            4 => Ok(Self::RecoverAccount),
            5 => Ok(Self::ChangePassword),
            6 => Ok(Self::CharList),
            7 => Ok(Self::CreateChar),
            8 => Ok(Self::DeleteChar),
            9 => Ok(Self::SelectChar),
            10 => Ok(Self::MoveChar),
            other => Err(DecodeError::UnknownType(other)),
        }
    }
}

/// Server → client type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ServerHeader {
    Pong = 0,
    AccessSuccessful = 1,
    AccountCreated = 2,
    Alert = 3,
    CharList = 4,
    CharacterCreated = 5,
    CharacterDeleted = 6,
    CharacterSelected = 7,
    OthersOfNewCharacter = 8,
    NotifyExistingCharacters = 9,
    CharacterMoved = 10,
    CharacterDisconnected = 11,
}

impl TryFrom<u16> for ServerHeader {
    type Error = DecodeError;

    fn try_from(code: u16) -> Result<Self, DecodeError> {
        match code {
            0 => Ok(Self::Pong),
            1 => Ok(Self::AccessSuccessful),
            2 => Ok(Self::AccountCreated),
            3 => Ok(Self::Alert),
            4 => Ok(Self::CharList),
            5 => Ok(Self::CharacterCreated),
            6 => Ok(Self::CharacterDeleted),
            7 => Ok(Self::CharacterSelected),
            8 => Ok(Self::OthersOfNewCharacter),
            9 => Ok(Self::NotifyExistingCharacters),
            10 => Ok(Self::CharacterMoved),
            11 => Ok(Self::CharacterDisconnected),
            other => Err(DecodeError::UnknownType(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_header_round_trip() {
        for code in 0u16..=10 {
            let header = ClientHeader::try_from(code).unwrap();
            assert_eq!(header as u16, code);
        }
    }

    #[test]
    fn test_client_header_unknown_code() {
        assert_eq!(
            ClientHeader::try_from(0x7FFF),
            Err(DecodeError::UnknownType(0x7FFF))
        );
    }

    #[test]
    fn test_server_header_round_trip() {
        for code in 0u16..=11 {
            let header = ServerHeader::try_from(code).unwrap();
            assert_eq!(header as u16, code);
        }
    }
}
