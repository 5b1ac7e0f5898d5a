use bytes::{BufMut, Bytes, BytesMut};

use super::ServerHeader;

/// Append-only builder for one server frame. Fields are accumulated in a
/// private buffer and only handed to the transport once `finish` runs, so a
/// receiver never observes a partially written message.
pub struct ServerMessage {
    buf: BytesMut,
    header: ServerHeader,
}

impl ServerMessage {
    pub fn new(header: ServerHeader) -> Self {
        let mut buf = BytesMut::with_capacity(64);
        buf.put_u16(header as u16);
        Self { buf, header }
    }

    pub fn header(&self) -> ServerHeader {
        self.header
    }

    pub fn put_i32(&mut self, value: i32) -> &mut Self {
        self.buf.put_i32(value);
        self
    }

    pub fn put_i8(&mut self, value: i8) -> &mut Self {
        self.buf.put_i8(value);
        self
    }

    /// Length-prefixed UTF-8 string (2-byte big-endian length). A string
    /// longer than the prefix can carry is logged and cut at the nearest
    /// character boundary below the limit, so the wire always carries valid
    /// UTF-8.
    pub fn put_string(&mut self, value: &str) -> &mut Self {
        let mut len = value.len().min(u16::MAX as usize);
        if len < value.len() {
            tracing::error!(
                "[protocol] [encode] string field of {} bytes exceeds the u16 length prefix",
                value.len()
            );
            while !value.is_char_boundary(len) {
                len -= 1;
            }
        }
        self.buf.put_u16(len as u16);
        self.buf.put_slice(&value.as_bytes()[..len]);
        self
    }

    /// Serialized frame payload: type code followed by all fields.
    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }
}
