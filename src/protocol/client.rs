use bytes::Bytes;

use super::{ClientHeader, DecodeError};

/// One decoded client frame. The payload is immutable; the typed readers
/// advance an internal cursor through the fixed field schema for the header.
///
/// Trailing bytes past what the schema reads are ignored: the cursor never
/// looks beyond what a handler asks for.
#[derive(Debug)]
pub struct ClientMessage {
    header: ClientHeader,
    body: Bytes,
    pos: usize,
}

impl ClientMessage {
    /// Parses the 2-byte type code off the front of a frame.
    pub fn from_frame(frame: Bytes) -> Result<Self, DecodeError> {
        if frame.len() < 2 {
            return Err(DecodeError::Truncated {
                at: 0,
                needed: 2 - frame.len(),
            });
        }
        let code = u16::from_be_bytes([frame[0], frame[1]]);
        let header = ClientHeader::try_from(code)?;

        Ok(Self {
            header,
            body: frame.slice(2..),
            pos: 0,
        })
    }

    pub fn header(&self) -> ClientHeader {
        self.header
    }

    /// Bytes of payload not yet consumed by a reader.
    pub fn remaining(&self) -> usize {
        self.body.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<Bytes, DecodeError> {
        if self.pos + n > self.body.len() {
            return Err(DecodeError::Truncated {
                at: self.pos,
                needed: self.pos + n - self.body.len(),
            });
        }
        let out = self.body.slice(self.pos..self.pos + n);
        self.pos += n;
        Ok(out)
    }

    pub fn get_i32(&mut self) -> Result<i32, DecodeError> {
        let b = self.take(4)?;
        Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn get_i8(&mut self) -> Result<i8, DecodeError> {
        let b = self.take(1)?;
        Ok(b[0] as i8)
    }

    /// Length-prefixed UTF-8 string (2-byte big-endian length).
    pub fn get_string(&mut self) -> Result<String, DecodeError> {
        let len_bytes = self.take(2)?;
        let len = u16::from_be_bytes([len_bytes[0], len_bytes[1]]) as usize;
        let raw = self.take(len)?;
        let s = std::str::from_utf8(&raw).map_err(|_| DecodeError::BadUtf8)?;
        Ok(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::{BufMut, BytesMut};

    fn frame(code: u16, payload: &[u8]) -> Bytes {
        let mut buf = BytesMut::new();
        buf.put_u16(code);
        buf.put_slice(payload);
        buf.freeze()
    }

    #[test]
    fn test_from_frame_reads_header() {
        let msg = ClientMessage::from_frame(frame(0, &[])).unwrap();
        assert_eq!(msg.header(), ClientHeader::Ping);
        assert_eq!(msg.remaining(), 0);
    }

    #[test]
    fn test_from_frame_unknown_type() {
        let err = ClientMessage::from_frame(frame(999, &[])).unwrap_err();
        assert_eq!(err, DecodeError::UnknownType(999));
    }

    #[test]
    fn test_from_frame_too_short_for_code() {
        let err = ClientMessage::from_frame(Bytes::from_static(&[0x00])).unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { .. }));
    }

    #[test]
    fn test_get_i32_big_endian() {
        let mut msg =
            ClientMessage::from_frame(frame(9, &[0x00, 0x00, 0x01, 0x02])).unwrap();
        assert_eq!(msg.get_i32().unwrap(), 0x0102);
    }

    #[test]
    fn test_get_i8_sign() {
        let mut msg = ClientMessage::from_frame(frame(9, &[0xFF])).unwrap();
        assert_eq!(msg.get_i8().unwrap(), -1);
    }

    #[test]
    fn test_get_string() {
        let mut msg = ClientMessage::from_frame(frame(1, &[0x00, 0x02, b'h', b'i'])).unwrap();
        assert_eq!(msg.get_string().unwrap(), "hi");
        assert_eq!(msg.remaining(), 0);
    }

    #[test]
    fn test_get_string_bad_utf8() {
        let mut msg = ClientMessage::from_frame(frame(1, &[0x00, 0x02, 0xC3, 0x28])).unwrap();
        assert_eq!(msg.get_string().unwrap_err(), DecodeError::BadUtf8);
    }

    #[test]
    fn test_truncated_field_never_partial() {
        // a declared 5-byte string with only 3 bytes present
        let mut msg =
            ClientMessage::from_frame(frame(1, &[0x00, 0x05, b'a', b'b', b'c'])).unwrap();
        let err = msg.get_string().unwrap_err();
        assert_eq!(err, DecodeError::Truncated { at: 2, needed: 2 });
    }

    #[test]
    fn test_every_strict_prefix_is_truncated() {
        // SelectChar carries a single i32
        let full = frame(9, &[0x00, 0x00, 0x00, 0x2A]);
        for cut in 0..full.len() {
            let prefix = full.slice(..cut);
            let result = ClientMessage::from_frame(prefix).and_then(|mut m| m.get_i32());
            assert!(result.is_err(), "prefix of {} bytes must not decode", cut);
        }
    }

    #[test]
    fn test_trailing_bytes_are_ignored() {
        let mut msg =
            ClientMessage::from_frame(frame(9, &[0x00, 0x00, 0x00, 0x2A, 0xDE, 0xAD])).unwrap();
        assert_eq!(msg.get_i32().unwrap(), 42);
        assert_eq!(msg.remaining(), 2);
    }
}
