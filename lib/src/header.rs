use crate::constants::*;
use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{ParsePacketErr, StunError};

pub type TransId = [u8; TRANS_ID_LEN];

// rfc 5389, 6
//
//  0                   1                   2                   3
// |0 0|     STUN Message Type     |         Message Length        |
// |                         Magic Cookie                          |
// |                     Transaction ID (96 bits)                  |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub msg_type: u16,

    // 不包括header的20字节
    pub msg_len: u16,

    pub magic_cookie: u32,

    pub trans_id: TransId,
}

impl Header {
    pub fn new(msg_type: u16, msg_len: u16, trans_id: TransId) -> Self {
        Self {
            msg_type,
            msg_len,
            magic_cookie: MAGIC_COOKIE,
            trans_id,
        }
    }

    pub fn pack(&self) -> Result<Bytes, StunError> {
        encode_header(self.msg_type, self.msg_len, self.magic_cookie, &self.trans_id)
    }

    pub fn unpack(buf_bytes: Bytes) -> Result<Self, ParsePacketErr> {
        // 只检查长度，不检查有效性
        if buf_bytes.len() < HEADER_LEN {
            return Err(ParsePacketErr::BufSize(format!(
                "header buf len:{} < {}",
                buf_bytes.len(),
                HEADER_LEN
            )));
        }

        let mut buf = buf_bytes;
        let msg_type = buf.get_u16();
        let msg_len = buf.get_u16();
        let magic_cookie = buf.get_u32();

        let mut trans_id = [0_u8; TRANS_ID_LEN];
        buf.copy_to_slice(&mut trans_id);

        Ok(Self {
            msg_type,
            msg_len,
            magic_cookie,
            trans_id,
        })
    }

    pub fn validate(&self) -> Result<(), StunError> {
        if self.magic_cookie != MAGIC_COOKIE {
            return Err(StunError::BadMagicCookie(self.magic_cookie));
        }

        Ok(())
    }
}

pub fn encode_header(
    msg_type: u16,
    msg_len: u16,
    magic_cookie: u32,
    trans_id: &[u8],
) -> Result<Bytes, StunError> {
    if trans_id.len() != TRANS_ID_LEN {
        return Err(StunError::HeaderEncoding(format!(
            "trans_id len:{} != {}",
            trans_id.len(),
            TRANS_ID_LEN
        )));
    }
    if msg_type & 0xC000 != 0 {
        return Err(StunError::HeaderEncoding(format!(
            "message type top bits set: {:#06x}",
            msg_type
        )));
    }

    let mut buf = BytesMut::with_capacity(HEADER_LEN);
    buf.put_u16(msg_type);
    buf.put_u16(msg_len);
    buf.put_u32(magic_cookie);
    buf.put_slice(trans_id);
    Ok(buf.freeze())
}
