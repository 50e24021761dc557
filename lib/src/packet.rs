use crate::attrs::address_attr::parse_mapped_address;
use crate::attrs::xor_address::parse_xor_mapped_address;
use crate::attrs::{AttrIter, RawAttr};
use crate::constants::*;
use crate::error::{ParsePacketErr, StunError};
use crate::header::{Header, TransId};
use bytes::{BufMut, Bytes, BytesMut};
use log::{debug, warn};
use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct Packet {
    pub header: Header,
    pub attrs: Vec<RawAttr>,
}

impl Packet {
    pub fn new(header: Header, attrs: Vec<RawAttr>) -> Self {
        Self { header, attrs }
    }

    pub fn add_attr(&mut self, attr: RawAttr) {
        self.attrs.push(attr);
    }

    // 属性总长度, 包括补齐
    pub fn body_len(&self) -> usize {
        self.attrs.iter().fold(0_usize, |acc, x| acc + x.len())
    }

    pub fn pack(&self) -> Result<Bytes, StunError> {
        // attr_len 必须和 value 长度一致, 否则 msg_len 算出来是错的
        for v in self.attrs.iter() {
            if v.value.len() != v.attr_len as usize {
                return Err(StunError::HeaderEncoding(format!(
                    "attr type:{:#06x}, value len:{} != attr len:{}",
                    v.attr_type,
                    v.value.len(),
                    v.attr_len
                )));
            }
        }

        let body_len = self.body_len();
        let msg_len = u16::try_from(body_len)
            .map_err(|_| StunError::HeaderEncoding(format!("body len:{} > {}", body_len, u16::MAX)))?;

        let header = Header {
            msg_len,
            ..self.header.clone()
        };

        let mut buf = BytesMut::with_capacity(HEADER_LEN + body_len);
        buf.put_slice(&header.pack()?);
        for v in self.attrs.iter() {
            buf.put_slice(&v.pack());
        }

        Ok(buf.freeze())
    }
}

pub fn new_bind_request(trans_id: TransId) -> Packet {
    Packet::new(Header::new(MESSAGE_TYPE_BIND_REQ, 0, trans_id), vec![])
}

// 检查顺序: header长度, magic cookie, message type, trans_id, 属性
// msg_len 之后多出来的字节忽略
pub fn decode_response(mut raw: Bytes, expected: &TransId) -> Result<SocketAddr, StunError> {
    if raw.len() < HEADER_LEN {
        return Err(ParsePacketErr::BufSize(format!(
            "header buf len:{} < {}",
            raw.len(),
            HEADER_LEN
        ))
        .into());
    }

    let header_buf = raw.split_to(HEADER_LEN);
    let header = Header::unpack(header_buf.clone())?;
    header.validate()?;

    let msg_len = header.msg_len as usize;
    let body = raw.split_to(msg_len.min(raw.len()));

    if header.msg_type != MESSAGE_TYPE_BIND_RES {
        return Err(StunError::NotSuccessResponse {
            msg_type: header.msg_type,
            header: header_buf.to_vec(),
            body: body.to_vec(),
        });
    }

    if header.trans_id != *expected {
        return Err(StunError::UnknownTransactionId {
            expected: *expected,
            got: header.trans_id,
        });
    }

    // 收到的字节比 msg_len 少
    if body.len() < msg_len {
        return Err(ParsePacketErr::NotMatch(format!(
            "header len:{} > body len:{}",
            msg_len,
            body.len()
        ))
        .into());
    }

    for attr in AttrIter::new(body) {
        let attr = attr?;
        match attr.attr_type {
            ATTR_MAPPED_ADDRESS => {
                return parse_mapped_address(&attr.value);
            }
            ATTR_XOR_MAPPED_ADDRESS | ATTR_XOR_MAPPED_ADDRESS_LEGACY => {
                return parse_xor_mapped_address(&attr.value, expected);
            }
            ATTR_USERNAME | ATTR_MESSAGE_INTEGRITY | ATTR_ERROR_CODE | ATTR_UNKNOWN_ATTRIBUTES
            | ATTR_REALM | ATTR_NONCE => {
                debug!("skip attr: {:#06x}, len: {}", attr.attr_type, attr.attr_len);
            }
            v if attr.is_comprehension_required() => {
                warn!("unknown comprehension-required attr: {:#06x}, skip", v);
            }
            v => {
                debug!("unknown attr: {:#06x}, skip", v);
            }
        }
    }

    Err(StunError::NoAddressAttribute)
}
