#![allow(clippy::len_without_is_empty)]

use crate::constants::*;
use crate::error::ParsePacketErr;
use crate::util::padding_len;
use bytes::{Buf, BufMut, Bytes, BytesMut};

pub mod address_attr;
pub mod xor_address;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttr {
    pub attr_type: u16,
    pub attr_len: u16,
    pub value: Bytes,
}

impl RawAttr {
    pub fn new(attr_type: u16, value: Bytes) -> Self {
        Self {
            attr_type,
            attr_len: value.len() as u16,
            value,
        }
    }

    // 包括4字节的type+length和补齐的字节
    pub fn len(&self) -> usize {
        let value_len = self.attr_len as usize;
        ATTR_HEADER_LEN + value_len + padding_len(value_len)
    }

    pub fn is_comprehension_required(&self) -> bool {
        self.attr_type < COMPREHENSION_OPTIONAL_MIN
    }

    pub fn pack(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.len());

        buf.put_u16(self.attr_type);
        buf.put_u16(self.attr_len);
        buf.put_slice(&self.value);
        buf.put_bytes(0, padding_len(self.value.len()));

        buf.freeze()
    }

    // 从 buf 头部切出一个属性, 连同补齐的字节
    pub fn unpack(buf: &mut Bytes) -> Result<Self, ParsePacketErr> {
        if buf.len() < ATTR_HEADER_LEN {
            return Err(ParsePacketErr::BufSize(format!(
                "attr buf len:{} < {}",
                buf.len(),
                ATTR_HEADER_LEN
            )));
        }

        let attr_type = u16::from_be_bytes([buf[0], buf[1]]);
        let attr_len = u16::from_be_bytes([buf[2], buf[3]]);
        let value_len = attr_len as usize;

        if buf.len() < ATTR_HEADER_LEN + value_len {
            return Err(ParsePacketErr::BufSize(format!(
                "attr type:{:#06x}, buf len:{} < {}",
                attr_type,
                buf.len(),
                ATTR_HEADER_LEN + value_len
            )));
        }

        buf.advance(ATTR_HEADER_LEN);
        let value = buf.split_to(value_len);

        // 最后一个属性可能没有补齐
        let padding = padding_len(value_len).min(buf.len());
        buf.advance(padding);

        Ok(Self {
            attr_type,
            attr_len,
            value,
        })
    }
}

// 逐个遍历 body 里的属性
pub struct AttrIter {
    body: Bytes,
    failed: bool,
}

impl AttrIter {
    pub fn new(body: Bytes) -> Self {
        Self {
            body,
            failed: false,
        }
    }
}

impl Iterator for AttrIter {
    type Item = Result<RawAttr, ParsePacketErr>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.body.is_empty() {
            return None;
        }

        let attr = RawAttr::unpack(&mut self.body);
        if attr.is_err() {
            self.failed = true;
        }
        Some(attr)
    }
}
