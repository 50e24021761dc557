use crate::attrs::address_attr::{pack_address, parse_mapped_address};
use crate::attrs::RawAttr;
use crate::constants::*;
use crate::error::StunError;
use crate::header::TransId;
use crate::xor;
use std::net::SocketAddr;

// 布局和 mapped-address 一样, 只是 port 和 address 做了混淆, 见 xor.rs

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XorMappedAddress {
    pub address: SocketAddr,
    pub trans_id: TransId,
}

impl XorMappedAddress {
    pub fn new(trans_id: TransId, address: SocketAddr) -> Self {
        Self { trans_id, address }
    }

    pub fn from_raw_attr(raw_attr: &RawAttr, trans_id: &TransId) -> Result<Self, StunError> {
        Ok(Self {
            address: parse_xor_mapped_address(&raw_attr.value, trans_id)?,
            trans_id: *trans_id,
        })
    }
}

impl From<XorMappedAddress> for RawAttr {
    fn from(attr: XorMappedAddress) -> Self {
        let xor_addr = xor::xor_address(attr.address, &attr.trans_id);
        RawAttr::new(ATTR_XOR_MAPPED_ADDRESS, pack_address(&xor_addr))
    }
}

pub fn parse_xor_mapped_address(value: &[u8], trans_id: &TransId) -> Result<SocketAddr, StunError> {
    let masked = parse_mapped_address(value)?;
    Ok(xor::xor_address(masked, trans_id))
}
