use crate::attrs::RawAttr;
use crate::constants::*;
use crate::error::{ParsePacketErr, StunError};
use bytes::{BufMut, Bytes, BytesMut};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

// 地址类的attribute
//
//  0                   1                   2                   3
// |0 0 0 0 0 0 0 0|    Family     |           Port                |
// |                 Address (32 bits or 128 bits)                 |
//
// ipv4: family: 0x01, 4 bytes
// ipv6: family: 0x02, 16 bytes

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    pub fn of(address: &SocketAddr) -> Self {
        match address {
            SocketAddr::V4(_) => Family::V4,
            SocketAddr::V6(_) => Family::V6,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Family::V4 => ATTR_FAMILY_IPV4,
            Family::V6 => ATTR_FAMILY_IPV6,
        }
    }

    pub fn addr_len(&self) -> usize {
        match self {
            Family::V4 => 4,
            Family::V6 => 16,
        }
    }
}

impl TryFrom<u8> for Family {
    type Error = StunError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            ATTR_FAMILY_IPV4 => Ok(Family::V4),
            ATTR_FAMILY_IPV6 => Ok(Family::V6),
            v => Err(StunError::UnsupportedFamily(v)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressAttr {
    pub attr_type: u16,
    pub address: SocketAddr,
}

impl AddressAttr {
    pub fn new(attr_type: u16, address: SocketAddr) -> Self {
        Self { attr_type, address }
    }
}

impl From<AddressAttr> for RawAttr {
    fn from(attr: AddressAttr) -> Self {
        RawAttr::new(attr.attr_type, pack_address(&attr.address))
    }
}

// mapped-address: port 和 address 原样取出
pub fn parse_mapped_address(value: &[u8]) -> Result<SocketAddr, StunError> {
    if value.len() < 4 {
        return Err(ParsePacketErr::BufSize(format!("address attr buf len:{} < 4", value.len())).into());
    }

    // value[0] 保留, 忽略
    let family = Family::try_from(value[1])?;
    let port = u16::from_be_bytes([value[2], value[3]]);
    let ip = parse_ip(family, &value[4..])?;

    Ok(SocketAddr::new(ip, port))
}

pub(crate) fn parse_ip(family: Family, buf: &[u8]) -> Result<IpAddr, StunError> {
    // 地址长度必须正好是 4 或 16
    let addr_len = family.addr_len();
    if buf.len() < addr_len {
        return Err(ParsePacketErr::BufSize(format!(
            "{:?} address buf len:{} < {}",
            family,
            buf.len(),
            addr_len
        ))
        .into());
    }
    if buf.len() != addr_len {
        return Err(ParsePacketErr::NotMatch(format!(
            "{:?} address buf len:{} != {}",
            family,
            buf.len(),
            addr_len
        ))
        .into());
    }

    let ip = match family {
        Family::V4 => {
            let mut addr = [0_u8; 4];
            addr.copy_from_slice(buf);
            IpAddr::V4(Ipv4Addr::from(addr))
        }
        Family::V6 => {
            let mut addr = [0_u8; 16];
            addr.copy_from_slice(buf);
            IpAddr::V6(Ipv6Addr::from(addr))
        }
    };

    Ok(ip)
}

pub(crate) fn pack_address(address: &SocketAddr) -> Bytes {
    let family = Family::of(address);
    let mut bytes_buf = BytesMut::with_capacity(4 + family.addr_len());

    bytes_buf.put_u8(0);
    bytes_buf.put_u8(family.code());
    bytes_buf.put_u16(address.port());
    match address.ip() {
        IpAddr::V4(ip) => bytes_buf.put_slice(&ip.octets()),
        IpAddr::V6(ip) => bytes_buf.put_slice(&ip.octets()),
    }

    bytes_buf.freeze()
}
