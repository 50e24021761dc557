use crate::constants::{MAGIC_COOKIE, MAGIC_COOKIE_BYTES};
use crate::header::TransId;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};

// xor-mapped-address 端口和ip需要混淆
// port 和 magic cookie 高16位做 xor
// address(ipv4) 和 magic cookie做xor
// address(ipv6) 和 magic cookie + trans_id 做xor

// 按较短的长度逐字节 xor
pub fn xor_bytes(buf: &mut [u8], mask: &[u8]) {
    buf.iter_mut().zip(mask).for_each(|(b, m)| *b ^= m);
}

pub fn xor_port(port: u16) -> u16 {
    port ^ (MAGIC_COOKIE >> 16) as u16
}

pub fn mask_v4() -> [u8; 4] {
    MAGIC_COOKIE_BYTES
}

pub fn mask_v6(trans_id: &TransId) -> [u8; 16] {
    let mut mask = [0_u8; 16];
    mask[..4].copy_from_slice(&MAGIC_COOKIE_BYTES);
    mask[4..].copy_from_slice(trans_id);
    mask
}

pub fn xor_address_v4(addr: SocketAddrV4) -> SocketAddrV4 {
    let mut buf = addr.ip().octets();
    xor_bytes(&mut buf, &mask_v4());

    SocketAddrV4::new(Ipv4Addr::from(buf), xor_port(addr.port()))
}

pub fn xor_address_v6(addr: SocketAddrV6, trans_id: &TransId) -> SocketAddrV6 {
    let mut buf = addr.ip().octets();
    xor_bytes(&mut buf, &mask_v6(trans_id));

    SocketAddrV6::new(Ipv6Addr::from(buf), xor_port(addr.port()), 0, 0)
}

// 编码解码是同一个操作
pub fn xor_address(addr: SocketAddr, trans_id: &TransId) -> SocketAddr {
    match addr {
        SocketAddr::V4(v) => SocketAddr::V4(xor_address_v4(v)),
        SocketAddr::V6(v) => SocketAddr::V6(xor_address_v6(v, trans_id)),
    }
}
