// 0x2112A442
pub const MAGIC_COOKIE: u32 = 0x2112_A442;
pub const MAGIC_COOKIE_BYTES: [u8; 4] = MAGIC_COOKIE.to_be_bytes();

// 96 bit
pub const TRANS_ID_LEN: usize = 12;
pub const HEADER_LEN: usize = 20;
pub const ATTR_HEADER_LEN: usize = 4;

// rfc 5389, 7.2.1
pub const RECV_BUF_LEN: usize = 1280;
pub const DEFAULT_RTO_MS: u64 = 500;
pub const DEFAULT_MAX_TRANSMISSIONS: u32 = 7;
pub const DEFAULT_LAST_WAIT_FACTOR: u32 = 16;

pub const MESSAGE_TYPE_BIND_REQ: u16 = 0x0001;
pub const MESSAGE_TYPE_BIND_INDICATION: u16 = 0x0011;
pub const MESSAGE_TYPE_BIND_RES: u16 = 0x0101;
pub const MESSAGE_TYPE_BIND_ERR_RES: u16 = 0x0111;

pub const ATTR_FAMILY_IPV4: u8 = 0x01;
pub const ATTR_FAMILY_IPV6: u8 = 0x02;

// comprehension-required: 0x0000 - 0x7fff
pub const ATTR_MAPPED_ADDRESS: u16 = 0x0001;
pub const ATTR_USERNAME: u16 = 0x0006;
pub const ATTR_MESSAGE_INTEGRITY: u16 = 0x0008;
pub const ATTR_ERROR_CODE: u16 = 0x0009;
pub const ATTR_UNKNOWN_ATTRIBUTES: u16 = 0x000A;
pub const ATTR_REALM: u16 = 0x0014;
pub const ATTR_NONCE: u16 = 0x0015;
pub const ATTR_XOR_MAPPED_ADDRESS: u16 = 0x0020;

// comprehension-optional: 0x8000 - 0xffff
// pre rfc 5389 servers (vovida era) still send this one
pub const ATTR_XOR_MAPPED_ADDRESS_LEGACY: u16 = 0x8020;

pub const COMPREHENSION_OPTIONAL_MIN: u16 = 0x8000;
