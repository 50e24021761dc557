use crate::header::TransId;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StunError {
    #[error("configuration: {0}")]
    Configuration(String),

    #[error("cannot generate transaction id: {0}")]
    RandomGeneration(#[from] rand::Error),

    #[error("cannot make message header: {0}")]
    HeaderEncoding(String),

    #[error("cannot send the message: {0}")]
    Send(#[source] io::Error),

    #[error("cannot receive the response: {0}")]
    Receive(#[source] io::Error),

    #[error("no response after {transmissions} transmissions")]
    Timeout { transmissions: u32 },

    #[error("bad magic cookie: {0:#010x}")]
    BadMagicCookie(u32),

    // 原样保留header和body, 便于诊断
    #[error("not a success response, type: {msg_type:#06x}, packet: 0x{}{}", hex(.header), hex(.body))]
    NotSuccessResponse {
        msg_type: u16,
        header: Vec<u8>,
        body: Vec<u8>,
    },

    #[error("unknown transaction id, ours: {}, theirs: {}", hex(.expected), hex(.got))]
    UnknownTransactionId { expected: TransId, got: TransId },

    #[error("attribute parse: {0}")]
    AttributeParse(#[from] ParsePacketErr),

    #[error("unsupported address family: {0:#04x}")]
    UnsupportedFamily(u8),

    #[error("no address attribute in response")]
    NoAddressAttribute,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsePacketErr {
    // 长度或值不匹配
    #[error("not match: {0}")]
    NotMatch(String),

    // buf不够
    #[error("buf size: {0}")]
    BufSize(String),
}

fn hex(buf: &[u8]) -> String {
    buf.iter().map(|b| format!("{:02x}", b)).collect()
}
