use crate::error::StunError;
use crate::header::TransId;
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt::Write as _;

pub fn print_bytes(buf: &[u8], separator: &str, row_width: usize) -> String {
    let mut hex = String::new();
    buf.iter().enumerate().for_each(|(x, y)| {
        let _ = write!(hex, "{:02X}", y);
        if (x + 1) % row_width == 0 {
            hex.push('\n');
        } else {
            hex.push_str(separator);
        }
    });

    hex
}

// 96 bit, 直接从系统随机源取, 失败就返回错误
pub fn new_trans_id() -> Result<TransId, StunError> {
    let mut trans_id = TransId::default();
    OsRng.try_fill_bytes(&mut trans_id)?;
    Ok(trans_id)
}

// 4字节对齐需要补的字节数
pub fn padding_len(len: usize) -> usize {
    match len % 4 {
        0 => 0,
        v => 4 - v,
    }
}
