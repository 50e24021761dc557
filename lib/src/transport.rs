use crate::error::StunError;
use crate::util::print_bytes;
use bytes::{BufMut, Bytes, BytesMut};
use log::debug;
use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::time::Instant;

// header + body 作为一个报文发出去
pub fn send_message(
    sock: &UdpSocket,
    server: SocketAddr,
    header: &[u8],
    body: &[u8],
) -> Result<(), StunError> {
    if header.is_empty() {
        return Err(StunError::Send(io::Error::new(
            io::ErrorKind::InvalidInput,
            "empty header",
        )));
    }

    let mut buf = BytesMut::with_capacity(header.len() + body.len());
    buf.put_slice(header);
    buf.put_slice(body);

    debug!("--> {}, len: {}\n{}", server, buf.len(), print_bytes(&buf, " ", 8));

    let sent = sock.send_to(&buf, server).map_err(StunError::Send)?;
    check_sent(sent, buf.len())
}

// udp 不能分多次发送同一个报文, 少发了就是错误
pub fn check_sent(sent: usize, len: usize) -> Result<(), StunError> {
    if sent != len {
        return Err(StunError::Send(io::Error::new(
            io::ErrorKind::WriteZero,
            format!("short write: {} < {}", sent, len),
        )));
    }
    Ok(())
}

// 空报文和不是服务器发来的报文丢掉
pub fn accept_datagram(
    recv_buf: &[u8],
    remote_addr: SocketAddr,
    server: SocketAddr,
) -> Option<Bytes> {
    if recv_buf.is_empty() {
        return None;
    }
    if remote_addr != server {
        debug!(
            "drop {} bytes from unexpected peer: {}",
            recv_buf.len(),
            remote_addr
        );
        return None;
    }

    let buf = Bytes::copy_from_slice(recv_buf);
    debug!("<-- {}, len: {}\n{}", remote_addr, buf.len(), print_bytes(&buf, " ", 8));
    Some(buf)
}

// 在 deadline 之前等服务器的响应, 超时返回 None
pub fn recv_message(
    sock: &UdpSocket,
    server: SocketAddr,
    recv_buf: &mut [u8],
    deadline: Instant,
) -> Result<Option<Bytes>, StunError> {
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(None);
        }
        sock.set_read_timeout(Some(remaining))
            .map_err(StunError::Receive)?;

        let (len, remote_addr) = match sock.recv_from(recv_buf) {
            Ok(v) => v,
            Err(e) if is_timeout(&e) => return Ok(None),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(StunError::Receive(e)),
        };

        if let Some(buf) = accept_datagram(&recv_buf[..len], remote_addr, server) {
            return Ok(Some(buf));
        }
    }
}

// unix 上是 WouldBlock, windows 上是 TimedOut
fn is_timeout(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}
