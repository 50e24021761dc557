use bytes::Bytes;
use log::debug;
use std::net::SocketAddr;
use stun_bind::client::{deadline_after, ClientConfig, Transaction};
use stun_bind::transport::{accept_datagram, check_sent};
use stun_bind::util::print_bytes;
use stun_bind::StunError;
use tokio::net::UdpSocket;
use tokio::time::{timeout_at, Instant};

#[derive(Debug, Clone, Copy)]
pub struct ProbeResult {
    pub local_address: SocketAddr,
    pub mapped_address: SocketAddr,
}

// 一个socket上同时只能有一个请求
pub async fn probe(
    sock: &mut UdpSocket,
    server: SocketAddr,
    config: &ClientConfig,
) -> Result<ProbeResult, StunError> {
    let local_address = sock
        .local_addr()
        .map_err(|e| StunError::Configuration(format!("socket not bound: {}", e)))?;
    let transaction = Transaction::new(config, local_address, server)?;
    let buf = &transaction.request;
    let mut recv_buf = vec![0u8; config.recv_buf_len];

    for (i, wait) in config.wait_times().enumerate() {
        debug!(
            "{} --> {}, transmission: {}\n{}",
            local_address,
            server,
            i + 1,
            print_bytes(buf, " ", 8)
        );

        let sent = sock.send_to(buf, server).await.map_err(StunError::Send)?;
        check_sent(sent, buf.len())?;

        let deadline = Instant::from_std(deadline_after(std::time::Instant::now(), wait)?);
        if let Some(response) = recv_from_server(sock, server, &mut recv_buf, deadline).await? {
            return Ok(ProbeResult {
                local_address,
                mapped_address: transaction.decode(response)?,
            });
        }
    }

    Err(StunError::Timeout {
        transmissions: config.max_transmissions,
    })
}

async fn recv_from_server(
    sock: &UdpSocket,
    server: SocketAddr,
    recv_buf: &mut [u8],
    deadline: Instant,
) -> Result<Option<Bytes>, StunError> {
    loop {
        let (len, remote_addr) = match timeout_at(deadline, sock.recv_from(recv_buf)).await {
            Ok(v) => v.map_err(StunError::Receive)?,
            Err(_) => return Ok(None),
        };

        if let Some(buf) = accept_datagram(&recv_buf[..len], remote_addr, server) {
            return Ok(Some(buf));
        }
    }
}
