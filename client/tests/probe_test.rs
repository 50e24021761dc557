use bind_client::client::probe;
use bytes::Bytes;
use std::net::SocketAddr;
use std::time::Duration;
use stun_bind::attrs::xor_address::XorMappedAddress;
use stun_bind::constants::*;
use stun_bind::header::Header;
use stun_bind::packet::Packet;
use stun_bind::{ClientConfig, StunError};
use tokio::net::UdpSocket;

async fn fake_server(answer_from: usize) -> SocketAddr {
    let sock = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = sock.local_addr().unwrap();

    tokio::spawn(async move {
        let mut buf = vec![0u8; RECV_BUF_LEN];
        let mut count = 0;
        loop {
            let (len, remote_addr) = match sock.recv_from(&mut buf).await {
                Ok(v) => v,
                Err(_) => return,
            };
            count += 1;
            if count < answer_from {
                continue;
            }

            let req = Header::unpack(Bytes::copy_from_slice(&buf[..len])).unwrap();
            let header = Header::new(MESSAGE_TYPE_BIND_RES, 0, req.trans_id);
            let attrs = vec![XorMappedAddress::new(req.trans_id, remote_addr).into()];
            let res = Packet::new(header, attrs).pack().unwrap();
            let _ = sock.send_to(&res, remote_addr).await;
        }
    });

    addr
}

fn fast_config(max_transmissions: u32) -> ClientConfig {
    ClientConfig {
        rto: Duration::from_millis(100),
        max_transmissions,
        last_wait_factor: 4,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_probe() {
    let server = fake_server(1).await;
    let mut sock = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let local = sock.local_addr().unwrap();

    let res = probe(&mut sock, server, &ClientConfig::default()).await.unwrap();
    assert_eq!(res.local_address, local);
    assert_eq!(res.mapped_address, local);
}

#[tokio::test]
async fn test_probe_after_loss() {
    let server = fake_server(3).await;
    let mut sock = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let local = sock.local_addr().unwrap();

    let res = probe(&mut sock, server, &fast_config(4)).await.unwrap();
    assert_eq!(res.mapped_address, local);
}

#[tokio::test]
async fn test_probe_timeout() {
    let server = fake_server(usize::MAX).await;
    let mut sock = UdpSocket::bind("127.0.0.1:0").await.unwrap();

    let res = probe(&mut sock, server, &fast_config(2)).await;
    assert!(matches!(res, Err(StunError::Timeout { transmissions: 2 })));
}

#[tokio::test]
async fn test_probe_bad_target() {
    let mut sock = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let server: SocketAddr = "[::1]:3478".parse().unwrap();

    let res = probe(&mut sock, server, &ClientConfig::default()).await;
    assert!(matches!(res, Err(StunError::Configuration(_))));
}

#[tokio::test]
async fn test_huge_rto_async() {
    let server = fake_server(usize::MAX).await;
    let mut sock = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let config = ClientConfig {
        rto: Duration::from_secs(u64::MAX),
        ..Default::default()
    };

    let res = probe(&mut sock, server, &config).await;
    assert!(matches!(res, Err(StunError::Configuration(_))));
}

#[tokio::test]
async fn test_ignore_other_peer_async() {
    let server = fake_server(1).await;
    let mut sock = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let local = sock.local_addr().unwrap();

    // 其他地址发来的包要丢掉
    let stranger = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    stranger.send_to(b"garbage", local).await.unwrap();

    let res = probe(&mut sock, server, &fast_config(3)).await.unwrap();
    assert_eq!(res.mapped_address, local);
}
