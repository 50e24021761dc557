use crate::constants::*;
use crate::error::StunError;
use crate::header::TransId;
use crate::packet::{decode_response, new_bind_request};
use crate::transport::{recv_message, send_message};
use crate::util::new_trans_id;
use bytes::Bytes;
use log::debug;
use std::net::{SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

// 重传参数, 默认值见 rfc 5389, 7.2.1
// 第一次等 rto, 之后每次翻倍, 最后一次等 rto * last_wait_factor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub rto: Duration,
    pub max_transmissions: u32,
    pub last_wait_factor: u32,
    pub recv_buf_len: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rto: Duration::from_millis(DEFAULT_RTO_MS),
            max_transmissions: DEFAULT_MAX_TRANSMISSIONS,
            last_wait_factor: DEFAULT_LAST_WAIT_FACTOR,
            recv_buf_len: RECV_BUF_LEN,
        }
    }
}

impl ClientConfig {
    // 只发一次, 等 timeout
    pub fn single_shot(timeout: Duration) -> Self {
        Self {
            rto: timeout,
            max_transmissions: 1,
            last_wait_factor: 1,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), StunError> {
        if self.rto.is_zero() {
            return Err(StunError::Configuration("rto must be > 0".to_string()));
        }
        if self.max_transmissions == 0 {
            return Err(StunError::Configuration(
                "max_transmissions must be > 0".to_string(),
            ));
        }
        if self.last_wait_factor == 0 {
            return Err(StunError::Configuration(
                "last_wait_factor must be > 0".to_string(),
            ));
        }
        if self.recv_buf_len < HEADER_LEN {
            return Err(StunError::Configuration(format!(
                "recv_buf_len:{} < {}",
                self.recv_buf_len, HEADER_LEN
            )));
        }
        Ok(())
    }

    // 每次发送之后等待的时间
    pub fn wait_times(&self) -> impl Iterator<Item = Duration> + '_ {
        let last = self.max_transmissions.saturating_sub(1);
        (0..self.max_transmissions).map(move |i| {
            if i == last {
                self.rto.saturating_mul(self.last_wait_factor)
            } else {
                self.rto.saturating_mul(1_u32 << i.min(31))
            }
        })
    }
}

pub fn check_target(local: SocketAddr, server: SocketAddr) -> Result<(), StunError> {
    if server.ip().is_unspecified() {
        return Err(StunError::Configuration(format!(
            "unspecified server address: {}",
            server
        )));
    }
    if server.port() == 0 {
        return Err(StunError::Configuration(format!(
            "server port is 0: {}",
            server
        )));
    }
    if local.is_ipv4() != server.is_ipv4() {
        return Err(StunError::Configuration(format!(
            "address family mismatch, local: {}, server: {}",
            local, server
        )));
    }
    Ok(())
}

// rto 太大时 Instant 会溢出
pub fn deadline_after(now: Instant, wait: Duration) -> Result<Instant, StunError> {
    now.checked_add(wait)
        .ok_or_else(|| StunError::Configuration(format!("wait too long: {:?}", wait)))
}

// 一次 binding 事务, 重传时 trans_id 和请求报文不变
// 同步和 tokio 两个版本共用
#[derive(Debug, Clone)]
pub struct Transaction {
    pub local: SocketAddr,
    pub server: SocketAddr,
    pub trans_id: TransId,
    pub request: Bytes,
}

impl Transaction {
    pub fn new(
        config: &ClientConfig,
        local: SocketAddr,
        server: SocketAddr,
    ) -> Result<Self, StunError> {
        config.validate()?;
        check_target(local, server)?;

        let trans_id = new_trans_id()?;
        let request = new_bind_request(trans_id).pack()?;

        Ok(Self {
            local,
            server,
            trans_id,
            request,
        })
    }

    pub fn decode(&self, response: Bytes) -> Result<SocketAddr, StunError> {
        let address = decode_response(response, &self.trans_id)?;
        debug!("{} <-- {}, mapped: {}", self.local, self.server, address);
        Ok(address)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BindingClient {
    config: ClientConfig,
}

impl BindingClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    // 一个socket上同时只能有一个请求, 所以要 &mut
    // 阻塞直到收到响应, 或者所有重传都超时
    pub fn request_remote_address(
        &self,
        sock: &mut UdpSocket,
        server: SocketAddr,
    ) -> Result<SocketAddr, StunError> {
        let local = sock
            .local_addr()
            .map_err(|e| StunError::Configuration(format!("socket not bound: {}", e)))?;
        let transaction = Transaction::new(&self.config, local, server)?;

        let mut recv_buf = vec![0_u8; self.config.recv_buf_len];

        for (i, wait) in self.config.wait_times().enumerate() {
            debug!("{} --> {}, transmission: {}, wait: {:?}", local, server, i + 1, wait);
            send_message(sock, server, &transaction.request, &[])?;

            let deadline = deadline_after(Instant::now(), wait)?;
            if let Some(buf) = recv_message(sock, server, &mut recv_buf, deadline)? {
                return transaction.decode(buf);
            }
        }

        Err(StunError::Timeout {
            transmissions: self.config.max_transmissions,
        })
    }
}

pub fn request_remote_address(
    sock: &mut UdpSocket,
    server: SocketAddr,
) -> Result<SocketAddr, StunError> {
    BindingClient::default().request_remote_address(sock, server)
}
