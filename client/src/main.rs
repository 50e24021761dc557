// ./bind-client --server stun.l.google.com:19302

use std::net::{IpAddr, SocketAddr};
use std::process::ExitCode;
use std::time::Duration;

use bind_client::client::probe;
use clap::{Arg, Command};
use log::{debug, error};
use stun_bind::ClientConfig;
use tokio::net::{lookup_host, UdpSocket};

const APP_NAME: &str = env!("CARGO_PKG_NAME");
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_SERVER: &str = "stun.l.google.com:19302";

fn parse_ip(s: &str) -> Result<IpAddr, String> {
    s.parse::<IpAddr>().map_err(|e| format!("{}", e))
}

// 按本地地址的协议族选服务器地址
async fn resolve_server(server: &str, local_ip: Option<IpAddr>) -> Result<SocketAddr, String> {
    let addrs = lookup_host(server)
        .await
        .map_err(|e| format!("can't resolve {}: {}", server, e))?;

    let mut addrs = addrs.filter(|addr| match local_ip {
        Some(ip) => ip.is_ipv4() == addr.is_ipv4(),
        None => true,
    });

    addrs
        .next()
        .ok_or_else(|| format!("no usable address for {}", server))
}

fn unspecified_for(server: &SocketAddr) -> IpAddr {
    match server {
        SocketAddr::V4(_) => IpAddr::from([0u8; 4]),
        SocketAddr::V6(_) => IpAddr::from([0u16; 8]),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let app = Command::new(APP_NAME)
        .version(APP_VERSION)
        .about("ask a stun server for our public address")
        .arg(
            Arg::new("server")
                .long("server")
                .takes_value(true)
                .default_value(DEFAULT_SERVER)
                .help("stun server, host:port")
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("local_ip")
                .long("local_ip")
                .takes_value(true)
                .help("local ip to bind")
                .value_parser(clap::builder::ValueParser::new(parse_ip)),
        )
        .arg(
            Arg::new("rto")
                .long("rto")
                .takes_value(true)
                .default_value("500")
                .help("initial retransmission timeout, ms")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("retries")
                .long("retries")
                .takes_value(true)
                .default_value("7")
                .help("max transmissions")
                .value_parser(clap::value_parser!(u32).range(1..)),
        )
        .get_matches();

    let server: &String = app.get_one("server").expect("server has a default");
    let local_ip: Option<IpAddr> = app.get_one::<IpAddr>("local_ip").copied();
    let rto: u64 = *app.get_one("rto").expect("rto has a default");
    let retries: u32 = *app.get_one("retries").expect("retries has a default");

    let config = ClientConfig {
        rto: Duration::from_millis(rto),
        max_transmissions: retries,
        ..Default::default()
    };

    let server = match resolve_server(server, local_ip).await {
        Ok(v) => v,
        Err(e) => {
            error!("error, {}", e);
            return ExitCode::FAILURE;
        }
    };
    debug!("server: {}", server);

    let bind_ip = local_ip.unwrap_or_else(|| unspecified_for(&server));
    let mut sock = match UdpSocket::bind(SocketAddr::new(bind_ip, 0)).await {
        Ok(v) => v,
        Err(e) => {
            error!("error, can't bind {}, {}", bind_ip, e);
            return ExitCode::FAILURE;
        }
    };

    match probe(&mut sock, server, &config).await {
        Ok(v) => {
            println!(
                "Local socket: {}, Remote socket: {}",
                v.local_address, v.mapped_address
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("error, probe, {}", e);
            ExitCode::FAILURE
        }
    }
}
