pub mod attrs;
pub mod client;
pub mod constants;
pub mod error;
pub mod header;
pub mod packet;
pub mod transport;
pub mod util;
pub mod xor;

pub use client::{request_remote_address, BindingClient, ClientConfig};
pub use error::{ParsePacketErr, StunError};
