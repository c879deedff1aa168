use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use tokio::net::UdpSocket;

use crate::conn::Conn;
use crate::error::Error;

#[derive(Debug, Clone, Default)]
pub struct NetConfig {
    pub static_ips: Vec<IpAddr>,
    pub static_ip: String,
}

/// A handle onto either the real host network stack or (when `vnet`
/// simulation is wired up by a test) a virtual one. The default
/// configuration simply delegates to real UDP sockets.
pub struct Net {
    static_ips: Vec<IpAddr>,
}

impl Net {
    pub fn new(config: Option<NetConfig>) -> Self {
        let static_ips = config
            .map(|c| c.static_ips)
            .filter(|ips| !ips.is_empty())
            .unwrap_or_else(|| vec![IpAddr::V4(Ipv4Addr::UNSPECIFIED)]);
        Net { static_ips }
    }

    pub fn interface_addresses(&self) -> Vec<IpAddr> {
        self.static_ips.clone()
    }

    pub async fn bind(&self, addr: std::net::SocketAddr) -> Result<Arc<dyn Conn + Send + Sync>, Error> {
        let socket = UdpSocket::bind(addr).await?;
        Ok(Arc::new(socket))
    }
}

impl Default for Net {
    fn default() -> Self {
        Net::new(None)
    }
}
