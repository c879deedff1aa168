pub mod conn_pipe;
pub mod conn_udp_listener;

use std::net::SocketAddr;

use async_trait::async_trait;
use tokio::net::UdpSocket;

use crate::error::Error;

/// Conn is a generic transport connection, the narrow interface ICE, DTLS
/// and SRTP egress share with the 5-tuple UDP/TCP socket (spec.md §5
/// "shared-resource policy": only the owning peer-connection loop writes).
#[async_trait]
pub trait Conn {
    async fn connect(&self, addr: SocketAddr) -> Result<(), Error>;
    async fn recv(&self, buf: &mut [u8]) -> Result<usize, Error>;
    async fn recv_from(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr), Error>;
    async fn send(&self, buf: &[u8]) -> Result<usize, Error>;
    async fn send_to(&self, buf: &[u8], target: SocketAddr) -> Result<usize, Error>;
    fn local_addr(&self) -> Result<SocketAddr, Error>;
    fn remote_addr(&self) -> Option<SocketAddr>;
    async fn close(&self) -> Result<(), Error>;
}

#[async_trait]
impl Conn for UdpSocket {
    async fn connect(&self, addr: SocketAddr) -> Result<(), Error> {
        UdpSocket::connect(self, addr).await.map_err(Error::from)
    }

    async fn recv(&self, buf: &mut [u8]) -> Result<usize, Error> {
        UdpSocket::recv(self, buf).await.map_err(Error::from)
    }

    async fn recv_from(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr), Error> {
        UdpSocket::recv_from(self, buf).await.map_err(Error::from)
    }

    async fn send(&self, buf: &[u8]) -> Result<usize, Error> {
        UdpSocket::send(self, buf).await.map_err(Error::from)
    }

    async fn send_to(&self, buf: &[u8], target: SocketAddr) -> Result<usize, Error> {
        UdpSocket::send_to(self, buf, target)
            .await
            .map_err(Error::from)
    }

    fn local_addr(&self) -> Result<SocketAddr, Error> {
        UdpSocket::local_addr(self).map_err(Error::from)
    }

    fn remote_addr(&self) -> Option<SocketAddr> {
        UdpSocket::peer_addr(self).ok()
    }

    async fn close(&self) -> Result<(), Error> {
        Ok(())
    }
}
