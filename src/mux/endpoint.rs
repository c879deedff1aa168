use std::net::SocketAddr;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use util::{Buffer, Conn, Error};

/// One demultiplexed branch of the peer connection's single 5-tuple: DTLS,
/// SRTP and SRTCP each get their own `Endpoint` off the same underlying ICE
/// `Conn`. Implements `Conn` itself so the dtls/srtp crates can treat it
/// like a socket; the first read drains whatever arrived before this
/// endpoint was registered (spec.md §4.3/§9 "buffer until first listen").
pub struct Endpoint {
    id: u64,
    next_conn: Arc<dyn Conn + Send + Sync>,
    pub(crate) buffer: Buffer,
    remote_addr: ArcSwapOption<SocketAddr>,
}

impl Endpoint {
    pub(crate) fn new(id: u64, next_conn: Arc<dyn Conn + Send + Sync>, buffer_size: usize) -> Self {
        Endpoint {
            id,
            next_conn,
            buffer: Buffer::new(buffer_size),
            remote_addr: ArcSwapOption::from(None),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn set_remote_addr(&self, addr: SocketAddr) {
        self.remote_addr.store(Some(Arc::new(addr)));
    }

    /// unregisters the endpoint's buffer; the mux itself drops the endpoint
    /// from its table in `Mux::remove_endpoint`.
    pub async fn close(&self) -> Result<(), Error> {
        self.buffer.close().await;
        Ok(())
    }
}

#[async_trait]
impl Conn for Endpoint {
    async fn connect(&self, _addr: SocketAddr) -> Result<(), Error> {
        Ok(())
    }

    /// reads a packet of len(p) bytes from the underlying conn that was
    /// matched by this endpoint's `MatchFunc`.
    async fn recv(&self, buf: &mut [u8]) -> Result<usize, Error> {
        self.buffer.read(buf).await
    }

    async fn recv_from(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr), Error> {
        let n = self.buffer.read(buf).await?;
        let addr = self
            .remote_addr
            .load_full()
            .map(|a| *a)
            .unwrap_or_else(|| "0.0.0.0:0".parse().unwrap());
        Ok((n, addr))
    }

    /// writes bytes to the underlying conn
    async fn send(&self, buf: &[u8]) -> Result<usize, Error> {
        self.next_conn.send(buf).await
    }

    async fn send_to(&self, buf: &[u8], target: SocketAddr) -> Result<usize, Error> {
        self.next_conn.send_to(buf, target).await
    }

    fn local_addr(&self) -> Result<SocketAddr, Error> {
        self.next_conn.local_addr()
    }

    fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr.load_full().map(|a| *a)
    }

    async fn close(&self) -> Result<(), Error> {
        self.buffer.close().await;
        Ok(())
    }
}
