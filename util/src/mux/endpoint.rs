use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;

use crate::conn::Conn;
use crate::error::Error;
use crate::Buffer;

/// One demultiplexed branch of a `Mux`. Implements `Conn` so DTLS/SRTP can
/// treat it exactly like a socket; reads come from the endpoint's own
/// `Buffer`, which replays whatever arrived before the first read (spec.md
/// §4.3/§9) then behaves as a live queue.
pub struct Endpoint {
    id: u64,
    next_conn: Arc<dyn Conn + Send + Sync>,
    pub(crate) buffer: Buffer,
    remote_addr: ArcSwapOption<SocketAddr>,
}

impl Endpoint {
    pub(crate) fn new(id: u64, next_conn: Arc<dyn Conn + Send + Sync>) -> Self {
        Endpoint {
            id,
            next_conn,
            buffer: Buffer::new(0),
            remote_addr: ArcSwapOption::from(None),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn set_remote_addr(&self, addr: SocketAddr) {
        self.remote_addr.store(Some(Arc::new(addr)));
    }

    pub async fn close(&self) {
        self.buffer.close().await;
    }
}

#[async_trait]
impl Conn for Endpoint {
    async fn connect(&self, _addr: SocketAddr) -> Result<(), Error> {
        Ok(())
    }

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
