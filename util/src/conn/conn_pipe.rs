use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::Mutex;

use super::Conn;
use crate::error::Error;

/// An in-memory, unbounded, point-to-point pipe implementing `Conn`. Used by
/// the `mux`/demux test suite and the ICE agent's loopback tests in place of
/// a real socket.
pub struct ConnPipe {
    local_addr: SocketAddr,
    remote_addr: SocketAddr,
    tx: mpsc::UnboundedSender<Vec<u8>>,
    rx: Mutex<mpsc::UnboundedReceiver<Vec<u8>>>,
}

pub fn pipe() -> (Arc<ConnPipe>, Arc<ConnPipe>) {
    let (tx_a, rx_a) = mpsc::unbounded_channel();
    let (tx_b, rx_b) = mpsc::unbounded_channel();
    let a_addr: SocketAddr = "0.0.0.0:0".parse().unwrap();
    let b_addr: SocketAddr = "0.0.0.0:1".parse().unwrap();
    let a = Arc::new(ConnPipe {
        local_addr: a_addr,
        remote_addr: b_addr,
        tx: tx_b,
        rx: Mutex::new(rx_a),
    });
    let b = Arc::new(ConnPipe {
        local_addr: b_addr,
        remote_addr: a_addr,
        tx: tx_a,
        rx: Mutex::new(rx_b),
    });
    (a, b)
}

#[async_trait]
impl Conn for ConnPipe {
    async fn connect(&self, _addr: SocketAddr) -> Result<(), Error> {
        Ok(())
    }

    async fn recv(&self, buf: &mut [u8]) -> Result<usize, Error> {
        let mut rx = self.rx.lock().await;
        let data = rx.recv().await.ok_or(Error::ErrIoEof)?;
        let n = data.len().min(buf.len());
        buf[..n].copy_from_slice(&data[..n]);
        Ok(n)
    }

    async fn recv_from(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr), Error> {
        let n = self.recv(buf).await?;
        Ok((n, self.remote_addr))
    }

    async fn send(&self, buf: &[u8]) -> Result<usize, Error> {
        self.tx
            .send(buf.to_vec())
            .map_err(|_| Error::ErrUseClosedNetworkConn)?;
        Ok(buf.len())
    }

    async fn send_to(&self, buf: &[u8], _target: SocketAddr) -> Result<usize, Error> {
        self.send(buf).await
    }

    fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.local_addr)
    }

    fn remote_addr(&self) -> Option<SocketAddr> {
        Some(self.remote_addr)
    }

    async fn close(&self) -> Result<(), Error> {
        Ok(())
    }
}
