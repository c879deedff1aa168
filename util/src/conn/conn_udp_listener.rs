use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, Mutex};

use super::Conn;
use crate::error::Error;

/// A listening UDP socket that demultiplexes inbound datagrams by remote
/// address into per-remote `Conn` handles, the way a TURN/STUN server or an
/// ICE host candidate's listening socket must when several remotes share one
/// local port.
pub struct ConnUdpListener {
    socket: Arc<UdpSocket>,
    accept_rx: Mutex<mpsc::Receiver<Arc<UdpConnChild>>>,
    children: Arc<Mutex<HashMap<SocketAddr, mpsc::Sender<Vec<u8>>>>>,
}

struct UdpConnChild {
    socket: Arc<UdpSocket>,
    remote_addr: SocketAddr,
    rx: Mutex<mpsc::Receiver<Vec<u8>>>,
}

impl ConnUdpListener {
    pub async fn new(laddr: SocketAddr) -> Result<Arc<Self>, Error> {
        let socket = Arc::new(UdpSocket::bind(laddr).await?);
        let (accept_tx, accept_rx) = mpsc::channel(16);
        let children: Arc<Mutex<HashMap<SocketAddr, mpsc::Sender<Vec<u8>>>>> =
            Arc::new(Mutex::new(HashMap::new()));

        let read_socket = socket.clone();
        let read_children = children.clone();
        tokio::spawn(async move {
            let mut buf = vec![0u8; 1500];
            loop {
                let (n, addr) = match read_socket.recv_from(&mut buf).await {
                    Ok(v) => v,
                    Err(_) => break,
                };
                let mut children = read_children.lock().await;
                if let Some(tx) = children.get(&addr) {
                    let _ = tx.send(buf[..n].to_vec()).await;
                } else {
                    let (tx, rx) = mpsc::channel(64);
                    let _ = tx.send(buf[..n].to_vec()).await;
                    children.insert(addr, tx);
                    let child = Arc::new(UdpConnChild {
                        socket: read_socket.clone(),
                        remote_addr: addr,
                        rx: Mutex::new(rx),
                    });
                    if accept_tx.send(child).await.is_err() {
                        break;
                    }
                }
            }
        });

        Ok(Arc::new(ConnUdpListener {
            socket,
            accept_rx: Mutex::new(accept_rx),
            children,
        }))
    }

    pub async fn accept(&self) -> Option<Arc<dyn Conn + Send + Sync>> {
        let mut rx = self.accept_rx.lock().await;
        rx.recv().await.map(|c| c as Arc<dyn Conn + Send + Sync>)
    }

    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        self.socket.local_addr().map_err(Error::from)
    }
}

#[async_trait]
impl Conn for UdpConnChild {
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
        self.socket
            .send_to(buf, self.remote_addr)
            .await
            .map_err(Error::from)
    }

    async fn send_to(&self, buf: &[u8], target: SocketAddr) -> Result<usize, Error> {
        self.socket.send_to(buf, target).await.map_err(Error::from)
    }

    fn local_addr(&self) -> Result<SocketAddr, Error> {
        self.socket.local_addr().map_err(Error::from)
    }

    fn remote_addr(&self) -> Option<SocketAddr> {
        Some(self.remote_addr)
    }

    async fn close(&self) -> Result<(), Error> {
        Ok(())
    }
}
