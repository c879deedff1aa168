pub mod endpoint;
pub mod mux_func;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::warn;
use tokio::sync::Mutex;
use util::{Conn, Error};

use endpoint::Endpoint;
use mux_func::MatchFunc;

/// Demultiplexes the one ICE-selected 5-tuple connection into the DTLS and
/// SRTP/SRTCP `Endpoint`s layered on top of it (spec.md C3). Distinct from
/// `util::mux`: this is the peer-connection-level mux sitting directly on
/// the ICE transport's socket, not a generic reusable utility.
pub struct Mux {
    next_conn: Arc<dyn Conn + Send + Sync>,
    pub(crate) endpoints: Arc<Mutex<HashMap<u64, (MatchFunc, Arc<Endpoint>)>>>,
    id: AtomicU64,
    buffer_size: usize,
    closed: Arc<Mutex<bool>>,
}

pub struct Config {
    pub conn: Arc<dyn Conn + Send + Sync>,
    pub buffer_size: usize,
}

impl Mux {
    pub fn new(config: Config) -> Self {
        let m = Mux {
            next_conn: config.conn,
            endpoints: Arc::new(Mutex::new(HashMap::new())),
            id: AtomicU64::new(0),
            buffer_size: config.buffer_size,
            closed: Arc::new(Mutex::new(false)),
        };

        let next_conn = Arc::clone(&m.next_conn);
        let endpoints = Arc::clone(&m.endpoints);
        let closed = Arc::clone(&m.closed);
        let buffer_size = m.buffer_size;
        tokio::spawn(async move {
            Mux::read_loop(next_conn, endpoints, closed, buffer_size).await;
        });

        m
    }

    /// new_endpoint registers a `MatchFunc` and returns the `Endpoint` that
    /// receives every inbound datagram it matches, tried in registration
    /// order against every other registered matcher.
    pub async fn new_endpoint(&self, f: MatchFunc) -> Arc<Endpoint> {
        let id = self.id.fetch_add(1, Ordering::SeqCst);
        let endpoint = Arc::new(Endpoint::new(
            id,
            Arc::clone(&self.next_conn),
            self.buffer_size,
        ));
        self.endpoints
            .lock()
            .await
            .insert(id, (f, Arc::clone(&endpoint)));
        endpoint
    }

    pub async fn remove_endpoint(&self, e: &Arc<Endpoint>) {
        self.endpoints.lock().await.remove(&e.id());
    }

    pub async fn close(&mut self) {
        *self.closed.lock().await = true;
        let endpoints = self.endpoints.lock().await;
        for (_, e) in endpoints.values() {
            let _ = e.close().await;
        }
    }

    async fn read_loop(
        next_conn: Arc<dyn Conn + Send + Sync>,
        endpoints: Arc<Mutex<HashMap<u64, (MatchFunc, Arc<Endpoint>)>>>,
        closed: Arc<Mutex<bool>>,
        buffer_size: usize,
    ) {
        let mut buf = vec![0u8; buffer_size];
        loop {
            let (n, remote) = match next_conn.recv_from(&mut buf).await {
                Ok(v) => v,
                Err(_) => return,
            };
            if *closed.lock().await {
                return;
            }
            if let Err(err) = Mux::dispatch(&buf[..n], remote, &endpoints).await {
                warn!("mux: dropping unmatched {}-byte datagram: {}", n, err);
            }
        }
    }

    async fn dispatch(
        buf: &[u8],
        remote: SocketAddr,
        endpoints: &Arc<Mutex<HashMap<u64, (MatchFunc, Arc<Endpoint>)>>>,
    ) -> Result<(), Error> {
        let endpoints = endpoints.lock().await;
        for (f, endpoint) in endpoints.values() {
            if f(buf) {
                endpoint.buffer.write(buf).await?;
                endpoint.set_remote_addr(remote);
                return Ok(());
            }
        }
        Err(Error::ErrMuxNoEndpointMatched)
    }
}
