pub mod endpoint;
pub mod mux_func;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::warn;
use tokio::sync::Mutex;

use self::endpoint::Endpoint;
use self::mux_func::MatchFunc;
use crate::conn::Conn;
use crate::error::Error;
use crate::Buffer;

const MAX_DATAGRAM_SIZE: usize = 1460;

/// A `Mux` demultiplexes one shared 5-tuple byte stream into any number of
/// `Endpoint`s, each matched by a `MatchFunc` tried in registration order.
/// This is spec.md C3: the STUN/DTLS/SRTP split by first-byte range (RFC
/// 5764), generalized to an arbitrary ordered list of matchers so the ICE
/// agent can also demux STUN off the front before DTLS/SRTP ever see it.
pub struct Mux {
    next_conn: Arc<dyn Conn + Send + Sync>,
    endpoints: Mutex<HashMap<u64, (MatchFunc, Arc<Endpoint>)>>,
    id: AtomicU64,
    closed: Mutex<bool>,
}

pub struct Config {
    pub conn: Arc<dyn Conn + Send + Sync>,
}

impl Mux {
    pub fn new(config: Config) -> Arc<Self> {
        let m = Arc::new(Mux {
            next_conn: config.conn,
            endpoints: Mutex::new(HashMap::new()),
            id: AtomicU64::new(0),
            closed: Mutex::new(false),
        });
        let m2 = m.clone();
        tokio::spawn(async move {
            m2.read_loop().await;
        });
        m
    }

    /// new_endpoint registers a match function and returns the `Endpoint`
    /// that will receive every inbound datagram it matches. Datagrams that
    /// arrive before any endpoint is registered wait in no buffer at the mux
    /// level — buffering until first `listen()` is each `Endpoint`'s own
    /// `Buffer` (spec.md §4.3/§9), not the mux's.
    pub async fn new_endpoint(&self, f: MatchFunc) -> Arc<Endpoint> {
        let id = self.id.fetch_add(1, Ordering::SeqCst);
        let endpoint = Arc::new(Endpoint::new(id, self.next_conn.clone()));
        self.endpoints
            .lock()
            .await
            .insert(id, (f, endpoint.clone()));
        endpoint
    }

    pub async fn remove_endpoint(&self, e: &Arc<Endpoint>) {
        self.endpoints.lock().await.remove(&e.id());
    }

    pub async fn close(&self) {
        *self.closed.lock().await = true;
        let endpoints = self.endpoints.lock().await;
        for (_, (_, e)) in endpoints.iter() {
            e.close().await;
        }
    }

    async fn read_loop(self: Arc<Self>) {
        let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
        loop {
            let (n, remote) = match self.next_conn.recv_from(&mut buf).await {
                Ok(v) => v,
                Err(_) => return,
            };
            if *self.closed.lock().await {
                return;
            }
            if let Err(err) = self.dispatch(&buf[..n], remote).await {
                warn!("mux: dropping unmatched {}-byte datagram: {}", n, err);
            }
        }
    }

    async fn dispatch(&self, buf: &[u8], remote: SocketAddr) -> Result<(), Error> {
        let endpoints = self.endpoints.lock().await;
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

pub(crate) fn new_demux_buffer() -> Arc<Buffer> {
    Arc::new(Buffer::new(0))
}
