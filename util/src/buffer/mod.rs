use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::Notify;
use tokio::sync::Mutex;

use crate::error::Error;

const DEFAULT_CAPACITY: usize = 1024 * 1024; // 1MB worth of buffered datagrams

struct BufferInternal {
    packets: VecDeque<Vec<u8>>,
    total_len: usize,
    capacity: usize,
    closed: bool,
}

/// A packet-oriented byte buffer with the "buffer until first listen"
/// behavior spec.md §4.3/§9 requires of the demultiplexer's `dtls_bytes` and
/// `srtp_bytes` streams: writes before the first read are queued (up to
/// `capacity`) rather than dropped, because SRTP subscribes only after the
/// DTLS handshake completes but media may already be arriving.
pub struct Buffer {
    internal: Mutex<BufferInternal>,
    notify: Notify,
}

impl Buffer {
    pub fn new(capacity: usize) -> Self {
        Buffer {
            internal: Mutex::new(BufferInternal {
                packets: VecDeque::new(),
                total_len: 0,
                capacity: if capacity == 0 {
                    DEFAULT_CAPACITY
                } else {
                    capacity
                },
                closed: false,
            }),
            notify: Notify::new(),
        }
    }

    /// Write enqueues one packet. Never blocks; returns `ErrBufferFull` if
    /// the byte budget would be exceeded, and `ErrBufferClosed` after close.
    pub async fn write(&self, packet: &[u8]) -> Result<usize, Error> {
        let mut internal = self.internal.lock().await;
        if internal.closed {
            return Err(Error::ErrBufferClosed);
        }
        if internal.total_len + packet.len() > internal.capacity {
            return Err(Error::ErrBufferFull);
        }
        internal.total_len += packet.len();
        internal.packets.push_back(packet.to_vec());
        drop(internal);
        self.notify.notify_waiters();
        Ok(packet.len())
    }

    /// Read dequeues the oldest buffered packet, waiting if none is queued
    /// yet. The first call after construction drains whatever accumulated
    /// before this listener attached, in arrival order, then behaves as a
    /// live one-packet-at-a-time broadcast.
    pub async fn read(&self, buf: &mut [u8]) -> Result<usize, Error> {
        loop {
            {
                let mut internal = self.internal.lock().await;
                if let Some(packet) = internal.packets.pop_front() {
                    internal.total_len -= packet.len();
                    if packet.len() > buf.len() {
                        return Err(Error::ErrBufferShort);
                    }
                    buf[..packet.len()].copy_from_slice(&packet);
                    return Ok(packet.len());
                }
                if internal.closed {
                    return Err(Error::ErrIoEof);
                }
            }
            self.notify.notified().await;
        }
    }

    pub async fn close(&self) {
        let mut internal = self.internal.lock().await;
        internal.closed = true;
        drop(internal);
        self.notify.notify_waiters();
    }

    pub async fn count(&self) -> usize {
        self.internal.lock().await.packets.len()
    }
}

pub fn new_buffer(capacity: usize) -> Arc<Buffer> {
    Arc::new(Buffer::new(capacity))
}
