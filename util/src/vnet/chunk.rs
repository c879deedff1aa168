use std::net::SocketAddr;

/// A single in-flight virtual-network datagram.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub source_addr: SocketAddr,
    pub destination_addr: SocketAddr,
    pub user_data: Vec<u8>,
}

impl Chunk {
    pub fn new(source_addr: SocketAddr, destination_addr: SocketAddr, user_data: Vec<u8>) -> Self {
        Chunk {
            source_addr,
            destination_addr,
            user_data,
        }
    }
}
