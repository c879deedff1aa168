use std::net::IpAddr;

use super::chunk::Chunk;

/// A network interface card attached to the virtual router: anything that
/// can accept a forwarded `Chunk` and have its addresses enumerated.
pub trait Nic: Send + Sync {
    fn get_interface_addresses(&self) -> Vec<IpAddr>;
    fn on_inbound_chunk(&self, c: Chunk);
}
