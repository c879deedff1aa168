//! A minimal virtual network used only by the protocol crates' own test
//! suites to exercise NAT/relay topologies without real sockets (the ICE
//! agent's `agent_vnet_test`, TURN's allocation tests). Not part of the
//! core pipeline spec.md describes; kept narrow on purpose.

pub mod chunk;
pub mod nat;
pub mod net;
pub mod router;
