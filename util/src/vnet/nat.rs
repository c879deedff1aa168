/// NAT mapping behavior a virtual router can emulate for ICE srflx/relay
/// test scenarios. Only the discriminant is needed by the current test
/// suite; full endpoint-dependent mapping simulation is not implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NatType {
    EndpointIndependent,
    AddressDependent,
    AddressAndPortDependent,
}

impl Default for NatType {
    fn default() -> Self {
        NatType::EndpointIndependent
    }
}
