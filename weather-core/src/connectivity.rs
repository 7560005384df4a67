use std::net::{SocketAddr, UdpSocket};

use tracing::debug;

/// Reports whether any network transport is currently usable.
pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Asks the OS for a route toward a public address. A UDP `connect` only
/// selects a route and sends nothing, so this is cheap and silent.
#[derive(Debug, Clone)]
pub struct SystemConnectivity {
    probe: SocketAddr,
}

impl SystemConnectivity {
    pub fn new() -> Self {
        Self { probe: SocketAddr::from(([1, 1, 1, 1], 53)) }
    }

    pub fn with_probe(probe: SocketAddr) -> Self {
        Self { probe }
    }
}

impl Default for SystemConnectivity {
    fn default() -> Self {
        Self::new()
    }
}

impl Connectivity for SystemConnectivity {
    fn is_online(&self) -> bool {
        let bind: SocketAddr = if self.probe.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };

        let routed = UdpSocket::bind(bind).and_then(|socket| socket.connect(self.probe));
        match routed {
            Ok(()) => true,
            Err(e) => {
                debug!(probe = %self.probe, error = %e, "no route to probe address");
                false
            }
        }
    }
}

/// Fixed answer, for tests and for forcing offline mode.
#[derive(Debug, Clone, Copy)]
pub struct StaticConnectivity(pub bool);

impl Connectivity for StaticConnectivity {
    fn is_online(&self) -> bool {
        self.0
    }
}
