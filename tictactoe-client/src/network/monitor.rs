//! Connection Monitor
//!
//! Checks backend liveness and publishes an online/offline flag. A check
//! never fails from the caller's point of view: every outcome, including
//! transport errors, resolves to a boolean.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::core::observable::{Observable, StateReader};
use crate::network::endpoint::EndpointResolver;
use crate::network::protocol::{Liveness, PING_PATH};
use crate::network::transport::Transport;

/// Backend reachability as last observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionStatus {
    /// Last check found the backend alive.
    pub is_online: bool,
}

/// Owner of the [`ConnectionStatus`] container.
pub struct ConnectionMonitor {
    transport: Arc<dyn Transport>,
    resolver: EndpointResolver,
    status: Observable<ConnectionStatus>,
}

impl ConnectionMonitor {
    /// Create a monitor that starts offline.
    pub fn new(transport: Arc<dyn Transport>, resolver: EndpointResolver) -> Self {
        Self {
            transport,
            resolver,
            status: Observable::default(),
        }
    }

    /// Call `/ping` and record the result.
    #[instrument(skip(self))]
    pub async fn check_connection(&self) -> bool {
        let url = self.resolver.url(PING_PATH);

        let online = match self.transport.get(&url).await {
            Ok(reply) => {
                let liveness = Liveness::from_reply(&reply);
                debug!("Ping reply classified as {:?}", liveness);
                liveness.is_alive()
            }
            Err(e) => {
                warn!("Connection check failed: {}", e);
                false
            }
        };

        self.status.set(ConnectionStatus { is_online: online });
        online
    }

    /// Forget the last observation.
    pub(crate) fn invalidate(&self) {
        self.status.set(ConnectionStatus::default());
    }

    /// Read-only view of the status.
    pub fn status(&self) -> StateReader<ConnectionStatus> {
        self.status.reader()
    }
}

// =============================================================================
// TESTS
// =============================================================================
