//! Network Monitoring Implementation

use async_trait::async_trait;
use bridge_traits::{
    error::Result,
    network::{NetworkChangeStream, NetworkMonitor, NetworkStatus},
};
use core_async::time::{sleep, timeout, Duration};
use std::net::SocketAddr;
use tracing::debug;

const DEFAULT_PROBE_ADDR: &str = "1.1.1.1:443";
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);
const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Desktop network monitor implementation
///
/// Desktop operating systems have no portable "online" event, so status is
/// derived from a TCP connect probe against a well-known address and changes
/// are discovered by polling.
#[derive(Debug, Clone)]
pub struct DesktopNetworkMonitor {
    probe_addr: String,
    poll_interval: Duration,
}

impl DesktopNetworkMonitor {
    pub fn new() -> Self {
        Self {
            probe_addr: DEFAULT_PROBE_ADDR.to_string(),
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Probe a different `host:port`.
    pub fn with_probe_addr(mut self, addr: impl Into<String>) -> Self {
        self.probe_addr = addr.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    async fn probe(&self) -> NetworkStatus {
        let addr: SocketAddr = match self.probe_addr.parse() {
            Ok(addr) => addr,
            Err(_) => return NetworkStatus::Unknown,
        };

        match timeout(PROBE_TIMEOUT, tokio::net::TcpStream::connect(addr)).await {
            Ok(Ok(_)) => NetworkStatus::Online,
            Ok(Err(_)) | Err(_) => NetworkStatus::Offline,
        }
    }
}

impl Default for DesktopNetworkMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NetworkMonitor for DesktopNetworkMonitor {
    async fn status(&self) -> Result<NetworkStatus> {
        let status = self.probe().await;
        debug!(status = ?status, probe = %self.probe_addr, "Network probe finished");
        Ok(status)
    }

    async fn subscribe_changes(&self) -> Result<Box<dyn NetworkChangeStream>> {
        Ok(Box::new(PollingChangeStream {
            monitor: self.clone(),
            last_status: None,
        }))
    }
}

/// Change stream that re-probes on an interval and yields only transitions.
struct PollingChangeStream {
    monitor: DesktopNetworkMonitor,
    last_status: Option<NetworkStatus>,
}

#[async_trait]
impl NetworkChangeStream for PollingChangeStream {
    async fn next(&mut self) -> Option<NetworkStatus> {
        loop {
            sleep(self.monitor.poll_interval).await;

            let status = self.monitor.probe().await;
            if self.last_status != Some(status) {
                self.last_status = Some(status);
                return Some(status);
            }
        }
    }
}
