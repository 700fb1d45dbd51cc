//! Network Connectivity Abstraction
//!
//! The host's "is online" signal with change notifications.

use async_trait::async_trait;

use crate::error::Result;

/// Network connection status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStatus {
    /// Connected to a network
    Online,
    /// Not connected to any network
    Offline,
    /// The host cannot tell
    Unknown,
}

impl NetworkStatus {
    /// Collapse the status into the boolean the core consumes.
    ///
    /// `Unknown` counts as online: the signal is advisory and fetch failures
    /// are what actually drive download behaviour.
    pub fn is_online(self) -> bool {
        !matches!(self, NetworkStatus::Offline)
    }
}

impl From<bool> for NetworkStatus {
    fn from(online: bool) -> Self {
        if online {
            NetworkStatus::Online
        } else {
            NetworkStatus::Offline
        }
    }
}

/// Network monitor trait
///
/// # Platform Support
///
/// - **Desktop**: connectivity probe
/// - **iOS**: Network framework
/// - **Android**: ConnectivityManager
/// - **Web**: `navigator.onLine` plus `online`/`offline` events
#[async_trait]
pub trait NetworkMonitor: Send + Sync {
    /// Get the current network status
    async fn status(&self) -> Result<NetworkStatus>;

    /// Check if currently connected to any network
    async fn is_online(&self) -> bool {
        matches!(self.status().await, Ok(status) if status.is_online())
    }

    /// Subscribe to network status changes
    ///
    /// The stream yields a value whenever the status changes.
    async fn subscribe_changes(&self) -> Result<Box<dyn NetworkChangeStream>>;
}

/// Stream of network status changes
#[async_trait]
pub trait NetworkChangeStream: Send {
    /// Wait for the next status change.
    ///
    /// Returns `None` when the stream is closed.
    async fn next(&mut self) -> Option<NetworkStatus>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_to_bool() {
        assert!(NetworkStatus::Online.is_online());
        assert!(NetworkStatus::Unknown.is_online());
        assert!(!NetworkStatus::Offline.is_online());
    }

    #[test]
    fn test_status_from_bool() {
        assert_eq!(NetworkStatus::from(true), NetworkStatus::Online);
        assert_eq!(NetworkStatus::from(false), NetworkStatus::Offline);
    }
}
