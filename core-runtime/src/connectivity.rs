//! # Connectivity Tracking
//!
//! A live "is the host online" flag. Nothing here gates downloads: the
//! downloader reacts to individual fetch failures, while the flag is consulted
//! opportunistically (for example to show an offline banner).
//!
//! The host either pushes transitions with [`ConnectivityMonitor::set_online`]
//! or hands over a [`NetworkMonitor`] bridge via
//! [`ConnectivityMonitor::attach`], which forwards its change stream.

use std::sync::Arc;

use bridge_traits::network::NetworkMonitor;
use core_async::sync::watch;
use core_async::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::events::{ConnectivityEvent, CoreEvent, EventBus};

/// Current online/offline state with change notifications.
///
/// No history is kept: subscribers always observe the latest value.
#[derive(Debug, Clone)]
pub struct ConnectivityMonitor {
    state: Arc<watch::Sender<bool>>,
    event_bus: Option<EventBus>,
}

impl ConnectivityMonitor {
    /// Create a monitor with an initial state.
    pub fn new(initially_online: bool) -> Self {
        let (state, _) = watch::channel(initially_online);
        Self {
            state: Arc::new(state),
            event_bus: None,
        }
    }

    /// Publish transitions as [`ConnectivityEvent`]s on `event_bus`.
    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn is_online(&self) -> bool {
        *self.state.borrow()
    }

    /// Record the host's current signal.
    ///
    /// Returns `true` if this changed the state. Repeating the current value
    /// neither notifies subscribers nor emits an event.
    pub fn set_online(&self, online: bool) -> bool {
        let changed = self.state.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });

        if changed {
            if online {
                info!("Connectivity restored");
            } else {
                warn!("Connectivity lost");
            }

            if let Some(bus) = &self.event_bus {
                bus.emit(CoreEvent::Connectivity(ConnectivityEvent::from(online)))
                    .ok();
            }
        }

        changed
    }

    /// Watch the flag. The receiver starts at the current value.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }

    /// Seed the flag from `monitor` and forward every subsequent change.
    ///
    /// The forwarding task ends when the bridge closes its stream. Abort the
    /// returned handle to detach earlier.
    pub async fn attach(
        &self,
        monitor: Arc<dyn NetworkMonitor>,
    ) -> bridge_traits::error::Result<JoinHandle<()>> {
        match monitor.status().await {
            Ok(status) => {
                self.set_online(status.is_online());
            }
            Err(e) => warn!(error = %e, "Initial network status unavailable"),
        }

        let mut changes = monitor.subscribe_changes().await?;
        let this = self.clone();

        Ok(core_async::spawn(async move {
            while let Some(status) = changes.next().await {
                debug!(status = ?status, "Network status change");
                this.set_online(status.is_online());
            }
            debug!("Network change stream closed");
        }))
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}
