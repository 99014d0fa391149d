//! The connection controller: an explicit context object owning the
//! wallet-connection lifecycle.
//!
//! State machine: `Disconnected → Connecting → Connected`, with
//! `Connecting` able to fail back to `Disconnected`, and `Connected`
//! re-entering `Connecting` on chain or account change. A background
//! watcher polls wallet liveness (500 ms by default) and drains
//! wallet-originated events; a wallet that stops answering forces the
//! controller back to `Disconnected`.
//!
//! Controllers are plain values — construct as many as needed and share
//! one behind an `Arc` for process-wide reuse.

use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use chainmux_core::error::ConfigError;
use chainmux_rpc::RpcTransport;

use crate::error::ConnectError;
use crate::wallet::{WalletEvent, WalletProvider, WalletTransport};

/// Default liveness polling interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

const EVENT_CAPACITY: usize = 64;

/// Connection lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Events emitted as the connection moves through its lifecycle.
#[derive(Debug, Clone)]
pub enum ConnectionEvent {
    Connecting,
    Connected { address: String, chain_id: u64 },
    ChainChanged(u64),
    AccountsChanged(Vec<String>),
    Disconnected,
}

struct Shared {
    state: RwLock<ConnectionState>,
    wallet: RwLock<Option<Arc<dyn WalletProvider>>>,
    events: broadcast::Sender<ConnectionEvent>,
}

impl Shared {
    fn set_state(&self, next: ConnectionState) {
        *self.state.write().unwrap() = next;
    }

    fn emit(&self, event: ConnectionEvent) {
        // No receivers is fine; events are advisory
        let _ = self.events.send(event);
    }

    fn drop_connection(&self) {
        self.wallet.write().unwrap().take();
        self.set_state(ConnectionState::Disconnected);
        self.emit(ConnectionEvent::Disconnected);
    }
}

/// Owns the wallet-connection lifecycle.
pub struct ConnectionController {
    shared: Arc<Shared>,
    watcher: Mutex<Option<JoinHandle<()>>>,
    poll_interval: Duration,
}

impl ConnectionController {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                state: RwLock::new(ConnectionState::Disconnected),
                wallet: RwLock::new(None),
                events,
            }),
            watcher: Mutex::new(None),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the liveness polling interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn state(&self) -> ConnectionState {
        *self.shared.state.read().unwrap()
    }

    /// Subscribe to lifecycle events. Subscribe before calling
    /// [`ConnectionController::connect`] to observe the full sequence.
    pub fn subscribe(&self) -> broadcast::Receiver<ConnectionEvent> {
        self.shared.events.subscribe()
    }

    /// The connected wallet's account, if any.
    pub fn address(&self) -> Option<String> {
        self.shared
            .wallet
            .read()
            .unwrap()
            .as_ref()
            .map(|w| w.address())
    }

    /// Connect a wallet: verify it answers, transition to `Connected`,
    /// and start the background watcher.
    ///
    /// On failure the controller falls back to `Disconnected` and the
    /// error is returned.
    pub async fn connect(&self, wallet: Arc<dyn WalletProvider>) -> Result<(), ConnectError> {
        self.stop_watcher();
        self.shared.set_state(ConnectionState::Connecting);
        self.shared.emit(ConnectionEvent::Connecting);

        let chain_id = match wallet.chain_id().await {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "wallet did not answer during connect");
                self.shared.drop_connection();
                return Err(e.into());
            }
        };

        let address = wallet.address();
        *self.shared.wallet.write().unwrap() = Some(wallet.clone());
        self.shared.set_state(ConnectionState::Connected);
        self.shared.emit(ConnectionEvent::Connected {
            address: address.clone(),
            chain_id,
        });
        info!(address, chain_id, "wallet connected");

        let handle = tokio::spawn(watch(self.shared.clone(), wallet, self.poll_interval));
        *self.watcher.lock().unwrap() = Some(handle);
        Ok(())
    }

    /// Explicitly disconnect. Idempotent.
    pub fn disconnect(&self) {
        self.stop_watcher();
        if self.state() != ConnectionState::Disconnected {
            self.shared.drop_connection();
            info!("wallet disconnected");
        }
    }

    /// The active connection as an [`RpcTransport`].
    pub fn transport(&self) -> Result<Arc<dyn RpcTransport>, ConfigError> {
        let wallet = self
            .shared
            .wallet
            .read()
            .unwrap()
            .clone()
            .ok_or(ConfigError::NotConnected)?;
        Ok(Arc::new(WalletTransport::new(wallet)))
    }

    fn stop_watcher(&self) {
        if let Some(handle) = self.watcher.lock().unwrap().take() {
            handle.abort();
        }
    }
}

impl Default for ConnectionController {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ConnectionController {
    fn drop(&mut self) {
        self.stop_watcher();
    }
}

/// Background watcher: polls liveness and applies wallet events to the
/// state machine. Exits once the connection is gone.
async fn watch(shared: Arc<Shared>, wallet: Arc<dyn WalletProvider>, poll_interval: Duration) {
    let mut wallet_events = wallet.subscribe();
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // interval fires immediately; skip the initial tick so connect's
    // own liveness check is not repeated
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if !wallet.is_alive().await {
                    warn!("wallet unreachable, forcing disconnect");
                    shared.drop_connection();
                    return;
                }
            }

            event = wallet_events.recv() => match event {
                Ok(WalletEvent::ChainChanged(chain_id)) => {
                    debug!(chain_id, "wallet switched chains");
                    shared.set_state(ConnectionState::Connecting);
                    shared.emit(ConnectionEvent::Connecting);
                    shared.emit(ConnectionEvent::ChainChanged(chain_id));
                    if wallet.is_alive().await {
                        shared.set_state(ConnectionState::Connected);
                        shared.emit(ConnectionEvent::Connected {
                            address: wallet.address(),
                            chain_id,
                        });
                    } else {
                        shared.drop_connection();
                        return;
                    }
                }

                Ok(WalletEvent::AccountsChanged(accounts)) => {
                    debug!(?accounts, "wallet switched accounts");
                    if accounts.is_empty() {
                        shared.drop_connection();
                        return;
                    }
                    shared.set_state(ConnectionState::Connecting);
                    shared.emit(ConnectionEvent::Connecting);
                    shared.emit(ConnectionEvent::AccountsChanged(accounts.clone()));
                    match wallet.chain_id().await {
                        Ok(chain_id) => {
                            shared.set_state(ConnectionState::Connected);
                            shared.emit(ConnectionEvent::Connected {
                                address: accounts[0].clone(),
                                chain_id,
                            });
                        }
                        Err(_) => {
                            shared.drop_connection();
                            return;
                        }
                    }
                }

                Ok(WalletEvent::Disconnected) | Err(broadcast::error::RecvError::Closed) => {
                    shared.drop_connection();
                    return;
                }

                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "wallet event stream lagged");
                }
            }
        }
    }
}
