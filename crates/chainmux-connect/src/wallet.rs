//! The wallet seam: the `WalletProvider` trait an external wallet
//! integration implements, and the adapter exposing a connected wallet
//! as an `RpcTransport`.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::broadcast;

use chainmux_rpc::{JsonRpcRequest, JsonRpcResponse, RpcTransport, TransportError};

/// Events originating from the wallet itself.
#[derive(Debug, Clone)]
pub enum WalletEvent {
    /// The user switched networks.
    ChainChanged(u64),
    /// The user switched accounts. An empty list means no account is
    /// exposed anymore.
    AccountsChanged(Vec<String>),
    /// The wallet ended the session.
    Disconnected,
}

/// An external wallet integration.
///
/// Implementations wrap whatever the host environment provides — an
/// injected browser provider, a WalletConnect session, a test double.
/// The controller owns lifecycle; this trait only exposes the wallet.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// The currently selected account, 0x-prefixed hex.
    fn address(&self) -> String;

    /// The chain the wallet is currently on.
    async fn chain_id(&self) -> Result<u64, TransportError>;

    /// Forward a raw JSON-RPC request through the wallet.
    async fn request(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError>;

    /// Liveness probe. The default pings the chain id.
    async fn is_alive(&self) -> bool {
        self.chain_id().await.is_ok()
    }

    /// Subscribe to wallet-originated events.
    fn subscribe(&self) -> broadcast::Receiver<WalletEvent>;
}

/// A connected wallet as an [`RpcTransport`], so contract bindings and
/// the aggregation engine can run over it unchanged.
pub struct WalletTransport {
    wallet: Arc<dyn WalletProvider>,
    label: String,
}

impl WalletTransport {
    pub fn new(wallet: Arc<dyn WalletProvider>) -> Self {
        let label = format!("wallet:{}", wallet.address());
        Self { wallet, label }
    }
}

#[async_trait]
impl RpcTransport for WalletTransport {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        self.wallet.request(req).await
    }

    fn url(&self) -> &str {
        &self.label
    }
}
