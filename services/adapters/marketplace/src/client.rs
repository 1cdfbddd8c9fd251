//! Chain access
//!
//! [`ChainClient`] is the seam between the marketplace facades and a node:
//! log subscriptions, historical log queries and read-only calls. The
//! WebSocket client supports all three; the HTTP client has no push channel
//! and reports subscriptions as unsupported.

use async_trait::async_trait;
use futures_util::stream::{BoxStream, StreamExt};
use tracing::{debug, info};
use web3::transports::{Http, WebSocket};
use web3::types::{Bytes, CallRequest, Filter, Log, H160, U64};
use web3::Web3;

use crate::error::{MarketplaceError, Result};

/// Node access used by the marketplace contracts
#[async_trait]
pub trait ChainClient: Send + Sync + 'static {
    /// Transport name for diagnostics
    fn transport_name(&self) -> &'static str;

    /// Live logs matching `filter`
    async fn subscribe_logs(&self, filter: Filter) -> Result<BoxStream<'static, Result<Log>>> {
        let _ = filter;
        Err(MarketplaceError::SubscriptionUnsupported {
            transport: self.transport_name(),
        })
    }

    /// Historical logs matching `filter`
    async fn logs(&self, filter: Filter) -> Result<Vec<Log>>;

    /// `eth_call` against the latest block
    async fn call(&self, to: H160, data: Bytes) -> Result<Bytes>;

    /// Latest block number
    async fn block_number(&self) -> Result<u64>;
}

fn call_request(to: H160, data: Bytes) -> CallRequest {
    CallRequest {
        to: Some(to),
        data: Some(data),
        ..Default::default()
    }
}

/// WebSocket client (subscriptions, queries and calls)
#[derive(Clone)]
pub struct WsClient {
    web3: Web3<WebSocket>,
}

impl WsClient {
    pub async fn connect(url: &str) -> Result<Self> {
        info!("Connecting to {}", url);
        let transport = WebSocket::new(url).await?;
        Ok(Self {
            web3: Web3::new(transport),
        })
    }
}

#[async_trait]
impl ChainClient for WsClient {
    fn transport_name(&self) -> &'static str {
        "websocket"
    }

    async fn subscribe_logs(&self, filter: Filter) -> Result<BoxStream<'static, Result<Log>>> {
        let stream = self.web3.eth_subscribe().subscribe_logs(filter).await?;
        debug!("Log subscription {:?} established", stream.id());
        Ok(stream.map(|log| log.map_err(MarketplaceError::from)).boxed())
    }

    async fn logs(&self, filter: Filter) -> Result<Vec<Log>> {
        Ok(self.web3.eth().logs(filter).await?)
    }

    async fn call(&self, to: H160, data: Bytes) -> Result<Bytes> {
        Ok(self.web3.eth().call(call_request(to, data), None).await?)
    }

    async fn block_number(&self) -> Result<u64> {
        let number: U64 = self.web3.eth().block_number().await?;
        Ok(number.as_u64())
    }
}

/// HTTP client (queries and calls only)
#[derive(Clone)]
pub struct HttpClient {
    web3: Web3<Http>,
}

impl HttpClient {
    pub fn new(url: &str) -> Result<Self> {
        debug!("Using HTTP endpoint {}", url);
        let transport = Http::new(url)?;
        Ok(Self {
            web3: Web3::new(transport),
        })
    }
}

#[async_trait]
impl ChainClient for HttpClient {
    fn transport_name(&self) -> &'static str {
        "http"
    }

    async fn logs(&self, filter: Filter) -> Result<Vec<Log>> {
        Ok(self.web3.eth().logs(filter).await?)
    }

    async fn call(&self, to: H160, data: Bytes) -> Result<Bytes> {
        Ok(self.web3.eth().call(call_request(to, data), None).await?)
    }

    async fn block_number(&self) -> Result<u64> {
        let number: U64 = self.web3.eth().block_number().await?;
        Ok(number.as_u64())
    }
}
