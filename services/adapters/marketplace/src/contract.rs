//! Contract handle shared by the version facades
//!
//! Binds an address, a version's [`EventDecoder`] and a [`ChainClient`], and
//! turns the client's raw logs into typed records.

use std::sync::Arc;

use ethabi::Token;
use futures_util::stream::{BoxStream, StreamExt};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use web3::types::{BlockNumber, Bytes, Filter, FilterBuilder, Log, H160};

use crate::abi::{EventDecoder, MarketplaceEvent, MarketplaceVersion};
use crate::client::ChainClient;
use crate::error::{MarketplaceError, Result};

/// One deployed marketplace contract
pub struct MarketplaceContract<C> {
    client: Arc<C>,
    address: H160,
    decoder: Arc<EventDecoder>,
}

impl<C> Clone for MarketplaceContract<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            address: self.address,
            decoder: Arc::clone(&self.decoder),
        }
    }
}

impl<C: ChainClient> MarketplaceContract<C> {
    pub fn new(client: Arc<C>, address: H160, version: MarketplaceVersion) -> Self {
        Self::with_decoder(client, address, EventDecoder::for_version(version))
    }

    /// Use a custom decoder, e.g. one loaded with [`EventDecoder::from_abi_json`]
    pub fn with_decoder(client: Arc<C>, address: H160, decoder: Arc<EventDecoder>) -> Self {
        Self {
            client,
            address,
            decoder,
        }
    }

    pub fn address(&self) -> H160 {
        self.address
    }

    pub fn version(&self) -> MarketplaceVersion {
        self.decoder.version()
    }

    pub fn decoder(&self) -> &EventDecoder {
        &self.decoder
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// Log filter for `E` emitted by this contract
    pub fn filter<E: MarketplaceEvent>(
        &self,
        from_block: Option<BlockNumber>,
        to_block: Option<BlockNumber>,
    ) -> Result<Filter> {
        let signature = self.decoder.signature(E::EVENT_NAME)?;

        let mut builder = FilterBuilder::default()
            .address(vec![self.address])
            .topics(Some(vec![signature]), None, None, None);
        if let Some(from_block) = from_block {
            builder = builder.from_block(from_block);
        }
        if let Some(to_block) = to_block {
            builder = builder.to_block(to_block);
        }

        Ok(builder.build())
    }

    /// Decode one log into `E`
    pub fn decode<E: MarketplaceEvent>(&self, log: &Log) -> Result<E> {
        Ok(self.decoder.decode::<E>(log)?)
    }

    /// Live stream of decoded `E` records
    ///
    /// Items that fail to decode are yielded as [`MarketplaceError::Decoding`]
    /// and the stream continues; transport errors are yielded as-is.
    pub async fn subscribe<E: MarketplaceEvent>(&self) -> Result<BoxStream<'static, Result<E>>> {
        let filter = self.filter::<E>(None, None)?;
        let logs = self.client.subscribe_logs(filter).await?;
        info!(
            event = E::EVENT_NAME,
            version = %self.version(),
            "Subscribed to {:?}",
            self.address
        );

        let decoder = Arc::clone(&self.decoder);
        Ok(logs
            .map(move |log| -> Result<E> {
                let log = log?;
                let record = decoder.decode::<E>(&log)?;
                debug!(event = E::EVENT_NAME, block = ?log.block_number, "Decoded event");
                Ok(record)
            })
            .boxed())
    }

    /// Deliver every future `E` to `callback` from a background task
    pub async fn on<E, F>(&self, callback: F) -> Result<JoinHandle<()>>
    where
        E: MarketplaceEvent,
        F: FnMut(E) + Send + 'static,
    {
        let stream = self.subscribe::<E>().await?;
        Ok(spawn_listener(E::EVENT_NAME, stream, callback))
    }

    /// Decoded `E` records in a block range (inclusive)
    ///
    /// Logs that fail to decode are logged and skipped.
    pub async fn query<E: MarketplaceEvent>(
        &self,
        from_block: BlockNumber,
        to_block: BlockNumber,
    ) -> Result<Vec<E>> {
        let filter = self.filter::<E>(Some(from_block), Some(to_block))?;
        let logs = self.client.logs(filter).await?;
        debug!(event = E::EVENT_NAME, logs = logs.len(), "Fetched historical logs");

        let mut records = Vec::with_capacity(logs.len());
        for log in &logs {
            match self.decode::<E>(log) {
                Ok(record) => records.push(record),
                Err(e) => warn!(event = E::EVENT_NAME, error = %e, "Skipping undecodable log"),
            }
        }
        Ok(records)
    }

    /// Read-only call through the version's function table
    pub async fn call(&self, function_name: &str, args: &[Token]) -> Result<Vec<Token>> {
        let version = self.version();
        let schema =
            version
                .function_schema(function_name)
                .ok_or_else(|| MarketplaceError::UnknownFunction {
                    function: function_name.to_string(),
                    version,
                })?;

        let function = schema.function();
        let data = function.encode_input(args)?;
        let output = self.client.call(self.address, Bytes(data)).await?;
        Ok(function.decode_output(&output.0)?)
    }
}

/// Drive `stream` into `callback` on a tokio task
///
/// Undecodable items are skipped with a warning. The task ends on the first
/// transport error or when the stream closes.
pub fn spawn_listener<T, F>(
    name: &'static str,
    mut stream: BoxStream<'static, Result<T>>,
    mut callback: F,
) -> JoinHandle<()>
where
    T: Send + 'static,
    F: FnMut(T) + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(item) = stream.next().await {
            match item {
                Ok(record) => callback(record),
                Err(MarketplaceError::Decoding(e)) => {
                    warn!(event = name, error = %e, "Skipping undecodable log");
                }
                Err(e) => {
                    error!(event = name, error = %e, "Subscription failed");
                    break;
                }
            }
        }
        debug!(event = name, "Listener stopped");
    })
}

/// Parse a `0x`-prefixed (or bare) 20-byte hex address
pub fn parse_address(value: &str) -> Result<H160> {
    let digits = value.trim().trim_start_matches("0x");
    let bytes =
        hex::decode(digits).map_err(|_| MarketplaceError::InvalidAddress(value.to_string()))?;
    if bytes.len() != 20 {
        return Err(MarketplaceError::InvalidAddress(value.to_string()));
    }
    Ok(H160::from_slice(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::DecodingError;
    use futures_util::stream;
    use std::sync::Mutex;

    #[test]
    fn test_parse_address() {
        let address = parse_address("0x6125fD14b6790d5F66509B7aa53274c93dAE70B9").unwrap();
        assert_eq!(address.as_bytes()[0], 0x61);
        assert_eq!(parse_address("6125fd14b6790d5f66509b7aa53274c93dae70b9").unwrap(), address);

        assert!(matches!(parse_address("0x1234"), Err(MarketplaceError::InvalidAddress(_))));
        assert!(matches!(parse_address("0xzz"), Err(MarketplaceError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn test_listener_skips_decoding_errors_and_stops_on_transport_error() {
        let items: Vec<Result<u32>> = vec![
            Ok(1),
            Err(DecodingError::MissingField("NewBid.bid".to_string()).into()),
            Ok(2),
            Err(MarketplaceError::Rpc(web3::Error::Unreachable)),
            Ok(3),
        ];
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        spawn_listener("Test", stream::iter(items).boxed(), move |value| {
            sink.lock().unwrap().push(value)
        })
        .await
        .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }
}
