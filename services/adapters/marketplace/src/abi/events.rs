//! Marketplace event decoding
//!
//! Maps a raw log onto a typed record: the log's topic 0 selects the event
//! schema, ethabi parses the arguments, and the record is built field by field
//! from the positional arguments. Every record keeps a [`LogRef`] back to the
//! log it came from.

use std::collections::HashMap;
use std::sync::Arc;

use ethabi::{Contract, Event, RawLog, Token};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use web3::types::{Bytes, Log, H160, H256, U256};

use super::MarketplaceVersion;

/// Error types for ABI decoding
#[derive(Debug, thiserror::Error)]
pub enum DecodingError {
    #[error("Unknown event signature: {0}")]
    UnknownEventSignature(String),

    #[error("Expected {expected} event, got {actual}")]
    UnexpectedEvent {
        expected: &'static str,
        actual: String,
    },

    #[error("Event {event} is not part of the {version} contract")]
    UnknownEvent {
        event: String,
        version: MarketplaceVersion,
    },

    #[error("Record for the {expected} contract decoded with a {actual} decoder")]
    VersionMismatch {
        expected: MarketplaceVersion,
        actual: MarketplaceVersion,
    },

    #[error("ABI parsing failed: {0}")]
    AbiParsingError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Field {field} is not a {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },

    #[error("Unknown marketplace version: {0}")]
    UnknownVersion(String),
}

/// Reference to the log a record was decoded from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRef {
    pub address: H160,
    pub block_number: Option<u64>,
    pub block_hash: Option<H256>,
    pub transaction_hash: Option<H256>,
    pub transaction_index: Option<u64>,
    pub log_index: Option<U256>,
    pub removed: bool,
}

impl From<&Log> for LogRef {
    fn from(log: &Log) -> Self {
        Self {
            address: log.address,
            block_number: log.block_number.map(|n| n.as_u64()),
            block_hash: log.block_hash,
            transaction_hash: log.transaction_hash,
            transaction_index: log.transaction_index.map(|i| i.as_u64()),
            log_index: log.log_index,
            removed: log.removed.unwrap_or(false),
        }
    }
}

/// Positional arguments of one decoded event (or one function return value)
///
/// Getters take the argument position; the argument name is only used in
/// error messages.
#[derive(Debug, Clone)]
pub struct EventArgs {
    event: String,
    names: Vec<String>,
    values: Vec<Token>,
    log: Option<LogRef>,
}

impl EventArgs {
    pub fn new(event: impl Into<String>, names: Vec<String>, values: Vec<Token>) -> Self {
        Self {
            event: event.into(),
            names,
            values,
            log: None,
        }
    }

    /// Arguments without names, e.g. the return tokens of a contract call
    pub fn from_tokens(context: impl Into<String>, values: Vec<Token>) -> Self {
        let names = (0..values.len()).map(|i| format!("#{}", i)).collect();
        Self::new(context, names, values)
    }

    pub fn with_log(mut self, log: LogRef) -> Self {
        self.log = Some(log);
        self
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn log(&self) -> Option<LogRef> {
        self.log.clone()
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.values
    }

    fn field_name(&self, index: usize) -> String {
        match self.names.get(index) {
            Some(name) => format!("{}.{}", self.event, name),
            None => format!("{}[{}]", self.event, index),
        }
    }

    fn token(&self, index: usize) -> Result<&Token, DecodingError> {
        self.values
            .get(index)
            .ok_or_else(|| DecodingError::MissingField(self.field_name(index)))
    }

    fn mismatch(&self, index: usize, expected: &'static str) -> DecodingError {
        DecodingError::TypeMismatch {
            field: self.field_name(index),
            expected,
        }
    }

    pub fn uint(&self, index: usize) -> Result<U256, DecodingError> {
        self.token(index)?
            .clone()
            .into_uint()
            .ok_or_else(|| self.mismatch(index, "uint256"))
    }

    pub fn address(&self, index: usize) -> Result<H160, DecodingError> {
        self.token(index)?
            .clone()
            .into_address()
            .ok_or_else(|| self.mismatch(index, "address"))
    }

    pub fn boolean(&self, index: usize) -> Result<bool, DecodingError> {
        self.token(index)?
            .clone()
            .into_bool()
            .ok_or_else(|| self.mismatch(index, "bool"))
    }

    pub fn string(&self, index: usize) -> Result<String, DecodingError> {
        self.token(index)?
            .clone()
            .into_string()
            .ok_or_else(|| self.mismatch(index, "string"))
    }

    pub fn uint_array(&self, index: usize) -> Result<Vec<U256>, DecodingError> {
        self.array(index, "uint256[]", Token::into_uint)
    }

    pub fn address_array(&self, index: usize) -> Result<Vec<H160>, DecodingError> {
        self.array(index, "address[]", Token::into_address)
    }

    pub fn string_array(&self, index: usize) -> Result<Vec<String>, DecodingError> {
        self.array(index, "string[]", Token::into_string)
    }

    fn array<T>(
        &self,
        index: usize,
        expected: &'static str,
        convert: fn(Token) -> Option<T>,
    ) -> Result<Vec<T>, DecodingError> {
        let items = self
            .token(index)?
            .clone()
            .into_array()
            .ok_or_else(|| self.mismatch(index, expected))?;

        items
            .into_iter()
            .map(|item| convert(item).ok_or_else(|| self.mismatch(index, expected)))
            .collect()
    }

    /// Components of a tuple argument
    pub fn tuple(&self, index: usize) -> Result<EventArgs, DecodingError> {
        let components = self
            .token(index)?
            .clone()
            .into_tuple()
            .ok_or_else(|| self.mismatch(index, "tuple"))?;
        Ok(EventArgs::from_tokens(self.field_name(index), components))
    }

    /// Components of every element of a tuple-array argument
    pub fn tuple_array(&self, index: usize) -> Result<Vec<EventArgs>, DecodingError> {
        let items = self
            .token(index)?
            .clone()
            .into_array()
            .ok_or_else(|| self.mismatch(index, "tuple[]"))?;

        let name = self.field_name(index);
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                item.into_tuple()
                    .map(|components| EventArgs::from_tokens(format!("{}[{}]", name, i), components))
                    .ok_or_else(|| self.mismatch(index, "tuple[]"))
            })
            .collect()
    }
}

/// A typed record built from one contract event
pub trait MarketplaceEvent: Sized + Send + 'static {
    /// Contract generation that emits the event
    const VERSION: MarketplaceVersion;
    /// Solidity event name
    const EVENT_NAME: &'static str;

    fn from_args(args: EventArgs) -> Result<Self, DecodingError>;
}

/// Per-version event decoder
///
/// Holds the ethabi event definitions of one contract version, indexed by
/// name and by topic 0.
#[derive(Debug, Clone)]
pub struct EventDecoder {
    version: MarketplaceVersion,
    events: HashMap<String, Event>,
    topics: HashMap<H256, String>,
}

static DECODERS: Lazy<[Arc<EventDecoder>; 3]> = Lazy::new(|| {
    [
        Arc::new(EventDecoder::new(MarketplaceVersion::V1)),
        Arc::new(EventDecoder::new(MarketplaceVersion::V2)),
        Arc::new(EventDecoder::new(MarketplaceVersion::V3)),
    ]
});

impl EventDecoder {
    /// Decoder over the built-in schema table of a version
    pub fn new(version: MarketplaceVersion) -> Self {
        Self::from_events(version, version.events().iter().map(|schema| schema.event()))
    }

    /// Shared decoder over the built-in schema table
    pub fn for_version(version: MarketplaceVersion) -> Arc<Self> {
        let index = match version {
            MarketplaceVersion::V1 => 0,
            MarketplaceVersion::V2 => 1,
            MarketplaceVersion::V3 => 2,
        };
        Arc::clone(&DECODERS[index])
    }

    /// Decoder over a deployed contract's ABI JSON
    ///
    /// Events are matched to records by name, so the ABI must use the same
    /// event names and argument order as the built-in table.
    pub fn from_abi_json(version: MarketplaceVersion, json: &[u8]) -> Result<Self, DecodingError> {
        let contract =
            Contract::load(json).map_err(|e| DecodingError::AbiParsingError(e.to_string()))?;

        let events: Vec<Event> = contract
            .events
            .into_values()
            .filter_map(|overloads| overloads.into_iter().next())
            .collect();

        Ok(Self::from_events(version, events))
    }

    fn from_events(version: MarketplaceVersion, events: impl IntoIterator<Item = Event>) -> Self {
        let mut by_name = HashMap::new();
        let mut topics = HashMap::new();
        for event in events {
            topics.insert(event.signature(), event.name.clone());
            by_name.insert(event.name.clone(), event);
        }

        Self {
            version,
            events: by_name,
            topics,
        }
    }

    pub fn version(&self) -> MarketplaceVersion {
        self.version
    }

    pub fn event(&self, name: &str) -> Result<&Event, DecodingError> {
        self.events.get(name).ok_or_else(|| DecodingError::UnknownEvent {
            event: name.to_string(),
            version: self.version,
        })
    }

    /// Topic 0 of a named event
    pub fn signature(&self, name: &str) -> Result<H256, DecodingError> {
        Ok(self.event(name)?.signature())
    }

    /// Name of the event a log belongs to, if it is one of ours
    pub fn event_name(&self, log: &Log) -> Option<&str> {
        log.topics
            .first()
            .and_then(|topic| self.topics.get(topic))
            .map(String::as_str)
    }

    /// Parse a log of the named event into positional arguments
    pub fn parse(&self, name: &'static str, log: &Log) -> Result<EventArgs, DecodingError> {
        let event = self.event(name)?;

        let topic = log
            .topics
            .first()
            .ok_or_else(|| DecodingError::UnknownEventSignature("<no topics>".to_string()))?;
        if *topic != event.signature() {
            return Err(DecodingError::UnexpectedEvent {
                expected: name,
                actual: self
                    .topics
                    .get(topic)
                    .cloned()
                    .unwrap_or_else(|| format!("{:?}", topic)),
            });
        }

        let raw_log = RawLog {
            topics: log.topics.clone(),
            data: log.data.0.clone(),
        };
        let decoded = event
            .parse_log(raw_log)
            .map_err(|e| DecodingError::AbiParsingError(e.to_string()))?;

        let (names, values): (Vec<String>, Vec<Token>) = decoded
            .params
            .into_iter()
            .map(|param| (param.name, param.value))
            .unzip();

        Ok(EventArgs::new(name, names, values).with_log(LogRef::from(log)))
    }

    /// Decode a log into the record type `E`
    pub fn decode<E: MarketplaceEvent>(&self, log: &Log) -> Result<E, DecodingError> {
        if E::VERSION != self.version {
            return Err(DecodingError::VersionMismatch {
                expected: E::VERSION,
                actual: self.version,
            });
        }

        let args = self.parse(E::EVENT_NAME, log)?;
        E::from_args(args)
    }

    /// Build a log carrying the given argument values
    ///
    /// Indexed arguments become topics, the rest are ABI-encoded into the
    /// data field. This is the inverse of [`EventDecoder::parse`] and is used
    /// to build fixtures and replay recorded events.
    pub fn encode_log(
        &self,
        name: &str,
        address: H160,
        values: Vec<Token>,
    ) -> Result<Log, DecodingError> {
        let event = self.event(name)?;
        if values.len() != event.inputs.len() {
            return Err(DecodingError::MissingField(format!(
                "{}: expected {} arguments, got {}",
                name,
                event.inputs.len(),
                values.len()
            )));
        }

        let mut topics = vec![event.signature()];
        let mut data = Vec::new();
        for (input, value) in event.inputs.iter().zip(values) {
            if input.indexed {
                let word = ethabi::encode(&[value]);
                topics.push(H256::from_slice(&word[..32]));
            } else {
                data.push(value);
            }
        }

        Ok(Log {
            address,
            topics,
            data: Bytes(ethabi::encode(&data)),
            block_hash: None,
            block_number: None,
            transaction_hash: None,
            transaction_index: None,
            log_index: None,
            transaction_log_index: None,
            log_type: None,
            removed: None,
        })
    }
}
