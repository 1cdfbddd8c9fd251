//! ABI definitions and event decoding for the marketplace contracts
//!
//! This module provides:
//! - One schema table per contract version (event name -> ordered fields)
//! - ethabi `Event`/`Function` construction from those tables
//! - The shared decoder that maps a raw log onto a typed record
//!
//! # Supported Versions
//! - V1: single-NFT listings with listing tuples and collection offers
//! - V2: bundle sales with ratio-prorated prices
//! - V3: bundle sales with offers and start-time updates

pub mod events;
pub mod v1;
pub mod v2;
pub mod v3;

use std::fmt;
use std::str::FromStr;

use ethabi::{Event, EventParam, Function, Param, ParamType, StateMutability};
use serde::{Deserialize, Serialize};
use web3::types::H256;

pub use events::{DecodingError, EventArgs, EventDecoder, LogRef, MarketplaceEvent};

/// Marketplace contract generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketplaceVersion {
    V1,
    V2,
    V3,
}

impl MarketplaceVersion {
    pub const ALL: [MarketplaceVersion; 3] = [Self::V1, Self::V2, Self::V3];

    /// Event schema table for this version
    pub fn events(self) -> &'static [EventSchema] {
        match self {
            Self::V1 => v1::EVENTS,
            Self::V2 => v2::EVENTS,
            Self::V3 => v3::EVENTS,
        }
    }

    /// Read-only function table for this version
    pub fn functions(self) -> &'static [FunctionSchema] {
        match self {
            Self::V1 => v1::FUNCTIONS,
            Self::V2 => v2::FUNCTIONS,
            Self::V3 => v3::FUNCTIONS,
        }
    }

    pub fn event_schema(self, name: &str) -> Option<&'static EventSchema> {
        self.events().iter().find(|schema| schema.name == name)
    }

    pub fn function_schema(self, name: &str) -> Option<&'static FunctionSchema> {
        self.functions().iter().find(|schema| schema.name == name)
    }
}

impl fmt::Display for MarketplaceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
            Self::V3 => "v3",
        };
        f.write_str(label)
    }
}

impl FromStr for MarketplaceVersion {
    type Err = DecodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(Self::V1),
            "v2" | "2" => Ok(Self::V2),
            "v3" | "3" => Ok(Self::V3),
            other => Err(DecodingError::UnknownVersion(other.to_string())),
        }
    }
}

/// Solidity types used by the marketplace contracts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Address,
    Uint,
    Bool,
    String,
    AddressArray,
    UintArray,
    StringArray,
    Tuple(&'static [FieldSchema]),
    TupleArray(&'static [FieldSchema]),
}

impl FieldKind {
    pub fn param_type(&self) -> ParamType {
        match self {
            Self::Address => ParamType::Address,
            Self::Uint => ParamType::Uint(256),
            Self::Bool => ParamType::Bool,
            Self::String => ParamType::String,
            Self::AddressArray => ParamType::Array(Box::new(ParamType::Address)),
            Self::UintArray => ParamType::Array(Box::new(ParamType::Uint(256))),
            Self::StringArray => ParamType::Array(Box::new(ParamType::String)),
            Self::Tuple(fields) => tuple_type(fields),
            Self::TupleArray(fields) => ParamType::Array(Box::new(tuple_type(fields))),
        }
    }
}

fn tuple_type(fields: &[FieldSchema]) -> ParamType {
    ParamType::Tuple(fields.iter().map(|f| f.kind.param_type()).collect())
}

/// One positional argument of an event or function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    pub name: &'static str,
    pub kind: FieldKind,
    pub indexed: bool,
}

impl FieldSchema {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            indexed: false,
        }
    }

    pub const fn indexed(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            indexed: true,
        }
    }

    fn param(&self) -> Param {
        Param {
            name: self.name.to_string(),
            kind: self.kind.param_type(),
            internal_type: None,
        }
    }
}

/// Event name and its ordered arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventSchema {
    pub name: &'static str,
    pub fields: &'static [FieldSchema],
}

impl EventSchema {
    /// Build the ethabi event definition
    pub fn event(&self) -> Event {
        Event {
            name: self.name.to_string(),
            inputs: self
                .fields
                .iter()
                .map(|field| EventParam {
                    name: field.name.to_string(),
                    kind: field.kind.param_type(),
                    indexed: field.indexed,
                })
                .collect(),
            anonymous: false,
        }
    }

    /// keccak256 of the canonical signature (topic 0)
    pub fn signature(&self) -> H256 {
        self.event().signature()
    }

    /// Position of a named argument
    pub fn position(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == field)
    }
}

/// Read-only contract function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionSchema {
    pub name: &'static str,
    pub inputs: &'static [FieldSchema],
    pub outputs: &'static [FieldSchema],
}

impl FunctionSchema {
    #[allow(deprecated)]
    pub fn function(&self) -> Function {
        Function {
            name: self.name.to_string(),
            inputs: self.inputs.iter().map(FieldSchema::param).collect(),
            outputs: self.outputs.iter().map(FieldSchema::param).collect(),
            constant: None,
            state_mutability: StateMutability::View,
        }
    }
}

/// Topic-0 hashes of every event a version emits, for log subscriptions
pub fn get_all_event_signatures(version: MarketplaceVersion) -> Vec<String> {
    version
        .events()
        .iter()
        .map(|schema| crate::event_signatures::to_hex_string(schema.signature()))
        .collect()
}
