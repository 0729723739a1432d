//! Core types and utilities for the Mochimo mesh SDK.
//!
//! This crate provides foundational types used across the wallet SDK:
//!
//! - [`Network`] -- Mochimo network identifier (Mainnet, Testnet)
//! - [`types`] -- the Rosetta-style data model exchanged with a mesh node
//! - [`wire`] -- the fixed positional byte layout of a signed transaction

pub mod types;
pub mod wire;

pub use types::{
    AccountIdentifier, AccountMetadata, Amount, Block, BlockIdentifier, Currency,
    NetworkIdentifier, Operation, OperationIdentifier, PublicKey, Signature, SigningPayload,
    Transaction, TransactionIdentifier,
};
pub use wire::{SignedTransaction, WireError};

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// Mochimo network identifier.
///
/// Determines the `network_identifier` string sent with every mesh API
/// request and which API endpoint the wallet communicates with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    /// Mochimo mainnet.
    Mainnet,

    /// Mochimo testnet.
    Testnet,
}

impl Network {
    /// The `network` string used in [`types::NetworkIdentifier`].
    pub const fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }
}
