//! Mochimo network configuration.
//!
//! This crate provides static, per-network configuration for the mesh SDK:
//!
//! - [`NetworkConfig`] -- API endpoint and ledger identity for a given network
//! - [`constants`] -- protocol-level parameters (currency, operation types,
//!   signature-scheme tag, fee sentinel)
//!
//! All data is compile-time constant (`&'static str`). Zero heap
//! allocations. Types are `Copy`.
//!
//! `config` depends only on [`sdk_core::Network`]. It does **not** depend
//! on transport or any runtime crate, so it can be used freely as a leaf
//! dependency.

pub mod constants;

use sdk_core::types::{Currency, NetworkIdentifier};
use sdk_core::Network;

// ---------------------------------------------------------------------------
// NetworkConfig
// ---------------------------------------------------------------------------

/// Network-specific configuration for a mesh API endpoint.
///
/// This is `Copy` -- just pointers to static data.
#[derive(Debug, Clone, Copy)]
pub struct NetworkConfig {
    /// The network this configuration is for.
    pub network: Network,

    /// Mesh API base URL, without a trailing slash.
    pub api_url: &'static str,

    /// The `blockchain` string sent in every `network_identifier`.
    pub blockchain: &'static str,
}

impl NetworkConfig {
    /// Get the configuration for a specific network.
    pub const fn for_network(network: Network) -> Self {
        match network {
            Network::Mainnet => Self::MAINNET,
            Network::Testnet => Self::TESTNET,
        }
    }

    /// Build the `network_identifier` body fragment for this network.
    pub fn network_identifier(&self) -> NetworkIdentifier {
        NetworkIdentifier {
            blockchain: self.blockchain.to_owned(),
            network: self.network.as_str().to_owned(),
        }
    }

    /// The native currency of this network.
    pub fn currency(&self) -> Currency {
        Currency {
            symbol: constants::CURRENCY_SYMBOL.to_owned(),
            decimals: constants::CURRENCY_DECIMALS,
        }
    }

    // -----------------------------------------------------------------------
    // Built-in network configurations
    // -----------------------------------------------------------------------

    /// Production mainnet configuration.
    pub const MAINNET: Self = Self {
        network: Network::Mainnet,
        api_url: "https://api.mochimo.org",
        blockchain: "mochimo",
    };

    /// Public testnet configuration.
    pub const TESTNET: Self = Self {
        network: Network::Testnet,
        api_url: "https://api-testnet.mochimo.org",
        blockchain: "mochimo",
    };
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
