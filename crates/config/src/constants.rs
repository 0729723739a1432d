//! Mochimo protocol constants.
//!
//! These constants define ledger-level parameters shared by the transport
//! and the transfer pipeline.

/// Native currency symbol.
pub const CURRENCY_SYMBOL: &str = "MCM";

/// Decimal places of the atomic unit (1 MCM = 10^9 nanoMCM).
pub const CURRENCY_DECIMALS: u32 = 9;

/// Signature-scheme tag used in `curve_type` and `signature_type` fields.
pub const SIGNATURE_SCHEME: &str = "wotsp";

/// Operation type for value movement between accounts.
pub const OP_TRANSFER: &str = "TRANSFER";

/// Operation type for the fee leg.
pub const OP_FEE: &str = "FEE";

/// Account address the fee operation is addressed to.
///
/// The ledger's convention for fee-burn is an empty address string.
/// Whether the node treats this as "burn to network" or expects a
/// specific sentinel is a node-side decision, so it lives here as a
/// constant rather than inside the pipeline.
pub const FEE_ACCOUNT_ADDRESS: &str = "";

/// Default connection timeout in milliseconds.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;

/// Default request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
