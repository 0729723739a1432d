//! SDK operations.
//!
//! Each operation drives a multi-step protocol against the mesh node.
//! Operations hold all multi-step state themselves; the transport below
//! them is stateless.

pub mod transfer;

pub use transfer::{TransferPipeline, TransferRequest};
