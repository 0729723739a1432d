//! HTTP/JSON transport for the Mochimo mesh Construction API.
//!
//! Provides [`MeshClient`] -- a stateless, typed client wrapping each
//! remote procedure of the mesh node's construction protocol. One POST
//! per call, no retries, no caching. The client is safe for concurrent
//! use by multiple pipelines: all methods take `&self` and the only
//! state is the base URL and network identifier fixed at construction.

pub mod http;
pub mod types;

pub use http::{MeshClient, MeshConfig, MeshError};
