//! API request handlers.

/// A2A JSON-RPC endpoint and agent card.
pub mod a2a;
/// Liveness and API documentation.
pub mod health;
/// REST research endpoint.
pub mod research;
