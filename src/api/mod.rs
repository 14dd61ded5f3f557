//! API Module
//!
//! HTTP handlers and routing for both contract surfaces served by one
//! process: the client-facing cache API and the replica-facing apply
//! API. Which surfaces get traffic depends on the node's role, but the
//! router always exposes both.
//!
//! # Endpoints
//! - `PUT /set` - Store a key-value pair
//! - `GET /get/:key` - Retrieve a value by key
//! - `DELETE /del/:key` - Delete a key
//! - `POST /replicate` - Apply a mutation forwarded by a primary
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
