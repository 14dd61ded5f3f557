//! Request and Response models for the cache server API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies, for both
//! the client-facing surface and the primary-to-replica surface.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{ApplyRequest, PutRequest};
pub use responses::{
    ApplyResponse, DeleteResponse, GetResponse, HealthResponse, PutResponse, StatsResponse,
};
