//! Ambient plumbing shared by Booknet services.
//!
//! Configuration loading, tracing init, request-id middleware and health probes.

pub mod config;
pub mod health;
pub mod middleware;
pub mod tracing;
