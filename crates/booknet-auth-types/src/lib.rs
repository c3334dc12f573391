//! Auth types shared across Booknet services.
//!
//! Provides the JWT claims shape, token validation and the `BearerIdentity` extractor.

pub mod identity;
pub mod token;
