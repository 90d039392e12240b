//! Authentication primitives.
//!
//! Session issuance lives outside this service; the API only validates
//! bearer tokens it is handed.
//!
//! - [`jwt`] -- JWT access-token validation.

pub mod jwt;
