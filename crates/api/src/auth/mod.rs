//! Authentication primitives.
//!
//! - [`jwt`] -- JWT access-token generation and validation.
//!
//! Tokens are minted by the session service that shares `JWT_SECRET` with
//! this API; here they are only validated to attribute requests to a user.

pub mod jwt;
