//! authfront library crate.
//!
//! Provides a client credential registry and an authorization request
//! validator behind a small axum front door.

pub mod config;
pub mod errors;
pub mod http;
pub mod oauth;
pub mod storage;
