//! In-memory storage implementations
//!
//! Suitable for development and testing. Contents are lost on restart.

mod clients;

pub use clients::MemoryClientStore;
