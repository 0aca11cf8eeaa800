//! Client registration and lookup.

pub mod registration;

pub use registration::ClientRegistry;
