//! Port definitions (hexagonal architecture interfaces)
//!
//! Ports are interfaces that the domain services depend on, but whose
//! implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IKeyValueStore`] - The persistence capability holding the serialized
//!   loan list and audit log under string keys

pub mod key_value_store;

pub use key_value_store::IKeyValueStore;
