//! Vault store implementations.
//!
//! The coordination core ships one reference implementation: an in-memory
//! vault used by tests and by downstream consumers as a stand-in for a real
//! secure-storage subsystem.

pub mod memory;
