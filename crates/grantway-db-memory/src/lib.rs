//! In-memory storage backends for the grantway authorization engine.
//!
//! This crate provides in-memory implementations of the storage traits
//! from `grantway-auth`, using papaya lock-free HashMap for concurrent
//! access. Suitable for single-node deployments and tests; codes do not
//! survive a restart.
//!
//! # Example
//!
//! ```ignore
//! use grantway_db_memory::{InMemoryClientSecretStore, InMemoryCodeStore};
//!
//! let codes = InMemoryCodeStore::new();
//! let clients = InMemoryClientSecretStore::new();
//! clients.add(ClientSecretIdentity::new("client-1", "s3cret", vec![]));
//! ```

pub mod store;

pub use store::{InMemoryClientSecretStore, InMemoryCodeStore};
