// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dwell-storage: scoped key-value persistence for tracker state

mod file;
mod kv;
mod memory;
mod repo;

#[cfg(any(test, feature = "test-support"))]
mod faulty;

pub use file::{FileStore, CURRENT_STORE_VERSION};
pub use kv::{KvStore, Scope, StoreError};
pub use memory::MemoryStore;
pub use repo::{keys, BoardRepo, ItemRepo, Versioned};

#[cfg(any(test, feature = "test-support"))]
pub use faulty::FaultyStore;
