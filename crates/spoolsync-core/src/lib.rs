// SPDX-License-Identifier: MIT
//
// Spoolsync — core types and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod types;

pub use config::CoordinatorConfig;
pub use error::PrintError;
pub use types::*;
