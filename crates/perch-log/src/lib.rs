//! Read-only clients for transparency logs.
//!
//! Three layouts are supported, each behind the [`LogClient`] trait:
//!
//! - [`TilesLogClient`]: tlog-tiles entry bundles of up to 256 leaves.
//! - [`ServerlessLogClient`]: one file per leaf under `seq/`.
//! - [`SumDbLogClient`]: checksum-database data tiles, `/latest` checkpoint.
//!
//! The path arithmetic and bundle decoding live in [`layout`] as pure
//! functions. [`LogRegistry`] holds the logs a session may switch between.

mod client;
mod error;
pub mod layout;
mod registry;
mod serverless;
mod sumdb;
mod tiles;


pub use client::{LogClient, LogConfig, build_client};
pub use error::LogError;
pub use registry::LogRegistry;
pub use serverless::ServerlessLogClient;
pub use sumdb::SumDbLogClient;
pub use tiles::TilesLogClient;
