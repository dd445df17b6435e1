// SPDX-License-Identifier: MPL-2.0
//! Application layer - ports and read-side queries.
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//! - [`query`]: Pure queries over catalog snapshots
//!
//! # Dependency Rule
//!
//! - Application layer depends on the domain layer
//! - Infrastructure implements application ports
//! - Gallery, navigation and player state use ports and queries

pub mod port;
pub mod query;
