// SPDX-License-Identifier: MPL-2.0
//! Application-level plumbing: data/config directory resolution and the
//! small state persisted across process restarts.

pub mod paths;
pub mod persisted_state;
