// SPDX-License-Identifier: MPL-2.0
//! Storage permission gating.
//!
//! Catalog-dependent screens stay blocked until the storage permission is
//! granted. The first denial asks for a rationale dialog; a second denial in
//! a row sends the user to the system settings instead.

use crate::error::CatalogError;

/// What the gate asks the UI to show next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionPrompt {
    /// Permission is granted; nothing to show.
    None,
    /// Explain why access is needed and offer to ask again.
    Rationale,
    /// The platform will not prompt again; route to system settings.
    OpenSettings,
}

/// Tracks consecutive permission results.
#[derive(Debug, Clone, Default)]
pub struct PermissionGate {
    granted: bool,
    consecutive_denials: u32,
}

impl PermissionGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_granted(&self) -> bool {
        self.granted
    }

    /// Records a permission result and returns the prompt to show.
    pub fn on_result(&mut self, granted: bool) -> PermissionPrompt {
        self.granted = granted;
        if granted {
            self.consecutive_denials = 0;
            return PermissionPrompt::None;
        }
        self.consecutive_denials = self.consecutive_denials.saturating_add(1);
        if self.consecutive_denials >= 2 {
            PermissionPrompt::OpenSettings
        } else {
            PermissionPrompt::Rationale
        }
    }

    /// Feeds a failed catalog query into the gate.
    ///
    /// Only [`CatalogError::PermissionDenied`] counts as a denial; other
    /// errors leave the gate untouched and yield `None`.
    pub fn on_query_error(&mut self, error: &CatalogError) -> Option<PermissionPrompt> {
        matches!(error, CatalogError::PermissionDenied).then(|| self.on_result(false))
    }
}
