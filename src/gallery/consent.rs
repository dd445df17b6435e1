// SPDX-License-Identifier: MPL-2.0
//! Consent-gated catalog mutations.
//!
//! A rename or delete may be rejected until the user grants one-time consent.
//! The rejection is surfaced as [`MutationOutcome::NeedsConsent`] carrying a
//! [`PendingConsent`]. Resolving it consumes it, so the identical mutation is
//! retried at most once and only after a successful grant.

use super::run_catalog;
use crate::application::port::MediaCatalog;
use crate::domain::media::VideoId;
use crate::error::{CatalogError, GrantToken};
use std::fmt;
use std::sync::Arc;

/// A mutating catalog operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Rename { id: VideoId, new_name: String },
    Delete { id: VideoId },
}

impl Mutation {
    fn apply(&self, catalog: &dyn MediaCatalog) -> Result<(), CatalogError> {
        match self {
            Mutation::Rename { id, new_name } => catalog.rename(*id, new_name),
            Mutation::Delete { id } => catalog.delete(*id),
        }
    }
}

/// Result of a gallery mutation.
#[derive(Debug)]
pub enum MutationOutcome {
    Done,
    Failed(CatalogError),
    /// The catalog wants user consent before this mutation can run.
    NeedsConsent(PendingConsent),
    /// The user declined consent.
    Abandoned,
}

impl MutationOutcome {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        matches!(self, MutationOutcome::Done)
    }
}

/// A mutation waiting on the consent flow.
pub struct PendingConsent {
    catalog: Arc<dyn MediaCatalog>,
    token: GrantToken,
    mutation: Mutation,
}

impl fmt::Debug for PendingConsent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingConsent")
            .field("token", &self.token)
            .field("mutation", &self.mutation)
            .finish_non_exhaustive()
    }
}

impl PendingConsent {
    /// Token to hand to the platform consent flow.
    #[must_use]
    pub fn token(&self) -> &GrantToken {
        &self.token
    }

    #[must_use]
    pub fn mutation(&self) -> &Mutation {
        &self.mutation
    }

    /// Completes the consent flow.
    ///
    /// When `granted`, the grant is applied and the mutation retried exactly
    /// once; a second consent rejection is reported as a failure rather than
    /// prompting again. When declined, the mutation is dropped and the
    /// catalog forgets the request.
    pub async fn resolve(self, granted: bool) -> MutationOutcome {
        if !granted {
            log::debug!("consent declined for {:?}", self.mutation);
            self.catalog.decline(&self.token);
            return MutationOutcome::Abandoned;
        }

        let PendingConsent {
            catalog,
            token,
            mutation,
        } = self;
        log::info!("consent granted, retrying {:?}", mutation);
        let result = run_catalog(&catalog, move |catalog| {
            catalog.grant(&token)?;
            mutation.apply(catalog)
        })
        .await;

        match result {
            Ok(()) => MutationOutcome::Done,
            Err(err) => {
                log::warn!("mutation failed after consent: {}", err);
                MutationOutcome::Failed(err)
            }
        }
    }
}

/// Runs `mutation` against the catalog on the blocking pool.
pub async fn perform(catalog: &Arc<dyn MediaCatalog>, mutation: Mutation) -> MutationOutcome {
    let attempt = mutation.clone();
    match run_catalog(catalog, move |catalog| attempt.apply(catalog)).await {
        Ok(()) => MutationOutcome::Done,
        Err(CatalogError::ConsentRequired(token)) => {
            log::debug!("{:?} needs consent (request {})", mutation, token.request_id());
            MutationOutcome::NeedsConsent(PendingConsent {
                catalog: Arc::clone(catalog),
                token,
                mutation,
            })
        }
        Err(err) => {
            log::warn!("{:?} failed: {}", mutation, err);
            MutationOutcome::Failed(err)
        }
    }
}
