//! Reconciles a verified federated profile with the identity store.
//!
//! The normalised email is the merge key. A profile resolves to exactly one
//! identity, and the branch taken is reported as a [`MergeOutcome`].

use crate::{
    AuthError, AuthMetrics, Result as AuthErrorResult, RetryPolicy, with_retry,
};

use kg_core::{AuthProvider, FederatedProfile, Identity, IdentityStore, StoreError, normalize_email};

use std::panic::Location;
use std::sync::Arc;

use error_location::ErrorLocation;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeOutcome {
    /// No identity had this email; a federated-only identity was created
    Created,
    /// A password identity was linked to the federated login
    Linked,
    /// A returning federated user
    Updated,
}

impl MergeOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Linked => "linked",
            Self::Updated => "updated",
        }
    }
}

impl std::fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct MergeResolution {
    pub identity: Identity,
    pub outcome: MergeOutcome,
}

pub struct IdentityMergeResolver {
    store: Arc<dyn IdentityStore>,
    retry: RetryPolicy,
    metrics: AuthMetrics,
}

impl IdentityMergeResolver {
    pub fn new(store: Arc<dyn IdentityStore>, retry: RetryPolicy) -> Self {
        Self {
            store,
            retry,
            metrics: AuthMetrics::new(),
        }
    }

    pub async fn resolve(&self, profile: &FederatedProfile) -> AuthErrorResult<MergeResolution> {
        let Some(email) = profile.usable_email() else {
            return Err(AuthError::FederatedLoginRejected {
                message: String::from("Identity provider did not supply an email address"),
                location: ErrorLocation::from(Location::caller()),
            });
        };
        if profile.provider_id.trim().is_empty() {
            return Err(AuthError::FederatedLoginRejected {
                message: String::from("Identity provider did not supply a subject id"),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        let email = normalize_email(email);
        let email_ref = email.as_str();

        let result: AuthErrorResult<MergeResolution> =
            with_retry(&self.retry, "resolve_federated_identity", || async move {
                self.resolve_once(profile, email_ref).await
            })
            .await;
        let resolution = result?;

        self.metrics.federated_login(resolution.outcome.as_str());
        info!(
            "Federated login resolved to identity {} ({})",
            resolution.identity.id, resolution.outcome
        );

        Ok(resolution)
    }

    async fn resolve_once(
        &self,
        profile: &FederatedProfile,
        email: &str,
    ) -> AuthErrorResult<MergeResolution> {
        let existing = match self.store.find_by_email(email).await? {
            Some(identity) => identity,
            None => match self.store.insert(&Identity::new_federated(profile, email)).await {
                Ok(identity) => {
                    return Ok(MergeResolution {
                        identity,
                        outcome: MergeOutcome::Created,
                    });
                }
                Err(StoreError::DuplicateEmail { .. }) => {
                    debug!("Concurrent creation for a federated email, merging into the winner");
                    self.store.find_by_email(email).await?.ok_or_else(|| {
                        StoreError::Backend {
                            message: String::from("identity missing after duplicate email"),
                            location: ErrorLocation::from(Location::caller()),
                        }
                    })?
                }
                Err(e) => return Err(e.into()),
            },
        };

        match existing.auth_provider {
            AuthProvider::Local => self.link(existing, profile).await,
            AuthProvider::Federated | AuthProvider::Both => {
                self.refresh_returning(existing, profile).await
            }
        }
    }

    async fn link(
        &self,
        mut identity: Identity,
        profile: &FederatedProfile,
    ) -> AuthErrorResult<MergeResolution> {
        Self::adopt_provider_id(&mut identity, profile);
        identity.auth_provider = AuthProvider::Both;
        identity.email_verified = true;
        if identity.picture_url.is_none() {
            identity.picture_url = profile.picture_url.clone();
        }
        identity.touch();

        let identity = self.store.save(&identity).await?;
        Ok(MergeResolution {
            identity,
            outcome: MergeOutcome::Linked,
        })
    }

    async fn refresh_returning(
        &self,
        mut identity: Identity,
        profile: &FederatedProfile,
    ) -> AuthErrorResult<MergeResolution> {
        let mut changed = Self::adopt_provider_id(&mut identity, profile);

        if let Some(ref picture) = profile.picture_url
            && identity.picture_url.as_deref() != Some(picture.as_str())
        {
            identity.picture_url = Some(picture.clone());
            changed = true;
        }

        if !identity.email_verified {
            identity.email_verified = true;
            changed = true;
        }

        let identity = if changed {
            identity.touch();
            self.store.save(&identity).await?
        } else {
            identity
        };

        Ok(MergeResolution {
            identity,
            outcome: MergeOutcome::Updated,
        })
    }

    /// Set the provider id if none is stored. A different stored value is kept.
    fn adopt_provider_id(identity: &mut Identity, profile: &FederatedProfile) -> bool {
        match identity.federated_provider_id {
            None => {
                identity.federated_provider_id = Some(profile.provider_id.clone());
                true
            }
            Some(ref stored) if *stored != profile.provider_id => {
                warn!(
                    "Identity {} is already linked to a different provider id; keeping the stored one",
                    identity.id
                );
                false
            }
            Some(_) => false,
        }
    }
}
