//! Reads a subject's current grant from the resource policy.

use std::sync::Arc;

use resource_server_sdk::{IdentityService, PolicyStore, Resource};

use super::credentials::admin_credential;
use super::error::DomainError;
use super::scopes;

pub struct PolicyReader {
    identity: Arc<dyn IdentityService>,
    policies: Arc<dyn PolicyStore>,
}

impl PolicyReader {
    #[must_use]
    pub fn new(identity: Arc<dyn IdentityService>, policies: Arc<dyn PolicyStore>) -> Self {
        Self { identity, policies }
    }

    /// Scopes the policy of `resource` grants to `subject`.
    ///
    /// Empty when there is no owner, no subject, no registration or no
    /// policy. The first permission naming the subject wins.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the admin credential or the policy cannot be
    /// read.
    #[tracing::instrument(skip_all, fields(resource_uid = %resource.uid))]
    pub async fn read_grant(
        &self,
        resource: &Resource,
        subject: Option<&str>,
    ) -> Result<Vec<String>, DomainError> {
        let subject = match subject {
            Some(s) if !s.is_empty() => s,
            _ => return Ok(Vec::new()),
        };
        if resource.owner.is_empty() || resource.registration_id.is_empty() {
            return Ok(Vec::new());
        }

        let admin = admin_credential(self.identity.as_ref()).await?;
        let policy = self
            .policies
            .read(&resource.registration_id, &admin, &resource.owner)
            .await
            .map_err(DomainError::upstream("policy_read"))?;

        Ok(policy
            .and_then(|p| {
                p.permissions
                    .into_iter()
                    .find(|perm| scopes::eq_ignore_case(&perm.subject, subject))
            })
            .map_or_else(Vec::new, |perm| perm.scopes))
    }
}
