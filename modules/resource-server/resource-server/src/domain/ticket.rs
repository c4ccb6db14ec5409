//! Permission ticket issuance.

use std::collections::BTreeMap;
use std::sync::Arc;

use resource_server_sdk::{
    AccessTokenProvider, DiscoveryService, PermissionRequestResult, PermissionService,
    PermissionTicket, Resource, TicketStatus,
};
use tracing::{debug, warn};

use super::credentials::owner_access_token;
use super::error::DomainError;

/// Requests permission tickets from the authorization server on behalf of
/// the resource owner.
pub struct TicketIssuer {
    tokens: Arc<dyn AccessTokenProvider>,
    permissions: Arc<dyn PermissionService>,
    discovery: Arc<dyn DiscoveryService>,
}

impl TicketIssuer {
    #[must_use]
    pub fn new(
        tokens: Arc<dyn AccessTokenProvider>,
        permissions: Arc<dyn PermissionService>,
        discovery: Arc<dyn DiscoveryService>,
    ) -> Self {
        Self {
            tokens,
            permissions,
            discovery,
        }
    }

    /// Ask for a ticket covering `requested` on `resource`.
    ///
    /// A `Warning` answer comes back as a ticket with
    /// [`TicketStatus::Warning`] and no ticket value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the owner token, the permission request or
    /// the discovery document cannot be obtained.
    #[tracing::instrument(skip_all, fields(resource_uid = %resource.uid))]
    pub async fn issue(
        &self,
        requested: &[String],
        resource: &Resource,
    ) -> Result<PermissionTicket, DomainError> {
        let pat = owner_access_token(self.tokens.as_ref(), &resource.owner).await?;

        let answer = self
            .permissions
            .request(&resource.registration_id, requested, &pat)
            .await
            .map_err(DomainError::upstream("permission_request"))?;

        match answer {
            PermissionRequestResult::NotAuthorized { ticket, headers } => {
                debug!("permission ticket issued");
                Ok(PermissionTicket {
                    status: TicketStatus::Issued,
                    ticket: Some(ticket),
                    as_uri: Some(self.issuer().await?),
                    headers,
                })
            }
            PermissionRequestResult::Created { ticket, as_uri } => {
                let as_uri = if let Some(uri) = as_uri {
                    uri
                } else {
                    self.issuer().await?
                };
                Ok(PermissionTicket {
                    status: TicketStatus::Issued,
                    ticket: Some(ticket),
                    as_uri: Some(as_uri),
                    headers: BTreeMap::new(),
                })
            }
            PermissionRequestResult::Warning { headers } => {
                warn!("authorization server did not issue a permission ticket");
                Ok(PermissionTicket {
                    status: TicketStatus::Warning,
                    ticket: None,
                    as_uri: None,
                    headers,
                })
            }
        }
    }

    async fn issuer(&self) -> Result<String, DomainError> {
        let doc = self
            .discovery
            .well_known()
            .await
            .map_err(DomainError::upstream("well_known"))?;
        Ok(doc.issuer)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::domain::test_support::{FakeAuthServer, registered_resource, scopes};

    fn issuer(fake: &Arc<FakeAuthServer>) -> TicketIssuer {
        TicketIssuer::new(fake.clone(), fake.clone(), fake.clone())
    }

    #[tokio::test]
    async fn not_authorized_answer_attaches_issuer() {
        let fake = Arc::new(FakeAuthServer::new());
        fake.answer_permission(PermissionRequestResult::NotAuthorized {
            ticket: "t-1".to_owned(),
            headers: BTreeMap::from([(
                "WWW-Authenticate".to_owned(),
                "UMA realm=\"rs.example.com\"".to_owned(),
            )]),
        });

        let ticket = issuer(&fake)
            .issue(&scopes(&["view"]), &registered_resource())
            .await
            .unwrap();

        assert_eq!(ticket.status, TicketStatus::Issued);
        assert_eq!(ticket.ticket.as_deref(), Some("t-1"));
        assert_eq!(ticket.as_uri.as_deref(), Some("https://as.example.com"));
        assert_eq!(ticket.headers.len(), 1);
        assert_eq!(
            fake.last_permission_request(),
            Some(("reg-1".to_owned(), scopes(&["view"])))
        );
    }

    #[tokio::test]
    async fn created_answer_keeps_its_own_uri() {
        let fake = Arc::new(FakeAuthServer::new());
        fake.answer_permission(PermissionRequestResult::Created {
            ticket: "t-2".to_owned(),
            as_uri: Some("https://other-as.example.com".to_owned()),
        });

        let ticket = issuer(&fake)
            .issue(&scopes(&["view"]), &registered_resource())
            .await
            .unwrap();

        assert_eq!(ticket.as_uri.as_deref(), Some("https://other-as.example.com"));
        assert_eq!(fake.calls("well_known"), 0);
    }

    #[tokio::test]
    async fn created_answer_without_uri_uses_discovery() {
        let fake = Arc::new(FakeAuthServer::new());
        fake.answer_permission(PermissionRequestResult::Created {
            ticket: "t-3".to_owned(),
            as_uri: None,
        });

        let ticket = issuer(&fake)
            .issue(&scopes(&["view"]), &registered_resource())
            .await
            .unwrap();

        assert_eq!(ticket.as_uri.as_deref(), Some("https://as.example.com"));
    }

    #[tokio::test]
    async fn warning_answer_has_no_ticket() {
        let fake = Arc::new(FakeAuthServer::new());
        fake.answer_permission(PermissionRequestResult::Warning {
            headers: BTreeMap::from([(
                "Warning".to_owned(),
                "199 - \"UMA Authorization Server Unreachable\"".to_owned(),
            )]),
        });

        let ticket = issuer(&fake)
            .issue(&scopes(&["view"]), &registered_resource())
            .await
            .unwrap();

        assert_eq!(ticket.status, TicketStatus::Warning);
        assert!(ticket.ticket.is_none());
        assert!(ticket.headers.contains_key("Warning"));
    }

    #[tokio::test]
    async fn discovery_failure_is_fatal() {
        let fake = Arc::new(FakeAuthServer::new());
        fake.fail("well_known");

        let err = issuer(&fake)
            .issue(&scopes(&["view"]), &registered_resource())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Upstream { op: "well_known", .. }));
    }
}
