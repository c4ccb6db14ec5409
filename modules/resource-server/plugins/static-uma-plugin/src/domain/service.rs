//! In-memory state behind the static UMA plugin.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use resource_server_sdk::{
    Introspection, Permission, PermissionRequestResult, Policy, Registration, Resource,
    ResourceServerError,
};
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::StaticUmaPluginConfig;

pub const WARNING_UNREACHABLE: &str = "199 - \"UMA Authorization Server Unreachable\"";

/// Static UMA plugin service.
///
/// Everything except policies is read-only after construction.
pub struct Service {
    realm: String,
    issuer: String,
    admin_credential: String,
    ticket_service_available: bool,
    owner_tokens: HashMap<String, String>,
    resources: HashMap<String, Resource>,
    contents: HashMap<String, Value>,
    registrations: HashMap<String, Registration>,
    tokens: HashMap<String, Introspection>,
    sessions: HashMap<String, String>,
    policies: RwLock<HashMap<String, Policy>>,
}

impl Service {
    /// Create a service from plugin configuration.
    #[must_use]
    pub fn from_config(cfg: &StaticUmaPluginConfig) -> Self {
        let mut resources = HashMap::new();
        let mut contents = HashMap::new();
        for seed in &cfg.resources {
            let mut metadata = seed.metadata.clone();
            metadata.insert("discoverable".to_owned(), Value::Bool(seed.discoverable));
            if let Some(content) = &seed.content {
                contents.insert(seed.uid.clone(), content.clone());
            }
            resources.insert(
                seed.uid.clone(),
                Resource {
                    uid: seed.uid.clone(),
                    owner: seed.owner.clone(),
                    registration_id: seed.registration_id.clone(),
                    discoverable: seed.discoverable,
                    metadata,
                    content_ref: seed.content.as_ref().map(|_| seed.uid.clone()),
                },
            );
        }

        let registrations = cfg
            .registrations
            .iter()
            .map(|r| {
                (
                    r.id.clone(),
                    Registration {
                        resource_scopes: r.resource_scopes.clone(),
                        icon_uri: r.icon_uri.clone(),
                    },
                )
            })
            .collect();

        let policies = cfg
            .policies
            .iter()
            .map(|p| {
                (
                    p.registration_id.clone(),
                    Policy {
                        permissions: p.permissions.clone(),
                    },
                )
            })
            .collect();

        let tokens = cfg
            .tokens
            .iter()
            .map(|t| {
                (
                    t.rpt.clone(),
                    Introspection {
                        active: t.active,
                        permissions: t.permissions.clone(),
                    },
                )
            })
            .collect();

        info!(
            resources = cfg.resources.len(),
            registrations = cfg.registrations.len(),
            policies = cfg.policies.len(),
            "static UMA data loaded"
        );

        Self {
            realm: cfg.realm.clone(),
            issuer: cfg.issuer.clone(),
            admin_credential: cfg.admin_credential.clone(),
            ticket_service_available: cfg.ticket_service_available,
            owner_tokens: cfg
                .owner_tokens
                .iter()
                .map(|o| (o.owner.clone(), o.token.clone()))
                .collect(),
            resources,
            contents,
            registrations,
            tokens,
            sessions: cfg
                .sessions
                .iter()
                .map(|s| (s.token.clone(), s.subject.clone()))
                .collect(),
            policies: RwLock::new(policies),
        }
    }

    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    #[must_use]
    pub fn admin_credential(&self) -> &str {
        &self.admin_credential
    }

    /// # Errors
    ///
    /// `NotFound` if `uid` is unknown.
    pub fn resource(&self, uid: &str) -> Result<Resource, ResourceServerError> {
        self.resources
            .get(uid)
            .cloned()
            .ok_or_else(|| ResourceServerError::NotFound(format!("resource '{uid}' not found")))
    }

    #[must_use]
    pub fn content(&self, resource: &Resource) -> Option<Value> {
        resource
            .content_ref
            .as_ref()
            .and_then(|key| self.contents.get(key))
            .cloned()
    }

    /// # Errors
    ///
    /// `Unauthorized` for an unknown owner token, `NotFound` for an unknown
    /// registration.
    pub fn registration(
        &self,
        registration_id: &str,
        owner_token: &str,
    ) -> Result<Registration, ResourceServerError> {
        self.check_owner_token(owner_token)?;
        self.registrations
            .get(registration_id)
            .cloned()
            .ok_or_else(|| {
                ResourceServerError::NotFound(format!(
                    "registration '{registration_id}' not found"
                ))
            })
    }

    /// # Errors
    ///
    /// `Unauthorized` if `admin_token` is not the admin credential.
    pub fn policy(
        &self,
        registration_id: &str,
        admin_token: &str,
    ) -> Result<Option<Policy>, ResourceServerError> {
        self.check_admin(admin_token)?;
        Ok(self.policies.read().get(registration_id).cloned())
    }

    /// # Errors
    ///
    /// `Unauthorized` if `admin_token` is not the admin credential.
    pub fn replace_policy(
        &self,
        registration_id: &str,
        admin_token: &str,
        permissions: &[Permission],
    ) -> Result<(), ResourceServerError> {
        self.check_admin(admin_token)?;
        self.policies.write().insert(
            registration_id.to_owned(),
            Policy {
                permissions: permissions.to_vec(),
            },
        );
        debug!(registration_id, count = permissions.len(), "policy replaced");
        Ok(())
    }

    /// # Errors
    ///
    /// Deleting a policy that is already gone succeeds.
    ///
    /// # Errors
    ///
    /// `Unauthorized` if `admin_token` is not the admin credential.
    pub fn delete_policy(
        &self,
        registration_id: &str,
        admin_token: &str,
    ) -> Result<(), ResourceServerError> {
        self.check_admin(admin_token)?;
        if self.policies.write().remove(registration_id).is_some() {
            debug!(registration_id, "policy deleted");
        } else {
            debug!(registration_id, "policy already absent");
        }
        Ok(())
    }

    /// Unknown tokens are inactive.
    ///
    /// # Errors
    ///
    /// `Unauthorized` if `credential` is not an owner token.
    pub fn introspect(
        &self,
        rpt: &str,
        credential: &str,
    ) -> Result<Introspection, ResourceServerError> {
        self.check_owner_token(credential)?;
        Ok(self.tokens.get(rpt).cloned().unwrap_or_default())
    }

    /// Mint a ticket, or warn when the ticket service is switched off.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for an unknown owner token, `NotFound` for an unknown
    /// registration.
    pub fn request_permission(
        &self,
        resource_id: &str,
        owner_token: &str,
    ) -> Result<PermissionRequestResult, ResourceServerError> {
        if !self.ticket_service_available {
            return Ok(PermissionRequestResult::Warning {
                headers: BTreeMap::from([(
                    "Warning".to_owned(),
                    WARNING_UNREACHABLE.to_owned(),
                )]),
            });
        }

        self.check_owner_token(owner_token)?;
        if !self.registrations.contains_key(resource_id) {
            return Err(ResourceServerError::NotFound(format!(
                "registration '{resource_id}' not found"
            )));
        }

        Ok(PermissionRequestResult::NotAuthorized {
            ticket: Uuid::new_v4().to_string(),
            headers: BTreeMap::from([(
                "WWW-Authenticate".to_owned(),
                format!("UMA realm=\"{}\"", self.realm),
            )]),
        })
    }

    #[must_use]
    pub fn session_subject(&self, sso_token: &str) -> Option<String> {
        self.sessions.get(sso_token).cloned()
    }

    /// # Errors
    ///
    /// `NotFound` if the owner has no configured token.
    pub fn owner_token(&self, owner: &str) -> Result<String, ResourceServerError> {
        self.owner_tokens.get(owner).cloned().ok_or_else(|| {
            ResourceServerError::NotFound(format!("no access token for owner '{owner}'"))
        })
    }

    fn check_owner_token(&self, token: &str) -> Result<(), ResourceServerError> {
        if self.owner_tokens.values().any(|t| t == token) {
            Ok(())
        } else {
            Err(ResourceServerError::Unauthorized(
                "unknown protection API token".to_owned(),
            ))
        }
    }

    fn check_admin(&self, token: &str) -> Result<(), ResourceServerError> {
        if token == self.admin_credential {
            Ok(())
        } else {
            Err(ResourceServerError::Unauthorized(
                "invalid admin credential".to_owned(),
            ))
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::{OwnerToken, RegistrationSeed, ResourceSeed, TokenSeed};
    use serde_json::json;

    fn config() -> StaticUmaPluginConfig {
        StaticUmaPluginConfig {
            realm: "rs.example.com".to_owned(),
            owner_tokens: vec![OwnerToken {
                owner: "bob".to_owned(),
                token: "pat-bob".to_owned(),
            }],
            resources: vec![ResourceSeed {
                uid: "r1".to_owned(),
                owner: "bob".to_owned(),
                registration_id: "reg-1".to_owned(),
                discoverable: true,
                metadata: json!({"name": "Tax return"})
                    .as_object()
                    .cloned()
                    .unwrap(),
                content: Some(json!({"total": 1})),
            }],
            registrations: vec![RegistrationSeed {
                id: "reg-1".to_owned(),
                resource_scopes: vec!["view".to_owned()],
                icon_uri: None,
            }],
            tokens: vec![TokenSeed {
                rpt: "rpt-1".to_owned(),
                active: true,
                permissions: vec![],
            }],
            ..StaticUmaPluginConfig::default()
        }
    }

    #[test]
    fn resource_metadata_carries_discoverable_flag() {
        let service = Service::from_config(&config());

        let resource = service.resource("r1").unwrap();
        assert_eq!(resource.metadata["discoverable"], json!(true));
        assert_eq!(service.content(&resource), Some(json!({"total": 1})));
        assert!(matches!(
            service.resource("r9"),
            Err(ResourceServerError::NotFound(_))
        ));
    }

    #[test]
    fn ticket_carries_realm_header() {
        let service = Service::from_config(&config());

        let answer = service.request_permission("reg-1", "pat-bob").unwrap();
        let PermissionRequestResult::NotAuthorized { ticket, headers } = answer else {
            panic!("expected NotAuthorized");
        };
        assert!(Uuid::parse_str(&ticket).is_ok());
        assert_eq!(headers["WWW-Authenticate"], "UMA realm=\"rs.example.com\"");
    }

    #[test]
    fn tickets_are_unique() {
        let service = Service::from_config(&config());

        let first = service.request_permission("reg-1", "pat-bob").unwrap();
        let second = service.request_permission("reg-1", "pat-bob").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn ticket_service_off_warns() {
        let service = Service::from_config(&StaticUmaPluginConfig {
            ticket_service_available: false,
            ..config()
        });

        let answer = service.request_permission("reg-1", "pat-bob").unwrap();
        let PermissionRequestResult::Warning { headers } = answer else {
            panic!("expected Warning");
        };
        assert_eq!(headers["Warning"], WARNING_UNREACHABLE);
    }

    #[test]
    fn unknown_pat_is_unauthorized() {
        let service = Service::from_config(&config());

        assert!(matches!(
            service.request_permission("reg-1", "pat-eve"),
            Err(ResourceServerError::Unauthorized(_))
        ));
        assert!(matches!(
            service.registration("reg-1", "pat-eve"),
            Err(ResourceServerError::Unauthorized(_))
        ));
    }

    #[test]
    fn unknown_rpt_is_inactive() {
        let service = Service::from_config(&config());

        assert!(service.introspect("rpt-1", "pat-bob").unwrap().active);
        assert!(!service.introspect("rpt-x", "pat-bob").unwrap().active);
    }

    #[test]
    fn policy_writes_need_admin_and_are_visible() {
        let service = Service::from_config(&config());
        let perms = vec![Permission::new("alice", &["view"])];

        assert!(service.replace_policy("reg-1", "nope", &perms).is_err());
        service
            .replace_policy("reg-1", "admin-token", &perms)
            .unwrap();
        assert_eq!(
            service.policy("reg-1", "admin-token").unwrap(),
            Some(Policy { permissions: perms })
        );

        service.delete_policy("reg-1", "admin-token").unwrap();
        assert_eq!(service.policy("reg-1", "admin-token").unwrap(), None);
        service.delete_policy("reg-1", "admin-token").unwrap();
        assert_eq!(service.policy("reg-1", "admin-token").unwrap(), None);
    }
}
