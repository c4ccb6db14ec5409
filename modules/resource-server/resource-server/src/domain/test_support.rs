//! Scriptable in-memory collaborators for domain unit tests.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;
use resource_server_sdk::{
    AccessTokenProvider, ContentStore, DiscoveryService, IdentityService, Introspection,
    IntrospectionService, Permission, PermissionRequestResult, PermissionService, Policy,
    PolicyStore, Registration, RegistrationService, Resource, ResourceServerError, ResourceStore,
    TokenPermission, WellKnown,
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use uma_security::CallerContext;

pub const ISSUER: &str = "https://as.example.com";
pub const ICON: &str = "https://rs.example.com/icon.png";

pub fn scopes(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

/// `r1`, owned by `bob`, registered as `reg-1`, discoverable.
pub fn registered_resource() -> Resource {
    let metadata = json!({"name": "Tax return", "discoverable": true});
    Resource {
        uid: "r1".to_owned(),
        owner: "bob".to_owned(),
        registration_id: "reg-1".to_owned(),
        discoverable: true,
        metadata: metadata.as_object().cloned().unwrap_or_default(),
        content_ref: Some("c1".to_owned()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyWrite {
    Replace(Vec<Permission>),
    Delete,
}

#[derive(Default)]
struct State {
    resources: HashMap<String, Resource>,
    contents: HashMap<String, Value>,
    registrations: HashMap<String, Registration>,
    policies: HashMap<String, Policy>,
    tokens: HashMap<String, Introspection>,
    sessions: HashMap<String, String>,
    permission_answer: Option<PermissionRequestResult>,
    last_permission_request: Option<(String, Vec<String>)>,
    failing: HashSet<&'static str>,
    calls: HashMap<&'static str, usize>,
    writes: Vec<PolicyWrite>,
}

/// One fake standing in for every collaborator.
pub struct FakeAuthServer {
    state: Mutex<State>,
}

impl FakeAuthServer {
    pub fn new() -> Self {
        let mut state = State::default();
        let resource = registered_resource();
        state.resources.insert(resource.uid.clone(), resource);
        state
            .contents
            .insert("r1".to_owned(), json!({"total": 1234}));
        state.registrations.insert(
            "reg-1".to_owned(),
            Registration {
                resource_scopes: scopes(&["view", "download", "meta", "content"]),
                icon_uri: Some(ICON.to_owned()),
            },
        );
        state
            .sessions
            .insert("sso-alice".to_owned(), "alice".to_owned());
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn put_resource(&self, resource: Resource) {
        self.state
            .lock()
            .resources
            .insert(resource.uid.clone(), resource);
    }

    pub fn set_registration_scopes(&self, items: &[&str]) {
        if let Some(reg) = self.state.lock().registrations.get_mut("reg-1") {
            reg.resource_scopes = scopes(items);
        }
    }

    pub fn set_policy(&self, permissions: Vec<Permission>) {
        self.state
            .lock()
            .policies
            .insert("reg-1".to_owned(), Policy { permissions });
    }

    pub fn policy(&self) -> Option<Policy> {
        self.state.lock().policies.get("reg-1").cloned()
    }

    pub fn set_token(&self, rpt: &str, active: bool, permissions: Vec<TokenPermission>) {
        self.state
            .lock()
            .tokens
            .insert(rpt.to_owned(), Introspection {
                active,
                permissions,
            });
    }

    pub fn answer_permission(&self, answer: PermissionRequestResult) {
        self.state.lock().permission_answer = Some(answer);
    }

    pub fn last_permission_request(&self) -> Option<(String, Vec<String>)> {
        self.state.lock().last_permission_request.clone()
    }

    /// Make every call of `op` fail.
    pub fn fail(&self, op: &'static str) {
        self.state.lock().failing.insert(op);
    }

    pub fn calls(&self, op: &'static str) -> usize {
        self.state.lock().calls.get(op).copied().unwrap_or(0)
    }

    pub fn writes(&self) -> Vec<PolicyWrite> {
        self.state.lock().writes.clone()
    }

    fn enter(&self, op: &'static str) -> Result<(), ResourceServerError> {
        let mut state = self.state.lock();
        *state.calls.entry(op).or_default() += 1;
        if state.failing.contains(op) {
            return Err(ResourceServerError::ServiceUnavailable(format!(
                "{op} is down"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ResourceStore for FakeAuthServer {
    async fn read(&self, uid: &str) -> Result<Resource, ResourceServerError> {
        self.enter("resource_read")?;
        self.state
            .lock()
            .resources
            .get(uid)
            .cloned()
            .ok_or_else(|| ResourceServerError::NotFound(format!("resource '{uid}' not found")))
    }
}

#[async_trait]
impl ContentStore for FakeAuthServer {
    async fn read(&self, resource: &Resource) -> Result<Option<Value>, ResourceServerError> {
        self.enter("content_read")?;
        Ok(self.state.lock().contents.get(&resource.uid).cloned())
    }
}

#[async_trait]
impl RegistrationService for FakeAuthServer {
    async fn read(
        &self,
        registration_id: &str,
        _owner_token: &SecretString,
    ) -> Result<Registration, ResourceServerError> {
        self.enter("registration_read")?;
        self.state
            .lock()
            .registrations
            .get(registration_id)
            .cloned()
            .ok_or_else(|| ResourceServerError::NotFound(registration_id.to_owned()))
    }
}

#[async_trait]
impl PolicyStore for FakeAuthServer {
    async fn read(
        &self,
        registration_id: &str,
        _admin_token: &SecretString,
        _owner: &str,
    ) -> Result<Option<Policy>, ResourceServerError> {
        self.enter("policy_read")?;
        Ok(self.state.lock().policies.get(registration_id).cloned())
    }

    async fn replace(
        &self,
        registration_id: &str,
        _admin_token: &SecretString,
        _owner: &str,
        permissions: &[Permission],
    ) -> Result<(), ResourceServerError> {
        self.enter("policy_replace")?;
        let mut state = self.state.lock();
        state.writes.push(PolicyWrite::Replace(permissions.to_vec()));
        state.policies.insert(
            registration_id.to_owned(),
            Policy {
                permissions: permissions.to_vec(),
            },
        );
        Ok(())
    }

    async fn delete(
        &self,
        registration_id: &str,
        _admin_token: &SecretString,
        _owner: &str,
    ) -> Result<(), ResourceServerError> {
        self.enter("policy_delete")?;
        let mut state = self.state.lock();
        state.writes.push(PolicyWrite::Delete);
        state.policies.remove(registration_id);
        Ok(())
    }
}

#[async_trait]
impl IntrospectionService for FakeAuthServer {
    async fn introspect(
        &self,
        rpt: &SecretString,
        _credential: &SecretString,
    ) -> Result<Introspection, ResourceServerError> {
        self.enter("introspect")?;
        Ok(self
            .state
            .lock()
            .tokens
            .get(rpt.expose_secret())
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl PermissionService for FakeAuthServer {
    async fn request(
        &self,
        resource_id: &str,
        resource_scopes: &[String],
        _owner_token: &SecretString,
    ) -> Result<PermissionRequestResult, ResourceServerError> {
        self.enter("permission_request")?;
        let mut state = self.state.lock();
        state.last_permission_request = Some((resource_id.to_owned(), resource_scopes.to_vec()));
        Ok(state
            .permission_answer
            .clone()
            .unwrap_or_else(|| PermissionRequestResult::NotAuthorized {
                ticket: "ticket-1".to_owned(),
                headers: BTreeMap::from([(
                    "WWW-Authenticate".to_owned(),
                    "UMA realm=\"rs.example.com\"".to_owned(),
                )]),
            }))
    }
}

#[async_trait]
impl IdentityService for FakeAuthServer {
    async fn resolve_subject(
        &self,
        ctx: &CallerContext,
    ) -> Result<Option<String>, ResourceServerError> {
        self.enter("resolve_subject")?;
        Ok(ctx
            .sso_token()
            .and_then(|t| self.state.lock().sessions.get(t.expose_secret()).cloned()))
    }

    async fn resolve_admin_credential(&self) -> Result<SecretString, ResourceServerError> {
        self.enter("admin_credential")?;
        Ok(SecretString::from("admin-token".to_owned()))
    }
}

#[async_trait]
impl AccessTokenProvider for FakeAuthServer {
    async fn owner_access_token(&self, owner: &str) -> Result<SecretString, ResourceServerError> {
        self.enter("owner_access_token")?;
        Ok(SecretString::from(format!("pat-{owner}")))
    }
}

#[async_trait]
impl DiscoveryService for FakeAuthServer {
    async fn well_known(&self) -> Result<WellKnown, ResourceServerError> {
        self.enter("well_known")?;
        Ok(WellKnown {
            issuer: ISSUER.to_owned(),
        })
    }
}
