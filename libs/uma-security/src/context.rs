use secrecy::SecretString;

/// `CallerContext` encapsulates what the resource server knows about the caller
/// of a single request.
///
/// Built by the transport layer from headers/cookies and passed by reference
/// through the access-decision and revoke flows.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CallerContext {
    /// Explicit requesting-party identifier. When absent the subject is
    /// resolved from the session token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subject: Option<String>,
    /// Authorization server session token (SSO cookie/header value).
    /// Never serialized/persisted.
    #[serde(skip)]
    sso_token: Option<SecretString>,
    /// Requesting Party Token presented by the caller. Never serialized/persisted.
    /// Wrapped in `SecretString` so `Debug` redacts the value automatically.
    #[serde(skip)]
    rpt: Option<SecretString>,
}

impl CallerContext {
    /// Create a new `CallerContext` builder
    #[must_use]
    pub fn builder() -> CallerContextBuilder {
        CallerContextBuilder::default()
    }

    /// Create an anonymous context: no session, no token, no explicit subject.
    #[must_use]
    pub fn anonymous() -> Self {
        CallerContextBuilder::default().build()
    }

    /// Explicit requesting-party identifier, if the caller supplied one.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Session token used to resolve the authenticated user.
    #[must_use]
    pub fn sso_token(&self) -> Option<&SecretString> {
        self.sso_token.as_ref()
    }

    /// Requesting Party Token (RPT) presented with the request.
    #[must_use]
    pub fn rpt(&self) -> Option<&SecretString> {
        self.rpt.as_ref()
    }
}

#[derive(Default)]
pub struct CallerContextBuilder {
    subject: Option<String>,
    sso_token: Option<SecretString>,
    rpt: Option<SecretString>,
}

impl CallerContextBuilder {
    #[must_use]
    pub fn subject(mut self, subject: &str) -> Self {
        self.subject = Some(subject.to_owned());
        self
    }

    #[must_use]
    pub fn sso_token(mut self, token: impl Into<SecretString>) -> Self {
        self.sso_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn rpt(mut self, token: impl Into<SecretString>) -> Self {
        self.rpt = Some(token.into());
        self
    }

    /// Blank values are dropped: an empty header is the same as a missing one.
    #[must_use]
    pub fn build(self) -> CallerContext {
        use secrecy::ExposeSecret;

        let keep = |s: Option<SecretString>| s.filter(|v| !v.expose_secret().trim().is_empty());

        CallerContext {
            subject: self.subject.filter(|s| !s.trim().is_empty()),
            sso_token: keep(self.sso_token),
            rpt: keep(self.rpt),
        }
    }
}
