//! Configuration for the resource server module.

use serde::{Deserialize, Serialize};

/// Module configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ResourceServerConfig {
    /// Request header carrying the requesting party token.
    pub rpt_header: String,

    /// Request header carrying the SSO session token when no cookie is sent.
    pub sso_header: String,

    /// Cookie carrying the SSO session token.
    pub sso_cookie: String,

    /// Scope that attaches the resource metadata to a successful decision.
    pub meta_scope: String,

    /// Scope that attaches the resource content to a successful decision.
    pub content_scope: String,
}

impl Default for ResourceServerConfig {
    fn default() -> Self {
        Self {
            rpt_header: "x-frdp-rpt".to_owned(),
            sso_header: "x-frdp-ssotoken".to_owned(),
            sso_cookie: "iPlanetDirectoryPro".to_owned(),
            meta_scope: "meta".to_owned(),
            content_scope: "content".to_owned(),
        }
    }
}
