//! Identity-provider configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::LoginOptions;

/// Default address of a locally running replica that hosts the identity
/// provider during development.
pub const DEFAULT_LOCAL_HOST: &str = "http://localhost:4943";

// ---------------------------------------------------------------------------
// DeploymentMode
// ---------------------------------------------------------------------------

/// Where the client is running. Decides which identity-provider endpoint
/// the login flow uses.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    /// Use the provider's own default endpoint.
    #[default]
    Production,
    /// Use a provider running on a local replica.
    Local,
}

impl FromStr for DeploymentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "local" | "development" | "dev" => Ok(Self::Local),
            other => Err(format!("unknown deployment mode {other:?}")),
        }
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Local => write!(f, "local"),
        }
    }
}

// ---------------------------------------------------------------------------
// ProviderConfig
// ---------------------------------------------------------------------------

/// Configuration for the identity-provider login flow.
///
/// `#[serde(default)]` lets a config file give only the fields it cares
/// about; the rest come from [`Default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Production or local.
    pub mode: DeploymentMode,

    /// Base URL of the local replica (local mode only).
    pub local_host: String,

    /// Id of the identity-provider canister on the local replica
    /// (local mode only).
    pub identity_canister_id: Option<String>,

    /// Explicit endpoint. Overrides whatever `mode` would pick.
    pub endpoint: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            mode: DeploymentMode::Production,
            local_host: DEFAULT_LOCAL_HOST.to_string(),
            identity_canister_id: None,
            endpoint: None,
        }
    }
}

impl ProviderConfig {
    /// A local-mode config pointing at the given identity canister.
    pub fn local(identity_canister_id: impl Into<String>) -> Self {
        Self {
            mode: DeploymentMode::Local,
            identity_canister_id: Some(identity_canister_id.into()),
            ..Self::default()
        }
    }

    /// Reads the config from the process environment.
    ///
    /// | Variable | Field |
    /// |---|---|
    /// | `ROSTERLINE_MODE` | `mode` (`production` or `local`) |
    /// | `ROSTERLINE_IDENTITY_ENDPOINT` | `endpoint` |
    /// | `ROSTERLINE_LOCAL_HOST` | `local_host` |
    /// | `INTERNET_IDENTITY_CANISTER_ID` | `identity_canister_id` |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup("ROSTERLINE_MODE") {
            match raw.parse() {
                Ok(mode) => config.mode = mode,
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring ROSTERLINE_MODE, using {}", config.mode)
                }
            }
        }
        if let Some(host) = lookup("ROSTERLINE_LOCAL_HOST") {
            config.local_host = host;
        }
        config.identity_canister_id = lookup("INTERNET_IDENTITY_CANISTER_ID")
            .filter(|id| !id.is_empty());
        config.endpoint =
            lookup("ROSTERLINE_IDENTITY_ENDPOINT").filter(|e| !e.is_empty());

        config
    }

    /// The endpoint the login flow should use, or `None` for the
    /// provider's default.
    pub fn identity_provider_url(&self) -> Option<String> {
        if let Some(endpoint) = &self.endpoint {
            return Some(endpoint.clone());
        }
        match self.mode {
            DeploymentMode::Production => None,
            DeploymentMode::Local => match &self.identity_canister_id {
                Some(id) => Some(format!(
                    "{}/?canisterId={id}",
                    self.local_host.trim_end_matches('/')
                )),
                None => {
                    tracing::warn!(
                        "local mode without an identity canister id, falling back to the default provider"
                    );
                    None
                }
            },
        }
    }

    /// Options for [`IdentityProvider::login`](crate::IdentityProvider::login).
    pub fn login_options(&self) -> LoginOptions {
        LoginOptions {
            identity_provider: self.identity_provider_url(),
        }
    }
}
