// Configuration read from the environment.
//
// Endpoint credentials are collected once into an [`EndpointConfig`] and
// handed to the API client; per-action values are looked up through the
// same [`VarSource`] so tests can swap the process environment for a map.

use std::collections::HashMap;
use std::env;
use std::fmt;

use crate::error::{Error, Result};

/// Auth key used as the URL user name.
pub const AUTH_KEY: &str = "EXO_AUTH_KEY";
/// Auth token used as the URL password.
pub const AUTH_TOKEN: &str = "EXO_AUTH_TOKEN";
/// API host, e.g. `api.in.exotel.com`.
pub const DOMAIN: &str = "EXO_SUBSCRIBIX_DOMAIN";
/// Account identifier scoping every path.
pub const ACCOUNT_SID: &str = "EXO_ACCOUNT_SID";

pub const TRUNK_SID: &str = "TRUNK_SID";
pub const TRUNK_DEST_IP: &str = "TRUNK_DEST_IP";
pub const TRUNK_DEST_PORT: &str = "TRUNK_DEST_PORT";
pub const TRUNK_NAME: &str = "TRUNK_NAME";
pub const NSO_CODE: &str = "NSO_CODE";
pub const DID_NUMBER: &str = "DID_NUMBER";
pub const EXOPHONE: &str = "EXOPHONE";
pub const WHITELIST_IP: &str = "WHITELIST_IP";
pub const WHITELIST_MASK: &str = "WHITELIST_MASK";

pub const DEFAULT_TRUNK_NAME: &str = "my_ai_trunk";
pub const DEFAULT_NSO_CODE: &str = "ANY-ANY";
pub const DEFAULT_WHITELIST_MASK: u32 = 32;

/// Setting this variable (to anything) disables `.env` loading.
pub const SKIP_DOTENV: &str = "VSIP_SKIP_DOTENV";

/// A source of named string values.
///
/// Empty values count as absent everywhere, so `TRUNK_NAME=` behaves the
/// same as leaving `TRUNK_NAME` unset.
pub trait VarSource {
    /// Raw lookup, before the empty-value rule is applied.
    fn raw(&self, key: &str) -> Option<String>;

    fn value(&self, key: &str) -> Option<String> {
        self.raw(key).filter(|value| !value.is_empty())
    }

    fn get_or(&self, key: &str, default: &str) -> String {
        self.value(key).unwrap_or_else(|| default.to_string())
    }

    /// Required value; the hint is appended to the error message.
    fn require(&self, key: &'static str, hint: &'static str) -> Result<String> {
        self.value(key).ok_or(Error::MissingVar { key, hint })
    }

    fn get_u32_or(&self, key: &'static str, default: u32) -> Result<u32> {
        match self.value(key) {
            None => Ok(default),
            Some(value) => value
                .parse()
                .map_err(|source| Error::InvalidNumber { key, value, source }),
        }
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl VarSource for ProcessEnv {
    fn raw(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl VarSource for HashMap<String, String> {
    fn raw(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<S: VarSource + ?Sized> VarSource for &S {
    fn raw(&self, key: &str) -> Option<String> {
        (**self).raw(key)
    }
}

/// Credentials and scope for every API call made by one process.
#[derive(Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub auth_key: String,
    pub auth_token: String,
    pub domain: String,
    pub account_sid: String,
}

impl EndpointConfig {
    /// Read all four endpoint values. Fails if any one is absent or empty.
    pub fn from_vars(vars: &impl VarSource) -> Result<Self> {
        let (Some(auth_key), Some(auth_token), Some(domain), Some(account_sid)) = (
            vars.value(AUTH_KEY),
            vars.value(AUTH_TOKEN),
            vars.value(DOMAIN),
            vars.value(ACCOUNT_SID),
        ) else {
            return Err(Error::MissingEndpointConfig);
        };
        Ok(Self {
            auth_key,
            auth_token,
            domain,
            account_sid,
        })
    }

    /// `https://{key}:{token}@{domain}/v2/accounts/{account}`
    pub fn base_url(&self) -> String {
        format!(
            "https://{}:{}@{}/v2/accounts/{}",
            self.auth_key, self.auth_token, self.domain, self.account_sid
        )
    }

    /// SIP domain assigned to new trunks of this account.
    pub fn pstn_domain(&self) -> String {
        format!("{}.pstn.exotel.com", self.account_sid)
    }
}

impl fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("auth_key", &self.auth_key)
            .field("auth_token", &"<redacted>")
            .field("domain", &self.domain)
            .field("account_sid", &self.account_sid)
            .finish()
    }
}

/// Load `.env` from the working directory (or a parent) into the process
/// environment. A missing file is fine; a malformed one is an error.
pub fn hydrate_env_file() -> Result<()> {
    if env::var_os(SKIP_DOTENV).is_some() {
        return Ok(());
    }
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(dotenvy::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(Error::Dotenv(err)),
    }
    Ok(())
}
