//! Shared helpers for the HTTP adapters.

use cg_domain::config::AuthConfig;
use cg_domain::error::{Error, Result};

/// Convert a [`reqwest::Error`] into the domain [`Error`] type.
///
/// Timeout errors map to [`Error::Timeout`]; everything else maps to
/// [`Error::Http`].
pub fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}

/// Map a non-success HTTP answer to [`Error::Upstream`], keeping the status
/// so retry classification can see it.
pub fn upstream_status(service: &str, status: reqwest::StatusCode, body: &str) -> Error {
    let mut message = format!("HTTP {}", status.as_u16());
    let body = body.trim();
    if !body.is_empty() {
        message.push_str(" - ");
        message.extend(body.chars().take(300));
    }
    Error::Upstream {
        service: service.to_owned(),
        status: Some(status.as_u16()),
        message,
    }
}

/// Resolve the API key from an [`AuthConfig`].
///
/// Precedence:
/// 1. `key` field (plaintext, warns)
/// 2. `service` + `account` → OS keychain via `keyring`
/// 3. `env` field (reads environment variable)
/// 4. Fallback for keychain mode: env var `{SERVICE}_{ACCOUNT}` uppercased
/// 5. Error
pub fn resolve_api_key(auth: &AuthConfig) -> Result<String> {
    if let Some(ref key) = auth.key {
        tracing::warn!(
            "API key loaded from plaintext config field 'key'; \
             prefer 'env' or keychain 'service'+'account'"
        );
        return Ok(key.clone());
    }

    if let (Some(ref service), Some(ref account)) = (&auth.service, &auth.account) {
        match resolve_from_keychain(service, account) {
            Ok(secret) => return Ok(secret),
            Err(e) => {
                tracing::warn!(
                    service = %service,
                    account = %account,
                    error = %e,
                    "keychain lookup failed, falling through to env"
                );
            }
        }
    }

    if let Some(ref env_var) = auth.env {
        return std::env::var(env_var).map_err(|_| {
            Error::Auth(format!(
                "environment variable '{}' not set or not valid UTF-8",
                env_var
            ))
        });
    }

    if let (Some(ref service), Some(ref account)) = (&auth.service, &auth.account) {
        let fallback_var = keychain_fallback_env_name(service, account);
        if let Ok(val) = std::env::var(&fallback_var) {
            tracing::info!(
                env_var = %fallback_var,
                "API key resolved from keychain headless fallback env var"
            );
            return Ok(val);
        }
    }

    Err(Error::Auth(
        "no API key configured: set 'key', 'env', or keychain \
         'service'+'account'"
            .into(),
    ))
}

/// Read a secret from the platform credential store.
pub fn resolve_from_keychain(service: &str, account: &str) -> Result<String> {
    let entry = keyring::Entry::new(service, account)
        .map_err(|e| Error::Auth(format!("keyring entry creation failed: {e}")))?;
    entry
        .get_password()
        .map_err(|e| Error::Auth(format!("keyring get_password failed: {e}")))
}

/// `("concierge", "completion-key")` → `"CONCIERGE_COMPLETION_KEY"`.
pub fn keychain_fallback_env_name(service: &str, account: &str) -> String {
    format!(
        "{}_{}",
        service.to_uppercase().replace('-', "_"),
        account.to_uppercase().replace('-', "_"),
    )
}

/// Header name and full header value for an authenticated request, or `None`
/// when no credential source is configured.
pub fn auth_header(auth: &AuthConfig) -> Result<Option<(String, String)>> {
    if auth.is_empty() {
        return Ok(None);
    }
    let key = resolve_api_key(auth)?;
    let header = auth.header.clone().unwrap_or_else(|| "Authorization".into());
    let prefix = auth.prefix.clone().unwrap_or_else(|| "Bearer ".into());
    Ok(Some((header, format!("{prefix}{key}"))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_env_name_basic() {
        assert_eq!(
            keychain_fallback_env_name("concierge", "completion-key"),
            "CONCIERGE_COMPLETION_KEY"
        );
    }

    #[test]
    fn plaintext_key_wins() {
        let auth = AuthConfig {
            key: Some("plaintext-wins".into()),
            env: Some("CG_TEST_SHOULD_NOT_BE_READ".into()),
            ..Default::default()
        };
        assert_eq!(resolve_api_key(&auth).unwrap(), "plaintext-wins");
    }

    #[test]
    fn env_var_is_read() {
        let var_name = "CG_TEST_RESOLVE_ENV_KEY_4821";
        std::env::set_var(var_name, "env-secret");
        let auth = AuthConfig {
            env: Some(var_name.into()),
            ..Default::default()
        };
        assert_eq!(resolve_api_key(&auth).unwrap(), "env-secret");
        std::env::remove_var(var_name);
    }

    #[test]
    fn missing_env_var_names_it() {
        let auth = AuthConfig {
            env: Some("CG_TEST_NONEXISTENT_VAR_9931".into()),
            ..Default::default()
        };
        let err = resolve_api_key(&auth).unwrap_err();
        assert!(err.to_string().contains("CG_TEST_NONEXISTENT_VAR_9931"));
    }

    #[test]
    fn keychain_headless_fallback() {
        let fallback_var = "CONCIERGE_TEST_HANDOFF";
        std::env::set_var(fallback_var, "fallback-secret");
        let auth = AuthConfig {
            service: Some("concierge".into()),
            account: Some("test-handoff".into()),
            ..Default::default()
        };
        assert_eq!(resolve_api_key(&auth).unwrap(), "fallback-secret");
        std::env::remove_var(fallback_var);
    }

    #[test]
    fn empty_auth_sends_no_header() {
        assert!(auth_header(&AuthConfig::default()).unwrap().is_none());
    }

    #[test]
    fn auth_header_defaults_to_bearer() {
        let auth = AuthConfig {
            key: Some("abc".into()),
            ..Default::default()
        };
        let (name, value) = auth_header(&auth).unwrap().unwrap();
        assert_eq!(name, "Authorization");
        assert_eq!(value, "Bearer abc");
    }

    #[test]
    fn upstream_status_keeps_code() {
        let err = upstream_status("completion", reqwest::StatusCode::SERVICE_UNAVAILABLE, "busy");
        assert!(err.is_transient());
        assert!(err.to_string().contains("503"));
    }
}
