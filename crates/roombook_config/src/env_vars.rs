//! Environment variable naming for configuration overrides.
//!
//! Values marked `secret_from_env` in the config files are resolved through
//! the helpers here. Three naming patterns are tried in order: the prefixed
//! pattern (`ROOMBOOK__GRAPH__TENANT_ID` or `ROOMBOOK_SECRET_GRAPH_CLIENT_SECRET`),
//! the section pattern (`GRAPH_CLIENT_SECRET`) and finally the bare key
//! (`CLIENT_SECRET`).

use std::env;
use tracing::warn;

use crate::models::SECRET_MARKER;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "ROOMBOOK";

/// The prefix for secret environment variables
pub const SECRET_PREFIX: &str = "ROOMBOOK_SECRET";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// The separator for secret environment variables
pub const SECRET_SEPARATOR: &str = "_";

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Convert a configuration path to an environment variable name
///
/// `"server.host"` becomes `"ROOMBOOK__SERVER__HOST"`.
pub fn config_path_to_env_var(path: &str) -> String {
    let prefix = get_config_prefix();
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", prefix, CONFIG_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to an environment variable name
///
/// `"graph.client_secret"` becomes `"ROOMBOOK_SECRET_GRAPH_CLIENT_SECRET"`.
pub fn secret_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', SECRET_SEPARATOR);
    format!("{}{}{}", SECRET_PREFIX, SECRET_SEPARATOR, path).to_uppercase()
}

/// Convert a path to the unprefixed section pattern
///
/// `"graph.client_secret"` becomes `"GRAPH_CLIENT_SECRET"`.
pub fn legacy_path_to_env_var(path: &str) -> String {
    let parts: Vec<&str> = path.split('.').collect();
    if parts.len() < 2 {
        return path.to_uppercase();
    }

    let section = parts[0];
    let key = parts[1..].join(SECRET_SEPARATOR);
    format!("{}_{}", section, key).to_uppercase()
}

/// Convert a path to its bare key name
///
/// `"graph.client_secret"` becomes `"CLIENT_SECRET"`.
pub fn bare_path_to_env_var(path: &str) -> String {
    path.rsplit('.').next().unwrap_or(path).to_uppercase()
}

/// Check if a path is a secret path
///
/// Paths containing "secret", "key", "password" or "token" are considered secret.
pub fn is_secret_path(path: &str) -> bool {
    let path_lower = path.to_lowercase();
    path_lower.contains("secret")
        || path_lower.contains("key")
        || path_lower.contains("password")
        || path_lower.contains("token")
}

/// All candidate variable names for a path, in lookup order.
pub fn env_var_candidates(path: &str) -> Vec<String> {
    let primary = if is_secret_path(path) {
        secret_path_to_env_var(path)
    } else {
        config_path_to_env_var(path)
    };

    let mut candidates = vec![primary];
    for name in [legacy_path_to_env_var(path), bare_path_to_env_var(path)] {
        if !candidates.contains(&name) {
            candidates.push(name);
        }
    }
    candidates
}

/// Get an environment variable for a path
///
/// Empty values are treated as unset.
pub fn get_env_var(path: &str) -> Option<String> {
    env_var_candidates(path)
        .into_iter()
        .find_map(|name| env::var(name).ok().filter(|value| !value.is_empty()))
}

/// Inject environment variables into a JSON value
///
/// Recursively replaces `secret_from_env` strings with values looked up by
/// [`get_env_var`]. Returns `true` if any value was replaced.
pub fn inject_env_vars(value: &mut serde_json::Value) -> bool {
    inject_with(value, &get_env_var)
}

pub(crate) fn inject_with(
    value: &mut serde_json::Value,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> bool {
    use serde_json::Value;

    fn walk(
        path: Vec<String>,
        obj: &mut Value,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> bool {
        let mut replaced = false;

        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    replaced |= walk(new_path, v, lookup);
                }
            }
            Value::Array(arr) => {
                for (i, v) in arr.iter_mut().enumerate() {
                    let mut new_path = path.clone();
                    new_path.push(i.to_string());
                    replaced |= walk(new_path, v, lookup);
                }
            }
            Value::String(s) if s == SECRET_MARKER => {
                let path_str = path.join(".");
                if let Some(env_val) = lookup(&path_str) {
                    *s = env_val;
                    replaced = true;
                } else {
                    warn!("Environment variable for {} not found", path_str);
                }
            }
            _ => {}
        }

        replaced
    }

    walk(vec![], value, lookup)
}
