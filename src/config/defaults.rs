//! Built-in defaults for the merged configuration
//!
//! A fixed nested literal, parameterized only by environment variables and
//! flags. The application's partial configuration is merged over this; a
//! default never overrides an explicitly supplied value.

use std::path::Path;

use serde_json::{json, Value};

use crate::env::EnvStore;
use crate::error::AssembleError;
use crate::flags::FlagSource;
use crate::version::resolve_version;

/// Default maximum content length in bytes (8 MiB).
pub const DEFAULT_MAX_CONTENT_LENGTH: u64 = 8 * 1024 * 1024;

/// Build the defaults set, resolving the application version from the
/// working directory (best effort).
pub fn build_defaults(
    env: &dyn EnvStore,
    flags: &dyn FlagSource,
    cwd: &Path,
) -> Result<Value, AssembleError> {
    let version = resolve_version(cwd)?;
    Ok(defaults_value(env, flags, version))
}

/// The defaults literal. Pure over its inputs.
pub fn defaults_value(
    env: &dyn EnvStore,
    flags: &dyn FlagSource,
    version: Option<String>,
) -> Value {
    let environment_name = flags
        .get_str("environmentName")
        .or_else(|| env.var("ENVIRONMENT"));

    let max_content_length = env
        .var("MAX_CONTENT_LENGTH")
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_MAX_CONTENT_LENGTH);

    let mut defaults = json!({
        "iframely": {
            "key": env.var_or_empty("IFRAMELY_KEY"),
        },
        "google": {
            "key": env.var_or_empty("GOOGLE_KEY"),
        },
        "analytics": {
            "piwik": {
                "url": env.var_or_empty("PIWIK_URL"),
                "id": env.var_or_empty("PIWIK_SITE_ID"),
            },
            "ga": {
                "id": env.var_or_empty("TRACKING_ID"),
            },
        },
        "raven": {
            "dsn": env.var_or_empty("RAVEN_DSN"),
        },
        "server": {
            "url": flags.get_str("server")
                .or_else(|| env.var("SERVER_URL"))
                .unwrap_or_else(|| "http://localhost:5000/api".to_string()),
            "ws": flags.get_str("ws")
                .or_else(|| env.var("WS_URL"))
                .unwrap_or_else(|| "ws://0.0.0.0:5100".to_string()),
        },
        "editor": {
            "disableEditorToolbar": flags.get("disableEditorToolbar")
                .unwrap_or(Value::Bool(false)),
        },
        "defaultTimezone": flags.get_str("defaultTimezone")
            .unwrap_or_else(|| "Europe/London".to_string()),
        "model": {
            "dateformat": "DD/MM/YYYY",
            "timeformat": "HH:mm:ss",
        },
        "view": {
            "dateformat": env.var("VIEW_DATE_FORMAT")
                .unwrap_or_else(|| "DD/MM/YYYY".to_string()),
            "timeformat": env.var("VIEW_TIME_FORMAT")
                .unwrap_or_else(|| "HH:mm".to_string()),
        },
        "isTestEnvironment": environment_name.is_some(),
        "environmentName": environment_name,
        "langOverride": {},
        "features": {
            "useTansaProofing": false,
            "onlyEditor3": false,
            "editorHighlights": false,
        },
        "tansa": {
            "profile": {"nb": 1, "nn": 2},
        },
        "workspace": {
            "ingest": false,
            "content": false,
            "tasks": false,
            "analytics": false,
        },
        "defaultRoute": "/blogs",
        "system": {
            "dateTimeTZ": "YYYY-MM-DD[T]HH:mm:ssZ",
        },
        "embedly": {
            "key": flags.get_str("embedly-key")
                .or_else(|| env.var("EMBEDLY_KEY"))
                .unwrap_or_default(),
        },
        "facebookAppId": flags.get_str("facebook-appid")
            .or_else(|| env.var("FACEBOOK_APP_ID"))
            .unwrap_or_default(),
        "syndication": env.var_or_false("SYNDICATION"),
        "marketplace": env.var_or_false("MARKETPLACE"),
        "themeCreationRestrictions": {"team": 3},
        "excludedTheme": "angular",
        "assignableUsers": {"solo": 2, "team": 4},
        "subscriptionLevel": env.var_or_empty("SUBSCRIPTION_LEVEL"),
        "blogCreationRestrictions": {"solo": 1, "team": 3},
        "maxContentLength": max_content_length,
        // consumed by the media metadata validator; must exist even when empty
        "validatorMediaMetadata": {},
        "apps": [],
    });

    // left undefined when both version lookups come up empty
    if let Some(version) = version {
        defaults["version"] = Value::String(version);
    }

    defaults
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::NoFlags;
    use serde_json::json;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_max_content_length_default() {
        let defaults = defaults_value(&env(&[]), &NoFlags, None);
        assert_eq!(defaults["maxContentLength"], 8_388_608);
    }

    #[test]
    fn test_max_content_length_from_env() {
        let defaults = defaults_value(&env(&[("MAX_CONTENT_LENGTH", "1024")]), &NoFlags, None);
        assert_eq!(defaults["maxContentLength"], 1024);
    }

    #[test]
    fn test_api_keys_fall_back_to_empty() {
        let defaults = defaults_value(&env(&[("GOOGLE_KEY", "g-key")]), &NoFlags, None);

        assert_eq!(defaults["google"]["key"], "g-key");
        assert_eq!(defaults["iframely"]["key"], "");
        assert_eq!(defaults["analytics"]["piwik"]["url"], "");
    }

    #[test]
    fn test_server_url_flag_beats_env() {
        let mut flags = HashMap::new();
        flags.insert("server".to_string(), json!("http://flag.test/api"));

        let defaults = defaults_value(
            &env(&[("SERVER_URL", "http://env.test/api")]),
            &flags,
            None,
        );
        assert_eq!(defaults["server"]["url"], "http://flag.test/api");
    }

    #[test]
    fn test_server_url_env_beats_builtin() {
        let defaults = defaults_value(
            &env(&[("SERVER_URL", "http://env.test/api")]),
            &NoFlags,
            None,
        );
        assert_eq!(defaults["server"]["url"], "http://env.test/api");
        assert_eq!(defaults["server"]["ws"], "ws://0.0.0.0:5100");
    }

    #[test]
    fn test_environment_name_sets_test_environment() {
        let unset = defaults_value(&env(&[]), &NoFlags, None);
        assert_eq!(unset["isTestEnvironment"], false);
        assert_eq!(unset["environmentName"], Value::Null);

        let set = defaults_value(&env(&[("ENVIRONMENT", "staging")]), &NoFlags, None);
        assert_eq!(set["isTestEnvironment"], true);
        assert_eq!(set["environmentName"], "staging");
    }

    #[test]
    fn test_syndication_env_toggle() {
        let unset = defaults_value(&env(&[]), &NoFlags, None);
        assert_eq!(unset["syndication"], false);

        let set = defaults_value(&env(&[("SYNDICATION", "on")]), &NoFlags, None);
        assert_eq!(set["syndication"], "on");
    }

    #[test]
    fn test_version_omitted_when_unresolved() {
        let defaults = defaults_value(&env(&[]), &NoFlags, None);
        assert!(defaults.get("version").is_none());

        let with = defaults_value(&env(&[]), &NoFlags, Some("abc1234".to_string()));
        assert_eq!(with["version"], "abc1234");
    }

    #[test]
    fn test_apps_default_is_empty_sequence() {
        let defaults = defaults_value(&env(&[]), &NoFlags, None);
        assert_eq!(defaults["apps"], json!([]));
    }
}
