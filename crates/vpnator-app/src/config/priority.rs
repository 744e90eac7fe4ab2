//! Backend endpoint resolution
//!
//! Priority order:
//! 1. `--endpoint` on the command line
//! 2. `VPNATOR_ENDPOINT` environment variable
//! 3. `[backend] endpoint` in config.toml
//! 4. [`DEFAULT_ENDPOINT`]

use std::fmt;

use url::Url;
use vpnator_core::prelude::*;

use super::types::{Settings, DEFAULT_ENDPOINT};

/// Environment variable overriding the configured endpoint
pub const ENDPOINT_ENV_VAR: &str = "VPNATOR_ENDPOINT";

/// Where the endpoint came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointSource {
    CommandLine,
    Environment,
    ConfigFile,
    Default,
}

impl fmt::Display for EndpointSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EndpointSource::CommandLine => "command line",
            EndpointSource::Environment => ENDPOINT_ENV_VAR,
            EndpointSource::ConfigFile => "config file",
            EndpointSource::Default => "default",
        };
        f.write_str(name)
    }
}

/// Validated backend URL with its source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    pub url: String,
    pub source: EndpointSource,
}

/// Resolve the endpoint, reading [`ENDPOINT_ENV_VAR`] from the environment.
pub fn resolve_endpoint(cli: Option<&str>, settings: &Settings) -> Result<ResolvedEndpoint> {
    let env = std::env::var(ENDPOINT_ENV_VAR).ok();
    resolve_endpoint_from(cli, env.as_deref(), settings)
}

/// Resolve the endpoint from explicit inputs. Blank values are skipped.
pub fn resolve_endpoint_from(
    cli: Option<&str>,
    env: Option<&str>,
    settings: &Settings,
) -> Result<ResolvedEndpoint> {
    fn non_blank(value: Option<&str>) -> Option<&str> {
        value.map(str::trim).filter(|v| !v.is_empty())
    }

    let (raw, source) = if let Some(value) = non_blank(cli) {
        (value, EndpointSource::CommandLine)
    } else if let Some(value) = non_blank(env) {
        (value, EndpointSource::Environment)
    } else if let Some(value) = non_blank(settings.backend.endpoint.as_deref()) {
        (value, EndpointSource::ConfigFile)
    } else {
        (DEFAULT_ENDPOINT, EndpointSource::Default)
    };

    let url = check_endpoint(raw)
        .map_err(|reason| Error::config_invalid(format!("{} (from {})", reason, source)))?;
    debug!("Backend endpoint {} (from {})", url, source);
    Ok(ResolvedEndpoint { url, source })
}

/// Check that `raw` is a `ws://` or `wss://` URL with a host.
pub fn validate_endpoint(raw: &str) -> Result<String> {
    check_endpoint(raw).map_err(Error::config_invalid)
}

fn check_endpoint(raw: &str) -> std::result::Result<String, String> {
    let url = Url::parse(raw).map_err(|e| format!("invalid endpoint '{}': {}", raw, e))?;

    match url.scheme() {
        "ws" | "wss" => {}
        other => {
            return Err(format!(
                "endpoint '{}' must use ws:// or wss://, not {}://",
                raw, other
            ))
        }
    }

    if url.host_str().is_none() {
        return Err(format!("endpoint '{}' has no host", raw));
    }

    Ok(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn settings_with(endpoint: Option<&str>) -> Settings {
        let mut settings = Settings::default();
        settings.backend.endpoint = endpoint.map(str::to_string);
        settings
    }

    #[test]
    fn test_cli_wins() {
        let resolved = resolve_endpoint_from(
            Some("ws://cli:1/ws"),
            Some("ws://env:2/ws"),
            &settings_with(Some("ws://file:3/ws")),
        )
        .unwrap();
        assert_eq!(resolved.url, "ws://cli:1/ws");
        assert_eq!(resolved.source, EndpointSource::CommandLine);
    }

    #[test]
    fn test_env_beats_config_file() {
        let resolved = resolve_endpoint_from(
            None,
            Some("ws://env:2/ws"),
            &settings_with(Some("ws://file:3/ws")),
        )
        .unwrap();
        assert_eq!(resolved.url, "ws://env:2/ws");
        assert_eq!(resolved.source, EndpointSource::Environment);
    }

    #[test]
    fn test_config_file_beats_default() {
        let resolved =
            resolve_endpoint_from(None, Some("  "), &settings_with(Some("wss://file/ws"))).unwrap();
        assert_eq!(resolved.url, "wss://file/ws");
        assert_eq!(resolved.source, EndpointSource::ConfigFile);
    }

    #[test]
    fn test_default_endpoint() {
        let resolved = resolve_endpoint_from(None, None, &Settings::default()).unwrap();
        assert_eq!(resolved.url, DEFAULT_ENDPOINT);
        assert_eq!(resolved.source, EndpointSource::Default);
    }

    #[test]
    fn test_rejects_http_scheme() {
        let err = validate_endpoint("http://127.0.0.1:8000/ws").unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("ws://"));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(validate_endpoint("not a url").is_err());
        assert!(validate_endpoint("").is_err());
    }

    #[test]
    fn test_invalid_source_is_named() {
        let err = resolve_endpoint_from(None, None, &settings_with(Some("ftp://x/"))).unwrap_err();
        assert!(err.to_string().contains("config file"));
    }

    #[test]
    #[serial]
    fn test_resolve_endpoint_reads_environment() {
        std::env::set_var(ENDPOINT_ENV_VAR, "wss://from-env.example/ws");
        let resolved = resolve_endpoint(None, &Settings::default());
        std::env::remove_var(ENDPOINT_ENV_VAR);

        let resolved = resolved.unwrap();
        assert_eq!(resolved.url, "wss://from-env.example/ws");
        assert_eq!(resolved.source, EndpointSource::Environment);
    }

    #[test]
    #[serial]
    fn test_resolve_endpoint_without_environment() {
        std::env::remove_var(ENDPOINT_ENV_VAR);
        let resolved = resolve_endpoint(None, &Settings::default()).unwrap();
        assert_eq!(resolved.source, EndpointSource::Default);
    }
}
