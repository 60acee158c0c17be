use crate::cli::Args;
use crate::error::ErrorContext;
use crate::types::{Config, TrackerError};
use std::env;
use std::fs;
use std::path::Path;

pub fn load_config(config_path_str: &str) -> Result<Config, TrackerError> {
    let mut config = if Path::new(config_path_str).exists() {
        let contents = fs::read_to_string(config_path_str)
            .config_context(|| format!("Failed to read config file {:?}", config_path_str))?;

        toml::from_str(&contents)
            .config_context(|| format!("Failed to parse config file {:?}", config_path_str))?
    } else {
        Config::default()
    };

    apply_env_overrides(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Merge CLI flags on top of a loaded configuration.
pub fn apply_cli_overrides(config: &mut Config, args: &Args) {
    if let Some(bind_addr) = &args.bind_addr {
        config.server.bind_addr = bind_addr.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(max_requests) = args.max_requests {
        config.rate_limit.max_requests = max_requests;
    }
    if let Some(window_secs) = args.window_secs {
        config.rate_limit.window_secs = window_secs;
    }
    if let Some(timeout_secs) = args.probe_timeout_secs {
        config.probe.timeout_secs = timeout_secs;
    }
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(value) = env::var("IDENTITRACE_MAX_REQUESTS") {
        if let Ok(parsed) = value.parse() {
            config.rate_limit.max_requests = parsed;
        }
    }
    if let Ok(value) = env::var("IDENTITRACE_WINDOW_SECS") {
        if let Ok(parsed) = value.parse() {
            config.rate_limit.window_secs = parsed;
        }
    }
    if let Ok(value) = env::var("IDENTITRACE_PROXY") {
        config.upstream.proxy = Some(value);
    }
}

fn validate_config(config: &Config) -> Result<(), TrackerError> {
    if config.rate_limit.max_requests == 0 {
        return Err(TrackerError::ConfigError(
            "rate_limit.max_requests must be greater than 0".to_string(),
        ));
    }
    if config.rate_limit.window_secs == 0 {
        return Err(TrackerError::ConfigError(
            "rate_limit.window_secs must be greater than 0".to_string(),
        ));
    }
    if config.probe.timeout_secs == 0 {
        return Err(TrackerError::ConfigError(
            "probe.timeout_secs must be greater than 0".to_string(),
        ));
    }
    if config.upstream.timeout_secs == 0 {
        return Err(TrackerError::ConfigError(
            "upstream.timeout_secs must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = load_config("/nonexistent/identitrace.toml").unwrap();
        assert_eq!(config.rate_limit.max_requests, 10);
        assert_eq!(config.rate_limit.window_secs, 60);
        assert_eq!(config.probe.timeout_secs, 5);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[rate_limit]\nmax_requests = 3\n\n[server]\nport = 9090"
        )
        .unwrap();

        let config = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.rate_limit.max_requests, 3);
        assert_eq!(config.server.port, 9090);
        // Untouched sections keep their defaults
        assert_eq!(config.probe.timeout_secs, 5);
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[rate_limit]\nwindow_secs = 0").unwrap();

        let result = load_config(file.path().to_str().unwrap());
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();
        let args = Args {
            bind_addr: Some("127.0.0.1".to_string()),
            port: Some(3000),
            max_requests: Some(5),
            window_secs: None,
            probe_timeout_secs: Some(2),
            silent: false,
            verbose: false,
            config_path: None,
        };

        apply_cli_overrides(&mut config, &args);
        assert_eq!(config.server.bind_addr, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.rate_limit.max_requests, 5);
        assert_eq!(config.rate_limit.window_secs, 60);
        assert_eq!(config.probe.timeout_secs, 2);
    }
}
