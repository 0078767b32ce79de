//! Parser configuration and factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use satzcheck_core::traits::DependencyParser;

use crate::http::HttpParser;
use crate::mock::MockParser;

/// Configuration for a parser backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParserConfig {
    Http {
        #[serde(default = "default_base_url")]
        base_url: String,
        #[serde(default = "default_timeout")]
        timeout_secs: u64,
    },
    Mock,
}

fn default_base_url() -> String {
    "http://localhost:8090".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig::Http {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    parser: ParserConfig,
}

/// Load parser configuration from well-known paths.
///
/// Search order:
/// 1. `satzcheck.toml` in the current directory
/// 2. `~/.config/satzcheck/config.toml`
///
/// Falls back to the default HTTP backend. `SATZCHECK_PARSER_URL`
/// overrides the base URL in either case.
pub fn load_config() -> Result<ParserConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ParserConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("satzcheck.toml");
        if local.exists() {
            Some(local)
        } else {
            config_dir()
                .map(|dir| dir.join("config.toml"))
                .filter(|p| p.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ConfigFile>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
                .parser
        }
        None => ParserConfig::default(),
    };

    if let Ok(url) = std::env::var("SATZCHECK_PARSER_URL") {
        if let ParserConfig::Http { base_url, .. } = &mut config {
            *base_url = url;
        }
    }

    Ok(config)
}

fn config_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("satzcheck"))
}

/// Create a parser instance from its configuration.
pub fn create_parser(config: &ParserConfig) -> Arc<dyn DependencyParser> {
    match config {
        ParserConfig::Http {
            base_url,
            timeout_secs,
        } => Arc::new(HttpParser::with_timeout(base_url, *timeout_secs)),
        ParserConfig::Mock => Arc::new(MockParser::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_local_service() {
        let config = ParserConfig::default();
        match config {
            ParserConfig::Http {
                base_url,
                timeout_secs,
            } => {
                assert_eq!(base_url, "http://localhost:8090");
                assert_eq!(timeout_secs, 30);
            }
            ParserConfig::Mock => panic!("default should be http"),
        }
    }

    #[test]
    fn parse_config_file() {
        let toml_str = r#"
[parser]
type = "http"
base_url = "http://parser.internal:9000"
timeout_secs = 5
"#;
        let file: ConfigFile = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            file.parser,
            ParserConfig::Http { ref base_url, timeout_secs: 5 } if base_url == "http://parser.internal:9000"
        ));
    }

    #[test]
    fn load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[parser]\ntype = \"mock\"\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert!(matches!(config, ParserConfig::Mock));
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/satzcheck.toml"))).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn factory_builds_mock() {
        let parser = create_parser(&ParserConfig::Mock);
        assert_eq!(parser.name(), "mock");
    }
}
