use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration (loaded from mdshare.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    pub share: LinkConfig,
    pub log: LogConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Origin that share URLs are built on (default: https://mdshare.app)
    pub origin: String,
    /// Largest payload, in bytes, that will be put in a URL fragment
    pub max_payload_bytes: usize,
    /// Minimum password length in characters
    pub min_password_len: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (default: warn)
    pub level: String,
    /// Log format: "json" or "text"
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory that imported documents are written into
    pub documents_dir: PathBuf,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            origin: "https://mdshare.app".into(),
            max_payload_bytes: 60_000,
            min_password_len: 4,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "text".into(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            documents_dir: PathBuf::from("~/.local/share/mdshare/documents"),
        }
    }
}

impl ShareConfig {
    /// Load from a TOML file. `Ok(None)` when the file does not exist.
    ///
    /// Nothing is logged here: callers usually load config before the
    /// subscriber exists and report a missing file themselves.
    pub fn load(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        toml::from_str(&content)
            .map(Some)
            .with_context(|| format!("parsing config: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
[share]
origin = "https://notes.example.com"
max_payload_bytes = 32000
min_password_len = 8

[log]
level = "debug"
format = "json"

[store]
documents_dir = "/var/lib/mdshare/docs"
"#;
        let config: ShareConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.share.origin, "https://notes.example.com");
        assert_eq!(config.share.max_payload_bytes, 32000);
        assert_eq!(config.share.min_password_len, 8);
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.format, "json");
        assert_eq!(
            config.store.documents_dir,
            PathBuf::from("/var/lib/mdshare/docs")
        );
    }

    #[test]
    fn test_parse_defaults() {
        let config: ShareConfig = toml::from_str("").unwrap();

        assert_eq!(config.share.origin, "https://mdshare.app");
        assert_eq!(config.share.max_payload_bytes, 60_000);
        assert_eq!(config.share.min_password_len, 4);
        assert_eq!(config.log.level, "warn");
        assert_eq!(config.log.format, "text");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
[share]
origin = "http://localhost:5173"
"#;
        let config: ShareConfig = toml::from_str(toml_str).unwrap();

        // Overridden
        assert_eq!(config.share.origin, "http://localhost:5173");
        // Defaults
        assert_eq!(config.share.max_payload_bytes, 60_000);
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = ShareConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: ShareConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.share.origin, parsed.share.origin);
        assert_eq!(config.store.documents_dir, parsed.store.documents_dir);
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let tmp = tempfile::TempDir::new().unwrap();
        let loaded = ShareConfig::load(&tmp.path().join("absent.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_existing_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("mdshare.toml");
        std::fs::write(&path, "[share]\nmin_password_len = 6\n").unwrap();

        let config = ShareConfig::load(&path).unwrap().expect("file exists");
        assert_eq!(config.share.min_password_len, 6);
        assert_eq!(config.share.max_payload_bytes, 60_000);
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("mdshare.toml");
        std::fs::write(&path, "[share\norigin = ").unwrap();

        let err = ShareConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("parsing config"));
    }
}
