//! Configuration System
//!
//! Handles loading the sync server configuration from TOML files and
//! environment variables. Environment variables override file settings.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

const APPLICATION_NAME: &str = "ausgabenzettel";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Sync server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory receiving `current.html` and its etag
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Page served until the first successful PUT
    #[serde(default = "default_initial_document")]
    pub initial_document: PathBuf,

    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    #[serde(default)]
    pub tls: TlsConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_upload_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join(APPLICATION_NAME))
        .unwrap_or_else(|| PathBuf::from("./upload"))
}

fn default_initial_document() -> PathBuf {
    PathBuf::from("initial").join("index.html")
}

fn default_max_body_size() -> usize {
    10 * 1024 * 1024 // 10 MB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            upload_dir: default_upload_dir(),
            initial_document: default_initial_document(),
            max_body_size: default_max_body_size(),
            tls: TlsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Socket address string to bind
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Mutual TLS configuration
///
/// Unset paths are looked up by their default file name in the user's
/// config directory, then in `/etc/ausgabenzettel`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TlsConfig {
    /// Serve HTTPS and require a client certificate
    #[serde(default)]
    pub enabled: bool,

    pub server_cert: Option<PathBuf>,
    pub server_key: Option<PathBuf>,

    /// CA that client certificates must chain to
    pub client_ca: Option<PathBuf>,
}

/// Certificate files of the TLS setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateKind {
    ServerCert,
    ServerKey,
    ClientCa,
}

impl CertificateKind {
    /// File name searched for when no path is configured
    pub fn file_name(self) -> &'static str {
        match self {
            CertificateKind::ServerCert => "server.cer",
            CertificateKind::ServerKey => "server.key",
            CertificateKind::ClientCa => "ca.cer",
        }
    }
}

impl std::fmt::Display for CertificateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CertificateKind::ServerCert => "server certificate",
            CertificateKind::ServerKey => "server key",
            CertificateKind::ClientCa => "client CA",
        };
        f.write_str(name)
    }
}

/// Resolved certificate paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsFiles {
    pub server_cert: PathBuf,
    pub server_key: PathBuf,
    pub client_ca: PathBuf,
}

impl TlsConfig {
    /// Directories searched for certificates without a configured path
    pub fn search_dirs() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join(APPLICATION_NAME)),
            Some(PathBuf::from("/etc").join(APPLICATION_NAME)),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Resolve the certificate files, `None` when TLS is disabled
    pub fn resolve(&self) -> Result<Option<TlsFiles>, ConfigError> {
        self.resolve_in(&Self::search_dirs())
    }

    /// Resolve against the given search directories
    pub fn resolve_in(&self, dirs: &[PathBuf]) -> Result<Option<TlsFiles>, ConfigError> {
        if !self.enabled {
            return Ok(None);
        }
        Ok(Some(TlsFiles {
            server_cert: find_certificate(
                self.server_cert.as_deref(),
                CertificateKind::ServerCert,
                dirs,
            )?,
            server_key: find_certificate(
                self.server_key.as_deref(),
                CertificateKind::ServerKey,
                dirs,
            )?,
            client_ca: find_certificate(
                self.client_ca.as_deref(),
                CertificateKind::ClientCa,
                dirs,
            )?,
        }))
    }
}

fn find_certificate(
    configured: Option<&Path>,
    kind: CertificateKind,
    dirs: &[PathBuf],
) -> Result<PathBuf, ConfigError> {
    // A configured path is never replaced by a search hit
    let candidates: Vec<PathBuf> = match configured {
        Some(path) => vec![path.to_path_buf()],
        None => dirs.iter().map(|d| d.join(kind.file_name())).collect(),
    };

    match candidates.iter().find(|p| p.is_file()) {
        Some(path) => {
            tracing::debug!(%kind, ?path, "Found certificate file");
            Ok(path.clone())
        }
        None => Err(ConfigError::CertificateNotFound {
            kind,
            searched: candidates,
        }),
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Whether JSON log lines were requested
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join(APPLICATION_NAME).join("config.toml")),
            Some(PathBuf::from("/etc").join(APPLICATION_NAME).join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any variable lookup
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Server overrides
        if let Some(listening) = lookup("AUSGABENZETTEL_LISTENING") {
            match listening.parse::<SocketAddr>() {
                Ok(addr) => {
                    self.server.host = addr.ip().to_string();
                    self.server.port = addr.port();
                }
                Err(e) => tracing::warn!(%listening, error = %e, "Ignoring invalid listen address"),
            }
        }
        if let Some(host) = lookup("AUSGABENZETTEL_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("AUSGABENZETTEL_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Some(dir) = lookup("AUSGABENZETTEL_UPLOAD_DIR") {
            self.server.upload_dir = PathBuf::from(dir);
        }
        if let Some(initial) = lookup("AUSGABENZETTEL_INITIAL") {
            self.server.initial_document = PathBuf::from(initial);
        }

        // TLS overrides
        if let Some(tls) = lookup("AUSGABENZETTEL_TLS") {
            self.server.tls.enabled = matches!(
                tls.to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        if let Some(path) = lookup("AUSGABENZETTEL_SERVER_CERT") {
            self.server.tls.server_cert = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup("AUSGABENZETTEL_SERVER_KEY") {
            self.server.tls.server_key = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup("AUSGABENZETTEL_CLIENT_CA") {
            self.server.tls.client_ca = Some(PathBuf::from(path));
        }

        // Logging overrides
        if let Some(level) = lookup("AUSGABENZETTEL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("AUSGABENZETTEL_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("No {kind} found, searched {searched:?}")]
    CertificateNotFound {
        kind: CertificateKind,
        searched: Vec<PathBuf>,
    },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Ausgabenzettel Configuration
#
# Environment variables override these settings:
# - AUSGABENZETTEL_LISTENING (host:port)
# - AUSGABENZETTEL_HOST
# - AUSGABENZETTEL_PORT
# - AUSGABENZETTEL_UPLOAD_DIR
# - AUSGABENZETTEL_INITIAL
# - AUSGABENZETTEL_TLS (true/false)
# - AUSGABENZETTEL_SERVER_CERT
# - AUSGABENZETTEL_SERVER_KEY
# - AUSGABENZETTEL_CLIENT_CA
# - AUSGABENZETTEL_LOG_LEVEL
# - AUSGABENZETTEL_LOG_FORMAT

[server]
# Address to bind
host = "127.0.0.1"
port = 3000

# Where the synced page and its etag are stored
upload_dir = "./upload"

# Page served before the first sync
initial_document = "initial/index.html"

# Largest accepted page (bytes)
max_body_size = 10485760

[server.tls]
# Serve HTTPS and require client certificates
enabled = false

# Without a path, server.cer, server.key and ca.cer are looked up in
# ~/.config/ausgabenzettel and then /etc/ausgabenzettel
# server_cert = "/etc/ausgabenzettel/server.cer"
# server_key = "/etc/ausgabenzettel/server.key"
# client_ca = "/etc/ausgabenzettel/ca.cer"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.upload_dir, PathBuf::from("./upload"));
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.is_json());
        assert!(!config.server.tls.enabled);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::parse("[server]\nport = 8443\n").unwrap();
        assert_eq!(config.server.port, 8443);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.initial_document, default_initial_document());
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("AUSGABENZETTEL_LISTENING", "0.0.0.0:8080"),
            ("AUSGABENZETTEL_UPLOAD_DIR", "/srv/zettel"),
            ("AUSGABENZETTEL_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.addr(), "0.0.0.0:8080");
        assert_eq!(config.server.upload_dir, PathBuf::from("/srv/zettel"));
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_invalid_listen_address_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| {
            (key == "AUSGABENZETTEL_LISTENING").then(|| "not an address".to_string())
        });
        assert_eq!(config.server.addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_tls_disabled_resolves_to_none() {
        let tls = TlsConfig::default();
        assert_eq!(tls.resolve_in(&[]).unwrap(), None);
    }

    #[test]
    fn test_tls_files_found_in_search_order() {
        let user = tempfile::tempdir().unwrap();
        let system = tempfile::tempdir().unwrap();
        for name in ["server.cer", "server.key", "ca.cer"] {
            std::fs::write(system.path().join(name), "pem").unwrap();
        }
        // The user directory shadows the system one
        std::fs::write(user.path().join("ca.cer"), "pem").unwrap();

        let tls = TlsConfig {
            enabled: true,
            ..TlsConfig::default()
        };
        let dirs = [user.path().to_path_buf(), system.path().to_path_buf()];
        let files = tls.resolve_in(&dirs).unwrap().unwrap();

        assert_eq!(files.server_cert, system.path().join("server.cer"));
        assert_eq!(files.server_key, system.path().join("server.key"));
        assert_eq!(files.client_ca, user.path().join("ca.cer"));
    }

    #[test]
    fn test_tls_configured_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["server.cer", "server.key", "ca.cer"] {
            std::fs::write(dir.path().join(name), "pem").unwrap();
        }
        let own_ca = dir.path().join("clients.pem");
        std::fs::write(&own_ca, "pem").unwrap();

        let tls = TlsConfig {
            enabled: true,
            client_ca: Some(own_ca.clone()),
            ..TlsConfig::default()
        };
        let files = tls.resolve_in(&[dir.path().to_path_buf()]).unwrap().unwrap();
        assert_eq!(files.client_ca, own_ca);
    }

    #[test]
    fn test_tls_missing_certificate() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("server.cer"), "pem").unwrap();

        let tls = TlsConfig {
            enabled: true,
            ..TlsConfig::default()
        };
        let err = tls.resolve_in(&[dir.path().to_path_buf()]).unwrap_err();
        match err {
            ConfigError::CertificateNotFound { kind, searched } => {
                assert_eq!(kind, CertificateKind::ServerKey);
                assert_eq!(searched, vec![dir.path().join("server.key")]);
            }
            other => panic!("unexpected error: {other}"),
        }

        // A configured path that does not exist is not replaced by a search hit
        let tls = TlsConfig {
            enabled: true,
            server_cert: Some(dir.path().join("gone.cer")),
            ..TlsConfig::default()
        };
        let err = tls.resolve_in(&[dir.path().to_path_buf()]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::CertificateNotFound { kind: CertificateKind::ServerCert, .. }
        ));
    }

    #[test]
    fn test_tls_overrides() {
        let vars: HashMap<&str, &str> = [
            ("AUSGABENZETTEL_TLS", "true"),
            ("AUSGABENZETTEL_CLIENT_CA", "/srv/ca.pem"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert!(config.server.tls.enabled);
        assert_eq!(config.server.tls.client_ca, Some(PathBuf::from("/srv/ca.pem")));
        assert_eq!(config.server.tls.server_cert, None);
    }

    #[test]
    fn test_tls_section_parses() {
        let config = Config::parse(
            "[server.tls]\nenabled = true\nserver_key = \"/etc/zettel/key.pem\"\n",
        )
        .unwrap();
        assert!(config.server.tls.enabled);
        assert_eq!(
            config.server.tls.server_key,
            Some(PathBuf::from("/etc/zettel/key.pem"))
        );
    }
}
