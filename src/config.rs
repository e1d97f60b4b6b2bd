//! Server configuration and startup seeding for rolodexd.
//!
//! [`ServerConfig`] carries everything the daemon needs to bind and log.
//! A seed file is a JSON or YAML array of clients loaded into the repository
//! before the server accepts requests; every seeded record goes through the same
//! validation as a `POST /clients`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::Level;

use crate::{Client, ClientRepository, RepositoryError, ValidationErrors, validate_client};

/// Default bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default bind port.
pub const DEFAULT_PORT: u16 = 8080;

/// Runtime configuration for the rolodex daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind the HTTP server.
    pub host: String,
    /// Port to bind the HTTP server.
    pub port: u16,
    /// Optional seed file loaded at startup.
    pub seed: Option<PathBuf>,
    /// Log at debug level by default.
    pub verbose: bool,
    /// Emit JSON log lines.
    pub json_logs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            seed: None,
            verbose: false,
            json_logs: false,
        }
    }
}

impl ServerConfig {
    /// Returns the `host:port` string to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the default log level implied by `verbose`.
    pub fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }
}

/// Errors raised while loading configuration or seed data.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The seed file could not be read.
    #[error("failed to read seed file {path:?}: {source}")]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
    /// The seed file is not a JSON array of clients.
    #[error("failed to parse seed file {path:?} as json: {source}")]
    Json {
        /// The file that failed.
        path: PathBuf,
        /// The underlying parse error.
        source: serde_json::Error,
    },
    /// The seed file is not a YAML sequence of clients.
    #[error("failed to parse seed file {path:?} as yaml: {source}")]
    Yaml {
        /// The file that failed.
        path: PathBuf,
        /// The underlying parse error.
        source: serde_yml::Error,
    },
    /// A seeded client failed validation.
    #[error("seed client #{index} ({id:?}) is invalid: {errors:?}")]
    InvalidClient {
        /// Zero-based position in the seed file.
        index: usize,
        /// The offending client's id, possibly blank.
        id: String,
        /// What was wrong with it.
        errors: ValidationErrors,
    },
    /// The repository refused a seeded client.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Reads and validates the clients in a seed file.
///
/// Files ending in `.yaml` or `.yml` are parsed as YAML; anything else as JSON.
pub fn load_seed_clients(path: &Path) -> Result<Vec<Client>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let clients: Vec<Client> = if is_yaml {
        serde_yml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?
    };

    for (index, client) in clients.iter().enumerate() {
        validate_client(client).map_err(|errors| ConfigError::InvalidClient {
            index,
            id: client.id.clone(),
            errors,
        })?;
    }

    Ok(clients)
}

/// Loads `path` and creates every client in `repository`, returning the count.
pub fn seed_repository(repository: &dyn ClientRepository, path: &Path) -> Result<usize, ConfigError> {
    let clients = load_seed_clients(path)?;
    for client in &clients {
        repository.create(client)?;
    }
    tracing::info!(count = clients.len(), path = %path.display(), "seeded clients");
    Ok(clients.len())
}

#[cfg(test)]
mod tests {
    use std::process;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;
    use crate::InMemoryClientRepository;

    struct SeedFile(PathBuf);

    impl SeedFile {
        fn new(suffix: &str, content: &str) -> Self {
            let timestamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos();
            let path = std::env::temp_dir().join(format!(
                "rolodex_seed_{}_{}_{}",
                process::id(),
                timestamp,
                suffix
            ));
            fs::write(&path, content).unwrap();
            Self(path)
        }
    }

    impl Drop for SeedFile {
        fn drop(&mut self) {
            fs::remove_file(&self.0).ok();
        }
    }

    const JSON_SEED: &str = r#"[
        {"id": "1", "firstName": "Junvic", "lastName": "Valdez", "email": "contact@junvic.me", "phoneNumber": "+123456789"},
        {"id": "2", "firstName": "John", "lastName": "Smith", "email": "johnsmith@gmail.com", "phoneNumber": "+183561908"}
    ]"#;

    const YAML_SEED: &str = "\
- id: '1'
  firstName: Junvic
  lastName: Valdez
  email: contact@junvic.me
  phoneNumber: '+123456789'
";

    #[test]
    fn defaults_bind_localhost_8080() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.log_level(), Level::INFO);
    }

    #[test]
    fn verbose_raises_log_level() {
        let config = ServerConfig {
            verbose: true,
            ..ServerConfig::default()
        };
        assert_eq!(config.log_level(), Level::DEBUG);
    }

    #[test]
    fn loads_json_seed() {
        let file = SeedFile::new("clients.json", JSON_SEED);
        let clients = load_seed_clients(&file.0).unwrap();
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[1].last_name, "Smith");
    }

    #[test]
    fn loads_yaml_seed() {
        let file = SeedFile::new("clients.yaml", YAML_SEED);
        let clients = load_seed_clients(&file.0).unwrap();
        assert_eq!(
            clients,
            vec![Client::new(
                "1",
                "Junvic",
                "Valdez",
                "contact@junvic.me",
                "+123456789"
            )]
        );
    }

    #[test]
    fn invalid_seed_client_is_reported_with_position() {
        let file = SeedFile::new(
            "bad.json",
            r#"[{"id": "x", "firstName": "A", "lastName": "B", "email": "nope", "phoneNumber": "1"}]"#,
        );
        match load_seed_clients(&file.0) {
            Err(ConfigError::InvalidClient { index, id, errors }) => {
                assert_eq!(index, 0);
                assert_eq!(id, "x");
                assert!(errors.contains("email"));
            }
            other => panic!("expected invalid client, got {:?}", other),
        }
    }

    #[test]
    fn malformed_seed_is_a_parse_error() {
        let file = SeedFile::new("broken.json", "{not json");
        assert!(matches!(
            load_seed_clients(&file.0),
            Err(ConfigError::Json { .. })
        ));
    }

    #[test]
    fn missing_seed_is_an_io_error() {
        let path = std::env::temp_dir().join("rolodex_seed_that_does_not_exist.json");
        assert!(matches!(
            load_seed_clients(&path),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn seeding_fills_the_repository() {
        let file = SeedFile::new("fill.json", JSON_SEED);
        let repository = InMemoryClientRepository::new();

        assert_eq!(seed_repository(&repository, &file.0).unwrap(), 2);
        assert_eq!(repository.count().unwrap(), 2);
        assert!(repository.find_by_id("2").unwrap().is_some());
    }

    #[test]
    fn seeding_duplicates_fails() {
        let file = SeedFile::new("dupes.json", JSON_SEED);
        let repository = InMemoryClientRepository::new();
        seed_repository(&repository, &file.0).unwrap();

        assert!(matches!(
            seed_repository(&repository, &file.0),
            Err(ConfigError::Repository(RepositoryError::AlreadyExists(_)))
        ));
    }
}
