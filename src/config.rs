use std::{env, path::PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use argon2::password_hash::PasswordHash;

use crate::web::auth::{hash_password, verify_password};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_URL: &str = "sqlite://cineartist.db?mode=rwc";
const DEFAULT_DATA_DIR: &str = ".";
const DEFAULT_UPLOAD_DIR: &str = "uploads/stories";
const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Where submitted form rows are persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    /// One table per submission kind inside a single SQLite file.
    Sqlite { database_url: String },
    /// One append-only CSV file per submission kind under `data_dir`.
    Csv { data_dir: PathBuf },
}

impl StoreBackend {
    pub fn label(&self) -> &'static str {
        match self {
            StoreBackend::Sqlite { .. } => "sqlite",
            StoreBackend::Csv { .. } => "csv",
        }
    }
}

/// Username plus argon2 hash of the single admin account.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password_hash: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }

    /// Accepts a precomputed PHC string, refusing one argon2 cannot parse.
    pub fn from_hash(username: impl Into<String>, password_hash: &str) -> Result<Self> {
        PasswordHash::new(password_hash)
            .map_err(|err| anyhow!("ADMIN_PASSWORD_HASH is not a valid PHC string: {err}"))?;
        Ok(Self::new(username, password_hash))
    }

    pub fn from_plaintext(username: impl Into<String>, password: &str) -> Result<Self> {
        let password_hash = hash_password(password)
            .map_err(|err| anyhow!("failed to hash admin password: {err}"))?;
        Ok(Self::new(username, password_hash))
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn matches(&self, username: &str, password: &str) -> bool {
        username == self.username && verify_password(password, &self.password_hash)
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub struct SiteConfig {
    pub port: u16,
    pub store: StoreBackend,
    pub upload_dir: PathBuf,
    pub admin: AdminCredentials,
}

impl SiteConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got `{raw}`"))?,
            None => DEFAULT_PORT,
        };

        let store = match non_empty("RECORD_STORE").as_deref().map(str::trim) {
            None | Some("sqlite") => StoreBackend::Sqlite {
                database_url: non_empty("DATABASE_URL")
                    .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            },
            Some("csv") => StoreBackend::Csv {
                data_dir: non_empty("DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            },
            Some(other) => bail!("RECORD_STORE must be `sqlite` or `csv`, got `{other}`"),
        };

        let upload_dir = non_empty("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR));

        let username =
            non_empty("ADMIN_USERNAME").unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_string());
        let admin = match (non_empty("ADMIN_PASSWORD_HASH"), lookup("ADMIN_PASSWORD")) {
            (Some(hash), _) => AdminCredentials::from_hash(username, hash.trim())?,
            (None, Some(password)) if !password.is_empty() => {
                AdminCredentials::from_plaintext(username, &password)?
            }
            _ => bail!("ADMIN_PASSWORD_HASH or ADMIN_PASSWORD env var is missing"),
        };

        Ok(Self {
            port,
            store,
            upload_dir,
            admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_sqlite_backend() {
        let config = SiteConfig::from_lookup(lookup_from(&[("ADMIN_PASSWORD", "s3cret")]))
            .expect("config");

        assert_eq!(config.port, 8080);
        assert_eq!(
            config.store,
            StoreBackend::Sqlite {
                database_url: DEFAULT_DATABASE_URL.to_string()
            }
        );
        assert_eq!(config.upload_dir, PathBuf::from("uploads/stories"));
        assert_eq!(config.admin.username(), "admin");
        assert!(config.admin.matches("admin", "s3cret"));
        assert!(!config.admin.matches("admin", "S3cret"));
    }

    #[test]
    fn selects_csv_backend_with_data_dir() {
        let config = SiteConfig::from_lookup(lookup_from(&[
            ("RECORD_STORE", "csv"),
            ("DATA_DIR", "/var/lib/cineartist"),
            ("PORT", "3000"),
            ("ADMIN_USERNAME", "producer"),
            ("ADMIN_PASSWORD", "pw"),
        ]))
        .expect("config");

        assert_eq!(config.port, 3000);
        assert_eq!(
            config.store,
            StoreBackend::Csv {
                data_dir: PathBuf::from("/var/lib/cineartist")
            }
        );
        assert!(config.admin.matches("producer", "pw"));
        assert!(!config.admin.matches("admin", "pw"));
    }

    #[test]
    fn accepts_precomputed_hash() {
        let hash = hash_password("from-hash").expect("hash");
        let config = SiteConfig::from_lookup(lookup_from(&[("ADMIN_PASSWORD_HASH", hash.as_str())]))
            .expect("config");

        assert!(config.admin.matches("admin", "from-hash"));
    }

    #[test]
    fn rejects_unparseable_hash() {
        let err = SiteConfig::from_lookup(lookup_from(&[
            ("ADMIN_PASSWORD_HASH", "plain-text-by-mistake"),
            ("ADMIN_PASSWORD", "fallback"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("ADMIN_PASSWORD_HASH"));

        assert!(AdminCredentials::from_hash("admin", "$argon2id$broken").is_err());
    }

    #[test]
    fn rejects_missing_admin_secret() {
        let err = SiteConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("ADMIN_PASSWORD"));
    }

    #[test]
    fn rejects_unknown_backend() {
        let err = SiteConfig::from_lookup(lookup_from(&[
            ("RECORD_STORE", "postgres"),
            ("ADMIN_PASSWORD", "pw"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("RECORD_STORE"));
    }
}
