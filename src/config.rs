//! Mail account configuration and the application data directory.
//!
//! Values are resolved from `~/.club-info-collector/config.toml`, then a
//! `.env` file, then the process environment, later sources winning. Missing
//! credentials are not an error: the app falls back to previewing emails.

use std::env;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::Deserialize;
use tracing::warn;

use crate::error::ConfigError;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".club-info-collector";
const CONFIG_FILE_NAME: &str = "config.toml";

pub const ENV_USER: &str = "EMAIL_USER";
pub const ENV_PASSWORD: &str = "EMAIL_PASSWORD";
pub const ENV_RECIPIENT: &str = "RECIPIENT_EMAIL";
/// Used when no recipient is configured anywhere.
pub const DEFAULT_RECIPIENT: &str = "default_recipient@example.com";

/// Resolve the absolute path of the application data directory.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::NoHomeDir)?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    email_user: Option<String>,
    email_password: Option<String>,
    recipient_email: Option<String>,
}

#[derive(Clone, Default)]
pub struct MailConfig {
    pub user: Option<String>,
    pub password: Option<String>,
    pub recipient: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl MailConfig {
    /// Load from the data directory's config file and the environment.
    ///
    /// Never fails: an unreadable or malformed file is logged and skipped, and
    /// without credentials the app simply previews instead of sending.
    pub fn load(data_dir: Option<&Path>) -> Self {
        dotenvy::dotenv().ok();
        Self::load_with(data_dir, |key| env::var(key).ok())
    }

    fn load_with(data_dir: Option<&Path>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let file = match data_dir {
            Some(dir) => read_file_config(&dir.join(CONFIG_FILE_NAME)).unwrap_or_else(|err| {
                warn!(error = %err, "ignoring mail settings file");
                FileConfig::default()
            }),
            None => FileConfig::default(),
        };
        Self::resolve(file, lookup)
    }

    /// Parse a config file body, ignoring the environment. Mostly for tests.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        let file: FileConfig = toml::from_str(contents)?;
        Ok(Self::resolve(file, |_| None))
    }

    fn resolve(file: FileConfig, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let pick = |key: &str, fallback: Option<String>| {
            non_blank(lookup(key)).or_else(|| non_blank(fallback))
        };
        Self {
            user: pick(ENV_USER, file.email_user),
            password: pick(ENV_PASSWORD, file.email_password),
            recipient: pick(ENV_RECIPIENT, file.recipient_email)
                .unwrap_or_else(|| DEFAULT_RECIPIENT.to_string()),
        }
    }

    /// Account name and secret, only when both are present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((self.user.as_deref()?, self.password.as_deref()?))
    }
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("recipient", &self.recipient)
            .finish()
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(FileConfig::default()),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = read_file_config(&dir.path().join("absent.toml")).unwrap();
        let config = MailConfig::resolve(file, |_| None);
        assert!(config.credentials().is_none());
        assert_eq!(config.recipient, DEFAULT_RECIPIENT);
    }

    #[test]
    fn file_values_are_used() {
        let config = MailConfig::from_toml_str(
            "email_user = \"club@example.com\"\nemail_password = \"secret\"\nrecipient_email = \"office@example.com\"\n",
        )
        .unwrap();
        assert_eq!(config.credentials(), Some(("club@example.com", "secret")));
        assert_eq!(config.recipient, "office@example.com");
    }

    #[test]
    fn environment_overrides_file_and_blanks_are_unset() {
        let file: FileConfig =
            toml::from_str("email_user = \"file@example.com\"\nemail_password = \"\"\n").unwrap();
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_USER, "env@example.com"),
            (ENV_RECIPIENT, "  "),
        ]);
        let config = MailConfig::resolve(file, |key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.user.as_deref(), Some("env@example.com"));
        assert!(config.password.is_none());
        assert!(config.credentials().is_none(), "password is required too");
        assert_eq!(config.recipient, DEFAULT_RECIPIENT);
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "email_user = [").unwrap();
        assert!(matches!(
            read_file_config(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn debug_hides_password() {
        let config = MailConfig {
            user: Some("u".into()),
            password: Some("hunter2".into()),
            recipient: DEFAULT_RECIPIENT.into(),
        };
        assert!(!format!("{config:?}").contains("hunter2"));
    }

    #[test]
    fn malformed_file_falls_back_to_environment() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "email_user = [").unwrap();
        let env: HashMap<&str, &str> =
            HashMap::from([(ENV_USER, "env@example.com"), (ENV_PASSWORD, "secret")]);

        let config =
            MailConfig::load_with(Some(dir.path()), |key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.credentials(), Some(("env@example.com", "secret")));
        assert_eq!(config.recipient, DEFAULT_RECIPIENT);

        let config = MailConfig::load_with(Some(dir.path()), |_| None);
        assert!(config.credentials().is_none(), "preview mode, not a failure");
    }

    #[test]
    fn missing_data_dir_uses_environment_only() {
        let config = MailConfig::load_with(None, |key| {
            (key == ENV_RECIPIENT).then(|| "office@example.com".to_string())
        });
        assert_eq!(config.recipient, "office@example.com");
        assert!(config.credentials().is_none());
    }
}
