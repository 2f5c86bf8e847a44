use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use sesame_api::{MappingPolicy, SesameError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub trusted_email_suffix: String,
    pub request_timeout_ms: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            trusted_email_suffix: "@mellenger.com".to_string(),
            request_timeout_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSeed {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub listen_addr: String,
    /// Host the site is served as; the request Host header is used when unset.
    pub public_host: Option<String>,
    pub provider: ProviderSettings,
    pub mapping: MappingPolicy,
    /// Accounts seeding the in-memory store; declaration order is lookup order.
    pub accounts: Vec<AccountSeed>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            public_host: None,
            provider: ProviderSettings::default(),
            mapping: MappingPolicy::default(),
            accounts: Vec::new(),
        }
    }
}

pub fn validate_settings(settings: &Settings) -> Result<(), SesameError> {
    if settings.listen_addr.is_empty() {
        return Err(SesameError::Validation("listen_addr is empty".to_string()));
    }
    if !settings.provider.trusted_email_suffix.contains('@') {
        return Err(SesameError::Validation(format!(
            "trusted_email_suffix {:?} is not an email domain suffix",
            settings.provider.trusted_email_suffix
        )));
    }
    if settings.provider.request_timeout_ms == 0 {
        return Err(SesameError::Validation(
            "request_timeout_ms must be positive".to_string(),
        ));
    }
    if settings.mapping.enforce_user_mapping && !settings.mapping.user_mapping {
        return Err(SesameError::Validation(
            "enforce_user_mapping requires user_mapping".to_string(),
        ));
    }

    let mut seen = BTreeSet::new();
    for seed in &settings.accounts {
        if !seen.insert(&seed.id) {
            return Err(SesameError::Validation(format!(
                "duplicate account id {}",
                seed.id
            )));
        }
    }

    Ok(())
}

pub fn demo_settings() -> Settings {
    Settings {
        listen_addr: "127.0.0.1:8080".to_string(),
        public_host: Some("example.com".to_string()),
        provider: ProviderSettings::default(),
        mapping: MappingPolicy {
            user_mapping: true,
            enforce_user_mapping: false,
            default_user: Some("1".to_string()),
        },
        accounts: vec![
            AccountSeed {
                id: "1".to_string(),
                email: "admin@example.com".to_string(),
            },
            AccountSeed {
                id: "2".to_string(),
                email: "staff@mellenger.com".to_string(),
            },
        ],
    }
}

pub fn default_config_dir() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config").join("sesame")
    } else {
        PathBuf::from(".sesame")
    }
}

pub fn load_settings_from_dir(dir: &Path) -> Result<Settings, SesameError> {
    load_settings_from_file(&dir.join("sesame.toml"))
}

pub fn load_settings_from_file(path: &Path) -> Result<Settings, SesameError> {
    let content = fs::read_to_string(path)
        .map_err(|e| SesameError::NotFound(format!("failed to read {}: {e}", path.display())))?;
    let settings: Settings = toml::from_str(&content).map_err(|e| {
        SesameError::Validation(format!("invalid TOML in {}: {e}", path.display()))
    })?;
    validate_settings(&settings)?;
    Ok(settings)
}

pub fn write_default_settings(dir: &Path) -> Result<(), SesameError> {
    fs::create_dir_all(dir)
        .map_err(|e| SesameError::Internal(format!("failed to create {}: {e}", dir.display())))?;

    let path = dir.join("sesame.toml");
    if !path.exists() {
        fs::write(&path, DEFAULT_SETTINGS_TOML).map_err(|e| {
            SesameError::Internal(format!("failed to write {}: {e}", path.display()))
        })?;
    }

    Ok(())
}

const DEFAULT_SETTINGS_TOML: &str = r#"listen_addr = "127.0.0.1:8080"
# Host the site is served as; the request Host header is used when unset.
# public_host = "example.com"

[provider]
trusted_email_suffix = "@mellenger.com"
request_timeout_ms = 5000

[mapping]
user_mapping = false
enforce_user_mapping = false
default_user = "1"

[[accounts]]
id = "1"
email = "admin@example.com"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_parses_and_validates() {
        let settings: Settings = toml::from_str(DEFAULT_SETTINGS_TOML).unwrap();
        validate_settings(&settings).unwrap();
        assert_eq!(settings.mapping.default_user.as_deref(), Some("1"));
        assert_eq!(settings.provider.trusted_email_suffix, "@mellenger.com");
        assert_eq!(settings.accounts.len(), 1);
    }

    #[test]
    fn partial_toml_is_filled_with_defaults() {
        let settings: Settings = toml::from_str("listen_addr = \"0.0.0.0:9000\"").unwrap();
        assert_eq!(settings.listen_addr, "0.0.0.0:9000");
        assert!(!settings.mapping.user_mapping);
        assert_eq!(settings.provider.request_timeout_ms, 5_000);
        validate_settings(&settings).unwrap();
    }

    #[test]
    fn enforcement_without_mapping_is_rejected() {
        let mut settings = demo_settings();
        settings.mapping.user_mapping = false;
        settings.mapping.enforce_user_mapping = true;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn duplicate_account_ids_are_rejected() {
        let mut settings = demo_settings();
        settings.accounts.push(settings.accounts[0].clone());
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn suffix_without_at_sign_is_rejected() {
        let mut settings = demo_settings();
        settings.provider.trusted_email_suffix = "mellenger.com".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn demo_settings_validate() {
        validate_settings(&demo_settings()).unwrap();
    }
}
