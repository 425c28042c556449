use std::{env, path::PathBuf, time::Duration};

use crate::errors::{ClientError, ClientResult};

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub storage_path: PathBuf,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("FORMSHIP_API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:8000/api".to_string()),
            storage_path: env::var("FORMSHIP_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_storage_path()),
            request_timeout_secs: env::var("FORMSHIP_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> ClientResult<()> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://")) {
            return Err(ClientError::ValidationError(format!(
                "FORMSHIP_API_BASE_URL must be an http(s) URL, got '{}'",
                self.api_base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ClientError::ValidationError(
                "FORMSHIP_REQUEST_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000/api".to_string(),
            storage_path: env::temp_dir().join("formship-test-session.json"),
            request_timeout_secs: 2,
        }
    }
}

fn default_storage_path() -> PathBuf {
    match env::var("HOME") {
        Ok(home) => PathBuf::from(home)
            .join(".config")
            .join("formship")
            .join("session.json"),
        Err(_) => PathBuf::from("formship-session.json"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_with_defaults() {
        let config = Config::from_env();

        assert!(!config.api_base_url.is_empty());
        assert!(!config.api_base_url.ends_with('/'));
        assert!(config.storage_path.file_name().is_some());
    }

    #[test]
    fn test_test_config() {
        let config = Config::test_config();

        assert_eq!(config.api_base_url, "http://127.0.0.1:8000/api");
        assert_eq!(config.request_timeout(), Duration::from_secs(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let mut config = Config::test_config();
        config.api_base_url = "ftp://example.com".to_string();
        assert!(matches!(config.validate(), Err(ClientError::ValidationError(_))));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::test_config();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
