//! Test configuration
//!
//! Loaded from `peex.toml` when present, then overridden from `PEEX_*`
//! environment variables so secrets never need to live in the file.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};

/// Top-level test configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,

    /// Common test data shared by every fixture
    pub environment: EnvironmentData,

    /// Local and remote WebDriver endpoints
    pub webdriver: WebDriverConfig,

    /// Cloud device lab
    pub device_lab: DeviceLabConfig,

    /// Search indexing status service
    pub indexing: IndexingConfig,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            environment: EnvironmentData::default(),
            webdriver: WebDriverConfig::default(),
            device_lab: DeviceLabConfig::default(),
            indexing: IndexingConfig::default(),
        }
    }
}

/// Environment-provided common test data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EnvironmentData {
    /// Country identifier used as the default candidate nationality
    pub country_id: String,

    /// Password given to generated accounts
    pub default_password: String,

    /// International dialing prefix of generated phone numbers
    pub phone_prefix: String,

    /// Domain of generated email addresses
    pub email_domain: String,
}

impl Default for EnvironmentData {
    fn default() -> Self {
        Self {
            country_id: "FR".to_string(),
            default_password: "11111111".to_string(),
            phone_prefix: "+33".to_string(),
            email_domain: "peex-test.fr".to_string(),
        }
    }
}

/// WebDriver endpoints and app locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebDriverConfig {
    /// Local chromedriver
    pub chromedriver_url: String,

    /// Local Appium server
    pub appium_url: String,

    /// Remote Selenium/Appium hub
    pub remote_hub_url: String,

    /// Run Chrome headless
    pub headless: bool,

    /// Extra Chrome arguments
    pub chrome_args: Vec<String>,

    pub android_app_path: Option<String>,
    pub android_app_package: Option<String>,
    pub android_app_activity: Option<String>,
    pub ios_app_path: Option<String>,
    pub ios_bundle_id: Option<String>,

    /// Timeout applied to each WebDriver HTTP request
    pub request_timeout_secs: u64,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            chromedriver_url: "http://127.0.0.1:9515".to_string(),
            appium_url: "http://127.0.0.1:4723".to_string(),
            remote_hub_url: "http://127.0.0.1:4444/wd/hub".to_string(),
            headless: true,
            chrome_args: vec![
                "--window-size=1920,1080".to_string(),
                "--disable-gpu".to_string(),
                "--no-sandbox".to_string(),
            ],
            android_app_path: None,
            android_app_package: Some("com.peex.candidate".to_string()),
            android_app_activity: Some(".MainActivity".to_string()),
            ios_app_path: None,
            ios_bundle_id: Some("com.peex.candidate".to_string()),
            request_timeout_secs: 30,
        }
    }
}

/// Cloud device lab credentials and device map
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DeviceLabConfig {
    pub hub_url: String,
    pub username: Option<String>,
    pub access_key: Option<String>,

    /// Capability key the vendor options are nested under
    pub options_key: String,

    pub project: String,
    pub build: String,
    pub android: DeviceProfile,
    pub ios: DeviceProfile,
}

impl DeviceLabConfig {
    /// Credentials, if both halves are configured
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.access_key.as_deref()) {
            (Some(user), Some(key)) if !user.is_empty() && !key.is_empty() => Some((user, key)),
            _ => None,
        }
    }
}

/// One device in the cloud lab
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DeviceProfile {
    pub device_name: String,
    pub os_version: String,

    /// App reference already uploaded to the lab
    pub app: Option<String>,
}

/// Search indexing status service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexingConfig {
    pub base_url: String,
    pub app_id: Option<String>,
    pub api_key: Option<String>,

    /// Status path; `{id}` is replaced with the correlation id
    pub status_path: String,

    /// Field of a write response holding the correlation id
    pub correlation_field: String,

    /// Status value every entry must report
    pub success_status: String,

    pub max_attempts: u32,
    pub interval_ms: u64,

    /// Timeout of one status request
    pub request_timeout_secs: u64,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8108".to_string(),
            app_id: None,
            api_key: None,
            status_path: "/1/tasks/{id}".to_string(),
            correlation_field: "taskID".to_string(),
            success_status: "published".to_string(),
            max_attempts: 30,
            interval_ms: 1000,
            request_timeout_secs: 10,
        }
    }
}

impl TestConfig {
    /// Load configuration from file, falling back to defaults
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            debug!("No config at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `PEEX_*` overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("PEEX_LOG_LEVEL") {
            self.log_level = v;
        }
        if let Some(v) = get("PEEX_REMOTE_HUB_URL") {
            self.webdriver.remote_hub_url = v;
        }
        if let Some(v) = get("PEEX_DEVICE_LAB_URL") {
            self.device_lab.hub_url = v;
        }
        if let Some(v) = get("PEEX_DEVICE_LAB_USERNAME") {
            self.device_lab.username = Some(v);
        }
        if let Some(v) = get("PEEX_DEVICE_LAB_ACCESS_KEY") {
            self.device_lab.access_key = Some(v);
        }
        if let Some(v) = get("PEEX_INDEXING_URL") {
            self.indexing.base_url = v;
        }
        if let Some(v) = get("PEEX_INDEXING_APP_ID") {
            self.indexing.app_id = Some(v);
        }
        if let Some(v) = get("PEEX_INDEXING_API_KEY") {
            self.indexing.api_key = Some(v);
        }
    }

    /// Reject values the pollers and factories cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.indexing.max_attempts == 0 {
            return Err(Error::InvalidConfig(
                "indexing.max_attempts must be at least 1".to_string(),
            ));
        }
        if !self.indexing.status_path.contains("{id}") {
            return Err(Error::InvalidConfig(format!(
                "indexing.status_path must contain {{id}}: {}",
                self.indexing.status_path
            )));
        }
        if self.webdriver.request_timeout_secs == 0 {
            return Err(Error::InvalidConfig(
                "webdriver.request_timeout_secs must be positive".to_string(),
            ));
        }
        if self.indexing.request_timeout_secs == 0 {
            return Err(Error::InvalidConfig(
                "indexing.request_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
