//! W3C capability assembly

use peex_common::{DeviceLabConfig, DeviceProfile, WebDriverConfig};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{DriverError, DriverResult};

/// What the session automates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Web,
    Android,
    Ios,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Web => "chrome",
            Target::Android => "android",
            Target::Ios => "ios",
        }
    }
}

impl FromStr for Target {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" | "web" => Ok(Target::Web),
            "android" => Ok(Target::Android),
            "ios" => Ok(Target::Ios),
            _ => Err(DriverError::UnknownTarget(s.to_string())),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionMode {
    Local,
    Remote,
    Cloud,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Local => "local",
            ExecutionMode::Remote => "remote",
            ExecutionMode::Cloud => "cloud",
        }
    }
}

impl FromStr for ExecutionMode {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(ExecutionMode::Local),
            "remote" => Ok(ExecutionMode::Remote),
            "cloud" | "device-lab" => Ok(ExecutionMode::Cloud),
            _ => Err(DriverError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A W3C `alwaysMatch` capability map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Capabilities(Map<String, Value>);

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Set only when `value` is present
    pub fn set_opt(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            self.0.insert(key.to_string(), Value::from(v));
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Overlay `other`; its keys win
    pub fn merge(&mut self, other: Capabilities) -> &mut Self {
        self.0.extend(other.0);
        self
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Body of `POST /session`
    pub fn to_new_session_body(&self) -> Value {
        json!({
            "capabilities": {
                "alwaysMatch": Value::Object(self.0.clone()),
                "firstMatch": [{}],
            }
        })
    }
}

/// Everything needed to open a session, assembled before any network call
#[derive(Debug, Clone)]
pub struct SessionPlan {
    pub target: Target,
    pub mode: ExecutionMode,
    pub endpoint: String,
    pub capabilities: Capabilities,
    pub basic_auth: Option<(String, String)>,
}

impl SessionPlan {
    /// JSON view with secrets masked, for printing
    pub fn redacted(&self) -> Value {
        let mut caps = Value::Object(self.capabilities.as_map().clone());
        mask_secrets(&mut caps);
        json!({
            "target": self.target.as_str(),
            "mode": self.mode.as_str(),
            "endpoint": self.endpoint,
            "user": self.basic_auth.as_ref().map(|(user, _)| user),
            "capabilities": caps,
        })
    }
}

fn mask_secrets(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                if key == "accessKey" {
                    *v = Value::from("****");
                } else {
                    mask_secrets(v);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(mask_secrets),
        _ => {}
    }
}

/// Chrome for local chromedriver or a Selenium hub
pub fn web(config: &WebDriverConfig) -> Capabilities {
    let mut args = config.chrome_args.clone();
    if config.headless && !args.iter().any(|a| a.starts_with("--headless")) {
        args.push("--headless=new".to_string());
    }

    let mut caps = Capabilities::new();
    caps.set("browserName", "chrome")
        .set("goog:chromeOptions", json!({ "args": args }));
    caps
}

/// Android app through Appium's UiAutomator2 driver
pub fn android(config: &WebDriverConfig) -> Capabilities {
    let mut caps = Capabilities::new();
    caps.set("platformName", "Android")
        .set("appium:automationName", "UiAutomator2")
        .set("appium:noReset", false)
        .set_opt("appium:app", config.android_app_path.as_deref())
        .set_opt("appium:appPackage", config.android_app_package.as_deref())
        .set_opt("appium:appActivity", config.android_app_activity.as_deref());
    caps
}

/// iOS app through Appium's XCUITest driver
pub fn ios(config: &WebDriverConfig) -> Capabilities {
    let mut caps = Capabilities::new();
    caps.set("platformName", "iOS")
        .set("appium:automationName", "XCUITest")
        .set_opt("appium:app", config.ios_app_path.as_deref())
        .set_opt("appium:bundleId", config.ios_bundle_id.as_deref());
    caps
}

/// Device lab session; vendor options nest under `lab.options_key`
pub fn cloud(target: Target, lab: &DeviceLabConfig) -> DriverResult<Capabilities> {
    let (user, key) = lab.credentials().ok_or_else(|| {
        DriverError::MissingCredentials(
            "PEEX_DEVICE_LAB_USERNAME and PEEX_DEVICE_LAB_ACCESS_KEY".to_string(),
        )
    })?;

    let mut options = Map::new();
    options.insert("userName".to_string(), Value::from(user));
    options.insert("accessKey".to_string(), Value::from(key));
    if !lab.project.is_empty() {
        options.insert("projectName".to_string(), Value::from(lab.project.as_str()));
    }
    if !lab.build.is_empty() {
        options.insert("buildName".to_string(), Value::from(lab.build.as_str()));
    }

    let mut caps = Capabilities::new();
    match target {
        Target::Web => {
            caps.set("browserName", "chrome");
        }
        Target::Android => {
            device(&mut caps, &mut options, "Android", "UiAutomator2", &lab.android)?;
        }
        Target::Ios => {
            device(&mut caps, &mut options, "iOS", "XCUITest", &lab.ios)?;
        }
    }

    let options_key = if lab.options_key.is_empty() {
        "lab:options"
    } else {
        lab.options_key.as_str()
    };
    caps.set(options_key, Value::Object(options));
    Ok(caps)
}

fn device(
    caps: &mut Capabilities,
    options: &mut Map<String, Value>,
    platform: &str,
    automation: &str,
    profile: &DeviceProfile,
) -> DriverResult<()> {
    if profile.device_name.is_empty() {
        return Err(DriverError::MissingConfig(format!(
            "device_lab.{}.device_name",
            platform.to_ascii_lowercase()
        )));
    }

    caps.set("platformName", platform)
        .set("appium:automationName", automation)
        .set_opt("appium:app", profile.app.as_deref());
    options.insert("deviceName".to_string(), Value::from(profile.device_name.as_str()));
    if !profile.os_version.is_empty() {
        options.insert("osVersion".to_string(), Value::from(profile.os_version.as_str()));
    }
    Ok(())
}
