//! Session factory: target + execution mode -> live session

use peex_common::{DeviceLabConfig, WebDriverConfig};
use std::time::Duration;
use tracing::info;

use crate::capabilities::{self, ExecutionMode, SessionPlan, Target};
use crate::error::{DriverError, DriverResult};
use crate::session::Session;

/// Builds sessions from the `[webdriver]` and `[device_lab]` config
#[derive(Debug, Clone)]
pub struct DriverFactory {
    webdriver: WebDriverConfig,
    device_lab: DeviceLabConfig,
}

impl DriverFactory {
    pub fn new(webdriver: WebDriverConfig, device_lab: DeviceLabConfig) -> Self {
        Self {
            webdriver,
            device_lab,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.webdriver.request_timeout_secs)
    }

    /// Resolve endpoint and capabilities without touching the network
    pub fn plan(&self, target: Target, mode: ExecutionMode) -> DriverResult<SessionPlan> {
        let (endpoint, capabilities, basic_auth) = match (target, mode) {
            (Target::Ios, ExecutionMode::Local) => {
                return Err(DriverError::Unimplemented(
                    "local iOS execution; use remote or cloud".to_string(),
                ));
            }
            (Target::Web, ExecutionMode::Local) => (
                self.webdriver.chromedriver_url.clone(),
                capabilities::web(&self.webdriver),
                None,
            ),
            (Target::Android, ExecutionMode::Local) => (
                self.webdriver.appium_url.clone(),
                capabilities::android(&self.webdriver),
                None,
            ),
            (target, ExecutionMode::Remote) => {
                let caps = match target {
                    Target::Web => capabilities::web(&self.webdriver),
                    Target::Android => capabilities::android(&self.webdriver),
                    Target::Ios => capabilities::ios(&self.webdriver),
                };
                (self.webdriver.remote_hub_url.clone(), caps, None)
            }
            (target, ExecutionMode::Cloud) => {
                if self.device_lab.hub_url.is_empty() {
                    return Err(DriverError::MissingConfig(
                        "device_lab.hub_url (or PEEX_DEVICE_LAB_URL)".to_string(),
                    ));
                }
                let caps = capabilities::cloud(target, &self.device_lab)?;
                let auth = self
                    .device_lab
                    .credentials()
                    .map(|(user, key)| (user.to_string(), key.to_string()));
                (self.device_lab.hub_url.clone(), caps, auth)
            }
        };

        Ok(SessionPlan {
            target,
            mode,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            capabilities,
            basic_auth,
        })
    }

    /// Open a live session
    pub async fn create(&self, target: Target, mode: ExecutionMode) -> DriverResult<Session> {
        let plan = self.plan(target, mode)?;
        info!("Opening {} session ({}) at {}", target, mode, plan.endpoint);
        Session::start(plan, self.request_timeout()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peex_common::DeviceProfile;
    use test_case::test_case;

    fn factory() -> DriverFactory {
        let lab = DeviceLabConfig {
            hub_url: "https://hub.lab.example/wd/hub/".to_string(),
            username: Some("qa".to_string()),
            access_key: Some("k3y".to_string()),
            options_key: "lab:options".to_string(),
            android: DeviceProfile {
                device_name: "Samsung Galaxy S23".to_string(),
                os_version: "13.0".to_string(),
                app: None,
            },
            ios: DeviceProfile {
                device_name: "iPhone 15".to_string(),
                os_version: "17".to_string(),
                app: None,
            },
            ..Default::default()
        };
        DriverFactory::new(WebDriverConfig::default(), lab)
    }

    #[test_case(Target::Web, ExecutionMode::Local, "http://127.0.0.1:9515")]
    #[test_case(Target::Android, ExecutionMode::Local, "http://127.0.0.1:4723")]
    #[test_case(Target::Web, ExecutionMode::Remote, "http://127.0.0.1:4444/wd/hub")]
    #[test_case(Target::Ios, ExecutionMode::Remote, "http://127.0.0.1:4444/wd/hub")]
    #[test_case(Target::Android, ExecutionMode::Cloud, "https://hub.lab.example/wd/hub")]
    #[test_case(Target::Ios, ExecutionMode::Cloud, "https://hub.lab.example/wd/hub")]
    fn test_endpoint_selection(target: Target, mode: ExecutionMode, endpoint: &str) {
        let plan = factory().plan(target, mode).unwrap();
        assert_eq!(plan.endpoint, endpoint);
        assert_eq!(plan.basic_auth.is_some(), mode == ExecutionMode::Cloud);
    }

    #[test]
    fn test_ios_local_is_unimplemented() {
        assert!(matches!(
            factory().plan(Target::Ios, ExecutionMode::Local),
            Err(DriverError::Unimplemented(_))
        ));
    }

    #[test]
    fn test_remote_ios_uses_xcuitest() {
        let plan = factory().plan(Target::Ios, ExecutionMode::Remote).unwrap();
        assert_eq!(
            plan.capabilities.get("appium:automationName"),
            Some(&serde_json::Value::from("XCUITest"))
        );
    }

    #[test]
    fn test_cloud_without_hub_url() {
        let factory = DriverFactory::new(WebDriverConfig::default(), DeviceLabConfig::default());
        assert!(matches!(
            factory.plan(Target::Web, ExecutionMode::Cloud),
            Err(DriverError::MissingConfig(_))
        ));
    }
}
