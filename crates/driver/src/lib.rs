//! Peex WebDriver sessions
//!
//! Assembles W3C capabilities for Chrome, Android and iOS targets and opens
//! sessions against a local driver, a remote hub or a cloud device lab.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │  DriverFactory                                            │
//! │    ├── plan(target, mode)   -> SessionPlan                │
//! │    │     ├── endpoint        (chromedriver/appium/hub/lab)│
//! │    │     ├── capabilities    (alwaysMatch map)            │
//! │    │     └── basic_auth      (device lab only)            │
//! │    └── create(target, mode) -> Session                    │
//! ├───────────────────────────────────────────────────────────┤
//! │  Session                                                  │
//! │    ├── navigate / find / click / send_keys                │
//! │    ├── wait_until_clickable(locator, timeout)             │
//! │    ├── perform(Actions)                                   │
//! │    └── quit()                                             │
//! └───────────────────────────────────────────────────────────┘
//! ```

pub mod actions;
pub mod capabilities;
pub mod error;
pub mod factory;
pub mod session;

pub use actions::{keys, Actions};
pub use capabilities::{Capabilities, ExecutionMode, SessionPlan, Target};
pub use error::{DriverError, DriverResult};
pub use factory::DriverFactory;
pub use session::{Element, Locator, Session};
