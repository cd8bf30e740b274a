//! Job fixture a candidate can be linked to

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Assigned by the API once the job exists
    pub uuid: Option<Uuid>,
    pub title: String,
    pub qualification: Option<String>,
    pub hourly_rate_cents: Option<u32>,
}

impl Job {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            uuid: None,
            title: title.into(),
            qualification: None,
            hourly_rate_cents: None,
        }
    }

    pub fn with_uuid(mut self, uuid: Uuid) -> Self {
        self.uuid = Some(uuid);
        self
    }

    pub fn with_qualification(mut self, qualification: impl Into<String>) -> Self {
        self.qualification = Some(qualification.into());
        self
    }

    pub fn with_hourly_rate_cents(mut self, cents: u32) -> Self {
        self.hourly_rate_cents = Some(cents);
        self
    }
}
